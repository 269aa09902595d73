mod correlator;
mod reconcile;

pub use correlator::SourceCorrelator;
pub use reconcile::reconcile;
