mod errors;
mod source_correlation;

pub use errors::{CorrelationError, MissingSide};
pub use source_correlation::{CorrelationMode, SourceCorrelation};
