//! Source Correlation Engine
//!
//! Maps instructions to the source lines they were generated from. Debug
//! markers in the listing give a precise per-instruction map; without them
//! a kernel's whole instruction range maps to its declared line span.
//!
//! ## Structure
//! - `domain/` - SourceCorrelation, CorrelationMode, CorrelationError
//! - `infrastructure/` - SourceCorrelator, kernel name reconciliation
//! - `application/` - CorrelateKernelsUseCase

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::{CorrelateKernelsUseCase, CorrelationReport};
pub use domain::{CorrelationError, CorrelationMode, MissingSide, SourceCorrelation};
pub use infrastructure::{reconcile, SourceCorrelator};
