mod correlate_kernels;

pub use correlate_kernels::{CorrelateKernelsUseCase, CorrelationReport};
