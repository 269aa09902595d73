mod resolve_kernels;

pub use resolve_kernels::KernelBoundaryResolver;
