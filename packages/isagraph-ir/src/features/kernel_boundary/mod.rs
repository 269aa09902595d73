//! Kernel Boundary Resolver
//!
//! Parses the kernel list (`name: start-end`) and partitions a listing's
//! instruction stream into per-kernel ranges.
//!
//! ## Structure
//! - `domain/` - KernelList, KernelPartition, boundary errors
//! - `infrastructure/` - kernel list parser
//! - `application/` - KernelBoundaryResolver

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::KernelBoundaryResolver;
pub use domain::{
    KernelBoundaryError, KernelLineRange, KernelList, KernelListError, KernelPartition,
    KernelSpan, ResolvedKernel,
};
pub use infrastructure::parse_kernel_list;
