mod errors;
mod kernel_list;
mod partition;

pub use errors::{KernelBoundaryError, KernelListError};
pub use kernel_list::{KernelLineRange, KernelList};
pub use partition::{KernelPartition, KernelSpan, ResolvedKernel};
