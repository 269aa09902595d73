mod join_resource_usage;

pub use join_resource_usage::{JoinResourceUsageUseCase, ResourceJoin};
