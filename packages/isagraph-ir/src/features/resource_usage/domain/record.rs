//! Resource-usage record model

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkgroupDimensions {
    pub x: u64,
    pub y: u64,
    pub z: u64,
}

/// One report row for one kernel on one device
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceUsageRecord {
    pub device_name: String,
    pub kernel_name: String,
    pub scalar_register_count: u64,
    pub vector_register_count: u64,
    pub scalar_spill_count: u64,
    pub vector_spill_count: u64,
    pub shared_memory_bytes_used: u64,
    pub shared_memory_bytes_available: u64,
    pub isa_size_bytes: u64,
    pub scratch_memory_bytes: Option<u64>,
    pub threads_per_workgroup: Option<u64>,
    pub wavefront_size: Option<u64>,
    pub scalar_registers_available: Option<u64>,
    pub vector_registers_available: Option<u64>,
    pub workgroup_dimensions: Option<WorkgroupDimensions>,
}

/// A used count above its available count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsistencyViolation {
    pub resource: &'static str,
    pub used: u64,
    pub available: u64,
}

impl ResourceUsageRecord {
    /// Every used/available pair where both are known and used is larger
    pub fn consistency_violations(&self) -> Vec<ConsistencyViolation> {
        [
            (
                "shared memory bytes",
                self.shared_memory_bytes_used,
                Some(self.shared_memory_bytes_available),
            ),
            (
                "scalar registers",
                self.scalar_register_count,
                self.scalar_registers_available,
            ),
            (
                "vector registers",
                self.vector_register_count,
                self.vector_registers_available,
            ),
        ]
        .into_iter()
        .filter_map(|(resource, used, available)| {
            available
                .filter(|available| used > *available)
                .map(|available| ConsistencyViolation {
                    resource,
                    used,
                    available,
                })
        })
        .collect()
    }
}
