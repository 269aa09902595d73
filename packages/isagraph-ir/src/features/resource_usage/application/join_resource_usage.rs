//! Attach resource-usage records to kernels by exact name
//!
//! Kernel names match case-sensitively. A report may cover several devices;
//! rows for a device other than the file's are not attached. Device names
//! compare ASCII case-insensitively, and an empty file device accepts every
//! row.

use crate::features::resource_usage::domain::{ResourceJoinWarning, ResourceUsageRecord};
use std::collections::BTreeMap;
use tracing::warn;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceJoin {
    /// Kernel name -> its records, in report order
    pub attached: BTreeMap<String, Vec<ResourceUsageRecord>>,
    pub warnings: Vec<ResourceJoinWarning>,
}

impl ResourceJoin {
    pub fn take(&mut self, kernel: &str) -> Vec<ResourceUsageRecord> {
        self.attached.remove(kernel).unwrap_or_default()
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct JoinResourceUsageUseCase;

impl JoinResourceUsageUseCase {
    pub fn new() -> Self {
        Self
    }

    pub fn execute<'a>(
        &self,
        records: Vec<ResourceUsageRecord>,
        device: &str,
        kernels: impl IntoIterator<Item = &'a str>,
    ) -> ResourceJoin {
        let kernels: Vec<&str> = kernels.into_iter().collect();
        let mut join = ResourceJoin::default();

        for record in records {
            if !device.is_empty() && !record.device_name.eq_ignore_ascii_case(device) {
                warn!(kernel = %record.kernel_name, device = %record.device_name, expected = %device, "resource-usage row for another device");
                join.warnings.push(ResourceJoinWarning::OtherDevice {
                    device: record.device_name,
                    kernel: record.kernel_name,
                    expected: device.to_string(),
                });
            } else if kernels.contains(&record.kernel_name.as_str()) {
                join.attached
                    .entry(record.kernel_name.clone())
                    .or_default()
                    .push(record);
            } else {
                warn!(kernel = %record.kernel_name, device = %record.device_name, "unmatched resource-usage row");
                join.warnings.push(ResourceJoinWarning::UnknownKernel {
                    device: record.device_name,
                    kernel: record.kernel_name,
                });
            }
        }
        join
    }
}
