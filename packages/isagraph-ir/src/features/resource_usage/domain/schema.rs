//! Versioned column schemas of the resource-usage report
//!
//! The version is told apart by column count: the generic report has one
//! row per device for a single kernel; the per-kernel report adds a
//! `KERNEL` column after `DEVICE`.

use serde::{Deserialize, Serialize};

const GENERIC_COLUMNS: [&str; 16] = [
    "DEVICE",
    "SCRATCH_MEM",
    "THREADS_PER_WORKGROUP",
    "WAVEFRONT_SIZE",
    "AVAILABLE_LDS_BYTES",
    "USED_LDS_BYTES",
    "AVAILABLE_SGPRs",
    "USED_SGPRs",
    "SGPR_SPILLS",
    "AVAILABLE_VGPRs",
    "USED_VGPRs",
    "VGPR_SPILLS",
    "CL_WORKGROUP_X_DIMENSION",
    "CL_WORKGROUP_Y_DIMENSION",
    "CL_WORKGROUP_Z_DIMENSION",
    "ISA_SIZE",
];

const PER_KERNEL_COLUMNS: [&str; 17] = [
    "DEVICE",
    "KERNEL",
    "SCRATCH_MEM",
    "THREADS_PER_WORKGROUP",
    "WAVEFRONT_SIZE",
    "AVAILABLE_LDS_BYTES",
    "USED_LDS_BYTES",
    "AVAILABLE_SGPRs",
    "USED_SGPRs",
    "SGPR_SPILLS",
    "AVAILABLE_VGPRs",
    "USED_VGPRs",
    "VGPR_SPILLS",
    "CL_WORKGROUP_X_DIMENSION",
    "CL_WORKGROUP_Y_DIMENSION",
    "CL_WORKGROUP_Z_DIMENSION",
    "ISA_SIZE",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReportSchema {
    /// 16 columns; the kernel name comes from the caller
    Generic,
    /// 17 columns with `KERNEL`
    PerKernel,
}

impl ReportSchema {
    pub fn from_column_count(count: usize) -> Option<Self> {
        match count {
            16 => Some(ReportSchema::Generic),
            17 => Some(ReportSchema::PerKernel),
            _ => None,
        }
    }

    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            ReportSchema::Generic => &GENERIC_COLUMNS,
            ReportSchema::PerKernel => &PER_KERNEL_COLUMNS,
        }
    }

    pub fn column_count(&self) -> usize {
        self.columns().len()
    }

    /// Position of a named column
    pub fn index_of(&self, column: &str) -> Option<usize> {
        self.columns().iter().position(|c| *c == column)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportSchema::Generic => "generic",
            ReportSchema::PerKernel => "per_kernel",
        }
    }
}
