//! Resolved per-kernel instruction ranges

use crate::shared::models::{InstructionRange, LineSpan};
use serde::{Deserialize, Serialize};

use super::errors::KernelBoundaryError;

/// Caller-supplied instruction span for a kernel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KernelSpan {
    pub name: String,
    pub instructions: InstructionRange,
}

impl KernelSpan {
    pub fn new(name: impl Into<String>, instructions: InstructionRange) -> Self {
        Self {
            name: name.into(),
            instructions,
        }
    }
}

/// A kernel whose instruction range passed every boundary check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedKernel {
    pub name: String,
    pub declared: LineSpan,
    pub instructions: InstructionRange,
}

/// Outcome of partitioning one file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KernelPartition {
    /// Surviving kernels in stream order
    pub kernels: Vec<ResolvedKernel>,
    pub errors: Vec<KernelBoundaryError>,
    /// Names of kernels dropped by a boundary error
    pub dropped: Vec<String>,
}

impl KernelPartition {
    pub fn get(&self, name: &str) -> Option<&ResolvedKernel> {
        self.kernels.iter().find(|k| k.name == name)
    }

    pub fn is_dropped(&self, name: &str) -> bool {
        self.dropped.iter().any(|d| d == name)
    }
}
