//! Kernel name reconciliation between a listing and its kernel list

use crate::features::correlation::domain::{CorrelationError, MissingSide};
use crate::features::kernel_boundary::KernelList;

/// Names must match 1:1; every mismatch is reported from both directions
pub fn reconcile<'a>(
    stream_kernels: impl IntoIterator<Item = &'a str>,
    list: &KernelList,
) -> Vec<CorrelationError> {
    let mut seen: Vec<&str> = Vec::new();
    let mut errors = Vec::new();

    for name in stream_kernels {
        if seen.contains(&name) {
            continue;
        }
        seen.push(name);
        if !list.contains(name) {
            errors.push(CorrelationError::Mismatch {
                kernel: name.to_string(),
                missing: MissingSide::KernelList,
            });
        }
    }

    errors.extend(
        list.names()
            .filter(|name| !seen.contains(name))
            .map(|name| CorrelationError::Mismatch {
                kernel: name.to_string(),
                missing: MissingSide::InstructionStream,
            }),
    );
    errors
}
