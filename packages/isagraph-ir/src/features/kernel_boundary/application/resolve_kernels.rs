//! Kernel Boundary Resolver
//!
//! Splits a file-level instruction stream into per-kernel ranges. A kernel
//! label opens a range that runs to the next kernel label or the end of the
//! stream. Labels without a kernel list entry and duplicated labels drop
//! their kernel; overlapping line or instruction ranges drop every kernel
//! involved.

use crate::features::decoding::LabelMarker;
use crate::features::kernel_boundary::domain::{
    KernelBoundaryError, KernelList, KernelPartition, KernelSpan, ResolvedKernel,
};
use crate::features::lexing::LabelKind;
use crate::shared::models::InstructionRange;
use rustc_hash::FxHashMap;
use tracing::{debug, warn};

#[derive(Debug, Default, Clone, Copy)]
pub struct KernelBoundaryResolver;

impl KernelBoundaryResolver {
    pub fn new() -> Self {
        Self
    }

    /// Partition using kernel-entry labels of the listing
    pub fn resolve(
        &self,
        labels: &[LabelMarker],
        instruction_count: usize,
        list: &KernelList,
    ) -> KernelPartition {
        let entries: Vec<&LabelMarker> = labels
            .iter()
            .filter(|l| l.kind == LabelKind::KernelEntry)
            .collect();

        let mut partition = KernelPartition::default();

        if entries.is_empty() {
            // an unlabelled listing of a single declared kernel is that kernel
            let mut only = list.iter();
            if let (Some(entry), None) = (only.next(), only.next()) {
                partition.kernels.push(ResolvedKernel {
                    name: entry.name.clone(),
                    declared: entry.span,
                    instructions: InstructionRange::new(0, instruction_count),
                });
            }
            return self.check_overlaps(partition, list);
        }

        let mut occurrences: FxHashMap<&str, usize> = FxHashMap::default();
        for label in &entries {
            *occurrences.entry(label.name.as_str()).or_default() += 1;
        }

        for (position, label) in entries.iter().enumerate() {
            let end = entries
                .get(position + 1)
                .map_or(instruction_count, |next| next.instruction_index);
            let range = InstructionRange::new(label.instruction_index, end);

            if occurrences.get(label.name.as_str()).copied().unwrap_or(0) > 1 {
                // report each duplicated name once
                if !partition.is_dropped(&label.name) {
                    partition.errors.push(KernelBoundaryError::DuplicateLabel {
                        label: label.name.clone(),
                    });
                    partition.dropped.push(label.name.clone());
                }
                continue;
            }

            match list.get(&label.name) {
                Some(entry) => partition.kernels.push(ResolvedKernel {
                    name: label.name.clone(),
                    declared: entry.span,
                    instructions: range,
                }),
                None => {
                    partition.errors.push(KernelBoundaryError::UndeclaredLabel {
                        label: label.name.clone(),
                        line: label.line_number,
                    });
                    partition.dropped.push(label.name.clone());
                }
            }
        }

        self.check_overlaps(partition, list)
    }

    /// Partition using spans a caller already knows
    pub fn resolve_spans(
        &self,
        spans: &[KernelSpan],
        instruction_count: usize,
        list: &KernelList,
    ) -> KernelPartition {
        let mut partition = KernelPartition::default();

        for span in spans {
            let invalid = if span.instructions.end > instruction_count {
                Some(format!(
                    "range {} exceeds the {} instructions of the listing",
                    span.instructions, instruction_count
                ))
            } else if spans.iter().filter(|s| s.name == span.name).count() > 1 {
                Some("supplied more than once".to_string())
            } else if !list.contains(&span.name) {
                Some("no kernel list entry".to_string())
            } else {
                None
            };

            match (invalid, list.get(&span.name)) {
                (None, Some(entry)) => partition.kernels.push(ResolvedKernel {
                    name: span.name.clone(),
                    declared: entry.span,
                    instructions: span.instructions,
                }),
                (detail, _) => {
                    if !partition.is_dropped(&span.name) {
                        partition.errors.push(KernelBoundaryError::InvalidSpan {
                            name: span.name.clone(),
                            detail: detail.unwrap_or_default(),
                        });
                        partition.dropped.push(span.name.clone());
                    }
                }
            }
        }

        partition.kernels.sort_by_key(|k| k.instructions.start);
        self.check_overlaps(partition, list)
    }

    /// Drop every kernel whose declared lines or instruction range intersect
    /// another's; one error per affected kernel
    fn check_overlaps(&self, mut partition: KernelPartition, list: &KernelList) -> KernelPartition {
        let declared: Vec<_> = list.iter().collect();
        let mut conflicts: Vec<KernelBoundaryError> = Vec::new();

        for entry in &declared {
            let line_conflict = declared
                .iter()
                .find(|other| other.name != entry.name && other.span.overlaps(&entry.span))
                .map(|other| (other.name.clone(), format!("source lines {} and {}", entry.span, other.span)));

            let instruction_conflict = partition.get(&entry.name).and_then(|kernel| {
                partition
                    .kernels
                    .iter()
                    .find(|other| other.name != kernel.name && other.instructions.overlaps(&kernel.instructions))
                    .map(|other| {
                        (
                            other.name.clone(),
                            format!("instructions {} and {}", kernel.instructions, other.instructions),
                        )
                    })
            });

            if let Some((other, detail)) = line_conflict.or(instruction_conflict) {
                conflicts.push(KernelBoundaryError::OverlappingRanges {
                    kernel: entry.name.clone(),
                    other,
                    detail,
                });
            }
        }

        for conflict in conflicts {
            if let KernelBoundaryError::OverlappingRanges { kernel, .. } = &conflict {
                warn!(kernel = %kernel, "dropping kernel with overlapping range");
                partition.kernels.retain(|k| &k.name != kernel);
                if !partition.is_dropped(kernel) {
                    partition.dropped.push(kernel.clone());
                }
            }
            partition.errors.push(conflict);
        }

        debug!(
            kernels = partition.kernels.len(),
            dropped = partition.dropped.len(),
            "resolved kernel boundaries"
        );
        partition
    }
}
