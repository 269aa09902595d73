//! Correlate every kernel of one listing

use crate::features::correlation::domain::{CorrelationError, SourceCorrelation};
use crate::features::correlation::infrastructure::{reconcile, SourceCorrelator};
use crate::features::decoding::DisassemblyListing;
use crate::features::kernel_boundary::{KernelList, KernelPartition};
use std::collections::BTreeMap;
use tracing::{debug, warn};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CorrelationReport {
    pub correlations: BTreeMap<String, SourceCorrelation>,
    /// Mismatches and out-of-span markers
    pub errors: Vec<CorrelationError>,
}

impl CorrelationReport {
    pub fn get(&self, kernel: &str) -> Option<&SourceCorrelation> {
        self.correlations.get(kernel)
    }
}

pub struct CorrelateKernelsUseCase {
    correlator: SourceCorrelator,
}

impl CorrelateKernelsUseCase {
    pub fn new(correlator: SourceCorrelator) -> Self {
        Self { correlator }
    }

    /// Reconcile names, then map each surviving kernel. Kernels named in a
    /// mismatch get no correlation. Precise lines are written back into the
    /// listing's instructions.
    pub fn execute(
        &self,
        listing: &mut DisassemblyListing,
        partition: &KernelPartition,
        list: &KernelList,
    ) -> CorrelationReport {
        let mut stream: Vec<&str> = listing.kernel_labels().map(|l| l.name.as_str()).collect();
        stream.extend(partition.kernels.iter().map(|k| k.name.as_str()));
        let mut report = CorrelationReport {
            errors: reconcile(stream, list),
            ..CorrelationReport::default()
        };

        for kernel in &partition.kernels {
            if report.errors.iter().any(|e| e.kernel() == kernel.name) {
                warn!(kernel = %kernel.name, "skipping correlation of mismatched kernel");
                continue;
            }
            let (correlation, warnings) = self.correlator.correlate(kernel, &listing.source_markers);
            self.correlator.apply(&correlation, &mut listing.instructions);
            report.errors.extend(warnings);
            report.correlations.insert(kernel.name.clone(), correlation);
        }

        debug!(
            kernels = report.correlations.len(),
            precise = report.correlations.values().filter(|c| c.is_precise()).count(),
            errors = report.errors.len(),
            "correlated kernels"
        );
        report
    }
}

impl Default for CorrelateKernelsUseCase {
    fn default() -> Self {
        Self::new(SourceCorrelator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LexerConfig;
    use crate::features::correlation::domain::{CorrelationMode, MissingSide};
    use crate::features::decoding::{DecodeListingUseCase, IsaDispatcher};
    use crate::features::kernel_boundary::{parse_kernel_list, KernelBoundaryResolver};
    use crate::features::lexing::IsaLexer;

    const LISTING: &str = "\
first:
; /work/k.cl:3
; int i = get_global_id(0);
  v_mov_b32 v0, v1
; /work/k.cl:4
; out[i] = 0;
  v_mov_b32 v2, 0
  s_endpgm
second:
  s_nop 0
  s_endpgm
";

    fn listing() -> DisassemblyListing {
        DecodeListingUseCase::new(IsaLexer::new(LexerConfig::default()), IsaDispatcher).execute(LISTING)
    }

    #[test]
    fn test_precise_and_coarse_kernels() {
        let mut listing = listing();
        let (list, _) = parse_kernel_list("first: 1-5\nsecond: 7-9\n");
        let partition = KernelBoundaryResolver.resolve(&listing.labels, listing.instructions.len(), &list);

        let report = CorrelateKernelsUseCase::default().execute(&mut listing, &partition, &list);
        assert!(report.errors.is_empty());
        assert_eq!(report.get("first").unwrap().mode, CorrelationMode::Precise);
        assert_eq!(report.get("second").unwrap().mode, CorrelationMode::Coarse);
        assert_eq!(report.get("first").unwrap().line_of(2), Some(4));
        assert_eq!(listing.instructions[0].source_line_index, Some(3));
        assert_eq!(listing.instructions[3].source_line_index, None);
    }

    #[test]
    fn test_mismatch_skips_kernel() {
        let mut listing = listing();
        let (list, _) = parse_kernel_list("first: 1-5\nthird: 20-30\n");
        let partition = KernelBoundaryResolver.resolve(&listing.labels, listing.instructions.len(), &list);

        let report = CorrelateKernelsUseCase::default().execute(&mut listing, &partition, &list);
        let missing: Vec<_> = report
            .errors
            .iter()
            .map(|e| match e {
                CorrelationError::Mismatch { kernel, missing } => (kernel.as_str(), *missing),
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(
            missing,
            vec![
                ("second", MissingSide::KernelList),
                ("third", MissingSide::InstructionStream)
            ]
        );
        assert!(report.get("first").is_some());
        assert!(report.get("second").is_none());
    }
}
