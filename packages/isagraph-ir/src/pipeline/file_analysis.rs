//! Single-file analysis
//!
//! decode -> kernel list -> partition -> correlation -> graphs -> resource
//! usage. Every stage records problems in the file's diagnostic log and
//! drops only what it cannot handle: a line, a row or a kernel.

use super::kernel_entry::KernelEntry;
use crate::config::{AnalysisConfig, Validatable};
use crate::errors::Result;
use crate::features::correlation::{CorrelateKernelsUseCase, CorrelationError, CorrelationReport};
use crate::features::decoding::{DecodeListingUseCase, DisassemblyListing, IsaDispatcher, IsaStatistics};
use crate::features::flow_graph::{BlockGraphBuilder, BranchLabel, BuildProgramGraphUseCase, KernelStream};
use crate::features::kernel_boundary::{
    parse_kernel_list, KernelBoundaryResolver, KernelSpan, ResolvedKernel,
};
use crate::features::lexing::IsaLexer;
use crate::features::resource_usage::{JoinResourceUsageUseCase, ResourceReportParser};
use crate::shared::models::{Diagnostic, DiagnosticLog};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Texts and metadata of one disassembly file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInput {
    pub path: String,
    pub device: String,
    pub disassembly: String,
    pub kernel_list: String,
    pub resource_usage: Option<String>,
    /// Kernel of a resource report without a `KERNEL` column
    pub report_kernel: Option<String>,
    /// Known per-kernel instruction spans; replaces label-based partitioning
    pub kernel_spans: Option<Vec<KernelSpan>>,
}

impl FileInput {
    pub fn new(
        path: impl Into<String>,
        device: impl Into<String>,
        disassembly: impl Into<String>,
        kernel_list: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            device: device.into(),
            disassembly: disassembly.into(),
            kernel_list: kernel_list.into(),
            resource_usage: None,
            report_kernel: None,
            kernel_spans: None,
        }
    }

    pub fn with_resource_usage(mut self, report: impl Into<String>) -> Self {
        self.resource_usage = Some(report.into());
        self
    }

    pub fn with_report_kernel(mut self, kernel: impl Into<String>) -> Self {
        self.report_kernel = Some(kernel.into());
        self
    }

    pub fn with_kernel_spans(mut self, spans: Vec<KernelSpan>) -> Self {
        self.kernel_spans = Some(spans);
        self
    }
}

/// Everything learned from one file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileAnalysis {
    pub path: String,
    pub device: String,
    /// Surviving kernels in stream order
    pub kernels: Vec<KernelEntry>,
    pub isa_statistics: IsaStatistics,
    pub diagnostics: DiagnosticLog,
}

impl FileAnalysis {
    pub fn kernel(&self, name: &str) -> Option<&KernelEntry> {
        self.kernels.iter().find(|k| k.name == name)
    }
}

pub struct FileAnalyzer {
    config: AnalysisConfig,
}

impl FileAnalyzer {
    /// Fails when any configuration section is out of range
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn analyze(&self, input: &FileInput) -> FileAnalysis {
        info!(path = %input.path, device = %input.device, "analysing disassembly file");

        let mut listing = DecodeListingUseCase::new(IsaLexer::new(self.config.lexer.clone()), IsaDispatcher)
            .execute(&input.disassembly);
        let mut diagnostics = std::mem::take(&mut listing.diagnostics);

        let (list, list_errors) = parse_kernel_list(&input.kernel_list);
        for error in &list_errors {
            diagnostics.push(error.to_diagnostic());
        }

        let resolver = KernelBoundaryResolver::new();
        let partition = match &input.kernel_spans {
            Some(spans) => resolver.resolve_spans(spans, listing.instructions.len(), &list),
            None => resolver.resolve(&listing.labels, listing.instructions.len(), &list),
        };
        for error in &partition.errors {
            diagnostics.push(error.to_diagnostic());
        }

        let mut correlation =
            CorrelateKernelsUseCase::default().execute(&mut listing, &partition, &list);
        for error in &correlation.errors {
            diagnostics.push(error.to_diagnostic());
        }

        let buildable: Vec<&ResolvedKernel> = partition
            .kernels
            .iter()
            .filter(|k| !is_mismatched(&correlation, &k.name))
            .collect();
        let mut kernels = Vec::with_capacity(buildable.len());
        for kernel in buildable {
            kernels.push(self.kernel_entry(kernel, &listing, &mut correlation, &mut diagnostics));
        }

        if let Some(report) = &input.resource_usage {
            self.attach_resource_usage(report, input, &mut kernels, &mut diagnostics);
        }

        diagnostics.attach_file(&input.path);
        info!(
            path = %input.path,
            kernels = kernels.len(),
            instructions = listing.instructions.len(),
            diagnostics = diagnostics.len(),
            "analysed disassembly file"
        );

        FileAnalysis {
            path: input.path.clone(),
            device: input.device.clone(),
            kernels,
            isa_statistics: listing.statistics,
            diagnostics,
        }
    }

    fn kernel_entry(
        &self,
        kernel: &ResolvedKernel,
        listing: &DisassemblyListing,
        correlation: &mut CorrelationReport,
        diagnostics: &mut DiagnosticLog,
    ) -> KernelEntry {
        let mut entry = KernelEntry::new(kernel);
        entry.correlation = correlation.correlations.remove(&kernel.name);

        let range = kernel.instructions;
        let labels: Vec<BranchLabel> = listing
            .branch_labels()
            .filter(|l| l.instruction_index >= range.start && l.instruction_index <= range.end)
            .map(|l| BranchLabel {
                name: l.name.clone(),
                index: l.instruction_index - range.start,
            })
            .collect();
        let instructions = listing
            .instructions
            .get(range.indices())
            .unwrap_or_default();

        let use_case = BuildProgramGraphUseCase::new(
            BlockGraphBuilder::new(self.config.graph.clone()),
            self.config.graph.clone(),
        );
        match use_case.execute(&KernelStream::new(&kernel.name, instructions, &labels)) {
            Ok(graph) => entry.set_graph(graph),
            Err(err) => {
                debug!(kernel = %kernel.name, error = %err, "no program graph");
                diagnostics.push(err.to_diagnostic());
            }
        }
        entry
    }

    fn attach_resource_usage(
        &self,
        report: &str,
        input: &FileInput,
        kernels: &mut [KernelEntry],
        diagnostics: &mut DiagnosticLog,
    ) {
        let parser = match ResourceReportParser::from_config(&self.config.resource_usage) {
            Ok(parser) => parser,
            Err(err) => {
                diagnostics.push(Diagnostic::resource_row(err.to_string()));
                return;
            }
        };
        let parsed = match parser.parse(report, input.report_kernel.as_deref()) {
            Ok(parsed) => parsed,
            Err(err) => {
                diagnostics.push(err.to_diagnostic());
                return;
            }
        };
        for error in &parsed.row_errors {
            diagnostics.push(error.to_diagnostic());
        }

        let names: Vec<String> = kernels.iter().map(|k| k.name.clone()).collect();
        let mut join = JoinResourceUsageUseCase::new().execute(
            parsed.records,
            &input.device,
            names.iter().map(String::as_str),
        );
        for warning in &join.warnings {
            diagnostics.push(warning.to_diagnostic());
        }
        for kernel in kernels.iter_mut() {
            kernel.resource_usage = join.take(&kernel.name);
        }
    }
}

fn is_mismatched(report: &CorrelationReport, kernel: &str) -> bool {
    report
        .errors
        .iter()
        .any(|e| matches!(e, CorrelationError::Mismatch { .. }) && e.kernel() == kernel)
}
