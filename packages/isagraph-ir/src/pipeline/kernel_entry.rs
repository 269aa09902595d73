//! Per-kernel analysis result

use crate::features::correlation::SourceCorrelation;
use crate::features::decoding::{isa_csv, Instruction};
use crate::features::flow_graph::{to_dot, GraphStatistics, ProgramGraph};
use crate::features::kernel_boundary::ResolvedKernel;
use crate::features::resource_usage::ResourceUsageRecord;
use crate::shared::models::{InstructionRange, LineSpan};
use serde::{Deserialize, Serialize};

/// One kernel/shader stage of a disassembly file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KernelEntry {
    pub name: String,
    pub start_line: u32,
    pub end_line: u32,
    /// File-level instruction indices
    pub instruction_range: InstructionRange,
    pub graph: Option<ProgramGraph>,
    pub graph_statistics: Option<GraphStatistics>,
    pub correlation: Option<SourceCorrelation>,
    pub resource_usage: Vec<ResourceUsageRecord>,
}

impl KernelEntry {
    pub fn new(kernel: &ResolvedKernel) -> Self {
        Self {
            name: kernel.name.clone(),
            start_line: kernel.declared.start_line,
            end_line: kernel.declared.end_line,
            instruction_range: kernel.instructions,
            graph: None,
            graph_statistics: None,
            correlation: None,
            resource_usage: Vec::new(),
        }
    }

    pub fn declared_span(&self) -> LineSpan {
        LineSpan::new(self.start_line, self.end_line)
    }

    /// Attach a built graph along with its statistics
    pub fn set_graph(&mut self, graph: ProgramGraph) {
        self.graph_statistics = Some(GraphStatistics::compute(&graph));
        self.graph = Some(graph);
    }

    /// Instructions in stream order; empty until the graph is built
    pub fn instructions(&self) -> impl Iterator<Item = &Instruction> {
        self.graph.iter().flat_map(|g| g.instructions())
    }

    pub fn isa_csv(&self, with_source_lines: bool) -> Option<String> {
        let graph = self.graph.as_ref()?;
        Some(isa_csv(graph.instructions(), with_source_lines))
    }

    pub fn dot(&self) -> Option<String> {
        self.graph.as_ref().map(to_dot)
    }
}
