use crate::config::GraphConfig;
use crate::features::flow_graph::domain::{FlowGraphError, KernelStream, ProgramGraph};
use crate::features::flow_graph::infrastructure::{detect_loops, GraphStatistics};
use crate::features::flow_graph::ports::ProgramGraphBuilder;
use tracing::debug;

pub struct BuildProgramGraphUseCase<B: ProgramGraphBuilder> {
    builder: B,
    config: GraphConfig,
}

impl<B: ProgramGraphBuilder> BuildProgramGraphUseCase<B> {
    pub fn new(builder: B, config: GraphConfig) -> Self {
        Self { builder, config }
    }

    /// Build the graph, then annotate loops when enabled
    pub fn execute(&self, kernel: &KernelStream<'_>) -> Result<ProgramGraph, FlowGraphError> {
        let mut graph = self.builder.build(kernel)?;
        if self.config.detect_loops {
            detect_loops(&mut graph, &self.config);
        }

        let stats = GraphStatistics::compute(&graph);
        debug!(
            kernel = kernel.name,
            blocks = stats.blocks,
            edges = stats.edges,
            unreachable = stats.unreachable_blocks.len(),
            unresolved = stats.unresolved_edges,
            loops = stats.loops,
            "built program graph"
        );
        Ok(graph)
    }
}
