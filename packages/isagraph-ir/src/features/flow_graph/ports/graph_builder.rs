use crate::features::flow_graph::domain::{FlowGraphError, KernelStream, ProgramGraph};

/// Cuts a kernel stream into blocks and records their edges
pub trait ProgramGraphBuilder: Send + Sync {
    fn build(&self, kernel: &KernelStream<'_>) -> Result<ProgramGraph, FlowGraphError>;
}
