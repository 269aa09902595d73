mod errors;
mod kernel_stream;
mod program_graph;

pub use errors::FlowGraphError;
pub use kernel_stream::{BranchLabel, KernelStream};
pub use program_graph::{
    BasicBlock, BlockId, EdgeKind, EdgeTarget, LoopInfo, ProgramGraph, Successor,
};
