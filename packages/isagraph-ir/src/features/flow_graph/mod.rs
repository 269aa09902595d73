//! Program Graph Builder
//!
//! Turns one kernel's instruction stream into basic blocks with taken,
//! fall-through and unresolved edges, then finds loops through dominators.
//!
//! ## Structure
//! - `domain/` - ProgramGraph, BasicBlock, Successor, LoopInfo
//! - `ports/` - ProgramGraphBuilder trait
//! - `infrastructure/` - block builder, loop detection, DOT export, statistics
//! - `application/` - BuildProgramGraphUseCase
//!
//! ## Usage
//! ```ignore
//! let use_case = BuildProgramGraphUseCase::new(BlockGraphBuilder::new(config.graph.clone()), config.graph.clone());
//! let graph = use_case.execute(&KernelStream::new("main", &instructions, &labels))?;
//! println!("{}", to_dot(&graph));
//! ```

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod ports;

pub use application::BuildProgramGraphUseCase;
pub use domain::{
    BasicBlock, BlockId, BranchLabel, EdgeKind, EdgeTarget, FlowGraphError, KernelStream,
    LoopInfo, ProgramGraph, Successor,
};
pub use infrastructure::{detect_loops, reachable_blocks, to_dot, BlockGraphBuilder, GraphStatistics};
pub use ports::ProgramGraphBuilder;
