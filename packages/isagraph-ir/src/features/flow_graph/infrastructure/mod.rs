mod block_builder;
mod digraph;
mod dot;
mod loops;
mod statistics;

pub use block_builder::BlockGraphBuilder;
pub use dot::to_dot;
pub use loops::detect_loops;
pub use statistics::{reachable_blocks, GraphStatistics};
