//! Program graph statistics

use super::digraph::BlockDigraph;
use crate::features::flow_graph::domain::{BlockId, EdgeTarget, ProgramGraph};
use petgraph::visit::Dfs;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStatistics {
    pub blocks: usize,
    pub edges: usize,
    pub instructions: usize,
    pub reachable_blocks: usize,
    /// Kept in the graph, never entered from the entry block
    pub unreachable_blocks: Vec<BlockId>,
    pub unresolved_edges: usize,
    pub terminal_blocks: usize,
    pub loops: usize,
    /// Instruction count per functional unit name
    pub functional_units: BTreeMap<String, usize>,
}

/// Blocks reachable from the entry over resolved edges
pub fn reachable_blocks(program: &ProgramGraph) -> BTreeSet<BlockId> {
    let view = BlockDigraph::from_program(program);
    let mut reachable = BTreeSet::new();
    if let Some(entry) = view.entry(program) {
        let mut dfs = Dfs::new(&view.graph, entry);
        while let Some(node) = dfs.next(&view.graph) {
            reachable.insert(view.graph[node]);
        }
    }
    reachable
}

impl GraphStatistics {
    pub fn compute(program: &ProgramGraph) -> Self {
        let reachable = reachable_blocks(program);

        let mut functional_units: BTreeMap<String, usize> = BTreeMap::new();
        for instruction in program.instructions() {
            *functional_units
                .entry(instruction.functional_unit.to_string())
                .or_default() += 1;
        }

        Self {
            blocks: program.block_count(),
            edges: program.edge_count(),
            instructions: program.instruction_count(),
            reachable_blocks: reachable.len(),
            unreachable_blocks: program
                .blocks
                .keys()
                .filter(|id| !reachable.contains(id))
                .copied()
                .collect(),
            unresolved_edges: program
                .edges()
                .filter(|(_, s)| s.target == EdgeTarget::Unresolved)
                .count(),
            terminal_blocks: program.blocks.values().filter(|b| b.terminal).count(),
            loops: program.loops.len(),
            functional_units,
        }
    }
}
