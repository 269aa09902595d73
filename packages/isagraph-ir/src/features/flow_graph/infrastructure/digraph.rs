//! petgraph view of a program graph (resolved edges only)

use crate::features::flow_graph::domain::{BlockId, EdgeKind, ProgramGraph};
use petgraph::graph::{DiGraph, NodeIndex};
use rustc_hash::FxHashMap;

pub(crate) struct BlockDigraph {
    pub graph: DiGraph<BlockId, EdgeKind>,
    pub nodes: FxHashMap<BlockId, NodeIndex>,
}

impl BlockDigraph {
    pub fn from_program(program: &ProgramGraph) -> Self {
        let mut graph = DiGraph::with_capacity(program.block_count(), program.edge_count());
        let nodes: FxHashMap<BlockId, NodeIndex> = program
            .blocks
            .keys()
            .map(|&id| (id, graph.add_node(id)))
            .collect();

        for (from, successor) in program.edges() {
            let target = successor.target.block().and_then(|to| nodes.get(&to));
            if let (Some(&source), Some(&target)) = (nodes.get(&from), target) {
                graph.add_edge(source, target, successor.kind);
            }
        }

        Self { graph, nodes }
    }

    pub fn entry(&self, program: &ProgramGraph) -> Option<NodeIndex> {
        self.nodes.get(&program.entry_block).copied()
    }
}
