//! Graphviz export
//!
//! Loop headers are drawn as filled double circles labelled
//! `<block> X <iterations>`; edges carry `T`, `F` or `N`. Unresolved
//! successors all point at one `unresolved` node.

use crate::features::flow_graph::domain::{EdgeKind, EdgeTarget, ProgramGraph};
use petgraph::dot::{Config, Dot};
use petgraph::graph::{DiGraph, EdgeReference, NodeIndex};
use rustc_hash::FxHashMap;

/// `None` is the shared unresolved sink
type DotNode = Option<usize>;

fn escape(label: &str) -> String {
    label.replace('\\', "\\\\").replace('"', "\\\"")
}

pub fn to_dot(program: &ProgramGraph) -> String {
    let mut graph: DiGraph<DotNode, EdgeKind> = DiGraph::new();
    let nodes: FxHashMap<usize, NodeIndex> = program
        .blocks
        .keys()
        .map(|&id| (id, graph.add_node(Some(id))))
        .collect();
    let mut unresolved: Option<NodeIndex> = None;

    for (from, successor) in program.edges() {
        let Some(&source) = nodes.get(&from) else {
            continue;
        };
        let target = match successor.target {
            EdgeTarget::Block(to) => nodes.get(&to).copied(),
            EdgeTarget::Unresolved => Some(*unresolved.get_or_insert_with(|| graph.add_node(None))),
        };
        if let Some(target) = target {
            graph.add_edge(source, target, successor.kind);
        }
    }

    let edge_attrs = |_: &DiGraph<DotNode, EdgeKind>, edge: EdgeReference<'_, EdgeKind>| {
        format!("label = \"{}\"", edge.weight().dot_label())
    };
    let node_attrs = |_: &DiGraph<DotNode, EdgeKind>, (_, node): (NodeIndex, &DotNode)| {
        node_attributes(program, *node)
    };
    let dot = Dot::with_attr_getters(
        &graph,
        &[Config::EdgeNoLabel, Config::NodeNoLabel],
        &edge_attrs,
        &node_attrs,
    );
    format!("{dot:?}")
}

fn node_attributes(program: &ProgramGraph, node: DotNode) -> String {
    let Some(block) = node.and_then(|id| program.block(id)) else {
        return "label = \"unresolved\", shape = plaintext".to_string();
    };
    let name = escape(&block.display_name());
    match block.iteration_estimate.filter(|_| block.loop_header) {
        Some(iterations) => format!(
            "label = \"{name} X {iterations}\", shape = doublecircle, style = filled, color = \".7 .3 1.0\""
        ),
        None => format!("label = \"{name}\", shape = box"),
    }
}
