//! Loop detection
//!
//! A back edge is an edge whose target dominates its source. Each back
//! edge yields a natural loop; loops sharing a header are merged.

use super::digraph::BlockDigraph;
use crate::config::GraphConfig;
use crate::features::flow_graph::domain::{BlockId, LoopInfo, ProgramGraph};
use petgraph::algo::dominators::{self, Dominators};
use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Instructions that serialise lanes, making a loop run once per lane
fn is_lane_serialising(mnemonic: &str) -> bool {
    mnemonic.starts_with("v_readfirstlane_b32") || mnemonic.starts_with("s_movreld_")
}

fn dominates(doms: &Dominators<NodeIndex>, dominator: NodeIndex, node: NodeIndex) -> bool {
    doms.dominators(node)
        .map_or(false, |mut chain| chain.any(|d| d == dominator))
}

/// Finds loops, marks their headers and records iteration estimates
pub fn detect_loops(program: &mut ProgramGraph, config: &GraphConfig) {
    let view = BlockDigraph::from_program(program);
    let Some(entry) = view.entry(program) else {
        return;
    };
    let graph = &view.graph;
    let doms = dominators::simple_fast(graph, entry);

    // header -> (body, latches)
    let mut found: BTreeMap<BlockId, (BTreeSet<BlockId>, BTreeSet<BlockId>)> = BTreeMap::new();

    for edge in graph.edge_references() {
        let (latch, header) = (edge.source(), edge.target());
        if !dominates(&doms, header, latch) {
            continue;
        }

        let mut body: BTreeSet<NodeIndex> = BTreeSet::new();
        body.insert(header);
        let mut stack = Vec::new();
        if body.insert(latch) {
            stack.push(latch);
        }
        while let Some(node) = stack.pop() {
            for pred in graph.neighbors_directed(node, Direction::Incoming) {
                // unreachable predecessors are not part of the loop
                if doms.dominators(pred).is_some() && body.insert(pred) {
                    stack.push(pred);
                }
            }
        }

        let (blocks, latches) = found.entry(graph[header]).or_default();
        blocks.extend(body.iter().map(|&n| graph[n]));
        latches.insert(graph[latch]);
    }

    program.loops = found
        .into_iter()
        .map(|(header, (body, latches))| {
            let hardware_loop = body.iter().any(|id| {
                program
                    .block(*id)
                    .map_or(false, |b| b.instructions.iter().any(|i| is_lane_serialising(&i.mnemonic)))
            });
            let iteration_estimate = if hardware_loop {
                config.hardware_loop_iterations
            } else {
                config.default_loop_iterations
            };
            LoopInfo {
                header,
                body: body.into_iter().collect(),
                latches: latches.into_iter().collect(),
                iteration_estimate,
                hardware_loop,
            }
        })
        .collect();

    let marks: Vec<(BlockId, u32)> = program
        .loops
        .iter()
        .map(|l| (l.header, l.iteration_estimate))
        .collect();
    for (header, estimate) in marks {
        if let Some(block) = program.block_mut(header) {
            block.loop_header = true;
            block.iteration_estimate = Some(estimate);
        }
    }

    debug!(
        kernel = %program.kernel,
        loops = program.loops.len(),
        "detected loops"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::flow_graph::domain::{BasicBlock, EdgeKind, EdgeTarget, Successor};
    use crate::features::decoding::domain::Instruction;

    fn block(id: BlockId, mnemonic: &str, successors: &[(BlockId, EdgeKind)]) -> BasicBlock {
        let mut block = BasicBlock::new(id, id, vec![Instruction::unknown(mnemonic, mnemonic, id as u32 + 1)]);
        block.successors = successors
            .iter()
            .map(|&(to, kind)| Successor::new(EdgeTarget::Block(to), kind))
            .collect();
        block
    }

    #[test]
    fn test_simple_loop() {
        // 0 -> 1 -> 2 -> 1, 2 -> 3
        let mut graph = ProgramGraph::new(
            "k",
            vec![
                block(0, "s_mov_b32", &[(1, EdgeKind::FallThrough)]),
                block(1, "v_add_f32", &[(2, EdgeKind::FallThrough)]),
                block(2, "s_cbranch_scc0", &[(1, EdgeKind::Taken), (3, EdgeKind::NotTaken)]),
                block(3, "s_endpgm", &[]),
            ],
        );
        detect_loops(&mut graph, &GraphConfig::default());

        assert_eq!(graph.loops.len(), 1);
        let found = &graph.loops[0];
        assert_eq!(found.header, 1);
        assert_eq!(found.body, vec![1, 2]);
        assert_eq!(found.latches, vec![2]);
        assert_eq!(found.iteration_estimate, 10);
        assert!(graph.block(1).unwrap().loop_header);
        assert_eq!(graph.block(1).unwrap().iteration_estimate, Some(10));
        assert!(!graph.block(2).unwrap().loop_header);
    }

    #[test]
    fn test_hardware_loop_estimate() {
        let mut graph = ProgramGraph::new(
            "k",
            vec![
                block(0, "s_mov_b64", &[(1, EdgeKind::FallThrough)]),
                block(1, "v_readfirstlane_b32", &[(1, EdgeKind::Taken), (2, EdgeKind::NotTaken)]),
                block(2, "s_endpgm", &[]),
            ],
        );
        detect_loops(&mut graph, &GraphConfig::default());
        assert_eq!(graph.loops.len(), 1);
        assert!(graph.loops[0].hardware_loop);
        assert_eq!(graph.block(1).unwrap().iteration_estimate, Some(64));
    }

    #[test]
    fn test_forward_edges_are_not_loops() {
        let mut graph = ProgramGraph::new(
            "k",
            vec![
                block(0, "s_cbranch_scc1", &[(2, EdgeKind::Taken), (1, EdgeKind::NotTaken)]),
                block(1, "v_mov_b32", &[(2, EdgeKind::FallThrough)]),
                block(2, "s_endpgm", &[]),
            ],
        );
        detect_loops(&mut graph, &GraphConfig::default());
        assert!(graph.loops.is_empty());
        assert_eq!(graph.loop_headers().count(), 0);
    }

    #[test]
    fn test_irreducible_entry_is_not_a_natural_loop() {
        // 0 branches into both 1 and 2, which jump to each other
        let mut graph = ProgramGraph::new(
            "k",
            vec![
                block(0, "s_cbranch_scc1", &[(2, EdgeKind::Taken), (1, EdgeKind::NotTaken)]),
                block(1, "s_branch", &[(2, EdgeKind::Jump)]),
                block(2, "s_branch", &[(1, EdgeKind::Jump)]),
            ],
        );
        detect_loops(&mut graph, &GraphConfig::default());
        assert!(graph.loops.is_empty());
    }
}
