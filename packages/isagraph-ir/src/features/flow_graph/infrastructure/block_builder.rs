//! Basic block builder
//!
//! One pass finds the leaders (stream start, every branch target, the
//! instruction after each control transfer); a second cuts the stream at
//! the leaders and wires successors from each block's last instruction.

use crate::config::GraphConfig;
use crate::features::decoding::domain::{BranchTarget, ControlFlow, Instruction};
use crate::features::flow_graph::domain::{
    BasicBlock, BlockId, EdgeKind, EdgeTarget, FlowGraphError, KernelStream, ProgramGraph,
    Successor,
};
use crate::features::flow_graph::ports::ProgramGraphBuilder;
use rustc_hash::FxHashMap;
use std::collections::BTreeSet;

/// SOPP branches are one dword
const BRANCH_BYTES: u64 = 4;

#[derive(Debug, Clone, Default)]
pub struct BlockGraphBuilder {
    config: GraphConfig,
}

impl BlockGraphBuilder {
    pub fn new(config: GraphConfig) -> Self {
        Self { config }
    }
}

/// Label and offset lookups for one kernel
struct TargetResolver<'a> {
    labels: FxHashMap<&'a str, usize>,
    offsets: FxHashMap<u64, usize>,
    instructions: &'a [Instruction],
}

impl<'a> TargetResolver<'a> {
    fn new(kernel: &KernelStream<'a>, resolve_relative: bool) -> Self {
        let mut labels = FxHashMap::default();
        for label in kernel.labels {
            labels.entry(label.name.as_str()).or_insert(label.index);
        }

        let offsets = if resolve_relative {
            kernel
                .instructions
                .iter()
                .enumerate()
                .filter_map(|(i, inst)| inst.offset.map(|o| (o, i)))
                .collect()
        } else {
            FxHashMap::default()
        };

        Self {
            labels,
            offsets,
            instructions: kernel.instructions,
        }
    }

    /// Kernel-relative index of the target of instruction `at`
    fn resolve(&self, target: &BranchTarget, at: usize) -> Option<usize> {
        let index = match target {
            BranchTarget::Label(name) => self.labels.get(name.as_str()).copied(),
            BranchTarget::Relative(dwords) => {
                let inst = self.instructions.get(at)?;
                let size = inst
                    .encoding
                    .map_or(BRANCH_BYTES, |e| u64::from(e.size_bytes()));
                let next = i128::from(inst.offset?) + i128::from(size);
                let target = next + i128::from(*dwords) * i128::from(BRANCH_BYTES);
                u64::try_from(target)
                    .ok()
                    .and_then(|t| self.offsets.get(&t).copied())
            }
        };
        index.filter(|i| *i < self.instructions.len())
    }
}

fn transfer_target(flow: &ControlFlow) -> Option<&BranchTarget> {
    match flow {
        ControlFlow::Branch { target, .. } => Some(target),
        ControlFlow::Call { target } => target.as_ref(),
        _ => None,
    }
}

impl ProgramGraphBuilder for BlockGraphBuilder {
    fn build(&self, kernel: &KernelStream<'_>) -> Result<ProgramGraph, FlowGraphError> {
        let instructions = kernel.instructions;
        let len = instructions.len();
        if len == 0 {
            return Err(FlowGraphError::EmptyKernel {
                kernel: kernel.name.to_string(),
            });
        }
        if let Some(label) = kernel.labels.iter().find(|l| l.index > len) {
            return Err(FlowGraphError::LabelOutOfRange {
                kernel: kernel.name.to_string(),
                label: label.name.clone(),
                index: label.index,
                len,
            });
        }

        let resolver = TargetResolver::new(kernel, self.config.resolve_relative_branches);

        let mut leaders: BTreeSet<usize> = BTreeSet::new();
        leaders.insert(0);
        leaders.extend(kernel.labels.iter().map(|l| l.index).filter(|i| *i < len));
        for (i, inst) in instructions.iter().enumerate() {
            if inst.control_flow.ends_block() && i + 1 < len {
                leaders.insert(i + 1);
            }
            if let Some(target) = transfer_target(&inst.control_flow).and_then(|t| resolver.resolve(t, i)) {
                leaders.insert(target);
            }
        }
        let starts: Vec<usize> = leaders.into_iter().collect();

        let mut opening_labels: FxHashMap<usize, &str> = FxHashMap::default();
        for label in kernel.labels {
            opening_labels.entry(label.index).or_insert(label.name.as_str());
        }

        let block_at = |index: usize| -> EdgeTarget {
            match starts.binary_search(&index) {
                Ok(id) => EdgeTarget::Block(id),
                Err(_) => EdgeTarget::Unresolved,
            }
        };

        let mut blocks: Vec<BasicBlock> = Vec::with_capacity(starts.len());
        for (id, &start) in starts.iter().enumerate() {
            let end = starts.get(id + 1).copied().unwrap_or(len);
            let mut block = BasicBlock::new(id, start, instructions[start..end].to_vec());
            block.label = opening_labels.get(&start).map(|name| name.to_string());

            let next: Option<BlockId> = (id + 1 < starts.len()).then_some(id + 1);
            let fall = |kind: EdgeKind| next.map(|n| Successor::new(EdgeTarget::Block(n), kind));
            let resolve = |target: &BranchTarget| -> EdgeTarget {
                resolver
                    .resolve(target, end - 1)
                    .map_or(EdgeTarget::Unresolved, block_at)
            };

            let flow = &instructions[end - 1].control_flow;
            match flow {
                ControlFlow::Sequential => block.successors.extend(fall(EdgeKind::FallThrough)),
                ControlFlow::Branch {
                    target,
                    conditional: true,
                } => {
                    block.successors.push(Successor::new(resolve(target), EdgeKind::Taken));
                    block.successors.extend(fall(EdgeKind::NotTaken));
                }
                ControlFlow::Branch { target, .. } => {
                    block.successors.push(Successor::new(resolve(target), EdgeKind::Jump));
                }
                ControlFlow::IndirectBranch { conditional: true } => {
                    block
                        .successors
                        .push(Successor::new(EdgeTarget::Unresolved, EdgeKind::Taken));
                    block.successors.extend(fall(EdgeKind::NotTaken));
                }
                ControlFlow::IndirectBranch { .. } => {
                    block
                        .successors
                        .push(Successor::new(EdgeTarget::Unresolved, EdgeKind::Jump));
                }
                ControlFlow::Call { target } => {
                    let callee = target.as_ref().map_or(EdgeTarget::Unresolved, resolve);
                    block.successors.push(Successor::new(callee, EdgeKind::Call));
                    block.successors.extend(fall(EdgeKind::FallThrough));
                }
                ControlFlow::Return | ControlFlow::EndProgram => {}
            }
            block.terminal = block.successors.is_empty()
                || matches!(flow, ControlFlow::Return | ControlFlow::EndProgram);
            blocks.push(block);
        }

        Ok(ProgramGraph::new(kernel.name, blocks))
    }
}
