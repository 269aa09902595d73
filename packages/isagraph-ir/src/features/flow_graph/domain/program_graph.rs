//! Program graph domain model
//!
//! A kernel's instruction stream cut into basic blocks. Blocks own their
//! instructions; edges refer to blocks by id only.

use crate::features::decoding::domain::Instruction;
use crate::shared::models::InstructionRange;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub type BlockId = usize;

/// How control reaches a successor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeKind {
    /// Conditional branch, condition true
    Taken,
    /// Conditional branch, condition false
    NotTaken,
    /// Unconditional branch
    Jump,
    /// Block ends without a transfer
    FallThrough,
    Call,
}

impl EdgeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeKind::Taken => "taken",
            EdgeKind::NotTaken => "not_taken",
            EdgeKind::Jump => "jump",
            EdgeKind::FallThrough => "fall_through",
            EdgeKind::Call => "call",
        }
    }

    /// Graphviz edge label
    pub fn dot_label(&self) -> &'static str {
        match self {
            EdgeKind::Taken => "T",
            EdgeKind::NotTaken => "F",
            EdgeKind::Jump | EdgeKind::FallThrough | EdgeKind::Call => "N",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeTarget {
    Block(BlockId),
    /// Indirect transfer or a label outside the kernel
    Unresolved,
}

impl EdgeTarget {
    pub fn block(&self) -> Option<BlockId> {
        match self {
            EdgeTarget::Block(id) => Some(*id),
            EdgeTarget::Unresolved => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Successor {
    pub target: EdgeTarget,
    pub kind: EdgeKind,
}

impl Successor {
    pub fn new(target: EdgeTarget, kind: EdgeKind) -> Self {
        Self { target, kind }
    }
}

/// Maximal run of instructions with no internal branch target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasicBlock {
    pub id: BlockId,
    /// Kernel-relative index of the first instruction
    pub first_index: usize,
    pub instructions: Vec<Instruction>,
    pub successors: Vec<Successor>,
    /// Branch-target label opening the block
    pub label: Option<String>,
    pub terminal: bool,
    pub loop_header: bool,
    pub iteration_estimate: Option<u32>,
}

impl BasicBlock {
    pub fn new(id: BlockId, first_index: usize, instructions: Vec<Instruction>) -> Self {
        Self {
            id,
            first_index,
            instructions,
            successors: Vec::new(),
            label: None,
            terminal: false,
            loop_header: false,
            iteration_estimate: None,
        }
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Kernel-relative instruction range
    pub fn range(&self) -> InstructionRange {
        InstructionRange::new(self.first_index, self.first_index + self.instructions.len())
    }

    pub fn last_instruction(&self) -> Option<&Instruction> {
        self.instructions.last()
    }

    /// Label when present, else `block_<id>`
    pub fn display_name(&self) -> String {
        self.label
            .clone()
            .unwrap_or_else(|| format!("block_{}", self.id))
    }

    pub fn successor_blocks(&self) -> impl Iterator<Item = BlockId> + '_ {
        self.successors.iter().filter_map(|s| s.target.block())
    }

    pub fn has_unresolved_successor(&self) -> bool {
        self.successors
            .iter()
            .any(|s| s.target == EdgeTarget::Unresolved)
    }
}

/// Natural loop found through a back edge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoopInfo {
    pub header: BlockId,
    /// Sorted, header included
    pub body: Vec<BlockId>,
    /// Sources of the back edges
    pub latches: Vec<BlockId>,
    pub iteration_estimate: u32,
    /// Body serialises lanes (`v_readfirstlane_b32`, `s_movreld_*`)
    pub hardware_loop: bool,
}

/// Basic blocks of one kernel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramGraph {
    pub kernel: String,
    pub entry_block: BlockId,
    pub blocks: BTreeMap<BlockId, BasicBlock>,
    pub loops: Vec<LoopInfo>,
}

impl ProgramGraph {
    /// Blocks keyed by their ids; the lowest id is the entry
    pub fn new(kernel: impl Into<String>, blocks: Vec<BasicBlock>) -> Self {
        let blocks: BTreeMap<BlockId, BasicBlock> = blocks.into_iter().map(|b| (b.id, b)).collect();
        let entry_block = blocks.keys().next().copied().unwrap_or_default();
        Self {
            kernel: kernel.into(),
            entry_block,
            blocks,
            loops: Vec::new(),
        }
    }

    pub fn block(&self, id: BlockId) -> Option<&BasicBlock> {
        self.blocks.get(&id)
    }

    pub fn block_mut(&mut self, id: BlockId) -> Option<&mut BasicBlock> {
        self.blocks.get_mut(&id)
    }

    pub fn entry(&self) -> Option<&BasicBlock> {
        self.block(self.entry_block)
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn edge_count(&self) -> usize {
        self.blocks.values().map(|b| b.successors.len()).sum()
    }

    pub fn instruction_count(&self) -> usize {
        self.blocks.values().map(BasicBlock::len).sum()
    }

    /// Every instruction in stream order
    pub fn instructions(&self) -> impl Iterator<Item = &Instruction> {
        self.blocks.values().flat_map(|b| b.instructions.iter())
    }

    pub fn edges(&self) -> impl Iterator<Item = (BlockId, &Successor)> {
        self.blocks
            .values()
            .flat_map(|b| b.successors.iter().map(move |s| (b.id, s)))
    }

    pub fn predecessors(&self, id: BlockId) -> Vec<BlockId> {
        let mut preds: Vec<BlockId> = self
            .edges()
            .filter(|(_, s)| s.target == EdgeTarget::Block(id))
            .map(|(from, _)| from)
            .collect();
        preds.dedup();
        preds
    }

    /// Block holding the kernel-relative instruction `index`
    pub fn block_of_instruction(&self, index: usize) -> Option<BlockId> {
        self.blocks
            .values()
            .find(|b| b.range().contains(index))
            .map(|b| b.id)
    }

    pub fn loop_headers(&self) -> impl Iterator<Item = &BasicBlock> {
        self.blocks.values().filter(|b| b.loop_header)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(id: BlockId, first: usize, len: usize) -> BasicBlock {
        let instructions = (0..len)
            .map(|i| Instruction::unknown("s_nop", "s_nop 0", (first + i) as u32 + 1))
            .collect();
        BasicBlock::new(id, first, instructions)
    }

    #[test]
    fn test_graph_lookups() {
        let mut a = block(0, 0, 2);
        a.successors = vec![
            Successor::new(EdgeTarget::Block(1), EdgeKind::Taken),
            Successor::new(EdgeTarget::Block(1), EdgeKind::NotTaken),
        ];
        let mut b = block(1, 2, 3);
        b.successors = vec![Successor::new(EdgeTarget::Unresolved, EdgeKind::Jump)];
        let graph = ProgramGraph::new("k", vec![b, a]);

        assert_eq!(graph.entry_block, 0);
        assert_eq!(graph.instruction_count(), 5);
        assert_eq!(graph.edge_count(), 3);
        assert_eq!(graph.predecessors(1), vec![0]);
        assert_eq!(graph.block_of_instruction(4), Some(1));
        assert_eq!(graph.block_of_instruction(5), None);
        assert!(graph.block(1).unwrap().has_unresolved_successor());
        assert_eq!(graph.block(1).unwrap().display_name(), "block_1");
    }

    #[test]
    fn test_edge_labels() {
        assert_eq!(EdgeKind::Taken.dot_label(), "T");
        assert_eq!(EdgeKind::NotTaken.dot_label(), "F");
        assert_eq!(EdgeKind::FallThrough.dot_label(), "N");
    }
}
