//! Kernel list model

use crate::shared::models::LineSpan;
use serde::{Deserialize, Serialize};

/// `<entrypoint-name>: <start-line>-<end-line>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KernelLineRange {
    pub name: String,
    pub span: LineSpan,
    /// 1-based line of the entry in the kernel list text
    pub list_line: u32,
}

/// Declared kernels of one disassembly file, in declaration order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KernelList {
    entries: Vec<KernelLineRange>,
}

impl KernelList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends unless the name is already declared; returns whether it was added
    pub fn insert(&mut self, entry: KernelLineRange) -> bool {
        if self.contains(&entry.name) {
            return false;
        }
        self.entries.push(entry);
        true
    }

    pub fn get(&self, name: &str) -> Option<&KernelLineRange> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &KernelLineRange> {
        self.entries.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<KernelLineRange> for KernelList {
    fn from_iter<I: IntoIterator<Item = KernelLineRange>>(iter: I) -> Self {
        let mut list = KernelList::new();
        for entry in iter {
            list.insert(entry);
        }
        list
    }
}
