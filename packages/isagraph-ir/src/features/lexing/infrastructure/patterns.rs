//! Line patterns for the lexer
//!
//! Patterns compile once on first use. A pattern that fails to compile
//! matches nothing; `all_patterns_compile` guards against that in tests.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

pub(crate) type Pattern = Lazy<Option<Regex>>;

/// `; -------- Disassembly --------`
pub(crate) static SECTION_START: Pattern =
    Lazy::new(|| Regex::new(r"^;\s*-+\s*Disassembly\s*-+\s*$").ok());

/// `; ----------------- CS Data ------------------------`
pub(crate) static SECTION_END: Pattern =
    Lazy::new(|| Regex::new(r"^;\s*-+\s*[A-Za-z]+\s+Data\s*-+\s*$").ok());

pub(crate) static NUM_VGPRS: Pattern =
    Lazy::new(|| Regex::new(r"^(?:;\s*)?NumVgprs\s*[=:]\s*(\d+)").ok());

/// `NumSgprs = 20 ... modified by runtime to be 24;`
pub(crate) static NUM_SGPRS: Pattern = Lazy::new(|| {
    Regex::new(r"^(?:;\s*)?NumSgprs\s*[=:]\s*(\d+)(?:.*?modified by runtime to be\s*(\d+))?").ok()
});

pub(crate) static CODE_LENGTH: Pattern =
    Lazy::new(|| Regex::new(r"^(?:;\s*)?(?:codeLenInByte|CodeLen)\s*[=:]\s*(\d+)").ok());

/// `; /work/kernels/add.cl:14` (also Windows drive paths)
pub(crate) static SOURCE_MARKER: Pattern =
    Lazy::new(|| Regex::new(r"^;\s*(\S*[./\\]\S*):(\d+)\s*$").ok());

/// Label-only line, optionally followed by a comment
pub(crate) static LABEL: Pattern =
    Lazy::new(|| Regex::new(r"^([A-Za-z_.$][\w.$@]*):\s*(?:(?:;|//).*)?$").ok());

pub(crate) static BRANCH_LABEL: Pattern = Lazy::new(|| {
    Regex::new(r"^(?:label_[0-9A-Fa-f]+|\.?L?BB\d+_\d+|_?L\d+|\.L[\w.$]+)$").ok()
});

/// `0x000100  s_nop 0` or `000000000100: s_nop 0`
pub(crate) static ADDRESS_PREFIX: Pattern =
    Lazy::new(|| Regex::new(r"^(?:0x([0-9A-Fa-f]+)|([0-9A-Fa-f]{6,16})):?\s+").ok());

pub(crate) static MNEMONIC: Pattern =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_.]*$").ok());

/// SCPC annotation tail: `000000000130: D1190201 00000100`
pub(crate) static SCPC_ANNOTATION: Pattern = Lazy::new(|| {
    Regex::new(r"^\s*([0-9A-Fa-f]{4,16})\s*:\s*([0-9A-Fa-f]{8})(?:\s+([0-9A-Fa-f]{8}))?\s*$").ok()
});

/// LLPC annotation tail: `68000002` or `D1190201 00000100`
pub(crate) static LLPC_ANNOTATION: Pattern =
    Lazy::new(|| Regex::new(r"^\s*([0-9A-Fa-f]{8})(?:\s+([0-9A-Fa-f]{8}))?\s*$").ok());

pub(crate) fn captures<'t>(pattern: &Pattern, text: &'t str) -> Option<Captures<'t>> {
    let compiled: &Option<Regex> = pattern;
    compiled.as_ref().and_then(|re| re.captures(text))
}

pub(crate) fn matches(pattern: &Pattern, text: &str) -> bool {
    let compiled: &Option<Regex> = pattern;
    compiled.as_ref().is_some_and(|re| re.is_match(text))
}
