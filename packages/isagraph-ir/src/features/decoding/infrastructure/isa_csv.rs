//! Parsed-ISA CSV rows
//!
//! Columns: address, source line (optional), opcode, quoted operands,
//! functional unit, binary encoding.

use crate::features::decoding::domain::Instruction;
use serde::Serialize;

const HEADER: &str = "Address, Opcode, Operands, Functional Unit, Binary Encoding";
const HEADER_WITH_LINES: &str =
    "Address, Source Line Number, Opcode, Operands, Functional Unit, Binary Encoding";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IsaCsvRow {
    pub address: Option<u64>,
    pub source_line: Option<u32>,
    pub opcode: String,
    pub operands: String,
    pub functional_unit: String,
    pub encoding: String,
}

impl IsaCsvRow {
    pub fn from_instruction(instruction: &Instruction) -> Self {
        let operands = if instruction.is_unknown() {
            // undecoded: keep the operand tail as written
            let raw = &instruction.raw_text;
            raw.to_ascii_lowercase()
                .find(instruction.mnemonic.as_str())
                .map(|at| strip_annotation(raw[at + instruction.mnemonic.len()..].trim()).to_string())
                .unwrap_or_default()
        } else {
            instruction.operand_text()
        };

        Self {
            address: instruction.offset,
            source_line: instruction.source_line_index,
            opcode: instruction.mnemonic.clone(),
            operands,
            functional_unit: instruction.functional_unit.to_string(),
            encoding: instruction
                .encoding
                .map(|e| e.to_string())
                .unwrap_or_default(),
        }
    }

    fn render(&self, with_lines: bool) -> String {
        let address = self
            .address
            .map(|a| format!("{a}"))
            .unwrap_or_default();
        let mut fields = vec![address];
        if with_lines {
            fields.push(self.source_line.map(|l| l.to_string()).unwrap_or_default());
        }
        fields.push(self.opcode.clone());
        fields.push(format!("\"{}\"", self.operands.replace('"', "\"\"")));
        fields.push(self.functional_unit.clone());
        fields.push(self.encoding.clone());
        fields.join(",")
    }
}

fn strip_annotation(operands: &str) -> &str {
    let end = [operands.find("//"), operands.find(';')]
        .into_iter()
        .flatten()
        .min()
        .unwrap_or(operands.len());
    operands[..end].trim_end()
}

/// CSV text for a kernel's instructions, header included
pub fn isa_csv<'a>(
    instructions: impl IntoIterator<Item = &'a Instruction>,
    with_source_lines: bool,
) -> String {
    let mut out = String::from(if with_source_lines {
        HEADER_WITH_LINES
    } else {
        HEADER
    });
    out.push('\n');
    for instruction in instructions {
        out.push_str(&IsaCsvRow::from_instruction(instruction).render(with_source_lines));
        out.push('\n');
    }
    out
}
