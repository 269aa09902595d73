//! Decode listing use case
//!
//! Lexes and decodes a whole disassembly text into one ordered instruction
//! stream, keeping labels and debug markers as positions in that stream.

use crate::features::decoding::domain::Instruction;
use crate::features::decoding::ports::InstructionDecoder;
use crate::features::lexing::{
    IsaLexer, IsaStatistic, LabelKind, LexedInstruction, LexedLine, Trivia,
};
use crate::shared::models::{Diagnostic, DiagnosticLog};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A label line, positioned before the instruction it names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelMarker {
    pub name: String,
    pub kind: LabelKind,
    /// Index of the next instruction in the stream
    pub instruction_index: usize,
    pub line_number: u32,
}

/// `; <path>:<line>` marker plus the source text comment that follows it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceMarker {
    pub instruction_index: usize,
    pub path: String,
    pub line: u32,
    pub text: Option<String>,
    pub line_number: u32,
}

/// Statistics block of the listing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IsaStatistics {
    pub vector_registers: Option<u32>,
    pub scalar_registers_reported: Option<u32>,
    /// `modified by runtime to be N`
    pub scalar_registers_runtime: Option<u32>,
    pub code_length_bytes: Option<u32>,
    /// Sum of annotated encoding sizes
    pub encoded_size_bytes: u64,
}

impl IsaStatistics {
    /// Scalar register count after the runtime override
    pub fn scalar_registers(&self) -> Option<u32> {
        self.scalar_registers_runtime
            .or(self.scalar_registers_reported)
    }

    /// Reported code length, else the size implied by encoding annotations
    pub fn isa_size_bytes(&self) -> Option<u64> {
        match self.code_length_bytes {
            Some(len) => Some(u64::from(len)),
            None if self.encoded_size_bytes > 0 => Some(self.encoded_size_bytes),
            None => None,
        }
    }

    fn record(&mut self, statistic: IsaStatistic) {
        match statistic {
            IsaStatistic::VectorRegisters(n) => self.vector_registers = Some(n),
            IsaStatistic::ScalarRegisters {
                reported,
                runtime_override,
            } => {
                self.scalar_registers_reported = Some(reported);
                self.scalar_registers_runtime = runtime_override;
            }
            IsaStatistic::CodeLength(n) => self.code_length_bytes = Some(n),
        }
    }
}

/// Every instruction of one disassembly file, in order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DisassemblyListing {
    pub instructions: Vec<Instruction>,
    pub labels: Vec<LabelMarker>,
    pub source_markers: Vec<SourceMarker>,
    pub statistics: IsaStatistics,
    pub diagnostics: DiagnosticLog,
}

impl DisassemblyListing {
    pub fn kernel_labels(&self) -> impl Iterator<Item = &LabelMarker> {
        self.labels
            .iter()
            .filter(|l| l.kind == LabelKind::KernelEntry)
    }

    pub fn branch_labels(&self) -> impl Iterator<Item = &LabelMarker> {
        self.labels
            .iter()
            .filter(|l| l.kind == LabelKind::BranchTarget)
    }
}

pub struct DecodeListingUseCase<D: InstructionDecoder> {
    lexer: IsaLexer,
    decoder: D,
}

impl<D: InstructionDecoder> DecodeListingUseCase<D> {
    pub fn new(lexer: IsaLexer, decoder: D) -> Self {
        Self { lexer, decoder }
    }

    pub fn execute(&self, text: &str) -> DisassemblyListing {
        let mut listing = DisassemblyListing::default();

        let lexed: Vec<(u32, &str, Option<LexedLine<'_>>)> = text
            .lines()
            .zip(1u32..)
            .map(|(line, number)| match self.lexer.lex_line(line, number) {
                Ok(lexed) => (number, line, Some(lexed)),
                Err(err) => {
                    listing
                        .diagnostics
                        .push(Diagnostic::lex(err.to_string()).with_line(number));
                    (number, line, None)
                }
            })
            .collect();

        let has_section = self.lexer.config().honor_section_markers
            && lexed.iter().any(|(_, _, l)| {
                matches!(l, Some(LexedLine::NotAnInstruction(Trivia::SectionStart)))
            });
        let mut in_code = !has_section;
        let mut pending_marker: Option<usize> = None;

        for (number, raw, line) in lexed {
            let Some(line) = line else {
                pending_marker = None;
                continue;
            };
            let marker = pending_marker.take();

            match line {
                LexedLine::Instruction(inst) => {
                    if !in_code {
                        continue;
                    }
                    let instruction = self.decode_one(&inst, raw, number, &mut listing.diagnostics);
                    if let Some(encoding) = instruction.encoding {
                        listing.statistics.encoded_size_bytes += u64::from(encoding.size_bytes());
                    }
                    listing.instructions.push(instruction);
                }
                LexedLine::NotAnInstruction(trivia) => match trivia {
                    Trivia::SectionStart => in_code = true,
                    Trivia::SectionEnd if has_section => in_code = false,
                    Trivia::Statistic(statistic) => listing.statistics.record(statistic),
                    Trivia::Label { name, kind } if in_code => listing.labels.push(LabelMarker {
                        name: name.to_string(),
                        kind,
                        instruction_index: listing.instructions.len(),
                        line_number: number,
                    }),
                    Trivia::SourceMarker { path, line } if in_code => {
                        listing.source_markers.push(SourceMarker {
                            instruction_index: listing.instructions.len(),
                            path: path.to_string(),
                            line,
                            text: None,
                            line_number: number,
                        });
                        pending_marker = Some(listing.source_markers.len() - 1);
                    }
                    Trivia::Comment(comment) => {
                        if let Some(index) = marker {
                            if let Some(source) = listing.source_markers.get_mut(index) {
                                source.text = Some(comment.trim().to_string());
                            }
                        }
                    }
                    _ => {}
                },
            }
        }

        debug!(
            instructions = listing.instructions.len(),
            labels = listing.labels.len(),
            source_markers = listing.source_markers.len(),
            diagnostics = listing.diagnostics.len(),
            "decoded disassembly listing"
        );
        listing
    }

    fn decode_one(
        &self,
        lexed: &LexedInstruction<'_>,
        raw: &str,
        number: u32,
        diagnostics: &mut DiagnosticLog,
    ) -> Instruction {
        match self.decoder.decode(lexed, raw, number) {
            Ok(instruction) => {
                if instruction.is_unknown() {
                    diagnostics.push(
                        Diagnostic::unknown_instruction(format!(
                            "unrecognised mnemonic '{}'",
                            instruction.mnemonic
                        ))
                        .with_line(number),
                    );
                }
                instruction
            }
            Err(err) => {
                diagnostics.push(Diagnostic::decode(err.to_string()).with_line(number));
                let mut instruction =
                    Instruction::unknown(lexed.mnemonic.to_ascii_lowercase(), raw, number);
                instruction.offset = lexed.offset;
                instruction.encoding = lexed.encoding;
                instruction.malformed = true;
                instruction
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LexerConfig;
    use crate::features::decoding::domain::InstructionFormat;
    use crate::features::decoding::infrastructure::IsaDispatcher;
    use crate::shared::models::DiagnosticKind;

    fn use_case() -> DecodeListingUseCase<IsaDispatcher> {
        DecodeListingUseCase::new(IsaLexer::new(LexerConfig::default()), IsaDispatcher)
    }

    const LISTING: &str = "\
NumVgprs = 4
NumSgprs = 10 ; modified by runtime to be 12;
; -------- Disassembly --------
main:
  s_mov_b32 s0, 0x4                // 000000000000: BE800084
; /work/add.cl:14
; c[i] = a[i] + b[i];
  v_add_f32 v0, v1, v2             // 000000000004: 02000501
label_0008:
  s_frobnicate s1                  // 000000000008: BE810080
  s_add_u32 s0, s1                 // 00000000000C: 80000001
  s_endpgm                         // 000000000010: BF810000
; ----------------- CS Data ------------------------
  s_nop 0
";

    #[test]
    fn test_listing_positions_and_statistics() {
        let listing = use_case().execute(LISTING);
        assert_eq!(listing.instructions.len(), 5);
        assert_eq!(listing.instructions[0].format(), InstructionFormat::ScalarImmediate);

        let labels: Vec<_> = listing.labels.iter().map(|l| (l.name.as_str(), l.instruction_index)).collect();
        assert_eq!(labels, vec![("main", 0), ("label_0008", 2)]);
        assert_eq!(listing.kernel_labels().count(), 1);

        assert_eq!(listing.source_markers.len(), 1);
        let marker = &listing.source_markers[0];
        assert_eq!(marker.instruction_index, 1);
        assert_eq!(marker.line, 14);
        assert_eq!(marker.text.as_deref(), Some("c[i] = a[i] + b[i];"));

        assert_eq!(listing.statistics.vector_registers, Some(4));
        assert_eq!(listing.statistics.scalar_registers(), Some(12));
        assert_eq!(listing.statistics.isa_size_bytes(), Some(20));
    }

    #[test]
    fn test_unknown_and_malformed_lines_are_kept() {
        let listing = use_case().execute(LISTING);
        assert!(listing.instructions[2].is_unknown());
        assert!(!listing.instructions[2].malformed);
        assert!(listing.instructions[3].is_unknown());
        assert!(listing.instructions[3].malformed);
        assert_eq!(listing.diagnostics.count(DiagnosticKind::UnknownInstruction), 1);
        assert_eq!(listing.diagnostics.count(DiagnosticKind::DecodeError), 1);
        assert_eq!(listing.diagnostics.of_kind(DiagnosticKind::DecodeError).next().unwrap().line, Some(11));
    }

    #[test]
    fn test_listing_without_section_marker() {
        let listing = use_case().execute("s_nop 0\ns_endpgm\n");
        assert_eq!(listing.instructions.len(), 2);
        assert_eq!(listing.statistics.isa_size_bytes(), None);
    }

    #[test]
    fn test_bad_mnemonic_is_a_lex_error() {
        let listing = use_case().execute("s_nop 0\n  v_add#f32 v0, v1\ns_endpgm\n");
        assert_eq!(listing.instructions.len(), 2);
        assert_eq!(listing.diagnostics.count(DiagnosticKind::LexError), 1);
    }
}
