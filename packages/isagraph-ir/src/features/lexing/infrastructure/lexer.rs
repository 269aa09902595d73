//! Line lexer
//!
//! Classification order matters: statistics and debug markers are comment
//! lines too, and labels must be recognised before the address prefix is
//! stripped.

use super::patterns::{self, captures, matches};
use crate::config::LexerConfig;
use crate::features::lexing::domain::{
    EncodingAnnotation, IsaStatistic, LabelKind, LexError, LexedInstruction, LexedLine, Trivia,
};

#[derive(Debug, Clone, Default)]
pub struct IsaLexer {
    config: LexerConfig,
}

impl IsaLexer {
    pub fn new(config: LexerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LexerConfig {
        &self.config
    }

    /// Lex one line; `line_number` is 1-based and only used for errors
    pub fn lex_line<'a>(&self, line: &'a str, line_number: u32) -> Result<LexedLine<'a>, LexError> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Ok(LexedLine::NotAnInstruction(Trivia::Blank));
        }

        if let Some(trivia) = lex_comment_like(trimmed) {
            return Ok(LexedLine::NotAnInstruction(trivia));
        }

        if let Some(caps) = captures(&patterns::LABEL, trimmed) {
            let name = caps.get(1).map_or("", |m| m.as_str());
            let kind = if matches(&patterns::BRANCH_LABEL, name) {
                LabelKind::BranchTarget
            } else {
                LabelKind::KernelEntry
            };
            return Ok(LexedLine::NotAnInstruction(Trivia::Label { name, kind }));
        }

        let (address, body) = strip_address_prefix(trimmed);

        if body.starts_with('.') {
            return Ok(LexedLine::NotAnInstruction(Trivia::Directive(body)));
        }

        let (mnemonic, tail) = match body.find(char::is_whitespace) {
            Some(split) => (&body[..split], body[split..].trim_start()),
            None => (body, ""),
        };

        if !matches(&patterns::MNEMONIC, mnemonic) {
            return Err(LexError::new(
                line,
                line_number,
                format!("mnemonic '{}' contains disallowed characters", mnemonic),
            ));
        }

        let (operand_text, annotation) = self.split_annotation(tail);
        let (annotated_offset, encoding) = match annotation {
            Some((offset, encoding)) => (offset, Some(encoding)),
            None => (None, None),
        };

        Ok(LexedLine::Instruction(LexedInstruction {
            mnemonic,
            operand_text,
            offset: annotated_offset.or(address),
            encoding,
        }))
    }

    /// Split the operand text from a trailing comment and parse the comment
    /// as an encoding annotation when it has that shape.
    fn split_annotation<'a>(
        &self,
        tail: &'a str,
    ) -> (&'a str, Option<(Option<u64>, EncodingAnnotation)>) {
        if let Some(pos) = tail.find("//") {
            let operands = tail[..pos].trim_end();
            let annotation = captures(&patterns::SCPC_ANNOTATION, &tail[pos + 2..]).and_then(|c| {
                let offset = u64::from_str_radix(&c[1], 16).ok()?;
                let encoding = encoding_from(c.get(2)?.as_str(), c.get(3).map(|m| m.as_str()))?;
                Some((Some(offset), encoding))
            });
            return (operands, annotation);
        }

        if let Some(pos) = tail.find(';') {
            let operands = tail[..pos].trim_end();
            if !self.config.accept_llpc_annotations {
                return (operands, None);
            }
            let annotation = captures(&patterns::LLPC_ANNOTATION, &tail[pos + 1..]).and_then(|c| {
                let encoding = encoding_from(c.get(1)?.as_str(), c.get(2).map(|m| m.as_str()))?;
                Some((None, encoding))
            });
            return (operands, annotation);
        }

        (tail.trim_end(), None)
    }
}

fn encoding_from(low: &str, high: Option<&str>) -> Option<EncodingAnnotation> {
    let low = u32::from_str_radix(low, 16).ok()?;
    let high = match high {
        Some(word) => Some(u32::from_str_radix(word, 16).ok()?),
        None => None,
    };
    Some(EncodingAnnotation { low, high })
}

/// Section markers, statistics, debug markers and plain comments
fn lex_comment_like(trimmed: &str) -> Option<Trivia<'_>> {
    if matches(&patterns::SECTION_START, trimmed) {
        return Some(Trivia::SectionStart);
    }
    if matches(&patterns::SECTION_END, trimmed) {
        return Some(Trivia::SectionEnd);
    }
    if let Some(statistic) = lex_statistic(trimmed) {
        return Some(Trivia::Statistic(statistic));
    }
    if let Some(caps) = captures(&patterns::SOURCE_MARKER, trimmed) {
        if let (Some(path), Some(line)) = (caps.get(1), caps[2].parse::<u32>().ok()) {
            return Some(Trivia::SourceMarker {
                path: path.as_str(),
                line,
            });
        }
    }

    let text = trimmed
        .strip_prefix("//")
        .or_else(|| trimmed.strip_prefix(';'))
        .or_else(|| trimmed.strip_prefix('#'))?;
    Some(Trivia::Comment(text.trim()))
}

fn lex_statistic(trimmed: &str) -> Option<IsaStatistic> {
    if let Some(caps) = captures(&patterns::NUM_VGPRS, trimmed) {
        return caps[1].parse().ok().map(IsaStatistic::VectorRegisters);
    }
    if let Some(caps) = captures(&patterns::NUM_SGPRS, trimmed) {
        let reported = caps[1].parse().ok()?;
        let runtime_override = caps.get(2).and_then(|m| m.as_str().parse().ok());
        return Some(IsaStatistic::ScalarRegisters {
            reported,
            runtime_override,
        });
    }
    if let Some(caps) = captures(&patterns::CODE_LENGTH, trimmed) {
        return caps[1].parse().ok().map(IsaStatistic::CodeLength);
    }
    None
}

fn strip_address_prefix(trimmed: &str) -> (Option<u64>, &str) {
    match captures(&patterns::ADDRESS_PREFIX, trimmed) {
        Some(caps) => {
            let digits = caps.get(1).or_else(|| caps.get(2)).map_or("", |m| m.as_str());
            let end = caps.get(0).map_or(0, |m| m.end());
            (u64::from_str_radix(digits, 16).ok(), &trimmed[end..])
        }
        None => (None, trimmed),
    }
}
