//! Operand text parser
//!
//! Splits the operand tail into top-level tokens (commas and whitespace
//! separate; brackets, parentheses and `|..|` group) and classifies each
//! token as a positional operand or a trailing modifier.

use crate::features::decoding::domain::{
    Immediate, Modifier, Operand, OperandList, OperandModifiers, Register, RegisterClass,
    SpecialRegister,
};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid operand '{token}': {reason}")]
pub struct OperandSyntaxError {
    pub token: String,
    pub reason: String,
}

impl OperandSyntaxError {
    fn new(token: &str, reason: impl Into<String>) -> Self {
        Self {
            token: token.to_string(),
            reason: reason.into(),
        }
    }
}

type ParseResult<T> = Result<T, OperandSyntaxError>;

/// Bare words that are modifiers rather than operands
const FLAG_MODIFIERS: &[&str] = &[
    "glc", "slc", "dlc", "nt", "sc0", "sc1", "offen", "idxen", "addr64", "lds", "tfe", "lwe",
    "unorm", "da", "r128", "r128_b16", "d16", "gds", "done", "vm", "compr", "row_en",
    "clamp", "high", "bound_ctrl", "fi", "nv", "noreturn",
];

/// Parse an operand tail such as `v1, off, s[4:7], 0 offen offset:16`
pub fn parse_operand_list(text: &str) -> ParseResult<OperandList> {
    let mut list = OperandList::default();
    for token in split_tokens(text)? {
        // `a16` is both an accumulator register and an image addressing
        // flag; the flag only ever follows a scalar resource descriptor.
        if token == "a16" && follows_resource(&list) {
            list.modifiers.push(Modifier::flag(token));
            continue;
        }
        match classify_token(token)? {
            Token::Operand(op) => list.operands.push(op),
            Token::Modifier(m) => list.modifiers.push(m),
        }
    }
    Ok(list)
}

/// Parse a single operand token
pub fn parse_operand(token: &str) -> ParseResult<Operand> {
    match classify_token(token)? {
        Token::Operand(op) => Ok(op),
        Token::Modifier(_) => Err(OperandSyntaxError::new(token, "modifier where an operand was expected")),
    }
}

fn follows_resource(list: &OperandList) -> bool {
    list.operands.iter().any(|op| {
        op.as_register()
            .is_some_and(|r| r.class == RegisterClass::Scalar && r.count >= 4)
    })
}

enum Token {
    Operand(Operand),
    Modifier(Modifier),
}

fn split_tokens(text: &str) -> ParseResult<Vec<&str>> {
    let mut tokens = Vec::new();
    let mut depth: i32 = 0;
    let mut in_abs = false;
    let mut start: Option<usize> = None;

    for (i, c) in text.char_indices() {
        let grouped = depth > 0 || in_abs;
        match c {
            ',' | ' ' | '\t' | '&' if !grouped => {
                if let Some(s) = start.take() {
                    tokens.push(&text[s..i]);
                }
            }
            '[' | '(' => {
                depth += 1;
                start.get_or_insert(i);
            }
            ']' | ')' => {
                depth -= 1;
                if depth < 0 {
                    return Err(OperandSyntaxError::new(text, "unbalanced closing bracket"));
                }
                start.get_or_insert(i);
            }
            '|' => {
                in_abs = !in_abs;
                start.get_or_insert(i);
            }
            _ => {
                start.get_or_insert(i);
            }
        }
    }

    if depth != 0 || in_abs {
        return Err(OperandSyntaxError::new(text, "unbalanced brackets"));
    }
    if let Some(s) = start {
        tokens.push(&text[s..]);
    }
    Ok(tokens)
}

fn classify_token(token: &str) -> ParseResult<Token> {
    if token == "off" {
        return Ok(Token::Operand(Operand::Off));
    }

    if let Some(inner) = token.strip_prefix('[').and_then(|t| t.strip_suffix(']')) {
        let items = split_tokens(inner)?
            .into_iter()
            .map(parse_operand)
            .collect::<ParseResult<Vec<_>>>()?;
        return Ok(Token::Operand(Operand::List(items)));
    }

    if let Some((name, value)) = split_keyed(token) {
        return Ok(Token::Modifier(Modifier::keyed(name, value)));
    }

    if let Some((name, args)) = split_call(token) {
        return classify_call(token, name, args);
    }

    if let Some(rest) = token.strip_prefix('-') {
        if let Some(imm) = parse_number(token)? {
            return Ok(Token::Operand(Operand::Immediate(imm)));
        }
        let inner = parse_operand(rest)?;
        return Ok(Token::Operand(with_modifier(inner, |m| m.negate = true)));
    }

    if let Some(inner) = token.strip_prefix('|').and_then(|t| t.strip_suffix('|')) {
        let inner = parse_operand(inner)?;
        return Ok(Token::Operand(with_modifier(inner, |m| m.absolute = true)));
    }

    if let Some(reg) = parse_register(token)? {
        return Ok(Token::Operand(Operand::Register(reg)));
    }

    if let Some(special) = SpecialRegister::from_name(token) {
        return Ok(Token::Operand(Operand::Special(special)));
    }

    if let Some(imm) = parse_number(token)? {
        return Ok(Token::Operand(Operand::Immediate(imm)));
    }

    if FLAG_MODIFIERS.contains(&token) {
        return Ok(Token::Modifier(Modifier::flag(token)));
    }

    if is_symbol(token) {
        return Ok(Token::Operand(Operand::Symbol(token.to_string())));
    }

    Err(OperandSyntaxError::new(token, "unrecognised operand syntax"))
}

fn classify_call(token: &str, name: &str, args: &str) -> ParseResult<Token> {
    let operand = match name {
        "neg" => with_modifier(parse_operand(args)?, |m| m.negate = true),
        "abs" => with_modifier(parse_operand(args)?, |m| m.absolute = true),
        "sext" => with_modifier(parse_operand(args)?, |m| m.sign_extend = true),
        "lit" => match parse_number(args)? {
            Some(imm) => Operand::Immediate(imm),
            None => return Err(OperandSyntaxError::new(token, "literal is not a number")),
        },
        "hwreg" => Operand::HardwareRegister(args.to_string()),
        _ => return Ok(Token::Modifier(Modifier::call(name, args))),
    };
    Ok(Token::Operand(operand))
}

/// Merge a source modifier into an operand, flattening nested wrappers
fn with_modifier(operand: Operand, apply: impl FnOnce(&mut OperandModifiers)) -> Operand {
    let (inner, mut modifiers) = match operand {
        Operand::Modified {
            operand,
            modifiers,
        } => (*operand, modifiers),
        other => (other, OperandModifiers::default()),
    };
    apply(&mut modifiers);
    Operand::Modified {
        operand: Box::new(inner),
        modifiers,
    }
}

/// `name:value` with the colon outside any bracket
fn split_keyed(token: &str) -> Option<(&str, &str)> {
    let colon = token.find(':')?;
    let name = &token[..colon];
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return None;
    }
    if !name.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return None;
    }
    Some((name, &token[colon + 1..]))
}

/// `name(args)`
fn split_call(token: &str) -> Option<(&str, &str)> {
    let open = token.find('(')?;
    let inner = token[open + 1..].strip_suffix(')')?;
    let name = &token[..open];
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return None;
    }
    Some((name, inner.trim()))
}

fn parse_register(token: &str) -> ParseResult<Option<Register>> {
    const PREFIXES: [(&str, RegisterClass); 4] = [
        ("ttmp", RegisterClass::TrapTemp),
        ("s", RegisterClass::Scalar),
        ("v", RegisterClass::Vector),
        ("a", RegisterClass::Accumulator),
    ];

    for (prefix, class) in PREFIXES {
        let Some(rest) = token.strip_prefix(prefix) else {
            continue;
        };

        if is_digits(rest) {
            let index = parse_index(token, rest)?;
            return Ok(Some(Register::single(class, index)));
        }

        if let Some(inner) = rest.strip_prefix('[').and_then(|r| r.strip_suffix(']')) {
            let (first, last) = match inner.split_once(':') {
                Some((first, last)) => (first.trim(), last.trim()),
                None => (inner.trim(), inner.trim()),
            };
            if !is_digits(first) || !is_digits(last) {
                return Err(OperandSyntaxError::new(token, "register range bounds must be numbers"));
            }
            let first = parse_index(token, first)?;
            let last = parse_index(token, last)?;
            if first > last {
                return Err(OperandSyntaxError::new(token, "inverted register range"));
            }
            return Register::range(class, first, last)
                .map(Some)
                .ok_or_else(|| OperandSyntaxError::new(token, "register range too long"));
        }
    }
    Ok(None)
}

fn parse_index(token: &str, digits: &str) -> ParseResult<u16> {
    digits
        .parse::<u16>()
        .map_err(|_| OperandSyntaxError::new(token, "register index out of range"))
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Hex, decimal (optionally negative) or float literal; `Ok(None)` when the
/// token is not numeric at all
fn parse_number(token: &str) -> ParseResult<Option<Immediate>> {
    let (negative, body) = match token.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, token),
    };

    if let Some(hex) = body.strip_prefix("0x").or_else(|| body.strip_prefix("0X")) {
        let value = u64::from_str_radix(hex, 16)
            .map_err(|_| OperandSyntaxError::new(token, "hex literal out of range"))?;
        let value = value as i64;
        return Ok(Some(Immediate::hex(if negative { value.wrapping_neg() } else { value })));
    }

    let starts_numeric = body.starts_with(|c: char| c.is_ascii_digit())
        || (body.starts_with('.') && body[1..].starts_with(|c: char| c.is_ascii_digit()));
    if !starts_numeric {
        return Ok(None);
    }

    if is_digits(body) {
        if let Ok(value) = token.parse::<i64>() {
            return Ok(Some(Immediate::integer(value)));
        }
        return match body.parse::<u64>() {
            Ok(value) if !negative => Ok(Some(Immediate::integer(value as i64))),
            _ => Err(OperandSyntaxError::new(token, "integer literal out of range")),
        };
    }

    match token.parse::<f32>() {
        Ok(value) => Ok(Some(Immediate::float(value))),
        Err(_) => Err(OperandSyntaxError::new(token, "malformed numeric literal")),
    }
}

fn is_symbol(token: &str) -> bool {
    let mut chars = token.chars();
    let first_ok = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || matches!(c, '_' | '.' | '$'));
    first_ok
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '$' | '@' | '+' | '-'))
}
