//! Typed operands
//!
//! `Display` renders the canonical disassembly spelling, so a decoded
//! operand list can be printed back and parsed again to the same values.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RegisterClass {
    /// `s0`, `s[0:3]`
    Scalar,
    /// `v0`, `v[0:1]`
    Vector,
    /// `a0`, `a[0:3]` (accumulation registers)
    Accumulator,
    /// `ttmp0`, `ttmp[4:7]` (trap temporaries)
    TrapTemp,
}

impl RegisterClass {
    pub fn prefix(&self) -> &'static str {
        match self {
            RegisterClass::Scalar => "s",
            RegisterClass::Vector => "v",
            RegisterClass::Accumulator => "a",
            RegisterClass::TrapTemp => "ttmp",
        }
    }

    pub fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "s" => Some(RegisterClass::Scalar),
            "v" => Some(RegisterClass::Vector),
            "a" => Some(RegisterClass::Accumulator),
            "ttmp" => Some(RegisterClass::TrapTemp),
            _ => None,
        }
    }
}

/// A register or contiguous register range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Register {
    pub class: RegisterClass,
    pub index: u16,
    /// Number of consecutive registers (1 for a single register)
    pub count: u16,
}

impl Register {
    pub fn single(class: RegisterClass, index: u16) -> Self {
        Self {
            class,
            index,
            count: 1,
        }
    }

    /// `first..=last`; `None` when the range is inverted or holds more
    /// registers than `count` can represent
    pub fn range(class: RegisterClass, first: u16, last: u16) -> Option<Self> {
        if first > last {
            return None;
        }
        let count = u16::try_from(u32::from(last) - u32::from(first) + 1).ok()?;
        Some(Self {
            class,
            index: first,
            count,
        })
    }

    pub fn scalar(index: u16) -> Self {
        Self::single(RegisterClass::Scalar, index)
    }

    pub fn vector(index: u16) -> Self {
        Self::single(RegisterClass::Vector, index)
    }

    pub fn last_index(&self) -> u16 {
        self.index + self.count.saturating_sub(1)
    }

    pub fn is_vector(&self) -> bool {
        matches!(
            self.class,
            RegisterClass::Vector | RegisterClass::Accumulator
        )
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self.class, RegisterClass::Scalar | RegisterClass::TrapTemp)
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.count == 1 {
            write!(f, "{}{}", self.class.prefix(), self.index)
        } else {
            write!(
                f,
                "{}[{}:{}]",
                self.class.prefix(),
                self.index,
                self.last_index()
            )
        }
    }
}

/// Named hardware registers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpecialRegister {
    Vcc,
    VccLo,
    VccHi,
    Exec,
    ExecLo,
    ExecHi,
    Scc,
    Vccz,
    Execz,
    M0,
    Null,
    FlatScratch,
    FlatScratchLo,
    FlatScratchHi,
    XnackMask,
    Tba,
    Tma,
    LdsDirect,
    SharedBase,
    SharedLimit,
    PrivateBase,
    PrivateLimit,
    PopsExitingWaveId,
}

const SPECIAL_REGISTERS: &[(&str, SpecialRegister)] = &[
    ("vcc", SpecialRegister::Vcc),
    ("vcc_lo", SpecialRegister::VccLo),
    ("vcc_hi", SpecialRegister::VccHi),
    ("exec", SpecialRegister::Exec),
    ("exec_lo", SpecialRegister::ExecLo),
    ("exec_hi", SpecialRegister::ExecHi),
    ("scc", SpecialRegister::Scc),
    ("vccz", SpecialRegister::Vccz),
    ("execz", SpecialRegister::Execz),
    ("m0", SpecialRegister::M0),
    ("null", SpecialRegister::Null),
    ("flat_scratch", SpecialRegister::FlatScratch),
    ("flat_scratch_lo", SpecialRegister::FlatScratchLo),
    ("flat_scratch_hi", SpecialRegister::FlatScratchHi),
    ("xnack_mask", SpecialRegister::XnackMask),
    ("tba", SpecialRegister::Tba),
    ("tma", SpecialRegister::Tma),
    ("lds_direct", SpecialRegister::LdsDirect),
    ("src_shared_base", SpecialRegister::SharedBase),
    ("src_shared_limit", SpecialRegister::SharedLimit),
    ("src_private_base", SpecialRegister::PrivateBase),
    ("src_private_limit", SpecialRegister::PrivateLimit),
    ("src_pops_exiting_wave_id", SpecialRegister::PopsExitingWaveId),
];

impl SpecialRegister {
    pub fn from_name(name: &str) -> Option<Self> {
        SPECIAL_REGISTERS
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, r)| *r)
    }

    pub fn as_str(&self) -> &'static str {
        SPECIAL_REGISTERS
            .iter()
            .find(|(_, r)| r == self)
            .map_or("?", |(n, _)| n)
    }

    /// Registers that carry a lane mask or scalar condition
    pub fn is_condition(&self) -> bool {
        matches!(
            self,
            SpecialRegister::Vcc
                | SpecialRegister::VccLo
                | SpecialRegister::VccHi
                | SpecialRegister::Exec
                | SpecialRegister::ExecLo
                | SpecialRegister::ExecHi
                | SpecialRegister::Scc
        )
    }
}

/// How an integer literal was written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Radix {
    Decimal,
    Hexadecimal,
}

/// Numeric literal
///
/// Integers are exact. Float literals keep the IEEE-754 single-precision
/// bit pattern; equality compares bits so NaN payloads compare equal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum Immediate {
    Integer { value: i64, radix: Radix },
    Float { bits: u32, value: f32 },
}

impl Immediate {
    pub fn integer(value: i64) -> Self {
        Immediate::Integer {
            value,
            radix: Radix::Decimal,
        }
    }

    pub fn hex(value: i64) -> Self {
        Immediate::Integer {
            value,
            radix: Radix::Hexadecimal,
        }
    }

    pub fn float(value: f32) -> Self {
        Immediate::Float {
            bits: value.to_bits(),
            value,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Immediate::Integer { value, .. } => Some(*value),
            Immediate::Float { .. } => None,
        }
    }
}

impl PartialEq for Immediate {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                Immediate::Integer { value: a, radix: ra },
                Immediate::Integer { value: b, radix: rb },
            ) => a == b && ra == rb,
            (Immediate::Float { bits: a, .. }, Immediate::Float { bits: b, .. }) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Immediate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Immediate::Integer {
                value,
                radix: Radix::Decimal,
            } => write!(f, "{}", value),
            Immediate::Integer {
                value,
                radix: Radix::Hexadecimal,
            } => {
                if *value < 0 {
                    write!(f, "-0x{:x}", value.unsigned_abs())
                } else {
                    write!(f, "0x{:x}", value)
                }
            }
            // `{:?}` always prints a fractional part, which keeps the
            // literal recognisable as a float when parsed again.
            Immediate::Float { value, .. } => write!(f, "{:?}", value),
        }
    }
}

/// Source operand modifiers written around the operand
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OperandModifiers {
    pub negate: bool,
    pub absolute: bool,
    pub sign_extend: bool,
}

/// One positional operand
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Operand {
    Register(Register),
    Special(SpecialRegister),
    Immediate(Immediate),
    /// `-v1`, `|v2|`, `-|v3|`, `neg(v1)`, `sext(v0)`
    Modified {
        operand: Box<Operand>,
        modifiers: OperandModifiers,
    },
    /// `[v4, v5, v6]` address list of non-sequential image addressing
    List(Vec<Operand>),
    /// `hwreg(HW_REG_MODE, 0, 4)`
    HardwareRegister(String),
    /// `off` placeholder for an absent address or export source
    Off,
    /// Any other bare word: branch labels, export targets, interpolation
    /// attributes, relocation symbols
    Symbol(String),
}

impl Operand {
    pub fn as_register(&self) -> Option<&Register> {
        match self {
            Operand::Register(reg) => Some(reg),
            _ => None,
        }
    }

    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Operand::Symbol(name) => Some(name),
            _ => None,
        }
    }

    pub fn as_immediate(&self) -> Option<&Immediate> {
        match self {
            Operand::Immediate(imm) => Some(imm),
            _ => None,
        }
    }

    pub fn is_vector_register(&self) -> bool {
        self.as_register().is_some_and(Register::is_vector)
    }

    pub fn is_scalar_register(&self) -> bool {
        self.as_register().is_some_and(Register::is_scalar)
    }

    /// Registers and named registers: anything that can be written
    pub fn is_writable(&self) -> bool {
        matches!(self, Operand::Register(_) | Operand::Special(_))
    }

    /// Anything that can be read as a value
    pub fn is_value(&self) -> bool {
        matches!(
            self,
            Operand::Register(_)
                | Operand::Special(_)
                | Operand::Immediate(_)
                | Operand::Modified { .. }
                | Operand::Symbol(_)
        )
    }

    /// Scalar registers, trap temporaries and named scalar registers
    pub fn is_scalar_like(&self) -> bool {
        match self {
            Operand::Register(reg) => reg.is_scalar(),
            Operand::Special(_) => true,
            _ => false,
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Register(reg) => write!(f, "{}", reg),
            Operand::Special(reg) => f.write_str(reg.as_str()),
            Operand::Immediate(imm) => write!(f, "{}", imm),
            Operand::Modified {
                operand,
                modifiers,
            } => {
                let mut inner = operand.to_string();
                if modifiers.sign_extend {
                    inner = format!("sext({})", inner);
                }
                if modifiers.absolute {
                    inner = format!("|{}|", inner);
                }
                if modifiers.negate {
                    inner = format!("-{}", inner);
                }
                f.write_str(&inner)
            }
            Operand::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            Operand::HardwareRegister(args) => write!(f, "hwreg({})", args),
            Operand::Off => f.write_str("off"),
            Operand::Symbol(name) => f.write_str(name),
        }
    }
}

/// Trailing keyword such as `glc`, `offset:16`, `vmcnt(0)` or
/// `quad_perm:[0,1,2,3]`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Modifier {
    pub name: String,
    pub value: Option<String>,
    /// `name(value)` rather than `name:value`
    pub call_syntax: bool,
}

impl Modifier {
    pub fn flag(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
            call_syntax: false,
        }
    }

    pub fn keyed(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
            call_syntax: false,
        }
    }

    pub fn call(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
            call_syntax: true,
        }
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.value, self.call_syntax) {
            (None, _) => f.write_str(&self.name),
            (Some(value), true) => write!(f, "{}({})", self.name, value),
            (Some(value), false) => write!(f, "{}:{}", self.name, value),
        }
    }
}

/// Operand text split into positional operands and trailing modifiers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OperandList {
    pub operands: Vec<Operand>,
    pub modifiers: Vec<Modifier>,
}

impl OperandList {
    pub fn len(&self) -> usize {
        self.operands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operands.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&Operand> {
        self.operands.get(position)
    }

    pub fn modifier(&self, name: &str) -> Option<&Modifier> {
        self.modifiers.iter().find(|m| m.name == name)
    }

    pub fn has_modifier(&self, name: &str) -> bool {
        self.modifier(name).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_display() {
        assert_eq!(Register::scalar(0).to_string(), "s0");
        assert_eq!(
            Register::range(RegisterClass::Scalar, 4, 7).unwrap().to_string(),
            "s[4:7]"
        );
        assert_eq!(
            Register::range(RegisterClass::TrapTemp, 0, 1).unwrap().to_string(),
            "ttmp[0:1]"
        );
        assert!(Register::range(RegisterClass::Vector, 3, 1).is_none());
    }

    #[test]
    fn test_float_immediate_keeps_bits() {
        let one = Immediate::float(1.0);
        assert_eq!(one, Immediate::Float { bits: 0x3f80_0000, value: 1.0 });
        assert_eq!(one.to_string(), "1.0");
        assert_eq!(Immediate::float(f32::NAN), Immediate::float(f32::NAN));
    }

    #[test]
    fn test_hex_immediate_display() {
        assert_eq!(Immediate::hex(4).to_string(), "0x4");
        assert_eq!(Immediate::hex(-16).to_string(), "-0x10");
        assert_ne!(Immediate::hex(4), Immediate::integer(4));
    }

    #[test]
    fn test_modified_operand_display() {
        let op = Operand::Modified {
            operand: Box::new(Operand::Register(Register::vector(3))),
            modifiers: OperandModifiers {
                negate: true,
                absolute: true,
                sign_extend: false,
            },
        };
        assert_eq!(op.to_string(), "-|v3|");
    }

    #[test]
    fn test_special_register_names_round_trip() {
        for (name, reg) in SPECIAL_REGISTERS {
            assert_eq!(SpecialRegister::from_name(name), Some(*reg));
            assert_eq!(reg.as_str(), *name);
        }
    }
}
