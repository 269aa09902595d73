mod instruction;
mod operand;

pub use instruction::{
    BranchTarget, ControlFlow, FunctionalUnit, Instruction, InstructionFormat, InstructionKind,
    MemoryAccess, VectorEncoding,
};
pub use operand::{
    Immediate, Modifier, Operand, OperandList, OperandModifiers, Radix, Register, RegisterClass,
    SpecialRegister,
};
