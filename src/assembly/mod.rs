//! CIL instruction processing based on ECMA-335.
//!
//! This module turns raw method-body bytes into typed instruction sequences:
//! the static opcode descriptor tables, the decoded [`Instruction`] model,
//! and the two-phase decoder that resolves metadata tokens and branch
//! targets.

mod decoder;
mod instruction;
mod instructions;

pub use decoder::decode_method;
pub use instruction::{find_instruction, BranchTarget, Instruction, Operand};
pub use instructions::{OpCode, OpCodeCategory, OperandKind, INSTRUCTIONS, INSTRUCTIONS_FE};
