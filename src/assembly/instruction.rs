//! Decoded CIL instruction representation.
//!
//! A method body decodes into an offset-ordered `Vec<Instruction>` that acts
//! as the instruction arena: previous/next neighbours are the adjacent vector
//! slots, and branch operands reference other instructions by index into the
//! same vector. Raw branch displacements only exist while the decoder runs;
//! by the time a stream reaches a caller every target is either an index or
//! the explicit `Missing` marker.

use crate::{
    assembly::instructions::OpCode,
    metadata::{
        members::ParamRc,
        method::LocalVariableRc,
        provider::{CilMember, SignatureRc},
    },
};

/// A branch or switch target.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum BranchTarget {
    /// Absolute byte offset, only present while decoding is in progress
    Offset(i64),
    /// Index of the target instruction within the decoded stream
    Index(usize),
    /// The computed offset lies outside the instruction stream
    Missing,
}

/// A decoded instruction operand.
pub enum Operand {
    /// No operand
    None,
    /// Branch target
    Target(BranchTarget),
    /// Jump table targets, in encoding order
    Switch(Vec<BranchTarget>),
    /// Resolved user string
    String(String),
    /// Resolved type, method or field
    Member(CilMember),
    /// Resolved stand-alone signature
    Signature(SignatureRc),
    /// Local variable slot
    Local(LocalVariableRc),
    /// Method parameter
    Argument(ParamRc),
    /// Signed 8-bit immediate (`ldc.i4.s`)
    Int8(i8),
    /// Unsigned 8-bit immediate (`unaligned.`)
    UInt8(u8),
    /// Signed 32-bit immediate
    Int32(i32),
    /// Signed 64-bit immediate
    Int64(i64),
    /// 32-bit float immediate
    Float32(f32),
    /// 64-bit float immediate
    Float64(f64),
}

/// One decoded CIL instruction.
pub struct Instruction {
    /// Byte offset within the IL stream; doubles as the stable `IL_xxxx` label
    pub offset: u32,
    /// Total encoded size in bytes, opcode and operand included
    pub size: u32,
    /// The opcode descriptor
    pub opcode: &'static OpCode,
    /// The decoded operand
    pub operand: Operand,
}

impl Instruction {
    /// True if this instruction carries an operand
    #[must_use]
    pub fn has_operand(&self) -> bool {
        !matches!(self.operand, Operand::None)
    }
}

/// Binary search for the instruction at exactly `offset`.
///
/// The stream is offset-ordered by construction, so mapping an `IL_xxxx`
/// label back to its instruction is a plain binary search.
#[must_use]
pub fn find_instruction(instructions: &[Instruction], offset: u32) -> Option<usize> {
    instructions
        .binary_search_by_key(&offset, |instruction| instruction.offset)
        .ok()
}
