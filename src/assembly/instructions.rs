//! Static CIL opcode descriptor tables (ECMA-335 III).
//!
//! Two fixed-size lookup tables cover the whole instruction set: one-byte
//! encodings are indexed directly by their value, two-byte encodings (first
//! byte `0xFE`) are indexed by their second byte. Reserved and unassigned
//! encodings hold an empty-name placeholder; the decoder treats hitting one
//! as a malformed method body. The tables are built once at compile time and
//! never mutated.

/// The static schema of an opcode's inline argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandKind {
    /// No operand bytes follow the opcode
    None,
    /// Signed 8-bit branch displacement
    ShortBrTarget,
    /// Signed 32-bit branch displacement
    BrTarget,
    /// 8-bit immediate
    ShortInlineI,
    /// Signed 32-bit immediate
    InlineI,
    /// Signed 64-bit immediate
    InlineI8,
    /// 32-bit float immediate
    ShortInlineR,
    /// 64-bit float immediate
    InlineR,
    /// 16-bit local-variable or argument index
    InlineVar,
    /// 8-bit local-variable or argument index
    ShortInlineVar,
    /// User-string token
    InlineString,
    /// Jump table: count followed by that many displacements
    InlineSwitch,
    /// Stand-alone signature token
    InlineSig,
    /// Unrestricted metadata token
    InlineTok,
    /// Type token
    InlineType,
    /// Method token
    InlineMethod,
    /// Field token
    InlineField,
}

/// Coarse opcode classification.
///
/// Only the distinction that matters to the emitter is retained: the
/// invocation opcodes (`call`, `calli`, `callvirt`, `newobj`) prefix their
/// operand with `instance ` when the target method is non-static.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpCodeCategory {
    /// Everything else
    General,
    /// One of the four method-invocation opcodes
    Call,
}

/// An immutable CIL opcode descriptor.
#[derive(Debug, PartialEq, Eq)]
pub struct OpCode {
    /// The assembler mnemonic; empty for reserved encodings
    pub name: &'static str,
    /// The encoded value: `0x00`-`0xE0`, or `0xFExx` for two-byte opcodes
    pub value: u16,
    /// The operand schema
    pub operand: OperandKind,
    /// Size of the opcode encoding itself in bytes (1 or 2)
    pub len: u8,
    /// Coarse classification
    pub category: OpCodeCategory,
}

impl OpCode {
    /// True if this is one of `call`, `calli`, `callvirt`, `newobj`
    #[must_use]
    pub fn is_invocation(&self) -> bool {
        self.category == OpCodeCategory::Call
    }
}

const fn op(name: &'static str, value: u16, operand: OperandKind) -> OpCode {
    OpCode {
        name,
        value,
        operand,
        len: if value > 0xFF { 2 } else { 1 },
        category: OpCodeCategory::General,
    }
}

const fn call_op(name: &'static str, value: u16, operand: OperandKind) -> OpCode {
    OpCode {
        name,
        value,
        operand,
        len: if value > 0xFF { 2 } else { 1 },
        category: OpCodeCategory::Call,
    }
}

const fn reserved(value: u16) -> OpCode {
    OpCode {
        name: "",
        value,
        operand: OperandKind::None,
        len: if value > 0xFF { 2 } else { 1 },
        category: OpCodeCategory::General,
    }
}

use OperandKind::{
    BrTarget, InlineField, InlineI, InlineI8, InlineMethod, InlineR, InlineSig, InlineString,
    InlineSwitch, InlineTok, InlineType, InlineVar, None as NoOperand, ShortBrTarget, ShortInlineI,
    ShortInlineR, ShortInlineVar,
};

/// One-byte opcode table, indexed by the opcode value.
pub static INSTRUCTIONS: [OpCode; 0xE1] = [
    op("nop", 0x00, NoOperand),
    op("break", 0x01, NoOperand),
    op("ldarg.0", 0x02, NoOperand),
    op("ldarg.1", 0x03, NoOperand),
    op("ldarg.2", 0x04, NoOperand),
    op("ldarg.3", 0x05, NoOperand),
    op("ldloc.0", 0x06, NoOperand),
    op("ldloc.1", 0x07, NoOperand),
    op("ldloc.2", 0x08, NoOperand),
    op("ldloc.3", 0x09, NoOperand),
    op("stloc.0", 0x0A, NoOperand),
    op("stloc.1", 0x0B, NoOperand),
    op("stloc.2", 0x0C, NoOperand),
    op("stloc.3", 0x0D, NoOperand),
    op("ldarg.s", 0x0E, ShortInlineVar),
    op("ldarga.s", 0x0F, ShortInlineVar),
    op("starg.s", 0x10, ShortInlineVar),
    op("ldloc.s", 0x11, ShortInlineVar),
    op("ldloca.s", 0x12, ShortInlineVar),
    op("stloc.s", 0x13, ShortInlineVar),
    op("ldnull", 0x14, NoOperand),
    op("ldc.i4.m1", 0x15, NoOperand),
    op("ldc.i4.0", 0x16, NoOperand),
    op("ldc.i4.1", 0x17, NoOperand),
    op("ldc.i4.2", 0x18, NoOperand),
    op("ldc.i4.3", 0x19, NoOperand),
    op("ldc.i4.4", 0x1A, NoOperand),
    op("ldc.i4.5", 0x1B, NoOperand),
    op("ldc.i4.6", 0x1C, NoOperand),
    op("ldc.i4.7", 0x1D, NoOperand),
    op("ldc.i4.8", 0x1E, NoOperand),
    op("ldc.i4.s", 0x1F, ShortInlineI),
    op("ldc.i4", 0x20, InlineI),
    op("ldc.i8", 0x21, InlineI8),
    op("ldc.r4", 0x22, ShortInlineR),
    op("ldc.r8", 0x23, InlineR),
    reserved(0x24),
    op("dup", 0x25, NoOperand),
    op("pop", 0x26, NoOperand),
    op("jmp", 0x27, InlineMethod),
    call_op("call", 0x28, InlineMethod),
    call_op("calli", 0x29, InlineSig),
    op("ret", 0x2A, NoOperand),
    op("br.s", 0x2B, ShortBrTarget),
    op("brfalse.s", 0x2C, ShortBrTarget),
    op("brtrue.s", 0x2D, ShortBrTarget),
    op("beq.s", 0x2E, ShortBrTarget),
    op("bge.s", 0x2F, ShortBrTarget),
    op("bgt.s", 0x30, ShortBrTarget),
    op("ble.s", 0x31, ShortBrTarget),
    op("blt.s", 0x32, ShortBrTarget),
    op("bne.un.s", 0x33, ShortBrTarget),
    op("bge.un.s", 0x34, ShortBrTarget),
    op("bgt.un.s", 0x35, ShortBrTarget),
    op("ble.un.s", 0x36, ShortBrTarget),
    op("blt.un.s", 0x37, ShortBrTarget),
    op("br", 0x38, BrTarget),
    op("brfalse", 0x39, BrTarget),
    op("brtrue", 0x3A, BrTarget),
    op("beq", 0x3B, BrTarget),
    op("bge", 0x3C, BrTarget),
    op("bgt", 0x3D, BrTarget),
    op("ble", 0x3E, BrTarget),
    op("blt", 0x3F, BrTarget),
    op("bne.un", 0x40, BrTarget),
    op("bge.un", 0x41, BrTarget),
    op("bgt.un", 0x42, BrTarget),
    op("ble.un", 0x43, BrTarget),
    op("blt.un", 0x44, BrTarget),
    op("switch", 0x45, InlineSwitch),
    op("ldind.i1", 0x46, NoOperand),
    op("ldind.u1", 0x47, NoOperand),
    op("ldind.i2", 0x48, NoOperand),
    op("ldind.u2", 0x49, NoOperand),
    op("ldind.i4", 0x4A, NoOperand),
    op("ldind.u4", 0x4B, NoOperand),
    op("ldind.i8", 0x4C, NoOperand),
    op("ldind.i", 0x4D, NoOperand),
    op("ldind.r4", 0x4E, NoOperand),
    op("ldind.r8", 0x4F, NoOperand),
    op("ldind.ref", 0x50, NoOperand),
    op("stind.ref", 0x51, NoOperand),
    op("stind.i1", 0x52, NoOperand),
    op("stind.i2", 0x53, NoOperand),
    op("stind.i4", 0x54, NoOperand),
    op("stind.i8", 0x55, NoOperand),
    op("stind.r4", 0x56, NoOperand),
    op("stind.r8", 0x57, NoOperand),
    op("add", 0x58, NoOperand),
    op("sub", 0x59, NoOperand),
    op("mul", 0x5A, NoOperand),
    op("div", 0x5B, NoOperand),
    op("div.un", 0x5C, NoOperand),
    op("rem", 0x5D, NoOperand),
    op("rem.un", 0x5E, NoOperand),
    op("and", 0x5F, NoOperand),
    op("or", 0x60, NoOperand),
    op("xor", 0x61, NoOperand),
    op("shl", 0x62, NoOperand),
    op("shr", 0x63, NoOperand),
    op("shr.un", 0x64, NoOperand),
    op("neg", 0x65, NoOperand),
    op("not", 0x66, NoOperand),
    op("conv.i1", 0x67, NoOperand),
    op("conv.i2", 0x68, NoOperand),
    op("conv.i4", 0x69, NoOperand),
    op("conv.i8", 0x6A, NoOperand),
    op("conv.r4", 0x6B, NoOperand),
    op("conv.r8", 0x6C, NoOperand),
    op("conv.u4", 0x6D, NoOperand),
    op("conv.u8", 0x6E, NoOperand),
    call_op("callvirt", 0x6F, InlineMethod),
    op("cpobj", 0x70, InlineType),
    op("ldobj", 0x71, InlineType),
    op("ldstr", 0x72, InlineString),
    call_op("newobj", 0x73, InlineMethod),
    op("castclass", 0x74, InlineType),
    op("isinst", 0x75, InlineType),
    op("conv.r.un", 0x76, NoOperand),
    reserved(0x77),
    reserved(0x78),
    op("unbox", 0x79, InlineType),
    op("throw", 0x7A, NoOperand),
    op("ldfld", 0x7B, InlineField),
    op("ldflda", 0x7C, InlineField),
    op("stfld", 0x7D, InlineField),
    op("ldsfld", 0x7E, InlineField),
    op("ldsflda", 0x7F, InlineField),
    op("stsfld", 0x80, InlineField),
    op("stobj", 0x81, InlineType),
    op("conv.ovf.i1.un", 0x82, NoOperand),
    op("conv.ovf.i2.un", 0x83, NoOperand),
    op("conv.ovf.i4.un", 0x84, NoOperand),
    op("conv.ovf.i8.un", 0x85, NoOperand),
    op("conv.ovf.u1.un", 0x86, NoOperand),
    op("conv.ovf.u2.un", 0x87, NoOperand),
    op("conv.ovf.u4.un", 0x88, NoOperand),
    op("conv.ovf.u8.un", 0x89, NoOperand),
    op("conv.ovf.i.un", 0x8A, NoOperand),
    op("conv.ovf.u.un", 0x8B, NoOperand),
    op("box", 0x8C, InlineType),
    op("newarr", 0x8D, InlineType),
    op("ldlen", 0x8E, NoOperand),
    op("ldelema", 0x8F, InlineType),
    op("ldelem.i1", 0x90, NoOperand),
    op("ldelem.u1", 0x91, NoOperand),
    op("ldelem.i2", 0x92, NoOperand),
    op("ldelem.u2", 0x93, NoOperand),
    op("ldelem.i4", 0x94, NoOperand),
    op("ldelem.u4", 0x95, NoOperand),
    op("ldelem.i8", 0x96, NoOperand),
    op("ldelem.i", 0x97, NoOperand),
    op("ldelem.r4", 0x98, NoOperand),
    op("ldelem.r8", 0x99, NoOperand),
    op("ldelem.ref", 0x9A, NoOperand),
    op("stelem.i", 0x9B, NoOperand),
    op("stelem.i1", 0x9C, NoOperand),
    op("stelem.i2", 0x9D, NoOperand),
    op("stelem.i4", 0x9E, NoOperand),
    op("stelem.i8", 0x9F, NoOperand),
    op("stelem.r4", 0xA0, NoOperand),
    op("stelem.r8", 0xA1, NoOperand),
    op("stelem.ref", 0xA2, NoOperand),
    op("ldelem", 0xA3, InlineType),
    op("stelem", 0xA4, InlineType),
    op("unbox.any", 0xA5, InlineType),
    reserved(0xA6),
    reserved(0xA7),
    reserved(0xA8),
    reserved(0xA9),
    reserved(0xAA),
    reserved(0xAB),
    reserved(0xAC),
    reserved(0xAD),
    reserved(0xAE),
    reserved(0xAF),
    reserved(0xB0),
    reserved(0xB1),
    reserved(0xB2),
    op("conv.ovf.i1", 0xB3, NoOperand),
    op("conv.ovf.u1", 0xB4, NoOperand),
    op("conv.ovf.i2", 0xB5, NoOperand),
    op("conv.ovf.u2", 0xB6, NoOperand),
    op("conv.ovf.i4", 0xB7, NoOperand),
    op("conv.ovf.u4", 0xB8, NoOperand),
    op("conv.ovf.i8", 0xB9, NoOperand),
    op("conv.ovf.u8", 0xBA, NoOperand),
    reserved(0xBB),
    reserved(0xBC),
    reserved(0xBD),
    reserved(0xBE),
    reserved(0xBF),
    reserved(0xC0),
    reserved(0xC1),
    op("refanyval", 0xC2, InlineType),
    op("ckfinite", 0xC3, NoOperand),
    reserved(0xC4),
    reserved(0xC5),
    op("mkrefany", 0xC6, InlineType),
    reserved(0xC7),
    reserved(0xC8),
    reserved(0xC9),
    reserved(0xCA),
    reserved(0xCB),
    reserved(0xCC),
    reserved(0xCD),
    reserved(0xCE),
    reserved(0xCF),
    op("ldtoken", 0xD0, InlineTok),
    op("conv.u2", 0xD1, NoOperand),
    op("conv.u1", 0xD2, NoOperand),
    op("conv.i", 0xD3, NoOperand),
    op("conv.ovf.i", 0xD4, NoOperand),
    op("conv.ovf.u", 0xD5, NoOperand),
    op("add.ovf", 0xD6, NoOperand),
    op("add.ovf.un", 0xD7, NoOperand),
    op("mul.ovf", 0xD8, NoOperand),
    op("mul.ovf.un", 0xD9, NoOperand),
    op("sub.ovf", 0xDA, NoOperand),
    op("sub.ovf.un", 0xDB, NoOperand),
    op("endfinally", 0xDC, NoOperand),
    op("leave", 0xDD, BrTarget),
    op("leave.s", 0xDE, ShortBrTarget),
    op("stind.i", 0xDF, NoOperand),
    op("conv.u", 0xE0, NoOperand),
];

/// Two-byte opcode table, indexed by the byte following the `0xFE` prefix.
pub static INSTRUCTIONS_FE: [OpCode; 0x1F] = [
    op("arglist", 0xFE00, NoOperand),
    op("ceq", 0xFE01, NoOperand),
    op("cgt", 0xFE02, NoOperand),
    op("cgt.un", 0xFE03, NoOperand),
    op("clt", 0xFE04, NoOperand),
    op("clt.un", 0xFE05, NoOperand),
    op("ldftn", 0xFE06, InlineMethod),
    op("ldvirtftn", 0xFE07, InlineMethod),
    reserved(0xFE08),
    op("ldarg", 0xFE09, InlineVar),
    op("ldarga", 0xFE0A, InlineVar),
    op("starg", 0xFE0B, InlineVar),
    op("ldloc", 0xFE0C, InlineVar),
    op("ldloca", 0xFE0D, InlineVar),
    op("stloc", 0xFE0E, InlineVar),
    op("localloc", 0xFE0F, NoOperand),
    reserved(0xFE10),
    op("endfilter", 0xFE11, NoOperand),
    op("unaligned.", 0xFE12, ShortInlineI),
    op("volatile.", 0xFE13, NoOperand),
    op("tail.", 0xFE14, NoOperand),
    op("initobj", 0xFE15, InlineType),
    op("constrained.", 0xFE16, InlineType),
    op("cpblk", 0xFE17, NoOperand),
    op("initblk", 0xFE18, NoOperand),
    reserved(0xFE19),
    op("rethrow", 0xFE1A, NoOperand),
    reserved(0xFE1B),
    op("sizeof", 0xFE1C, InlineType),
    op("refanytype", 0xFE1D, NoOperand),
    op("readonly.", 0xFE1E, NoOperand),
];
