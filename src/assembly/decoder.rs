//! CIL method-body decoding.
//!
//! Transforms the raw IL byte stream of a method into an offset-ordered
//! instruction sequence with every embedded metadata token resolved through
//! the metadata provider. Decoding runs in two phases: a linear pass that
//! reads opcodes and operands, and a resolution pass that replaces raw
//! branch offsets with instruction indices.
//!
//! # Example
//!
//! ```rust,ignore
//! use cildasm::assembly::decode_method;
//!
//! let instructions = decode_method(&method, &provider)?;
//! assert_eq!(instructions[0].opcode.name, "nop");
//! ```

use crate::{
    assembly::{
        instruction::{BranchTarget, Instruction, Operand},
        instructions::{OpCode, OperandKind, INSTRUCTIONS, INSTRUCTIONS_FE},
    },
    metadata::{
        method::{Method, MethodBody},
        provider::MetadataProvider,
        token::Token,
        typesystem::CilTypeRc,
    },
    parser::Parser,
    Error, Result,
};

/// Encoded value of `ldc.i4.s`, whose 8-bit operand is signed
const LDC_I4_S: u16 = 0x1F;

/// Decode the IL body of `method` into a resolved instruction sequence.
///
/// # Errors
///
/// * [`Error::MethodHasNoBody`] if the method carries no body.
/// * [`Error::CannotReadIL`] if the body has no raw IL bytes.
/// * [`Error::OutOfBounds`] / [`Error::Malformed`] for truncated streams and
///   unknown opcodes.
/// * [`Error::TokenResolution`] surfaced from the metadata provider.
pub fn decode_method(
    method: &Method,
    provider: &dyn MetadataProvider,
) -> Result<Vec<Instruction>> {
    let Some(body) = method.body.as_ref() else {
        return Err(Error::MethodHasNoBody);
    };
    let Some(code) = body.code.as_ref() else {
        return Err(Error::CannotReadIL);
    };

    let type_generics = method
        .declared_by
        .upgrade()
        .map(|declaring| declaring.generic_args.clone())
        .unwrap_or_default();

    let mut parser = Parser::new(code);
    let mut instructions = Vec::new();

    while parser.has_more_data() {
        let instruction =
            decode_instruction(&mut parser, method, body, &type_generics, provider)?;
        instructions.push(instruction);
    }

    resolve_targets(&mut instructions);

    Ok(instructions)
}

/// Look up the opcode descriptor at the current parser position.
fn read_opcode(parser: &mut Parser) -> Result<&'static OpCode> {
    let first_byte = parser.read_le::<u8>()?;

    let opcode = match first_byte {
        0xFE => {
            let second_byte = parser.read_le::<u8>()?;
            match INSTRUCTIONS_FE.get(second_byte as usize) {
                Some(instr) => instr,
                None => return Err(malformed_error!("Invalid opcode: FE {:02X}", second_byte)),
            }
        }
        _ => match INSTRUCTIONS.get(first_byte as usize) {
            Some(instr) => instr,
            None => return Err(malformed_error!("Invalid opcode: {:02X}", first_byte)),
        },
    };

    if opcode.name.is_empty() {
        return Err(malformed_error!("Reserved opcode: {:04X}", opcode.value));
    }

    Ok(opcode)
}

/// Decode a single instruction from the current parser position.
///
/// Branch and switch operands hold raw absolute offsets after this call;
/// [`resolve_targets`] replaces them before a stream is handed out.
fn decode_instruction(
    parser: &mut Parser,
    method: &Method,
    body: &MethodBody,
    type_generics: &[CilTypeRc],
    provider: &dyn MetadataProvider,
) -> Result<Instruction> {
    let offset = parser.pos();
    let opcode = read_opcode(parser)?;

    let operand = match opcode.operand {
        OperandKind::None => Operand::None,
        OperandKind::ShortBrTarget => {
            let displacement = i64::from(parser.read_le::<i8>()?);
            Operand::Target(BranchTarget::Offset(parser.pos() as i64 + displacement))
        }
        OperandKind::BrTarget => {
            let displacement = i64::from(parser.read_le::<i32>()?);
            Operand::Target(BranchTarget::Offset(parser.pos() as i64 + displacement))
        }
        OperandKind::InlineSwitch => {
            let count = parser.read_le::<u32>()?;
            let base = parser.pos() as i64 + 4 * i64::from(count);

            let mut targets = Vec::with_capacity(count as usize);
            for _ in 0..count {
                let displacement = i64::from(parser.read_le::<i32>()?);
                targets.push(BranchTarget::Offset(base + displacement));
            }

            Operand::Switch(targets)
        }
        OperandKind::ShortInlineI => {
            if opcode.value == LDC_I4_S {
                Operand::Int8(parser.read_le::<i8>()?)
            } else {
                Operand::UInt8(parser.read_le::<u8>()?)
            }
        }
        OperandKind::InlineI => Operand::Int32(parser.read_le::<i32>()?),
        OperandKind::InlineI8 => Operand::Int64(parser.read_le::<i64>()?),
        OperandKind::ShortInlineR => Operand::Float32(parser.read_le::<f32>()?),
        OperandKind::InlineR => Operand::Float64(parser.read_le::<f64>()?),
        OperandKind::InlineString => {
            let token = Token::new(parser.read_le::<u32>()?);
            Operand::String(provider.resolve_string(token)?)
        }
        OperandKind::InlineSig => {
            let token = Token::new(parser.read_le::<u32>()?);
            Operand::Signature(provider.resolve_signature(token)?)
        }
        OperandKind::InlineTok
        | OperandKind::InlineType
        | OperandKind::InlineMethod
        | OperandKind::InlineField => {
            let token = Token::new(parser.read_le::<u32>()?);
            Operand::Member(provider.resolve_member(token, type_generics, &method.generic_args)?)
        }
        OperandKind::ShortInlineVar | OperandKind::InlineVar => {
            let index = if opcode.operand == OperandKind::ShortInlineVar {
                i32::from(parser.read_le::<u8>()?)
            } else {
                i32::from(parser.read_le::<i16>()?)
            };

            decode_var_operand(opcode, index, method, body)?
        }
    };

    Ok(Instruction {
        offset: offset as u32,
        size: (parser.pos() - offset) as u32,
        opcode,
        operand,
    })
}

/// Dispatch a variable-index operand to locals or parameters.
///
/// Opcodes whose mnemonic contains `loc` index the local-variable list; the
/// rest index the parameter list, shifted by one on instance methods because
/// argument 0 is the implicit receiver.
fn decode_var_operand(
    opcode: &'static OpCode,
    index: i32,
    method: &Method,
    body: &MethodBody,
) -> Result<Operand> {
    if opcode.name.contains("loc") {
        let local = usize::try_from(index)
            .ok()
            .and_then(|slot| body.local_vars.get(slot));
        match local {
            Some(local) => Ok(Operand::Local(local.clone())),
            None => Err(malformed_error!(
                "Local variable index {} out of range for {}",
                index,
                method.name
            )),
        }
    } else {
        let adjusted = if method.is_static() { index } else { index - 1 };
        let param = usize::try_from(adjusted)
            .ok()
            .and_then(|slot| method.params.get(slot));
        match param {
            Some(param) => Ok(Operand::Argument(param.clone())),
            None => Err(malformed_error!(
                "Argument index {} out of range for {}",
                index,
                method.name
            )),
        }
    }
}

/// Replace raw branch offsets with instruction indices.
///
/// Targets are found by binary search over the offset-ordered stream. An
/// offset that does not land on an instruction (negative, past the end, or
/// mid-instruction) resolves to [`BranchTarget::Missing`].
fn resolve_targets(instructions: &mut [Instruction]) {
    let offsets: Vec<u32> = instructions.iter().map(|i| i.offset).collect();

    let resolve = |target: &BranchTarget| -> BranchTarget {
        let BranchTarget::Offset(raw) = *target else {
            return *target;
        };
        match u32::try_from(raw)
            .ok()
            .and_then(|offset| offsets.binary_search(&offset).ok())
        {
            Some(index) => BranchTarget::Index(index),
            None => BranchTarget::Missing,
        }
    };

    for instruction in instructions.iter_mut() {
        match &mut instruction.operand {
            Operand::Target(target) => *target = resolve(target),
            Operand::Switch(targets) => {
                for target in targets.iter_mut() {
                    *target = resolve(target);
                }
            }
            _ => {}
        }
    }
}
