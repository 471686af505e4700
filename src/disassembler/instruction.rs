//! Per-instruction line rendering.
//!
//! Every instruction renders as `IL_<hhhh>: <mnemonic>` plus an operand
//! column aligned across the whole body. Member operands spell out their
//! declaring type, field and method instructions carry the resolved
//! signature text, and float operands round-trip through the invariant
//! `G9`/`G17` formats.

use crate::{
    assembly::{BranchTarget, Instruction, Operand},
    disassembler::naming::{member_name, param_name, type_identifier, type_name},
    metadata::{
        members::{ConstantValue, Field, ParamRc},
        method::Method,
        provider::CilMember,
        typesystem::AssemblyName,
    },
};

/// Placeholder for branch targets that resolved to nothing
const MISSING_LABEL: &str = "IL_????";

/// The `IL_xxxx` label of an instruction offset.
pub(crate) fn format_label(offset: u32) -> String {
    format!("IL_{offset:04x}")
}

fn target_label(instructions: &[Instruction], target: &BranchTarget) -> String {
    match target {
        BranchTarget::Index(index) => format_label(instructions[*index].offset),
        BranchTarget::Offset(_) | BranchTarget::Missing => MISSING_LABEL.to_string(),
    }
}

/// The widest `IL_xxxx: mnemonic` prefix in the body; operand columns align
/// three columns past it.
pub(crate) fn max_spacing(instructions: &[Instruction]) -> usize {
    instructions
        .iter()
        .map(|instruction| format_label(instruction.offset).len() + 2 + instruction.opcode.name.len())
        .max()
        .unwrap_or(0)
}

/// Render one instruction line, padding operand-bearing instructions out to
/// `pad_to` columns.
pub(crate) fn format_instruction(
    current: &AssemblyName,
    instructions: &[Instruction],
    index: usize,
    pad_to: usize,
) -> String {
    let instruction = &instructions[index];
    let mut line = format!(
        "{}: {}",
        format_label(instruction.offset),
        instruction.opcode.name
    );

    if instruction.has_operand() {
        while line.len() < pad_to {
            line.push(' ');
        }
        line.push_str(&format_operand(current, instructions, instruction));
    }

    line
}

fn format_operand(
    current: &AssemblyName,
    instructions: &[Instruction],
    instruction: &Instruction,
) -> String {
    match &instruction.operand {
        Operand::None => String::new(),
        Operand::Target(target) => target_label(instructions, target),
        Operand::Switch(targets) => {
            let labels: Vec<String> = targets
                .iter()
                .map(|target| target_label(instructions, target))
                .collect();
            format!("({})", labels.join(","))
        }
        Operand::String(value) => format!("\"{value}\""),
        Operand::Member(member) => {
            format_member(current, member, instruction.opcode.is_invocation())
        }
        Operand::Signature(signature) => signature.token.to_string(),
        Operand::Local(local) => format!("V_{}", local.index),
        Operand::Argument(param) => param_name(&param.name),
        Operand::Int8(value) => value.to_string(),
        Operand::UInt8(value) => value.to_string(),
        Operand::Int32(value) => value.to_string(),
        Operand::Int64(value) => value.to_string(),
        Operand::Float32(value) => format_g(f64::from(*value), 9),
        Operand::Float64(value) => format_g(*value, 17),
    }
}

fn format_member(current: &AssemblyName, member: &CilMember, invocation: bool) -> String {
    match member {
        CilMember::Type(ty) => type_name(current, ty, false, false),
        CilMember::Field(field) => format_field_ref(current, field),
        CilMember::Method(method) => format_method_ref(current, method, invocation),
    }
}

fn format_field_ref(current: &AssemblyName, field: &Field) -> String {
    let declaring = field
        .declared_by
        .upgrade()
        .map_or_else(|| "???".to_string(), |ty| type_name(current, &ty, false, false));

    format!(
        "{}{} {}::{}",
        type_identifier(Some(current), &field.base, true),
        type_name(current, &field.base, true, false),
        declaring,
        member_name(&field.name, field.compiler_generated)
    )
}

/// Render a method reference the way call operands spell it.
///
/// `with_instance` adds the `instance ` prefix for non-static targets; the
/// invocation opcodes and the accessor pseudo-directives want it, `ldftn`
/// and friends do not.
pub(crate) fn format_method_ref(
    current: &AssemblyName,
    method: &Method,
    with_instance: bool,
) -> String {
    let declaring = method.declared_by.upgrade();
    let declaring_text = declaring
        .as_ref()
        .map_or_else(|| "???".to_string(), |ty| type_name(current, ty, false, false));
    let params = format_param_types(current, &method.params);

    let mut text = String::new();
    if with_instance && !method.is_static() {
        text.push_str("instance ");
    }

    if method.is_constructor() {
        let identifier = declaring
            .as_ref()
            .map_or_else(String::new, |ty| type_identifier(Some(current), ty, true));
        text.push_str("void ");
        text.push_str(&identifier);
    } else {
        text.push_str(&type_identifier(Some(current), &method.return_type, true));
        text.push_str(&type_name(current, &method.return_type, true, false));
        text.push(' ');
    }

    text.push_str(&declaring_text);
    text.push_str("::");
    text.push_str(&member_name(&method.name, method.compiler_generated));
    text.push('(');
    text.push_str(&params);
    text.push(')');
    text
}

fn format_param_types(current: &AssemblyName, params: &[ParamRc]) -> String {
    let rendered: Vec<String> = params
        .iter()
        .map(|param| {
            format!(
                "{}{}",
                type_identifier(Some(current), &param.base, true),
                type_name(current, &param.base, true, false)
            )
        })
        .collect();
    rendered.join(", ")
}

/// Render a parameter default or field literal.
pub(crate) fn format_constant(value: &ConstantValue) -> String {
    match value {
        ConstantValue::String(text) => format!("\"{text}\""),
        ConstantValue::I1(v) => format!("int8(0x{:02X})", *v as u8),
        ConstantValue::U1(v) => format!("uint8(0x{v:02X})"),
        ConstantValue::I2(v) => format!("int16(0x{:04X})", *v as u16),
        ConstantValue::U2(v) => format!("uint16(0x{v:04X})"),
        ConstantValue::I4(v) => format!("int32(0x{:08X})", *v as u32),
        ConstantValue::U4(v) => format!("uint32(0x{v:08X})"),
        ConstantValue::I8(v) => format!("int64(0x{:016X})", *v as u64),
        ConstantValue::U8(v) => format!("uint64(0x{v:016X})"),
        ConstantValue::F4(v) => format!("float32({})", format_g(f64::from(*v), 9)),
        ConstantValue::F8(v) => format!("float64({})", format_g(*v, 17)),
        ConstantValue::Bool(v) => format!("bool({})", if *v { "True" } else { "False" }),
        ConstantValue::Char(v) => format!("char({v})"),
        ConstantValue::Null => "nullref".to_string(),
    }
}

/// Round-trip float text: the invariant-culture `G<digits>` format.
///
/// Decimal notation with up to `digits` significant digits and trailing
/// zeros trimmed; scientific notation (`E±nn`) once the decimal exponent
/// leaves the `[-5, digits)` window.
pub(crate) fn format_g(value: f64, digits: usize) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let exponent = decimal_exponent(value);
    if exponent < -5 || exponent >= digits as i32 {
        let rendered = format!("{:.*e}", digits - 1, value);
        let (mantissa, exp_text) = rendered
            .split_once('e')
            .unwrap_or((rendered.as_str(), "0"));
        let exponent: i32 = exp_text.parse().unwrap_or(0);
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}E{}{:02}", trim_zeros(mantissa), sign, exponent.abs())
    } else {
        let decimals = usize::try_from(digits as i32 - 1 - exponent).unwrap_or(0);
        let rendered = format!("{value:.decimals$}");
        trim_zeros(&rendered).to_string()
    }
}

fn decimal_exponent(value: f64) -> i32 {
    let rendered = format!("{value:e}");
    rendered
        .split_once('e')
        .and_then(|(_, exp)| exp.parse().ok())
        .unwrap_or(0)
}

fn trim_zeros(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}
