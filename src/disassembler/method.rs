//! Method emission: header, pseudo-directives, body and handler regions.

use std::sync::Arc;

use crate::{
    assembly::decode_method,
    disassembler::{
        instruction::{format_constant, format_instruction, format_method_ref, max_spacing},
        naming::{generic_params_text, member_name, param_name, type_identifier, type_name},
        regions::{build_regions, RegionKind, RegionMarker},
        writer::IndentedWriter,
    },
    metadata::{
        members::{CustomAttribute, Param, ParamAttributes},
        method::{Method, MethodImplCodeType, MethodModifiers},
        provider::MetadataProvider,
        typesystem::AssemblyName,
    },
    Result,
};

/// Modifier bits and their keywords, in ascending bit order.
///
/// `privatescope` and the vtable-layout bit never appear here; `newslot` is
/// appended separately for virtual methods.
const MODIFIER_KEYWORDS: [(MethodModifiers, &str); 12] = [
    (MethodModifiers::UNMANAGED_EXPORT, "unmanagedexport"),
    (MethodModifiers::STATIC, "static"),
    (MethodModifiers::FINAL, "final"),
    (MethodModifiers::VIRTUAL, "virtual"),
    (MethodModifiers::HIDE_BY_SIG, "hidebysig"),
    (MethodModifiers::CHECK_ACCESS_ON_OVERRIDE, "checkaccessonoverride"),
    (MethodModifiers::ABSTRACT, "abstract"),
    (MethodModifiers::SPECIAL_NAME, "specialname"),
    (MethodModifiers::RTSPECIAL_NAME, "rtspecialname"),
    (MethodModifiers::PINVOKE_IMPL, "pinvokeimpl"),
    (MethodModifiers::HAS_SECURITY, "hassecurity"),
    (MethodModifiers::REQUIRE_SEC_OBJECT, "reqsecobj"),
];

pub(crate) fn current_assembly(method: &Method) -> Arc<AssemblyName> {
    method
        .declared_by
        .upgrade()
        .map(|declaring| declaring.assembly.clone())
        .unwrap_or_else(|| Arc::new(AssemblyName::new("")))
}

/// Render a `.custom` pseudo-directive.
///
/// An empty blob stands for a constructor invocation without arguments and
/// renders as the four prologue bytes.
pub(crate) fn format_custom_attribute(
    current: &AssemblyName,
    attribute: &CustomAttribute,
) -> String {
    let constructor = format_method_ref(current, &attribute.constructor, true);

    let data: &[u8] = if attribute.data.is_empty() {
        &[0x01, 0x00, 0x00, 0x00]
    } else {
        &attribute.data
    };
    let hex: Vec<String> = data.iter().map(|byte| format!("{byte:02X}")).collect();

    format!(".custom {constructor} = ( {} )", hex.join(" "))
}

fn format_param(current: &AssemblyName, param: &Param) -> String {
    let mut parts: Vec<String> = Vec::new();

    if param.flags.contains(ParamAttributes::HAS_DEFAULT) || param.default.is_some() {
        parts.push("[opt]".to_string());
    }
    if param.flags.contains(ParamAttributes::OUT) {
        parts.push("[out]".to_string());
    }

    parts.push(format!(
        "{}{}",
        type_identifier(Some(current), &param.base, true),
        type_name(current, &param.base, true, false)
    ));
    parts.push(param_name(&param.name));
    parts.join(" ")
}

fn signature_line(current: &AssemblyName, method: &Method) -> String {
    let mut tokens: Vec<&str> = Vec::new();
    if let Some(keyword) = method.flags_access.keyword() {
        tokens.push(keyword);
    }
    for (flag, keyword) in MODIFIER_KEYWORDS {
        if method.flags_modifiers.contains(flag) {
            tokens.push(keyword);
        }
    }
    if !method.is_static() {
        tokens.push("instance");
    }
    if method.is_virtual() {
        tokens.push("newslot");
    }

    let return_text = if method.is_constructor() {
        "void".to_string()
    } else {
        format!(
            "{}{}",
            type_identifier(Some(current), &method.return_type, true),
            type_name(current, &method.return_type, true, false)
        )
    };

    let params: Vec<String> = method
        .params
        .iter()
        .map(|param| format_param(current, param))
        .collect();

    let mut impl_text = String::new();
    if method.impl_code_type == MethodImplCodeType::IL {
        impl_text.push_str(" cil");
    } else if method.impl_code_type == MethodImplCodeType::RUNTIME {
        impl_text.push_str(" runtime");
    }
    if method.impl_management.is_managed() {
        impl_text.push_str(" managed");
    }

    format!(
        ".method {} {} {}{}({}){}",
        tokens.join(" "),
        return_text,
        member_name(&method.name, method.compiler_generated),
        generic_params_text(current, &method.generic_params),
        params.join(", "),
        impl_text
    )
}

fn emit_markers(writer: &mut IndentedWriter, current: &AssemblyName, markers: &[RegionMarker]) {
    for marker in markers {
        if marker.begin {
            match &marker.kind {
                RegionKind::Try => writer.append_line(".try"),
                RegionKind::Catch(Some(ty)) => {
                    writer.append_line(&format!("catch {}", type_name(current, ty, false, false)));
                }
                RegionKind::Catch(None) => writer.append_line("catch"),
                RegionKind::Filter => writer.append_line("filter"),
                RegionKind::Finally => writer.append_line("finally"),
                RegionKind::Fault => writer.append_line("fault"),
                RegionKind::FilterCatch => {}
            }
            writer.append_line("{");
            writer.indent();
        } else {
            writer.unindent();
            writer.append_line("}");
        }
    }
}

/// Render a complete method listing.
///
/// # Errors
/// Propagates the decoder's errors; see [`decode_method`].
pub(crate) fn format_method(method: &Method, provider: &dyn MetadataProvider) -> Result<String> {
    let instructions = decode_method(method, provider)?;
    let assembly = current_assembly(method);
    let current: &AssemblyName = &assembly;

    // decode_method already proved both present
    let Some(body) = method.body.as_ref() else {
        return Err(crate::Error::MethodHasNoBody);
    };
    let code_size = body.code.as_ref().map_or(0, Vec::len);

    let mut writer = IndentedWriter::new(4);
    writer.append_line(&signature_line(current, method));
    writer.append_line("{");
    writer.indent();

    for attribute in &method.custom_attributes {
        writer.append_line(&format_custom_attribute(current, attribute));
    }

    for param in &method.params {
        if let Some(default) = &param.default {
            writer.append_line(&format!(
                ".param [{}] = {}",
                param.position + 1,
                format_constant(default)
            ));
        }
    }

    writer.append_line(&format!("// Code size  {code_size} (0x{code_size:x})"));
    writer.append_line(&format!(".maxstack {}", body.max_stack));

    if !body.local_vars.is_empty() {
        let locals: Vec<String> = body
            .local_vars
            .iter()
            .map(|local| {
                format!(
                    "{}{}{} V_{}",
                    type_identifier(Some(current), &local.base, true),
                    type_name(current, &local.base, true, false),
                    if local.is_pinned { " pinned" } else { "" },
                    local.index
                )
            })
            .collect();
        let init = if body.init_locals { "init " } else { "" };
        writer.append_line(&format!(".locals {init}({})", locals.join(", ")));
    }

    let regions = build_regions(&body.exception_handlers);
    let pad = max_spacing(&instructions) + 3;

    for index in 0..instructions.len() {
        if let Some(markers) = regions.get(&instructions[index].offset) {
            emit_markers(&mut writer, current, markers);
        }
        writer.append_line(&format_instruction(current, &instructions, index, pad));
    }
    // regions closing at the end of the stream have no instruction to anchor on
    if let Some(markers) = regions.get(&(code_size as u32)) {
        emit_markers(&mut writer, current, markers);
    }

    writer.unindent();
    writer.append_line("}");
    Ok(writer.into_string())
}
