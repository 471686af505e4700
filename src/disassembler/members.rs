//! Field, property and event emission.

use std::sync::Arc;

use crate::{
    disassembler::{
        instruction::{format_constant, format_method_ref},
        method::format_custom_attribute,
        naming::{member_name, type_identifier, type_name},
        writer::IndentedWriter,
    },
    metadata::{
        members::{Event, Field, FieldModifiers, Property},
        typesystem::{AssemblyName, CilTypeRef},
    },
};

/// Modifier bits and their keywords, in ascending bit order.
const FIELD_MODIFIER_KEYWORDS: [(FieldModifiers, &str); 7] = [
    (FieldModifiers::STATIC, "static"),
    (FieldModifiers::INIT_ONLY, "initonly"),
    (FieldModifiers::LITERAL, "literal"),
    (FieldModifiers::NOT_SERIALIZED, "notserialized"),
    (FieldModifiers::SPECIAL_NAME, "specialname"),
    (FieldModifiers::RTSPECIAL_NAME, "rtspecialname"),
    (FieldModifiers::PINVOKE_IMPL, "pinvokeimpl"),
];

fn assembly_of(declared_by: &CilTypeRef) -> Arc<AssemblyName> {
    declared_by
        .upgrade()
        .map(|declaring| declaring.assembly.clone())
        .unwrap_or_else(|| Arc::new(AssemblyName::new("")))
}

pub(crate) fn format_field(field: &Field) -> String {
    let assembly = assembly_of(&field.declared_by);
    let current: &AssemblyName = &assembly;
    let declaring = field.declared_by.upgrade();

    let mut tokens: Vec<&str> = vec![".field"];
    if let Some(keyword) = field.flags_access.keyword() {
        tokens.push(keyword);
    }
    for (flag, keyword) in FIELD_MODIFIER_KEYWORDS {
        if field.flags_modifiers.contains(flag) {
            tokens.push(keyword);
        }
    }
    if declaring.as_ref().is_some_and(|ty| ty.is_value_type) {
        tokens.push("valuetype");
    }

    let mut line = format!(
        "{} {}{} {}",
        tokens.join(" "),
        type_identifier(Some(current), &field.base, true),
        type_name(current, &field.base, true, false),
        member_name(&field.name, field.compiler_generated)
    );
    if let Some(constant) = &field.literal {
        line.push_str(" = ");
        line.push_str(&format_constant(constant));
    }

    let mut writer = IndentedWriter::new(4);
    writer.append_line(&line);
    for attribute in &field.custom_attributes {
        writer.append_line(&format_custom_attribute(current, attribute));
    }
    writer.into_string()
}

pub(crate) fn format_property(property: &Property) -> String {
    let assembly = assembly_of(&property.declared_by);
    let current: &AssemblyName = &assembly;

    let accessor_is_instance = property
        .getter
        .as_ref()
        .or(property.setter.as_ref())
        .is_some_and(|accessor| !accessor.is_static());
    let instance = if accessor_is_instance { "instance " } else { "" };

    let mut writer = IndentedWriter::new(4);
    writer.append_line(&format!(
        ".property {}{}{} {}()",
        instance,
        type_identifier(Some(current), &property.base, true),
        type_name(current, &property.base, true, false),
        property.name
    ));
    writer.append_line("{");
    writer.indent();

    for attribute in &property.custom_attributes {
        writer.append_line(&format_custom_attribute(current, attribute));
    }
    if let Some(getter) = &property.getter {
        writer.append_line(&format!(".get {}", format_method_ref(current, getter, true)));
    }
    if let Some(setter) = &property.setter {
        writer.append_line(&format!(".set {}", format_method_ref(current, setter, true)));
    }

    writer.unindent();
    writer.append_line("}");
    writer.into_string()
}

pub(crate) fn format_event(event: &Event) -> String {
    let assembly = assembly_of(&event.declared_by);
    let current: &AssemblyName = &assembly;

    let mut writer = IndentedWriter::new(4);
    writer.append_line(&format!(
        ".event {} {}",
        type_name(current, &event.handler_type, false, false),
        event.name
    ));
    writer.append_line("{");
    writer.indent();

    for attribute in &event.custom_attributes {
        writer.append_line(&format_custom_attribute(current, attribute));
    }
    if let Some(add) = &event.add_method {
        writer.append_line(&format!(".addon {}", format_method_ref(current, add, true)));
    }
    if let Some(remove) = &event.remove_method {
        writer.append_line(&format!(
            ".removeon {}",
            format_method_ref(current, remove, true)
        ));
    }

    writer.unindent();
    writer.append_line("}");
    writer.into_string()
}
