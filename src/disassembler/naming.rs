//! Type and member name rendering.
//!
//! These rules decide the exact spelling of every type reference in the
//! output: keyword aliases for the primitives, `[assembly]` qualification for
//! foreign types, the `class ` identifier on reference-type positions, array
//! suffixes and generic argument lists. They are shared by every emitter.

use std::sync::OnceLock;

use rustc_hash::FxHashMap;

use crate::metadata::typesystem::{
    AssemblyName, CilType, GenericParam, GenericParamAttributes,
};

/// Names the canonical syntax reserves; parameters with one of these names
/// must be single-quoted.
const RESERVED_NAMES: [&str; 3] = ["object", "value", "method"];

static ALIASES: OnceLock<FxHashMap<&'static str, &'static str>> = OnceLock::new();

/// The keyword-alias map for primitive types, byref forms included.
fn aliases() -> &'static FxHashMap<&'static str, &'static str> {
    ALIASES.get_or_init(|| {
        let pairs = [
            ("System.SByte", "int8"),
            ("System.Int16", "int16"),
            ("System.Int32", "int32"),
            ("System.Int64", "int64"),
            ("System.Byte", "uint8"),
            ("System.UInt16", "uint16"),
            ("System.UInt32", "uint32"),
            ("System.UInt64", "uint64"),
            ("System.Single", "float32"),
            ("System.Double", "float64"),
            ("System.String", "string"),
            ("System.Char", "char"),
            ("System.Boolean", "bool"),
            ("System.Void", "void"),
            ("System.Object", "object"),
        ];

        let mut map = FxHashMap::default();
        for (full, alias) in pairs {
            map.insert(full, alias);
        }
        map.insert("System.SByte&", "int8&");
        map.insert("System.Int16&", "int16&");
        map.insert("System.Int32&", "int32&");
        map.insert("System.Int64&", "int64&");
        map.insert("System.Byte&", "uint8&");
        map.insert("System.UInt16&", "uint16&");
        map.insert("System.UInt32&", "uint32&");
        map.insert("System.UInt64&", "uint64&");
        map.insert("System.Single&", "float32&");
        map.insert("System.Double&", "float64&");
        map.insert("System.String&", "string&");
        map.insert("System.Char&", "char&");
        map.insert("System.Boolean&", "bool&");
        map.insert("System.Void&", "void&");
        map.insert("System.Object&", "object&");
        map
    })
}

/// Render a type reference as it appears in the listing.
///
/// * `current` - the assembly of the type being disassembled; foreign types
///   get a `[short-name]` prefix
/// * `use_aliases` - substitute the keyword alias for primitives
/// * `alias_params` - alias array element types even when `use_aliases` is
///   off (parameter positions)
pub(crate) fn type_name(
    current: &AssemblyName,
    ty: &CilType,
    use_aliases: bool,
    alias_params: bool,
) -> String {
    if ty.is_array() {
        if let Some(element) = ty.element.as_ref() {
            let element_name =
                type_name(current, element, use_aliases || alias_params, alias_params);

            if ty.rank == 1 {
                return format!("{element_name}[]");
            }
            let bounds = vec!["0..."; ty.rank as usize].join(",");
            return format!("{element_name}[{bounds}]");
        }
    }

    if ty.is_generic_parameter {
        return ty.name.clone();
    }

    let fullname = ty.fullname();
    if use_aliases {
        if let Some(alias) = aliases().get(fullname.as_str()) {
            return (*alias).to_string();
        }
    }

    let prefix = if ty.assembly.full_name == current.full_name {
        String::new()
    } else {
        format!("[{}]", ty.assembly.short_name())
    };

    if !ty.generic_args.is_empty() {
        let args: Vec<String> = ty
            .generic_args
            .iter()
            .map(|arg| type_name(current, arg, use_aliases, alias_params))
            .collect();
        return format!("{prefix}{fullname}<{}>", args.join(","));
    }

    format!("{prefix}{fullname}")
}

/// The `class ` marker required on references to class and interface types
/// in member positions.
///
/// Suppressed for the special system types, generic parameters, and types
/// of the assembly being disassembled.
pub(crate) fn type_identifier(
    current: Option<&AssemblyName>,
    ty: &CilType,
    trailing_space: bool,
) -> String {
    if ty.is_array() {
        if let Some(element) = ty.element.as_ref() {
            return type_identifier(current, element, trailing_space);
        }
    }

    if !ty.is_class() && !ty.is_interface() {
        return String::new();
    }
    if ty.is_generic_parameter {
        return String::new();
    }

    let fullname = ty.fullname();
    if matches!(
        fullname.as_str(),
        "System.Object" | "System.String" | "System.Void" | "System.ValueType"
    ) {
        return String::new();
    }

    if let Some(current) = current {
        if ty.assembly.full_name == current.full_name {
            return String::new();
        }
    }

    if trailing_space {
        "class ".to_string()
    } else {
        "class".to_string()
    }
}

/// Render one generic parameter: variance and constraint tokens, the
/// constraint list, then the display name.
pub(crate) fn generic_param_text(current: &AssemblyName, param: &GenericParam) -> String {
    let mut tokens: Vec<String> = Vec::new();

    if param
        .flags
        .contains(GenericParamAttributes::DEFAULT_CONSTRUCTOR_CONSTRAINT)
    {
        tokens.push(".ctor".to_string());
    }
    if param
        .flags
        .contains(GenericParamAttributes::NOT_NULLABLE_VALUE_TYPE_CONSTRAINT)
    {
        tokens.push("valuetype".to_string());
    }
    if param
        .flags
        .contains(GenericParamAttributes::REFERENCE_TYPE_CONSTRAINT)
    {
        tokens.push("class".to_string());
    }
    if param.flags.contains(GenericParamAttributes::COVARIANT) {
        tokens.push("+".to_string());
    }
    if param.flags.contains(GenericParamAttributes::CONTRAVARIANT) {
        tokens.push("-".to_string());
    }

    if !param.constraints.is_empty() {
        let constraints: Vec<String> = param
            .constraints
            .iter()
            .map(|constraint| {
                format!(
                    "{}{}",
                    type_identifier(Some(current), constraint, true),
                    type_name(current, constraint, false, false)
                )
            })
            .collect();
        tokens.push(format!("({})", constraints.join(", ")));
    }

    tokens.push(param.name.clone());
    tokens.join(" ")
}

/// Render a `<...>` generic parameter list, or nothing for empty input.
pub(crate) fn generic_params_text(current: &AssemblyName, params: &[GenericParam]) -> String {
    if params.is_empty() {
        return String::new();
    }
    let rendered: Vec<String> = params
        .iter()
        .map(|param| generic_param_text(current, param))
        .collect();
    format!("<{}>", rendered.join(", "))
}

/// Quote a member name if it stems from a compiler-generated member.
pub(crate) fn member_name(name: &str, compiler_generated: bool) -> String {
    if compiler_generated {
        format!("'{name}'")
    } else {
        name.to_string()
    }
}

/// Quote a parameter name if it collides with a reserved lexeme.
pub(crate) fn param_name(name: &str) -> String {
    if RESERVED_NAMES.contains(&name) {
        format!("'{name}'")
    } else {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::typesystem::CilTypeRc;
    use crate::test::{corlib, create_type, int32, primitive, test_assembly};
    use std::sync::Arc;

    fn array_of(element: CilTypeRc, rank: u32) -> CilType {
        let mut ty = create_type(0x0200_0099, "System", "Int32[]", &corlib());
        ty.element = Some(element);
        ty.rank = rank;
        ty
    }

    #[test]
    fn aliases_apply_when_enabled() {
        let current = test_assembly();
        assert_eq!(type_name(&current, &int32(), true, false), "int32");
        assert_eq!(
            type_name(&current, &primitive(1, "Boolean"), true, false),
            "bool"
        );
        assert_eq!(
            type_name(&current, &primitive(2, "Object"), true, false),
            "object"
        );
    }

    #[test]
    fn alias_map_is_complete() {
        // Every alias pair the rendering rules promise
        let expected = [
            ("SByte", "int8"),
            ("Int16", "int16"),
            ("Int32", "int32"),
            ("Int64", "int64"),
            ("Byte", "uint8"),
            ("UInt16", "uint16"),
            ("UInt32", "uint32"),
            ("UInt64", "uint64"),
            ("Single", "float32"),
            ("Double", "float64"),
            ("String", "string"),
            ("Char", "char"),
            ("Boolean", "bool"),
            ("Void", "void"),
            ("Object", "object"),
        ];
        let current = test_assembly();
        for (index, (name, alias)) in expected.iter().enumerate() {
            let ty = primitive(index as u32 + 1, name);
            assert_eq!(type_name(&current, &ty, true, false), *alias);
        }
    }

    #[test]
    fn byref_forms_alias() {
        let current = test_assembly();
        let byref = Arc::new(create_type(3, "System", "Int32&", &corlib()));
        assert_eq!(type_name(&current, &byref, true, false), "int32&");
    }

    #[test]
    fn foreign_types_get_assembly_prefix() {
        let current = test_assembly();
        let console = create_type(4, "System", "Console", &corlib());
        assert_eq!(
            type_name(&current, &console, false, false),
            "[mscorlib]System.Console"
        );
    }

    #[test]
    fn same_assembly_types_are_unqualified() {
        let current = test_assembly();
        let local = create_type(5, "ILDisassembler.Test", "HelloWorldProgram", &current);
        assert_eq!(
            type_name(&current, &local, false, false),
            "ILDisassembler.Test.HelloWorldProgram"
        );
    }

    #[test]
    fn array_suffixes() {
        let current = test_assembly();
        assert_eq!(
            type_name(&current, &array_of(int32(), 1), false, false),
            "System.Int32[]"
        );
        assert_eq!(
            type_name(&current, &array_of(int32(), 2), false, false),
            "System.Int32[0...,0...]"
        );
    }

    #[test]
    fn array_elements_alias_in_param_positions() {
        let current = test_assembly();
        assert_eq!(
            type_name(&current, &array_of(int32(), 1), false, true),
            "int32[]"
        );
        assert_eq!(
            type_name(&current, &array_of(int32(), 1), true, false),
            "int32[]"
        );
    }

    #[test]
    fn generic_arguments_render_recursively() {
        let current = test_assembly();
        let mut list = create_type(6, "System.Collections.Generic", "List`1", &corlib());
        list.generic_args = vec![int32()];
        assert_eq!(
            type_name(&current, &list, true, false),
            "[mscorlib]System.Collections.Generic.List`1<int32>"
        );
    }

    #[test]
    fn identifier_only_for_foreign_classes() {
        let current = test_assembly();
        let console = create_type(7, "System", "Console", &corlib());
        assert_eq!(type_identifier(Some(&current), &console, true), "class ");

        let local = create_type(8, "ILDisassembler.Test", "Helper", &current);
        assert_eq!(type_identifier(Some(&current), &local, true), "");
    }

    #[test]
    fn identifier_suppressed_for_special_types() {
        let current = test_assembly();
        for name in ["Object", "String", "Void", "ValueType"] {
            let ty = create_type(9, "System", name, &corlib());
            assert_eq!(type_identifier(Some(&current), &ty, true), "");
        }
    }

    #[test]
    fn identifier_suppressed_for_value_types() {
        let current = test_assembly();
        assert_eq!(type_identifier(Some(&current), &int32(), true), "");
    }

    #[test]
    fn generic_param_tokens() {
        let current = test_assembly();
        let param = GenericParam {
            name: "T".to_string(),
            flags: GenericParamAttributes::DEFAULT_CONSTRUCTOR_CONSTRAINT
                | GenericParamAttributes::COVARIANT,
            constraints: Vec::new(),
        };
        assert_eq!(generic_param_text(&current, &param), ".ctor + T");
    }

    #[test]
    fn generic_param_constraints() {
        let current = test_assembly();
        let comparable = Arc::new({
            let mut ty = create_type(10, "System", "IComparable", &corlib());
            ty.flags |= crate::metadata::typesystem::TypeAttributes::INTERFACE;
            ty
        });
        let param = GenericParam {
            name: "T".to_string(),
            flags: GenericParamAttributes::empty(),
            constraints: vec![comparable],
        };
        assert_eq!(
            generic_param_text(&current, &param),
            "(class [mscorlib]System.IComparable) T"
        );
    }

    #[test]
    fn reserved_parameter_names_are_quoted() {
        assert_eq!(param_name("value"), "'value'");
        assert_eq!(param_name("object"), "'object'");
        assert_eq!(param_name("method"), "'method'");
        assert_eq!(param_name("count"), "count");
    }

    #[test]
    fn compiler_generated_names_are_quoted() {
        assert_eq!(member_name("<Main>b__0", true), "'<Main>b__0'");
        assert_eq!(member_name("Main", false), "Main");
    }
}
