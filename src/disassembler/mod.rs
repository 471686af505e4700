//! Disassembly into the canonical CIL assembly syntax.
//!
//! The emitters in this module turn decoded instruction streams and metadata
//! entities into ilasm-style text: the `.class` header, field / property /
//! event directives, and full method listings with locals, aligned operand
//! columns and reconstructed exception regions.
//!
//! # Example
//!
//! ```rust,ignore
//! use cildasm::disassembler::Disassembler;
//!
//! let disassembler = Disassembler::new(&provider);
//! let listing = disassembler.disassemble(&my_type)?;
//! println!("{}", listing.header);
//! for method in &listing.methods {
//!     println!("{method}");
//! }
//! ```

mod instruction;
mod members;
mod method;
mod naming;
mod regions;
mod writer;

pub use writer::IndentedWriter;

use crate::{
    disassembler::naming::generic_params_text,
    metadata::{
        members::{Event, Field, Property},
        method::{Method, MethodImplCodeType},
        provider::MetadataProvider,
        typesystem::{CilType, CilTypeRc, TypeAttributes},
    },
    Result,
};

/// A fully rendered type: the header plus every member listing, in the
/// order the metadata declares them. Immutable after construction.
pub struct DisassembledType {
    /// The type this listing was produced from
    pub cil_type: CilTypeRc,
    /// The `.class` header block
    pub header: String,
    /// Rendered `.field` directives
    pub fields: Vec<String>,
    /// Rendered `.property` blocks
    pub properties: Vec<String>,
    /// Rendered `.event` blocks
    pub events: Vec<String>,
    /// Rendered method listings
    pub methods: Vec<String>,
}

/// Disassembles types and members against a metadata provider.
///
/// The provider is borrowed read-only for the lifetime of the disassembler;
/// independent instances never share mutable state, so callers are free to
/// disassemble different types in parallel.
pub struct Disassembler<'a> {
    provider: &'a dyn MetadataProvider,
}

impl<'a> Disassembler<'a> {
    /// Create a disassembler over `provider`
    #[must_use]
    pub fn new(provider: &'a dyn MetadataProvider) -> Self {
        Disassembler { provider }
    }

    /// Render the `.class` header block of a type.
    #[must_use]
    pub fn disassemble_type_header(&self, ty: &CilType) -> String {
        format_type_header(ty)
    }

    /// Render a complete method listing.
    ///
    /// # Errors
    /// Propagates decoder failures; see [`crate::assembly::decode_method`].
    pub fn disassemble_method(&self, method: &Method) -> Result<String> {
        method::format_method(method, self.provider)
    }

    /// Render a `.field` directive.
    #[must_use]
    pub fn disassemble_field(&self, field: &Field) -> String {
        members::format_field(field)
    }

    /// Render a `.property` block.
    #[must_use]
    pub fn disassemble_property(&self, property: &Property) -> String {
        members::format_property(property)
    }

    /// Render an `.event` block.
    #[must_use]
    pub fn disassemble_event(&self, event: &Event) -> String {
        members::format_event(event)
    }

    /// Disassemble a type and everything it declares.
    ///
    /// Members render in metadata order. Methods are included only when
    /// their implementation is IL or runtime-provided and they are declared
    /// by `ty` itself, so inherited members never appear.
    ///
    /// # Errors
    /// Propagates the first method-body decoding failure.
    pub fn disassemble(&self, ty: &CilTypeRc) -> Result<DisassembledType> {
        let header = format_type_header(ty);

        let fields = ty.fields.iter().map(|field| members::format_field(field)).collect();
        let properties = ty
            .properties
            .iter()
            .map(|property| members::format_property(property))
            .collect();
        let events = ty.events.iter().map(|event| members::format_event(event)).collect();

        let mut methods = Vec::new();
        for method in &ty.methods {
            if method.impl_code_type != MethodImplCodeType::IL
                && method.impl_code_type != MethodImplCodeType::RUNTIME
            {
                continue;
            }
            let declared_here = method
                .declared_by
                .upgrade()
                .is_some_and(|declaring| declaring.token == ty.token);
            if !declared_here {
                continue;
            }
            methods.push(method::format_method(method, self.provider)?);
        }

        Ok(DisassembledType {
            cil_type: ty.clone(),
            header,
            fields,
            properties,
            events,
            methods,
        })
    }
}

/// Render the `.class` header: attribute tokens, name, base type and
/// implemented interfaces, closed by an empty brace pair.
fn format_type_header(ty: &CilType) -> String {
    let current = &ty.assembly;

    let mut tokens: Vec<&str> = vec![".class"];
    if ty.is_enum {
        tokens.push("enum");
    } else if ty.is_value_type {
        tokens.push("value");
    }
    if ty.is_interface() {
        tokens.push("interface");
    }
    tokens.push(if ty.flags.is_public() { "public" } else { "private" });
    tokens.push(ty.flags.layout());
    if ty.flags.is_ansi_class() {
        tokens.push("ansi");
    }
    if ty.flags.contains(TypeAttributes::ABSTRACT) {
        tokens.push("abstract");
    }
    if ty.flags.contains(TypeAttributes::SEALED) {
        tokens.push("sealed");
    }
    if ty.flags.contains(TypeAttributes::BEFORE_FIELD_INIT) {
        tokens.push("beforefieldinit");
    }

    let mut writer = IndentedWriter::new(7);
    writer.append_line(&format!(
        "{} {}{}",
        tokens.join(" "),
        ty.fullname(),
        generic_params_text(current, &ty.generic_params)
    ));
    writer.indent();

    if !ty.is_interface() {
        if let Some(base) = &ty.base {
            writer.append_line(&format!(
                "extends {}",
                naming::type_name(current, base, false, false)
            ));
        }
    }
    if !ty.interfaces.is_empty() {
        let interfaces: Vec<String> = ty
            .interfaces
            .iter()
            .map(|interface| naming::type_name(current, interface, false, false))
            .collect();
        writer.append_line(&format!("implements {}", interfaces.join(", ")));
    }

    writer.unindent();
    writer.append_line("{");
    writer.append_line("}");
    writer.into_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::typesystem::{GenericParam, GenericParamAttributes};
    use crate::test::{corlib, create_type, test_assembly};
    use std::sync::Arc;

    #[test]
    fn plain_class_header() {
        let current = test_assembly();
        let mut ty = create_type(1, "ILDisassembler.Test", "HelloWorldProgram", &current);
        ty.base = Some(Arc::new(create_type(2, "System", "Object", &corlib())));

        assert_eq!(
            format_type_header(&ty),
            ".class public auto ansi beforefieldinit ILDisassembler.Test.HelloWorldProgram\n\
             \x20      extends [mscorlib]System.Object\n\
             {\n\
             }"
        );
    }

    #[test]
    fn bare_interface_header() {
        let current = test_assembly();
        let mut ty = create_type(3, "ILDisassembler.Test", "ITalkable", &current);
        ty.flags = TypeAttributes::INTERFACE | TypeAttributes::ABSTRACT | TypeAttributes::PUBLIC;
        // interfaces never render an extends line
        ty.base = Some(Arc::new(create_type(4, "System", "Object", &corlib())));

        assert_eq!(
            format_type_header(&ty),
            ".class interface public auto ansi abstract ILDisassembler.Test.ITalkable\n\
             {\n\
             }"
        );
    }

    #[test]
    fn interface_with_bases_lists_implements() {
        let current = test_assembly();
        let corlib = corlib();
        let mut ty = create_type(5, "ILDisassembler.Test", "ICustomList", &current);
        ty.flags = TypeAttributes::INTERFACE | TypeAttributes::ABSTRACT | TypeAttributes::PUBLIC;
        ty.interfaces = vec![
            Arc::new(create_type(6, "System.Collections", "IList", &corlib)),
            Arc::new(create_type(7, "System.Collections", "ICollection", &corlib)),
            Arc::new(create_type(8, "System.Collections", "IEnumerable", &corlib)),
        ];

        let header = format_type_header(&ty);
        assert!(header.contains(
            "implements [mscorlib]System.Collections.IList, \
             [mscorlib]System.Collections.ICollection, \
             [mscorlib]System.Collections.IEnumerable"
        ));
    }

    #[test]
    fn value_type_header() {
        let current = test_assembly();
        let mut ty = create_type(9, "ILDisassembler.Test", "Point", &current);
        ty.is_value_type = true;
        ty.flags = TypeAttributes::from_bits_retain(0x0010_0109); // public sequential sealed beforefieldinit

        let header = format_type_header(&ty);
        assert!(header.starts_with(".class value public sequential ansi sealed beforefieldinit"));
    }

    #[test]
    fn enum_header() {
        let current = test_assembly();
        let mut ty = create_type(10, "ILDisassembler.Test", "Color", &current);
        ty.is_value_type = true;
        ty.is_enum = true;

        assert!(format_type_header(&ty).starts_with(".class enum public"));
    }

    #[test]
    fn generic_class_header() {
        let current = test_assembly();
        let mut ty = create_type(11, "ILDisassembler.Test", "Box`1", &current);
        ty.generic_params = vec![GenericParam {
            name: "T".to_string(),
            flags: GenericParamAttributes::empty(),
            constraints: Vec::new(),
        }];

        assert!(format_type_header(&ty)
            .starts_with(".class public auto ansi beforefieldinit ILDisassembler.Test.Box`1<T>"));
    }
}
