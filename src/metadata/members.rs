//! Field, property, event and parameter entities.

use std::sync::Arc;

use bitflags::bitflags;

use crate::metadata::{
    method::MethodRc,
    token::Token,
    typesystem::{CilTypeRc, CilTypeRef},
};

/// Reference counted [`Field`]
pub type FieldRc = Arc<Field>;
/// Reference counted [`Property`]
pub type PropertyRc = Arc<Property>;
/// Reference counted [`Event`]
pub type EventRc = Arc<Event>;
/// Reference counted [`Param`]
pub type ParamRc = Arc<Param>;

/// Bitmask for field access extraction
pub const FIELD_ACCESS_MASK: u32 = 0x0007;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    /// Field access flags
    pub struct FieldAccessFlags: u32 {
        /// Member not referenceable
        const COMPILER_CONTROLLED = 0x0000;
        /// Accessible only by the parent type
        const PRIVATE = 0x0001;
        /// Accessible by sub-types only in this Assembly
        const FAM_AND_ASSEM = 0x0002;
        /// Accessibly by anyone in the Assembly
        const ASSEM = 0x0003;
        /// Accessible only by type and sub-types
        const FAMILY = 0x0004;
        /// Accessibly by sub-types anywhere, plus anyone in assembly
        const FAM_OR_ASSEM = 0x0005;
        /// Accessibly by anyone who has visibility to this scope
        const PUBLIC = 0x0006;
    }
}

impl FieldAccessFlags {
    /// Extract access flags from raw field attributes
    #[must_use]
    pub fn from_field_flags(flags: u32) -> Self {
        Self::from_bits_truncate(flags & FIELD_ACCESS_MASK)
    }

    /// The lowercase keyword for this access level, `None` for privatescope
    #[must_use]
    pub fn keyword(&self) -> Option<&'static str> {
        match self.bits() {
            0x1 => Some("private"),
            0x2 => Some("famandassem"),
            0x3 => Some("assembly"),
            0x4 => Some("family"),
            0x5 => Some("famorassem"),
            0x6 => Some("public"),
            _ => None,
        }
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    /// Field modifiers and properties
    pub struct FieldModifiers: u32 {
        /// Defined on type, else per instance
        const STATIC = 0x0010;
        /// Field can only be initialized, not written after init
        const INIT_ONLY = 0x0020;
        /// Value is a compile-time constant
        const LITERAL = 0x0040;
        /// Field does not have to be serialized when the type is remoted
        const NOT_SERIALIZED = 0x0080;
        /// Field is special
        const SPECIAL_NAME = 0x0200;
        /// Implementation is forwarded through PInvoke
        const PINVOKE_IMPL = 0x2000;
        /// CLI provides 'special' behavior, depending upon the name of the field
        const RTSPECIAL_NAME = 0x0400;
    }
}

impl FieldModifiers {
    /// Extract field modifiers from raw field attributes.
    ///
    /// The reserved bookkeeping bits (HasDefault, HasFieldRVA, HasFieldMarshal)
    /// have no keyword in the assembly syntax and are masked away.
    #[must_use]
    pub fn from_field_flags(flags: u32) -> Self {
        Self::from_bits_truncate(flags & !FIELD_ACCESS_MASK)
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    /// Parameter attribute flags
    pub struct ParamAttributes: u32 {
        /// Parameter is an input
        const IN = 0x0001;
        /// Parameter is an output
        const OUT = 0x0002;
        /// Parameter is optional
        const OPTIONAL = 0x0010;
        /// Parameter has a default value
        const HAS_DEFAULT = 0x1000;
    }
}

/// A compile-time constant: a parameter default or a literal field value.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstantValue {
    /// A string constant
    String(String),
    /// Signed 8-bit constant
    I1(i8),
    /// Unsigned 8-bit constant
    U1(u8),
    /// Signed 16-bit constant
    I2(i16),
    /// Unsigned 16-bit constant
    U2(u16),
    /// Signed 32-bit constant
    I4(i32),
    /// Unsigned 32-bit constant
    U4(u32),
    /// Signed 64-bit constant
    I8(i64),
    /// Unsigned 64-bit constant
    U8(u64),
    /// 32-bit floating point constant
    F4(f32),
    /// 64-bit floating point constant
    F8(f64),
    /// Boolean constant
    Bool(bool),
    /// Character constant
    Char(char),
    /// A null reference
    Null,
}

/// A custom attribute attached to a type or member.
///
/// The constructor blob is carried verbatim; the disassembler renders it as
/// a hex dump without decoding the constructor arguments.
pub struct CustomAttribute {
    /// The attribute's constructor
    pub constructor: MethodRc,
    /// The raw value blob, prologue included
    pub data: Vec<u8>,
}

/// A method parameter.
pub struct Param {
    /// Zero-based position among the explicit parameters
    pub position: u16,
    /// The parameter name
    pub name: String,
    /// The parameter type
    pub base: CilTypeRc,
    /// Attribute flags
    pub flags: ParamAttributes,
    /// Default value, for optional parameters
    pub default: Option<ConstantValue>,
}

/// A resolved field.
pub struct Field {
    /// The metadata token of this field
    pub token: Token,
    /// The field name
    pub name: String,
    /// Access flags extracted from the attribute word
    pub flags_access: FieldAccessFlags,
    /// Remaining modifiers extracted from the attribute word
    pub flags_modifiers: FieldModifiers,
    /// The field type
    pub base: CilTypeRc,
    /// The type this field is declared by
    pub declared_by: CilTypeRef,
    /// Constant value of a literal field
    pub literal: Option<ConstantValue>,
    /// Custom attributes attached to this field
    pub custom_attributes: Vec<CustomAttribute>,
    /// True if the name stems from a compiler-generated member
    pub compiler_generated: bool,
}

/// A resolved property with its accessor methods.
pub struct Property {
    /// The metadata token of this property
    pub token: Token,
    /// The property name
    pub name: String,
    /// The property type
    pub base: CilTypeRc,
    /// The type this property is declared by
    pub declared_by: CilTypeRef,
    /// The `get_` accessor, if any
    pub getter: Option<MethodRc>,
    /// The `set_` accessor, if any
    pub setter: Option<MethodRc>,
    /// Custom attributes attached to this property
    pub custom_attributes: Vec<CustomAttribute>,
}

/// A resolved event with its add/remove accessors.
pub struct Event {
    /// The metadata token of this event
    pub token: Token,
    /// The event name
    pub name: String,
    /// The delegate type of this event
    pub handler_type: CilTypeRc,
    /// The type this event is declared by
    pub declared_by: CilTypeRef,
    /// The `add_` accessor, if any
    pub add_method: Option<MethodRc>,
    /// The `remove_` accessor, if any
    pub remove_method: Option<MethodRc>,
    /// Custom attributes attached to this event
    pub custom_attributes: Vec<CustomAttribute>,
}
