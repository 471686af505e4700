//! Type entities consumed by the disassembler.
//!
//! The disassembler never parses metadata tables itself; a metadata provider
//! hands it fully resolved [`CilType`] entities. Types own their member lists
//! and reference each other through [`CilTypeRef`] weak references, which
//! breaks the declaring-type cycles without leaking.

use std::sync::{Arc, Weak};

use bitflags::bitflags;

use crate::metadata::{
    members::{EventRc, FieldRc, PropertyRc},
    method::MethodRc,
    token::Token,
};

/// Reference counted [`CilType`]
pub type CilTypeRc = Arc<CilType>;

/// Identity of the assembly a type lives in.
///
/// Only the textual identity matters to the disassembler: member references
/// into a different assembly are prefixed with `[short-name]`, where the
/// short name is the first comma-separated field of the full display name.
#[derive(Debug, PartialEq, Eq)]
pub struct AssemblyName {
    /// The full display name, e.g. `mscorlib, Version=4.0.0.0, Culture=neutral`
    pub full_name: String,
}

impl AssemblyName {
    /// Create a new assembly identity from its full display name
    #[must_use]
    pub fn new(full_name: &str) -> Self {
        AssemblyName {
            full_name: full_name.to_string(),
        }
    }

    /// The simple name, i.e. everything before the first comma
    #[must_use]
    pub fn short_name(&self) -> &str {
        match self.full_name.find(',') {
            Some(pos) => &self.full_name[..pos],
            None => &self.full_name,
        }
    }
}

/// Bitmask for visibility extraction
pub const TYPE_VISIBILITY_MASK: u32 = 0x0000_0007;
/// Bitmask for class layout extraction
pub const TYPE_LAYOUT_MASK: u32 = 0x0000_0018;
/// Bitmask for string format extraction
pub const TYPE_STRING_FORMAT_MASK: u32 = 0x0003_0000;

bitflags! {
    /// Type attribute flags as stored in the TypeDef table (ECMA-335 II.23.1.15)
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct TypeAttributes: u32 {
        /// Type is visible outside the assembly
        const PUBLIC = 0x0000_0001;
        /// Fields are laid out sequentially
        const SEQUENTIAL_LAYOUT = 0x0000_0008;
        /// Field layout is supplied explicitly
        const EXPLICIT_LAYOUT = 0x0000_0010;
        /// Type is an interface
        const INTERFACE = 0x0000_0020;
        /// Type cannot be instantiated
        const ABSTRACT = 0x0000_0080;
        /// Type cannot be extended
        const SEALED = 0x0000_0100;
        /// Type name is special
        const SPECIAL_NAME = 0x0000_0400;
        /// Strings marshal as UTF-16
        const UNICODE_CLASS = 0x0001_0000;
        /// String marshalling is platform dependent
        const AUTO_CLASS = 0x0002_0000;
        /// Type initializer runs lazily
        const BEFORE_FIELD_INIT = 0x0010_0000;
        /// CLI provides special behavior depending on the type name
        const RT_SPECIAL_NAME = 0x0000_0800;
    }
}

impl TypeAttributes {
    /// True if the type is visible outside its assembly
    #[must_use]
    pub fn is_public(&self) -> bool {
        self.bits() & TYPE_VISIBILITY_MASK == TypeAttributes::PUBLIC.bits()
    }

    /// The layout keyword for this type: `auto`, `sequential` or `explicit`
    #[must_use]
    pub fn layout(&self) -> &'static str {
        match self.bits() & TYPE_LAYOUT_MASK {
            0x08 => "sequential",
            0x10 => "explicit",
            _ => "auto",
        }
    }

    /// True if strings marshal as ANSI (the default string format)
    #[must_use]
    pub fn is_ansi_class(&self) -> bool {
        self.bits() & TYPE_STRING_FORMAT_MASK == 0
    }
}

bitflags! {
    /// Variance and constraint flags of a generic parameter (ECMA-335 II.23.1.7)
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct GenericParamAttributes: u32 {
        /// Parameter is covariant
        const COVARIANT = 0x0001;
        /// Parameter is contravariant
        const CONTRAVARIANT = 0x0002;
        /// Parameter is constrained to reference types
        const REFERENCE_TYPE_CONSTRAINT = 0x0004;
        /// Parameter is constrained to non-nullable value types
        const NOT_NULLABLE_VALUE_TYPE_CONSTRAINT = 0x0008;
        /// Parameter must have a parameterless constructor
        const DEFAULT_CONSTRUCTOR_CONSTRAINT = 0x0010;
    }
}

/// A generic parameter declared by a type or method.
pub struct GenericParam {
    /// The display name, e.g. `T`
    pub name: String,
    /// Variance and special constraint flags
    pub flags: GenericParamAttributes,
    /// Types this parameter is constrained to
    pub constraints: Vec<CilTypeRc>,
}

/// Weak reference to a [`CilType`], used for declaring-type back references.
///
/// Members are owned by their declaring type; pointing back with a strong
/// reference would form a cycle, so back references upgrade on demand.
#[derive(Clone)]
pub struct CilTypeRef(Weak<CilType>);

impl CilTypeRef {
    /// Create a reference from a weak handle, typically inside
    /// [`Arc::new_cyclic`] while the declaring type is under construction
    #[must_use]
    pub fn new(weak: Weak<CilType>) -> Self {
        CilTypeRef(weak)
    }

    /// Attempt to upgrade to a strong reference
    #[must_use]
    pub fn upgrade(&self) -> Option<CilTypeRc> {
        self.0.upgrade()
    }
}

impl From<&CilTypeRc> for CilTypeRef {
    fn from(rc: &CilTypeRc) -> Self {
        CilTypeRef(Arc::downgrade(rc))
    }
}

/// A resolved type with everything the disassembler needs to render it.
///
/// Arrays carry their element type and rank; managed-reference ("byref")
/// forms carry the reflection-style `&` suffix in their name. Generic
/// instantiations list their arguments, generic definitions their
/// parameters.
pub struct CilType {
    /// The metadata token of this type
    pub token: Token,
    /// The simple name, including any generic arity suffix, e.g. `List`1`
    pub name: String,
    /// The namespace; empty for global types
    pub namespace: String,
    /// The assembly this type is defined in
    pub assembly: Arc<AssemblyName>,
    /// Raw TypeDef attribute flags
    pub flags: TypeAttributes,
    /// The base type; `None` for interfaces and `System.Object` itself
    pub base: Option<CilTypeRc>,
    /// Interfaces this type implements, in metadata order
    pub interfaces: Vec<CilTypeRc>,
    /// The element type for arrays
    pub element: Option<CilTypeRc>,
    /// Array rank; 0 for non-array types
    pub rank: u32,
    /// True for value types (structs and enums)
    pub is_value_type: bool,
    /// True for enums
    pub is_enum: bool,
    /// The underlying primitive of an enum
    pub underlying: Option<CilTypeRc>,
    /// True if this is a generic type parameter (`T`), not a real type
    pub is_generic_parameter: bool,
    /// Generic arguments of an instantiated generic type
    pub generic_args: Vec<CilTypeRc>,
    /// Generic parameters declared by a generic type definition
    pub generic_params: Vec<GenericParam>,
    /// Fields declared by this type, in metadata order
    pub fields: Vec<FieldRc>,
    /// Methods (including constructors) declared by this type
    pub methods: Vec<MethodRc>,
    /// Properties declared by this type
    pub properties: Vec<PropertyRc>,
    /// Events declared by this type
    pub events: Vec<EventRc>,
    /// Custom attributes attached to this type
    pub custom_attributes: Vec<crate::metadata::members::CustomAttribute>,
}

impl CilType {
    /// The namespace-qualified name, e.g. `System.Collections.IList`
    #[must_use]
    pub fn fullname(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.namespace, self.name)
        }
    }

    /// True if this type is an array
    #[must_use]
    pub fn is_array(&self) -> bool {
        self.rank > 0 && self.element.is_some()
    }

    /// True if this type is an interface
    #[must_use]
    pub fn is_interface(&self) -> bool {
        self.flags.contains(TypeAttributes::INTERFACE)
    }

    /// True if this type is a class (neither interface nor value type)
    #[must_use]
    pub fn is_class(&self) -> bool {
        !self.is_interface() && !self.is_value_type
    }

    /// True if this type carries generic arguments or parameters
    #[must_use]
    pub fn is_generic(&self) -> bool {
        !self.generic_args.is_empty() || !self.generic_params.is_empty()
    }
}
