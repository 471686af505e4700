//! Method entities, implementation flags and exception-handling clauses.
//!
//! Mirrors the shape of the MethodDef row and the method-body header: flag
//! words split into logical groups, the raw IL stream, locals, and the flat
//! exception-clause table the region reconstructor consumes.

use bitflags::bitflags;

use crate::metadata::{
    members::{CustomAttribute, ParamRc},
    token::Token,
    typesystem::{CilTypeRc, CilTypeRef, GenericParam},
};

/// Reference counted [`Method`]
pub type MethodRc = std::sync::Arc<Method>;

/// Reference counted [`LocalVariable`]
pub type LocalVariableRc = std::sync::Arc<LocalVariable>;

/// Bitmask for `CODE_TYPE` extraction
pub const METHOD_IMPL_CODE_TYPE_MASK: u32 = 0x0003;
/// Bitmask for `MANAGED` state extraction
pub const METHOD_IMPL_MANAGED_MASK: u32 = 0x0004;
/// Bitmask for `ACCESS` state extraction
pub const METHOD_ACCESS_MASK: u32 = 0x0007;
/// Bitmask for `VTABLE_LAYOUT` information extraction
pub const METHOD_VTABLE_LAYOUT_MASK: u32 = 0x0100;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    /// Method implementation code type flags
    pub struct MethodImplCodeType: u32 {
        /// Method impl is IL
        const IL = 0x0000;
        /// Method impl is native
        const NATIVE = 0x0001;
        /// Method impl is OPTIL
        const OPTIL = 0x0002;
        /// Method impl is provided by the runtime
        const RUNTIME = 0x0003;
    }
}

impl MethodImplCodeType {
    /// Extract code type from raw implementation flags
    #[must_use]
    pub fn from_impl_flags(flags: u32) -> Self {
        Self::from_bits_truncate(flags & METHOD_IMPL_CODE_TYPE_MASK)
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    /// Method implementation management flags
    pub struct MethodImplManagement: u32 {
        /// Method impl is unmanaged, otherwise managed
        const UNMANAGED = 0x0004;
    }
}

impl MethodImplManagement {
    /// Extract management type from raw implementation flags
    #[must_use]
    pub fn from_impl_flags(flags: u32) -> Self {
        Self::from_bits_truncate(flags & METHOD_IMPL_MANAGED_MASK)
    }

    /// True if the managed bit is set (the unmanaged bit is clear)
    #[must_use]
    pub fn is_managed(&self) -> bool {
        !self.contains(MethodImplManagement::UNMANAGED)
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    /// Method access flags
    pub struct MethodAccessFlags: u32 {
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

impl MethodAccessFlags {
    /// Extract access flags from raw method attributes
    #[must_use]
    pub fn from_method_flags(flags: u32) -> Self {
        Self::from_bits_truncate(flags & METHOD_ACCESS_MASK)
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
    /// Method vtable layout flags
    pub struct MethodVtableFlags: u32 {
        /// Method reuses existing slot in vtable
        const REUSE_SLOT = 0x0000;
        /// Method always gets a new slot in the vtable
        const NEW_SLOT = 0x0100;
    }
}

impl MethodVtableFlags {
    /// Extract vtable layout flags from raw method attributes
    #[must_use]
    pub fn from_method_flags(flags: u32) -> Self {
        Self::from_bits_truncate(flags & METHOD_VTABLE_LAYOUT_MASK)
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    /// Method modifiers and properties
    pub struct MethodModifiers: u32 {
        /// Reserved: shall be zero for conforming implementations
        const UNMANAGED_EXPORT = 0x0008;
        /// Defined on type, else per instance
        const STATIC = 0x0010;
        /// Method cannot be overridden
        const FINAL = 0x0020;
        /// Method is virtual
        const VIRTUAL = 0x0040;
        /// Method hides by name+sig, else just by name
        const HIDE_BY_SIG = 0x0080;
        /// Method can only be overriden if also accessible
        const CHECK_ACCESS_ON_OVERRIDE = 0x0200;
        /// Method does not provide an implementation
        const ABSTRACT = 0x0400;
        /// Method is special
        const SPECIAL_NAME = 0x0800;
        /// CLI provides 'special' behavior, depending upon the name of the method
        const RTSPECIAL_NAME = 0x1000;
        /// Implementation is forwarded through PInvoke
        const PINVOKE_IMPL = 0x2000;
        /// Method has security associated with it
        const HAS_SECURITY = 0x4000;
        /// Method calls another method containing security code
        const REQUIRE_SEC_OBJECT = 0x8000;
    }
}

impl MethodModifiers {
    /// Extract method modifiers from raw method attributes
    #[must_use]
    pub fn from_method_flags(flags: u32) -> Self {
        Self::from_bits_truncate(flags & !METHOD_ACCESS_MASK & !METHOD_VTABLE_LAYOUT_MASK)
    }
}

/// A local variable slot of a method body.
pub struct LocalVariable {
    /// Zero-based slot index; labels render as `V_<index>`
    pub index: u16,
    /// The type of this variable
    pub base: CilTypeRc,
    /// This variable is pinned
    pub is_pinned: bool,
}

bitflags! {
    /// Exception handler flags defining the type of exception handling clause.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ExceptionHandlerFlags: u16 {
        /// A typed exception clause
        const EXCEPTION = 0x0000;
        /// An exception filter and handler clause
        const FILTER = 0x0001;
        /// A finally clause
        const FINALLY = 0x0002;
        /// A fault clause (finally that executes only on exception)
        const FAULT = 0x0004;
    }
}

/// One row of a method's flat exception-clause table.
///
/// Each clause names a protected region (the try block) and the location of
/// its handler; filter clauses additionally carry the offset of the filter
/// expression. The region reconstructor turns these flat spans back into
/// nested `.try` / `catch` / `filter` / `finally` blocks.
pub struct ExceptionHandler {
    /// Flags describing the type of exception handler (catch, filter, finally, fault)
    pub flags: ExceptionHandlerFlags,
    /// Offset in bytes of try block from start of method body
    pub try_offset: u32,
    /// Length in bytes of the try block
    pub try_length: u32,
    /// Location of the handler for this try block
    pub handler_offset: u32,
    /// Size of the handler code in bytes
    pub handler_length: u32,
    /// If flags == EXCEPTION, the type this handler catches
    pub handler: Option<CilTypeRc>,
    /// Offset in method body of the filter expression, for filter clauses
    pub filter_offset: u32,
}

/// The IL body of a method.
///
/// `code: None` models a body whose raw bytes could not be obtained; the
/// decoder reports that as [`crate::Error::CannotReadIL`].
pub struct MethodBody {
    /// The raw IL stream
    pub code: Option<Vec<u8>>,
    /// Maximum evaluation stack depth
    pub max_stack: u16,
    /// True if locals are zero-initialized (`.locals init`)
    pub init_locals: bool,
    /// Local variable slots, ordered by index
    pub local_vars: Vec<LocalVariableRc>,
    /// The flat exception-clause table
    pub exception_handlers: Vec<ExceptionHandler>,
}

/// A resolved method with everything the disassembler needs.
pub struct Method {
    /// The metadata token of this method
    pub token: Token,
    /// The method name; `.ctor` / `.cctor` for constructors
    pub name: String,
    /// Access flags extracted from the attribute word
    pub flags_access: MethodAccessFlags,
    /// Vtable layout extracted from the attribute word
    pub flags_vtable: MethodVtableFlags,
    /// Remaining modifiers extracted from the attribute word
    pub flags_modifiers: MethodModifiers,
    /// Implementation code type (IL, native, runtime)
    pub impl_code_type: MethodImplCodeType,
    /// Implementation management (managed / unmanaged)
    pub impl_management: MethodImplManagement,
    /// The type this method is declared by
    pub declared_by: CilTypeRef,
    /// The return type; `System.Void` for void methods
    pub return_type: CilTypeRc,
    /// Explicit parameters, in signature order (no receiver slot)
    pub params: Vec<ParamRc>,
    /// Generic parameters declared by a generic method definition
    pub generic_params: Vec<GenericParam>,
    /// Generic arguments of an instantiated generic method
    pub generic_args: Vec<CilTypeRc>,
    /// Custom attributes attached to this method
    pub custom_attributes: Vec<CustomAttribute>,
    /// True if the name stems from a compiler-generated member
    pub compiler_generated: bool,
    /// The IL body, if the method has one
    pub body: Option<MethodBody>,
}

impl Method {
    /// True if the method has no `this` receiver
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.flags_modifiers.contains(MethodModifiers::STATIC)
    }

    /// True if the method is virtual
    #[must_use]
    pub fn is_virtual(&self) -> bool {
        self.flags_modifiers.contains(MethodModifiers::VIRTUAL)
    }

    /// True for instance and type constructors
    #[must_use]
    pub fn is_constructor(&self) -> bool {
        self.name == ".ctor" || self.name == ".cctor"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn impl_flag_extraction() {
        // Raw impl flags of a plain managed IL method
        let code_type = MethodImplCodeType::from_impl_flags(0x0000);
        assert_eq!(code_type, MethodImplCodeType::IL);

        let management = MethodImplManagement::from_impl_flags(0x0000);
        assert!(management.is_managed());

        let unmanaged = MethodImplManagement::from_impl_flags(0x0004);
        assert!(!unmanaged.is_managed());

        let runtime = MethodImplCodeType::from_impl_flags(0x0003);
        assert_eq!(runtime, MethodImplCodeType::RUNTIME);
    }

    #[test]
    fn attribute_splitting() {
        // public hidebysig static
        let raw = 0x0096;
        assert_eq!(
            MethodAccessFlags::from_method_flags(raw),
            MethodAccessFlags::PUBLIC
        );
        let modifiers = MethodModifiers::from_method_flags(raw);
        assert!(modifiers.contains(MethodModifiers::STATIC));
        assert!(modifiers.contains(MethodModifiers::HIDE_BY_SIG));
        assert!(!modifiers.contains(MethodModifiers::VIRTUAL));
    }

    #[test]
    fn access_keywords() {
        assert_eq!(MethodAccessFlags::PUBLIC.keyword(), Some("public"));
        assert_eq!(MethodAccessFlags::FAM_OR_ASSEM.keyword(), Some("famorassem"));
        assert_eq!(MethodAccessFlags::COMPILER_CONTROLLED.keyword(), None);
    }

    #[test]
    fn vtable_extraction() {
        let flags = MethodVtableFlags::from_method_flags(0x01C0);
        assert!(flags.contains(MethodVtableFlags::NEW_SLOT));
    }
}
