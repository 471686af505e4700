//! The metadata-provider contract.
//!
//! The disassembler core is deliberately decoupled from any particular
//! metadata reader: anything that can resolve the tokens embedded in an IL
//! stream into [entities](crate::metadata) can drive it, whether that is a
//! native ECMA-335 table parser or a reflection facade.

use std::sync::Arc;

use crate::{
    metadata::{members::FieldRc, method::MethodRc, token::Token, typesystem::CilTypeRc},
    Result,
};

/// Reference counted [`StandAloneSignature`]
pub type SignatureRc = Arc<StandAloneSignature>;

/// A stand-alone signature referenced by a `calli` instruction.
///
/// The signature blob itself stays opaque to the disassembler; only the
/// token identity is rendered.
pub struct StandAloneSignature {
    /// The metadata token of this signature
    pub token: Token,
}

/// A member resolved from an inline metadata token.
///
/// `ldtoken` can reference any of the three variants; `call`-family and
/// field instructions resolve to their respective variant only.
pub enum CilMember {
    /// A type reference
    Type(CilTypeRc),
    /// A method or constructor reference
    Method(MethodRc),
    /// A field reference
    Field(FieldRc),
}

/// Resolves metadata tokens embedded in IL streams.
///
/// Borrowed read-only for the duration of a disassembly call. Implementations
/// report unresolvable tokens as [`crate::Error::TokenResolution`]; the
/// decoder propagates that error transparently.
pub trait MetadataProvider {
    /// Resolve a type, method or field token.
    ///
    /// The generic arguments of the referencing method's declaring type and
    /// of the method itself are passed along so that token resolution can
    /// instantiate generic signatures.
    ///
    /// # Errors
    /// Returns [`crate::Error::TokenResolution`] if the token does not name
    /// a resolvable member.
    fn resolve_member(
        &self,
        token: Token,
        type_generics: &[CilTypeRc],
        method_generics: &[CilTypeRc],
    ) -> Result<CilMember>;

    /// Resolve a user-string token.
    ///
    /// # Errors
    /// Returns [`crate::Error::TokenResolution`] if the token does not name
    /// a string in the `#US` heap.
    fn resolve_string(&self, token: Token) -> Result<String>;

    /// Resolve a stand-alone signature token.
    ///
    /// # Errors
    /// Returns [`crate::Error::TokenResolution`] if the token does not name
    /// a stand-alone signature.
    fn resolve_signature(&self, token: Token) -> Result<SignatureRc>;
}
