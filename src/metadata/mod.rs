//! Metadata entities and the provider contract.
//!
//! The disassembler consumes fully resolved entities: types, methods with
//! their IL bodies, fields, properties, events and parameters. How those
//! entities come into existence (a native metadata parser, a reflection
//! bridge, a hand-built fixture) is the metadata provider's business.

pub mod members;
pub mod method;
pub mod provider;

/// Metadata token types used to reference entities within an assembly.
pub mod token;
pub mod typesystem;

pub use members::{
    ConstantValue, CustomAttribute, Event, EventRc, Field, FieldAccessFlags, FieldModifiers,
    FieldRc, Param, ParamAttributes, ParamRc, Property, PropertyRc,
};
pub use method::{
    ExceptionHandler, ExceptionHandlerFlags, LocalVariable, LocalVariableRc, Method,
    MethodAccessFlags, MethodBody, MethodImplCodeType, MethodImplManagement, MethodModifiers,
    MethodRc, MethodVtableFlags,
};
pub use provider::{CilMember, MetadataProvider, SignatureRc, StandAloneSignature};
pub use token::Token;
pub use typesystem::{
    AssemblyName, CilType, CilTypeRc, CilTypeRef, GenericParam, GenericParamAttributes,
    TypeAttributes,
};
