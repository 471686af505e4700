//! Convenient re-exports of the most commonly used types and traits.
//!
//! ```rust,ignore
//! use cildasm::prelude::*;
//!
//! let disassembler = Disassembler::new(&provider);
//! let listing = disassembler.disassemble(&my_type)?;
//! ```

/// The main error type for all disassembly operations
pub use crate::Error;

/// The result type used throughout the crate
pub use crate::Result;

/// Main entry point for disassembly
pub use crate::disassembler::{DisassembledType, Disassembler};

/// Low-level byte stream cursor
pub use crate::Parser;

/// The provider contract and token resolution results
pub use crate::metadata::{CilMember, MetadataProvider, SignatureRc, StandAloneSignature, Token};

/// Metadata entities
pub use crate::metadata::{
    AssemblyName, CilType, CilTypeRc, CilTypeRef, ConstantValue, CustomAttribute, Event, EventRc,
    ExceptionHandler, ExceptionHandlerFlags, Field, FieldRc, GenericParam, GenericParamAttributes,
    LocalVariable, LocalVariableRc, Method, MethodBody, MethodRc, Param, ParamRc, Property,
    PropertyRc, TypeAttributes,
};

/// Flag words split the way the metadata tables store them
pub use crate::metadata::{
    FieldAccessFlags, FieldModifiers, MethodAccessFlags, MethodImplCodeType, MethodImplManagement,
    MethodModifiers, MethodVtableFlags, ParamAttributes,
};

/// Instruction-level decoding
pub use crate::assembly::{
    decode_method, BranchTarget, Instruction, OpCode, Operand, OperandKind, INSTRUCTIONS,
    INSTRUCTIONS_FE,
};
