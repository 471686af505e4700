// Copyright 2026 cildasm contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![deny(missing_docs)]

//! # cildasm
//!
//! A disassembler for CIL (Common Intermediate Language, ECMA-335) method
//! bodies and type definitions, producing textual listings in the canonical
//! assembly syntax understood by the reference round-trip assembler.
//!
//! The crate decodes raw IL byte streams into typed instruction sequences,
//! reconstructs nested exception-handling regions from the flat clause
//! table, and renders type headers, fields, properties, events and complete
//! method bodies with aligned operand columns and stable `IL_xxxx` labels.
//!
//! # Architecture
//!
//! - [`crate::metadata`] - Resolved metadata entities and the
//!   [`crate::metadata::MetadataProvider`] contract that supplies them
//! - [`crate::assembly`] - Opcode tables, the instruction model and the
//!   method-body decoder
//! - [`crate::disassembler`] - The text emitters and the
//!   [`crate::disassembler::Disassembler`] entry point
//! - [`crate::Parser`] - Bounds-checked little-endian byte cursor
//! - [`crate::Error`] and [`crate::Result`] - Error handling
//!
//! Module loading, metadata-table parsing and file I/O are deliberately out
//! of scope: the disassembler consumes entities an external metadata
//! provider has already resolved, which keeps the core synchronous, free of
//! shared mutable state, and trivially parallelizable across types.
//!
//! # Usage
//!
//! ```rust,ignore
//! use cildasm::{Disassembler, MetadataProvider};
//!
//! let disassembler = Disassembler::new(&provider);
//!
//! // One member at a time...
//! let header = disassembler.disassemble_type_header(&my_type);
//! let body = disassembler.disassemble_method(&my_method)?;
//!
//! // ...or a whole type at once
//! let listing = disassembler.disassemble(&my_type)?;
//! # Ok::<(), cildasm::Error>(())
//! ```

#[macro_use]
pub(crate) mod error;
pub(crate) mod parser;

/// Shared functionality which is used in unit-tests
#[cfg(test)]
pub(crate) mod test;

pub mod assembly;
pub mod disassembler;
pub mod metadata;
pub mod prelude;

pub use crate::{
    disassembler::{DisassembledType, Disassembler},
    error::Error,
    parser::{CilIO, Parser},
};

/// Result type used throughout this crate
pub type Result<T> = std::result::Result<T, Error>;
