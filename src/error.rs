use thiserror::Error;

use crate::metadata::token::Token;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, covering every failure this library can return.
///
/// Disassembling a method either yields a complete rendering or one of these
/// errors; there is no partial recovery. Formatting itself cannot fail once
/// decoding has succeeded.
#[derive(Error, Debug)]
pub enum Error {
    /// The method handle carries no IL body.
    ///
    /// Abstract methods, extern methods and runtime-provided methods without
    /// IL all surface this error when their body is requested.
    #[error("The method does not have an IL body")]
    MethodHasNoBody,

    /// The method has a body, but its raw IL bytes could not be obtained.
    #[error("The IL stream of the method body could not be read")]
    CannotReadIL,

    /// An out of bound access was attempted while decoding the IL stream.
    ///
    /// This is a safety check against truncated or corrupted method bodies;
    /// any read past the end of the byte array fails with this error.
    #[error("Out of Bound read would have occurred!")]
    OutOfBounds,

    /// The IL stream is damaged and could not be decoded.
    ///
    /// Produced for unknown or reserved opcodes and for operand data that
    /// does not match the opcode's schema. The error carries the source
    /// location where the malformation was detected.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of what was malformed
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// An operand kind the decoder does not support was encountered.
    #[error("This operand kind is not supported")]
    NotSupported,

    /// The metadata provider failed to resolve a token.
    ///
    /// Surfaced transparently from the metadata provider; the associated
    /// [`Token`] identifies what could not be resolved.
    #[error("Failed to resolve metadata token - {0}")]
    TokenResolution(Token),
}
