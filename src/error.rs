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

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Errors only arise while a metadata graph is being assembled by a host loader. Rule
/// evaluation itself never fails: anomalies found while walking a type hierarchy (unresolved
/// base types, inheritance cycles) degrade to "no defect" instead of surfacing here.
///
/// # Error Categories
///
/// ## Metadata Graph Errors
/// - [`Error::Malformed`] - Inconsistent metadata handed over by the loader
/// - [`Error::TypeInsert`] - A type with the same token is already registered
///
/// ## Module Errors
/// - [`Error::UnknownRuntime`] - The metadata version string names no known runtime
///
/// # Examples
///
/// ```rust
/// use dotlint::{Error, metadata::TargetRuntime};
///
/// match TargetRuntime::from_version_string("v9.9") {
///     Ok(runtime) => println!("Targets {}", runtime),
///     Err(Error::UnknownRuntime(version)) => eprintln!("Unknown runtime: {}", version),
///     Err(e) => eprintln!("Other error: {}", e),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The metadata graph is inconsistent and could not be assembled.
    ///
    /// This error includes the source location where the malformation was detected
    /// for debugging purposes.
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

    /// Failed to insert new type into the `TypeRegistry`.
    ///
    /// Each token may only be registered once per module. The associated [`Token`]
    /// identifies the duplicate.
    #[error("Failed to insert new type into TypeRegistry - {0}")]
    TypeInsert(Token),

    /// The metadata version string does not identify a known target runtime.
    #[error("Unknown target runtime version - {0}")]
    UnknownRuntime(String),
}
