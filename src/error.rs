use thiserror::Error;

macro_rules! corrupt_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::CorruptValue {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::CorruptValue {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Decoding operates on the memory of a paused target process, which must be treated as a
/// hostile and possibly inconsistent data source. The taxonomy below separates the one fatal
/// condition ([`Error::ProfileDetection`]) from the per-value conditions that every caller is
/// expected to degrade on rather than propagate.
///
/// # Error Categories
///
/// ## Session-fatal
/// - [`Error::ProfileDetection`] - The target's value encoding matched no known variant
///
/// ## Per-value, recoverable
/// - [`Error::CorruptValue`] - A value or object header could not be decoded
/// - [`Error::OutOfBounds`] - A read would have run past readable target memory
/// - [`Error::MemoryRead`] - The target memory interface refused a read
///
/// ## Control flow with defined fallbacks
/// - [`Error::KeyNotFound`] - A runtime-internal table scan exhausted its entries
/// - [`Error::FieldLayout`] - A type layout lacks an expected field
/// - [`Error::LayoutMissing`] - The host knows no layout for a required type name
///
/// # Examples
///
/// ```rust,ignore
/// match session.classify(raw) {
///     Ok(tag) => println!("tag: {:?}", tag),
///     Err(rbscope::Error::CorruptValue { message, file, line }) => {
///         eprintln!("corrupt value: {} ({}:{})", message, file, line);
///     }
///     Err(e) => eprintln!("other error: {}", e),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The target's boolean bit pattern matched no known encoding variant.
    ///
    /// Raised once, during profile detection, when the observed `true` value is
    /// neither of the two supported configurations. This is fatal for the whole
    /// session; no value can be decoded without a profile.
    #[error("Unable to determine value encoding from unknown value for true: {0}")]
    ProfileDetection(u64),

    /// A value, object header, or embedded structure could not be decoded.
    ///
    /// The target's memory is read without its cooperation and can contain
    /// arbitrary garbage. This error carries the source location where the
    /// corruption was detected; callers degrade to a fallback rendering
    /// instead of propagating it out of a traversal.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of what was corrupt
    /// * `file` - Source file in which this error was detected
    /// * `line` - Source line in which this error was detected
    #[error("Corrupt value - {file}:{line}: {message}")]
    CorruptValue {
        /// The message to be printed for the corrupt value
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// A read would have gone beyond readable target memory.
    #[error("Out of bound read would have occurred!")]
    OutOfBounds,

    /// The target memory interface refused or failed a read.
    ///
    /// Distinct from [`Error::CorruptValue`]: the bytes could not be obtained at
    /// all, rather than obtained and found inconsistent.
    #[error("Failed to read {len} bytes at target address {address:#x}")]
    MemoryRead {
        /// Address in the target process that was requested
        address: u64,
        /// Number of bytes requested
        len: usize,
    },

    /// A runtime-internal table scan found no entry with the requested key.
    ///
    /// Used as ordinary control flow: symbol and classpath resolution try a
    /// direct lookup first and fall back to a search when the key is absent.
    #[error("Key {0:#x} not found in table")]
    KeyNotFound(u64),

    /// A target type layout lacks a field the decoder expected.
    ///
    /// Field spellings differ between runtime builds; callers retry with the
    /// alternate spelling before treating the value as corrupt.
    #[error("Type layout '{type_name}' has no field '{field}'")]
    FieldLayout {
        /// Name of the layout that was inspected
        type_name: String,
        /// The field that was missing
        field: String,
    },

    /// The host debugger knows no layout for a required type name.
    #[error("No type layout available for '{0}'")]
    LayoutMissing(String),

    /// An expression could not be evaluated in the target process.
    #[error("{0}")]
    Inferior(String),
}
