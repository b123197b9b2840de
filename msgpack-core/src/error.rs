use std::fmt;

/// The error taxonomy surfaced by every codec operation (spec §6.5).
///
/// Each variant carries a [`Error::is_resumable`] classification rather than
/// living in a resumable/non-resumable type hierarchy: resumable errors mean
/// the stream cursor has not advanced past the offending object, so a caller
/// may `Skip` past it or dispatch on the actual prefix instead.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Declared length exceeds the remaining input.
    ShortBytes { wanted: usize, remaining: usize },
    /// An unrecognized leading byte; the stream's framing is lost.
    InvalidPrefix(u8),
    /// The prefix found does not match the method used to read it.
    TypeError { wanted: &'static str, got: &'static str },
    /// A signed integer does not fit in the requested width.
    IntOverflow { value: i64, bits: u32 },
    /// An unsigned integer does not fit in the requested width.
    UintOverflow { value: u64, bits: u32 },
    /// A fixed-size array decode received the wrong element count.
    ArrayError { wanted: usize, got: usize },
    /// The decoded extension's type id did not match the caller's expectation.
    ExtensionTypeError { wanted: i8, got: i8 },
    /// An unreachable path was triggered; indicates a codec bug.
    Fatal(&'static str),
}

impl Error {
    /// Whether the stream cursor still sits at the start of the offending
    /// object. Non-resumable errors mean the framing itself is gone and the
    /// stream must be discarded.
    #[must_use]
    pub fn is_resumable(&self) -> bool {
        match self {
            Error::ShortBytes { .. } => true,
            Error::InvalidPrefix(_) => false,
            Error::TypeError { .. } => true,
            Error::IntOverflow { .. } => true,
            Error::UintOverflow { .. } => true,
            Error::ArrayError { .. } => true,
            Error::ExtensionTypeError { .. } => true,
            Error::Fatal(_) => false,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ShortBytes { wanted, remaining } => write!(
                f,
                "short input: wanted {wanted} bytes, {remaining} remaining"
            ),
            Error::InvalidPrefix(byte) => write!(f, "invalid prefix byte 0x{byte:02x}"),
            Error::TypeError { wanted, got } => {
                write!(f, "type mismatch: wanted {wanted}, got {got}")
            }
            Error::IntOverflow { value, bits } => {
                write!(f, "value {value} does not fit in {bits} bits")
            }
            Error::UintOverflow { value, bits } => {
                write!(f, "value {value} does not fit in {bits} bits")
            }
            Error::ArrayError { wanted, got } => {
                write!(f, "expected array of length {wanted}, got {got}")
            }
            Error::ExtensionTypeError { wanted, got } => {
                write!(f, "extension type mismatch: wanted {wanted}, got {got}")
            }
            Error::Fatal(msg) => write!(f, "fatal codec error: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

/// Configuration errors raised by [`crate::ext::Registry`] (spec §6.4):
/// programmer mistakes caught at registration time, not runtime conditions.
#[derive(Debug, Clone, PartialEq)]
pub enum RegistryError {
    /// Attempted to register one of the reserved extension ids (3, 4, 5).
    ReservedTypeId(i8),
    /// The extension id was already registered.
    DuplicateTypeId(i8),
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::ReservedTypeId(id) => {
                write!(f, "extension type id {id} is reserved for complex64/complex128/time")
            }
            RegistryError::DuplicateTypeId(id) => {
                write!(f, "extension type id {id} is already registered")
            }
        }
    }
}

impl std::error::Error for RegistryError {}

pub type Result<T> = std::result::Result<T, Error>;
