//! Status codes and error types
//!
//! Every fallible operation in the crate returns [`KitResult`]. The
//! [`Status`] enum is the wire-stable projection of [`KitError`] used by the
//! C boundary's last-error register.

use crate::codec::DecodeError;
use crate::metadata::LiteralTag;
use crate::target::{Mode, Target};
use thiserror::Error;

/// Wire-stable status codes
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Status {
    /// The last call succeeded
    #[default]
    NoError = 0,
    /// A null, stale or out-of-range argument
    BadArgument = 1,
    /// An allocation failed
    ///
    /// Reserved wire code; allocation failure aborts in Rust, so no
    /// operation reports it.
    MemoryAllocation = 2,
    /// Dynamic entity passed where a static one is required, or vice versa
    WrongMode = 3,
    /// Literal accessor does not match the literal's tag
    WrongLiteralType = 4,
    /// The concept does not exist for the module's target
    Unsupported = 5,
    /// Handles from different files were mixed
    WrongCtx = 6,
    /// Recognized but not implemented
    ///
    /// Reserved wire code; every operation of the API is implemented, so
    /// no [`KitError`] projects onto it.
    Todo = 7,
    /// Target-specific accessor used with a module of another target
    WrongTarget = 8,
    /// Requested API table version is unknown
    UnknownApiVersion = 9,
    /// Reading or writing a container failed
    IoError = 10,
    /// An internal invariant was broken
    InternalError = 11,
}

impl Status {
    /// Decode a raw status value
    pub fn from_u32(value: u32) -> Option<Self> {
        match value {
            0 => Some(Status::NoError),
            1 => Some(Status::BadArgument),
            2 => Some(Status::MemoryAllocation),
            3 => Some(Status::WrongMode),
            4 => Some(Status::WrongLiteralType),
            5 => Some(Status::Unsupported),
            6 => Some(Status::WrongCtx),
            7 => Some(Status::Todo),
            8 => Some(Status::WrongTarget),
            9 => Some(Status::UnknownApiVersion),
            10 => Some(Status::IoError),
            11 => Some(Status::InternalError),
            _ => None,
        }
    }

    pub fn as_u32(self) -> u32 {
        self as u32
    }

    pub fn name(self) -> &'static str {
        match self {
            Status::NoError => "NO_ERROR",
            Status::BadArgument => "BAD_ARGUMENT",
            Status::MemoryAllocation => "MEMORY_ALLOCATION",
            Status::WrongMode => "WRONG_MODE",
            Status::WrongLiteralType => "WRONG_LITERAL_TYPE",
            Status::Unsupported => "UNSUPPORTED",
            Status::WrongCtx => "WRONG_CTX",
            Status::Todo => "TODO",
            Status::WrongTarget => "WRONG_TARGET",
            Status::UnknownApiVersion => "UNKNOWN_API_VERSION",
            Status::IoError => "IO_ERROR",
            Status::InternalError => "INTERNAL_ERROR",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Errors reported by the kit
#[derive(Debug, Error)]
pub enum KitError {
    /// Invalid argument
    #[error("Bad argument: {0}")]
    BadArgument(String),

    /// Operation requires the other back-end
    #[error("Wrong mode: {operation} requires a {expected} entity, got {actual}")]
    WrongMode {
        /// Operation that rejected the call
        operation: &'static str,
        /// Mode the operation accepts
        expected: Mode,
        /// Mode of the entity passed in
        actual: Mode,
    },

    /// Operation is restricted to other targets
    #[error("Wrong target: {operation} is not available for {target} modules")]
    WrongTarget {
        /// Operation that rejected the call
        operation: &'static str,
        /// Target of the governing module
        target: Target,
    },

    /// Entities from different files
    #[error("Wrong context: {0}")]
    WrongCtx(String),

    /// Literal accessor mismatch
    #[error("Wrong literal type: {accessor} cannot read a {tag:?} literal")]
    WrongLiteralType {
        /// Accessor that was called
        accessor: &'static str,
        /// Tag of the literal
        tag: LiteralTag,
    },

    /// Concept absent for the target
    #[error("Unsupported: {operation} for {target} modules")]
    Unsupported {
        /// Operation that rejected the call
        operation: &'static str,
        /// Target of the governing module
        target: Target,
    },

    /// Unknown API table version
    #[error("Unknown API version {0}")]
    UnknownApiVersion(u32),

    /// I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed container
    #[error("Malformed container: {0}")]
    Decode(#[from] DecodeError),

    /// Internal invariant violation
    #[error("Internal error: {0}")]
    Internal(String),
}

impl KitError {
    /// Project onto the wire status code
    pub fn status(&self) -> Status {
        match self {
            KitError::BadArgument(_) => Status::BadArgument,
            KitError::WrongMode { .. } => Status::WrongMode,
            KitError::WrongTarget { .. } => Status::WrongTarget,
            KitError::WrongCtx(_) => Status::WrongCtx,
            KitError::WrongLiteralType { .. } => Status::WrongLiteralType,
            KitError::Unsupported { .. } => Status::Unsupported,
            KitError::UnknownApiVersion(_) => Status::UnknownApiVersion,
            KitError::Io(_) | KitError::Decode(_) => Status::IoError,
            KitError::Internal(_) => Status::InternalError,
        }
    }

    pub(crate) fn bad_argument(msg: impl Into<String>) -> Self {
        KitError::BadArgument(msg.into())
    }
}

/// Result alias used throughout the crate
pub type KitResult<T> = Result<T, KitError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_roundtrip_raw() {
        for raw in 0..12 {
            let status = Status::from_u32(raw).unwrap();
            assert_eq!(status.as_u32(), raw);
        }
        assert_eq!(Status::from_u32(12), None);
    }

    #[test]
    fn test_error_projection() {
        let err = KitError::WrongMode {
            operation: "iCreateAdd2",
            expected: Mode::Dynamic,
            actual: Mode::Static,
        };
        assert_eq!(err.status(), Status::WrongMode);
        assert!(err.to_string().contains("iCreateAdd2"));

        let err: KitError = DecodeError::UnexpectedEnd(4).into();
        assert_eq!(err.status(), Status::IoError);

        let err: KitError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert_eq!(err.status(), Status::IoError);
    }

    #[test]
    fn test_reserved_codes_keep_their_values() {
        assert_eq!(Status::MemoryAllocation.as_u32(), 2);
        assert_eq!(Status::Todo.as_u32(), 7);
        assert_eq!(Status::from_u32(7), Some(Status::Todo));
    }

    #[test]
    fn test_default_is_no_error() {
        assert_eq!(Status::default(), Status::NoError);
        assert_eq!(Status::WrongCtx.to_string(), "WRONG_CTX");
    }
}
