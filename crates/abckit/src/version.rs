//! API and container versions

use crate::status::{KitError, KitResult};

/// Versions of the public API tables
///
/// Tables are append-only: a later version keeps every entry of the
/// earlier ones at the same position.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ApiVersion {
    Release1_0_0 = 0,
}

impl ApiVersion {
    pub const LATEST: ApiVersion = ApiVersion::Release1_0_0;

    /// Resolve a raw version requested over the C boundary
    pub fn from_raw(raw: u32) -> KitResult<Self> {
        match raw {
            0 => Ok(ApiVersion::Release1_0_0),
            other => Err(KitError::UnknownApiVersion(other)),
        }
    }
}

/// Version tag stored in a container header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileVersion(pub [u8; 4]);

impl FileVersion {
    /// Version written by this crate
    pub const CURRENT: FileVersion = FileVersion([13, 0, 1, 0]);

    pub fn as_bytes(&self) -> [u8; 4] {
        self.0
    }

    /// Whether a container of this version can be read
    pub fn is_supported(&self) -> bool {
        self.0[0] == Self::CURRENT.0[0]
    }
}

impl std::fmt::Display for FileVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let [a, b, c, d] = self.0;
        write!(f, "{}.{}.{}.{}", a, b, c, d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::Status;

    #[test]
    fn test_api_version_lookup() {
        assert_eq!(ApiVersion::from_raw(0).unwrap(), ApiVersion::Release1_0_0);
        let err = ApiVersion::from_raw(42).unwrap_err();
        assert_eq!(err.status(), Status::UnknownApiVersion);
    }

    #[test]
    fn test_file_version_display() {
        assert_eq!(FileVersion::CURRENT.to_string(), "13.0.1.0");
        assert!(FileVersion([13, 9, 9, 9]).is_supported());
        assert!(!FileVersion([12, 0, 0, 0]).is_supported());
    }
}
