//! Source-language targets and back-end modes
//!
//! Every module carries a [`Target`]. The target decides which back-end
//! ([`Mode`]) implements operations on the module and everything it owns.

use crate::status::{KitError, KitResult};

/// Source language a module was compiled from
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    Unknown = 0,
    ArkTsV1 = 1,
    ArkTsV2 = 2,
    Ts = 3,
    Js = 4,
    Native = 5,
}

impl Target {
    pub fn from_u32(value: u32) -> Option<Self> {
        match value {
            0 => Some(Target::Unknown),
            1 => Some(Target::ArkTsV1),
            2 => Some(Target::ArkTsV2),
            3 => Some(Target::Ts),
            4 => Some(Target::Js),
            5 => Some(Target::Native),
            _ => None,
        }
    }

    pub fn as_u32(self) -> u32 {
        self as u32
    }

    /// Back-end implementing this target
    ///
    /// ArkTS modules are served by the static back-end, JS and TS by the
    /// dynamic one. Native and unknown modules have no back-end.
    pub fn mode(self) -> Option<Mode> {
        match self {
            Target::ArkTsV1 | Target::ArkTsV2 => Some(Mode::Static),
            Target::Js | Target::Ts => Some(Mode::Dynamic),
            Target::Native | Target::Unknown => None,
        }
    }

    /// Back-end for `operation`, failing for targets without one
    pub fn require_mode(self, operation: &'static str) -> KitResult<Mode> {
        self.mode().ok_or(KitError::WrongTarget {
            operation,
            target: self,
        })
    }

    pub fn is_arkts(self) -> bool {
        matches!(self, Target::ArkTsV1 | Target::ArkTsV2)
    }

    pub fn is_js(self) -> bool {
        self == Target::Js
    }
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Target::Unknown => "unknown",
            Target::ArkTsV1 => "ArkTS-v1",
            Target::ArkTsV2 => "ArkTS-v2",
            Target::Ts => "TS",
            Target::Js => "JS",
            Target::Native => "native",
        };
        f.write_str(name)
    }
}

/// Back-end representation of a file and everything in it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// ECMAScript-family records and instructions
    Dynamic,
    /// ArkTS-native records and instructions
    Static,
}

impl Mode {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Mode::Dynamic),
            1 => Some(Mode::Static),
            _ => None,
        }
    }

    pub fn as_u8(self) -> u8 {
        match self {
            Mode::Dynamic => 0,
            Mode::Static => 1,
        }
    }

    /// Fail with `WrongMode` unless `self` is `expected`
    pub fn expect(self, expected: Mode, operation: &'static str) -> KitResult<()> {
        if self == expected {
            Ok(())
        } else {
            tracing::warn!(target: "abckit::dispatch", operation, %expected, actual = %self, "mode mismatch");
            Err(KitError::WrongMode {
                operation,
                expected,
                actual: self,
            })
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Dynamic => f.write_str("dynamic"),
            Mode::Static => f.write_str("static"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::Status;

    #[test]
    fn test_target_modes() {
        assert_eq!(Target::ArkTsV1.mode(), Some(Mode::Static));
        assert_eq!(Target::ArkTsV2.mode(), Some(Mode::Static));
        assert_eq!(Target::Js.mode(), Some(Mode::Dynamic));
        assert_eq!(Target::Ts.mode(), Some(Mode::Dynamic));
        assert_eq!(Target::Native.mode(), None);

        let err = Target::Unknown.require_mode("moduleGetName").unwrap_err();
        assert_eq!(err.status(), Status::WrongTarget);
    }

    #[test]
    fn test_wire_values_are_stable() {
        assert_eq!(Target::Unknown.as_u32(), 0);
        assert_eq!(Target::Native.as_u32(), 5);
        for raw in 0..6 {
            assert_eq!(Target::from_u32(raw).map(Target::as_u32), Some(raw));
        }
        assert_eq!(Target::from_u32(6), None);
    }

    #[test]
    fn test_mode_expect() {
        assert!(Mode::Static.expect(Mode::Static, "op").is_ok());
        let err = Mode::Static.expect(Mode::Dynamic, "op").unwrap_err();
        assert_eq!(err.status(), Status::WrongMode);
    }
}
