//! Target runtime of a module.
//!
//! The metadata root of every module carries a version string naming the runtime the module
//! was compiled against (`v2.0.50727`, `v4.0.30319`, ...). [`TargetRuntime`] is the ordered
//! form of that string; rules use it to decide whether a language construct is available to
//! the module at all.

use std::str::FromStr;

use strum::{Display, EnumCount, EnumIter};

use crate::{Error, Result};

/// Minimum platform version a module targets, ordered from oldest to newest.
///
/// ```rust
/// use dotlint::metadata::TargetRuntime;
///
/// let runtime = TargetRuntime::from_version_string("v2.0.50727")?;
/// assert_eq!(runtime, TargetRuntime::Net2_0);
/// assert!(runtime > TargetRuntime::Net1_1);
/// # Ok::<(), dotlint::Error>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumIter, EnumCount)]
pub enum TargetRuntime {
    /// .NET Framework 1.0 (`v1.0.3705`)
    #[strum(serialize = "v1.0")]
    Net1_0,
    /// .NET Framework 1.1 (`v1.1.4322`)
    #[strum(serialize = "v1.1")]
    Net1_1,
    /// .NET Framework 2.0 through 3.5 (`v2.0.50727`)
    #[strum(serialize = "v2.0")]
    Net2_0,
    /// .NET Framework 4.0 and later, including .NET Core (`v4.0.30319`)
    #[strum(serialize = "v4.0")]
    Net4_0,
}

impl TargetRuntime {
    /// Maps a metadata root version string to a target runtime.
    ///
    /// Only the major and minor components are significant; the build number and any
    /// trailing padding or suffix are ignored, and the leading `v` is optional.
    ///
    /// # Errors
    /// Returns [`Error::UnknownRuntime`] if the string does not start with a known
    /// `major.minor` pair.
    pub fn from_version_string(version: &str) -> Result<Self> {
        let trimmed = version.trim_end_matches('\0').trim();
        let digits = trimmed.strip_prefix('v').unwrap_or(trimmed);

        let mut parts = digits.split('.');
        let major = parts.next().and_then(|p| p.parse::<u32>().ok());
        let minor = parts.next().and_then(|p| {
            let end = p.find(|c: char| !c.is_ascii_digit()).unwrap_or(p.len());
            p[..end].parse::<u32>().ok()
        });

        match (major, minor) {
            (Some(1), Some(0)) => Ok(TargetRuntime::Net1_0),
            (Some(1), Some(1)) => Ok(TargetRuntime::Net1_1),
            (Some(2), Some(_)) => Ok(TargetRuntime::Net2_0),
            (Some(4), Some(_)) => Ok(TargetRuntime::Net4_0),
            _ => Err(Error::UnknownRuntime(version.to_string())),
        }
    }

    /// Returns true if the runtime supports `static class` declarations (abstract + sealed
    /// types the compiler refuses to instantiate or derive from).
    #[must_use]
    pub fn supports_static_types(&self) -> bool {
        *self >= TargetRuntime::Net2_0
    }
}

impl FromStr for TargetRuntime {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_version_string(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_known_version_strings() {
        let cases = [
            ("v1.0.3705", TargetRuntime::Net1_0),
            ("v1.1.4322", TargetRuntime::Net1_1),
            ("v2.0.50727", TargetRuntime::Net2_0),
            ("v4.0.30319", TargetRuntime::Net4_0),
            ("v4.0.30319\0\0", TargetRuntime::Net4_0),
            ("2.0", TargetRuntime::Net2_0),
        ];

        for (version, expected) in cases {
            assert_eq!(
                TargetRuntime::from_version_string(version).unwrap(),
                expected,
                "version {version:?}"
            );
        }
    }

    #[test]
    fn test_unknown_version_strings() {
        for version in ["", "v", "v3.0", "vX.Y", "v1", "Standard CLI 2005"] {
            assert!(matches!(
                TargetRuntime::from_version_string(version),
                Err(Error::UnknownRuntime(_))
            ));
        }
    }

    #[test]
    fn test_ordering_and_static_support() {
        let runtimes: Vec<_> = TargetRuntime::iter().collect();
        assert_eq!(runtimes.len(), TargetRuntime::COUNT);
        assert!(runtimes.windows(2).all(|w| w[0] < w[1]));

        assert!(!TargetRuntime::Net1_0.supports_static_types());
        assert!(!TargetRuntime::Net1_1.supports_static_types());
        assert!(TargetRuntime::Net2_0.supports_static_types());
        assert!(TargetRuntime::Net4_0.supports_static_types());
    }

    #[test]
    fn test_display_and_from_str() {
        assert_eq!(TargetRuntime::Net2_0.to_string(), "v2.0");
        assert_eq!(
            "v4.0.30319".parse::<TargetRuntime>().unwrap(),
            TargetRuntime::Net4_0
        );
    }
}
