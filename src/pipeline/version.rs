//! Dotted numeric version reported by the SDL build scripts.

use crate::pipeline::Error;
use std::{fmt, str::FromStr};

/// `major.minor[.build[.revision]]`.
///
/// Displays exactly the components that were parsed, so `2.26.1` round-trips
/// as `2.26.1` and never grows a trailing `.0`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct BuildVersion {
    pub major: u32,
    pub minor: u32,
    pub build: Option<u32>,
    pub revision: Option<u32>,
}

impl BuildVersion {
    pub fn new(major: u32, minor: u32, build: Option<u32>, revision: Option<u32>) -> Self {
        Self {
            major,
            minor,
            build,
            revision: build.and(revision),
        }
    }
}

impl FromStr for BuildVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidVersion(s.to_string());

        let parts = s
            .trim()
            .split('.')
            .map(|part| {
                // u32::from_str accepts a leading '+'
                if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(invalid());
                }
                part.parse::<u32>().map_err(|_| invalid())
            })
            .collect::<Result<Vec<_>, _>>()?;

        match parts.as_slice() {
            [major, minor] => Ok(Self::new(*major, *minor, None, None)),
            [major, minor, build] => Ok(Self::new(*major, *minor, Some(*build), None)),
            [major, minor, build, revision] => {
                Ok(Self::new(*major, *minor, Some(*build), Some(*revision)))
            }
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for BuildVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)?;
        if let Some(build) = self.build {
            write!(f, ".{build}")?;
            if let Some(revision) = self.revision {
                write!(f, ".{revision}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_two_to_four_components() {
        assert_eq!("2.26".parse::<BuildVersion>().unwrap(), BuildVersion::new(2, 26, None, None));
        assert_eq!(
            "2.26.1".parse::<BuildVersion>().unwrap(),
            BuildVersion::new(2, 26, Some(1), None)
        );
        assert_eq!(
            "2.26.1.7".parse::<BuildVersion>().unwrap(),
            BuildVersion::new(2, 26, Some(1), Some(7))
        );
    }

    #[test]
    fn display_prints_only_present_components() {
        for text in ["2.28", "2.28.0", "2.28.0.3"] {
            assert_eq!(text.parse::<BuildVersion>().unwrap().to_string(), text);
        }
    }

    #[test]
    fn rejects_malformed_input() {
        for text in ["", "2", "2.", ".2", "2.x.1", "1.2.3.4.5", "+1.2", "-1.2", "2.26.1-rc1"] {
            assert!(
                matches!(text.parse::<BuildVersion>(), Err(Error::InvalidVersion(_))),
                "{text:?} should be rejected"
            );
        }
    }
}
