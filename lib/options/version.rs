use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A `major.minor.patch` version number.
///
/// Ordered by major, then minor, then patch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
	pub major: u16,
	pub minor: u16,
	pub patch: u16,
}

impl Version {
	pub const fn new(major: u16, minor: u16, patch: u16) -> Self {
		Version {
			major,
			minor,
			patch,
		}
	}
}

impl fmt::Display for Version {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
	}
}

/// The error when a version number is not of the form `X.Y.Z`.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("Invalid version number: {0:?}")]
pub struct ParseVersionError(pub String);

impl FromStr for Version {
	type Err = ParseVersionError;

	/// Parses `X`, `X.Y` or `X.Y.Z`. Missing parts are zero.
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let err = || ParseVersionError(s.to_string());
		let mut parts = [0u16; 3];
		let mut n = 0;
		for part in s.trim().split('.') {
			if n == parts.len() {
				return Err(err());
			}
			parts[n] = part.parse().map_err(|_| err())?;
			n += 1;
		}
		Ok(Version::new(parts[0], parts[1], parts[2]))
	}
}
