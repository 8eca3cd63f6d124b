//! Modification times of files on disk.
//!
//! Only shown to the user, when a dry run finds a script that would change.

use chrono::{DateTime, Local};
use std::fmt;
use std::io::{Error, ErrorKind};
use std::path::Path;
use std::time::SystemTime;

/// Looks up the `mtime` of a file. Returns `None` if the file does not exist.
pub fn mtime(file: &Path) -> Result<Option<SystemTime>, Error> {
	match std::fs::metadata(file).and_then(|m| m.modified()) {
		Ok(time) => Ok(Some(time)),
		Err(ref e) if e.kind() == ErrorKind::NotFound => Ok(None),
		Err(e) => Err(e),
	}
}

/// Displays a time as `YYYY-MM-DD HH:MM:SS` in the local time zone.
pub struct LocalTime(pub SystemTime);

impl fmt::Display for LocalTime {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		let time: DateTime<Local> = self.0.into();
		write!(f, "{}", time.format("%Y-%m-%d %H:%M:%S"))
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use std::time::{Duration, UNIX_EPOCH};

	#[test]
	fn test_mtime() -> Result<(), Error> {
		let dir = tempfile::tempdir()?;
		let file = dir.path().join("a.ninja");
		assert_eq!(mtime(&file)?, None);
		std::fs::write(&file, "# empty\n")?;
		assert!(mtime(&file)?.is_some());
		Ok(())
	}

	#[test]
	fn local_time_format() {
		let shown = LocalTime(UNIX_EPOCH + Duration::from_secs(1_500_000_000)).to_string();
		assert_eq!(shown.len(), 19);
		assert!(shown.starts_with("2017-07-1"));
		assert_eq!(&shown[13..14], ":");
	}
}
