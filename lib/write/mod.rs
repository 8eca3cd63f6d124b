//! Writing generated scripts only when they changed.
//!
//! > [`GeneratedScript`] → [`write_if_changed()`] → [`Outcome`]
//!
//! Rewriting a script with identical content would still bump its `mtime`,
//! which makes the build tool think the build description changed. So the
//! existing file is compared first, line by line, after the same
//! normalization that [`GeneratedScript`] applies.

mod diff;

pub use self::diff::{Diff, DiffLine};

use crate::mtime::mtime;
use crate::script::GeneratedScript;
use log::debug;
use std::fs;
use std::io::{Error, ErrorKind};
use std::path::Path;

/// How [`write_if_changed`] treats the file system.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WriteMode {
	/// Don't write anything, only report what would happen.
	pub dry_run: bool,
	/// Write even if the content did not change.
	pub force: bool,
}

/// What [`write_if_changed`] did, or would have done.
#[derive(Debug)]
pub enum Outcome {
	/// The file did not exist, and was written.
	Created,
	/// The file existed with different content, and was overwritten.
	Updated,
	/// The file already has this content. Nothing was written.
	Unchanged,
	/// Dry run: the file does not exist, and would be created.
	WouldCreate,
	/// Dry run: the file exists with different content, and would be
	/// overwritten.
	WouldUpdate(Diff),
}

impl Outcome {
	/// Whether the file on disk was changed.
	pub fn changed(&self) -> bool {
		match self {
			Outcome::Created | Outcome::Updated => true,
			Outcome::Unchanged | Outcome::WouldCreate | Outcome::WouldUpdate(_) => false,
		}
	}
}

/// Write `content` to `path`, unless the file already contains exactly that.
///
/// Missing parent directories are created. In dry-run mode nothing on disk
/// is touched, and a [`Diff`] is returned for files that would change.
pub fn write_if_changed(
	path: &Path,
	content: &GeneratedScript,
	mode: WriteMode,
) -> Result<Outcome, Error> {
	let old = match fs::read(path) {
		Ok(bytes) => Some(GeneratedScript::from_text(&String::from_utf8_lossy(&bytes))),
		Err(ref e) if e.kind() == ErrorKind::NotFound => None,
		Err(e) => {
			return Err(Error::new(
				e.kind(),
				format!("Unable to read {:?}: {}", path, e),
			))
		}
	};

	let outcome = match &old {
		None if mode.dry_run => return Ok(Outcome::WouldCreate),
		None => Outcome::Created,
		Some(old) if old.lines() == content.lines() && (mode.dry_run || !mode.force) => {
			debug!("{:?} is up to date", path);
			return Ok(Outcome::Unchanged);
		}
		Some(old) if mode.dry_run => {
			let mut diff = Diff::new(path.to_path_buf(), old.lines(), content.lines());
			diff.modified = mtime(path)?;
			return Ok(Outcome::WouldUpdate(diff));
		}
		Some(_) => Outcome::Updated,
	};

	if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
		fs::create_dir_all(dir).map_err(|e| {
			Error::new(
				e.kind(),
				format!("Unable to create directory {:?}: {}", dir, e),
			)
		})?;
	}
	fs::write(path, content.to_string()).map_err(|e| {
		Error::new(e.kind(), format!("Unable to write {:?}: {}", path, e))
	})?;

	Ok(outcome)
}
