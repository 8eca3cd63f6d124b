//! Problems tied to a line of some file.
//!
//! Project files and resource scripts are read to the end even when some
//! lines are wrong. Every such problem is collected as an [`ErrorWithLocation`],
//! which prints as `file:line: message`.

use std::convert::TryFrom;
use std::error::Error;
use std::fmt;
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};

/// Where a problem was found: a file, and the line in it if known.
#[derive(Copy, Clone, Debug)]
pub struct Location<'a> {
	pub file: &'a Path,
	pub line: Option<NonZeroU32>,
}

impl<'a> Location<'a> {
	/// The file as a whole.
	pub fn file(file: &'a Path) -> Self {
		Location { file, line: None }
	}

	/// A 1-based line of `file`.
	pub fn line(file: &'a Path, line: usize) -> Self {
		Location {
			file,
			line: u32::try_from(line).ok().and_then(NonZeroU32::new),
		}
	}
}

/// A problem together with the place it was found.
#[derive(Debug)]
pub struct ErrorWithLocation<T> {
	pub file: PathBuf,
	pub line: Option<NonZeroU32>,
	pub error: T,
}

/// Adds [`at()`][Self::at] to every error type.
pub trait AddLocationToError: Sized {
	/// Remember where this error happened.
	fn at(self, location: Location) -> ErrorWithLocation<Self>;
}

impl<E: Error> AddLocationToError for E {
	fn at(self, location: Location) -> ErrorWithLocation<E> {
		ErrorWithLocation {
			file: location.file.to_path_buf(),
			line: location.line,
			error: self,
		}
	}
}

impl<T: fmt::Display> fmt::Display for ErrorWithLocation<T> {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self.line {
			Some(line) => write!(f, "{}:{}: {}", self.file.display(), line, self.error),
			None => write!(f, "{}: {}", self.file.display(), self.error),
		}
	}
}

impl<T: Error + 'static> Error for ErrorWithLocation<T> {
	fn source(&self) -> Option<&(dyn Error + 'static)> {
		Some(&self.error)
	}
}
