//! Errors that can occur while reading project files.

use crate::options::{ParseVersionError, Version};
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// An error that stops reading the project altogether.
#[derive(Debug, Error)]
pub enum ProjectError {
	/// The project file itself could not be read.
	#[error("Unable to read {}: {error}", file.display())]
	Io {
		file: PathBuf,
		#[source]
		error: io::Error,
	},
	/// The project file was written for a newer version of this tool.
	#[error("{} requires version {required} or higher, but this is version {current}", file.display())]
	VersionTooNew {
		file: PathBuf,
		required: Version,
		current: Version,
	},
}

/// A problem with a single line of a project file.
///
/// These are collected while reading, and the rest of the file is still
/// processed.
#[derive(Debug, Error)]
pub enum ParseWarning {
	/// An option name which is not in the schema. The line is kept, and
	/// written back as an unrecognized option.
	#[error("Unrecognized option: {0}")]
	UnknownOption(String),
	/// A line in `Options:` without `:` or `=`, or a conversion pair
	/// without `:`.
	#[error("Missing `:' or `=' in {0:?}")]
	MissingSeparator(String),
	#[error("Unknown section: {0}")]
	UnknownSection(String),
	/// An indented line before the first section header.
	#[error("Line is not part of any section")]
	NoSection,
	/// A file named by `.include` could not be read.
	#[error("Unable to read included file {path}: {error}")]
	Include {
		path: String,
		#[source]
		error: io::Error,
	},
	/// A file (indirectly) includes itself.
	#[error("{0} is already being included")]
	IncludeCycle(String),
	#[error("Invalid file pattern {pattern:?}: {error}")]
	InvalidGlob {
		pattern: String,
		#[source]
		error: globset::Error,
	},
	/// A directory to match a file pattern against could not be listed.
	#[error("Unable to list files for {pattern:?}: {error}")]
	ListDir {
		pattern: String,
		#[source]
		error: io::Error,
	},
	#[error(transparent)]
	InvalidVersion(#[from] ParseVersionError),
}

impl From<ProjectError> for io::Error {
	fn from(error: ProjectError) -> io::Error {
		io::Error::new(io::ErrorKind::Other, error)
	}
}
