//! Everything related to the `.srcfiles.yaml` project file format.
//!
//! > `.srcfiles.yaml` → [`read()`] → [`ProjectModel`] → [`write()`] → `.srcfiles.yaml`
//!
//! A project file consists of sections, each starting with an unindented
//! header line, followed by indented content:
//!
//! ```yaml
//! # Requires ninjgen version 1.0.0 or higher to process
//!
//! Options:
//!     Project:  app
//!     exe_type: console   # no window
//!     pch:      pch.h
//!
//! Files:
//!     pch.cpp
//!     src/*.cpp
//!     app.rc
//!     .include ../common/.srcfiles.yaml
//! ```

mod eat;
mod glob;
mod read;
mod write;

pub mod error;

pub use self::eat::UNRECOGNIZED_PREFIX;
pub use self::read::{read, read_from, Warning};
pub use self::write::write;

use crate::options::{self, OptionKey, Version};
use crate::path;
use indexmap::{IndexMap, IndexSet};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// The file name of a project file.
pub const PROJECT_FILE: &str = ".srcfiles.yaml";

/// Sub-directories searched by [`locate`], after the directory itself.
const PROJECT_DIRS: &[&str] = &["src", "source", ".private", "bld"];

/// The value a project gives to an option.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionValue {
	pub value: String,
	/// The `# comment` after the value, if any.
	pub comment: Option<String>,
}

/// A single line of the `Options:` section.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OptionLine {
	/// An option in the schema.
	Recognized {
		key: OptionKey,
		value: String,
		comment: Option<String>,
	},
	/// An option this version doesn't know, kept exactly as written so it
	/// survives being written back.
	Unrecognized(String),
}

/// What kind of binary a project builds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExeType {
	/// A GUI executable.
	Window,
	Console,
	/// A static library.
	Lib,
	Dll,
	/// An ActiveX control, a DLL with a different extension.
	Ocx,
}

impl ExeType {
	/// Parse an `exe_type` value. Unknown values are `None`.
	pub fn from_name(name: &str) -> Option<Self> {
		match name.trim().to_ascii_lowercase().as_str() {
			"window" => Some(ExeType::Window),
			"console" => Some(ExeType::Console),
			"lib" => Some(ExeType::Lib),
			"dll" => Some(ExeType::Dll),
			"ocx" => Some(ExeType::Ocx),
			_ => None,
		}
	}

	pub fn is_executable(self) -> bool {
		match self {
			ExeType::Window | ExeType::Console => true,
			ExeType::Lib | ExeType::Dll | ExeType::Ocx => false,
		}
	}
}

impl fmt::Display for ExeType {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.write_str(match self {
			ExeType::Window => "window",
			ExeType::Console => "console",
			ExeType::Lib => "lib",
			ExeType::Dll => "dll",
			ExeType::Ocx => "ocx",
		})
	}
}

/// The result of reading a project file: the options it sets and the files
/// it consists of.
///
/// All file names are relative to [`dir`][Self::dir], the directory of the
/// project file, and use `/` as separator.
#[derive(Clone, Debug)]
pub struct ProjectModel {
	/// The project file.
	pub file: PathBuf,
	/// The directory containing the project file.
	pub dir: PathBuf,
	/// The version from the `# Requires` header, if there was one.
	pub required_version: Option<Version>,

	values: BTreeMap<OptionKey, OptionValue>,
	unrecognized: Vec<String>,

	files: IndexSet<String>,
	debug_files: IndexSet<String>,
	rc_file: Option<String>,
	help_file: Option<String>,
	idl_files: Vec<String>,

	/// The `Files:` and `DebugFiles:` entries as written, before expanding
	/// patterns and includes.
	declared_files: Vec<String>,
	declared_debug_files: Vec<String>,

	pub gzip: IndexMap<String, String>,
	pub xpm: IndexMap<String, String>,
	pub png: IndexMap<String, String>,
}

impl ProjectModel {
	/// Create an empty model for a project file at `file`.
	pub fn new(file: &Path) -> Self {
		let dir = file
			.parent()
			.filter(|d| !d.as_os_str().is_empty())
			.unwrap_or_else(|| Path::new("."))
			.to_path_buf();
		ProjectModel {
			file: file.to_path_buf(),
			dir,
			required_version: None,
			values: BTreeMap::new(),
			unrecognized: Vec::new(),
			files: IndexSet::new(),
			debug_files: IndexSet::new(),
			rc_file: None,
			help_file: None,
			idl_files: Vec::new(),
			declared_files: Vec::new(),
			declared_debug_files: Vec::new(),
			gzip: IndexMap::new(),
			xpm: IndexMap::new(),
			png: IndexMap::new(),
		}
	}

	/// The value of an option, or its default if the project doesn't set it.
	pub fn get_option(&self, key: OptionKey) -> Option<&str> {
		self.values
			.get(&key)
			.map(|v| v.value.as_str())
			.or(options::lookup(key).default)
	}

	/// Whether the option has a non-empty value, possibly its default.
	pub fn has_option(&self, key: OptionKey) -> bool {
		self.get_option(key).map_or(false, |v| !v.is_empty())
	}

	/// Whether the project file sets the option, even if to an empty value.
	pub fn is_set(&self, key: OptionKey) -> bool {
		self.values.contains_key(&key)
	}

	/// Whether the option is `true` (or `yes`).
	pub fn is_option_true(&self, key: OptionKey) -> bool {
		self.get_option(key)
			.map_or(false, |v| options::normalize_bool(v) == "true")
	}

	/// Set the value of an option, keeping its comment.
	///
	/// Values of boolean options are normalized to `true` or `false`.
	pub fn set_option(&mut self, key: OptionKey, value: &str) {
		let value = if options::lookup(key).is_bool() {
			options::normalize_bool(value).to_string()
		} else {
			value.trim().to_string()
		};
		match self.values.get_mut(&key) {
			Some(v) => v.value = value,
			None => {
				self.values.insert(
					key,
					OptionValue {
						value,
						comment: None,
					},
				);
			}
		}
	}

	/// Set the comment written after the option's value.
	///
	/// Does nothing if the option isn't set.
	pub fn set_option_comment(&mut self, key: OptionKey, comment: Option<&str>) {
		if let Some(v) = self.values.get_mut(&key) {
			v.comment = comment.map(str::to_string);
		}
	}

	pub fn option_comment(&self, key: OptionKey) -> Option<&str> {
		self.values.get(&key).and_then(|v| v.comment.as_deref())
	}

	/// Remove the option, so it reads as its default again.
	pub fn clear_option(&mut self, key: OptionKey) {
		self.values.remove(&key);
	}

	/// Apply a parsed `Options:` line.
	pub fn apply(&mut self, line: OptionLine) {
		match line {
			OptionLine::Recognized {
				key,
				value,
				comment,
			} => {
				self.set_option(key, &value);
				self.set_option_comment(key, comment.as_deref());
			}
			OptionLine::Unrecognized(raw) => self.unrecognized.push(raw),
		}
	}

	/// The options set by the project, in schema order.
	pub fn option_values(&self) -> impl Iterator<Item = (OptionKey, &OptionValue)> {
		self.values.iter().map(|(k, v)| (*k, v))
	}

	/// The option lines this version did not recognize, as written.
	pub fn unrecognized_options(&self) -> &[String] {
		&self.unrecognized
	}

	/// The version needed to understand the options this project sets.
	pub fn version_required(&self) -> Version {
		self.values
			.keys()
			.map(|&key| options::lookup(key).since)
			.max()
			.unwrap_or(Version::new(1, 0, 0))
	}

	/// The project name, which is never empty after [`read()`].
	pub fn project_name(&self) -> &str {
		self.get_option(OptionKey::Project).unwrap_or("")
	}

	/// The `exe_type`, or `None` if it has an unknown value.
	pub fn exe_type(&self) -> Option<ExeType> {
		self.get_option(OptionKey::ExeType).and_then(ExeType::from_name)
	}

	/// Add a file, classifying it by its extension.
	///
	/// Returns false if the file was already in the list.
	pub fn add_file(&mut self, file: &str) -> bool {
		let file = path::canonicalize_path(file);
		match path::extension(&file).as_deref() {
			Some("rc") => {
				if self.rc_file.is_none() {
					self.rc_file = Some(file.clone());
				}
			}
			Some("idl") => {
				if !self.idl_files.contains(&file) {
					self.idl_files.push(file.clone());
				}
			}
			Some("hhp") => self.help_file = Some(file.clone()),
			_ => {}
		}
		self.debug_files.shift_remove(&file);
		self.files.insert(file)
	}

	/// Add a file that is only compiled in debug builds.
	///
	/// Files already built in every configuration are not added again.
	pub fn add_debug_file(&mut self, file: &str) -> bool {
		let file = path::canonicalize_path(file);
		!self.files.contains(&file) && self.debug_files.insert(file)
	}

	/// All files of the project, in the order they were listed.
	pub fn files(&self) -> &IndexSet<String> {
		&self.files
	}

	pub fn debug_files(&self) -> &IndexSet<String> {
		&self.debug_files
	}

	/// The resource script, if the project has one.
	pub fn rc_file(&self) -> Option<&str> {
		self.rc_file.as_deref()
	}

	/// The HTML help project, if the project has one.
	pub fn help_file(&self) -> Option<&str> {
		self.help_file.as_deref()
	}

	pub fn idl_files(&self) -> &[String] {
		&self.idl_files
	}

	/// The entries of `Files:` as written in the project file.
	pub fn declared_files(&self) -> &[String] {
		&self.declared_files
	}

	pub fn declared_debug_files(&self) -> &[String] {
		&self.declared_debug_files
	}

	/// The precompiled header, if any.
	pub fn pch_header(&self) -> Option<&str> {
		self.get_option(OptionKey::Pch).filter(|v| !v.is_empty())
	}

	/// The source file compiling the precompiled header.
	///
	/// Either set with `pch_cpp`, or the source file with the same name as
	/// the header, or `<name>.cpp` if there is none.
	pub fn pch_source(&self) -> Option<String> {
		let header = self.pch_header()?;
		if let Some(source) = self.get_option(OptionKey::PchCpp).filter(|v| !v.is_empty()) {
			return Some(path::canonicalize_path(source));
		}
		let stem = path::file_stem(header);
		self.files
			.iter()
			.find(|f| is_source_file(f) && path::file_stem(f).eq_ignore_ascii_case(stem))
			.cloned()
			.or_else(|| Some(path::with_extension(&path::canonicalize_path(header), "cpp")))
	}

	/// The C and C++ files to compile in a build, release or debug.
	pub fn source_files(&self, debug: bool) -> impl Iterator<Item = &str> {
		let debug_files = if debug { Some(&self.debug_files) } else { None };
		self.files
			.iter()
			.chain(debug_files.into_iter().flatten())
			.filter(|f| is_source_file(f))
			.map(String::as_str)
	}

	/// The value of an option as a list, for directories, libraries and
	/// compilers.
	///
	/// Items are separated by `;` if there are any, so they may contain
	/// spaces. Otherwise they are separated by whitespace.
	pub fn option_list(&self, key: OptionKey) -> Vec<&str> {
		let value = self.get_option(key).unwrap_or("");
		if value.contains(';') {
			value.split(';').map(str::trim).filter(|s| !s.is_empty()).collect()
		} else {
			value.split_whitespace().collect()
		}
	}

	/// Write the project in the project file format to `path`.
	pub fn write_to(&self, path: &Path) -> std::io::Result<()> {
		std::fs::write(path, write(self))
	}
}

/// Whether a file is C or C++ source code, by its extension.
pub fn is_source_file(file: &str) -> bool {
	match path::extension(file).as_deref() {
		Some("c") | Some("cc") | Some("cpp") | Some("cxx") => true,
		_ => false,
	}
}

/// Find the project file in `dir`, or in one of the usual sub-directories.
pub fn locate(dir: &Path) -> Option<PathBuf> {
	std::iter::once(dir.to_path_buf())
		.chain(PROJECT_DIRS.iter().map(|sub| dir.join(sub)))
		.map(|d| d.join(PROJECT_FILE))
		.find(|f| f.is_file())
}
