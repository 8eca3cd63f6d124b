//! Finding the files a resource script depends on.
//!
//! The resource compiler doesn't report which files it reads, so ninja can't
//! discover them during the build like it does for C and C++ sources. Instead,
//! the script is scanned up front, and everything it uses is listed as an
//! implicit dependency of the resource edge.
//!
//! Two things are dependencies:
//!
//!  - Headers included with `#include "file"`, recursively. Headers in
//!    `<angle brackets>` and the usual platform headers are skipped.
//!  - Files used by resource statements, like `IDI_APP ICON "res/app.ico"`.

use crate::error::{AddLocationToError, ErrorWithLocation, Location};
use crate::path;
use log::debug;
use std::collections::HashSet;
use std::io;
use std::path::Path;
use thiserror::Error;

/// Resource types that refer to a file.
const RESOURCE_KEYWORDS: &[&str] = &[
	"ICON",
	"CURSOR",
	"FONT",
	"HTML",
	"BITMAP",
	"RCDATA",
	"TYPELIB",
	"MESSAGETABLE",
];

/// Flags that may appear between the resource type and the file name.
const MEMORY_FLAGS: &[&str] = &[
	"DISCARDABLE",
	"PRELOAD",
	"LOADONCALL",
	"MOVEABLE",
	"FIXED",
	"PURE",
	"IMPURE",
];

/// Headers that come with the compiler or SDK.
const PLATFORM_HEADERS: &[&str] = &[
	"afxres.h",
	"commctrl.h",
	"dlgs.h",
	"richedit.h",
	"verrsrc.h",
	"winres.h",
	"winresrc.h",
	"windows.h",
	"winuser.h",
	"winver.h",
];

#[derive(Debug, Error)]
pub enum ScanWarning {
	/// A referenced file doesn't exist. It is not listed as a dependency.
	#[error("Unable to find {0}")]
	Missing(String),
	#[error("Unable to read {file}: {error}")]
	Unreadable {
		file: String,
		#[source]
		error: io::Error,
	},
}

pub type Warning = ErrorWithLocation<ScanWarning>;

/// Find all files `rc_file` depends on.
///
/// `rc_file` and the results are relative to `project_dir`, in the order they
/// were first found. The script itself is not part of the result.
pub fn scan(project_dir: &Path, rc_file: &str) -> (Vec<String>, Vec<Warning>) {
	let rc_file = path::canonicalize_path(rc_file);
	let mut scanner = Scanner {
		project_dir,
		rc_dir: path::parent(&rc_file).to_string(),
		visited: HashSet::new(),
		deps: Vec::new(),
		warnings: Vec::new(),
	};
	scanner.visited.insert(path::fold_case(&rc_file));
	scanner.scan_file(&rc_file);
	(scanner.deps, scanner.warnings)
}

struct Scanner<'a> {
	project_dir: &'a Path,
	rc_dir: String,
	/// Case-folded paths of everything found so far, including the script.
	visited: HashSet<String>,
	deps: Vec<String>,
	warnings: Vec<Warning>,
}

impl<'a> Scanner<'a> {
	fn scan_file(&mut self, file: &str) {
		let full_path = self.project_dir.join(file);
		debug!("Scanning {:?}", full_path);
		let bytes = match std::fs::read(&full_path) {
			Ok(bytes) => bytes,
			Err(error) => {
				let warning = ScanWarning::Unreadable {
					file: file.to_string(),
					error,
				};
				self.warnings.push(warning.at(Location::file(&full_path)));
				return;
			}
		};
		let text = String::from_utf8_lossy(&bytes);
		let dir = path::parent(file).to_string();

		for (n, line) in text.lines().enumerate() {
			let loc = Location::line(&full_path, n + 1);
			let line = line.trim();
			if let Some(header) = include_of(line) {
				if is_platform_header(header) {
					continue;
				}
				if let Some(header) = self.resolve(&dir, header, loc) {
					if self.add(&header) {
						self.scan_file(&header);
					}
				}
			} else if let Some(resource) = resource_of(line) {
				if let Some(resource) = self.resolve(&dir, resource, loc) {
					self.add(&resource);
				}
			}
		}
	}

	/// Find a referenced file, first next to the file referring to it, then
	/// next to the resource script.
	fn resolve(&mut self, dir: &str, name: &str, loc: Location) -> Option<String> {
		let candidates = [path::join(dir, name), path::join(&self.rc_dir, name)];
		let found = candidates
			.iter()
			.find(|candidate| self.project_dir.join(candidate).is_file());
		if found.is_none() {
			let missing = ScanWarning::Missing(candidates[0].clone());
			self.warnings.push(missing.at(loc));
		}
		found.cloned()
	}

	/// Add a dependency. Returns false if it was seen before.
	fn add(&mut self, file: &str) -> bool {
		if !self.visited.insert(path::fold_case(file)) {
			return false;
		}
		self.deps.push(file.to_string());
		true
	}
}

/// The file name of an `#include "file"` line.
fn include_of(line: &str) -> Option<&str> {
	let rest = line.strip_prefix('#')?.trim_start().strip_prefix("include")?;
	quoted(rest.trim_start())
}

/// The file name of a resource statement, like `IDI_APP ICON "app.ico"`.
fn resource_of(line: &str) -> Option<&str> {
	if line.starts_with("//") {
		return None;
	}
	let mut words = line.split_whitespace();
	let _id = words.next()?;
	let keyword = words.next()?;
	if !RESOURCE_KEYWORDS.iter().any(|k| k.eq_ignore_ascii_case(keyword)) {
		return None;
	}
	let name = words.find(|word| !MEMORY_FLAGS.iter().any(|f| f.eq_ignore_ascii_case(word)))?;
	// The name may contain spaces, so take it from the line itself.
	let offset = name.as_ptr() as usize - line.as_ptr() as usize;
	let name = quoted(&line[offset..])?;
	if path::extension(name).is_some() {
		Some(name)
	} else {
		None
	}
}

/// The contents of a `"quoted string"` at the start of `s`.
fn quoted(s: &str) -> Option<&str> {
	let s = s.strip_prefix('"')?;
	let end = memchr::memchr(b'"', s.as_bytes())?;
	Some(&s[..end]).filter(|name| !name.is_empty())
}

fn is_platform_header(header: &str) -> bool {
	let name = path::file_name(header);
	PLATFORM_HEADERS
		.iter()
		.any(|platform| platform.eq_ignore_ascii_case(name))
}
