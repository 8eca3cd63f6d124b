//! Expanding file patterns in file lists.

use super::error::ParseWarning;
use crate::path;
use globset::GlobBuilder;
use std::fs;
use std::path::Path;

/// Expand a pattern like `src/*.cpp` to the matching files.
///
/// `pattern` is relative to `dir`, and so are the results. Only the file
/// name may contain wildcards. Results are sorted, so the order does not
/// depend on the file system.
pub fn expand(dir: &Path, pattern: &str) -> Result<Vec<String>, ParseWarning> {
	let pattern_dir = path::parent(pattern);
	let name_pattern = path::file_name(pattern);

	let matcher = GlobBuilder::new(name_pattern)
		.literal_separator(true)
		.case_insensitive(cfg!(windows))
		.build()
		.map_err(|error| ParseWarning::InvalidGlob {
			pattern: pattern.to_string(),
			error,
		})?
		.compile_matcher();

	let entries = fs::read_dir(dir.join(pattern_dir)).map_err(|error| ParseWarning::ListDir {
		pattern: pattern.to_string(),
		error,
	})?;

	let mut matches = Vec::new();
	for entry in entries {
		let entry = entry.map_err(|error| ParseWarning::ListDir {
			pattern: pattern.to_string(),
			error,
		})?;
		if !entry.file_type().map_or(false, |t| t.is_file()) {
			continue;
		}
		if let Some(name) = entry.file_name().to_str() {
			if matcher.is_match(name) {
				matches.push(path::join(pattern_dir, name));
			}
		}
	}
	matches.sort();
	Ok(matches)
}
