//! Splitting single lines of a project file into their parts.

use super::error::ParseWarning;
use crate::options::{self, Version};

/// The prefix of a commented-out option that this version did not know.
pub const UNRECOGNIZED_PREFIX: &str = "# [unrecognized] ";

/// An option line, split into its parts.
#[derive(Debug, PartialEq, Eq)]
pub struct RawOption<'a> {
	pub name: &'a str,
	pub value: &'a str,
	pub comment: Option<&'a str>,
}

/// Split `name: value # comment` (or `name = value`).
///
/// A value entirely in double quotes may contain `#`, and the quotes are not
/// part of the value. Otherwise the value runs up to the first `#` outside
/// quotes, and any quotes in it are kept.
pub fn eat_option(line: &str) -> Result<RawOption<'_>, ParseWarning> {
	let line = line.trim();
	let missing_separator = || ParseWarning::MissingSeparator(line.to_string());

	let sep = line.find(|c: char| c == ':' || c == '=').ok_or_else(missing_separator)?;
	let name = line[..sep].trim();
	if name.is_empty() || name.contains(char::is_whitespace) || name.starts_with('#') {
		return Err(missing_separator());
	}

	let rest = line[sep + 1..].trim_start();
	let (value, rest) = match fully_quoted(rest) {
		Some(split) => split,
		None => {
			let (value, rest) = split_comment(rest);
			(value.trim(), rest)
		}
	};

	let comment = match rest.trim_start().strip_prefix('#') {
		Some(comment) if !comment.trim().is_empty() => Some(comment.trim()),
		_ => None,
	};

	Ok(RawOption {
		name,
		value,
		comment,
	})
}

/// Split `"value" # comment` into the text between the quotes and the rest.
///
/// `None` if `s` doesn't start with a quote, or if anything other than a
/// comment follows the closing quote.
fn fully_quoted(s: &str) -> Option<(&str, &str)> {
	let quoted = s.strip_prefix('"')?;
	let end = memchr::memchr(b'"', quoted.as_bytes())?;
	let rest = quoted[end + 1..].trim_start();
	if rest.is_empty() || rest.starts_with('#') {
		Some((&quoted[..end], rest))
	} else {
		None
	}
}

/// Split at the first `#` outside quotes. The second half still starts with
/// the `#`.
fn split_comment(s: &str) -> (&str, &str) {
	let bytes = s.as_bytes();
	let mut quoted = false;
	for pos in memchr::memchr2_iter(b'#', b'"', bytes) {
		match bytes[pos] {
			b'"' => quoted = !quoted,
			_ if !quoted => return (&s[..pos], &s[pos..]),
			_ => {}
		}
	}
	(s, "")
}

/// Split a file list entry from a trailing ` # comment`.
pub fn eat_file_entry(line: &str) -> &str {
	let line = line.trim();
	let bytes = line.as_bytes();
	for pos in memchr::memchr_iter(b'#', bytes) {
		if pos > 0 && bytes[pos - 1].is_ascii_whitespace() {
			return line[..pos].trim_end();
		}
	}
	line
}

/// Split `source: destination` of a conversion section.
///
/// A `:` right after a drive letter is not a separator.
pub fn eat_pair(line: &str) -> Option<(&str, &str)> {
	let line = eat_file_entry(line);
	let bytes = line.as_bytes();
	memchr::memchr_iter(b':', bytes)
		.find(|&pos| {
			let drive = pos == 1
				&& bytes[0].is_ascii_alphabetic()
				&& matches!(bytes.get(2), Some(b'/') | Some(b'\\'));
			!drive
		})
		.map(|pos| (line[..pos].trim(), line[pos + 1..].trim()))
		.filter(|(source, destination)| !source.is_empty() && !destination.is_empty())
}

/// Recognize the `# Requires <tool> version X.Y.Z or higher to process`
/// header. Returns `None` for any other comment.
pub fn eat_version_header(line: &str) -> Option<Result<Version, ParseWarning>> {
	let text = line.trim().strip_prefix('#')?.trim();
	let mut words = text.split_whitespace();
	if !words.next()?.eq_ignore_ascii_case("requires") {
		return None;
	}
	let _tool = words.next()?;
	if !words.next()?.eq_ignore_ascii_case("version") {
		return None;
	}
	let version = words.next()?;
	Some(version.parse().map_err(ParseWarning::from))
}

/// Format the version header.
pub fn version_header(version: Version) -> String {
	format!(
		"# Requires {} version {} or higher to process",
		env!("CARGO_PKG_NAME"),
		version
	)
}

/// Whether an entry of a file list is a pattern rather than a file name.
pub fn is_glob(entry: &str) -> bool {
	entry.contains(|c: char| c == '*' || c == '?' || c == '[')
}

/// Whether a value must be quoted to read back the same.
///
/// Values that contain quotes themselves are written as they are.
pub fn needs_quotes(value: &str) -> bool {
	!value.contains('"') && (value.contains('#') || value.trim() != value)
}

/// Whether a line is a section header: it starts with a letter, without
/// indentation.
pub fn is_section_header(line: &str) -> bool {
	line.chars().next().map_or(false, |c| c.is_ascii_alphabetic())
}

/// Whether `name` is an option this version knows.
pub fn is_known_option(name: &str) -> bool {
	options::lookup_by_name(name).is_some()
}

#[cfg(test)]
mod test {
	use super::*;

	fn opt<'a>(name: &'a str, value: &'a str, comment: Option<&'a str>) -> RawOption<'a> {
		RawOption { name, value, comment }
	}

	#[test]
	#[rustfmt::skip]
	fn test_eat_option() {
		assert_eq!(eat_option("Project: app").unwrap(), opt("Project", "app", None));
		assert_eq!(eat_option("  exe_type = console  ").unwrap(), opt("exe_type", "console", None));
		assert_eq!(eat_option("warn: 3   # fewer warnings").unwrap(), opt("warn", "3", Some("fewer warnings")));
		assert_eq!(eat_option("cflags_cmn: \"-DCOLOR=#fff\" # quoted").unwrap(), opt("cflags_cmn", "-DCOLOR=#fff", Some("quoted")));
		assert_eq!(eat_option("cflags_cmn: -DA=1 -DB=2").unwrap(), opt("cflags_cmn", "-DA=1 -DB=2", None));
		assert_eq!(eat_option("inc_dirs: C:/sdk/include").unwrap(), opt("inc_dirs", "C:/sdk/include", None));
		assert_eq!(eat_option("pch:").unwrap(), opt("pch", "", None));
		assert_eq!(eat_option("pch: # none yet").unwrap(), opt("pch", "", Some("none yet")));
		assert_eq!(eat_option("natvis: \"unterminated").unwrap(), opt("natvis", "\"unterminated", None));
		assert_eq!(eat_option("cflags_cmn: \"-IC:/Program Files/sdk\" -DFOO").unwrap(), opt("cflags_cmn", "\"-IC:/Program Files/sdk\" -DFOO", None));
		assert_eq!(eat_option("cflags_cmn: \"a b\" -DX # two").unwrap(), opt("cflags_cmn", "\"a b\" -DX", Some("two")));
		assert_eq!(eat_option("cflags_cmn: -D\"C=#f\" -DX # hex").unwrap(), opt("cflags_cmn", "-D\"C=#f\" -DX", Some("hex")));
		assert_eq!(eat_option("cflags_cmn: \" padded \"").unwrap(), opt("cflags_cmn", " padded ", None));
	}

	#[test]
	#[rustfmt::skip]
	fn test_needs_quotes() {
		assert!(!needs_quotes("-DA=1 -DB=2"));
		assert!(needs_quotes("-DCOLOR=#fff"));
		assert!(needs_quotes(" padded"));
		assert!(!needs_quotes("\"a b\" -DX"));
	}

	#[test]
	fn test_eat_option_errors() {
		assert!(matches!(eat_option("no separator here"), Err(ParseWarning::MissingSeparator(_))));
		assert!(matches!(eat_option(": value"), Err(ParseWarning::MissingSeparator(_))));
		assert!(matches!(eat_option("two words: value"), Err(ParseWarning::MissingSeparator(_))));
	}

	#[test]
	#[rustfmt::skip]
	fn test_eat_pair() {
		assert_eq!(eat_pair("art/logo.png: logo_png.h"), Some(("art/logo.png", "logo_png.h")));
		assert_eq!(eat_pair("C:/art/logo.png: logo_png.h # image"), Some(("C:/art/logo.png", "logo_png.h")));
		assert_eq!(eat_pair("logo.png"), None);
		assert_eq!(eat_pair("logo.png:"), None);
	}

	#[test]
	#[rustfmt::skip]
	fn test_eat_file_entry() {
		assert_eq!(eat_file_entry("  main.cpp  "), "main.cpp");
		assert_eq!(eat_file_entry("main.cpp # entry point"), "main.cpp");
		assert_eq!(eat_file_entry("c#/file.cpp"), "c#/file.cpp");
	}

	#[test]
	fn test_version_header() {
		let header = version_header(Version::new(1, 2, 0));
		assert_eq!(eat_version_header(&header).unwrap().unwrap(), Version::new(1, 2, 0));
		assert_eq!(
			eat_version_header("# Requires othertool version 99.0.0 or higher to process").unwrap().unwrap(),
			Version::new(99, 0, 0)
		);
		assert!(eat_version_header("# Requires a compiler").is_none());
		assert!(eat_version_header("# just a comment").is_none());
		assert!(eat_version_header("# Requires x version abc").unwrap().is_err());
	}
}
