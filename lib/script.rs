//! The text of a generated build script.

use std::fmt;

/// A build script being assembled, line by line.
///
/// Trailing whitespace is trimmed from every line, and a blank line directly
/// after another blank line (or at the very start) is dropped. This keeps
/// formatting noise out of the comparison with the script already on disk.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GeneratedScript {
	lines: Vec<String>,
}

impl GeneratedScript {
	/// Create an empty script.
	pub fn new() -> Self {
		GeneratedScript { lines: Vec::new() }
	}

	/// Append text. Text containing newlines is split into multiple lines.
	pub fn push(&mut self, text: impl AsRef<str>) {
		for line in text.as_ref().split('\n') {
			let line = line.trim_end();
			let last_blank = self.lines.last().map_or(true, |l| l.is_empty());
			if line.is_empty() && last_blank {
				continue;
			}
			self.lines.push(line.to_string());
		}
	}

	/// Append an empty line.
	pub fn blank(&mut self) {
		self.push("");
	}

	/// Build a script from existing text, normalizing it the same way.
	pub fn from_text(text: &str) -> Self {
		let mut script = GeneratedScript::new();
		for line in text.lines() {
			script.push(line);
		}
		script
	}

	/// The lines of the script, without a trailing blank line.
	pub fn lines(&self) -> &[String] {
		match self.lines.last() {
			Some(last) if last.is_empty() => &self.lines[..self.lines.len() - 1],
			_ => &self.lines,
		}
	}

	pub fn is_empty(&self) -> bool {
		self.lines().is_empty()
	}
}

impl fmt::Display for GeneratedScript {
	/// Every line followed by a newline.
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		for line in self.lines() {
			writeln!(f, "{}", line)?;
		}
		Ok(())
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn collapses_blank_lines() {
		let mut script = GeneratedScript::new();
		script.blank();
		script.push("rule compile  ");
		script.push("  command = cl.exe $in\t");
		script.blank();
		script.blank();
		script.push("\n\nbuild a.obj : compile a.cpp\n");
		assert_eq!(
			script.lines(),
			&["rule compile", "  command = cl.exe $in", "", "build a.obj : compile a.cpp"]
		);
		assert_eq!(
			script.to_string(),
			"rule compile\n  command = cl.exe $in\n\nbuild a.obj : compile a.cpp\n"
		);
	}

	#[test]
	fn from_text_normalizes() {
		let script = GeneratedScript::from_text("a \r\n\r\n\r\nb\r\n");
		assert_eq!(script.lines(), &["a", "", "b"]);
		assert!(GeneratedScript::from_text("\n\n").is_empty());
	}
}
