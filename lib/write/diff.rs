use crate::mtime::LocalTime;
use std::fmt;
use std::path::PathBuf;
use std::time::SystemTime;

/// How far ahead [`Diff::new`] looks for a matching line after a mismatch.
const LOOKAHEAD: usize = 8;

/// A line that differs between the old and the new script.
///
/// Line numbers are 1-based, and refer to the old file for removed lines and
/// to the new script for added lines.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DiffLine {
	Removed { line: usize, text: String },
	Added { line: usize, text: String },
}

/// The differences between a script on disk and a freshly generated one.
#[derive(Clone, Debug)]
pub struct Diff {
	pub path: PathBuf,
	/// When the file on disk was last modified, if known.
	pub modified: Option<SystemTime>,
	pub lines: Vec<DiffLine>,
}

impl Diff {
	/// Compare two scripts line by line.
	///
	/// Walks both with a pointer each. On a mismatch, it searches up to
	/// [`LOOKAHEAD`] lines ahead in both for the nearest pair of equal lines,
	/// and reports everything skipped over as removed or added. If nothing
	/// matches, the two lines are reported as a changed pair.
	pub fn new<A: AsRef<str>, B: AsRef<str>>(path: PathBuf, old: &[A], new: &[B]) -> Self {
		let mut lines = Vec::new();
		let (mut i, mut j) = (0, 0);

		let removed = |i: usize| DiffLine::Removed {
			line: i + 1,
			text: old[i].as_ref().to_string(),
		};
		let added = |j: usize| DiffLine::Added {
			line: j + 1,
			text: new[j].as_ref().to_string(),
		};

		while i < old.len() && j < new.len() {
			if old[i].as_ref() == new[j].as_ref() {
				i += 1;
				j += 1;
				continue;
			}
			let (skip_old, skip_new) = resync(old, new, i, j).unwrap_or((1, 1));
			lines.extend((i..i + skip_old).map(removed));
			lines.extend((j..j + skip_new).map(added));
			i += skip_old;
			j += skip_new;
		}
		lines.extend((i..old.len()).map(removed));
		lines.extend((j..new.len()).map(added));

		Diff {
			path,
			modified: None,
			lines,
		}
	}

	pub fn is_empty(&self) -> bool {
		self.lines.is_empty()
	}
}

/// Find the nearest `(di, dj)` for which `old[i + di] == new[j + dj]`.
fn resync<A: AsRef<str>, B: AsRef<str>>(
	old: &[A],
	new: &[B],
	i: usize,
	j: usize,
) -> Option<(usize, usize)> {
	for distance in 1..=2 * LOOKAHEAD {
		for di in 0..=distance.min(LOOKAHEAD) {
			let dj = distance - di;
			if dj > LOOKAHEAD {
				continue;
			}
			match (old.get(i + di), new.get(j + dj)) {
				(Some(a), Some(b)) if a.as_ref() == b.as_ref() => return Some((di, dj)),
				_ => {}
			}
		}
	}
	None
}

impl fmt::Display for Diff {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "--- {}", self.path.display())?;
		if let Some(modified) = self.modified {
			write!(f, " (modified {})", LocalTime(modified))?;
		}
		writeln!(f)?;
		writeln!(f, "+++ {} (generated)", self.path.display())?;
		for line in &self.lines {
			match line {
				DiffLine::Removed { line, text } => writeln!(f, "-{:>5}: {}", line, text)?,
				DiffLine::Added { line, text } => writeln!(f, "+{:>5}: {}", line, text)?,
			}
		}
		Ok(())
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use pretty_assertions::assert_eq;

	fn diff(old: &[&str], new: &[&str]) -> Vec<DiffLine> {
		Diff::new(PathBuf::from("x.ninja"), old, new).lines
	}

	fn removed(line: usize, text: &str) -> DiffLine {
		DiffLine::Removed { line, text: text.into() }
	}

	fn added(line: usize, text: &str) -> DiffLine {
		DiffLine::Added { line, text: text.into() }
	}

	#[test]
	fn identical() {
		assert!(diff(&["a", "b"], &["a", "b"]).is_empty());
		assert!(diff(&[], &[]).is_empty());
	}

	#[test]
	fn changed_line() {
		assert_eq!(
			diff(&["a", "flags = -O1", "c"], &["a", "flags = -O2", "c"]),
			vec![removed(2, "flags = -O1"), added(2, "flags = -O2")]
		);
	}

	#[test]
	fn inserted_lines_resync() {
		assert_eq!(
			diff(&["a", "b", "c", "d"], &["a", "x", "y", "b", "c", "d"]),
			vec![added(2, "x"), added(3, "y")]
		);
	}

	#[test]
	fn removed_lines_resync() {
		assert_eq!(
			diff(&["a", "x", "b", "c"], &["a", "b", "c"]),
			vec![removed(2, "x")]
		);
	}

	#[test]
	fn trailing_lines() {
		assert_eq!(diff(&["a"], &["a", "b"]), vec![added(2, "b")]);
		assert_eq!(diff(&["a", "b"], &["a"]), vec![removed(2, "b")]);
	}

	#[test]
	fn display() {
		let d = Diff::new(PathBuf::from("x.ninja"), &["a", "b"], &["a", "c"]);
		assert_eq!(
			d.to_string(),
			"--- x.ninja\n+++ x.ninja (generated)\n-    2: b\n+    2: c\n"
		);
	}
}
