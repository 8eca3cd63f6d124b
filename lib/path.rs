//! Lexical handling of the paths written in project files and resource
//! scripts.
//!
//! Paths are kept as strings with `/` separators, relative to the directory
//! of the project file. Nothing here touches the file system.

use std::path::Path;

/// Normalize a path: `\` becomes `/`, and `.` components, duplicate
/// separators, and `dir/..` pairs are removed.
///
/// Leading `..` components of a relative path are kept. The empty path stays
/// empty, but a path that cancels out completely becomes `.`.
pub fn canonicalize_path(path: &str) -> String {
	if path.is_empty() {
		return String::new();
	}

	let path = path.replace('\\', "/");
	let absolute = path.starts_with('/');

	let mut components: Vec<&str> = Vec::new();
	// Number of leading `..` components, which can't be removed anymore.
	let mut fixed = 0;

	for component in path.split('/') {
		match component {
			"" | "." => {}
			".." => {
				if components.len() > fixed {
					components.pop();
				} else if !absolute {
					components.push("..");
					fixed += 1;
				}
			}
			c => components.push(c),
		}
	}

	if absolute {
		format!("/{}", components.join("/"))
	} else if components.is_empty() {
		".".to_string()
	} else {
		components.join("/")
	}
}

/// Whether a path is absolute, either Unix style or with a drive letter.
pub fn is_absolute(path: &str) -> bool {
	let bytes = path.as_bytes();
	path.starts_with('/')
		|| path.starts_with('\\')
		|| (bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':')
}

/// Express `path`, which is relative to `dir`, relative to where `dir` is
/// relative to.
///
/// Absolute paths are returned as-is (but canonicalized).
pub fn join(dir: &str, path: &str) -> String {
	if dir.is_empty() || dir == "." || is_absolute(path) {
		canonicalize_path(path)
	} else {
		canonicalize_path(&format!("{}/{}", dir, path))
	}
}

/// The directory part of a path. Empty if there is none.
pub fn parent(path: &str) -> &str {
	match path.rfind(|c: char| c == '/' || c == '\\') {
		Some(0) => "/",
		Some(n) => &path[..n],
		None => "",
	}
}

/// The last component of a path.
pub fn file_name(path: &str) -> &str {
	match path.rfind(|c: char| c == '/' || c == '\\') {
		Some(n) => &path[n + 1..],
		None => path,
	}
}

/// The file name without its extension.
pub fn file_stem(path: &str) -> &str {
	let name = file_name(path);
	match name.rfind('.') {
		Some(0) | None => name,
		Some(n) => &name[..n],
	}
}

/// The extension of the file name, lower-cased, without the dot.
pub fn extension(path: &str) -> Option<String> {
	Path::new(file_name(path))
		.extension()
		.and_then(|e| e.to_str())
		.map(str::to_ascii_lowercase)
}

/// The key used to compare paths on case-insensitive file systems.
pub fn fold_case(path: &str) -> String {
	canonicalize_path(path).to_lowercase()
}

/// Replace the extension of the file name (or add one).
pub fn with_extension(path: &str, extension: &str) -> String {
	let dir = parent(path);
	let stem = file_stem(path);
	if dir.is_empty() {
		format!("{}.{}", stem, extension)
	} else if dir == "/" {
		format!("/{}.{}", stem, extension)
	} else {
		format!("{}/{}.{}", dir, stem, extension)
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	#[rustfmt::skip]
	fn test_canonicalize_path() {
		assert_eq!(canonicalize_path(""), "");
		assert_eq!(canonicalize_path("hello"), "hello");
		assert_eq!(canonicalize_path("./hello"), "hello");
		assert_eq!(canonicalize_path("foo/./bar/baz"), "foo/bar/baz");
		assert_eq!(canonicalize_path("foo/bar/baz/./."), "foo/bar/baz");
		assert_eq!(canonicalize_path("/foo/./bar/baz"), "/foo/bar/baz");
		assert_eq!(canonicalize_path("/./foo/bar/baz"), "/foo/bar/baz");
		assert_eq!(canonicalize_path("foo/../baz"), "baz");
		assert_eq!(canonicalize_path("foo/.ok"), "foo/.ok");
		assert_eq!(canonicalize_path(".//foo///bar////..//baz////blah.x"), "foo/baz/blah.x");
		assert_eq!(canonicalize_path("./."), ".");
		assert_eq!(canonicalize_path("/."), "/");
		assert_eq!(canonicalize_path("foo/.."), ".");
		assert_eq!(canonicalize_path("/foo/../"), "/");
		assert_eq!(canonicalize_path("../foo/../"), "..");
		assert_eq!(canonicalize_path("../foo/../test"), "../test");
		assert_eq!(canonicalize_path("../../test"), "../../test");
		assert_eq!(canonicalize_path("foo/../../test"), "../test");
		assert_eq!(canonicalize_path("../x/a/b/../c/../.."), "../x");
		assert_eq!(canonicalize_path("res\\icons\\..\\app.ico"), "res/app.ico");
	}

	#[test]
	#[rustfmt::skip]
	fn test_join() {
		assert_eq!(join("", "main.cpp"), "main.cpp");
		assert_eq!(join(".", "./main.cpp"), "main.cpp");
		assert_eq!(join("../common", "util.cpp"), "../common/util.cpp");
		assert_eq!(join("../common", "../other/x.cpp"), "../other/x.cpp");
		assert_eq!(join("sub", "/abs/x.cpp"), "/abs/x.cpp");
		assert_eq!(join("sub", "C:/abs/x.cpp"), "C:/abs/x.cpp");
	}

	#[test]
	#[rustfmt::skip]
	fn test_components() {
		assert_eq!(parent("res/app.rc"), "res");
		assert_eq!(parent("app.rc"), "");
		assert_eq!(parent("/app.rc"), "/");
		assert_eq!(file_name("res\\app.rc"), "app.rc");
		assert_eq!(file_stem("res/app.rc"), "app");
		assert_eq!(file_stem(".srcfiles.yaml"), ".srcfiles");
		assert_eq!(file_stem("Makefile"), "Makefile");
		assert_eq!(extension("src/Main.CPP").as_deref(), Some("cpp"));
		assert_eq!(extension("src/makefile"), None);
		assert_eq!(with_extension("idl/iface.idl", "h"), "idl/iface.h");
		assert_eq!(with_extension("pch.cpp", "obj"), "pch.obj");
		assert_eq!(fold_case("./Res/App.ICO"), "res/app.ico");
	}
}
