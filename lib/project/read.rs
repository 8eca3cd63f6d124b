use super::eat::{
	eat_file_entry, eat_option, eat_pair, eat_version_header, is_glob, is_known_option,
	is_section_header, UNRECOGNIZED_PREFIX,
};
use super::error::{ParseWarning, ProjectError};
use super::glob;
use super::{is_source_file, OptionLine, ProjectModel};
use crate::error::{AddLocationToError, ErrorWithLocation, Location};
use crate::options::{self, OptionKey, TOOL_VERSION};
use crate::path;
use indexmap::IndexMap;
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

/// A recoverable problem found while reading, at the line where it occured.
pub type Warning = ErrorWithLocation<ParseWarning>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Section {
	None,
	Options,
	Files,
	DebugFiles,
	Gzip,
	Xpm,
	Png,
	/// A section this version doesn't know. Its content is skipped.
	Unknown,
}

impl Section {
	fn from_header(line: &str) -> Option<Self> {
		let name = line.split(':').next().unwrap_or("").trim();
		Some(match name.to_ascii_lowercase().as_str() {
			"options" => Section::Options,
			"files" => Section::Files,
			"debugfiles" => Section::DebugFiles,
			"gzip" => Section::Gzip,
			"xpm" => Section::Xpm,
			"png" => Section::Png,
			_ => return None,
		})
	}
}

/// Read and parse a project file, including any `.include`d files.
///
/// Only a project file that can't be read, or one that requires a newer
/// version of this tool, is an error. Everything else is reported as a
/// warning, and the rest of the file is still read.
pub fn read(file: &Path) -> Result<(ProjectModel, Vec<Warning>), ProjectError> {
	let source = read_text(file).map_err(|error| ProjectError::Io {
		file: file.to_path_buf(),
		error,
	})?;
	read_from(file, &source)
}

/// [`read()`], but with the source given directly instead of read from a file.
///
/// `file` is used in warnings, and to know where to look for the listed
/// files and `.include`d project files.
pub fn read_from(file: &Path, source: &str) -> Result<(ProjectModel, Vec<Warning>), ProjectError> {
	let mut reader = Reader {
		model: ProjectModel::new(file),
		warnings: Vec::new(),
		including: vec![identity(file)],
	};
	reader.read_root(file, source)?;
	let Reader {
		mut model,
		warnings,
		..
	} = reader;
	derive_defaults(&mut model);
	Ok((model, warnings))
}

fn read_text(file: &Path) -> std::io::Result<String> {
	let bytes = fs::read(file)?;
	Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// What makes two paths the same file, for detecting include cycles.
fn identity(file: &Path) -> PathBuf {
	fs::canonicalize(file).unwrap_or_else(|_| file.to_path_buf())
}

struct Reader {
	model: ProjectModel,
	warnings: Vec<Warning>,
	/// The files currently being read, outermost first.
	including: Vec<PathBuf>,
}

impl Reader {
	fn warn(&mut self, location: Location, warning: ParseWarning) {
		let warning = warning.at(location);
		debug!("{}", warning);
		self.warnings.push(warning);
	}

	fn read_root(&mut self, file: &Path, source: &str) -> Result<(), ProjectError> {
		let mut section = Section::None;

		for (n, raw_line) in source.lines().enumerate() {
			let loc = Location::line(file, n + 1);
			let line = raw_line.trim_end();
			let trimmed = line.trim_start();
			if trimmed.is_empty() {
				continue;
			}

			if trimmed.starts_with('#') {
				if section == Section::None {
					match eat_version_header(trimmed) {
						Some(Ok(version)) => {
							if version > TOOL_VERSION {
								return Err(ProjectError::VersionTooNew {
									file: file.to_path_buf(),
									required: version,
									current: TOOL_VERSION,
								});
							}
							self.model.required_version = Some(version);
						}
						Some(Err(warning)) => self.warn(loc, warning),
						None => {}
					}
				} else if section == Section::Options {
					if let Some(raw) = trimmed.strip_prefix(UNRECOGNIZED_PREFIX.trim_end()) {
						self.read_unrecognized(raw.trim_start(), loc);
					}
				}
				continue;
			}

			if is_section_header(line) {
				section = Section::from_header(line).unwrap_or_else(|| {
					let name = line.trim_end_matches(':').to_string();
					self.warn(loc, ParseWarning::UnknownSection(name));
					Section::Unknown
				});
				continue;
			}

			match section {
				Section::None => self.warn(loc, ParseWarning::NoSection),
				Section::Unknown => {}
				Section::Options => self.read_option(trimmed, loc),
				Section::Files => {
					let entry = eat_file_entry(trimmed);
					self.model.declared_files.push(entry.to_string());
					self.read_file_entry(entry, "", false, loc);
				}
				Section::DebugFiles => {
					let entry = eat_file_entry(trimmed);
					self.model.declared_debug_files.push(entry.to_string());
					self.read_file_entry(entry, "", true, loc);
				}
				Section::Gzip => self.read_pair(trimmed, Section::Gzip, loc),
				Section::Xpm => self.read_pair(trimmed, Section::Xpm, loc),
				Section::Png => self.read_pair(trimmed, Section::Png, loc),
			}
		}

		Ok(())
	}

	fn read_option(&mut self, line: &str, loc: Location) {
		let option = match eat_option(line) {
			Ok(option) => option,
			Err(warning) => return self.warn(loc, warning),
		};
		match options::lookup_by_name(option.name) {
			Some(descriptor) => self.model.apply(OptionLine::Recognized {
				key: descriptor.key,
				value: option.value.to_string(),
				comment: option.comment.map(str::to_string),
			}),
			None => {
				self.warn(loc, ParseWarning::UnknownOption(option.name.to_string()));
				self.model.apply(OptionLine::Unrecognized(line.to_string()));
			}
		}
	}

	/// An option that an older version commented out because it didn't
	/// know it. Revived if this version does.
	fn read_unrecognized(&mut self, raw: &str, loc: Location) {
		match eat_option(raw) {
			Ok(option) if is_known_option(option.name) => {
				debug!("Reviving option {}", option.name);
				self.read_option(raw, loc);
			}
			_ => self.model.apply(OptionLine::Unrecognized(raw.to_string())),
		}
	}

	/// Add the file(s) of a `Files:` or `DebugFiles:` entry.
	///
	/// `base` is the directory of the file declaring the entry, relative to
	/// the project directory.
	fn read_file_entry(&mut self, entry: &str, base: &str, debug: bool, loc: Location) {
		if entry.is_empty() {
			return;
		}
		if let Some(include) = entry.strip_prefix(".include") {
			let include = include.trim();
			if !include.is_empty() {
				return self.read_include(&path::join(base, include), debug, loc);
			}
		}
		let files = if is_glob(entry) {
			match glob::expand(&self.model.dir.join(base), entry) {
				Ok(files) => files,
				Err(warning) => return self.warn(loc, warning),
			}
		} else {
			vec![entry.to_string()]
		};
		for file in files {
			let file = path::join(base, &file);
			if debug {
				self.model.add_debug_file(&file);
			} else {
				self.model.add_file(&file);
			}
		}
	}

	/// Merge the `Files:` of another project file.
	///
	/// `include` is relative to the project directory. The files listed in
	/// the included file are relative to that file's own directory.
	fn read_include(&mut self, include: &str, debug: bool, loc: Location) {
		let file = self.model.dir.join(include);
		let id = identity(&file);
		if self.including.contains(&id) {
			return self.warn(loc, ParseWarning::IncludeCycle(include.to_string()));
		}
		let source = match read_text(&file) {
			Ok(source) => source,
			Err(error) => {
				let path = include.to_string();
				return self.warn(loc, ParseWarning::Include { path, error });
			}
		};
		debug!("Including {:?}", file);

		self.including.push(id);
		let base = path::parent(include).to_string();
		let mut in_files = false;
		for (n, line) in source.lines().enumerate() {
			let trimmed = line.trim();
			if trimmed.is_empty() || trimmed.starts_with('#') {
				continue;
			}
			if is_section_header(line) {
				in_files = Section::from_header(line) == Some(Section::Files);
			} else if in_files {
				let entry = eat_file_entry(trimmed);
				self.read_file_entry(entry, &base, debug, Location::line(&file, n + 1));
			}
		}
		self.including.pop();
	}

	fn read_pair(&mut self, line: &str, section: Section, loc: Location) {
		let (source, destination) = match eat_pair(line) {
			Some(pair) => pair,
			None => return self.warn(loc, ParseWarning::MissingSeparator(line.to_string())),
		};
		let map: &mut IndexMap<String, String> = match section {
			Section::Gzip => &mut self.model.gzip,
			Section::Xpm => &mut self.model.xpm,
			_ => &mut self.model.png,
		};
		map.insert(source.to_string(), destination.to_string());
	}
}

/// Fill in what the project file left out: the project name, and the list
/// of files if none were given.
fn derive_defaults(model: &mut ProjectModel) {
	if !model.has_option(OptionKey::Project) {
		if let Some(name) = default_project_name(&model.dir) {
			debug!("Using {:?} as project name", name);
			model.set_option(OptionKey::Project, &name);
		}
	}

	if model.declared_files.is_empty() && model.files.is_empty() {
		let mut sources: Vec<String> = fs::read_dir(&model.dir)
			.into_iter()
			.flatten()
			.filter_map(|entry| entry.ok())
			.filter(|entry| entry.file_type().map_or(false, |t| t.is_file()))
			.filter_map(|entry| entry.file_name().to_str().map(str::to_string))
			.filter(|name| is_source_file(name))
			.collect();
		sources.sort();
		debug!("No files listed, using {:?}", sources);
		for source in sources {
			model.add_file(&source);
		}
	}
}

/// The name of the project directory, or of its parent if the project is in
/// a `src` or `source` directory.
fn default_project_name(dir: &Path) -> Option<String> {
	let dir = fs::canonicalize(dir).unwrap_or_else(|_| dir.to_path_buf());
	let name = dir.file_name()?.to_str()?;
	if name.eq_ignore_ascii_case("src") || name.eq_ignore_ascii_case("source") {
		dir.parent()?.file_name()?.to_str().map(str::to_string)
	} else {
		Some(name.to_string())
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::options::Version;
	use std::io::Error;

	fn write(dir: &Path, name: &str, content: &str) -> Result<PathBuf, Error> {
		let file = dir.join(name);
		if let Some(parent) = file.parent() {
			fs::create_dir_all(parent)?;
		}
		fs::write(&file, content)?;
		Ok(file)
	}

	#[test]
	fn reads_sections() -> Result<(), Error> {
		let dir = tempfile::tempdir()?;
		let file = write(
			dir.path(),
			".srcfiles.yaml",
			"# Requires ninjgen version 1.2.0 or higher to process\n\
			 \n\
			 Options:\n\
			 \x20   Project: app   # the app\n\
			 \x20   exe_type = console\n\
			 \x20   32bit: Yes\n\
			 \x20   cflags_cmn: \"-DCOLOR=#fff\"\n\
			 \n\
			 Files:\n\
			 \x20   main.cpp\n\
			 \x20   app.rc   # resources\n\
			 \n\
			 DebugFiles:\n\
			 \x20   debug.cpp\n\
			 \n\
			 PNG:\n\
			 \x20   art/logo.png: logo_png.h\n",
		)?;
		let (model, warnings) = read(&file).unwrap();
		assert!(warnings.is_empty(), "{:?}", warnings);
		assert_eq!(model.required_version, Some(Version::new(1, 2, 0)));
		assert_eq!(model.project_name(), "app");
		assert_eq!(model.option_comment(OptionKey::Project), Some("the app"));
		assert_eq!(model.get_option(OptionKey::ExeType), Some("console"));
		assert_eq!(model.get_option(OptionKey::Bit32), Some("true"));
		assert_eq!(model.get_option(OptionKey::CflagsCmn), Some("-DCOLOR=#fff"));
		assert_eq!(model.files().iter().collect::<Vec<_>>(), vec!["main.cpp", "app.rc"]);
		assert_eq!(model.rc_file(), Some("app.rc"));
		assert_eq!(model.debug_files().iter().collect::<Vec<_>>(), vec!["debug.cpp"]);
		assert_eq!(model.png.get("art/logo.png").map(String::as_str), Some("logo_png.h"));
		Ok(())
	}

	#[test]
	fn missing_file_is_fatal() {
		let dir = tempfile::tempdir().unwrap();
		let result = read(&dir.path().join(".srcfiles.yaml"));
		assert!(matches!(result, Err(ProjectError::Io { .. })));
	}

	#[test]
	fn newer_version_is_fatal() {
		let source = "# Requires ninjgen version 99.0.0 or higher to process\nOptions:\n    Project: x\n";
		match read_from(Path::new("x/.srcfiles.yaml"), source) {
			Err(ProjectError::VersionTooNew { required, current, .. }) => {
				assert_eq!(required, Version::new(99, 0, 0));
				assert_eq!(current, TOOL_VERSION);
			}
			other => panic!("unexpected result: {:?}", other.map(|(_, w)| w)),
		}
	}

	#[test]
	fn bad_lines_are_warnings() {
		let source = "  stray\n\
		              Options:\n\
		              \x20   Project: x\n\
		              \x20   no separator\n\
		              \x20   future_option: 42  # from the future\n\
		              \x20   warn: 3\n\
		              Extras:\n\
		              \x20   ignored\n\
		              GZIP:\n\
		              \x20   missing-destination\n";
		let (model, warnings) = read_from(Path::new("x/.srcfiles.yaml"), source).unwrap();
		let lines: Vec<_> = warnings.iter().map(|w| w.line.map_or(0, |l| l.get())).collect();
		assert_eq!(lines, vec![1, 4, 5, 7, 10]);
		assert!(matches!(warnings[0].error, ParseWarning::NoSection));
		assert!(matches!(warnings[1].error, ParseWarning::MissingSeparator(_)));
		assert!(matches!(&warnings[2].error, ParseWarning::UnknownOption(n) if n == "future_option"));
		assert!(matches!(&warnings[3].error, ParseWarning::UnknownSection(n) if n == "Extras"));
		assert_eq!(model.get_option(OptionKey::Warn), Some("3"));
		assert_eq!(
			model.unrecognized_options(),
			&["future_option: 42  # from the future".to_string()]
		);
	}

	#[test]
	fn revives_recognized_options() {
		let source = "Options:\n\
		              \x20   # [unrecognized] warn: 2  # was unknown\n\
		              \x20   # [unrecognized] future_option: 1\n\
		              \x20   # an ordinary comment\n";
		let (model, warnings) = read_from(Path::new("x/.srcfiles.yaml"), source).unwrap();
		assert!(warnings.is_empty());
		assert_eq!(model.get_option(OptionKey::Warn), Some("2"));
		assert_eq!(model.option_comment(OptionKey::Warn), Some("was unknown"));
		assert_eq!(model.unrecognized_options(), &["future_option: 1".to_string()]);
	}

	#[test]
	fn glob_and_explicit_file_are_one_entry() -> Result<(), Error> {
		let dir = tempfile::tempdir()?;
		write(dir.path(), "main.cpp", "")?;
		write(dir.path(), "util.cpp", "")?;
		let file = write(
			dir.path(),
			".srcfiles.yaml",
			"Files:\n    main.cpp\n    *.cpp\n",
		)?;
		let (model, warnings) = read(&file).unwrap();
		assert!(warnings.is_empty());
		assert_eq!(model.files().iter().collect::<Vec<_>>(), vec!["main.cpp", "util.cpp"]);
		assert_eq!(model.declared_files(), &["main.cpp".to_string(), "*.cpp".to_string()]);
		Ok(())
	}

	#[test]
	fn includes_are_rebased() -> Result<(), Error> {
		let dir = tempfile::tempdir()?;
		write(dir.path(), "common/sub/x.cpp", "")?;
		write(dir.path(), "common/sub/y.cpp", "")?;
		write(
			dir.path(),
			"common/.srcfiles.yaml",
			"Options:\n    Project: common\nFiles:\n    util.cpp\n    sub/*.cpp\n    ../shared/z.cpp\n",
		)?;
		let file = write(
			dir.path(),
			"app/.srcfiles.yaml",
			"Files:\n    main.cpp\n    .include ../common/.srcfiles.yaml\n",
		)?;
		let (model, warnings) = read(&file).unwrap();
		assert!(warnings.is_empty(), "{:?}", warnings);
		assert_eq!(
			model.files().iter().collect::<Vec<_>>(),
			vec![
				"main.cpp",
				"../common/util.cpp",
				"../common/sub/x.cpp",
				"../common/sub/y.cpp",
				"../shared/z.cpp",
			]
		);
		assert_eq!(model.project_name(), "app");
		Ok(())
	}

	#[test]
	fn include_problems_are_warnings() -> Result<(), Error> {
		let dir = tempfile::tempdir()?;
		write(dir.path(), "a/.srcfiles.yaml", "Files:\n    a.cpp\n    .include ../b/.srcfiles.yaml\n")?;
		write(dir.path(), "b/.srcfiles.yaml", "Files:\n    b.cpp\n    .include ../a/.srcfiles.yaml\n")?;
		let file = write(
			dir.path(),
			"main/.srcfiles.yaml",
			"Files:\n    .include ../a/.srcfiles.yaml\n    .include missing.yaml\n",
		)?;
		let (model, warnings) = read(&file).unwrap();
		assert_eq!(warnings.len(), 2);
		assert!(matches!(warnings[0].error, ParseWarning::IncludeCycle(_)));
		assert!(matches!(warnings[1].error, ParseWarning::Include { .. }));
		assert_eq!(model.files().iter().collect::<Vec<_>>(), vec!["../a/a.cpp", "../b/b.cpp"]);
		Ok(())
	}

	#[test]
	fn defaults_without_files() -> Result<(), Error> {
		let dir = tempfile::tempdir()?;
		let src = dir.path().join("myproject").join("src");
		write(&src, "b.cpp", "")?;
		write(&src, "a.c", "")?;
		write(&src, "a.h", "")?;
		let file = write(&src, ".srcfiles.yaml", "Options:\n    exe_type: console\n")?;
		let (model, _) = read(&file).unwrap();
		assert_eq!(model.project_name(), "myproject");
		assert_eq!(model.files().iter().collect::<Vec<_>>(), vec!["a.c", "b.cpp"]);
		Ok(())
	}
}
