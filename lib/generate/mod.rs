//! Generating build scripts from a [`ProjectModel`].
//!
//! Every project is built in a matrix of [`BuildTarget`]s: each combination
//! of [`Compiler`], [`Bitness`] and [`Configuration`] gets its own ninja
//! file, named after [`BuildTarget::dir_suffix`]:
//!
//! ```text
//! build/msvc_debug64.ninja    -> bin/appD.exe
//! build/msvc_release64.ninja  -> bin/app.exe
//! build/clang_debug64.ninja   -> bin/appD.exe
//! ...
//! ```
//!
//! [`Generator::ninja`] creates one of these scripts, and [`makefile()`]
//! creates a makefile with a short target name for each of them.

mod flags;
mod libs;
mod makefile;
mod ninja;

pub use self::flags::FlagEnv;
pub use self::libs::{resolve_build_libs, LibProject};
pub use self::makefile::{make_target, makefile, makefile_wanted, MAKEFILE};

use crate::options::{self, OptionKey};
use crate::path;
use crate::project::{error::ProjectError, ExeType, ProjectModel};
use std::fmt;
use thiserror::Error;

/// The default directory for the generated ninja files.
pub const DEFAULT_BUILD_DIR: &str = "build";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Configuration {
	Debug,
	Release,
}

impl Configuration {
	pub fn name(self) -> &'static str {
		match self {
			Configuration::Debug => "debug",
			Configuration::Release => "release",
		}
	}

	pub fn is_debug(self) -> bool {
		self == Configuration::Debug
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Compiler {
	/// `cl.exe`
	Msvc,
	/// `clang-cl`
	Clang,
	/// `g++`
	Gcc,
}

impl Compiler {
	pub const ALL: [Compiler; 3] = [Compiler::Msvc, Compiler::Clang, Compiler::Gcc];

	pub fn name(self) -> &'static str {
		match self {
			Compiler::Msvc => "msvc",
			Compiler::Clang => "clang",
			Compiler::Gcc => "gcc",
		}
	}

	pub fn from_name(name: &str) -> Option<Self> {
		Compiler::ALL
			.iter()
			.copied()
			.find(|c| c.name().eq_ignore_ascii_case(name))
	}

	/// Whether the compiler takes `cl.exe` style arguments.
	pub fn is_msvc_like(self) -> bool {
		self != Compiler::Gcc
	}

	/// The extension of object files.
	pub fn object_extension(self) -> &'static str {
		if self.is_msvc_like() {
			"obj"
		} else {
			"o"
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Bitness {
	Bits64,
	Bits32,
}

impl Bitness {
	pub fn bits(self) -> u32 {
		match self {
			Bitness::Bits64 => 64,
			Bitness::Bits32 => 32,
		}
	}
}

/// One combination of compiler, bitness and configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BuildTarget {
	pub compiler: Compiler,
	pub bitness: Bitness,
	pub configuration: Configuration,
}

impl BuildTarget {
	pub fn new(compiler: Compiler, bitness: Bitness, configuration: Configuration) -> Self {
		BuildTarget {
			compiler,
			bitness,
			configuration,
		}
	}

	/// All combinations: by compiler, 64-bit before 32-bit, debug before
	/// release.
	pub fn all() -> Vec<BuildTarget> {
		let mut targets = Vec::with_capacity(12);
		for &compiler in &Compiler::ALL {
			for &bitness in &[Bitness::Bits64, Bitness::Bits32] {
				for &configuration in &[Configuration::Debug, Configuration::Release] {
					targets.push(BuildTarget::new(compiler, bitness, configuration));
				}
			}
		}
		targets
	}

	/// The targets selected by the `compilers`, `64bit` and `32bit` options.
	///
	/// Unknown compiler names are reported, and otherwise ignored.
	pub fn selected(model: &ProjectModel) -> (Vec<BuildTarget>, Vec<GenerateError>) {
		let mut errors = Vec::new();
		let mut compilers = Vec::new();
		for name in model.option_list(OptionKey::Compilers) {
			match Compiler::from_name(name) {
				Some(c) => compilers.push(c),
				None => errors.push(GenerateError::UnknownCompiler(name.to_string())),
			}
		}
		let bits64 = model.is_option_true(OptionKey::Bit64);
		let bits32 = model.is_option_true(OptionKey::Bit32);
		let targets = BuildTarget::all()
			.into_iter()
			.filter(|t| compilers.contains(&t.compiler))
			.filter(|t| match t.bitness {
				Bitness::Bits64 => bits64,
				Bitness::Bits32 => bits32,
			})
			.collect();
		(targets, errors)
	}

	/// E.g. `msvc_debug64`. Used for the script name and the directory of
	/// intermediate files.
	pub fn dir_suffix(&self) -> String {
		format!(
			"{}_{}{}",
			self.compiler.name(),
			self.configuration.name(),
			self.bitness.bits()
		)
	}

	/// E.g. `msvc_debug64.ninja`.
	pub fn script_name(&self) -> String {
		format!("{}.ninja", self.dir_suffix())
	}

	/// The path of the binary this target builds, relative to the project
	/// directory.
	pub fn target_path(&self, model: &ProjectModel) -> String {
		let exe_type = model.exe_type().unwrap_or(ExeType::Window);
		let is_lib = exe_type == ExeType::Lib;

		let mut name = model.project_name().to_string();
		match self.bitness {
			Bitness::Bits64 if model.is_option_true(OptionKey::Bit64Suffix) => name.push_str("64"),
			Bitness::Bits32 if model.is_option_true(OptionKey::Bit32Suffix) => name.push_str("32"),
			_ => {}
		}
		if self.configuration.is_debug() && model.is_option_true(OptionKey::DebugSuffix) {
			name.push('D');
		}

		let file = match (self.compiler, exe_type) {
			(Compiler::Gcc, ExeType::Lib) => format!("lib{}.a", name),
			(Compiler::Gcc, ExeType::Dll) | (Compiler::Gcc, ExeType::Ocx) => format!("lib{}.so", name),
			(Compiler::Gcc, _) => name,
			(_, ExeType::Lib) => format!("{}.lib", name),
			(_, ExeType::Dll) => format!("{}.dll", name),
			(_, ExeType::Ocx) => format!("{}.ocx", name),
			(_, _) => format!("{}.exe", name),
		};

		let (key, default) = match (self.bitness, is_lib) {
			(Bitness::Bits64, false) => (OptionKey::TargetDir64, "bin"),
			(Bitness::Bits64, true) => (OptionKey::TargetDir64, "lib"),
			(Bitness::Bits32, false) => (OptionKey::TargetDir32, "bin32"),
			(Bitness::Bits32, true) => (OptionKey::TargetDir32, "lib32"),
		};
		let dir = model.get_option(key).filter(|d| !d.is_empty()).unwrap_or(default);
		path::join(dir, &file)
	}
}

impl fmt::Display for BuildTarget {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(
			f,
			"{} {} {}-bit",
			self.compiler.name(),
			self.configuration.name(),
			self.bitness.bits()
		)
	}
}

/// A problem that prevents generating (part of) a build script.
#[derive(Debug, Error)]
pub enum GenerateError {
	#[error("Required option {0} has no value")]
	MissingRequired(&'static str),
	#[error("Invalid value {value:?} for option {option}")]
	InvalidValue { option: &'static str, value: String },
	#[error("Unknown compiler {0:?} in option compilers")]
	UnknownCompiler(String),
	/// A `build_libs` directory without a project file.
	#[error("No project file found for library {0}")]
	NoLibProject(String),
	/// A `build_libs` project file could not be read.
	#[error("Unable to read library project {dir}: {error}")]
	LibProject {
		dir: String,
		#[source]
		error: ProjectError,
	},
}

/// Generates the build scripts of one project.
pub struct Generator<'a> {
	model: &'a ProjectModel,
	build_dir: String,
	env: FlagEnv,
	rc_deps: Vec<String>,
	libs: Vec<LibProject>,
}

impl<'a> Generator<'a> {
	/// A generator writing to `build_dir`, relative to the project directory.
	pub fn new(model: &'a ProjectModel, build_dir: &str, env: FlagEnv) -> Self {
		Generator {
			model,
			build_dir: path::canonicalize_path(build_dir),
			env,
			rc_deps: Vec::new(),
			libs: Vec::new(),
		}
	}

	/// Files the resource script depends on, as found by
	/// [`deps::scan`](crate::deps::scan).
	pub fn with_rc_deps(mut self, deps: Vec<String>) -> Self {
		self.rc_deps = deps;
		self
	}

	/// Library projects to build before linking, as found by
	/// [`resolve_build_libs`].
	pub fn with_libs(mut self, libs: Vec<LibProject>) -> Self {
		self.libs = libs;
		self
	}

	pub fn build_dir(&self) -> &str {
		&self.build_dir
	}

	/// Where the script for `target` goes, relative to the project directory.
	pub fn script_path(&self, target: &BuildTarget) -> String {
		path::join(&self.build_dir, &target.script_name())
	}

	/// Check that the options needed to generate anything have valid values.
	fn check(&self) -> Result<ExeType, GenerateError> {
		for option in options::SCHEMA.iter().filter(|o| o.required) {
			if !self.model.has_option(option.key) {
				return Err(GenerateError::MissingRequired(option.name));
			}
		}
		self.model.exe_type().ok_or_else(|| GenerateError::InvalidValue {
			option: options::lookup(OptionKey::ExeType).name,
			value: self.model.get_option(OptionKey::ExeType).unwrap_or("").to_string(),
		})
	}
}
