//! Assembling command line flags.
//!
//! Compiler flags are layered, later flags overriding earlier ones:
//!
//!  1. Flags derived from options like `warn`, `optimize` and `crt_dbg`.
//!  2. `cflags_cmn`, then `cflags_rel` or `cflags_dbg`.
//!  3. The compiler specific options, like `msvc_cmn` and `msvc_dbg`.
//!  4. The `CFLAGS` environment variable, then `CFLAGSR` or `CFLAGSD`, then
//!     `NINJGEN_CFLAGS`.

use super::{Bitness, BuildTarget, Compiler, Configuration};
use crate::options::OptionKey;
use crate::project::{ExeType, ProjectModel};
use std::collections::BTreeMap;
use std::env;
use std::fmt;

/// The environment variables that add compiler flags, in the order they are
/// applied.
pub const ENV_VARS: [&str; 4] = ["CFLAGS", "CFLAGSR", "CFLAGSD", "NINJGEN_CFLAGS"];

/// The environment variables that add compiler flags.
#[derive(Clone, Debug, Default)]
pub struct FlagEnv {
	vars: BTreeMap<String, String>,
}

impl FlagEnv {
	/// Capture the variables from the environment of this process.
	pub fn from_env() -> Self {
		FlagEnv::from_vars(
			ENV_VARS
				.iter()
				.filter_map(|&name| env::var(name).ok().map(|value| (name, value))),
		)
	}

	pub fn from_vars<K, V>(vars: impl IntoIterator<Item = (K, V)>) -> Self
	where
		K: Into<String>,
		V: Into<String>,
	{
		FlagEnv {
			vars: vars
				.into_iter()
				.map(|(k, v)| (k.into(), v.into()))
				.collect(),
		}
	}

	fn get(&self, name: &str) -> Option<&str> {
		self.vars.get(name).map(|v| v.trim()).filter(|v| !v.is_empty())
	}

	/// The flags for a configuration, in the order they are applied.
	pub fn cflags(&self, configuration: Configuration) -> Vec<&str> {
		let specific = match configuration {
			Configuration::Release => "CFLAGSR",
			Configuration::Debug => "CFLAGSD",
		};
		["CFLAGS", specific, "NINJGEN_CFLAGS"]
			.iter()
			.filter_map(|name| self.get(name))
			.collect()
	}
}

/// A command line being assembled.
#[derive(Debug, Default)]
pub struct Flags(Vec<String>);

impl Flags {
	fn push(&mut self, flag: impl Into<String>) {
		let flag = flag.into();
		if !flag.is_empty() {
			self.0.push(flag);
		}
	}

	/// Add the value of an option as-is.
	fn option(&mut self, model: &ProjectModel, key: OptionKey) {
		if let Some(value) = model.get_option(key) {
			self.push(value.trim());
		}
	}

	/// Add a flag for every entry of a `;` separated list option.
	fn each(&mut self, model: &ProjectModel, key: OptionKey, prefix: &str) {
		for item in model.option_list(key) {
			self.push(format!("{}{}", prefix, quote(item)));
		}
	}
}

impl fmt::Display for Flags {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "{}", self.0.join(" "))
	}
}

/// Put quotes around an argument that contains spaces.
pub fn quote(arg: &str) -> String {
	if arg.contains(char::is_whitespace) && !arg.starts_with('"') {
		format!("\"{}\"", arg)
	} else {
		arg.to_string()
	}
}

/// The common and configuration specific variants of an option.
fn layered(configuration: Configuration, cmn: OptionKey, rel: OptionKey, dbg: OptionKey) -> [OptionKey; 2] {
	match configuration {
		Configuration::Release => [cmn, rel],
		Configuration::Debug => [cmn, dbg],
	}
}

/// The flags of the `compile` rule, without the input and output arguments.
pub fn compile_flags(
	model: &ProjectModel,
	target: &BuildTarget,
	exe_type: ExeType,
	env: &FlagEnv,
) -> Flags {
	let debug = target.configuration.is_debug();
	let warn = model.get_option(OptionKey::Warn).unwrap_or("4").trim();
	let speed = model
		.get_option(OptionKey::Optimize)
		.map_or(false, |o| o.trim().eq_ignore_ascii_case("speed"));
	let mut flags = Flags::default();

	if target.compiler.is_msvc_like() {
		flags.push("-nologo");
		flags.push("-EHsc");
		flags.push(format!("-W{}", warn));
		flags.push("-DWIN32");
		flags.push(match exe_type {
			ExeType::Console => "-D_CONSOLE",
			ExeType::Window => "-D_WINDOWS",
			ExeType::Lib => "-D_LIB",
			ExeType::Dll | ExeType::Ocx => "-D_USRDLL",
		});
		if !model.is_option_true(OptionKey::Permissive) {
			flags.push("-permissive-");
		}
		if target.compiler == Compiler::Clang {
			flags.push(format!("-m{}", target.bitness.bits()));
		}
		if target.bitness == Bitness::Bits32 && model.is_option_true(OptionKey::Stdcall) {
			flags.push("-Gz");
		}
		let crt_key = if debug { OptionKey::CrtDbg } else { OptionKey::CrtRel };
		let dll_crt = model
			.get_option(crt_key)
			.map_or(false, |c| c.trim().eq_ignore_ascii_case("dll"));
		if debug {
			flags.push("-Od");
			flags.push("-Z7");
			flags.push("-D_DEBUG");
			flags.push(if dll_crt { "-MDd" } else { "-MTd" });
		} else {
			flags.push(if speed { "-O2" } else { "-O1" });
			flags.push("-DNDEBUG");
			flags.push(if dll_crt { "-MD" } else { "-MT" });
		}
		flags.each(model, OptionKey::IncDirs, "-I");
	} else {
		match warn {
			"0" | "1" => {}
			"2" | "3" => flags.push("-Wall"),
			_ => {
				flags.push("-Wall");
				flags.push("-Wextra");
			}
		}
		flags.push(format!("-m{}", target.bitness.bits()));
		if model.is_option_true(OptionKey::Permissive) {
			flags.push("-fpermissive");
		}
		if debug {
			flags.push("-O0");
			flags.push("-g");
			flags.push("-D_DEBUG");
		} else {
			flags.push(if speed { "-O2" } else { "-Os" });
			flags.push("-DNDEBUG");
		}
		flags.each(model, OptionKey::IncDirs, "-I");
	}

	let config = target.configuration;
	let compiler_keys = match target.compiler {
		Compiler::Msvc => layered(config, OptionKey::MsvcCmn, OptionKey::MsvcRel, OptionKey::MsvcDbg),
		Compiler::Clang => layered(config, OptionKey::ClangCmn, OptionKey::ClangRel, OptionKey::ClangDbg),
		Compiler::Gcc => layered(config, OptionKey::GccCmn, OptionKey::GccRel, OptionKey::GccDbg),
	};
	let common_keys = layered(config, OptionKey::CflagsCmn, OptionKey::CflagsRel, OptionKey::CflagsDbg);
	for &key in common_keys.iter().chain(&compiler_keys) {
		flags.option(model, key);
	}
	for flag in env.cflags(config) {
		flags.push(flag);
	}
	flags
}

/// The flags of the `rc` rule.
pub fn rc_flags(model: &ProjectModel, target: &BuildTarget) -> Flags {
	let debug = target.configuration.is_debug();
	let mut flags = Flags::default();
	let native = uses_native_rc(model, target.compiler);
	if native {
		flags.push("-nologo");
	}
	if target.compiler == Compiler::Gcc && target.bitness == Bitness::Bits32 {
		flags.push("-F pe-i386");
	}
	for &key in &layered(target.configuration, OptionKey::RcCmn, OptionKey::RcRel, OptionKey::RcDbg) {
		flags.option(model, key);
	}
	if debug && model.is_option_true(OptionKey::DebugRc) {
		flags.push(if native { "-d_DEBUG" } else { "-D_DEBUG" });
	}
	flags
}

/// Whether resources are compiled with `rc.exe`.
pub fn uses_native_rc(model: &ProjectModel, compiler: Compiler) -> bool {
	match compiler {
		Compiler::Msvc => true,
		Compiler::Clang => model.is_option_true(OptionKey::MsRc),
		Compiler::Gcc => false,
	}
}

/// Whether linking is done with `link.exe` and `lib.exe`.
pub fn uses_native_linker(model: &ProjectModel, compiler: Compiler) -> bool {
	match compiler {
		Compiler::Msvc => true,
		Compiler::Clang => model.is_option_true(OptionKey::MsLinker),
		Compiler::Gcc => false,
	}
}

/// The flags of the `midl` rule.
pub fn midl_flags(model: &ProjectModel, target: &BuildTarget) -> Flags {
	let mut flags = Flags::default();
	if target.compiler.is_msvc_like() {
		flags.push("-nologo");
		flags.push(match target.bitness {
			Bitness::Bits64 => "-env x64",
			Bitness::Bits32 => "-env win32",
		});
	} else {
		flags.push(match target.bitness {
			Bitness::Bits64 => "--win64",
			Bitness::Bits32 => "--win32",
		});
	}
	flags.push(if target.configuration.is_debug() { "-D_DEBUG" } else { "-DNDEBUG" });
	for &key in &layered(target.configuration, OptionKey::MidlCmn, OptionKey::MidlRel, OptionKey::MidlDbg) {
		flags.option(model, key);
	}
	flags
}

/// The flags of the `link` rule, without inputs, output and libraries.
pub fn link_flags(model: &ProjectModel, target: &BuildTarget, exe_type: ExeType) -> Flags {
	let debug = target.configuration.is_debug();
	let lib_dirs = match target.bitness {
		Bitness::Bits32 if model.has_option(OptionKey::LibDirs32) => OptionKey::LibDirs32,
		_ => OptionKey::LibDirs,
	};
	let mut flags = Flags::default();

	if target.compiler.is_msvc_like() {
		flags.push("-nologo");
		flags.push(machine(target.bitness));
		flags.push(match exe_type {
			ExeType::Console => "-SUBSYSTEM:CONSOLE",
			ExeType::Window => "-SUBSYSTEM:WINDOWS",
			ExeType::Dll | ExeType::Ocx | ExeType::Lib => "-DLL",
		});
		if debug {
			flags.push("-DEBUG");
			if let Some(natvis) = model.get_option(OptionKey::Natvis).filter(|n| !n.is_empty()) {
				flags.push(format!("-NATVIS:{}", quote(natvis)));
			}
		} else {
			flags.push("-OPT:REF");
			flags.push("-OPT:ICF");
		}
		flags.each(model, lib_dirs, "-LIBPATH:");
	} else {
		flags.push(format!("-m{}", target.bitness.bits()));
		if matches!(exe_type, ExeType::Dll | ExeType::Ocx) {
			flags.push("-shared");
		}
		if debug {
			flags.push("-g");
		}
		flags.each(model, lib_dirs, "-L");
	}

	for &key in &layered(target.configuration, OptionKey::LinkCmn, OptionKey::LinkRel, OptionKey::LinkDbg) {
		flags.option(model, key);
	}
	flags
}

/// The flags of the `lib` rule, which creates static libraries.
pub fn lib_flags(target: &BuildTarget) -> Flags {
	let mut flags = Flags::default();
	if target.compiler.is_msvc_like() {
		flags.push("-nologo");
		flags.push(machine(target.bitness));
	}
	flags
}

/// The libraries to link with, from `libs_cmn` and `libs_rel`/`libs_dbg`.
pub fn link_libs(model: &ProjectModel, target: &BuildTarget) -> Flags {
	let mut flags = Flags::default();
	for &key in &layered(target.configuration, OptionKey::LibsCmn, OptionKey::LibsRel, OptionKey::LibsDbg) {
		flags.each(model, key, "");
	}
	flags
}

fn machine(bitness: Bitness) -> &'static str {
	match bitness {
		Bitness::Bits64 => "-MACHINE:X64",
		Bitness::Bits32 => "-MACHINE:X86",
	}
}
