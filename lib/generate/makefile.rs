//! Generating a makefile that runs the ninja files.
//!
//! The makefile gives every build target a short name, so `make debug` is
//! enough to build, instead of `ninja -f build/msvc_debug64.ninja`.

use super::{Bitness, BuildTarget, Compiler};
use crate::options::OptionKey;
use crate::path;
use crate::project::{ProjectModel, PROJECT_FILE};
use crate::script::GeneratedScript;

/// The file name of the makefile.
pub const MAKEFILE: &str = "makefile";

/// The make target that builds `target`: `release` and `debug` for MSVC,
/// `clang` and `clangD` for Clang, `gcc` and `gccD` for GCC, each with a
/// `32` suffix for 32-bit builds.
pub fn make_target(target: &BuildTarget) -> String {
	let debug = target.configuration.is_debug();
	let mut name = match target.compiler {
		Compiler::Msvc => target.configuration.name().to_string(),
		Compiler::Clang | Compiler::Gcc if debug => format!("{}D", target.compiler.name()),
		Compiler::Clang | Compiler::Gcc => target.compiler.name().to_string(),
	};
	if target.bitness == Bitness::Bits32 {
		name.push_str("32");
	}
	name
}

/// Whether the `makefile` option asks for a makefile to be written.
pub fn makefile_wanted(model: &ProjectModel, exists: bool) -> bool {
	match model.get_option(OptionKey::Makefile).map(str::trim) {
		Some(v) if v.eq_ignore_ascii_case("always") => true,
		Some(v) if v.eq_ignore_ascii_case("never") => false,
		_ => !exists,
	}
}

/// Generate a makefile with a target for each of `targets`, and `clean`.
///
/// The default target builds the first release target.
pub fn makefile(model: &ProjectModel, targets: &[BuildTarget], build_dir: &str) -> GeneratedScript {
	let mut script = GeneratedScript::new();
	script.push(format!(
		"# Generated by {} from {}. Changes will be lost when it is generated again.",
		env!("CARGO_PKG_NAME"),
		PROJECT_FILE
	));
	script.push(format!("# {}", model.project_name()));
	script.blank();
	script.push(format!("BUILD_DIR = {}", path::canonicalize_path(build_dir)));

	let names: Vec<String> = targets.iter().map(make_target).collect();
	let default = targets
		.iter()
		.position(|t| !t.configuration.is_debug())
		.or(if targets.is_empty() { None } else { Some(0) });
	if let Some(default) = default {
		script.blank();
		script.push(format!("all: {}", names[default]));
	}

	for (target, name) in targets.iter().zip(&names) {
		script.blank();
		script.push(format!("{}:", name));
		script.push(format!("\tninja -f $(BUILD_DIR)/{}", target.script_name()));
	}

	script.blank();
	script.push("clean:");
	for target in targets {
		script.push(format!("\tninja -f $(BUILD_DIR)/{} -t clean", target.script_name()));
	}

	script.blank();
	let mut phony = vec!["all".to_string()];
	phony.extend(names);
	phony.push("clean".to_string());
	script.push(format!(".PHONY: {}", phony.join(" ")));
	script
}
