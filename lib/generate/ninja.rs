//! Generating ninja files.

use super::flags::{self, quote, Flags};
use super::{BuildTarget, Compiler, GenerateError, Generator};
use crate::path;
use crate::project::ExeType;
use crate::script::GeneratedScript;

/// The oldest ninja that understands the generated files.
const NINJA_REQUIRED_VERSION: &str = "1.8";

/// Escape a path for use in a `build` line.
fn escape(path: &str) -> String {
	let mut escaped = String::with_capacity(path.len());
	for c in path.chars() {
		match c {
			'$' | ' ' | ':' => {
				escaped.push('$');
				escaped.push(c);
			}
			_ => escaped.push(c),
		}
	}
	escaped
}

fn escape_all<'a>(paths: impl IntoIterator<Item = &'a String>) -> String {
	paths.into_iter().map(|p| escape(p)).collect::<Vec<_>>().join(" ")
}

/// A `build` line, with implicit dependencies after the `|` if there are any.
fn build_line(outputs: &str, rule: &str, inputs: &str, implicit: &str) -> String {
	let mut line = format!("build {} : {}", outputs, rule);
	if !inputs.is_empty() {
		line.push(' ');
		line.push_str(inputs);
	}
	if !implicit.is_empty() {
		line.push_str(" | ");
		line.push_str(implicit);
	}
	line
}

fn rule(script: &mut GeneratedScript, name: &str, vars: &[(&str, &str)]) {
	script.blank();
	script.push(format!("rule {}", name));
	for (var, value) in vars {
		script.push(format!("  {} = {}", var, value));
	}
}

impl<'a> Generator<'a> {
	/// Generate the ninja file of one build target.
	///
	/// Paths in the script are relative to the project directory, which is
	/// where ninja must be run from: `ninja -f build/msvc_debug64.ninja`.
	pub fn ninja(&self, target: &BuildTarget) -> Result<GeneratedScript, GenerateError> {
		let exe_type = self.check()?;
		let model = self.model;
		let compiler = target.compiler;
		let debug = target.configuration.is_debug();
		let obj = compiler.object_extension();
		let mut script = GeneratedScript::new();

		script.push(format!(
			"# Generated by {} from {}. Changes will be lost when it is generated again.",
			env!("CARGO_PKG_NAME"),
			crate::project::PROJECT_FILE
		));
		script.push(format!("# {}: {}", model.project_name(), target));
		script.blank();
		script.push(format!("ninja_required_version = {}", NINJA_REQUIRED_VERSION));
		script.blank();
		script.push(format!("builddir = {}", self.build_dir));
		script.push(format!("outdir = $builddir/{}", target.dir_suffix()));
		script.push("resout = $outdir/res");

		// Compiling.

		let cflags = flags::compile_flags(model, target, exe_type, &self.env);
		let pch = model.pch_header().zip(model.pch_source());
		let pch_object = pch
			.as_ref()
			.map(|(_, source)| format!("$outdir/{}.{}", escape(path::file_stem(source)), obj));
		let pch_file = format!("$outdir/{}.pch", model.project_name());

		if let Some((header, _)) = &pch {
			let command = match compiler {
				Compiler::Gcc => gcc_compile_command(&cflags),
				_ => format!(
					"{} {} -showIncludes -c -Yc{} -Fp{} -Fo$out $in",
					compiler_exe(compiler),
					cflags,
					quote(header),
					pch_file
				),
			};
			let mut vars = deps_vars(compiler);
			vars.push(("command", command.as_str()));
			vars.push(("description", "Compiling precompiled header $in"));
			rule(&mut script, "compilePCH", &vars);
		}

		let command = match (compiler, &pch) {
			(Compiler::Gcc, _) => gcc_compile_command(&cflags),
			(_, Some((header, _))) => format!(
				"{} {} -showIncludes -c -Yu{} -Fp{} -Fo$out $in",
				compiler_exe(compiler),
				cflags,
				quote(header),
				pch_file
			),
			(_, None) => format!("{} {} -showIncludes -c -Fo$out $in", compiler_exe(compiler), cflags),
		};
		let mut vars = deps_vars(compiler);
		vars.push(("command", command.as_str()));
		vars.push(("description", "Compiling $in"));
		rule(&mut script, "compile", &vars);

		// Resources.

		let res_output = model.rc_file().map(|rc| {
			let stem = escape(path::file_stem(rc));
			match compiler {
				Compiler::Gcc => format!("$resout/{}_rc.o", stem),
				_ => format!("$resout/{}.res", stem),
			}
		});
		if let (Some(rc), Some(output)) = (model.rc_file(), &res_output) {
			let rc_flags = flags::rc_flags(model, target);
			let command = if compiler == Compiler::Gcc {
				join_command(&["windres", &rc_flags.to_string(), "$in -O coff -o $out"])
			} else if flags::uses_native_rc(model, compiler) {
				join_command(&["rc.exe", &rc_flags.to_string(), "-fo$out $in"])
			} else {
				join_command(&["llvm-rc", &rc_flags.to_string(), "-FO $out $in"])
			};
			rule(
				&mut script,
				"rc",
				&[("command", command.as_str()), ("description", "Compiling resources $in")],
			);
			script.blank();
			script.push(build_line(
				output,
				"rc",
				&escape(rc),
				&escape_all(&self.rc_deps),
			));
		}

		// Interfaces.

		let idl_headers: Vec<String> = model
			.idl_files()
			.iter()
			.map(|idl| path::with_extension(idl, "h"))
			.collect();
		if !idl_headers.is_empty() {
			let midl_flags = flags::midl_flags(model, target);
			let command = if compiler == Compiler::Gcc {
				join_command(&["widl", &midl_flags.to_string(), "-h -H $out -t -T $tlb $in"])
			} else {
				join_command(&["midl.exe", &midl_flags.to_string(), "-h $out -tlb $tlb $in"])
			};
			rule(
				&mut script,
				"midl",
				&[("command", command.as_str()), ("description", "Compiling interface $in")],
			);
			for (idl, header) in model.idl_files().iter().zip(&idl_headers) {
				let tlb = path::with_extension(idl, "tlb");
				script.blank();
				script.push(build_line(&escape(header), "midl", &escape(idl), ""));
				script.push(format!("  tlb = {}", escape(&tlb)));
				script.push(build_line(&escape(&tlb), "phony", &escape(header), ""));
			}
		}

		// Without a precompiled header, it's unknown which sources include
		// the generated headers, so all of them depend on all of them.
		let idl_deps = escape_all(&idl_headers);

		let mut objects = Vec::new();
		if let (Some((_, source)), Some(object)) = (&pch, &pch_object) {
			script.blank();
			script.push(build_line(object, "compilePCH", &escape(source), &idl_deps));
		}
		let pch_source = pch.as_ref().map(|(_, source)| path::fold_case(source));
		let source_deps = match &pch_object {
			Some(object) => object.clone(),
			None => idl_deps,
		};
		for source in model.source_files(debug) {
			if pch_source.as_deref() == Some(path::fold_case(source).as_str()) {
				continue;
			}
			let object = format!("$outdir/{}.{}", escape(path::file_stem(source)), obj);
			script.blank();
			script.push(build_line(&object, "compile", &escape(source), &source_deps));
			objects.push(object);
		}
		objects.extend(pch_object);

		// Libraries to build first.

		let lib_targets: Vec<String> = self
			.libs
			.iter()
			.map(|lib| lib.target_path(target))
			.collect();
		if !self.libs.is_empty() {
			rule(
				&mut script,
				"buildlib",
				&[
					("command", "ninja -C $libdir -f $libscript"),
					("description", "Building library $libdir"),
					("restat", "1"),
				],
			);
			script.blank();
			script.push("build force_buildlib : phony");
			let lib_script = path::join(&self.build_dir, &target.script_name());
			for (lib, lib_target) in self.libs.iter().zip(&lib_targets) {
				script.blank();
				script.push(build_line(&escape(lib_target), "buildlib", "", "force_buildlib"));
				script.push(format!("  libdir = {}", quote(&lib.dir)));
				script.push(format!("  libscript = {}", quote(&lib_script)));
			}
		}

		// Linking.

		let output = escape(&target.target_path(model));
		let lib_deps = escape_all(&lib_targets);
		if exe_type == ExeType::Lib {
			let lib_flags = flags::lib_flags(target);
			let command = match compiler {
				Compiler::Gcc => "ar rcs $out $in".to_string(),
				_ if flags::uses_native_linker(model, compiler) => {
					join_command(&["lib.exe", &lib_flags.to_string(), "-out:$out $in"])
				}
				_ => join_command(&["llvm-lib", &lib_flags.to_string(), "-out:$out $in"]),
			};
			rule(
				&mut script,
				"lib",
				&[("command", command.as_str()), ("description", "Creating library $out")],
			);
			script.blank();
			script.push(build_line(&output, "lib", &objects.join(" "), &lib_deps));
		} else {
			let link_flags = flags::link_flags(model, target, exe_type);
			let command = match compiler {
				Compiler::Gcc => join_command(&["g++", &link_flags.to_string(), "-o $out $in $libs"]),
				_ if flags::uses_native_linker(model, compiler) => {
					join_command(&["link.exe", &link_flags.to_string(), "-out:$out $in $libs"])
				}
				_ => join_command(&["lld-link", &link_flags.to_string(), "-out:$out $in $libs"]),
			};
			rule(
				&mut script,
				"link",
				&[("command", command.as_str()), ("description", "Linking $out")],
			);
			let mut inputs = objects;
			inputs.extend(res_output);
			let mut libs = flags::link_libs(model, target).to_string();
			for lib in &lib_targets {
				if !libs.is_empty() {
					libs.push(' ');
				}
				libs.push_str(&quote(lib));
			}
			script.blank();
			script.push(build_line(&output, "link", &inputs.join(" "), &lib_deps));
			if !libs.is_empty() {
				script.push(format!("  libs = {}", libs));
			}
		}

		Ok(script)
	}
}

fn compiler_exe(compiler: Compiler) -> &'static str {
	match compiler {
		Compiler::Msvc => "cl.exe",
		Compiler::Clang => "clang-cl",
		Compiler::Gcc => "g++",
	}
}

fn gcc_compile_command(cflags: &Flags) -> String {
	join_command(&["g++ -MMD -MF $out.d", &cflags.to_string(), "-c $in -o $out"])
}

/// How ninja learns about included headers.
fn deps_vars<'a>(compiler: Compiler) -> Vec<(&'static str, &'a str)> {
	match compiler {
		Compiler::Gcc => vec![("deps", "gcc"), ("depfile", "$out.d")],
		_ => vec![("deps", "msvc")],
	}
}

/// Join parts of a command, skipping empty ones.
fn join_command(parts: &[&str]) -> String {
	parts
		.iter()
		.filter(|p| !p.is_empty())
		.copied()
		.collect::<Vec<_>>()
		.join(" ")
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::generate::{Bitness, Configuration, FlagEnv, LibProject};
	use crate::options::OptionKey;
	use crate::project::{read_from, ProjectModel};
	use pretty_assertions::assert_eq;
	use std::path::Path;

	fn project(source: &str) -> ProjectModel {
		let (model, _) = read_from(Path::new("app/.srcfiles.yaml"), source).unwrap();
		model
	}

	fn msvc_debug64() -> BuildTarget {
		BuildTarget::new(Compiler::Msvc, Bitness::Bits64, Configuration::Debug)
	}

	const CONSOLE_APP: &str = "Options:
    Project: app
    exe_type: console
    pch: pch.h
Files:
    pch.cpp
    main.cpp
    app.rc
";

	#[test]
	fn console_app_with_pch() {
		let model = project(CONSOLE_APP);
		let script = Generator::new(&model, "build", FlagEnv::default())
			.with_rc_deps(vec!["resource.h".to_string(), "res/app ico.ico".to_string()])
			.ninja(&msvc_debug64())
			.unwrap();
		let cflags = "-nologo -EHsc -W4 -DWIN32 -D_CONSOLE -permissive- -Od -Z7 -D_DEBUG -MTd";
		let expected = format!(
			"\
# Generated by ninjgen from .srcfiles.yaml. Changes will be lost when it is generated again.
# app: msvc debug 64-bit

ninja_required_version = 1.8

builddir = build
outdir = $builddir/msvc_debug64
resout = $outdir/res

rule compilePCH
  deps = msvc
  command = cl.exe {cflags} -showIncludes -c -Ycpch.h -Fp$outdir/app.pch -Fo$out $in
  description = Compiling precompiled header $in

rule compile
  deps = msvc
  command = cl.exe {cflags} -showIncludes -c -Yupch.h -Fp$outdir/app.pch -Fo$out $in
  description = Compiling $in

rule rc
  command = rc.exe -nologo -fo$out $in
  description = Compiling resources $in

build $resout/app.res : rc app.rc | resource.h res/app$ ico.ico

build $outdir/pch.obj : compilePCH pch.cpp

build $outdir/main.obj : compile main.cpp | $outdir/pch.obj

rule link
  command = link.exe -nologo -MACHINE:X64 -SUBSYSTEM:CONSOLE -DEBUG -out:$out $in $libs
  description = Linking $out

build bin/appD.exe : link $outdir/main.obj $outdir/pch.obj $resout/app.res
",
			cflags = cflags
		);
		assert_eq!(script.to_string(), expected);
	}

	#[test]
	fn gcc_static_library() {
		let model = project(
			"Options:
    Project: util
    exe_type: lib
    pch: stdafx.h
Files:
    stdafx.cpp
    src/util.cpp
    util.rc
DebugFiles:
    src/trace.cpp
",
		);
		let target = BuildTarget::new(Compiler::Gcc, Bitness::Bits32, Configuration::Release);
		let script = Generator::new(&model, "out", FlagEnv::default())
			.ninja(&target)
			.unwrap()
			.to_string();

		assert!(script.contains("outdir = $builddir/gcc_release32\n"));
		assert!(script.contains(
			"rule compilePCH\n  deps = gcc\n  depfile = $out.d\n  \
			 command = g++ -MMD -MF $out.d -Wall -Wextra -m32 -Os -DNDEBUG -c $in -o $out\n"
		));
		assert!(script.contains("  command = windres -F pe-i386 $in -O coff -o $out\n"));
		assert!(script.contains("build $resout/util_rc.o : rc util.rc\n"));
		assert!(script.contains("build $outdir/stdafx.o : compilePCH stdafx.cpp\n"));
		assert!(script.contains("build $outdir/util.o : compile src/util.cpp | $outdir/stdafx.o\n"));
		assert!(!script.contains("trace"));
		assert!(script.contains("  command = ar rcs $out $in\n"));
		assert!(script.ends_with("build lib32/libutil.a : lib $outdir/util.o $outdir/stdafx.o\n"));
	}

	#[test]
	fn interfaces_without_pch() {
		let model = project(
			"Options:
    Project: server
    exe_type: dll
    ms_linker: false
Files:
    server.cpp
    idl/iface.idl
DebugFiles:
    trace.cpp
",
		);
		let target = BuildTarget::new(Compiler::Clang, Bitness::Bits64, Configuration::Debug);
		let script = Generator::new(&model, "build", FlagEnv::default())
			.ninja(&target)
			.unwrap()
			.to_string();

		assert!(!script.contains("compilePCH"));
		assert!(script.contains(
			"rule midl\n  command = midl.exe -nologo -env x64 -D_DEBUG -h $out -tlb $tlb $in\n"
		));
		assert!(script.contains(
			"build idl/iface.h : midl idl/iface.idl\n  tlb = idl/iface.tlb\nbuild idl/iface.tlb : phony idl/iface.h\n"
		));
		assert!(script.contains("build $outdir/server.obj : compile server.cpp | idl/iface.h\n"));
		assert!(script.contains("build $outdir/trace.obj : compile trace.cpp | idl/iface.h\n"));
		assert!(script.contains("  command = lld-link -nologo -MACHINE:X64 -DLL -DEBUG -out:$out $in $libs\n"));
		assert!(script.ends_with("build bin/serverD.dll : link $outdir/server.obj $outdir/trace.obj\n"));
	}

	#[test]
	fn builds_libraries_first() {
		let model = project(CONSOLE_APP);
		let lib = LibProject {
			dir: "../util".to_string(),
			model: project("Options:\n    Project: util\n    exe_type: lib\n"),
		};
		let env = FlagEnv::from_vars(vec![("CFLAGS", "-DFROM_ENV")]);
		let mut app = model;
		app.set_option(OptionKey::LibsCmn, "comctl32.lib");
		let target = BuildTarget::new(Compiler::Msvc, Bitness::Bits64, Configuration::Release);
		let script = Generator::new(&app, "build", env)
			.with_libs(vec![lib])
			.ninja(&target)
			.unwrap()
			.to_string();

		assert!(script.contains("-MT -DFROM_ENV -showIncludes"));
		assert!(script.contains(
			"build ../util/lib/util.lib : buildlib | force_buildlib\n  \
			 libdir = ../util\n  libscript = build/msvc_release64.ninja\n"
		));
		assert!(script.ends_with(
			"build bin/app.exe : link $outdir/main.obj $outdir/pch.obj $resout/app.res | ../util/lib/util.lib\n  \
			 libs = comctl32.lib ../util/lib/util.lib\n"
		));
	}

	#[test]
	fn missing_required_option() {
		let mut model = project(CONSOLE_APP);
		model.set_option(OptionKey::Warn, "");
		let result = Generator::new(&model, "build", FlagEnv::default()).ninja(&msvc_debug64());
		assert!(matches!(result, Err(GenerateError::MissingRequired("warn"))));
	}

	#[test]
	fn file_in_both_lists_is_built_once() {
		let model = project(
			"Options:
    Project: app
    exe_type: console
Files:
    main.cpp
DebugFiles:
    main.cpp
    trace.cpp
",
		);
		let script = Generator::new(&model, "build", FlagEnv::default())
			.ninja(&msvc_debug64())
			.unwrap()
			.to_string();
		let edges: Vec<_> = script
			.lines()
			.filter(|l| l.starts_with("build $outdir/main.obj "))
			.collect();
		assert_eq!(edges.len(), 1, "{}", script);
		assert!(
			script.contains("build bin/appD.exe : link $outdir/main.obj $outdir/trace.obj\n"),
			"{}",
			script
		);
	}

	#[test]
	fn escaping() {
		assert_eq!(escape("C:/my dir/$x"), "C$:/my$ dir/$$x");
	}
}
