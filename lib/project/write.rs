use super::eat::{needs_quotes, version_header, UNRECOGNIZED_PREFIX};
use super::ProjectModel;
use crate::options;
use indexmap::IndexMap;
use std::fmt::Write;

const INDENT: &str = "    ";

/// Format a project as a project file.
///
/// The result reads back as the same project: Options in schema order,
/// unrecognized options commented out, and the file lists as they were
/// declared (patterns are not expanded).
pub fn write(model: &ProjectModel) -> String {
	let mut out = String::new();
	out.push_str(&version_header(model.version_required()));
	out.push('\n');

	let options: Vec<_> = model
		.option_values()
		.map(|(key, value)| (options::lookup(key).name, value))
		.collect();
	if !options.is_empty() || !model.unrecognized_options().is_empty() {
		out.push_str("\nOptions:\n");
		let name_width = options.iter().map(|(name, _)| name.len() + 1).max().unwrap_or(0);
		let value_width = value_width(&options);
		for (name, value) in &options {
			let v = if needs_quotes(&value.value) {
				format!("\"{}\"", value.value)
			} else {
				value.value.clone()
			};
			let name = format!("{}:", name);
			let line = match &value.comment {
				Some(comment) => format!(
					"{:nw$} {:vw$}  # {}",
					name,
					v,
					comment,
					nw = name_width,
					vw = value_width
				),
				None => format!("{:nw$} {}", name, v, nw = name_width),
			};
			writeln!(out, "{}{}", INDENT, line.trim_end()).ok();
		}
		for raw in model.unrecognized_options() {
			writeln!(out, "{}{}{}", INDENT, UNRECOGNIZED_PREFIX, raw).ok();
		}
	}

	// Models built in code have no declared lines; list their files instead.
	match model.declared_files() {
		[] => write_list(&mut out, "Files", model.files()),
		declared => write_list(&mut out, "Files", declared),
	}
	match model.declared_debug_files() {
		[] => write_list(&mut out, "DebugFiles", model.debug_files()),
		declared => write_list(&mut out, "DebugFiles", declared),
	}
	write_pairs(&mut out, "GZIP", &model.gzip);
	write_pairs(&mut out, "XPM", &model.xpm);
	write_pairs(&mut out, "PNG", &model.png);
	out
}

/// The column where comments start, so they line up.
fn value_width(options: &[(&str, &super::OptionValue)]) -> usize {
	options
		.iter()
		.filter(|(_, v)| v.comment.is_some())
		.map(|(_, v)| v.value.len() + if needs_quotes(&v.value) { 2 } else { 0 })
		.max()
		.unwrap_or(0)
}

fn write_list<'a>(out: &mut String, header: &str, entries: impl IntoIterator<Item = &'a String>) {
	let mut entries = entries.into_iter().peekable();
	if entries.peek().is_none() {
		return;
	}
	writeln!(out, "\n{}:", header).ok();
	for entry in entries {
		writeln!(out, "{}{}", INDENT, entry).ok();
	}
}

fn write_pairs(out: &mut String, header: &str, pairs: &IndexMap<String, String>) {
	if pairs.is_empty() {
		return;
	}
	writeln!(out, "\n{}:", header).ok();
	for (source, destination) in pairs {
		writeln!(out, "{}{}: {}", INDENT, source, destination).ok();
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::options::{OptionKey, Version};
	use crate::project::read_from;
	use pretty_assertions::assert_eq;
	use std::path::Path;

	const PROJECT: &str = "# Requires ninjgen version 1.1.0 or higher to process

Options:
    Project:    app
    exe_type:   console
    pch:        pch.h  # precompiled
    cflags_cmn: \"-DCOLOR=#fff\"
    lib_dirs:   ../lib
    # [unrecognized] future_option: 1

Files:
    pch.cpp
    src/*.cpp
    app.rc

PNG:
    logo.png: logo_png.h
";

	#[test]
	fn writes_back_unchanged() {
		let (model, warnings) = read_from(Path::new("x/.srcfiles.yaml"), PROJECT).unwrap();
		assert!(warnings.iter().all(|w| !matches!(
			w.error,
			crate::project::error::ParseWarning::UnknownOption(_)
		)));
		assert_eq!(write(&model), PROJECT);
	}

	#[test]
	fn version_follows_options() {
		let mut model = ProjectModel::new(Path::new(".srcfiles.yaml"));
		model.set_option(OptionKey::Project, "app");
		assert!(write(&model).starts_with("# Requires ninjgen version 1.0.0 or higher"));
		model.set_option(OptionKey::Compilers, "gcc");
		assert_eq!(model.version_required(), Version::new(1, 5, 0));
		assert!(write(&model).starts_with("# Requires ninjgen version 1.5.0 or higher"));
	}

	#[test]
	fn round_trip_keeps_meaning() {
		let mut model = ProjectModel::new(Path::new("x/.srcfiles.yaml"));
		model.set_option(OptionKey::Project, "tool");
		model.set_option(OptionKey::Bit32, "yes");
		model.set_option(OptionKey::Natvis, " spaced ");
		model.set_option(OptionKey::CflagsDbg, "#hash");
		model.set_option_comment(OptionKey::CflagsDbg, Some("why"));
		let text = write(&model);
		let (back, warnings) = read_from(Path::new("x/.srcfiles.yaml"), &text).unwrap();
		assert!(warnings.is_empty(), "{:?}", warnings);
		assert_eq!(back.get_option(OptionKey::Bit32), Some("true"));
		assert_eq!(back.get_option(OptionKey::Natvis), Some("spaced"));
		assert_eq!(back.get_option(OptionKey::CflagsDbg), Some("#hash"));
		assert_eq!(back.option_comment(OptionKey::CflagsDbg), Some("why"));
		assert_eq!(write(&back), text);
	}

	#[test]
	fn values_with_quotes_round_trip() {
		let mut model = ProjectModel::new(Path::new("x/.srcfiles.yaml"));
		model.set_option(OptionKey::Project, "tool");
		model.set_option(OptionKey::CflagsCmn, "\"a b\" -DX");
		model.set_option(OptionKey::IncDirs, "\"C:/Program Files/sdk\";include");
		model.set_option_comment(OptionKey::CflagsCmn, Some("spaces"));
		let text = write(&model);
		assert!(text.contains("    cflags_cmn: \"a b\" -DX  # spaces\n"), "{}", text);
		let (back, warnings) = read_from(Path::new("x/.srcfiles.yaml"), &text).unwrap();
		assert!(warnings.is_empty(), "{:?}", warnings);
		assert_eq!(back.get_option(OptionKey::CflagsCmn), Some("\"a b\" -DX"));
		assert_eq!(back.option_comment(OptionKey::CflagsCmn), Some("spaces"));
		assert_eq!(back.get_option(OptionKey::IncDirs), Some("\"C:/Program Files/sdk\";include"));
		assert_eq!(write(&back), text);
	}
}
