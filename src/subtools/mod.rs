mod deps;
mod files;
mod options;
mod targets;

use super::Options;
use std::io::{Error, ErrorKind};

type Subtool = fn(&Options) -> Result<(), Error>;

static SUBTOOLS: &[(&str, Subtool, &str)] = &[
	("options", self::options::main, "all options, with their values and defaults"),
	("files", files::main, "the files of the project, after expanding patterns"),
	("deps", deps::main, "the files the resource script depends on"),
	("targets", targets::main, "the selected build targets and their outputs"),
	("list", list, "this list"),
];

pub(super) fn run_subtool(tool: &str, options: &Options) -> Result<(), Error> {
	match SUBTOOLS.iter().find(|(name, _, _)| *name == tool) {
		Some((_, main, _)) => main(options),
		None => Err(Error::new(
			ErrorKind::InvalidInput,
			format!("Unknown subtool {:?}, use -t list to list them", tool),
		)),
	}
}

fn list(_: &Options) -> Result<(), Error> {
	println!("Subtools:");
	for (name, _, help) in SUBTOOLS {
		println!("\t{:8}  {}", name, help);
	}
	Ok(())
}
