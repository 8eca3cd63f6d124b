use super::Options;
use ninjgen::project::read;
use std::io::Error;

pub(super) fn main(opt: &Options) -> Result<(), Error> {
	let (model, warnings) = read(&opt.project_file()?)?;
	for warning in &warnings {
		log::warn!("{}", warning);
	}
	for file in model.files() {
		println!("{}", file);
	}
	for file in model.debug_files() {
		println!("{} (debug)", file);
	}
	Ok(())
}
