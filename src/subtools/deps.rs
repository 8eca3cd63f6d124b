use super::Options;
use ninjgen::deps::scan;
use ninjgen::project::read;
use std::io::Error;

pub(super) fn main(opt: &Options) -> Result<(), Error> {
	let (model, _) = read(&opt.project_file()?)?;
	let rc = match model.rc_file() {
		Some(rc) => rc,
		None => {
			log::info!("No resource script in this project.");
			return Ok(());
		}
	};
	let (deps, warnings) = scan(&model.dir, rc);
	for warning in &warnings {
		log::warn!("{}", warning);
	}
	println!("{}:", rc);
	for dep in &deps {
		println!("    {}", dep);
	}
	Ok(())
}
