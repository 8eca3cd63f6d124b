use super::Options;
use ninjgen::generate::{make_target, BuildTarget};
use ninjgen::project::read;
use ninjgen::path;
use std::io::Error;

pub(super) fn main(opt: &Options) -> Result<(), Error> {
	let (model, _) = read(&opt.project_file()?)?;
	let (targets, errors) = BuildTarget::selected(&model);
	for e in &errors {
		log::warn!("{}", e);
	}
	for target in &targets {
		println!(
			"{}: {} -> {}",
			make_target(target),
			path::join(&opt.build_dir, &target.script_name()),
			target.target_path(&model)
		);
	}
	Ok(())
}
