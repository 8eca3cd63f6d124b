use super::Options;
use ninjgen::options::SCHEMA;
use ninjgen::project::read;
use std::io::Error;

/// Show every option with its effective value, and where that value came
/// from.
pub(super) fn main(opt: &Options) -> Result<(), Error> {
	let model = match opt.project_file() {
		Ok(file) => Some(read(&file)?.0),
		Err(_) => None,
	};
	let width = SCHEMA.iter().map(|d| d.name.len()).max().unwrap_or(0);
	for descriptor in SCHEMA {
		let (value, origin) = match &model {
			Some(m) if m.is_set(descriptor.key) => (m.get_option(descriptor.key), "set"),
			_ => (descriptor.default, "default"),
		};
		println!(
			"{:width$}  {:10}  {:8}  since {}",
			descriptor.name,
			value.unwrap_or(""),
			origin,
			descriptor.since,
			width = width
		);
	}
	if let Some(m) = &model {
		for raw in m.unrecognized_options() {
			println!("{}  (unrecognized)", raw.trim());
		}
	}
	Ok(())
}
