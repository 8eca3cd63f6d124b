mod logger;
mod subtools;

use self::logger::Logger;
use log::{debug, error, info, warn};
use ninjgen::deps;
use ninjgen::generate::{
	makefile, makefile_wanted, resolve_build_libs, BuildTarget, FlagEnv, Generator,
	DEFAULT_BUILD_DIR, MAKEFILE,
};
use ninjgen::project::{self, PROJECT_FILE};
use ninjgen::script::GeneratedScript;
use ninjgen::write::{write_if_changed, Outcome, WriteMode};
use std::io::{Error, ErrorKind};
use std::path::{Path, PathBuf};
use std::process::exit;
use structopt::StructOpt;

#[derive(StructOpt)]
struct Options {
	/// The project file. Searched for in the current directory and its
	/// src, source, .private and bld sub-directories if not given.
	#[structopt(parse(from_os_str))]
	file: Option<PathBuf>,

	/// Change directory before doing anything else.
	#[structopt(short = "C", parse(from_os_str))]
	directory: Option<PathBuf>,

	/// Dry run: Don't write any files, but show what would change.
	#[structopt(short = "n", long = "dry-run")]
	dry_run: bool,

	/// Write the build scripts even if they did not change.
	#[structopt(long)]
	force: bool,

	/// Directory for the ninja files, relative to the project file.
	#[structopt(short = "b", long = "builddir", default_value = DEFAULT_BUILD_DIR)]
	build_dir: String,

	/// Also write a makefile, regardless of the makefile option.
	#[structopt(long)]
	makefile: bool,

	/// Run a subtool. Use -t list to list subtools.
	#[structopt(short = "t")]
	tool: Option<String>,

	/// Enable debug messages.
	#[structopt(long)]
	debug: bool,
}

impl Options {
	/// The project file to use.
	fn project_file(&self) -> Result<PathBuf, Error> {
		match &self.file {
			Some(file) => Ok(file.clone()),
			None => project::locate(Path::new(".")).ok_or_else(|| {
				Error::new(
					ErrorKind::NotFound,
					format!("Unable to find {} in the current directory", PROJECT_FILE),
				)
			}),
		}
	}

	fn write_mode(&self) -> WriteMode {
		WriteMode {
			dry_run: self.dry_run,
			force: self.force,
		}
	}
}

fn main() {
	log::set_logger(&Logger).unwrap();
	log::set_max_level(log::LevelFilter::Info);

	let opt = Options::from_args();

	if let Some(dir) = opt.directory.as_ref() {
		std::env::set_current_dir(dir).unwrap_or_else(|e| {
			error!("Unable to change directory to {:?}: {}", dir, e);
			exit(1);
		});
	}

	if opt.debug {
		log::set_max_level(log::LevelFilter::Debug);
		debug!("Debug messages enabled.");
	}

	if let Some(tool) = opt.tool.as_ref() {
		subtools::run_subtool(tool, &opt).unwrap_or_else(|e| {
			error!("{}", e);
			exit(1);
		});
		exit(0);
	}

	generate(&opt).unwrap_or_else(|e| {
		error!("{}", e);
		exit(1);
	});
}

/// Generate all build scripts of the project.
///
/// Problems with single build targets are logged, and don't stop the other
/// targets from being generated. Only errors that affect everything are
/// returned.
fn generate(opt: &Options) -> Result<(), Error> {
	let file = opt.project_file()?;
	let (model, warnings) = project::read(&file)?;
	for warning in &warnings {
		warn!("{}", warning);
	}

	let (targets, errors) = BuildTarget::selected(&model);
	for e in &errors {
		warn!("{}", e);
	}
	if targets.is_empty() {
		warn!("No build targets selected");
	}

	let rc_deps = match model.rc_file() {
		Some(rc) => {
			let (rc_deps, warnings) = deps::scan(&model.dir, rc);
			for warning in &warnings {
				warn!("{}", warning);
			}
			rc_deps
		}
		None => Vec::new(),
	};

	let (libs, errors) = resolve_build_libs(&model);
	for e in &errors {
		warn!("{}", e);
	}

	let generator = Generator::new(&model, &opt.build_dir, FlagEnv::from_env())
		.with_rc_deps(rc_deps)
		.with_libs(libs);

	let mode = opt.write_mode();
	let mut generated = Vec::new();
	let mut changed = 0;

	for target in &targets {
		let script = match generator.ninja(target) {
			Ok(script) => script,
			Err(e) => {
				warn!("{}: {}", target, e);
				continue;
			}
		};
		let path = model.dir.join(generator.script_path(target));
		changed += write(&path, &script, mode)? as usize;
		generated.push(*target);
	}

	let makefile_path = model.dir.join(MAKEFILE);
	if opt.makefile || makefile_wanted(&model, makefile_path.exists()) {
		let script = makefile(&model, &generated, generator.build_dir());
		changed += write(&makefile_path, &script, mode)? as usize;
	}

	if changed == 0 && !opt.dry_run {
		info!("All build scripts are up to date.");
	}
	Ok(())
}

/// Write a script, and report what happened. Returns whether the file changed.
fn write(path: &Path, script: &GeneratedScript, mode: WriteMode) -> Result<bool, Error> {
	let outcome = write_if_changed(path, script, mode)?;
	match &outcome {
		Outcome::Created => info!("Created {}", path.display()),
		Outcome::Updated => info!("Updated {}", path.display()),
		Outcome::Unchanged => debug!("{} is up to date", path.display()),
		Outcome::WouldCreate => info!("Would create {}", path.display()),
		Outcome::WouldUpdate(diff) => {
			info!("Would update {}", path.display());
			print!("{}", diff);
		}
	}
	Ok(outcome.changed())
}
