//! Library projects listed in `build_libs`.

use super::{BuildTarget, GenerateError};
use crate::options::OptionKey;
use crate::path;
use crate::project::{self, ProjectModel};
use log::debug;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// A library project that is built before linking.
#[derive(Debug)]
pub struct LibProject {
	/// The directory of the library's project file, relative to the
	/// directory of the project that needs it.
	pub dir: String,
	pub model: ProjectModel,
}

impl LibProject {
	/// The library file built for `target`, relative to the directory of the
	/// project that needs it.
	pub fn target_path(&self, target: &BuildTarget) -> String {
		path::join(&self.dir, &target.target_path(&self.model))
	}
}

/// Find and read the projects listed in the `build_libs` option, and the
/// ones those list in turn.
///
/// A project is only listed once, even if multiple projects need it.
pub fn resolve_build_libs(model: &ProjectModel) -> (Vec<LibProject>, Vec<GenerateError>) {
	let mut libs = Vec::new();
	let mut errors = Vec::new();
	let mut visited = HashSet::new();
	visited.insert(identity(&model.dir));
	resolve(model, "", &mut visited, &mut libs, &mut errors);
	(libs, errors)
}

fn identity(dir: &Path) -> PathBuf {
	fs::canonicalize(dir).unwrap_or_else(|_| dir.to_path_buf())
}

/// `base` is the directory of `model`, relative to the root project.
fn resolve(
	model: &ProjectModel,
	base: &str,
	visited: &mut HashSet<PathBuf>,
	libs: &mut Vec<LibProject>,
	errors: &mut Vec<GenerateError>,
) {
	for dir in model.option_list(OptionKey::BuildLibs) {
		let search_dir = model.dir.join(dir);
		let file = match project::locate(&search_dir) {
			Some(file) => file,
			None => {
				errors.push(GenerateError::NoLibProject(path::join(base, dir)));
				continue;
			}
		};
		let project_dir = file.parent().unwrap_or(search_dir.as_path());
		if !visited.insert(identity(project_dir)) {
			continue;
		}

		// The project file may be in a sub-directory like `src`.
		let sub_dir = project_dir
			.strip_prefix(&search_dir)
			.ok()
			.and_then(|p| p.to_str())
			.unwrap_or("");
		let lib_dir = path::join(&path::join(base, dir), sub_dir);

		let lib_model = match project::read(&file) {
			Ok((lib_model, warnings)) => {
				for warning in warnings {
					debug!("{}", warning);
				}
				lib_model
			}
			Err(error) => {
				errors.push(GenerateError::LibProject {
					dir: lib_dir,
					error,
				});
				continue;
			}
		};
		debug!("Library project {} at {}", lib_model.project_name(), lib_dir);

		resolve(&lib_model, &lib_dir, visited, libs, errors);
		libs.push(LibProject {
			dir: lib_dir,
			model: lib_model,
		});
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::generate::{Bitness, Compiler, Configuration};
	use std::io::Error;

	fn write(dir: &Path, name: &str, content: &str) -> Result<PathBuf, Error> {
		let file = dir.join(name);
		fs::create_dir_all(file.parent().unwrap())?;
		fs::write(&file, content)?;
		Ok(file)
	}

	#[test]
	fn resolves_recursively() -> Result<(), Error> {
		let dir = tempfile::tempdir()?;
		let app = write(
			dir.path(),
			"app/.srcfiles.yaml",
			"Options:\n    Project: app\n    build_libs: ../util; ../missing\nFiles:\n    main.cpp\n",
		)?;
		write(
			dir.path(),
			"util/src/.srcfiles.yaml",
			"Options:\n    Project: util\n    exe_type: lib\n    build_libs: ../../core\nFiles:\n    util.cpp\n",
		)?;
		write(
			dir.path(),
			"core/.srcfiles.yaml",
			"Options:\n    Project: core\n    exe_type: lib\n    build_libs: ../app\nFiles:\n    core.cpp\n",
		)?;

		let (model, _) = project::read(&app).unwrap();
		let (libs, errors) = resolve_build_libs(&model);

		let dirs: Vec<_> = libs.iter().map(|l| l.dir.as_str()).collect();
		assert_eq!(dirs, vec!["../core", "../util/src"]);
		assert!(matches!(&errors[..], [GenerateError::NoLibProject(d)] if d == "../missing"));

		let target = BuildTarget::new(Compiler::Msvc, Bitness::Bits64, Configuration::Debug);
		assert_eq!(libs[1].target_path(&target), "../util/src/lib/utilD.lib");
		Ok(())
	}

	#[test]
	fn unreadable_lib_project() -> Result<(), Error> {
		let dir = tempfile::tempdir()?;
		let app = write(dir.path(), "app/.srcfiles.yaml", "Options:\n    build_libs: ../lib\n")?;
		write(
			dir.path(),
			"lib/.srcfiles.yaml",
			"# Requires ninjgen version 99.0.0 or higher to process\n",
		)?;
		let (model, _) = project::read(&app).unwrap();
		let (libs, errors) = resolve_build_libs(&model);
		assert!(libs.is_empty());
		assert!(matches!(
			&errors[..],
			[GenerateError::LibProject { dir, .. }] if dir == "../lib"
		));
		Ok(())
	}
}
