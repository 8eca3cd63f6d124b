//! This library crate contains all the re-usable parts of `ninjgen`, a
//! generator of ninja build files for C and C++ projects.
//!
//! A project is described by a `.srcfiles.yaml` file, listing its options and
//! source files. From that, a ninja file is generated for every combination
//! of compiler, bitness and configuration, along with a makefile to run them.
//!
//! # File formats
//!
//! - **`.srcfiles.yaml` files**
//!
//!   The [`project`] module reads and writes project files, and the
//!   [`options`] module describes all options they can contain, and the
//!   version of this tool that introduced them.
//!
//! - **Resource scripts**
//!
//!   The [`deps`] module scans `.rc` files for the headers, icons and other
//!   files they use.
//!
//! - **`build.ninja` files and makefiles**
//!
//!   The [`generate`] module creates the build scripts.
//!
//! # Utilities
//!
//! - **Writing only what changed**
//!
//!   [`write_if_changed`](write::write_if_changed) leaves files alone if
//!   they already have the right contents, so ninja does not see them as
//!   modified. In dry-run mode, it produces a [`Diff`](write::Diff) instead.
//!
//! - **Paths**
//!
//!   The [`path`] module handles the `/`-separated relative paths used in
//!   project files and build scripts.

pub mod deps;
pub mod error;
pub mod generate;
pub mod mtime;
pub mod options;
pub mod path;
pub mod project;
pub mod script;
pub mod write;
