//! The registry of all options a project file can set.
//!
//! The schema is a static table: every [`OptionKey`] has exactly one
//! [`OptionDescriptor`], stored at the index of its discriminant in
//! [`SCHEMA`]. What a particular project sets these options to lives in
//! [`ProjectModel`][crate::project::ProjectModel], not here.

mod version;

pub use self::version::{ParseVersionError, Version};

/// The version of this tool.
///
/// Project files requiring a newer version are refused.
pub const TOOL_VERSION: Version = Version::new(1, 5, 0);

/// The kind of value an option holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OptionKind {
	/// `true` or `false`. Values are normalized when set.
	Bool,
	/// Any text.
	Text,
}

/// Identifies an option.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OptionKey {
	Project,
	ExeType,
	Pch,
	PchCpp,
	Optimize,
	Warn,
	CflagsCmn,
	CflagsRel,
	CflagsDbg,
	MsvcCmn,
	MsvcRel,
	MsvcDbg,
	ClangCmn,
	ClangRel,
	ClangDbg,
	GccCmn,
	GccRel,
	GccDbg,
	MidlCmn,
	MidlRel,
	MidlDbg,
	RcCmn,
	RcRel,
	RcDbg,
	LinkCmn,
	LinkRel,
	LinkDbg,
	LibsCmn,
	LibsRel,
	LibsDbg,
	CrtRel,
	CrtDbg,
	IncDirs,
	LibDirs,
	LibDirs32,
	BuildLibs,
	TargetDir32,
	TargetDir64,
	Bit32,
	Bit64,
	Bit32Suffix,
	Bit64Suffix,
	DebugSuffix,
	Compilers,
	MsLinker,
	MsRc,
	Natvis,
	Permissive,
	Stdcall,
	DebugRc,
	Makefile,
}

/// Everything there is to know about an option, apart from its value.
#[derive(Debug)]
pub struct OptionDescriptor {
	pub key: OptionKey,
	/// The name as written in the project file. Matched case-insensitively.
	pub name: &'static str,
	/// The value of the option when the project doesn't set it.
	pub default: Option<&'static str>,
	pub kind: OptionKind,
	/// Whether generation needs a non-empty value.
	pub required: bool,
	/// The first version of this tool that understood the option.
	pub since: Version,
	/// A short description, shown by `-t options`.
	pub help: &'static str,
}

impl OptionDescriptor {
	pub fn is_bool(&self) -> bool {
		self.kind == OptionKind::Bool
	}
}

macro_rules! schema {
	(@default None) => { None };
	(@default $value:literal) => { Some($value) };
	($(
		$key:ident $name:literal $default:tt $kind:ident $required:literal
		($major:literal, $minor:literal, $patch:literal) $help:literal;
	)*) => {
		/// All options, in the order of their [`OptionKey`] discriminants.
		pub static SCHEMA: &[OptionDescriptor] = &[$(
			OptionDescriptor {
				key: OptionKey::$key,
				name: $name,
				default: schema!(@default $default),
				kind: OptionKind::$kind,
				required: $required,
				since: Version::new($major, $minor, $patch),
				help: $help,
			},
		)*];
	};
}

#[rustfmt::skip]
schema! {
	Project     "Project"      None        Text true  (1, 0, 0) "name of the project, used for the target binary";
	ExeType     "exe_type"     "window"    Text true  (1, 0, 0) "[window | console | lib | dll | ocx]";
	Pch         "pch"          None        Text false (1, 0, 0) "precompiled header";
	PchCpp      "pch_cpp"      None        Text false (1, 4, 0) "source file that compiles the precompiled header";
	Optimize    "optimize"     "space"     Text true  (1, 0, 0) "[space | speed] optimization of release builds";
	Warn        "warn"         "4"         Text true  (1, 0, 0) "[1-4] compiler warning level";
	CflagsCmn   "cflags_cmn"   None        Text false (1, 0, 0) "flags passed to the compiler in all builds";
	CflagsRel   "cflags_rel"   None        Text false (1, 0, 0) "flags passed to the compiler in release builds";
	CflagsDbg   "cflags_dbg"   None        Text false (1, 0, 0) "flags passed to the compiler in debug builds";
	MsvcCmn     "msvc_cmn"     None        Text false (1, 5, 0) "flags passed only to cl.exe";
	MsvcRel     "msvc_rel"     None        Text false (1, 5, 0) "flags passed only to cl.exe in release builds";
	MsvcDbg     "msvc_dbg"     None        Text false (1, 5, 0) "flags passed only to cl.exe in debug builds";
	ClangCmn    "clang_cmn"    None        Text false (1, 0, 0) "flags passed only to clang-cl";
	ClangRel    "clang_rel"    None        Text false (1, 0, 0) "flags passed only to clang-cl in release builds";
	ClangDbg    "clang_dbg"    None        Text false (1, 0, 0) "flags passed only to clang-cl in debug builds";
	GccCmn      "gcc_cmn"      None        Text false (1, 5, 0) "flags passed only to g++";
	GccRel      "gcc_rel"      None        Text false (1, 5, 0) "flags passed only to g++ in release builds";
	GccDbg      "gcc_dbg"      None        Text false (1, 5, 0) "flags passed only to g++ in debug builds";
	MidlCmn     "midl_cmn"     None        Text false (1, 0, 0) "flags passed to the MIDL compiler";
	MidlRel     "midl_rel"     None        Text false (1, 0, 0) "flags passed to the MIDL compiler in release builds";
	MidlDbg     "midl_dbg"     None        Text false (1, 0, 0) "flags passed to the MIDL compiler in debug builds";
	RcCmn       "rc_cmn"       None        Text false (1, 0, 0) "flags passed to the resource compiler";
	RcRel       "rc_rel"       None        Text false (1, 0, 0) "flags passed to the resource compiler in release builds";
	RcDbg       "rc_dbg"       None        Text false (1, 0, 0) "flags passed to the resource compiler in debug builds";
	LinkCmn     "link_cmn"     None        Text false (1, 0, 0) "flags passed to the linker";
	LinkRel     "link_rel"     None        Text false (1, 0, 0) "flags passed to the linker in release builds";
	LinkDbg     "link_dbg"     None        Text false (1, 0, 0) "flags passed to the linker in debug builds";
	LibsCmn     "libs_cmn"     None        Text false (1, 3, 0) "libraries to link in all builds";
	LibsRel     "libs_rel"     None        Text false (1, 3, 0) "libraries to link in release builds";
	LibsDbg     "libs_dbg"     None        Text false (1, 3, 0) "libraries to link in debug builds";
	CrtRel      "crt_rel"      "static"    Text false (1, 0, 0) "[static | dll] C runtime of release builds";
	CrtDbg      "crt_dbg"      "static"    Text false (1, 0, 0) "[static | dll] C runtime of debug builds";
	IncDirs     "inc_dirs"     None        Text false (1, 0, 0) "additional include directories, separated by ';'";
	LibDirs     "lib_dirs"     None        Text false (1, 1, 0) "additional library directories, separated by ';'";
	LibDirs32   "lib_dirs32"   None        Text false (1, 1, 0) "additional library directories of 32-bit builds";
	BuildLibs   "build_libs"   None        Text false (1, 2, 0) "directories of library projects to build and link, separated by ';'";
	TargetDir32 "target_dir32" None        Text false (1, 0, 0) "directory of the 32-bit target";
	TargetDir64 "target_dir64" None        Text false (1, 0, 0) "directory of the 64-bit target";
	Bit32       "32bit"        "false"     Bool false (1, 0, 0) "generate 32-bit build scripts";
	Bit64       "64bit"        "true"      Bool false (1, 0, 0) "generate 64-bit build scripts";
	Bit32Suffix "32bit_suffix" "false"     Bool false (1, 1, 0) "append '32' to the name of 32-bit targets";
	Bit64Suffix "64bit_suffix" "false"     Bool false (1, 1, 0) "append '64' to the name of 64-bit targets";
	DebugSuffix "debug_suffix" "true"      Bool false (1, 1, 0) "append 'D' to the name of debug targets";
	Compilers   "compilers"    "msvc clang" Text false (1, 5, 0) "compilers to generate scripts for [msvc clang gcc]";
	MsLinker    "ms_linker"    "true"      Bool false (1, 0, 0) "use link.exe and lib.exe instead of lld-link and llvm-lib for clang builds";
	MsRc        "ms_rc"        "true"      Bool false (1, 0, 0) "use rc.exe instead of llvm-rc for clang builds";
	Natvis      "natvis"       None        Text false (1, 3, 0) "natvis file to embed in debug builds";
	Permissive  "permissive"   "false"     Bool false (1, 0, 0) "allow non-conforming code (omits -permissive-)";
	Stdcall     "stdcall"      "false"     Bool false (1, 0, 0) "use the stdcall calling convention in 32-bit builds";
	DebugRc     "debug_rc"     "false"     Bool false (1, 2, 0) "define _DEBUG when compiling resources of debug builds";
	Makefile    "makefile"     "missing"   Text false (1, 1, 0) "[never | missing | always] when to write a makefile";
}

/// Look up the descriptor of an option.
pub fn lookup(key: OptionKey) -> &'static OptionDescriptor {
	&SCHEMA[key as usize]
}

/// Look up an option by the name it has in the project file.
///
/// Case-insensitive. Returns `None` for names that are not in the schema.
pub fn lookup_by_name(name: &str) -> Option<&'static OptionDescriptor> {
	SCHEMA
		.iter()
		.find(|option| option.name.eq_ignore_ascii_case(name))
}

/// The highest version any option requires.
pub fn min_version_required() -> Version {
	SCHEMA
		.iter()
		.map(|option| option.since)
		.max()
		.unwrap_or(Version::new(1, 0, 0))
}

/// Normalize a value of a boolean option: `yes` and `true` are `true`,
/// everything else is `false`.
pub fn normalize_bool(value: &str) -> &'static str {
	let value = value.trim();
	if value.eq_ignore_ascii_case("yes") || value.eq_ignore_ascii_case("true") {
		"true"
	} else {
		"false"
	}
}
