//! Locating fixture files on disk.

use std::{
    env,
    path::{Path, PathBuf},
};

use lazy_static::lazy_static;

/// Overrides [`SrcRoot::Runfiles`], as bazel does for test binaries.
pub const TEST_SRCDIR_ENV_VAR: &str = "TEST_SRCDIR";

lazy_static! {
    static ref WORKSPACE_ROOT: PathBuf = Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SrcRoot {
    /// Manifest directory of a crate, see [`test_src_dir_path!`](crate::test_src_dir_path).
    Crate(&'static str),
    Workspace,
    /// `$TEST_SRCDIR` when set, the workspace root otherwise.
    Runfiles,
}

pub fn resolve_path<P: AsRef<Path>>(root: SrcRoot, relative_path: P) -> PathBuf {
    let base = match root {
        SrcRoot::Crate(manifest_dir) => PathBuf::from(manifest_dir),
        SrcRoot::Workspace => WORKSPACE_ROOT.clone(),
        SrcRoot::Runfiles => env::var_os(TEST_SRCDIR_ENV_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| WORKSPACE_ROOT.clone()),
    };
    base.join(relative_path)
}

/// Resolves a path relative to the manifest directory of the calling crate.
#[macro_export]
macro_rules! test_src_dir_path {
    ($relative_path:expr) => {
        $crate::paths::resolve_path(
            $crate::paths::SrcRoot::Crate(env!("CARGO_MANIFEST_DIR")),
            $relative_path,
        )
    };
}
