// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use std::path::{Path, PathBuf};

use path_clean::clean;

pub type FindInParent = fn(&Path, &str) -> Option<PathBuf>;

/// First `filename` found in `path` or any of its ancestors.
pub fn find_in_parent(path: &Path, filename: &str) -> Option<PathBuf> {
    path.ancestors()
        .map(|dir| dir.join(filename))
        .find(|candidate| candidate.exists())
}

/// Where the config file lives, and whether the user asked for it explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfigPath {
    pub path: PathBuf,
    pub explicit: bool,
}

/// Pick the config file: `--config` (relative to `cwd`), else the nearest
/// `default_filename` above `cwd`, else the one in `default_config_dir`.
pub fn resolve_config_path<P: Into<PathBuf>>(
    find_in_parent: FindInParent,
    cwd: P,
    default_config_dir: P,
    default_filename: &str,
    cli_file: Option<P>,
) -> ResolvedConfigPath {
    let cwd = cwd.into();

    match cli_file.map(Into::<PathBuf>::into) {
        Some(file) => ResolvedConfigPath {
            path: clean(cwd.join(file)),
            explicit: true,
        },
        None => ResolvedConfigPath {
            path: find_in_parent(&cwd, default_filename)
                .unwrap_or_else(|| clean(default_config_dir.into().join(default_filename))),
            explicit: false,
        },
    }
}
