//! Source file enumeration under a project root.

use std::path::{Path, PathBuf};

use crate::config::ProjectConfig;
use crate::error::Result;
use crate::local_files::{self, FileSystem};
use crate::project::ProjectRoot;

/// All source files under the project root, sorted by path.
pub fn source_files(project: &ProjectRoot) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    walk_recursive(
        &local_files::local(),
        &project.root,
        &project.root,
        &project.config,
        &mut files,
    )?;
    files.sort();
    Ok(files)
}

/// Root-relative path with `/` separators, for glob matching and display.
pub fn relative_display(path: &Path, root: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn walk_recursive(
    fs: &impl FileSystem,
    dir: &Path,
    root: &Path,
    config: &ProjectConfig,
    files: &mut Vec<PathBuf>,
) -> Result<()> {
    for entry in fs.list(dir)? {
        if entry.is_dir {
            let skipped = entry
                .path
                .file_name()
                .is_some_and(|name| config.skips_dir(&name.to_string_lossy()));
            if !skipped {
                walk_recursive(fs, &entry.path, root, config, files)?;
            }
        } else if config.matches_extension(&entry.path)
            && !config.is_excluded(&relative_display(&entry.path, root))
        {
            files.push(entry.path);
        }
    }
    Ok(())
}
