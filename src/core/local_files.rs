use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Entry returned from directory listing
#[derive(Debug, Clone)]
pub struct Entry {
    pub path: PathBuf,
    pub is_dir: bool,
}

impl Entry {
    pub fn has_extension(&self, ext: &str) -> bool {
        !self.is_dir && self.path.extension().is_some_and(|e| e == ext)
    }
}

/// Trait for the file operations the namespace tools need.
pub trait FileSystem {
    fn read(&self, path: &Path) -> Result<String>;
    fn write(&self, path: &Path, content: &str) -> Result<()>;
    fn list(&self, dir: &Path) -> Result<Vec<Entry>>;
}

/// Local filesystem implementation
pub struct LocalFs;

impl LocalFs {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFs {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystem for LocalFs {
    fn read(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Error::internal_io(
                format!("File not found: {}", path.display()),
                Some("read file".to_string()),
            ),
            std::io::ErrorKind::InvalidData => {
                Error::source_invalid_encoding(path.display().to_string(), e.to_string())
            }
            _ => Error::internal_io(e.to_string(), Some(format!("read {}", path.display()))),
        })
    }

    /// Atomic write: the content lands in a temp sibling first, then replaces
    /// the target in one rename. The target is untouched if any step fails.
    ///
    /// A symlinked target is resolved first so the link survives, and the
    /// existing file's permissions carry over to the replacement.
    fn write(&self, path: &Path, content: &str) -> Result<()> {
        let target = resolve_symlink(path)?;
        let invalid_path = || {
            Error::internal_io(
                format!("Invalid path: {}", path.display()),
                Some("write file".to_string()),
            )
        };

        let parent = target.parent().ok_or_else(invalid_path)?;
        let filename = target.file_name().ok_or_else(invalid_path)?;
        let tmp_path = parent.join(format!(".{}.nssync.tmp", filename.to_string_lossy()));

        fs::write(&tmp_path, content)
            .map_err(|e| Error::internal_io(e.to_string(), Some("write temp file".to_string())))?;

        let finish = match fs::metadata(&target) {
            Ok(meta) => fs::set_permissions(&tmp_path, meta.permissions()),
            Err(_) => Ok(()),
        }
        .and_then(|_| fs::rename(&tmp_path, &target));

        if let Err(e) = finish {
            let _ = fs::remove_file(&tmp_path);
            return Err(Error::internal_io(
                e.to_string(),
                Some(format!("replace {}", target.display())),
            ));
        }

        Ok(())
    }

    /// Sorted listing. Symlinks are not followed when classifying entries,
    /// so a linked directory is never reported as a directory.
    fn list(&self, dir: &Path) -> Result<Vec<Entry>> {
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(dir).map_err(|e| {
            Error::internal_io(e.to_string(), Some(format!("list {}", dir.display())))
        })?;

        let mut result = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                Error::internal_io(e.to_string(), Some(format!("list {}", dir.display())))
            })?;
            let is_dir = entry.file_type().is_ok_and(|t| t.is_dir());
            result.push(Entry {
                path: entry.path(),
                is_dir,
            });
        }
        result.sort_by(|a, b| a.path.cmp(&b.path));

        Ok(result)
    }
}

/// The file a symlink ultimately points at; other paths are returned as is.
fn resolve_symlink(path: &Path) -> Result<PathBuf> {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.file_type().is_symlink() => fs::canonicalize(path).map_err(|e| {
            Error::internal_io(e.to_string(), Some(format!("resolve link {}", path.display())))
        }),
        _ => Ok(path.to_path_buf()),
    }
}

/// Convenience function to get local filesystem
pub fn local() -> LocalFs {
    LocalFs::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_local_fs_write_read() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("Program.cs");
        let fs = local();

        fs.write(&path, "namespace App;\n").unwrap();
        let content = fs.read(&path).unwrap();
        assert_eq!(content, "namespace App;\n");
    }

    #[test]
    fn test_local_fs_write_leaves_no_temp_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("Program.cs");
        let fs = local();

        fs.write(&path, "first").unwrap();
        fs.write(&path, "second").unwrap();

        let entries = fs.list(dir.path()).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(fs.read(&path).unwrap(), "second");
    }

    #[cfg(unix)]
    #[test]
    fn test_local_fs_write_keeps_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let path = dir.path().join("Tool.cs");
        std::fs::write(&path, "namespace Old;\n").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o640)).unwrap();

        local().write(&path, "namespace New;\n").unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o640);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "namespace New;\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_local_fs_write_through_symlink() {
        let dir = tempdir().unwrap();
        let real = dir.path().join("Real.cs");
        let link = dir.path().join("Link.cs");
        std::fs::write(&real, "namespace Old;\n").unwrap();
        std::os::unix::fs::symlink(&real, &link).unwrap();

        local().write(&link, "namespace New;\n").unwrap();

        assert!(std::fs::symlink_metadata(&link)
            .unwrap()
            .file_type()
            .is_symlink());
        assert_eq!(std::fs::read_to_string(&real).unwrap(), "namespace New;\n");
    }

    #[test]
    fn test_local_fs_list_is_sorted() {
        let dir = tempdir().unwrap();
        let fs = local();

        fs.write(&dir.path().join("b.cs"), "").unwrap();
        fs.write(&dir.path().join("a.csproj"), "").unwrap();
        std::fs::create_dir(dir.path().join("Sub")).unwrap();

        let entries = fs.list(dir.path()).unwrap();
        assert_eq!(entries.len(), 3);
        assert!(entries[0].path.ends_with("Sub"));
        assert!(entries[1].has_extension("csproj"));
        assert!(entries[2].has_extension("cs"));
    }

    #[cfg(unix)]
    #[test]
    fn test_local_fs_list_does_not_follow_dir_links() {
        let dir = tempdir().unwrap();
        std::fs::create_dir(dir.path().join("Real")).unwrap();
        std::os::unix::fs::symlink(dir.path().join("Real"), dir.path().join("Loop")).unwrap();

        let entries = local().list(dir.path()).unwrap();
        let dirs: Vec<bool> = entries.iter().map(|e| e.is_dir).collect();
        assert_eq!(dirs, vec![false, true]);
    }

    #[test]
    fn test_local_fs_read_non_utf8_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("Latin1.cs");
        std::fs::write(&path, b"// caf\xe9\nnamespace App;\n").unwrap();

        let err = local().read(&path).unwrap_err();
        assert_eq!(err.code, crate::ErrorCode::SourceInvalidEncoding);
        assert_eq!(err.details["file"], path.display().to_string());
    }

    #[test]
    fn test_local_fs_read_missing_file() {
        let dir = tempdir().unwrap();
        let err = local().read(&dir.path().join("missing.cs")).unwrap_err();
        assert_eq!(err.code, crate::ErrorCode::InternalIoError);
    }
}
