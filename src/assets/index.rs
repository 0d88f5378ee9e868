//! Asset indexer
//!
//! One recursive walk of the root directory producing the [`AssetTable`].
//! The dotfile policy is applied here, so static lookups never re-check it.

use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use super::{asset_key, is_hidden, AssetRecord, AssetTable};
use crate::config::ServeOptions;
use crate::error::{Result, ServeError};
use crate::logger;

/// Canonicalize the engine root, failing when it is not a directory
pub fn canonical_root(root: &Path) -> Result<PathBuf> {
    match root.canonicalize() {
        Ok(path) if path.is_dir() => Ok(path),
        _ => Err(ServeError::DirectoryNotFound(root.to_path_buf())),
    }
}

/// Walk `root` and index every servable regular file
///
/// `root` must already be canonical (see [`canonical_root`]). Symlinks are
/// followed only while their target stays inside the root.
pub fn build(root: &Path, options: &ServeOptions) -> Result<AssetTable> {
    let mut table = AssetTable::default();
    let walker = WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_entry(|entry| {
            (options.dotfiles || !is_hidden_entry(root, entry))
                && (!entry.path_is_symlink() || stays_inside(root, entry.path()))
        });

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.loop_ancestor().is_some() => {
                logger::log_warning(&format!("Skipping symlink loop: {e}"));
                continue;
            }
            Err(e) if is_broken_link(&e) => {
                logger::log_warning(&format!("Skipping broken symlink: {e}"));
                continue;
            }
            Err(e) => {
                let path = e.path().map_or_else(|| root.to_path_buf(), Path::to_path_buf);
                return Err(ServeError::Io {
                    path,
                    source: e.into(),
                });
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let Some(key) = asset_key(root, entry.path()) else {
            logger::log_warning(&format!(
                "Skipping unrepresentable path: {}",
                entry.path().display()
            ));
            continue;
        };

        let path = entry.path().to_path_buf();
        let meta = entry.metadata().map_err(|e| ServeError::Io {
            path: path.clone(),
            source: e.into(),
        })?;
        table.insert(key.clone(), AssetRecord::new(&key, path, &meta));
    }

    Ok(table)
}

/// Whether a walked entry sits on a hidden path (root itself never does)
fn is_hidden_entry(root: &Path, entry: &DirEntry) -> bool {
    asset_key(root, entry.path()).is_some_and(|key| is_hidden(&key))
}

/// Whether a walk error comes from a symlink whose target is gone
fn is_broken_link(err: &walkdir::Error) -> bool {
    err.io_error()
        .is_some_and(|e| e.kind() == std::io::ErrorKind::NotFound)
        && err.path().is_some_and(|p| p.symlink_metadata().is_ok())
}

/// Whether the canonical target of `path` is a descendant of `root`
pub fn stays_inside(root: &Path, path: &Path) -> bool {
    let inside = path
        .canonicalize()
        .is_ok_and(|target| target.starts_with(root));
    if !inside {
        logger::log_warning(&format!(
            "Skipping path escaping the root: {}",
            path.display()
        ));
    }
    inside
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::mime::Encoding;
    use std::fs;

    fn fixture() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("about")).unwrap();
        fs::create_dir_all(root.join(".well-known")).unwrap();
        fs::create_dir_all(root.join(".git")).unwrap();
        fs::write(root.join("index.html"), "<h1>home</h1>").unwrap();
        fs::write(root.join("about/index.htm"), "<h1>about</h1>").unwrap();
        fs::write(root.join("bundle.js"), "console.log(1)").unwrap();
        fs::write(root.join("bundle.js.gz"), "gz").unwrap();
        fs::write(root.join(".hello"), "hi").unwrap();
        fs::write(root.join(".git/config"), "[core]").unwrap();
        fs::write(root.join(".well-known/security.txt"), "contact").unwrap();
        dir
    }

    #[test]
    fn test_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(matches!(
            canonical_root(&missing),
            Err(ServeError::DirectoryNotFound(_))
        ));

        let file = dir.path().join("file.txt");
        fs::write(&file, "x").unwrap();
        assert!(matches!(
            canonical_root(&file),
            Err(ServeError::DirectoryNotFound(_))
        ));
    }

    #[test]
    fn test_build_excludes_dotfiles() {
        let dir = fixture();
        let root = canonical_root(dir.path()).unwrap();
        let table = build(&root, &ServeOptions::default()).unwrap();

        assert!(table.contains("/index.html"));
        assert!(table.contains("/about/index.htm"));
        assert!(table.contains("/.well-known/security.txt"));
        assert!(!table.contains("/.hello"));
        assert!(!table.contains("/.git/config"));

        let mut keys: Vec<_> = table.keys().collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            [
                "/.well-known/security.txt",
                "/about/index.htm",
                "/bundle.js",
                "/bundle.js.gz",
                "/index.html"
            ]
        );
    }

    #[test]
    fn test_build_with_dotfiles() {
        let dir = fixture();
        let root = canonical_root(dir.path()).unwrap();
        let options = ServeOptions {
            dotfiles: true,
            ..ServeOptions::default()
        };
        let table = build(&root, &options).unwrap();

        assert!(table.contains("/.hello"));
        assert!(table.contains("/.git/config"));
        assert_eq!(table.len(), 7);
    }

    #[test]
    fn test_record_metadata() {
        let dir = fixture();
        let root = canonical_root(dir.path()).unwrap();
        let table = build(&root, &ServeOptions::default()).unwrap();

        let html = table.get("/index.html").unwrap();
        assert_eq!(html.size, 13);
        assert_eq!(html.content_type, "text/html;charset=utf-8");
        assert_eq!(html.encoding, None);
        assert!(html.path.starts_with(&root));

        let gz = table.get("/bundle.js.gz").unwrap();
        assert_eq!(gz.content_type, "application/javascript");
        assert_eq!(gz.encoding, Some(Encoding::Gzip));
        assert_eq!(gz.literal_content_type(), "application/gzip");
        // The plain file is a separate entry
        assert_eq!(table.get("/bundle.js").unwrap().encoding, None);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_escaping_root_is_skipped() {
        let outside = tempfile::tempdir().unwrap();
        fs::write(outside.path().join("secret.txt"), "secret").unwrap();

        let dir = fixture();
        std::os::unix::fs::symlink(
            outside.path().join("secret.txt"),
            dir.path().join("leak.txt"),
        )
        .unwrap();

        let root = canonical_root(dir.path()).unwrap();
        let table = build(&root, &ServeOptions::default()).unwrap();
        assert!(!table.contains("/leak.txt"));
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_symlink_is_skipped() {
        let dir = fixture();
        std::os::unix::fs::symlink(dir.path().join("gone.txt"), dir.path().join("dangling.txt"))
            .unwrap();
        fs::create_dir_all(dir.path().join("about/old")).unwrap();
        std::os::unix::fs::symlink(
            dir.path().join("about/removed"),
            dir.path().join("about/old/link"),
        )
        .unwrap();

        let root = canonical_root(dir.path()).unwrap();
        let table = build(&root, &ServeOptions::default()).unwrap();
        assert!(!table.contains("/dangling.txt"));
        assert!(!table.contains("/about/old/link"));
        assert!(table.contains("/index.html"));
        assert_eq!(table.len(), 5);
    }
}
