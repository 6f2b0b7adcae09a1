use std::error::Error;
use std::path::{Path, PathBuf};

use console::style;
use walkdir::{DirEntry, WalkDir};

use crate::context::format::load_file;
use crate::context::Context;
use crate::error::LoadError;

/// Directory extensions treated as opaque package bundles.
const PACKAGE_EXTENSIONS: &[&str] = &[
    "app",
    "bundle",
    "framework",
    "plugin",
    "kext",
    "pkg",
    "mpkg",
    "xcodeproj",
    "xcworkspace",
    "playground",
    "rtfd",
    "photoslibrary",
];

/// Options controlling how context sources are read.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Visit directory entries in file-name order instead of filesystem order.
    pub sort_entries: bool,
    /// Do not print a warning for skipped directory entries.
    pub quiet: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            sort_entries: true,
            quiet: false,
        }
    }
}

/// Resolve a context source argument against `base`. Absolute paths are kept as-is.
pub fn resolve_path(base: &Path, raw: &str) -> PathBuf {
    let path = Path::new(raw);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

/// Load and merge every context source, in order.
///
/// A missing path or a broken single file aborts the load. Files found while
/// walking a directory are best-effort: failures are reported and skipped.
pub fn load<S: AsRef<str>>(sources: &[S], options: &LoadOptions) -> Result<Context, LoadError> {
    let cwd = std::env::current_dir().map_err(|e| LoadError::Io {
        context: "getting current directory".into(),
        source: e,
    })?;

    let mut context = Context::new();

    for source in sources {
        let path = resolve_path(&cwd, source.as_ref());

        if !path.exists() {
            return Err(LoadError::PathNotFound { path });
        }

        if path.is_dir() {
            load_directory(&path, options, &mut context);
        } else {
            context.merge(load_file(&path)?);
        }
    }

    Ok(context)
}

fn load_directory(root: &Path, options: &LoadOptions, context: &mut Context) {
    let mut walker = WalkDir::new(root).min_depth(1);
    if options.sort_entries {
        walker = walker.sort_by_file_name();
    }

    let entries = walker
        .into_iter()
        .filter_entry(|e| !is_hidden(e) && !is_package_bundle(e));
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| root.to_path_buf());
                warn_skipped(options, &path, &e);
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        match load_file(entry.path()) {
            Ok(mapping) => context.merge(mapping),
            Err(e) => warn_skipped(options, entry.path(), &e),
        }
    }
}

fn warn_skipped(options: &LoadOptions, path: &Path, error: &dyn Error) {
    if options.quiet {
        return;
    }
    eprintln!(
        "{} skipping {}: {}",
        style("warning:").yellow().bold(),
        style(path.display()).cyan(),
        style(error_chain(error)).yellow()
    );
}

/// Render an error followed by each of its sources, separated by colons.
fn error_chain(error: &dyn Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .map(|name| name.starts_with('.'))
            .unwrap_or(false)
}

/// Package bundles are opaque: their contents are never walked.
fn is_package_bundle(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .path()
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| PACKAGE_EXTENSIONS.contains(&e))
            .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, content).unwrap();
        path
    }

    fn quiet() -> LoadOptions {
        LoadOptions {
            quiet: true,
            ..LoadOptions::default()
        }
    }

    fn source(path: &Path) -> String {
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn resolve_relative_against_base() {
        let base = Path::new("/work/dir");
        assert_eq!(
            resolve_path(base, "data/a.json"),
            PathBuf::from("/work/dir/data/a.json")
        );
        assert_eq!(resolve_path(base, "/etc/a.json"), PathBuf::from("/etc/a.json"));
    }

    #[test]
    fn missing_path_aborts() {
        let dir = tempfile::tempdir().unwrap();
        let good = write(dir.path(), "a.json", r#"{"a": 1}"#);
        let missing = dir.path().join("missing.json");

        let err = load(&[source(&good), source(&missing)], &quiet()).unwrap_err();
        assert!(matches!(err, LoadError::PathNotFound { ref path } if *path == missing));
    }

    #[test]
    fn later_file_wins_across_formats() {
        let dir = tempfile::tempdir().unwrap();
        let json = write(dir.path(), "a.json", r#"{"name": "json", "only_json": true}"#);
        let yaml = write(dir.path(), "b.yaml", "name: yaml\n");

        let context = load(&[source(&json), source(&yaml)], &quiet()).unwrap();
        assert_eq!(context.get("name"), Some(&json!("yaml")));
        assert_eq!(context.get("only_json"), Some(&json!(true)));

        let context = load(&[source(&yaml), source(&json)], &quiet()).unwrap();
        assert_eq!(context.get("name"), Some(&json!("json")));
    }

    #[test]
    fn single_malformed_file_aborts() {
        let dir = tempfile::tempdir().unwrap();
        let good = write(dir.path(), "a.json", r#"{"a": 1}"#);
        let bad = write(dir.path(), "b.json", "{ broken");

        let err = load(&[source(&good), source(&bad)], &quiet()).unwrap_err();
        assert!(matches!(err, LoadError::ParseError { .. }));
    }

    #[test]
    fn directory_skips_malformed_files() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "good.json", r#"{"good": 1}"#);
        write(dir.path(), "bad.yaml", "key: [unterminated\n");
        write(dir.path(), "readme.md", "# not context");

        let context = load(&[source(dir.path())], &quiet()).unwrap();
        assert_eq!(context.len(), 1);
        assert_eq!(context.get("good"), Some(&json!(1)));
    }

    #[test]
    fn directory_walk_is_recursive_and_sorted() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.json", r#"{"value": "a", "a": true}"#);
        write(dir.path(), "b/inner.yml", "value: b-inner\nb: true\n");
        write(dir.path(), "c.json", r#"{"value": "c"}"#);

        let context = load(&[source(dir.path())], &quiet()).unwrap();
        assert_eq!(context.get("value"), Some(&json!("c")));
        assert_eq!(context.get("a"), Some(&json!(true)));
        assert_eq!(context.get("b"), Some(&json!(true)));
    }

    #[test]
    fn directory_skips_hidden_entries() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "visible.json", r#"{"visible": true}"#);
        write(dir.path(), ".hidden.json", r#"{"hidden": true}"#);
        write(dir.path(), ".git/config.json", r#"{"git": true}"#);

        let context = load(&[source(dir.path())], &quiet()).unwrap();
        assert!(context.contains_key("visible"));
        assert!(!context.contains_key("hidden"));
        assert!(!context.contains_key("git"));
    }

    #[test]
    fn directory_skips_package_contents() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "top.json", r#"{"top": true}"#);
        write(
            dir.path(),
            "Tool.app/Contents/Info.plist",
            r#"<?xml version="1.0" encoding="UTF-8"?>
<plist version="1.0"><dict><key>bundled</key><true/></dict></plist>"#,
        );

        let context = load(&[source(dir.path())], &quiet()).unwrap();
        assert!(context.contains_key("top"));
        assert!(!context.contains_key("bundled"));
    }

    #[test]
    fn error_chain_includes_sources() {
        let err = LoadError::Io {
            context: "reading a.json".into(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert_eq!(error_chain(&err), "IO error: reading a.json: gone");
    }

    #[test]
    fn hidden_root_directory_is_still_walked() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join(".config");
        write(&root, "settings.json", r#"{"theme": "dark"}"#);

        let context = load(&[source(&root)], &quiet()).unwrap();
        assert_eq!(context.get("theme"), Some(&json!("dark")));
    }

    #[test]
    fn empty_files_contribute_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let json = write(dir.path(), "a.json", r#"{"a": 1}"#);
        let empty_yaml = write(dir.path(), "empty.yaml", "");
        let empty_json = write(dir.path(), "empty.json", "");

        let context = load(
            &[source(&json), source(&empty_yaml), source(&empty_json)],
            &quiet(),
        )
        .unwrap();
        assert_eq!(context.len(), 1);
        assert_eq!(context.get("a"), Some(&json!(1)));
    }

    #[cfg(unix)]
    #[test]
    fn directory_does_not_follow_symlinks() {
        let outside = tempfile::tempdir().unwrap();
        let target = write(outside.path(), "linked.json", r#"{"linked": true}"#);

        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "real.json", r#"{"real": true}"#);
        std::os::unix::fs::symlink(&target, dir.path().join("link.json")).unwrap();

        let context = load(&[source(dir.path())], &quiet()).unwrap();
        assert!(context.contains_key("real"));
        assert!(!context.contains_key("linked"));
    }
}
