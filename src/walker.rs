//! Directory traversal with gitignore support.
//!
//! Uses the `ignore` crate to walk directories while respecting
//! .gitignore, .git/info/exclude, global gitignore, and .cantisignore.
//! Entries within a directory are yielded sorted by file name so that
//! repeated walks over an unchanged tree produce the same sequence.

use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use thiserror::Error;

/// Name of the project-local ignore file looked up in the walk root.
pub const IGNORE_FILE: &str = ".cantisignore";

/// Errors that can occur during directory walking.
#[derive(Debug, Error)]
pub enum WalkError {
    #[error("path not found: {path}")]
    NotFound { path: PathBuf },

    #[error("permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("symlink loop detected: {path}")]
    SymlinkLoop { path: PathBuf },
}

/// Options for directory walking.
#[derive(Debug, Clone)]
pub struct WalkOptions {
    /// Maximum depth to recurse (None = unlimited).
    pub max_depth: Option<usize>,
    /// Follow symbolic links.
    pub follow_symlinks: bool,
    /// Include hidden files and directories.
    pub include_hidden: bool,
    /// Respect .gitignore patterns.
    pub respect_gitignore: bool,
    /// Additional ignore file paths.
    pub custom_ignores: Vec<PathBuf>,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            max_depth: None,
            follow_symlinks: false,
            include_hidden: false,
            respect_gitignore: true,
            custom_ignores: Vec::new(),
        }
    }
}

impl WalkOptions {
    /// Create options that include hidden files.
    pub fn with_hidden() -> Self {
        Self {
            include_hidden: true,
            ..Default::default()
        }
    }

    /// Set maximum depth.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }
}

/// Entry from directory walk.
#[derive(Debug, Clone)]
pub struct WalkEntry {
    /// Path to the entry.
    pub path: PathBuf,
    /// Whether this is a file or directory.
    pub is_file: bool,
}

/// Walk a directory tree with default options.
///
/// # Examples
///
/// ```no_run
/// use cantis::walker::walk;
/// use std::path::Path;
///
/// for entry in walk(Path::new(".")).flatten() {
///     println!("{}", entry.path.display());
/// }
/// ```
pub fn walk(root: &Path) -> impl Iterator<Item = Result<WalkEntry, WalkError>> {
    walk_with_options(root, &WalkOptions::default())
}

/// Walk a directory tree with custom options.
pub fn walk_with_options(
    root: &Path,
    options: &WalkOptions,
) -> impl Iterator<Item = Result<WalkEntry, WalkError>> {
    let root = root.to_path_buf();

    if !root.exists() {
        return either::Either::Left(std::iter::once(Err(WalkError::NotFound { path: root })));
    }

    let mut builder = WalkBuilder::new(&root);

    builder
        .hidden(!options.include_hidden)
        .git_ignore(options.respect_gitignore)
        .git_global(options.respect_gitignore)
        .git_exclude(options.respect_gitignore)
        .follow_links(options.follow_symlinks)
        .sort_by_file_name(|a, b| a.cmp(b));

    if let Some(depth) = options.max_depth {
        builder.max_depth(Some(depth));
    }

    for ignore_path in &options.custom_ignores {
        if ignore_path.exists() {
            builder.add_ignore(ignore_path);
        }
    }

    let local_ignore = root.join(IGNORE_FILE);
    if local_ignore.exists() {
        builder.add_ignore(&local_ignore);
    }

    let walker = builder.build();

    either::Either::Right(walker.filter_map(|result| match result {
        Ok(entry) => Some(Ok(WalkEntry {
            path: entry.path().to_path_buf(),
            is_file: entry.file_type().is_some_and(|ft| ft.is_file()),
        })),
        Err(e) => convert_error(e, None).map(Err),
    }))
}

/// Convert an `ignore` error into a `WalkError`, keeping the innermost path.
///
/// Errors that are not traversal failures (malformed ignore globs and the
/// like) yield `None` and are skipped.
fn convert_error(err: ignore::Error, path: Option<PathBuf>) -> Option<WalkError> {
    match err {
        ignore::Error::WithPath { path, err } => convert_error(*err, Some(path)),
        ignore::Error::WithDepth { err, .. } | ignore::Error::WithLineNumber { err, .. } => {
            convert_error(*err, path)
        }
        ignore::Error::Loop { child, .. } => Some(WalkError::SymlinkLoop { path: child }),
        ignore::Error::Io(source) => {
            let path = path.unwrap_or_else(|| PathBuf::from("<walk error>"));
            if source.kind() == std::io::ErrorKind::PermissionDenied {
                Some(WalkError::PermissionDenied { path })
            } else {
                Some(WalkError::Io { path, source })
            }
        }
        _ => None,
    }
}

/// Simple Either type to avoid adding itertools dependency.
mod either {
    pub enum Either<L, R> {
        Left(L),
        Right(R),
    }

    impl<L, R, T> Iterator for Either<L, R>
    where
        L: Iterator<Item = T>,
        R: Iterator<Item = T>,
    {
        type Item = T;

        fn next(&mut self) -> Option<Self::Item> {
            match self {
                Either::Left(l) => l.next(),
                Either::Right(r) => r.next(),
            }
        }
    }
}
