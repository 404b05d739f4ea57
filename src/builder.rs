//! Fluent builder API for cantis.
//!
//! Wires a [`Directory`] codebase, a [`Formatter`] and the right sinks from
//! plain configuration values.

use std::path::{Path, PathBuf};

use crate::codebase::{CodebaseError, Directory};
use crate::errors::CantisError;
use crate::glossary::{CodebaseGlossary, Definition, Glossary};
use crate::output::{Format, Formatter};
use crate::printer::GlossaryPrinter;
use crate::sink::{FileSink, StreamSink};
use crate::walker::WalkOptions;

/// Builder for generating the glossary of a codebase.
///
/// # Examples
///
/// ```no_run
/// use cantis::builder::Cantis;
/// use cantis::output::Format;
///
/// Cantis::new("./src/main/java")
///     .format(Format::Json)
///     .target(Some("glossary.json".into()))
///     .print()
///     .unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct Cantis {
    root: PathBuf,
    format: Format,
    sorted: bool,
    target: Option<PathBuf>,
    walk_options: WalkOptions,
}

impl Cantis {
    /// Create a new builder for the given source root.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            format: Format::default(),
            sorted: false,
            target: None,
            walk_options: WalkOptions::default(),
        }
    }

    /// Output format (default: plain).
    pub fn format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    /// Sort entries by term.
    pub fn sorted(mut self, sorted: bool) -> Self {
        self.sorted = sorted;
        self
    }

    /// Output file. `None` or a blank path means stdout.
    pub fn target(mut self, target: Option<PathBuf>) -> Self {
        self.target = target.filter(|t| !t.as_os_str().to_string_lossy().trim().is_empty());
        self
    }

    /// Include hidden files.
    pub fn include_hidden(mut self, include: bool) -> Self {
        self.walk_options.include_hidden = include;
        self
    }

    /// Set maximum directory depth.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.walk_options.max_depth = Some(depth);
        self
    }

    /// Honour .gitignore and git exclude files (default: true).
    pub fn respect_gitignore(mut self, respect: bool) -> Self {
        self.walk_options.respect_gitignore = respect;
        self
    }

    /// Descend into symlinked directories.
    pub fn follow_symlinks(mut self, follow: bool) -> Self {
        self.walk_options.follow_symlinks = follow;
        self
    }

    /// Add a gitignore-style file of paths to leave out of the scan.
    pub fn ignore_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.walk_options.custom_ignores.push(path.into());
        self
    }

    fn glossary(&self) -> CodebaseGlossary<Directory> {
        CodebaseGlossary::new(Directory::with_options(
            &self.root,
            self.walk_options.clone(),
        ))
    }

    /// Scan the codebase and return its definitions without printing.
    pub fn definitions(&self) -> Result<Vec<Definition>, CodebaseError> {
        self.glossary().definitions()
    }

    /// Generate the glossary and write it out.
    ///
    /// With a target the glossary goes to that file and a notice to stdout;
    /// without one the glossary goes to stdout and nothing else is printed.
    pub fn print(self) -> Result<(), CantisError> {
        let formatter = Formatter::new(self.format).sorted(self.sorted);
        let glossary = self.glossary();

        match self.target {
            Some(target) => {
                GlossaryPrinter::new(glossary, formatter, FileSink::new(target))
                    .with_echo(StreamSink::stdout())
                    .print()
            }
            None => GlossaryPrinter::new(glossary, formatter, StreamSink::stdout()).print(),
        }
    }
}

// ============================================================================
// Functional API
// ============================================================================

/// Definitions of the codebase at `root`, with default walk options.
///
/// # Examples
///
/// ```no_run
/// use cantis::builder::definitions_from_path;
///
/// for definition in definitions_from_path("./src").unwrap() {
///     println!("{}: {}", definition.term, definition.description);
/// }
/// ```
pub fn definitions_from_path(root: impl AsRef<Path>) -> Result<Vec<Definition>, CodebaseError> {
    CodebaseGlossary::new(Directory::new(root.as_ref())).definitions()
}
