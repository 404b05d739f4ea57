//! Source scanning: turns a directory tree into a sequence of type declarations.
//!
//! A [`Codebase`] yields [`SourceType`]s. The [`Directory`] codebase walks a
//! tree, parses every Java file with tree-sitter and reports each class,
//! interface, enum, record and annotation type it finds, together with its
//! glossary marker and attached Javadoc.

mod java;
pub mod javadoc;

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use smallvec::SmallVec;
use thiserror::Error;
use tree_sitter::{LanguageError, Node, Parser};

use crate::glossary::Definition;
use crate::walker::{walk_with_options, WalkError, WalkOptions};

/// File extensions recognized as source files (compared case-insensitively).
pub const SOURCE_EXTENSIONS: &[&str] = &["java"];

/// Simple name of the annotation that marks a type as a glossary term.
pub const MARKER: &str = "GlossaryTerm";

// Parsing is single-threaded; the parser is cached so the grammar is
// loaded once per thread instead of once per file.
thread_local! {
    static JAVA_PARSER: RefCell<Option<Parser>> = const { RefCell::new(None) };
}

fn init_java_parser() -> Result<Parser, LanguageError> {
    let mut p = Parser::new();
    p.set_language(&tree_sitter_java::LANGUAGE.into())?;
    Ok(p)
}

/// Execute a function with a cached Java parser.
pub(crate) fn with_java_parser<F, R>(f: F) -> Result<R, String>
where
    F: FnOnce(&mut Parser) -> R,
{
    JAVA_PARSER.with(|cell| {
        let mut slot = cell.borrow_mut();
        if slot.is_none() {
            *slot = Some(
                init_java_parser()
                    .map_err(|e| format!("failed to initialize parser: {e}"))?,
            );
        }

        let parser = slot
            .as_mut()
            .ok_or_else(|| "failed to initialize parser".to_string())?;
        Ok(f(parser))
    })
}

/// Find a child node by kind.
pub(crate) fn find_child_by_kind<'a>(node: Node<'a>, kind: &str) -> Option<Node<'a>> {
    node.children(&mut node.walk()).find(|c| c.kind() == kind)
}

/// Extract node text from content.
pub(crate) fn node_text<'a>(node: Node, content: &'a str) -> &'a str {
    &content[node.byte_range()]
}

/// Whether a path has a recognized source extension.
pub fn is_source_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| SOURCE_EXTENSIONS.iter().any(|s| s.eq_ignore_ascii_case(ext)))
}

/// Source location of a declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    /// 1-indexed start line.
    pub start_line: usize,
    /// 1-indexed end line (inclusive).
    pub end_line: usize,
}

impl Location {
    pub fn new(start_line: usize, end_line: usize) -> Self {
        Self {
            start_line,
            end_line,
        }
    }
}

/// One scanned type declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceType {
    /// Simple name of the type.
    pub name: String,
    /// Term given as the marker's argument, e.g. `@GlossaryTerm("Order line")`.
    pub term: Option<String>,
    /// Whether the declaration carries the glossary marker.
    pub has_marker: bool,
    /// Description of the attached Javadoc, comment syntax stripped.
    pub documentation: Option<String>,
    /// File the declaration was found in.
    pub path: PathBuf,
    /// Lines spanned by the declaration.
    pub location: Location,
}

impl SourceType {
    /// Create an unmarked, undocumented type. Mostly useful for tests and
    /// in-memory codebases.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            term: None,
            has_marker: false,
            documentation: None,
            path: PathBuf::new(),
            location: Location::new(1, 1),
        }
    }

    /// Mark the type as a glossary term.
    pub fn marked(mut self) -> Self {
        self.has_marker = true;
        self
    }

    /// Attach documentation.
    pub fn documented(mut self, documentation: impl Into<String>) -> Self {
        self.documentation = Some(documentation.into());
        self
    }

    pub fn has_glossary_marker(&self) -> bool {
        self.has_marker
    }

    /// Whether non-blank documentation is attached.
    pub fn has_documentation(&self) -> bool {
        self.documentation
            .as_deref()
            .is_some_and(|doc| !doc.trim().is_empty())
    }

    /// Derive the glossary definition of this type.
    ///
    /// The term is the marker's override when present, otherwise the type
    /// name. The description is the trimmed documentation, empty when none
    /// is attached; callers filter on [`has_documentation`](Self::has_documentation) first.
    pub fn definition(&self) -> Definition {
        let term = self.term.as_deref().unwrap_or(&self.name);
        let description = self.documentation.as_deref().unwrap_or_default().trim();
        Definition::new(term, description)
    }
}

/// Errors raised while scanning a codebase.
#[derive(Debug, Error)]
pub enum CodebaseError {
    #[error("path not found: {path}")]
    NotFound { path: PathBuf },

    #[error("parse error in {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("failed to read file: {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Walk(#[from] WalkError),
}

/// Something that produces the type declarations of a codebase.
///
/// Implementations must enumerate in a stable order: an unchanged codebase
/// yields the same sequence every time.
pub trait Codebase {
    fn types(&self) -> Result<Vec<SourceType>, CodebaseError>;
}

/// An in-memory codebase.
impl Codebase for Vec<SourceType> {
    fn types(&self) -> Result<Vec<SourceType>, CodebaseError> {
        Ok(self.clone())
    }
}

impl<C: Codebase + ?Sized> Codebase for &C {
    fn types(&self) -> Result<Vec<SourceType>, CodebaseError> {
        (**self).types()
    }
}

/// A directory tree of source files.
#[derive(Debug, Clone)]
pub struct Directory {
    root: PathBuf,
    walk_options: WalkOptions,
}

impl Directory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_options(root, WalkOptions::default())
    }

    pub fn with_options(root: impl Into<PathBuf>, walk_options: WalkOptions) -> Self {
        Self {
            root: root.into(),
            walk_options,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Codebase for Directory {
    /// Scan every source file under the root.
    ///
    /// Fails on the first file that cannot be read or parsed; a partial list
    /// of types is never returned.
    fn types(&self) -> Result<Vec<SourceType>, CodebaseError> {
        if !self.root.exists() {
            return Err(CodebaseError::NotFound {
                path: self.root.clone(),
            });
        }

        let mut types = Vec::new();
        let mut files = 0usize;

        for entry in walk_with_options(&self.root, &self.walk_options) {
            let entry = entry.map_err(|e| match e {
                WalkError::NotFound { path } => CodebaseError::NotFound { path },
                other => CodebaseError::Walk(other),
            })?;

            if !entry.is_file {
                continue;
            }
            if !is_source_file(&entry.path) {
                tracing::trace!(path = %entry.path.display(), "skipping non-source file");
                continue;
            }

            let found = scan_file(&entry.path)?;
            tracing::debug!(
                path = %entry.path.display(),
                types = found.len(),
                "scanned source file"
            );
            files += 1;
            types.extend(found);
        }

        tracing::debug!(
            root = %self.root.display(),
            files,
            types = types.len(),
            "codebase scan complete"
        );
        Ok(types)
    }
}

/// Read and parse one source file.
fn scan_file(path: &Path) -> Result<SmallVec<[SourceType; 4]>, CodebaseError> {
    let bytes = std::fs::read(path).map_err(|source| CodebaseError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let content = String::from_utf8(bytes).map_err(|e| CodebaseError::Parse {
        path: path.to_path_buf(),
        message: format!("invalid UTF-8: {e}"),
    })?;

    java::extract(path, &content).map_err(|message| CodebaseError::Parse {
        path: path.to_path_buf(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const WIDGET: &str = r#"
package ui;

/** A UI building block. */
@GlossaryTerm
public class Widget {}
"#;

    #[test]
    fn test_is_source_file() {
        assert!(is_source_file(Path::new("src/Order.java")));
        assert!(is_source_file(Path::new("src/Order.JAVA")));
        assert!(!is_source_file(Path::new("src/order.rs")));
        assert!(!is_source_file(Path::new("Makefile")));
    }

    #[test]
    fn test_has_documentation_ignores_blank() {
        assert!(!SourceType::new("A").has_documentation());
        assert!(!SourceType::new("A").documented("  \n ").has_documentation());
        assert!(SourceType::new("A").documented("Doc.").has_documentation());
    }

    #[test]
    fn test_definition_uses_name_or_override() {
        let ty = SourceType::new("OrderLine").marked().documented("  One line of an order. ");
        let def = ty.definition();
        assert_eq!(def.term, "OrderLine");
        assert_eq!(def.description, "One line of an order.");

        let ty = SourceType {
            term: Some("Order line".into()),
            ..ty
        };
        assert_eq!(ty.definition().term, "Order line");
    }

    #[test]
    fn test_directory_not_found() {
        let result = Directory::new("/nonexistent/cantis/root").types();
        assert!(matches!(result, Err(CodebaseError::NotFound { .. })));
    }

    #[test]
    fn test_directory_scans_nested_files_in_order() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("b")).unwrap();
        fs::write(dir.path().join("b/Widget.java"), WIDGET).unwrap();
        fs::write(dir.path().join("a.java"), "class Alpha {}\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "class NotJava {").unwrap();

        let types = Directory::new(dir.path()).types().unwrap();
        let names: Vec<&str> = types.iter().map(|t| t.name.as_str()).collect();

        assert_eq!(names, vec!["Alpha", "Widget"]);
        assert!(types[1].has_marker);
        assert_eq!(types[1].documentation.as_deref(), Some("A UI building block."));
        assert!(types[1].path.ends_with("b/Widget.java"));
    }

    #[test]
    fn test_directory_single_file_root() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("Widget.java");
        fs::write(&file, WIDGET).unwrap();

        let types = Directory::new(&file).types().unwrap();
        assert_eq!(types.len(), 1);
        assert_eq!(types[0].name, "Widget");
    }

    #[test]
    fn test_directory_parse_error_names_file() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("Good.java"), WIDGET).unwrap();
        fs::write(dir.path().join("Broken.java"), "public class Broken {\n").unwrap();

        match Directory::new(dir.path()).types() {
            Err(CodebaseError::Parse { path, .. }) => assert!(path.ends_with("Broken.java")),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_directory_rejects_invalid_utf8() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("Binary.java"), [0xff, 0xfe, 0x00, 0x63]).unwrap();

        let result = Directory::new(dir.path()).types();
        assert!(matches!(result, Err(CodebaseError::Parse { .. })));
    }

    #[test]
    fn test_directory_is_deterministic() {
        let dir = TempDir::new().unwrap();
        for name in ["Zeta", "Alpha", "Mu"] {
            fs::write(
                dir.path().join(format!("{name}.java")),
                format!("/** {name}. */\n@GlossaryTerm\nclass {name} {{}}\n"),
            )
            .unwrap();
        }

        let codebase = Directory::new(dir.path());
        let first = codebase.types().unwrap();
        let second = codebase.types().unwrap();
        assert_eq!(first, second);
    }
}
