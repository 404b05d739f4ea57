//! Glossary extraction: from scanned types to definitions.

use serde::{Deserialize, Serialize};

use crate::codebase::{Codebase, CodebaseError, SourceType};

/// A glossary entry: a term and what it means.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Definition {
    pub term: String,
    pub description: String,
}

impl Definition {
    pub fn new(term: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            description: description.into(),
        }
    }
}

/// Something that produces glossary definitions.
pub trait Glossary {
    fn definitions(&self) -> Result<Vec<Definition>, CodebaseError>;
}

/// The glossary of a codebase: every marked and documented type.
///
/// Holds no state of its own; each call to [`definitions`](Glossary::definitions)
/// scans the codebase again.
#[derive(Debug, Clone)]
pub struct CodebaseGlossary<C> {
    codebase: C,
}

impl<C: Codebase> CodebaseGlossary<C> {
    pub fn new(codebase: C) -> Self {
        Self { codebase }
    }
}

impl<C: Codebase> Glossary for CodebaseGlossary<C> {
    fn definitions(&self) -> Result<Vec<Definition>, CodebaseError> {
        let types = self.codebase.types()?;
        Ok(derive_definitions(types).collect())
    }
}

/// Keep the types that are glossary terms and derive their definitions.
///
/// A type qualifies when it carries the marker and has non-blank
/// documentation. Codebase order is preserved.
pub fn derive_definitions(
    types: impl IntoIterator<Item = SourceType>,
) -> impl Iterator<Item = Definition> {
    types
        .into_iter()
        .filter(|ty| {
            let eligible = ty.has_glossary_marker() && ty.has_documentation();
            if !eligible {
                tracing::trace!(
                    name = %ty.name,
                    path = %ty.path.display(),
                    line = ty.location.start_line,
                    marked = ty.has_marker,
                    "type is not a glossary term"
                );
            }
            eligible
        })
        .map(|ty| ty.definition())
}
