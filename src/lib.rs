//! Cantis - Generate a glossary of domain terms from annotated source code.
//!
//! Cantis walks a source tree, finds the type declarations annotated with
//! `@GlossaryTerm` that carry a Javadoc comment, and writes the resulting
//! terms and descriptions as plain text or JSON.
//!
//! # Quick Start
//!
//! ```no_run
//! use cantis::builder::Cantis;
//! use cantis::output::Format;
//!
//! // Print the glossary of a project as JSON
//! Cantis::new("./src/main/java")
//!     .format(Format::Json)
//!     .print()
//!     .unwrap();
//! ```
//!
//! # Modules
//!
//! - [`walker`] - Directory traversal with gitignore support
//! - [`codebase`] - Tree-sitter based type scanning
//! - [`glossary`] - Selection of glossary terms and their definitions
//! - [`output`] - Plain text and JSON rendering
//! - [`sink`] - Console and file destinations
//! - [`printer`] - Glossary to sink orchestration
//! - [`builder`] - Fluent API

pub mod errors;
pub mod walker;
pub mod codebase;
pub mod glossary;
pub mod output;
pub mod sink;
pub mod printer;
pub mod builder;

// Re-export key types at crate root for convenience
pub use builder::{definitions_from_path, Cantis};
pub use codebase::{Codebase, CodebaseError, Directory, Location, SourceType};
pub use errors::CantisError;
pub use glossary::{CodebaseGlossary, Definition, Glossary};
pub use output::{Format, FormatError, Formatter, OutputError};
pub use printer::GlossaryPrinter;
pub use sink::{FileSink, Sink, SinkError, StreamSink};
pub use walker::{WalkError, WalkOptions};
