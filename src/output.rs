//! Output formatting for glossaries.
//!
//! Renders definitions as human-readable plain text or as a JSON array.
//! Rendering is a pure function of the definitions it is given.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::glossary::Definition;

/// Errors that can occur during output formatting.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors in the output format configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    #[error("unsupported format: {0:?} (options: plain, json)")]
    Unsupported(String),
}

/// Output format selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    /// Term on one line, description below, entries separated by a blank line.
    #[default]
    Plain,
    /// JSON array of `{"term", "description"}` objects.
    Json,
}

impl Format {
    pub fn all() -> &'static [Format] {
        &[Format::Plain, Format::Json]
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Plain => write!(f, "plain"),
            Format::Json => write!(f, "json"),
        }
    }
}

impl FromStr for Format {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plain" => Ok(Format::Plain),
            "json" => Ok(Format::Json),
            _ => Err(FormatError::Unsupported(s.to_string())),
        }
    }
}

/// Renders a sequence of definitions in a chosen format.
#[derive(Debug, Clone, Copy, Default)]
pub struct Formatter {
    format: Format,
    sorted: bool,
}

impl Formatter {
    pub fn new(format: Format) -> Self {
        Self {
            format,
            sorted: false,
        }
    }

    /// Render entries sorted by term instead of in arrival order.
    pub fn sorted(mut self, sorted: bool) -> Self {
        self.sorted = sorted;
        self
    }

    pub fn format(&self) -> Format {
        self.format
    }

    /// Render definitions to text. The input is never reordered in place.
    pub fn render(&self, definitions: &[Definition]) -> Result<String, OutputError> {
        let definitions: Cow<'_, [Definition]> = if self.sorted {
            let mut copy = definitions.to_vec();
            copy.sort();
            Cow::Owned(copy)
        } else {
            Cow::Borrowed(definitions)
        };

        match self.format {
            Format::Plain => Ok(render_plain(&definitions)),
            Format::Json => render_json(&definitions),
        }
    }
}

/// Plain text: `term\ndescription\n` per entry, blank line between entries.
///
/// An empty glossary renders as the empty string.
pub fn render_plain(definitions: &[Definition]) -> String {
    let mut output = String::with_capacity(definitions.len() * 64);

    for (i, definition) in definitions.iter().enumerate() {
        if i > 0 {
            output.push('\n');
        }
        output.push_str(&definition.term);
        output.push('\n');
        output.push_str(&definition.description);
        output.push('\n');
    }

    output
}

/// Compact JSON array; an empty glossary renders as `[]`.
pub fn render_json(definitions: &[Definition]) -> Result<String, OutputError> {
    Ok(serde_json::to_string(definitions)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widget() -> Definition {
        Definition::new("Widget", "A UI building block.")
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("plain".parse::<Format>(), Ok(Format::Plain));
        assert_eq!(" JSON ".parse::<Format>(), Ok(Format::Json));
        assert_eq!(
            "xml".parse::<Format>(),
            Err(FormatError::Unsupported("xml".into()))
        );
        assert!("".parse::<Format>().is_err());
    }

    #[test]
    fn test_format_display_round_trips() {
        for format in Format::all() {
            assert_eq!(format.to_string().parse::<Format>().as_ref(), Ok(format));
        }
    }

    #[test]
    fn test_plain_single_entry() {
        let output = Formatter::new(Format::Plain).render(&[widget()]).unwrap();
        assert_eq!(output, "Widget\nA UI building block.\n");
    }

    #[test]
    fn test_plain_separates_entries_with_blank_line() {
        let definitions = [widget(), Definition::new("Gadget", "A handy device.")];
        let output = render_plain(&definitions);
        assert_eq!(
            output,
            "Widget\nA UI building block.\n\nGadget\nA handy device.\n"
        );
    }

    #[test]
    fn test_empty_glossary() {
        assert_eq!(Formatter::new(Format::Plain).render(&[]).unwrap(), "");
        assert_eq!(Formatter::new(Format::Json).render(&[]).unwrap(), "[]");
    }

    #[test]
    fn test_json_single_entry() {
        let output = Formatter::new(Format::Json).render(&[widget()]).unwrap();
        assert_eq!(
            output,
            r#"[{"term":"Widget","description":"A UI building block."}]"#
        );
    }

    #[test]
    fn test_json_reparses_to_same_definitions() {
        let definitions = vec![
            widget(),
            Definition::new("Quote \"mark\"", "Line one.\nLine two with ünïcode."),
        ];
        let formatter = Formatter::new(Format::Json);

        let rendered = formatter.render(&definitions).unwrap();
        let parsed: Vec<Definition> = serde_json::from_str(&rendered).unwrap();

        assert_eq!(parsed, definitions);
        assert_eq!(formatter.render(&parsed).unwrap(), rendered);
    }

    #[test]
    fn test_sorted_rendering_leaves_input_untouched() {
        let definitions = vec![
            Definition::new("Zeta", "Last."),
            Definition::new("Alpha", "First."),
        ];

        let output = Formatter::new(Format::Plain)
            .sorted(true)
            .render(&definitions)
            .unwrap();

        assert_eq!(output, "Alpha\nFirst.\n\nZeta\nLast.\n");
        assert_eq!(definitions[0].term, "Zeta");
    }

    #[test]
    fn test_arrival_order_by_default() {
        let definitions = [
            Definition::new("Zeta", "Last."),
            Definition::new("Alpha", "First."),
        ];
        let output = Formatter::new(Format::Plain).render(&definitions).unwrap();
        assert!(output.starts_with("Zeta"));
    }
}
