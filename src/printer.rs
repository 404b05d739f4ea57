//! Glossary printing: scan, render, write.

use crate::errors::CantisError;
use crate::glossary::Glossary;
use crate::output::Formatter;
use crate::sink::Sink;

/// Prints a glossary to a sink, optionally announcing the result on an echo sink.
///
/// The whole glossary is rendered before anything is written, so a failure
/// in scanning or rendering never leaves partial output behind.
pub struct GlossaryPrinter<'a, G> {
    glossary: G,
    formatter: Formatter,
    primary: Box<dyn Sink + 'a>,
    echo: Option<Box<dyn Sink + 'a>>,
}

impl<'a, G: Glossary> GlossaryPrinter<'a, G> {
    pub fn new(glossary: G, formatter: Formatter, primary: impl Sink + 'a) -> Self {
        Self {
            glossary,
            formatter,
            primary: Box::new(primary),
            echo: None,
        }
    }

    /// Announce where the glossary went once it has been written.
    pub fn with_echo(mut self, echo: impl Sink + 'a) -> Self {
        self.echo = Some(Box::new(echo));
        self
    }

    pub fn print(&mut self) -> Result<(), CantisError> {
        let definitions = self.glossary.definitions()?;
        let text = self.formatter.render(&definitions)?;
        self.primary.write(&text)?;

        let destination = self.primary.destination();
        tracing::info!(
            definitions = definitions.len(),
            format = %self.formatter.format(),
            destination = %destination,
            "glossary written"
        );

        if let Some(echo) = self.echo.as_mut() {
            echo.write(&format!("Glossary written to {destination}\n"))?;
        }

        Ok(())
    }
}
