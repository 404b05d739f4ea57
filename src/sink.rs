//! Destinations for rendered glossaries.
//!
//! [`StreamSink`] writes to any `io::Write` such as stdout. [`FileSink`]
//! replaces a file atomically: the text goes to a temporary file next to the
//! target which is renamed over it only once fully written.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

/// Errors raised while writing output.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write to {name}: {source}")]
    Stream {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

/// A destination for rendered text.
pub trait Sink {
    /// Write the whole text. Either all of it reaches the destination or an
    /// error is returned.
    fn write(&mut self, text: &str) -> Result<(), SinkError>;

    /// Human-readable name of the destination, e.g. a file path.
    fn destination(&self) -> String;
}

impl<S: Sink + ?Sized> Sink for &mut S {
    fn write(&mut self, text: &str) -> Result<(), SinkError> {
        (**self).write(text)
    }

    fn destination(&self) -> String {
        (**self).destination()
    }
}

impl<S: Sink + ?Sized> Sink for Box<S> {
    fn write(&mut self, text: &str) -> Result<(), SinkError> {
        (**self).write(text)
    }

    fn destination(&self) -> String {
        (**self).destination()
    }
}

/// Writes to an output stream.
#[derive(Debug)]
pub struct StreamSink<W> {
    name: String,
    writer: W,
}

impl StreamSink<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new("stdout", std::io::stdout())
    }
}

impl<W: Write> StreamSink<W> {
    pub fn new(name: impl Into<String>, writer: W) -> Self {
        Self {
            name: name.into(),
            writer,
        }
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Sink for StreamSink<W> {
    fn write(&mut self, text: &str) -> Result<(), SinkError> {
        self.writer
            .write_all(text.as_bytes())
            .and_then(|()| self.writer.flush())
            .map_err(|source| SinkError::Stream {
                name: self.name.clone(),
                source,
            })
    }

    fn destination(&self) -> String {
        self.name.clone()
    }
}

/// Writes to a file, replacing any existing content.
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn error(&self, source: std::io::Error) -> SinkError {
        SinkError::Write {
            path: self.path.clone(),
            source,
        }
    }
}

impl Sink for FileSink {
    fn write(&mut self, text: &str) -> Result<(), SinkError> {
        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        // Dropping the temporary file on any error path deletes it.
        let mut tmp = NamedTempFile::new_in(parent).map_err(|e| self.error(e))?;
        tmp.write_all(text.as_bytes()).map_err(|e| self.error(e))?;
        tmp.as_file().sync_all().map_err(|e| self.error(e))?;

        // An existing target keeps its mode; a new one gets 0644.
        let permissions = match std::fs::metadata(&self.path) {
            Ok(metadata) => Some(metadata.permissions()),
            Err(_) => default_permissions(),
        };
        if let Some(permissions) = permissions {
            tmp.as_file()
                .set_permissions(permissions)
                .map_err(|e| self.error(e))?;
        }

        tmp.persist(&self.path).map_err(|e| self.error(e.error))?;

        tracing::debug!(path = %self.path.display(), bytes = text.len(), "wrote file");
        Ok(())
    }

    fn destination(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(unix)]
fn default_permissions() -> Option<std::fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(std::fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn default_permissions() -> Option<std::fs::Permissions> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_stream_sink_writes_all() {
        let mut sink = StreamSink::new("buffer", Vec::new());
        sink.write("Widget\n").unwrap();
        sink.write("A UI building block.\n").unwrap();
        assert_eq!(sink.into_inner(), b"Widget\nA UI building block.\n");
    }

    #[test]
    fn test_stream_sink_reports_failure() {
        struct Broken;

        impl Write for Broken {
            fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::other("closed"))
            }

            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let mut sink = StreamSink::new("broken", Broken);
        let err = sink.write("text").unwrap_err();
        assert!(matches!(err, SinkError::Stream { ref name, .. } if name == "broken"));
    }

    #[test]
    fn test_file_sink_creates_file() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("glossary.txt");

        FileSink::new(&target).write("[]").unwrap();

        assert_eq!(fs::read_to_string(&target).unwrap(), "[]");
    }

    #[test]
    fn test_file_sink_overwrites() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("glossary.txt");
        fs::write(&target, "old content that is longer than the new one").unwrap();

        FileSink::new(&target).write("new").unwrap();

        assert_eq!(fs::read_to_string(&target).unwrap(), "new");
    }

    #[cfg(unix)]
    #[test]
    fn test_file_sink_keeps_existing_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("private.txt");
        fs::write(&path, "old").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o600)).unwrap();

        FileSink::new(&path).write("new").unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
    }

    #[cfg(unix)]
    #[test]
    fn test_file_sink_new_file_is_world_readable() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("glossary.txt");

        FileSink::new(&path).write("Widget\n").unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
    }

    #[test]
    fn test_file_sink_missing_parent() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("missing/glossary.txt");

        let err = FileSink::new(&target).write("text").unwrap_err();

        match err {
            SinkError::Write { path, .. } => assert_eq!(path, target),
            other => panic!("expected write error, got {other:?}"),
        }
        assert!(!target.exists());
        assert!(!dir.path().join("missing").exists());
    }

    #[test]
    fn test_file_sink_leaves_no_temporary_files() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("out");
        fs::create_dir(&target).unwrap();

        // Renaming a file over a directory fails.
        assert!(FileSink::new(&target).write("text").is_err());

        let leftovers: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(leftovers.len(), 1);
    }

    #[test]
    fn test_destination() {
        assert_eq!(StreamSink::stdout().destination(), "stdout");
        assert_eq!(FileSink::new("out/glossary.json").destination(), "out/glossary.json");
    }
}
