//! Append-with-separator writes for staged files.
//!
//! [`DocumentAppender`] owns the separator policy over any `io::Write`, so it can be
//! exercised against in-memory buffers. [`append_to_file`] binds it to a file opened
//! in append mode; the buffered writer and the file handle are released on every
//! exit path.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Written between two YAML documents sharing one file.
pub(crate) const DOCUMENT_SEPARATOR: &str = "---\n";

#[derive(Debug)]
pub(crate) struct DocumentAppender<W: Write> {
    writer: BufWriter<W>,
    has_content: bool,
}

impl<W: Write> DocumentAppender<W> {
    /// `has_content` tells whether the underlying sink already holds a document.
    pub(crate) fn new(inner: W, has_content: bool) -> Self {
        Self {
            writer: BufWriter::new(inner),
            has_content,
        }
    }

    /// Append one document, preceded by a separator if anything was written before.
    ///
    /// Empty documents are skipped. Documents are newline-terminated so the next
    /// separator always starts on its own line.
    pub(crate) fn append(&mut self, document: &str) -> io::Result<()> {
        if document.is_empty() {
            return Ok(());
        }

        if self.has_content {
            self.writer.write_all(DOCUMENT_SEPARATOR.as_bytes())?;
        }
        self.writer.write_all(document.as_bytes())?;
        if !document.ends_with('\n') {
            self.writer.write_all(b"\n")?;
        }
        self.has_content = true;
        Ok(())
    }

    /// Flush buffered output and hand back the sink.
    pub(crate) fn finish(self) -> io::Result<W> {
        self.writer.into_inner().map_err(|e| e.into_error())
    }
}

/// Create `path` (and its parent directories) without writing anything.
pub(crate) fn ensure_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Append one document to the file at `path`, separating it from existing content.
pub(crate) fn append_to_file(path: &Path, document: &str) -> io::Result<()> {
    let file = ensure_file(path)?;
    let has_content = file.metadata()?.len() > 0;

    let mut appender = DocumentAppender::new(file, has_content);
    appender.append(document)?;
    appender.finish()?;
    Ok(())
}
