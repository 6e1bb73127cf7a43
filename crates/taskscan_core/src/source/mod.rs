//! Page text sources.
//!
//! # Responsibility
//! - Turn an input document into a sequence of page texts.
//!
//! # Invariants
//! - All pages are read before extraction starts; a source either yields
//!   every page or fails the whole run.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Page separator in plain-text dumps.
pub const FORM_FEED: char = '\u{0c}';

/// Fatal failure to read an input document.
#[derive(Debug)]
pub enum SourceError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The document was read but its content could not be decoded.
    Parse { path: PathBuf, message: String },
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "cannot read {}: {source}", path.display()),
            Self::Parse { path, message } => {
                write!(f, "cannot decode {}: {message}", path.display())
            }
        }
    }
}

impl Error for SourceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { .. } => None,
        }
    }
}

/// Anything that yields page texts for one run.
pub trait PageSource {
    /// Short label for logs, e.g. the input path.
    fn describe(&self) -> String;

    fn pages(&self) -> Result<Vec<String>, SourceError>;
}

/// Plain text pages, from memory or from a form-feed separated file.
#[derive(Debug, Clone)]
pub enum TextPages {
    Memory(Vec<String>),
    File(PathBuf),
}

impl TextPages {
    pub fn from_pages<I, S>(pages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Memory(pages.into_iter().map(Into::into).collect())
    }

    pub fn from_file(path: impl AsRef<Path>) -> Self {
        Self::File(path.as_ref().to_path_buf())
    }
}

/// Splits a text dump into pages on form feeds.
pub fn split_pages(text: &str) -> Vec<String> {
    text.split(FORM_FEED).map(str::to_string).collect()
}

impl PageSource for TextPages {
    fn describe(&self) -> String {
        match self {
            Self::Memory(pages) => format!("memory:{}", pages.len()),
            Self::File(path) => path.display().to_string(),
        }
    }

    fn pages(&self) -> Result<Vec<String>, SourceError> {
        match self {
            Self::Memory(pages) => Ok(pages.clone()),
            Self::File(path) => {
                let bytes = std::fs::read(path).map_err(|source| SourceError::Io {
                    path: path.clone(),
                    source,
                })?;
                let text = String::from_utf8(bytes).map_err(|err| SourceError::Parse {
                    path: path.clone(),
                    message: format!("not valid UTF-8: {err}"),
                })?;
                Ok(split_pages(&text))
            }
        }
    }
}

#[cfg(feature = "pdf")]
pub use pdf::PdfPages;

#[cfg(feature = "pdf")]
mod pdf {
    use super::{PageSource, SourceError};
    use pdf_oxide::PdfDocument;
    use std::path::{Path, PathBuf};

    /// Text layer of a PDF document, one string per page.
    #[derive(Debug, Clone)]
    pub struct PdfPages {
        path: PathBuf,
    }

    impl PdfPages {
        pub fn new(path: impl AsRef<Path>) -> Self {
            Self {
                path: path.as_ref().to_path_buf(),
            }
        }
    }

    impl PageSource for PdfPages {
        fn describe(&self) -> String {
            self.path.display().to_string()
        }

        fn pages(&self) -> Result<Vec<String>, SourceError> {
            let parse_error = |err: pdf_oxide::Error| SourceError::Parse {
                path: self.path.clone(),
                message: err.to_string(),
            };
            let mut document = PdfDocument::open(&self.path).map_err(parse_error)?;
            let count = document.page_count().map_err(parse_error)?;
            (0..count)
                .map(|index| document.extract_text(index).map_err(parse_error))
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{split_pages, PageSource, SourceError, TextPages};

    #[test]
    fn form_feed_separates_pages() {
        assert_eq!(split_pages("a\nb\u{0c}c"), vec!["a\nb", "c"]);
        assert_eq!(split_pages(""), vec![""]);
    }

    #[test]
    fn memory_pages_are_returned_as_is() {
        let source = TextPages::from_pages(["one", "two"]);
        assert_eq!(source.pages().unwrap(), vec!["one", "two"]);
        assert_eq!(source.describe(), "memory:2");
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let source = TextPages::from_file("/definitely/not/here.txt");
        assert!(matches!(source.pages(), Err(SourceError::Io { .. })));
    }
}
