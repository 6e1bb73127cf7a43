//! Context windows around task anchors.
//!
//! Typesetting wraps the fields of one task over the anchor line and the
//! next few lines, so extraction reads a small fixed window instead of the
//! whole page.

/// Lines read per anchor unless configured otherwise.
pub const DEFAULT_WINDOW_SIZE: usize = 3;

/// Consecutive lines starting at an anchor line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextWindow<'a> {
    anchor_index: usize,
    lines: Vec<&'a str>,
}

impl<'a> ContextWindow<'a> {
    /// Takes `lines[anchor_index..anchor_index + size]`, clamped at the end.
    pub fn new<S: AsRef<str>>(lines: &'a [S], anchor_index: usize, size: usize) -> Self {
        let start = anchor_index.min(lines.len());
        let end = anchor_index.saturating_add(size).min(lines.len());
        Self {
            anchor_index,
            lines: lines[start..end].iter().map(AsRef::as_ref).collect(),
        }
    }

    pub fn anchor_index(&self) -> usize {
        self.anchor_index
    }

    pub fn lines(&self) -> &[&'a str] {
        &self.lines
    }

    /// Space-joined window text fed to the field extractors.
    pub fn joined(&self) -> String {
        self.lines.join(" ")
    }
}

/// Space-joined text of the window starting at `anchor_index`.
pub fn window<S: AsRef<str>>(lines: &[S], anchor_index: usize, size: usize) -> String {
    ContextWindow::new(lines, anchor_index, size).joined()
}
