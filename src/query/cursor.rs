use std::fmt;

/// Opaque server-issued position. Never parsed or built client-side.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cursor(String);

impl Cursor {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Back-navigable history over a forward-only cursor API.
///
/// `stack` holds the position of every page before the current one, with
/// `None` standing for the first page. Its length is the zero-based page
/// index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CursorStack {
    stack: Vec<Option<Cursor>>,
    current: Option<Cursor>,
}

impl CursorStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&Cursor> {
        self.current.as_ref()
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// One-based page number for display.
    pub fn page_number(&self) -> usize {
        self.stack.len() + 1
    }

    pub fn can_retreat(&self) -> bool {
        !self.stack.is_empty()
    }

    pub fn advance(&mut self, next: Cursor) {
        let previous = self.current.replace(next);
        self.stack.push(previous);
    }

    /// Returns false, leaving state untouched, on the first page.
    pub fn retreat(&mut self) -> bool {
        match self.stack.pop() {
            Some(previous) => {
                self.current = previous;
                true
            }
            None => false,
        }
    }

    pub fn reset(&mut self) {
        self.stack.clear();
        self.current = None;
    }

    pub fn is_first_page(&self) -> bool {
        self.stack.is_empty() && self.current.is_none()
    }
}
