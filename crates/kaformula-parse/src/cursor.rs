/// Strip what the lexer must never see: surrounding whitespace and every
/// carriage return / line feed. A missing formula is the empty formula.
pub fn normalize_formula(formula: Option<&str>) -> String {
    formula
        .unwrap_or_default()
        .trim()
        .chars()
        .filter(|c| !matches!(c, '\r' | '\n'))
        .collect()
}

/// Character cursor over a normalised formula.
///
/// Positions are char offsets, not byte offsets, so error positions line up
/// with what a user sees in the formula text.
#[derive(Debug, Clone)]
pub struct Cursor {
    chars: Vec<char>,
    pos: usize,
}

impl Cursor {
    pub fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            pos: 0,
        }
    }

    #[inline]
    pub fn is_eof(&self) -> bool {
        self.pos >= self.chars.len()
    }

    /// Current char, `None` at end of input.
    #[inline]
    pub fn current(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    #[inline]
    pub fn advance(&mut self) {
        if self.pos < self.chars.len() {
            self.pos += 1;
        }
    }

    /// Undo one `advance`.
    #[inline]
    pub fn step_back(&mut self) {
        self.pos = self.pos.saturating_sub(1);
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Text between two char offsets, clamped to the buffer.
    pub fn slice(&self, start: usize, end: usize) -> String {
        let end = end.min(self.chars.len());
        let start = start.min(end);
        self.chars[start..end].iter().collect()
    }
}
