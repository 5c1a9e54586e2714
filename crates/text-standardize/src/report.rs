/// Result of standardizing one string, with per-rule match counts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextReport {
    /// The standardized text.
    pub output: String,
    /// `http` runs removed together with their attached non-whitespace.
    pub urls_removed: usize,
    /// Bare `http` occurrences removed after URL stripping.
    pub bare_http_removed: usize,
    /// `@handle` mention tokens removed.
    pub mentions_removed: usize,
    /// Lone `@` characters rewritten to `at`.
    pub at_replaced: usize,
}

/// Aggregate counts for one standardized column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColumnReport {
    pub rows: usize,
    /// Text cells whose value changed.
    pub rows_changed: usize,
    pub nulls: usize,
    pub urls_removed: usize,
    pub bare_http_removed: usize,
    pub mentions_removed: usize,
    pub at_replaced: usize,
}

impl ColumnReport {
    pub(crate) fn absorb(&mut self, text: &TextReport) {
        self.urls_removed += text.urls_removed;
        self.bare_http_removed += text.bare_http_removed;
        self.mentions_removed += text.mentions_removed;
        self.at_replaced += text.at_replaced;
    }
}
