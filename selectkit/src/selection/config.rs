//! Selection list configuration

/// Configuration for a [`SelectionTrackingList`](super::SelectionTrackingList).
///
/// # Example
///
/// ```
/// use selectkit::selection::SelectionConfig;
///
/// let config = SelectionConfig::default().with_maintain_order(true);
/// assert!(config.maintain_order);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionConfig {
    /// Keep selected values in list order instead of selection order.
    ///
    /// Default: false (append order)
    pub maintain_order: bool,
}

impl SelectionConfig {
    /// Creates a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether selected values follow list order.
    pub fn with_maintain_order(mut self, maintain_order: bool) -> Self {
        self.maintain_order = maintain_order;
        self
    }

    /// Creates a config that keeps selected values in list order.
    pub fn positional() -> Self {
        Self {
            maintain_order: true,
        }
    }
}
