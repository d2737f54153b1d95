/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionProgress {
    pub total: usize,
    pub answered: usize,
    pub remaining: usize,
    pub flagged: usize,
}

impl SessionProgress {
    /// True when every question in the session has a recorded answer.
    #[must_use]
    pub fn all_answered(&self) -> bool {
        self.remaining == 0
    }
}
