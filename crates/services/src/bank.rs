use mcq_core::model::{Category, CategoryId, QuestionBank, QuestionSet, SetId};

use crate::error::BankLoadError;

/// Read-only facade over the static question bank.
///
/// The bank is loaded once at startup and treated as trusted, already
/// validated input. Lookups return `None` for unknown ids so callers can
/// render a "not found" state instead of handling errors.
#[derive(Debug, Clone)]
pub struct BankService {
    bank: QuestionBank,
}

impl BankService {
    #[must_use]
    pub fn new(bank: QuestionBank) -> Self {
        Self { bank }
    }

    /// Parses a bank from its JSON document.
    ///
    /// # Errors
    ///
    /// Returns `BankLoadError` if the document does not match the bank schema.
    pub fn from_json(raw: &str) -> Result<Self, BankLoadError> {
        let bank: QuestionBank = serde_json::from_str(raw)?;
        Ok(Self::new(bank))
    }

    #[must_use]
    pub fn categories(&self) -> &[Category] {
        self.bank.categories()
    }

    #[must_use]
    pub fn category(&self, id: &CategoryId) -> Option<&Category> {
        self.bank.category(id)
    }

    /// Resolves a set together with its owning category.
    #[must_use]
    pub fn find_set(
        &self,
        category_id: &CategoryId,
        set_id: &SetId,
    ) -> Option<(&Category, &QuestionSet)> {
        let category = self.bank.category(category_id)?;
        let set = category.set(set_id)?;
        Some((category, set))
    }
}
