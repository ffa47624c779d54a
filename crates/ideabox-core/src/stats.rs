//! Per-status counts.

use serde::{Deserialize, Serialize};

use crate::suggestion::{Suggestion, SuggestionStatus};

/// Counts over one scan of the store. `all` always equals the sum of the
/// four per-status counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
  pub all:         usize,
  pub pending:     usize,
  pub reviewed:    usize,
  pub implemented: usize,
  pub rejected:    usize,
}

impl Stats {
  /// Tally a set of suggestions.
  pub fn tally<'a>(suggestions: impl IntoIterator<Item = &'a Suggestion>) -> Self {
    suggestions.into_iter().fold(Self::default(), |mut stats, s| {
      stats.record(s.status);
      stats
    })
  }

  /// Count one record with the given status.
  pub fn record(&mut self, status: SuggestionStatus) {
    self.all += 1;
    *self.count_mut(status) += 1;
  }

  pub fn count(&self, status: SuggestionStatus) -> usize {
    match status {
      SuggestionStatus::Pending => self.pending,
      SuggestionStatus::Reviewed => self.reviewed,
      SuggestionStatus::Implemented => self.implemented,
      SuggestionStatus::Rejected => self.rejected,
    }
  }

  fn count_mut(&mut self, status: SuggestionStatus) -> &mut usize {
    match status {
      SuggestionStatus::Pending => &mut self.pending,
      SuggestionStatus::Reviewed => &mut self.reviewed,
      SuggestionStatus::Implemented => &mut self.implemented,
      SuggestionStatus::Rejected => &mut self.rejected,
    }
  }
}
