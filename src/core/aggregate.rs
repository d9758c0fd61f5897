use crate::core::{BulkResult, TokenOutcome};

#[derive(Debug, Clone, Default)]
pub struct BulkResultBuilder {
    success_count: usize,
    failure_count: usize,
    outcomes: Vec<TokenOutcome>,
}

impl BulkResultBuilder {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            success_count: 0,
            failure_count: 0,
            outcomes: Vec::with_capacity(capacity),
        }
    }

    pub fn extend(&mut self, batch: impl IntoIterator<Item = TokenOutcome>) {
        for outcome in batch {
            if outcome.success {
                self.success_count += 1;
            } else {
                self.failure_count += 1;
            }
            self.outcomes.push(outcome);
        }
    }

    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn success_count(&self) -> usize {
        self.success_count
    }

    pub fn failure_count(&self) -> usize {
        self.failure_count
    }

    pub fn snapshot(&self) -> BulkResult {
        self.clone().finish()
    }

    pub fn finish(self) -> BulkResult {
        BulkResult {
            total: self.outcomes.len(),
            success_count: self.success_count,
            failure_count: self.failure_count,
            outcomes: self.outcomes,
        }
    }
}
