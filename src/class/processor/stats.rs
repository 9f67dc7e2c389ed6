use serde::{Serialize, Deserialize};

/// Rule that removed a candidate during discovery
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscardReason {
    Interface,
    Abstract,
    Nested,
    OutsidePackage,
    NotAssignable,
}

/// Per-rule counts for a single discovery call
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterStats {
    /// Candidates returned by the scanner
    pub candidates: usize,

    /// Candidates that passed every rule
    pub accepted: usize,

    pub interfaces: usize,
    pub abstracts: usize,
    pub nested: usize,
    pub outside_package: usize,
    pub not_assignable: usize,
}

impl FilterStats {
    /// Count a discarded candidate
    pub fn record(&mut self, reason: DiscardReason) {
        match reason {
            DiscardReason::Interface => self.interfaces += 1,
            DiscardReason::Abstract => self.abstracts += 1,
            DiscardReason::Nested => self.nested += 1,
            DiscardReason::OutsidePackage => self.outside_package += 1,
            DiscardReason::NotAssignable => self.not_assignable += 1,
        }
    }

    /// Total number of discarded candidates
    pub fn discarded(&self) -> usize {
        self.interfaces + self.abstracts + self.nested + self.outside_package + self.not_assignable
    }
}
