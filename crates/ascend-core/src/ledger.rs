//! The score ledger: a monotonically non-decreasing counter.
//!
//! Only two operations mutate the score, a click increment and a yield
//! increment. Both add; nothing subtracts. Addition saturates at
//! `u64::MAX` rather than wrapping, so the score can never go down.

/// Holds the current score and counts how it was earned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreLedger {
    score: u64,
    clicks: u64,
    clicked_total: u64,
    yielded_total: u64,
}

impl ScoreLedger {
    /// An empty ledger.
    pub const fn new() -> Self {
        Self::with_score(0)
    }

    /// A ledger opening at `score`.
    pub const fn with_score(score: u64) -> Self {
        Self {
            score,
            clicks: 0,
            clicked_total: 0,
            yielded_total: 0,
        }
    }

    /// Credit one click worth `increment`. Returns the new score.
    pub const fn apply_click(&mut self, increment: u64) -> u64 {
        self.clicks = self.clicks.saturating_add(1);
        self.clicked_total = self.clicked_total.saturating_add(increment);
        self.score = self.score.saturating_add(increment);
        self.score
    }

    /// Credit passive yield. Returns the new score.
    pub const fn apply_yield(&mut self, amount: u64) -> u64 {
        self.yielded_total = self.yielded_total.saturating_add(amount);
        self.score = self.score.saturating_add(amount);
        self.score
    }

    /// Current score.
    pub const fn score(&self) -> u64 {
        self.score
    }

    /// Number of clicks credited this session.
    pub const fn clicks(&self) -> u64 {
        self.clicks
    }

    /// Points earned from clicks this session.
    pub const fn clicked_total(&self) -> u64 {
        self.clicked_total
    }

    /// Points earned from passive yield this session.
    pub const fn yielded_total(&self) -> u64 {
        self.yielded_total
    }
}
