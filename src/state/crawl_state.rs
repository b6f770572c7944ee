/// Crawl lifecycle states for the orchestration loop
///
/// The loop starts in `Running`, moves to one of the two stop reasons at a
/// round boundary, and always finishes in `Done`.
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlState {
    /// Rounds are being processed
    Running,

    /// The frontier ran out of URLs
    Drained,

    /// The visited set reached the page budget
    BudgetReached,

    /// Terminal state; the result is ready to be written
    Done,
}

impl CrawlState {
    /// Checks whether moving to `next` is a legal step
    ///
    /// `Running` may repeat (one self-transition per round). Both stop
    /// reasons lead only to `Done`.
    pub fn can_transition_to(&self, next: CrawlState) -> bool {
        matches!(
            (self, next),
            (Self::Running, Self::Running)
                | (Self::Running, Self::Drained)
                | (Self::Running, Self::BudgetReached)
                | (Self::Drained, Self::Done)
                | (Self::BudgetReached, Self::Done)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Drained => "drained",
            Self::BudgetReached => "budget_reached",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for CrawlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
