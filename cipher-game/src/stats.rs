//! Summary figures shown under the mode cards.
use serde::{Deserialize, Serialize};

use crate::progress::{LevelTotals, Progress};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSummary {
    /// Puzzles solved across all tiers.
    pub total_completed: u32,
    /// Tiers with at least one solved puzzle.
    pub modes_started: u32,
    /// Share of all levels solved, rounded to a whole percent.
    pub completion_pct: u32,
}

#[must_use]
pub fn summarize(progress: &Progress, totals: &LevelTotals) -> ProgressSummary {
    let total_completed = progress.total();
    let modes_started = progress.iter().map(|(_, n)| u32::from(n > 0)).sum();
    let available = totals.sum();
    let completion_pct = if available == 0 {
        0
    } else {
        let scaled = u64::from(total_completed) * 100 + u64::from(available) / 2;
        u32::try_from(scaled / u64::from(available)).unwrap_or(100)
    };
    ProgressSummary {
        total_completed,
        modes_started,
        completion_pct,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_of_partial_progress() {
        let progress = Progress {
            easy: 7,
            medium: 2,
            hard: 0,
        };
        let summary = summarize(&progress, &LevelTotals::default());
        assert_eq!(summary.total_completed, 9);
        assert_eq!(summary.modes_started, 2);
        assert_eq!(summary.completion_pct, 30);
    }

    #[test]
    fn percent_rounds_half_up() {
        let progress = Progress {
            easy: 1,
            ..Progress::default()
        };
        // 1 of 8 = 12.5%
        let totals = LevelTotals {
            easy: 8,
            medium: 0,
            hard: 0,
        };
        let summary = summarize(&progress, &totals);
        assert_eq!(summary.completion_pct, 13);
    }

    #[test]
    fn empty_catalog_reports_zero() {
        let summary = summarize(&Progress::default(), &LevelTotals::uniform(0));
        assert_eq!(summary.completion_pct, 0);
        assert_eq!(summary.modes_started, 0);
    }
}
