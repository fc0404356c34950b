use anyhow::{Result, ensure};
use cipher_game::constants::STATE_STORAGE_KEY;
use cipher_game::{Difficulty, MemoryStorage, Snapshot};

use crate::common::scenario::ScenarioEntry;
use crate::logic::{PlayStrategy, SimulationPlan, SimulationSummary};

const SCENARIOS: &[ScenarioEntry] = &[
    ScenarioEntry {
        key: "smoke",
        aliases: &[],
        name: "Smoke Test",
        build: smoke_plan,
    },
    ScenarioEntry {
        key: "full-clear",
        aliases: &["campaign"],
        name: "Full Campaign Clear",
        build: full_clear_plan,
    },
    ScenarioEntry {
        key: "replay-idempotence",
        aliases: &["replay"],
        name: "Replay Leaves Progress Unchanged",
        build: replay_plan,
    },
    ScenarioEntry {
        key: "unlock-gates",
        aliases: &["unlock"],
        name: "Unlock Gates Match Policy",
        build: unlock_plan,
    },
    ScenarioEntry {
        key: "hint-ledger",
        aliases: &["hints"],
        name: "Hint Ledger Persistence",
        build: hint_plan,
    },
    ScenarioEntry {
        key: "persistence-roundtrip",
        aliases: &["persistence"],
        name: "Persistence Round Trip",
        build: persistence_plan,
    },
    ScenarioEntry {
        key: "corrupt-record-recovery",
        aliases: &["corrupt"],
        name: "Corrupt Record Recovery",
        build: corrupt_record_plan,
    },
    ScenarioEntry {
        key: "partial-record-recovery",
        aliases: &["partial"],
        name: "Partial Record Recovery",
        build: partial_record_plan,
    },
    ScenarioEntry {
        key: "reset",
        aliases: &[],
        name: "Full Reset",
        build: reset_plan,
    },
    ScenarioEntry {
        key: "random-walk",
        aliases: &["walk"],
        name: "Random Walk Invariants",
        build: random_walk_plan,
    },
];

pub const fn catalog_scenarios() -> &'static [ScenarioEntry] {
    SCENARIOS
}

fn no_violations(summary: &SimulationSummary) -> Result<()> {
    ensure!(
        summary.violations.is_empty(),
        "invariant violations: {}",
        summary.violations.join("; ")
    );
    Ok(())
}

fn reload_matches(summary: &SimulationSummary) -> Result<()> {
    ensure!(
        summary.reloaded == summary.final_snapshot,
        "reloaded state differs from final state"
    );
    Ok(())
}

fn smoke_plan() -> SimulationPlan {
    SimulationPlan::new(PlayStrategy::Sequential)
        .with_max_actions(6)
        .with_expectation(no_violations)
        .with_expectation(|summary: &SimulationSummary| -> Result<()> {
            ensure!(summary.advanced_count() >= 1, "no level was completed");
            Ok(())
        })
}

fn full_clear_plan() -> SimulationPlan {
    SimulationPlan::new(PlayStrategy::Sequential)
        .with_max_actions(500)
        .with_expectation(no_violations)
        .with_expectation(|summary: &SimulationSummary| -> Result<()> {
            let total = summary.totals.sum();
            ensure!(
                summary.progress.total_completed == total,
                "cleared {} of {total} levels",
                summary.progress.total_completed
            );
            ensure!(summary.progress.completion_pct == 100, "completion below 100%");
            ensure!(summary.progress.modes_started == 3, "not every tier was played");
            Ok(())
        })
        .with_expectation(reload_matches)
}

fn replay_plan() -> SimulationPlan {
    SimulationPlan::new(PlayStrategy::Replayer)
        .with_max_actions(150)
        .with_expectation(no_violations)
        .with_expectation(|summary: &SimulationSummary| -> Result<()> {
            ensure!(summary.replay_count() > 0, "no level was replayed");
            let solved: u32 = Difficulty::ALL
                .iter()
                .map(|d| summary.final_snapshot.progress.get(*d))
                .sum();
            ensure!(
                usize::try_from(solved).unwrap_or(usize::MAX) == summary.advanced_count(),
                "progress {solved} does not match {} frontier clears",
                summary.advanced_count()
            );
            Ok(())
        })
}

fn unlock_plan() -> SimulationPlan {
    SimulationPlan::new(PlayStrategy::Wanderer)
        .with_max_actions(300)
        .with_expectation(no_violations)
        .with_expectation(|summary: &SimulationSummary| -> Result<()> {
            ensure!(
                summary.rejected_selections() > 0,
                "no locked selection was attempted"
            );
            Ok(())
        })
}

fn hint_plan() -> SimulationPlan {
    SimulationPlan::new(PlayStrategy::HintSeeker)
        .with_max_actions(120)
        .with_expectation(no_violations)
        .with_expectation(|summary: &SimulationSummary| -> Result<()> {
            let ledger = summary.reloaded.hints_used.len();
            ensure!(ledger > 0, "no hint was recorded");
            ensure!(
                ledger == summary.new_hints(),
                "ledger holds {ledger} hints, {} were revealed",
                summary.new_hints()
            );
            Ok(())
        })
}

fn persistence_plan() -> SimulationPlan {
    SimulationPlan::new(PlayStrategy::Wanderer)
        .with_max_actions(200)
        .with_expectation(no_violations)
        .with_expectation(reload_matches)
}

fn write_corrupt_record(storage: &MemoryStorage) {
    storage.insert_raw(STATE_STORAGE_KEY, "{\"progress\": {\"easy\": ");
}

fn corrupt_record_plan() -> SimulationPlan {
    SimulationPlan::new(PlayStrategy::Sequential)
        .with_max_actions(12)
        .with_setup(write_corrupt_record)
        .with_expectation(no_violations)
        .with_expectation(|summary: &SimulationSummary| -> Result<()> {
            ensure!(
                summary.initial == Snapshot::default(),
                "corrupt record was not replaced by defaults"
            );
            let stored = summary.stored_record.as_deref().unwrap_or_default();
            ensure!(
                serde_json::from_str::<serde_json::Value>(stored).is_ok(),
                "record was not rewritten as JSON"
            );
            Ok(())
        })
}

fn write_partial_record(storage: &MemoryStorage) {
    storage.insert_raw(
        STATE_STORAGE_KEY,
        r#"{"currentMode":"easy","currentLevel":4,"progress":{"easy":3,"medium":"x"},"isDarkMode":"no","extra":1}"#,
    );
}

fn partial_record_plan() -> SimulationPlan {
    SimulationPlan::new(PlayStrategy::Sequential)
        .with_max_actions(4)
        .with_setup(write_partial_record)
        .with_expectation(no_violations)
        .with_expectation(|summary: &SimulationSummary| -> Result<()> {
            let initial = &summary.initial;
            ensure!(initial.progress.easy == 3, "valid easy progress was lost");
            ensure!(initial.progress.medium == 0, "bad medium progress was kept");
            ensure!(initial.current_level == 4, "stored level was lost");
            ensure!(initial.is_dark_mode, "bad theme flag was kept");
            ensure!(
                summary.final_snapshot.progress.easy == 7,
                "play did not continue from the stored frontier"
            );
            Ok(())
        })
}

fn reset_plan() -> SimulationPlan {
    SimulationPlan::new(PlayStrategy::HintSeeker)
        .with_max_actions(25)
        .with_reset()
        .with_expectation(no_violations)
        .with_expectation(|summary: &SimulationSummary| -> Result<()> {
            ensure!(summary.stored_record.is_none(), "record survived reset");
            ensure!(
                summary.final_snapshot == Snapshot::default(),
                "session kept state after reset"
            );
            ensure!(
                summary.reloaded == Snapshot::default(),
                "reload after reset is not the default state"
            );
            Ok(())
        })
}

fn random_walk_plan() -> SimulationPlan {
    SimulationPlan::new(PlayStrategy::Wanderer)
        .with_max_actions(600)
        .with_expectation(no_violations)
}
