use anyhow::Result;
use cipher_game::constants::STATE_STORAGE_KEY;
use cipher_game::{
    Attempt, Completion, Difficulty, Feedback, GameSession, LevelTotals, LocalizedText,
    MemoryStorage, ProgressStore, ProgressSummary, PuzzleCatalog, PuzzleDefinition, Snapshot,
    difficulty_unlocked, level_unlocked, summarize,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

/// Answer that never matches a catalog answer.
const WRONG_ANSWER: &str = "not-the-answer";

#[derive(Debug, Clone)]
pub struct TesterAssets {
    catalog: PuzzleCatalog,
}

impl TesterAssets {
    pub fn load_default() -> Self {
        Self::from_catalog(
            Self::load_catalog_from_assets().unwrap_or_else(Self::fallback_catalog),
        )
    }

    pub const fn from_catalog(catalog: PuzzleCatalog) -> Self {
        Self { catalog }
    }

    pub const fn catalog(&self) -> &PuzzleCatalog {
        &self.catalog
    }

    fn assets_data_root() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("cipher-web")
            .join("static")
            .join("assets")
            .join("data")
    }

    fn load_catalog_from_assets() -> Option<PuzzleCatalog> {
        let json = fs::read_to_string(Self::assets_data_root().join("puzzles.json")).ok()?;
        match PuzzleCatalog::from_json(&json) {
            Ok(catalog) if !catalog.is_empty() => Some(catalog),
            Ok(_) => None,
            Err(err) => {
                eprintln!("⚠️ Failed to parse puzzles.json: {err}");
                None
            }
        }
    }

    fn fallback_catalog() -> PuzzleCatalog {
        Difficulty::ALL
            .into_iter()
            .fold(PuzzleCatalog::empty(), |catalog, difficulty| {
                let puzzles = (1..=10)
                    .map(|level| PuzzleDefinition {
                        id: format!("{difficulty}-{level}"),
                        question: LocalizedText::new(format!("{difficulty} drill {level}")),
                        image: None,
                        kind: "drill".to_string(),
                        answer: level.to_string(),
                        hint: LocalizedText::new("The answer is the level number."),
                        explanation: None,
                    })
                    .collect();
                catalog.with_puzzles(difficulty, puzzles)
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlayStrategy {
    /// Clear every tier in order, always answering correctly.
    Sequential,
    /// Mix frontier clears with replays of finished levels.
    Replayer,
    /// Reveal every hint and sometimes answer wrong first.
    HintSeeker,
    /// Random guarded actions, reloads and the occasional reset.
    Wanderer,
}

impl PlayStrategy {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Sequential => "sequential",
            Self::Replayer => "replayer",
            Self::HintSeeker => "hint-seeker",
            Self::Wanderer => "wanderer",
        }
    }
}

/// One step taken by a simulated player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum Action {
    SelectDifficulty {
        difficulty: Difficulty,
        accepted: bool,
    },
    SelectLevel {
        level: u32,
        accepted: bool,
    },
    Answer {
        level: u32,
        correct: bool,
        completion: Option<Completion>,
    },
    RevealHint {
        newly: bool,
    },
    ToggleTheme,
    Reload,
    Reset,
}

#[derive(Debug, Clone)]
pub struct SimulationPlan {
    pub strategy: PlayStrategy,
    pub max_actions: usize,
    pub setup: Option<fn(&MemoryStorage)>,
    pub finish_with_reset: bool,
    pub expectations: Vec<SimulationExpectation>,
}

impl SimulationPlan {
    #[must_use]
    pub const fn new(strategy: PlayStrategy) -> Self {
        Self {
            strategy,
            max_actions: 100,
            setup: None,
            finish_with_reset: false,
            expectations: Vec::new(),
        }
    }

    #[must_use]
    pub const fn with_max_actions(mut self, max_actions: usize) -> Self {
        self.max_actions = max_actions;
        self
    }

    /// Prepare the storage before the session opens.
    #[must_use]
    pub const fn with_setup(mut self, setup: fn(&MemoryStorage)) -> Self {
        self.setup = Some(setup);
        self
    }

    #[must_use]
    pub const fn with_reset(mut self) -> Self {
        self.finish_with_reset = true;
        self
    }

    #[must_use]
    pub fn with_expectation(mut self, expectation: impl Into<SimulationExpectation>) -> Self {
        self.expectations.push(expectation.into());
        self
    }
}

/// Assertion hook run after a simulation completes.
type SimulationExpectationFn =
    Arc<dyn Fn(&SimulationSummary) -> Result<()> + Send + Sync + 'static>;

#[derive(Clone)]
pub struct SimulationExpectation(SimulationExpectationFn);

impl std::fmt::Debug for SimulationExpectation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulationExpectation").finish()
    }
}

impl SimulationExpectation {
    pub fn evaluate(&self, summary: &SimulationSummary) -> Result<()> {
        (self.0)(summary)
    }
}

impl<F> From<F> for SimulationExpectation
where
    F: Fn(&SimulationSummary) -> Result<()> + Send + Sync + 'static,
{
    fn from(f: F) -> Self {
        Self(Arc::new(f))
    }
}

#[derive(Debug, Clone)]
pub struct SimulationSummary {
    pub seed: u64,
    pub strategy: PlayStrategy,
    pub actions: Vec<Action>,
    /// State right after the session opened.
    pub initial: Snapshot,
    pub final_snapshot: Snapshot,
    /// What a fresh session reads back from storage after the run.
    pub reloaded: Snapshot,
    pub stored_record: Option<String>,
    pub totals: LevelTotals,
    pub progress: ProgressSummary,
    pub violations: Vec<String>,
}

impl SimulationSummary {
    pub fn advanced_count(&self) -> usize {
        self.actions
            .iter()
            .filter(|action| {
                matches!(action, Action::Answer { completion: Some(c), .. } if c.advanced())
            })
            .count()
    }

    pub fn replay_count(&self) -> usize {
        self.actions
            .iter()
            .filter(|action| {
                matches!(
                    action,
                    Action::Answer {
                        completion: Some(Completion::Replayed),
                        ..
                    }
                )
            })
            .count()
    }

    pub fn rejected_selections(&self) -> usize {
        self.actions
            .iter()
            .filter(|action| {
                matches!(
                    action,
                    Action::SelectDifficulty {
                        accepted: false,
                        ..
                    } | Action::SelectLevel {
                        accepted: false,
                        ..
                    }
                )
            })
            .count()
    }

    pub fn new_hints(&self) -> usize {
        self.actions
            .iter()
            .filter(|action| matches!(action, Action::RevealHint { newly: true }))
            .count()
    }

    /// The last few actions, for failure messages.
    pub fn recent_actions(&self, count: usize) -> String {
        if self.actions.is_empty() {
            return "no actions recorded".to_string();
        }
        self.actions
            .iter()
            .rev()
            .take(count)
            .map(|action| format!("{action:?}"))
            .collect::<Vec<_>>()
            .join(" <- ")
    }
}

#[derive(Debug, Clone)]
pub struct GameTester {
    verbose: bool,
    assets: Arc<TesterAssets>,
}

impl GameTester {
    pub const fn new(assets: Arc<TesterAssets>, verbose: bool) -> Self {
        Self { verbose, assets }
    }

    pub fn try_new(verbose: bool) -> Self {
        Self::new(Arc::new(TesterAssets::load_default()), verbose)
    }

    pub const fn verbose(&self) -> bool {
        self.verbose
    }

    pub fn catalog(&self) -> &PuzzleCatalog {
        self.assets.catalog()
    }

    pub fn run_plan(&self, plan: &SimulationPlan, seed: u64) -> SimulationSummary {
        let storage = MemoryStorage::new();
        if let Some(setup) = plan.setup {
            setup(&storage);
        }

        let mut run = PlayRun::new(self.catalog(), storage, seed);
        let initial = run.session.snapshot();
        for _ in 0..plan.max_actions {
            let acted = match plan.strategy {
                PlayStrategy::Sequential => run.sequential_step(),
                PlayStrategy::Replayer => run.replayer_step(),
                PlayStrategy::HintSeeker => run.hint_seeker_step(),
                PlayStrategy::Wanderer => run.wanderer_step(),
            };
            if !acted {
                break;
            }
        }
        if plan.finish_with_reset {
            run.reset();
        }
        if self.verbose {
            log::debug!(
                "seed {seed}: {} actions, {} violations",
                run.actions.len(),
                run.violations.len()
            );
        }
        run.finish(seed, plan.strategy, initial)
    }
}

struct PlayRun<'a> {
    catalog: &'a PuzzleCatalog,
    totals: LevelTotals,
    storage: MemoryStorage,
    session: GameSession<MemoryStorage>,
    attempt: Attempt,
    rng: ChaCha20Rng,
    actions: Vec<Action>,
    violations: Vec<String>,
}

impl<'a> PlayRun<'a> {
    fn new(catalog: &'a PuzzleCatalog, storage: MemoryStorage, seed: u64) -> Self {
        let totals = catalog.level_totals();
        let session = open_session(&storage, totals);
        Self {
            catalog,
            totals,
            storage,
            session,
            attempt: Attempt::new(),
            rng: ChaCha20Rng::seed_from_u64(seed),
            actions: Vec::new(),
            violations: Vec::new(),
        }
    }

    fn finish(self, seed: u64, strategy: PlayStrategy, initial: Snapshot) -> SimulationSummary {
        let final_snapshot = self.session.snapshot();
        let reloaded = store_for(&self.storage, self.totals).load();
        SimulationSummary {
            seed,
            strategy,
            actions: self.actions,
            initial,
            progress: summarize(&final_snapshot.progress, &self.totals),
            final_snapshot,
            reloaded,
            stored_record: self.storage.raw(STATE_STORAGE_KEY),
            totals: self.totals,
            violations: self.violations,
        }
    }

    fn sequential_step(&mut self) -> bool {
        if self.needs_tier() {
            return self.select_next_tier();
        }
        self.answer(true);
        true
    }

    fn replayer_step(&mut self) -> bool {
        if self.needs_tier() {
            return self.select_next_tier();
        }
        let Some(difficulty) = self.session.current_difficulty() else {
            return false;
        };
        let completed = self.session.progress().get(difficulty);
        let level = if completed > 0 && self.rng.gen_bool(0.4) {
            self.rng.gen_range(1..=completed)
        } else {
            completed + 1
        };
        self.select_level(level);
        self.answer(true);
        true
    }

    fn hint_seeker_step(&mut self) -> bool {
        if self.needs_tier() {
            return self.select_next_tier();
        }
        if !self.attempt.hint_shown {
            self.reveal_hint();
        }
        let correct = !self.rng.gen_bool(0.3);
        self.answer(correct);
        true
    }

    fn wanderer_step(&mut self) -> bool {
        let roll = self.rng.gen_range(0..100);
        match roll {
            0..15 => {
                let difficulty = Difficulty::ALL[self.rng.gen_range(0..Difficulty::ALL.len())];
                self.select_difficulty(difficulty);
            }
            15..35 => {
                let level = self.rng.gen_range(0..=self.totals.get(Difficulty::Easy) + 2);
                self.select_level(level);
            }
            35..70 => self.answer(true),
            70..80 => self.answer(false),
            80..88 => self.reveal_hint(),
            88..93 => self.toggle_theme(),
            93..98 => self.reload(),
            _ => self.reset(),
        }
        true
    }

    /// No tier selected, or the selected one is finished.
    fn needs_tier(&self) -> bool {
        self.session.current_difficulty().is_none() || self.session.mode_complete()
    }

    fn select_next_tier(&mut self) -> bool {
        let progress = *self.session.progress();
        let next = Difficulty::ALL.into_iter().find(|&difficulty| {
            progress.get(difficulty) < self.totals.get(difficulty)
                && difficulty_unlocked(&progress, difficulty)
        });
        match next {
            Some(difficulty) => {
                self.select_difficulty(difficulty);
                true
            }
            None => false,
        }
    }

    fn select_difficulty(&mut self, difficulty: Difficulty) {
        let expected = difficulty_unlocked(self.session.progress(), difficulty);
        let accepted = self.session.try_select_difficulty(difficulty).is_ok();
        if accepted != expected {
            self.violations.push(format!(
                "{difficulty} selection accepted={accepted}, unlock policy says {expected}"
            ));
        }
        if accepted {
            self.attempt = Attempt::new();
        }
        self.record(Action::SelectDifficulty {
            difficulty,
            accepted,
        });
    }

    fn select_level(&mut self, level: u32) {
        let expected = self.session.current_difficulty().is_some_and(|difficulty| {
            level <= self.totals.get(difficulty)
                && level_unlocked(self.session.progress(), difficulty, level)
        });
        let accepted = self.session.try_select_level(level).is_ok();
        if accepted != expected {
            self.violations.push(format!(
                "level {level} selection accepted={accepted}, unlock policy says {expected}"
            ));
        }
        if accepted {
            self.attempt = Attempt::new();
        }
        self.record(Action::SelectLevel { level, accepted });
    }

    fn answer(&mut self, correct: bool) {
        let Some(difficulty) = self.session.current_difficulty() else {
            return;
        };
        let Some(canonical) = self
            .session
            .current_puzzle(self.catalog)
            .map(|puzzle| puzzle.answer.clone())
        else {
            return;
        };
        let level = self.session.current_level();
        let before = self.session.progress().get(difficulty);

        let typed = if correct {
            format!("  {}  ", canonical.to_uppercase())
        } else {
            WRONG_ANSWER.to_string()
        };
        if self.attempt.solved() {
            self.attempt = Attempt::new();
        }
        self.attempt.set_input(typed);
        if !self.attempt.begin_submit() {
            self.violations
                .push(format!("submission refused at level {level} of {difficulty}"));
            return;
        }
        let Some(feedback) = self.attempt.finish_submit(&canonical) else {
            self.violations
                .push(format!("accepted submission was not judged at level {level} of {difficulty}"));
            return;
        };
        if (feedback == Feedback::Correct) != correct {
            self.violations.push(format!(
                "answer judged {feedback:?} for level {level} of {difficulty}"
            ));
        }

        let completion = if feedback == Feedback::Correct {
            match self.session.complete_current_level() {
                Ok(completion) => Some(completion),
                Err(err) => {
                    self.violations.push(format!("completion failed: {err}"));
                    None
                }
            }
        } else {
            None
        };

        if let Some(completion) = completion {
            self.check_completion(difficulty, level, before, completion);
            self.attempt = Attempt::new();
        }
        self.record(Action::Answer {
            level,
            correct,
            completion,
        });
    }

    fn check_completion(
        &mut self,
        difficulty: Difficulty,
        level: u32,
        before: u32,
        completion: Completion,
    ) {
        let after = self.session.progress().get(difficulty);
        let total = self.totals.get(difficulty);
        let ok = match completion {
            Completion::Replayed => level <= before && after == before,
            Completion::Advanced { completed, .. } => {
                level == before + 1 && after == before + 1 && completed == after
            }
            Completion::Saturated => before >= total && after == before,
            Completion::NoDifficulty => false,
        };
        if !ok {
            self.violations.push(format!(
                "level {level} of {difficulty} gave {completion:?} with progress {before} -> {after}"
            ));
        }
    }

    fn reveal_hint(&mut self) {
        let Some(id) = self
            .session
            .current_puzzle(self.catalog)
            .map(|puzzle| puzzle.id.clone())
        else {
            return;
        };
        let mut newly = false;
        if self.attempt.reveal_hint() {
            match self.session.record_hint_used(&id) {
                Ok(first) => newly = first,
                Err(err) => self.violations.push(format!("hint not recorded: {err}")),
            }
        }
        if !self.session.hint_used(&id) {
            self.violations.push(format!("hint for {id} missing from ledger"));
        }
        self.record(Action::RevealHint { newly });
    }

    fn toggle_theme(&mut self) {
        let before = self.session.dark_mode();
        match self.session.toggle_display_mode() {
            Ok(after) if after == before => {
                self.violations.push("theme toggle did not flip".to_string());
            }
            Ok(_) => {}
            Err(err) => self.violations.push(format!("theme not saved: {err}")),
        }
        self.record(Action::ToggleTheme);
    }

    fn reload(&mut self) {
        let before = self.session.snapshot();
        self.session = open_session(&self.storage, self.totals);
        self.attempt = Attempt::new();
        let after = self.session.snapshot();
        if after != before {
            self.violations
                .push(format!("reload changed state: {before:?} -> {after:?}"));
        }
        self.record(Action::Reload);
    }

    fn reset(&mut self) {
        if let Err(err) = self.session.reset_all() {
            self.violations.push(format!("reset failed: {err}"));
        }
        self.attempt = Attempt::new();
        if self.storage.raw(STATE_STORAGE_KEY).is_some() {
            self.violations
                .push("record still stored after reset".to_string());
        }
        self.record(Action::Reset);
    }

    fn record(&mut self, action: Action) {
        let hints_before = self.actions_hint_floor();
        self.actions.push(action);
        self.check_invariants(action, hints_before);
    }

    /// Ledger size the run has already observed; only a reset may shrink it.
    fn actions_hint_floor(&self) -> usize {
        self.actions
            .iter()
            .rev()
            .take_while(|action| !matches!(action, Action::Reset))
            .filter(|action| matches!(action, Action::RevealHint { newly: true }))
            .count()
    }

    fn check_invariants(&mut self, action: Action, hints_before: usize) {
        let progress = *self.session.progress();
        for difficulty in Difficulty::ALL {
            if progress.get(difficulty) > self.totals.get(difficulty) {
                self.violations.push(format!(
                    "{difficulty} progress {} exceeds {} after {action:?}",
                    progress.get(difficulty),
                    self.totals.get(difficulty)
                ));
            }
        }

        if let Some(difficulty) = self.session.current_difficulty() {
            let level = self.session.current_level();
            if level == 0 || level > progress.get(difficulty) + 1 {
                self.violations.push(format!(
                    "level {level} of {difficulty} is past the frontier after {action:?}"
                ));
            }
        }

        if !matches!(action, Action::Reset) && self.session.hints().len() < hints_before {
            self.violations
                .push(format!("hint ledger shrank after {action:?}"));
        }

        let stored = store_for(&self.storage, self.totals).load();
        if stored != self.session.snapshot() {
            self.violations
                .push(format!("stored record out of sync after {action:?}"));
        }
    }
}

fn store_for(storage: &MemoryStorage, totals: LevelTotals) -> ProgressStore<MemoryStorage> {
    ProgressStore::new(storage.clone()).with_level_totals(totals)
}

fn open_session(storage: &MemoryStorage, totals: LevelTotals) -> GameSession<MemoryStorage> {
    GameSession::open(store_for(storage, totals))
}
