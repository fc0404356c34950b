//! Screen-level controller shared by the wasm facade and native tests.
//!
//! [`AppController`] glues the session, the catalog, the screen navigator and
//! the per-puzzle [`Attempt`] together and renders everything a view needs into
//! an [`AppView`]. It never touches the DOM, so it runs against any
//! [`ProgressStorage`].

use cipher_game::{
    Attempt, Completion, Difficulty, Feedback, GameSession, Language, LevelStatus,
    ProgressStorage, ProgressSummary, PuzzleCatalog, PuzzleDefinition, Screen, ScreenFlow,
    SessionError, StoreError, format_elapsed, summarize,
};
use serde::Serialize;

use crate::i18n;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModeView {
    pub difficulty: Difficulty,
    pub title: &'static str,
    pub description: &'static str,
    pub unlocked: bool,
    pub completed: u32,
    pub total: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelView {
    pub level: u32,
    pub status: LevelStatus,
    pub label: &'static str,
    pub action: Option<&'static str>,
    pub selectable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PuzzleView {
    pub id: String,
    pub level: u32,
    pub total: u32,
    pub heading: String,
    pub classification: String,
    pub question: String,
    pub image: Option<String>,
    /// Present once the hint has been revealed in this attempt.
    pub hint: Option<String>,
    pub hint_available: bool,
    /// Present after a correct answer, when the puzzle has one.
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackView {
    pub kind: Feedback,
    pub message: &'static str,
}

/// Everything the renderer needs for the current screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppView {
    pub screen: Screen,
    pub language: Language,
    pub dark_mode: bool,
    pub summary: ProgressSummary,
    pub modes: Vec<ModeView>,
    pub difficulty: Option<Difficulty>,
    pub levels: Vec<LevelView>,
    pub puzzle: Option<PuzzleView>,
    pub mode_complete: bool,
    pub answer: String,
    pub can_submit: bool,
    pub submitting: bool,
    pub submit_label: String,
    pub feedback: Option<FeedbackView>,
}

/// Handle on one in-flight submission. It goes stale once the attempt that
/// issued it is replaced, and stale handles are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitTicket(u64);

pub struct AppController<S: ProgressStorage> {
    catalog: PuzzleCatalog,
    session: GameSession<S>,
    flow: ScreenFlow,
    attempt: Attempt,
    language: Language,
    started_ms: Option<u64>,
    generation: u64,
}

impl<S: ProgressStorage> AppController<S> {
    #[must_use]
    pub fn new(catalog: PuzzleCatalog, session: GameSession<S>, language: Language) -> Self {
        Self {
            catalog,
            session,
            flow: ScreenFlow::new(),
            attempt: Attempt::new(),
            language,
            started_ms: None,
            generation: 0,
        }
    }

    #[must_use]
    pub const fn session(&self) -> &GameSession<S> {
        &self.session
    }

    #[must_use]
    pub const fn attempt(&self) -> &Attempt {
        &self.attempt
    }

    #[must_use]
    pub const fn language(&self) -> Language {
        self.language
    }

    pub const fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    /// Switch to the other puzzle language and return it.
    pub const fn toggle_language(&mut self) -> Language {
        self.language = self.language.toggled();
        self.language
    }

    /// Start a fresh attempt; any pending submission of the old one is void.
    fn replace_attempt(&mut self) {
        self.attempt = Attempt::new();
        self.started_ms = None;
        self.generation = self.generation.wrapping_add(1);
    }

    fn ticket_is_current(&self, ticket: SubmitTicket) -> bool {
        ticket == SubmitTicket(self.generation)
    }

    /// The screen to show, falling back to mode selection when a
    /// tier-dependent screen has no tier.
    #[must_use]
    pub const fn screen(&self) -> Screen {
        self.flow.resolve(self.session.current_difficulty())
    }

    #[must_use]
    pub fn current_puzzle(&self) -> Option<&PuzzleDefinition> {
        self.session.current_puzzle(&self.catalog)
    }

    pub const fn enter(&mut self) -> Screen {
        self.flow.enter()
    }

    /// Step back one screen. Leaving the game screen abandons the attempt.
    pub fn back(&mut self) -> Screen {
        if self.screen() == Screen::Game {
            self.replace_attempt();
        }
        self.flow.back()
    }

    /// # Errors
    ///
    /// Returns [`SessionError::DifficultyLocked`] for a locked tier or a store
    /// error if the record cannot be written.
    pub fn select_difficulty(&mut self, difficulty: Difficulty) -> Result<Screen, SessionError> {
        self.session.try_select_difficulty(difficulty)?;
        self.replace_attempt();
        Ok(self.flow.choose_mode())
    }

    /// # Errors
    ///
    /// Returns a [`SessionError`] for a locked or nonexistent level.
    pub fn select_level(&mut self, level: u32) -> Result<Screen, SessionError> {
        self.session.try_select_level(level)?;
        self.replace_attempt();
        Ok(self.flow.choose_level())
    }

    /// Start timing the open puzzle at `now_ms`.
    pub const fn start_clock(&mut self, now_ms: u64) {
        self.started_ms = Some(now_ms);
    }

    /// Time spent on the open puzzle as `m:ss`, or `None` off the game screen.
    #[must_use]
    pub fn elapsed_label(&self, now_ms: u64) -> Option<String> {
        if self.screen() != Screen::Game {
            return None;
        }
        self.started_ms
            .map(|started| format_elapsed(now_ms.saturating_sub(started)))
    }

    pub fn set_answer(&mut self, input: &str) {
        self.attempt.set_input(input);
    }

    pub fn clear_answer(&mut self) {
        self.attempt.clear_input();
    }

    /// Claim the busy flag for a submission of the current answer.
    /// `None` when the submission is refused.
    pub fn begin_submit(&mut self) -> Option<SubmitTicket> {
        (self.current_puzzle().is_some() && self.attempt.begin_submit())
            .then_some(SubmitTicket(self.generation))
    }

    /// Evaluate the held answer. `None` if the ticket is stale or there is no
    /// puzzle to answer.
    pub fn finish_submit(&mut self, ticket: SubmitTicket) -> Option<Feedback> {
        if !self.ticket_is_current(ticket) {
            log::debug!("dropping result of an abandoned submission");
            return None;
        }
        let canonical = self.current_puzzle()?.answer.clone();
        let feedback = self.attempt.finish_submit(&canonical)?;
        log::debug!("answer judged {feedback:?}");
        Some(feedback)
    }

    /// Give the busy flag back when a submission cannot complete.
    pub fn abort_submit(&mut self, ticket: SubmitTicket) {
        if self.ticket_is_current(ticket) {
            self.attempt.abort_submit();
        }
    }

    /// Drop an incorrect-answer message once its display window ends.
    pub fn clear_feedback(&mut self, ticket: SubmitTicket) {
        if self.ticket_is_current(ticket) {
            self.attempt.clear_feedback();
        }
    }

    /// Record the solved level and return to the level grid.
    ///
    /// Does nothing unless `ticket` judged the current attempt correct.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be written; the level still
    /// counts as completed in memory.
    pub fn advance(&mut self, ticket: SubmitTicket) -> Result<Option<Completion>, StoreError> {
        if !self.ticket_is_current(ticket) || !self.attempt.solved() {
            return Ok(None);
        }
        self.replace_attempt();
        self.flow.level_completed();
        self.session.complete_current_level().map(Some)
    }

    /// Reveal the hint for the current puzzle and record it in the ledger.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be written.
    pub fn reveal_hint(&mut self) -> Result<bool, StoreError> {
        let Some(id) = self.current_puzzle().map(|puzzle| puzzle.id.clone()) else {
            return Ok(false);
        };
        if self.session.hint_used(&id) && !self.attempt.hint_shown {
            return Ok(false);
        }
        if !self.attempt.reveal_hint() {
            return Ok(false);
        }
        self.session.record_hint_used(&id)
    }

    /// # Errors
    ///
    /// Returns an error if the record cannot be written.
    pub fn toggle_theme(&mut self) -> Result<bool, StoreError> {
        self.session.toggle_display_mode()
    }

    /// Wipe progress and return to the landing screen.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored record cannot be removed.
    pub fn reset(&mut self) -> Result<(), StoreError> {
        self.flow = ScreenFlow::new();
        self.replace_attempt();
        self.session.reset_all()
    }

    #[must_use]
    pub fn view(&self) -> AppView {
        let progress = self.session.progress();
        let totals = self.session.level_totals();
        let modes = Difficulty::ALL
            .iter()
            .map(|&difficulty| ModeView {
                difficulty,
                title: difficulty.title(),
                description: difficulty.description(),
                unlocked: self.session.difficulty_unlocked(difficulty),
                completed: progress.get(difficulty),
                total: totals.get(difficulty),
            })
            .collect();

        let difficulty = self.session.current_difficulty();
        let levels = difficulty
            .map(|difficulty| {
                (1..=totals.get(difficulty))
                    .map(|level| {
                        let status = self.session.level_status(difficulty, level);
                        LevelView {
                            level,
                            status,
                            label: status.label(),
                            action: status.action(),
                            selectable: status.is_selectable(),
                        }
                    })
                    .collect()
            })
            .unwrap_or_default();

        let submit_label = if self.attempt.submitting {
            i18n::t("analyzing", self.language)
        } else {
            i18n::t("submit", self.language)
        };

        AppView {
            screen: self.screen(),
            language: self.language,
            dark_mode: self.session.dark_mode(),
            summary: summarize(progress, &totals),
            modes,
            difficulty,
            levels,
            puzzle: self.puzzle_view(),
            mode_complete: self.session.mode_complete(),
            answer: self.attempt.input.clone(),
            can_submit: self.attempt.can_submit(),
            submitting: self.attempt.submitting,
            submit_label,
            feedback: self.attempt.feedback.map(|kind| FeedbackView {
                kind,
                message: kind.message(self.language),
            }),
        }
    }

    fn puzzle_view(&self) -> Option<PuzzleView> {
        let difficulty = self.session.current_difficulty()?;
        let puzzle = self.current_puzzle()?;
        let language = self.language;
        let level = self.session.current_level();
        Some(PuzzleView {
            id: puzzle.id.clone(),
            level,
            total: self.session.level_totals().get(difficulty),
            heading: format!(
                "{} • {} {level}",
                difficulty.title(),
                i18n::t("level", language)
            ),
            classification: puzzle.classification(),
            question: puzzle.question(language).to_string(),
            image: puzzle.image.clone(),
            hint: self
                .attempt
                .hint_shown
                .then(|| puzzle.hint(language).to_string()),
            hint_available: !self.attempt.hint_shown && !self.session.hint_used(&puzzle.id),
            explanation: self
                .attempt
                .solved()
                .then(|| puzzle.explanation(language).map(str::to_string))
                .flatten(),
        })
    }
}
