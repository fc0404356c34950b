//! Transient state of one puzzle attempt: typed answer, busy flag, feedback
//! and hint visibility. Timers live in the platform layer; this module only
//! decides what each step is allowed to do.
use serde::{Deserialize, Serialize};

use crate::evaluator::{evaluate, is_blank};
use crate::language::Language;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Feedback {
    Correct,
    Incorrect,
}

impl Feedback {
    #[must_use]
    pub const fn message(self, language: Language) -> &'static str {
        match (self, language) {
            (Self::Correct, Language::En) => "Correct! Well done, Agent.",
            (Self::Correct, Language::Hi) => "Sahi hai! Shabash, Agent.",
            (Self::Incorrect, Language::En) => "Incorrect. Analyze further.",
            (Self::Incorrect, Language::Hi) => "Galat hai. Aur socho.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Attempt {
    pub input: String,
    pub feedback: Option<Feedback>,
    pub hint_shown: bool,
    pub submitting: bool,
}

impl Attempt {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_input(&mut self, input: impl Into<String>) {
        self.input = input.into();
    }

    pub fn clear_input(&mut self) {
        self.input.clear();
    }

    #[must_use]
    pub const fn solved(&self) -> bool {
        matches!(self.feedback, Some(Feedback::Correct))
    }

    /// Whether the submit control is enabled.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        !is_blank(&self.input) && !self.submitting && !self.solved()
    }

    /// Claim the busy flag. Returns `false` when the submission is refused.
    pub fn begin_submit(&mut self) -> bool {
        if !self.can_submit() {
            return false;
        }
        self.submitting = true;
        true
    }

    /// Evaluate the held answer and release the busy flag.
    ///
    /// Returns `None` when no submission is in flight.
    pub fn finish_submit(&mut self, canonical: &str) -> Option<Feedback> {
        if !self.submitting {
            return None;
        }
        let feedback = if evaluate(&self.input, canonical) {
            Feedback::Correct
        } else {
            Feedback::Incorrect
        };
        self.feedback = Some(feedback);
        self.submitting = false;
        Some(feedback)
    }

    /// Release the busy flag without judging the answer.
    pub fn abort_submit(&mut self) {
        self.submitting = false;
    }

    /// Drop an incorrect-answer message. A correct result stays.
    pub fn clear_feedback(&mut self) {
        if matches!(self.feedback, Some(Feedback::Incorrect)) {
            self.feedback = None;
        }
    }

    /// Show the hint. Returns `true` the first time.
    pub fn reveal_hint(&mut self) -> bool {
        !std::mem::replace(&mut self.hint_shown, true)
    }
}

/// Format elapsed milliseconds as `m:ss`.
#[must_use]
pub fn format_elapsed(elapsed_ms: u64) -> String {
    let seconds = elapsed_ms / 1_000;
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_answers_cannot_be_submitted() {
        let mut attempt = Attempt::new();
        attempt.set_input("   ");
        assert!(!attempt.begin_submit());
        assert!(!attempt.submitting);
    }

    #[test]
    fn busy_flag_rejects_reentrant_submit() {
        let mut attempt = Attempt::new();
        attempt.set_input("paris");
        assert!(attempt.begin_submit());
        assert!(!attempt.begin_submit());
        assert_eq!(attempt.finish_submit("Paris"), Some(Feedback::Correct));
        assert!(!attempt.submitting);
        assert!(!attempt.begin_submit(), "solved attempts stay closed");
    }

    #[test]
    fn incorrect_feedback_clears_but_correct_stays() {
        let mut attempt = Attempt::new();
        attempt.set_input("lyon");
        attempt.begin_submit();
        assert_eq!(attempt.finish_submit("paris"), Some(Feedback::Incorrect));
        attempt.clear_feedback();
        assert_eq!(attempt.feedback, None);
        assert!(attempt.can_submit());

        attempt.set_input("paris");
        attempt.begin_submit();
        attempt.finish_submit("paris");
        attempt.clear_feedback();
        assert!(attempt.solved());
    }

    #[test]
    fn judging_requires_a_submission_in_flight() {
        let mut attempt = Attempt::new();
        attempt.set_input("paris");
        assert_eq!(attempt.finish_submit("paris"), None);
        assert_eq!(attempt.feedback, None);

        assert!(attempt.begin_submit());
        attempt.abort_submit();
        assert!(attempt.can_submit());
        assert_eq!(attempt.finish_submit("paris"), None);
        assert!(!attempt.solved());
    }

    #[test]
    fn hint_reveal_reports_first_use() {
        let mut attempt = Attempt::new();
        assert!(attempt.reveal_hint());
        assert!(!attempt.reveal_hint());
    }

    #[test]
    fn elapsed_time_formatting() {
        assert_eq!(format_elapsed(0), "0:00");
        assert_eq!(format_elapsed(61_999), "1:01");
        assert_eq!(format_elapsed(3_600_000), "60:00");
        assert_eq!(
            Feedback::Incorrect.message(Language::Hi),
            "Galat hai. Aur socho."
        );
    }
}
