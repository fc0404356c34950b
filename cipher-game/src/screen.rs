//! Which of the four screens is showing. Navigation is owned by the
//! presentation layer; this only keeps the transitions in one place.
use serde::{Deserialize, Serialize};

use crate::difficulty::Difficulty;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Screen {
    #[default]
    Landing,
    ModeSelect,
    LevelSelect,
    Game,
}

impl Screen {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Landing => "landing",
            Self::ModeSelect => "mode-select",
            Self::LevelSelect => "level-select",
            Self::Game => "game",
        }
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScreenFlow {
    screen: Screen,
}

impl ScreenFlow {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            screen: Screen::Landing,
        }
    }

    #[must_use]
    pub const fn current(self) -> Screen {
        self.screen
    }

    /// Screen to render. Level select and the puzzle need a selected tier and
    /// fall back to mode select without one.
    #[must_use]
    pub const fn resolve(self, difficulty: Option<Difficulty>) -> Screen {
        match (self.screen, difficulty) {
            (Screen::LevelSelect | Screen::Game, None) => Screen::ModeSelect,
            (screen, _) => screen,
        }
    }

    pub const fn enter(&mut self) -> Screen {
        self.go(Screen::ModeSelect)
    }

    pub const fn choose_mode(&mut self) -> Screen {
        self.go(Screen::LevelSelect)
    }

    pub const fn choose_level(&mut self) -> Screen {
        self.go(Screen::Game)
    }

    /// A solved puzzle returns to the grid so the new progress is visible.
    pub const fn level_completed(&mut self) -> Screen {
        self.go(Screen::LevelSelect)
    }

    pub const fn back(&mut self) -> Screen {
        let previous = match self.screen {
            Screen::Game => Screen::LevelSelect,
            Screen::LevelSelect => Screen::ModeSelect,
            Screen::ModeSelect | Screen::Landing => Screen::Landing,
        };
        self.go(previous)
    }

    const fn go(&mut self, screen: Screen) -> Screen {
        self.screen = screen;
        screen
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_flow_and_back_navigation() {
        let mut flow = ScreenFlow::new();
        assert_eq!(flow.current(), Screen::Landing);
        assert_eq!(flow.enter(), Screen::ModeSelect);
        assert_eq!(flow.choose_mode(), Screen::LevelSelect);
        assert_eq!(flow.choose_level(), Screen::Game);
        assert_eq!(flow.level_completed(), Screen::LevelSelect);
        assert_eq!(flow.choose_level(), Screen::Game);
        assert_eq!(flow.back(), Screen::LevelSelect);
        assert_eq!(flow.back(), Screen::ModeSelect);
        assert_eq!(flow.back(), Screen::Landing);
        assert_eq!(flow.back(), Screen::Landing);
    }

    #[test]
    fn tier_screens_need_a_difficulty() {
        let mut flow = ScreenFlow::new();
        flow.enter();
        flow.choose_mode();
        assert_eq!(flow.resolve(None), Screen::ModeSelect);
        assert_eq!(flow.resolve(Some(Difficulty::Easy)), Screen::LevelSelect);
        assert_eq!(Screen::LevelSelect.to_string(), "level-select");
    }
}
