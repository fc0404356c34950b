//! Fixed keys, thresholds and timings shared by every platform layer.

/// Storage key of the persisted progress record.
pub const STATE_STORAGE_KEY: &str = "cipher-game-state";
/// Storage key of the preferred puzzle language.
pub const LANGUAGE_STORAGE_KEY: &str = "cipher_language";

/// Levels that must be completed in a tier before the next tier opens.
pub const UNLOCK_THRESHOLD: u32 = 5;
/// Level count per difficulty in the bundled dataset.
pub const DEFAULT_LEVELS_PER_DIFFICULTY: u32 = 10;
pub const DEFAULT_DARK_MODE: bool = true;

/// Artificial latency before an answer result is revealed.
pub const SUBMIT_DELAY_MS: u32 = 800;
/// Pause between a correct answer and returning to the level grid.
pub const ADVANCE_DELAY_MS: u32 = 2_000;
/// How long an incorrect-answer message stays visible.
pub const ERROR_CLEAR_MS: u32 = 3_000;
/// Elapsed-time display refresh interval.
pub const CLOCK_TICK_MS: u32 = 1_000;
