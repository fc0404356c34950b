pub mod game_tester;
pub mod reports;
pub mod tester;

pub use game_tester::{GameTester, PlayStrategy, SimulationPlan, SimulationSummary, TesterAssets};
pub use tester::*;
