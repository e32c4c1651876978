pub mod policy;
pub mod reports;
pub mod simulation;
pub mod tester;
pub mod tuning;

pub use policy::GameplayStrategy;
pub use simulation::{GameTester, SimulationPlan, SimulationSummary};
pub use tester::*;
pub use tuning::resolve_tuning;
