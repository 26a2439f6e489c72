mod engine;
mod types;

pub use engine::{run_comparison, run_strategy};
pub use types::{Comparison, Inputs, MonthRecord, Payoff, Strategy, StrategyResult};
