mod account;
mod classify;
mod engine;
mod types;

pub use account::CapitalAccount;
pub use classify::{EXCELLENT_INCOME_MARGIN, classify_outcome};
pub use engine::run_projection;
pub use types::{
    AccumulationYear, ParameterSet, PlanStatus, ProjectionError, ProjectionResult, RetirementYear,
    YearRecord,
};
