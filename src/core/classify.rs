use super::types::{PlanStatus, YearRecord};

/// Safety factor on top of the desired retirement spend: the plan is only
/// rated `excellent` when the perpetuity income covers the desired monthly
/// expense with this much headroom.
pub const EXCELLENT_INCOME_MARGIN: f64 = 1.2;

/// Maps the terminal state of a projection to the three-level status.
pub fn classify_outcome(
    records: &[YearRecord],
    final_total_capital: f64,
    perpetuity_monthly_income: f64,
    desired_monthly_retirement_expense: f64,
) -> PlanStatus {
    let any_deficit = records
        .iter()
        .any(|r| matches!(r, YearRecord::Retirement(y) if y.deficit > 0.0));

    if any_deficit || final_total_capital <= 0.0 {
        return PlanStatus::Insufficient;
    }

    if perpetuity_monthly_income >= desired_monthly_retirement_expense * EXCELLENT_INCOME_MARGIN {
        PlanStatus::Excellent
    } else {
        PlanStatus::Viable
    }
}
