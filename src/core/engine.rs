use super::account::CapitalAccount;
use super::classify::classify_outcome;
use super::types::{
    AccumulationYear, ParameterSet, ProjectionError, ProjectionResult, RetirementYear, YearRecord,
};

const MONTHS_PER_YEAR: f64 = 12.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Accumulating,
    Retired,
    Done,
}

/// Projects one parameter set year by year from `current_age` through
/// `life_expectancy`, handing off from the accumulation stepper to the
/// retirement stepper in the first year where `age == retirement_age`.
/// The run is purely sequential and owns its two accounts, so concurrent
/// runs over independent parameter sets share nothing.
pub fn run_projection(
    params: &ParameterSet,
    start_year: i32,
) -> Result<ProjectionResult, ProjectionError> {
    params.validate()?;

    let mut cash = CapitalAccount::new(params.initial_cash_capital, params.cash_annual_return_rate);
    let mut reserve = CapitalAccount::new(
        params.initial_reserve_capital,
        params.reserve_annual_return_rate,
    );

    let year_count = (params.life_expectancy - params.current_age + 1) as usize;
    let mut records = Vec::with_capacity(year_count);
    let mut contributions_made = 0_u32;
    let mut contributions_skipped = 0_u32;

    let mut phase = Phase::Accumulating;
    let mut age = params.current_age;
    let mut year = start_year;

    while phase != Phase::Done {
        if phase == Phase::Accumulating && age >= params.retirement_age {
            phase = Phase::Retired;
        }

        match phase {
            Phase::Accumulating => {
                let record = step_accumulation_year(params, &mut cash, &mut reserve, year, age);
                if record.contribution_skipped {
                    contributions_skipped += 1;
                } else {
                    contributions_made += 1;
                }
                records.push(YearRecord::Accumulation(record));
            }
            Phase::Retired => {
                let years_since_retirement = age - params.retirement_age;
                let record = step_retirement_year(
                    params,
                    &mut cash,
                    &mut reserve,
                    year,
                    age,
                    years_since_retirement,
                );
                records.push(YearRecord::Retirement(record));
            }
            Phase::Done => break,
        }

        if age == params.life_expectancy {
            phase = Phase::Done;
        } else {
            age += 1;
            year += 1;
        }
    }

    let final_cash_capital = cash.balance();
    let final_reserve_capital = reserve.balance();
    let final_total_capital = final_cash_capital + final_reserve_capital;
    let perpetuity_monthly_income =
        final_total_capital * params.reserve_annual_return_rate / MONTHS_PER_YEAR;
    let status = classify_outcome(
        &records,
        final_total_capital,
        perpetuity_monthly_income,
        params.desired_monthly_retirement_expense,
    );

    Ok(ProjectionResult {
        year_records: records,
        contributions_made,
        contributions_skipped,
        final_cash_capital,
        final_reserve_capital,
        final_total_capital,
        perpetuity_monthly_income,
        status,
    })
}

/// One working year: ordinary net flow hits the cash buffer, then the
/// scheduled contribution is swept cash -> reserve if the buffer covers
/// it, then both accounts compound. A skipped contribution is not carried
/// into later years; each year is judged on its own buffer.
fn step_accumulation_year(
    params: &ParameterSet,
    cash: &mut CapitalAccount,
    reserve: &mut CapitalAccount,
    year: i32,
    age: u32,
) -> AccumulationYear {
    let work_income = params.monthly_income * MONTHS_PER_YEAR;
    let annual_expense = params.monthly_expense * MONTHS_PER_YEAR;
    let net_flow = work_income - annual_expense;

    if net_flow >= 0.0 {
        cash.deposit(net_flow);
    } else {
        cash.withdraw(-net_flow);
    }

    let required = params.annual_contribution();
    // Ties contribute: available >= required.
    let (contributions, contribution_skipped) = if cash.balance() >= required {
        let swept = cash.withdraw(required);
        reserve.deposit(swept);
        (swept, false)
    } else {
        (0.0, true)
    };

    let cash_return = cash.apply_annual_return();
    let reserve_return = reserve.apply_annual_return();

    AccumulationYear {
        year,
        age,
        work_income,
        annual_expense,
        contributions,
        net_flow,
        cash_return,
        reserve_return,
        cash_balance: cash.balance(),
        reserve_balance: reserve.balance(),
        total_capital: cash.balance() + reserve.balance(),
        contribution_skipped,
    }
}

/// One retired year: the inflation-adjusted target is drawn cash first,
/// then reserve; whatever neither account could supply is the deficit.
/// The target is recomputed from the inflation formula every year, so a
/// deficit never inflates a later year's target.
fn step_retirement_year(
    params: &ParameterSet,
    cash: &mut CapitalAccount,
    reserve: &mut CapitalAccount,
    year: i32,
    age: u32,
    years_since_retirement: u32,
) -> RetirementYear {
    let target = params.desired_monthly_retirement_expense
        * MONTHS_PER_YEAR
        * (1.0 + params.annual_inflation_rate).powi(years_since_retirement as i32);

    let from_cash = cash.withdraw(target);
    let from_reserve = reserve.withdraw(target - from_cash);
    let deficit = (target - from_cash - from_reserve).max(0.0);

    let cash_return = cash.apply_annual_return();
    let reserve_return = reserve.apply_annual_return();

    RetirementYear {
        year,
        age,
        annual_expense: target,
        deficit,
        cash_return,
        reserve_return,
        cash_balance: cash.balance(),
        reserve_balance: reserve.balance(),
        total_capital: cash.balance() + reserve.balance(),
    }
}
