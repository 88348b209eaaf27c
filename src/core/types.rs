use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProjectionError {
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),
}

/// The twelve inputs of a projection run. Field names on the wire are the
/// Spanish names the original form established; rates are decimal fractions
/// (0.05 = 5%), not percents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParameterSet {
    #[serde(rename = "edad_actual")]
    pub current_age: u32,
    #[serde(rename = "edad_jubilacion")]
    pub retirement_age: u32,
    #[serde(rename = "esperanza_vida")]
    pub life_expectancy: u32,
    #[serde(rename = "capital_inicial_caja")]
    pub initial_cash_capital: f64,
    #[serde(rename = "capital_inicial_reserva")]
    pub initial_reserve_capital: f64,
    #[serde(rename = "ingreso_mensual")]
    pub monthly_income: f64,
    #[serde(rename = "gasto_mensual")]
    pub monthly_expense: f64,
    #[serde(rename = "aporte_mensual_jubilacion")]
    pub monthly_retirement_contribution: f64,
    #[serde(rename = "tasa_retorno_caja_anual")]
    pub cash_annual_return_rate: f64,
    #[serde(rename = "tasa_retorno_reserva_anual")]
    pub reserve_annual_return_rate: f64,
    #[serde(rename = "inflacion_anual")]
    pub annual_inflation_rate: f64,
    #[serde(rename = "gasto_mensual_deseado")]
    pub desired_monthly_retirement_expense: f64,
}

impl ParameterSet {
    pub fn validate(&self) -> Result<(), ProjectionError> {
        if self.current_age >= self.retirement_age {
            return Err(invalid("edad_actual must be < edad_jubilacion"));
        }
        if self.retirement_age >= self.life_expectancy {
            return Err(invalid("edad_jubilacion must be < esperanza_vida"));
        }

        for (name, value) in [
            ("capital_inicial_caja", self.initial_cash_capital),
            ("capital_inicial_reserva", self.initial_reserve_capital),
            ("ingreso_mensual", self.monthly_income),
            ("gasto_mensual", self.monthly_expense),
            (
                "aporte_mensual_jubilacion",
                self.monthly_retirement_contribution,
            ),
            ("inflacion_anual", self.annual_inflation_rate),
            (
                "gasto_mensual_deseado",
                self.desired_monthly_retirement_expense,
            ),
        ] {
            if !value.is_finite() {
                return Err(invalid(&format!("{name} must be a finite number")));
            }
            if value < 0.0 {
                return Err(invalid(&format!("{name} must be >= 0")));
            }
        }

        for (name, rate) in [
            ("tasa_retorno_caja_anual", self.cash_annual_return_rate),
            ("tasa_retorno_reserva_anual", self.reserve_annual_return_rate),
        ] {
            if !rate.is_finite() {
                return Err(invalid(&format!("{name} must be a finite number")));
            }
            if rate <= -1.0 {
                return Err(invalid(&format!("{name} must be > -1")));
            }
        }

        Ok(())
    }

    pub fn annual_contribution(&self) -> f64 {
        self.monthly_retirement_contribution * 12.0
    }
}

fn invalid(msg: &str) -> ProjectionError {
    ProjectionError::InvalidParameters(msg.to_string())
}

/// One projected year while the subject is still working. Balances are
/// post-return; `contributions` is the amount actually swept into the
/// reserve that year (0 when skipped).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AccumulationYear {
    #[serde(rename = "ano")]
    pub year: i32,
    #[serde(rename = "edad")]
    pub age: u32,
    #[serde(rename = "ingresos_trabajo")]
    pub work_income: f64,
    #[serde(rename = "gastos_anuales")]
    pub annual_expense: f64,
    #[serde(rename = "aportes")]
    pub contributions: f64,
    #[serde(rename = "flujo_neto")]
    pub net_flow: f64,
    #[serde(rename = "rendimiento_caja")]
    pub cash_return: f64,
    #[serde(rename = "rendimiento_reserva")]
    pub reserve_return: f64,
    #[serde(rename = "capital_caja")]
    pub cash_balance: f64,
    #[serde(rename = "capital_reserva")]
    pub reserve_balance: f64,
    #[serde(rename = "capital_total")]
    pub total_capital: f64,
    #[serde(rename = "aporte_omitido")]
    pub contribution_skipped: bool,
}

/// One projected year in retirement. `annual_expense` is the
/// inflation-adjusted target spend; `deficit` is the part of it the two
/// accounts could not supply.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RetirementYear {
    #[serde(rename = "ano")]
    pub year: i32,
    #[serde(rename = "edad")]
    pub age: u32,
    #[serde(rename = "gastos_anuales")]
    pub annual_expense: f64,
    #[serde(rename = "deficit_anual")]
    pub deficit: f64,
    #[serde(rename = "rendimiento_caja")]
    pub cash_return: f64,
    #[serde(rename = "rendimiento_reserva")]
    pub reserve_return: f64,
    #[serde(rename = "capital_caja")]
    pub cash_balance: f64,
    #[serde(rename = "capital_reserva")]
    pub reserve_balance: f64,
    #[serde(rename = "capital_total")]
    pub total_capital: f64,
}

/// Tagged internally, presence-based on the wire: consumers of
/// `tabla_anual` recognise accumulation rows by the `ingresos_trabajo`
/// field, so serialization flattens the tag away.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum YearRecord {
    Accumulation(AccumulationYear),
    Retirement(RetirementYear),
}

impl YearRecord {
    pub fn age(&self) -> u32 {
        match self {
            YearRecord::Accumulation(r) => r.age,
            YearRecord::Retirement(r) => r.age,
        }
    }

    pub fn year(&self) -> i32 {
        match self {
            YearRecord::Accumulation(r) => r.year,
            YearRecord::Retirement(r) => r.year,
        }
    }

    pub fn cash_balance(&self) -> f64 {
        match self {
            YearRecord::Accumulation(r) => r.cash_balance,
            YearRecord::Retirement(r) => r.cash_balance,
        }
    }

    pub fn reserve_balance(&self) -> f64 {
        match self {
            YearRecord::Accumulation(r) => r.reserve_balance,
            YearRecord::Retirement(r) => r.reserve_balance,
        }
    }

    pub fn total_capital(&self) -> f64 {
        match self {
            YearRecord::Accumulation(r) => r.total_capital,
            YearRecord::Retirement(r) => r.total_capital,
        }
    }

    pub fn is_retirement(&self) -> bool {
        matches!(self, YearRecord::Retirement(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanStatus {
    Excellent,
    Viable,
    Insufficient,
}

/// Output of one engine run. Immutable once built; never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionResult {
    pub year_records: Vec<YearRecord>,
    pub contributions_made: u32,
    pub contributions_skipped: u32,
    pub final_cash_capital: f64,
    pub final_reserve_capital: f64,
    pub final_total_capital: f64,
    pub perpetuity_monthly_income: f64,
    pub status: PlanStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_params() -> ParameterSet {
        ParameterSet {
            current_age: 30,
            retirement_age: 65,
            life_expectancy: 90,
            initial_cash_capital: 5_000.0,
            initial_reserve_capital: 0.0,
            monthly_income: 3_000.0,
            monthly_expense: 2_000.0,
            monthly_retirement_contribution: 500.0,
            cash_annual_return_rate: 0.02,
            reserve_annual_return_rate: 0.07,
            annual_inflation_rate: 0.03,
            desired_monthly_retirement_expense: 2_500.0,
        }
    }

    #[test]
    fn validate_accepts_sample_params() {
        sample_params().validate().expect("sample must be valid");
    }

    #[test]
    fn validate_rejects_ages_out_of_order() {
        let mut params = sample_params();
        params.retirement_age = 30;
        let err = params.validate().expect_err("equal ages must be rejected");
        assert!(err.to_string().contains("edad_actual"));

        let mut params = sample_params();
        params.life_expectancy = 65;
        let err = params.validate().expect_err("must reject");
        assert!(err.to_string().contains("esperanza_vida"));
    }

    #[test]
    fn validate_rejects_negative_monetary_fields() {
        let mut params = sample_params();
        params.initial_cash_capital = -1.0;
        assert!(params.validate().is_err());

        let mut params = sample_params();
        params.desired_monthly_retirement_expense = -0.01;
        assert!(params.validate().is_err());
    }

    #[test]
    fn validate_rejects_non_finite_numbers() {
        let mut params = sample_params();
        params.monthly_income = f64::NAN;
        let err = params.validate().expect_err("NaN must be rejected");
        assert!(err.to_string().contains("finite"));

        let mut params = sample_params();
        params.reserve_annual_return_rate = f64::INFINITY;
        assert!(params.validate().is_err());
    }

    #[test]
    fn validate_allows_negative_return_rates_above_minus_one() {
        let mut params = sample_params();
        params.cash_annual_return_rate = -0.15;
        params.reserve_annual_return_rate = -0.5;
        params.validate().expect("losses are a valid outcome");

        params.reserve_annual_return_rate = -1.0;
        assert!(params.validate().is_err());
    }

    #[test]
    fn parameter_set_round_trips_through_json() {
        let params = sample_params();
        let json = serde_json::to_string(&params).expect("must serialize");
        let back: ParameterSet = serde_json::from_str(&json).expect("must deserialize");
        assert_eq!(params, back);
    }

    #[test]
    fn parameter_set_serializes_exactly_twelve_spanish_fields() {
        let json = serde_json::to_value(sample_params()).expect("must serialize");
        let map = json.as_object().expect("flat mapping");
        assert_eq!(map.len(), 12);
        for key in [
            "edad_actual",
            "edad_jubilacion",
            "esperanza_vida",
            "capital_inicial_caja",
            "capital_inicial_reserva",
            "ingreso_mensual",
            "gasto_mensual",
            "aporte_mensual_jubilacion",
            "tasa_retorno_caja_anual",
            "tasa_retorno_reserva_anual",
            "inflacion_anual",
            "gasto_mensual_deseado",
        ] {
            assert!(map.contains_key(key), "missing field {key}");
        }
    }

    #[test]
    fn parameter_set_rejects_unknown_fields() {
        let json = r#"{
            "edad_actual": 30, "edad_jubilacion": 65, "esperanza_vida": 90,
            "capital_inicial_caja": 0, "capital_inicial_reserva": 0,
            "ingreso_mensual": 0, "gasto_mensual": 0,
            "aporte_mensual_jubilacion": 0,
            "tasa_retorno_caja_anual": 0, "tasa_retorno_reserva_anual": 0,
            "inflacion_anual": 0, "gasto_mensual_deseado": 0,
            "campo_desconocido": 1
        }"#;
        assert!(serde_json::from_str::<ParameterSet>(json).is_err());
    }

    #[test]
    fn year_record_deserializes_by_field_presence() {
        let acc = r#"{
            "ano": 2026, "edad": 30, "ingresos_trabajo": 36000.0,
            "gastos_anuales": 24000.0, "aportes": 6000.0, "flujo_neto": 12000.0,
            "rendimiento_caja": 100.0, "rendimiento_reserva": 0.0,
            "capital_caja": 11100.0, "capital_reserva": 6000.0,
            "capital_total": 17100.0, "aporte_omitido": false
        }"#;
        let record: YearRecord = serde_json::from_str(acc).expect("must parse");
        assert!(!record.is_retirement());

        let ret = r#"{
            "ano": 2061, "edad": 65, "gastos_anuales": 30000.0,
            "deficit_anual": 0.0, "rendimiento_caja": 10.0,
            "rendimiento_reserva": 700.0, "capital_caja": 500.0,
            "capital_reserva": 10700.0, "capital_total": 11200.0
        }"#;
        let record: YearRecord = serde_json::from_str(ret).expect("must parse");
        assert!(record.is_retirement());
    }

    #[test]
    fn plan_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&PlanStatus::Excellent).expect("serializes"),
            "\"excellent\""
        );
        assert_eq!(
            serde_json::to_string(&PlanStatus::Viable).expect("serializes"),
            "\"viable\""
        );
        assert_eq!(
            serde_json::to_string(&PlanStatus::Insufficient).expect("serializes"),
            "\"insufficient\""
        );
    }
}
