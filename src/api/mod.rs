use axum::{
    Router,
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use chrono::{Datelike, Utc};
use clap::Parser;
use serde::Serialize;
use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::core::{ParameterSet, PlanStatus, ProjectionResult, YearRecord, run_projection};

const INDEX_HTML: &str = include_str!("../../web/index.html");
const STYLES_CSS: &str = include_str!("../../web/styles.css");
const APP_JS: &str = include_str!("../../web/app.js");

#[derive(Parser, Debug)]
#[command(
    name = "retiro",
    about = "Two-bucket retirement projection (cash buffer + long-term reserve)"
)]
struct Cli {
    #[arg(long, default_value_t = 30)]
    current_age: u32,
    #[arg(long, default_value_t = 65)]
    retirement_age: u32,
    #[arg(long, default_value_t = 90, help = "Age to project through")]
    life_expectancy: u32,
    #[arg(long, default_value_t = 5_000.0, help = "Starting cash buffer balance")]
    initial_cash_capital: f64,
    #[arg(
        long,
        default_value_t = 0.0,
        help = "Starting long-term reserve balance"
    )]
    initial_reserve_capital: f64,
    #[arg(long, default_value_t = 3_000.0)]
    monthly_income: f64,
    #[arg(long, default_value_t = 2_000.0)]
    monthly_expense: f64,
    #[arg(
        long,
        default_value_t = 500.0,
        help = "Monthly amount swept from the cash buffer into the reserve"
    )]
    monthly_retirement_contribution: f64,
    #[arg(
        long,
        default_value_t = 0.02,
        help = "Annual cash buffer return as a decimal fraction, e.g. 0.02"
    )]
    cash_annual_return_rate: f64,
    #[arg(
        long,
        default_value_t = 0.07,
        help = "Annual reserve return as a decimal fraction, e.g. 0.07"
    )]
    reserve_annual_return_rate: f64,
    #[arg(
        long,
        default_value_t = 0.03,
        help = "Annual inflation as a decimal fraction, e.g. 0.03"
    )]
    annual_inflation_rate: f64,
    #[arg(
        long,
        default_value_t = 2_500.0,
        help = "Desired monthly spend once retired, in today's money"
    )]
    desired_monthly_retirement_expense: f64,
}

fn build_params(cli: Cli) -> Result<ParameterSet, String> {
    let params = ParameterSet {
        current_age: cli.current_age,
        retirement_age: cli.retirement_age,
        life_expectancy: cli.life_expectancy,
        initial_cash_capital: cli.initial_cash_capital,
        initial_reserve_capital: cli.initial_reserve_capital,
        monthly_income: cli.monthly_income,
        monthly_expense: cli.monthly_expense,
        monthly_retirement_contribution: cli.monthly_retirement_contribution,
        cash_annual_return_rate: cli.cash_annual_return_rate,
        reserve_annual_return_rate: cli.reserve_annual_return_rate,
        annual_inflation_rate: cli.annual_inflation_rate,
        desired_monthly_retirement_expense: cli.desired_monthly_retirement_expense,
    };
    params.validate().map_err(|e| e.to_string())?;
    Ok(params)
}

#[derive(Debug, Serialize)]
struct AccumulationSummary {
    capital_total_final: f64,
    capital_reserva_final: f64,
    capital_caja_final: f64,
    aportes_realizados: u32,
    aportes_omitidos: u32,
}

#[derive(Debug, Serialize)]
struct CalculateResponse {
    success: bool,
    status: PlanStatus,
    acumulacion: AccumulationSummary,
    ingreso_perpetuo_mensual: f64,
    tabla_anual: Vec<YearRecord>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
}

fn build_calculate_response(result: ProjectionResult) -> CalculateResponse {
    CalculateResponse {
        success: true,
        status: result.status,
        acumulacion: AccumulationSummary {
            capital_total_final: result.final_total_capital,
            capital_reserva_final: result.final_reserve_capital,
            capital_caja_final: result.final_cash_capital,
            aportes_realizados: result.contributions_made,
            aportes_omitidos: result.contributions_skipped,
        },
        ingreso_perpetuo_mensual: result.perpetuity_monthly_income,
        tabla_anual: result.year_records,
    }
}

fn calculate_from_json(body: &str, start_year: i32) -> Result<CalculateResponse, String> {
    let params = serde_json::from_str::<ParameterSet>(body)
        .map_err(|e| format!("Invalid request payload: {e}"))?;
    let result = run_projection(&params, start_year).map_err(|e| e.to_string())?;
    Ok(build_calculate_response(result))
}

fn current_year() -> i32 {
    Utc::now().year()
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = Router::new()
        .route("/", get(index_handler))
        .route("/index.html", get(index_handler))
        .route("/styles.css", get(styles_handler))
        .route("/app.js", get(app_js_handler))
        .route("/calcular", post(calculate_handler))
        .fallback(not_found_handler);

    let listener = TcpListener::bind(addr).await?;
    println!("Retirement projection API listening on http://{addr}");
    println!("Local access: http://127.0.0.1:{port}/");

    axum::serve(listener, app).await
}

/// One-shot CLI run: projects the flag-supplied parameter set and prints
/// the same JSON document the HTTP endpoint would return.
pub fn run_once() -> Result<(), String> {
    let cli = Cli::parse();
    let params = build_params(cli)?;
    let result = run_projection(&params, current_year()).map_err(|e| e.to_string())?;
    let response = build_calculate_response(result);
    let json = serde_json::to_string_pretty(&response)
        .map_err(|e| format!("Failed to serialize response: {e}"))?;
    println!("{json}");
    Ok(())
}

async fn index_handler() -> impl IntoResponse {
    with_cache_control(Html(INDEX_HTML))
}

async fn styles_handler() -> impl IntoResponse {
    with_cache_control((
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        STYLES_CSS,
    ))
}

async fn app_js_handler() -> impl IntoResponse {
    with_cache_control((
        [(
            header::CONTENT_TYPE,
            "application/javascript; charset=utf-8",
        )],
        APP_JS,
    ))
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn calculate_handler(body: String) -> Response {
    match calculate_from_json(&body, current_year()) {
        Ok(response) => json_response(StatusCode::OK, response),
        Err(msg) => error_response(StatusCode::BAD_REQUEST, &msg),
    }
}

fn with_cache_control<R: IntoResponse>(response: R) -> Response {
    let mut response = response.into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        "no-store".parse().expect("valid header"),
    );
    response
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, axum::Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        "no-store".parse().expect("valid header"),
    );
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            success: false,
            error: msg.to_string(),
        },
    )
}
