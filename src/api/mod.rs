use axum::{
    Router,
    extract::{Json, Query},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use clap::Parser;
use serde::{Deserialize, Deserializer, Serialize};
use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::core::{Comparison, Inputs, StrategyResult, run_comparison};

const INDEX_HTML: &str = include_str!("../../web/index.html");
const STYLES_CSS: &str = include_str!("../../web/styles.css");
const APP_JS: &str = include_str!("../../web/app.js");

#[derive(Parser, Debug)]
#[command(
    name = "paydown",
    about = "Debt vs investment comparison: pay the minimum EMI and invest, or clear the loan first"
)]
pub struct Cli {
    #[arg(long, help = "Outstanding loan balance")]
    loan_amount: f64,
    #[arg(long, help = "Annual loan interest rate in percent, e.g. 8.5")]
    interest_rate: f64,
    #[arg(long, help = "Minimum monthly EMI on the loan")]
    emi: f64,
    #[arg(long, help = "Monthly savings left over after paying the EMI")]
    savings: f64,
    #[arg(long, help = "Expected annual investment return in percent, e.g. 12")]
    investment_return: f64,
    #[arg(
        long,
        default_value_t = 0.0,
        help = "Annual growth of savings capacity in percent (pay rises, bonuses)"
    )]
    savings_growth: f64,
    #[arg(long, help = "Planning horizon in whole years")]
    horizon_years: u32,
}

/// The seven calculator fields, camelCase keyed. The web form submits
/// values as strings, so every numeric field accepts a number or a
/// numeric string.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SimulatePayload {
    #[serde(deserialize_with = "flexible_f64")]
    loan_amount: Option<f64>,
    #[serde(deserialize_with = "flexible_f64")]
    interest_rate: Option<f64>,
    #[serde(deserialize_with = "flexible_f64")]
    emi: Option<f64>,
    #[serde(deserialize_with = "flexible_f64")]
    savings: Option<f64>,
    #[serde(deserialize_with = "flexible_f64")]
    investment_return: Option<f64>,
    #[serde(
        deserialize_with = "flexible_f64",
        alias = "savingsGrowth",
        alias = "savingsGrowthRate"
    )]
    inflation_rate: Option<f64>,
    #[serde(deserialize_with = "flexible_u32")]
    investment_horizon: Option<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SimulateResponse {
    horizon_months: u32,
    emi_invest: StrategyResult,
    debt_first: StrategyResult,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

fn flexible_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(f64),
        Text(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Num(v)) => Ok(Some(v)),
        Some(Raw::Text(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Err(serde::de::Error::custom("expected a number, got an empty string"));
            }
            trimmed
                .parse::<f64>()
                .map(Some)
                .map_err(|_| serde::de::Error::custom(format!("expected a number, got {trimmed:?}")))
        }
    }
}

fn flexible_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    match flexible_f64(deserializer)? {
        None => Ok(None),
        Some(v) if v.is_finite() && v >= 0.0 => Ok(Some(v as u32)),
        Some(v) => Err(serde::de::Error::custom(format!(
            "expected a non-negative whole number of years, got {v}"
        ))),
    }
}

fn build_inputs(cli: Cli) -> Result<Inputs, String> {
    for (name, value) in [
        ("--loan-amount", cli.loan_amount),
        ("--interest-rate", cli.interest_rate),
        ("--emi", cli.emi),
        ("--savings", cli.savings),
        ("--investment-return", cli.investment_return),
        ("--savings-growth", cli.savings_growth),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(format!("{name} must be a finite number >= 0"));
        }
    }

    if cli.horizon_years == 0 {
        return Err("--horizon-years must be >= 1".to_string());
    }

    Ok(Inputs {
        loan_amount: cli.loan_amount,
        annual_interest_rate: cli.interest_rate / 100.0,
        minimum_emi: cli.emi,
        monthly_savings: cli.savings,
        investment_return_rate: cli.investment_return / 100.0,
        savings_growth_rate: cli.savings_growth / 100.0,
        horizon_years: cli.horizon_years,
    })
}

pub fn run_comparison_json(cli: Cli) -> Result<String, String> {
    let inputs = build_inputs(cli)?;
    let comparison = run_comparison(&inputs)?;
    let response = build_simulate_response(&inputs, comparison);
    serde_json::to_string_pretty(&response).map_err(|e| e.to_string())
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = Router::new()
        .route("/", get(index_handler))
        .route("/index.html", get(index_handler))
        .route("/styles.css", get(styles_handler))
        .route("/app.js", get(app_js_handler))
        .route(
            "/api/simulate",
            get(simulate_get_handler).post(simulate_post_handler),
        )
        .fallback(not_found_handler);

    let listener = TcpListener::bind(addr).await?;
    println!("paydown HTTP API listening on http://{addr}");
    println!("Local access: http://127.0.0.1:{port}/");

    axum::serve(listener, app).await
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

async fn simulate_get_handler(Query(payload): Query<SimulatePayload>) -> Response {
    simulate_handler_impl(payload).await
}

async fn simulate_post_handler(Json(payload): Json<SimulatePayload>) -> Response {
    simulate_handler_impl(payload).await
}

async fn simulate_handler_impl(payload: SimulatePayload) -> Response {
    let inputs = match inputs_from_payload(payload) {
        Ok(inputs) => inputs,
        Err(msg) => return error_response(StatusCode::BAD_REQUEST, &msg),
    };

    match run_comparison(&inputs) {
        Ok(comparison) => {
            json_response(StatusCode::OK, build_simulate_response(&inputs, comparison))
        }
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
    let mut response = (status, Json(body)).into_response();
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
            error: msg.to_string(),
        },
    )
}

fn require<T>(value: Option<T>, key: &str) -> Result<T, String> {
    value.ok_or_else(|| format!("Missing required field: {key}"))
}

fn inputs_from_payload(payload: SimulatePayload) -> Result<Inputs, String> {
    let cli = Cli {
        loan_amount: require(payload.loan_amount, "loanAmount")?,
        interest_rate: require(payload.interest_rate, "interestRate")?,
        emi: require(payload.emi, "emi")?,
        savings: require(payload.savings, "savings")?,
        investment_return: require(payload.investment_return, "investmentReturn")?,
        savings_growth: require(payload.inflation_rate, "inflationRate")?,
        horizon_years: require(payload.investment_horizon, "investmentHorizon")?,
    };
    build_inputs(cli)
}

#[cfg(test)]
fn inputs_from_json(json: &str) -> Result<Inputs, String> {
    let payload = serde_json::from_str::<SimulatePayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    inputs_from_payload(payload)
}

fn build_simulate_response(inputs: &Inputs, comparison: Comparison) -> SimulateResponse {
    SimulateResponse {
        horizon_months: inputs.total_months(),
        emi_invest: comparison.emi_invest,
        debt_first: comparison.debt_first,
    }
}
