use axum::{
    Router,
    extract::{Json, Query},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::core::{
    AccountBalance, AccountProgress, AccountType, DashboardMetrics, FinancialInputs,
    InvestmentOption, SavingsPlan, account_progress, aggregate, build_export, project,
    projection_horizon, savings_plan, to_csv, to_json,
};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum ApiAccountType {
    Savings,
    Investment,
    Retirement,
    Emergency,
}

impl From<ApiAccountType> for AccountType {
    fn from(value: ApiAccountType) -> Self {
        match value {
            ApiAccountType::Savings => AccountType::Savings,
            ApiAccountType::Investment => AccountType::Investment,
            ApiAccountType::Retirement => AccountType::Retirement,
            ApiAccountType::Emergency => AccountType::Emergency,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum ApiExportFormat {
    Csv,
    Json,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountPayload {
    name: String,
    balance: f64,
    #[serde(rename = "type")]
    account_type: ApiAccountType,
    color: Option<String>,
}

/// Overrides applied on top of the clap-declared defaults. Rates arrive in
/// percent, matching the CLI flags; `build_inputs` converts to fractions.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct PlanPayload {
    goal_amount: Option<f64>,
    current_age: Option<u32>,
    target_age: Option<u32>,
    initial_investment: Option<f64>,
    monthly_income: Option<f64>,
    income_saving_rate: Option<f64>,
    growth_rate: Option<f64>,
    inflation_rate: Option<f64>,
    tax_rate: Option<f64>,
    accounts: Option<Vec<AccountPayload>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ExportQuery {
    format: Option<ApiExportFormat>,
}

#[derive(Parser, Debug)]
#[command(
    name = "nestegg",
    about = "Savings-goal planner (fixed-strategy projections + dashboard metrics)"
)]
struct Cli {
    #[arg(long, default_value_t = 250_000.0)]
    goal_amount: f64,
    #[arg(long, default_value_t = 25)]
    current_age: u32,
    #[arg(long, default_value_t = 35)]
    target_age: u32,
    #[arg(long, default_value_t = 10_000.0)]
    initial_investment: f64,
    #[arg(long, default_value_t = 5_000.0)]
    monthly_income: f64,
    #[arg(
        long,
        default_value_t = 20.0,
        help = "Share of monthly income set aside, in percent"
    )]
    income_saving_rate: f64,
    #[arg(
        long,
        default_value_t = 3.0,
        help = "Annual income growth applied to contributions, in percent"
    )]
    growth_rate: f64,
    #[arg(
        long,
        default_value_t = 2.0,
        help = "Expected annual inflation in percent"
    )]
    inflation_rate: f64,
    #[arg(
        long,
        default_value_t = 15.0,
        help = "Tax rate applied to investment returns, in percent"
    )]
    tax_rate: f64,
}

#[derive(Debug)]
struct PlanRequest {
    inputs: FinancialInputs,
    accounts: Vec<AccountBalance>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PlanResponse {
    horizon_years: u32,
    options: Vec<InvestmentOption>,
    metrics: DashboardMetrics,
    savings_plan: SavingsPlan,
    account_progress: AccountProgress,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

fn build_inputs(cli: Cli) -> Result<FinancialInputs, String> {
    for (name, value) in [
        ("--goal-amount", cli.goal_amount),
        ("--initial-investment", cli.initial_investment),
        ("--monthly-income", cli.monthly_income),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(format!("{name} must be a finite amount >= 0"));
        }
    }

    if cli.target_age < cli.current_age {
        return Err("--target-age must be >= --current-age".to_string());
    }

    for (name, rate) in [
        ("--income-saving-rate", cli.income_saving_rate),
        ("--growth-rate", cli.growth_rate),
        ("--inflation-rate", cli.inflation_rate),
        ("--tax-rate", cli.tax_rate),
    ] {
        if !(0.0..=100.0).contains(&rate) {
            return Err(format!("{name} must be between 0 and 100"));
        }
    }

    Ok(FinancialInputs {
        goal_amount: cli.goal_amount,
        current_age: cli.current_age,
        target_age: cli.target_age,
        initial_investment: cli.initial_investment,
        monthly_income: cli.monthly_income,
        income_saving_rate: cli.income_saving_rate / 100.0,
        growth_rate: cli.growth_rate / 100.0,
        inflation_rate: cli.inflation_rate / 100.0,
        tax_rate: cli.tax_rate / 100.0,
    })
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = Router::new()
        .route("/", get(index_handler))
        .route("/api/plan", get(plan_get_handler).post(plan_post_handler))
        .route(
            "/api/export",
            get(export_get_handler).post(export_post_handler),
        )
        .fallback(not_found_handler);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!("nestegg HTTP API listening on http://{addr}");

    axum::serve(listener, app).await
}

async fn index_handler() -> Response {
    json_response(
        StatusCode::OK,
        serde_json::json!({
            "service": "nestegg",
            "endpoints": ["/api/plan", "/api/export?format=csv|json"],
        }),
    )
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn plan_get_handler(Query(payload): Query<PlanPayload>) -> Response {
    plan_handler_impl(payload).await
}

async fn plan_post_handler(Json(payload): Json<PlanPayload>) -> Response {
    plan_handler_impl(payload).await
}

async fn plan_handler_impl(payload: PlanPayload) -> Response {
    let request = match plan_request_from_payload(payload) {
        Ok(request) => request,
        Err(msg) => return error_response(StatusCode::BAD_REQUEST, &msg),
    };

    let options = project(&request.inputs);
    let metrics = aggregate(&request.accounts, &options, &request.inputs);
    let response = PlanResponse {
        horizon_years: projection_horizon(&request.inputs),
        metrics,
        savings_plan: savings_plan(&request.inputs),
        account_progress: account_progress(&request.accounts, request.inputs.goal_amount),
        options,
    };

    json_response(StatusCode::OK, response)
}

async fn export_get_handler(
    Query(query): Query<ExportQuery>,
    Query(payload): Query<PlanPayload>,
) -> Response {
    export_handler_impl(query.format.unwrap_or(ApiExportFormat::Json), payload).await
}

async fn export_post_handler(
    Query(query): Query<ExportQuery>,
    Json(payload): Json<PlanPayload>,
) -> Response {
    export_handler_impl(query.format.unwrap_or(ApiExportFormat::Json), payload).await
}

async fn export_handler_impl(format: ApiExportFormat, payload: PlanPayload) -> Response {
    let request = match plan_request_from_payload(payload) {
        Ok(request) => request,
        Err(msg) => return error_response(StatusCode::BAD_REQUEST, &msg),
    };

    let options = project(&request.inputs);
    let data = build_export(
        &request.inputs,
        &request.accounts,
        &options,
        chrono::Utc::now().to_rfc3339(),
    );

    let rendered = match format {
        ApiExportFormat::Csv => to_csv(&data),
        ApiExportFormat::Json => to_json(&data),
    };
    let body = match rendered {
        Ok(body) => body,
        Err(err) => {
            tracing::error!("export failed: {err}");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Export failed");
        }
    };

    let (content_type, filename) = match format {
        ApiExportFormat::Csv => ("text/csv; charset=utf-8", "financial-plan.csv"),
        ApiExportFormat::Json => ("application/json", "financial-plan.json"),
    };
    with_cache_control((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        body,
    ))
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
    with_cache_control((status, Json(body)))
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

#[cfg(test)]
fn plan_request_from_json(json: &str) -> Result<PlanRequest, String> {
    let payload = serde_json::from_str::<PlanPayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    plan_request_from_payload(payload)
}

fn plan_request_from_payload(payload: PlanPayload) -> Result<PlanRequest, String> {
    let mut cli = default_cli_for_api();

    if let Some(v) = payload.goal_amount {
        cli.goal_amount = v;
    }
    if let Some(v) = payload.current_age {
        cli.current_age = v;
    }
    if let Some(v) = payload.target_age {
        cli.target_age = v;
    }
    if let Some(v) = payload.initial_investment {
        cli.initial_investment = v;
    }
    if let Some(v) = payload.monthly_income {
        cli.monthly_income = v;
    }
    if let Some(v) = payload.income_saving_rate {
        cli.income_saving_rate = v;
    }
    if let Some(v) = payload.growth_rate {
        cli.growth_rate = v;
    }
    if let Some(v) = payload.inflation_rate {
        cli.inflation_rate = v;
    }
    if let Some(v) = payload.tax_rate {
        cli.tax_rate = v;
    }

    let inputs = build_inputs(cli)?;
    let accounts = match payload.accounts {
        Some(accounts) => convert_accounts(accounts)?,
        None => default_accounts(),
    };

    Ok(PlanRequest { inputs, accounts })
}

fn convert_accounts(accounts: Vec<AccountPayload>) -> Result<Vec<AccountBalance>, String> {
    accounts
        .into_iter()
        .map(|account| {
            if !account.balance.is_finite() || account.balance < 0.0 {
                return Err(format!(
                    "account '{}' balance must be a finite amount >= 0",
                    account.name
                ));
            }
            Ok(AccountBalance {
                name: account.name,
                balance: account.balance,
                account_type: account.account_type.into(),
                color: account.color,
            })
        })
        .collect()
}

fn default_cli_for_api() -> Cli {
    Cli {
        goal_amount: 250_000.0,
        current_age: 25,
        target_age: 35,
        initial_investment: 10_000.0,
        monthly_income: 5_000.0,
        income_saving_rate: 20.0,
        growth_rate: 3.0,
        inflation_rate: 2.0,
        tax_rate: 15.0,
    }
}

// Demo portfolio shown before the caller supplies real accounts.
fn default_accounts() -> Vec<AccountBalance> {
    let seed = [
        ("HYSA (Marcus)", 3_500.0, AccountType::Savings, "#3B82F6"),
        ("Roth IRA (Stash)", 7_000.0, AccountType::Retirement, "#8B5CF6"),
        ("Brokerage (Schwab)", 4_200.0, AccountType::Investment, "#10B981"),
        ("Emergency Fund (SoFi)", 2_000.0, AccountType::Emergency, "#F59E0B"),
        ("CD (Credit Union)", 5_000.0, AccountType::Savings, "#06B6D4"),
    ];

    seed.into_iter()
        .map(|(name, balance, account_type, color)| AccountBalance {
            name: name.to_string(),
            balance,
            account_type,
            color: Some(color.to_string()),
        })
        .collect()
}
