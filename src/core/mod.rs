mod engine;
mod export;
mod metrics;
mod types;

pub use engine::{PROJECTION_YEARS_CAP, project, projection_horizon};
pub use export::{ExportError, build_export, to_csv, to_json};
pub use metrics::{account_progress, aggregate, savings_plan};
pub use types::{
    AccountBalance, AccountProgress, AccountType, DashboardMetrics, ExportData, ExportSummary,
    FinancialInputs, InvestmentOption, ProjectionResult, RiskLevel, SavingsPlan,
};
