use serde::{Deserialize, Serialize};

/// Closed set of account categories; every `match` on this enum is exhaustive
/// so adding a category forces the risk and diversification code to be revisited.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Savings,
    Investment,
    Retirement,
    Emergency,
}

impl AccountType {
    pub const ALL: [AccountType; 4] = [
        AccountType::Savings,
        AccountType::Investment,
        AccountType::Retirement,
        AccountType::Emergency,
    ];

    /// Growth-oriented categories drive the risk classification.
    pub fn is_growth_oriented(self) -> bool {
        match self {
            AccountType::Investment | AccountType::Retirement => true,
            AccountType::Savings | AccountType::Emergency => false,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

/// Immutable snapshot of the user's assumptions. All rates are fractions
/// (0.15, never 15); the API boundary owns the percent conversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialInputs {
    pub goal_amount: f64,
    pub current_age: u32,
    pub target_age: u32,
    pub initial_investment: f64,
    pub monthly_income: f64,
    pub income_saving_rate: f64,
    pub growth_rate: f64,
    pub inflation_rate: f64,
    pub tax_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountBalance {
    pub name: String,
    pub balance: f64,
    #[serde(rename = "type")]
    pub account_type: AccountType,
    pub color: Option<String>,
}

/// One projected year. `value` is deflated to today's money; `contributions`
/// and `interest` stay nominal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionResult {
    pub year: u32,
    pub age: u32,
    pub value: f64,
    pub contributions: f64,
    pub interest: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentOption {
    pub name: String,
    pub rate: f64,
    pub color: String,
    pub projections: Vec<ProjectionResult>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    pub total_balance: f64,
    pub monthly_growth: f64,
    pub goal_progress: f64,
    pub risk_level: RiskLevel,
    pub diversification_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsPlan {
    pub years_to_save: u32,
    pub months_to_save: u32,
    pub recommended_monthly_save: f64,
    pub recommended_total_save: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountProgress {
    pub total_saved: f64,
    pub progress_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportSummary {
    pub total_current_savings: f64,
    pub projected_value: f64,
    pub monthly_required: f64,
    pub years_to_goal: u32,
    pub on_track: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportData {
    pub inputs: FinancialInputs,
    pub accounts: Vec<AccountBalance>,
    pub projections: Vec<InvestmentOption>,
    pub summary: ExportSummary,
    pub generated_at: String,
}
