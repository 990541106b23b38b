use super::types::{
    AccountBalance, AccountProgress, AccountType, DashboardMetrics, FinancialInputs,
    InvestmentOption, RiskLevel, SavingsPlan,
};

/// Case-sensitive substring that designates the benchmark strategy; when no
/// option matches, the first option stands in.
const BEST_STRATEGY_KEY: &str = "Index Fund";

/// Derives the dashboard KPIs from the current accounts and the projection
/// output. Every divide-by-zero path resolves to a defined sentinel.
pub fn aggregate(
    accounts: &[AccountBalance],
    projections: &[InvestmentOption],
    inputs: &FinancialInputs,
) -> DashboardMetrics {
    let total_balance = total_balance(accounts);

    // First-year-only approximation of monthly growth, by design.
    let monthly_growth = best_strategy(projections)
        .and_then(|option| option.projections.first())
        .map(|first_year| (first_year.value - inputs.initial_investment) / 12.0)
        .unwrap_or(0.0);

    let goal_progress = if inputs.goal_amount > 0.0 {
        total_balance / inputs.goal_amount * 100.0
    } else {
        0.0
    };

    DashboardMetrics {
        total_balance,
        monthly_growth,
        goal_progress,
        risk_level: risk_level(accounts, total_balance),
        diversification_score: diversification_score(accounts),
    }
}

pub(crate) fn best_strategy(projections: &[InvestmentOption]) -> Option<&InvestmentOption> {
    projections
        .iter()
        .find(|option| option.name.contains(BEST_STRATEGY_KEY))
        .or_else(|| projections.first())
}

fn total_balance(accounts: &[AccountBalance]) -> f64 {
    accounts.iter().map(|account| account.balance).sum()
}

fn risk_level(accounts: &[AccountBalance], total_balance: f64) -> RiskLevel {
    let invested: f64 = accounts
        .iter()
        .filter(|account| account.account_type.is_growth_oriented())
        .map(|account| account.balance)
        .sum();

    let investment_ratio = if total_balance > 0.0 {
        invested / total_balance
    } else {
        0.0
    };

    if investment_ratio > 0.7 {
        RiskLevel::High
    } else if investment_ratio > 0.4 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

/// Coverage over the four account categories, independent of balance weights.
/// Zero-balance accounts still count toward coverage.
fn diversification_score(accounts: &[AccountBalance]) -> f64 {
    let mut seen = [false; AccountType::ALL.len()];
    for account in accounts {
        seen[account.account_type as usize] = true;
    }
    let distinct = seen.iter().filter(|present| **present).count();
    distinct as f64 / AccountType::ALL.len() as f64 * 100.0
}

/// How much the user should be putting aside to stay on schedule.
pub fn savings_plan(inputs: &FinancialInputs) -> SavingsPlan {
    let years_to_save = inputs.target_age.saturating_sub(inputs.current_age);
    let months_to_save = years_to_save * 12;
    let recommended_monthly_save = inputs.monthly_income * inputs.income_saving_rate;

    SavingsPlan {
        years_to_save,
        months_to_save,
        recommended_monthly_save,
        recommended_total_save: recommended_monthly_save * months_to_save as f64,
    }
}

/// Progress of current balances toward the goal. Unlike the dashboard's
/// `goal_progress`, this figure is capped at 100 for display.
pub fn account_progress(accounts: &[AccountBalance], goal_amount: f64) -> AccountProgress {
    let total_saved = total_balance(accounts);
    let progress_percentage = if goal_amount > 0.0 {
        (total_saved / goal_amount * 100.0).min(100.0)
    } else {
        0.0
    };

    AccountProgress {
        total_saved,
        progress_percentage,
    }
}
