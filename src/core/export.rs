use thiserror::Error;

use super::metrics;
use super::types::{
    AccountBalance, AccountType, ExportData, ExportSummary, FinancialInputs, InvestmentOption,
};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to encode CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to finish CSV output: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV output was not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Assembles the full export snapshot. `generated_at` is supplied by the
/// caller so the core stays deterministic.
pub fn build_export(
    inputs: &FinancialInputs,
    accounts: &[AccountBalance],
    projections: &[InvestmentOption],
    generated_at: String,
) -> ExportData {
    let progress = metrics::account_progress(accounts, inputs.goal_amount);
    let projected_value = metrics::best_strategy(projections)
        .and_then(|option| option.projections.last())
        .map(|row| row.value)
        .unwrap_or(0.0);

    ExportData {
        inputs: inputs.clone(),
        accounts: accounts.to_vec(),
        projections: projections.to_vec(),
        summary: ExportSummary {
            total_current_savings: progress.total_saved,
            projected_value,
            monthly_required: inputs.monthly_income * inputs.income_saving_rate,
            years_to_goal: inputs.target_age.saturating_sub(inputs.current_age),
            on_track: projected_value >= inputs.goal_amount,
        },
        generated_at,
    }
}

/// Lossless JSON form; `ExportData` round-trips through this exactly.
pub fn to_json(data: &ExportData) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(data)?)
}

/// Layered spreadsheet report: inputs, accounts, projection checkpoints at
/// years 1/5/10/final, then the summary. Rendering only; JSON is the
/// round-trip format.
pub fn to_csv(data: &ExportData) -> Result<String, ExportError> {
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(Vec::new());

    writer.write_record(["Financial Planning Export"])?;
    write_row(&mut writer, "Generated:", &data.generated_at)?;
    writer.write_record([""])?;

    writer.write_record(["INPUTS"])?;
    write_row(&mut writer, "Goal Amount", &format_amount(data.inputs.goal_amount))?;
    write_row(&mut writer, "Current Age", &data.inputs.current_age.to_string())?;
    write_row(&mut writer, "Target Age", &data.inputs.target_age.to_string())?;
    write_row(
        &mut writer,
        "Initial Investment",
        &format_amount(data.inputs.initial_investment),
    )?;
    write_row(
        &mut writer,
        "Monthly Income",
        &format_amount(data.inputs.monthly_income),
    )?;
    write_row(
        &mut writer,
        "Income Saving Rate",
        &format_rate(data.inputs.income_saving_rate),
    )?;
    write_row(&mut writer, "Growth Rate", &format_rate(data.inputs.growth_rate))?;
    write_row(
        &mut writer,
        "Inflation Rate",
        &format_rate(data.inputs.inflation_rate),
    )?;
    write_row(&mut writer, "Tax Rate", &format_rate(data.inputs.tax_rate))?;
    writer.write_record([""])?;

    writer.write_record(["CURRENT ACCOUNTS"])?;
    writer.write_record(["Account Name", "Balance", "Type"])?;
    for account in &data.accounts {
        let balance = format_amount(account.balance);
        writer.write_record([account.name.as_str(), balance.as_str(), type_label(account)])?;
    }
    writer.write_record([""])?;

    writer.write_record(["PROJECTIONS"])?;
    writer.write_record(["Investment Type", "Year 1", "Year 5", "Year 10", "Final Year"])?;
    for option in &data.projections {
        let year_1 = checkpoint(option, 0);
        let year_5 = checkpoint(option, 4);
        let year_10 = checkpoint(option, 9);
        let final_year = final_checkpoint(option);
        writer.write_record([
            option.name.as_str(),
            year_1.as_str(),
            year_5.as_str(),
            year_10.as_str(),
            final_year.as_str(),
        ])?;
    }
    writer.write_record([""])?;

    writer.write_record(["SUMMARY"])?;
    write_row(
        &mut writer,
        "Total Current Savings",
        &format_amount(data.summary.total_current_savings),
    )?;
    write_row(
        &mut writer,
        "Projected Value",
        &format_amount(data.summary.projected_value),
    )?;
    write_row(
        &mut writer,
        "Monthly Required",
        &format_amount(data.summary.monthly_required),
    )?;
    write_row(
        &mut writer,
        "Years to Goal",
        &data.summary.years_to_goal.to_string(),
    )?;
    write_row(
        &mut writer,
        "On Track",
        if data.summary.on_track { "Yes" } else { "No" },
    )?;

    writer.flush()?;
    let bytes = writer
        .into_inner()
        .map_err(|err| ExportError::Io(err.into_error()))?;
    Ok(String::from_utf8(bytes)?)
}

fn write_row(
    writer: &mut csv::Writer<Vec<u8>>,
    label: &str,
    value: &str,
) -> Result<(), ExportError> {
    writer.write_record([label, value])?;
    Ok(())
}

fn format_amount(amount: f64) -> String {
    format!("{amount:.2}")
}

fn format_rate(rate: f64) -> String {
    format!("{:.1}%", rate * 100.0)
}

fn type_label(account: &AccountBalance) -> &'static str {
    match account.account_type {
        AccountType::Savings => "savings",
        AccountType::Investment => "investment",
        AccountType::Retirement => "retirement",
        AccountType::Emergency => "emergency",
    }
}

fn checkpoint(option: &InvestmentOption, index: usize) -> String {
    option
        .projections
        .get(index)
        .map(|row| format!("{:.2}", row.value))
        .unwrap_or_else(|| "0".to_string())
}

fn final_checkpoint(option: &InvestmentOption) -> String {
    option
        .projections
        .last()
        .map(|row| format!("{:.2}", row.value))
        .unwrap_or_else(|| "0".to_string())
}
