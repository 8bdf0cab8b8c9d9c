//! Plain-text and YAML reports of projected scenarios

use std::fmt;

use color_eyre::eyre::eyre;
use retirement_core::{ProjectionIndex, ScenarioSummary};

/// Yearly totals of one scenario as an aligned table.
pub struct SummaryTable<'a>(pub &'a ScenarioSummary);

impl fmt::Display for SummaryTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let summary = self.0;
        writeln!(f, "{} ({})", summary.name, summary.id)?;
        writeln!(
            f,
            "{:>6} {:>14} {:>14} {:>14} {:>14} {:>14} {:>14}",
            "Year", "Income", "Expenses", "Net", "Assets", "Liabilities", "Net worth"
        )?;
        for year in &summary.years {
            writeln!(
                f,
                "{:>6} {:>14} {:>14} {:>14} {:>14} {:>14} {:>14}",
                year.year,
                year.income.round_dp(2),
                year.expenses.round_dp(2),
                year.net.round_dp(2),
                year.assets.round_dp(2),
                year.liabilities.round_dp(2),
                year.net_worth.round_dp(2),
            )?;
        }
        if summary.warnings > 0 || summary.risks > 0 {
            writeln!(
                f,
                "{} skipped period(s), {} compatibility risk(s)",
                summary.warnings, summary.risks
            )?;
        }
        Ok(())
    }
}

/// Category totals and every instance paid in one year.
pub struct YearDetail<'a> {
    pub index: &'a ProjectionIndex,
    pub year: i16,
}

impl fmt::Display for YearDetail<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} by category", self.year)?;
        for (category, total) in self.index.category_totals(self.year) {
            writeln!(f, "  {category:<28} {:>14}", total.round_dp(2))?;
        }
        writeln!(f, "{} payments", self.year)?;
        for instance in self
            .index
            .instances()
            .iter()
            .filter(|i| i.payment_year() == self.year)
        {
            writeln!(
                f,
                "  {} {:<20} {:<20} {:>14} {:>14}{}",
                instance.payment_date,
                instance.source_id,
                instance.category,
                instance.amount.round_dp(2),
                instance.running_balance.round_dp(2),
                if instance.historical { "  (history)" } else { "" },
            )?;
        }
        Ok(())
    }
}

/// Skipped periods and same-stage dependencies, one per line.
pub struct Diagnostics<'a>(pub &'a ProjectionIndex);

impl fmt::Display for Diagnostics<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for warning in self.0.warnings() {
            writeln!(f, "warning: {warning}")?;
        }
        for risk in self.0.risks() {
            writeln!(f, "risk: {risk}")?;
        }
        Ok(())
    }
}

pub fn to_yaml(summaries: &[ScenarioSummary]) -> color_eyre::Result<String> {
    serde_saphyr::to_string(&summaries).map_err(|e| eyre!("Failed to serialize report: {e}"))
}
