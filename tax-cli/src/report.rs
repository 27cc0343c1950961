//! Rendering a [`ComparisonResult`] for people.
//!
//! [`Report`] bundles the raw result with the strings derived from it: the
//! summary rows, the toggle descriptions and the advantage message. It renders
//! as plain text through [`Display`](fmt::Display) and as JSON through serde.

use std::fmt;

use rust_decimal::Decimal;
use serde::Serialize;
use tax_core::{
    Advantage, ComparisonResult, CreditEligibility, EmploymentStatus, JurisdictionConfig,
    LineItem,
};

use crate::format::{
    bracket_range_label, format_currency, format_effective_rate, format_percent, format_share,
};

/// Shown in place of a breakdown that has no lines.
pub const EMPTY_BREAKDOWN: &str = "No tax owed in this bracket.";

/// Title and explanation for one of the two switches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToggleDescription {
    pub title: String,
    pub detail: String,
}

/// Describes the insurance switch for its current state.
pub fn insurance_toggle(
    include_insurance: bool,
    status: EmploymentStatus,
) -> ToggleDescription {
    let (title, detail) = match (status, include_insurance) {
        (EmploymentStatus::SelfEmployed, true) => (
            "EI premiums included (optional)",
            "Self-employed can optionally register for EI special benefits.",
        ),
        (EmploymentStatus::SelfEmployed, false) => (
            "EI premiums excluded",
            "Most self-employed doctors do not opt into EI.",
        ),
        (EmploymentStatus::Employee, true) => (
            "EI premiums included",
            "Disable if the physician is EI-exempt (e.g., incorporated owner-manager).",
        ),
        (EmploymentStatus::Employee, false) => (
            "EI premiums excluded",
            "Enable if EI premiums should be part of the personal tax projection.",
        ),
    };

    ToggleDescription {
        title: title.to_string(),
        detail: detail.to_string(),
    }
}

/// Describes the employment switch, quoting the configured pension maximum
/// and employment credit.
pub fn employment_toggle(
    status: EmploymentStatus,
    config: &JurisdictionConfig,
) -> ToggleDescription {
    let max_contribution = format_currency(config.pension.rule_for(status).max_total());

    match status {
        EmploymentStatus::SelfEmployed => ToggleDescription {
            title: "Self-employed (unincorporated)".to_string(),
            detail: format!(
                "Pays both employee + employer CPP ({max_contribution} max), no employment credit."
            ),
        },
        EmploymentStatus::Employee => {
            let credit = config
                .federal
                .credits
                .iter()
                .find(|rule| rule.eligibility == CreditEligibility::EmployeesOnly)
                .map(|rule| rule.amount.amount_for(Decimal::ZERO));

            let detail = match credit {
                Some(amount) => format!(
                    "Pays only employee CPP ({max_contribution} max), gets {} employment credit.",
                    format_currency(amount)
                ),
                None => format!("Pays only employee CPP ({max_contribution} max)."),
            };

            ToggleDescription {
                title: "Employee or incorporated".to_string(),
                detail,
            }
        }
    }
}

/// The verdict line and its explanation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdvantageMessage {
    pub headline: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

pub fn advantage_message(advantage: &Advantage) -> AdvantageMessage {
    match *advantage {
        Advantage::NoIncome => AdvantageMessage {
            headline: "Enter an income amount to see tax comparison".to_string(),
            detail: None,
        },
        Advantage::Corporate {
            amount,
            share_of_income,
        } => {
            let amount = format_currency(amount);
            AdvantageMessage {
                headline: format!("Corporate structure provides a tax advantage of {amount}"),
                detail: Some(format!(
                    "You save {amount} by incorporating ({}% of gross income)",
                    format_share(share_of_income)
                )),
            }
        }
        Advantage::Personal {
            amount,
            share_of_income,
        } => {
            let amount = format_currency(amount);
            AdvantageMessage {
                headline: format!(
                    "Personal income structure provides a tax advantage of {amount}"
                ),
                detail: Some(format!(
                    "You save {amount} by remaining unincorporated ({}% of gross income)",
                    format_share(share_of_income)
                )),
            }
        }
    }
}

/// One rendered breakdown row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BreakdownRow {
    pub label: String,
    pub value: String,
}

/// Renders bracket and flat-rate lines as `15% on $55,867 = $8,380` and
/// credit lines as the signed credit, noting the amount the credit is based on.
pub fn breakdown_rows(lines: &[LineItem]) -> Vec<BreakdownRow> {
    lines
        .iter()
        .map(|line| match line {
            LineItem::Bracket {
                min_income,
                max_income,
                amount,
                rate,
                tax,
            } => BreakdownRow {
                label: bracket_range_label(*min_income, *max_income),
                value: format!(
                    "{} on {} = {}",
                    format_percent(*rate),
                    format_currency(*amount),
                    format_currency(*tax)
                ),
            },
            LineItem::Flat {
                label,
                amount,
                rate,
                tax,
            } => BreakdownRow {
                label: label.clone(),
                value: format!(
                    "{} on {} = {}",
                    format_percent(*rate),
                    format_currency(*amount),
                    format_currency(*tax)
                ),
            },
            LineItem::Credit { label, amount, tax } => {
                let label = if amount.is_zero() {
                    label.clone()
                } else {
                    format!("{label} ({} applied)", format_currency(*amount))
                };
                BreakdownRow {
                    label,
                    value: format_currency(*tax),
                }
            }
        })
        .collect()
}

/// Headline figures of both scenarios.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub personal_tax: String,
    pub personal_rate: String,
    pub personal_federal: String,
    pub personal_provincial: String,
    pub personal_pension: String,
    pub personal_insurance: String,
    pub corporate_tax: String,
    pub corporate_rate: String,
    pub corporate_corporate_tax: String,
    pub corporate_personal_tax: String,
}

impl Summary {
    pub fn new(result: &ComparisonResult) -> Self {
        let personal = &result.personal;
        let corporate = &result.corporate;

        Self {
            personal_tax: format_currency(personal.total_tax),
            personal_rate: format!(
                "{} effective rate",
                format_effective_rate(personal.effective_rate)
            ),
            personal_federal: format_currency(personal.federal_tax()),
            personal_provincial: format_currency(personal.provincial_tax()),
            personal_pension: format_currency(personal.contributions.total),
            personal_insurance: format_currency(personal.insurance),
            corporate_tax: format_currency(corporate.total_tax),
            corporate_rate: format!(
                "{} effective rate",
                format_effective_rate(corporate.effective_rate)
            ),
            corporate_corporate_tax: format_currency(corporate.corporate_tax),
            corporate_personal_tax: format_currency(corporate.salary_tax()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toggles {
    pub insurance: ToggleDescription,
    pub employment: ToggleDescription,
}

/// Everything shown after a recalculation.
#[derive(Debug, Clone, Serialize)]
pub struct Report<'a> {
    #[serde(skip)]
    provincial_name: &'a str,
    pub comparison: &'a ComparisonResult,
    pub summary: Summary,
    pub toggles: Toggles,
    pub advantage: AdvantageMessage,
}

impl<'a> Report<'a> {
    pub fn new(
        config: &'a JurisdictionConfig,
        result: &'a ComparisonResult,
    ) -> Self {
        let status = result.options.employment_status;

        Self {
            provincial_name: &config.provincial.name,
            comparison: result,
            summary: Summary::new(result),
            toggles: Toggles {
                insurance: insurance_toggle(result.options.include_insurance, status),
                employment: employment_toggle(status, config),
            },
            advantage: advantage_message(&result.advantage),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    fn write_personal(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let personal = &self.comparison.personal;

        writeln!(f, "Personal income ({})", self.toggles.employment.title)?;
        write_row(f, "Gross income", &format_currency(personal.gross_income))?;
        write_row(f, "Federal tax", &format_currency(personal.federal_tax()))?;
        write_row(
            f,
            &format!("{} tax", self.provincial_name),
            &format_currency(personal.provincial_tax()),
        )?;
        write_row(f, "CPP contributions", &format_currency(personal.contributions.total))?;
        write_row(f, "EI premiums", &format_currency(personal.insurance))?;
        write_row(f, "Total tax", &format_currency(personal.total_tax))?;
        write_row(f, "Net income", &format_currency(personal.net_income))?;
        write_row(f, "Effective rate", &format_effective_rate(personal.effective_rate))?;

        write_breakdown(f, "Federal breakdown", &personal.federal.breakdown)?;
        write_breakdown(
            f,
            &format!("{} breakdown", self.provincial_name),
            &personal.provincial.breakdown,
        )
    }

    fn write_corporate(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let corporate = &self.comparison.corporate;
        let salary = &corporate.salary_taxation;

        writeln!(f, "Small-business corporation")?;
        write_row(f, "Gross income", &format_currency(corporate.gross_income))?;
        write_row(f, "Corporate tax", &format_currency(corporate.corporate_tax))?;
        write_row(f, "After-tax income", &format_currency(corporate.after_tax_income))?;
        write_row(f, "Salary", &format_currency(corporate.salary))?;
        write_row(f, "Tax on salary", &format_currency(corporate.salary_tax()))?;
        write_row(f, "Retained earnings", &format_currency(corporate.retained_earnings))?;
        write_row(f, "Total tax", &format_currency(corporate.total_tax))?;
        write_row(f, "Net income", &format_currency(corporate.net_income))?;
        write_row(f, "Effective rate", &format_effective_rate(corporate.effective_rate))?;

        write_breakdown(f, "Corporate tax breakdown", &corporate.breakdown)?;
        write_breakdown(f, "Salary federal breakdown", &salary.federal.breakdown)?;
        write_breakdown(
            f,
            &format!("Salary {} breakdown", self.provincial_name),
            &salary.provincial.breakdown,
        )
    }

    fn write_summary(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let summary = &self.summary;

        writeln!(f, "Summary")?;
        writeln!(
            f,
            "  Personal:  {} ({})",
            summary.personal_tax, summary.personal_rate
        )?;
        writeln!(
            f,
            "    Federal {}, {} {}, CPP {}, EI {}",
            summary.personal_federal,
            self.provincial_name,
            summary.personal_provincial,
            summary.personal_pension,
            summary.personal_insurance
        )?;
        writeln!(
            f,
            "  Corporate: {} ({})",
            summary.corporate_tax, summary.corporate_rate
        )?;
        writeln!(
            f,
            "    Corporate tax {}, personal tax on salary {}",
            summary.corporate_corporate_tax, summary.corporate_personal_tax
        )
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        self.write_personal(f)?;
        writeln!(f)?;
        self.write_corporate(f)?;
        writeln!(f)?;
        self.write_summary(f)?;
        writeln!(f)?;

        writeln!(f, "Options")?;
        for toggle in [&self.toggles.insurance, &self.toggles.employment] {
            writeln!(f, "  {}: {}", toggle.title, toggle.detail)?;
        }
        writeln!(f)?;

        writeln!(f, "{}", self.advantage.headline)?;
        if let Some(detail) = &self.advantage.detail {
            writeln!(f, "{detail}")?;
        }
        Ok(())
    }
}

fn write_row(
    f: &mut fmt::Formatter<'_>,
    label: &str,
    value: &str,
) -> fmt::Result {
    writeln!(f, "  {label:<20}{value:>14}")
}

fn write_breakdown(
    f: &mut fmt::Formatter<'_>,
    title: &str,
    lines: &[LineItem],
) -> fmt::Result {
    writeln!(f, "  {title}")?;

    let rows = breakdown_rows(lines);
    if rows.is_empty() {
        return writeln!(f, "    {EMPTY_BREAKDOWN}");
    }

    let width = rows.iter().map(|row| row.label.len()).max().unwrap_or(0);
    for row in rows {
        writeln!(f, "    {:<width$}  {}", row.label, row.value)?;
    }
    Ok(())
}
