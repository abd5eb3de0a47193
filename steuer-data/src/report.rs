//! Plain-text rendering of calculation results.

use std::fmt::Write;

use rust_decimal::{Decimal, RoundingStrategy};
use steuer_core::calculations::common::round_half_up;
use steuer_core::calculations::{ScenarioComparison, ScenarioOutcome};
use steuer_core::{CalculationResult, DeductionImpact, TaxYearConstants};

/// Formats an amount as euros with thousands separators, e.g. `€1,234.56`.
pub fn format_currency(amount: Decimal) -> String {
    let mut rounded = round_half_up(amount);
    rounded.rescale(2);

    let digits = rounded.abs().to_string();
    let (whole, cents) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}€{grouped}.{cents}")
}

/// Formats a fractional rate as a percentage with one decimal, e.g. `42.0%`.
pub fn format_percent(rate: Decimal) -> String {
    let mut pct = (rate * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
    pct.rescale(1);
    format!("{pct}%")
}

/// The overview block for one calculation.
pub fn render_result(result: &CalculationResult) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "German tax & social security overview ({})",
        result.tax_year
    );
    row(&mut out, "Filing status", result.filing_status.label());
    row(&mut out, "Gross income", &format_currency(result.gross_annual_income));

    let _ = writeln!(out, "\nSocial security contributions:");
    row(
        &mut out,
        "Health insurance (Krankenversicherung)",
        &format_currency(result.health_insurance_contribution),
    );
    row(
        &mut out,
        "Pension insurance (Rentenversicherung)",
        &format_currency(result.pension_contribution),
    );
    row(
        &mut out,
        "Unemployment insurance (Arbeitslosenvers.)",
        &format_currency(result.unemployment_contribution),
    );
    row(
        &mut out,
        "Long-term care (Pflegeversicherung)",
        &format_currency(result.long_term_care_contribution),
    );
    row(
        &mut out,
        "Total social security",
        &format_currency(result.total_social_contributions),
    );

    let _ = writeln!(out, "\nTax calculation:");
    let deduction_label = if result.used_itemized_deductions {
        "Work expenses (itemized)"
    } else {
        "Work expenses (flat allowance)"
    };
    row(&mut out, deduction_label, &format_currency(result.deduction_applied));
    if result.child_allowances > Decimal::ZERO {
        row(
            &mut out,
            "Child allowances (Kinderfreibetrag)",
            &format_currency(result.child_allowances),
        );
    }
    row(&mut out, "Taxable income", &format_currency(result.taxable_income));
    row(&mut out, "Income tax", &format_currency(result.income_tax));
    row(
        &mut out,
        "Solidarity surcharge",
        &format_currency(result.solidarity_surcharge),
    );
    row(&mut out, "Church tax", &format_currency(result.church_tax));
    row(&mut out, "Total tax liability", &format_currency(result.total_taxes));

    let _ = writeln!(out, "\nSummary:");
    row(
        &mut out,
        "Total deductions (tax + social)",
        &format_currency(result.total_burden()),
    );
    row(&mut out, "Marginal tax rate", &format_percent(result.marginal_rate));
    row(&mut out, "Effective tax rate", &format_percent(result.effective_rate));
    row(&mut out, "Net income", &format_currency(result.net_annual_income));

    let notes = notes(result);
    if !notes.is_empty() {
        let _ = writeln!(out, "\nNotes:");
        for note in notes {
            let _ = writeln!(out, "  - {note}");
        }
    }

    out
}

fn row(
    out: &mut String,
    label: &str,
    value: &str,
) {
    let _ = writeln!(out, "  {label:<44}{value:>16}");
}

fn notes(result: &CalculationResult) -> Vec<&'static str> {
    let mut notes = Vec::new();
    if result.health_insurance_estimated {
        notes.push("Private health insurance is a flat premium estimate.");
    }
    if result.long_term_care_surcharge_applied {
        notes.push("Long-term care includes the childless surcharge (age not considered).");
    }
    if result.net_annual_income < Decimal::ZERO {
        notes.push("Contributions exceed income; net income is negative.");
    }
    notes
}

/// Summary of an extra deduction's effect.
pub fn render_deduction_impact(impact: &DeductionImpact) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Potential tax savings from deductions:");
    row(
        &mut out,
        "Additional deduction",
        &format_currency(impact.additional_deduction),
    );
    row(&mut out, "Estimated tax savings", &format_currency(impact.tax_savings));
    row(
        &mut out,
        "Effective savings rate",
        &format_percent(impact.effective_savings_rate),
    );
    row(
        &mut out,
        "Marginal-rate estimate",
        &format_currency(impact.marginal_estimate),
    );
    row(
        &mut out,
        "Net income with deduction",
        &format_currency(impact.with_deduction.net_annual_income),
    );
    out
}

/// One row per scenario, baseline first.
pub fn render_comparison(comparison: &ScenarioComparison) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<28}{:>16}{:>16}{:>16}",
        "Scenario", "Total taxes", "Net income", "Net change"
    );

    let rows = std::iter::once(&comparison.baseline).chain(comparison.variants.iter());
    for outcome in rows {
        let _ = writeln!(out, "{}", comparison_row(outcome));
    }

    let _ = writeln!(out, "\nBest: {}", comparison.best().label);
    out
}

fn comparison_row(outcome: &ScenarioOutcome) -> String {
    let delta = format_currency(outcome.net_income_delta);
    let delta = if outcome.net_income_delta > Decimal::ZERO {
        format!("+{delta}")
    } else {
        delta
    };
    format!(
        "{:<28}{:>16}{:>16}{:>16}",
        outcome.label,
        format_currency(outcome.result.total_taxes),
        format_currency(outcome.result.net_annual_income),
        delta
    )
}

/// Listing of one year's constants.
pub fn render_constants(constants: &TaxYearConstants) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Tax year {}", constants.tax_year);
    let _ = writeln!(out, "\nIncome tax schedule (single):");
    for bracket in &constants.brackets {
        let upper = bracket
            .upper_bound
            .map_or_else(|| "and above".to_string(), format_currency);
        let _ = writeln!(
            out,
            "  {:>16} - {:<16}{:>8}",
            format_currency(bracket.lower_bound),
            upper,
            format_percent(bracket.rate)
        );
    }

    let _ = writeln!(out, "\nAllowances:");
    let _ = writeln!(out, "  Basic allowance: {}", format_currency(constants.basic_allowance));
    let _ = writeln!(
        out,
        "  Basic allowance (joint): {}",
        format_currency(constants.basic_allowance_married)
    );
    let _ = writeln!(
        out,
        "  Work expense allowance: {}",
        format_currency(constants.work_expense_allowance)
    );
    let _ = writeln!(out, "  Child allowance: {}", format_currency(constants.child_allowance));

    let _ = writeln!(out, "\nSurcharges:");
    let _ = writeln!(
        out,
        "  Solidarity surcharge: {} above {}",
        format_percent(constants.solidarity_surcharge_rate),
        format_currency(constants.solidarity_surcharge_threshold)
    );
    let _ = writeln!(out, "  Church tax: {}", format_percent(constants.church_tax_rate));

    let _ = writeln!(out, "\nSocial contributions (employee share):");
    for kind in steuer_core::ContributionKind::ALL {
        let contribution = constants.contribution(kind);
        let _ = writeln!(
            out,
            "  {}: {} up to {}",
            kind,
            format_percent(contribution.rate),
            format_currency(contribution.ceiling)
        );
    }
    let _ = writeln!(
        out,
        "  Private health premium: {}",
        format_currency(constants.private_health_premium)
    );
    let _ = writeln!(
        out,
        "  Childless care surcharge: {}",
        format_percent(constants.long_term_care_childless_surcharge)
    );
    out
}
