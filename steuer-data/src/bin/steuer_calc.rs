use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use serde::Serialize;
use steuer_core::calculations::{analyze_deduction_impact, compare_filing_statuses};
use steuer_core::{
    CalculationRequest, FilingStatus, InsuranceType, TaxYearTable, calculate_with_table,
    dependents_from_signed,
};
use steuer_data::report::{
    render_comparison, render_constants, render_deduction_impact, render_result,
};
use steuer_data::{ConstantsLoader, init_logging, requests};
use tracing::info;

/// German income tax and social contribution calculator.
///
/// Uses the built-in tax-year tables unless `--constants` points at a TOML
/// file (optionally with a bracket CSV via `--brackets`).
#[derive(Parser, Debug)]
#[command(name = "steuer-calc")]
#[command(version, about, long_about = None)]
struct Cli {
    /// TOML file with tax-year constants
    #[arg(short, long, global = true)]
    constants: Option<PathBuf>,

    /// CSV file with bracket schedules (columns: tax_year,lower_bound,upper_bound,rate)
    #[arg(short, long, global = true, requires = "constants")]
    brackets: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, global = true, default_value_t = false)]
    json: bool,

    /// Log calculation details to stderr
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Full breakdown for one filer
    Calculate(RequestArgs),

    /// Tax saved by an additional work-expense deduction
    Savings {
        #[command(flatten)]
        request: RequestArgs,

        /// Extra deduction amount in euros
        #[arg(long)]
        additional: Decimal,
    },

    /// Same income under different filing statuses
    Compare {
        #[command(flatten)]
        request: RequestArgs,

        /// Statuses to compare against (default: all others)
        #[arg(long, value_delimiter = ',')]
        statuses: Vec<FilingStatus>,
    },

    /// Every request in a CSV file
    Batch {
        /// Request CSV file
        #[arg(short, long)]
        file: PathBuf,

        /// Tax year for rows without one (default: latest available)
        #[arg(long)]
        year: Option<i32>,
    },

    /// Show the constants for a tax year
    Constants {
        /// Tax year (default: latest available)
        #[arg(long)]
        year: Option<i32>,
    },
}

#[derive(Args, Debug)]
struct RequestArgs {
    /// Gross annual income in euros
    #[arg(short, long)]
    income: Decimal,

    /// single, married_joint, married_separate, head_of_household, qualifying_widow
    #[arg(short = 's', long, default_value = "single")]
    status: FilingStatus,

    /// Number of dependent children
    #[arg(short, long, default_value_t = 0, allow_negative_numbers = true)]
    dependents: i64,

    /// statutory or private
    #[arg(long, default_value = "statutory")]
    insurance: InsuranceType,

    /// Has children (no long-term-care surcharge); implied by --dependents
    #[arg(long, default_value_t = false)]
    children: bool,

    /// Actual work expenses in euros
    #[arg(long, default_value = "0")]
    itemized: Decimal,

    /// Church member (Kirchensteuer)
    #[arg(long, default_value_t = false)]
    church: bool,

    /// Tax year (default: latest available)
    #[arg(short, long)]
    year: Option<i32>,
}

impl RequestArgs {
    fn to_request(
        &self,
        table: &TaxYearTable,
    ) -> Result<CalculationRequest> {
        let year = resolve_year(self.year, table)?;
        let dependents = dependents_from_signed(self.dependents)?;
        let request = CalculationRequest::new(self.income, year)
            .with_filing_status(self.status)
            .with_insurance_type(self.insurance)
            .with_dependents(dependents)
            .with_itemized_deductions(self.itemized)
            .with_church_tax(self.church);
        Ok(if self.children {
            request.with_children(true)
        } else {
            request
        })
    }
}

fn resolve_year(
    year: Option<i32>,
    table: &TaxYearTable,
) -> Result<i32> {
    match (year, table.latest()) {
        (Some(year), _) => Ok(year),
        (None, Some(latest)) => Ok(latest.tax_year),
        (None, None) => bail!("no tax years available"),
    }
}

/// Statuses to compare against; every other status when none were asked for.
fn comparison_statuses(
    requested: &[FilingStatus],
    current: FilingStatus,
) -> Vec<FilingStatus> {
    if requested.is_empty() {
        FilingStatus::ALL
            .into_iter()
            .filter(|status| *status != current)
            .collect()
    } else {
        requested.to_vec()
    }
}

fn load_table(cli: &Cli) -> Result<TaxYearTable> {
    match &cli.constants {
        Some(path) => ConstantsLoader::load_table(path, cli.brackets.as_deref())
            .with_context(|| format!("Failed to load constants: {}", path.display())),
        None => Ok(TaxYearTable::builtin()),
    }
}

fn emit<T: Serialize>(
    json: bool,
    value: &T,
    render: impl FnOnce(&T) -> String,
) -> Result<()> {
    if json {
        let text = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
        println!("{text}");
    } else {
        print!("{}", render(value));
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let table = load_table(&cli)?;

    match &cli.command {
        Command::Calculate(args) => {
            let request = args.to_request(&table)?;
            let result = calculate_with_table(&request, &table).context("Calculation failed")?;
            emit(cli.json, &result, render_result)
        }
        Command::Savings {
            request,
            additional,
        } => {
            let request = request.to_request(&table)?;
            let constants = table.get(request.tax_year)?;
            let impact = analyze_deduction_impact(&request, *additional, constants)
                .context("Savings estimate failed")?;
            emit(cli.json, &impact, render_deduction_impact)
        }
        Command::Compare { request, statuses } => {
            let request = request.to_request(&table)?;
            let constants = table.get(request.tax_year)?;
            let statuses = comparison_statuses(statuses, request.filing_status);
            let comparison = compare_filing_statuses(&request, &statuses, constants)
                .context("Comparison failed")?;
            emit(cli.json, &comparison, render_comparison)
        }
        Command::Batch { file, year } => {
            let default_year = resolve_year(*year, &table)?;
            let batch = requests::load_from_file(file, default_year)
                .with_context(|| format!("Failed to load requests: {}", file.display()))?;
            info!(requests = batch.len(), file = %file.display(), "loaded request batch");

            let results = batch
                .iter()
                .enumerate()
                .map(|(idx, request)| {
                    calculate_with_table(request, &table)
                        .with_context(|| format!("Calculation failed for row {}", idx + 1))
                })
                .collect::<Result<Vec<_>>>()?;

            emit(cli.json, &results, |results| {
                results
                    .iter()
                    .map(render_result)
                    .collect::<Vec<_>>()
                    .join("\n")
            })
        }
        Command::Constants { year } => {
            let year = resolve_year(*year, &table)?;
            let constants = table.get(year)?;
            emit(cli.json, constants, render_constants)
        }
    }
}
