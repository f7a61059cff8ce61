//! Aging & Profit Report CLI
//!
//! Loads the pipeline workbook, computes aging and profit per project, and
//! prints the summaries, the detail table or a month's rows, or exports the
//! enriched table.

use aging_profit_report::{
    export::{export_to_path, ExportFormat},
    summary::{aging_summary, filter_by_month, profit_by_project, valid_months},
    EnrichedProject, ProjectEntry, ReportConfig, ReportRunner, TransactionMonth, WorkbookRepository,
};
use anyhow::{anyhow, Context, Result};
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "aging-profit-report",
    version,
    about = "Project aging and profit report over the pipeline workbook"
)]
struct Cli {
    /// JSON configuration file
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    /// Source workbook (overrides the config file)
    #[arg(long, value_name = "PATH", global = true)]
    source: Option<PathBuf>,

    /// Tax rate as a fraction, e.g. 0.11
    #[arg(long, global = true)]
    tax_rate: Option<f64>,

    /// Measure open projects up to this date instead of today
    #[arg(long, value_name = "YYYY-MM-DD", global = true)]
    today: Option<NaiveDate>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Aging summary and profit per project
    Summary,

    /// Every project with its derived fields
    Detail,

    /// List transaction months, or show one month's profit rows
    Months {
        /// Month to show, as YYYY-MM
        #[arg(long)]
        month: Option<String>,
    },

    /// Write the enriched table to a spreadsheet
    Export {
        /// Destination file (defaults to the configured export path)
        #[arg(long, value_name = "PATH")]
        output: Option<PathBuf>,

        /// Output format (defaults to the destination's extension)
        #[arg(long, value_enum)]
        format: Option<FormatArg>,
    },

    /// Check a manual project entry against the loaded costs (not saved)
    Entry(EntryArgs),
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Xlsx,
    Csv,
}

impl From<FormatArg> for ExportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Xlsx => ExportFormat::Xlsx,
            FormatArg::Csv => ExportFormat::Csv,
        }
    }
}

#[derive(Args)]
struct EntryArgs {
    #[arg(long)]
    sales_name: String,

    #[arg(long, value_name = "YYYY-MM-DD")]
    date_register: NaiveDate,

    #[arg(long)]
    customer: String,

    #[arg(long)]
    project_name: String,

    #[arg(long)]
    product_type: String,

    #[arg(long, default_value_t = 1)]
    quantity: u32,

    /// Unit price including tax
    #[arg(long)]
    unit_price: f64,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ReportConfig::from_json_path(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ReportConfig::default(),
    };
    if let Some(source) = &cli.source {
        config.source_path = source.clone();
    }
    if let Some(rate) = cli.tax_rate {
        config.tax_rate = rate;
    }
    config.validate()?;

    let now = cli
        .today
        .map(|d| d.and_time(NaiveTime::MIN))
        .unwrap_or_else(|| Local::now().naive_local());

    let mut repository = WorkbookRepository::from_config(&config);
    let source = repository.path().to_path_buf();
    let dataset = repository
        .load()
        .with_context(|| format!("Failed to load {}", source.display()))?;
    let runner = ReportRunner::from_dataset(dataset, config.tax_rate);

    match cli.command {
        Command::Summary => {
            let records = runner.run(dataset.projects.clone(), now);
            print_summary(&records);
        }
        Command::Detail => {
            let records = runner.run(dataset.projects.clone(), now);
            print_detail(&records);
        }
        Command::Months { month } => {
            let records = runner.run(dataset.projects.clone(), now);
            print_months(&records, month.as_deref())?;
        }
        Command::Export { output, format } => {
            let records = runner.run(dataset.projects.clone(), now);
            let path = output.unwrap_or_else(|| config.export_path.clone());
            let format = format.map_or_else(|| ExportFormat::from_path(&path), ExportFormat::from);
            export_to_path(&records, &path, format)?;
            println!("Exported {} rows to {}", records.len(), path.display());
        }
        Command::Entry(args) => {
            let entry = ProjectEntry {
                sales_name: args.sales_name,
                date_register: args.date_register,
                customer: args.customer,
                project_name: args.project_name,
                product_type: args.product_type,
                quantity: args.quantity,
                unit_price: args.unit_price,
            };
            let record = entry.validate()?;
            let records = runner.run(vec![record], now);
            print_detail(&records);
            println!("\nEntry is valid. It was not saved (no persistent store is configured).");
        }
    }

    Ok(())
}

fn money(v: Option<f64>) -> String {
    v.map_or_else(|| "-".to_string(), |v| format!("{:.2}", v))
}

fn percent(v: Option<f64>) -> String {
    v.map_or_else(|| "-".to_string(), |v| format!("{:.2}%", v))
}

fn date(v: Option<NaiveDateTime>) -> String {
    v.map_or_else(|| "-".to_string(), |d| d.format("%Y-%m-%d").to_string())
}

fn print_summary(records: &[EnrichedProject]) {
    println!("Project Aging Summary");
    println!("{:<12} {:>10}", "Category", "Projects");
    println!("{}", "-".repeat(23));
    for row in aging_summary(records) {
        println!("{:<12} {:>10}", row.category.as_str(), row.count);
    }

    println!("\nProfit per Project");
    println!("{:<30} {:>16} {:>16} {:>16} {:>9}",
        "Project Name", "Net Sale", "Acquisition", "Profit", "Profit %");
    println!("{}", "-".repeat(91));
    for row in profit_by_project(records) {
        println!("{:<30} {:>16} {:>16} {:>16} {:>9}",
            row.project_name,
            money(row.net_total_sale),
            money(row.total_acquisition_cost),
            money(row.profit_value),
            percent(row.profit_percent),
        );
    }
}

fn print_detail(records: &[EnrichedProject]) {
    println!("{:<16} {:<11} {:<11} {:<24} {:<16} {:>6} {:>14} {:>6} {:<11} {:>14} {:>9} {:<8}",
        "Sales", "Registered", "Closed", "Project", "Product", "QTY", "Unit Price",
        "Days", "Aging", "Profit", "Profit %", "Status");
    println!("{}", "-".repeat(161));
    for r in records {
        let p = &r.project;
        println!("{:<16} {:<11} {:<11} {:<24} {:<16} {:>6} {:>14} {:>6} {:<11} {:>14} {:>9} {:<8}",
            p.sales_name,
            date(p.date_register),
            date(p.closing_date),
            p.project_name,
            p.product_type,
            p.quantity.map_or_else(|| "-".to_string(), |q| q.to_string()),
            money(p.unit_price),
            r.aging.days.map_or_else(|| "-".to_string(), |d| d.to_string()),
            r.aging.category.as_str(),
            money(r.profit.profit_value),
            percent(r.profit.profit_percent),
            r.aging.highlight.as_str(),
        );
    }
}

fn print_months(records: &[EnrichedProject], month: Option<&str>) -> Result<()> {
    let Some(key) = month else {
        let months = valid_months(records);
        if months.is_empty() {
            println!("No valid transaction months.");
        } else {
            println!("Transaction months:");
            for m in months {
                println!("  {}", m);
            }
        }
        return Ok(());
    };

    let month = TransactionMonth::parse(key)
        .ok_or_else(|| anyhow!("Invalid month '{}', expected YYYY-MM", key))?;
    let rows = filter_by_month(records, month);

    println!("Profit for {} ({} projects)", month, rows.len());
    println!("{:<30} {:>16} {:>16} {:>16} {:>9}",
        "Project Name", "Net Sale", "Acquisition", "Profit", "Profit %");
    println!("{}", "-".repeat(91));
    for r in rows {
        println!("{:<30} {:>16} {:>16} {:>16} {:>9}",
            r.project.project_name,
            money(r.profit.net_total_sale),
            money(r.profit.total_acquisition_cost),
            money(r.profit.profit_value),
            percent(r.profit.profit_percent),
        );
    }
    Ok(())
}
