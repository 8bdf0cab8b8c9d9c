use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use jiff::civil::Date;
use retirement::report::to_yaml;
use retirement::{Diagnostics, SummaryTable, YearDetail, init_logging, load_scenarios};
use retirement_core::{ScenarioSummary, project_all};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Yaml,
}

#[derive(Parser, Debug)]
#[command(name = "retirement")]
#[command(about = "Project household cash flows, balances and net worth")]
struct Args {
    /// Scenario files (YAML or JSON)
    #[arg(required = true)]
    scenarios: Vec<PathBuf>,

    /// Project from this date instead of each scenario's as-of date
    #[arg(long)]
    as_of: Option<Date>,

    /// Also list every payment of this year
    #[arg(short, long)]
    year: Option<i16>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Log level (debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    init_logging(&args.log_level)?;

    let scenarios = load_scenarios(&args.scenarios, args.as_of)?;
    let summaries = project_all(&scenarios)
        .into_iter()
        .collect::<Result<Vec<ScenarioSummary>, _>>()?;

    match args.format {
        OutputFormat::Yaml => print!("{}", to_yaml(&summaries)?),
        OutputFormat::Table => {
            for (scenario, summary) in scenarios.iter().zip(&summaries) {
                println!("{}", SummaryTable(summary));
                let index = scenario.index()?;
                if let Some(year) = args.year {
                    println!("{}", YearDetail { index, year });
                }
                eprint!("{}", Diagnostics(index));
            }
        }
    }

    tracing::info!(scenarios = summaries.len(), "Projection finished");
    Ok(())
}
