use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use serde::Serialize;
use sip_taste::{
    compute_personality_label, top_drinks_by_category, CategoryTopDrinks, DrinkLogEntry,
    TasteBreakdownItem, TasteSignature,
};
use std::fmt::Write as _;
use std::io::{Read, Write};
use std::path::Path;
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod config;

use config::CliConfig;

/// Log filter when `RUST_LOG` is unset
const DEFAULT_LOG_FILTER: &str = "info";

fn cli() -> Command {
    Command::new("sip")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Sipline taste profiles")
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .help("TOML configuration file"),
        )
        .subcommand(
            Command::new("label")
                .about("Print the personality label of a taste breakdown")
                .arg(
                    Arg::new("input")
                        .long("input")
                        .required(true)
                        .help("Breakdown JSON file, or - for stdin"),
                ),
        )
        .subcommand(
            Command::new("signature")
                .about("Compute the taste signature of a drink log")
                .arg(
                    Arg::new("input")
                        .long("input")
                        .required(true)
                        .help("Drink log JSON file, or - for stdin"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output as JSON"),
                ),
        )
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();

    let matches = cli().get_matches();
    let stdout = std::io::stdout();
    run(&matches, &mut stdout.lock())
}

fn run(matches: &ArgMatches, out: &mut impl Write) -> Result<()> {
    let config = match matches.get_one::<String>("config") {
        Some(path) => CliConfig::load(Path::new(path))?,
        None => CliConfig::default(),
    };
    debug!(?config, "configuration loaded");

    match matches.subcommand() {
        Some(("label", args)) => {
            let input = read_input(input_arg(args)?)?;
            let breakdown: Vec<TasteBreakdownItem> =
                serde_json::from_str(&input).context("parsing breakdown JSON")?;
            writeln!(out, "{}", compute_personality_label(&breakdown))?;
        }
        Some(("signature", args)) => {
            let input = read_input(input_arg(args)?)?;
            let entries: Vec<DrinkLogEntry> =
                serde_json::from_str(&input).context("parsing drink log JSON")?;
            debug!(entries = entries.len(), "drink log read");

            let report = SignatureReport {
                signature: TasteSignature::from_entries(&entries),
                top_drinks: top_drinks_by_category(
                    &entries,
                    config.taste.top_drinks_per_category,
                ),
            };

            if args.get_flag("json") {
                serde_json::to_writer_pretty(&mut *out, &report)?;
                writeln!(out)?;
            } else {
                write!(out, "{}", report.render_text()?)?;
            }
        }
        _ => {}
    }
    Ok(())
}

fn input_arg(args: &ArgMatches) -> Result<&str> {
    args.get_one::<String>("input")
        .map(String::as_str)
        .context("missing --input")
}

fn read_input(source: &str) -> Result<String> {
    if source == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("reading stdin")?;
        return Ok(buf);
    }
    std::fs::read_to_string(source).with_context(|| format!("reading {source}"))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SignatureReport {
    signature: TasteSignature,
    top_drinks: Vec<CategoryTopDrinks>,
}

impl SignatureReport {
    fn render_text(&self) -> Result<String> {
        let mut text = String::new();
        writeln!(text, "Personality: {}", self.signature.personality_label)?;
        writeln!(text, "Total drinks: {}", self.signature.total_drinks)?;

        if !self.signature.is_empty() {
            writeln!(text, "\nBreakdown:")?;
            for item in &self.signature.breakdown {
                let appearance = item.category.appearance(&[]);
                writeln!(
                    text,
                    "  {} {:<12} {:>4} {:>5.0}%  avg {:.1}",
                    appearance.icon, appearance.label, item.count, item.percentage, item.avg_rating
                )?;
            }
        }

        if !self.top_drinks.is_empty() {
            writeln!(text, "\nTop drinks:")?;
            for group in &self.top_drinks {
                let names: Vec<String> = group
                    .top_drinks
                    .iter()
                    .map(|d| format!("{} ({:.1})", d.name, d.rating))
                    .collect();
                writeln!(
                    text,
                    "  {}: {}",
                    group.category.appearance(&[]).label,
                    names.join(", ")
                )?;
            }
        }
        Ok(text)
    }
}
