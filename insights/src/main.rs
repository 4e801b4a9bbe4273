use anyhow::Context;
use clap::{Arg, ArgMatches, Command};
use common::config::Settings;
use std::process;

const DEFAULT_CONFIG: &str = "config/insights.toml";

fn config_arg() -> Arg {
    Arg::new("config")
        .short('c')
        .long("config")
        .value_name("FILE")
        .help("Sets a custom config file [default: config/insights.toml]")
}

fn config_path(matches: &ArgMatches) -> &str {
    matches
        .get_one::<String>("config")
        .map_or(DEFAULT_CONFIG, String::as_str)
}

fn cli() -> Command {
    Command::new("Restaurant Insights")
        .version("0.1.0")
        .about("Cleans, enriches and aggregates a restaurant dataset into analytical views")
        .subcommand(
            Command::new("run")
                .about("Run the pipeline and export every view")
                .arg(config_arg()),
        )
        .subcommand(
            Command::new("check")
                .about("Load and validate the configuration only")
                .arg(config_arg()),
        )
}

fn load_settings(path: &str) -> anyhow::Result<Settings> {
    Settings::new(path).with_context(|| format!("loading configuration from {path}"))
}

async fn run(path: &str) -> anyhow::Result<()> {
    let settings = load_settings(path)?;
    insights::logging::init_tracing(&settings.logging)?;

    let summary = insights::run_insights_pipeline(&settings)
        .await
        .context("insights pipeline failed")?;

    println!(
        "Run {} finished: {} input rows, {} in snapshot, {} excluded",
        summary.run_id,
        summary.input_rows,
        summary.snapshot_rows,
        summary.excluded_rows()
    );
    for view in &summary.views {
        println!("  {:<22} {:>7} rows {:>7} dropped", view.view, view.rows, view.dropped);
    }
    Ok(())
}

fn check(path: &str) -> anyhow::Result<()> {
    let settings = load_settings(path)?;
    println!(
        "Configuration OK: restaurants={} countries={} output={} ({:?})",
        settings.source.restaurants_path,
        settings.source.countries_path,
        settings.output.dir,
        settings.output.format
    );
    Ok(())
}

#[tokio::main]
async fn main() {
    let matches = cli().get_matches();

    let result = match matches.subcommand() {
        Some(("run", sub)) => run(config_path(sub)).await,
        Some(("check", sub)) => check(config_path(sub)),
        _ => {
            println!("No subcommand specified. Use --help for usage information.");
            process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path_for(args: &[&str]) -> String {
        let matches = cli().try_get_matches_from(args).unwrap();
        let (_, sub) = matches.subcommand().unwrap();
        config_path(sub).to_string()
    }

    #[test]
    fn config_defaults_to_the_shipped_file() {
        assert_eq!(path_for(&["insights-cli", "run"]), DEFAULT_CONFIG);
        assert_eq!(path_for(&["insights-cli", "check"]), DEFAULT_CONFIG);
    }

    #[test]
    fn config_flag_overrides_the_default() {
        assert_eq!(path_for(&["insights-cli", "run", "--config", "alt.toml"]), "alt.toml");
        assert_eq!(path_for(&["insights-cli", "check", "-c", "other.toml"]), "other.toml");
    }
}
