mod commands;
mod config;

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use postgeo_core::continent::Continent;
use postgeo_core::domain::CountryCode;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Collects social-media posts, resolves where they were sent from, labels them and maps the counts
#[derive(Parser, Debug)]
#[command(name = "postgeo")]
#[command(about = "Collects posts, resolves their location, labels them and renders per-region counts")]
struct Cli {
    /// Path to the configuration file (default: ~/.config/postgeo/config.toml)
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// SQLite database holding the post collection (overrides the config)
    #[arg(short = 'd', long = "database")]
    database: Option<String>,

    /// Log debug events
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Import raw posts from a JSON export and store them
    Collect {
        /// Path to the JSON export of the social-media API
        #[arg(short = 'i', long = "input", required = true)]
        input: String,
    },
    /// Resolve missing locations, geocoding author locations when an API key is configured
    Locate {
        /// Only use place data, even when an API key is configured
        #[arg(long = "no-geocoding")]
        no_geocoding: bool,
    },
    /// Label every unlabeled post
    Classify,
    /// Filter, sort and group the stored posts
    Query(QueryArgs),
    /// Render per-country and per-continent maps
    Report {
        /// Folder the maps are written to (overrides the config)
        #[arg(short = 'o', long = "output-dir")]
        output_dir: Option<String>,
    },
    /// Print stored posts
    Show {
        /// Number of posts to print
        #[arg(short = 'n', long = "limit", default_value_t = 10)]
        limit: usize,
    },
}

#[derive(Args, Debug)]
struct QueryArgs {
    /// Keep posts with this hashtag ('#' is added when missing)
    #[arg(long = "hashtag")]
    hashtag: Option<String>,

    /// Keep posts with all of these hashtags (comma separated)
    #[arg(long = "all-hashtags", value_delimiter = ',')]
    all_hashtags: Vec<String>,

    /// Keep posts with any of these hashtags (comma separated)
    #[arg(long = "any-hashtags", value_delimiter = ',')]
    any_hashtags: Vec<String>,

    /// Keep posts created strictly before this time
    #[arg(long = "before", value_parser = parse_time)]
    before: Option<DateTime<Utc>>,

    /// Keep posts created exactly at this time
    #[arg(long = "at", value_parser = parse_time)]
    at: Option<DateTime<Utc>>,

    /// Keep posts created strictly after this time
    #[arg(long = "after", value_parser = parse_time)]
    after: Option<DateTime<Utc>>,

    /// Keep posts created in this inclusive range
    #[arg(long = "between", num_args = 2, value_names = ["FROM", "TO"], value_parser = parse_time)]
    between: Vec<DateTime<Utc>>,

    /// Keep posts from these country codes (comma separated)
    #[arg(long = "country", value_delimiter = ',', value_parser = parse_country)]
    country: Vec<CountryCode>,

    /// Keep posts from these continents (comma separated)
    #[arg(long = "continent", value_delimiter = ',')]
    continent: Vec<Continent>,

    /// Sort by creation time
    #[arg(long = "sort", value_enum)]
    sort: Option<SortOrder>,

    /// Print group sizes instead of posts
    #[arg(long = "group-by", value_enum)]
    group_by: Option<GroupKey>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum SortOrder {
    Asc,
    Desc,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum GroupKey {
    Country,
    Continent,
    Label,
}

fn parse_time(value: &str) -> Result<DateTime<Utc>, String> {
    postgeo_core::utils::parse_timestamp(value).map_err(|e| e.to_string())
}

fn parse_country(value: &str) -> Result<CountryCode, String> {
    CountryCode::parse(value.trim()).ok_or_else(|| format!("invalid country code: {:?}", value))
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()))
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = commands::run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_query_arguments() {
        let cli = Cli::try_parse_from([
            "postgeo",
            "query",
            "--any-hashtags",
            "#corona,covid",
            "--between",
            "2020-04-19 18:00:00",
            "2020-04-19T19:00:00Z",
            "--country",
            "us,GB",
            "--continent",
            "Europe,north_america",
            "--sort",
            "desc",
            "--group-by",
            "continent",
        ])
        .unwrap();

        let Command::Query(args) = cli.command else {
            panic!("expected query command");
        };
        assert_eq!(args.any_hashtags, ["#corona", "covid"]);
        assert_eq!(args.between.len(), 2);
        assert_eq!(args.country.iter().map(|c| c.as_str()).collect::<Vec<_>>(), ["US", "GB"]);
        assert_eq!(args.continent, [Continent::Europe, Continent::NorthAmerica]);
        assert_eq!(args.sort, Some(SortOrder::Desc));
        assert_eq!(args.group_by, Some(GroupKey::Continent));
    }

    #[test]
    fn test_rejects_invalid_country() {
        assert!(Cli::try_parse_from(["postgeo", "query", "--country", "USA"]).is_err());
    }

    #[test]
    fn test_collect_requires_input() {
        assert!(Cli::try_parse_from(["postgeo", "collect"]).is_err());
    }
}
