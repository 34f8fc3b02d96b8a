use crate::config::{self, Config};
use crate::{Cli, Command, GroupKey, QueryArgs, SortOrder};
use anyhow::{anyhow, Context, Result};
use geocoding_adapter::GoogleGeocoder;
use json_adapter::JsonPostSource;
use markdown_adapter::MarkdownMapRenderer;
use postgeo_core::application::PipelineService;
use postgeo_core::classifier::KeywordClassifier;
use postgeo_core::domain::Post;
use postgeo_core::ports::Geocoder;
use postgeo_core::query;
use postgeo_core::utils::format_timestamp_to_local;
use sqlite_adapter::SqlitePostRepository;
use std::collections::BTreeMap;
use std::fmt::Display;
use std::time::Duration;
use tracing::{info, warn};

pub fn run(cli: Cli) -> Result<()> {
    let config_path = match cli.config {
        Some(path) => path,
        None => config::default_config_path()?,
    };
    let mut config = config::load(&config_path)?;
    if let Some(database) = cli.database {
        config.storage.database = database;
    }

    // Dependency injection: the service only sees the repository port
    let service = PipelineService::new(Box::new(SqlitePostRepository::new(
        config.storage.database.clone(),
    )));

    match cli.command {
        Command::Collect { input } => collect(&service, input),
        Command::Locate { no_geocoding } => locate(&service, &config, no_geocoding),
        Command::Classify => classify(&service, &config),
        Command::Query(args) => run_query(&service, &args),
        Command::Report { output_dir } => {
            let output_dir = output_dir.unwrap_or(config.report.output_dir);
            service
                .render_maps(&MarkdownMapRenderer::new(output_dir.clone()))
                .map_err(|e| anyhow!(e))
                .context("Failed to render maps")?;
            println!("Rendered maps to {}", output_dir);
            Ok(())
        }
        Command::Show { limit } => {
            let posts = load(&service)?;
            for post in posts.iter().take(limit) {
                println!("{}\n", post);
            }
            println!("{} of {} posts", limit.min(posts.len()), posts.len());
            Ok(())
        }
    }
}

fn load(service: &PipelineService) -> Result<Vec<Post>> {
    service
        .load()
        .map_err(|e| anyhow!(e))
        .context("Failed to load posts")
}

fn collect(service: &PipelineService, input: String) -> Result<()> {
    let source = JsonPostSource::new(input.clone());
    let posts = service
        .collect(&source)
        .map_err(|e| anyhow!(e))
        .with_context(|| format!("Failed to collect posts from {}", input))?;
    let located = posts.iter().filter(|p| p.has_location()).count();
    println!("Collected {} posts ({} with a location)", posts.len(), located);
    Ok(())
}

fn build_geocoder(config: &Config) -> Result<Option<GoogleGeocoder>> {
    let Some(api_key) = config.geocoding_api_key() else {
        warn!("no geocoding API key configured, using place data only");
        return Ok(None);
    };
    let geocoder = GoogleGeocoder::new(
        api_key,
        config.geocoding.endpoint.clone(),
        Duration::from_secs(config.geocoding.timeout_secs),
    )
    .context("Failed to set up the geocoding client")?;
    Ok(Some(geocoder))
}

fn locate(service: &PipelineService, config: &Config, no_geocoding: bool) -> Result<()> {
    let geocoder = if no_geocoding { None } else { build_geocoder(config)? };
    let report = service
        .locate(geocoder.as_ref().map(|g| g as &dyn Geocoder))
        .map_err(|e| anyhow!(e))
        .context("Failed to resolve locations")?;
    println!("Number of posts with location before: {}", report.located_before);
    println!("Number of posts with location after: {}", report.located_after);
    Ok(())
}

fn classify(service: &PipelineService, config: &Config) -> Result<()> {
    let classifier = KeywordClassifier::new(
        &config.classifier.positive_keywords,
        &config.classifier.negative_keywords,
    );
    let count = service
        .classify(&classifier)
        .map_err(|e| anyhow!(e))
        .context("Failed to classify posts")?;
    println!("Classified {} posts", count);
    Ok(())
}

/// Adds the '#' marker to bare tags; empty tags are passed through so the query rejects them
fn normalize_hashtag(tag: &str) -> String {
    let tag = tag.trim();
    if tag.is_empty() || tag.starts_with('#') {
        tag.to_string()
    } else {
        format!("#{}", tag)
    }
}

fn normalize_hashtags(tags: &[String]) -> Vec<String> {
    tags.iter().map(|t| normalize_hashtag(t)).collect()
}

/// Applies every filter given on the command line, then the sort order
pub(crate) fn select<'a>(posts: &'a [Post], args: &QueryArgs) -> Result<Vec<&'a Post>> {
    let mut selected: Vec<&Post> = posts.iter().collect();

    if let Some(tag) = &args.hashtag {
        selected = query::filter_by_hashtag(selected, &normalize_hashtag(tag))?;
    }
    if !args.all_hashtags.is_empty() {
        selected = query::filter_by_hashtags_all(selected, &normalize_hashtags(&args.all_hashtags))?;
    }
    if !args.any_hashtags.is_empty() {
        selected = query::filter_by_hashtags_any(selected, &normalize_hashtags(&args.any_hashtags))?;
    }
    if let Some(before) = args.before {
        selected = query::filter_before(selected, before);
    }
    if let Some(at) = args.at {
        selected = query::filter_at(selected, at);
    }
    if let Some(after) = args.after {
        selected = query::filter_after(selected, after);
    }
    if let [from, to] = args.between[..] {
        selected = query::filter_between(selected, from, to);
    }
    match args.country.as_slice() {
        [] => {}
        [code] => selected = query::filter_by_country_code(selected, code),
        codes => selected = query::filter_by_country_codes(selected, codes),
    }
    match args.continent.as_slice() {
        [] => {}
        [continent] => selected = query::filter_by_continent(selected, *continent),
        continents => selected = query::filter_by_continents(selected, continents),
    }

    Ok(match args.sort {
        Some(SortOrder::Asc) => query::sort_by_date_ascending(selected),
        Some(SortOrder::Desc) => query::sort_by_date_descending(selected),
        None => selected,
    })
}

fn print_groups<K: Display>(groups: BTreeMap<K, Vec<&Post>>) {
    for (key, posts) in &groups {
        println!("{}\t{}", key, posts.len());
    }
}

fn summary_line(post: &Post) -> String {
    let text: String = post.text().lines().next().unwrap_or_default().chars().take(60).collect();
    format!(
        "{}  {:<16} {:<2} {:<13} {:<8} {}",
        format_timestamp_to_local(post.created_at()),
        post.author_handle(),
        post.country_code().map(|c| c.as_str()).unwrap_or("-"),
        post.continent().map(|c| c.name()).unwrap_or("-"),
        post.label(),
        text
    )
}

fn run_query(service: &PipelineService, args: &QueryArgs) -> Result<()> {
    let posts = load(service)?;
    let selected = select(&posts, args)?;
    info!(total = posts.len(), selected = selected.len(), "query finished");

    match args.group_by {
        Some(GroupKey::Country) => print_groups(query::group_by_country_code(selected)),
        Some(GroupKey::Continent) => print_groups(query::group_by_continent(selected)),
        Some(GroupKey::Label) => print_groups(query::group_by_label(selected)),
        None => {
            for post in &selected {
                println!("{}", summary_line(post));
            }
            println!("{} of {} posts", selected.len(), posts.len());
        }
    }
    Ok(())
}
