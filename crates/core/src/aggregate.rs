use crate::domain::Post;
use std::collections::BTreeMap;

/// Series label → region key → number of posts
pub type RegionSeries = BTreeMap<String, BTreeMap<String, usize>>;

pub const WORLD: &str = "World";

fn count<'a, F>(posts: impl IntoIterator<Item = &'a Post>, mut keys: F) -> RegionSeries
where
    F: FnMut(&Post) -> Option<(String, String)>,
{
    let mut series = RegionSeries::new();
    for post in posts.into_iter().filter(|p| p.has_location()) {
        if let Some((label, region)) = keys(post) {
            *series.entry(label).or_default().entry(region).or_default() += 1;
        }
    }
    series
}

/// One series per continent, counting posts per lowercase country code
pub fn count_per_country_per_continent<'a>(posts: impl IntoIterator<Item = &'a Post>) -> RegionSeries {
    count(posts, |p| {
        Some((
            p.continent()?.name().to_string(),
            p.country_code()?.as_str().to_ascii_lowercase(),
        ))
    })
}

/// A single "World" series counting posts per lowercase country code
pub fn count_per_country<'a>(posts: impl IntoIterator<Item = &'a Post>) -> RegionSeries {
    count(posts, |p| {
        Some((WORLD.to_string(), p.country_code()?.as_str().to_ascii_lowercase()))
    })
}

/// A single "World" series counting posts per continent slug
pub fn count_per_continent<'a>(posts: impl IntoIterator<Item = &'a Post>) -> RegionSeries {
    count(posts, |p| Some((WORLD.to_string(), p.continent()?.slug().to_string())))
}
