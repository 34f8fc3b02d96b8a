use crate::aggregate::RegionSeries;
use crate::domain::{AddressComponent, Label, Post, RawPost};
use crate::error::GeocodeError;
use std::error::Error;

pub type Result<T> = std::result::Result<T, Box<dyn Error + Send + Sync>>;

/// Delivers raw posts from the upstream social-media API or an export of it
pub trait PostSource {
    fn fetch_posts(&self) -> Result<Vec<RawPost>>;
}

/// Persists post collections between pipeline stages
pub trait PostRepository {
    /// Replaces the stored collection with `posts`
    fn save_posts(&self, posts: &[Post]) -> Result<()>;
    fn load_posts(&self) -> Result<Vec<Post>>;
}

/// Turns a free-text location into ranked address components.
///
/// `Ok(None)` means the provider found nothing.
pub trait Geocoder: Send + Sync {
    fn geocode(&self, query: &str) -> std::result::Result<Option<Vec<AddressComponent>>, GeocodeError>;
}

/// Assigns one label per (preprocessed) text
pub trait TextClassifier {
    fn predict(&self, texts: &[String]) -> Result<Vec<Label>>;
}

/// Draws a world map from grouped region counts
pub trait MapRenderer {
    fn render(&self, title: &str, series: &RegionSeries, per_continent: bool) -> Result<()>;
}
