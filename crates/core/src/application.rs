use crate::aggregate::{count_per_continent, count_per_country, count_per_country_per_continent};
use crate::classifier::apply_labels;
use crate::domain::Post;
use crate::location::resolve_location;
use crate::ports::{Geocoder, MapRenderer, PostRepository, PostSource, Result, TextClassifier};
use crate::preprocess::Preprocessor;
use tracing::info;

/// Posts with a full location before and after a [`PipelineService::locate`] run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocationReport {
    pub total: usize,
    pub located_before: usize,
    pub located_after: usize,
}

/// Application service driving the pipeline stages over a stored collection
pub struct PipelineService {
    repository: Box<dyn PostRepository>,
}

impl PipelineService {
    /// Creates a new PipelineService backed by the given repository
    pub fn new(repository: Box<dyn PostRepository>) -> Self {
        Self { repository }
    }

    pub fn load(&self) -> Result<Vec<Post>> {
        self.repository.load_posts()
    }

    /// Fetches raw posts, builds posts from their place data and stores them
    pub fn collect(&self, source: &dyn PostSource) -> Result<Vec<Post>> {
        let posts: Vec<Post> = source
            .fetch_posts()?
            .into_iter()
            .map(|raw| Post::new(raw, None))
            .collect();
        self.repository.save_posts(&posts)?;
        info!(count = posts.len(), "collected posts");
        Ok(posts)
    }

    /// Fills in missing locations, optionally geocoding author locations
    pub fn locate(&self, geocoder: Option<&dyn Geocoder>) -> Result<LocationReport> {
        let mut posts = self.repository.load_posts()?;
        let located_before = posts.iter().filter(|p| p.has_location()).count();
        for post in posts.iter_mut() {
            resolve_location(post, geocoder);
        }
        let located_after = posts.iter().filter(|p| p.has_location()).count();
        self.repository.save_posts(&posts)?;

        let report = LocationReport {
            total: posts.len(),
            located_before,
            located_after,
        };
        info!(
            total = report.total,
            before = report.located_before,
            after = report.located_after,
            "resolved locations"
        );
        Ok(report)
    }

    /// Labels every post that is still unlabeled; returns how many were sent to the classifier
    pub fn classify(&self, classifier: &dyn TextClassifier) -> Result<usize> {
        let mut posts = self.repository.load_posts()?;
        let pending: Vec<&mut Post> = posts.iter_mut().filter(|p| p.is_unknown()).collect();
        if pending.is_empty() {
            return Ok(0);
        }

        let texts: Vec<String> = pending.iter().map(|p| p.text().to_string()).collect();
        let labels = classifier.predict(&Preprocessor::new().preprocess_corpus(&texts))?;
        let count = pending.len();
        apply_labels(pending, &labels)?;

        self.repository.save_posts(&posts)?;
        info!(count, "classified posts");
        Ok(count)
    }

    /// Renders the per-country-per-continent, per-country and per-continent maps
    pub fn render_maps(&self, renderer: &dyn MapRenderer) -> Result<()> {
        let posts = self.repository.load_posts()?;
        renderer.render(
            "Absolute number of posts per country and per continent",
            &count_per_country_per_continent(&posts),
            false,
        )?;
        renderer.render(
            "Absolute number of posts per country",
            &count_per_country(&posts),
            false,
        )?;
        renderer.render(
            "Absolute number of posts per continent",
            &count_per_continent(&posts),
            true,
        )?;
        Ok(())
    }
}
