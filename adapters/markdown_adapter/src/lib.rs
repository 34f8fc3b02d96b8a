use postgeo_core::aggregate::RegionSeries;
use postgeo_core::ports::{MapRenderer, Result};
use postgeo_core::utils::sanitize_filename;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Map renderer writing one markdown count table per series
pub struct MarkdownMapRenderer {
    output_folder: String,
}

impl MarkdownMapRenderer {
    pub fn new(output_folder: String) -> Self {
        Self { output_folder }
    }

    /// Path of the file a map with this title is written to
    pub fn output_path(&self, title: &str) -> PathBuf {
        let name = sanitize_filename(title).replace(' ', "_").to_lowercase();
        Path::new(&self.output_folder).join(format!("{}.md", name))
    }

    /// Formats a single series as a markdown section
    fn format_series(&self, label: &str, regions: &BTreeMap<String, usize>) -> String {
        let mut output = String::new();
        output.push_str(&format!("## {}\n\n", label));

        if regions.is_empty() {
            output.push_str("*[No posts]*\n\n");
            return output;
        }

        output.push_str("| Region | Posts |\n");
        output.push_str("|--------|------:|\n");
        for (region, count) in regions {
            output.push_str(&format!("| {} | {} |\n", region, count));
        }
        let total: usize = regions.values().sum();
        output.push_str(&format!("\n*{} posts*\n\n", total));
        output
    }

    fn format_markdown(&self, title: &str, series: &RegionSeries, per_continent: bool) -> String {
        let mut output = String::new();
        output.push_str(&format!("# {}\n\n", title));
        let projection = if per_continent { "continents" } else { "countries" };
        output.push_str(&format!("*Regions: {}*\n\n", projection));
        output.push_str("---\n\n");

        if series.is_empty() {
            output.push_str("*[No located posts]*\n");
            return output;
        }

        for (label, regions) in series {
            output.push_str(&self.format_series(label, regions));
            output.push_str("---\n\n");
        }
        output
    }
}

impl MapRenderer for MarkdownMapRenderer {
    fn render(&self, title: &str, series: &RegionSeries, per_continent: bool) -> Result<()> {
        // Create output directory if it doesn't exist
        fs::create_dir_all(&self.output_folder)?;

        let file_path = self.output_path(title);
        fs::write(&file_path, self.format_markdown(title, series, per_continent))?;
        info!(path = %file_path.display(), "rendered map");
        Ok(())
    }
}
