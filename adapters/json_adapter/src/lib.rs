use postgeo_core::domain::{RawAuthor, RawPlace, RawPost};
use postgeo_core::ports::{PostSource, Result};
use postgeo_core::utils::parse_timestamp;
use serde::Deserialize;
use std::fs;

#[derive(Debug, Deserialize)]
struct StatusJson {
    #[serde(alias = "text")]
    full_text: String,
    user: UserJson,
    #[serde(default)]
    entities: EntitiesJson,
    created_at: String,
    #[serde(default)]
    place: Option<PlaceJson>,
}

#[derive(Debug, Deserialize)]
struct UserJson {
    name: String,
    screen_name: String,
    #[serde(default)]
    location: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct EntitiesJson {
    #[serde(default)]
    hashtags: Vec<HashtagJson>,
}

#[derive(Debug, Deserialize)]
struct HashtagJson {
    text: String,
}

#[derive(Debug, Deserialize)]
struct PlaceJson {
    #[serde(default)]
    country_code: Option<String>,
}

impl StatusJson {
    fn into_raw(self) -> Result<RawPost> {
        Ok(RawPost {
            full_text: self.full_text,
            author: RawAuthor {
                name: self.user.name,
                screen_name: self.user.screen_name,
                // Profiles without a location come through as ""
                location: self.user.location.filter(|l| !l.trim().is_empty()),
            },
            hashtags: self.entities.hashtags.into_iter().map(|h| h.text).collect(),
            created_at: parse_timestamp(&self.created_at)?,
            place: self.place.map(|p| RawPlace {
                country_code: p.country_code,
            }),
        })
    }
}

/// Parses a JSON array of status objects
pub fn parse_posts(json: &str) -> Result<Vec<RawPost>> {
    let statuses: Vec<StatusJson> = serde_json::from_str(json)?;
    statuses.into_iter().map(StatusJson::into_raw).collect()
}

/// PostSource reading a JSON export from disk
pub struct JsonPostSource {
    input_file: String,
}

impl JsonPostSource {
    pub fn new(input_file: String) -> Self {
        Self { input_file }
    }
}

impl PostSource for JsonPostSource {
    fn fetch_posts(&self) -> Result<Vec<RawPost>> {
        let content = fs::read_to_string(&self.input_file)?;
        parse_posts(&content)
    }
}
