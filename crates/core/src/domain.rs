use crate::continent::Continent;
use crate::error::LabelError;
use crate::location;
use crate::ports::Geocoder;
use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// ISO 3166-1 alpha-2 country code, always two uppercase ASCII letters
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CountryCode(String);

impl CountryCode {
    /// Returns `None` unless `raw` is exactly two ASCII letters
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.len() == 2 && raw.chars().all(|c| c.is_ascii_alphabetic()) {
            Some(Self(raw.to_ascii_uppercase()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CountryCode {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        CountryCode::parse(&value).ok_or_else(|| format!("invalid country code: {:?}", value))
    }
}

impl From<CountryCode> for String {
    fn from(code: CountryCode) -> Self {
        code.0
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

/// Classification outcome. `Positive` marks a denier, `Negative` an acceptor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Positive,
    Negative,
    #[default]
    Unknown,
}

impl Label {
    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Positive => "positive",
            Label::Negative => "negative",
            Label::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Label {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "positive" | "denier" => Ok(Label::Positive),
            "negative" | "acceptor" => Ok(Label::Negative),
            "unknown" => Ok(Label::Unknown),
            other => Err(format!("unknown label: {}", other)),
        }
    }
}

/// Raw post as delivered by a [`crate::ports::PostSource`]
#[derive(Debug, Clone, PartialEq)]
pub struct RawPost {
    pub full_text: String,
    pub author: RawAuthor,
    /// Bare tag text, without the leading '#'
    pub hashtags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub place: Option<RawPlace>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawAuthor {
    pub name: String,
    pub screen_name: String,
    /// Free-text location from the author's profile
    pub location: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawPlace {
    pub country_code: Option<String>,
}

/// One component of a geocoding result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressComponent {
    #[serde(default)]
    pub long_name: String,
    pub short_name: String,
    #[serde(default)]
    pub types: Vec<String>,
}

impl AddressComponent {
    pub fn is_country(&self) -> bool {
        self.types.iter().any(|t| t == "country")
    }
}

/// Location hints kept from the raw post for later resolution
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationHints {
    pub place_country_code: Option<String>,
    pub user_location: Option<String>,
}

/// All stored fields of a post, used to rebuild one from persistence
#[derive(Debug, Clone, PartialEq)]
pub struct PostFields {
    pub text: String,
    pub author_name: String,
    pub author_handle: String,
    pub hashtags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub country_code: Option<CountryCode>,
    pub continent: Option<Continent>,
    pub label: Label,
    pub hints: LocationHints,
}

/// A social-media post with its derived location and label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    text: String,
    author_name: String,
    author_handle: String,
    hashtags: Vec<String>,
    created_at: DateTime<Utc>,
    pub(crate) country_code: Option<CountryCode>,
    pub(crate) continent: Option<Continent>,
    label: Label,
    hints: LocationHints,
}

impl Post {
    /// Builds a post from raw source data and resolves its location.
    ///
    /// Creation times keep whole seconds only.
    /// Pass `None` as geocoder to rely on the post's place data only.
    pub fn new(raw: RawPost, geocoder: Option<&dyn Geocoder>) -> Self {
        let mut post = Self {
            text: raw.full_text,
            author_name: raw.author.name,
            author_handle: format!("@{}", raw.author.screen_name),
            hashtags: raw.hashtags.iter().map(|tag| format!("#{}", tag)).collect(),
            created_at: raw.created_at.trunc_subsecs(0),
            country_code: None,
            continent: None,
            label: Label::Unknown,
            hints: LocationHints {
                place_country_code: raw.place.and_then(|place| place.country_code),
                user_location: raw.author.location,
            },
        };
        location::resolve_location(&mut post, geocoder);
        post
    }

    /// Rebuilds a stored post. A continent without a country code is dropped.
    pub fn restore(fields: PostFields) -> Self {
        let continent = fields.country_code.as_ref().and(fields.continent);
        Self {
            text: fields.text,
            author_name: fields.author_name,
            author_handle: fields.author_handle,
            hashtags: fields.hashtags,
            created_at: fields.created_at.trunc_subsecs(0),
            country_code: fields.country_code,
            continent,
            label: fields.label,
            hints: fields.hints,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn author_name(&self) -> &str {
        &self.author_name
    }

    pub fn author_handle(&self) -> &str {
        &self.author_handle
    }

    pub fn hashtags(&self) -> &[String] {
        &self.hashtags
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn country_code(&self) -> Option<&CountryCode> {
        self.country_code.as_ref()
    }

    pub fn continent(&self) -> Option<Continent> {
        self.continent
    }

    pub fn label(&self) -> Label {
        self.label
    }

    pub fn hints(&self) -> &LocationHints {
        &self.hints
    }

    /// True when both country code and continent are known
    pub fn has_location(&self) -> bool {
        self.country_code.is_some() && self.continent.is_some()
    }

    pub fn has_hashtag(&self, hashtag: &str) -> bool {
        self.hashtags.iter().any(|h| h == hashtag)
    }

    /// True when every given hashtag is present
    pub fn has_hashtags<S: AsRef<str>>(&self, hashtags: &[S]) -> bool {
        hashtags.iter().all(|h| self.has_hashtag(h.as_ref()))
    }

    /// True when at least one given hashtag is present
    pub fn has_any_hashtag<S: AsRef<str>>(&self, hashtags: &[S]) -> bool {
        hashtags.iter().any(|h| self.has_hashtag(h.as_ref()))
    }

    /// Orders two posts by creation time
    pub fn cmp_by_date(&self, other: &Post) -> Ordering {
        self.created_at.cmp(&other.created_at)
    }

    /// Sets the label once. A post that already carries a known label is left untouched.
    pub fn assign_label(&mut self, label: Label) -> Result<(), LabelError> {
        if self.label != Label::Unknown {
            return Err(LabelError::AlreadyAssigned {
                handle: self.author_handle.clone(),
            });
        }
        self.label = label;
        Ok(())
    }

    pub fn is_positive(&self) -> bool {
        self.label == Label::Positive
    }

    pub fn is_negative(&self) -> bool {
        self.label == Label::Negative
    }

    pub fn is_unknown(&self) -> bool {
        self.label == Label::Unknown
    }
}

fn or_none<T: fmt::Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "None".to_string())
}

impl fmt::Display for Post {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.text)?;
        writeln!(f, "  Author:\t{}", self.author_name)?;
        writeln!(f, "  Username:\t{}", self.author_handle)?;
        writeln!(f, "  Created at:\t{}", self.created_at.format("%Y-%m-%d %H:%M:%S %Z"))?;
        writeln!(f, "  Hashtags:\t{}", self.hashtags.join(" "))?;
        writeln!(f, "  Country code:\t{}", or_none(self.country_code.as_ref()))?;
        writeln!(f, "  Continent:\t{}", or_none(self.continent))?;
        write!(f, "  Label:\t{}", self.label)
    }
}
