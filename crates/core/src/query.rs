use crate::continent::Continent;
use crate::domain::{CountryCode, Label, Post};
use crate::error::QueryError;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

fn check_hashtag(hashtag: &str) -> Result<(), QueryError> {
    if hashtag.is_empty() {
        return Err(QueryError::EmptyHashtag);
    }
    Ok(())
}

fn check_hashtags<S: AsRef<str>>(hashtags: &[S]) -> Result<(), QueryError> {
    if hashtags.is_empty() {
        return Err(QueryError::EmptyHashtagList);
    }
    hashtags.iter().try_for_each(|h| check_hashtag(h.as_ref()))
}

/// Posts carrying `hashtag` (marker included, case-sensitive)
pub fn filter_by_hashtag<'a>(
    posts: impl IntoIterator<Item = &'a Post>,
    hashtag: &str,
) -> Result<Vec<&'a Post>, QueryError> {
    check_hashtag(hashtag)?;
    Ok(posts.into_iter().filter(|p| p.has_hashtag(hashtag)).collect())
}

/// Posts carrying every one of `hashtags`
pub fn filter_by_hashtags_all<'a, S: AsRef<str>>(
    posts: impl IntoIterator<Item = &'a Post>,
    hashtags: &[S],
) -> Result<Vec<&'a Post>, QueryError> {
    check_hashtags(hashtags)?;
    Ok(posts.into_iter().filter(|p| p.has_hashtags(hashtags)).collect())
}

/// Posts carrying at least one of `hashtags`, each post listed once
pub fn filter_by_hashtags_any<'a, S: AsRef<str>>(
    posts: impl IntoIterator<Item = &'a Post>,
    hashtags: &[S],
) -> Result<Vec<&'a Post>, QueryError> {
    check_hashtags(hashtags)?;
    Ok(posts
        .into_iter()
        .filter(|p| p.has_any_hashtag(hashtags))
        .collect())
}

pub fn filter_before<'a>(posts: impl IntoIterator<Item = &'a Post>, before: DateTime<Utc>) -> Vec<&'a Post> {
    posts.into_iter().filter(|p| p.created_at() < before).collect()
}

pub fn filter_at<'a>(posts: impl IntoIterator<Item = &'a Post>, at: DateTime<Utc>) -> Vec<&'a Post> {
    posts.into_iter().filter(|p| p.created_at() == at).collect()
}

pub fn filter_after<'a>(posts: impl IntoIterator<Item = &'a Post>, after: DateTime<Utc>) -> Vec<&'a Post> {
    posts.into_iter().filter(|p| p.created_at() > after).collect()
}

/// Posts created in `[after, before]`; an inverted range matches nothing
pub fn filter_between<'a>(
    posts: impl IntoIterator<Item = &'a Post>,
    after: DateTime<Utc>,
    before: DateTime<Utc>,
) -> Vec<&'a Post> {
    posts
        .into_iter()
        .filter(|p| after <= p.created_at() && p.created_at() <= before)
        .collect()
}

pub fn filter_by_country_code<'a>(
    posts: impl IntoIterator<Item = &'a Post>,
    country_code: &CountryCode,
) -> Vec<&'a Post> {
    posts
        .into_iter()
        .filter(|p| p.country_code() == Some(country_code))
        .collect()
}

pub fn filter_by_country_codes<'a>(
    posts: impl IntoIterator<Item = &'a Post>,
    country_codes: &[CountryCode],
) -> Vec<&'a Post> {
    posts
        .into_iter()
        .filter(|p| p.country_code().is_some_and(|code| country_codes.contains(code)))
        .collect()
}

pub fn filter_by_continent<'a>(posts: impl IntoIterator<Item = &'a Post>, continent: Continent) -> Vec<&'a Post> {
    posts
        .into_iter()
        .filter(|p| p.continent() == Some(continent))
        .collect()
}

pub fn filter_by_continents<'a>(
    posts: impl IntoIterator<Item = &'a Post>,
    continents: &[Continent],
) -> Vec<&'a Post> {
    posts
        .into_iter()
        .filter(|p| p.continent().is_some_and(|c| continents.contains(&c)))
        .collect()
}

/// Oldest first; posts with equal timestamps keep their input order
pub fn sort_by_date_ascending<'a>(posts: impl IntoIterator<Item = &'a Post>) -> Vec<&'a Post> {
    let mut sorted: Vec<&Post> = posts.into_iter().collect();
    sorted.sort_by(|a, b| a.cmp_by_date(b));
    sorted
}

/// Newest first; posts with equal timestamps keep their input order
pub fn sort_by_date_descending<'a>(posts: impl IntoIterator<Item = &'a Post>) -> Vec<&'a Post> {
    let mut sorted: Vec<&Post> = posts.into_iter().collect();
    sorted.sort_by(|a, b| b.cmp_by_date(a));
    sorted
}

fn group_by<'a, K: Ord>(
    posts: impl IntoIterator<Item = &'a Post>,
    key: impl Fn(&Post) -> Option<K>,
) -> BTreeMap<K, Vec<&'a Post>> {
    let mut groups: BTreeMap<K, Vec<&Post>> = BTreeMap::new();
    for post in posts {
        if let Some(k) = key(post) {
            groups.entry(k).or_default().push(post);
        }
    }
    groups
}

/// Posts without a country code are left out
pub fn group_by_country_code<'a>(posts: impl IntoIterator<Item = &'a Post>) -> BTreeMap<CountryCode, Vec<&'a Post>> {
    group_by(posts, |p| p.country_code().cloned())
}

/// Posts without a continent are left out
pub fn group_by_continent<'a>(posts: impl IntoIterator<Item = &'a Post>) -> BTreeMap<Continent, Vec<&'a Post>> {
    group_by(posts, |p| p.continent())
}

/// Splits deniers (`Positive`) from acceptors (`Negative`); unlabeled posts are left out
pub fn group_by_label<'a>(posts: impl IntoIterator<Item = &'a Post>) -> BTreeMap<Label, Vec<&'a Post>> {
    group_by(posts, |p| match p.label() {
        Label::Unknown => None,
        known => Some(known),
    })
}
