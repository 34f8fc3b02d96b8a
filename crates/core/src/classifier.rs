use crate::domain::{Label, Post};
use crate::error::LabelError;
use crate::ports::{Result, TextClassifier};
use std::collections::HashSet;

/// Rule-based classifier counting keyword hits.
///
/// More positive than negative hits yields `Positive`, the reverse yields
/// `Negative`, and a tie (including no hits at all) stays `Unknown`.
pub struct KeywordClassifier {
    positive: HashSet<String>,
    negative: HashSet<String>,
}

impl KeywordClassifier {
    pub fn new<S: AsRef<str>>(positive: &[S], negative: &[S]) -> Self {
        let normalize = |words: &[S]| -> HashSet<String> {
            words
                .iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect()
        };
        Self {
            positive: normalize(positive),
            negative: normalize(negative),
        }
    }

    pub fn classify(&self, text: &str) -> Label {
        let (mut positive, mut negative) = (0usize, 0usize);
        for word in text.split_whitespace().map(str::to_lowercase) {
            if self.positive.contains(&word) {
                positive += 1;
            }
            if self.negative.contains(&word) {
                negative += 1;
            }
        }
        match positive.cmp(&negative) {
            std::cmp::Ordering::Greater => Label::Positive,
            std::cmp::Ordering::Less => Label::Negative,
            std::cmp::Ordering::Equal => Label::Unknown,
        }
    }
}

impl TextClassifier for KeywordClassifier {
    fn predict(&self, texts: &[String]) -> Result<Vec<Label>> {
        Ok(texts.iter().map(|text| self.classify(text)).collect())
    }
}

/// Writes classifier output onto posts, pairwise and in order
pub fn apply_labels<'a, I>(posts: I, labels: &[Label]) -> std::result::Result<(), LabelError>
where
    I: IntoIterator<Item = &'a mut Post>,
    I::IntoIter: ExactSizeIterator,
{
    let posts = posts.into_iter();
    if posts.len() != labels.len() {
        return Err(LabelError::CountMismatch {
            posts: posts.len(),
            labels: labels.len(),
        });
    }
    for (post, label) in posts.zip(labels) {
        post.assign_label(*label)?;
    }
    Ok(())
}
