use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

static URL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https://\S*(\s|$)").expect("valid url pattern"));
static MENTION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@\S*(\s|$)").expect("valid mention pattern"));
static DIGITS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+").expect("valid digits pattern"));

/// English stop words (NLTK list)
const STOP_WORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're", "you've",
    "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him", "his", "himself",
    "she", "she's", "her", "hers", "herself", "it", "it's", "its", "itself", "they", "them",
    "their", "theirs", "themselves", "what", "which", "who", "whom", "this", "that", "that'll",
    "these", "those", "am", "is", "are", "was", "were", "be", "been", "being", "have", "has",
    "had", "having", "do", "does", "did", "doing", "a", "an", "the", "and", "but", "if", "or",
    "because", "as", "until", "while", "of", "at", "by", "for", "with", "about", "against",
    "between", "into", "through", "during", "before", "after", "above", "below", "to", "from",
    "up", "down", "in", "out", "on", "off", "over", "under", "again", "further", "then", "once",
    "here", "there", "when", "where", "why", "how", "all", "any", "both", "each", "few", "more",
    "most", "other", "some", "such", "no", "nor", "not", "only", "own", "same", "so", "than",
    "too", "very", "s", "t", "can", "will", "just", "don", "don't", "should", "should've", "now",
    "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't", "didn",
    "didn't", "doesn", "doesn't", "hadn", "hadn't", "hasn", "hasn't", "haven", "haven't", "isn",
    "isn't", "ma", "mightn", "mightn't", "mustn", "mustn't", "needn", "needn't", "shan", "shan't",
    "shouldn", "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't", "wouldn",
    "wouldn't",
];

/// Cleans post texts for the classifier
pub struct Preprocessor {
    stop_words: HashSet<&'static str>,
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new()
    }
}

impl Preprocessor {
    pub fn new() -> Self {
        Self {
            stop_words: STOP_WORDS.iter().copied().collect(),
        }
    }

    /// Cleans a single text.
    ///
    /// Steps, in order:
    /// 1. drop `https://` links
    /// 2. drop stop words (case-sensitive, split on spaces) and newlines
    /// 3. drop `@mentions`
    /// 4. strip `#` markers
    /// 5. lowercase
    /// 6. drop digit runs
    pub fn preprocess(&self, text: &str) -> String {
        let no_urls = URL_REGEX.replace_all(text, "");
        let no_stops = no_urls
            .split(' ')
            .filter(|word| !self.stop_words.contains(*word))
            .map(|word| word.replace('\n', ""))
            .collect::<Vec<_>>()
            .join(" ");
        let no_mentions = MENTION_REGEX.replace_all(&no_stops, "");
        let lowercase = no_mentions.replace('#', "").to_lowercase();
        DIGITS_REGEX.replace_all(&lowercase, "").into_owned()
    }

    pub fn preprocess_corpus(&self, corpus: &[String]) -> Vec<String> {
        corpus.iter().map(|text| self.preprocess(text)).collect()
    }
}

/// Cleans a batch of texts with a default [`Preprocessor`]
pub fn preprocess_corpus(corpus: &[String]) -> Vec<String> {
    Preprocessor::new().preprocess_corpus(corpus)
}
