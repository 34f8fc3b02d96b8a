use thiserror::Error;

/// Precondition violations on query arguments.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("invalid hashtag: hashtag cannot be an empty string")]
    EmptyHashtag,
    #[error("invalid hashtags: hashtags cannot be an empty list")]
    EmptyHashtagList,
}

/// Failures while attaching classifier output to posts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LabelError {
    #[error("post by {handle} is already labeled")]
    AlreadyAssigned { handle: String },
    #[error("classifier returned {labels} labels for {posts} posts")]
    CountMismatch { posts: usize, labels: usize },
}

/// Failures of a geocoding call.
///
/// Every variant is treated as "no result" by the location resolver.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeocodeError {
    #[error("geocoding request failed: {0}")]
    Transport(String),
    #[error("malformed geocoding response: {0}")]
    MalformedResponse(String),
    #[error("geocoding provider rejected the request: {0}")]
    Rejected(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized timestamp: {0:?}")]
pub struct TimestampError(pub String);
