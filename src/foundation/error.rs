/// Convenience result type used across storyframe.
pub type StoryResult<T> = Result<T, StoryError>;

/// Top-level error taxonomy used by renderer APIs.
///
/// Every failure that prevents a valid [`crate::RenderedStoryOutput`] surfaces through this type;
/// partial output is never returned alongside an error.
#[derive(thiserror::Error, Debug)]
pub enum StoryError {
    /// Invalid editing state, options, or arguments.
    #[error("validation error: {0}")]
    Validation(String),

    /// Source media could not be read or decoded.
    #[error("media load error: {0}")]
    MediaLoad(String),

    /// Image encode, thumbnail encode, or video container assembly failed.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// A video render finished its frame loop without rendering a single frame.
    #[error("empty video: no frame was rendered, so no thumbnail could be captured")]
    EmptyVideo,

    /// The caller stopped the recording early; captured data was discarded.
    #[error("render cancelled")]
    Cancelled,

    /// Internal failures while compositing a frame.
    #[error("evaluation error: {0}")]
    Evaluation(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StoryError {
    /// Build a [`StoryError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`StoryError::MediaLoad`] value.
    pub fn media_load(msg: impl Into<String>) -> Self {
        Self::MediaLoad(msg.into())
    }

    /// Build a [`StoryError::Encoding`] value.
    pub fn encoding(msg: impl Into<String>) -> Self {
        Self::Encoding(msg.into())
    }

    /// Build a [`StoryError::Evaluation`] value.
    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
