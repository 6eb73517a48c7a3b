use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub url: String,
    pub text: String,
    pub extract_len: usize,
}

impl Article {
    pub fn new(title: impl Into<String>, url: impl Into<String>, text: impl Into<String>) -> Self {
        let text = text.into();
        let extract_len = text.chars().count();
        Self {
            title: title.into(),
            url: url.into(),
            text,
            extract_len,
        }
    }

    /// Shown when no usable article could be fetched at all.
    pub fn fallback() -> Self {
        Self {
            title: "Wikipedia".to_string(),
            url: "https://en.wikipedia.org".to_string(),
            text: "Unable to load content. Please try again.".to_string(),
            extract_len: 0,
        }
    }

    pub fn is_fallback(&self) -> bool {
        *self == Self::fallback()
    }
}
