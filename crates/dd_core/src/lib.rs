pub mod error;
pub mod inference;
pub mod logging;
pub mod news;
pub mod storage;
pub mod types;

pub use error::{AuthError, AuthOperation, Error, Result};
pub use inference::SummaryProvider;
pub use news::NewsProvider;
pub use storage::{IdentityProvider, PreferenceStore};
pub use types::*;

/// Takes at most `max_chars` characters of `text`.
pub fn take_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

pub mod prelude {
    pub use crate::{Article, DigestRequest, DigestResponse, Error, Result, SummaryRequest, SummaryResponse, TopicCard};
}

#[cfg(test)]
mod tests {
    use super::take_chars;

    #[test]
    fn test_take_chars_respects_char_boundaries() {
        assert_eq!(take_chars("héllo", 2), "hé");
        assert_eq!(take_chars("abc", 10), "abc");
        assert_eq!(take_chars("", 3), "");
    }
}
