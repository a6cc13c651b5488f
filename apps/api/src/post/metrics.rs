//! Text measurements shown to the user and logged after generation.

use serde::Serialize;

/// Characters per keyword window.
pub const KEYWORD_WINDOW: usize = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TextStats {
    /// Whitespace-separated words.
    pub words: usize,
    /// Unicode scalar values.
    pub letters: usize,
}

pub fn text_stats(text: &str) -> TextStats {
    TextStats {
        words: text.split_whitespace().count(),
        letters: text.chars().count(),
    }
}

/// Indices of consecutive `window`-character chunks that contain none of `keywords`.
///
/// A keyword straddling a chunk boundary does not count for either chunk.
pub fn uncovered_windows(text: &str, keywords: &[String], window: usize) -> Vec<usize> {
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(window.max(1))
        .enumerate()
        .filter(|(_, chunk)| {
            let chunk: String = chunk.iter().collect();
            !keywords.iter().any(|k| !k.is_empty() && chunk.contains(k.as_str()))
        })
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_stats_counts_words_and_letters() {
        let stats = text_stats("숯불 직화  맛집");
        assert_eq!(stats.words, 3);
        assert_eq!(stats.letters, 9);
    }

    #[test]
    fn test_every_window_with_a_keyword_is_covered() {
        let keywords = vec!["숯불".to_string()];
        let text = format!("{}숯불{}숯불", "가".repeat(5), "나".repeat(5));
        assert!(uncovered_windows(&text, &keywords, 7).is_empty());
    }

    #[test]
    fn test_uncovered_window_is_reported() {
        let keywords = vec!["맛집".to_string()];
        let text = format!("맛집{}", "가".repeat(10));
        assert_eq!(uncovered_windows(&text, &keywords, 4), vec![1, 2]);
    }

    #[test]
    fn test_empty_text_has_no_windows() {
        assert!(uncovered_windows("", &["a".to_string()], KEYWORD_WINDOW).is_empty());
    }
}
