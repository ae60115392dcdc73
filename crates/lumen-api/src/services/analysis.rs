//! Deterministic analysis stub.
//!
//! This is NOT inference. It exists so the chat endpoint can return a
//! reply when the chat provider is disabled, and so that tests have a
//! predictable fallback path. The trait is injectable; a real analysis
//! backend would replace [`KeywordAnalysis`] behind the same interface.

/// Coarse sentiment of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
        }
    }
}

/// Injectable stand-in for message analysis.
pub trait AnalysisStub: Send + Sync {
    fn sentiment(&self, text: &str) -> Sentiment;
    fn fallback_reply(&self, text: &str) -> String;
}

const POSITIVE_WORDS: &[&str] = &[
    "love", "great", "happy", "thanks", "thank", "awesome", "good", "nice",
];
const NEGATIVE_WORDS: &[&str] = &[
    "hate", "bad", "sad", "angry", "terrible", "awful", "annoyed", "upset",
];

/// Keyword-table implementation. Same input, same output, always.
#[derive(Debug, Default)]
pub struct KeywordAnalysis;

impl KeywordAnalysis {
    fn score(text: &str) -> i32 {
        let lower = text.to_lowercase();
        let mut score = 0;
        for word in lower.split(|c: char| !c.is_alphanumeric()) {
            if POSITIVE_WORDS.contains(&word) {
                score += 1;
            } else if NEGATIVE_WORDS.contains(&word) {
                score -= 1;
            }
        }
        score
    }
}

impl AnalysisStub for KeywordAnalysis {
    fn sentiment(&self, text: &str) -> Sentiment {
        match Self::score(text) {
            s if s > 0 => Sentiment::Positive,
            s if s < 0 => Sentiment::Negative,
            _ => Sentiment::Neutral,
        }
    }

    fn fallback_reply(&self, text: &str) -> String {
        match self.sentiment(text) {
            Sentiment::Positive => {
                "I'm glad to hear that! Chat replies are limited right now, but I'm listening."
                    .to_string()
            }
            Sentiment::Negative => {
                "I'm sorry you're dealing with that. Chat replies are limited right now, but I'm listening."
                    .to_string()
            }
            Sentiment::Neutral => {
                "Got it. Chat replies are limited right now, but I'm listening.".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentiment_is_deterministic() {
        let stub = KeywordAnalysis;
        assert_eq!(stub.sentiment("I love this, thanks!"), Sentiment::Positive);
        assert_eq!(stub.sentiment("this is terrible and sad"), Sentiment::Negative);
        assert_eq!(stub.sentiment("the sky is blue"), Sentiment::Neutral);
        // Same input, same output.
        assert_eq!(stub.sentiment("hello"), stub.sentiment("hello"));
    }

    #[test]
    fn test_fallback_reply_tracks_sentiment() {
        let stub = KeywordAnalysis;
        assert!(stub.fallback_reply("I love this").contains("glad"));
        assert!(stub.fallback_reply("I hate this").contains("sorry"));
    }
}
