/// Result of running a chat message through a [`ProfanityFilter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfanityCheck {
    pub contains_profanity: bool,
    pub cleaned_text: String,
}

/// Pure collaborator: message text in, censorship verdict out. Chat handling
/// never blocks on a profane message; it only censors the stored/broadcast
/// copy.
pub trait ProfanityFilter: Send + Sync {
    fn validate(&self, text: &str) -> ProfanityCheck;
}

/// Word-list based filter, case-insensitive, whole-word matching so
/// substrings inside unrelated words are not censored.
pub struct WordListFilter {
    blocked: Vec<String>,
}

impl WordListFilter {
    pub fn new(blocked: impl IntoIterator<Item = String>) -> Self {
        Self {
            blocked: blocked.into_iter().map(|w| w.to_lowercase()).collect(),
        }
    }

    pub fn default_list() -> Self {
        Self::new(
            ["damn", "hell", "crap"]
                .iter()
                .map(|s| s.to_string()),
        )
    }
}

impl ProfanityFilter for WordListFilter {
    fn validate(&self, text: &str) -> ProfanityCheck {
        let mut contains_profanity = false;
        let cleaned_text = text
            .split_inclusive(char::is_whitespace)
            .map(|token| {
                let (word, trailing) = split_trailing_whitespace(token);
                let core = word.trim_matches(|c: char| !c.is_alphanumeric());
                let lead_len = word.len() - word.trim_start_matches(|c: char| !c.is_alphanumeric()).len();
                let (lead, rest) = word.split_at(lead_len);
                let trail_len = rest.len() - core.len();
                let (_, tail) = rest.split_at(rest.len() - trail_len);

                if self.blocked.iter().any(|b| b == &core.to_lowercase()) {
                    contains_profanity = true;
                    format!("{lead}{}{tail}{trailing}", "*".repeat(core.chars().count()))
                } else {
                    token.to_string()
                }
            })
            .collect();
        ProfanityCheck {
            contains_profanity,
            cleaned_text,
        }
    }
}

fn split_trailing_whitespace(token: &str) -> (&str, &str) {
    let ws_start = token
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_whitespace())
        .last()
        .map(|(i, _)| i);
    match ws_start {
        Some(i) => token.split_at(i),
        None => (token, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_message_passes_through_unchanged() {
        let filter = WordListFilter::default_list();
        let check = filter.validate("hello world");
        assert!(!check.contains_profanity);
        assert_eq!(check.cleaned_text, "hello world");
    }

    #[test]
    fn blocked_word_is_censored_and_flagged() {
        let filter = WordListFilter::default_list();
        let check = filter.validate("what the hell");
        assert!(check.contains_profanity);
        assert_eq!(check.cleaned_text, "what the ****");
    }

    #[test]
    fn substring_of_blocked_word_is_not_censored() {
        let filter = WordListFilter::default_list();
        let check = filter.validate("hello");
        assert!(!check.contains_profanity);
        assert_eq!(check.cleaned_text, "hello");
    }

    #[test]
    fn punctuation_does_not_defeat_matching() {
        let filter = WordListFilter::default_list();
        let check = filter.validate("damn!");
        assert!(check.contains_profanity);
        assert_eq!(check.cleaned_text, "****!");
    }
}
