use regex::{Matches, Regex};

use crate::error::ArbiterError;

/// A case-insensitive, word-bounded phrase matcher.
///
/// Pattern tables are plain phrases, not regexes. Two conventions apply:
/// whitespace inside a phrase matches any run of whitespace, and a trailing
/// `*` matches any word continuation (`dominat*` matches "dominate" and
/// "domination").
#[derive(Clone, Debug)]
pub struct PhrasePattern {
    phrase: String,
    regex: Regex,
}

impl PhrasePattern {
    pub fn compile(phrase: &str) -> Result<Self, ArbiterError> {
        let trimmed = phrase.trim();
        let (body, open_ended) = match trimmed.strip_suffix('*') {
            Some(body) => (body.trim_end(), true),
            None => (trimmed, false),
        };
        if body.is_empty() {
            return Err(ArbiterError::InvalidPattern {
                pattern: phrase.to_string(),
                reason: "empty phrase".into(),
            });
        }

        let words: Vec<String> = body.split_whitespace().map(regex::escape).collect();
        let tail = if open_ended { r"\w*" } else { "" };
        let source = format!(r"(?i)\b{}{}\b", words.join(r"\s+"), tail);
        let regex = Regex::new(&source).map_err(|e| ArbiterError::InvalidPattern {
            pattern: phrase.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            phrase: trimmed.to_string(),
            regex,
        })
    }

    /// The phrase as configured.
    pub fn phrase(&self) -> &str {
        &self.phrase
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    pub fn find_iter<'r, 't>(&'r self, text: &'t str) -> Matches<'r, 't> {
        self.regex.find_iter(text)
    }

    /// Replace every match with `replacement`, capitalising the replacement
    /// when the matched text started with an uppercase letter.
    pub fn replace_all(&self, text: &str, replacement: &str) -> String {
        self.regex
            .replace_all(text, |caps: &regex::Captures<'_>| {
                let starts_upper = caps[0].chars().next().is_some_and(char::is_uppercase);
                if starts_upper {
                    capitalize(replacement)
                } else {
                    replacement.to_string()
                }
            })
            .into_owned()
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
