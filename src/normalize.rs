//! Text normalizer: raw social-media text to a lowercase, letters-only
//! token stream joined by single spaces.
//!
//! Step order is fixed: lowercase, URLs, mentions, hashtag markers,
//! contractions, non-letters, stopwords, whitespace. Contractions must be
//! expanded before non-letters are stripped or the apostrophe is lost and
//! `don't` degrades to `dont`.

use crate::lexicon::Lexicon;
use regex::{Captures, Regex};
use std::sync::LazyLock;

/// A token starting with `http`/`www` that carries at least one non-letter
/// (`://`, `.`, digits). Plain words such as `https` or `wwwhat` are left
/// alone so that cleaned output never matches on a second pass.
static URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:http|www)\S*[^\sa-z]\S*").unwrap());
static MENTION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"@\w+").unwrap());
static HASHTAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"#+(\w+)").unwrap());
static CONTRACTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\w+(?:['’]\w+)+").unwrap());
static NON_ALPHA: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z\s]").unwrap());
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Independent toggles for the optional cleaning steps. Lowercasing,
/// non-letter stripping and whitespace collapsing always run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizerConfig {
    pub strip_urls: bool,
    pub strip_mentions: bool,
    pub strip_hashtag_markers: bool,
    pub strip_stopwords: bool,
    pub expand_contractions: bool,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            strip_urls: true,
            strip_mentions: true,
            strip_hashtag_markers: true,
            strip_stopwords: true,
            expand_contractions: true,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    config: NormalizerConfig,
    lexicon: Lexicon,
}

impl Normalizer {
    pub fn new(config: NormalizerConfig, lexicon: Lexicon) -> Self {
        Self { config, lexicon }
    }

    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    /// Flag changes apply to subsequent calls only.
    pub fn config_mut(&mut self) -> &mut NormalizerConfig {
        &mut self.config
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// Clean one text. Empty input yields an empty string.
    pub fn clean(&self, text: &str) -> String {
        if text.is_empty() {
            return String::new();
        }

        let mut text = text.to_lowercase();

        if self.config.strip_urls {
            text = remove_urls(&text);
        }
        if self.config.strip_mentions {
            text = remove_mentions(&text);
        }
        if self.config.strip_hashtag_markers {
            text = strip_hashtag_markers(&text);
        }
        if self.config.expand_contractions {
            text = self.expand_contractions(&text);
        }

        text = strip_non_alpha(&text);

        if self.config.strip_stopwords {
            text = self.remove_stopwords(&text);
        }

        collapse_whitespace(&text)
    }

    /// Clean a possibly absent text; `None` yields an empty string.
    pub fn clean_opt(&self, text: Option<&str>) -> String {
        text.map(|t| self.clean(t)).unwrap_or_default()
    }

    /// Clean every text, preserving order and length.
    pub fn clean_batch<S: AsRef<str>>(&self, texts: &[S]) -> Vec<String> {
        texts.iter().map(|t| self.clean(t.as_ref())).collect()
    }

    /// Like [`Normalizer::clean_batch`], absent elements become empty strings.
    pub fn clean_batch_opt<S: AsRef<str>>(&self, texts: &[Option<S>]) -> Vec<String> {
        texts
            .iter()
            .map(|t| self.clean_opt(t.as_ref().map(|s| s.as_ref())))
            .collect()
    }

    /// Expand apostrophe contractions (`don't` → `do not`), keeping the
    /// capitalisation of the original token.
    pub fn expand_contractions(&self, text: &str) -> String {
        CONTRACTION
            .replace_all(text, |caps: &Captures| {
                let word = &caps[0];
                let key = word.to_lowercase().replace('’', "'");
                match self.lexicon.expand(&key) {
                    Some(full) => match_case(word, &full),
                    None => word.to_string(),
                }
            })
            .into_owned()
    }

    /// Drop whitespace-separated tokens found in the stopword set.
    pub fn remove_stopwords(&self, text: &str) -> String {
        text.split_whitespace()
            .filter(|w| !self.lexicon.is_stopword(&w.to_lowercase()))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

pub fn remove_urls(text: &str) -> String {
    URL.replace_all(text, "").into_owned()
}

/// Remove `@handle` tokens entirely.
pub fn remove_mentions(text: &str) -> String {
    MENTION.replace_all(text, "").into_owned()
}

/// `#great` → `great`.
pub fn strip_hashtag_markers(text: &str) -> String {
    HASHTAG.replace_all(text, "$1").into_owned()
}

/// Keep only lowercase ASCII letters and whitespace.
pub fn strip_non_alpha(text: &str) -> String {
    NON_ALPHA.replace_all(text, "").into_owned()
}

pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text, " ").trim().to_string()
}

fn match_case(original: &str, expansion: &str) -> String {
    let mut letters = original.chars().filter(|c| c.is_alphabetic()).peekable();
    let first_upper = letters.peek().is_some_and(|c| c.is_uppercase());
    let letters: Vec<char> = letters.collect();

    if letters.len() > 1 && letters.iter().all(|c| c.is_uppercase()) {
        return expansion.to_uppercase();
    }
    if first_upper {
        let mut chars = expansion.chars();
        if let Some(first) = chars.next() {
            return first.to_uppercase().chain(chars).collect();
        }
    }
    expansion.to_string()
}
