//! Static English word lists used by the normalizer and the vectorizer.
//!
//! Both lists are plain data: swapping or extending them changes which
//! tokens survive cleaning but never the order of the cleaning steps.

use std::collections::{HashMap, HashSet};

/// English stopwords (the NLTK corpus list).
const STOPWORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're", "you've",
    "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him", "his",
    "himself", "she", "she's", "her", "hers", "herself", "it", "it's", "its", "itself",
    "they", "them", "their", "theirs", "themselves", "what", "which", "who", "whom", "this",
    "that", "that'll", "these", "those", "am", "is", "are", "was", "were", "be", "been",
    "being", "have", "has", "had", "having", "do", "does", "did", "doing", "a", "an", "the",
    "and", "but", "if", "or", "because", "as", "until", "while", "of", "at", "by", "for",
    "with", "about", "against", "between", "into", "through", "during", "before", "after",
    "above", "below", "to", "from", "up", "down", "in", "out", "on", "off", "over", "under",
    "again", "further", "then", "once", "here", "there", "when", "where", "why", "how", "all",
    "any", "both", "each", "few", "more", "most", "other", "some", "such", "no", "nor", "not",
    "only", "own", "same", "so", "than", "too", "very", "s", "t", "can", "will", "just",
    "don", "don't", "should", "should've", "now", "d", "ll", "m", "o", "re", "ve", "y",
    "ain", "aren", "aren't", "couldn", "couldn't", "didn", "didn't", "doesn", "doesn't",
    "hadn", "hadn't", "hasn", "hasn't", "haven", "haven't", "isn", "isn't", "ma", "mightn",
    "mightn't", "mustn", "mustn't", "needn", "needn't", "shan", "shan't", "shouldn",
    "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't", "wouldn", "wouldn't",
];

/// Whole-word contraction expansions. Irregular forms live here; the
/// regular suffixes (`n't`, `'re`, `'ll`, ...) are handled by
/// [`SUFFIX_EXPANSIONS`].
const CONTRACTIONS: &[(&str, &str)] = &[
    ("ain't", "are not"),
    ("can't", "cannot"),
    ("won't", "will not"),
    ("shan't", "shall not"),
    ("let's", "let us"),
    ("it's", "it is"),
    ("he's", "he is"),
    ("she's", "she is"),
    ("that's", "that is"),
    ("there's", "there is"),
    ("here's", "here is"),
    ("what's", "what is"),
    ("where's", "where is"),
    ("who's", "who is"),
    ("how's", "how is"),
    ("when's", "when is"),
    ("why's", "why is"),
    ("i'm", "i am"),
    ("y'all", "you all"),
    ("ma'am", "madam"),
    ("o'clock", "of the clock"),
];

/// Regular contraction suffixes, tried in order after the whole-word table.
const SUFFIX_EXPANSIONS: &[(&str, &str)] = &[
    ("n't", " not"),
    ("'re", " are"),
    ("'ll", " will"),
    ("'ve", " have"),
    ("'m", " am"),
    ("'d", " would"),
];

/// Stopword set plus contraction table, owned by a [`crate::normalize::Normalizer`].
#[derive(Debug, Clone)]
pub struct Lexicon {
    stopwords: HashSet<String>,
    contractions: HashMap<String, String>,
}

impl Default for Lexicon {
    fn default() -> Self {
        Self {
            stopwords: STOPWORDS.iter().map(|w| (*w).to_string()).collect(),
            contractions: CONTRACTIONS
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
        }
    }
}

impl Lexicon {
    /// Built-in lists adjusted by user-supplied additions and removals.
    pub fn with_extras(
        extra_stopwords: &[String],
        keep_stopwords: &[String],
        extra_contractions: &HashMap<String, String>,
    ) -> Self {
        let mut lexicon = Self::default();
        lexicon
            .stopwords
            .extend(extra_stopwords.iter().map(|w| w.to_lowercase()));
        for w in keep_stopwords {
            lexicon.stopwords.remove(&w.to_lowercase());
        }
        for (k, v) in extra_contractions {
            lexicon
                .contractions
                .insert(k.to_lowercase().replace('’', "'"), v.to_lowercase());
        }
        lexicon
    }

    pub fn is_stopword(&self, word: &str) -> bool {
        self.stopwords.contains(word)
    }

    pub fn stopwords(&self) -> &HashSet<String> {
        &self.stopwords
    }

    /// Expansion for a lowercase contraction, or `None` if it isn't one.
    pub fn expand(&self, word: &str) -> Option<String> {
        if let Some(full) = self.contractions.get(word) {
            return Some(full.clone());
        }
        SUFFIX_EXPANSIONS.iter().find_map(|(suffix, replacement)| {
            word.strip_suffix(suffix)
                .filter(|stem| !stem.is_empty())
                .map(|stem| format!("{stem}{replacement}"))
        })
    }
}
