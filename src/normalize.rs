//! Name tokenization: turns a raw name string into the set of normalized
//! word tokens that matching compares.

use std::collections::BTreeSet;

/// Tokens that carry no identity signal. Organizational suffixes and common
/// words are generic; the payment-processor entries cover intermediaries
/// that show up as the payer name on transaction exports.
const DEFAULT_STOPWORDS: &[&str] = &[
    // organizational suffixes
    "inc",
    "llc",
    "corp",
    "corporation",
    "co",
    "ltd",
    "foundation",
    "trust",
    "trustees",
    // common words
    "the",
    "and",
    "of",
    "for",
    "a",
    "an",
    // payment-processor noise
    "paypal",
    "stripe",
    "benevity",
];

const MIN_TOKEN_LEN: usize = 2;

/// Immutable tokenizer settings. Built once per run so datasets can swap the
/// stopword list without touching process-wide state.
#[derive(Debug, Clone)]
pub struct TokenizerConfig {
    pub stopwords: BTreeSet<String>,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            stopwords: DEFAULT_STOPWORDS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Tokenizer {
    config: TokenizerConfig,
}

impl Tokenizer {
    pub fn new(config: TokenizerConfig) -> Self {
        Self { config }
    }

    /// Extract the comparable token set of a name.
    ///
    /// Absent or blank input yields the empty set. Otherwise the name is
    /// case-folded with diacritics removed, maximal runs of ASCII
    /// alphanumerics become tokens, stopwords and tokens shorter than two
    /// characters are dropped, and duplicates collapse.
    pub fn tokenize(&self, name: Option<&str>) -> BTreeSet<String> {
        let Some(raw) = name else {
            return BTreeSet::new();
        };
        let folded = fold_name(raw);
        let mut tokens = BTreeSet::new();
        for run in folded.split(|c: char| !c.is_ascii_alphanumeric()) {
            if run.len() < MIN_TOKEN_LEN {
                continue;
            }
            if self.config.stopwords.contains(run) {
                continue;
            }
            tokens.insert(run.to_string());
        }
        tokens
    }
}

/// Decompose to NFD, drop combining marks, lowercase.
pub fn fold_name(input: &str) -> String {
    use unicode_normalization::UnicodeNormalization;
    input
        .nfd()
        .filter(|c| !unicode_normalization::char::is_combining_mark(*c))
        .flat_map(|c| c.to_lowercase())
        .collect()
}
