//! Keyword blocklist, the first moderation layer.
//!
//! Terms are grouped in ordered categories covering violence, explicit
//! content and hate speech, in Italian with an English catch-all so that
//! untranslated prompts are caught too. Matching is case-insensitive.
//!
//! [`MatchMode::Substring`] flags a term anywhere in the text, including
//! inside longer words ("armi" in "marmitta"). [`MatchMode::WholeWord`]
//! requires Unicode word boundaries around the term and avoids those false
//! positives at the cost of missing glued-together evasions.

use atelier_core::{BlocklistCategory, BlocklistConfig, MatchMode};
use atelier_error::ConfigError;
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, instrument};

static DEFAULT_BLOCKLIST: LazyLock<Blocklist> = LazyLock::new(Blocklist::default);

/// Built-in categories, in matching order.
pub fn default_categories() -> Vec<BlocklistCategory> {
    vec![
        BlocklistCategory::new(
            "violenza",
            [
                "violenza",
                "sangue",
                "morte",
                "uccidere",
                "tortura",
                "mutilazione",
                "violento",
                "violenta",
                "armi",
                "guerra",
            ],
        ),
        BlocklistCategory::new(
            "contenuto_esplicito",
            [
                "nudo",
                "nuda",
                "nudità",
                "erotico",
                "erotica",
                "sensuale",
                "sexy",
                "provocante",
                "provocanti",
                "intimo",
                "intima",
                "bikini",
                "lingerie",
            ],
        ),
        BlocklistCategory::new(
            "contenuto_offensivo",
            [
                "razzista",
                "razzismo",
                "discriminazione",
                "offensivo",
                "offensiva",
                "insulto",
                "insulti",
                "odio",
                "pregiudizio",
            ],
        ),
        BlocklistCategory::new(
            "english_inappropriate",
            [
                "nude", "naked", "nsfw", "explicit", "adult", "sexy", "violence", "gore", "blood",
                "death", "kill",
            ],
        ),
    ]
}

/// Result of a blocklist scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordCheck {
    /// True when at least one term matched
    pub flagged: bool,
    /// Matching terms in category-then-term declaration order, without repeats
    pub matched_terms: Vec<String>,
}

#[derive(Debug, Clone)]
struct Term {
    text: String,
    pattern: Option<Regex>,
}

impl Term {
    fn matches(&self, normalized: &str) -> bool {
        match &self.pattern {
            Some(pattern) => pattern.is_match(normalized),
            None => normalized.contains(&self.text),
        }
    }
}

#[derive(Debug, Clone)]
struct Category {
    name: String,
    terms: Vec<Term>,
}

/// Compiled keyword blocklist.
#[derive(Debug, Clone)]
pub struct Blocklist {
    categories: Vec<Category>,
    match_mode: MatchMode,
}

impl Default for Blocklist {
    fn default() -> Self {
        let categories = default_categories()
            .into_iter()
            .map(|category| Category {
                name: category.name().clone(),
                terms: category
                    .terms()
                    .iter()
                    .map(|term| Term {
                        text: term.to_lowercase(),
                        pattern: None,
                    })
                    .collect(),
            })
            .collect();
        Self {
            categories,
            match_mode: MatchMode::Substring,
        }
    }
}

impl Blocklist {
    /// Compile a blocklist from categories and a matching mode.
    ///
    /// # Errors
    ///
    /// Returns an error if a whole-word pattern cannot be compiled.
    pub fn new(categories: &[BlocklistCategory], match_mode: MatchMode) -> Result<Self, ConfigError> {
        let categories = categories
            .iter()
            .map(|category| {
                let terms = category
                    .terms()
                    .iter()
                    .map(|raw| {
                        let text = raw.trim().to_lowercase();
                        let pattern = match match_mode {
                            MatchMode::Substring => None,
                            MatchMode::WholeWord => Some(
                                Regex::new(&format!(r"\b{}\b", regex::escape(&text))).map_err(
                                    |e| {
                                        ConfigError::new(format!(
                                            "Invalid blocklist term '{}': {}",
                                            raw, e
                                        ))
                                    },
                                )?,
                            ),
                        };
                        Ok::<Term, ConfigError>(Term { text, pattern })
                    })
                    .filter(|term| !matches!(term, Ok(Term { text, .. }) if text.is_empty()))
                    .collect::<Result<Vec<_>, ConfigError>>()?;
                Ok::<Category, ConfigError>(Category {
                    name: category.name().clone(),
                    terms,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        Ok(Self {
            categories,
            match_mode,
        })
    }

    /// Compile the blocklist described by configuration, falling back to the
    /// built-in categories.
    pub fn from_config(config: &BlocklistConfig) -> Result<Self, ConfigError> {
        match config.categories() {
            Some(categories) => Self::new(categories, *config.match_mode()),
            None => Self::new(&default_categories(), *config.match_mode()),
        }
    }

    /// Matching mode in use.
    pub fn match_mode(&self) -> MatchMode {
        self.match_mode
    }

    /// Category names in matching order.
    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|c| c.name.as_str())
    }

    /// Scan text for blocked terms.
    ///
    /// Pure and total: the empty string is never flagged.
    #[instrument(skip(self, text), fields(text_len = text.len()))]
    pub fn check(&self, text: &str) -> KeywordCheck {
        let normalized = text.to_lowercase();
        let mut matched_terms: Vec<String> = Vec::new();

        for category in &self.categories {
            for term in &category.terms {
                if term.matches(&normalized) && !matched_terms.contains(&term.text) {
                    debug!(category = %category.name, term = %term.text, "Blocked term matched");
                    matched_terms.push(term.text.clone());
                }
            }
        }

        KeywordCheck {
            flagged: !matched_terms.is_empty(),
            matched_terms,
        }
    }
}

/// Scan text against the built-in blocklist in substring mode.
pub fn check_keywords(text: &str) -> KeywordCheck {
    DEFAULT_BLOCKLIST.check(text)
}
