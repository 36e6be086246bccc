//! Response validation: checks raw model output against a [`RuleSet`].
//!
//! Checks run independently and in a fixed order (length, forbidden terms,
//! opener). All of them are evaluated on every call, and the warning text is
//! assembled in that same order so it is reproducible for identical input.

use lazy_static::lazy_static;
use regex_lite::Regex;
use serde::Serialize;

use crate::rules::RuleSet;
use crate::terms::FORBIDDEN_WORDS;

lazy_static! {
    static ref WORD_PATTERNS: Vec<(&'static str, Regex)> = FORBIDDEN_WORDS
        .iter()
        .filter_map(|word| {
            Regex::new(&format!("(?i){}", regex_lite::escape(word)))
                .ok()
                .map(|re| (*word, re))
        })
        .collect();
}

/// Violation family, used for scoring and lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ViolationKind {
    TooLong,
    ForbiddenTermPresent,
    MissingOpener,
}

/// One detected rule violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Violation {
    TooLong {
        length: usize,
        max_length: usize,
    },
    ForbiddenTermPresent {
        /// Labels of the matched terms, in table order.
        terms: Vec<String>,
    },
    MissingOpener {
        first_word: Option<String>,
    },
}

impl Violation {
    pub fn kind(&self) -> ViolationKind {
        match self {
            Violation::TooLong { .. } => ViolationKind::TooLong,
            Violation::ForbiddenTermPresent { .. } => ViolationKind::ForbiddenTermPresent,
            Violation::MissingOpener { .. } => ViolationKind::MissingOpener,
        }
    }

    /// Warning fragment. `leading` selects the standalone phrasing used when
    /// this is the first violation in the warning.
    fn warning_fragment(&self, leading: bool) -> String {
        match (self, leading) {
            (Violation::TooLong { max_length, .. }, true) => {
                format!("Alt text exceeds {max_length} characters")
            }
            (Violation::TooLong { max_length, .. }, false) => {
                format!("exceeds {max_length} characters")
            }
            (Violation::ForbiddenTermPresent { terms }, true) => {
                format!("Forbidden terms detected ({})", terms.join(", "))
            }
            (Violation::ForbiddenTermPresent { terms }, false) => {
                format!("forbidden terms detected ({})", terms.join(", "))
            }
            (Violation::MissingOpener { .. }, true) => {
                "Alt text does not start with an article".to_string()
            }
            (Violation::MissingOpener { .. }, false) => "missing starting article".to_string(),
        }
    }
}

/// Outcome of validating one text. Empty means compliant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationVerdict {
    violations: Vec<Violation>,
}

impl ValidationVerdict {
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn has(&self, kind: ViolationKind) -> bool {
        self.violations.iter().any(|v| v.kind() == kind)
    }

    pub fn kinds(&self) -> Vec<ViolationKind> {
        self.violations.iter().map(Violation::kind).collect()
    }

    /// Human-readable warning; empty when there are no violations.
    pub fn warning(&self) -> String {
        let mut out = String::new();
        for (i, violation) in self.violations.iter().enumerate() {
            if i > 0 {
                out.push_str(" and ");
            }
            out.push_str(&violation.warning_fragment(i == 0));
        }
        out
    }
}

/// Validate `text` against `rules` without modifying it.
pub fn validate(text: &str, rules: &RuleSet) -> ValidationVerdict {
    let mut violations = Vec::new();

    let length = text.chars().count();
    if length > rules.max_length() {
        violations.push(Violation::TooLong {
            length,
            max_length: rules.max_length(),
        });
    }

    let terms = forbidden_terms_in(text, rules);
    if !terms.is_empty() {
        violations.push(Violation::ForbiddenTermPresent { terms });
    }

    let first_word = text.split_whitespace().next();
    let has_opener = first_word.is_some_and(|word| {
        rules
            .required_openers()
            .iter()
            .any(|opener| word.eq_ignore_ascii_case(opener))
    });
    if !has_opener {
        violations.push(Violation::MissingOpener {
            first_word: first_word.map(str::to_string),
        });
    }

    ValidationVerdict { violations }
}

fn forbidden_terms_in(text: &str, rules: &RuleSet) -> Vec<String> {
    let mut found: Vec<String> = rules
        .forbidden_words()
        .filter(|word| {
            WORD_PATTERNS
                .iter()
                .find(|(known, _)| known == word)
                .is_some_and(|(_, re)| re.is_match(text))
        })
        .map(str::to_string)
        .collect();

    found.extend(
        rules
            .forbidden_punctuation()
            .filter(|(mark, _)| text.contains(*mark))
            .map(|(_, name)| name.to_string()),
    );
    found
}
