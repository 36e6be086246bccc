//! Rule catalog: the constraints generated alt text must satisfy.
//!
//! A [`RuleSet`] combines the fixed built-in constraints from
//! [`crate::terms`] with free-text rules supplied by the caller. The built-in
//! part cannot be overridden; user rules only supplement it.

use serde::Serialize;

use crate::terms::{DEFAULT_MAX_LENGTH, FORBIDDEN_PUNCTUATION, FORBIDDEN_WORDS, REQUIRED_OPENERS};

/// A single disallowed term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ForbiddenTerm {
    /// Vocabulary, matched case-insensitively as a substring.
    Word { word: &'static str },
    /// A single punctuation mark.
    Punctuation { mark: char, name: &'static str },
}

impl ForbiddenTerm {
    /// Label used in warnings and prompts.
    pub fn label(&self) -> &'static str {
        match self {
            ForbiddenTerm::Word { word } => *word,
            ForbiddenTerm::Punctuation { name, .. } => *name,
        }
    }
}

/// Immutable per-request set of authoring constraints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleSet {
    max_length: usize,
    required_openers: &'static [&'static str],
    forbidden_terms: Vec<ForbiddenTerm>,
    user_rules: String,
}

impl Default for RuleSet {
    fn default() -> Self {
        build("", "", "")
    }
}

impl RuleSet {
    /// Maximum length in characters.
    pub fn max_length(&self) -> usize {
        self.max_length
    }

    pub fn required_openers(&self) -> &'static [&'static str] {
        self.required_openers
    }

    pub fn forbidden_terms(&self) -> &[ForbiddenTerm] {
        &self.forbidden_terms
    }

    /// Forbidden vocabulary only, in table order.
    pub fn forbidden_words(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.forbidden_terms.iter().filter_map(|term| match term {
            ForbiddenTerm::Word { word } => Some(*word),
            ForbiddenTerm::Punctuation { .. } => None,
        })
    }

    /// Forbidden punctuation only, in table order.
    pub fn forbidden_punctuation(&self) -> impl Iterator<Item = (char, &'static str)> + '_ {
        self.forbidden_terms.iter().filter_map(|term| match term {
            ForbiddenTerm::Punctuation { mark, name } => Some((*mark, *name)),
            ForbiddenTerm::Word { .. } => None,
        })
    }

    /// Caller-supplied rules, already assembled. Empty when none were given.
    pub fn user_rules(&self) -> &str {
        &self.user_rules
    }
}

/// Build the rule set for one request.
///
/// Absent inputs are passed as empty strings. The user text is assembled as
/// a `DO` section, a `DO NOT` section and then the free-form rules, skipping
/// any section that is blank.
pub fn build(user_dos: &str, user_donts: &str, user_free_rules: &str) -> RuleSet {
    let forbidden_terms = FORBIDDEN_WORDS
        .iter()
        .copied()
        .map(|word| ForbiddenTerm::Word { word })
        .chain(
            FORBIDDEN_PUNCTUATION
                .iter()
                .map(|&(mark, name)| ForbiddenTerm::Punctuation { mark, name }),
        )
        .collect();

    RuleSet {
        max_length: DEFAULT_MAX_LENGTH,
        required_openers: REQUIRED_OPENERS,
        forbidden_terms,
        user_rules: assemble_user_rules(user_dos, user_donts, user_free_rules),
    }
}

fn assemble_user_rules(dos: &str, donts: &str, free: &str) -> String {
    let mut sections = Vec::new();
    if !dos.trim().is_empty() {
        sections.push(format!("DO\n{}", dos.trim()));
    }
    if !donts.trim().is_empty() {
        sections.push(format!("DO NOT\n{}", donts.trim()));
    }
    if !free.trim().is_empty() {
        sections.push(free.trim().to_string());
    }
    sections.join("\n\n")
}
