//! Text normalization. Truncation is the only automatic fix; forbidden terms
//! and missing openers are reported by the validator and left untouched.

use std::fmt;

use serde::Serialize;

use crate::rules::RuleSet;
use crate::terms::ELLIPSIS;

/// Alt text whose length is within the rule set's limit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct NormalizedText(String);

impl NormalizedText {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Length in characters.
    pub fn len(&self) -> usize {
        self.0.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<str> for NormalizedText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NormalizedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Truncate `text` to `max_length` characters, ending in [`ELLIPSIS`], when it
/// is longer than the limit. Shorter text is returned unchanged.
pub fn normalize(text: &str, rules: &RuleSet) -> NormalizedText {
    let max_length = rules.max_length();
    if text.chars().count() <= max_length {
        return NormalizedText(text.to_string());
    }

    let keep = max_length.saturating_sub(ELLIPSIS.chars().count());
    let mut out: String = text.chars().take(keep).collect();
    out.push_str(ELLIPSIS);
    NormalizedText(out)
}
