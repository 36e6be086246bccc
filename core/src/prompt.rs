//! Prompt composition for the vision model.
//!
//! The system instruction is rendered from the [`RuleSet`], so every
//! constraint the validator enforces is also stated to the model. Built-in
//! rules always come first; caller rules follow in their own section and can
//! add to them but never replace them.

use serde::Serialize;

use crate::rules::RuleSet;

const ROLE_PREAMBLE: &str = "You are an accessibility expert.\n\n\
Write alt text that clearly and accurately describes ONLY what is visible.";

const DEFAULT_INSTRUCTION: &str = "Describe the visible content.";

const CONTEXT_HEADER: &str = "Surrounding text for vocabulary reference";

const USER_RULES_HEADER: &str = "USER PROVIDED RULES";

/// One segment of the user turn, in send order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UserContent {
    Text { text: String },
    /// Placeholder for the uploaded image; the model client inlines it.
    Image,
}

/// Instruction payload for one model call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptPayload {
    pub system_instruction: String,
    pub user_content: Vec<UserContent>,
}

impl PromptPayload {
    /// Concatenated text segments of the user turn.
    pub fn user_text(&self) -> String {
        self.user_content
            .iter()
            .filter_map(|segment| match segment {
                UserContent::Text { text } => Some(text.as_str()),
                UserContent::Image => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Render the prompt for `rules` and the optional surrounding `context_text`.
pub fn compose(rules: &RuleSet, context_text: &str) -> PromptPayload {
    PromptPayload {
        system_instruction: system_instruction(rules),
        user_content: vec![
            UserContent::Text {
                text: framing_text(context_text),
            },
            UserContent::Image,
        ],
    }
}

fn system_instruction(rules: &RuleSet) -> String {
    let openers = rules.required_openers().join(", ");
    let words = rules.forbidden_words().collect::<Vec<_>>().join(", ");
    let marks = rules
        .forbidden_punctuation()
        .map(|(_, name)| name)
        .collect::<Vec<_>>()
        .join(", ");

    let built_in = [
        format!("Start with one of these articles: {openers}"),
        "Describe only visible objects, shapes, colors and positions".to_string(),
        "No guessing, no interpretation, no assumptions".to_string(),
        "Use American English".to_string(),
        format!("Stay at or below {} characters", rules.max_length()),
        "Use shows, displays or depicts".to_string(),
        format!("Never use these words: {words}"),
        format!("Never use these marks: {marks}"),
        "Avoid unnecessary capitalization".to_string(),
    ];

    let mut out = String::from(ROLE_PREAMBLE);
    out.push_str("\n\nSTRICT RULES\n");
    for rule in &built_in {
        out.push_str("- ");
        out.push_str(rule);
        out.push('\n');
    }

    out.push('\n');
    out.push_str(USER_RULES_HEADER);
    out.push('\n');
    if rules.user_rules().is_empty() {
        out.push_str("None");
    } else {
        out.push_str(rules.user_rules());
    }
    out.push('\n');
    out
}

fn framing_text(context_text: &str) -> String {
    let context = context_text.trim();
    if context.is_empty() {
        DEFAULT_INSTRUCTION.to_string()
    } else {
        format!("{CONTEXT_HEADER}\n{context}\n\n{DEFAULT_INSTRUCTION}")
    }
}
