//! The versioned term table shared by prompt rendering, validation and
//! classification.
//!
//! Every word list the pipeline matches against lives here. Prompt text and
//! validator checks are both derived from these tables, so the instruction
//! sent to the model and the rules enforced on its reply cannot drift apart.
//! Bump [`RULE_TABLE_VERSION`] whenever an entry changes.

use crate::classify::ImageType;

/// Version of the term tables below.
pub const RULE_TABLE_VERSION: &str = "1";

/// Maximum alt-text length, in characters.
pub const DEFAULT_MAX_LENGTH: usize = 600;

/// Marker appended when overlong text is truncated.
pub const ELLIPSIS: &str = "...";

/// Articles an alt-text string must start with (compared case-insensitively).
pub const REQUIRED_OPENERS: &[&str] = &["a", "an", "the"];

/// Hedging, interpretive and meta vocabulary. Matched case-insensitively
/// anywhere in the text.
pub const FORBIDDEN_WORDS: &[&str] = &[
    "image",
    "visual",
    "possibly",
    "suggesting",
    "likely",
    "appears",
    "atmosphere",
];

/// Punctuation marks that must not appear, with the name used in warnings.
pub const FORBIDDEN_PUNCTUATION: &[(char, &str)] = &[
    ('"', "double quote"),
    ('\'', "single quote"),
    ('\u{201C}', "left double quote"),
    ('\u{201D}', "right double quote"),
    ('\u{2018}', "left single quote"),
    ('\u{2019}', "right single quote"),
    (':', "colon"),
    (';', "semicolon"),
];

/// Keyword families for content classification, in precedence order. The
/// first family with a whole-word match wins.
pub const CONTENT_FAMILIES: &[(ImageType, &[&str])] = &[
    (
        ImageType::TextBasedImage,
        &[
            "text",
            "texts",
            "handwriting",
            "handwritten",
            "signature",
            "signatures",
            "lettering",
        ],
    ),
    (
        ImageType::Graph,
        &[
            "graph", "graphs", "chart", "charts", "axis", "axes", "bar", "bars", "line", "lines",
        ],
    ),
    (
        ImageType::Diagram,
        &["diagram", "diagrams", "flow", "flowchart", "schematic"],
    ),
    (
        ImageType::Screenshot,
        &["screen", "screenshot", "interface", "menu", "menus"],
    ),
];

/// Characters that keep a text classified as English besides ASCII letters,
/// digits and whitespace.
pub const ENGLISH_EXTRA_CHARS: &[char] = &['.', ',', '-'];
