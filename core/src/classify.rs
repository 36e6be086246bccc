//! Lexical content classification over the final alt text.
//!
//! This looks only at the words of the description, never at the image. The
//! language marker is a character-class check rather than real language
//! detection: any accented letter, non-Latin script or punctuation other than
//! `.`, `,` and `-` yields [`Language::Other`].

use lazy_static::lazy_static;
use regex_lite::Regex;
use serde::Serialize;

use crate::terms::{CONTENT_FAMILIES, ENGLISH_EXTRA_CHARS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ImageType {
    Photograph,
    Diagram,
    Graph,
    Screenshot,
    TextBasedImage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Language {
    English,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub image_type: ImageType,
    pub language: Language,
}

lazy_static! {
    static ref FAMILY_PATTERNS: Vec<(ImageType, Regex)> = CONTENT_FAMILIES
        .iter()
        .filter_map(|(image_type, words)| {
            let alternation = words
                .iter()
                .map(|word| regex_lite::escape(word))
                .collect::<Vec<_>>()
                .join("|");
            Regex::new(&format!(r"(?i)\b(?:{alternation})\b"))
                .ok()
                .map(|re| (*image_type, re))
        })
        .collect();
}

/// Classify `text`. Total: every input yields one image type and one language.
pub fn classify(text: &str) -> Classification {
    Classification {
        image_type: image_type(text),
        language: language(text),
    }
}

fn image_type(text: &str) -> ImageType {
    FAMILY_PATTERNS
        .iter()
        .find(|(_, re)| re.is_match(text))
        .map(|(image_type, _)| *image_type)
        .unwrap_or(ImageType::Photograph)
}

fn language(text: &str) -> Language {
    let english = text.chars().all(|c| {
        c.is_ascii_alphanumeric() || c.is_whitespace() || ENGLISH_EXTRA_CHARS.contains(&c)
    });
    if english {
        Language::English
    } else {
        Language::Other
    }
}
