//! Enhancement workflow DTOs
//!
//! Suggestion sets coming back from the suggestion service, the options a
//! user picks from them, and the images the generation service produces.

use std::collections::BTreeMap;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use super::ImageFile;
use crate::types::{PhotomonixError, Result};

/// Categories every suggestion response must contain
pub const REQUIRED_CATEGORIES: &[&str] = &["Background", "Lighting", "Style"];

// =============================================================================
// Suggestions
// =============================================================================

/// Categorized enhancement ideas (category -> suggestions)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SuggestionSet(pub BTreeMap<String, Vec<String>>);

impl SuggestionSet {
    pub fn new(categories: BTreeMap<String, Vec<String>>) -> Self {
        Self(categories)
    }

    /// Check the response carries the categories the workflow relies on
    pub fn validate(&self) -> Result<()> {
        let missing = REQUIRED_CATEGORIES
            .iter()
            .any(|category| !self.0.contains_key(*category));
        if missing {
            return Err(PhotomonixError::InvalidResponse(
                "suggestion service".to_string(),
            ));
        }
        Ok(())
    }

    pub fn get(&self, category: &str) -> Option<&[String]> {
        self.0.get(category).map(Vec::as_slice)
    }

    pub fn categories(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Total number of suggestions across categories
    pub fn total(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }
}

// =============================================================================
// Selected Options
// =============================================================================

/// Options picked by the user (category -> options)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectedOptions(pub BTreeMap<String, Vec<String>>);

impl SelectedOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one option under a category
    pub fn select(&mut self, category: impl Into<String>, option: impl Into<String>) {
        self.0.entry(category.into()).or_default().push(option.into());
    }

    /// Parse a `Category=Option` pair, as given on the command line
    pub fn parse_pair(pair: &str) -> Result<(String, String)> {
        let (category, option) = pair.split_once('=').ok_or_else(|| {
            PhotomonixError::validation(format!(
                "Invalid option '{}': expected Category=Option",
                pair
            ))
        })?;
        Ok((category.trim().to_string(), option.trim().to_string()))
    }

    /// Drop blank option strings and categories left empty
    pub fn cleaned(&self) -> Self {
        let cleaned = self
            .0
            .iter()
            .filter_map(|(category, options)| {
                let kept: Vec<String> = options
                    .iter()
                    .filter(|o| !o.trim().is_empty())
                    .cloned()
                    .collect();
                (!kept.is_empty()).then(|| (category.clone(), kept))
            })
            .collect();
        Self(cleaned)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.0.iter()
    }
}

// =============================================================================
// Generation
// =============================================================================

/// Everything the generation service needs for one run
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub image: ImageFile,
    pub options: SelectedOptions,
    /// Free-text notes; blank notes are not sent
    pub reference_notes: String,
}

impl GenerationRequest {
    pub fn new(image: ImageFile, options: SelectedOptions) -> Self {
        Self {
            image,
            options,
            reference_notes: String::new(),
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.reference_notes = notes.into();
        self
    }
}

/// One enhanced image variant
#[derive(Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    /// Decoded PNG bytes
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for GeneratedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneratedImage")
            .field("size", &self.bytes.len())
            .finish()
    }
}

impl GeneratedImage {
    /// Decode a base64 payload from the generation service
    pub fn from_base64(encoded: &str) -> Result<Self> {
        let bytes = STANDARD.decode(encoded.trim()).map_err(|e| {
            PhotomonixError::InvalidResponse(format!("image service (bad base64: {})", e))
        })?;
        Ok(Self { bytes })
    }

    /// Render as a `data:` URL for embedding
    pub fn data_url(&self) -> String {
        format!("data:image/png;base64,{}", STANDARD.encode(&self.bytes))
    }
}

/// Result of a generation run
#[derive(Debug, Clone)]
pub struct GenerationResult {
    pub images: Vec<GeneratedImage>,
    /// Prompt the service actually used
    pub prompt_used: String,
    /// Formatted enhancement text
    pub enh_text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn suggestions(categories: &[&str]) -> SuggestionSet {
        SuggestionSet::new(
            categories
                .iter()
                .map(|c| (c.to_string(), vec![format!("{} idea", c)]))
                .collect(),
        )
    }

    #[test]
    fn test_suggestion_set_requires_core_categories() {
        assert!(suggestions(&["Background", "Lighting", "Style"]).validate().is_ok());
        assert!(
            suggestions(&["Background", "Lighting", "Style", "Focus"])
                .validate()
                .is_ok()
        );

        let err = suggestions(&["Background", "Lighting"]).validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid response format from suggestion service"
        );
    }

    #[test]
    fn test_suggestion_set_deserializes_from_map() {
        let json = r#"{"Background":["White"],"Lighting":["Soft"],"Style":["Matte","Glossy"]}"#;
        let set: SuggestionSet = serde_json::from_str(json).unwrap();
        assert_eq!(set.total(), 4);
        assert_eq!(set.get("Style").unwrap(), &["Matte", "Glossy"]);
    }

    #[test]
    fn test_cleaned_drops_blank_entries() {
        let mut options = SelectedOptions::new();
        options.select("Background", "Studio background");
        options.select("Background", "   ");
        options.select("Lighting", "");
        options.select("Style", "Matte professional style");

        let cleaned = options.cleaned();
        assert_eq!(cleaned.0.len(), 2);
        assert_eq!(cleaned.0["Background"], vec!["Studio background"]);
        assert!(!cleaned.0.contains_key("Lighting"));
    }

    #[test]
    fn test_cleaned_serializes_as_plain_object() {
        let mut options = SelectedOptions::new();
        options.select("Focus", "Logo clarity");
        let json = serde_json::to_string(&options.cleaned()).unwrap();
        assert_eq!(json, r#"{"Focus":["Logo clarity"]}"#);
    }

    #[test]
    fn test_parse_pair() {
        let (category, option) =
            SelectedOptions::parse_pair("Background = Pure white background").unwrap();
        assert_eq!(category, "Background");
        assert_eq!(option, "Pure white background");

        assert!(SelectedOptions::parse_pair("no separator").is_err());
    }

    #[test]
    fn test_generated_image_base64() {
        let image = GeneratedImage::from_base64("iVBORw0KGgo=").unwrap();
        assert_eq!(image.bytes, b"\x89PNG\r\n\x1a\n");
        assert_eq!(image.data_url(), "data:image/png;base64,iVBORw0KGgo=");

        assert!(GeneratedImage::from_base64("***").is_err());
    }
}
