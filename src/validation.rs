//! Input Validation
//!
//! Checks run before anything is queued: upload constraints on the image,
//! the shape of selected options, and reference note limits.

use std::sync::LazyLock;

use regex::Regex;

use crate::config::UploadConfig;
use crate::constants::upload::MAX_REFERENCE_NOTES;
use crate::types::{ImageFile, PhotomonixError, Result, SelectedOptions, ValidationError};

static HTML_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("static tag pattern"));

/// Trim, strip HTML-like tags and cap at the notes limit (in characters)
pub fn sanitize_reference_notes(text: &str) -> String {
    HTML_TAG
        .replace_all(text.trim(), "")
        .chars()
        .take(MAX_REFERENCE_NOTES)
        .collect()
}

/// Problems with the selected options; empty when valid
pub fn selected_options_problems(options: &SelectedOptions) -> Vec<String> {
    let mut problems = Vec::new();
    for (category, values) in options.iter() {
        if category.trim().is_empty() {
            problems.push("Category keys must be non-empty strings".to_string());
            continue;
        }
        for value in values {
            if value.trim().is_empty() {
                problems.push(format!(
                    "Invalid option for category {}: must be a non-empty string",
                    category
                ));
            }
        }
    }
    problems
}

pub fn validate_selected_options(options: &SelectedOptions) -> Result<()> {
    let problems = selected_options_problems(options);
    if problems.is_empty() {
        Ok(())
    } else {
        Err(PhotomonixError::Validation(
            ValidationError::from_problems(problems).with_field("selected"),
        ))
    }
}

/// Check a generation request, collecting every problem found
pub fn validate_generation_request(
    image: Option<&ImageFile>,
    options: &SelectedOptions,
    reference_notes: &str,
) -> Result<()> {
    let mut problems = Vec::new();

    if image.is_none() {
        problems.push("Image file is required".to_string());
    }

    problems.extend(selected_options_problems(options));

    if reference_notes.chars().count() > MAX_REFERENCE_NOTES {
        problems.push(format!(
            "Reference notes must be less than {} characters",
            MAX_REFERENCE_NOTES
        ));
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(PhotomonixError::Validation(ValidationError::from_problems(
            problems,
        )))
    }
}

/// Check type and size against upload limits
pub fn validate_image_file(image: &ImageFile, upload: &UploadConfig) -> Result<()> {
    if image.is_empty() {
        return Err(PhotomonixError::Validation(
            ValidationError::new("No file provided").with_field(&image.name),
        ));
    }

    if !upload
        .supported_formats
        .iter()
        .any(|format| format.eq_ignore_ascii_case(&image.content_type))
    {
        return Err(PhotomonixError::Validation(
            ValidationError::new("Invalid file type. Please upload JPEG, PNG, or WebP images.")
                .with_field(&image.name),
        ));
    }

    if image.len() > upload.max_file_size {
        return Err(PhotomonixError::Validation(
            ValidationError::new(format!(
                "File too large. Maximum size is {}MB.",
                upload.max_file_size / (1024 * 1024)
            ))
            .with_field(&image.name),
        ));
    }

    Ok(())
}
