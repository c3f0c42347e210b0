//! Enhancement Catalog
//!
//! Static list of the enhancement categories and the options offered under
//! each, independent of what the suggestion service proposes.

pub struct EnhancementCategory {
    pub name: &'static str,
    pub options: &'static [&'static str],
}

pub const ENHANCEMENT_CATEGORIES: &[EnhancementCategory] = &[
    EnhancementCategory {
        name: "Background",
        options: &[
            "Pure white background (255,255,255)",
            "Solid color background",
            "Gradient background",
            "Transparent background",
            "Lifestyle background",
            "Studio background",
            "Shadow type (soft, drop, none)",
        ],
    },
    EnhancementCategory {
        name: "Lighting",
        options: &[
            "Soft box lighting",
            "Directional lighting",
            "Diffused lighting",
            "High-key lighting (bright)",
            "Low-key lighting (dramatic)",
            "Natural daylight style",
            "Highlight on edges",
            "Reflective control (for shiny objects)",
        ],
    },
    EnhancementCategory {
        name: "Style",
        options: &[
            "Minimalist clean style",
            "Premium glossy style",
            "Matte professional style",
            "Realistic product rendering",
            "Consistent brand aesthetic",
            "Color matching",
            "Exposure balance",
            "Contrast & sharpness tuning",
            "Retouching / cleanup (dust removal, scratch removal)",
        ],
    },
    EnhancementCategory {
        name: "Composition",
        options: &[
            "Front view",
            "45-degree angle",
            "Top view",
            "Side view",
            "Macro close-up",
            "In-hand view",
            "Floating product",
            "Center alignment",
            "Proper margins",
            "Rule of thirds",
        ],
    },
    EnhancementCategory {
        name: "Focus",
        options: &[
            "Edge sharpening",
            "Texture enhancement",
            "True-color accuracy",
            "Highlighting material (metal, plastic, fabric, wood, etc.)",
            "Removing noise",
            "Correcting distortions",
            "Label visibility",
            "Logo clarity",
            "Important feature focus (buttons, flame, texture, mechanism)",
        ],
    },
];

pub fn category_names() -> impl Iterator<Item = &'static str> {
    ENHANCEMENT_CATEGORIES.iter().map(|c| c.name)
}

/// Options for a category (case-insensitive); empty for unknown names
pub fn category_options(name: &str) -> &'static [&'static str] {
    ENHANCEMENT_CATEGORIES
        .iter()
        .find(|c| c.name.eq_ignore_ascii_case(name))
        .map(|c| c.options)
        .unwrap_or(&[])
}

pub fn total_options() -> usize {
    ENHANCEMENT_CATEGORIES.iter().map(|c| c.options.len()).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::REQUIRED_CATEGORIES;

    #[test]
    fn test_catalog_covers_required_categories() {
        let names: Vec<_> = category_names().collect();
        assert_eq!(names, ["Background", "Lighting", "Style", "Composition", "Focus"]);
        for required in REQUIRED_CATEGORIES {
            assert!(names.contains(required));
        }
    }

    #[test]
    fn test_lookup() {
        assert_eq!(category_options("lighting").len(), 8);
        assert!(category_options("Unknown").is_empty());
        assert_eq!(total_options(), 43);
    }
}
