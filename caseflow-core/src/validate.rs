//! Stage list validation
//!
//! Runs before a save request leaves the client. The server applies the
//! same rules and reports violations as a validation failure; checking here
//! saves the round-trip for lists that cannot possibly be accepted.

use thiserror::Error;

use crate::domain::stage::PipelineStage;

/// A stage list that cannot be saved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StageListError {
    #[error("stage list is empty")]
    Empty,

    #[error("stage '{slug}' has order {found}, expected {expected} (order must run 1..={len} with no gaps)")]
    NonContiguousOrder {
        slug: String,
        found: u32,
        expected: u32,
        len: u32,
    },

    #[error("duplicate stage slug '{0}'")]
    DuplicateSlug(String),

    #[error("invalid slug '{0}': expected lowercase letters, digits, and hyphens")]
    InvalidSlug(String),

    #[error("stage '{0}' has an empty label")]
    EmptyLabel(String),

    #[error("stage '{slug}' color '{color}' is not a #RRGGBB hex color")]
    InvalidColor { slug: String, color: String },
}

/// Validates a stage list as a complete save payload.
///
/// Checks, in order: non-empty list, contiguous 1-based `order`, unique
/// well-formed slugs, non-empty labels, `#RRGGBB` colors.
pub fn validate_stages(stages: &[PipelineStage]) -> Result<(), StageListError> {
    if stages.is_empty() {
        return Err(StageListError::Empty);
    }

    let len = stages.len() as u32;
    for (i, stage) in stages.iter().enumerate() {
        let expected = i as u32 + 1;
        if stage.order != expected {
            return Err(StageListError::NonContiguousOrder {
                slug: stage.slug.clone(),
                found: stage.order,
                expected,
                len,
            });
        }
    }

    let mut seen = std::collections::HashSet::new();
    for stage in stages {
        if !is_valid_slug(&stage.slug) {
            return Err(StageListError::InvalidSlug(stage.slug.clone()));
        }
        if !seen.insert(stage.slug.as_str()) {
            return Err(StageListError::DuplicateSlug(stage.slug.clone()));
        }
        if stage.label.trim().is_empty() {
            return Err(StageListError::EmptyLabel(stage.slug.clone()));
        }
        if !is_valid_color(&stage.color) {
            return Err(StageListError::InvalidColor {
                slug: stage.slug.clone(),
                color: stage.color.clone(),
            });
        }
    }

    Ok(())
}

fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

fn is_valid_color(color: &str) -> bool {
    let Some(hex) = color.strip_prefix('#') else {
        return false;
    };
    hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit())
}
