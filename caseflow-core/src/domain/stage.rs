//! Stage domain types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of a pipeline stage.
///
/// Terminal stages end a case's progression (for example "delivered" or
/// "withdrawn"); standard stages are intermediate steps a case moves
/// through.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageType {
    #[default]
    Standard,
    Terminal,
}

/// One step of a pipeline.
///
/// `slug` is the stable identity key: case records elsewhere in the CRM
/// reference stages by slug, so it never changes after creation. The display
/// label, color, position, and archival state are all editable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineStage {
    pub id: Uuid,
    pub slug: String,
    pub label: String,
    /// Display color as `#RRGGBB`.
    pub color: String,
    /// 1-based position within the pipeline. Must be contiguous across the
    /// stage list with no duplicates.
    pub order: u32,
    #[serde(default)]
    pub stage_type: StageType,
    /// Archived stages keep their slug (references stay resolvable) but are
    /// hidden from new-case selection.
    pub is_active: bool,
}

impl PipelineStage {
    /// Creates an active standard stage.
    pub fn new(
        slug: impl Into<String>,
        label: impl Into<String>,
        color: impl Into<String>,
        order: u32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            slug: slug.into(),
            label: label.into(),
            color: color.into(),
            order,
            stage_type: StageType::Standard,
            is_active: true,
        }
    }
}

/// Derives a slug from a display label: lowercased, alphanumeric runs
/// joined by single hyphens.
///
/// # Example
/// ```
/// use caseflow_core::domain::stage::slugify;
///
/// assert_eq!(slugify("Medical Screening"), "medical-screening");
/// ```
pub fn slugify(label: &str) -> String {
    let mut slug = String::with_capacity(label.len());
    let mut pending_hyphen = false;

    for c in label.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }

    slug
}
