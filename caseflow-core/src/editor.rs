//! In-memory editing session for a pipeline's stage configuration
//!
//! The session holds the server-confirmed stage list plus an optional
//! working copy. The working copy's presence *is* the dirty flag; there is
//! no separate boolean to keep in sync. Reordering is a plain vector
//! splice, driven either directly or through the drag-preview methods that
//! a gesture-based frontend maps onto.
//!
//! Sessions are ephemeral: they live for one editing interaction and are
//! discarded on navigation or an explicit [`EditSession::discard`].

use thiserror::Error;
use uuid::Uuid;

use crate::domain::pipeline::Pipeline;
use crate::domain::stage::{PipelineStage, StageType, slugify};
use crate::dto::pipeline::SaveStagesRequest;

/// Result type alias for editor operations
pub type Result<T> = std::result::Result<T, EditError>;

/// Errors from in-memory stage editing
///
/// Everything at this layer is pure state manipulation; the only failures
/// are positional.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("stage index {index} out of bounds (list has {len} stages)")]
    OutOfBounds { index: usize, len: usize },

    #[error("no stage with slug '{0}' in this pipeline")]
    UnknownSlug(String),

    #[error("no drag in progress")]
    NoActiveDrag,
}

/// Pending drag gesture state.
#[derive(Debug)]
struct DragState {
    /// Current index of the stage being dragged; updated on every
    /// intermediate move so consecutive previews compose.
    index: usize,
    /// Stage list as it was when the drag started.
    snapshot: Vec<PipelineStage>,
    was_dirty: bool,
}

/// Editing session over one pipeline's stage list.
///
/// Captures the pipeline's `current_version` as the session baseline at
/// construction. Every save request built from this session carries that
/// baseline, so a concurrent save from another session is still detected
/// even if it lands mid-edit.
///
/// # Example
/// ```
/// use caseflow_core::editor::EditSession;
/// # use caseflow_core::domain::pipeline::Pipeline;
/// # use caseflow_core::domain::stage::PipelineStage;
/// # let pipeline = Pipeline {
/// #     id: uuid::Uuid::new_v4(),
/// #     name: "Surrogates".to_string(),
/// #     is_default: true,
/// #     stages: vec![
/// #         PipelineStage::new("new", "New", "#4A90D9", 1),
/// #         PipelineStage::new("contacted", "Contacted", "#50B83C", 2),
/// #     ],
/// #     current_version: 3,
/// #     created_at: chrono::Utc::now(),
/// #     updated_at: chrono::Utc::now(),
/// # };
///
/// let mut session = EditSession::new(&pipeline);
/// assert!(!session.is_dirty());
///
/// session.reorder(1, 0)?;
/// assert!(session.is_dirty());
///
/// let request = session.save_request(Some("swap first two".to_string()));
/// assert_eq!(request.expected_version, 3);
/// # Ok::<(), caseflow_core::editor::EditError>(())
/// ```
#[derive(Debug)]
pub struct EditSession {
    pipeline_id: Uuid,
    baseline_version: i64,
    confirmed: Vec<PipelineStage>,
    working: Option<Vec<PipelineStage>>,
    drag: Option<DragState>,
}

impl EditSession {
    /// Opens a session against server-confirmed pipeline state.
    pub fn new(pipeline: &Pipeline) -> Self {
        Self {
            pipeline_id: pipeline.id,
            baseline_version: pipeline.current_version,
            confirmed: pipeline.ordered_stages(),
            working: None,
            drag: None,
        }
    }

    /// The pipeline this session edits.
    pub fn pipeline_id(&self) -> Uuid {
        self.pipeline_id
    }

    /// The `current_version` captured when the session was opened.
    pub fn baseline_version(&self) -> i64 {
        self.baseline_version
    }

    /// Whether the session holds unsaved changes.
    pub fn is_dirty(&self) -> bool {
        self.working.is_some()
    }

    /// The stage list as currently edited (the working copy when present,
    /// otherwise the confirmed baseline).
    pub fn stages(&self) -> &[PipelineStage] {
        self.working.as_deref().unwrap_or(&self.confirmed)
    }

    /// Index of the stage with the given slug.
    pub fn index_of(&self, slug: &str) -> Result<usize> {
        self.stages()
            .iter()
            .position(|s| s.slug == slug)
            .ok_or_else(|| EditError::UnknownSlug(slug.to_string()))
    }

    // =============================================================================
    // Editing operations
    // =============================================================================

    /// Moves the stage at `from` so it ends up at `to`, shifting the
    /// intervening stages, then renumbers `order` contiguously from 1.
    ///
    /// `from == to` is a no-op and leaves the session clean.
    pub fn reorder(&mut self, from: usize, to: usize) -> Result<()> {
        let len = self.stages().len();
        self.check_bounds(from, len)?;
        self.check_bounds(to, len)?;
        if from == to {
            return Ok(());
        }

        let stages = self.working_mut();
        let stage = stages.remove(from);
        stages.insert(to, stage);
        renumber(stages);
        Ok(())
    }

    /// Replaces the display label of the stage at `index`.
    pub fn update_label(&mut self, index: usize, label: impl Into<String>) -> Result<()> {
        let len = self.stages().len();
        self.check_bounds(index, len)?;
        self.working_mut()[index].label = label.into();
        Ok(())
    }

    /// Replaces the display color of the stage at `index`.
    pub fn update_color(&mut self, index: usize, color: impl Into<String>) -> Result<()> {
        let len = self.stages().len();
        self.check_bounds(index, len)?;
        self.working_mut()[index].color = color.into();
        Ok(())
    }

    /// Archives or restores the stage at `index`. The slug stays reserved
    /// either way.
    pub fn set_active(&mut self, index: usize, active: bool) -> Result<()> {
        let len = self.stages().len();
        self.check_bounds(index, len)?;
        self.working_mut()[index].is_active = active;
        Ok(())
    }

    /// Appends a new stage, deriving a slug from the label (suffixed with a
    /// counter when the derived slug is already taken).
    ///
    /// Returns the slug of the new stage.
    pub fn add_stage(
        &mut self,
        label: impl Into<String>,
        color: impl Into<String>,
        stage_type: StageType,
    ) -> String {
        let label = label.into();
        let slug = unique_slug(&slugify(&label), self.stages());

        let stages = self.working_mut();
        let order = stages.len() as u32 + 1;
        let mut stage = PipelineStage::new(slug.clone(), label, color, order);
        stage.stage_type = stage_type;
        stages.push(stage);

        slug
    }

    // =============================================================================
    // Drag gesture support
    // =============================================================================

    /// Starts a drag from `index`, snapshotting the list so the gesture can
    /// be cancelled.
    pub fn begin_drag(&mut self, index: usize) -> Result<()> {
        let len = self.stages().len();
        self.check_bounds(index, len)?;
        self.drag = Some(DragState {
            index,
            snapshot: self.stages().to_vec(),
            was_dirty: self.is_dirty(),
        });
        Ok(())
    }

    /// Applies a live reorder preview as the drag passes over `index`.
    ///
    /// Consecutive calls compose: each one moves the dragged stage from its
    /// current preview position to the new one.
    pub fn drag_over(&mut self, index: usize) -> Result<()> {
        let from = match &self.drag {
            Some(drag) => drag.index,
            None => return Err(EditError::NoActiveDrag),
        };
        self.reorder(from, index)?;
        if let Some(drag) = self.drag.as_mut() {
            drag.index = index;
        }
        Ok(())
    }

    /// Finalizes the drag, keeping the previewed order.
    pub fn end_drag(&mut self) {
        self.drag = None;
    }

    /// Abandons the drag, restoring the list as it was when the drag began.
    pub fn cancel_drag(&mut self) {
        if let Some(drag) = self.drag.take() {
            self.working = drag.was_dirty.then_some(drag.snapshot);
        }
    }

    // =============================================================================
    // Session lifecycle
    // =============================================================================

    /// Drops all unsaved changes, returning to the confirmed baseline.
    pub fn discard(&mut self) {
        self.working = None;
        self.drag = None;
    }

    /// Builds the save payload: the complete stage list plus the baseline
    /// version captured at edit start.
    pub fn save_request(&self, comment: Option<String>) -> SaveStagesRequest {
        SaveStagesRequest {
            stages: self.stages().to_vec(),
            expected_version: self.baseline_version,
            comment,
        }
    }

    /// Resets the session to fresh server truth after a successful save or
    /// an external refetch.
    pub fn absorb(&mut self, pipeline: &Pipeline) {
        self.pipeline_id = pipeline.id;
        self.baseline_version = pipeline.current_version;
        self.confirmed = pipeline.ordered_stages();
        self.working = None;
        self.drag = None;
    }

    fn check_bounds(&self, index: usize, len: usize) -> Result<()> {
        if index >= len {
            return Err(EditError::OutOfBounds { index, len });
        }
        Ok(())
    }

    /// The working copy, materialized from the baseline on first mutation.
    fn working_mut(&mut self) -> &mut Vec<PipelineStage> {
        self.working.get_or_insert_with(|| self.confirmed.clone())
    }
}

/// Reassigns contiguous 1-based `order` values matching list position.
fn renumber(stages: &mut [PipelineStage]) {
    for (i, stage) in stages.iter_mut().enumerate() {
        stage.order = i as u32 + 1;
    }
}

/// Appends `-2`, `-3`, ... until the slug is unused. An empty base (label
/// with no alphanumerics) falls back to `stage`.
fn unique_slug(base: &str, stages: &[PipelineStage]) -> String {
    let base = if base.is_empty() { "stage" } else { base };
    let taken = |slug: &str| stages.iter().any(|s| s.slug == slug);

    if !taken(base) {
        return base.to_string();
    }
    let mut n = 2;
    loop {
        let candidate = format!("{}-{}", base, n);
        if !taken(&candidate) {
            return candidate;
        }
        n += 1;
    }
}
