//! Editing-workflow tests against an in-memory API implementation
//!
//! `InMemoryCrm` models the server contract the client is written against:
//! compare-and-swap on `current_version`, an append-only version log, and a
//! developer-role gate on history access. The tests drive full edit
//! sessions through the [`PipelineApi`] trait, the same seam the console
//! uses.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use caseflow_client::PipelineApi;
use caseflow_client::error::{ClientError, Result};
use caseflow_core::domain::auth::{AuthContext, Role};
use caseflow_core::domain::pipeline::{Pipeline, PipelineSummary};
use caseflow_core::domain::stage::PipelineStage;
use caseflow_core::domain::version::PipelineVersion;
use caseflow_core::dto::pipeline::SaveStagesRequest;
use caseflow_core::dto::version::VersionEntry;
use caseflow_core::editor::EditSession;
use caseflow_core::validate::validate_stages;

#[derive(Default)]
struct Store {
    pipelines: HashMap<Uuid, Pipeline>,
    versions: HashMap<Uuid, Vec<PipelineVersion>>,
}

/// In-memory stand-in for the CRM backend.
struct InMemoryCrm {
    caller: AuthContext,
    store: Mutex<Store>,
}

impl InMemoryCrm {
    fn new(role: Role) -> Self {
        Self {
            caller: AuthContext::new(Uuid::new_v4(), role),
            store: Mutex::new(Store::default()),
        }
    }

    /// Creates a pipeline at version 1 with one version record.
    fn seed_pipeline(&self, name: &str, slugs: &[&str]) -> Uuid {
        let stages: Vec<PipelineStage> = slugs
            .iter()
            .enumerate()
            .map(|(i, slug)| {
                PipelineStage::new(*slug, slug.to_uppercase(), "#4A90D9", i as u32 + 1)
            })
            .collect();
        let pipeline = Pipeline {
            id: Uuid::new_v4(),
            name: name.to_string(),
            is_default: false,
            stages: stages.clone(),
            current_version: 1,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let mut store = self.store.lock().unwrap();
        store.versions.insert(
            pipeline.id,
            vec![PipelineVersion {
                id: Uuid::new_v4(),
                version: 1,
                payload: stages,
                comment: Some("initial configuration".to_string()),
                created_by_user_id: self.caller.user_id,
                created_at: Utc::now(),
            }],
        );
        let id = pipeline.id;
        store.pipelines.insert(id, pipeline);
        id
    }

    /// Raw stored record, bypassing the role gate, for immutability checks.
    fn stored_version(&self, pipeline_id: Uuid, version: i64) -> Option<PipelineVersion> {
        self.store
            .lock()
            .unwrap()
            .versions
            .get(&pipeline_id)?
            .iter()
            .find(|v| v.version == version)
            .cloned()
    }

    fn clear_history(&self, pipeline_id: Uuid) {
        if let Some(log) = self.store.lock().unwrap().versions.get_mut(&pipeline_id) {
            log.clear();
        }
    }
}

#[async_trait]
impl PipelineApi for InMemoryCrm {
    async fn fetch_pipelines(&self) -> Result<Vec<PipelineSummary>> {
        let store = self.store.lock().unwrap();
        Ok(store
            .pipelines
            .values()
            .map(|p| PipelineSummary {
                id: p.id,
                name: p.name.clone(),
                is_default: p.is_default,
                stage_count: p.stages.len() as u32,
                current_version: p.current_version,
            })
            .collect())
    }

    async fn fetch_pipeline(&self, pipeline_id: Uuid) -> Result<Pipeline> {
        let store = self.store.lock().unwrap();
        store.pipelines.get(&pipeline_id).cloned().ok_or_else(|| {
            ClientError::NotFound {
                message: format!("pipeline {} does not exist", pipeline_id),
            }
        })
    }

    async fn fetch_versions(&self, pipeline_id: Uuid) -> Result<Vec<VersionEntry>> {
        if !self.caller.role.can_view_versions() {
            return Err(ClientError::Forbidden {
                message: "version history requires the developer role".to_string(),
            });
        }

        let store = self.store.lock().unwrap();
        let pipeline = store
            .pipelines
            .get(&pipeline_id)
            .ok_or_else(|| ClientError::NotFound {
                message: format!("pipeline {} does not exist", pipeline_id),
            })?;

        let mut entries: Vec<VersionEntry> = store
            .versions
            .get(&pipeline_id)
            .map(|log| {
                log.iter()
                    .map(|v| VersionEntry {
                        version: v.version,
                        payload_preview: v.payload.iter().map(|s| s.label.clone()).collect(),
                        comment: v.comment.clone(),
                        created_at: v.created_at,
                        is_current: v.version == pipeline.current_version,
                    })
                    .collect()
            })
            .unwrap_or_default();
        entries.sort_by(|a, b| b.version.cmp(&a.version));
        Ok(entries)
    }

    async fn save_stages(&self, pipeline_id: Uuid, req: SaveStagesRequest) -> Result<Pipeline> {
        let mut store = self.store.lock().unwrap();
        let store = &mut *store;
        let pipeline = store
            .pipelines
            .get_mut(&pipeline_id)
            .ok_or_else(|| ClientError::NotFound {
                message: format!("pipeline {} does not exist", pipeline_id),
            })?;

        validate_stages(&req.stages).map_err(|e| ClientError::Validation {
            message: e.to_string(),
        })?;

        if req.expected_version != pipeline.current_version {
            return Err(ClientError::VersionConflict {
                message: format!(
                    "expected version {}, current is {}",
                    req.expected_version, pipeline.current_version
                ),
            });
        }

        pipeline.current_version += 1;
        pipeline.stages = req.stages.clone();
        pipeline.updated_at = Utc::now();
        store
            .versions
            .entry(pipeline_id)
            .or_default()
            .push(PipelineVersion {
                id: Uuid::new_v4(),
                version: pipeline.current_version,
                payload: req.stages,
                comment: req.comment,
                created_by_user_id: self.caller.user_id,
                created_at: Utc::now(),
            });
        Ok(pipeline.clone())
    }

    async fn rollback(&self, pipeline_id: Uuid, version: i64) -> Result<Pipeline> {
        if !self.caller.role.can_rollback() {
            return Err(ClientError::Forbidden {
                message: "rollback requires the developer role".to_string(),
            });
        }

        let mut store = self.store.lock().unwrap();
        let store = &mut *store;
        let pipeline = store
            .pipelines
            .get_mut(&pipeline_id)
            .ok_or_else(|| ClientError::NotFound {
                message: format!("pipeline {} does not exist", pipeline_id),
            })?;

        let log = store.versions.entry(pipeline_id).or_default();
        let payload = log
            .iter()
            .find(|v| v.version == version)
            .map(|v| v.payload.clone())
            .ok_or_else(|| ClientError::NotFound {
                message: format!("version {} does not exist", version),
            })?;

        pipeline.current_version += 1;
        pipeline.stages = payload.clone();
        pipeline.updated_at = Utc::now();
        log.push(PipelineVersion {
            id: Uuid::new_v4(),
            version: pipeline.current_version,
            payload,
            comment: Some(format!("rollback of version {}", version)),
            created_by_user_id: self.caller.user_id,
            created_at: Utc::now(),
        });
        Ok(pipeline.clone())
    }
}

#[tokio::test]
async fn test_reorder_save_bumps_version_once() {
    let crm = InMemoryCrm::new(Role::Operator);
    let id = crm.seed_pipeline("Surrogates", &["new", "contacted"]);

    let pipeline = crm.fetch_pipeline(id).await.unwrap();
    let mut session = EditSession::new(&pipeline);
    session.reorder(0, 1).unwrap();

    let saved = crm
        .save_stages(id, session.save_request(Some("swap".to_string())))
        .await
        .unwrap();

    assert_eq!(saved.current_version, pipeline.current_version + 1);
    assert_eq!(
        saved.ordered_stages().iter().map(|s| s.slug.as_str()).collect::<Vec<_>>(),
        vec!["contacted", "new"]
    );

    session.absorb(&saved);
    assert!(!session.is_dirty());
}

#[tokio::test]
async fn test_concurrent_save_conflicts_then_recovers() {
    let crm = InMemoryCrm::new(Role::Operator);
    let id = crm.seed_pipeline("Surrogates", &["new", "contacted"]);

    let fetched = crm.fetch_pipeline(id).await.unwrap();
    let mut first = EditSession::new(&fetched);
    let mut second = EditSession::new(&fetched);

    // The second session lands first.
    second.update_label(0, "Fresh Inquiry").unwrap();
    crm.save_stages(id, second.save_request(None)).await.unwrap();

    // The first session's baseline is now stale.
    first.reorder(0, 1).unwrap();
    let err = crm
        .save_stages(id, first.save_request(None))
        .await
        .unwrap_err();
    assert!(err.is_conflict(), "expected a version conflict, got {err}");

    // Recovery: refetch, reapply the intent, save against the new baseline.
    let current = crm.fetch_pipeline(id).await.unwrap();
    let mut retry = EditSession::new(&current);
    retry.reorder(0, 1).unwrap();
    let saved = crm.save_stages(id, retry.save_request(None)).await.unwrap();

    assert_eq!(saved.current_version, current.current_version + 1);
    assert_eq!(saved.ordered_stages()[1].label, "Fresh Inquiry");
}

#[tokio::test]
async fn test_rollback_copies_payload_without_touching_history() {
    let crm = InMemoryCrm::new(Role::Developer);
    let id = crm.seed_pipeline("Surrogates", &["new", "contacted"]);

    // v2: relabel and recolor.
    let pipeline = crm.fetch_pipeline(id).await.unwrap();
    let mut session = EditSession::new(&pipeline);
    session.update_label(0, "Fresh Inquiry").unwrap();
    session.update_color(1, "#FF8800").unwrap();
    crm.save_stages(id, session.save_request(Some("restyle".to_string())))
        .await
        .unwrap();

    let v1_before = crm.stored_version(id, 1).unwrap();

    // Roll back to v1: a new v3 appears, v1 is untouched.
    let rolled = crm.rollback(id, 1).await.unwrap();
    assert_eq!(rolled.current_version, 3);
    assert_eq!(rolled.stages, v1_before.payload);

    let v1_after = crm.stored_version(id, 1).unwrap();
    assert_eq!(v1_after, v1_before);

    // Roll forward is still possible: v2 kept its record too.
    let forward = crm.rollback(id, 2).await.unwrap();
    assert_eq!(forward.current_version, 4);
    assert_eq!(forward.stages[0].label, "Fresh Inquiry");
}

#[tokio::test]
async fn test_version_listing_is_descending_with_current_flagged() {
    let crm = InMemoryCrm::new(Role::Developer);
    let id = crm.seed_pipeline("Surrogates", &["new", "contacted"]);

    for label in ["First pass", "Second pass"] {
        let pipeline = crm.fetch_pipeline(id).await.unwrap();
        let mut session = EditSession::new(&pipeline);
        session.update_label(0, label).unwrap();
        crm.save_stages(id, session.save_request(None)).await.unwrap();
    }

    let entries = crm.fetch_versions(id).await.unwrap();
    let versions: Vec<i64> = entries.iter().map(|e| e.version).collect();
    assert_eq!(versions, vec![3, 2, 1]);

    let current: Vec<i64> = entries
        .iter()
        .filter(|e| e.is_current)
        .map(|e| e.version)
        .collect();
    assert_eq!(current, vec![3]);
    assert_eq!(entries[0].payload_preview[0], "Second pass");
}

#[tokio::test]
async fn test_forbidden_history_is_distinct_from_empty() {
    // An operator gets a permission failure, not an empty list.
    let crm = InMemoryCrm::new(Role::Operator);
    let id = crm.seed_pipeline("Surrogates", &["new"]);
    let err = crm.fetch_versions(id).await.unwrap_err();
    assert!(err.is_forbidden());

    // A developer looking at a pipeline with no history gets Ok(empty).
    let crm = InMemoryCrm::new(Role::Developer);
    let id = crm.seed_pipeline("Surrogates", &["new"]);
    crm.clear_history(id);
    let entries = crm.fetch_versions(id).await.unwrap();
    assert!(entries.is_empty());
}

#[tokio::test]
async fn test_rollback_role_gate() {
    let crm = InMemoryCrm::new(Role::Operator);
    let id = crm.seed_pipeline("Surrogates", &["new"]);
    let err = crm.rollback(id, 1).await.unwrap_err();
    assert!(err.is_forbidden());
}

#[tokio::test]
async fn test_rollback_to_missing_version_is_not_found() {
    let crm = InMemoryCrm::new(Role::Developer);
    let id = crm.seed_pipeline("Surrogates", &["new"]);
    let err = crm.rollback(id, 7).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_label_edit_leaves_other_stages_untouched() {
    let crm = InMemoryCrm::new(Role::Operator);
    let id = crm.seed_pipeline("Surrogates", &["new", "contacted", "matched"]);

    let pipeline = crm.fetch_pipeline(id).await.unwrap();
    let original = pipeline.ordered_stages();

    let mut session = EditSession::new(&pipeline);
    let index = session.index_of("new").unwrap();
    session.update_label(index, "New Lead").unwrap();

    let saved = crm.save_stages(id, session.save_request(None)).await.unwrap();
    let saved_stages = saved.ordered_stages();

    assert_eq!(saved_stages[0].label, "New Lead");
    assert_eq!(saved_stages[0].slug, "new");
    assert_eq!(saved_stages[0].color, original[0].color);
    assert_eq!(&saved_stages[1..], &original[1..]);
}

#[tokio::test]
async fn test_save_rejects_malformed_list() {
    let crm = InMemoryCrm::new(Role::Operator);
    let id = crm.seed_pipeline("Surrogates", &["new"]);

    let err = crm
        .save_stages(
            id,
            SaveStagesRequest {
                stages: vec![],
                expected_version: 1,
                comment: None,
            },
        )
        .await
        .unwrap_err();
    assert!(err.is_validation());

    // A rejected save does not advance the version.
    let pipeline = crm.fetch_pipeline(id).await.unwrap();
    assert_eq!(pipeline.current_version, 1);
}

#[tokio::test]
async fn test_stale_baseline_is_caught_even_after_long_edit() {
    let crm = InMemoryCrm::new(Role::Operator);
    let id = crm.seed_pipeline("Surrogates", &["new", "contacted"]);

    let fetched = crm.fetch_pipeline(id).await.unwrap();
    let mut session = EditSession::new(&fetched);

    // External change lands while this session keeps editing.
    let other = crm.fetch_pipeline(id).await.unwrap();
    let mut external = EditSession::new(&other);
    external.update_color(0, "#222222").unwrap();
    crm.save_stages(id, external.save_request(None)).await.unwrap();

    session.reorder(0, 1).unwrap();
    session.update_label(0, "Reached").unwrap();

    // The request still carries the baseline captured at edit start.
    let request = session.save_request(None);
    assert_eq!(request.expected_version, fetched.current_version);
    let err = crm.save_stages(id, request).await.unwrap_err();
    assert!(err.is_conflict());
}

#[tokio::test]
async fn test_pipeline_listing_reflects_saves() {
    let crm = InMemoryCrm::new(Role::Operator);
    let id = crm.seed_pipeline("Surrogates", &["new", "contacted"]);
    crm.seed_pipeline("Intended Parents", &["inquiry"]);

    let pipeline = crm.fetch_pipeline(id).await.unwrap();
    let mut session = EditSession::new(&pipeline);
    session.add_stage("Matched", "#9C27B0", caseflow_core::domain::stage::StageType::Standard);
    crm.save_stages(id, session.save_request(None)).await.unwrap();

    let mut summaries = crm.fetch_pipelines().await.unwrap();
    summaries.sort_by(|a, b| a.name.cmp(&b.name));
    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[1].name, "Surrogates");
    assert_eq!(summaries[1].stage_count, 3);
    assert_eq!(summaries[1].current_version, 2);
}
