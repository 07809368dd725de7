//! Caseflow Core
//!
//! Core types and abstractions for the Caseflow pipeline configuration
//! tools.
//!
//! This crate contains:
//! - Domain types: business entities shared across the workspace
//!   (Pipeline, PipelineStage, PipelineVersion, caller roles)
//! - DTOs: request and response shapes for the CRM API
//! - The edit session: the in-memory working copy of a stage list,
//!   with reorder/relabel/recolor operations and dirty tracking
//! - Stage list validation shared by every save path

pub mod domain;
pub mod dto;
pub mod editor;
pub mod validate;
