//! Common types used across CLI modules

use uuid::Uuid;

/// Pipeline selector that can be a full UUID, an unambiguous UUID prefix,
/// or an unambiguous name prefix
#[derive(Debug, Clone)]
pub enum PipelineRef {
    /// Full UUID
    Id(Uuid),
    /// Prefix matched against pipeline IDs and names
    Needle(String),
}

impl PipelineRef {
    /// Parse a string into a PipelineRef
    ///
    /// Attempts to parse as a full UUID first, otherwise treats the input
    /// as a prefix to resolve against the pipeline listing
    pub fn parse(input: &str) -> Self {
        if let Ok(uuid) = Uuid::parse_str(input) {
            PipelineRef::Id(uuid)
        } else {
            PipelineRef::Needle(input.to_string())
        }
    }

    /// Get the UUID if this is a full ID
    pub fn as_uuid(&self) -> Option<Uuid> {
        match self {
            PipelineRef::Id(uuid) => Some(*uuid),
            PipelineRef::Needle(_) => None,
        }
    }

    /// Get the selector as entered
    pub fn as_str(&self) -> String {
        match self {
            PipelineRef::Id(uuid) => uuid.to_string(),
            PipelineRef::Needle(needle) => needle.clone(),
        }
    }
}

impl std::fmt::Display for PipelineRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineRef::Id(uuid) => write!(f, "{}", uuid),
            PipelineRef::Needle(needle) => write!(f, "{}", needle),
        }
    }
}
