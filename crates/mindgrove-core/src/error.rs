pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("cannot move node {source_id} under {target_id}: target is one of its descendants")]
    CannotReparentIntoDescendant {
        source_id: String,
        target_id: String,
    },

    #[error("node not found: {id}")]
    NodeNotFound { id: String },

    #[error("node data patch may not change structural field `{field}`")]
    StructuralField { field: String },

    #[error("invalid node data patch: {message}")]
    InvalidPatch { message: String },

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn node_not_found(id: &str) -> Self {
        Self::NodeNotFound { id: id.to_string() }
    }
}
