pub type Result<T> = std::result::Result<T, Error>;

/// Why a layout pass gave up. Callers of the recovering entry points never see these as hard
/// failures; they come back in [`crate::LayoutOutput::recovered`] next to the unchanged input.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("edge {edge_id} references a node that does not exist")]
    MissingEndpoint { edge_id: String },

    #[error("duplicate node id: {id}")]
    DuplicateNode { id: String },

    #[error("layout produced a non-finite position for node {id}")]
    NonFinitePosition { id: String },
}
