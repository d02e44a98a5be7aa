pub type Result<T> = std::result::Result<T, MindmapError>;

#[derive(Debug, thiserror::Error)]
pub enum MindmapError {
    #[error(transparent)]
    Core(#[from] mindgrove_core::Error),
    #[error(transparent)]
    Layout(#[from] mindgrove_layout::Error),
}

impl MindmapError {
    /// True for a rejected reparent, the one failure hosts are expected to surface to users.
    pub fn is_rejected_reparent(&self) -> bool {
        matches!(
            self,
            MindmapError::Core(mindgrove_core::Error::CannotReparentIntoDescendant { .. })
        )
    }
}
