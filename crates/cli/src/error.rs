#[derive(Debug, thiserror::Error)]
pub(crate) enum Error {
    #[error("{0}")]
    Generic(String),
    #[error("IO error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("Serde error: {0}")]
    SerdeError(#[from] serde_json::Error),
    #[error("Find error: {0}")]
    FindError(#[from] slotscan_core::slotscan_slot::Error),
    #[error("Holder error: {0}")]
    HolderError(#[from] slotscan_core::slotscan_holder::Error),
}
