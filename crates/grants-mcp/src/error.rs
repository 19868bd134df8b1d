use grant_store::error::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}
