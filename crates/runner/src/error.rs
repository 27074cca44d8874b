use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The drain loop hit its step budget with events still pending.
    #[error("pipeline not drained after {max_steps} steps")]
    NotDrained { max_steps: u64 },

    #[error(transparent)]
    Pipeline(#[from] aegis_pipeline::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
