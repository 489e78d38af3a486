use thiserror::Error;

#[derive(Error, Debug)]
pub enum LitmarkError {
    /// The code-analysis facility could not process a block's source code.
    /// Litmark performs no recovery; the host decides what to do.
    #[error("Code analysis failed: {0}")]
    Analysis(String),
}

pub type Result<T> = std::result::Result<T, LitmarkError>;
