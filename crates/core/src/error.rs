/// Errors raised by the project store.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid file name: {0}")]
    InvalidFileName(String),

    #[error("File already exists: {0}. Use overwrite to replace it.")]
    FileExists(String),

    #[error("File not found: {0}")]
    FileNotFound(String),
}
