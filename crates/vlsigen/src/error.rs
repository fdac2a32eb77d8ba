#[derive(thiserror::Error, Debug)]
#[allow(clippy::enum_variant_names)]
pub enum Error {
    #[error("Model request failed: {0}")]
    Upstream(String),

    #[error("Could not read model response: {0}")]
    Input(String),

    #[error("Invalid file: {0}")]
    InvalidFile(String),
}
