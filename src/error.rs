use thiserror::Error;

#[derive(Error, Debug)]
pub enum DiagramError {
    #[error("Invalid {attribute} for {path}: {value}")]
    InvalidAttribute {
        path: String,
        attribute: &'static str,
        value: f64,
    },

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Path already present in tree: {0}")]
    DuplicatePath(String),

    #[error("Unknown file: {0}")]
    UnknownFile(String),

    #[error("Diagram coordinates overflow while placing {0}")]
    CanvasOverflow(String),

    #[error("Scalar calculator invoked with an empty batch")]
    EmptyBatch,

    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DiagramError>;
