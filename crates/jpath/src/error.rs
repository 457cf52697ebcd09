use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JPathError {
    #[error("Path parse error in '{0}': {1}")]
    PathParse(String, String),

    #[error("Path is empty")]
    Empty,
}
