use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MathError {
    #[error("Expression is empty")]
    Empty,

    #[error("Math parse error in '{0}': {1}")]
    MathParse(String, String),

    #[error("Parentheses nested deeper than {0} levels")]
    TooDeep(usize),
}
