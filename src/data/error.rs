use thiserror::Error;

/// Why an upload could not become a [`Dataset`](super::model::Dataset).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LoadError {
    /// The content is not a readable spreadsheet.
    #[error("cannot read {file}: {reason}")]
    Parse { file: String, reason: String },

    /// A required column is absent after header trimming.
    #[error("Missing required column: {column}")]
    MissingColumn { column: String },
}

impl LoadError {
    pub fn parse(file: &str, reason: impl ToString) -> Self {
        LoadError::Parse {
            file: file.to_string(),
            reason: reason.to_string(),
        }
    }
}
