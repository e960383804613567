//! errors raised while splitting or combining

/// Every failure is fail-fast and carries enough context to report it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Out-of-range argument or malformed input.
    #[error("invalid input: {0}")]
    Validation(String),

    /// A word that is not present in the word list.
    #[error("word not in wordlist: {0}")]
    UnknownWord(String),

    /// A share whose leading word is not the expected version tag.
    #[error("version doesn't match: expected {expected}, found {found}")]
    VersionMismatch { expected: String, found: String },

    /// Shares disagree on the threshold parameter.
    #[error("inconsistent threshold parameters: expected {expected}, found {found}")]
    ParameterMismatch { expected: u32, found: u32 },

    /// Fewer distinct share indices than the threshold requires.
    #[error("not enough shares: requires {required}, got {provided}")]
    InsufficientShares { required: u32, provided: u32 },

    /// Unsupported field bit-width or invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
