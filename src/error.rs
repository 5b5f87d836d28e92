use thiserror::Error;

/// Application-wide result type alias.
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// I/O errors from terminal setup or config/theme files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Terminal initialization or rendering errors.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// A config file that exists but cannot be used.
    #[error("Config error: {0}")]
    Config(String),

    /// A colour theme file that failed to load or parse.
    #[error("Theme error: {0}")]
    Theme(String),
}
