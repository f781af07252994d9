#![forbid(unsafe_code)]

use thiserror::Error;

/// Error enumerates the errors returned by this application.
#[derive(Error, Debug)]
pub enum Errors {
    /// Input parameter logging.
    #[error("fruit_server input parameters:\n{}", .0)]
    InputParms(String),

    /// Represents all other cases of `std::io::Error`.
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    /// Inaccessible logger configuration file.
    #[error("Unable to access the Log4rs configuration file: {}", .0)]
    Log4rsInitialization(String),

    #[error("Reading application configuration file: {}", .0)]
    ReadingConfigFile(String),

    #[error("Unable to parse TOML file: {}", .0)]
    TOMLParseError(String),

    /// A positional identifier that does not resolve to a record.
    #[error("NOT_FOUND: No fruit at index {}", .0)]
    FruitNotFound(String),

    #[error("Invalid input: {}", .0)]
    InvalidInput(String),

    #[error("Unable to render template {}: {}", .0, .1)]
    TemplateError(String, #[source] tera::Error),
}
