#[cfg(feature = "serde")]
#[macro_use]
extern crate serde;

#[cfg(feature = "axum")]
pub mod axum;

#[doc(hidden)]
pub use tracing;

/// Result type with custom Error
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Error information
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone)]
pub struct Error {
    /// Type of error and additional information
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub error_type: ErrorType,

    /// Where this error occurred
    pub location: String,
}

/// Possible error types
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorType {
    // ? Request errors
    InvalidInput {
        reason: String,
    },
    NoValidData,
    DuplicateNumber,

    // ? Handler failures
    ImportFailed,
    InsertFailed,
    QueryFailed,

    // ? Storage and parsing errors
    DatabaseError {
        operation: String,
        table: String,
    },
    DuplicateKey,
    SpreadsheetError {
        reason: String,
    },
    InternalError,
}

impl ErrorType {
    /// Message which is safe to show to the client
    pub fn message(&self) -> &str {
        match self {
            ErrorType::InvalidInput { reason } => reason,
            ErrorType::NoValidData => "No valid data",
            ErrorType::DuplicateNumber => "Number already exists for this city",
            ErrorType::ImportFailed => "Excel insert failed",
            ErrorType::InsertFailed => "Insert failed",
            ErrorType::QueryFailed => "Failed to load data",
            ErrorType::DatabaseError { .. }
            | ErrorType::DuplicateKey
            | ErrorType::SpreadsheetError { .. }
            | ErrorType::InternalError => "Internal server error",
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?} at {}", self.error_type, self.location)
    }
}

impl std::error::Error for Error {}

#[macro_export]
macro_rules! create_error {
    ( $error: ident $( $tt:tt )? ) => {
        $crate::Error {
            error_type: $crate::ErrorType::$error $( $tt )?,
            location: format!("{}:{}:{}", file!(), line!(), column!()),
        }
    };
}

#[macro_export]
macro_rules! create_database_error {
    ( $operation: expr, $table: expr ) => {
        $crate::create_error!(DatabaseError {
            operation: $operation.to_string(),
            table: $table.to_string()
        })
    };
}

/// Log the underlying failure and replace it with a public error
#[macro_export]
macro_rules! report_error {
    ( $expr: expr, $error: ident $( $tt:tt )? ) => {
        $expr.map_err(|err| {
            $crate::tracing::error!("{err}");
            $crate::create_error!($error $( $tt )?)
        })
    };
}

#[macro_export]
macro_rules! report_internal_error {
    ( $expr: expr ) => {
        $crate::report_error!($expr, InternalError)
    };
}
