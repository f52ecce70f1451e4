//! Error taxonomy for universe loading and conversion queries
//!
//! Every error carries a message suitable for direct display. The engine
//! recovers nothing: the first failure aborts the current operation and
//! surfaces to the caller.

use metra_core::ArithmeticError;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// A tokenization or grammar violation, with its source location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    message: String,
    line: usize,
    column: usize,
    file: Option<PathBuf>,
}

impl SyntaxError {
    pub fn new(
        message: impl Into<String>,
        line: usize,
        column: usize,
        file: Option<PathBuf>,
    ) -> Self {
        Self {
            message: message.into(),
            line,
            column,
            file,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn column(&self) -> usize {
        self.column
    }

    pub fn file(&self) -> Option<&PathBuf> {
        self.file.as_ref()
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.file {
            Some(file) => {
                let name = file
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| file.display().to_string());
                write!(f, "{} ({}:{})", self.message, name, self.line)
            }
            None => write!(f, "{} ({}:{})", self.message, self.line, self.column),
        }
    }
}

impl std::error::Error for SyntaxError {}

/// Semantic errors of the unit-conversion domain
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetricError {
    #[error("Name '{0}' does not refer to any known unit")]
    UnknownUnitName(String),

    #[error("Name '{0}' does not refer to any known property")]
    UnknownPropertyName(String),

    #[error("Duplicate unit name '{0}'")]
    DuplicateUnitName(String),

    #[error("Duplicate property name '{0}'")]
    DuplicatePropertyName(String),

    #[error("'{duplicate}' has the same dimensions of property '{original}'")]
    DuplicateDerivedProperty { original: String, duplicate: String },

    #[error("Cannot convert or compare '{src}' to '{dest}'")]
    IncompatibleUnits { src: String, dest: String },

    #[error("'{base}' cannot serve as a {property} base unit")]
    IncompatibleBaseUnit { base: String, property: String },

    #[error("Property {0} must have at least one unit definition")]
    InvalidEmptyProperty(String),

    #[error("Cannot sum non-absolute quantities")]
    NonAdditiveQuantities,

    #[error("'{0}' is not an absolute unit and cannot compose a derived unit")]
    OffsetUnitInDerivation(String),

    #[error("'{0}' does not measure any known property")]
    InvalidUnit(String),

    #[error("Unit '{0}' cannot have a zero multiplier")]
    ZeroMultiplier(String),

    #[error(transparent)]
    Arithmetic(#[from] ArithmeticError),
}

/// Umbrella error for everything that can go wrong loading a universe or
/// answering a query
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    #[error(transparent)]
    Metric(#[from] MetricError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
