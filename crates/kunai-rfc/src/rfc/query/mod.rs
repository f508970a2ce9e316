//! Outcome types shared by the backend filter compilers.
//!
//! Each compiler reports a filter node it cannot express as
//! [`Compiled::Unsupported`]. A [`CompileContext`] then applies the
//! configured [`FilterMode`]: lenient compilation drops the node and records
//! it, strict compilation fails.

use kunai_core::types::FilterMode;
use serde::Serialize;
use thiserror::Error;

/// Why a filter node could not be expressed on a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnsupportedReason {
    /// No backend attribute or column is registered for the property.
    UnknownProperty,
    /// The backend stores no vCard parameters.
    ParamFilter,
    /// The backend cannot address vCard property groups.
    GroupedProperty,
    /// The name is empty once its group prefix is removed.
    EmptyPropertyName,
}

impl UnsupportedReason {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UnknownProperty => "unknown property",
            Self::ParamFilter => "param-filter",
            Self::GroupedProperty => "grouped property",
            Self::EmptyPropertyName => "empty property name",
        }
    }
}

impl std::fmt::Display for UnsupportedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A filter node a backend cannot express.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Unsupported {
    /// Property name as it appeared in the filter.
    pub property: String,
    pub reason: UnsupportedReason,
}

impl Unsupported {
    #[must_use]
    pub fn new(property: impl Into<String>, reason: UnsupportedReason) -> Self {
        Self {
            property: property.into(),
            reason,
        }
    }
}

impl std::fmt::Display for Unsupported {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.property, self.reason)
    }
}

/// Result of compiling a single filter node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Compiled<T> {
    Term(T),
    Unsupported(Unsupported),
}

/// Result of compiling a whole filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Compilation<P> {
    /// `None` when the filter places no restriction.
    pub predicate: Option<P>,
    /// Nodes left out under lenient compilation, in filter order.
    pub dropped: Vec<Unsupported>,
}

impl<P> Compilation<P> {
    /// Whether every node of the filter made it into the predicate.
    #[must_use]
    pub fn is_exact(&self) -> bool {
        self.dropped.is_empty()
    }
}

/// Filter compilation errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CompileError {
    #[error("Unsupported filter shape: {0}")]
    UnsupportedFilterShape(Unsupported),

    #[error("Invalid filter for property {property}: {message}")]
    InvalidFilter { property: String, message: String },
}

impl CompileError {
    #[must_use]
    pub fn invalid(property: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidFilter {
            property: property.into(),
            message: message.into(),
        }
    }
}

pub type CompileResult<T> = std::result::Result<T, CompileError>;

/// Applies a [`FilterMode`] to node outcomes during one compilation.
#[derive(Debug)]
pub struct CompileContext {
    mode: FilterMode,
    dropped: Vec<Unsupported>,
}

impl CompileContext {
    #[must_use]
    pub const fn new(mode: FilterMode) -> Self {
        Self {
            mode,
            dropped: Vec::new(),
        }
    }

    #[must_use]
    pub const fn mode(&self) -> FilterMode {
        self.mode
    }

    /// ## Summary
    /// Unwraps a compiled term, or records an unsupported node.
    ///
    /// ## Errors
    /// Returns [`CompileError::UnsupportedFilterShape`] in strict mode.
    pub fn admit<T>(&mut self, compiled: Compiled<T>) -> CompileResult<Option<T>> {
        match compiled {
            Compiled::Term(term) => Ok(Some(term)),
            Compiled::Unsupported(unsupported) => {
                self.relax(unsupported)?;
                Ok(None)
            }
        }
    }

    /// ## Summary
    /// Records an unsupported node that can be left out of the predicate.
    ///
    /// ## Errors
    /// Returns [`CompileError::UnsupportedFilterShape`] in strict mode.
    pub fn relax(&mut self, unsupported: Unsupported) -> CompileResult<()> {
        if self.mode.is_strict() {
            return Err(CompileError::UnsupportedFilterShape(unsupported));
        }

        tracing::warn!(
            property = %unsupported.property,
            reason = %unsupported.reason,
            "Dropping unsupported filter term"
        );
        self.dropped.push(unsupported);
        Ok(())
    }

    /// Closes the compilation with the combined predicate.
    #[must_use]
    pub fn finish<P>(self, predicate: Option<P>) -> Compilation<P> {
        Compilation {
            predicate,
            dropped: self.dropped,
        }
    }
}
