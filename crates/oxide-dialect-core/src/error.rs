//! Error types for dialect resolution, translation and value encoding.

use crate::translate::Clause;

/// Errors raised by the dialect engine.
///
/// Every variant is deterministic: repeating the same call with the same
/// inputs fails the same way, so none of them is worth retrying.
#[derive(Debug, thiserror::Error)]
pub enum DialectError {
    /// The statement asks for something the dialect cannot express and
    /// no emulation exists.
    #[error("Cannot render {clause} for dialect '{dialect}': {message}")]
    CapabilityMismatch {
        /// The clause being rendered when the mismatch was detected.
        clause: Clause,
        /// Name and version of the target dialect.
        dialect: String,
        /// What exactly could not be expressed.
        message: String,
    },

    /// An offset appears below the root query part on a dialect that can
    /// neither render it natively there nor emulate it.
    #[error("Cannot emulate offset in subquery for dialect '{dialect}'")]
    OffsetInSubquery {
        /// Name and version of the target dialect.
        dialect: String,
    },

    /// A fetch clause modifier (percent, with ties) the dialect can only
    /// express as rows-only.
    #[error("Fetch clause type {fetch_type} is not supported by dialect '{dialect}'")]
    UnsupportedFetchClause {
        /// The requested fetch clause type.
        fetch_type: String,
        /// Name and version of the target dialect.
        dialect: String,
    },

    /// The statement tree nests deeper than the translator walks.
    #[error("Statement nesting exceeds the maximum depth of {limit}")]
    NestingTooDeep {
        /// The depth limit that was hit.
        limit: usize,
    },

    /// No dialect family is registered under this name.
    #[error("Unknown dialect: {0}")]
    UnknownDialect(String),

    /// The configured MySQL storage engine is not one we model.
    #[error("The {0} storage engine is not supported")]
    UnknownStorageEngine(String),

    /// A version string could not be parsed.
    #[error("Invalid database version '{0}'")]
    InvalidVersion(String),

    /// A capability name that is not part of the capability set.
    #[error("Unknown capability: {0}")]
    UnknownCapability(String),

    /// A struct order mapping is not a permutation of the declared
    /// attributes.
    #[error("Invalid order mapping for '{type_name}': {message}")]
    InvalidOrderMapping {
        /// The structured type name.
        type_name: String,
        /// Why the mapping was rejected.
        message: String,
    },

    /// A decoded payload has a different number of attributes than the
    /// declared schema.
    #[error("Structural mismatch decoding '{type_name}': expected {expected} attributes, found {found}")]
    AttributeCountMismatch {
        /// The structured type name.
        type_name: String,
        /// Number of attributes declared by the schema.
        expected: usize,
        /// Number of attributes found in the payload.
        found: usize,
    },

    /// A decoded payload names attributes in a different order than the
    /// declared schema.
    #[error("Structural mismatch decoding '{type_name}': attribute {position} is '{found}', expected '{expected}'")]
    AttributeOrderMismatch {
        /// The structured type name.
        type_name: String,
        /// Zero-based attribute position.
        position: usize,
        /// The attribute name the schema declares at this position.
        expected: String,
        /// The attribute name found in the payload.
        found: String,
    },

    /// A value does not match the declared attribute type.
    #[error("Attribute '{attribute}' expects {expected}, found {found}")]
    AttributeTypeMismatch {
        /// Attribute name (or element position for arrays).
        attribute: String,
        /// The declared kind.
        expected: String,
        /// What was actually present.
        found: String,
    },

    /// The wire representation is syntactically broken.
    #[error("Malformed {format} payload at position {position}: {message}")]
    MalformedPayload {
        /// Payload format (record, array, json, timestamp).
        format: &'static str,
        /// Byte offset of the problem.
        position: usize,
        /// Error message.
        message: String,
    },

    /// A typed row getter failed and the raw value was not null.
    #[error("Failed to read column {index}: {message}")]
    ColumnAccess {
        /// One-based column index.
        index: usize,
        /// The driver's message.
        message: String,
    },

    /// The injected format mapper failed.
    #[error("Format mapper error: {0}")]
    FormatMapper(String),

    /// JSON (de)serialization error from the `serde_json` adapter or
    /// configuration loading.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error while reading configuration.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl DialectError {
    /// Creates a capability mismatch for a clause.
    #[must_use]
    pub fn mismatch(clause: Clause, dialect: impl Into<String>, message: impl Into<String>) -> Self {
        Self::CapabilityMismatch {
            clause,
            dialect: dialect.into(),
            message: message.into(),
        }
    }

    /// Creates a malformed payload error.
    #[must_use]
    pub fn malformed(format: &'static str, position: usize, message: impl Into<String>) -> Self {
        Self::MalformedPayload {
            format,
            position,
            message: message.into(),
        }
    }

    /// Returns true for errors raised because the target dialect lacks a
    /// capability.
    #[must_use]
    pub const fn is_capability_mismatch(&self) -> bool {
        matches!(
            self,
            Self::CapabilityMismatch { .. }
                | Self::OffsetInSubquery { .. }
                | Self::UnsupportedFetchClause { .. }
        )
    }
}

/// Result type for dialect operations.
pub type Result<T> = std::result::Result<T, DialectError>;
