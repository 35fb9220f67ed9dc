//! OBJ reading and extraction error types

use crate::buffer::Attribute;

/// Broad error classes, used by callers that only care what went wrong
/// rather than the exact detail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Unrecognized keyword, malformed corner, unparsable number
    Syntax,
    /// Index outside the attribute data known so far
    Range,
    /// Zero index, wrong field count, missing name, duplicate `mtllib`
    Semantic,
    /// Underlying stream failure
    Io,
}

/// What went wrong on a single line
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LineErrorKind {
    #[error("unknown keyword '{0}'")]
    UnknownKeyword(String),

    #[error("face corner '{0}' is not in a supported format")]
    MalformedCorner(String),

    #[error("cannot parse '{0}' as a number")]
    InvalidNumber(String),

    #[error("{attribute} index {index} out of range [0, {len})")]
    IndexOutOfRange {
        attribute: Attribute,
        index: i64,
        len: usize,
    },

    #[error("{0} index 0 is invalid (OBJ uses 1-based indexing)")]
    ZeroIndex(Attribute),

    #[error("'{keyword}' expected {expected} fields, but got {found}")]
    FieldCount {
        keyword: &'static str,
        expected: &'static str,
        found: usize,
    },

    #[error("'{0}' requires a name")]
    MissingName(&'static str),

    #[error("material library already set to '{0}'")]
    DuplicateMaterialLibrary(String),
}

impl LineErrorKind {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnknownKeyword(_) | Self::MalformedCorner(_) | Self::InvalidNumber(_) => {
                ErrorCategory::Syntax
            }
            Self::IndexOutOfRange { .. } => ErrorCategory::Range,
            Self::ZeroIndex(_)
            | Self::FieldCount { .. }
            | Self::MissingName(_)
            | Self::DuplicateMaterialLibrary(_) => ErrorCategory::Semantic,
        }
    }
}

/// OBJ reading error
///
/// Reading stops at the first error; the partially built buffer is dropped.
#[derive(Debug, thiserror::Error)]
pub enum ObjError {
    /// A line could not be processed
    #[error("line {line_number}: {kind} ('{line}')")]
    Line {
        /// 1-based line number
        line_number: usize,
        /// Line text as read
        line: String,
        kind: LineErrorKind,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ObjError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Line { kind, .. } => kind.category(),
            Self::Io(_) => ErrorCategory::Io,
        }
    }

    /// Line number of the failing line, if the error came from one
    pub fn line_number(&self) -> Option<usize> {
        match self {
            Self::Line { line_number, .. } => Some(*line_number),
            Self::Io(_) => None,
        }
    }
}

/// Group extraction error
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExtractError {
    #[error("face range {start}..{end} exceeds face count {face_count}")]
    FaceRangeOutOfBounds {
        start: usize,
        end: usize,
        face_count: usize,
    },

    #[error("face {face} references {attribute} {index}, but the source has {len}")]
    MissingAttribute {
        face: usize,
        attribute: Attribute,
        index: u32,
        len: usize,
    },
}
