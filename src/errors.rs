//! Error types for this crate.

use std::fmt;

/// A [`HashTable::lookup`](crate::HashTable::lookup) found no entry at the
/// requested key pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyNotFound<'a, Q1: ?Sized, Q2: ?Sized> {
    key1: &'a Q1,
    key2: &'a Q2,
}

impl<'a, Q1: ?Sized, Q2: ?Sized> KeyNotFound<'a, Q1, Q2> {
    pub(crate) fn new(key1: &'a Q1, key2: &'a Q2) -> Self {
        KeyNotFound { key1, key2 }
    }

    /// Returns the primary key that was looked up.
    #[inline]
    pub fn key1(&self) -> &'a Q1 {
        self.key1
    }

    /// Returns the secondary key that was looked up.
    #[inline]
    pub fn key2(&self) -> &'a Q2 {
        self.key2
    }
}

impl<Q1: ?Sized + fmt::Debug, Q2: ?Sized + fmt::Debug> fmt::Display
    for KeyNotFound<'_, Q1, Q2>
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no entry at ({:?}, {:?})", self.key1, self.key2)
    }
}

impl<Q1: ?Sized + fmt::Debug, Q2: ?Sized + fmt::Debug> std::error::Error
    for KeyNotFound<'_, Q1, Q2>
{
}

/// A value handed to a container's restoration method was not of the
/// container's declared representation type.
///
/// This means the caller and the container disagree on the representation
/// and is not recoverable by retrying.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RepMismatch {
    expected: &'static str,
    found: Option<String>,
}

impl RepMismatch {
    pub(crate) fn new(expected: &'static str) -> Self {
        RepMismatch {
            expected,
            found: None,
        }
    }

    pub(crate) fn with_found(mut self, found: impl Into<String>) -> Self {
        self.found = Some(found.into());
        self
    }

    /// Returns the name of the representation type the container declares.
    #[inline]
    pub fn expected(&self) -> &'static str {
        self.expected
    }

    /// Returns a description of what was handed over instead, if known.
    #[inline]
    pub fn found(&self) -> Option<&str> {
        self.found.as_deref()
    }
}

impl fmt::Display for RepMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "expected representation of type `{}`", self.expected)?;
        if let Some(found) = &self.found {
            write!(f, ", found {found}")?;
        }
        Ok(())
    }
}

impl std::error::Error for RepMismatch {}

/// An error converting a container to or from a type-erased document.
#[cfg(feature = "json")]
#[derive(Debug)]
pub enum ConvertError {
    /// The document does not have the container's representation shape.
    Mismatch(RepMismatch),
    /// The document engine failed to materialize or encode the representation.
    Json(serde_json::Error),
}

#[cfg(feature = "json")]
impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConvertError::Mismatch(error) => error.fmt(f),
            ConvertError::Json(error) => write!(f, "document error: {error}"),
        }
    }
}

#[cfg(feature = "json")]
impl std::error::Error for ConvertError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConvertError::Mismatch(error) => Some(error),
            ConvertError::Json(error) => Some(error),
        }
    }
}

#[cfg(feature = "json")]
impl From<RepMismatch> for ConvertError {
    fn from(error: RepMismatch) -> Self {
        ConvertError::Mismatch(error)
    }
}

#[cfg(feature = "json")]
impl From<serde_json::Error> for ConvertError {
    fn from(error: serde_json::Error) -> Self {
        ConvertError::Json(error)
    }
}
