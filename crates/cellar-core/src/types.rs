//! Core type definitions with validation.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors for core types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// The provided value was empty.
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    /// The open-event tolerance was negative or not finite.
    #[error("open tolerance must be a finite, non-negative number, got {value}")]
    ToleranceOutOfRange { value: f64 },
}

/// Generates a validated string ID newtype with common trait implementations.
macro_rules! define_string_id {
    (
        $(#[$meta:meta])*
        $name:ident, $field_name:literal
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates a new value after validation.
            pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
                let id = id.into();
                if id.trim().is_empty() {
                    return Err(ValidationError::Empty { field: $field_name });
                }
                Ok(Self(id))
            }

            /// Returns the value as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_string_id!(
    /// A validated open-item identifier.
    ///
    /// Item IDs are opaque, non-empty strings assigned by the storage layer.
    ItemId, "item ID"
);

define_string_id!(
    /// A validated product name (e.g. "Gin").
    ///
    /// Names are compared exactly; "gin" and "Gin" are different products.
    ProductName, "product name"
);

/// Absolute volume tolerance used to recognise an opening event.
///
/// A usage event whose `volume_used` is within this distance of the item's
/// `initial_volume` marks the day the unit left stock.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct OpenTolerance(f64);

impl OpenTolerance {
    /// The tolerance used when nothing else is configured.
    pub const DEFAULT: Self = Self(1e-3);

    /// Creates a tolerance after validation.
    ///
    /// Returns an error if the value is negative, infinite or NaN.
    pub fn new(value: f64) -> Result<Self, ValidationError> {
        if !value.is_finite() || value < 0.0 {
            return Err(ValidationError::ToleranceOutOfRange { value });
        }
        Ok(Self(value))
    }

    /// Returns the inner value.
    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }

    /// Whether `a` and `b` are within tolerance of each other.
    #[must_use]
    pub fn matches(self, a: f64, b: f64) -> bool {
        (a - b).abs() < self.0
    }
}

impl Default for OpenTolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for OpenTolerance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<OpenTolerance> for f64 {
    fn from(t: OpenTolerance) -> Self {
        t.0
    }
}

impl Serialize for OpenTolerance {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for OpenTolerance {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = f64::deserialize(deserializer)?;
        Self::new(value).map_err(serde::de::Error::custom)
    }
}
