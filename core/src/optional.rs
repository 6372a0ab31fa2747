//! Presence/absence container.
//!
//! [`OptionalValue`] distinguishes "no value supplied" from "value is the
//! zero/empty value". Unlike [`Option`], constructing a present value checks
//! the payload: an empty string or a `None` cannot be wrapped as present.
//!
//! # Examples
//!
//! ```
//! use supconv_core::OptionalValue;
//!
//! let lang = OptionalValue::of("en".to_string()).unwrap();
//! assert!(lang.is_present());
//!
//! let missing: OptionalValue<String> = OptionalValue::from_nullable(String::new());
//! assert_eq!(missing, OptionalValue::absent());
//! assert_eq!(missing.or_else("de".into()), "de");
//!
//! assert!(OptionalValue::of(String::new()).is_err());
//! ```

use serde::{Serialize, Serializer};
use thiserror::Error;

/// Error returned by [`OptionalValue::of`] for a null-equivalent payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot wrap an empty value as present")]
pub struct EmptyPayload;

/// Error returned by [`OptionalValue::get`] on an absent value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("value is absent")]
pub struct AbsentValue;

/// Types that have an empty or null-equivalent value.
///
/// Scalars are never null; the default implementation reflects that.
pub trait Nullable {
    /// Returns `true` when this value stands for "nothing".
    fn is_null(&self) -> bool {
        false
    }
}

impl Nullable for String {
    fn is_null(&self) -> bool {
        self.is_empty()
    }
}

impl Nullable for &str {
    fn is_null(&self) -> bool {
        self.is_empty()
    }
}

impl<T> Nullable for Option<T> {
    fn is_null(&self) -> bool {
        self.is_none()
    }
}

impl<T> Nullable for Vec<T> {
    fn is_null(&self) -> bool {
        self.is_empty()
    }
}

macro_rules! never_null {
    ($($ty:ty),* $(,)?) => {
        $(impl Nullable for $ty {})*
    };
}

never_null!(bool, char, u8, u16, u32, u64, usize, i8, i16, i32, i64, isize, f32, f64);

/// A value that is either present or absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionalValue<T> {
    /// A genuine payload.
    Present(T),
    /// No value.
    Absent,
}

impl<T> Default for OptionalValue<T> {
    fn default() -> Self {
        Self::absent()
    }
}

impl<T> OptionalValue<T> {
    /// The absent value. It carries no data, so every use is the same value.
    pub const ABSENT: Self = OptionalValue::Absent;

    /// Returns the absent value.
    pub const fn absent() -> Self {
        Self::ABSENT
    }

    /// Returns `true` if a payload is present.
    pub fn is_present(&self) -> bool {
        matches!(self, OptionalValue::Present(_))
    }

    /// Returns the payload, or [`AbsentValue`] if there is none.
    pub fn get(&self) -> Result<&T, AbsentValue> {
        match self {
            OptionalValue::Present(value) => Ok(value),
            OptionalValue::Absent => Err(AbsentValue),
        }
    }

    /// Returns the payload, or `fallback` if absent.
    pub fn or_else(self, fallback: T) -> T {
        match self {
            OptionalValue::Present(value) => value,
            OptionalValue::Absent => fallback,
        }
    }

    /// Borrows the payload as a standard [`Option`].
    pub fn as_option(&self) -> Option<&T> {
        match self {
            OptionalValue::Present(value) => Some(value),
            OptionalValue::Absent => None,
        }
    }

    /// Converts into a standard [`Option`].
    pub fn into_option(self) -> Option<T> {
        match self {
            OptionalValue::Present(value) => Some(value),
            OptionalValue::Absent => None,
        }
    }

    /// Maps the payload, keeping absence. A null-equivalent result is
    /// absent.
    pub fn map<U: Nullable>(self, f: impl FnOnce(T) -> U) -> OptionalValue<U> {
        match self {
            OptionalValue::Present(value) => OptionalValue::from_nullable(f(value)),
            OptionalValue::Absent => OptionalValue::Absent,
        }
    }
}

impl<T: Nullable> OptionalValue<T> {
    /// Wraps a payload as present.
    ///
    /// # Errors
    ///
    /// Returns [`EmptyPayload`] if `value` is null-equivalent.
    pub fn of(value: T) -> Result<Self, EmptyPayload> {
        if value.is_null() {
            return Err(EmptyPayload);
        }
        Ok(OptionalValue::Present(value))
    }

    /// Maps a null-equivalent payload to [`absent`](Self::absent) and
    /// anything else to a present value.
    pub fn from_nullable(value: T) -> Self {
        if value.is_null() {
            Self::absent()
        } else {
            OptionalValue::Present(value)
        }
    }

    /// Converts a standard [`Option`]. `Some` with a null-equivalent payload
    /// is absent.
    pub fn from_option(value: Option<T>) -> Self {
        match value {
            Some(value) => Self::from_nullable(value),
            None => Self::absent(),
        }
    }
}

impl<T: Serialize> Serialize for OptionalValue<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            OptionalValue::Present(value) => serializer.serialize_some(value),
            OptionalValue::Absent => serializer.serialize_none(),
        }
    }
}
