//! Optional capabilities probed on request, response and error values
//!
//! A value opts into a capability by implementing the capability trait and
//! returning itself from the matching `as_*` query on [`Capabilities`]. The
//! queries default to `None`, so a type only spells out what it supports:
//!
//! ```
//! use httph::capability::{self, Validate};
//! use httph::{capabilities, BoxError};
//!
//! #[derive(Default)]
//! struct Signup {
//!     name: String,
//! }
//!
//! impl Validate for Signup {
//!     fn validate(&self) -> Result<(), BoxError> {
//!         if self.name.is_empty() {
//!             return Err("name is required".into());
//!         }
//!         Ok(())
//!     }
//! }
//!
//! capabilities!(Signup: Validate);
//!
//! assert!(capability::validate(&Signup::default()).is_err());
//! assert_eq!(capability::max_size_bytes(&Signup::default()), None);
//! ```

use std::collections::{BTreeMap, HashMap};
use std::convert::Infallible;

use axum::http::StatusCode;

use crate::error::HttpError;
use crate::BoxError;

/// A value that can check its own semantic well-formedness.
///
/// Runs after a request value decoded successfully and before the
/// application function sees it.
pub trait Validate {
    fn validate(&self) -> Result<(), BoxError>;
}

/// A request shape that caps the number of body bytes read.
///
/// Probed on the default value of the shape, before any body byte is read.
pub trait SizeLimited {
    fn max_size_bytes(&self) -> u64;
}

/// A response or error value that picks its own HTTP status code.
pub trait StatusCoded {
    fn status_code(&self) -> StatusCode;
}

/// Capability queries implemented by every request, response and error type
/// handed to the adapters.
///
/// Common std and serde types, including the usual error types, already
/// implement it with no capabilities. Application types declare theirs with
/// [`capabilities!`](crate::capabilities), even when they have none:
/// `capabilities!(MyError);`.
pub trait Capabilities {
    fn as_validate(&self) -> Option<&dyn Validate> {
        None
    }

    fn as_size_limited(&self) -> Option<&dyn SizeLimited> {
        None
    }

    fn as_status_coded(&self) -> Option<&dyn StatusCoded> {
        None
    }
}

/// Implements [`Capabilities`] for a type, listing the capability traits it
/// implements.
///
/// `capabilities!(Plain)` declares a type with no capabilities;
/// `capabilities!(Greeting: StatusCoded)` exposes its `StatusCoded` impl.
#[macro_export]
macro_rules! capabilities {
    (@query Validate) => {
        fn as_validate(&self) -> ::std::option::Option<&dyn $crate::capability::Validate> {
            ::std::option::Option::Some(self)
        }
    };
    (@query SizeLimited) => {
        fn as_size_limited(
            &self,
        ) -> ::std::option::Option<&dyn $crate::capability::SizeLimited> {
            ::std::option::Option::Some(self)
        }
    };
    (@query StatusCoded) => {
        fn as_status_coded(
            &self,
        ) -> ::std::option::Option<&dyn $crate::capability::StatusCoded> {
            ::std::option::Option::Some(self)
        }
    };
    ($ty:ty) => {
        impl $crate::capability::Capabilities for $ty {}
    };
    ($ty:ty : $($capability:ident),+ $(,)?) => {
        impl $crate::capability::Capabilities for $ty {
            $( $crate::capabilities!(@query $capability); )+
        }
    };
}

/// Maximum body size declared by `value`, if it is [`SizeLimited`].
pub fn max_size_bytes<T: Capabilities + ?Sized>(value: &T) -> Option<u64> {
    value.as_size_limited().map(SizeLimited::max_size_bytes)
}

/// Runs `value`'s [`Validate`] check, if it has one.
pub fn validate<T: Capabilities + ?Sized>(value: &T) -> Result<(), BoxError> {
    match value.as_validate() {
        Some(validator) => validator.validate(),
        None => Ok(()),
    }
}

/// Status code declared by `value`, or `default` when it is not [`StatusCoded`].
pub fn status_code<T: Capabilities + ?Sized>(value: &T, default: StatusCode) -> StatusCode {
    value
        .as_status_coded()
        .map(StatusCoded::status_code)
        .unwrap_or(default)
}

impl Capabilities for () {}
impl Capabilities for String {}
impl Capabilities for &'static str {}
impl Capabilities for serde_json::Value {}
impl<T> Capabilities for Vec<T> {}
impl<T> Capabilities for Option<T> {}
impl<K, V, S> Capabilities for HashMap<K, V, S> {}
impl<K, V> Capabilities for BTreeMap<K, V> {}

impl Capabilities for std::io::Error {}
impl Capabilities for std::fmt::Error {}
impl Capabilities for std::num::ParseIntError {}
impl Capabilities for std::num::ParseFloatError {}
impl Capabilities for std::str::ParseBoolError {}
impl Capabilities for std::str::Utf8Error {}
impl Capabilities for std::string::FromUtf8Error {}
impl Capabilities for serde_json::Error {}

impl Capabilities for Infallible {
    fn as_status_coded(&self) -> Option<&dyn StatusCoded> {
        match *self {}
    }
}

// Type-erased errors are status coded when they wrap an `HttpError`.
impl Capabilities for anyhow::Error {
    fn as_status_coded(&self) -> Option<&dyn StatusCoded> {
        self.downcast_ref::<HttpError>()
            .map(|err| err as &dyn StatusCoded)
    }
}

impl Capabilities for BoxError {
    fn as_status_coded(&self) -> Option<&dyn StatusCoded> {
        self.downcast_ref::<HttpError>()
            .map(|err| err as &dyn StatusCoded)
    }
}
