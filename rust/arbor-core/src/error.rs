// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Error types for schema derivation, identity tracking and conversion.
//!
//! Three layers are exposed:
//!
//! - [`SchemaError`] is raised once, when a class is first scanned. Schemas are
//!   cached together with their failure, so a bad class fails identically on
//!   every later use.
//! - [`CycleError`] is raised while reading a single document and only aborts
//!   that call.
//! - [`enum@Error`] is what every public entry point returns. It wraps the two
//!   above and adds the conversion failures.

use std::borrow::Cow;

use thiserror::Error;

/// Compile-time switch, set `ARBOR_PANIC_ON_ERROR=1` while building to panic
/// at the exact place an [`enum@Error`] is created.
pub const PANIC_ON_ERROR: bool = option_env!("ARBOR_PANIC_ON_ERROR").is_some();

/// Failures while deriving a [`Schema`](crate::meta::Schema) from a class definition.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SchemaError {
    /// Two labels of the same class answer to the same node name.
    #[error("duplicate {namespace} name '{name}' in class '{class}'")]
    DuplicateName {
        class: String,
        name: String,
        namespace: &'static str,
    },

    /// A declared type (or one of its parts) cannot be resolved.
    #[error("unresolved type for '{member}' in class '{class}': {reason}")]
    UnresolvedType {
        class: String,
        member: String,
        reason: String,
    },

    /// A tag cannot be applied to the member it is attached to.
    #[error("unsupported tag on '{member}' in class '{class}': {reason}")]
    UnsupportedTag {
        class: String,
        member: String,
        reason: String,
    },

    /// A constructor parameter disagrees with the member of the same name.
    #[error("inconsistent parameter '{parameter}' in class '{class}': {reason}")]
    InconsistentParameter {
        class: String,
        parameter: String,
        reason: String,
    },

    /// An order tag names a member that does not exist.
    #[error("order of class '{class}' names unknown {namespace} '{name}'")]
    InvalidOrder {
        class: String,
        name: String,
        namespace: &'static str,
    },

    /// A read-only member can not be populated by any constructor.
    #[error("read-only member '{member}' of class '{class}' is not accepted by any constructor")]
    ReadOnlyMember { class: String, member: String },

    /// A concrete class has no constructor whose parameters are all tagged.
    #[error("class '{class}' has no usable constructor")]
    NoConstructor { class: String },
}

/// Failures of identity bookkeeping while reading a document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CycleError {
    /// The same identity token was declared twice in one document.
    #[error("identity '{token}' is declared more than once")]
    DuplicateIdentity { token: String },

    /// A reference names a token that was never declared before it.
    #[error("reference '{token}' does not match any declared identity")]
    UnknownReference { token: String },
}

/// Error type for Arbor serialization and deserialization operations.
///
/// # Always use the static constructors
///
/// Variants carrying a message should be built through the constructor
/// functions (`Error::type_error`, `Error::invalid_data`, ...). They accept
/// anything convertible into `Cow<'static, str>` and honour the
/// `ARBOR_PANIC_ON_ERROR` debug switch.
///
/// ```rust
/// use arbor_core::error::Error;
///
/// let err = Error::type_error("expected a class instance");
/// let err = Error::missing_value(format!("required element '{}' is missing", "name"));
/// ```
///
/// Schema and cycle errors convert through `From`:
///
/// ```rust
/// use arbor_core::error::{CycleError, Error};
///
/// let err: Error = CycleError::UnknownReference { token: "7".into() }.into();
/// assert!(matches!(err, Error::Cycle(_)));
/// ```
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Schema derivation failed for a class.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Identity bookkeeping failed for the current document.
    #[error(transparent)]
    Cycle(#[from] CycleError),

    /// General type-related error.
    ///
    /// Do not construct this variant directly; use [`Error::type_error`] instead.
    #[error("{0}")]
    TypeError(Cow<'static, str>),

    /// Malformed node content, e.g. an unparsable primitive or a missing array length.
    ///
    /// Do not construct this variant directly; use [`Error::invalid_data`] instead.
    #[error("{0}")]
    InvalidData(Cow<'static, str>),

    /// A required member has no value.
    ///
    /// Do not construct this variant directly; use [`Error::missing_value`] instead.
    #[error("{0}")]
    MissingValue(Cow<'static, str>),

    /// An undeclared attribute or element was met in strict mode.
    ///
    /// Do not construct this variant directly; use [`Error::unknown_node`] instead.
    #[error("{0}")]
    UnknownNode(Cow<'static, str>),

    /// Maximum nesting depth exceeded.
    ///
    /// Do not construct this variant directly; use [`Error::depth_exceed`] instead.
    #[error("{0}")]
    DepthExceed(Cow<'static, str>),

    /// Operation not allowed in current context.
    ///
    /// Do not construct this variant directly; use [`Error::not_allowed`] instead.
    #[error("{0}")]
    NotAllowed(Cow<'static, str>),

    /// Failure reported by a user supplied lifecycle hook.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Creates a new [`Error::TypeError`].
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn type_error<S: Into<Cow<'static, str>>>(s: S) -> Self {
        let err = Error::TypeError(s.into());
        if PANIC_ON_ERROR {
            panic!("ARBOR_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Creates a new [`Error::InvalidData`].
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn invalid_data<S: Into<Cow<'static, str>>>(s: S) -> Self {
        let err = Error::InvalidData(s.into());
        if PANIC_ON_ERROR {
            panic!("ARBOR_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Creates a new [`Error::MissingValue`].
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn missing_value<S: Into<Cow<'static, str>>>(s: S) -> Self {
        let err = Error::MissingValue(s.into());
        if PANIC_ON_ERROR {
            panic!("ARBOR_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Creates a new [`Error::UnknownNode`].
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn unknown_node<S: Into<Cow<'static, str>>>(s: S) -> Self {
        let err = Error::UnknownNode(s.into());
        if PANIC_ON_ERROR {
            panic!("ARBOR_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Creates a new [`Error::DepthExceed`].
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn depth_exceed<S: Into<Cow<'static, str>>>(s: S) -> Self {
        let err = Error::DepthExceed(s.into());
        if PANIC_ON_ERROR {
            panic!("ARBOR_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Creates a new [`Error::NotAllowed`].
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn not_allowed<S: Into<Cow<'static, str>>>(s: S) -> Self {
        let err = Error::NotAllowed(s.into());
        if PANIC_ON_ERROR {
            panic!("ARBOR_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Returns the schema error, if this is one.
    pub fn as_schema_error(&self) -> Option<&SchemaError> {
        match self {
            Error::Schema(e) => Some(e),
            _ => None,
        }
    }

    /// Returns the cycle error, if this is one.
    pub fn as_cycle_error(&self) -> Option<&CycleError> {
        match self {
            Error::Cycle(e) => Some(e),
            _ => None,
        }
    }
}

/// Ensures a condition is true; otherwise returns early with the given [`enum@Error`].
///
/// # Examples
/// ```
/// use arbor_core::ensure;
/// use arbor_core::error::Error;
///
/// fn check_length(n: usize, max: usize) -> Result<(), Error> {
///     ensure!(n <= max, Error::invalid_data(format!("{} entries exceed length {}", n, max)));
///     Ok(())
/// }
/// assert!(check_length(3, 2).is_err());
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $err:expr) => {
        if !$cond {
            return Err($err);
        }
    };
}

/// Returns early with a [`Error::NotAllowed`].
///
/// # Examples
/// ```
/// use arbor_core::not_allowed;
/// use arbor_core::error::Error;
///
/// fn register(name: &str) -> Result<(), Error> {
///     not_allowed!("type name '{}' is reserved", name);
/// }
/// assert!(register("int").is_err());
/// ```
#[macro_export]
macro_rules! not_allowed {
    ($err:expr) => {
        return Err($crate::error::Error::not_allowed($err))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::error::Error::not_allowed(format!($fmt, $($arg)*)))
    };
}
