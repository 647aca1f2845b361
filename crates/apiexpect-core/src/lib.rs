//! # apiexpect Core
//!
//! Failure-propagating assertion chains over JSON values.
//!
//! Every wrapper ([`Value`], [`Object`], [`Array`], [`Str`], [`Number`],
//! [`Boolean`], [`Null`]) pairs a payload with a [`Chain`]. A chain starts
//! ok and fails on the first violated check; that failure is handed to the
//! chain's [`Reporter`] exactly once. After that, every check on the
//! wrapper is skipped, and every wrapper navigated to from it starts out
//! failed as well, so one root cause produces one report.
//!
//! Sibling branches are unaffected:
//!
//! ```
//! use std::sync::Arc;
//! use apiexpect_core::{Object, RecordingReporter};
//! use serde_json::json;
//!
//! let reporter = Arc::new(RecordingReporter::new());
//! let map = json!({"foo": ["bar", 123]}).as_object().cloned().unwrap();
//! let mut object = Object::new(reporter.clone(), map);
//!
//! // out of range: reported once, the rest of this branch is ignored
//! object.value("foo").array().element(999).string().equal("x");
//!
//! // a fresh branch from a healthy parent still works
//! object.value("foo").array().element(0).string().equal("bar");
//!
//! assert_eq!(reporter.count(), 1);
//! ```
//!
//! ## Value equality
//!
//! Whenever values are compared they are first converted to canonical
//! form (see [`canonicalize`]): numbers become `f64`, structs and maps
//! become string-keyed objects, `None` becomes `null`. Any type
//! implementing `serde::Serialize` can be used as an expected value.

#![doc(html_root_url = "https://docs.rs/apiexpect-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod array;
mod boolean;
pub mod canon;
mod chain;
mod error;
mod null;
mod number;
mod object;
mod reporter;
mod string;
mod value;

pub use array::Array;
pub use boolean::Boolean;
pub use canon::{canonicalize, normalize};
pub use chain::Chain;
pub use error::{CanonError, CanonResult};
pub use null::Null;
pub use number::Number;
pub use object::Object;
pub use reporter::{PanicReporter, RecordingReporter, Reporter};
pub use string::Str;
pub use value::Value;
