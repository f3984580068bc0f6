//! URI Template expansion (RFC 6570, level 4).
//!
//! ```
//! use std::collections::HashMap;
//!
//! let mut data = HashMap::new();
//! data.insert("hello", "Hello World!");
//! assert_eq!(uritemplate::expand("{hello}", &data).unwrap(), "Hello%20World%21");
//! ```
//!
//! Expansion never stops early. When something in the template is malformed
//! the error still carries the output produced for the rest of it.

pub mod config;
mod data;
mod error;
mod template;

pub use data::{Associative, Field, Record, Rendered, Shape, Variable};
pub use error::{ErrorKind, ExpandError};
pub use template::{expand, UriTemplate};
