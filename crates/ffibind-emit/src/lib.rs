//! Host-language binding emission for native modules.
//!
//! A [`Backend`] decides how native types, names and literals look in one
//! host language. [`emit`] checks a module against a back-end and returns a
//! lazy [`Emission`] of [`TextBlock`]s in a fixed section order.

mod backend;
mod block;
mod config;
mod emitter;
mod error;
mod java;
mod literal;
mod naming;
mod plan;
mod python;
mod writer;

pub use backend::*;
pub use block::*;
pub use config::*;
pub use emitter::*;
pub use error::*;
pub use java::{JavaJna, JavaJnaConfig};
pub use naming::{Casing, IdentKind, NamingPolicy};
pub use plan::*;
pub use python::{PythonCtypes, PythonCtypesConfig};
pub use writer::*;

/// Generator version stamped into emitted headers.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
