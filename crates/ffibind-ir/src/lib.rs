//! Interface description for native modules.
//!
//! This crate provides the language-agnostic IR consumed by the binding
//! emitter: native types, exported items, and the module descriptor that
//! orders them. It knows nothing about any host language.

mod builder;
mod descriptor;
mod error;
mod ident;
mod items;
mod literal;
mod types;
mod validate;

pub use builder::*;
pub use descriptor::*;
pub use error::*;
pub use ident::*;
pub use items::*;
pub use literal::*;
pub use types::*;
