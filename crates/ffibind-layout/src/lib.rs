//! Structure layout resolution for binding generation.
//!
//! Computes, for each structure of a module, the field placement the native
//! side uses and the wrapper shape each passing mode needs. Back-ends that
//! declare explicit field order or offsets read them from here.

mod data_model;
mod resolver;
mod shape;

pub use data_model::*;
pub use resolver::*;
pub use shape::*;
