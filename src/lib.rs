#![warn(clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate
)]

//! Object utilities for dynamic, configuration-like value graphs.
//!
//! Two independent pieces:
//!
//! - [`proxy::lazy_instance`] builds a forwarding [`Map`] whose members defer
//!   construction of a wrapped instance until first use, so the full member
//!   surface can be handed out before constructing the real thing is safe or
//!   cheap.
//! - [`merge::merge`] recursively merges one map into another without
//!   overwriting existing values and without looping on cyclic or shared
//!   inputs.
//!
//! Both operate on [`Value`] graphs: cheap-to-clone values whose maps are
//! shared, mutable handles with pointer identity. Everything is
//! single-threaded by construction (`Rc`/`RefCell`, nothing here is `Send`).

pub use merge::merge;
pub use proxy::{emitter::Emitter, lazy_instance, Shape};
pub use value::{Func, Map, OxErr, OxResult, Value, ValueType};

pub mod merge;
pub mod print;
pub mod proxy;
pub mod value;
