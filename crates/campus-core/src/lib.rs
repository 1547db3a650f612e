//! campus-core — Domain models, repository traits, and the access
//! evaluation core shared across all crates.
//!
//! The access model lives in [`access`]: a pure, total decision
//! function over (actor, course, enrollment state), wrapped by an async
//! evaluator that every route and UI gate consults before exposing a
//! content pointer. [`enrollment`] holds the one mutation the model
//! owns.

pub mod access;
pub mod enrollment;
pub mod error;
pub mod models;
pub mod repository;

pub use access::{AccessEvaluator, Decision};
pub use enrollment::EnrollmentService;
pub use error::{CampusError, CampusResult};
