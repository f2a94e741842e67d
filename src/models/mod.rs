//! Domain models for the Spy Cat Agency.
//!
//! # Core Concepts
//!
//! - [`Cat`]: An agent on the payroll. Only the salary changes after hiring.
//! - [`Mission`]: A job for at most one cat, owning between one and three targets.
//!   A mission completes on its own once every target is completed.
//! - [`Target`]: A person of interest inside a mission. Notes freeze as soon as the
//!   target or its mission is completed.
//!
//! A cat may hold at most one active mission at any time.

mod cat;
mod mission;
mod target;

pub use cat::*;
pub use mission::*;
pub use target::*;
