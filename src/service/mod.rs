//! Business rules for cats and missions.
//!
//! Services sit between the HTTP handlers and the database. They run the
//! validation stage, enforce cross-entity rules inside transactions and return
//! typed [`AgencyError`](crate::error::AgencyError)s.

mod cats;
mod missions;
pub mod validation;

pub use cats::CatService;
pub use missions::MissionService;
