//! # Models
//!
//! Typed rows for the document collections and the paged result returned by
//! every paginated call.

pub mod application;
pub mod paged_result;
pub mod role;
pub mod scouting_activity;
pub mod user;

pub use application::{Application, ApplicationRef};
pub use paged_result::{PageMetadata, PagedResult};
pub use role::{Role, RoleRef};
pub use scouting_activity::{Participant, ScoutingActivity};
pub use user::{User, UserSummary};
