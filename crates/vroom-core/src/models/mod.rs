//! Shared data models for the VROOM backend

mod scan;
mod user;
mod vehicle;

pub use scan::*;
pub use user::*;
pub use vehicle::*;
