//! Route handlers organized by resource

pub mod agent;
pub mod calls;
pub mod ccrs;
pub mod evaluations;
pub mod health;
