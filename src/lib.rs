//! hvacdash - client core of the HVAC data processing dashboard.
//!
//! Typed access to the processing backend ([`api`]), observable request
//! state ([`state`]), per-mode endpoint bindings ([`bindings`]), backend
//! health monitoring ([`health_check`]) and page dispatch ([`view_state`]),
//! tied together by [`app::AppContext`].

pub mod adapters;
pub mod api;
pub mod app;
pub mod bindings;
pub mod cli;
pub mod error;
pub mod health_check;
pub mod logging;
pub mod startup;
pub mod state;
pub mod traits;
pub mod view_state;
