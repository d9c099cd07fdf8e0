//! Demo dashboard server
//!
//! Serves the walkthrough dashboard rendered by [`dashboard_lib`] and turns
//! form posts into controller actions.

pub mod api;
pub mod config;
