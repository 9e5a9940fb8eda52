//! LocalPro marketplace backend
//!
//! Partner onboarding, admin verification review, and notifications for a
//! local-services marketplace. The HTTP surface is thin; all workflow rules
//! live in [`domain`] as pure functions over the partner profile aggregate.

pub mod api;
pub mod app;
pub mod auth;
pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod logging;
pub mod middleware;
pub mod routes;
pub mod services;
