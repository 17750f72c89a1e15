//! Event Hive - browser client
//!
//! Dioxus front end for the Event Hive event-management service.
//!
//! This library provides:
//! - Session validation against the backend and role-based route guarding
//! - A live admin notification feed (REST bootstrap + Socket.IO push)
//! - Engine.IO / Socket.IO text-frame codec used by the push channel
//! - Host-process configuration for serving the app

pub mod app;
pub mod config;
pub mod notifications;
pub mod push;
