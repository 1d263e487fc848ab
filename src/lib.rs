//! Backend for the marina operations dashboard: in-memory record modules with
//! confirmed mutations, and a simulated metering feed.
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
