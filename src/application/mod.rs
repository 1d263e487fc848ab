// Application layer - use cases over the domain model
pub mod confirmation;
pub mod dashboard_service;
pub mod error;
pub mod history_service;
pub mod module_catalog;
pub mod realtime_service;
pub mod record_manager;
pub mod remote_control;
pub mod telemetry_feed;
pub mod telemetry_source;
