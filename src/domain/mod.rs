// Domain layer - plain data types shared by every module
pub mod dashboard;
pub mod dock;
pub mod record;
pub mod telemetry;
