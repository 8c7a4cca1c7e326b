pub mod http;
pub mod orchestrator;
pub mod sdo;
pub mod wms;
