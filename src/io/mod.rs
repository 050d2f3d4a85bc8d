pub mod config_io;
pub mod logging;
pub mod paths;
pub mod session_store;
