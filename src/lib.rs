pub mod api;
pub mod auth;
pub mod cli;
pub mod guard;
pub mod io;
pub mod model;
pub mod ops;
pub mod tui;
pub mod util;
