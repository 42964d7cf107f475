pub mod config;
pub mod controller;
pub mod core;
pub mod error;
pub mod log;
pub mod store;
pub mod util;
pub mod view;

pub use controller::BoardController;
pub use error::{Error, Result};
