mod price_service;
mod storage;
mod presenter;
mod forecaster;
mod error;
pub mod utils;
pub mod commands;

pub use price_service::*;
pub use storage::*;
pub use presenter::*;
pub use forecaster::*;
pub use error::*;
