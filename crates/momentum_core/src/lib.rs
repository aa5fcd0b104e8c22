pub mod api;
pub mod breakdown;
pub mod catalog;
pub mod clock;
pub mod config;
pub mod error;
pub mod model;
pub mod notify;
pub mod progress;
pub mod state;
pub mod storage;
pub mod suggest;
pub mod timer;
