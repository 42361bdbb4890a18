pub mod config;
pub mod logging;

pub mod catalog;
pub mod css;
pub mod error;
pub mod fetch;
pub mod seed;
pub mod storage;
pub mod store;
pub mod url_model;
