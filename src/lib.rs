pub mod config;
pub mod db;
pub mod error;
pub mod gateway;
pub mod logging;
pub mod models;
pub mod programme;
pub mod records;
pub mod setlog;
pub mod submission;
pub mod types;
pub mod utils;
pub mod validation;
