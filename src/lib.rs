pub mod config;
pub mod db;
pub mod due;
pub mod error;
pub mod grid;
pub mod models;
pub mod remote;
pub mod services;
pub mod state;
pub mod store;
pub mod validation;
