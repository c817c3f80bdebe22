pub mod calibration;
pub mod config;
pub mod dashboard;
pub mod data;
pub mod error;
pub mod logging;
pub mod predictor;
pub mod risk;
pub mod scorer;
pub mod service;
pub mod transaction;
