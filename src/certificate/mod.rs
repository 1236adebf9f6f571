//! Calibration certificates: record model and HTTP routes.

pub mod model;
pub mod routes;
