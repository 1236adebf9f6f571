//! Field service reports: record model and HTTP routes.

pub mod model;
pub mod routes;

#[cfg(test)]
mod tests;
