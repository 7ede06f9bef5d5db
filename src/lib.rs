//! Final CGPA forecasting from earned and expected semester grades.
//!
//! The [`Predictor`] computes a credit-weighted mean over every semester of a
//! degree, taking earned grades for completed semesters and target grades
//! for the rest. The `server` module serves the browser form around it.

pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod form;
pub mod model;
pub mod server;

pub use error::{Bound, Field, PredictError};
pub use model::{Bounds, PredictRequest, Prediction, Predictor};
