//! Client for the KINAI prediction API.
//!
//! The API scores a mapped CSV upload with one of two models:
//!
//! - **fast** (`POST /fast-predict`): light-curve columns
//! - **deep** (`POST /deep-predict`): transit and stellar parameters
//!
//! [`PredictionClient`] sends a [`PredictionRequest`] and interprets the
//! reply. Hosts and tests can substitute any [`Predictor`].

mod client;
mod config;
mod error;
mod types;

pub use client::{PredictionClient, Predictor, interpret_response};
pub use config::{API_URL_ENV, ApiConfig};
pub use error::{PredictError, Result};
pub use types::{
    MappingEntry, PredictionModel, PredictionRequest, PredictionResponse, PredictionResult,
};
