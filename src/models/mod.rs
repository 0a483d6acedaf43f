//! Request and Response models for the admin API

pub mod requests;
pub mod responses;

pub use requests::{validate_key, SetRequest, MAX_KIND_LENGTH};
pub use responses::{
    ClearResponse, GetResponse, HealthResponse, InvalidateResponse, SetResponse, StatsResponse,
};
