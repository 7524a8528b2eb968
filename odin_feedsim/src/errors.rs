/*
 * Copyright © 2025, United States Government, as represented by the Administrator of
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “ODIN” software is licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License. You may obtain a copy
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */

use thiserror::Error;
use odin_server::{ApiError, errors::OdinServerError};
use odin_trafficsim::errors::TrafficSimError;

pub type Result<T> = std::result::Result<T,FeedSimError>;

#[derive(Error,Debug)]
pub enum FeedSimError {

    #[error("unknown source {0}")]
    UnknownSource(String),

    #[error("invalid bounds {0}")]
    InvalidBounds(String),

    #[error("config error {0}")]
    ConfigError(String),

    #[error("simulation error {0}")]
    SimError( #[from] TrafficSimError),

    #[error("server error {0}")]
    ServerError( #[from] OdinServerError),

    #[error("JSON error {0}")]
    JsonError( #[from] serde_json::Error),

    #[error("IO error {0}")]
    IOError( #[from] std::io::Error),
}

pub fn invalid_bounds (msg: impl ToString)->FeedSimError {
    FeedSimError::InvalidBounds( msg.to_string())
}

pub fn config_error (msg: impl ToString)->FeedSimError {
    FeedSimError::ConfigError( msg.to_string())
}

/// map to the status code clients see. Rejected requests never affect the running simulation
impl From<FeedSimError> for ApiError {
    fn from (e: FeedSimError)->Self {
        let msg = e.to_string();
        match e {
            FeedSimError::UnknownSource(_) => ApiError::not_found( msg),
            FeedSimError::InvalidBounds(_) => ApiError::bad_request( msg),
            FeedSimError::SimError( TrafficSimError::InvalidRequest(msg)) => ApiError::bad_request( msg),
            FeedSimError::SimError( TrafficSimError::UnknownLocation(loc)) => ApiError::not_found( format!("unknown location {loc}")),
            FeedSimError::SimError( TrafficSimError::AlreadyRunning) => ApiError::conflict( "simulation already running"),
            _ => ApiError::internal( msg)
        }
    }
}
