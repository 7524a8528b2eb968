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
#![allow(unused)]

//! the HTTP facade of the feed simulator. End points:
//!
//!     GET  /api/mock/{source}?minLat=&maxLat=&minLon=&maxLon=   source payload in its wire format
//!     GET  /api/mock/stats                                     per source statistics
//!     GET  /health
//!     GET  /api/status                                         engine and publisher statistics
//!     GET  /api/config
//!     GET  /api/locations                                      airports, ports and envelope
//!     POST /api/simulation/start                               optional {"flightInterval": ms, "shipInterval": ms, "maxFlights": n, "maxShips": n}
//!     POST /api/simulation/stop
//!     POST /api/simulation/scenarios/airport                   {"airport": "SGN"}
//!     POST /api/simulation/scenarios/port
//!     POST /api/manual/flight                                  aircraft overrides
//!     POST /api/manual/vessel                                  vessel overrides
//!     POST /api/manual/ship                                    alias of /api/manual/vessel
//!
//! errors are returned as `{"error": msg}`

use std::sync::Arc;
use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, Query, State, rejection::JsonRejection},
    routing::{get, post},
};
use serde::{Serialize,Deserialize};
use serde_json::{Value, json};
use tower_http::cors::CorsLayer;
use odin_common::{BoundingBox, datetime::EpochMillis, info};
use odin_server::{ApiError, ApiResult};
use odin_trafficsim::{
    Aircraft, AircraftOverrides, RunOverrides, Simulation, TrackStore, TrajectoryEngine, Vessel, VesselOverrides,
    publish::Publisher,
};

use crate::aggregator::SourceAggregator;
use crate::config::FeedSimConfig;
use crate::errors::{FeedSimError, Result, invalid_bounds};

/// everything the handlers need
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<FeedSimConfig>,
    pub sim: Arc<Simulation>,
    pub aggregator: Arc<SourceAggregator>,
    pub started: EpochMillis,
}

impl AppState {
    /// create the shared store, engine and aggregator for `config`. Nothing is started yet
    pub fn build (config: Arc<FeedSimConfig>, publisher: Publisher, seed: Option<u64>)->Result<Self> {
        config.validate()?;
        let store = Arc::new( TrackStore::new());
        let sim_config = Arc::new( config.simulation.clone());

        let engine = match seed {
            Some(seed) => TrajectoryEngine::with_seed( sim_config, store.clone(), publisher, seed)?,
            None => TrajectoryEngine::new( sim_config, store.clone(), publisher)?
        };

        let envelope = config.simulation.envelope;
        let sources = config.sources.clone();
        let aggregator = match seed {
            Some(seed) => SourceAggregator::with_seed( store, envelope, sources, seed)?,
            None => SourceAggregator::new( store, envelope, sources)?
        };

        Ok( AppState {
            config,
            sim: Arc::new( Simulation::new( Arc::new( engine))),
            aggregator: Arc::new( aggregator),
            started: EpochMillis::now(),
        })
    }

    pub fn engine (&self)->&TrajectoryEngine { self.sim.engine() }
}

/// optional query region. Either all four values are set or none
#[derive(Deserialize,Debug,Default)]
#[serde(rename_all="camelCase")]
pub struct BoundsQuery {
    pub min_lat: Option<String>,
    pub max_lat: Option<String>,
    pub min_lon: Option<String>,
    pub max_lon: Option<String>,
}

fn parse_coord (name: &str, s: &str)->Result<f64> {
    match s.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err( invalid_bounds( format!("{name} is not a number: '{s}'")))
    }
}

impl BoundsQuery {
    pub fn to_bounds (&self)->Result<Option<BoundingBox>> {
        match (&self.min_lat, &self.max_lat, &self.min_lon, &self.max_lon) {
            (None, None, None, None) => Ok(None),
            (Some(min_lat), Some(max_lat), Some(min_lon), Some(max_lon)) => {
                let bb = BoundingBox::from_min_max(
                    parse_coord( "minLat", min_lat)?, parse_coord( "maxLat", max_lat)?,
                    parse_coord( "minLon", min_lon)?, parse_coord( "maxLon", max_lon)?
                );
                if bb.is_valid() { Ok( Some(bb)) } else { Err( invalid_bounds( format!("inverted or out of range bounds {bb}"))) }
            }
            _ => Err( invalid_bounds( "minLat, maxLat, minLon and maxLon have to be set together"))
        }
    }
}

fn api_error (e: impl Into<FeedSimError>)->ApiError { ApiError::from( e.into()) }

fn rejected (rej: JsonRejection)->ApiError { ApiError::new( rej.status(), rej.body_text()) }

pub fn router (state: AppState)->Router {
    Router::new()
        .route( "/health", get( self::get::health))
        .route( "/api/status", get( self::get::status))
        .route( "/api/config", get( self::get::config))
        .route( "/api/locations", get( self::get::locations))
        .route( "/api/mock/stats", get( self::get::source_stats))
        .route( "/api/mock/{source}", get( self::get::source_payload))
        .route( "/api/simulation/start", post( self::post::start))
        .route( "/api/simulation/stop", post( self::post::stop))
        .route( "/api/simulation/scenarios/airport", post( self::post::airport_scenario))
        .route( "/api/simulation/scenarios/port", post( self::post::port_scenario))
        .route( "/api/manual/flight", post( self::post::manual_flight))
        .route( "/api/manual/vessel", post( self::post::manual_vessel))
        .route( "/api/manual/ship", post( self::post::manual_vessel))
        .layer( CorsLayer::permissive())
        .with_state( state)
}

mod get {
    use super::*;

    pub async fn health (State(state): State<AppState>)->ApiResult<Value> {
        let store = state.engine().store();
        Ok( Json( json!({
            "status": "OK",
            "timestamp": EpochMillis::now().to_string(),
            "running": state.sim.is_running(),
            "activeFlights": store.aircraft.len(),
            "activeVessels": store.vessels.len(),
        })))
    }

    pub async fn status (State(state): State<AppState>)->ApiResult<Value> {
        let now = EpochMillis::now();
        let sources: Vec<&str> = state.aggregator.profiles().into_iter().map( |p| p.name.as_str()).collect();
        Ok( Json( json!({
            "running": state.sim.is_running(),
            "uptimeSecs": now.duration_since( state.started).as_secs(),
            "engine": state.sim.stats(),
            "publisher": state.engine().publisher().stats(),
            "sources": sources,
            "lastUpdate": now.to_string(),
        })))
    }

    pub async fn config (State(state): State<AppState>)->ApiResult<FeedSimConfig> {
        Ok( Json( state.config.as_ref().clone()))
    }

    pub async fn locations (State(state): State<AppState>)->ApiResult<Value> {
        let sim = &state.config.simulation;
        Ok( Json( json!({
            "airports": sim.airports,
            "ports": sim.ports,
            "envelope": sim.envelope,
        })))
    }

    pub async fn source_stats (State(state): State<AppState>)->ApiResult<Value> {
        Ok( Json( json!({ "sources": state.aggregator.stats() })))
    }

    pub async fn source_payload (State(state): State<AppState>, Path(source): Path<String>, Query(q): Query<BoundsQuery>)->ApiResult<Value> {
        if state.aggregator.profile( &source).is_none() {
            return Err( api_error( FeedSimError::UnknownSource( source)))
        }
        let bounds = q.to_bounds().map_err( api_error)?;
        let payload = state.aggregator.query( &source, bounds.as_ref()).map_err( api_error)?;
        Ok( Json( payload))
    }
}

mod post {
    use super::*;

    /// an empty body starts with the configured defaults
    fn run_overrides (body: &[u8])->std::result::Result<RunOverrides,ApiError> {
        if body.iter().all( |b| b.is_ascii_whitespace()) {
            Ok( RunOverrides::default())
        } else {
            serde_json::from_slice( body).map_err( |e| ApiError::bad_request( format!("invalid start request: {e}")))
        }
    }

    pub async fn start (State(state): State<AppState>, body: Bytes)->ApiResult<Value> {
        let overrides = run_overrides( &body)?;
        state.sim.start_with( &overrides).map_err( api_error)?;

        let config = state.engine().config();
        Ok( Json( json!({
            "status": "started",
            "flightIntervalMs": config.aircraft.tick_interval.as_millis() as u64,
            "shipIntervalMs": config.vessels.tick_interval.as_millis() as u64,
            "maxFlights": config.aircraft.max_count,
            "maxShips": config.vessels.max_count,
        })))
    }

    pub async fn stop (State(state): State<AppState>)->ApiResult<Value> {
        let status = if state.sim.stop().await { "stopped" } else { "not running" };
        Ok( Json( json!({ "status": status })))
    }

    #[derive(Deserialize,Debug)]
    pub struct AirportScenario {
        pub airport: String,
    }

    pub async fn airport_scenario (State(state): State<AppState>, body: std::result::Result<Json<AirportScenario>,JsonRejection>)->ApiResult<Value> {
        let Json(req) = body.map_err( rejected)?;
        let created = state.engine().airport_scenario( &req.airport).map_err( api_error)?;
        Ok( Json( json!({
            "scenario": "airport",
            "airport": req.airport.to_uppercase(),
            "created": created.len(),
            "aircraft": created,
        })))
    }

    pub async fn port_scenario (State(state): State<AppState>)->ApiResult<Value> {
        let created = state.engine().port_scenario();
        Ok( Json( json!({
            "scenario": "port",
            "created": created.len(),
            "vessels": created,
        })))
    }

    pub async fn manual_flight (State(state): State<AppState>, body: std::result::Result<Json<AircraftOverrides>,JsonRejection>)->ApiResult<Aircraft> {
        let Json(overrides) = body.map_err( rejected)?;
        let ac = state.engine().inject_aircraft( &overrides).map_err( api_error)?;
        Ok( Json(ac))
    }

    pub async fn manual_vessel (State(state): State<AppState>, body: std::result::Result<Json<VesselOverrides>,JsonRejection>)->ApiResult<Vessel> {
        let Json(overrides) = body.map_err( rejected)?;
        let v = state.engine().inject_vessel( &overrides).map_err( api_error)?;
        Ok( Json(v))
    }
}
