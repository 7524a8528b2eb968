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

//! ground truth simulation of aircraft and vessel traffic.
//!
//! A single [`store::TrackStore`] owns all live entities. The [`engine::TrajectoryEngine`] advances them
//! in per-category ticks, evicts the ones that leave the operating envelope and keeps the population
//! topped up. [`simulation::Simulation`] drives the engine from tokio timers and every advanced entity
//! is handed to a [`publish::Publisher`] as a ground truth record.

pub mod errors;
pub mod config;
pub mod refdata;
pub mod store;
pub mod aircraft;
pub mod vessel;
pub mod engine;
pub mod publish;
pub mod simulation;

pub use store::{EntityStore, TrackStore, TrackedEntity};
pub use aircraft::{Aircraft, AircraftOverrides, FlightPhase};
pub use vessel::{Vessel, VesselOverrides};
pub use engine::{TrajectoryEngine, TickReport, EngineStats};
pub use simulation::Simulation;
pub use config::{SimConfig, RunOverrides, load_config};
