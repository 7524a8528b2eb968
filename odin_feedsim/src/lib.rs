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

//! multi source feed simulator. Serves independently degraded views of the simulated ground truth
//! from [`odin_trafficsim`] in the wire formats of public flight and vessel tracking services.
//!
//! [`aggregator::SourceAggregator`] keeps one view per [`profile::SourceProfile`], [`formats`] renders
//! them and [`feed_service`] is the HTTP facade.

pub mod errors;
pub mod profile;
pub mod degrade;
pub mod formats;
pub mod aggregator;
pub mod config;
pub mod feed_service;

pub use profile::{SourceKind, SourceProfile, default_profiles};
pub use aggregator::{SourceAggregator, SourceStats};
pub use config::{FeedSimConfig, SinkConfig, load_feedsim_config};
pub use feed_service::{AppState, router};
