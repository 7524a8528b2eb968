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

//! headless simulation run that writes ground truth records to a JSON lines file (or the log)

use std::{sync::Arc, time::Duration};
use anyhow::Result;
use tracing_subscriber::EnvFilter;
use odin_common::{define_cli, info};
use odin_trafficsim::{
    SimConfig, Simulation, TrackStore, TrajectoryEngine, load_config,
    publish::{JsonLinesSink, LogSink, Publisher}
};

define_cli! { ARGS [about="run the traffic simulation without HTTP facade"] =
    #[arg(long)] config: Option<String> [help="RON simulation config (default config if not set)"],
    #[arg(long)] jsonl: Option<String> [help="append ground truth records to this JSON lines file"],
    #[arg(long, default_value_t = 60)] duration: u64 [help="run time in seconds"],
    #[arg(long)] seed: Option<u64> [help="seed for reproducible runs"]
}

#[tokio::main]
async fn main ()->Result<()> {
    tracing_subscriber::fmt().with_env_filter( EnvFilter::try_from_default_env().unwrap_or_else( |_| EnvFilter::new("info"))).init();

    let config: SimConfig = match &ARGS.config {
        Some(path) => load_config( path)?,
        None => SimConfig::default()
    };
    let config = Arc::new( config);
    let store = Arc::new( TrackStore::new());

    let (publisher, sink_task) = match &ARGS.jsonl {
        Some(path) => Publisher::spawn( JsonLinesSink::open( path).await?, 4096),
        None => Publisher::spawn( LogSink, 4096)
    };

    let engine = match ARGS.seed {
        Some(seed) => TrajectoryEngine::with_seed( config, store, publisher, seed)?,
        None => TrajectoryEngine::new( config, store, publisher)?
    };
    let sim = Simulation::new( Arc::new( engine));
    sim.start()?;

    tokio::select! {
        _ = tokio::time::sleep( Duration::from_secs( ARGS.duration)) => {}
        _ = tokio::signal::ctrl_c() => {}
    }
    sim.stop().await;

    let stats = sim.stats();
    info!("aircraft: {:?}", stats.aircraft);
    info!("vessels: {:?}", stats.vessels);
    info!("publisher: {:?}", sim.engine().publisher().stats());
    Ok(())
}
