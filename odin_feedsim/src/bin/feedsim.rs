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

//! run the traffic simulation together with the mock source HTTP facade

use std::sync::Arc;
use anyhow::Result;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;
use odin_common::{define_cli, info, warn};
use odin_server::spawn_server_task;
use odin_feedsim::{AppState, FeedSimConfig, SinkConfig, load_feedsim_config, router};

define_cli! { ARGS [about="multi source flight and vessel feed simulator"] =
    #[arg(long)] config: Option<String> [help="RON feedsim config (default config if not set)"],
    #[arg(long)] port: Option<u16> [help="override the configured server port"],
    #[arg(long)] no_start: bool [help="do not start the simulation until POST /api/simulation/start"],
    #[arg(long)] jsonl: Option<String> [help="append ground truth records to this JSON lines file"],
    #[arg(long)] seed: Option<u64> [help="seed for reproducible runs"]
}

#[tokio::main]
async fn main ()->Result<()> {
    tracing_subscriber::fmt().with_env_filter( EnvFilter::try_from_default_env().unwrap_or_else( |_| EnvFilter::new("info"))).init();

    let mut config = match &ARGS.config {
        Some(path) => load_feedsim_config( path)?,
        None => FeedSimConfig::default()
    };
    if let Some(port) = ARGS.port { config.server = config.server.with_port( port) }
    if let Some(path) = &ARGS.jsonl { config.publication.sink = SinkConfig::JsonLines( path.clone()) }
    let config = Arc::new( config);

    let (publisher, publish_task) = config.publication.spawn_publisher().await?;
    let state = AppState::build( config.clone(), publisher, ARGS.seed)?;

    let cancel = CancellationToken::new();
    let refresh_tasks = state.aggregator.spawn_refresh_tasks( cancel.clone());
    if !ARGS.no_start { state.sim.start()? }

    let (addr, server_task) = spawn_server_task( &config.server, "feedsim", router( state.clone()), cancel.clone()).await?;
    info!("serving {} sources on http://{addr}", state.aggregator.profiles().len());

    tokio::select! {
        _ = tokio::signal::ctrl_c() => { info!("received ctrl-c, shutting down") }
        res = server_task => { warn!("server task terminated: {res:?}") }
    }

    state.sim.stop().await;
    cancel.cancel();
    for task in refresh_tasks { let _ = task.await; }

    info!("engine: {:?}", state.sim.stats());
    info!("publisher: {:?}", state.engine().publisher().stats());
    drop( state);
    let _ = publish_task.await;
    Ok(())
}
