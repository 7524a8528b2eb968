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

use std::{future::Future, sync::{Arc, Mutex, atomic::{AtomicBool,Ordering}}, time::Duration};
use tokio::{task::JoinHandle, time::{self, MissedTickBehavior}};
use tokio_util::sync::CancellationToken;
use odin_common::{info,warn,error};

use crate::config::{RunOverrides, SimConfig};
use crate::engine::{EngineStats, TrajectoryEngine};
use crate::errors::{Result,TrafficSimError};

struct RunningTasks {
    cancel: CancellationToken,
    handles: Vec<JoinHandle<()>>,
}

/// periodic scheduling of the engine: one timer task per category plus a low frequency idle sweep.
/// Ticks of a category never overlap since each category has a single task (and the engine serializes
/// per category anyway)
pub struct Simulation {
    engine: Arc<TrajectoryEngine>,
    base_config: Arc<SimConfig>, // what each run starts from before RunOverrides are applied
    running: AtomicBool,
    tasks: Mutex<Option<RunningTasks>>,
}

impl Simulation {
    pub fn new (engine: Arc<TrajectoryEngine>)->Self {
        let base_config = engine.config();
        Simulation { engine, base_config, running: AtomicBool::new(false), tasks: Mutex::new(None) }
    }

    pub fn engine (&self)->&Arc<TrajectoryEngine> { &self.engine }

    pub fn is_running (&self)->bool { self.running.load( Ordering::Acquire) }

    pub fn stats (&self)->EngineStats { self.engine.stats() }

    /// populate and start the tick timers with the base configuration. Has to be called from within a tokio runtime
    pub fn start (&self)->Result<()> {
        self.start_with( &RunOverrides::default())
    }

    /// start a run with the given overrides applied to a fresh copy of the base configuration.
    /// Invalid overrides are rejected without changing the engine state
    pub fn start_with (&self, overrides: &RunOverrides)->Result<()> {
        let mut tasks = self.tasks.lock().unwrap_or_else( |e| e.into_inner());
        if self.running.load( Ordering::Acquire) {
            return Err( TrafficSimError::AlreadyRunning)
        }

        let config = Arc::new( overrides.apply_to( &self.base_config)?);
        self.engine.set_config( config.clone())?;
        self.running.store( true, Ordering::Release);

        self.engine.populate();

        let cancel = CancellationToken::new();
        let mut handles = Vec::with_capacity(3);

        let ac_interval = config.aircraft.tick_interval;
        let engine = self.engine.clone();
        handles.push( spawn_periodic( "aircraft-ticks", ac_interval, cancel.clone(), move || {
            engine.tick_aircraft( ac_interval.as_secs_f64());
        }));

        let v_interval = config.vessels.tick_interval;
        let engine = self.engine.clone();
        handles.push( spawn_periodic( "vessel-ticks", v_interval, cancel.clone(), move || {
            engine.tick_vessels( v_interval.as_secs_f64());
        }));

        let idle_timeout = config.idle_timeout;
        let engine = self.engine.clone();
        handles.push( spawn_periodic( "idle-sweep", config.cleanup_interval, cancel.clone(), move || {
            engine.sweep_idle( idle_timeout);
        }));

        *tasks = Some( RunningTasks { cancel, handles });
        info!("simulation started");
        Ok(())
    }

    /// stop all timers. Idempotent - returns false if the simulation was not running.
    /// Waits for in-flight ticks to complete
    pub async fn stop (&self)->bool {
        let tasks = {
            let mut tasks = self.tasks.lock().unwrap_or_else( |e| e.into_inner());
            if !self.running.swap( false, Ordering::AcqRel) {
                return false
            }
            tasks.take()
        };

        if let Some(tasks) = tasks {
            tasks.cancel.cancel();
            for jh in tasks.handles {
                if let Err(e) = jh.await { error!("simulation task failed: {}", e) }
            }
        }
        info!("simulation stopped");
        true
    }
}

/// run `f` every `interval` until `cancel` fires. Cancellation is only observed between invocations
fn spawn_periodic<F> (name: &'static str, interval: Duration, cancel: CancellationToken, mut f: F)->JoinHandle<()>
    where F: FnMut() + Send + 'static
{
    tokio::spawn( async move {
        let mut timer = time::interval( interval);
        timer.set_missed_tick_behavior( MissedTickBehavior::Skip);
        timer.tick().await; // first tick completes immediately

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = timer.tick() => f()
            }
        }
        info!("{} terminated", name);
    })
}
