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

use std::{sync::Arc, time::Duration};
use async_trait::async_trait;
use rand::{SeedableRng, rngs::StdRng};
use tokio::time::{sleep, timeout};
use odin_common::datetime::millis;
use odin_trafficsim::{
    RunOverrides, SimConfig, Simulation, TrackStore, TrajectoryEngine,
    aircraft::new_aircraft,
    errors::{Result, TrafficSimError},
    publish::{JsonLinesSink, NullSink, PublicationSink, Publisher, TrackRecord},
};

// run with "cargo test test_start_stop -- --nocapture"

fn fast_config ()->SimConfig {
    let mut config = SimConfig::default();
    config.aircraft.tick_interval = millis(20);
    config.vessels.tick_interval = millis(40);
    config.cleanup_interval = millis(100);
    config
}

fn sample_records (n: usize)->Vec<TrackRecord> {
    let config = SimConfig::default();
    let mut rng = StdRng::seed_from_u64( 1);
    (0..n).map( |_| TrackRecord::Flight( new_aircraft( &mut rng, &config, &config.airports[0], 0.1))).collect()
}

#[tokio::test]
async fn test_start_stop() {
    let engine = TrajectoryEngine::with_seed( Arc::new( fast_config()), Arc::new( TrackStore::new()), Publisher::disabled(), 42).unwrap();
    let sim = Simulation::new( Arc::new( engine));

    assert!( !sim.is_running());
    assert!( !sim.stop().await); // nothing to stop

    sim.start().unwrap();
    assert!( sim.is_running());
    assert!( matches!( sim.start(), Err(TrafficSimError::AlreadyRunning)));

    sleep( Duration::from_millis(300)).await;
    let stats = sim.stats();
    println!("running: {:?}", stats);
    assert!( stats.aircraft.ticks > 0);
    assert!( stats.vessels.ticks > 0);
    assert!( stats.aircraft.active >= 20);

    assert!( sim.stop().await);
    assert!( !sim.is_running());
    assert!( !sim.stop().await);

    let ticks = sim.stats().aircraft.ticks;
    sleep( Duration::from_millis(100)).await;
    assert_eq!( sim.stats().aircraft.ticks, ticks); // no more ticks after stop

    sim.start().unwrap(); // restart keeps the store
    sleep( Duration::from_millis(100)).await;
    assert!( sim.stop().await);
    assert!( sim.stats().aircraft.ticks > ticks);
}

#[tokio::test]
async fn test_start_with_overrides() {
    let engine = TrajectoryEngine::with_seed( Arc::new( fast_config()), Arc::new( TrackStore::new()), Publisher::disabled(), 42).unwrap();
    let sim = Simulation::new( Arc::new( engine));

    let overrides = RunOverrides { flight_interval: Some(10), max_flights: Some(8), max_ships: Some(3), ..RunOverrides::default() };
    sim.start_with( &overrides).unwrap();
    assert!( sim.is_running());
    let config = sim.engine().config();
    assert_eq!( config.aircraft.tick_interval, millis(10));
    assert_eq!( config.aircraft.max_count, 8);
    assert_eq!( config.aircraft.initial_count, 8); // capped by the new maximum
    assert_eq!( config.vessels.max_count, 3);
    assert_eq!( config.vessels.tick_interval, millis(40));

    sleep( Duration::from_millis(200)).await;
    assert!( sim.stats().aircraft.active <= 8);
    assert!( sim.stats().vessels.active <= 3);
    assert!( sim.stop().await);

    let bad = RunOverrides { ship_interval: Some(0), ..RunOverrides::default() };
    assert!( matches!( sim.start_with( &bad), Err(TrafficSimError::InvalidRequest(_))));
    assert!( !sim.is_running());
    assert_eq!( sim.engine().config().aircraft.max_count, 8); // rejected runs leave the engine alone

    sim.start().unwrap();
    assert_eq!( sim.engine().config().aircraft.max_count, 100);
    assert_eq!( sim.engine().config().aircraft.tick_interval, millis(20));
    assert!( sim.stop().await);
}

/// fails every other record and is slow at it
struct FlakySink { n: usize, delay: Duration }

#[async_trait]
impl PublicationSink for FlakySink {
    fn name (&self)->&str { "flaky" }

    async fn publish (&mut self, rec: &TrackRecord)->Result<()> {
        sleep( self.delay).await;
        self.n += 1;
        if self.n % 2 == 0 { Err( TrafficSimError::PublishError( format!("rejected {}", rec.key()))) } else { Ok(()) }
    }
}

#[tokio::test]
async fn test_publisher_backpressure() {
    let (publisher, jh) = Publisher::spawn( FlakySink { n: 0, delay: Duration::from_millis(10) }, 4);

    // the drain task cannot run before we yield so only the queue capacity gets through
    let n_queued = sample_records( 100).into_iter().filter( |rec| publisher.try_publish( rec.clone())).count();
    assert_eq!( n_queued, 4);

    let drained = timeout( Duration::from_secs(5), async {
        loop {
            let stats = publisher.stats();
            if stats.published + stats.failed == 4 { break stats }
            sleep( Duration::from_millis(10)).await;
        }
    }).await.unwrap();

    println!("{:?}", drained);
    assert_eq!( drained.submitted, 100);
    assert_eq!( drained.dropped, 96);
    assert_eq!( drained.published, 2);
    assert_eq!( drained.failed, 2);

    drop( publisher);
    timeout( Duration::from_secs(1), jh).await.unwrap().unwrap();
}

#[tokio::test]
async fn test_disabled_publisher() {
    let publisher = Publisher::disabled();
    assert!( !publisher.is_enabled());
    assert!( !publisher.try_publish( sample_records(1).remove(0)));
    assert_eq!( publisher.stats().submitted, 0);

    let (publisher, jh) = Publisher::spawn( NullSink, 16);
    assert!( publisher.is_enabled());
    assert!( publisher.try_publish( sample_records(1).remove(0)));
    drop( publisher);
    jh.await.unwrap();
}

#[tokio::test]
async fn test_jsonl_sink() {
    let path = std::env::temp_dir().join( format!("test_trafficsim_{}.jsonl", std::process::id()));
    let _ = std::fs::remove_file( &path);

    let sink = JsonLinesSink::open( &path).await.unwrap();
    let (publisher, jh) = Publisher::spawn( sink, 16);
    for rec in sample_records( 3) { assert!( publisher.try_publish( rec)) }
    drop( publisher);
    jh.await.unwrap();

    let content = std::fs::read_to_string( &path).unwrap();
    println!("{}", content);
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!( lines.len(), 3);
    for line in lines {
        let v: serde_json::Value = serde_json::from_str( line).unwrap();
        assert_eq!( v["topic"], "flights");
        assert!( v["hex"].is_string());
        assert!( v.get("destLat").is_none()); // internal routing state is not published
    }
    let _ = std::fs::remove_file( &path);
}

#[tokio::test]
async fn test_engine_publishes() {
    let (publisher, jh) = Publisher::spawn( NullSink, 1024);
    let engine = TrajectoryEngine::with_seed( Arc::new( SimConfig::default()), Arc::new( TrackStore::new()), publisher.clone(), 1).unwrap();

    let (n_ac, n_v) = engine.populate();
    let r = engine.tick_aircraft( 1.0);
    let expected = n_ac + n_v + r.updated.len() + r.created.len();

    let stats = timeout( Duration::from_secs(5), async {
        loop {
            let stats = engine.publisher().stats();
            if stats.published as usize == expected { break stats }
            sleep( Duration::from_millis(10)).await;
        }
    }).await.unwrap();
    assert_eq!( stats.submitted as usize, expected);
    assert_eq!( stats.dropped, 0);
}
