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

use std::sync::Arc;
use rand::{SeedableRng, rngs::StdRng};
use uom::si::length::meter;
use odin_common::{BoundingBox, datetime::{EpochMillis, secs}, geo::{angular_distance, haversine_distance}};
use odin_trafficsim::{
    AircraftOverrides, FlightPhase, SimConfig, TrackStore, TrajectoryEngine, VesselOverrides,
    config::{Location, RoutingMode, ValueRange},
    engine::{advance_aircraft, advance_vessel},
    aircraft::new_aircraft,
    vessel::new_vessel,
    errors::TrafficSimError,
    publish::Publisher,
};

// run with "cargo test test_scenario_advance -- --nocapture"

fn engine_with (config: SimConfig)->TrajectoryEngine {
    TrajectoryEngine::with_seed( Arc::new(config), Arc::new( TrackStore::new()), Publisher::disabled(), 42).unwrap()
}

/// no random target redraws, no automatic population
fn steady_config ()->SimConfig {
    let mut config = SimConfig::default();
    config.aircraft.enabled = false;
    config.aircraft.heading_change_probability = 0.0;
    config.aircraft.speed_change_probability = 0.0;
    config.aircraft.altitude_change_probability = 0.0;
    config.vessels.enabled = false;
    config.vessels.course_change_probability = 0.0;
    config.vessels.speed_change_probability = 0.0;
    config
}

#[test]
fn test_scenario_advance() {
    let engine = engine_with( steady_config());
    let ac = engine.inject_aircraft( &AircraftOverrides {
        lat: Some(10.8231), lon: Some(106.6297), heading: Some(45.0), speed: Some(480.0),
        ..AircraftOverrides::default()
    }).unwrap();

    let report = engine.tick_aircraft( 60.0);
    assert_eq!( report.updated.len(), 1);
    assert!( report.created.is_empty());

    let ac1 = &report.updated[0];
    let d = haversine_distance( ac.lat, ac.lon, ac1.lat, ac1.lon).get::<meter>();
    println!("{} -> {} moved {:.1}m", ac, ac1, d);

    assert!( ac1.lat > ac.lat && ac1.lon > ac.lon);
    assert!( (d - 14_816.0).abs() < 0.01 * 14_816.0);
    assert_eq!( ac1.track_age, 60.0);
    assert_eq!( engine.store().aircraft.get( ac.id).unwrap(), *ac1);
}

#[test]
fn test_heading_stays_normalized() {
    let mut config = SimConfig::default();
    config.aircraft.max_count = 30;
    config.vessels.max_count = 20;
    let engine = engine_with( config);

    for i in 0..10_000 {
        let r = engine.tick_aircraft( 1.0);
        for ac in r.updated.iter().chain( r.created.iter()) {
            assert!( ac.heading >= 0.0 && ac.heading < 360.0, "tick {i}: {ac}");
            assert!( ac.target_heading >= 0.0 && ac.target_heading < 360.0);
            assert!( ac.altitude >= 1000.0 && ac.altitude <= 42000.0);
        }
        let r = engine.tick_vessels( 2.0);
        for v in r.updated.iter().chain( r.created.iter()) {
            assert!( v.course >= 0.0 && v.course < 360.0, "tick {i}: {v}");
        }
    }
    println!("{:?}", engine.stats());
}

#[test]
fn test_single_step_fuzz() {
    let mut config = SimConfig::default();
    config.envelope = BoundingBox::new( -180.0, -90.0, 180.0, 90.0); // nothing ever leaves
    config.aircraft.heading_change_probability = 0.5;
    let mut rng = StdRng::seed_from_u64( 7);

    let origin = config.airports[0].clone();
    let mut ac = new_aircraft( &mut rng, &config, &origin, 0.1);
    for _ in 0..10_000 {
        assert!( advance_aircraft( &mut ac, &config, 5.0, &mut rng));
        assert!( ac.heading >= 0.0 && ac.heading < 360.0);
    }

    let port = config.ports[0].clone();
    let mut v = new_vessel( &mut rng, &config, &port, 0.2);
    for _ in 0..10_000 {
        assert!( advance_vessel( &mut v, &config, 5.0, &mut rng));
        assert!( v.course >= 0.0 && v.course < 360.0);
    }
}

#[test]
fn test_eviction() {
    let engine = engine_with( steady_config());
    let ac = engine.inject_aircraft( &AircraftOverrides {
        lat: Some(16.0), lon: Some(109.49), heading: Some(90.0), speed: Some(900.0),
        ..AircraftOverrides::default()
    }).unwrap();
    let v = engine.inject_vessel( &VesselOverrides {
        lat: Some(8.501), lon: Some(105.0), course: Some(180.0), speed: Some(25.0),
        ..VesselOverrides::default()
    }).unwrap();

    let r = engine.tick_aircraft( 60.0);
    assert_eq!( r.evicted, vec![ac.id]);
    assert!( r.updated.is_empty());
    assert!( engine.store().aircraft.get( ac.id).is_none());
    assert!( !engine.store().aircraft.contains_key( &ac.hex));

    let r = engine.tick_vessels( 60.0);
    assert_eq!( r.evicted, vec![v.id]);
    assert!( engine.store().vessels.get( v.id).is_none());

    let stats = engine.stats();
    assert_eq!( stats.aircraft.evicted_out_of_bounds, 1);
    assert_eq!( stats.vessels.evicted_out_of_bounds, 1);
}

#[test]
fn test_population_cap() {
    let mut config = SimConfig::default();
    config.aircraft.max_count = 5;
    config.aircraft.initial_count = 0;
    config.vessels.max_count = 3;
    config.vessels.initial_count = 0;
    let engine = engine_with( config);

    for _ in 0..500 {
        engine.tick_aircraft( 30.0); // long ticks so that attrition is frequent
        engine.tick_vessels( 600.0);

        let n_ac = engine.store().aircraft.len();
        let n_v = engine.store().vessels.len();
        assert!( n_ac >= 1 && n_ac <= 5, "aircraft count {n_ac}");
        assert!( n_v >= 1 && n_v <= 3, "vessel count {n_v}");
    }

    let stats = engine.stats();
    println!("{:?}", stats);
    assert!( stats.aircraft.evicted_out_of_bounds > 0);
}

#[test]
fn test_creation_disabled() {
    let mut config = SimConfig::default();
    config.aircraft.enabled = false;
    let engine = engine_with( config);

    let r = engine.tick_aircraft( 1.0);
    assert!( r.created.is_empty());
    assert!( engine.store().aircraft.is_empty());
}

#[test]
fn test_draught_bounds() {
    let mut config = steady_config();
    config.envelope = BoundingBox::new( -180.0, -90.0, 180.0, 90.0);
    config.vessels.draught_change_probability = 1.0;
    config.vessels.draught_step = 0.5;
    let mut rng = StdRng::seed_from_u64( 11);

    let port = config.ports[1].clone();
    let mut v = new_vessel( &mut rng, &config, &port, 0.0);
    v.draught = 10.0;

    let (mut lo, mut hi) = (f64::MAX, f64::MIN);
    for _ in 0..1000 {
        advance_vessel( &mut v, &config, 2.0, &mut rng);
        assert!( v.draught >= 5.0 && v.draught <= 20.0, "draught {}", v.draught);
        lo = lo.min( v.draught);
        hi = hi.max( v.draught);
    }
    println!("draught range over 1000 ticks: [{lo:.2},{hi:.2}]");
    assert!( hi > lo); // it did move
}

#[test]
fn test_destination_phases() {
    let mut config = SimConfig::default();
    config.routing = RoutingMode::Destination;
    config.airports = vec![
        Location::new( "AAA", "origin", 10.0, 106.0),
        Location::new( "BBB", "destination", 16.0, 108.0),
    ];
    config.aircraft.speed = ValueRange::new( 420.0, 450.0);
    config.aircraft.speed_change_probability = 0.0;
    config.aircraft.cruise_vs_noise = 0.0; // keep cruise level
    let mut rng = StdRng::seed_from_u64( 3);

    let origin = config.airports[0].clone();
    let mut ac = new_aircraft( &mut rng, &config, &origin, 0.0);
    assert_eq!( ac.destination, "BBB");
    assert_eq!( ac.phase, FlightPhase::Climb);

    let mut phases: Vec<FlightPhase> = vec![ ac.phase ];
    let mut arrived = false;

    for _ in 0..5000 {
        assert!( advance_aircraft( &mut ac, &config, 10.0, &mut rng));

        if ac.origin == "BBB" { arrived = true; break }

        if ac.phase == FlightPhase::Descend {
            assert!( angular_distance( ac.lat, ac.lon, 16.0, 108.0) < 0.5 + 0.05);
            assert!( ac.vertical_speed < 0.0);
        }
        if *phases.last().unwrap() != ac.phase { phases.push( ac.phase) }
    }

    println!("phases: {:?}", phases);
    assert!( arrived, "aircraft never reached its destination: {ac}");
    assert_eq!( phases, vec![ FlightPhase::Climb, FlightPhase::Cruise, FlightPhase::Descend ]);
    assert_eq!( ac.destination, "AAA"); // only one other airport to go to
}

#[test]
fn test_overrides() {
    let engine = engine_with( steady_config());

    let ac = engine.inject_aircraft( &AircraftOverrides {
        callsign: Some("VN123".into()), altitude: Some(99_999.0), speed: Some(-5.0), heading: Some(725.0),
        destination: Some("HAN".into()),
        ..AircraftOverrides::default()
    }).unwrap();
    assert_eq!( ac.callsign, "VN123");
    assert_eq!( ac.altitude, 42_000.0);
    assert_eq!( ac.speed, 150.0);
    assert_eq!( ac.heading, 5.0);
    assert_eq!( ac.destination, "HAN");
    assert_eq!( ac.dest_lat, 21.2214);
    assert!( engine.config().envelope.contains( ac.lat, ac.lon));

    let res = engine.inject_aircraft( &AircraftOverrides { lat: Some(0.0), lon: Some(0.0), ..AircraftOverrides::default() });
    assert!( matches!( res, Err(TrafficSimError::InvalidRequest(_))));

    let res = engine.inject_aircraft( &AircraftOverrides { lat: Some(12.0), ..AircraftOverrides::default() });
    assert!( matches!( res, Err(TrafficSimError::InvalidRequest(_))));

    // origin has to be a known airport and determines where the aircraft is created
    let res = engine.inject_aircraft( &AircraftOverrides { origin: Some("XYZ".into()), ..AircraftOverrides::default() });
    assert!( matches!( res, Err(TrafficSimError::InvalidRequest(_))));

    let ac2 = engine.inject_aircraft( &AircraftOverrides { origin: Some("dad".into()), ..AircraftOverrides::default() }).unwrap();
    assert_eq!( ac2.origin, "DAD");
    assert!( (ac2.lat - 16.0439).abs() <= 0.1 + 1e-9 && (ac2.lon - 108.1993).abs() <= 0.1 + 1e-9);

    let v = engine.inject_vessel( &VesselOverrides { draught: Some(50.0), course: Some(-90.0), ..VesselOverrides::default() }).unwrap();
    assert_eq!( v.draught, 20.0);
    assert_eq!( v.course, 270.0);
    assert_eq!( v.mmsi / 1_000_000, 574);

    assert_eq!( engine.store().aircraft.len(), 2);
    assert_eq!( engine.store().vessels.len(), 1);
}

#[test]
fn test_sweep_idle() {
    let engine = engine_with( steady_config());
    let store = engine.store();

    let stale_ac = engine.inject_aircraft( &AircraftOverrides::default()).unwrap();
    let fresh_ac = engine.inject_aircraft( &AircraftOverrides::default()).unwrap();
    let stale_v = engine.inject_vessel( &VesselOverrides::default()).unwrap();

    let backdated = EpochMillis::now().minus( secs(600));
    store.aircraft.update( stale_ac.id, |ac| ac.last_update = backdated).unwrap();
    store.vessels.update( stale_v.id, |v| v.last_update = backdated).unwrap();

    assert_eq!( engine.sweep_idle( secs(300)), 2);
    assert!( store.aircraft.get( stale_ac.id).is_none());
    assert!( store.aircraft.get( fresh_ac.id).is_some());
    assert!( store.vessels.is_empty());

    let stats = engine.stats();
    assert_eq!( stats.aircraft.evicted_idle, 1);
    assert_eq!( stats.vessels.evicted_idle, 1);

    assert_eq!( engine.sweep_idle( secs(300)), 0); // nothing left to evict
    assert_eq!( engine.stats().aircraft.evicted_idle, 1);
}

#[test]
fn test_scenarios() {
    let mut config = steady_config();
    config.aircraft.max_count = 12;
    let engine = engine_with( config);

    let created = engine.airport_scenario( "sgn").unwrap();
    assert_eq!( created.len(), 10);
    for ac in &created {
        assert!( (ac.lat - 10.8187).abs() <= 0.05 + 1e-9 && (ac.lon - 106.6524).abs() <= 0.05 + 1e-9);
        assert_eq!( ac.origin, "SGN");
    }

    let created = engine.airport_scenario( "HAN").unwrap();
    assert_eq!( created.len(), 2); // capped by max_count
    assert_eq!( engine.store().aircraft.len(), 12);

    assert!( matches!( engine.airport_scenario( "XXX"), Err(TrafficSimError::UnknownLocation(_))));

    let vessels = engine.port_scenario();
    assert_eq!( vessels.len(), 10);
    let n_north = vessels.iter().filter( |v| v.lat > 20.0).count();
    assert_eq!( n_north, 5);
}

#[test]
fn test_populate() {
    let engine = engine_with( SimConfig::default());
    assert_eq!( engine.populate(), (20, 10));
    assert_eq!( engine.populate(), (0, 0)); // already at initial count

    let mut hexes: Vec<String> = engine.store().aircraft.snapshot().into_iter().map( |ac| ac.hex).collect();
    hexes.sort();
    hexes.dedup();
    assert_eq!( hexes.len(), 20);
    assert!( hexes.iter().all( |h| h.len() == 6 && h.chars().all( |c| c.is_ascii_hexdigit() && !c.is_ascii_lowercase())));
}

#[test]
fn test_invalid_config() {
    let mut config = SimConfig::default();
    config.aircraft.altitude = ValueRange::new( 40000.0, 1000.0);
    let res = TrajectoryEngine::new( Arc::new(config), Arc::new( TrackStore::new()), Publisher::disabled());
    assert!( matches!( res, Err(TrafficSimError::ConfigError(_))));

    let mut config = SimConfig::default();
    config.envelope = BoundingBox::new( 110.0, 8.5, 102.0, 23.5);
    assert!( config.validate().is_err());

    let mut config = SimConfig::default();
    config.airports.push( Location::new( "LAX", "Los Angeles", 33.94, -118.41));
    assert!( config.validate().is_err());

    // values that would end up as empty sampling ranges or bogus rates in a tick
    let tweaks: &[fn(&mut SimConfig)] = &[
        |c: &mut SimConfig| c.vessels.draught_step = -0.1,
        |c: &mut SimConfig| c.vessels.draught_step = f64::NAN,
        |c: &mut SimConfig| c.vessels.spawn_jitter = -0.2,
        |c: &mut SimConfig| c.vessels.arrival_radius = -0.05,
        |c: &mut SimConfig| c.aircraft.cruise_vs_noise = -10.0,
        |c: &mut SimConfig| c.aircraft.cruise_vs_noise = f64::NAN,
        |c: &mut SimConfig| c.aircraft.climb_rate = -2000.0,
        |c: &mut SimConfig| c.aircraft.descent_rate = f64::INFINITY,
        |c: &mut SimConfig| c.aircraft.descent_threshold = -0.5,
        |c: &mut SimConfig| c.aircraft.arrival_radius = f64::NAN,
        |c: &mut SimConfig| c.aircraft.spawn_jitter = -0.1,
    ];
    for tweak in tweaks.iter() {
        let mut config = SimConfig::default();
        config.routing = RoutingMode::Destination;
        tweak( &mut config);
        let res = TrajectoryEngine::with_seed( Arc::new(config), Arc::new( TrackStore::new()), Publisher::disabled(), 42);
        assert!( matches!( res, Err(TrafficSimError::ConfigError(_))));
    }

    // zero is a valid (degenerate) step
    let mut config = SimConfig::default();
    config.vessels.draught_step = 0.0;
    config.aircraft.cruise_vs_noise = 0.0;
    assert!( config.validate().is_ok());
}
