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

use std::{path::Path, time::Duration};
use serde::{Serialize,Deserialize};
use rand::Rng;
use strum::{Display,EnumString};
use odin_common::{BoundingBox, datetime::{deserialize_duration,serialize_duration,millis,secs}};

use crate::errors::{Result,TrafficSimError,config_error,invalid_request};

/// load a RON config file
pub fn load_config<C> (path: impl AsRef<Path>)->Result<C> where C: for<'a> Deserialize<'a> {
    let data = std::fs::read( path.as_ref())?;
    Ok( ron::de::from_bytes( data.as_slice())? )
}

/// closed [min,max] interval of a simulated quantity
#[derive(Deserialize,Serialize,Debug,Clone,Copy,PartialEq)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64
}

impl ValueRange {
    pub const fn new (min: f64, max: f64)->Self { ValueRange{min,max} }

    pub fn is_valid (&self)->bool { self.min.is_finite() && self.max.is_finite() && self.min <= self.max }

    #[inline] pub fn contains (&self, v: f64)->bool { v >= self.min && v <= self.max }

    #[inline] pub fn clamp (&self, v: f64)->f64 { v.clamp( self.min, self.max) }

    pub fn sample<R: Rng + ?Sized> (&self, rng: &mut R)->f64 { rng.random_range( self.min..=self.max) }
}

/// a named airport or port
#[derive(Deserialize,Serialize,Debug,Clone,PartialEq)]
pub struct Location {
    pub code: String,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

impl Location {
    pub fn new (code: &str, name: &str, lat: f64, lon: f64)->Self {
        Location { code: code.to_string(), name: name.to_string(), lat, lon }
    }
}

#[derive(Deserialize,Serialize,Debug,Clone,Copy,PartialEq,Eq,Display,EnumString)]
pub enum RoutingMode {
    /// targets are redrawn at random
    Wander,
    /// heading follows the bearing to an assigned destination
    Destination
}

#[derive(Deserialize,Serialize,Debug,Clone)]
#[serde(default)]
pub struct AircraftConfig {
    pub enabled: bool,
    pub max_count: usize,
    pub initial_count: usize,
    #[serde(deserialize_with="deserialize_duration",serialize_with="serialize_duration")]
    pub tick_interval: Duration,

    pub altitude: ValueRange,       // ft
    pub speed: ValueRange,          // kn
    pub vertical_speed: ValueRange, // ft/min
    pub cruise_altitude: ValueRange,

    pub spawn_jitter: f64,          // deg around airport
    pub spawn_weights: Vec<f64>,    // weights for creating 1,2,.. aircraft per tick

    pub heading_change_probability: f64,
    pub speed_change_probability: f64,
    pub altitude_change_probability: f64,

    pub heading_convergence: f64,
    pub speed_convergence: f64,
    pub altitude_convergence: f64,

    pub descent_threshold: f64,     // deg of arc to destination
    pub arrival_radius: f64,        // deg of arc
    pub climb_rate: f64,            // ft/min
    pub descent_rate: f64,          // ft/min
    pub cruise_vs_noise: f64,       // ft/min
}

impl Default for AircraftConfig {
    fn default()->Self {
        AircraftConfig {
            enabled: true,
            max_count: 100,
            initial_count: 20,
            tick_interval: secs(1),
            altitude: ValueRange::new( 1000.0, 42000.0),
            speed: ValueRange::new( 150.0, 900.0),
            vertical_speed: ValueRange::new( -2000.0, 2000.0),
            cruise_altitude: ValueRange::new( 28000.0, 39000.0),
            spawn_jitter: 0.1,
            spawn_weights: vec![0.5, 0.3, 0.2],
            heading_change_probability: 0.10,
            speed_change_probability: 0.05,
            altitude_change_probability: 0.03,
            heading_convergence: 0.10,
            speed_convergence: 0.05,
            altitude_convergence: 0.02,
            descent_threshold: 0.5,
            arrival_radius: 0.05,
            climb_rate: 2000.0,
            descent_rate: 1500.0,
            cruise_vs_noise: 50.0,
        }
    }
}

#[derive(Deserialize,Serialize,Debug,Clone)]
#[serde(default)]
pub struct VesselConfig {
    pub enabled: bool,
    pub max_count: usize,
    pub initial_count: usize,
    #[serde(deserialize_with="deserialize_duration",serialize_with="serialize_duration")]
    pub tick_interval: Duration,

    pub speed: ValueRange,           // kn
    pub draught: ValueRange,         // m
    pub initial_draught: ValueRange, // m

    pub spawn_jitter: f64,
    pub spawn_weights: Vec<f64>,
    pub mmsi_prefix: u32,            // maritime identification digits

    pub course_change_probability: f64,
    pub speed_change_probability: f64,
    pub course_convergence: f64,
    pub speed_convergence: f64,

    pub draught_change_probability: f64,
    pub draught_step: f64,           // max change per tick in m
    pub arrival_radius: f64,
}

impl Default for VesselConfig {
    fn default()->Self {
        VesselConfig {
            enabled: true,
            max_count: 50,
            initial_count: 10,
            tick_interval: secs(2),
            speed: ValueRange::new( 0.0, 25.0),
            draught: ValueRange::new( 5.0, 20.0),
            initial_draught: ValueRange::new( 5.0, 15.0),
            spawn_jitter: 0.2,
            spawn_weights: vec![0.7, 0.3],
            mmsi_prefix: 574,
            course_change_probability: 0.05,
            speed_change_probability: 0.03,
            course_convergence: 0.05,
            speed_convergence: 0.03,
            draught_change_probability: 0.1,
            draught_step: 0.1,
            arrival_radius: 0.05,
        }
    }
}

#[derive(Deserialize,Serialize,Debug,Clone)]
#[serde(default)]
pub struct SimConfig {
    pub envelope: BoundingBox,
    pub routing: RoutingMode,

    #[serde(deserialize_with="deserialize_duration",serialize_with="serialize_duration")]
    pub cleanup_interval: Duration,
    #[serde(deserialize_with="deserialize_duration",serialize_with="serialize_duration")]
    pub idle_timeout: Duration,

    pub aircraft: AircraftConfig,
    pub vessels: VesselConfig,

    pub airports: Vec<Location>,
    pub ports: Vec<Location>,
    pub scenario_ports: Vec<Location>, // where the port scenario puts its vessels
}

impl Default for SimConfig {
    fn default()->Self {
        SimConfig {
            envelope: BoundingBox::new( 102.0, 8.5, 109.5, 23.5),
            routing: RoutingMode::Wander,
            cleanup_interval: secs(60),
            idle_timeout: secs(300),
            aircraft: AircraftConfig::default(),
            vessels: VesselConfig::default(),
            airports: vec![
                Location::new( "SGN", "Tan Son Nhat", 10.8187, 106.6524),
                Location::new( "HAN", "Noi Bai", 21.2214, 105.8077),
                Location::new( "DAD", "Da Nang", 16.0439, 108.1993),
                Location::new( "CXR", "Cam Ranh", 11.9982, 109.2194),
                Location::new( "PQC", "Phu Quoc", 10.1625, 103.9931),
            ],
            ports: vec![
                Location::new( "VNSGN", "Ho Chi Minh City", 10.75, 106.75),
                Location::new( "VNHPH", "Hai Phong", 20.865, 106.6838),
                Location::new( "VNDNG", "Da Nang", 16.0833, 108.2167),
                Location::new( "VNVUT", "Vung Tau", 10.35, 107.0667),
                Location::new( "VNQNI", "Quy Nhon", 13.7667, 109.2333),
            ],
            scenario_ports: vec![
                Location::new( "VNVUT", "Vung Tau anchorage", 10.8, 107.1),
                Location::new( "VNHPH", "Hai Phong anchorage", 20.9, 106.9),
            ],
        }
    }
}

impl SimConfig {
    pub fn find_airport (&self, code: &str)->Option<&Location> {
        self.airports.iter().find( |a| a.code.eq_ignore_ascii_case( code))
    }

    pub fn find_port (&self, code: &str)->Option<&Location> {
        self.ports.iter().find( |p| p.code.eq_ignore_ascii_case( code))
    }

    /// check everything the engine relies on. Violations are reported, never fixed up
    pub fn validate (&self)->Result<()> {
        if !self.envelope.is_valid() { return Err( config_error!("invalid envelope {}", self.envelope)) }

        let ac = &self.aircraft;
        check_range( "aircraft.altitude", &ac.altitude)?;
        check_range( "aircraft.speed", &ac.speed)?;
        check_range( "aircraft.vertical_speed", &ac.vertical_speed)?;
        check_range( "aircraft.cruise_altitude", &ac.cruise_altitude)?;
        if ac.speed.min < 0.0 { return Err( config_error!("negative aircraft speed")) }
        check_probabilities( "aircraft", &[
            ac.heading_change_probability, ac.speed_change_probability, ac.altitude_change_probability,
            ac.heading_convergence, ac.speed_convergence, ac.altitude_convergence
        ])?;
        check_weights( "aircraft.spawn_weights", &ac.spawn_weights)?;
        check_positive( "aircraft.tick_interval", ac.tick_interval)?;
        if ac.initial_count > ac.max_count { return Err( config_error!("aircraft.initial_count exceeds max_count")) }
        check_non_negative( "aircraft", &[
            ("spawn_jitter", ac.spawn_jitter), ("descent_threshold", ac.descent_threshold), ("arrival_radius", ac.arrival_radius),
            ("climb_rate", ac.climb_rate), ("descent_rate", ac.descent_rate), ("cruise_vs_noise", ac.cruise_vs_noise)
        ])?;

        let vc = &self.vessels;
        check_range( "vessels.speed", &vc.speed)?;
        check_range( "vessels.draught", &vc.draught)?;
        check_range( "vessels.initial_draught", &vc.initial_draught)?;
        if vc.speed.min < 0.0 { return Err( config_error!("negative vessel speed")) }
        if !vc.draught.contains( vc.initial_draught.min) || !vc.draught.contains( vc.initial_draught.max) {
            return Err( config_error!("vessels.initial_draught outside of draught range"))
        }
        check_probabilities( "vessels", &[
            vc.course_change_probability, vc.speed_change_probability, vc.course_convergence,
            vc.speed_convergence, vc.draught_change_probability
        ])?;
        check_weights( "vessels.spawn_weights", &vc.spawn_weights)?;
        check_positive( "vessels.tick_interval", vc.tick_interval)?;
        if vc.initial_count > vc.max_count { return Err( config_error!("vessels.initial_count exceeds max_count")) }
        check_non_negative( "vessels", &[
            ("spawn_jitter", vc.spawn_jitter), ("draught_step", vc.draught_step), ("arrival_radius", vc.arrival_radius)
        ])?;
        if vc.mmsi_prefix < 200 || vc.mmsi_prefix > 799 { return Err( config_error!("invalid MMSI prefix {}", vc.mmsi_prefix)) }

        check_positive( "cleanup_interval", self.cleanup_interval)?;

        if self.airports.is_empty() { return Err( config_error!("no airports")) }
        if self.ports.is_empty() { return Err( config_error!("no ports")) }
        for loc in self.airports.iter().chain( self.ports.iter()).chain( self.scenario_ports.iter()) {
            if !self.envelope.contains( loc.lat, loc.lon) {
                return Err( config_error!("location {} outside of envelope", loc.code))
            }
        }

        Ok(())
    }
}

/// per-run settings that can be supplied when a simulation is started. Intervals are in milliseconds
#[derive(Deserialize,Serialize,Debug,Clone,Default,PartialEq)]
#[serde(rename_all="camelCase",default)]
pub struct RunOverrides {
    pub flight_interval: Option<u64>,
    pub ship_interval: Option<u64>,
    pub max_flights: Option<usize>,
    pub max_ships: Option<usize>,
}

impl RunOverrides {
    pub fn is_empty (&self)->bool { *self == RunOverrides::default() }

    /// a validated copy of `base` with these overrides applied. The base config itself is never modified
    pub fn apply_to (&self, base: &SimConfig)->Result<SimConfig> {
        let mut config = base.clone();

        if let Some(ms) = self.flight_interval { config.aircraft.tick_interval = millis( ms) }
        if let Some(ms) = self.ship_interval { config.vessels.tick_interval = millis( ms) }
        if let Some(n) = self.max_flights {
            config.aircraft.max_count = n;
            config.aircraft.initial_count = config.aircraft.initial_count.min( n);
        }
        if let Some(n) = self.max_ships {
            config.vessels.max_count = n;
            config.vessels.initial_count = config.vessels.initial_count.min( n);
        }

        config.validate().map_err( |e| invalid_request( e.to_string()))?;
        Ok(config)
    }
}

fn check_range (name: &str, r: &ValueRange)->Result<()> {
    if r.is_valid() { Ok(()) } else { Err( config_error!("invalid range {}: [{},{}]", name, r.min, r.max)) }
}

fn check_probabilities (name: &str, ps: &[f64])->Result<()> {
    if ps.iter().all( |p| (0.0..=1.0).contains(p)) { Ok(()) } else { Err( config_error!("{} probabilities/fractions not in [0,1]", name)) }
}

fn check_non_negative (name: &str, values: &[(&str,f64)])->Result<()> {
    for (field, v) in values {
        if !v.is_finite() || *v < 0.0 { return Err( config_error!("{}.{} has to be a non-negative number: {}", name, field, v)) }
    }
    Ok(())
}

fn check_weights (name: &str, ws: &[f64])->Result<()> {
    if !ws.is_empty() && ws.iter().all( |w| w.is_finite() && *w >= 0.0) && ws.iter().sum::<f64>() > 0.0 {
        Ok(())
    } else {
        Err( config_error!("invalid weights {}", name))
    }
}

fn check_positive (name: &str, d: Duration)->Result<()> {
    if d.is_zero() { Err( config_error!("{} must not be zero", name)) } else { Ok(()) }
}
