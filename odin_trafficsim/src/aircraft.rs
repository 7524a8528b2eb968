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

use std::fmt;
use serde::{Serialize,Deserialize};
use rand::Rng;
use strum::Display;
use odin_common::{angle::normalize_360, datetime::EpochMillis, geo::bearing_to};

use crate::config::{Location, RoutingMode, SimConfig};
use crate::errors::{Result,invalid_request};
use crate::refdata::{self, AIRCRAFT_MODELS, OPERATORS};
use crate::store::TrackedEntity;

#[derive(Serialize,Deserialize,Debug,Clone,Copy,PartialEq,Eq,Display)]
#[serde(rename_all="lowercase")]
pub enum FlightPhase { Climb, Cruise, Descend }

/// the ground truth state of a simulated flight.
/// Everything that is serialized is part of the published record
#[derive(Serialize,Debug,Clone,PartialEq)]
#[serde(rename_all="camelCase")]
pub struct Aircraft {
    pub id: u32,
    pub hex: String,
    pub callsign: String,
    pub registration: String,
    pub aircraft_type: String,
    pub manufacturer: String,
    pub engine_count: u8,
    pub operator_name: String,
    pub operator_code: String,
    pub operator_country: String,
    pub origin: String,
    pub destination: String,

    pub lat: f64,
    pub lon: f64,
    pub altitude: f64,        // ft
    pub target_altitude: f64,
    pub heading: f64,         // deg true [0,360)
    pub target_heading: f64,
    pub speed: f64,           // kn
    pub target_speed: f64,
    pub vertical_speed: f64,  // ft/min
    pub squawk: String,
    pub phase: FlightPhase,
    pub track_age: f64,       // secs since creation

    #[serde(skip)] pub cruise_altitude: f64,
    #[serde(skip)] pub dest_lat: f64,
    #[serde(skip)] pub dest_lon: f64,
    #[serde(skip)] pub last_update: EpochMillis,
}

impl TrackedEntity for Aircraft {
    type Key = String;

    fn id (&self)->u32 { self.id }
    fn unique_key (&self)->String { self.hex.clone() }
    fn position (&self)->(f64,f64) { (self.lat, self.lon) }
    fn last_update (&self)->EpochMillis { self.last_update }
}

impl fmt::Display for Aircraft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!( f, "Aircraft( id: {}, hex: {}, cs: \"{}\", pos: {:.4},{:.4}, alt: {:.0}, hdg: {:.0}, spd: {:.0}, {}->{}, {})",
            self.id, self.hex, self.callsign, self.lat, self.lon, self.altitude, self.heading, self.speed,
            self.origin, self.destination, self.phase)
    }
}

pub fn random_aircraft_id<R: Rng + ?Sized> (rng: &mut R)->u32 { rng.random_range( 10_000..100_000) }

pub fn random_hex<R: Rng + ?Sized> (rng: &mut R)->String { format!("{:06X}", rng.random_range( 0..0x1000000u32)) }

/// pick a destination airport that differs from `origin` (if there is more than one)
pub fn random_destination<'a,R: Rng + ?Sized> (rng: &mut R, airports: &'a [Location], origin: &str)->&'a Location {
    let candidates: Vec<&Location> = airports.iter().filter( |a| a.code != origin).collect();
    if candidates.is_empty() {
        refdata::pick( rng, airports)
    } else {
        candidates[ rng.random_range( 0..candidates.len())]
    }
}

/// create a valid random aircraft near `origin`. Identifiers are freshly drawn so that this can be
/// used as a store factory
pub fn new_aircraft<R: Rng + ?Sized> (rng: &mut R, config: &SimConfig, origin: &Location, jitter: f64)->Aircraft {
    let acfg = &config.aircraft;
    let model = refdata::pick( rng, AIRCRAFT_MODELS);
    let op = refdata::pick( rng, OPERATORS);
    let dest = random_destination( rng, &config.airports, &origin.code);

    let (lat,lon) = jittered_position( rng, &config.envelope, origin.lat, origin.lon, jitter);

    let cruise_altitude = acfg.altitude.clamp( acfg.cruise_altitude.sample( rng));
    let speed = acfg.speed.sample( rng);

    let (altitude, heading, phase) = match config.routing {
        RoutingMode::Wander => {
            (acfg.altitude.sample( rng), rng.random_range( 0.0..360.0), FlightPhase::Cruise)
        }
        RoutingMode::Destination => {
            let alt = acfg.altitude.clamp( acfg.altitude.min + rng.random_range( 0.0..=2000.0));
            (alt, bearing_to( lat, lon, dest.lat, dest.lon), FlightPhase::Climb)
        }
    };
    let target_altitude = if config.routing == RoutingMode::Destination { cruise_altitude } else { altitude };

    Aircraft {
        id: random_aircraft_id( rng),
        hex: random_hex( rng),
        callsign: format!("{}{}", op.code, rng.random_range( 100..10_000)),
        registration: refdata::random_registration( rng, op),
        aircraft_type: model.type_code.to_string(),
        manufacturer: model.manufacturer.to_string(),
        engine_count: model.engines,
        operator_name: op.name.to_string(),
        operator_code: op.code.to_string(),
        operator_country: op.country.to_string(),
        origin: origin.code.clone(),
        destination: dest.code.clone(),
        lat, lon,
        altitude,
        target_altitude,
        heading,
        target_heading: heading,
        speed,
        target_speed: speed,
        vertical_speed: 0.0,
        squawk: refdata::random_squawk( rng),
        phase,
        track_age: 0.0,
        cruise_altitude,
        dest_lat: dest.lat,
        dest_lon: dest.lon,
        last_update: EpochMillis::now(),
    }
}

/// a position within +-jitter degrees of the given one, clamped into the envelope
pub fn jittered_position<R: Rng + ?Sized> (rng: &mut R, envelope: &odin_common::BoundingBox, lat: f64, lon: f64, jitter: f64)->(f64,f64) {
    let (dlat,dlon) = if jitter > 0.0 {
        (rng.random_range( -jitter..=jitter), rng.random_range( -jitter..=jitter))
    } else {
        (0.0, 0.0)
    };
    envelope.clamp( lat + dlat, lon + dlon)
}

/// typed partial override for manually injected flights. Identifiers (id, hex) are always
/// generated by the store
#[derive(Deserialize,Serialize,Debug,Clone,Default)]
#[serde(rename_all="camelCase",default)]
pub struct AircraftOverrides {
    pub callsign: Option<String>,
    pub registration: Option<String>,
    pub aircraft_type: Option<String>,
    pub operator_code: Option<String>,
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub altitude: Option<f64>,
    pub heading: Option<f64>,
    pub speed: Option<f64>,
    pub vertical_speed: Option<f64>,
    pub squawk: Option<String>,
}

impl AircraftOverrides {
    /// reject what cannot be clamped into a valid state
    pub fn check (&self, config: &SimConfig)->Result<()> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => {
                if !config.envelope.contains( lat, lon) {
                    return Err( invalid_request( format!("position {lat},{lon} outside of envelope")))
                }
            }
            (None, None) => {}
            _ => return Err( invalid_request("lat and lon have to be set together"))
        }

        for v in [self.altitude, self.heading, self.speed, self.vertical_speed].iter().flatten() {
            if !v.is_finite() { return Err( invalid_request("non-numeric value")) }
        }

        if let Some(code) = &self.origin {
            if config.find_airport( code).is_none() { return Err( invalid_request( format!("unknown origin airport {code}"))) }
        }
        if let Some(code) = &self.destination {
            if config.find_airport( code).is_none() { return Err( invalid_request( format!("unknown destination airport {code}"))) }
        }
        Ok(())
    }

    /// apply to a default aircraft and re-establish its invariants
    pub fn apply_to (&self, ac: &mut Aircraft, config: &SimConfig) {
        let acfg = &config.aircraft;

        if let Some(cs) = &self.callsign { ac.callsign = cs.clone() }
        if let Some(reg) = &self.registration { ac.registration = reg.clone() }
        if let Some(t) = &self.aircraft_type { ac.aircraft_type = t.clone() }
        if let Some(code) = &self.operator_code {
            if let Some(op) = OPERATORS.iter().find( |op| op.code == code.as_str()) {
                ac.operator_name = op.name.to_string();
                ac.operator_country = op.country.to_string();
            }
            ac.operator_code = code.clone();
        }
        if let Some(apt) = self.origin.as_ref().and_then( |code| config.find_airport( code)) { ac.origin = apt.code.clone() }
        if let Some(dest) = &self.destination {
            if let Some(apt) = config.find_airport( dest) {
                ac.destination = apt.code.clone();
                ac.dest_lat = apt.lat;
                ac.dest_lon = apt.lon;
            }
        }
        if let (Some(lat), Some(lon)) = (self.lat, self.lon) {
            ac.lat = lat;
            ac.lon = lon;
        }
        if let Some(alt) = self.altitude {
            ac.altitude = acfg.altitude.clamp( alt);
            ac.target_altitude = ac.altitude;
        }
        if let Some(hdg) = self.heading {
            ac.heading = normalize_360( hdg);
            ac.target_heading = ac.heading;
        }
        if let Some(spd) = self.speed {
            ac.speed = acfg.speed.clamp( spd);
            ac.target_speed = ac.speed;
        }
        if let Some(vs) = self.vertical_speed { ac.vertical_speed = acfg.vertical_speed.clamp( vs) }
        if let Some(sq) = &self.squawk { ac.squawk = sq.clone() }
    }
}
