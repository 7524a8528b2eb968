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
use odin_common::{angle::normalize_360, datetime::EpochMillis, geo::bearing_to};

use crate::aircraft::jittered_position;
use crate::config::{Location, RoutingMode, SimConfig};
use crate::errors::{Result,invalid_request};
use crate::refdata::{self, FLAGS, VESSEL_TYPES};
use crate::store::TrackedEntity;

/// AIS navigational status codes we use
pub const NAV_UNDER_WAY: u8 = 0;
pub const NAV_AT_ANCHOR: u8 = 1;

/// ground truth of a simulated vessel. `course` is the only direction quantity; feed formats
/// that report a heading serialize the course under that name
#[derive(Serialize,Debug,Clone,PartialEq)]
#[serde(rename_all="camelCase")]
pub struct Vessel {
    pub id: u32,  // voyage id
    pub mmsi: u32,
    pub imo: u32,
    pub name: String,
    pub callsign: String,
    pub ship_type: String,
    pub flag: String,
    pub flag_code: String,
    pub length: f64, // m
    pub width: f64,  // m

    pub lat: f64,
    pub lon: f64,
    pub speed: f64,   // kn
    pub course: f64,  // deg true [0,360)
    pub draught: f64, // m
    pub nav_status: u8,
    pub track_age: f64,

    #[serde(skip)] pub destination_port: String,
    #[serde(skip)] pub dest_lat: f64,
    #[serde(skip)] pub dest_lon: f64,
    #[serde(skip)] pub target_course: f64,
    #[serde(skip)] pub target_speed: f64,
    #[serde(skip)] pub last_update: EpochMillis,
}

impl TrackedEntity for Vessel {
    type Key = u32;

    fn id (&self)->u32 { self.id }
    fn unique_key (&self)->u32 { self.mmsi }
    fn position (&self)->(f64,f64) { (self.lat, self.lon) }
    fn last_update (&self)->EpochMillis { self.last_update }
}

impl fmt::Display for Vessel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!( f, "Vessel( id: {}, mmsi: {}, name: \"{}\", pos: {:.4},{:.4}, spd: {:.1}, cog: {:.0}, draught: {:.1})",
            self.id, self.mmsi, self.name, self.lat, self.lon, self.speed, self.course, self.draught)
    }
}

pub fn random_voyage_id<R: Rng + ?Sized> (rng: &mut R)->u32 { rng.random_range( 100_000..1_000_000) }

/// 9 digit MMSI starting with the 3 digit maritime identification digits
pub fn random_mmsi<R: Rng + ?Sized> (rng: &mut R, mid: u32)->u32 { mid * 1_000_000 + rng.random_range( 0..1_000_000) }

pub fn nav_status_for (speed: f64)->u8 {
    if speed < 0.5 { NAV_AT_ANCHOR } else { NAV_UNDER_WAY }
}

fn random_destination_port<'a,R: Rng + ?Sized> (rng: &mut R, ports: &'a [Location], lat: f64, lon: f64)->&'a Location {
    let candidates: Vec<&Location> = ports.iter().filter( |p| (p.lat - lat).abs() > 0.5 || (p.lon - lon).abs() > 0.5).collect();
    if candidates.is_empty() {
        refdata::pick( rng, ports)
    } else {
        candidates[ rng.random_range( 0..candidates.len())]
    }
}

/// assign a new destination port (vessel reached its previous one, or was just created)
pub fn assign_destination<R: Rng + ?Sized> (rng: &mut R, vessel: &mut Vessel, ports: &[Location]) {
    let port = random_destination_port( rng, ports, vessel.lat, vessel.lon);
    vessel.destination_port = port.code.clone();
    vessel.dest_lat = port.lat;
    vessel.dest_lon = port.lon;
}

pub fn new_vessel<R: Rng + ?Sized> (rng: &mut R, config: &SimConfig, origin: &Location, jitter: f64)->Vessel {
    let vcfg = &config.vessels;
    let (flag, flag_code) = *refdata::pick( rng, FLAGS);
    let (lat,lon) = jittered_position( rng, &config.envelope, origin.lat, origin.lon, jitter);
    let speed = vcfg.speed.sample( rng);
    let length = rng.random_range( 50..250) as f64;

    let mut vessel = Vessel {
        id: random_voyage_id( rng),
        mmsi: random_mmsi( rng, vcfg.mmsi_prefix),
        imo: rng.random_range( 9_000_000..9_999_999),
        name: refdata::random_ship_name( rng),
        callsign: format!("3W{}", refdata::random_alnum( rng, 4)),
        ship_type: refdata::pick( rng, VESSEL_TYPES).to_string(),
        flag: flag.to_string(),
        flag_code: flag_code.to_string(),
        length,
        width: (length / 6.5).round(),
        lat, lon,
        speed,
        course: rng.random_range( 0.0..360.0),
        draught: vcfg.initial_draught.sample( rng),
        nav_status: nav_status_for( speed),
        track_age: 0.0,
        destination_port: String::new(),
        dest_lat: lat,
        dest_lon: lon,
        target_course: 0.0,
        target_speed: speed,
        last_update: EpochMillis::now(),
    };

    assign_destination( rng, &mut vessel, &config.ports);
    if config.routing == RoutingMode::Destination {
        vessel.course = bearing_to( lat, lon, vessel.dest_lat, vessel.dest_lon);
    }
    vessel.target_course = vessel.course;
    vessel
}

/// typed partial override for manually injected vessels. MMSI and voyage id are store managed
#[derive(Deserialize,Serialize,Debug,Clone,Default)]
#[serde(rename_all="camelCase",default)]
pub struct VesselOverrides {
    pub name: Option<String>,
    pub callsign: Option<String>,
    pub ship_type: Option<String>,
    pub flag: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub speed: Option<f64>,
    #[serde(alias="heading")]
    pub course: Option<f64>,
    pub draught: Option<f64>,
    pub destination_port: Option<String>,
}

impl VesselOverrides {
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

        for v in [self.speed, self.course, self.draught].iter().flatten() {
            if !v.is_finite() { return Err( invalid_request("non-numeric value")) }
        }

        if let Some(code) = &self.destination_port {
            if config.find_port( code).is_none() { return Err( invalid_request( format!("unknown port {code}"))) }
        }
        Ok(())
    }

    pub fn apply_to (&self, vessel: &mut Vessel, config: &SimConfig) {
        let vcfg = &config.vessels;

        if let Some(name) = &self.name { vessel.name = name.clone() }
        if let Some(cs) = &self.callsign { vessel.callsign = cs.clone() }
        if let Some(t) = &self.ship_type { vessel.ship_type = t.clone() }
        if let Some(flag) = &self.flag {
            vessel.flag = flag.clone();
            if let Some((_,code)) = FLAGS.iter().find( |(name,_)| name.eq_ignore_ascii_case( flag)) {
                vessel.flag_code = code.to_string();
            }
        }
        if let (Some(lat), Some(lon)) = (self.lat, self.lon) {
            vessel.lat = lat;
            vessel.lon = lon;
        }
        if let Some(spd) = self.speed {
            vessel.speed = vcfg.speed.clamp( spd);
            vessel.target_speed = vessel.speed;
            vessel.nav_status = nav_status_for( vessel.speed);
        }
        if let Some(cog) = self.course {
            vessel.course = normalize_360( cog);
            vessel.target_course = vessel.course;
        }
        if let Some(d) = self.draught { vessel.draught = vcfg.draught.clamp( d) }
        if let Some(code) = &self.destination_port {
            if let Some(port) = config.find_port( code) {
                vessel.destination_port = port.code.clone();
                vessel.dest_lat = port.lat;
                vessel.dest_lon = port.lon;
            }
        }
    }
}
