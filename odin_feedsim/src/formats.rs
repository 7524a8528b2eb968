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

//! wire formats of the simulated providers.
//!
//! Position, speed and course come from the (possibly degraded) reading, everything else that is not
//! part of the entity is re-rolled per response and does not have to be consistent between sources

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use rand::Rng;
use serde::Serialize;
use serde_json::{Map, Value, json};
use odin_common::round_to;
use odin_trafficsim::{Aircraft, Vessel, refdata::pick};

use crate::errors::{Result, config_error};
use crate::profile::SourceKind;

/* #region aircraft formats ***************************************************************************************/

/// FlightRadar24 positional record (serialized as JSON array)
#[derive(Serialize,Debug,Clone,PartialEq)]
pub struct Fr24Record (
    pub String, // hex
    pub f64,    // lat
    pub f64,    // lon
    pub i64,    // track
    pub i64,    // altitude (ft)
    pub i64,    // ground speed (kn)
    pub String, // squawk
    pub String, // radar
    pub String, // aircraft type
    pub String, // registration
    pub i64,    // timestamp (epoch secs)
    pub String, // origin
    pub String, // destination
    pub String, // flight
    pub u8,     // on ground
    pub i64,    // vertical rate (ft/min)
    pub String, // callsign
);

const FR24_RADARS: &[&str] = &[ "T-VVTS1", "T-VVNB2", "T-VVDN1", "T-VVCR3", "T-VVPQ1", "F-VVTS7" ];

fn fr24_record<R: Rng + ?Sized> (ac: &Aircraft, precision: i32, now: &DateTime<Utc>, rng: &mut R)->Fr24Record {
    Fr24Record(
        ac.hex.clone(),
        round_to( ac.lat, precision),
        round_to( ac.lon, precision),
        ac.heading.round() as i64,
        ac.altitude.round() as i64,
        ac.speed.round() as i64,
        ac.squawk.clone(),
        pick( rng, FR24_RADARS).to_string(),
        ac.aircraft_type.clone(),
        ac.registration.clone(),
        now.timestamp() - rng.random_range( 0..5),
        ac.origin.clone(),
        ac.destination.clone(),
        ac.callsign.clone(),
        0,
        ac.vertical_speed.round() as i64,
        ac.callsign.clone(),
    )
}

/// `{ "full_count": n, "version": 4, "<hex>": [..], .. }`
pub fn flightradar24<R: Rng + ?Sized> (list: &[Aircraft], now: &DateTime<Utc>, rng: &mut R)->Result<Value> {
    let precision = SourceKind::FlightRadar24.coordinate_precision();
    let mut map = Map::new();
    map.insert( "full_count".to_string(), json!( list.len()));
    map.insert( "version".to_string(), json!(4));

    for ac in list {
        map.insert( ac.hex.clone(), serde_json::to_value( fr24_record( ac, precision, now, rng))?);
    }
    Ok( Value::Object(map) )
}

#[derive(Serialize,Debug,Clone)]
pub struct AdsbxAircraft {
    pub hex: String,
    pub flight: String,
    pub r: String,
    pub t: String,
    pub lat: f64,
    pub lon: f64,
    pub alt_baro: i64,
    pub gs: f64,
    pub track: f64,
    pub baro_rate: i64,
    pub squawk: String,
    pub emergency: String,
    pub category: String,
    pub nav_qnh: f64,
    pub nav_altitude_mcp: i64,
    pub nav_heading: f64,
    pub nic: u8,
    pub rc: u32,
    pub seen_pos: f64,
    pub version: u8,
    pub nac_p: u8,
    pub nac_v: u8,
    pub sil: u8,
    pub sil_type: String,
    pub gva: u8,
    pub sda: u8,
    pub alert: u8,
    pub spi: u8,
}

#[derive(Serialize,Debug,Clone)]
pub struct AdsbxResponse {
    pub ac: Vec<AdsbxAircraft>,
    pub total: usize,
    pub now: f64, // epoch secs
}

fn adsbx_aircraft<R: Rng + ?Sized> (ac: &Aircraft, precision: i32, rng: &mut R)->AdsbxAircraft {
    AdsbxAircraft {
        hex: ac.hex.to_lowercase(),
        flight: format!("{:<8}", ac.callsign), // blank padded like the real feed
        r: ac.registration.clone(),
        t: ac.aircraft_type.clone(),
        lat: round_to( ac.lat, precision),
        lon: round_to( ac.lon, precision),
        alt_baro: ac.altitude.round() as i64,
        gs: round_to( ac.speed, 1),
        track: round_to( ac.heading, 1),
        baro_rate: (ac.vertical_speed / 64.0).round() as i64 * 64,
        squawk: ac.squawk.clone(),
        emergency: "none".to_string(),
        category: if ac.engine_count > 2 { "A5".to_string() } else { "A3".to_string() },
        nav_qnh: round_to( rng.random_range( 1008.0..1018.0), 1),
        nav_altitude_mcp: (ac.target_altitude / 100.0).round() as i64 * 100,
        nav_heading: round_to( ac.heading, 1),
        nic: 8,
        rc: 186,
        seen_pos: round_to( rng.random_range( 0.0..5.0), 1),
        version: 2,
        nac_p: rng.random_range( 8..=11),
        nac_v: rng.random_range( 1..=2),
        sil: 3,
        sil_type: "perhour".to_string(),
        gva: 2,
        sda: 2,
        alert: 0,
        spi: 0,
    }
}

pub fn adsbexchange<R: Rng + ?Sized> (list: &[Aircraft], now: &DateTime<Utc>, rng: &mut R)->Result<Value> {
    let precision = SourceKind::AdsbExchange.coordinate_precision();
    let response = AdsbxResponse {
        ac: list.iter().map( |ac| adsbx_aircraft( ac, precision, rng)).collect(),
        total: list.len(),
        now: now.timestamp_millis() as f64 / 1000.0,
    };
    Ok( serde_json::to_value( response)? )
}

/* #endregion aircraft formats */

/* #region vessel formats *****************************************************************************************/

fn random_eta<R: Rng + ?Sized> (rng: &mut R, now: &DateTime<Utc>, max_days: i64)->DateTime<Utc> {
    *now + ChronoDuration::days( rng.random_range( 1..=max_days)) + ChronoDuration::minutes( rng.random_range( 0..24*60))
}

#[derive(Serialize,Debug,Clone)]
#[serde(rename_all="UPPERCASE")]
pub struct MarineTrafficVessel {
    pub mmsi: u32,
    pub lat: f64,
    pub lon: f64,
    pub speed: f64,
    pub course: f64,
    pub heading: i64,
    pub status: u8,
    pub shipname: String,
    pub shiptype: String,
    pub imo: u32,
    pub callsign: String,
    pub flag: String,
    pub length: f64,
    pub width: f64,
    pub draught: f64,
    pub destination: String,
    pub eta: String,
    pub timestamp: String,
}

pub fn marinetraffic<R: Rng + ?Sized> (list: &[Vessel], now: &DateTime<Utc>, rng: &mut R)->Result<Value> {
    let precision = SourceKind::MarineTraffic.coordinate_precision();
    let data: Vec<MarineTrafficVessel> = list.iter().map( |v| MarineTrafficVessel {
        mmsi: v.mmsi,
        lat: round_to( v.lat, precision),
        lon: round_to( v.lon, precision),
        speed: round_to( v.speed, 1),
        course: round_to( v.course, 1),
        heading: v.course.round() as i64 % 360,
        status: v.nav_status,
        shipname: v.name.clone(),
        shiptype: v.ship_type.clone(),
        imo: v.imo,
        callsign: v.callsign.clone(),
        flag: v.flag_code.clone(),
        length: v.length,
        width: v.width,
        draught: round_to( v.draught, 1),
        destination: v.destination_port.clone(),
        eta: random_eta( rng, now, 5).format("%m-%d %H:%M").to_string(),
        timestamp: now.format("%Y-%m-%d %H:%M:%S").to_string(),
    }).collect();

    Ok( json!({
        "data": data,
        "meta": { "total": list.len(), "last_update": now.format("%Y-%m-%d %H:%M:%S").to_string() }
    }))
}

#[derive(Serialize,Debug,Clone)]
pub struct VesselFinderVessel {
    pub mmsi: u32,
    pub lat: f64,
    pub lng: f64,
    pub sog: f64,
    pub cog: f64,
    pub rot: f64,
    pub heading: i64,
    pub navstat: u8,
    pub imo: u32,
    pub name: String,
    pub callsign: String,
    #[serde(rename="type")] pub ship_type: String,
    pub a: u32, // antenna to bow
    pub b: u32, // antenna to stern
    pub c: u32, // antenna to port
    pub d: u32, // antenna to starboard
    pub draught: f64,
    pub dest: String,
    pub eta: i64, // epoch secs
    pub country: String,
}

pub fn vesselfinder<R: Rng + ?Sized> (list: &[Vessel], now: &DateTime<Utc>, rng: &mut R)->Result<Value> {
    let precision = SourceKind::VesselFinder.coordinate_precision();
    let vessels: Vec<VesselFinderVessel> = list.iter().map( |v| {
        let a = (v.length * rng.random_range( 0.6..0.9)).round() as u32;
        let c = (v.width / 2.0).round() as u32;
        VesselFinderVessel {
            mmsi: v.mmsi,
            lat: round_to( v.lat, precision),
            lng: round_to( v.lon, precision),
            sog: round_to( v.speed, 1),
            cog: round_to( v.course, 1),
            rot: round_to( rng.random_range( -5.0..5.0), 1),
            heading: v.course.round() as i64 % 360,
            navstat: v.nav_status,
            imo: v.imo,
            name: v.name.clone(),
            callsign: v.callsign.clone(),
            ship_type: v.ship_type.clone(),
            a,
            b: (v.length.round() as u32).saturating_sub( a),
            c,
            d: (v.width.round() as u32).saturating_sub( c),
            draught: round_to( v.draught, 1),
            dest: v.destination_port.clone(),
            eta: random_eta( rng, now, 5).timestamp(),
            country: v.flag.clone(),
        }
    }).collect();

    Ok( json!({ "vessels": vessels }) )
}

#[derive(Serialize,Debug,Clone)]
#[serde(rename_all="camelCase")]
pub struct ChinaportsVessel {
    pub mmsi: u32,
    pub latitude: f64,
    pub longitude: f64,
    pub speed: f64,
    pub course: f64,
    pub heading: i64,
    pub nav_status: u8,
    pub vessel_name: String,
    pub vessel_type: String,
    pub imo: u32,
    pub callsign: String,
    pub flag: String,
    pub length: f64,
    pub width: f64,
    pub draft: f64,
    pub destination: String,
    pub eta: String,
}

pub fn chinaports<R: Rng + ?Sized> (list: &[Vessel], now: &DateTime<Utc>, rng: &mut R)->Result<Value> {
    let precision = SourceKind::Chinaports.coordinate_precision();
    let data: Vec<ChinaportsVessel> = list.iter().map( |v| ChinaportsVessel {
        mmsi: v.mmsi,
        latitude: round_to( v.lat, precision),
        longitude: round_to( v.lon, precision),
        speed: round_to( v.speed, 1),
        course: round_to( v.course, 1),
        heading: v.course.round() as i64 % 360,
        nav_status: v.nav_status,
        vessel_name: v.name.clone(),
        vessel_type: v.ship_type.clone(),
        imo: v.imo,
        callsign: v.callsign.clone(),
        flag: v.flag_code.clone(),
        length: v.length,
        width: v.width,
        draft: round_to( v.draught, 1),
        destination: v.destination_port.clone(),
        eta: random_eta( rng, now, 3).format("%Y-%m-%d %H:%M:%S").to_string(),
    }).collect();

    Ok( json!({ "data": data }) )
}

#[derive(Serialize,Debug,Clone)]
#[serde(rename_all="camelCase")]
pub struct MarineTrafficV2Vessel {
    pub mmsi: u32,
    pub lat: f64,
    pub lon: f64,
    pub speed: f64,
    pub course: f64,
    pub heading: i64,
    pub nav_status: u8,
    pub ship_name: String,
    pub ship_type: String,
    pub imo: u32,
    pub call_sign: String,
    pub flag: String,
    pub length: f64,
    pub width: f64,
    pub draught: f64,
    pub destination: String,
    pub eta: String,
    pub last_update: String,
}

pub fn marinetraffic_v2<R: Rng + ?Sized> (list: &[Vessel], now: &DateTime<Utc>, rng: &mut R)->Result<Value> {
    let precision = SourceKind::MarineTrafficV2.coordinate_precision();
    let data: Vec<MarineTrafficV2Vessel> = list.iter().map( |v| MarineTrafficV2Vessel {
        mmsi: v.mmsi,
        lat: round_to( v.lat, precision),
        lon: round_to( v.lon, precision),
        speed: round_to( v.speed, 2),
        course: round_to( v.course, 1),
        heading: v.course.round() as i64 % 360,
        nav_status: v.nav_status,
        ship_name: v.name.clone(),
        ship_type: v.ship_type.clone(),
        imo: v.imo,
        call_sign: v.callsign.clone(),
        flag: v.flag_code.clone(),
        length: v.length,
        width: v.width,
        draught: round_to( v.draught, 1),
        destination: v.destination_port.clone(),
        eta: random_eta( rng, now, 4).format("%Y-%m-%d %H:%M").to_string(),
        last_update: now.format("%Y-%m-%d %H:%M:%S").to_string(),
    }).collect();

    Ok( json!({
        "data": data,
        "meta": { "total": list.len(), "source": "marinetrafficv2", "timestamp": now.timestamp() }
    }))
}

/* #endregion vessel formats */

pub fn render_aircraft<R: Rng + ?Sized> (kind: SourceKind, list: &[Aircraft], now: &DateTime<Utc>, rng: &mut R)->Result<Value> {
    match kind {
        SourceKind::FlightRadar24 => flightradar24( list, now, rng),
        SourceKind::AdsbExchange => adsbexchange( list, now, rng),
        _ => Err( config_error( format!("{kind} is not an aircraft source")))
    }
}

pub fn render_vessels<R: Rng + ?Sized> (kind: SourceKind, list: &[Vessel], now: &DateTime<Utc>, rng: &mut R)->Result<Value> {
    match kind {
        SourceKind::MarineTraffic => marinetraffic( list, now, rng),
        SourceKind::VesselFinder => vesselfinder( list, now, rng),
        SourceKind::Chinaports => chinaports( list, now, rng),
        SourceKind::MarineTrafficV2 => marinetraffic_v2( list, now, rng),
        _ => Err( config_error( format!("{kind} is not a vessel source")))
    }
}
