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

use chrono::Utc;
use rand::{SeedableRng, rngs::StdRng};
use serde_json::Value;
use odin_common::round_to;
use odin_trafficsim::{Aircraft, SimConfig, Vessel, aircraft::new_aircraft, vessel::new_vessel};
use odin_feedsim::{SourceKind, formats::*};

// run with "cargo test test_flightradar24 -- --nocapture"

fn sample_aircraft (n: usize)->Vec<Aircraft> {
    let config = SimConfig::default();
    let mut rng = StdRng::seed_from_u64( 11);
    (0..n).map( |i| new_aircraft( &mut rng, &config, &config.airports[i % config.airports.len()], 0.2)).collect()
}

fn sample_vessels (n: usize)->Vec<Vessel> {
    let config = SimConfig::default();
    let mut rng = StdRng::seed_from_u64( 13);
    (0..n).map( |i| new_vessel( &mut rng, &config, &config.ports[i % config.ports.len()], 0.2)).collect()
}

fn precision_ok (v: &Value, precision: i32)->bool {
    let x = v.as_f64().unwrap();
    x == round_to( x, precision)
}

#[test]
fn test_flightradar24() {
    let list = sample_aircraft( 5);
    let mut rng = StdRng::seed_from_u64( 1);
    let now = Utc::now();
    let payload = flightradar24( &list, &now, &mut rng).unwrap();
    println!("{}", serde_json::to_string_pretty( &payload).unwrap());

    let map = payload.as_object().unwrap();
    assert_eq!( map.len(), 7);
    assert_eq!( payload["full_count"], 5);
    assert_eq!( payload["version"], 4);

    for ac in &list {
        let rec = payload[&ac.hex].as_array().unwrap();
        assert_eq!( rec.len(), 17);
        assert_eq!( rec[0], ac.hex.as_str());
        assert_eq!( rec[1].as_f64().unwrap(), round_to( ac.lat, 4));
        assert_eq!( rec[2].as_f64().unwrap(), round_to( ac.lon, 4));
        assert_eq!( rec[4].as_i64().unwrap(), ac.altitude.round() as i64);
        assert_eq!( rec[13], ac.callsign.as_str());
        assert!( rec[10].as_i64().unwrap() <= now.timestamp());
    }

    let empty = flightradar24( &[], &now, &mut rng).unwrap();
    assert_eq!( empty.as_object().unwrap().len(), 2);
    assert_eq!( empty["full_count"], 0);
}

#[test]
fn test_adsbexchange() {
    let list = sample_aircraft( 3);
    let mut rng = StdRng::seed_from_u64( 1);
    let payload = adsbexchange( &list, &Utc::now(), &mut rng).unwrap();

    assert_eq!( payload["total"], 3);
    assert!( payload["now"].as_f64().unwrap() > 1.0e9);
    let ac = payload["ac"].as_array().unwrap();
    assert_eq!( ac.len(), 3);

    for (rec, truth) in ac.iter().zip( list.iter()) {
        assert_eq!( rec["hex"], truth.hex.to_lowercase().as_str());
        assert_eq!( rec["flight"].as_str().unwrap().trim_end(), truth.callsign);
        assert!( rec["flight"].as_str().unwrap().len() >= 8);
        assert!( precision_ok( &rec["lat"], 6) && precision_ok( &rec["lon"], 6));
        assert_eq!( rec["baro_rate"].as_i64().unwrap() % 64, 0);
        for key in ["alt_baro", "gs", "track", "squawk", "category", "nav_qnh", "nac_p", "seen_pos"] {
            assert!( rec.get( key).is_some(), "missing {key}");
        }
    }
}

#[test]
fn test_vessel_formats() {
    let list = sample_vessels( 4);
    let mut rng = StdRng::seed_from_u64( 1);
    let now = Utc::now();

    let mt = marinetraffic( &list, &now, &mut rng).unwrap();
    assert_eq!( mt["meta"]["total"], 4);
    let rec = &mt["data"][0];
    for key in ["MMSI", "LAT", "LON", "SPEED", "COURSE", "HEADING", "SHIPNAME", "DRAUGHT", "ETA", "TIMESTAMP"] {
        assert!( rec.get( key).is_some(), "missing {key}");
    }
    assert_eq!( rec["MMSI"].as_u64().unwrap() as u32, list[0].mmsi);
    assert_eq!( rec["HEADING"].as_i64().unwrap(), list[0].course.round() as i64 % 360);
    assert!( precision_ok( &rec["LAT"], 5));

    let vf = vesselfinder( &list, &now, &mut rng).unwrap();
    let vessels = vf["vessels"].as_array().unwrap();
    assert_eq!( vessels.len(), 4);
    for (rec, truth) in vessels.iter().zip( list.iter()) {
        assert_eq!( rec["lng"].as_f64().unwrap(), round_to( truth.lon, 5));
        assert_eq!( rec["type"], truth.ship_type.as_str());
        let len = rec["a"].as_u64().unwrap() + rec["b"].as_u64().unwrap();
        assert_eq!( len, truth.length.round() as u64);
        assert!( rec["eta"].as_i64().unwrap() > now.timestamp());
    }

    let cp = chinaports( &list, &now, &mut rng).unwrap();
    let rec = &cp["data"][1];
    assert_eq!( rec["latitude"].as_f64().unwrap(), round_to( list[1].lat, 4));
    assert_eq!( rec["draft"].as_f64().unwrap(), round_to( list[1].draught, 1));
    assert_eq!( rec["vesselName"], list[1].name.as_str());
    assert!( rec.get( "navStatus").is_some());

    let v2 = marinetraffic_v2( &list, &now, &mut rng).unwrap();
    assert_eq!( v2["meta"]["source"], "marinetrafficv2");
    assert_eq!( v2["meta"]["total"], 4);
    let rec = &v2["data"][2];
    assert!( rec.get( "lastUpdate").is_some() && rec.get( "callSign").is_some() && rec.get( "shipName").is_some());
    assert!( precision_ok( &rec["lat"], 6));
}

#[test]
fn test_render_dispatch() {
    let aircraft = sample_aircraft( 2);
    let vessels = sample_vessels( 2);
    let mut rng = StdRng::seed_from_u64( 1);
    let now = Utc::now();

    assert!( render_aircraft( SourceKind::FlightRadar24, &aircraft, &now, &mut rng).is_ok());
    assert!( render_aircraft( SourceKind::MarineTraffic, &aircraft, &now, &mut rng).is_err());
    assert!( render_vessels( SourceKind::Chinaports, &vessels, &now, &mut rng).is_ok());
    assert!( render_vessels( SourceKind::AdsbExchange, &vessels, &now, &mut rng).is_err());
}
