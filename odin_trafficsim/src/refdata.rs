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

//! static catalogs used to give generated entities plausible identities

use rand::{Rng, seq::IndexedRandom};

#[derive(Debug,Clone,Copy)]
pub struct AircraftModel {
    pub type_code: &'static str,
    pub manufacturer: &'static str,
    pub engines: u8,
}

pub const AIRCRAFT_MODELS: &[AircraftModel] = &[
    AircraftModel { type_code: "B737", manufacturer: "Boeing", engines: 2 },
    AircraftModel { type_code: "A320", manufacturer: "Airbus", engines: 2 },
    AircraftModel { type_code: "A321", manufacturer: "Airbus", engines: 2 },
    AircraftModel { type_code: "B777", manufacturer: "Boeing", engines: 2 },
    AircraftModel { type_code: "A350", manufacturer: "Airbus", engines: 2 },
    AircraftModel { type_code: "B787", manufacturer: "Boeing", engines: 2 },
    AircraftModel { type_code: "ATR72", manufacturer: "ATR", engines: 2 },
];

#[derive(Debug,Clone,Copy)]
pub struct Operator {
    pub code: &'static str, // IATA designator, also used as callsign prefix
    pub name: &'static str,
    pub country: &'static str,
    pub registration_prefix: &'static str,
}

pub const OPERATORS: &[Operator] = &[
    Operator { code: "VN", name: "Vietnam Airlines", country: "Vietnam", registration_prefix: "VN-" },
    Operator { code: "VJ", name: "VietJet Air", country: "Vietnam", registration_prefix: "VN-" },
    Operator { code: "QH", name: "Bamboo Airways", country: "Vietnam", registration_prefix: "VN-" },
    Operator { code: "BL", name: "Pacific Airlines", country: "Vietnam", registration_prefix: "VN-" },
    Operator { code: "SQ", name: "Singapore Airlines", country: "Singapore", registration_prefix: "9V-" },
    Operator { code: "TG", name: "Thai Airways", country: "Thailand", registration_prefix: "HS-" },
    Operator { code: "CX", name: "Cathay Pacific", country: "Hong Kong", registration_prefix: "B-" },
    Operator { code: "NH", name: "All Nippon Airways", country: "Japan", registration_prefix: "JA" },
    Operator { code: "KE", name: "Korean Air", country: "South Korea", registration_prefix: "HL" },
    Operator { code: "OZ", name: "Asiana Airlines", country: "South Korea", registration_prefix: "HL" },
];

pub const VESSEL_TYPES: &[&str] = &[ "Container", "Bulk Carrier", "Tanker", "Fishing", "Cargo", "Passenger" ];

/// (flag state, ISO country code)
pub const FLAGS: &[(&str,&str)] = &[
    ("Vietnam", "VN"), ("Singapore", "SG"), ("Panama", "PA"), ("Liberia", "LR"), ("Marshall Islands", "MH"), ("Hong Kong", "HK")
];

pub const SHIP_NAME_PREFIXES: &[&str] = &[ "HAI PHONG", "SAIGON", "DA NANG", "QUY NHON", "VUNG TAU" ];
pub const SHIP_NAME_SUFFIXES: &[&str] = &[ "STAR", "OCEAN", "WIND", "WAVE", "GLORY", "PRIDE" ];

const ALNUM: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// pick from a non-empty static catalog
pub fn pick<'a,T,R: Rng + ?Sized> (rng: &mut R, items: &'a [T])->&'a T {
    match items.choose( rng) {
        Some(item) => item,
        None => &items[0] // catalogs are never empty
    }
}

pub fn random_alnum<R: Rng + ?Sized> (rng: &mut R, len: usize)->String {
    (0..len).map( |_| ALNUM[rng.random_range(0..ALNUM.len())] as char).collect()
}

pub fn random_registration<R: Rng + ?Sized> (rng: &mut R, op: &Operator)->String {
    format!("{}{}", op.registration_prefix, random_alnum( rng, 3))
}

pub fn random_ship_name<R: Rng + ?Sized> (rng: &mut R)->String {
    format!("{} {}", pick( rng, SHIP_NAME_PREFIXES), pick( rng, SHIP_NAME_SUFFIXES))
}

/// four octal digits, avoiding the emergency codes 7500/7600/7700
pub fn random_squawk<R: Rng + ?Sized> (rng: &mut R)->String {
    loop {
        let code: String = (0..4).map( |_| char::from( b'0' + rng.random_range(0..8u8))).collect();
        if !matches!( code.as_str(), "7500" | "7600" | "7700") && code != "0000" { return code }
    }
}
