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

//! great circle kinematics on a spherical earth.
//! All functions are pure and take/return decimal degrees

use std::fmt;
use serde::{Serialize,Deserialize};
use uom::si::{f64::Length, length::meter};

use crate::angle::{normalize_180, normalize_360};
use crate::geo_constants::{MEAN_EARTH_RADIUS, KNOTS_TO_MPS};

/// a rectangular lat/lon region. Boundaries are inclusive
#[derive(Debug,Copy,Clone,Serialize,Deserialize,PartialEq)]
pub struct BoundingBox {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64
}

impl BoundingBox {
    pub fn new (west: f64, south: f64, east: f64, north: f64)->Self {
        BoundingBox{ west, south, east, north }
    }

    pub fn from_min_max (min_lat: f64, max_lat: f64, min_lon: f64, max_lon: f64)->Self {
        BoundingBox{ west: min_lon, south: min_lat, east: max_lon, north: max_lat }
    }

    /// finite values, non-inverted, within [-90,90] x [-180,180]
    pub fn is_valid (&self)->bool {
        let values = [self.west, self.south, self.east, self.north];
        values.iter().all( |v| v.is_finite())
            && self.south <= self.north && self.west <= self.east
            && self.south >= -90.0 && self.north <= 90.0
            && self.west >= -180.0 && self.east <= 180.0
    }

    #[inline]
    pub fn contains (&self, lat: f64, lon: f64)->bool {
        lat >= self.south && lat <= self.north && lon >= self.west && lon <= self.east
    }

    /// (lat,lon) of the box center
    pub fn center (&self)->(f64,f64) {
        ( (self.south + self.north) / 2.0, (self.west + self.east) / 2.0 )
    }

    /// clamp a position into the box
    pub fn clamp (&self, lat: f64, lon: f64)->(f64,f64) {
        ( lat.clamp( self.south, self.north), lon.clamp( self.west, self.east) )
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!( f, "[w:{}, s:{}, e:{}, n:{}]", self.west, self.south, self.east, self.north)
    }
}

/// inclusive rectangular containment test
#[inline]
pub fn in_bounds (lat: f64, lon: f64, envelope: &BoundingBox)->bool {
    envelope.contains( lat, lon)
}

/// advance a position along the great circle starting at `heading_deg` for `dt_secs` at `speed_kn`.
/// Returns (lat,lon) with lon normalized to [-180,180]
pub fn advance (lat: f64, lon: f64, speed_kn: f64, heading_deg: f64, dt_secs: f64)->(f64,f64) {
    let dist = speed_kn * KNOTS_TO_MPS * dt_secs;
    if dist == 0.0 || !dist.is_finite() { return (lat,lon) }

    let delta = dist / MEAN_EARTH_RADIUS; // angular distance
    let theta = heading_deg.to_radians();
    let phi1 = lat.to_radians();
    let lambda1 = lon.to_radians();

    let (sin_phi1, cos_phi1) = phi1.sin_cos();
    let (sin_delta, cos_delta) = delta.sin_cos();

    let sin_phi2 = (sin_phi1 * cos_delta + cos_phi1 * sin_delta * theta.cos()).clamp( -1.0, 1.0);
    let phi2 = sin_phi2.asin();

    let y = theta.sin() * sin_delta * cos_phi1;
    let x = cos_delta - sin_phi1 * sin_phi2;
    let lambda2 = if y == 0.0 && x == 0.0 { lambda1 } else { lambda1 + y.atan2(x) }; // degenerate at the poles

    let lat2 = phi2.to_degrees().clamp( -90.0, 90.0);
    let lon2 = normalize_180( lambda2.to_degrees());
    (lat2, lon2)
}

/// initial great circle bearing from the first to the second position, in [0,360)
pub fn bearing_to (from_lat: f64, from_lon: f64, to_lat: f64, to_lon: f64)->f64 {
    let phi1 = from_lat.to_radians();
    let phi2 = to_lat.to_radians();
    let dlambda = (to_lon - from_lon).to_radians();

    let y = dlambda.sin() * phi2.cos();
    let x = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * dlambda.cos();

    if y == 0.0 && x == 0.0 { return 0.0 } // coincident points
    normalize_360( y.atan2(x).to_degrees())
}

/// central angle between two positions in radians (haversine)
fn central_angle (lat1: f64, lon1: f64, lat2: f64, lon2: f64)->f64 {
    let dphi = (lat2 - lat1).to_radians();
    let dlambda = (lon2 - lon1).to_radians();

    let a = (dphi / 2.0).sin().powi(2) + lat1.to_radians().cos() * lat2.to_radians().cos() * (dlambda / 2.0).sin().powi(2);
    2.0 * a.sqrt().min(1.0).asin()
}

pub fn haversine_distance (lat1: f64, lon1: f64, lat2: f64, lon2: f64)->Length {
    Length::new::<meter>( central_angle( lat1, lon1, lat2, lon2) * MEAN_EARTH_RADIUS)
}

/// great circle distance expressed as degrees of arc
pub fn angular_distance (lat1: f64, lon1: f64, lat2: f64, lon2: f64)->f64 {
    central_angle( lat1, lon1, lat2, lon2).to_degrees()
}
