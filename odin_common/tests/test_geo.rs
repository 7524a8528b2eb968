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

use rand::{Rng, SeedableRng, rngs::StdRng};
use geo::{Distance, Haversine, Point};
use uom::si::length::meter;
use odin_common::geo::*;
use odin_common::geo_constants::KNOTS_TO_MPS;

// run with "cargo test test_advance_distance -- --nocapture"

#[test]
fn test_advance_distance() {
    let mut rng = StdRng::seed_from_u64( 42);

    for _ in 0..10_000 {
        let lat = rng.random_range( -80.0..80.0);
        let lon = rng.random_range( -180.0..180.0);
        let spd = rng.random_range( 0.0..900.0);
        let hdg = rng.random_range( 0.0..360.0);
        let dt = rng.random_range( 0.1..120.0);

        let (lat1,lon1) = advance( lat, lon, spd, hdg, dt);
        let expected = spd * KNOTS_TO_MPS * dt;
        let actual = haversine_distance( lat, lon, lat1, lon1).get::<meter>();

        assert!( (actual - expected).abs() <= 1e-6 * expected.max(1.0), "{actual} != {expected}");
        assert!( lat1.is_finite() && lon1.is_finite());
        assert!( lon1 >= -180.0 && lon1 <= 180.0);
    }
}

#[test]
fn test_distance_against_geo() {
    // geo uses a slightly different mean radius (6371008.8m) so we only check relative agreement
    let (lat,lon) = (21.2214, 105.8077);
    let (lat1,lon1) = advance( lat, lon, 450.0, 200.0, 600.0);

    let d = haversine_distance( lat, lon, lat1, lon1).get::<meter>();
    let d_geo = Haversine.distance( Point::new(lon,lat), Point::new(lon1,lat1));
    println!("distance: {d:.1}m, geo: {d_geo:.1}m");
    assert!( ((d - d_geo) / d_geo).abs() < 1e-5);
}

#[test]
fn test_advance_scenario() {
    let (lat,lon) = (10.8231, 106.6297);
    let (lat1,lon1) = advance( lat, lon, 480.0, 45.0, 60.0);

    let d = haversine_distance( lat, lon, lat1, lon1).get::<meter>();
    println!("moved to {lat1:.5},{lon1:.5} by {d:.1}m");

    assert!( lat1 > lat && lon1 > lon); // north-east
    assert!( (d - 14_816.0).abs() < 148.16);

    let bearing = bearing_to( lat, lon, lat1, lon1);
    assert!( (bearing - 45.0).abs() < 0.1);
}

#[test]
fn test_bearing_to() {
    assert!( (bearing_to( 0.0, 0.0, 1.0, 0.0) - 0.0).abs() < 1e-9);
    assert!( (bearing_to( 0.0, 0.0, 0.0, 1.0) - 90.0).abs() < 1e-9);
    assert!( (bearing_to( 0.0, 0.0, -1.0, 0.0) - 180.0).abs() < 1e-9);
    assert!( (bearing_to( 0.0, 0.0, 0.0, -1.0) - 270.0).abs() < 1e-9);
    assert_eq!( bearing_to( 10.0, 100.0, 10.0, 100.0), 0.0);

    // SGN -> HAN is roughly north
    let b = bearing_to( 10.8187, 106.6524, 21.2214, 105.8077);
    assert!( b > 350.0 || b < 10.0, "bearing {b}");
}

#[test]
fn test_poles_and_antimeridian() {
    let (lat,lon) = advance( 89.999, 0.0, 500.0, 0.0, 3600.0);
    assert!( lat.is_finite() && lon.is_finite() && lat <= 90.0);

    let (lat,lon) = advance( 90.0, 0.0, 500.0, 123.0, 60.0);
    assert!( lat.is_finite() && lon.is_finite());

    let (lat,lon) = advance( 0.0, 179.99, 500.0, 90.0, 600.0);
    assert!( lon < 0.0 && lon > -180.0, "crossed antimeridian: {lon}");

    let (lat,lon) = advance( -10.0, -179.99, 500.0, 270.0, 600.0);
    assert!( lon > 0.0 && lon <= 180.0);

    let b = bearing_to( 90.0, 0.0, 10.0, 10.0);
    assert!( b.is_finite() && b >= 0.0 && b < 360.0);
}

#[test]
fn test_in_bounds() {
    let env = BoundingBox::new( 102.0, 8.5, 109.5, 23.5);
    assert!( env.is_valid());

    assert!( in_bounds( 8.5, 102.0, &env)); // inclusive corners
    assert!( in_bounds( 23.5, 109.5, &env));
    assert!( in_bounds( 16.0, 106.0, &env));
    assert!( !in_bounds( 8.4999, 105.0, &env));
    assert!( !in_bounds( 16.0, 109.5001, &env));

    let inverted = BoundingBox::new( 109.5, 8.5, 102.0, 23.5);
    assert!( !inverted.is_valid());

    assert_eq!( env.center(), (16.0, 105.75));
    assert_eq!( env.clamp( 30.0, 100.0), (23.5, 102.0));
}
