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

//! angle normalization and steering helpers. All values are in degrees

/// fold into [-90,90] (latitude semantics: values beyond the pole are mirrored)
#[inline]
pub fn normalize_90 (d: f64) -> f64 {
    let x = normalize_180(d);

    if x < -90.0 { -180.0 - x }
    else if x > 90.0 { 180.0 - x }
    else { x }
}

/// fold into [-180,180] (longitude semantics)
#[inline]
pub fn normalize_180 (d: f64) -> f64 {
    let x = d % 360.0;

    if x < -180.0 { 360.0 + x }
    else if x > 180.0 { x - 360.0 }
    else { x }
}

/// fold into the half open interval [0,360)
#[inline]
pub fn normalize_360 (d: f64) -> f64 {
    if !d.is_finite() { return 0.0 }

    let x = d % 360.0;
    let x = if x < 0.0 { 360.0 + x } else { x };
    if x >= 360.0 { 0.0 } else { x } // tiny negative remainders round up to 360.0
}

/// shortest signed turn from `from` to `to`, in (-180,180]
#[inline]
pub fn angle_diff (from: f64, to: f64) -> f64 {
    let d = normalize_360(to) - normalize_360(from);
    if d > 180.0 { d - 360.0 }
    else if d <= -180.0 { d + 360.0 }
    else { d }
}

/// move `current` toward `target` by `fraction` of the shortest turn. Result is in [0,360)
#[inline]
pub fn converge_angle (current: f64, target: f64, fraction: f64) -> f64 {
    normalize_360( current + angle_diff( current, target) * fraction)
}

/// move a scalar toward `target` by `fraction` of the remaining difference
#[inline]
pub fn converge (current: f64, target: f64, fraction: f64) -> f64 {
    current + (target - current) * fraction
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_360() {
        assert_eq!( normalize_360( 0.0), 0.0);
        assert_eq!( normalize_360( 360.0), 0.0);
        assert_eq!( normalize_360( 725.0), 5.0);
        assert_eq!( normalize_360( -90.0), 270.0);
        assert_eq!( normalize_360( -1e-15), 0.0);
        assert_eq!( normalize_360( f64::NAN), 0.0);
    }

    #[test]
    fn test_normalize_lon_lat() {
        assert_eq!( normalize_180( 190.0), -170.0);
        assert_eq!( normalize_180( -190.0), 170.0);
        assert_eq!( normalize_90( 100.0), 80.0);
        assert_eq!( normalize_90( -100.0), -80.0);
    }

    #[test]
    fn test_angle_diff() {
        assert_eq!( angle_diff( 350.0, 10.0), 20.0);
        assert_eq!( angle_diff( 10.0, 350.0), -20.0);
        assert_eq!( angle_diff( 0.0, 180.0), 180.0);

        let h = converge_angle( 355.0, 5.0, 0.5);
        assert!( (h - 0.0).abs() < 1e-9);
    }
}
