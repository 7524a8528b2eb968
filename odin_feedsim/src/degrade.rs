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

//! per reading quality degradation. This only ever works on copies of ground truth

use rand::Rng;
use odin_common::angle::{normalize_180, normalize_360};
use odin_trafficsim::{Aircraft, Vessel};

use crate::profile::{NoiseScale, SourceProfile};

#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub enum Outcome { Dropped, Clean, Degraded }

/// what a source can get wrong about an entity
pub trait Degradable {
    fn position_mut (&mut self)->(&mut f64, &mut f64);
    fn speed_mut (&mut self)->&mut f64;
    fn course_mut (&mut self)->&mut f64;
}

impl Degradable for Aircraft {
    fn position_mut (&mut self)->(&mut f64, &mut f64) { (&mut self.lat, &mut self.lon) }
    fn speed_mut (&mut self)->&mut f64 { &mut self.speed }
    fn course_mut (&mut self)->&mut f64 { &mut self.heading }
}

impl Degradable for Vessel {
    fn position_mut (&mut self)->(&mut f64, &mut f64) { (&mut self.lat, &mut self.lon) }
    fn speed_mut (&mut self)->&mut f64 { &mut self.speed }
    fn course_mut (&mut self)->&mut f64 { &mut self.course }
}

fn jitter<R: Rng + ?Sized> (rng: &mut R, amplitude: f64)->f64 {
    if amplitude > 0.0 { rng.random_range( -amplitude..=amplitude) } else { 0.0 }
}

/// uniform jitter with amplitudes `factor * noise`. Course stays normalized, speed non-negative
pub fn apply_noise<E: Degradable, R: Rng + ?Sized> (e: &mut E, noise: &NoiseScale, factor: f64, rng: &mut R) {
    let (lat, lon) = e.position_mut();
    *lat = (*lat + jitter( rng, factor * noise.position)).clamp( -90.0, 90.0);
    *lon = normalize_180( *lon + jitter( rng, factor * noise.position));

    let spd = e.speed_mut();
    *spd = (*spd + jitter( rng, factor * noise.speed)).max( 0.0);

    let crs = e.course_mut();
    *crs = normalize_360( *crs + jitter( rng, factor * noise.course));
}

/// decide if a reading is dropped, returned as is or degraded (in which case `e` is noised).
/// Both draws are independent
pub fn degrade<E: Degradable, R: Rng + ?Sized> (e: &mut E, profile: &SourceProfile, rng: &mut R)->Outcome {
    if rng.random::<f64>() < profile.error_rate {
        return Outcome::Dropped
    }

    if rng.random::<f64>() >= profile.quality {
        apply_noise( e, &profile.noise_scale(), 1.0 - profile.quality, rng);
        Outcome::Degraded
    } else {
        Outcome::Clean
    }
}
