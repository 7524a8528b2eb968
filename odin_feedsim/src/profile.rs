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

use std::time::Duration;
use serde::{Serialize,Deserialize};
use strum::{Display,EnumString,EnumIter};
use odin_common::{BoundingBox, datetime::{deserialize_duration,serialize_duration,secs}};

use crate::errors::{Result,config_error};

/// the wire format of a simulated provider, which also determines what it reports
#[derive(Serialize,Deserialize,Debug,Clone,Copy,PartialEq,Eq,Hash,Display,EnumString,EnumIter)]
pub enum SourceKind {
    FlightRadar24,
    AdsbExchange,
    MarineTraffic,
    VesselFinder,
    Chinaports,
    MarineTrafficV2,
}

#[derive(Serialize,Deserialize,Debug,Clone,Copy,PartialEq,Eq,Hash,Display)]
#[serde(rename_all="lowercase")]
pub enum Category { Aircraft, Vessel }

impl SourceKind {
    pub fn category (&self)->Category {
        match self {
            SourceKind::FlightRadar24 | SourceKind::AdsbExchange => Category::Aircraft,
            _ => Category::Vessel
        }
    }

    /// number of decimals of reported lat/lon
    pub fn coordinate_precision (&self)->i32 {
        match self {
            SourceKind::FlightRadar24 => 4,
            SourceKind::AdsbExchange => 6,
            SourceKind::MarineTraffic => 5,
            SourceKind::VesselFinder => 5,
            SourceKind::Chinaports => 4,
            SourceKind::MarineTrafficV2 => 6,
        }
    }
}

/// max jitter at quality 0. Actual amplitudes are scaled by (1 - quality)
#[derive(Serialize,Deserialize,Debug,Clone,Copy,PartialEq)]
pub struct NoiseScale {
    pub position: f64, // deg
    pub speed: f64,    // kn
    pub course: f64,   // deg
}

impl NoiseScale {
    pub fn for_category (cat: Category)->Self {
        match cat {
            Category::Aircraft => NoiseScale { position: 0.01, speed: 20.0, course: 10.0 },
            Category::Vessel => NoiseScale { position: 0.005, speed: 2.0, course: 10.0 },
        }
    }

    fn is_valid (&self)->bool {
        [self.position, self.speed, self.course].iter().all( |v| v.is_finite() && *v >= 0.0)
    }
}

/// fidelity and format of one simulated data provider
#[derive(Serialize,Deserialize,Debug,Clone)]
pub struct SourceProfile {
    pub name: String,
    pub kind: SourceKind,
    pub quality: f64,    // probability a reading is returned un-degraded
    pub error_rate: f64, // probability a reading is dropped
    pub priority: u32,
    pub coverage: String,

    #[serde(deserialize_with="deserialize_duration",serialize_with="serialize_duration")]
    pub update_interval: Duration,

    pub response_delay_ms: (u64,u64),

    #[serde(default)]
    pub region: Option<BoundingBox>,

    #[serde(default)]
    pub noise: Option<NoiseScale>, // category default if not set
}

impl SourceProfile {
    pub fn new (name: &str, kind: SourceKind, quality: f64, error_rate: f64, priority: u32, coverage: &str, response_delay_ms: (u64,u64))->Self {
        SourceProfile {
            name: name.to_string(),
            kind, quality, error_rate, priority,
            coverage: coverage.to_string(),
            update_interval: secs(30),
            response_delay_ms,
            region: None,
            noise: None,
        }
    }

    pub fn with_region (mut self, region: BoundingBox)->Self {
        self.region = Some(region);
        self
    }

    pub fn category (&self)->Category { self.kind.category() }

    pub fn noise_scale (&self)->NoiseScale {
        self.noise.unwrap_or_else( || NoiseScale::for_category( self.category()))
    }

    /// is the given ground truth position within what this source can see
    pub fn covers (&self, lat: f64, lon: f64)->bool {
        self.region.as_ref().map( |r| r.contains( lat, lon)).unwrap_or(true)
    }

    pub fn validate (&self)->Result<()> {
        if self.name.is_empty() { return Err( config_error("source without name")) }
        if !(0.0..=1.0).contains( &self.quality) { return Err( config_error( format!("{}: quality not in [0,1]", self.name))) }
        if !(0.0..=1.0).contains( &self.error_rate) { return Err( config_error( format!("{}: error rate not in [0,1]", self.name))) }
        if self.update_interval.is_zero() { return Err( config_error( format!("{}: zero update interval", self.name))) }
        if self.response_delay_ms.0 > self.response_delay_ms.1 { return Err( config_error( format!("{}: inverted response delay", self.name))) }
        if let Some(region) = &self.region {
            if !region.is_valid() { return Err( config_error( format!("{}: invalid region {}", self.name, region))) }
        }
        if let Some(noise) = &self.noise {
            if !noise.is_valid() { return Err( config_error( format!("{}: invalid noise scale", self.name))) }
        }
        Ok(())
    }
}

pub fn default_profiles ()->Vec<SourceProfile> {
    use SourceKind::*;
    vec![
        SourceProfile::new( "flightradar24", FlightRadar24, 0.95, 0.02, 1, "global", (100,500)),
        SourceProfile::new( "adsbexchange", AdsbExchange, 0.88, 0.05, 2, "community", (200,800)),
        SourceProfile::new( "marinetraffic", MarineTraffic, 0.92, 0.03, 1, "global", (150,600)),
        SourceProfile::new( "vesselfinder", VesselFinder, 0.87, 0.06, 2, "commercial", (300,1000)),
        SourceProfile::new( "chinaports", Chinaports, 0.85, 0.08, 3, "china_sea", (500,1200))
            .with_region( BoundingBox::new( 99.0, 3.0, 125.0, 25.0)),
        SourceProfile::new( "marinetrafficv2", MarineTrafficV2, 0.89, 0.04, 4, "extended", (200,700)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_defaults_valid() {
        let profiles = default_profiles();
        assert_eq!( profiles.len(), SourceKind::iter().count());
        for p in &profiles { p.validate().unwrap() }

        let cp = profiles.iter().find( |p| p.kind == SourceKind::Chinaports).unwrap();
        assert!( cp.covers( 10.0, 106.0));
        assert!( !cp.covers( 30.0, 106.0));
        assert_eq!( cp.noise_scale(), NoiseScale::for_category( Category::Vessel));
    }
}
