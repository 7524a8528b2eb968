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

use std::{collections::HashSet, path::Path};
use serde::{Serialize,Deserialize};
use tokio::task::JoinHandle;
use odin_server::ServerConfig;
use odin_trafficsim::{SimConfig, publish::{JsonLinesSink, LogSink, NullSink, Publisher}};

use crate::errors::{Result,config_error};
use crate::profile::{SourceProfile, default_profiles};

/// where ground truth records go
#[derive(Serialize,Deserialize,Debug,Clone,PartialEq)]
pub enum SinkConfig {
    Log,
    Null,
    JsonLines(String), // file path
}

#[derive(Serialize,Deserialize,Debug,Clone)]
#[serde(default)]
pub struct PublicationConfig {
    pub sink: SinkConfig,
    pub queue_size: usize,
}

impl Default for PublicationConfig {
    fn default()->Self {
        PublicationConfig { sink: SinkConfig::Log, queue_size: 4096 }
    }
}

impl PublicationConfig {
    /// spawn the publisher drain task for the configured sink
    pub async fn spawn_publisher (&self)->Result<(Publisher, JoinHandle<()>)> {
        let res = match &self.sink {
            SinkConfig::Log => Publisher::spawn( LogSink, self.queue_size),
            SinkConfig::Null => Publisher::spawn( NullSink, self.queue_size),
            SinkConfig::JsonLines(path) => Publisher::spawn( JsonLinesSink::open( path).await?, self.queue_size),
        };
        Ok(res)
    }
}

/// the complete configuration of a feed simulator run
#[derive(Serialize,Deserialize,Debug,Clone)]
#[serde(default)]
pub struct FeedSimConfig {
    pub server: ServerConfig,
    pub simulation: SimConfig,
    pub sources: Vec<SourceProfile>,
    pub publication: PublicationConfig,
}

impl Default for FeedSimConfig {
    fn default()->Self {
        FeedSimConfig {
            server: ServerConfig::default(),
            simulation: SimConfig::default(),
            sources: default_profiles(),
            publication: PublicationConfig::default(),
        }
    }
}

impl FeedSimConfig {
    pub fn validate (&self)->Result<()> {
        self.simulation.validate()?;

        let mut names = HashSet::new();
        for p in &self.sources {
            p.validate()?;
            if !names.insert( p.name.to_lowercase()) { return Err( config_error( format!("duplicate source {}", p.name))) }
        }
        if self.publication.queue_size == 0 { return Err( config_error("zero publication queue size")) }
        Ok(())
    }
}

/// load and validate a RON config
pub fn load_feedsim_config (path: impl AsRef<Path>)->Result<FeedSimConfig> {
    let config: FeedSimConfig = odin_trafficsim::load_config( path)?;
    config.validate()?;
    Ok(config)
}
