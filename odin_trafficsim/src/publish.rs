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

//! the boundary to whatever transports ground truth records downstream.
//! Publication is decoupled from the simulation ticks through a bounded queue so that a slow or
//! failing sink never stalls position updates

use std::{path::{Path,PathBuf}, sync::{Arc, atomic::{AtomicU64,Ordering}}};
use async_trait::async_trait;
use serde::{Serialize,Deserialize};
use tokio::{io::AsyncWriteExt, sync::mpsc::{self, error::TrySendError}, task::JoinHandle};
use odin_common::{debug,info,warn,error};

use crate::aircraft::Aircraft;
use crate::vessel::Vessel;
use crate::errors::{Result,TrafficSimError};

/// one ground truth record, tagged with the topic it goes to
#[derive(Serialize,Debug,Clone)]
#[serde(tag="topic")]
pub enum TrackRecord {
    #[serde(rename="flights")] Flight(Aircraft),
    #[serde(rename="vessels")] Vessel(Vessel),
}

impl TrackRecord {
    pub fn topic (&self)->&'static str {
        match self {
            TrackRecord::Flight(_) => "flights",
            TrackRecord::Vessel(_) => "vessels",
        }
    }

    pub fn key (&self)->String {
        match self {
            TrackRecord::Flight(ac) => ac.hex.clone(),
            TrackRecord::Vessel(v) => v.mmsi.to_string(),
        }
    }
}

/// the publication boundary
#[async_trait]
pub trait PublicationSink: Send + 'static {
    fn name (&self)->&str;

    async fn publish (&mut self, rec: &TrackRecord)->Result<()>;

    async fn flush (&mut self)->Result<()> { Ok(()) }
}

/// logs records at debug level
pub struct LogSink;

#[async_trait]
impl PublicationSink for LogSink {
    fn name (&self)->&str { "log" }

    async fn publish (&mut self, rec: &TrackRecord)->Result<()> {
        debug!("publish {} {}", rec.topic(), rec.key());
        Ok(())
    }
}

pub struct NullSink;

#[async_trait]
impl PublicationSink for NullSink {
    fn name (&self)->&str { "null" }
    async fn publish (&mut self, rec: &TrackRecord)->Result<()> { Ok(()) }
}

/// appends one JSON object per line to a file
pub struct JsonLinesSink {
    path: PathBuf,
    writer: tokio::io::BufWriter<tokio::fs::File>,
}

impl JsonLinesSink {
    pub async fn open (path: impl AsRef<Path>)->Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = tokio::fs::OpenOptions::new().create(true).append(true).open( &path).await?;
        Ok( JsonLinesSink { path, writer: tokio::io::BufWriter::new( file) } )
    }
}

#[async_trait]
impl PublicationSink for JsonLinesSink {
    fn name (&self)->&str { "jsonl" }

    async fn publish (&mut self, rec: &TrackRecord)->Result<()> {
        let mut line = serde_json::to_vec( rec)?;
        line.push( b'\n');
        self.writer.write_all( &line).await?;
        Ok(())
    }

    async fn flush (&mut self)->Result<()> {
        self.writer.flush().await?;
        Ok(())
    }
}

#[derive(Serialize,Deserialize,Debug,Clone,Default,PartialEq)]
#[serde(rename_all="camelCase")]
pub struct PublisherStats {
    pub submitted: u64,
    pub published: u64,
    pub failed: u64,
    pub dropped: u64, // queue full or closed
}

#[derive(Default)]
struct PublisherCounters {
    submitted: AtomicU64,
    published: AtomicU64,
    failed: AtomicU64,
    dropped: AtomicU64,
}

/// cloneable fire-and-continue handle for publishing records
#[derive(Clone)]
pub struct Publisher {
    tx: Option<mpsc::Sender<TrackRecord>>,
    counters: Arc<PublisherCounters>,
}

impl Publisher {
    /// a publisher that discards everything (used when there is no sink)
    pub fn disabled ()->Self {
        Publisher { tx: None, counters: Arc::new( PublisherCounters::default()) }
    }

    /// spawn the drain task that forwards queued records to `sink`. Has to be called from within a tokio runtime.
    /// The task terminates once all Publisher clones are dropped
    pub fn spawn<S: PublicationSink> (mut sink: S, queue_size: usize)->(Self, JoinHandle<()>) {
        let (tx, mut rx) = mpsc::channel::<TrackRecord>( queue_size.max(1));
        let counters = Arc::new( PublisherCounters::default());
        let task_counters = counters.clone();

        let jh = tokio::spawn( async move {
            info!("publication sink '{}' started", sink.name());
            while let Some(rec) = rx.recv().await {
                match sink.publish( &rec).await {
                    Ok(()) => { task_counters.published.fetch_add( 1, Ordering::Relaxed); }
                    Err(e) => {
                        task_counters.failed.fetch_add( 1, Ordering::Relaxed);
                        warn!("failed to publish {} {}: {}", rec.topic(), rec.key(), e);
                    }
                }
                if rx.is_empty() {
                    if let Err(e) = sink.flush().await { warn!("failed to flush sink '{}': {}", sink.name(), e) }
                }
            }
            info!("publication sink '{}' terminated", sink.name());
        });

        (Publisher { tx: Some(tx), counters }, jh)
    }

    pub fn is_enabled (&self)->bool { self.tx.is_some() }

    /// never blocks. Returns false if the record could not be queued
    pub fn try_publish (&self, rec: TrackRecord)->bool {
        let Some(tx) = &self.tx else { return false };
        self.counters.submitted.fetch_add( 1, Ordering::Relaxed);

        match tx.try_send( rec) {
            Ok(()) => true,
            Err(TrySendError::Full(rec)) => {
                let n = self.counters.dropped.fetch_add( 1, Ordering::Relaxed);
                if n % 1000 == 0 { warn!("publication queue full, dropped {} {} ({} total)", rec.topic(), rec.key(), n+1) }
                false
            }
            Err(TrySendError::Closed(rec)) => {
                self.counters.dropped.fetch_add( 1, Ordering::Relaxed);
                error!("publication queue closed, dropped {} {}", rec.topic(), rec.key());
                false
            }
        }
    }

    pub fn stats (&self)->PublisherStats {
        PublisherStats {
            submitted: self.counters.submitted.load( Ordering::Relaxed),
            published: self.counters.published.load( Ordering::Relaxed),
            failed: self.counters.failed.load( Ordering::Relaxed),
            dropped: self.counters.dropped.load( Ordering::Relaxed),
        }
    }
}
