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

//! derives independently degraded views of the shared ground truth, one per source profile.
//!
//! Each source is refreshed on its own cadence and keeps its latest view. Queries filter that view by
//! the (ground truth) position of its readings and render it in the source's wire format

use std::{collections::HashSet, sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock}, time::Duration};
use chrono::Utc;
use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Serialize,Deserialize};
use serde_json::Value;
use tokio::{task::JoinHandle, time::{self, MissedTickBehavior}};
use tokio_util::sync::CancellationToken;
use odin_common::{BoundingBox, MinMaxAvg, datetime::EpochMillis, debug, info};
use odin_trafficsim::{Aircraft, TrackStore, TrackedEntity, Vessel};

use crate::degrade::{Degradable, Outcome, degrade};
use crate::errors::{FeedSimError, Result, config_error};
use crate::formats::{render_aircraft, render_vessels};
use crate::profile::{Category, SourceKind, SourceProfile};

/// a possibly degraded copy of an entity plus the ground truth position it was derived from
#[derive(Debug,Clone)]
pub struct Reading<E> {
    pub truth_lat: f64,
    pub truth_lon: f64,
    pub entity: E,
}

#[derive(Debug,Clone)]
pub enum Readings {
    Aircraft(Vec<Reading<Aircraft>>),
    Vessels(Vec<Reading<Vessel>>),
}

impl Readings {
    pub fn len (&self)->usize {
        match self {
            Readings::Aircraft(list) => list.len(),
            Readings::Vessels(list) => list.len(),
        }
    }

    pub fn is_empty (&self)->bool { self.len() == 0 }

    /// ids of the underlying ground truth entities
    pub fn ids (&self)->Vec<u32> {
        match self {
            Readings::Aircraft(list) => list.iter().map( |r| r.entity.id).collect(),
            Readings::Vessels(list) => list.iter().map( |r| r.entity.id).collect(),
        }
    }
}

fn select<E: Clone> (list: &[Reading<E>], bounds: Option<&BoundingBox>)->Vec<E> {
    list.iter()
        .filter( |r| bounds.map( |b| b.contains( r.truth_lat, r.truth_lon)).unwrap_or(true))
        .map( |r| r.entity.clone())
        .collect()
}

/// the result of one poll of a source
#[derive(Debug,Clone)]
pub struct SourceView {
    pub source: String,
    pub kind: SourceKind,
    pub taken: EpochMillis,
    pub readings: Readings,
}

#[derive(Debug,Clone,Copy,Default,PartialEq,Eq)]
pub struct PollCounts {
    pub candidates: usize,
    pub dropped: usize,
    pub degraded: usize,
}

fn poll_entities<E,R> (profile: &SourceProfile, snapshot: Vec<E>, bounds: &BoundingBox, counts: &mut PollCounts, rng: &mut R)->Vec<Reading<E>>
    where E: TrackedEntity + Degradable, R: Rng + ?Sized
{
    let mut readings = Vec::with_capacity( snapshot.len());

    for mut e in snapshot {
        let (lat,lon) = e.position();
        if !profile.covers( lat, lon) || !bounds.contains( lat, lon) { continue }

        counts.candidates += 1;
        match degrade( &mut e, profile, rng) {
            Outcome::Dropped => { counts.dropped += 1; }
            outcome => {
                if outcome == Outcome::Degraded { counts.degraded += 1 }
                readings.push( Reading { truth_lat: lat, truth_lon: lon, entity: e });
            }
        }
    }
    readings
}

/// one poll of a source against the current ground truth: restrict to the source region and `bounds`,
/// then drop and degrade copies. Ground truth is never modified
pub fn poll_source<R: Rng + ?Sized> (profile: &SourceProfile, store: &TrackStore, bounds: &BoundingBox, rng: &mut R)->(SourceView,PollCounts) {
    let mut counts = PollCounts::default();

    let readings = match profile.category() {
        Category::Aircraft => Readings::Aircraft( poll_entities( profile, store.aircraft.snapshot(), bounds, &mut counts, rng)),
        Category::Vessel => Readings::Vessels( poll_entities( profile, store.vessels.snapshot(), bounds, &mut counts, rng)),
    };

    let view = SourceView { source: profile.name.clone(), kind: profile.kind, taken: EpochMillis::now(), readings };
    (view, counts)
}

/// what clients see at /api/mock/stats
#[derive(Serialize,Deserialize,Debug,Clone,PartialEq)]
#[serde(rename_all="camelCase")]
pub struct SourceStats {
    pub name: String,
    pub kind: SourceKind,
    pub category: Category,
    pub quality: f64,
    pub error_rate: f64,
    pub priority: u32,
    pub coverage: String,
    pub update_interval_secs: f64,

    pub polls: u64,
    pub candidates: u64,
    pub dropped: u64,
    pub degraded: u64,
    pub queries: u64,
    pub returned: u64,
    pub current_view_size: usize,
    pub last_update: Option<String>,
    pub avg_response_delay_ms: Option<f64>,
}

struct SourceCounters {
    polls: u64,
    candidates: u64,
    dropped: u64,
    degraded: u64,
    queries: u64,
    returned: u64,
    response_delay: MinMaxAvg,
}

impl SourceCounters {
    fn new ()->Self {
        SourceCounters { polls: 0, candidates: 0, dropped: 0, degraded: 0, queries: 0, returned: 0, response_delay: MinMaxAvg::new() }
    }

    fn add_poll (&mut self, counts: &PollCounts) {
        self.polls += 1;
        self.candidates += counts.candidates as u64;
        self.dropped += counts.dropped as u64;
        self.degraded += counts.degraded as u64;
    }
}

struct SourceState {
    rng: StdRng,
    counters: SourceCounters,
}

struct Source {
    profile: SourceProfile,
    view: RwLock<Option<Arc<SourceView>>>,
    state: Mutex<SourceState>,
}

fn lock<T> (m: &Mutex<T>)->MutexGuard<'_,T> {
    m.lock().unwrap_or_else( PoisonError::into_inner)
}

impl Source {
    fn current_view (&self)->Option<Arc<SourceView>> {
        self.view.read().unwrap_or_else( PoisonError::into_inner).clone()
    }

    fn set_view (&self, view: Arc<SourceView>) {
        *self.view.write().unwrap_or_else( PoisonError::into_inner) = Some(view);
    }
}

/// the multi source aggregation layer. Shares the TrackStore with the engine but only reads snapshots
pub struct SourceAggregator {
    store: Arc<TrackStore>,
    envelope: BoundingBox,
    sources: Vec<Source>,
}

impl SourceAggregator {
    pub fn new (store: Arc<TrackStore>, envelope: BoundingBox, profiles: Vec<SourceProfile>)->Result<Self> {
        Self::with_rng_factory( store, envelope, profiles, |_| StdRng::from_os_rng())
    }

    /// deterministic aggregator for reproducible runs
    pub fn with_seed (store: Arc<TrackStore>, envelope: BoundingBox, profiles: Vec<SourceProfile>, seed: u64)->Result<Self> {
        Self::with_rng_factory( store, envelope, profiles, |i| StdRng::seed_from_u64( seed.wrapping_add( i as u64)))
    }

    fn with_rng_factory<F> (store: Arc<TrackStore>, envelope: BoundingBox, profiles: Vec<SourceProfile>, mut rng_for: F)->Result<Self>
        where F: FnMut(usize)->StdRng
    {
        if !envelope.is_valid() { return Err( config_error( format!("invalid envelope {envelope}"))) }

        let mut names = HashSet::new();
        for p in &profiles {
            p.validate()?;
            if !names.insert( p.name.to_lowercase()) { return Err( config_error( format!("duplicate source {}", p.name))) }
        }

        let sources = profiles.into_iter().enumerate().map( |(i,profile)| {
            let state = SourceState { rng: rng_for(i), counters: SourceCounters::new() };
            Source { profile, view: RwLock::new(None), state: Mutex::new( state) }
        }).collect();

        Ok( SourceAggregator { store, envelope, sources } )
    }

    pub fn envelope (&self)->&BoundingBox { &self.envelope }

    pub fn profiles (&self)->Vec<&SourceProfile> { self.sources.iter().map( |s| &s.profile).collect() }

    pub fn profile (&self, name: &str)->Option<&SourceProfile> { self.source( name).ok().map( |s| &s.profile) }

    fn source (&self, name: &str)->Result<&Source> {
        self.sources.iter()
            .find( |s| s.profile.name.eq_ignore_ascii_case( name))
            .ok_or_else( || FeedSimError::UnknownSource( name.to_string()))
    }

    /// poll a source against the global envelope and make the result its current view
    pub fn refresh (&self, name: &str)->Result<Arc<SourceView>> {
        let src = self.source( name)?;
        Ok( self.refresh_source( src) )
    }

    fn refresh_source (&self, src: &Source)->Arc<SourceView> {
        let mut state = lock( &src.state);
        let (view, counts) = poll_source( &src.profile, &self.store, &self.envelope, &mut state.rng);
        state.counters.add_poll( &counts);
        drop( state);

        debug!("{} refreshed: {} candidates, {} dropped, {} degraded", src.profile.name, counts.candidates, counts.dropped, counts.degraded);
        let view = Arc::new( view);
        src.set_view( view.clone());
        view
    }

    /// the current view of a source, polling it if there is none yet
    pub fn view (&self, name: &str)->Result<Arc<SourceView>> {
        let src = self.source( name)?;
        Ok( src.current_view().unwrap_or_else( || self.refresh_source( src)) )
    }

    /// the source payload for all readings of the current view whose ground truth position is within `bounds`
    pub fn query (&self, name: &str, bounds: Option<&BoundingBox>)->Result<Value> {
        let src = self.source( name)?;
        let view = src.current_view().unwrap_or_else( || self.refresh_source( src));
        let now = Utc::now();

        let mut state = lock( &src.state);
        let st = &mut *state;

        let (payload, n) = match &view.readings {
            Readings::Aircraft(list) => {
                let selected = select( list, bounds);
                (render_aircraft( src.profile.kind, &selected, &now, &mut st.rng)?, selected.len())
            }
            Readings::Vessels(list) => {
                let selected = select( list, bounds);
                (render_vessels( src.profile.kind, &selected, &now, &mut st.rng)?, selected.len())
            }
        };

        let (dmin, dmax) = src.profile.response_delay_ms;
        let delay = st.rng.random_range( dmin..=dmax);
        st.counters.queries += 1;
        st.counters.returned += n as u64;
        st.counters.response_delay.add( delay as f64);

        Ok(payload)
    }

    pub fn stats (&self)->Vec<SourceStats> {
        self.sources.iter().map( |src| {
            let p = &src.profile;
            let view = src.current_view();
            let state = lock( &src.state);
            let c = &state.counters;

            SourceStats {
                name: p.name.clone(),
                kind: p.kind,
                category: p.category(),
                quality: p.quality,
                error_rate: p.error_rate,
                priority: p.priority,
                coverage: p.coverage.clone(),
                update_interval_secs: p.update_interval.as_secs_f64(),
                polls: c.polls,
                candidates: c.candidates,
                dropped: c.dropped,
                degraded: c.degraded,
                queries: c.queries,
                returned: c.returned,
                current_view_size: view.as_ref().map( |v| v.readings.len()).unwrap_or(0),
                last_update: view.as_ref().map( |v| v.taken.to_string()),
                avg_response_delay_ms: if c.response_delay.n > 0 { Some( c.response_delay.avg) } else { None },
            }
        }).collect()
    }

    /// one refresh task per source, each on its own update interval. Tasks terminate when `cancel` fires
    pub fn spawn_refresh_tasks (self: &Arc<Self>, cancel: CancellationToken)->Vec<JoinHandle<()>> {
        (0..self.sources.len()).map( |i| {
            let agg = self.clone();
            let cancel = cancel.clone();
            let interval = agg.sources[i].profile.update_interval;

            tokio::spawn( async move {
                let mut timer = time::interval( interval);
                timer.set_missed_tick_behavior( MissedTickBehavior::Skip);

                loop {
                    tokio::select! {
                        biased;
                        _ = cancel.cancelled() => break,
                        _ = timer.tick() => { agg.refresh_source( &agg.sources[i]); }
                    }
                }
                info!("refresh task for {} terminated", agg.sources[i].profile.name);
            })
        }).collect()
    }
}
