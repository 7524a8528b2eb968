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

use std::{sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, atomic::{AtomicU64,Ordering}}, time::Duration};
use serde::{Serialize,Deserialize};
use rand::{Rng, SeedableRng, rngs::StdRng, distr::{Distribution, weighted::WeightedIndex}};
use odin_common::{
    angle::{converge, converge_angle, normalize_360},
    datetime::EpochMillis,
    geo::{advance, angular_distance, bearing_to, in_bounds},
    debug, info
};

use crate::aircraft::{Aircraft, AircraftOverrides, FlightPhase, new_aircraft, random_destination};
use crate::vessel::{Vessel, VesselOverrides, new_vessel, assign_destination, nav_status_for};
use crate::config::{Location, RoutingMode, SimConfig};
use crate::errors::{Result, TrafficSimError, config_error, invalid_request};
use crate::publish::{Publisher, TrackRecord};
use crate::refdata;
use crate::store::{EntityStore, TrackStore};

pub const SCENARIO_AIRCRAFT: usize = 10;
pub const SCENARIO_AIRPORT_JITTER: f64 = 0.05;
pub const SCENARIO_VESSELS_PER_PORT: usize = 5;
pub const SCENARIO_PORT_JITTER: f64 = 0.1;

const CRUISE_ALTITUDE_TOLERANCE: f64 = 100.0; // ft
const CLIMB_VS_THRESHOLD: f64 = 300.0; // ft/min

/* #region single entity steps ***********************************************************************************/

fn phase_for_vertical_speed (vs: f64)->FlightPhase {
    if vs > CLIMB_VS_THRESHOLD { FlightPhase::Climb }
    else if vs < -CLIMB_VS_THRESHOLD { FlightPhase::Descend }
    else { FlightPhase::Cruise }
}

/// destination reached - the destination becomes the origin of the next leg
fn turn_around<R: Rng + ?Sized> (ac: &mut Aircraft, config: &SimConfig, rng: &mut R) {
    let acfg = &config.aircraft;
    let origin = std::mem::take( &mut ac.destination);
    let dest = random_destination( rng, &config.airports, &origin);

    debug!("aircraft {} arrived at {}, next destination {}", ac.hex, origin, dest.code);
    ac.origin = origin;
    ac.destination = dest.code.clone();
    ac.dest_lat = dest.lat;
    ac.dest_lon = dest.lon;
    ac.cruise_altitude = acfg.altitude.clamp( acfg.cruise_altitude.sample( rng));
}

/// heading follows the bearing to the destination, altitude follows climb/cruise/descend
fn steer_to_destination<R: Rng + ?Sized> (ac: &mut Aircraft, config: &SimConfig, dt: f64, rng: &mut R) {
    let acfg = &config.aircraft;

    let mut dist = angular_distance( ac.lat, ac.lon, ac.dest_lat, ac.dest_lon);
    if dist < acfg.arrival_radius {
        turn_around( ac, config, rng);
        dist = angular_distance( ac.lat, ac.lon, ac.dest_lat, ac.dest_lon);
    }
    ac.target_heading = bearing_to( ac.lat, ac.lon, ac.dest_lat, ac.dest_lon);

    let (phase, vs) = if dist < acfg.descent_threshold {
        (FlightPhase::Descend, -acfg.descent_rate)
    } else if ac.altitude < ac.cruise_altitude - CRUISE_ALTITUDE_TOLERANCE {
        (FlightPhase::Climb, acfg.climb_rate)
    } else {
        (FlightPhase::Cruise, rng.random_range( -acfg.cruise_vs_noise..=acfg.cruise_vs_noise))
    };

    ac.phase = phase;
    ac.vertical_speed = acfg.vertical_speed.clamp( vs);

    let mut alt = ac.altitude + ac.vertical_speed * dt / 60.0;
    if phase == FlightPhase::Climb { alt = alt.min( ac.cruise_altitude) } // don't overshoot
    ac.altitude = acfg.altitude.clamp( alt);
    ac.target_altitude = if phase == FlightPhase::Descend { acfg.altitude.min } else { ac.cruise_altitude };
}

/// advance one aircraft by `dt` seconds. Returns false if the new position is outside of the envelope,
/// in which case the caller has to discard the entity
pub fn advance_aircraft<R: Rng + ?Sized> (ac: &mut Aircraft, config: &SimConfig, dt: f64, rng: &mut R)->bool {
    let acfg = &config.aircraft;

    if rng.random_bool( acfg.speed_change_probability) { ac.target_speed = acfg.speed.sample( rng) }

    match config.routing {
        RoutingMode::Wander => {
            if rng.random_bool( acfg.heading_change_probability) { ac.target_heading = rng.random_range( 0.0..360.0) }
            if rng.random_bool( acfg.altitude_change_probability) { ac.target_altitude = acfg.altitude.sample( rng) }

            let prev_alt = ac.altitude;
            ac.altitude = acfg.altitude.clamp( converge( ac.altitude, ac.target_altitude, acfg.altitude_convergence));
            ac.vertical_speed = if dt > 0.0 { acfg.vertical_speed.clamp( (ac.altitude - prev_alt) * 60.0 / dt) } else { 0.0 };
            ac.phase = phase_for_vertical_speed( ac.vertical_speed);
        }
        RoutingMode::Destination => steer_to_destination( ac, config, dt, rng)
    }

    ac.target_heading = normalize_360( ac.target_heading);
    ac.heading = converge_angle( ac.heading, ac.target_heading, acfg.heading_convergence);
    ac.speed = acfg.speed.clamp( converge( ac.speed, ac.target_speed, acfg.speed_convergence));

    let (lat,lon) = advance( ac.lat, ac.lon, ac.speed, ac.heading, dt);
    ac.lat = lat;
    ac.lon = lon;
    ac.track_age += dt;
    ac.last_update = EpochMillis::now();

    in_bounds( lat, lon, &config.envelope)
}

/// advance one vessel by `dt` seconds. Same contract as `advance_aircraft`
pub fn advance_vessel<R: Rng + ?Sized> (v: &mut Vessel, config: &SimConfig, dt: f64, rng: &mut R)->bool {
    let vcfg = &config.vessels;

    if rng.random_bool( vcfg.speed_change_probability) { v.target_speed = vcfg.speed.sample( rng) }

    match config.routing {
        RoutingMode::Wander => {
            if rng.random_bool( vcfg.course_change_probability) { v.target_course = rng.random_range( 0.0..360.0) }
        }
        RoutingMode::Destination => {
            if angular_distance( v.lat, v.lon, v.dest_lat, v.dest_lon) < vcfg.arrival_radius {
                assign_destination( rng, v, &config.ports);
            }
            v.target_course = bearing_to( v.lat, v.lon, v.dest_lat, v.dest_lon);
        }
    }

    v.target_course = normalize_360( v.target_course);
    v.course = converge_angle( v.course, v.target_course, vcfg.course_convergence);
    v.speed = vcfg.speed.clamp( converge( v.speed, v.target_speed, vcfg.speed_convergence));

    if rng.random_bool( vcfg.draught_change_probability) {
        v.draught += rng.random_range( -vcfg.draught_step..=vcfg.draught_step);
    }
    v.draught = vcfg.draught.clamp( v.draught);
    v.nav_status = nav_status_for( v.speed);

    let (lat,lon) = advance( v.lat, v.lon, v.speed, v.course, dt);
    v.lat = lat;
    v.lon = lon;
    v.track_age += dt;
    v.last_update = EpochMillis::now();

    in_bounds( lat, lon, &config.envelope)
}

/* #endregion single entity steps */

/* #region engine *************************************************************************************************/

/// what a single tick of one category did
#[derive(Debug,Clone)]
pub struct TickReport<E> {
    pub updated: Vec<E>,  // ground truth snapshots of advanced entities
    pub created: Vec<E>,  // population maintenance
    pub evicted: Vec<u32> // ids of entities that left the envelope
}

#[derive(Serialize,Deserialize,Debug,Clone,Default,PartialEq)]
#[serde(rename_all="camelCase")]
pub struct CategoryStats {
    pub active: usize,
    pub ticks: u64,
    pub created: u64,
    pub updated: u64,
    pub evicted_out_of_bounds: u64,
    pub evicted_idle: u64,
}

#[derive(Serialize,Deserialize,Debug,Clone,Default,PartialEq)]
pub struct EngineStats {
    pub aircraft: CategoryStats,
    pub vessels: CategoryStats,
}

#[derive(Default)]
struct CategoryCounters {
    ticks: AtomicU64,
    created: AtomicU64,
    updated: AtomicU64,
    evicted_out_of_bounds: AtomicU64,
    evicted_idle: AtomicU64,
}

impl CategoryCounters {
    fn add (counter: &AtomicU64, n: usize) { counter.fetch_add( n as u64, Ordering::Relaxed); }

    fn stats (&self, active: usize)->CategoryStats {
        CategoryStats {
            active,
            ticks: self.ticks.load( Ordering::Relaxed),
            created: self.created.load( Ordering::Relaxed),
            updated: self.updated.load( Ordering::Relaxed),
            evicted_out_of_bounds: self.evicted_out_of_bounds.load( Ordering::Relaxed),
            evicted_idle: self.evicted_idle.load( Ordering::Relaxed),
        }
    }
}

/// per category state that is only accessed while holding the category lock,
/// which serializes ticks and creations of the same category
struct CategoryState {
    rng: StdRng,
    spawn_counts: WeightedIndex<f64>, // index i means i+1 new entities
}

fn spawn_distribution (weights: &[f64])->Result<WeightedIndex<f64>> {
    WeightedIndex::new( weights).map_err( |e| config_error!("invalid spawn weights: {}", e))
}

impl CategoryState {
    fn new (rng: StdRng, weights: &[f64])->Result<Self> {
        Ok( CategoryState { rng, spawn_counts: spawn_distribution( weights)? } )
    }
}

fn lock<T> (m: &Mutex<T>)->MutexGuard<'_,T> {
    m.lock().unwrap_or_else( PoisonError::into_inner)
}

/// the trajectory simulation engine. It owns no entities itself - all state lives in the shared TrackStore
pub struct TrajectoryEngine {
    config: RwLock<Arc<SimConfig>>,
    store: Arc<TrackStore>,
    publisher: Publisher,

    aircraft_state: Mutex<CategoryState>,
    vessel_state: Mutex<CategoryState>,

    aircraft_counters: CategoryCounters,
    vessel_counters: CategoryCounters,
}

impl TrajectoryEngine {
    pub fn new (config: Arc<SimConfig>, store: Arc<TrackStore>, publisher: Publisher)->Result<Self> {
        Self::with_rngs( config, store, publisher, StdRng::from_os_rng(), StdRng::from_os_rng())
    }

    /// deterministic engine for reproducible runs
    pub fn with_seed (config: Arc<SimConfig>, store: Arc<TrackStore>, publisher: Publisher, seed: u64)->Result<Self> {
        Self::with_rngs( config, store, publisher, StdRng::seed_from_u64( seed), StdRng::seed_from_u64( seed.wrapping_add(1)))
    }

    fn with_rngs (config: Arc<SimConfig>, store: Arc<TrackStore>, publisher: Publisher, ac_rng: StdRng, v_rng: StdRng)->Result<Self> {
        config.validate()?;
        let aircraft_state = Mutex::new( CategoryState::new( ac_rng, &config.aircraft.spawn_weights)?);
        let vessel_state = Mutex::new( CategoryState::new( v_rng, &config.vessels.spawn_weights)?);

        Ok( TrajectoryEngine {
            config: RwLock::new( config),
            store, publisher,
            aircraft_state, vessel_state,
            aircraft_counters: CategoryCounters::default(),
            vessel_counters: CategoryCounters::default(),
        })
    }

    /// the configuration of the current run
    pub fn config (&self)->Arc<SimConfig> { self.config.read().unwrap_or_else( PoisonError::into_inner).clone() }

    /// switch to a new (validated) configuration. Takes effect with the next tick of each category
    pub fn set_config (&self, config: Arc<SimConfig>)->Result<()> {
        config.validate()?;
        let ac_counts = spawn_distribution( &config.aircraft.spawn_weights)?;
        let v_counts = spawn_distribution( &config.vessels.spawn_weights)?;

        let mut ac_state = lock( &self.aircraft_state);
        let mut v_state = lock( &self.vessel_state);
        ac_state.spawn_counts = ac_counts;
        v_state.spawn_counts = v_counts;
        *self.config.write().unwrap_or_else( PoisonError::into_inner) = config;
        Ok(())
    }
    pub fn store (&self)->&Arc<TrackStore> { &self.store }
    pub fn publisher (&self)->&Publisher { &self.publisher }

    pub fn stats (&self)->EngineStats {
        EngineStats {
            aircraft: self.aircraft_counters.stats( self.store.aircraft.len()),
            vessels: self.vessel_counters.stats( self.store.vessels.len()),
        }
    }

    //--- ticks

    /// advance all aircraft by `dt` seconds, evict the ones that left the envelope and replenish the population
    pub fn tick_aircraft (&self, dt: f64)->TickReport<Aircraft> {
        let mut guard = lock( &self.aircraft_state);
        let st = &mut *guard;
        let cfg = self.config();
        let config = &*cfg;

        let (updated, evicted) = tick_store( &self.store.aircraft, |ac| advance_aircraft( ac, config, dt, &mut st.rng));
        for id in &evicted { debug!("aircraft {} left envelope", id) }

        let created = if config.aircraft.enabled { self.replenish_aircraft( st) } else { Vec::new() };

        for ac in updated.iter().chain( created.iter()) {
            self.publisher.try_publish( TrackRecord::Flight( ac.clone()));
        }

        let c = &self.aircraft_counters;
        CategoryCounters::add( &c.ticks, 1);
        CategoryCounters::add( &c.updated, updated.len());
        CategoryCounters::add( &c.evicted_out_of_bounds, evicted.len());

        TickReport { updated, created, evicted }
    }

    pub fn tick_vessels (&self, dt: f64)->TickReport<Vessel> {
        let mut guard = lock( &self.vessel_state);
        let st = &mut *guard;
        let cfg = self.config();
        let config = &*cfg;

        let (updated, evicted) = tick_store( &self.store.vessels, |v| advance_vessel( v, config, dt, &mut st.rng));
        for id in &evicted { debug!("vessel {} left envelope", id) }

        let created = if config.vessels.enabled { self.replenish_vessels( st) } else { Vec::new() };

        for v in updated.iter().chain( created.iter()) {
            self.publisher.try_publish( TrackRecord::Vessel( v.clone()));
        }

        let c = &self.vessel_counters;
        CategoryCounters::add( &c.ticks, 1);
        CategoryCounters::add( &c.updated, updated.len());
        CategoryCounters::add( &c.evicted_out_of_bounds, evicted.len());

        TickReport { updated, created, evicted }
    }

    /// remove entities that have not been updated within `max_age`. Returns number of removed entities
    pub fn sweep_idle (&self, max_age: Duration)->usize {
        let n_ac = self.store.aircraft.evict_idle_older_than( max_age).len();
        let n_v = self.store.vessels.evict_idle_older_than( max_age).len();

        CategoryCounters::add( &self.aircraft_counters.evicted_idle, n_ac);
        CategoryCounters::add( &self.vessel_counters.evicted_idle, n_v);

        if n_ac + n_v > 0 { info!("idle sweep removed {} aircraft and {} vessels", n_ac, n_v) }
        n_ac + n_v
    }

    //--- population

    /// top up both categories to their configured initial counts
    pub fn populate (&self)->(usize,usize) {
        let n_ac = {
            let mut guard = lock( &self.aircraft_state);
            let n = self.config().aircraft.initial_count.saturating_sub( self.store.aircraft.len());
            let created = self.spawn_aircraft( &mut guard, n, None);
            self.publish_aircraft( &created);
            created.len()
        };
        let n_v = {
            let mut guard = lock( &self.vessel_state);
            let n = self.config().vessels.initial_count.saturating_sub( self.store.vessels.len());
            let created = self.spawn_vessels( &mut guard, n, None);
            self.publish_vessels( &created);
            created.len()
        };
        info!("initial population: {} aircraft, {} vessels", n_ac, n_v);
        (n_ac, n_v)
    }

    fn replenish_aircraft (&self, st: &mut CategoryState)->Vec<Aircraft> {
        let headroom = self.config().aircraft.max_count.saturating_sub( self.store.aircraft.len());
        if headroom == 0 { return Vec::new() }

        let n = (st.spawn_counts.sample( &mut st.rng) + 1).min( headroom);
        self.spawn_aircraft( st, n, None)
    }

    fn replenish_vessels (&self, st: &mut CategoryState)->Vec<Vessel> {
        let headroom = self.config().vessels.max_count.saturating_sub( self.store.vessels.len());
        if headroom == 0 { return Vec::new() }

        let n = (st.spawn_counts.sample( &mut st.rng) + 1).min( headroom);
        self.spawn_vessels( st, n, None)
    }

    /// create up to `n` aircraft (capped by the remaining headroom), either at a random airport or at the given one
    fn spawn_aircraft (&self, st: &mut CategoryState, n: usize, at: Option<(&Location,f64)>)->Vec<Aircraft> {
        let cfg = self.config();
        let config = &*cfg;
        let n = n.min( config.aircraft.max_count.saturating_sub( self.store.aircraft.len()));

        let created: Vec<Aircraft> = (0..n).map( |_| {
            let (origin, jitter) = match at {
                Some((loc,jitter)) => (loc.clone(), jitter),
                None => (refdata::pick( &mut st.rng, &config.airports).clone(), config.aircraft.spawn_jitter)
            };
            self.store.aircraft.create( || new_aircraft( &mut st.rng, config, &origin, jitter))
        }).collect();

        for ac in &created { debug!("created {}", ac) }
        CategoryCounters::add( &self.aircraft_counters.created, created.len());
        created
    }

    fn spawn_vessels (&self, st: &mut CategoryState, n: usize, at: Option<(&Location,f64)>)->Vec<Vessel> {
        let cfg = self.config();
        let config = &*cfg;
        let n = n.min( config.vessels.max_count.saturating_sub( self.store.vessels.len()));

        let created: Vec<Vessel> = (0..n).map( |_| {
            let (origin, jitter) = match at {
                Some((loc,jitter)) => (loc.clone(), jitter),
                None => (refdata::pick( &mut st.rng, &config.ports).clone(), config.vessels.spawn_jitter)
            };
            self.store.vessels.create( || new_vessel( &mut st.rng, config, &origin, jitter))
        }).collect();

        for v in &created { debug!("created {}", v) }
        CategoryCounters::add( &self.vessel_counters.created, created.len());
        created
    }

    fn publish_aircraft (&self, list: &[Aircraft]) {
        for ac in list { self.publisher.try_publish( TrackRecord::Flight( ac.clone())); }
    }

    fn publish_vessels (&self, list: &[Vessel]) {
        for v in list { self.publisher.try_publish( TrackRecord::Vessel( v.clone())); }
    }

    //--- on demand creation

    /// create one aircraft from a default valid state plus the given overrides
    pub fn inject_aircraft (&self, overrides: &AircraftOverrides)->Result<Aircraft> {
        let cfg = self.config();
        let config = &*cfg;
        overrides.check( config)?;

        let mut guard = lock( &self.aircraft_state);
        let st = &mut *guard;
        if self.store.aircraft.len() >= config.aircraft.max_count {
            return Err( invalid_request("aircraft population at maximum"))
        }

        let origin = match overrides.origin.as_ref().and_then( |code| config.find_airport( code)) {
            Some(apt) => apt.clone(),
            None => refdata::pick( &mut st.rng, &config.airports).clone()
        };

        let ac = self.store.aircraft.create( || {
            let mut ac = new_aircraft( &mut st.rng, config, &origin, config.aircraft.spawn_jitter);
            overrides.apply_to( &mut ac, config);
            ac
        });

        CategoryCounters::add( &self.aircraft_counters.created, 1);
        self.publisher.try_publish( TrackRecord::Flight( ac.clone()));
        info!("injected {}", ac);
        Ok(ac)
    }

    pub fn inject_vessel (&self, overrides: &VesselOverrides)->Result<Vessel> {
        let cfg = self.config();
        let config = &*cfg;
        overrides.check( config)?;

        let mut guard = lock( &self.vessel_state);
        let st = &mut *guard;
        if self.store.vessels.len() >= config.vessels.max_count {
            return Err( invalid_request("vessel population at maximum"))
        }

        let origin = refdata::pick( &mut st.rng, &config.ports).clone();
        let v = self.store.vessels.create( || {
            let mut v = new_vessel( &mut st.rng, config, &origin, config.vessels.spawn_jitter);
            overrides.apply_to( &mut v, config);
            v
        });

        CategoryCounters::add( &self.vessel_counters.created, 1);
        self.publisher.try_publish( TrackRecord::Vessel( v.clone()));
        info!("injected {}", v);
        Ok(v)
    }

    /// a burst of departures around the given airport
    pub fn airport_scenario (&self, code: &str)->Result<Vec<Aircraft>> {
        let cfg = self.config();
        let airport = cfg.find_airport( code).ok_or_else( || TrafficSimError::UnknownLocation( code.to_string()))?;

        let mut guard = lock( &self.aircraft_state);
        let created = self.spawn_aircraft( &mut guard, SCENARIO_AIRCRAFT, Some((airport, SCENARIO_AIRPORT_JITTER)));
        self.publish_aircraft( &created);

        info!("airport scenario {} created {} aircraft", airport.code, created.len());
        Ok(created)
    }

    /// vessel clusters at the configured scenario ports
    pub fn port_scenario (&self)->Vec<Vessel> {
        let mut guard = lock( &self.vessel_state);
        let mut created = Vec::new();

        let cfg = self.config();
        for port in &cfg.scenario_ports {
            let vs = self.spawn_vessels( &mut guard, SCENARIO_VESSELS_PER_PORT, Some((port, SCENARIO_PORT_JITTER)));
            created.extend( vs);
        }
        self.publish_vessels( &created);

        info!("port scenario created {} vessels", created.len());
        created
    }
}

/// advance every live entity of `store`. Entities are stepped on a copy that is only committed if it stays
/// within the envelope, otherwise the entity is removed. Returns (updated snapshots, evicted ids)
fn tick_store<E,F> (store: &EntityStore<E>, mut step: F)->(Vec<E>,Vec<u32>)
    where E: crate::store::TrackedEntity, F: FnMut(&mut E)->bool
{
    let mut updated = Vec::with_capacity( store.len());
    let mut evicted = Vec::new();

    for id in store.ids() {
        let res = store.update( id, |e| {
            let mut next = e.clone();
            if step( &mut next) {
                *e = next;
                Some( e.clone())
            } else {
                None
            }
        });

        match res {
            Some(Some(snapshot)) => updated.push( snapshot),
            Some(None) => { if store.remove( id).is_some() { evicted.push( id) } }
            None => {} // concurrently removed
        }
    }

    (updated, evicted)
}

/* #endregion engine */
