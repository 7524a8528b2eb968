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

use std::{fmt::Debug, hash::Hash, time::Duration};
use dashmap::{DashMap, mapref::entry::Entry};
use odin_common::datetime::EpochMillis;

use crate::aircraft::Aircraft;
use crate::vessel::Vessel;

/// what the store needs to know about the entities it owns
pub trait TrackedEntity: Clone + Send + Sync + 'static {
    /// secondary key that has to be unique among live entities (hex code, MMSI)
    type Key: Eq + Hash + Clone + Debug + Send + Sync + 'static;

    fn id (&self)->u32;
    fn unique_key (&self)->Self::Key;
    fn position (&self)->(f64,f64);
    fn last_update (&self)->EpochMillis;
}

/// the canonical owner of all live entities of one category.
/// Readers only ever get clones. Mutation goes through `create`, `update` and `remove`
pub struct EntityStore<E: TrackedEntity> {
    entities: DashMap<u32,E>,
    keys: DashMap<E::Key,u32>, // unique key -> id
}

impl<E: TrackedEntity> EntityStore<E> {
    pub fn new ()->Self {
        EntityStore { entities: DashMap::new(), keys: DashMap::new() }
    }

    /// insert a new entity obtained from `factory`. The factory is called again (with freshly drawn
    /// identifiers) until both id and unique key are collision free. The entity only becomes visible
    /// once it is completely constructed
    pub fn create<F> (&self, mut factory: F)->E where F: FnMut()->E {
        loop {
            let e = factory();
            let id = e.id();
            let key = e.unique_key();

            let key_reserved = match self.keys.entry( key.clone()) {
                Entry::Occupied(_) => false,
                Entry::Vacant(v) => { v.insert( id); true }
            };
            if !key_reserved { continue }

            let inserted = match self.entities.entry( id) {
                Entry::Occupied(_) => false,
                Entry::Vacant(v) => { v.insert( e.clone()); true }
            };
            if inserted {
                return e
            } else {
                self.keys.remove( &key); // release reservation and retry
            }
        }
    }

    pub fn get (&self, id: u32)->Option<E> {
        self.entities.get( &id).map( |e| e.value().clone())
    }

    pub fn get_by_key (&self, key: &E::Key)->Option<E> {
        let id = *self.keys.get( key)?;
        self.get( id)
    }

    pub fn contains_key (&self, key: &E::Key)->bool { self.keys.contains_key( key) }

    /// apply `f` to the live entity. Note that `f` must not access this store
    pub fn update<F,R> (&self, id: u32, f: F)->Option<R> where F: FnOnce(&mut E)->R {
        self.entities.get_mut( &id).map( |mut e| f( e.value_mut()))
    }

    /// iterate over all live entities. Note that `f` must not modify this store
    pub fn for_each_active<F> (&self, mut f: F) where F: FnMut(&E) {
        for e in self.entities.iter() {
            f( e.value())
        }
    }

    pub fn remove (&self, id: u32)->Option<E> {
        let (_,e) = self.entities.remove( &id)?;
        self.keys.remove( &e.unique_key());
        Some(e)
    }

    /// remove all entities that have not been updated within `max_age`, returning their ids
    pub fn evict_idle_older_than (&self, max_age: Duration)->Vec<u32> {
        self.evict_idle_at( EpochMillis::now(), max_age)
    }

    pub fn evict_idle_at (&self, now: EpochMillis, max_age: Duration)->Vec<u32> {
        let stale: Vec<u32> = self.entities.iter()
            .filter( |e| now.duration_since( e.value().last_update()) > max_age)
            .map( |e| *e.key())
            .collect(); // don't remove while iterating

        stale.into_iter().filter( |id| self.remove( *id).is_some()).collect()
    }

    pub fn len (&self)->usize { self.entities.len() }

    pub fn is_empty (&self)->bool { self.entities.is_empty() }

    pub fn ids (&self)->Vec<u32> { self.entities.iter().map( |e| *e.key()).collect() }

    /// clones of all live entities
    pub fn snapshot (&self)->Vec<E> { self.entities.iter().map( |e| e.value().clone()).collect() }
}

impl<E: TrackedEntity> Default for EntityStore<E> {
    fn default()->Self { Self::new() }
}

/// the shared ground truth of a simulation run
#[derive(Default)]
pub struct TrackStore {
    pub aircraft: EntityStore<Aircraft>,
    pub vessels: EntityStore<Vessel>,
}

impl TrackStore {
    pub fn new ()->Self { TrackStore::default() }
}
