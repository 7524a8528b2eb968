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

use std::{sync::Arc, thread, time::Duration};
use odin_common::datetime::{EpochMillis, secs};
use odin_trafficsim::store::{EntityStore, TrackedEntity};

// run with "cargo test test_create_retries -- --nocapture"

#[derive(Debug,Clone)]
struct Probe {
    id: u32,
    key: String,
    last_update: EpochMillis,
}

impl TrackedEntity for Probe {
    type Key = String;
    fn id (&self)->u32 { self.id }
    fn unique_key (&self)->String { self.key.clone() }
    fn position (&self)->(f64,f64) { (0.0, 0.0) }
    fn last_update (&self)->EpochMillis { self.last_update }
}

fn probe (id: u32, key: &str)->Probe { Probe { id, key: key.to_string(), last_update: EpochMillis::now() } }

#[test]
fn test_create_retries() {
    let store: EntityStore<Probe> = EntityStore::new();
    store.create( || probe( 1, "A"));

    // the first candidates collide on id, then on key, the last one is free
    let mut candidates = vec![ probe( 1, "B"), probe( 2, "A"), probe( 1, "A"), probe( 3, "C") ].into_iter();
    let mut n_calls = 0;
    let e = store.create( || { n_calls += 1; candidates.next().unwrap() });

    println!("created {:?} after {} factory calls", e, n_calls);
    assert_eq!( n_calls, 4);
    assert_eq!( e.id, 3);
    assert_eq!( store.len(), 2);

    // failed reservations must not leak keys
    assert!( !store.contains_key( &"B".to_string()));
    assert!( store.get_by_key( &"C".to_string()).is_some());
}

#[test]
fn test_get_update_remove() {
    let store: EntityStore<Probe> = EntityStore::new();
    store.create( || probe( 7, "X"));

    let mut e = store.get( 7).unwrap();
    e.key = "modified copy".to_string();
    assert_eq!( store.get( 7).unwrap().key, "X"); // snapshots are copies

    let r = store.update( 7, |e| { e.last_update = EpochMillis::new(0); 42 });
    assert_eq!( r, Some(42));
    assert_eq!( store.update( 8, |_| 0), None);

    let mut n = 0;
    store.for_each_active( |e| n += 1);
    assert_eq!( n, 1);

    assert!( store.remove( 7).is_some());
    assert!( store.get( 7).is_none());
    assert!( store.remove( 7).is_none());
    assert!( !store.contains_key( &"X".to_string()));
}

#[test]
fn test_evict_idle() {
    let store: EntityStore<Probe> = EntityStore::new();
    let now = EpochMillis::now();

    store.create( || Probe { id: 1, key: "old".into(), last_update: now.minus( secs(600)) });
    store.create( || Probe { id: 2, key: "fresh".into(), last_update: now });

    let evicted = store.evict_idle_at( now, secs(300));
    assert_eq!( evicted, vec![1]);
    assert!( store.get(1).is_none());
    assert!( store.get(2).is_some());
    assert!( store.evict_idle_at( now, secs(300)).is_empty());
}

#[test]
fn test_concurrent_create() {
    let store: Arc<EntityStore<Probe>> = Arc::new( EntityStore::new());

    // all threads draw from the same small id space so that collisions are frequent
    let handles: Vec<_> = (0..4).map( |t| {
        let store = store.clone();
        thread::spawn( move || {
            let mut next = t * 1000;
            for _ in 0..100 {
                store.create( || { next += 1; let id = next % 500; probe( id, &format!("K{id}")) });
            }
        })
    }).collect();
    for h in handles { h.join().unwrap() }

    assert_eq!( store.len(), 400);
    let mut ids = store.ids();
    ids.sort();
    ids.dedup();
    assert_eq!( ids.len(), 400);
}
