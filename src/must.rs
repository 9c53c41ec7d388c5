// Copyright 2018-2019 Mozilla
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not use
// this file except in compliance with the License. You may obtain a copy of the
// License at http://www.apache.org/licenses/LICENSE-2.0
// Unless required by applicable law or agreed to in writing, software distributed
// under the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR
// CONDITIONS OF ANY KIND, either express or implied. See the License for the
// specific language governing permissions and limitations under the License.

//! Wrappers for callers that treat storage failures as fatal.
//!
//! `MustMap` and `MustValue` forward to `Map` and `Value` and panic on any
//! `StoreError`. A missing key is not a failure and is still reported through
//! `Option` or the `loaded` flag.

use std::{
    ops::ControlFlow,
    path::Path,
};

use serde::{
    de::DeserializeOwned,
    Serialize,
};

use crate::backend::{
    Driver,
    SafeMode,
};
use crate::encoder::{
    BincodeEncoder,
    Encoder,
};
use crate::error::StoreError;
use crate::map::Map;
use crate::value::{
    Value,
    ValueKey,
};

#[derive(Debug)]
pub struct MustMap<K, V, D = SafeMode, KE = BincodeEncoder<K>, VE = BincodeEncoder<V>> {
    map: Map<K, V, D, KE, VE>,
}

impl<K, V, D> MustMap<K, V, D>
where
    K: Serialize + DeserializeOwned,
    V: Serialize + DeserializeOwned,
    D: Driver,
{
    /// Opening is the one operation that still reports failure.
    pub fn open<P>(path: P) -> Result<MustMap<K, V, D>, StoreError>
    where
        P: AsRef<Path>,
    {
        Ok(MustMap::from_map(Map::open(path)?))
    }
}

impl<K, V, D, KE, VE> MustMap<K, V, D, KE, VE>
where
    D: Driver,
    KE: Encoder<K>,
    VE: Encoder<V>,
{
    pub fn from_map(map: Map<K, V, D, KE, VE>) -> MustMap<K, V, D, KE, VE> {
        MustMap {
            map,
        }
    }

    pub fn inner(&self) -> &Map<K, V, D, KE, VE> {
        &self.map
    }

    pub fn into_inner(self) -> Map<K, V, D, KE, VE> {
        self.map
    }

    pub fn store(&self, k: &K, v: &V) {
        if let Err(e) = self.map.store(k, v) {
            panic!("MustMap cannot store: {}", e);
        }
    }

    pub fn load(&self, k: &K) -> Option<V> {
        self.map.load(k).unwrap_or_else(|e| panic!("MustMap cannot load: {}", e))
    }

    pub fn load_or_store(&self, k: &K, v: V) -> (V, bool) {
        self.map.load_or_store(k, v).unwrap_or_else(|e| panic!("MustMap cannot load or store: {}", e))
    }

    pub fn load_and_delete(&self, k: &K) -> Option<V> {
        self.map.load_and_delete(k).unwrap_or_else(|e| panic!("MustMap cannot load and delete: {}", e))
    }

    pub fn delete(&self, k: &K) {
        if let Err(e) = self.map.delete(k) {
            panic!("MustMap cannot delete: {}", e);
        }
    }

    pub fn close(self) {
        if let Err(e) = self.map.close() {
            panic!("MustMap cannot close: {}", e);
        }
    }

    /// Walks every entry, stopping when `f` breaks.
    pub fn all<F>(&self, f: F)
    where
        F: FnMut(K, V) -> ControlFlow<()>,
    {
        if let Err(e) = self.map.all().for_each(f) {
            panic!("MustMap cannot iterate: {}", e);
        }
    }

    /// Walks every key, stopping when `f` breaks.
    pub fn keys<F>(&self, f: F)
    where
        F: FnMut(K) -> ControlFlow<()>,
    {
        if let Err(e) = self.map.keys().for_each(f) {
            panic!("MustMap cannot iterate keys: {}", e);
        }
    }
}

#[derive(Debug)]
pub struct MustValue<V, D = SafeMode, K = ValueKey, KE = BincodeEncoder<K>, VE = BincodeEncoder<V>> {
    value: Value<V, D, K, KE, VE>,
}

impl<V, D> MustValue<V, D>
where
    V: Serialize + DeserializeOwned,
    D: Driver,
{
    pub fn open<P>(path: P) -> Result<MustValue<V, D>, StoreError>
    where
        P: AsRef<Path>,
    {
        Ok(MustValue::from_value(Value::open(path)?))
    }
}

impl<V, D, K, KE, VE> MustValue<V, D, K, KE, VE>
where
    D: Driver,
    KE: Encoder<K>,
    VE: Encoder<V>,
{
    pub fn from_value(value: Value<V, D, K, KE, VE>) -> MustValue<V, D, K, KE, VE> {
        MustValue {
            value,
        }
    }

    pub fn inner(&self) -> &Value<V, D, K, KE, VE> {
        &self.value
    }

    pub fn into_inner(self) -> Value<V, D, K, KE, VE> {
        self.value
    }

    pub fn store(&self, v: &V) {
        if let Err(e) = self.value.store(v) {
            panic!("MustValue cannot store: {}", e);
        }
    }

    pub fn load(&self) -> Option<V> {
        self.value.load().unwrap_or_else(|e| panic!("MustValue cannot load: {}", e))
    }

    pub fn load_or_store(&self, v: V) -> (V, bool) {
        self.value.load_or_store(v).unwrap_or_else(|e| panic!("MustValue cannot load or store: {}", e))
    }

    pub fn load_and_delete(&self) -> Option<V> {
        self.value.load_and_delete().unwrap_or_else(|e| panic!("MustValue cannot load and delete: {}", e))
    }

    pub fn delete(&self) {
        if let Err(e) = self.value.delete() {
            panic!("MustValue cannot delete: {}", e);
        }
    }

    pub fn close(self) {
        if let Err(e) = self.value.close() {
            panic!("MustValue cannot close: {}", e);
        }
    }
}
