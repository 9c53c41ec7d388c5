// Copyright 2018-2019 Mozilla
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not use
// this file except in compliance with the License. You may obtain a copy of the
// License at http://www.apache.org/licenses/LICENSE-2.0
// Unless required by applicable law or agreed to in writing, software distributed
// under the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR
// CONDITIONS OF ANY KIND, either express or implied. See the License for the
// specific language governing permissions and limitations under the License.

use std::path::Path;

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

pub type ValueKey = u32;

/// The key a `Value` opened with `Value::open` lives under.
pub const VALUE_KEY: ValueKey = 0;

/// A single persistent slot: a `Map` that is only ever used with one key.
#[derive(Debug)]
pub struct Value<V, D = SafeMode, K = ValueKey, KE = BincodeEncoder<K>, VE = BincodeEncoder<V>> {
    map: Map<K, V, D, KE, VE>,
    key: K,
}

impl<V, D> Value<V, D>
where
    V: Serialize + DeserializeOwned,
    D: Driver,
{
    pub fn open<P>(path: P) -> Result<Value<V, D>, StoreError>
    where
        P: AsRef<Path>,
    {
        Ok(Value::from_map(Map::open(path)?, VALUE_KEY))
    }
}

impl<V, D, K, KE, VE> Value<V, D, K, KE, VE>
where
    D: Driver,
    KE: Encoder<K>,
    VE: Encoder<V>,
{
    /// Uses the entry for `key` in `map` as the slot.
    pub fn from_map(map: Map<K, V, D, KE, VE>, key: K) -> Value<V, D, K, KE, VE> {
        Value {
            map,
            key,
        }
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn into_map(self) -> Map<K, V, D, KE, VE> {
        self.map
    }

    pub fn store(&self, v: &V) -> Result<(), StoreError> {
        self.map.store(&self.key, v)
    }

    pub fn load(&self) -> Result<Option<V>, StoreError> {
        self.map.load(&self.key)
    }

    pub fn load_or_store(&self, v: V) -> Result<(V, bool), StoreError> {
        self.map.load_or_store(&self.key, v)
    }

    pub fn load_and_delete(&self) -> Result<Option<V>, StoreError> {
        self.map.load_and_delete(&self.key)
    }

    pub fn delete(&self) -> Result<(), StoreError> {
        self.map.delete(&self.key)
    }

    pub fn close(self) -> Result<(), StoreError> {
        self.map.close()
    }
}
