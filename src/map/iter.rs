// Copyright 2018-2019 Mozilla
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not use
// this file except in compliance with the License. You may obtain a copy of the
// License at http://www.apache.org/licenses/LICENSE-2.0
// Unless required by applicable law or agreed to in writing, software distributed
// under the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR
// CONDITIONS OF ANY KIND, either express or implied. See the License for the
// specific language governing permissions and limitations under the License.

use std::ops::ControlFlow;

use super::Map;
use crate::backend::Driver;
use crate::encoder::Encoder;
use crate::error::StoreError;

/// The key/value pairs of a `Map`.
///
/// Nothing is read until `for_each` runs. Each run opens its own read-only
/// transaction and sees the map as it was when that transaction began.
pub struct Entries<'m, K, V, D, KE, VE> {
    map: &'m Map<K, V, D, KE, VE>,
}

/// The keys of a `Map`. See `Entries`.
pub struct Keys<'m, K, V, D, KE, VE> {
    map: &'m Map<K, V, D, KE, VE>,
}

impl<'m, K, V, D, KE, VE> Entries<'m, K, V, D, KE, VE>
where
    D: Driver,
    KE: Encoder<K>,
    VE: Encoder<V>,
{
    pub(crate) fn new(map: &'m Map<K, V, D, KE, VE>) -> Entries<'m, K, V, D, KE, VE> {
        Entries {
            map,
        }
    }

    /// Hands each pair to `f` until `f` returns `ControlFlow::Break`, which
    /// ends the walk (and the transaction) without an error. A pair that
    /// can't be decoded ends the walk with that error.
    ///
    /// The read transaction stays open while `f` runs. With `SafeMode` that
    /// means a write to the same map from inside `f` deadlocks; collect what
    /// needs changing and write after the walk returns.
    pub fn for_each<F>(&self, mut f: F) -> Result<(), StoreError>
    where
        F: FnMut(K, V) -> ControlFlow<()>,
    {
        let map = self.map;
        map.driver.read(|txn| {
            txn.each(&mut |k, v| {
                let key = map.decode_key(k)?;
                let value = map.decode_value(v)?;
                Ok(f(key, value))
            })
        })
    }

    pub fn to_vec(&self) -> Result<Vec<(K, V)>, StoreError> {
        let mut entries = vec![];
        self.for_each(|k, v| {
            entries.push((k, v));
            ControlFlow::Continue(())
        })?;
        Ok(entries)
    }
}

impl<'m, K, V, D, KE, VE> Keys<'m, K, V, D, KE, VE>
where
    D: Driver,
    KE: Encoder<K>,
    VE: Encoder<V>,
{
    pub(crate) fn new(map: &'m Map<K, V, D, KE, VE>) -> Keys<'m, K, V, D, KE, VE> {
        Keys {
            map,
        }
    }

    /// Hands each key to `f` until `f` returns `ControlFlow::Break`. As with
    /// `Entries::for_each`, `f` must not write to the same map while the walk
    /// holds its read transaction.
    pub fn for_each<F>(&self, mut f: F) -> Result<(), StoreError>
    where
        F: FnMut(K) -> ControlFlow<()>,
    {
        let map = self.map;
        map.driver.read(|txn| {
            txn.each_key(&mut |k| {
                let key = map.decode_key(k)?;
                Ok(f(key))
            })
        })
    }

    pub fn to_vec(&self) -> Result<Vec<K>, StoreError> {
        let mut keys = vec![];
        self.for_each(|k| {
            keys.push(k);
            ControlFlow::Continue(())
        })?;
        Ok(keys)
    }
}

impl<'m, K, V, D, KE, VE> Clone for Entries<'m, K, V, D, KE, VE> {
    fn clone(&self) -> Self {
        Entries {
            map: self.map,
        }
    }
}

impl<'m, K, V, D, KE, VE> Clone for Keys<'m, K, V, D, KE, VE> {
    fn clone(&self) -> Self {
        Keys {
            map: self.map,
        }
    }
}
