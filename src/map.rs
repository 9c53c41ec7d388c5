// Copyright 2018-2019 Mozilla
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not use
// this file except in compliance with the License. You may obtain a copy of the
// License at http://www.apache.org/licenses/LICENSE-2.0
// Unless required by applicable law or agreed to in writing, software distributed
// under the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR
// CONDITIONS OF ANY KIND, either express or implied. See the License for the
// specific language governing permissions and limitations under the License.

mod iter;

use std::{
    marker::PhantomData,
    path::Path,
};

use serde::{
    de::DeserializeOwned,
    Serialize,
};

pub use self::iter::{
    Entries,
    Keys,
};
use crate::backend::{
    Driver,
    SafeMode,
};
use crate::encoder::{
    BincodeEncoder,
    Encoder,
    EncoderPair,
};
use crate::error::StoreError;

/// A typed map persisted through a `Driver`.
///
/// Keys and values are converted to bytes by a pair of encoders; every
/// operation runs in exactly one driver transaction. The map owns the driver,
/// so closing the map closes the driver.
#[derive(Debug)]
pub struct Map<K, V, D = SafeMode, KE = BincodeEncoder<K>, VE = BincodeEncoder<V>> {
    driver: D,
    encoders: EncoderPair<KE, VE>,
    phantom: PhantomData<fn() -> (K, V)>,
}

impl<K, V, D> Map<K, V, D>
where
    K: Serialize + DeserializeOwned,
    V: Serialize + DeserializeOwned,
    D: Driver,
{
    /// Opens `D` at `path` and encodes keys and values with bincode.
    pub fn open<P>(path: P) -> Result<Map<K, V, D>, StoreError>
    where
        P: AsRef<Path>,
    {
        Ok(Map::from_driver(D::open(path)?))
    }

    /// Wraps an already opened driver, encoding keys and values with bincode.
    pub fn from_driver(driver: D) -> Map<K, V, D> {
        Map::with_encoders(driver, EncoderPair::default())
    }
}

impl<K, V, D, KE, VE> Map<K, V, D, KE, VE>
where
    D: Driver,
    KE: Encoder<K>,
    VE: Encoder<V>,
{
    pub fn with_encoders(driver: D, encoders: EncoderPair<KE, VE>) -> Map<K, V, D, KE, VE> {
        Map {
            driver,
            encoders,
            phantom: PhantomData,
        }
    }

    pub fn encoders(&self) -> &EncoderPair<KE, VE> {
        &self.encoders
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Gives up the map without closing its driver.
    pub fn into_driver(self) -> D {
        self.driver
    }

    pub fn store(&self, k: &K, v: &V) -> Result<(), StoreError> {
        let key = self.encode_key(k)?;
        let value = self.encode_value(v)?;
        self.driver.write(|txn| txn.put(&key, &value))
    }

    /// Returns the value stored under `k`, or `None` if there isn't one.
    pub fn load(&self, k: &K) -> Result<Option<V>, StoreError> {
        let key = self.encode_key(k)?;
        self.driver.read(|txn| txn.get(&key)?.map(|bytes| self.decode_value(bytes)).transpose())
    }

    /// Returns the existing value for `k` and `true`, or stores `v` and
    /// returns it with `false`. The check and the store happen in the same
    /// write transaction.
    pub fn load_or_store(&self, k: &K, v: V) -> Result<(V, bool), StoreError> {
        let key = self.encode_key(k)?;
        let value = self.encode_value(&v)?;
        self.driver.write(|txn| {
            let existing = txn.get(&key)?.map(|bytes| self.decode_value(bytes)).transpose()?;
            match existing {
                Some(existing) => Ok((existing, true)),
                None => {
                    txn.put(&key, &value)?;
                    Ok((v, false))
                },
            }
        })
    }

    /// Removes `k` and returns the value it held, if any. If that value can't
    /// be decoded the key is left in place.
    pub fn load_and_delete(&self, k: &K) -> Result<Option<V>, StoreError> {
        let key = self.encode_key(k)?;
        self.driver.write(|txn| {
            let existing = txn.get(&key)?.map(|bytes| self.decode_value(bytes)).transpose()?;
            if existing.is_some() {
                txn.delete(&key)?;
            }
            Ok(existing)
        })
    }

    /// Removes `k`. Removing an absent key succeeds.
    pub fn delete(&self, k: &K) -> Result<(), StoreError> {
        let key = self.encode_key(k)?;
        self.driver.write(|txn| txn.delete(&key))
    }

    pub fn close(self) -> Result<(), StoreError> {
        self.driver.close()
    }

    /// Every key/value pair, read in one read-only transaction per walk.
    pub fn all(&self) -> Entries<'_, K, V, D, KE, VE> {
        Entries::new(self)
    }

    /// Every key, without decoding values.
    pub fn keys(&self) -> Keys<'_, K, V, D, KE, VE> {
        Keys::new(self)
    }

    fn encode_key(&self, k: &K) -> Result<Vec<u8>, StoreError> {
        self.encoders.key.encode(k).map_err(StoreError::KeyEncodingError)
    }

    fn encode_value(&self, v: &V) -> Result<Vec<u8>, StoreError> {
        self.encoders.value.encode(v).map_err(StoreError::ValueEncodingError)
    }

    fn decode_key(&self, bytes: &[u8]) -> Result<K, StoreError> {
        self.encoders.key.decode(bytes).map_err(StoreError::KeyDecodingError)
    }

    fn decode_value(&self, bytes: &[u8]) -> Result<V, StoreError> {
        self.encoders.value.decode(bytes).map_err(StoreError::ValueDecodingError)
    }
}

#[cfg(test)]
mod tests {
    use std::ops::ControlFlow;

    use super::*;
    use crate::backend::MEMORY;
    use crate::encoder::StrEncoder;

    fn open() -> Map<String, i64> {
        Map::open(MEMORY).expect("opened")
    }

    #[test]
    fn test_store_load() {
        let m = open();
        assert_eq!(m.load(&"a".into()).expect("loaded"), None);
        m.store(&"a".into(), &1).expect("stored");
        assert_eq!(m.load(&"a".into()).expect("loaded"), Some(1));
        m.store(&"a".into(), &2).expect("overwrote");
        assert_eq!(m.load(&"a".into()).expect("loaded"), Some(2));
    }

    #[test]
    fn test_delete_is_idempotent() {
        let m = open();
        m.delete(&"missing".into()).expect("deleted");
        m.store(&"a".into(), &1).expect("stored");
        m.delete(&"a".into()).expect("deleted");
        m.delete(&"a".into()).expect("deleted again");
        assert_eq!(m.load(&"a".into()).expect("loaded"), None);
    }

    #[test]
    fn test_load_or_store() {
        let m = open();
        assert_eq!(m.load_or_store(&"a".into(), 1).expect("stored"), (1, false));
        assert_eq!(m.load_or_store(&"a".into(), 2).expect("loaded"), (1, true));
        assert_eq!(m.load(&"a".into()).expect("loaded"), Some(1));
    }

    #[test]
    fn test_load_and_delete() {
        let m = open();
        assert_eq!(m.load_and_delete(&"a".into()).expect("nothing"), None);
        m.store(&"a".into(), &1).expect("stored");
        assert_eq!(m.load_and_delete(&"a".into()).expect("deleted"), Some(1));
        assert_eq!(m.load(&"a".into()).expect("loaded"), None);
    }

    #[test]
    fn test_decode_failure_is_distinct_from_absence() {
        let raw: Map<String, String, SafeMode, StrEncoder<String>, StrEncoder<String>> =
            Map::with_encoders(SafeMode::open(MEMORY).expect("opened"), EncoderPair::default());
        raw.store(&"a".into(), &"x".into()).expect("stored");

        // Reinterpret the same driver with a value type the bytes don't fit.
        let typed: Map<String, u64, SafeMode, StrEncoder<String>, BincodeEncoder<u64>> =
            Map::with_encoders(raw.driver, EncoderPair::default());
        match typed.load(&"a".into()) {
            Err(e @ StoreError::ValueDecodingError(_)) => assert!(e.is_decoding()),
            other => panic!("expected a decoding error, got {:?}", other),
        }
        assert_eq!(typed.load(&"b".into()).expect("absent"), None);

        // A failed decode aborts the transaction, so nothing is deleted.
        assert!(typed.load_and_delete(&"a".into()).is_err());
        assert_eq!(typed.keys().to_vec().expect("walked"), vec!["a".to_string()]);
    }

    #[test]
    fn test_all_stops_early() {
        let m = open();
        m.store(&"a".into(), &1).expect("stored");
        m.store(&"b".into(), &2).expect("stored");

        let mut seen = vec![];
        m.all()
            .for_each(|k, v| {
                seen.push((k, v));
                ControlFlow::Break(())
            })
            .expect("walked");
        assert_eq!(seen.len(), 1);

        let mut all = m.all().to_vec().expect("walked");
        all.sort();
        assert_eq!(all, vec![("a".to_string(), 1), ("b".to_string(), 2)]);
    }
}
