// Copyright 2018-2019 Mozilla
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not use
// this file except in compliance with the License. You may obtain a copy of the
// License at http://www.apache.org/licenses/LICENSE-2.0
// Unless required by applicable law or agreed to in writing, software distributed
// under the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR
// CONDITIONS OF ANY KIND, either express or implied. See the License for the
// specific language governing permissions and limitations under the License.

use std::collections::BTreeMap;

use serde_derive::{
    Deserialize,
    Serialize,
};

use super::ErrorImpl;
use crate::backend::traits::{
    EachKeyVisitor,
    EachVisitor,
};
use crate::error::StoreError;

/// The whole contents of a safe mode store. On disk it is exactly the
/// bincode encoding of the key/value map.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
    map: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl Snapshot {
    pub(crate) fn new() -> Snapshot {
        Snapshot::default()
    }

    pub(crate) fn from_bytes(bytes: &[u8]) -> Result<Snapshot, ErrorImpl> {
        Ok(bincode::deserialize(bytes)?)
    }

    pub(crate) fn to_bytes(&self) -> Result<Vec<u8>, ErrorImpl> {
        Ok(bincode::serialize(self)?)
    }

    pub(crate) fn len(&self) -> usize {
        self.map.len()
    }

    pub(crate) fn get(&self, key: &[u8]) -> Option<&[u8]> {
        self.map.get(key).map(|v| v.as_ref())
    }

    pub(crate) fn put(&mut self, key: &[u8], value: &[u8]) {
        self.map.insert(key.to_vec(), value.to_vec());
    }

    /// Returns whether anything was removed.
    pub(crate) fn del(&mut self, key: &[u8]) -> bool {
        self.map.remove(key).is_some()
    }

    pub(crate) fn each(&self, visit: &mut EachVisitor<'_>) -> Result<(), StoreError> {
        for (key, value) in &self.map {
            if visit(key.as_slice(), value.as_slice())?.is_break() {
                break;
            }
        }
        Ok(())
    }

    pub(crate) fn each_key(&self, visit: &mut EachKeyVisitor<'_>) -> Result<(), StoreError> {
        for key in self.map.keys() {
            if visit(key.as_slice())?.is_break() {
                break;
            }
        }
        Ok(())
    }
}
