// Copyright 2018-2019 Mozilla
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not use
// this file except in compliance with the License. You may obtain a copy of the
// License at http://www.apache.org/licenses/LICENSE-2.0
// Unless required by applicable law or agreed to in writing, software distributed
// under the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR
// CONDITIONS OF ANY KIND, either express or implied. See the License for the
// specific language governing permissions and limitations under the License.

use super::Snapshot;
use crate::backend::traits::{
    EachKeyVisitor,
    EachVisitor,
    Readable,
    Writable,
};
use crate::error::StoreError;

/// A read-only view of the committed snapshot. The environment holds the
/// shared lock for as long as this exists.
#[derive(Debug)]
pub struct RoTransactionImpl<'s> {
    snapshot: &'s Snapshot,
}

impl<'s> RoTransactionImpl<'s> {
    pub(crate) fn new(snapshot: &'s Snapshot) -> RoTransactionImpl<'s> {
        RoTransactionImpl {
            snapshot,
        }
    }
}

impl<'s> Readable for RoTransactionImpl<'s> {
    fn get(&self, key: &[u8]) -> Result<Option<&[u8]>, StoreError> {
        Ok(self.snapshot.get(key))
    }

    fn each(&self, visit: &mut EachVisitor<'_>) -> Result<(), StoreError> {
        self.snapshot.each(visit)
    }

    fn each_key(&self, visit: &mut EachKeyVisitor<'_>) -> Result<(), StoreError> {
        self.snapshot.each_key(visit)
    }
}

/// A private copy of the snapshot. Nothing is visible to other transactions
/// until the environment swaps the copy in on commit.
#[derive(Debug)]
pub struct RwTransactionImpl {
    snapshot: Snapshot,
    dirty: bool,
}

impl RwTransactionImpl {
    pub(crate) fn new(snapshot: Snapshot) -> RwTransactionImpl {
        RwTransactionImpl {
            snapshot,
            dirty: false,
        }
    }

    /// Returns the new snapshot, or `None` if nothing was written.
    pub(crate) fn commit(self) -> Option<Snapshot> {
        if self.dirty {
            Some(self.snapshot)
        } else {
            None
        }
    }
}

impl Readable for RwTransactionImpl {
    fn get(&self, key: &[u8]) -> Result<Option<&[u8]>, StoreError> {
        Ok(self.snapshot.get(key))
    }

    fn each(&self, visit: &mut EachVisitor<'_>) -> Result<(), StoreError> {
        self.snapshot.each(visit)
    }

    fn each_key(&self, visit: &mut EachKeyVisitor<'_>) -> Result<(), StoreError> {
        self.snapshot.each_key(visit)
    }
}

impl Writable for RwTransactionImpl {
    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        self.snapshot.put(key, value);
        self.dirty = true;
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), StoreError> {
        if self.snapshot.del(key) {
            self.dirty = true;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_commit() {
        let mut txn = RwTransactionImpl::new(Snapshot::new());
        txn.delete(b"missing").expect("deleted");
        assert_eq!(txn.commit(), None);
    }

    #[test]
    fn test_dirty_commit() {
        let mut txn = RwTransactionImpl::new(Snapshot::new());
        txn.put(b"k", b"v").expect("put");
        assert_eq!(txn.get(b"k").expect("read"), Some(&b"v"[..]));

        let snapshot = txn.commit().expect("dirty");
        assert_eq!(snapshot.get(b"k"), Some(&b"v"[..]));
    }
}
