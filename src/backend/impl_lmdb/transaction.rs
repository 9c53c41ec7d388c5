// Copyright 2018-2019 Mozilla
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not use
// this file except in compliance with the License. You may obtain a copy of the
// License at http://www.apache.org/licenses/LICENSE-2.0
// Unless required by applicable law or agreed to in writing, software distributed
// under the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR
// CONDITIONS OF ANY KIND, either express or implied. See the License for the
// specific language governing permissions and limitations under the License.

use lmdb::{
    Cursor,
    Database,
    Transaction,
    WriteFlags,
};

use super::ErrorImpl;
use crate::backend::traits::{
    EachKeyVisitor,
    EachVisitor,
    Readable,
    Writable,
};
use crate::error::StoreError;

#[derive(Debug)]
pub struct RoTransactionImpl<'env> {
    txn: lmdb::RoTransaction<'env>,
    db: Database,
}

impl<'env> RoTransactionImpl<'env> {
    pub(crate) fn new(txn: lmdb::RoTransaction<'env>, db: Database) -> RoTransactionImpl<'env> {
        RoTransactionImpl {
            txn,
            db,
        }
    }

    pub(crate) fn abort(self) {
        self.txn.abort();
    }
}

impl<'env> Readable for RoTransactionImpl<'env> {
    fn get(&self, key: &[u8]) -> Result<Option<&[u8]>, StoreError> {
        get(&self.txn, self.db, key)
    }

    fn each(&self, visit: &mut EachVisitor<'_>) -> Result<(), StoreError> {
        each(&self.txn, self.db, visit)
    }

    fn each_key(&self, visit: &mut EachKeyVisitor<'_>) -> Result<(), StoreError> {
        each(&self.txn, self.db, &mut |key, _| visit(key))
    }
}

#[derive(Debug)]
pub struct RwTransactionImpl<'env> {
    txn: lmdb::RwTransaction<'env>,
    db: Database,
}

impl<'env> RwTransactionImpl<'env> {
    pub(crate) fn new(txn: lmdb::RwTransaction<'env>, db: Database) -> RwTransactionImpl<'env> {
        RwTransactionImpl {
            txn,
            db,
        }
    }

    pub(crate) fn commit(self) -> Result<(), ErrorImpl> {
        self.txn.commit().map_err(ErrorImpl::LmdbError)
    }

    pub(crate) fn abort(self) {
        self.txn.abort();
    }
}

impl<'env> Readable for RwTransactionImpl<'env> {
    fn get(&self, key: &[u8]) -> Result<Option<&[u8]>, StoreError> {
        get(&self.txn, self.db, key)
    }

    fn each(&self, visit: &mut EachVisitor<'_>) -> Result<(), StoreError> {
        each(&self.txn, self.db, visit)
    }

    fn each_key(&self, visit: &mut EachKeyVisitor<'_>) -> Result<(), StoreError> {
        each(&self.txn, self.db, &mut |key, _| visit(key))
    }
}

impl<'env> Writable for RwTransactionImpl<'env> {
    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        self.txn.put(self.db, &key, &value, WriteFlags::empty()).map_err(ErrorImpl::LmdbError)?;
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), StoreError> {
        match self.txn.del(self.db, &key, None) {
            Ok(()) | Err(lmdb::Error::NotFound) => Ok(()),
            Err(e) => Err(ErrorImpl::LmdbError(e).into()),
        }
    }
}

fn get<'txn, T>(txn: &'txn T, db: Database, key: &[u8]) -> Result<Option<&'txn [u8]>, StoreError>
where
    T: Transaction,
{
    match txn.get(db, &key) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(lmdb::Error::NotFound) => Ok(None),
        Err(e) => Err(ErrorImpl::LmdbError(e).into()),
    }
}

// Values live in the memory map and are handed out without copying; keys
// and values only stay valid until the transaction ends.
fn each<T>(txn: &T, db: Database, visit: &mut EachVisitor<'_>) -> Result<(), StoreError>
where
    T: Transaction,
{
    let mut cursor = txn.open_ro_cursor(db).map_err(ErrorImpl::LmdbError)?;
    for item in cursor.iter_start() {
        let (key, value) = item.map_err(ErrorImpl::LmdbError)?;
        if visit(key, value)?.is_break() {
            break;
        }
    }
    Ok(())
}
