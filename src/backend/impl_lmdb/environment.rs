// Copyright 2018-2019 Mozilla
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not use
// this file except in compliance with the License. You may obtain a copy of the
// License at http://www.apache.org/licenses/LICENSE-2.0
// Unless required by applicable law or agreed to in writing, software distributed
// under the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR
// CONDITIONS OF ANY KIND, either express or implied. See the License for the
// specific language governing permissions and limitations under the License.

use std::{
    fs,
    path::Path,
};

use log::debug;

use super::{
    ErrorImpl,
    RoTransactionImpl,
    RwTransactionImpl,
};
use crate::backend::common::is_memory_path;
use crate::backend::traits::{
    Driver,
    DriverBuilder,
    Readable,
    Writable,
};
use crate::error::StoreError;

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct DriverBuilderImpl {
    builder: lmdb::EnvironmentBuilder,
    make_dir_if_needed: bool,
}

impl DriverBuilderImpl {
    pub fn set_max_readers(&mut self, max_readers: u32) -> &mut Self {
        self.builder.set_max_readers(max_readers);
        self
    }

    pub fn set_map_size(&mut self, size: usize) -> &mut Self {
        self.builder.set_map_size(size);
        self
    }
}

impl DriverBuilder for DriverBuilderImpl {
    type Driver = DriverImpl;

    fn new() -> DriverBuilderImpl {
        DriverBuilderImpl {
            builder: lmdb::Environment::new(),
            make_dir_if_needed: false,
        }
    }

    fn set_make_dir_if_needed(&mut self, make_dir_if_needed: bool) -> &mut Self {
        self.make_dir_if_needed = make_dir_if_needed;
        self
    }

    fn open<P>(&self, path: P) -> Result<DriverImpl, StoreError>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        // LMDB always needs a directory to map; refuse rather than persist.
        if is_memory_path(path) {
            return Err(ErrorImpl::InMemoryUnsupported.into());
        }
        if !path.is_dir() {
            if !self.make_dir_if_needed {
                return Err(ErrorImpl::DirectoryDoesNotExistError(path.into()).into());
            }
            fs::create_dir_all(path).map_err(ErrorImpl::IoError)?;
        }

        let env = self.builder.open(path).map_err(ErrorImpl::LmdbError)?;
        let db = env.open_db(None).map_err(ErrorImpl::LmdbError)?;
        debug!("Opened lmdb environment at {:?}", path);
        Ok(DriverImpl {
            env,
            db,
        })
    }
}

/// A single unnamed LMDB database. Enumeration follows LMDB's key order.
#[derive(Debug)]
pub struct DriverImpl {
    env: lmdb::Environment,
    db: lmdb::Database,
}

impl Driver for DriverImpl {
    fn open<P>(path: P) -> Result<DriverImpl, StoreError>
    where
        P: AsRef<Path>,
    {
        let mut builder = DriverBuilderImpl::new();
        builder.set_make_dir_if_needed(true);
        builder.open(path)
    }

    fn close(self) -> Result<(), StoreError> {
        debug!("Closing lmdb environment");
        drop(self.env);
        Ok(())
    }

    fn read<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&dyn Readable) -> Result<T, StoreError>,
    {
        let txn = self.env.begin_ro_txn().map_err(ErrorImpl::LmdbError)?;
        let txn = RoTransactionImpl::new(txn, self.db);
        let result = f(&txn);
        txn.abort();
        result
    }

    fn write<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut dyn Writable) -> Result<T, StoreError>,
    {
        let txn = self.env.begin_rw_txn().map_err(ErrorImpl::LmdbError)?;
        let mut txn = RwTransactionImpl::new(txn, self.db);
        match f(&mut txn) {
            Ok(result) => {
                txn.commit()?;
                Ok(result)
            },
            Err(e) => {
                txn.abort();
                Err(e)
            },
        }
    }
}
