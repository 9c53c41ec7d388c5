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
    ffi::OsString,
    fs,
    io,
    path::{
        Path,
        PathBuf,
    },
    sync::RwLock,
};

use log::{
    debug,
    warn,
};

use super::{
    ErrorImpl,
    RoTransactionImpl,
    RwTransactionImpl,
    Snapshot,
};
use crate::backend::common::{
    is_memory_path,
    RecoveryStrategy,
};
use crate::backend::traits::{
    Driver,
    DriverBuilder,
    Readable,
    Writable,
};
use crate::error::StoreError;

/// File name used when the driver is opened on a directory.
const DEFAULT_DB_FILENAME: &str = "data.safe.bin";

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct DriverBuilderImpl {
    make_dir_if_needed: bool,
    corruption_strategy: RecoveryStrategy,
}

impl DriverBuilderImpl {
    /// What `open` does with a file it can't decode. Defaults to
    /// `RecoveryStrategy::Error`.
    pub fn set_corruption_recovery_strategy(&mut self, strategy: RecoveryStrategy) -> &mut Self {
        self.corruption_strategy = strategy;
        self
    }
}

impl DriverBuilder for DriverBuilderImpl {
    type Driver = DriverImpl;

    fn new() -> DriverBuilderImpl {
        DriverBuilderImpl {
            make_dir_if_needed: false,
            corruption_strategy: RecoveryStrategy::default(),
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
        if is_memory_path(path) {
            debug!("Opening in-memory safe mode store");
            return Ok(DriverImpl::new(None, Snapshot::new()));
        }

        let path = self.resolve(path)?;
        let snapshot = match read_from_disk(&path) {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => {
                debug!("No snapshot at {:?}, creating an empty one", path);
                let snapshot = Snapshot::new();
                write_to_disk(&path, &snapshot)?;
                snapshot
            },
            Err(ErrorImpl::BincodeError(e)) => self.recover(&path, e)?,
            Err(e) => return Err(e.into()),
        };

        debug!("Opened safe mode store at {:?} with {} entries", path, snapshot.len());
        Ok(DriverImpl::new(Some(path), snapshot))
    }
}

impl DriverBuilderImpl {
    fn resolve(&self, path: &Path) -> Result<PathBuf, ErrorImpl> {
        if path.is_dir() {
            return Ok(path.join(DEFAULT_DB_FILENAME));
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if !parent.is_dir() {
                if !self.make_dir_if_needed {
                    return Err(ErrorImpl::DirectoryDoesNotExistError(parent.into()));
                }
                fs::create_dir_all(parent)?;
            }
        }
        Ok(path.to_path_buf())
    }

    fn recover(&self, path: &Path, err: bincode::Error) -> Result<Snapshot, ErrorImpl> {
        match self.corruption_strategy {
            RecoveryStrategy::Error => {
                warn!("Couldn't decode snapshot at {:?}: {}", path, err);
                Err(ErrorImpl::FileInvalid(path.into()))
            },
            RecoveryStrategy::Discard => {
                warn!("Discarding undecodable snapshot at {:?}: {}", path, err);
                Ok(Snapshot::new())
            },
            RecoveryStrategy::Rename => {
                let aside = sibling(path, ".corrupt");
                warn!("Moving undecodable snapshot at {:?} to {:?}: {}", path, aside, err);
                fs::rename(path, &aside)?;
                let snapshot = Snapshot::new();
                write_to_disk(path, &snapshot)?;
                Ok(snapshot)
            },
        }
    }
}

/// A store held entirely in memory and, unless opened on `MEMORY`, mirrored
/// to a single file that is rewritten after every write transaction that
/// changes something.
///
/// Read transactions share a lock; write transactions are exclusive and work
/// on a copy of the snapshot, which replaces the live one only once it has
/// been persisted.
#[derive(Debug)]
pub struct DriverImpl {
    path: Option<PathBuf>,
    snapshot: RwLock<Snapshot>,
}

impl DriverImpl {
    pub(crate) fn new(path: Option<PathBuf>, snapshot: Snapshot) -> DriverImpl {
        DriverImpl {
            path,
            snapshot: RwLock::new(snapshot),
        }
    }

    /// The file backing this store, or `None` for an in-memory store.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
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
        // Every commit has already been written out.
        debug!("Closing safe mode store at {:?}", self.path);
        self.snapshot.into_inner().map_err(|_| ErrorImpl::DbPoisonError)?;
        Ok(())
    }

    fn read<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&dyn Readable) -> Result<T, StoreError>,
    {
        let snapshot = self.snapshot.read().map_err(|_| ErrorImpl::DbPoisonError)?;
        f(&RoTransactionImpl::new(&snapshot))
    }

    fn write<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut dyn Writable) -> Result<T, StoreError>,
    {
        let mut snapshot = self.snapshot.write().map_err(|_| ErrorImpl::DbPoisonError)?;
        let mut txn = RwTransactionImpl::new(snapshot.clone());
        let result = f(&mut txn)?;

        if let Some(committed) = txn.commit() {
            if let Some(path) = &self.path {
                write_to_disk(path, &committed)?;
            }
            *snapshot = committed;
        }
        Ok(result)
    }
}

fn read_from_disk(path: &Path) -> Result<Option<Snapshot>, ErrorImpl> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    Snapshot::from_bytes(&bytes).map(Some)
}

/// Writes to a sibling file first and renames it into place, so readers of
/// the file never see a partial snapshot.
fn write_to_disk(path: &Path, snapshot: &Snapshot) -> Result<(), ErrorImpl> {
    let bytes = snapshot.to_bytes()?;
    let tmp = sibling(path, ".tmp");
    if let Err(e) = fs::write(&tmp, bytes).and_then(|()| fs::rename(&tmp, path)) {
        match fs::remove_file(&tmp) {
            Err(cleanup) if cleanup.kind() != io::ErrorKind::NotFound => {
                warn!("Couldn't remove {:?} after a failed write: {}", tmp, cleanup);
            },
            _ => {},
        }
        return Err(e.into());
    }
    debug!("Wrote {} entries to {:?}", snapshot.len(), path);
    Ok(())
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(suffix);
    path.with_file_name(name)
}
