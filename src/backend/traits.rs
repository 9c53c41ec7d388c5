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
    ops::ControlFlow,
    path::Path,
};

use crate::error::StoreError;

/// Visitor for `Readable::each`. Returning `ControlFlow::Break(())` ends the
/// walk early without it being reported as a failure.
pub type EachVisitor<'v> = dyn FnMut(&[u8], &[u8]) -> Result<ControlFlow<()>, StoreError> + 'v;

/// Visitor for `Readable::each_key`.
pub type EachKeyVisitor<'v> = dyn FnMut(&[u8]) -> Result<ControlFlow<()>, StoreError> + 'v;

/// The operations available inside any transaction.
pub trait Readable {
    /// Returns the bytes stored under `key`, or `None` if there are none.
    /// The slice borrows from the transaction and must be copied out to
    /// outlive it.
    fn get(&self, key: &[u8]) -> Result<Option<&[u8]>, StoreError>;

    /// Visits every key/value pair in driver-defined order. Stops at the first
    /// `Break` (returning `Ok`) or the first visitor error (returning it).
    fn each(&self, visit: &mut EachVisitor<'_>) -> Result<(), StoreError>;

    /// Like `each`, but only keys are handed out, so drivers may skip loading
    /// values.
    fn each_key(&self, visit: &mut EachKeyVisitor<'_>) -> Result<(), StoreError>;
}

/// The operations available inside a read-write transaction.
pub trait Writable: Readable {
    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), StoreError>;

    /// Removes `key`. Removing a key that isn't there is not an error.
    fn delete(&mut self, key: &[u8]) -> Result<(), StoreError>;
}

/// A transactional, byte-keyed store.
///
/// Transactions only exist for the duration of the callback passed to `read`
/// or `write`, and are atomic and isolated from each other according to the
/// driver's own locking.
pub trait Driver: Sized {
    /// Opens the driver at `path` with default settings. `MEMORY` asks for a
    /// non-persistent store.
    fn open<P>(path: P) -> Result<Self, StoreError>
    where
        P: AsRef<Path>;

    /// Releases the driver. Consuming `self` means nothing can use it after.
    fn close(self) -> Result<(), StoreError>;

    /// Runs `f` inside a read-only transaction and returns what it returns.
    fn read<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&dyn Readable) -> Result<T, StoreError>;

    /// Runs `f` inside a read-write transaction. Its writes are committed
    /// before this returns `Ok`; if `f` fails they are all discarded and its
    /// error is returned.
    fn write<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut dyn Writable) -> Result<T, StoreError>;
}

/// Configures and opens a `Driver`.
pub trait DriverBuilder: Sized {
    type Driver: Driver;

    fn new() -> Self;

    /// Whether `open` should create missing directories on the way to `path`.
    fn set_make_dir_if_needed(&mut self, make_dir_if_needed: bool) -> &mut Self;

    fn open<P>(&self, path: P) -> Result<Self::Driver, StoreError>
    where
        P: AsRef<Path>;
}
