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
    fmt,
    io,
    path::PathBuf,
};

use crate::error::StoreError;

#[derive(Debug)]
pub enum ErrorImpl {
    LmdbError(lmdb::Error),
    DirectoryDoesNotExistError(PathBuf),
    InMemoryUnsupported,
    IoError(io::Error),
}

impl std::error::Error for ErrorImpl {}

impl fmt::Display for ErrorImpl {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ErrorImpl::LmdbError(e) => e.fmt(fmt),
            ErrorImpl::DirectoryDoesNotExistError(path) => write!(fmt, "DirectoryDoesNotExistError (lmdb): {:?}", path),
            ErrorImpl::InMemoryUnsupported => write!(fmt, "InMemoryUnsupported (lmdb)"),
            ErrorImpl::IoError(e) => e.fmt(fmt),
        }
    }
}

impl From<ErrorImpl> for StoreError {
    fn from(e: ErrorImpl) -> StoreError {
        match e {
            ErrorImpl::LmdbError(lmdb::Error::Corrupted) => StoreError::DatabaseCorrupted,
            ErrorImpl::LmdbError(lmdb::Error::Panic) => StoreError::DatabaseCorrupted,
            ErrorImpl::LmdbError(lmdb::Error::MapFull) => StoreError::MapFull,
            ErrorImpl::LmdbError(lmdb::Error::ReadersFull) => StoreError::ReadersFull,
            ErrorImpl::LmdbError(error) => StoreError::BackendError(Box::new(error)),
            ErrorImpl::DirectoryDoesNotExistError(path) => StoreError::DirectoryDoesNotExistError(path),
            ErrorImpl::InMemoryUnsupported => StoreError::InMemoryUnsupported,
            ErrorImpl::IoError(error) => StoreError::IoError(error),
        }
    }
}

impl From<lmdb::Error> for ErrorImpl {
    fn from(e: lmdb::Error) -> ErrorImpl {
        ErrorImpl::LmdbError(e)
    }
}

impl From<io::Error> for ErrorImpl {
    fn from(e: io::Error) -> ErrorImpl {
        ErrorImpl::IoError(e)
    }
}
