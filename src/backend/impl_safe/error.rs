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
    DbPoisonError,
    DirectoryDoesNotExistError(PathBuf),
    FileInvalid(PathBuf),
    IoError(io::Error),
    BincodeError(bincode::Error),
}

impl std::error::Error for ErrorImpl {}

impl fmt::Display for ErrorImpl {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ErrorImpl::DbPoisonError => write!(fmt, "DbPoisonError (safe mode)"),
            ErrorImpl::DirectoryDoesNotExistError(path) => write!(fmt, "DirectoryDoesNotExistError (safe mode): {:?}", path),
            ErrorImpl::FileInvalid(path) => write!(fmt, "FileInvalid (safe mode): {:?}", path),
            ErrorImpl::IoError(e) => e.fmt(fmt),
            ErrorImpl::BincodeError(e) => e.fmt(fmt),
        }
    }
}

impl From<ErrorImpl> for StoreError {
    fn from(e: ErrorImpl) -> StoreError {
        match e {
            ErrorImpl::DbPoisonError => StoreError::DatabasePoisoned,
            ErrorImpl::DirectoryDoesNotExistError(path) => StoreError::DirectoryDoesNotExistError(path),
            ErrorImpl::FileInvalid(path) => StoreError::FileInvalid(path),
            ErrorImpl::IoError(e) => StoreError::IoError(e),
            ErrorImpl::BincodeError(e) => StoreError::BackendError(e),
        }
    }
}

impl From<io::Error> for ErrorImpl {
    fn from(e: io::Error) -> ErrorImpl {
        ErrorImpl::IoError(e)
    }
}

impl From<bincode::Error> for ErrorImpl {
    fn from(e: bincode::Error) -> ErrorImpl {
        ErrorImpl::BincodeError(e)
    }
}
