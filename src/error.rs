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
    str,
};

use thiserror::Error;

/// A failure inside an `Encoder`: the value couldn't be turned into bytes, or
/// the stored bytes couldn't be turned back into a value.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("couldn't encode value: {0}")]
    EncodingError(Box<bincode::ErrorKind>),

    #[error("invalid value: {0}")]
    DecodingError(Box<bincode::ErrorKind>),

    #[error("couldn't format value: {0}")]
    FormatError(#[source] fmt::Error),

    #[error("invalid utf-8: {0}")]
    InvalidUtf8(#[from] str::Utf8Error),

    #[error("couldn't parse {value:?}: {reason}")]
    ParseError {
        value: String,
        reason: String,
    },
}

/// The error type of every checked `Map` and `Value` operation.
///
/// Codec failures are tagged with the stage that produced them. Everything
/// else is a transaction failure reported by the driver.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("couldn't encode key: {0}")]
    KeyEncodingError(#[source] DataError),

    #[error("couldn't encode value: {0}")]
    ValueEncodingError(#[source] DataError),

    #[error("couldn't decode key: {0}")]
    KeyDecodingError(#[source] DataError),

    #[error("couldn't decode value: {0}")]
    ValueDecodingError(#[source] DataError),

    #[error("directory does not exist or not a directory: {0:?}")]
    DirectoryDoesNotExistError(PathBuf),

    #[error("driver cannot provide a non-persistent store")]
    InMemoryUnsupported,

    #[error("file is invalid: {0:?}")]
    FileInvalid(PathBuf),

    #[error("database corrupted")]
    DatabaseCorrupted,

    #[error("database poisoned by a panicking transaction")]
    DatabasePoisoned,

    #[error("database map full")]
    MapFull,

    #[error("reader slots full")]
    ReadersFull,

    #[error("I/O error: {0:?}")]
    IoError(#[from] io::Error),

    #[error("backend error: {0}")]
    BackendError(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl StoreError {
    /// Whether a key or value couldn't be serialized.
    pub fn is_encoding(&self) -> bool {
        matches!(self, StoreError::KeyEncodingError(_) | StoreError::ValueEncodingError(_))
    }

    /// Whether stored bytes couldn't be deserialized into the requested type.
    pub fn is_decoding(&self) -> bool {
        matches!(self, StoreError::KeyDecodingError(_) | StoreError::ValueDecodingError(_))
    }

    /// Whether the driver failed to open, run or commit a transaction.
    pub fn is_transaction(&self) -> bool {
        !self.is_encoding() && !self.is_decoding()
    }
}
