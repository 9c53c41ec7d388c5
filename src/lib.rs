// Copyright 2018-2019 Mozilla
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not use
// this file except in compliance with the License. You may obtain a copy of the
// License at http://www.apache.org/licenses/LICENSE-2.0
// Unless required by applicable law or agreed to in writing, software distributed
// under the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR
// CONDITIONS OF ANY KIND, either express or implied. See the License for the
// specific language governing permissions and limitations under the License.

//! A typed, transactional persistent map.
//!
//! A [`Map`] turns keys and values into bytes with a pair of [`Encoder`]s and
//! stores them through a [`Driver`](backend::Driver), running each operation
//! in a single driver transaction. Two drivers are provided:
//!
//! * [`SafeMode`](backend::SafeMode) keeps the whole map in memory and
//!   rewrites a single bincode file on every commit that changed something.
//! * `Lmdb`, behind the `lmdb` feature, uses an LMDB environment.
//!
//! Passing [`MEMORY`](backend::MEMORY) as the path opens a store that is never
//! written to disk.
//!
//! [`Value`] is a map used with one constant key, and [`MustMap`] and
//! [`MustValue`] panic where the others would return a [`StoreError`].
//!
//! ## Basic Usage
//! ```
//! use persist::{Map, StoreError};
//! use tempfile::Builder;
//!
//! # fn main() -> Result<(), StoreError> {
//! let root = Builder::new().prefix("simple-map").tempdir()?;
//! let path = root.path().join("map.bin");
//!
//! let map: Map<String, u64> = Map::open(&path)?;
//! map.store(&"apples".to_string(), &3)?;
//! assert_eq!(map.load(&"apples".to_string())?, Some(3));
//! assert_eq!(map.load(&"pears".to_string())?, None);
//!
//! // The first stored value wins.
//! assert_eq!(map.load_or_store(&"apples".to_string(), 5)?, (3, true));
//! map.close()?;
//!
//! // Everything written above is still there after reopening.
//! let map: Map<String, u64> = Map::open(&path)?;
//! assert_eq!(map.all().to_vec()?, vec![("apples".to_string(), 3)]);
//! # Ok(())
//! # }
//! ```

pub mod backend;
mod encoder;
mod error;
mod map;
mod must;
mod value;

pub use encoder::{
    BincodeEncoder,
    BytesEncoder,
    DisplayEncoder,
    Encoder,
    EncoderPair,
    StrEncoder,
};
pub use error::{
    DataError,
    StoreError,
};
pub use map::{
    Entries,
    Keys,
    Map,
};
pub use must::{
    MustMap,
    MustValue,
};
pub use value::{
    Value,
    ValueKey,
    VALUE_KEY,
};
