// Copyright 2018-2019 Mozilla
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not use
// this file except in compliance with the License. You may obtain a copy of the
// License at http://www.apache.org/licenses/LICENSE-2.0
// Unless required by applicable law or agreed to in writing, software distributed
// under the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR
// CONDITIONS OF ANY KIND, either express or implied. See the License for the
// specific language governing permissions and limitations under the License.

use std::path::Path;

/// Opening a driver at this path must give a non-persistent, in-memory store.
/// Drivers that can't do that fail to open instead.
pub const MEMORY: &str = ":memory:";

pub(crate) fn is_memory_path(path: &Path) -> bool {
    path == Path::new(MEMORY)
}

/// What to do when a driver finds its on-disk data unreadable at open time.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum RecoveryStrategy {
    /// Fail to open.
    Error,

    /// Start with an empty store; the unreadable data is overwritten by the
    /// next write.
    Discard,

    /// Move the unreadable file aside to `<name>.corrupt`, then start empty.
    Rename,
}

impl Default for RecoveryStrategy {
    fn default() -> RecoveryStrategy {
        RecoveryStrategy::Error
    }
}
