// Copyright 2023 Fondazione LINKS

// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at

//     http://www.apache.org/licenses/LICENSE-2.0

// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Byte-oriented subscription service on top of the credential protocol.
//!
//! Users register a set of subscriptions with the server and later authenticate location requests
//! anonymously, revealing only the subscriptions a request needs. Every value crossing the
//! client/server boundary is JSON encoded with `serde_json`.
//!
//! Attribute layout for a server offering `n` subscriptions (`L = n + 1`):
//! - index `0`: a random user secret, always hidden;
//! - index `i` in `1..=n`: the name of subscription `i - 1` when the user holds it, the empty string otherwise.

pub mod client;
pub mod server;

use crate::{errors::Error, ps::keys::PSPublicKey};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Public parameters published by the server
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct ServicePublicKey {
    pub subscriptions: Vec<String>,
    pub pk: PSPublicKey,
}

impl ServicePublicKey {
    /// Attribute index carrying `subscription`
    pub fn attribute_index(&self, subscription: &str) -> Result<usize, Error> {
        self.subscriptions
            .iter()
            .position(|s| s == subscription)
            .map(|i| i + 1)
            .ok_or_else(|| Error::ServiceError(format!("unknown subscription {subscription}")))
    }

    /// Indexes of `subscriptions`, sorted and deduplicated
    pub(crate) fn attribute_indexes(&self, subscriptions: &[String]) -> Result<Vec<usize>, Error> {
        let mut indexes = subscriptions
            .iter()
            .map(|s| self.attribute_index(s))
            .collect::<Result<Vec<_>, _>>()?;
        indexes.sort_unstable();
        indexes.dedup();
        Ok(indexes)
    }
}

pub(crate) fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, Error> {
    serde_json::to_vec(value).map_err(|e| Error::ServiceError(e.to_string()))
}

pub(crate) fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, Error> {
    serde_json::from_slice(bytes).map_err(|e| Error::DeserializationError(e.to_string()))
}
