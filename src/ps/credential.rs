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

use super::{keys::PSPublicKey, signature::PSSignature};
use crate::{
    errors::Error,
    ps::ciphersuites::PSCiphersuite,
    utils::{
        message::ps_attribute::AttributeMap,
        util::ps_utils::{check_indexes, i2osp, ByteReader},
    },
};
use serde::{Deserialize, Serialize};

/// An unblinded signature together with the full attribute vector it signs, and the
/// indexes that were hidden from the issuer.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Credential {
    pub(crate) signature: PSSignature,
    pub(crate) attributes: Vec<Vec<u8>>,
    pub(crate) hidden_indexes: Vec<usize>,
}

impl Credential {
    pub fn signature(&self) -> &PSSignature {
        &self.signature
    }

    pub fn attributes(&self) -> &[Vec<u8>] {
        &self.attributes
    }

    /// Indexes hidden at issuance. They stay hidden at every showing.
    pub fn hidden_indexes(&self) -> &[usize] {
        &self.hidden_indexes
    }

    /// Attributes at `indexes`, keyed by index. Indexes past the end are skipped.
    pub fn select(&self, indexes: &[usize]) -> AttributeMap {
        indexes
            .iter()
            .filter_map(|&i| self.attributes.get(i).map(|a| (i, a.clone())))
            .collect()
    }

    pub fn verify<CS: PSCiphersuite>(&self, pk: &PSPublicKey) -> Result<(), Error> {
        self.signature.verify::<CS>(pk, &self.attributes)
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes: Vec<u8> = Vec::new();
        bytes.extend_from_slice(&self.signature.to_bytes());
        bytes.extend_from_slice(&i2osp(self.attributes.len(), 8));
        self.attributes.iter().for_each(|a| {
            bytes.extend_from_slice(&i2osp(a.len(), 8));
            bytes.extend_from_slice(a);
        });
        bytes.extend_from_slice(&i2osp(self.hidden_indexes.len(), 8));
        self.hidden_indexes
            .iter()
            .for_each(|i| bytes.extend_from_slice(&i2osp(*i, 8)));
        bytes
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let mut reader = ByteReader::new(bytes);
        let signature = PSSignature::from_bytes(reader.take(PSSignature::BYTES)?)?;

        let L = reader.take_count(8)?;
        let mut attributes = Vec::with_capacity(L);
        for _ in 0..L {
            let len = reader.take_count(1)?;
            attributes.push(reader.take(len)?.to_vec());
        }

        let h = reader.take_count(8)?;
        let hidden_indexes = (0..h).map(|_| reader.take_usize()).collect::<Result<Vec<_>, _>>()?;
        reader.finish()?;

        if !check_indexes(L, &hidden_indexes) {
            return Err(Error::DeserializationError("credential hidden indexes".to_owned()));
        }

        Ok(Self { signature, attributes, hidden_indexes })
    }
}
