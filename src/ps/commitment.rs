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

use super::{
    keys::PSPublicKey,
    zkpok::{Issuance, ZKPoK},
};
use crate::{
    errors::Error,
    ps::ciphersuites::PSCiphersuite,
    utils::{
        message::ps_attribute::{AttributeMap, PSAttribute},
        util::ps_utils::{check_indexes, g1_to_bytes, i2osp, ByteReader},
    },
};
use bls12_381_plus::{G1Projective, Scalar};
use ff::Field;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};

/// Message sent by the holder to open a blind issuance
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct IssueRequest {
    pub(crate) commitment: G1Projective,
    pub(crate) hidden_indexes: Vec<usize>,
    pub(crate) proof: ZKPoK<Issuance>,
}

/// Holder private state of one issuance run. Never sent on the wire.
#[derive(Debug)]
pub struct IssuanceState {
    pub(crate) t: Scalar,
    pub(crate) hidden_attributes: AttributeMap,
}

impl IssuanceState {
    pub fn hidden_attributes(&self) -> &AttributeMap {
        &self.hidden_attributes
    }
}

impl IssueRequest {
    /// # Description
    /// Holder side of the blind issuance: commits to the hidden attributes as
    /// `C = g1^t * prod(Y1_i^a_i)` and proves knowledge of the opening.
    ///
    /// # Inputs:
    /// * `pk` (REQUIRED), the issuer public key.
    /// * `hidden_attributes` (REQUIRED), the attributes to hide, keyed by index.
    /// * `rng` (REQUIRED), a cryptographically secure random number generator.
    ///
    /// # Output:
    /// ([`IssueRequest`], [`IssuanceState`]), a tuple (**`request`**, **`state`**) or [`Error`].
    ///
    pub fn new<CS, R>(
        pk: &PSPublicKey,
        hidden_attributes: &AttributeMap,
        rng: &mut R,
    ) -> Result<(Self, IssuanceState), Error>
    where
        CS: PSCiphersuite,
        R: RngCore + CryptoRng,
    {
        let (hidden_indexes, hidden_scalars) = PSAttribute::attribute_map_to_scalar::<CS>(hidden_attributes)?;

        if !check_indexes(pk.attribute_count(), &hidden_indexes) {
            return Err(Error::InvalidAttributePartition);
        }

        let t = Scalar::random(&mut *rng);

        let (secrets, generators) = issuance_statement(pk, &hidden_indexes, &hidden_scalars, t);
        let commitment = generators
            .iter()
            .zip(secrets.iter())
            .fold(G1Projective::IDENTITY, |acc, (g, s)| acc + g * s);

        let proof = ZKPoK::<Issuance>::prove::<CS, R>(&secrets, &generators, &commitment, &[], rng)?;

        log::debug!("issue request over {} hidden attribute(s)", hidden_indexes.len());

        Ok((
            Self { commitment, hidden_indexes, proof },
            IssuanceState { t, hidden_attributes: hidden_attributes.clone() },
        ))
    }

    /// Verifies the proof of knowledge of the commitment opening
    pub fn verify<CS: PSCiphersuite>(&self, pk: &PSPublicKey) -> Result<(), Error> {
        if !check_indexes(pk.attribute_count(), &self.hidden_indexes) {
            return Err(Error::InvalidAttributePartition);
        }

        let generators = issuance_generators(pk, &self.hidden_indexes);

        self.proof
            .verify::<CS>(&generators, &self.commitment, &[])
            .map_err(|_| Error::InvalidCommitmentProof)
    }

    pub fn commitment(&self) -> G1Projective {
        self.commitment
    }

    pub fn hidden_indexes(&self) -> &[usize] {
        &self.hidden_indexes
    }

    pub fn proof(&self) -> &ZKPoK<Issuance> {
        &self.proof
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes: Vec<u8> = Vec::new();
        bytes.extend_from_slice(&g1_to_bytes(&self.commitment));
        bytes.extend_from_slice(&i2osp(self.hidden_indexes.len(), 8));
        self.hidden_indexes
            .iter()
            .for_each(|i| bytes.extend_from_slice(&i2osp(*i, 8)));
        bytes.extend_from_slice(&self.proof.to_bytes());
        bytes
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let mut reader = ByteReader::new(bytes);
        let commitment = reader.take_g1()?;
        let h = reader.take_count(8)?;
        let hidden_indexes = (0..h).map(|_| reader.take_usize()).collect::<Result<Vec<_>, _>>()?;
        let proof = ZKPoK::<Issuance>::read(&mut reader)?;
        reader.finish()?;
        Ok(Self { commitment, hidden_indexes, proof })
    }
}

/// Generators `Y1_i` for the hidden indexes in ascending order, then `g1` for the blinding factor
fn issuance_generators(pk: &PSPublicKey, hidden_indexes: &[usize]) -> Vec<G1Projective> {
    let mut generators: Vec<G1Projective> = hidden_indexes.iter().map(|&i| pk.Y1[i]).collect();
    generators.push(pk.g1);
    generators
}

fn issuance_statement(
    pk: &PSPublicKey,
    hidden_indexes: &[usize],
    hidden_scalars: &[PSAttribute],
    t: Scalar,
) -> (Vec<Scalar>, Vec<G1Projective>) {
    let mut secrets: Vec<Scalar> = hidden_scalars.iter().map(|a| a.value).collect();
    secrets.push(t);
    (secrets, issuance_generators(pk, hidden_indexes))
}
