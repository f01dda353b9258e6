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

//! Non-interactive proof of knowledge of an opening of a generalized Pedersen commitment
//! `C = g_1^s_1 * ... * g_k^s_k`, made non-interactive with the Fiat-Shamir transform.
//!
//! 1. Prover samples `r_1, ..., r_k` and computes `R = g_1^r_1 * ... * g_k^r_k`.
//! 2. Prover computes `c = H(R || C || message || g_1 || ... || g_k)`.
//! 3. Prover responds with `s_i' = r_i - c * s_i` and sends `(c, s_1', ..., s_k')`.
//! 4. Verifier recomputes `R' = C^c * g_1^s_1' * ... * g_k^s_k'` and accepts iff `H(R' || ...) == c`.
//!
//! The group the commitment lives in is fixed by a [`Relation`]: [`Issuance`] proofs are over G1,
//! [`Showing`] proofs are over GT. A proof produced for one relation can not be checked against
//! the other, and the two use distinct challenge domain separation tags.

use crate::{
    errors::Error,
    ps::ciphersuites::PSCiphersuite,
    utils::util::ps_utils::{
        calculate_random_scalars, g1_to_bytes, gt_to_bytes, hash_to_scalar, i2osp, ByteReader, ScalarExt,
    },
};
use bls12_381_plus::{G1Projective, Gt, Scalar};
use core::{
    marker::PhantomData,
    ops::{Add, Mul},
};
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};

/// Prime order group in which commitments and generators of a proof live
pub trait ProofGroup: Copy + PartialEq + Add<Output = Self> + Mul<Scalar, Output = Self> {
    const IDENTITY: Self;
    fn to_canonical_bytes(&self) -> Vec<u8>;
}

impl ProofGroup for G1Projective {
    const IDENTITY: Self = G1Projective::IDENTITY;

    fn to_canonical_bytes(&self) -> Vec<u8> {
        g1_to_bytes(self).to_vec()
    }
}

impl ProofGroup for Gt {
    const IDENTITY: Self = Gt::IDENTITY;

    fn to_canonical_bytes(&self) -> Vec<u8> {
        gt_to_bytes(self).to_vec()
    }
}

/// The statement being proven: which group, and which domain separation tag for the challenge
pub trait Relation: 'static {
    type Element: ProofGroup;
    const TAG: &'static [u8];
}

/// Blind issuance: knowledge of hidden attributes and blinding factor `t` in `C = g1^t * prod(Y1_i^a_i)`
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Issuance;

/// Credential showing: knowledge of hidden attributes and `t'` in
/// `Commit = e(s1', g2)^t' * prod(e(s1', Y2_i)^a_i)`
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Showing;

impl Relation for Issuance {
    type Element = G1Projective;
    const TAG: &'static [u8] = b"ISSUANCE_";
}

impl Relation for Showing {
    type Element = Gt;
    const TAG: &'static [u8] = b"SHOWING_";
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct ZKPoK<R: Relation> {
    challenge: Scalar,
    responses: Vec<Scalar>,
    #[serde(skip)]
    _relation: PhantomData<R>,
}

impl<R: Relation> ZKPoK<R> {
    /// # Description
    /// Proves knowledge of `secrets` such that `commitment = prod(generators_i^secrets_i)`.
    ///
    /// # Inputs:
    /// * `secrets` (REQUIRED), the witnesses `s_1, ..., s_k`.
    /// * `generators` (REQUIRED), the bases `g_1, ..., g_k`, in the same order as `secrets`.
    /// * `commitment` (REQUIRED), the commitment `C`.
    /// * `message` (REQUIRED), an octet string the proof is bound to (may be empty).
    /// * `rng` (REQUIRED), a cryptographically secure random number generator.
    ///
    /// # Output:
    /// a [`ZKPoK`] or [`Error`].
    ///
    pub fn prove<CS, Rng>(
        secrets: &[Scalar],
        generators: &[R::Element],
        commitment: &R::Element,
        message: &[u8],
        rng: &mut Rng,
    ) -> Result<Self, Error>
    where
        CS: PSCiphersuite,
        Rng: RngCore + CryptoRng,
    {
        if secrets.len() != generators.len() {
            return Err(Error::InvalidNumberOfGenerators);
        }

        let blindings = calculate_random_scalars(rng, secrets.len());

        let R_commit = multi_exp::<R>(generators, &blindings);

        let challenge = calculate_challenge::<CS, R>(&R_commit, commitment, message, generators)?;

        let responses = blindings
            .iter()
            .zip(secrets.iter())
            .map(|(r, s)| r - challenge * s)
            .collect();

        Ok(Self { challenge, responses, _relation: PhantomData })
    }

    /// # Description
    /// Verifies the proof against the same generator list, commitment and message used by the prover.
    ///
    /// # Output:
    /// a result: [`Ok`] or [`Error::InvalidProofOfKnowledge`].
    ///
    pub fn verify<CS>(
        &self,
        generators: &[R::Element],
        commitment: &R::Element,
        message: &[u8],
    ) -> Result<(), Error>
    where
        CS: PSCiphersuite,
    {
        if self.responses.len() != generators.len() {
            return Err(Error::InvalidNumberOfGenerators);
        }

        let R_commit = *commitment * self.challenge + multi_exp::<R>(generators, &self.responses);

        let challenge = calculate_challenge::<CS, R>(&R_commit, commitment, message, generators)?;

        if challenge == self.challenge {
            Ok(())
        } else {
            Err(Error::InvalidProofOfKnowledge)
        }
    }

    pub fn challenge(&self) -> Scalar {
        self.challenge
    }

    pub fn responses(&self) -> &[Scalar] {
        &self.responses
    }

    // challenge || I2OSP(k, 8) || responses
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes: Vec<u8> = Vec::new();
        bytes.extend_from_slice(&self.challenge.to_bytes_be());
        bytes.extend_from_slice(&i2osp(self.responses.len(), 8));
        self.responses.iter().for_each(|s| bytes.extend_from_slice(&s.to_bytes_be()));
        bytes
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let mut reader = ByteReader::new(bytes);
        let proof = Self::read(&mut reader)?;
        reader.finish()?;
        Ok(proof)
    }

    pub(crate) fn read(reader: &mut ByteReader<'_>) -> Result<Self, Error> {
        let challenge = reader.take_scalar()?;
        let k = reader.take_count(Scalar::BYTES)?;
        let responses = (0..k).map(|_| reader.take_scalar()).collect::<Result<Vec<_>, _>>()?;
        Ok(Self { challenge, responses, _relation: PhantomData })
    }

    #[cfg(test)]
    pub(crate) fn responses_mut(&mut self) -> &mut Vec<Scalar> {
        &mut self.responses
    }
}

fn multi_exp<R: Relation>(generators: &[R::Element], scalars: &[Scalar]) -> R::Element {
    generators
        .iter()
        .zip(scalars.iter())
        .fold(<R::Element as ProofGroup>::IDENTITY, |acc, (g, s)| acc + *g * *s)
}

/// c = hash_to_scalar(R || C || I2OSP(len(message), 8) || message || I2OSP(k, 8) || g_1 || ... || g_k, challenge_dst)
fn calculate_challenge<CS, R>(
    R_commit: &R::Element,
    commitment: &R::Element,
    message: &[u8],
    generators: &[R::Element],
) -> Result<Scalar, Error>
where
    CS: PSCiphersuite,
    R: Relation,
{
    let challenge_dst = CS::challenge_dst(R::TAG);

    let mut c_arr: Vec<u8> = Vec::new();
    c_arr.extend_from_slice(&R_commit.to_canonical_bytes());
    c_arr.extend_from_slice(&commitment.to_canonical_bytes());
    c_arr.extend_from_slice(&i2osp(message.len(), 8));
    c_arr.extend_from_slice(message);
    c_arr.extend_from_slice(&i2osp(generators.len(), 8));
    generators.iter().for_each(|g| c_arr.extend_from_slice(&g.to_canonical_bytes()));

    hash_to_scalar::<CS>(&c_arr, &challenge_dst)
}
