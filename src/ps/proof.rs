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
    credential::Credential,
    keys::PSPublicKey,
    zkpok::{Showing, ZKPoK},
};
use crate::{
    errors::Error,
    ps::ciphersuites::PSCiphersuite,
    utils::{
        message::ps_attribute::{AttributeMap, PSAttribute},
        util::ps_utils::{
            check_indexes, g1_to_bytes, get_remaining_indexes, gt_hex, gt_to_bytes, random_nonzero_scalar, ByteReader,
        },
    },
};
use bls12_381_plus::{pairing, G1Projective, Gt, Scalar};
use ff::Field;
use group::Curve;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};

/// Proof of possession of a credential, disclosing a subset of its attributes.
/// Every showing re-randomizes the signature, so two proofs over the same credential
/// can not be linked.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct DisclosureProof {
    pub(crate) sigma1: G1Projective,
    pub(crate) sigma2: G1Projective,
    #[serde(with = "gt_hex")]
    pub(crate) commitment: Gt,
    pub(crate) proof: ZKPoK<Showing>,
}

impl DisclosureProof {
    /// # Description
    /// Holder side of the selective disclosure. Re-randomizes the credential signature as
    /// `(s1^r, (s2 * s1^t')^r)`, commits in GT to the hidden attributes and `t'`, and proves
    /// knowledge of the opening bound to `message`.
    ///
    /// # Inputs:
    /// * `pk` (REQUIRED), the issuer public key.
    /// * `credential` (REQUIRED), the holder [`Credential`].
    /// * `hidden_indexes` (REQUIRED), strictly increasing indexes of the attributes to hide.
    ///                                It must contain every index hidden at issuance.
    /// * `message` (REQUIRED), an octet string the proof is bound to (may be empty).
    /// * `rng` (REQUIRED), a cryptographically secure random number generator.
    ///
    /// # Output:
    /// a [`DisclosureProof`] or [`Error`].
    ///
    pub fn prove<CS, R>(
        pk: &PSPublicKey,
        credential: &Credential,
        hidden_indexes: &[usize],
        message: &[u8],
        rng: &mut R,
    ) -> Result<Self, Error>
    where
        CS: PSCiphersuite,
        R: RngCore + CryptoRng,
    {
        pk.check()?;
        let L = pk.attribute_count();

        if credential.attributes.len() != L {
            return Err(Error::ProofGenError("credential does not match the public key".to_owned()));
        }

        if !check_indexes(L, hidden_indexes) {
            return Err(Error::ProofGenError("invalid hidden indexes".to_owned()));
        }

        if credential.hidden_indexes.iter().any(|i| !hidden_indexes.contains(i)) {
            return Err(Error::ProofGenError("an attribute hidden at issuance can not be disclosed".to_owned()));
        }

        let hidden_attributes: Vec<Vec<u8>> = hidden_indexes
            .iter()
            .map(|&i| credential.attributes[i].clone())
            .collect();
        let hidden_scalars = PSAttribute::attributes_to_scalar::<CS>(&hidden_attributes)?;

        let r = random_nonzero_scalar(rng);
        let t = Scalar::random(&mut *rng);

        let sigma = credential.signature;
        let sigma1 = sigma.sigma1 * r;
        let sigma2 = (sigma.sigma2 + sigma.sigma1 * t) * r;

        let generators = showing_generators(pk, &sigma1, hidden_indexes);
        let mut secrets: Vec<Scalar> = hidden_scalars.iter().map(|a| a.value).collect();
        secrets.push(t);

        let commitment = generators
            .iter()
            .zip(secrets.iter())
            .fold(Gt::IDENTITY, |acc, (g, s)| acc + g * s);

        let proof = ZKPoK::<Showing>::prove::<CS, R>(&secrets, &generators, &commitment, message, rng)?;

        log::debug!("disclosure proof hiding {} of {} attribute(s)", hidden_indexes.len(), L);

        Ok(Self { sigma1, sigma2, commitment, proof })
    }

    /// # Description
    /// Verifier side of the selective disclosure. Recomputes
    /// `Commit' = e(s2', g2) / e(s1', X2 * prod(Y2_i^a_i))` over the disclosed attributes,
    /// requires it to equal the proof commitment, then checks the proof of knowledge
    /// for the remaining indexes and `message`.
    ///
    /// # Inputs:
    /// * `pk` (REQUIRED), the issuer public key.
    /// * `disclosed_attributes` (REQUIRED), the disclosed attributes, keyed by index.
    /// * `message` (REQUIRED), the octet string the proof must be bound to.
    ///
    /// # Output:
    /// a result: [`Ok`] or [`Error`].
    ///
    pub fn verify<CS>(
        &self,
        pk: &PSPublicKey,
        disclosed_attributes: &AttributeMap,
        message: &[u8],
    ) -> Result<(), Error>
    where
        CS: PSCiphersuite,
    {
        pk.check()?;

        if self.sigma1.is_identity().into() {
            return Err(Error::G1IdentityError);
        }

        let L = pk.attribute_count();
        let (disclosed_indexes, disclosed_scalars) = PSAttribute::attribute_map_to_scalar::<CS>(disclosed_attributes)?;

        if !check_indexes(L, &disclosed_indexes) {
            return Err(Error::PoKSVerificationError("invalid disclosed indexes".to_owned()));
        }

        let A = disclosed_indexes
            .iter()
            .zip(disclosed_scalars.iter())
            .fold(pk.X2, |acc, (&i, a)| acc + pk.Y2[i] * a.value);

        let expected_commitment =
            pairing(&self.sigma2.to_affine(), &pk.g2.to_affine()) - pairing(&self.sigma1.to_affine(), &A.to_affine());

        if expected_commitment != self.commitment {
            return Err(Error::PoKSVerificationError("commitment mismatch".to_owned()));
        }

        let hidden_indexes = get_remaining_indexes(L, &disclosed_indexes);
        let generators = showing_generators(pk, &self.sigma1, &hidden_indexes);

        self.proof.verify::<CS>(&generators, &self.commitment, message)
    }

    pub fn sigma1(&self) -> G1Projective {
        self.sigma1
    }

    pub fn sigma2(&self) -> G1Projective {
        self.sigma2
    }

    pub fn commitment(&self) -> Gt {
        self.commitment
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes: Vec<u8> = Vec::new();
        bytes.extend_from_slice(&g1_to_bytes(&self.sigma1));
        bytes.extend_from_slice(&g1_to_bytes(&self.sigma2));
        bytes.extend_from_slice(&gt_to_bytes(&self.commitment));
        bytes.extend_from_slice(&self.proof.to_bytes());
        bytes
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let mut reader = ByteReader::new(bytes);
        let sigma1 = reader.take_g1()?;
        let sigma2 = reader.take_g1()?;
        let commitment = reader.take_gt()?;
        let proof = ZKPoK::<Showing>::read(&mut reader)?;
        reader.finish()?;
        Ok(Self { sigma1, sigma2, commitment, proof })
    }
}

/// `e(s1', Y2_i)` for the hidden indexes in ascending order,
/// then `e(s1', g2)` for the blinding factor
fn showing_generators(pk: &PSPublicKey, sigma1: &G1Projective, hidden_indexes: &[usize]) -> Vec<Gt> {
    let sigma1 = sigma1.to_affine();
    let mut generators: Vec<Gt> = hidden_indexes
        .iter()
        .map(|&i| pairing(&sigma1, &pk.Y2[i].to_affine()))
        .collect();
    generators.push(pairing(&sigma1, &pk.g2.to_affine()));
    generators
}
