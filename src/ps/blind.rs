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
    commitment::{IssuanceState, IssueRequest},
    credential::Credential,
    keys::{PSPublicKey, PSSecretKey},
    signature::{core_verify, PSSignature},
};
use crate::{
    errors::Error,
    ps::ciphersuites::PSCiphersuite,
    utils::{
        message::ps_attribute::{AttributeMap, PSAttribute},
        util::ps_utils::{g1_to_bytes, is_partition, random_nonzero_scalar, ByteReader},
    },
};
use bls12_381_plus::G1Projective;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};

/// Signature over a committed attribute vector, still blinded by the holder factor `t`
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct PSBlindSignature {
    pub(crate) sigma1: G1Projective,
    pub(crate) sigma2: G1Projective,
}

impl PSBlindSignature {
    pub const BYTES: usize = 96;

    /// # Description
    /// Issuer side of the blind issuance. The disclosed and hidden index sets must partition
    /// `0..L` and the commitment proof must verify, otherwise nothing is signed.
    /// Returns `(g1^u, (X1 * C * prod(Y1_i^a_i))^u)` over the disclosed attributes.
    ///
    /// # Inputs:
    /// * `sk` (REQUIRED), the issuer secret key.
    /// * `pk` (REQUIRED), the issuer public key.
    /// * `request` (REQUIRED), the holder [`IssueRequest`].
    /// * `disclosed_attributes` (REQUIRED), the attributes known to the issuer, keyed by index.
    /// * `rng` (REQUIRED), a cryptographically secure random number generator.
    ///
    /// # Output:
    /// a [`PSBlindSignature`] or [`Error`].
    ///
    pub fn blind_sign<CS, R>(
        sk: &PSSecretKey,
        pk: &PSPublicKey,
        request: &IssueRequest,
        disclosed_attributes: &AttributeMap,
        rng: &mut R,
    ) -> Result<Self, Error>
    where
        CS: PSCiphersuite,
        R: RngCore + CryptoRng,
    {
        let L = pk.attribute_count();
        if sk.attribute_count() != L {
            return Err(Error::BlindSignError("secret and public key sizes differ".to_owned()));
        }

        let (disclosed_indexes, disclosed_scalars) = PSAttribute::attribute_map_to_scalar::<CS>(disclosed_attributes)?;

        if !is_partition(L, &disclosed_indexes, request.hidden_indexes()) {
            return Err(Error::InvalidAttributePartition);
        }

        request.verify::<CS>(pk)?;

        let prod = disclosed_indexes
            .iter()
            .zip(disclosed_scalars.iter())
            .fold(sk.X1 + request.commitment(), |acc, (&i, a)| acc + pk.Y1[i] * a.value);

        let u = random_nonzero_scalar(rng);

        log::debug!("blind signature over {} disclosed attribute(s)", disclosed_indexes.len());

        Ok(Self { sigma1: pk.g1 * u, sigma2: prod * u })
    }

    /// # Description
    /// Holder side of the blind issuance: removes the blinding factor, rebuilds the full
    /// attribute vector and checks the resulting signature. Consumes the issuance state.
    ///
    /// # Inputs:
    /// * `pk` (REQUIRED), the issuer public key.
    /// * `state` (REQUIRED), the [`IssuanceState`] returned together with the request.
    /// * `disclosed_attributes` (REQUIRED), the attributes disclosed to the issuer, keyed by index.
    ///
    /// # Output:
    /// a [`Credential`] or [`Error::InvalidCredential`].
    ///
    pub fn unblind<CS>(
        &self,
        pk: &PSPublicKey,
        state: IssuanceState,
        disclosed_attributes: &AttributeMap,
    ) -> Result<Credential, Error>
    where
        CS: PSCiphersuite,
    {
        let L = pk.attribute_count();
        let hidden_indexes: Vec<usize> = state.hidden_attributes.keys().copied().collect();
        let disclosed_indexes: Vec<usize> = disclosed_attributes.keys().copied().collect();

        if !is_partition(L, &disclosed_indexes, &hidden_indexes) {
            return Err(Error::InvalidAttributePartition);
        }

        let signature = PSSignature { sigma1: self.sigma1, sigma2: self.sigma2 - self.sigma1 * state.t };

        let mut merged = state.hidden_attributes;
        merged.extend(disclosed_attributes.iter().map(|(&i, a)| (i, a.clone())));
        let attributes: Vec<Vec<u8>> = merged.into_values().collect();

        let attribute_scalars = PSAttribute::attributes_to_scalar::<CS>(&attributes)?;
        core_verify(pk, &signature, &attribute_scalars).map_err(|_| Error::InvalidCredential)?;

        Ok(Credential { signature, attributes, hidden_indexes })
    }

    pub fn to_bytes(&self) -> [u8; Self::BYTES] {
        let mut bytes = [0u8; Self::BYTES];
        bytes[0..48].copy_from_slice(&g1_to_bytes(&self.sigma1));
        bytes[48..96].copy_from_slice(&g1_to_bytes(&self.sigma2));
        bytes
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self, Error> {
        let mut reader = ByteReader::new(data);
        let sigma1 = reader.take_g1()?;
        let sigma2 = reader.take_g1()?;
        reader.finish()?;
        Ok(Self { sigma1, sigma2 })
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        errors::Error,
        keys::pair::KeyPair,
        ps::{blind::PSBlindSignature, commitment::IssueRequest},
        schemes::algorithms::{PsBls12381Sha256, PsBls12381Shake256, Scheme, PS},
        utils::message::ps_attribute::AttributeMap,
    };
    use rand::{rngs::StdRng, SeedableRng};

    macro_rules! blind_tests {
        ( $( ($t:ident): { $( ($n:ident, $f:ident), )+ },)+ ) => { $($(
            #[test] fn $n() { $f::<$t>(); }
        )+)+ }
    }

    blind_tests! {
        (PsBls12381Sha256): {
            (issue_sha256, issue),
            (all_hidden_sha256, all_hidden),
            (bad_partition_sha256, bad_partition),
            (tampered_sha256, tampered),
        },
        (PsBls12381Shake256): {
            (issue_shake256, issue),
            (all_hidden_shake256, all_hidden),
            (bad_partition_shake256, bad_partition),
            (tampered_shake256, tampered),
        },
    }

    fn disclosed() -> AttributeMap {
        AttributeMap::from([(0, b"t1".to_vec())])
    }

    fn hidden() -> AttributeMap {
        AttributeMap::from([(1, b"t2".to_vec()), (2, b"t3".to_vec())])
    }

    fn issue<S: Scheme>() {
        let mut rng = StdRng::seed_from_u64(41);
        let keypair = KeyPair::<PS<S::Ciphersuite>>::random(3, &mut rng).unwrap();
        let (sk, pk) = (keypair.private_key(), keypair.public_key());

        let (request, state) = IssueRequest::new::<S::Ciphersuite, _>(pk, &hidden(), &mut rng).unwrap();
        let blind =
            PSBlindSignature::blind_sign::<S::Ciphersuite, _>(sk, pk, &request, &disclosed(), &mut rng).unwrap();
        assert_eq!(PSBlindSignature::from_bytes(&blind.to_bytes()).unwrap(), blind);

        let credential = blind.unblind::<S::Ciphersuite>(pk, state, &disclosed()).unwrap();
        let attributes = vec![b"t1".to_vec(), b"t2".to_vec(), b"t3".to_vec()];
        assert_eq!(credential.attributes(), attributes.as_slice());
        assert_eq!(credential.hidden_indexes(), &[1, 2]);
        assert!(credential.signature().verify::<S::Ciphersuite>(pk, &attributes).is_ok());
    }

    fn all_hidden<S: Scheme>() {
        let mut rng = StdRng::seed_from_u64(42);
        let keypair = KeyPair::<PS<S::Ciphersuite>>::random(2, &mut rng).unwrap();
        let (sk, pk) = (keypair.private_key(), keypair.public_key());
        let hidden = AttributeMap::from([(0, b"a".to_vec()), (1, b"b".to_vec())]);

        let (request, state) = IssueRequest::new::<S::Ciphersuite, _>(pk, &hidden, &mut rng).unwrap();
        let blind =
            PSBlindSignature::blind_sign::<S::Ciphersuite, _>(sk, pk, &request, &AttributeMap::new(), &mut rng)
                .unwrap();
        assert!(blind.unblind::<S::Ciphersuite>(pk, state, &AttributeMap::new()).is_ok());
    }

    fn bad_partition<S: Scheme>() {
        let mut rng = StdRng::seed_from_u64(43);
        let keypair = KeyPair::<PS<S::Ciphersuite>>::random(3, &mut rng).unwrap();
        let (sk, pk) = (keypair.private_key(), keypair.public_key());

        let (request, _) = IssueRequest::new::<S::Ciphersuite, _>(pk, &hidden(), &mut rng).unwrap();

        let overlapping = AttributeMap::from([(0, b"t1".to_vec()), (1, b"t2".to_vec())]);
        assert_eq!(
            PSBlindSignature::blind_sign::<S::Ciphersuite, _>(sk, pk, &request, &overlapping, &mut rng),
            Err(Error::InvalidAttributePartition)
        );
        assert_eq!(
            PSBlindSignature::blind_sign::<S::Ciphersuite, _>(sk, pk, &request, &AttributeMap::new(), &mut rng),
            Err(Error::InvalidAttributePartition)
        );
    }

    fn tampered<S: Scheme>() {
        let mut rng = StdRng::seed_from_u64(44);
        let keypair = KeyPair::<PS<S::Ciphersuite>>::random(3, &mut rng).unwrap();
        let (sk, pk) = (keypair.private_key(), keypair.public_key());

        let (request, state) = IssueRequest::new::<S::Ciphersuite, _>(pk, &hidden(), &mut rng).unwrap();
        let blind =
            PSBlindSignature::blind_sign::<S::Ciphersuite, _>(sk, pk, &request, &disclosed(), &mut rng).unwrap();

        let tampered = AttributeMap::from([(0, b"tampered".to_vec())]);
        assert_eq!(
            blind.unblind::<S::Ciphersuite>(pk, state, &tampered).map(|_| ()),
            Err(Error::InvalidCredential)
        );
    }
}
