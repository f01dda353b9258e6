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

use super::keys::{PSPublicKey, PSSecretKey};
use crate::{
    errors::Error,
    ps::ciphersuites::PSCiphersuite,
    utils::{
        message::ps_attribute::PSAttribute,
        util::ps_utils::{g1_to_bytes, random_nonzero_scalar, ByteReader},
    },
};
use bls12_381_plus::{multi_miller_loop, G1Projective, G2Prepared, G2Projective};
use group::{Curve, Group};
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct PSSignature {
    pub sigma1: G1Projective,
    pub sigma2: G1Projective,
}

impl PSSignature {
    pub const BYTES: usize = 96;

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

    /// # Description
    /// Signs a vector of attributes in the clear: `(h, h^(x + sum(y_i * m_i)))` with `h = g1^u`
    /// for a fresh non-zero `u`.
    ///
    /// # Inputs:
    /// * `sk` (REQUIRED), the issuer secret key.
    /// * `attributes` (REQUIRED), exactly `L` octet strings.
    /// * `rng` (REQUIRED), a cryptographically secure random number generator.
    ///
    /// # Output:
    /// a [`PSSignature`] or [`Error`].
    ///
    pub fn sign<CS, R>(sk: &PSSecretKey, attributes: &[Vec<u8>], rng: &mut R) -> Result<Self, Error>
    where
        CS: PSCiphersuite,
        R: RngCore + CryptoRng,
    {
        let attribute_scalars = PSAttribute::attributes_to_scalar::<CS>(attributes)?;
        core_sign(sk, &attribute_scalars, rng)
    }

    /// # Description
    /// Checks `e(sigma1, X2 * prod(Y2_i^m_i)) == e(sigma2, g2)` over the full attribute vector.
    ///
    /// # Inputs:
    /// * `pk` (REQUIRED), the issuer public key.
    /// * `attributes` (REQUIRED), exactly `L` octet strings, in signing order.
    ///
    /// # Output:
    /// a result: [`Ok`] or [`Error`].
    ///
    pub fn verify<CS>(&self, pk: &PSPublicKey, attributes: &[Vec<u8>]) -> Result<(), Error>
    where
        CS: PSCiphersuite,
    {
        let attribute_scalars = PSAttribute::attributes_to_scalar::<CS>(attributes)?;
        core_verify(pk, self, &attribute_scalars)
    }
}

pub(crate) fn core_sign<R>(
    sk: &PSSecretKey,
    attributes: &[PSAttribute],
    rng: &mut R,
) -> Result<PSSignature, Error>
where
    R: RngCore + CryptoRng,
{
    if attributes.len() != sk.attribute_count() {
        return Err(Error::InvalidNumberOfAttributes);
    }

    let exponent = sk
        .y
        .iter()
        .zip(attributes.iter())
        .fold(sk.x, |acc, (y, m)| acc + y * m.value);

    let h = G1Projective::GENERATOR * random_nonzero_scalar(rng);

    Ok(PSSignature { sigma1: h, sigma2: h * exponent })
}

pub(crate) fn core_verify(
    pk: &PSPublicKey,
    signature: &PSSignature,
    attributes: &[PSAttribute],
) -> Result<(), Error> {
    let L = attributes.len();

    if pk.Y2.len() != L {
        return Err(Error::InvalidNumberOfAttributes);
    }

    if signature.sigma1.is_identity().into() {
        return Err(Error::G1IdentityError);
    }

    let mut A: G2Projective = pk.X2;
    for i in 0..L {
        A += pk.Y2[i] * attributes[i].value;
    }

    let sigma1 = signature.sigma1.to_affine();
    let sigma2 = signature.sigma2.to_affine();
    let A_prepared = G2Prepared::from(A.to_affine());
    let g2_neg_prepared = G2Prepared::from(-pk.g2.to_affine());

    let pairing =
        multi_miller_loop(&[(&sigma1, &A_prepared), (&sigma2, &g2_neg_prepared)]).final_exponentiation();

    if pairing.is_identity().into() {
        Ok(())
    } else {
        Err(Error::SignatureVerificationError)
    }
}
