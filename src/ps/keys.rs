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

use super::ciphersuites::PSCiphersuite;
use crate::{
    errors::Error,
    keys::{
        pair::KeyPair,
        traits::{PrivateKey, PublicKey},
    },
    schemes::algorithms::PS,
    utils::util::ps_utils::{
        calculate_random_scalars, g1_to_bytes, g2_to_bytes, hash_to_scalar, i2osp, ByteReader, ScalarExt,
    },
};
use bls12_381_plus::{G1Affine, G1Projective, G2Affine, G2Projective, Scalar};
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};

/// Issuer public key. `Y1[i]` and `Y2[i]` are bound to the attribute at position `i`.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(try_from = "PublicKeyFields")]
pub struct PSPublicKey {
    pub g1: G1Projective,
    pub g2: G2Projective,
    pub Y1: Vec<G1Projective>,
    pub Y2: Vec<G2Projective>,
    pub X2: G2Projective,
}

/// Unchecked serde image of [`PSPublicKey`]
#[derive(Deserialize)]
struct PublicKeyFields {
    g1: G1Projective,
    g2: G2Projective,
    Y1: Vec<G1Projective>,
    Y2: Vec<G2Projective>,
    X2: G2Projective,
}

impl TryFrom<PublicKeyFields> for PSPublicKey {
    type Error = Error;

    fn try_from(fields: PublicKeyFields) -> Result<Self, Self::Error> {
        let PublicKeyFields { g1, g2, Y1, Y2, X2 } = fields;
        let pk = Self { g1, g2, Y1, Y2, X2 };
        pk.check()?;
        Ok(pk)
    }
}

impl PSPublicKey {
    /// Number of attributes `L` the key can sign
    pub fn attribute_count(&self) -> usize {
        self.Y1.len()
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes: Vec<u8> = Vec::new();
        bytes.extend_from_slice(&i2osp(self.attribute_count(), 8));
        bytes.extend_from_slice(&g1_to_bytes(&self.g1));
        bytes.extend_from_slice(&g2_to_bytes(&self.g2));
        bytes.extend_from_slice(&g2_to_bytes(&self.X2));
        self.Y1.iter().for_each(|p| bytes.extend_from_slice(&g1_to_bytes(p)));
        self.Y2.iter().for_each(|p| bytes.extend_from_slice(&g2_to_bytes(p)));
        bytes
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let mut reader = ByteReader::new(bytes);
        let L = reader.take_count(G1Affine::COMPRESSED_BYTES + G2Affine::COMPRESSED_BYTES)?;
        let g1 = reader.take_g1()?;
        let g2 = reader.take_g2()?;
        let X2 = reader.take_g2()?;
        let Y1 = (0..L).map(|_| reader.take_g1()).collect::<Result<Vec<_>, _>>()?;
        let Y2 = (0..L).map(|_| reader.take_g2()).collect::<Result<Vec<_>, _>>()?;
        reader.finish()?;

        let pk = Self { g1, g2, Y1, Y2, X2 };
        pk.check()?;
        Ok(pk)
    }

    /// Rejects keys with no attribute slots or identity elements
    pub(crate) fn check(&self) -> Result<(), Error> {
        let identity_in_g1 = bool::from(self.g1.is_identity()) || self.Y1.iter().any(|p| bool::from(p.is_identity()));
        let identity_in_g2 = bool::from(self.g2.is_identity())
            || bool::from(self.X2.is_identity())
            || self.Y2.iter().any(|p| bool::from(p.is_identity()));

        if self.Y1.is_empty() || self.Y1.len() != self.Y2.len() || identity_in_g1 || identity_in_g2 {
            return Err(Error::InvalidKey);
        }
        Ok(())
    }
}

/// Issuer secret key. Never leaves the issuer.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct PSSecretKey {
    pub x: Scalar,
    pub X1: G1Projective,
    pub y: Vec<Scalar>,
}

impl PSSecretKey {
    pub fn attribute_count(&self) -> usize {
        self.y.len()
    }

    //in BE order
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes: Vec<u8> = Vec::new();
        bytes.extend_from_slice(&i2osp(self.attribute_count(), 8));
        bytes.extend_from_slice(&self.x.to_bytes_be());
        bytes.extend_from_slice(&g1_to_bytes(&self.X1));
        self.y.iter().for_each(|s| bytes.extend_from_slice(&s.to_bytes_be()));
        bytes
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let mut reader = ByteReader::new(bytes);
        let L = reader.take_count(Scalar::BYTES)?;
        let x = reader.take_scalar()?;
        let X1 = reader.take_g1()?;
        let y = (0..L).map(|_| reader.take_scalar()).collect::<Result<Vec<_>, _>>()?;
        reader.finish()?;

        if y.is_empty() || X1 != G1Projective::GENERATOR * x {
            return Err(Error::InvalidKey);
        }
        Ok(Self { x, X1, y })
    }
}

impl PublicKey for PSPublicKey {
    fn to_bytes(&self) -> Vec<u8> {
        self.to_bytes()
    }
}

impl PrivateKey for PSSecretKey {
    fn to_bytes(&self) -> Vec<u8> {
        self.to_bytes()
    }
}

impl<CS: PSCiphersuite> KeyPair<PS<CS>> {
    /// # Description
    /// Generates a fresh issuer key pair able to sign `attribute_count` attributes, sampling
    /// `x, y_1, ..., y_L` uniformly from the supplied CSPRNG.
    ///
    /// # Inputs:
    /// * `attribute_count` (REQUIRED), the number `L` of attributes, `L > 0`.
    /// * `rng` (REQUIRED), a cryptographically secure random number generator.
    ///
    /// # Output:
    /// a [`KeyPair`] or [`Error`].
    ///
    pub fn random<R>(attribute_count: usize, rng: &mut R) -> Result<Self, Error>
    where
        R: RngCore + CryptoRng,
    {
        if attribute_count == 0 {
            return Err(Error::KeyGenError("attribute_count == 0".to_owned()));
        }

        let scalars = calculate_random_scalars(rng, attribute_count + 1);
        let sk = secret_key_from_scalars(scalars[0], scalars[1..].to_vec());
        let pk = sk_to_pk(&sk);

        log::debug!("Generated PS key pair for {} attributes", attribute_count);

        Ok(Self { public: pk, private: sk })
    }

    /// # Description
    /// Deterministically derives an issuer key pair from a secret octet string (`key_material`).
    ///
    /// # Inputs:
    /// * `key_material` (REQUIRED), a secret octet string of at least [`PSCiphersuite::IKM_LEN`] bytes.
    /// * `key_info` (OPTIONAL), an octet string. Defaults to an empty string if not supplied.
    /// * `attribute_count` (REQUIRED), the number `L` of attributes, `L > 0`.
    ///
    /// # Output:
    /// a [`KeyPair`] or [`Error`].
    ///
    pub fn generate(
        key_material: &[u8],
        key_info: Option<&[u8]>,
        attribute_count: usize,
    ) -> Result<Self, Error> {
        let sk = key_gen::<CS>(key_material, key_info, attribute_count)?;
        let pk = sk_to_pk(&sk);

        Ok(Self { public: pk, private: sk })
    }
}

fn secret_key_from_scalars(x: Scalar, y: Vec<Scalar>) -> PSSecretKey {
    PSSecretKey { x, X1: G1Projective::GENERATOR * x, y }
}

/// derive_input = key_material || I2OSP(length(key_info), 2) || key_info
/// x   = hash_to_scalar(derive_input || I2OSP(0, 8), key_dst)
/// y_i = hash_to_scalar(derive_input || I2OSP(i, 8), key_dst), i = 1..L
pub(crate) fn key_gen<CS>(
    key_material: &[u8],
    key_info: Option<&[u8]>,
    attribute_count: usize,
) -> Result<PSSecretKey, Error>
where
    CS: PSCiphersuite,
{
    if key_material.len() < CS::IKM_LEN {
        return Err(Error::KeyGenError("length(key_material) < 32".to_owned()));
    }

    let key_info = key_info.unwrap_or(&[]);

    if key_info.len() > 65535 {
        return Err(Error::KeyGenError("length(key_info) > 65535".to_owned()));
    }

    if attribute_count == 0 {
        return Err(Error::KeyGenError("attribute_count == 0".to_owned()));
    }

    let key_dst = CS::keygen_dst();
    let derive_input = [key_material, &i2osp(key_info.len(), 2), key_info].concat();

    let derive = |i: usize| hash_to_scalar::<CS>(&[derive_input.as_slice(), &i2osp(i, 8)].concat(), &key_dst);

    let x = derive(0)?;
    let y = (1..=attribute_count).map(derive).collect::<Result<Vec<_>, _>>()?;

    Ok(secret_key_from_scalars(x, y))
}

pub(crate) fn sk_to_pk(sk: &PSSecretKey) -> PSPublicKey {
    let g1 = G1Projective::GENERATOR;
    let g2 = G2Projective::GENERATOR;

    PSPublicKey {
        g1,
        g2,
        Y1: sk.y.iter().map(|y| g1 * y).collect(),
        Y2: sk.y.iter().map(|y| g2 * y).collect(),
        X2: g2 * sk.x,
    }
}
