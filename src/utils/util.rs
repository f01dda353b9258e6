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

pub mod ps_utils {
    use crate::{errors::Error, ps::ciphersuites::PSCiphersuite};
    use bls12_381_plus::{G1Affine, G1Projective, G2Affine, G2Projective, Gt, Scalar};
    use elliptic_curve::hash2curve::{ExpandMsg, Expander};
    use ff::Field;
    use group::Curve;
    use rand::{CryptoRng, RngCore};
    use std::collections::BTreeSet;

    const EXPAND_LEN: usize = 48;

    /// # Description
    /// Deterministically maps an octet string into a scalar of the BLS12-381 field,
    /// expanding the input with the ciphersuite expander and the supplied domain separation tag.
    ///
    /// # Inputs:
    /// * `msg_octets` (REQUIRED), an octet string.
    /// * `dst` (REQUIRED), an octet string representing a domain separation tag.
    ///
    /// # Output:
    /// a [`Scalar`] or [`Error`].
    ///
    pub fn hash_to_scalar<CS: PSCiphersuite>(
        msg_octets: &[u8],
        dst: &[u8],
    ) -> Result<Scalar, Error> {
        if dst.len() > 255 {
            return Err(Error::HashToScalarError);
        }

        let mut uniform_bytes = [0u8; EXPAND_LEN];
        CS::Expander::expand_message(&[msg_octets], &[dst], EXPAND_LEN)
            .map_err(|_| Error::HashToScalarError)?
            .fill_bytes(&mut uniform_bytes);

        Ok(Scalar::from_okm(&uniform_bytes))
    }

    /// Samples `count` uniform scalars from the supplied CSPRNG
    pub fn calculate_random_scalars<R>(rng: &mut R, count: usize) -> Vec<Scalar>
    where
        R: RngCore + CryptoRng,
    {
        (0..count).map(|_| Scalar::random(&mut *rng)).collect()
    }

    /// Samples a uniform non-zero scalar
    pub fn random_nonzero_scalar<R>(rng: &mut R) -> Scalar
    where
        R: RngCore + CryptoRng,
    {
        loop {
            let s = Scalar::random(&mut *rng);
            if !bool::from(s.is_zero()) {
                return s;
            }
        }
    }

    pub fn i2osp(value: usize, len: usize) -> Vec<u8> {
        let bytes = (value as u64).to_be_bytes();
        if len >= bytes.len() {
            let mut out = vec![0u8; len - bytes.len()];
            out.extend_from_slice(&bytes);
            out
        } else {
            bytes[bytes.len() - len..].to_vec()
        }
    }

    pub fn os2ip(bytes: &[u8]) -> Result<usize, Error> {
        let array: [u8; 8] = bytes
            .try_into()
            .map_err(|_| Error::DeserializationError("length prefix".to_owned()))?;
        usize::try_from(u64::from_be_bytes(array))
            .map_err(|_| Error::DeserializationError("length prefix overflow".to_owned()))
    }

    pub trait ScalarExt {
        fn to_bytes_be(&self) -> [u8; 32];
        fn from_bytes_be(bytes: &[u8; 32]) -> Result<Scalar, Error>;
    }

    impl ScalarExt for Scalar {
        fn to_bytes_be(&self) -> [u8; 32] {
            self.to_be_bytes()
        }

        fn from_bytes_be(bytes: &[u8; 32]) -> Result<Scalar, Error> {
            Option::<Scalar>::from(Scalar::from_be_bytes(bytes))
                .ok_or_else(|| Error::DeserializationError("scalar out of range".to_owned()))
        }
    }

    pub fn g1_to_bytes(p: &G1Projective) -> [u8; G1Affine::COMPRESSED_BYTES] {
        p.to_affine().to_compressed()
    }

    pub fn g2_to_bytes(p: &G2Projective) -> [u8; G2Affine::COMPRESSED_BYTES] {
        p.to_affine().to_compressed()
    }

    pub fn gt_to_bytes(p: &Gt) -> [u8; Gt::BYTES] {
        p.to_bytes()
    }

    /// Forward-only cursor over a serialized message, used by every `from_bytes`
    pub(crate) struct ByteReader<'a> {
        bytes: &'a [u8],
        offset: usize,
    }

    impl<'a> ByteReader<'a> {
        pub(crate) fn new(bytes: &'a [u8]) -> Self {
            Self { bytes, offset: 0 }
        }

        pub(crate) fn take(&mut self, len: usize) -> Result<&'a [u8], Error> {
            let end = self
                .offset
                .checked_add(len)
                .filter(|&end| end <= self.bytes.len())
                .ok_or_else(|| Error::DeserializationError("unexpected end of input".to_owned()))?;
            let slice = &self.bytes[self.offset..end];
            self.offset = end;
            Ok(slice)
        }

        pub(crate) fn take_usize(&mut self) -> Result<usize, Error> {
            os2ip(self.take(8)?)
        }

        pub(crate) fn take_scalar(&mut self) -> Result<Scalar, Error> {
            let bytes: [u8; 32] = self
                .take(Scalar::BYTES)?
                .try_into()
                .map_err(|_| Error::DeserializationError("scalar".to_owned()))?;
            Scalar::from_bytes_be(&bytes)
        }

        pub(crate) fn take_g1(&mut self) -> Result<G1Projective, Error> {
            parse_g1_projective(self.take(G1Affine::COMPRESSED_BYTES)?)
        }

        pub(crate) fn take_g2(&mut self) -> Result<G2Projective, Error> {
            parse_g2_projective(self.take(G2Affine::COMPRESSED_BYTES)?)
        }

        pub(crate) fn take_gt(&mut self) -> Result<Gt, Error> {
            parse_gt(self.take(Gt::BYTES)?)
        }

        /// Reads a length prefix, refusing counts that could not possibly fit in the
        /// remaining input (`min_item_len` bytes per item)
        pub(crate) fn take_count(&mut self, min_item_len: usize) -> Result<usize, Error> {
            let count = self.take_usize()?;
            if count.saturating_mul(min_item_len) > self.remaining() {
                return Err(Error::DeserializationError("length prefix exceeds input".to_owned()));
            }
            Ok(count)
        }

        pub(crate) fn remaining(&self) -> usize {
            self.bytes.len() - self.offset
        }

        pub(crate) fn finish(self) -> Result<(), Error> {
            if self.remaining() != 0 {
                return Err(Error::DeserializationError("trailing bytes".to_owned()));
            }
            Ok(())
        }
    }

    pub fn parse_g1_projective(slice: &[u8]) -> Result<G1Projective, Error> {
        let bytes: [u8; G1Affine::COMPRESSED_BYTES] = slice
            .try_into()
            .map_err(|_| Error::DeserializationError("G1 point".to_owned()))?;
        Option::<G1Affine>::from(G1Affine::from_compressed(&bytes))
            .map(G1Projective::from)
            .ok_or_else(|| Error::DeserializationError("G1 point".to_owned()))
    }

    pub fn parse_g2_projective(slice: &[u8]) -> Result<G2Projective, Error> {
        let bytes: [u8; G2Affine::COMPRESSED_BYTES] = slice
            .try_into()
            .map_err(|_| Error::DeserializationError("G2 point".to_owned()))?;
        Option::<G2Affine>::from(G2Affine::from_compressed(&bytes))
            .map(G2Projective::from)
            .ok_or_else(|| Error::DeserializationError("G2 point".to_owned()))
    }

    pub fn parse_gt(slice: &[u8]) -> Result<Gt, Error> {
        let bytes: [u8; Gt::BYTES] = slice
            .try_into()
            .map_err(|_| Error::DeserializationError("GT element".to_owned()))?;
        Option::<Gt>::from(Gt::from_bytes(&bytes))
            .ok_or_else(|| Error::DeserializationError("GT element".to_owned()))
    }

    pub fn get_remaining_indexes(length: usize, indexes: &[usize]) -> Vec<usize> {
        (0..length).filter(|i| !indexes.contains(i)).collect()
    }

    /// Checks that `indexes` are strictly increasing and all smaller than `length`
    pub fn check_indexes(length: usize, indexes: &[usize]) -> bool {
        indexes.windows(2).all(|w| w[0] < w[1]) && indexes.iter().all(|&i| i < length)
    }

    /// Checks that the two index sets are disjoint and together cover `0..length`
    pub fn is_partition(length: usize, first: &[usize], second: &[usize]) -> bool {
        let all: BTreeSet<usize> = first.iter().chain(second.iter()).copied().collect();
        first.len() + second.len() == length && all.len() == length && all.iter().all(|&i| i < length)
    }

    /// Hex (de)serialization of [`Gt`] elements for serde-based encodings
    pub mod gt_hex {
        use super::parse_gt;
        use bls12_381_plus::Gt;
        use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(value: &Gt, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.serialize_str(&hex::encode(value.to_bytes()))
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Gt, D::Error> {
            let encoded = String::deserialize(deserializer)?;
            let bytes = hex::decode(encoded).map_err(D::Error::custom)?;
            parse_gt(&bytes).map_err(D::Error::custom)
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::ps::ciphersuites::{Bls12381Sha256, Bls12381Shake256};

        #[test]
        fn i2osp_pads_and_truncates() {
            assert_eq!(i2osp(1, 2), vec![0u8, 1u8]);
            assert_eq!(i2osp(258, 8), vec![0, 0, 0, 0, 0, 0, 1, 2]);
            assert_eq!(os2ip(&i2osp(65535, 8)).unwrap(), 65535);
        }

        #[test]
        fn hash_to_scalar_is_domain_separated() {
            let a = hash_to_scalar::<Bls12381Sha256>(b"attribute", b"DST_A").unwrap();
            let b = hash_to_scalar::<Bls12381Sha256>(b"attribute", b"DST_B").unwrap();
            let c = hash_to_scalar::<Bls12381Shake256>(b"attribute", b"DST_A").unwrap();
            assert_ne!(a, b);
            assert_ne!(a, c);
            assert_eq!(a, hash_to_scalar::<Bls12381Sha256>(b"attribute", b"DST_A").unwrap());
        }

        #[test]
        fn partition_checks() {
            assert!(is_partition(3, &[0], &[1, 2]));
            assert!(is_partition(3, &[], &[0, 1, 2]));
            assert!(!is_partition(3, &[0, 1], &[1, 2]));
            assert!(!is_partition(3, &[0], &[1]));
            assert!(!is_partition(3, &[0], &[1, 3]));
            assert!(check_indexes(3, &[0, 2]));
            assert!(!check_indexes(3, &[2, 0]));
            assert!(!check_indexes(3, &[0, 3]));
        }

        #[test]
        fn reader_rejects_truncated_input() {
            let bytes = i2osp(7, 8);
            let mut reader = ByteReader::new(&bytes[..5]);
            assert!(reader.take_usize().is_err());
        }
    }
}
