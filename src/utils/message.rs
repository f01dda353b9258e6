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

pub mod ps_attribute {
    use crate::{errors::Error, ps::ciphersuites::PSCiphersuite, utils::util::ps_utils::hash_to_scalar};
    use bls12_381_plus::Scalar;
    use serde::{Deserialize, Serialize};
    use std::collections::BTreeMap;

    /// Raw attributes indexed by their position in the signed vector.
    /// Iteration is always in ascending index order.
    pub type AttributeMap = BTreeMap<usize, Vec<u8>>;

    #[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
    pub struct PSAttribute {
        pub value: Scalar,
    }

    impl PSAttribute {
        pub fn new(value: Scalar) -> Self {
            Self { value }
        }

        /// # Description
        /// Maps an attribute (an octet string) into a scalar. The mapping is hash based and
        /// domain separated by the ciphersuite, so two distinct attributes collide only with
        /// negligible probability.
        ///
        /// # Inputs:
        /// * `attribute` (REQUIRED), an octet string.
        /// * `dst` (OPTIONAL), an octet string representing a domain separation tag.
        ///                     If not supplied, it defaults to `ID || "MAP_ATTR_TO_SCALAR_AS_HASH_"`.
        ///
        /// # Output:
        /// a [`PSAttribute`] or [`Error`].
        ///
        pub fn map_attribute_to_scalar_as_hash<CS: PSCiphersuite>(
            attribute: &[u8],
            dst: Option<&[u8]>,
        ) -> Result<Self, Error> {
            let default_dst = CS::map_attr_dst();
            let dst = dst.unwrap_or(&default_dst);

            let scalar = hash_to_scalar::<CS>(attribute, dst)?;
            Ok(Self { value: scalar })
        }

        pub fn attributes_to_scalar<CS: PSCiphersuite>(
            attributes: &[Vec<u8>],
        ) -> Result<Vec<Self>, Error> {
            attributes
                .iter()
                .map(|a| Self::map_attribute_to_scalar_as_hash::<CS>(a, None))
                .collect()
        }

        /// Maps an [`AttributeMap`], returning indexes and scalars in ascending index order
        pub fn attribute_map_to_scalar<CS: PSCiphersuite>(
            attributes: &AttributeMap,
        ) -> Result<(Vec<usize>, Vec<Self>), Error> {
            let mut indexes = Vec::with_capacity(attributes.len());
            let mut scalars = Vec::with_capacity(attributes.len());
            for (&i, a) in attributes {
                indexes.push(i);
                scalars.push(Self::map_attribute_to_scalar_as_hash::<CS>(a, None)?);
            }
            Ok((indexes, scalars))
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::ps::ciphersuites::Bls12381Sha256;

        #[test]
        fn mapping_is_deterministic_and_injective_in_practice() {
            let a = PSAttribute::map_attribute_to_scalar_as_hash::<Bls12381Sha256>(b"t1", None).unwrap();
            let b = PSAttribute::map_attribute_to_scalar_as_hash::<Bls12381Sha256>(b"t1", None).unwrap();
            let c = PSAttribute::map_attribute_to_scalar_as_hash::<Bls12381Sha256>(b"t1\x00", None).unwrap();
            assert_eq!(a, b);
            assert_ne!(a, c);
        }

        #[test]
        fn attribute_map_is_ordered() {
            let mut map = AttributeMap::new();
            map.insert(2, b"c".to_vec());
            map.insert(0, b"a".to_vec());
            let (indexes, scalars) = PSAttribute::attribute_map_to_scalar::<Bls12381Sha256>(&map).unwrap();
            assert_eq!(indexes, vec![0, 2]);
            assert_eq!(
                scalars[0],
                PSAttribute::map_attribute_to_scalar_as_hash::<Bls12381Sha256>(b"a", None).unwrap()
            );
        }
    }
}
