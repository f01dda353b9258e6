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

use digest::HashMarker;
use elliptic_curve::hash2curve::{ExpandMsg, ExpandMsgXmd, ExpandMsgXof};
use sha2::Sha256;
use sha3::Shake256;

/// Compile-time parameters of a PS ciphersuite: the hash used to derive scalars
/// and the domain separation tags built on top of [`PSCiphersuite::ID`].
pub trait PSCiphersuite: Eq + core::fmt::Debug + 'static {
    const ID: &'static [u8];
    /// Minimum length of the key material accepted by the deterministic key derivation
    const IKM_LEN: usize = 32;
    const KEYGEN: &'static [u8] = b"KEYGEN_DST_";
    const MAP_ATTR: &'static [u8] = b"MAP_ATTR_TO_SCALAR_AS_HASH_";
    const CHALLENGE: &'static [u8] = b"H2S_CHALLENGE_";

    type HashAlg: HashMarker;
    type Expander: for<'a> ExpandMsg<'a>;

    fn keygen_dst() -> Vec<u8> {
        [Self::ID, Self::KEYGEN].concat()
    }

    fn map_attr_dst() -> Vec<u8> {
        [Self::ID, Self::MAP_ATTR].concat()
    }

    /// Challenge DST for a given relation tag (issuance or showing)
    fn challenge_dst(relation: &[u8]) -> Vec<u8> {
        [Self::ID, relation, Self::CHALLENGE].concat()
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Bls12381Shake256 {}
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Bls12381Sha256 {}

impl PSCiphersuite for Bls12381Shake256 {
    const ID: &'static [u8] = b"PS_BLS12381G1_XOF:SHAKE-256_";
    type HashAlg = Shake256;
    type Expander = ExpandMsgXof<Self::HashAlg>;
}

impl PSCiphersuite for Bls12381Sha256 {
    const ID: &'static [u8] = b"PS_BLS12381G1_XMD:SHA-256_";
    type HashAlg = Sha256;
    type Expander = ExpandMsgXmd<Self::HashAlg>;
}
