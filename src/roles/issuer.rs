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

use crate::{
    errors::Error,
    keys::pair::KeyPair,
    ps::{blind::PSBlindSignature, ciphersuites::PSCiphersuite, commitment::IssueRequest, keys::PSPublicKey},
    schemes::algorithms::PS,
    utils::message::ps_attribute::AttributeMap,
};
use core::fmt;
use rand::{CryptoRng, RngCore};

/// Owner of the secret key. Signs issue requests for the attributes it vouches for.
#[derive(Clone)]
pub struct Issuer<CS: PSCiphersuite> {
    keypair: KeyPair<PS<CS>>,
}

impl<CS: PSCiphersuite> fmt::Debug for Issuer<CS> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Issuer")
            .field("public", self.keypair.public_key())
            .field("private", &"<redacted>")
            .finish()
    }
}

impl<CS: PSCiphersuite> Issuer<CS> {
    /// KeyGen for `attribute_count` attributes
    pub fn new<R>(attribute_count: usize, rng: &mut R) -> Result<Self, Error>
    where
        R: RngCore + CryptoRng,
    {
        Ok(Self { keypair: KeyPair::<PS<CS>>::random(attribute_count, rng)? })
    }

    pub fn from_keypair(keypair: KeyPair<PS<CS>>) -> Self {
        Self { keypair }
    }

    pub fn public_key(&self) -> &PSPublicKey {
        self.keypair.public_key()
    }

    pub fn keypair(&self) -> &KeyPair<PS<CS>> {
        &self.keypair
    }

    /// Blind-signs `request` together with `disclosed_attributes`. A request whose proof does not
    /// verify, or whose hidden indexes do not complement the disclosed ones, is refused.
    pub fn sign_issue_request<R>(
        &self,
        request: &IssueRequest,
        disclosed_attributes: &AttributeMap,
        rng: &mut R,
    ) -> Result<PSBlindSignature, Error>
    where
        R: RngCore + CryptoRng,
    {
        PSBlindSignature::blind_sign::<CS, R>(
            self.keypair.private_key(),
            self.keypair.public_key(),
            request,
            disclosed_attributes,
            rng,
        )
    }
}
