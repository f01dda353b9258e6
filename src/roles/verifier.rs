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
    ps::{ciphersuites::PSCiphersuite, keys::PSPublicKey, proof::DisclosureProof},
    utils::message::ps_attribute::AttributeMap,
};
use core::marker::PhantomData;

#[derive(Clone, Debug)]
pub struct Verifier<CS: PSCiphersuite> {
    issuer_pk: PSPublicKey,
    _cs: PhantomData<CS>,
}

impl<CS: PSCiphersuite> Verifier<CS> {
    pub fn new(issuer_pk: PSPublicKey) -> Self {
        Self { issuer_pk, _cs: PhantomData }
    }

    /// Accepts iff `proof` shows a credential of the issuer with `disclosed_attributes` and is bound to `message`
    pub fn verify_disclosure_proof(
        &self,
        proof: &DisclosureProof,
        disclosed_attributes: &AttributeMap,
        message: &[u8],
    ) -> bool {
        match proof.verify::<CS>(&self.issuer_pk, disclosed_attributes, message) {
            Ok(()) => true,
            Err(e) => {
                log::debug!("disclosure proof rejected: {e}");
                false
            }
        }
    }
}
