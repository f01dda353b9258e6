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
    ps::{
        blind::PSBlindSignature,
        ciphersuites::PSCiphersuite,
        commitment::{IssuanceState, IssueRequest},
        credential::Credential,
        keys::PSPublicKey,
        proof::DisclosureProof,
    },
    utils::message::ps_attribute::AttributeMap,
};
use core::marker::PhantomData;
use rand::{CryptoRng, RngCore};

/// Requests credentials from one issuer and shows them
#[derive(Clone, Debug)]
pub struct Holder<CS: PSCiphersuite> {
    issuer_pk: PSPublicKey,
    _cs: PhantomData<CS>,
}

impl<CS: PSCiphersuite> Holder<CS> {
    pub fn new(issuer_pk: PSPublicKey) -> Self {
        Self { issuer_pk, _cs: PhantomData }
    }

    pub fn create_issue_request<R>(
        &self,
        hidden_attributes: &AttributeMap,
        rng: &mut R,
    ) -> Result<(IssueRequest, IssuanceState), Error>
    where
        R: RngCore + CryptoRng,
    {
        IssueRequest::new::<CS, R>(&self.issuer_pk, hidden_attributes, rng)
    }

    pub fn obtain_credential(
        &self,
        state: IssuanceState,
        blind_signature: &PSBlindSignature,
        disclosed_attributes: &AttributeMap,
    ) -> Result<Credential, Error> {
        blind_signature.unblind::<CS>(&self.issuer_pk, state, disclosed_attributes)
    }

    pub fn create_disclosure_proof<R>(
        &self,
        credential: &Credential,
        hidden_indexes: &[usize],
        message: &[u8],
        rng: &mut R,
    ) -> Result<DisclosureProof, Error>
    where
        R: RngCore + CryptoRng,
    {
        DisclosureProof::prove::<CS, R>(&self.issuer_pk, credential, hidden_indexes, message, rng)
    }
}
