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

use super::{decode, encode, ServicePublicKey};
use crate::{
    errors::Error,
    keys::pair::KeyPair,
    ps::{
        blind::PSBlindSignature, ciphersuites::PSCiphersuite, commitment::IssueRequest, keys::PSSecretKey,
        proof::DisclosureProof,
    },
    schemes::algorithms::PS,
    utils::message::ps_attribute::AttributeMap,
};
use core::marker::PhantomData;
use rand::{CryptoRng, RngCore};

pub struct Server<CS: PSCiphersuite>(PhantomData<CS>);

impl<CS: PSCiphersuite> Server<CS> {
    /// # Description
    /// Sets up the service once: draws the issuer keys for one user secret plus one attribute per
    /// offered subscription.
    ///
    /// # Inputs:
    /// * `subscriptions` (REQUIRED), the names of every valid subscription, without duplicates.
    /// * `rng` (REQUIRED), a cryptographically secure random number generator.
    ///
    /// # Output:
    /// (`sk_bytes`, `pk_bytes`), the encoded secret key and public parameters, or [`Error`].
    ///
    pub fn generate_ca<R>(
        subscriptions: &[String],
        rng: &mut R,
    ) -> Result<(Vec<u8>, Vec<u8>), Error>
    where
        R: RngCore + CryptoRng,
    {
        let mut unique = subscriptions.to_vec();
        unique.sort();
        unique.dedup();
        if unique.len() != subscriptions.len() || subscriptions.iter().any(|s| s.is_empty()) {
            return Err(Error::ServiceError("subscriptions must be distinct and non-empty".to_owned()));
        }

        let (sk, pk) = KeyPair::<PS<CS>>::random(subscriptions.len() + 1, rng)?.into_parts();
        let public = ServicePublicKey { subscriptions: subscriptions.to_vec(), pk };

        log::info!("service set up with {} subscription(s)", subscriptions.len());

        Ok((encode(&sk)?, encode(&public)?))
    }

    /// # Description
    /// Blind-signs a registration for `username`. The server discloses one attribute per offered
    /// subscription, filled with the subscription name when requested, and signs the user secret blindly.
    ///
    /// # Inputs:
    /// * `server_sk` (REQUIRED), the encoded secret key from [`Server::generate_ca`].
    /// * `server_pk` (REQUIRED), the encoded public parameters from [`Server::generate_ca`].
    /// * `issuance_request` (REQUIRED), the encoded request from the client.
    /// * `username` (REQUIRED), the registering user.
    /// * `subscriptions` (REQUIRED), the subscriptions granted to the user.
    /// * `rng` (REQUIRED), a cryptographically secure random number generator.
    ///
    /// # Output:
    /// the encoded response or [`Error`].
    ///
    pub fn process_registration<R>(
        server_sk: &[u8],
        server_pk: &[u8],
        issuance_request: &[u8],
        username: &str,
        subscriptions: &[String],
        rng: &mut R,
    ) -> Result<Vec<u8>, Error>
    where
        R: RngCore + CryptoRng,
    {
        let sk: PSSecretKey = decode(server_sk)?;
        let public: ServicePublicKey = decode(server_pk)?;
        let request: IssueRequest = decode(issuance_request)?;

        let disclosed = subscription_attributes(&public, subscriptions)?;
        let blind = PSBlindSignature::blind_sign::<CS, R>(&sk, &public.pk, &request, &disclosed, rng)?;

        log::info!("registered {username} with {} subscription(s)", subscriptions.len());

        encode(&blind)
    }

    /// # Description
    /// Checks a signed request: the proof must show a credential holding every subscription in
    /// `revealed_attributes` and be bound to `message`.
    ///
    /// # Output:
    /// `true` iff the request is authorized.
    ///
    pub fn check_request_signature(
        server_pk: &[u8],
        message: &[u8],
        revealed_attributes: &[String],
        signature: &[u8],
    ) -> bool {
        let result = decode::<ServicePublicKey>(server_pk).and_then(|public| {
            let proof: DisclosureProof = decode(signature)?;
            let indexes = public.attribute_indexes(revealed_attributes)?;
            let disclosed: AttributeMap = indexes
                .into_iter()
                .map(|i| (i, public.subscriptions[i - 1].as_bytes().to_vec()))
                .collect();
            proof.verify::<CS>(&public.pk, &disclosed, message)
        });

        match result {
            Ok(()) => true,
            Err(e) => {
                log::debug!("request rejected: {e}");
                false
            }
        }
    }
}

/// Disclosed attributes `1..=n` for a user holding `subscriptions`
pub(crate) fn subscription_attributes(
    public: &ServicePublicKey,
    subscriptions: &[String],
) -> Result<AttributeMap, Error> {
    let held = public.attribute_indexes(subscriptions)?;
    Ok(public
        .subscriptions
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let value = if held.contains(&(i + 1)) { name.as_bytes().to_vec() } else { Vec::new() };
            (i + 1, value)
        })
        .collect())
}
