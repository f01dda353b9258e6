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

use super::{decode, encode, server::subscription_attributes, ServicePublicKey};
use crate::{
    errors::Error,
    ps::{
        blind::PSBlindSignature,
        ciphersuites::PSCiphersuite,
        commitment::{IssuanceState, IssueRequest},
        credential::Credential,
        proof::DisclosureProof,
    },
    utils::{message::ps_attribute::AttributeMap, util::ps_utils::get_remaining_indexes},
};
use core::marker::PhantomData;
use rand::{CryptoRng, RngCore};

const USER_SECRET_LEN: usize = 32;

/// Client private state between [`Client::prepare_registration`] and
/// [`Client::process_registration_response`]
#[derive(Debug)]
pub struct RegistrationState {
    issuance: IssuanceState,
    disclosed: AttributeMap,
}

pub struct Client<CS: PSCiphersuite>(PhantomData<CS>);

impl<CS: PSCiphersuite> Client<CS> {
    /// # Description
    /// Prepares a registration: draws a fresh user secret and asks for it to be signed blindly,
    /// next to the requested subscriptions.
    ///
    /// # Output:
    /// (`request_bytes`, [`RegistrationState`]) or [`Error`].
    ///
    pub fn prepare_registration<R>(
        server_pk: &[u8],
        username: &str,
        subscriptions: &[String],
        rng: &mut R,
    ) -> Result<(Vec<u8>, RegistrationState), Error>
    where
        R: RngCore + CryptoRng,
    {
        let public: ServicePublicKey = decode(server_pk)?;
        let disclosed = subscription_attributes(&public, subscriptions)?;

        let mut user_secret = vec![0u8; USER_SECRET_LEN];
        rng.fill_bytes(&mut user_secret);
        let hidden = AttributeMap::from([(0, user_secret)]);

        let (request, issuance) = IssueRequest::new::<CS, R>(&public.pk, &hidden, rng)?;

        log::debug!("registration prepared for {username}");

        Ok((encode(&request)?, RegistrationState { issuance, disclosed }))
    }

    /// Unblinds the server response into a credential, or fails with [`Error::InvalidCredential`]
    pub fn process_registration_response(
        server_pk: &[u8],
        server_response: &[u8],
        private_state: RegistrationState,
    ) -> Result<Vec<u8>, Error> {
        let public: ServicePublicKey = decode(server_pk)?;
        let blind: PSBlindSignature = decode(server_response)?;

        let credential = blind.unblind::<CS>(&public.pk, private_state.issuance, &private_state.disclosed)?;
        encode(&credential)
    }

    /// # Description
    /// Signs `message` with the credential, revealing exactly the subscriptions in `types`.
    /// Revealing a subscription the credential does not hold fails.
    ///
    /// # Output:
    /// the encoded [`DisclosureProof`] or [`Error`].
    ///
    pub fn sign_request<R>(
        server_pk: &[u8],
        credentials: &[u8],
        message: &[u8],
        types: &[String],
        rng: &mut R,
    ) -> Result<Vec<u8>, Error>
    where
        R: RngCore + CryptoRng,
    {
        let public: ServicePublicKey = decode(server_pk)?;
        let credential: Credential = decode(credentials)?;

        let revealed = public.attribute_indexes(types)?;
        if revealed.iter().any(|&i| credential.attributes().get(i).map_or(true, |a| a.is_empty())) {
            return Err(Error::ServiceError("requested subscription is not held".to_owned()));
        }

        let hidden = get_remaining_indexes(public.pk.attribute_count(), &revealed);
        let proof = DisclosureProof::prove::<CS, R>(&public.pk, &credential, &hidden, message, rng)?;
        encode(&proof)
    }
}

#[cfg(test)]
mod tests {
    use super::Client;
    use crate::{
        errors::Error,
        ps::ciphersuites::{Bls12381Sha256, Bls12381Shake256, PSCiphersuite},
        service::server::Server,
    };
    use rand::{rngs::StdRng, SeedableRng};

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn registration_and_request<CS: PSCiphersuite>() {
        let mut rng = StdRng::seed_from_u64(71);
        let offered = names(&["restaurant", "bar", "gym", "dojo"]);
        let (sk, pk) = Server::<CS>::generate_ca(&offered, &mut rng).unwrap();

        let held = names(&["bar", "dojo"]);
        let (request, state) = Client::<CS>::prepare_registration(&pk, "alice", &held, &mut rng).unwrap();
        let response = Server::<CS>::process_registration(&sk, &pk, &request, "alice", &held, &mut rng).unwrap();
        let credential = Client::<CS>::process_registration_response(&pk, &response, state).unwrap();

        let message = b"46.52345,6.57890";
        let types = names(&["dojo"]);
        let signature = Client::<CS>::sign_request(&pk, &credential, message, &types, &mut rng).unwrap();

        assert!(Server::<CS>::check_request_signature(&pk, message, &types, &signature));
        assert!(!Server::<CS>::check_request_signature(&pk, b"0.0,0.0", &types, &signature));
        assert!(!Server::<CS>::check_request_signature(&pk, message, &names(&["bar"]), &signature));
        assert!(!Server::<CS>::check_request_signature(&pk, message, &names(&["casino"]), &signature));

        assert!(matches!(
            Client::<CS>::sign_request(&pk, &credential, message, &names(&["gym"]), &mut rng),
            Err(Error::ServiceError(_))
        ));
    }

    fn unknown_subscription<CS: PSCiphersuite>() {
        let mut rng = StdRng::seed_from_u64(72);
        let (sk, pk) = Server::<CS>::generate_ca(&names(&["bar"]), &mut rng).unwrap();

        assert!(matches!(
            Client::<CS>::prepare_registration(&pk, "bob", &names(&["casino"]), &mut rng),
            Err(Error::ServiceError(_))
        ));

        let (request, _) = Client::<CS>::prepare_registration(&pk, "bob", &names(&["bar"]), &mut rng).unwrap();
        assert!(matches!(
            Server::<CS>::process_registration(&sk, &pk, &request, "bob", &names(&["casino"]), &mut rng),
            Err(Error::ServiceError(_))
        ));
        assert!(Server::<CS>::generate_ca(&names(&["bar", "bar"]), &mut rng).is_err());
    }

    fn granted_less_than_requested<CS: PSCiphersuite>() {
        let mut rng = StdRng::seed_from_u64(73);
        let (sk, pk) = Server::<CS>::generate_ca(&names(&["bar", "gym"]), &mut rng).unwrap();

        let requested = names(&["bar", "gym"]);
        let (request, state) = Client::<CS>::prepare_registration(&pk, "carol", &requested, &mut rng).unwrap();
        let response =
            Server::<CS>::process_registration(&sk, &pk, &request, "carol", &names(&["bar"]), &mut rng).unwrap();

        assert_eq!(
            Client::<CS>::process_registration_response(&pk, &response, state),
            Err(Error::InvalidCredential)
        );
    }

    #[test]
    fn registration_and_request_sha256() {
        registration_and_request::<Bls12381Sha256>();
    }

    #[test]
    fn registration_and_request_shake256() {
        registration_and_request::<Bls12381Shake256>();
    }

    #[test]
    fn unknown_subscription_sha256() {
        unknown_subscription::<Bls12381Sha256>();
    }

    fn malformed_server_key<CS: PSCiphersuite>() {
        let mut rng = StdRng::seed_from_u64(74);
        let (sk, pk) = Server::<CS>::generate_ca(&names(&["bar", "gym"]), &mut rng).unwrap();

        let held = names(&["gym"]);
        let (request, state) = Client::<CS>::prepare_registration(&pk, "dave", &held, &mut rng).unwrap();
        let response = Server::<CS>::process_registration(&sk, &pk, &request, "dave", &held, &mut rng).unwrap();
        let credential = Client::<CS>::process_registration_response(&pk, &response, state).unwrap();
        let signature = Client::<CS>::sign_request(&pk, &credential, b"msg", &held, &mut rng).unwrap();

        let mut public: serde_json::Value = serde_json::from_slice(&pk).unwrap();
        public["pk"]["Y2"].as_array_mut().unwrap().truncate(1);
        let short_y2 = serde_json::to_vec(&public).unwrap();

        assert!(Server::<CS>::check_request_signature(&pk, b"msg", &held, &signature));
        assert!(!Server::<CS>::check_request_signature(&short_y2, b"msg", &held, &signature));
        assert!(matches!(
            Client::<CS>::sign_request(&short_y2, &credential, b"msg", &held, &mut rng),
            Err(Error::DeserializationError(_))
        ));
    }

    #[test]
    fn malformed_server_key_sha256() {
        malformed_server_key::<Bls12381Sha256>();
    }

    #[test]
    fn granted_less_than_requested_sha256() {
        granted_less_than_requested::<Bls12381Sha256>();
    }
}
