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

mod ps_example {
    use psabc::{
        errors::Error,
        keys::pair::KeyPair,
        ps::{blind::PSBlindSignature, ciphersuites::PSCiphersuite, commitment::IssueRequest, proof::DisclosureProof},
        schemes::algorithms::{Scheme, PS},
        utils::message::ps_attribute::AttributeMap,
    };
    use rand::Rng;

    pub(crate) fn ps_main<S: Scheme>() -> Result<(), Error> {
        const ATTRIBUTES: [&str; 3] = ["alice", "1990-04-12", "ch"];
        log::info!("Attributes: {:?}", ATTRIBUTES);

        let disclosed: AttributeMap = AttributeMap::from([(0, ATTRIBUTES[0].as_bytes().to_vec())]);
        let hidden: AttributeMap = AttributeMap::from([
            (1, ATTRIBUTES[1].as_bytes().to_vec()),
            (2, ATTRIBUTES[2].as_bytes().to_vec()),
        ]);

        let mut rng = rand::thread_rng();
        let key_material: Vec<u8> = (0..S::Ciphersuite::IKM_LEN).map(|_| rng.gen()).collect();

        log::info!("Keypair Generation");
        let issuer_keypair = KeyPair::<PS<S::Ciphersuite>>::generate(&key_material, None, ATTRIBUTES.len())?;
        let issuer_sk = issuer_keypair.private_key();
        let issuer_pk = issuer_keypair.public_key();
        log::info!("PK: {}", hex::encode(issuer_pk.to_bytes()));

        log::info!("Holder: issue request over attributes {:?}", hidden.keys().collect::<Vec<_>>());
        let (request, state) = IssueRequest::new::<S::Ciphersuite, _>(issuer_pk, &hidden, &mut rng)?;
        log::info!("Request: {}", hex::encode(request.to_bytes()));

        log::info!("Issuer: blind signature");
        let blind_signature =
            PSBlindSignature::blind_sign::<S::Ciphersuite, _>(issuer_sk, issuer_pk, &request, &disclosed, &mut rng)?;
        log::info!("Blind Signature: {}", hex::encode(blind_signature.to_bytes()));

        log::info!("Holder: unblinding");
        let credential = blind_signature.unblind::<S::Ciphersuite>(issuer_pk, state, &disclosed)?;
        log::info!("Signature: {}", hex::encode(credential.signature().to_bytes()));

        let message = b"presentation for verifier 42";
        log::info!("Holder: disclosure proof revealing attribute 0");
        let proof = DisclosureProof::prove::<S::Ciphersuite, _>(issuer_pk, &credential, &[1, 2], message, &mut rng)?;
        log::info!("Proof: {}", hex::encode(proof.to_bytes()));

        log::info!("Verifier: checking the proof");
        let result = proof.verify::<S::Ciphersuite>(issuer_pk, &disclosed, message);
        log::info!("Disclosure proof valid: {}", result.is_ok());
        result
    }
}

fn main() {
    use crate::ps_example::ps_main;
    use psabc::schemes::algorithms::{PsBls12381Sha256, PsBls12381Shake256};
    use std::env;

    dotenvy::dotenv().ok();
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() != 2 {
        println!(
            "Usage: {} <cipher_suite>
                Ciphersuites:
                    - BLS12-381-SHA-256
                    - BLS12-381-SHAKE-256",
            args[0]
        );
        return;
    }

    let cipher_suite = &args[1];

    let result = match cipher_suite.as_str() {
        "BLS12-381-SHA-256" => {
            log::info!("Ciphersuite: BLS12-381-SHA-256");
            ps_main::<PsBls12381Sha256>()
        }
        "BLS12-381-SHAKE-256" => {
            log::info!("Ciphersuite: BLS12-381-SHAKE-256");
            ps_main::<PsBls12381Shake256>()
        }
        _ => {
            println!("Unknown cipher suite: {}", cipher_suite);
            return;
        }
    };

    if let Err(e) = result {
        log::error!("{e}");
    }
}
