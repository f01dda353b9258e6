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

#![allow(non_snake_case)]

#[cfg(test)]
mod ps_tests {
    use psabc::{
        errors::Error,
        keys::pair::KeyPair,
        ps::{
            blind::PSBlindSignature, commitment::IssueRequest, credential::Credential, keys::PSPublicKey,
            proof::DisclosureProof, signature::PSSignature,
        },
        roles::{holder::Holder, issuer::Issuer, verifier::Verifier},
        schemes::algorithms::{PsBls12381Sha256, PsBls12381Shake256, Scheme, PS},
        utils::message::ps_attribute::AttributeMap,
    };
    use rand::{rngs::StdRng, SeedableRng};

    fn init() {
        dotenvy::dotenv().ok();
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn attributes() -> Vec<Vec<u8>> {
        vec![b"t1".to_vec(), b"t2".to_vec(), b"t3".to_vec()]
    }

    fn split(indexes: &[usize]) -> AttributeMap {
        let attributes = attributes();
        indexes.iter().map(|&i| (i, attributes[i].clone())).collect()
    }

    fn issue<S: Scheme>(
        keypair: &KeyPair<PS<S::Ciphersuite>>,
        disclosed: &AttributeMap,
        hidden: &AttributeMap,
        rng: &mut StdRng,
    ) -> Result<Credential, Error> {
        let (sk, pk) = (keypair.private_key(), keypair.public_key());
        let (request, state) = IssueRequest::new::<S::Ciphersuite, _>(pk, hidden, rng)?;
        let blind = PSBlindSignature::blind_sign::<S::Ciphersuite, _>(sk, pk, &request, disclosed, rng)?;
        blind.unblind::<S::Ciphersuite>(pk, state, disclosed)
    }

    //END TO END - SHA256

    #[test]
    fn end_to_end_sha256() {
        end_to_end::<PsBls12381Sha256>();
    }

    //END TO END - SHAKE256

    #[test]
    fn end_to_end_shake256() {
        end_to_end::<PsBls12381Shake256>();
    }

    #[test]
    fn every_partition_sha256() {
        every_partition::<PsBls12381Sha256>();
    }

    #[test]
    fn every_partition_shake256() {
        every_partition::<PsBls12381Shake256>();
    }

    #[test]
    fn tampered_attribute_sha256() {
        tampered_attribute::<PsBls12381Sha256>();
    }

    #[test]
    fn tampered_attribute_shake256() {
        tampered_attribute::<PsBls12381Shake256>();
    }

    #[test]
    fn unlinkable_showings_sha256() {
        unlinkable_showings::<PsBls12381Sha256>();
    }

    #[test]
    fn unlinkable_showings_shake256() {
        unlinkable_showings::<PsBls12381Shake256>();
    }

    #[test]
    fn wrong_issuer_key_sha256() {
        wrong_issuer_key::<PsBls12381Sha256>();
    }

    #[test]
    fn deterministic_keys_sha256() {
        deterministic_keys::<PsBls12381Sha256>();
    }

    #[test]
    fn deterministic_keys_shake256() {
        deterministic_keys::<PsBls12381Shake256>();
    }

    #[test]
    fn wire_encoding_sha256() {
        wire_encoding::<PsBls12381Sha256>();
    }

    #[test]
    fn roles_sha256() {
        roles::<PsBls12381Sha256>();
    }

    fn end_to_end<S: Scheme>() {
        init();
        let mut rng = StdRng::seed_from_u64(101);
        let keypair = KeyPair::<PS<S::Ciphersuite>>::random(3, &mut rng).unwrap();
        let pk = keypair.public_key();

        let disclosed = split(&[0]);
        let credential = issue::<S>(&keypair, &disclosed, &split(&[1, 2]), &mut rng).unwrap();

        let proof = DisclosureProof::prove::<S::Ciphersuite, _>(pk, &credential, &[1, 2], b"", &mut rng).unwrap();
        assert!(proof.verify::<S::Ciphersuite>(pk, &disclosed, b"").is_ok());

        assert!(credential.signature().verify::<S::Ciphersuite>(pk, &attributes()).is_ok());
    }

    fn every_partition<S: Scheme>() {
        init();
        let mut rng = StdRng::seed_from_u64(102);
        let keypair = KeyPair::<PS<S::Ciphersuite>>::random(3, &mut rng).unwrap();
        let pk = keypair.public_key();

        for mask in 0u8..8 {
            let hidden_indexes: Vec<usize> = (0..3).filter(|i| mask & (1 << i) != 0).collect();
            let disclosed_indexes: Vec<usize> = (0..3).filter(|i| mask & (1 << i) == 0).collect();
            let disclosed = split(&disclosed_indexes);

            let credential = issue::<S>(&keypair, &disclosed, &split(&hidden_indexes), &mut rng).unwrap();
            assert!(credential.verify::<S::Ciphersuite>(pk).is_ok());

            let message = [mask];
            let proof =
                DisclosureProof::prove::<S::Ciphersuite, _>(pk, &credential, &hidden_indexes, &message, &mut rng)
                    .unwrap();
            assert!(proof.verify::<S::Ciphersuite>(pk, &disclosed, &message).is_ok());
        }
    }

    fn tampered_attribute<S: Scheme>() {
        init();
        let mut rng = StdRng::seed_from_u64(103);
        let keypair = KeyPair::<PS<S::Ciphersuite>>::random(3, &mut rng).unwrap();
        let (sk, pk) = (keypair.private_key(), keypair.public_key());

        let disclosed = split(&[0, 1]);
        let (request, state) = IssueRequest::new::<S::Ciphersuite, _>(pk, &split(&[2]), &mut rng).unwrap();
        let blind = PSBlindSignature::blind_sign::<S::Ciphersuite, _>(sk, pk, &request, &disclosed, &mut rng).unwrap();

        let mut tampered = disclosed.clone();
        tampered.insert(1, b"tampered".to_vec());

        assert_eq!(
            blind.unblind::<S::Ciphersuite>(pk, state, &tampered),
            Err(Error::InvalidCredential)
        );
    }

    fn unlinkable_showings<S: Scheme>() {
        init();
        let mut rng = StdRng::seed_from_u64(104);
        let keypair = KeyPair::<PS<S::Ciphersuite>>::random(3, &mut rng).unwrap();
        let pk = keypair.public_key();
        let credential = issue::<S>(&keypair, &split(&[0]), &split(&[1, 2]), &mut rng).unwrap();

        let first = DisclosureProof::prove::<S::Ciphersuite, _>(pk, &credential, &[1, 2], b"m", &mut rng).unwrap();
        let second = DisclosureProof::prove::<S::Ciphersuite, _>(pk, &credential, &[1, 2], b"m", &mut rng).unwrap();

        assert_ne!(first.sigma1(), second.sigma1());
        assert_ne!(first.sigma2(), second.sigma2());
        assert_ne!(first.commitment(), second.commitment());
        assert_ne!(first.sigma1(), credential.signature().sigma1);
    }

    fn wrong_issuer_key<S: Scheme>() {
        init();
        let mut rng = StdRng::seed_from_u64(105);
        let keypair = KeyPair::<PS<S::Ciphersuite>>::random(3, &mut rng).unwrap();
        let other = KeyPair::<PS<S::Ciphersuite>>::random(3, &mut rng).unwrap();

        let signature = PSSignature::sign::<S::Ciphersuite, _>(other.private_key(), &attributes(), &mut rng).unwrap();
        assert!(signature.verify::<S::Ciphersuite>(keypair.public_key(), &attributes()).is_err());
        assert!(signature.verify::<S::Ciphersuite>(other.public_key(), &attributes()).is_ok());

        let credential = issue::<S>(&other, &split(&[0]), &split(&[1, 2]), &mut rng).unwrap();
        let proof = DisclosureProof::prove::<S::Ciphersuite, _>(other.public_key(), &credential, &[1, 2], b"", &mut rng)
            .unwrap();
        assert!(proof.verify::<S::Ciphersuite>(keypair.public_key(), &split(&[0]), b"").is_err());
    }

    fn deterministic_keys<S: Scheme>() {
        init();
        let key_material = [7u8; 32];
        let first = KeyPair::<PS<S::Ciphersuite>>::generate(&key_material, Some(&b"issuer-1"[..]), 3).unwrap();
        let second = KeyPair::<PS<S::Ciphersuite>>::generate(&key_material, Some(&b"issuer-1"[..]), 3).unwrap();
        let third = KeyPair::<PS<S::Ciphersuite>>::generate(&key_material, Some(&b"issuer-2"[..]), 3).unwrap();

        assert_eq!(first, second);
        assert_ne!(first.public_key(), third.public_key());
        assert!(KeyPair::<PS<S::Ciphersuite>>::generate(&key_material[..16], None, 3).is_err());
        assert!(KeyPair::<PS<S::Ciphersuite>>::generate(&key_material, None, 0).is_err());
    }

    fn wire_encoding<S: Scheme>() {
        init();
        let mut rng = StdRng::seed_from_u64(106);
        let keypair = KeyPair::<PS<S::Ciphersuite>>::random(3, &mut rng).unwrap();
        let (sk, pk) = (keypair.private_key(), keypair.public_key());

        let pk_decoded = PSPublicKey::from_bytes(&pk.to_bytes()).unwrap();
        assert_eq!(&pk_decoded, pk);

        let disclosed = split(&[0]);
        let (request, state) = IssueRequest::new::<S::Ciphersuite, _>(pk, &split(&[1, 2]), &mut rng).unwrap();
        let request = IssueRequest::from_bytes(&request.to_bytes()).unwrap();

        let blind = PSBlindSignature::blind_sign::<S::Ciphersuite, _>(sk, &pk_decoded, &request, &disclosed, &mut rng)
            .unwrap();
        let blind = PSBlindSignature::from_bytes(&blind.to_bytes()).unwrap();

        let credential = blind.unblind::<S::Ciphersuite>(pk, state, &disclosed).unwrap();
        let credential = Credential::from_bytes(&credential.to_bytes()).unwrap();

        let proof = DisclosureProof::prove::<S::Ciphersuite, _>(pk, &credential, &[1, 2], b"nonce", &mut rng).unwrap();
        let proof_bytes = proof.to_bytes();
        let proof = DisclosureProof::from_bytes(&proof_bytes).unwrap();
        assert!(proof.verify::<S::Ciphersuite>(pk, &disclosed, b"nonce").is_ok());

        assert!(DisclosureProof::from_bytes(&proof_bytes[..proof_bytes.len() - 32]).is_err());
        assert!(IssueRequest::from_bytes(&[]).is_err());
    }

    fn roles<S: Scheme>() {
        init();
        let mut rng = StdRng::seed_from_u64(107);
        let issuer = Issuer::<S::Ciphersuite>::new(3, &mut rng).unwrap();
        let holder = Holder::<S::Ciphersuite>::new(issuer.public_key().clone());
        let verifier = Verifier::<S::Ciphersuite>::new(issuer.public_key().clone());

        let disclosed = split(&[0, 2]);
        let (request, state) = holder.create_issue_request(&split(&[1]), &mut rng).unwrap();
        let blind = issuer.sign_issue_request(&request, &disclosed, &mut rng).unwrap();
        let credential = holder.obtain_credential(state, &blind, &disclosed).unwrap();

        let proof = holder.create_disclosure_proof(&credential, &[1, 2], b"", &mut rng).unwrap();
        assert!(verifier.verify_disclosure_proof(&proof, &split(&[0]), b""));
        assert!(!verifier.verify_disclosure_proof(&proof, &disclosed, b""));
    }
}
