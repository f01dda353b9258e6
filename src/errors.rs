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

use thiserror::Error;

#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("Error during keypair generation: {0}")]
    KeyGenError(String),
    #[error("Invalid key")]
    InvalidKey,
    #[error("Number of attributes does not match the public key")]
    InvalidNumberOfAttributes,
    #[error("Number of generators does not match the number of secrets")]
    InvalidNumberOfGenerators,
    #[error("Disclosed and hidden attributes must partition the attribute indexes")]
    InvalidAttributePartition,
    /// Signatures and randomized signatures with `sigma1 == Identity_G1` are always rejected
    #[error("sigma1 == Identity_G1")]
    G1IdentityError,
    #[error("Error during hash to scalar computation")]
    HashToScalarError,
    #[error("Signature is not valid")]
    SignatureVerificationError,
    #[error("Error during computation of a Blind Signature: {0}")]
    BlindSignError(String),
    #[error("Invalid commitment proof")]
    InvalidCommitmentProof,
    /// The unblinded signature does not verify. Tampering, a wrong key and inconsistent
    /// attributes all end up here.
    #[error("Invalid credential")]
    InvalidCredential,
    #[error("Error during computation of a Disclosure Proof: {0}")]
    ProofGenError(String),
    #[error("Disclosure Proof verification failed: {0}")]
    PoKSVerificationError(String),
    #[error("Invalid Proof of Knowledge")]
    InvalidProofOfKnowledge,
    #[error("Error during deserialization: {0}")]
    DeserializationError(String),
    #[error("Service error: {0}")]
    ServiceError(String),
}
