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

use core::marker::PhantomData;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::{
    keys::traits::{PrivateKey, PublicKey},
    ps::{
        ciphersuites::{Bls12381Sha256, Bls12381Shake256, PSCiphersuite},
        keys::{PSPublicKey, PSSecretKey},
    },
};

/// Pointcheval-Sanders multi-message signatures over a ciphersuite `CS`
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct PS<CS: PSCiphersuite>(#[serde(skip)] PhantomData<CS>);

pub type PsBls12381Sha256 = PS<Bls12381Sha256>;
pub type PsBls12381Shake256 = PS<Bls12381Shake256>;

pub trait Scheme: Eq + 'static + Sized + Serialize + DeserializeOwned {
    type Ciphersuite: PSCiphersuite;
    type PrivKey: PrivateKey;
    type PubKey: PublicKey;
}

impl<CS: PSCiphersuite> Scheme for PS<CS> {
    type Ciphersuite = CS;
    type PrivKey = PSSecretKey;
    type PubKey = PSPublicKey;
}
