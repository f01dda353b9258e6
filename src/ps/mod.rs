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

//! Anonymous credentials built on [Pointcheval-Sanders signatures](https://eprint.iacr.org/2015/525)
//! over the BLS12-381 pairing-friendly curve.
//! A PS signature signs a vector of attributes with a constant size `(s1, s2)` pair in G1.
//! Key characteristics of the scheme:
//! - **Blind Issuance**: the holder commits to some attributes and proves knowledge of the opening,
//!                       so the issuer signs them without learning their value.
//! - **Selective Disclosure**: the holder proves possession of a signature while revealing only a chosen
//!                             subset of attributes, bound to an application message.
//! - **Unlinkable Proofs**: every showing re-randomizes the signature, so proofs derived from the same
//!                          credential can not be correlated.
//! # Usage
//! The scheme is enabled by default. The optional `service` feature adds a byte-oriented
//! subscription facade on top of it.
//! ```toml
//! psabc = { version = "0.1", default-features = false }
//! ```

/// Module for blind issuance: holder requests and blind signatures
pub mod blind;
/// Module for the available ciphersuites
pub mod ciphersuites;
pub mod commitment;
/// Module for credentials obtained through blind issuance
pub mod credential;
/// Module for the issuer keys
pub mod keys;
/// Module for selective disclosure proofs
pub mod proof;
pub mod signature;
/// Module for the Fiat-Shamir proofs of knowledge shared by issuance and showing
pub mod zkpok;
