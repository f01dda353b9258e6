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

//! The three parties of the credential protocol, each holding only the key material it is entitled to.
//!
//! KeyGen -> [`holder::Holder::create_issue_request`] -> [`issuer::Issuer::sign_issue_request`] ->
//! [`holder::Holder::obtain_credential`] -> [`holder::Holder::create_disclosure_proof`] ->
//! [`verifier::Verifier::verify_disclosure_proof`]

pub mod holder;
pub mod issuer;
pub mod verifier;
