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

use psabc::{
    errors::Error,
    ps::ciphersuites::Bls12381Sha256,
    service::{client::Client, server::Server},
};

type CS = Bls12381Sha256;

fn run() -> Result<bool, Error> {
    let mut rng = rand::thread_rng();
    let offered: Vec<String> = ["restaurant", "bar", "gym", "dojo"].iter().map(|s| s.to_string()).collect();

    let (server_sk, server_pk) = Server::<CS>::generate_ca(&offered, &mut rng)?;
    log::info!("Server public parameters: {} bytes", server_pk.len());

    let subscriptions = vec!["bar".to_owned(), "dojo".to_owned()];
    let (request, state) = Client::<CS>::prepare_registration(&server_pk, "alice", &subscriptions, &mut rng)?;
    let response =
        Server::<CS>::process_registration(&server_sk, &server_pk, &request, "alice", &subscriptions, &mut rng)?;
    let credential = Client::<CS>::process_registration_response(&server_pk, &response, state)?;
    log::info!("Credential: {}", String::from_utf8_lossy(&credential));

    let message = b"46.52345,6.57890";
    let types = vec!["dojo".to_owned()];
    let signature = Client::<CS>::sign_request(&server_pk, &credential, message, &types, &mut rng)?;

    Ok(Server::<CS>::check_request_signature(&server_pk, message, &types, &signature))
}

fn main() {
    dotenvy::dotenv().ok();
    env_logger::init();

    match run() {
        Ok(accepted) => log::info!("Location request accepted: {accepted}"),
        Err(e) => log::error!("{e}"),
    }
}
