extern crate std;

use std::format;
use std::string::String as StdString;
use std::vec;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use passport_core::Error;
use serde_json::Value;
use soroban_sdk::{testutils::Address as _, Address, String};

use crate::test::{setup, setup_project, PASSPORT_HASH, PROJECT_CATALOG, PROJECT_NAME};

const DATA_URI_PREFIX: &str = "data:application/json;base64,";

fn to_std(value: &String) -> StdString {
    let mut bytes = vec![0u8; value.len() as usize];
    value.copy_into_slice(&mut bytes);
    StdString::from_utf8(bytes).unwrap()
}

fn decode_token_uri(uri: &String) -> Value {
    let uri = to_std(uri);
    let encoded = uri
        .strip_prefix(DATA_URI_PREFIX)
        .expect("token URI is not a base64 JSON data URI");
    let json = STANDARD.decode(encoded).unwrap();
    serde_json::from_slice(&json).unwrap()
}

#[test]
fn test_token_uri_json() {
    let (env, client, admin) = setup();
    let learner = Address::generate(&env);
    client.change_status_to_available(&admin, &learner);
    let token_id = client.mint(&learner);

    let object = decode_token_uri(&client.token_uri(&token_id));

    assert_eq!(object["name"], "UNCHAIN Passport: ETH dApp");
    assert_eq!(
        object["description"],
        "Immutable and permanent proof of your UNCHAIN project completion."
    );
    assert_eq!(object["image"], format!("https://ipfs.io/ipfs/{PASSPORT_HASH}"));
    assert_eq!(object["attributes"][0]["trait_type"], "UNCHAIN Project");
    assert_eq!(object["attributes"][0]["value"], PROJECT_NAME);
}

#[test]
fn test_token_uri_for_every_catalog_project() {
    for (name, hash) in PROJECT_CATALOG {
        let (env, client, admin) = setup_project(name, hash);
        let learner = Address::generate(&env);
        let token_id = client.mint_by_admin(&admin, &admin, &learner);

        let object = decode_token_uri(&client.token_uri(&token_id));
        assert_eq!(object["name"], format!("UNCHAIN Passport: {name}"));
        assert_eq!(object["image"], format!("https://ipfs.io/ipfs/{hash}"));
        assert_eq!(object["attributes"][0]["value"], *name);
    }
}

#[test]
fn test_token_uri_unknown_token() {
    let (_, client, _) = setup();
    assert_eq!(
        client.try_token_uri(&1),
        Err(Ok(Error::TokenNotFound.into()))
    );
}
