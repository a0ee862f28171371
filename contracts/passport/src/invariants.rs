#![allow(dead_code)]

extern crate std;

use std::vec::Vec;

use passport_core::MintStatus;
use soroban_sdk::Address;

use crate::PassportContractClient;

/// INV-1: token ids are sequential starting from 1.
pub fn assert_sequential_token_ids(token_ids: &[u64]) {
    for (i, id) in token_ids.iter().enumerate() {
        assert_eq!(
            *id,
            i as u64 + 1,
            "INV-1 violated: expected token id {}, got {}",
            i + 1,
            id
        );
    }
}

/// INV-2: every owner of a minted token is in `Done`.
pub fn assert_owners_done(client: &PassportContractClient, token_ids: &[u64]) {
    for id in token_ids {
        let owner = client.owner_of(id);
        assert_eq!(
            client.get_user_mint_status(&owner),
            MintStatus::Done,
            "INV-2 violated: owner of token {} is not DONE",
            id
        );
    }
}

/// INV-3: no address owns more than one passport of a project.
pub fn assert_single_passport_per_owner(client: &PassportContractClient, owners: &[Address]) {
    for owner in owners {
        assert!(
            client.balance(owner) <= 1,
            "INV-3 violated: an owner holds {} passports",
            client.balance(owner)
        );
    }
}

/// INV-4: total supply equals the number of minted token ids.
pub fn assert_supply_matches(client: &PassportContractClient, token_ids: &[u64]) {
    assert_eq!(
        client.total_supply(),
        token_ids.len() as u64,
        "INV-4 violated: total supply {} != minted {}",
        client.total_supply(),
        token_ids.len()
    );
}

/// INV-5: status discriminants are part of the ABI.
pub fn assert_status_discriminants() {
    let values: Vec<u32> = [
        MintStatus::Unavailable,
        MintStatus::Available,
        MintStatus::Done,
    ]
    .iter()
    .map(|s| *s as u32)
    .collect();
    assert_eq!(values, [0, 1, 2], "INV-5 violated: status discriminants changed");
}

/// Run all stateful passport invariants.
pub fn assert_all_passport_invariants(
    client: &PassportContractClient,
    token_ids: &[u64],
    owners: &[Address],
) {
    assert_sequential_token_ids(token_ids);
    assert_owners_done(client, token_ids);
    assert_single_passport_per_owner(client, owners);
    assert_supply_matches(client, token_ids);
}
