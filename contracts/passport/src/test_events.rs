extern crate std;

use passport_core::{MintStatus, Role};
use soroban_sdk::{
    symbol_short,
    testutils::{Address as _, Events},
    vec, Address, IntoVal, TryIntoVal,
};

use crate::events::{StatusChanged, TokenMinted};
use crate::test::setup;

#[test]
fn test_status_changed_event() {
    let (env, client, admin) = setup();
    let learner = Address::generate(&env);

    client.change_status_to_available(&admin, &learner);

    let last_event = env.events().all().last().expect("No events found");

    // Topic: (symbol_short!("status"), user)
    assert_eq!(last_event.0, client.address);
    let expected_topics = vec![
        &env,
        symbol_short!("status").into_val(&env),
        learner.into_val(&env),
    ];
    assert_eq!(last_event.1, expected_topics);

    let event_data: StatusChanged = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        StatusChanged {
            user: learner.clone(),
            status: MintStatus::Available,
            changed_by: admin.clone(),
        }
    );
}

#[test]
fn test_self_mint_event() {
    let (env, client, admin) = setup();
    let learner = Address::generate(&env);
    client.change_status_to_available(&admin, &learner);

    let token_id = client.mint(&learner);

    let last_event = env.events().all().last().expect("No events found");

    // Topic: (symbol_short!("minted"), recipient)
    assert_eq!(last_event.0, client.address);
    let expected_topics = vec![
        &env,
        symbol_short!("minted").into_val(&env),
        learner.into_val(&env),
    ];
    assert_eq!(last_event.1, expected_topics);

    // The learner is both minter and recipient.
    let event_data: TokenMinted = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        TokenMinted {
            minter: learner.clone(),
            recipient: learner.clone(),
            token_id,
        }
    );
}

#[test]
fn test_admin_mint_event_names_admin_as_minter() {
    let (env, client, admin) = setup();
    let learner_a = Address::generate(&env);
    let learner_b = Address::generate(&env);

    client.mint_by_admin(&admin, &admin, &learner_a);
    client.mint_by_admin(&admin, &admin, &learner_b);

    let last_event = env.events().all().last().expect("No events found");
    let event_data: TokenMinted = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        TokenMinted {
            minter: admin.clone(),
            recipient: learner_b.clone(),
            token_id: 2,
        }
    );
}

#[test]
fn test_mint_also_reports_done_status() {
    let (env, client, admin) = setup();
    let learner = Address::generate(&env);

    client.mint_by_admin(&admin, &admin, &learner);

    let all_events = env.events().all();
    let status_event = all_events
        .get(all_events.len() - 2)
        .expect("status event missing");
    let event_data: StatusChanged = status_event.2.try_into_val(&env).unwrap();
    assert_eq!(event_data.status, MintStatus::Done);
    assert_eq!(event_data.user, learner);
}

#[test]
fn test_controller_mint_attributed_to_named_minter() {
    let (env, client, admin) = setup();
    let controller = Address::generate(&env);
    let learner = Address::generate(&env);
    client.grant_role(&admin, &controller, &Role::Controller);

    client.mint_by_admin(&controller, &admin, &learner);

    let all_events = env.events().all();
    let minted: TokenMinted = all_events
        .last()
        .expect("No events found")
        .2
        .try_into_val(&env)
        .unwrap();
    assert_eq!(minted.minter, admin);

    let status_event = all_events
        .get(all_events.len() - 2)
        .expect("status event missing");
    let status: StatusChanged = status_event.2.try_into_val(&env).unwrap();
    assert_eq!(status.changed_by, admin);
}
