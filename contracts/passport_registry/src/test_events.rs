extern crate std;

use soroban_sdk::{
    symbol_short,
    testutils::{Address as _, Events},
    vec, Address, IntoVal, TryIntoVal,
};

use passport::events::TokenMinted;

use crate::events::ProjectAdded;
use crate::test::setup;

#[test]
fn test_project_added_event() {
    let f = setup();
    f.registry
        .add_project_contract_address(&f.admin, &f.project.address);

    let last_event = f.env.events().all().last().expect("No events found");

    // Topic: (symbol_short!("proj_add"), project)
    assert_eq!(last_event.0, f.registry.address);
    let expected_topics = vec![
        &f.env,
        symbol_short!("proj_add").into_val(&f.env),
        f.project.address.into_val(&f.env),
    ];
    assert_eq!(last_event.1, expected_topics);

    let event_data: ProjectAdded = last_event.2.try_into_val(&f.env).unwrap();
    assert_eq!(
        event_data,
        ProjectAdded {
            project: f.project.address.clone(),
            name: f.project.get_project_name(),
            passport_hash: f.project.get_passport_hash(),
            caller: f.admin.clone(),
        }
    );
}

#[test]
fn test_forwarded_mint_event_comes_from_project() {
    let f = setup();
    let learner = Address::generate(&f.env);
    f.registry
        .change_status_to_available(&f.admin, &f.project.address, &learner);

    f.registry.mint(&learner, &f.project.address);

    let last_event = f.env.events().all().last().expect("No events found");
    assert_eq!(last_event.0, f.project.address);
    let expected_topics = vec![
        &f.env,
        symbol_short!("minted").into_val(&f.env),
        learner.into_val(&f.env),
    ];
    assert_eq!(last_event.1, expected_topics);
}

#[test]
fn test_multi_mint_attributes_tokens_to_admin() {
    let f = setup();
    let learner = Address::generate(&f.env);

    f.registry.multi_mint(
        &f.admin,
        &vec![&f.env, f.project.address.clone()],
        &vec![&f.env, learner.clone()],
    );

    let last_event = f.env.events().all().last().expect("No events found");
    assert_eq!(last_event.0, f.project.address);
    let event_data: TokenMinted = last_event.2.try_into_val(&f.env).unwrap();
    assert_eq!(
        event_data,
        TokenMinted {
            minter: f.admin.clone(),
            recipient: learner,
            token_id: 1,
        }
    );
    assert_ne!(event_data.minter, f.registry.address);
}
