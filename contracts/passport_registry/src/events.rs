use soroban_sdk::{contracttype, symbol_short, Address, Env, String};

/// Data of the `("proj_add", project)` event.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProjectAdded {
    pub project: Address,
    pub name: String,
    pub passport_hash: String,
    pub caller: Address,
}

pub fn emit_project_added(
    env: &Env,
    project: &Address,
    name: &String,
    passport_hash: &String,
    caller: &Address,
) {
    env.events().publish(
        (symbol_short!("proj_add"), project.clone()),
        ProjectAdded {
            project: project.clone(),
            name: name.clone(),
            passport_hash: passport_hash.clone(),
            caller: caller.clone(),
        },
    );
}
