//! Long-running background task that polls the Soroban RPC and writes
//! decoded passport events to the database.
//!
//! The RPC filter only matches on topic symbols, so events from unrelated
//! contracts that happen to reuse `status` or `minted` come back too. Only
//! events emitted by the registry, or by a project the registry has added,
//! are kept.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use sqlx::SqlitePool;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::config::Config;
use crate::db;
use crate::events::{EventKind, PassportEvent};
use crate::rpc;

pub struct IndexerState {
    pub pool: SqlitePool,
    pub config: Config,
    pub client: Client,
}

/// Run the indexer loop until `shutdown` is cancelled.
pub async fn run(state: Arc<IndexerState>, shutdown: CancellationToken) {
    info!(
        "Indexer starting, registry: {}",
        state.config.registry_contract_id
    );

    // Load the cursor from the DB; fall back to config start_ledger.
    let last_ledger = db::get_last_ledger(&state.pool).await.unwrap_or(0);
    let mut cursor = db::get_cursor_string(&state.pool).await.unwrap_or(None);

    let mut current_ledger = if last_ledger > 0 {
        last_ledger as u32
    } else {
        state.config.start_ledger
    };

    info!("Resuming from ledger {current_ledger}");

    loop {
        match poll_once(
            &state.pool,
            &state.client,
            &state.config,
            current_ledger,
            cursor.as_deref(),
        )
        .await
        {
            Ok((next_ledger, next_cursor)) => {
                current_ledger = next_ledger;
                cursor = next_cursor;
            }
            Err(e) => {
                error!("Indexer poll error: {e}");
            }
        }

        tokio::select! {
            _ = shutdown.cancelled() => {
                info!("Indexer stopped at ledger {current_ledger}");
                return;
            }
            _ = tokio::time::sleep(Duration::from_secs(state.config.poll_interval_secs)) => {}
        }
    }
}

/// Perform a single poll iteration.
///
/// Returns `(next_start_ledger, next_cursor)`.
async fn poll_once(
    pool: &SqlitePool,
    client: &Client,
    config: &Config,
    start_ledger: u32,
    cursor: Option<&str>,
) -> crate::errors::Result<(u32, Option<String>)> {
    let (raw_events, next_cursor, latest_ledger) = rpc::fetch_events(
        client,
        &config.rpc_url,
        start_ledger,
        cursor,
        config.events_per_page,
    )
    .await?;

    if !raw_events.is_empty() {
        let decoded = rpc::decode_events(&raw_events);
        let mut known: HashSet<String> = db::get_projects(pool, &config.registry_contract_id)
            .await?
            .into_iter()
            .map(|p| p.address)
            .collect();
        let relevant = retain_relevant(decoded, &config.registry_contract_id, &mut known);
        let inserted = db::insert_events(pool, &relevant).await?;
        info!(
            "Polled {} raw events, {} relevant, {} new records stored",
            raw_events.len(),
            relevant.len(),
            inserted
        );
    }

    // With a pagination cursor the next call stays inside the same range;
    // otherwise jump to the latest ledger the RPC has seen.
    let next_ledger = latest_ledger
        .map(|l| (l as u32).max(start_ledger))
        .unwrap_or(start_ledger);

    db::save_cursor(pool, next_ledger as i64, next_cursor.as_deref()).await?;

    Ok((next_ledger, next_cursor))
}

/// Keep events emitted by the registry or by a project it has added.
///
/// `known` is extended with projects added earlier in the same batch, so a
/// project's first status change is kept even when it lands in the same page
/// as its registration.
pub fn retain_relevant(
    events: Vec<PassportEvent>,
    registry_id: &str,
    known: &mut HashSet<String>,
) -> Vec<PassportEvent> {
    events
        .into_iter()
        .filter(|ev| {
            if ev.contract_id == registry_id {
                if ev.event_type == EventKind::ProjectAdded.as_str() {
                    if let Some(project) = &ev.subject {
                        known.insert(project.clone());
                    }
                }
                return true;
            }
            let keep = known.contains(&ev.contract_id);
            if !keep {
                debug!(
                    "Skipping {} event from unregistered contract {}",
                    ev.event_type, ev.contract_id
                );
            }
            keep
        })
        .collect()
}
