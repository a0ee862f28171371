//! Database layer: migrations, queries, and cursor management.
//!
//! Only raw events are written. Projects, tokens and per-user statuses are
//! projections computed by the read queries below, so replaying events is
//! always safe.

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::info;

use crate::errors::Result;
use crate::events::{
    EventRecord, MintStatus, PassportEvent, ProjectRecord, TokenRecord, UserPassport,
};

/// Establish a SQLite connection pool and run pending migrations.
pub async fn init_pool(database_url: &str) -> Result<SqlitePool> {
    let url = if database_url.starts_with("sqlite:") {
        database_url.to_string()
    } else {
        format!("sqlite:{database_url}")
    };

    // Every in-memory connection is its own database.
    let max_connections = if url.contains(":memory:") { 1 } else { 5 };

    let options = SqliteConnectOptions::from_str(&url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;
    info!("Database migrations applied successfully");
    Ok(pool)
}

// ─────────────────────────────────────────────────────────
// Cursor helpers
// ─────────────────────────────────────────────────────────

/// Read the last-seen ledger from the cursor row.
/// Returns `0` when no cursor has been persisted yet.
pub async fn get_last_ledger(pool: &SqlitePool) -> Result<i64> {
    let row: Option<(i64,)> = sqlx::query_as("SELECT last_ledger FROM indexer_cursor WHERE id = 1")
        .fetch_optional(pool)
        .await?;
    Ok(row.map(|(v,)| v).unwrap_or(0))
}

/// Persist the last-seen ledger (and optionally a pagination cursor string).
pub async fn save_cursor(
    pool: &SqlitePool,
    last_ledger: i64,
    last_cursor: Option<&str>,
) -> Result<()> {
    sqlx::query("UPDATE indexer_cursor SET last_ledger = ?1, last_cursor = ?2 WHERE id = 1")
        .bind(last_ledger)
        .bind(last_cursor)
        .execute(pool)
        .await?;
    Ok(())
}

/// Read back the raw cursor string (used to resume pagination mid-ledger).
pub async fn get_cursor_string(pool: &SqlitePool) -> Result<Option<String>> {
    let row: Option<(Option<String>,)> =
        sqlx::query_as("SELECT last_cursor FROM indexer_cursor WHERE id = 1")
            .fetch_optional(pool)
            .await?;
    Ok(row.and_then(|(v,)| v))
}

// ─────────────────────────────────────────────────────────
// Event writes
// ─────────────────────────────────────────────────────────

/// Persist a batch of decoded events. Events whose `event_id` was already
/// stored are silently ignored to make the indexer idempotent.
pub async fn insert_events(pool: &SqlitePool, events: &[PassportEvent]) -> Result<usize> {
    let mut tx = pool.begin().await?;
    let mut count = 0usize;
    for ev in events {
        let rows_affected = sqlx::query(
            r#"
            INSERT OR IGNORE INTO events
                (event_id, event_type, contract_id, subject, actor, status, role,
                 token_id, name, passport_hash, ledger, timestamp, tx_hash)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
            "#,
        )
        .bind(&ev.event_id)
        .bind(&ev.event_type)
        .bind(&ev.contract_id)
        .bind(&ev.subject)
        .bind(&ev.actor)
        .bind(&ev.status)
        .bind(&ev.role)
        .bind(ev.token_id)
        .bind(&ev.name)
        .bind(&ev.passport_hash)
        .bind(ev.ledger)
        .bind(ev.timestamp)
        .bind(&ev.tx_hash)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        count += rows_affected as usize;
    }
    tx.commit().await?;
    Ok(count)
}

// ─────────────────────────────────────────────────────────
// Event reads
// ─────────────────────────────────────────────────────────

const EVENT_COLUMNS: &str = "id, event_id, event_type, contract_id, subject, actor, status, role, \
     token_id, name, passport_hash, ledger, timestamp, tx_hash, created_at";

/// Fetch all events emitted by `contract_id`, ordered by ledger ascending.
pub async fn get_events_for_contract(
    pool: &SqlitePool,
    contract_id: &str,
) -> Result<Vec<EventRecord>> {
    let sql = format!(
        "SELECT {EVENT_COLUMNS} FROM events WHERE contract_id = ?1 ORDER BY ledger ASC, id ASC"
    );
    let rows = sqlx::query_as::<_, EventRecord>(&sql)
        .bind(contract_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Fetch all events, ordered by ledger ascending.
pub async fn get_all_events(pool: &SqlitePool) -> Result<Vec<EventRecord>> {
    let sql = format!("SELECT {EVENT_COLUMNS} FROM events ORDER BY ledger ASC, id ASC");
    let rows = sqlx::query_as::<_, EventRecord>(&sql)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

// ─────────────────────────────────────────────────────────
// Projections
// ─────────────────────────────────────────────────────────

/// Projects added through `registry_id`, in registration order.
pub async fn get_projects(pool: &SqlitePool, registry_id: &str) -> Result<Vec<ProjectRecord>> {
    let rows = sqlx::query_as::<_, ProjectRecord>(
        r#"
        SELECT subject AS address, name, passport_hash, MIN(ledger) AS ledger
        FROM   events
        WHERE  event_type = 'project_added'
          AND  contract_id = ?1
          AND  subject IS NOT NULL
          AND  name IS NOT NULL
          AND  passport_hash IS NOT NULL
        GROUP  BY subject
        ORDER  BY MIN(ledger) ASC, MIN(id) ASC
        "#,
    )
    .bind(registry_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Passports minted by `project`, ordered by token id.
pub async fn get_tokens(pool: &SqlitePool, project: &str) -> Result<Vec<TokenRecord>> {
    let rows = sqlx::query_as::<_, TokenRecord>(
        r#"
        SELECT token_id, subject AS owner, actor AS minter, ledger, tx_hash
        FROM   events
        WHERE  event_type = 'token_minted'
          AND  contract_id = ?1
          AND  token_id IS NOT NULL
          AND  subject IS NOT NULL
        ORDER  BY token_id ASC
        "#,
    )
    .bind(project)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// `user`'s latest status and token on every registered project.
/// Projects the user never touched report `Unavailable`.
pub async fn get_user_passports(
    pool: &SqlitePool,
    registry_id: &str,
    user: &str,
) -> Result<Vec<UserPassport>> {
    let rows: Vec<(String, String, String, Option<String>, Option<i64>)> = sqlx::query_as(
        r#"
        SELECT p.address, p.name, p.passport_hash,
               (SELECT s.status FROM events s
                 WHERE s.contract_id = p.address
                   AND s.subject = ?2
                   AND s.event_type = 'status_changed'
                 ORDER BY s.ledger DESC, s.id DESC
                 LIMIT 1) AS status,
               (SELECT m.token_id FROM events m
                 WHERE m.contract_id = p.address
                   AND m.subject = ?2
                   AND m.event_type = 'token_minted'
                 ORDER BY m.ledger DESC, m.id DESC
                 LIMIT 1) AS token_id
        FROM (
            SELECT subject AS address, name, passport_hash,
                   MIN(ledger) AS ledger, MIN(id) AS first_id
            FROM   events
            WHERE  event_type = 'project_added'
              AND  contract_id = ?1
              AND  subject IS NOT NULL
              AND  name IS NOT NULL
              AND  passport_hash IS NOT NULL
            GROUP  BY subject
        ) p
        ORDER BY p.ledger ASC, p.first_id ASC
        "#,
    )
    .bind(registry_id)
    .bind(user)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(project, name, passport_hash, status, token_id)| UserPassport {
            project,
            name,
            passport_hash,
            status: status
                .as_deref()
                .and_then(MintStatus::parse)
                .unwrap_or(MintStatus::Unavailable),
            token_id,
        })
        .collect())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) const REGISTRY: &str = "CREGISTRY";
    pub(crate) const PROJECT: &str = "CPASSPORT";

    pub(crate) fn event(
        event_id: &str,
        event_type: &str,
        contract_id: &str,
        ledger: i64,
    ) -> PassportEvent {
        PassportEvent {
            event_id: event_id.to_string(),
            event_type: event_type.to_string(),
            contract_id: contract_id.to_string(),
            subject: None,
            actor: None,
            status: None,
            role: None,
            token_id: None,
            name: None,
            passport_hash: None,
            ledger,
            timestamp: 0,
            tx_hash: None,
        }
    }

    pub(crate) fn project_added(
        event_id: &str,
        project: &str,
        name: &str,
        ledger: i64,
    ) -> PassportEvent {
        PassportEvent {
            subject: Some(project.to_string()),
            name: Some(name.to_string()),
            passport_hash: Some(format!("Qm{name}")),
            ..event(event_id, "project_added", REGISTRY, ledger)
        }
    }

    pub(crate) fn status_changed(
        event_id: &str,
        user: &str,
        status: &str,
        ledger: i64,
    ) -> PassportEvent {
        PassportEvent {
            subject: Some(user.to_string()),
            status: Some(status.to_string()),
            ..event(event_id, "status_changed", PROJECT, ledger)
        }
    }

    pub(crate) fn token_minted(
        event_id: &str,
        user: &str,
        token_id: i64,
        ledger: i64,
    ) -> PassportEvent {
        PassportEvent {
            subject: Some(user.to_string()),
            actor: Some(user.to_string()),
            status: Some("done".to_string()),
            token_id: Some(token_id),
            ..event(event_id, "token_minted", PROJECT, ledger)
        }
    }

    pub(crate) async fn memory_pool() -> SqlitePool {
        init_pool("sqlite::memory:").await.unwrap()
    }

    #[tokio::test]
    async fn insert_is_idempotent() {
        let pool = memory_pool().await;
        let events = vec![
            project_added("e1", PROJECT, "ETH dApp", 10),
            status_changed("e2", "GLEARNER", "available", 11),
        ];

        assert_eq!(insert_events(&pool, &events).await.unwrap(), 2);
        assert_eq!(insert_events(&pool, &events).await.unwrap(), 0);
        assert_eq!(get_all_events(&pool).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn cursor_round_trip() {
        let pool = memory_pool().await;
        assert_eq!(get_last_ledger(&pool).await.unwrap(), 0);
        assert_eq!(get_cursor_string(&pool).await.unwrap(), None);

        save_cursor(&pool, 1234, Some("cursor-1")).await.unwrap();

        assert_eq!(get_last_ledger(&pool).await.unwrap(), 1234);
        assert_eq!(
            get_cursor_string(&pool).await.unwrap().as_deref(),
            Some("cursor-1")
        );
    }

    #[tokio::test]
    async fn projects_only_from_registry() {
        let pool = memory_pool().await;
        let mut spoofed = project_added("e3", "CSPOOF", "Spoof", 5);
        spoofed.contract_id = "COTHER".to_string();
        insert_events(
            &pool,
            &[
                project_added("e1", PROJECT, "ETH dApp", 10),
                project_added("e2", "CSECOND", "ETH DAO", 12),
                spoofed,
            ],
        )
        .await
        .unwrap();

        let projects = get_projects(&pool, REGISTRY).await.unwrap();
        let names: Vec<&str> = projects.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["ETH dApp", "ETH DAO"]);
        assert_eq!(projects[0].address, PROJECT);
    }

    #[tokio::test]
    async fn user_passports_use_latest_status() {
        let pool = memory_pool().await;
        insert_events(
            &pool,
            &[
                project_added("e1", PROJECT, "ETH dApp", 10),
                project_added("e2", "CSECOND", "ETH DAO", 10),
                status_changed("e3", "GLEARNER", "available", 11),
                status_changed("e4", "GLEARNER", "done", 12),
                token_minted("e5", "GLEARNER", 1, 12),
                status_changed("e6", "GOTHER", "available", 13),
            ],
        )
        .await
        .unwrap();

        let passports = get_user_passports(&pool, REGISTRY, "GLEARNER").await.unwrap();
        assert_eq!(passports.len(), 2);
        assert_eq!(passports[0].project, PROJECT);
        assert_eq!(passports[0].status, MintStatus::Done);
        assert_eq!(passports[0].token_id, Some(1));
        assert_eq!(passports[1].status, MintStatus::Unavailable);
        assert_eq!(passports[1].token_id, None);
    }

    #[tokio::test]
    async fn tokens_listed_by_id() {
        let pool = memory_pool().await;
        insert_events(
            &pool,
            &[
                token_minted("e2", "GBOB", 2, 21),
                token_minted("e1", "GALICE", 1, 20),
            ],
        )
        .await
        .unwrap();

        let tokens = get_tokens(&pool, PROJECT).await.unwrap();
        let owners: Vec<&str> = tokens.iter().map(|t| t.owner.as_str()).collect();
        assert_eq!(owners, ["GALICE", "GBOB"]);
        assert_eq!(get_events_for_contract(&pool, PROJECT).await.unwrap().len(), 2);
    }
}
