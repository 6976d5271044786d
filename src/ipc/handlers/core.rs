use crate::audio::SoundKey;
use crate::board::Board;
use crate::db;
use crate::ipc::error::{err, ok};
use crate::ipc::helpers::get_str;
use crate::ipc::types::{AppState, Request};
use crate::model::{negative_actions, positive_actions, SCORING_RULES};
use crate::store::{LoadOutcome, RosterStore, SqlitePersistence};
use crate::timers::SystemClock;
use serde_json::json;
use std::path::{Path, PathBuf};

/// Opens (or creates) the workspace database and loads its rosters into a
/// fresh board. Used by `workspace.select` and by `--workspace` at startup.
pub fn open_workspace(state: &mut AppState, path: &Path) -> anyhow::Result<LoadOutcome> {
    let conn = db::open_db(path)?;
    let backend = SqlitePersistence::new(conn, state.config.storage_key.clone());
    let config = state.config.clone();
    let (store, outcome) = RosterStore::load(Box::new(backend), || Board::seed_rosters(&config));
    state.board = Some(Board::new(config, store, Box::new(SystemClock::new())));
    state.workspace = Some(path.to_path_buf());
    tracing::info!(workspace = %path.to_string_lossy(), ?outcome, "workspace opened");
    Ok(outcome)
}

fn handle_health(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(
        &req.id,
        json!({
            "version": env!("CARGO_PKG_VERSION"),
            "workspacePath": state.workspace.as_ref().map(|p| p.to_string_lossy().to_string()),
            "config": {
                "splashMs": state.config.splash_ms,
                "drawTickMs": state.config.draw_tick_ms,
                "drawTicks": state.config.draw_ticks,
                "drawSettleMs": state.config.draw_settle_ms,
                "collationLocale": state.config.collation_locale,
                "pokemonCount": state.config.pokemon_count,
            }
        }),
    )
}

fn handle_workspace_select(state: &mut AppState, req: &Request) -> serde_json::Value {
    let path = match get_str(&req.params, "path") {
        Ok(p) => PathBuf::from(p),
        Err(e) => return e.response(&req.id),
    };

    match open_workspace(state, &path) {
        Ok(outcome) => {
            let active = state
                .board
                .as_ref()
                .and_then(|b| b.active_class_name().map(str::to_string));
            ok(
                &req.id,
                json!({
                    "workspacePath": path.to_string_lossy(),
                    "seeded": outcome != LoadOutcome::Restored,
                    "activeClass": active,
                }),
            )
        }
        Err(e) => err(&req.id, "db_open_failed", format!("{e:#}"), None),
    }
}

fn handle_actions_list(req: &Request) -> serde_json::Value {
    ok(
        &req.id,
        json!({
            "positive": positive_actions(),
            "negative": negative_actions(),
        }),
    )
}

fn handle_rules_list(req: &Request) -> serde_json::Value {
    ok(&req.id, json!({ "rules": SCORING_RULES }))
}

fn handle_sounds_list(req: &Request) -> serde_json::Value {
    let sounds: Vec<serde_json::Value> = SoundKey::ALL
        .iter()
        .map(|k| json!({ "key": k.as_str(), "url": k.url() }))
        .collect();
    ok(&req.id, json!({ "sounds": sounds }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "health" => Some(handle_health(state, req)),
        "workspace.select" => Some(handle_workspace_select(state, req)),
        "actions.list" => Some(handle_actions_list(req)),
        "rules.list" => Some(handle_rules_list(req)),
        "sounds.list" => Some(handle_sounds_list(req)),
        _ => None,
    }
}
