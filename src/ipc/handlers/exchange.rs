use crate::ipc::helpers::{board_mut, get_str, respond, HandlerErr};
use crate::ipc::types::{AppState, Request};
use serde_json::json;
use std::path::PathBuf;

fn exchange_export(state: &mut AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let dir = PathBuf::from(get_str(&req.params, "dir")?);
    let path = board_mut(state)?.export_to(&dir)?;
    Ok(json!({
        "path": path.to_string_lossy(),
        "fileName": path.file_name().map(|n| n.to_string_lossy().to_string()),
    }))
}

fn exchange_import(state: &mut AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let path = PathBuf::from(get_str(&req.params, "path")?);
    let board = board_mut(state)?;
    let count = board.import_from(&path)?;
    Ok(json!({
        "classCount": count,
        "activeClass": board.active_class_name(),
    }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "exchange.export" => Some(respond(&req.id, exchange_export(state, req))),
        "exchange.import" => Some(respond(&req.id, exchange_import(state, req))),
        _ => None,
    }
}
