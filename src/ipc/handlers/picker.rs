use crate::audio::Effects;
use crate::ipc::helpers::{board, board_mut, respond, student_json, HandlerErr};
use crate::ipc::types::{AppState, Request};
use serde_json::json;

fn picker_status(state: &AppState) -> Result<serde_json::Value, HandlerErr> {
    let board = board(state)?;
    let roster = board.active_roster()?;
    Ok(json!({
        "className": roster.class_name,
        "picked": board.draw_state().picked_count(),
        "rosterSize": roster.students.len(),
        "animation": board.draw_phase(),
    }))
}

fn picker_draw(state: &mut AppState) -> Result<serde_json::Value, HandlerErr> {
    let mut fx = Effects::default();
    let chosen = board_mut(state)?.draw_now(&mut fx)?;
    let mut status = picker_status(state)?;
    status["student"] = student_json(&chosen);
    status["effects"] = fx.to_json();
    Ok(status)
}

fn picker_start(state: &mut AppState) -> Result<serde_json::Value, HandlerErr> {
    let started = board_mut(state)?.start_draw()?;
    let mut status = picker_status(state)?;
    status["started"] = json!(started);
    Ok(status)
}

fn picker_reset(state: &mut AppState) -> Result<serde_json::Value, HandlerErr> {
    board_mut(state)?.reset_draws();
    picker_status(state)
}

fn board_tick(state: &mut AppState) -> Result<serde_json::Value, HandlerErr> {
    let mut fx = Effects::default();
    let report = board_mut(state)?.tick(&mut fx)?;
    let board = board(state)?;
    Ok(json!({
        "rolled": report.rolled.iter().map(student_json).collect::<Vec<_>>(),
        "committed": report.committed.as_ref().map(student_json),
        "splashCleared": report.splash_cleared,
        "splash": board.splash(),
        "animation": board.draw_phase(),
        "effects": fx.to_json(),
    }))
}

fn board_splash(state: &AppState) -> Result<serde_json::Value, HandlerErr> {
    let board = board(state)?;
    Ok(json!({
        "splash": board.splash(),
        "remainingMs": board.splash_remaining_ms(),
    }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "picker.status" => picker_status(state),
        "picker.draw" => picker_draw(state),
        "picker.start" => picker_start(state),
        "picker.reset" => picker_reset(state),
        "board.tick" => board_tick(state),
        "board.splash" => board_splash(state),
        _ => return None,
    };
    Some(respond(&req.id, result))
}
