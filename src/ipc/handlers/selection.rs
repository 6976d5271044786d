use crate::ipc::helpers::{board, board_mut, get_str, respond, HandlerErr};
use crate::ipc::types::{AppState, Request};

fn selection_state(state: &AppState) -> Result<serde_json::Value, HandlerErr> {
    Ok(board(state)?.selection().to_json())
}

fn selection_single(state: &mut AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let student_id = get_str(&req.params, "studentId")?;
    board_mut(state)?.select_single(student_id)?;
    selection_state(state)
}

fn selection_toggle_mode(state: &mut AppState) -> Result<serde_json::Value, HandlerErr> {
    board_mut(state)?.toggle_multi_mode();
    selection_state(state)
}

fn selection_toggle(state: &mut AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let student_id = get_str(&req.params, "studentId")?;
    board_mut(state)?.toggle_member(student_id)?;
    selection_state(state)
}

fn selection_select_all(state: &mut AppState) -> Result<serde_json::Value, HandlerErr> {
    board_mut(state)?.toggle_select_all()?;
    selection_state(state)
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "selection.get" => selection_state(state),
        "selection.single" => selection_single(state, req),
        "selection.multiToggleMode" => selection_toggle_mode(state),
        "selection.toggle" => selection_toggle(state, req),
        "selection.selectAll" => selection_select_all(state),
        _ => return None,
    };
    Some(respond(&req.id, result))
}
