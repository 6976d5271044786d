use crate::ipc::error::ok;
use crate::ipc::helpers::{board_mut, get_str, respond, HandlerErr};
use crate::ipc::types::{AppState, Request};
use serde_json::json;

fn handle_classes_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(board) = state.board.as_ref() else {
        return ok(&req.id, json!({ "classes": [], "activeClass": null }));
    };

    // Counts let the class picker show roster sizes without a second call.
    let classes: Vec<serde_json::Value> = board
        .rosters()
        .iter()
        .map(|c| {
            json!({
                "className": c.class_name,
                "studentCount": c.students.len(),
                "totalPoints": c.students.iter().map(|s| s.points).sum::<i64>(),
            })
        })
        .collect();
    ok(
        &req.id,
        json!({
            "classes": classes,
            "activeClass": board.active_class_name(),
            "revision": board.revision(),
        }),
    )
}

fn classes_select(state: &mut AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let class_name = get_str(&req.params, "className")?;
    let board = board_mut(state)?;
    board.select_class(class_name)?;
    Ok(json!({
        "activeClass": class_name,
        "studentCount": board.active_roster()?.students.len(),
    }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "classes.list" => Some(handle_classes_list(state, req)),
        "classes.select" => Some(respond(&req.id, classes_select(state, req))),
        _ => None,
    }
}
