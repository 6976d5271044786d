use crate::ipc::helpers::{board, board_mut, get_str, opt_str, respond, student_json, HandlerErr};
use crate::ipc::types::{AppState, Request};
use crate::sort::SortCriterion;
use serde_json::json;

fn students_list(state: &mut AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    if let Some(raw) = opt_str(&req.params, "sort") {
        let criterion = SortCriterion::parse(raw).ok_or_else(|| HandlerErr {
            code: "bad_params",
            message: "sort must be one of: id, scoreDesc, scoreAsc, name".to_string(),
            details: Some(json!({ "sort": raw })),
        })?;
        board_mut(state)?.set_sort(criterion);
    }

    let board = board(state)?;
    let sort = board.sort();
    let roster = board.active_roster()?;
    let students: Vec<serde_json::Value> = board
        .sorted_students(sort)?
        .iter()
        .map(|r| {
            let mut v = student_json(&r.student);
            if let Some(rank) = r.rank {
                v["rank"] = json!(rank);
            }
            v["picked"] = json!(board.draw_state().picked().contains(&r.student.id));
            v
        })
        .collect();

    Ok(json!({
        "className": roster.class_name,
        "sort": sort.as_str(),
        "students": students,
    }))
}

fn students_set_avatar(state: &mut AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let student_id = get_str(&req.params, "studentId")?;
    let pokemon_id = match req.params.get("pokemonId") {
        None | Some(serde_json::Value::Null) => None,
        Some(v) => {
            let id = v
                .as_u64()
                .and_then(|n| u32::try_from(n).ok())
                .ok_or_else(|| HandlerErr::bad_params("pokemonId must be a positive integer"))?;
            Some(id)
        }
    };
    let student = board_mut(state)?.set_avatar(student_id, pokemon_id)?;
    Ok(json!({ "student": student_json(&student) }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "students.list" => Some(respond(&req.id, students_list(state, req))),
        "students.setAvatar" => Some(respond(&req.id, students_set_avatar(state, req))),
        _ => None,
    }
}
