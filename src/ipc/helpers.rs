use crate::board::{Board, BoardError};
use crate::ipc::error::{err, ok};
use crate::ipc::types::AppState;
use crate::model::{avatar_url, Student};
use serde_json::{json, Value};

pub struct HandlerErr {
    pub code: &'static str,
    pub message: String,
    pub details: Option<Value>,
}

impl HandlerErr {
    pub fn bad_params(message: impl Into<String>) -> Self {
        Self {
            code: "bad_params",
            message: message.into(),
            details: None,
        }
    }

    pub fn response(self, id: &str) -> Value {
        err(id, self.code, self.message, self.details)
    }
}

impl From<BoardError> for HandlerErr {
    fn from(e: BoardError) -> Self {
        Self {
            code: e.code(),
            message: e.to_string(),
            details: None,
        }
    }
}

pub fn respond(id: &str, result: Result<Value, HandlerErr>) -> Value {
    match result {
        Ok(v) => ok(id, v),
        Err(e) => e.response(id),
    }
}

pub fn board(state: &AppState) -> Result<&Board, HandlerErr> {
    state.board.as_ref().ok_or_else(no_workspace)
}

pub fn board_mut(state: &mut AppState) -> Result<&mut Board, HandlerErr> {
    state.board.as_mut().ok_or_else(no_workspace)
}

fn no_workspace() -> HandlerErr {
    HandlerErr {
        code: "no_workspace",
        message: "select a workspace first".to_string(),
        details: None,
    }
}

pub fn get_str<'a>(params: &'a Value, key: &str) -> Result<&'a str, HandlerErr> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| HandlerErr::bad_params(format!("missing {key}")))
}

pub fn opt_str<'a>(params: &'a Value, key: &str) -> Option<&'a str> {
    params.get(key).and_then(|v| v.as_str())
}

pub fn student_json(s: &Student) -> Value {
    let mut v = json!(s);
    v["avatarUrl"] = json!(avatar_url(s.pokemon_id));
    v
}
