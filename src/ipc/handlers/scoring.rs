use crate::audio::Effects;
use crate::ipc::helpers::{board_mut, get_str, respond, HandlerErr};
use crate::ipc::types::{AppState, Request};
use crate::model::{catalog_action, Action, Polarity};
use crate::scoring::ScoringSummary;
use serde_json::json;

fn applied(
    summary: Option<ScoringSummary>,
    fx: &Effects,
    state: &AppState,
) -> serde_json::Value {
    let splash = state.board.as_ref().and_then(|b| b.splash().cloned());
    json!({
        "submitted": summary.is_some(),
        "summary": summary,
        "splash": splash,
        "effects": fx.to_json(),
    })
}

fn resolve_catalog_action(req: &Request) -> Result<Action, HandlerErr> {
    let polarity_raw = get_str(&req.params, "polarity")?;
    let polarity = Polarity::parse(polarity_raw).ok_or_else(|| HandlerErr {
        code: "bad_params",
        message: "polarity must be one of: positive, negative".to_string(),
        details: Some(json!({ "polarity": polarity_raw })),
    })?;
    let index = req
        .params
        .get("actionIndex")
        .and_then(|v| v.as_u64())
        .ok_or_else(|| HandlerErr::bad_params("missing actionIndex"))?;
    catalog_action(polarity, index as usize).ok_or_else(|| HandlerErr {
        code: "not_found",
        message: "action not found".to_string(),
        details: Some(json!({ "polarity": polarity_raw, "actionIndex": index })),
    })
}

fn scoring_apply(state: &mut AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let action = resolve_catalog_action(req)?;
    let mut fx = Effects::default();
    let summary = board_mut(state)?.apply_action(&action, &mut fx)?;
    Ok(applied(summary, &fx, state))
}

fn scoring_manual(state: &mut AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    // Accept either the raw text from the input box or a JSON number.
    let input = match req.params.get("value") {
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(serde_json::Value::Number(n)) => n.to_string(),
        _ => String::new(),
    };
    let mut fx = Effects::default();
    let summary = board_mut(state)?.apply_manual(&input, &mut fx)?;
    Ok(applied(summary, &fx, state))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "scoring.apply" => Some(respond(&req.id, scoring_apply(state, req))),
        "scoring.manual" => Some(respond(&req.id, scoring_manual(state, req))),
        _ => None,
    }
}
