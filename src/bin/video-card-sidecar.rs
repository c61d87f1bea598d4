use std::io::{self, BufRead, Write};
use std::sync::Arc;

use parking_lot::Mutex;
use serde::Deserialize;
use serde_json::{json, Value};
use time::OffsetDateTime;
use video_card_core::error::AppError;
use video_card_core::media::MediaRecord;
use video_card_core::sidecar_api::{self, PreviewOutcome};
use video_card_core::transform::DeliveryConfig;

#[derive(Debug, Deserialize)]
struct RpcRequest {
    id: u64,
    method: String,
    #[serde(default)]
    params: Value,
}

#[derive(Debug, serde::Serialize)]
struct RpcSuccess {
    id: u64,
    result: Value,
}

#[derive(Debug, serde::Serialize)]
struct RpcFailure {
    id: u64,
    error: RpcErrorPayload,
}

#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct RpcErrorPayload {
    summary: String,
    detail: String,
}

#[derive(Debug, serde::Serialize)]
struct RpcEvent {
    event: String,
    payload: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CardCreateParams {
    record: MediaRecord,
    #[serde(default)]
    config: Option<DeliveryConfig>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CardFocusParams {
    card_id: String,
    focused: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CardOutcomeParams {
    card_id: String,
    session: u64,
    outcome: PreviewOutcome,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CardIdParams {
    card_id: String,
}

type SharedWriter = Arc<Mutex<io::Stdout>>;

fn write_json_line<T: serde::Serialize>(writer: &mut impl Write, value: &T) -> io::Result<()> {
    serde_json::to_writer(&mut *writer, value)
        .map_err(|e| io::Error::other(format!("serialize response: {}", e)))?;
    writer.write_all(b"\n")?;
    writer.flush()
}

fn write_json_line_shared<T: serde::Serialize>(writer: &SharedWriter, value: &T) -> io::Result<()> {
    let mut guard = writer.lock();
    write_json_line(&mut *guard, value)
}

fn emit_rpc_event(writer: &SharedWriter, event: &str, payload: Value) {
    let message = RpcEvent {
        event: event.to_string(),
        payload,
    };
    let _ = write_json_line_shared(writer, &message);
}

fn error_payload(err: &AppError) -> RpcErrorPayload {
    let text = err.to_string();
    RpcErrorPayload {
        summary: text.clone(),
        detail: text,
    }
}

fn params_from_value<T: serde::de::DeserializeOwned>(params: Value) -> Result<T, AppError> {
    serde_json::from_value(params)
        .map_err(|e| AppError::InvalidRequest(format!("Invalid params payload: {}", e)))
}

fn to_result_value<T: serde::Serialize>(value: T) -> Result<Value, AppError> {
    serde_json::to_value(value)
        .map_err(|e| AppError::InvalidRequest(format!("Failed to serialize result: {}", e)))
}

/// Download handler injected into each card: surfaces the action to the host
/// as a `card.download` event.
fn make_download_emitter(
    writer: &SharedWriter,
    card_id: &str,
) -> video_card_core::DownloadHandler {
    let writer = Arc::clone(writer);
    let card_id = card_id.to_string();
    Arc::new(move |url, title| {
        emit_rpc_event(
            &writer,
            "card.download",
            json!({
                "cardId": card_id,
                "url": url,
                "title": title,
            }),
        );
    })
}

fn dispatch(method: &str, params: Value, writer: &SharedWriter) -> Result<Value, AppError> {
    let now = OffsetDateTime::now_utc();
    match method {
        "card.create" => {
            let parsed: CardCreateParams = params_from_value(params)?;
            let (card_id, render) =
                sidecar_api::create_card(parsed.record, parsed.config, now, |card_id| {
                    make_download_emitter(writer, card_id)
                })?;
            Ok(json!({ "cardId": card_id, "render": to_result_value(render)? }))
        }
        "card.focus" => {
            let parsed: CardFocusParams = params_from_value(params)?;
            let render = sidecar_api::set_focus(&parsed.card_id, parsed.focused, now)?;
            Ok(json!({ "render": to_result_value(render)? }))
        }
        "card.outcome" => {
            let parsed: CardOutcomeParams = params_from_value(params)?;
            let render = sidecar_api::apply_preview_outcome(
                &parsed.card_id,
                parsed.session,
                parsed.outcome,
                now,
            )?;
            Ok(json!({ "render": to_result_value(render)? }))
        }
        "card.render" => {
            let parsed: CardIdParams = params_from_value(params)?;
            let render = sidecar_api::render_card(&parsed.card_id, now)?;
            Ok(json!({ "render": to_result_value(render)? }))
        }
        "card.download" => {
            let parsed: CardIdParams = params_from_value(params)?;
            let request = sidecar_api::download_card(&parsed.card_id)?;
            to_result_value(request)
        }
        "card.destroy" => {
            let parsed: CardIdParams = params_from_value(params)?;
            sidecar_api::destroy_card(&parsed.card_id)?;
            Ok(json!({ "destroyed": true }))
        }
        _ => Err(AppError::InvalidRequest(format!(
            "Unknown method: {}",
            method
        ))),
    }
}

fn handle_request(request: RpcRequest, writer: &SharedWriter) {
    let response = match dispatch(&request.method, request.params, writer) {
        Ok(result) => serde_json::to_value(RpcSuccess {
            id: request.id,
            result,
        })
        .map_err(|e| io::Error::other(format!("serialize success: {}", e))),
        Err(err) => serde_json::to_value(RpcFailure {
            id: request.id,
            error: error_payload(&err),
        })
        .map_err(|e| io::Error::other(format!("serialize failure: {}", e))),
    };

    match response {
        Ok(value) => {
            let _ = write_json_line_shared(writer, &value);
        }
        Err(err) => {
            let failure = RpcFailure {
                id: request.id,
                error: RpcErrorPayload {
                    summary: "Serialization error".to_string(),
                    detail: err.to_string(),
                },
            };
            let _ = write_json_line_shared(writer, &failure);
        }
    }
}

fn main() -> io::Result<()> {
    env_logger::init();

    let stdin = io::stdin();
    let stdout: SharedWriter = Arc::new(Mutex::new(io::stdout()));

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                let failure = RpcFailure {
                    id: 0,
                    error: RpcErrorPayload {
                        summary: "Invalid input stream".to_string(),
                        detail: err.to_string(),
                    },
                };
                let _ = write_json_line_shared(&stdout, &failure);
                continue;
            }
        };

        if line.trim().is_empty() {
            continue;
        }

        let request: RpcRequest = match serde_json::from_str(&line) {
            Ok(request) => request,
            Err(err) => {
                let failure = RpcFailure {
                    id: 0,
                    error: RpcErrorPayload {
                        summary: "Invalid request".to_string(),
                        detail: err.to_string(),
                    },
                };
                let _ = write_json_line_shared(&stdout, &failure);
                continue;
            }
        };

        handle_request(request, &stdout);
    }

    sidecar_api::destroy_all_cards();
    Ok(())
}
