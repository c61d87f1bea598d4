//! Host-facing card operations for the sidecar binary.
//!
//! The registry maps host-visible card ids to live cards. Cards never share
//! state with each other; the registry lock only guards the map itself.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::card::{CardRender, DownloadHandler, VideoCard};
use crate::error::AppError;
use crate::media::MediaRecord;
use crate::transform::DeliveryConfig;

static NEXT_CARD_ID: AtomicU64 = AtomicU64::new(1);
static CARDS: std::sync::LazyLock<Mutex<HashMap<String, VideoCard>>> =
    std::sync::LazyLock::new(|| Mutex::new(HashMap::new()));

/// Load result reported by the host for a preview attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreviewOutcome {
    Loaded,
    Failed,
}

/// Download request forwarded to the host when the affordance is triggered.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadRequest {
    pub url: String,
    pub title: String,
}

fn make_card_id() -> String {
    format!("card-{}", NEXT_CARD_ID.fetch_add(1, Ordering::Relaxed))
}

/// Register a card for `record` and return its id plus the initial render.
/// `make_handler` receives the minted card id and produces the download
/// handler injected into the card.
pub fn create_card<F>(
    record: MediaRecord,
    config: Option<DeliveryConfig>,
    now: OffsetDateTime,
    make_handler: F,
) -> Result<(String, CardRender), AppError>
where
    F: FnOnce(&str) -> DownloadHandler,
{
    let card_id = make_card_id();
    let handler = make_handler(&card_id);
    let card = VideoCard::new(record, config.unwrap_or_default(), handler);
    let render = card.render(now)?;

    log::info!(
        target: "video_card::sidecar",
        "create_card: id={} source={}",
        card_id,
        card.record().source_id
    );
    CARDS.lock().insert(card_id.clone(), card);
    Ok((card_id, render))
}

/// Focus gained or lost on a card; returns the resulting render.
pub fn set_focus(card_id: &str, focused: bool, now: OffsetDateTime) -> Result<CardRender, AppError> {
    let mut cards = CARDS.lock();
    let card = cards
        .get_mut(card_id)
        .ok_or_else(|| AppError::unknown_card(card_id))?;
    if focused {
        let session = card.focus_gained();
        log::debug!(
            target: "video_card::sidecar",
            "set_focus: id={} focused session={}",
            card_id,
            session
        );
    } else {
        card.focus_lost();
        log::debug!(target: "video_card::sidecar", "set_focus: id={} unfocused", card_id);
    }
    card.render(now)
}

/// Preview load outcome for a focus session. Outcomes from sessions that are
/// no longer current leave the card untouched.
pub fn apply_preview_outcome(
    card_id: &str,
    session: u64,
    outcome: PreviewOutcome,
    now: OffsetDateTime,
) -> Result<CardRender, AppError> {
    let mut cards = CARDS.lock();
    let card = cards
        .get_mut(card_id)
        .ok_or_else(|| AppError::unknown_card(card_id))?;
    let applied = match outcome {
        PreviewOutcome::Loaded => card.preview_loaded(session),
        PreviewOutcome::Failed => card.preview_failed(session),
    };
    if !applied {
        log::debug!(
            target: "video_card::sidecar",
            "apply_preview_outcome: id={} session={} dropped as stale",
            card_id,
            session
        );
    }
    card.render(now)
}

/// Re-render a card without changing its state.
pub fn render_card(card_id: &str, now: OffsetDateTime) -> Result<CardRender, AppError> {
    let cards = CARDS.lock();
    let card = cards
        .get(card_id)
        .ok_or_else(|| AppError::unknown_card(card_id))?;
    card.render(now)
}

/// Trigger the download affordance: the card invokes its injected handler
/// and the resolved pair is returned to the caller as well.
pub fn download_card(card_id: &str) -> Result<DownloadRequest, AppError> {
    let cards = CARDS.lock();
    let card = cards
        .get(card_id)
        .ok_or_else(|| AppError::unknown_card(card_id))?;
    let (url, title) = card.request_download()?;
    Ok(DownloadRequest { url, title })
}

/// Drop a card at the end of its lifetime.
pub fn destroy_card(card_id: &str) -> Result<(), AppError> {
    let removed = CARDS.lock().remove(card_id);
    match removed {
        Some(_) => {
            log::info!(target: "video_card::sidecar", "destroy_card: id={}", card_id);
            Ok(())
        }
        None => Err(AppError::unknown_card(card_id)),
    }
}

/// Drop every registered card. Used on host disconnect and by tests.
pub fn destroy_all_cards() {
    CARDS.lock().clear();
}
