//! Card presenter: composes the record, preview state, and formatting into a
//! declarative render description for the hosting surface.

use std::sync::Arc;

use serde::Serialize;
use time::OffsetDateTime;

use crate::error::AppError;
use crate::format::{
    compression_percentage, format_byte_size, format_duration, format_relative_time,
};
use crate::media::MediaRecord;
use crate::preview::{PreviewState, Visual};
use crate::transform::{delivery_url, DeliveryConfig, ProfileId};

/// Host callback invoked with `(url, title)` when the user triggers a
/// download. Injected at construction; the core never performs the download
/// itself and never observes its outcome.
pub type DownloadHandler = Arc<dyn Fn(&str, &str) + Send + Sync>;

/// One interactive card over one media record.
pub struct VideoCard {
    record: MediaRecord,
    config: DeliveryConfig,
    state: PreviewState,
    on_download: DownloadHandler,
}

/// Declarative render description. The host mounts whichever visual is named
/// here and mirrors the text fields; it performs no derivation of its own.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardRender {
    pub visual: Visual,
    pub thumbnail_url: String,
    /// Looping muted clip mounted while the card is focused.
    pub preview_url: String,
    /// Duration text overlaid on every visual.
    pub duration_overlay: String,
    pub title: String,
    pub description: String,
    pub uploaded_relative: String,
    pub original_size: String,
    pub compressed_size: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compression_percent: Option<i64>,
    /// Percentage as display text, "—" when not computable.
    pub compression_display: String,
    /// Full-resolution URL behind the download affordance.
    pub download_url: String,
    /// Focus session the host must echo in preview outcome notifications.
    pub session: u64,
}

impl VideoCard {
    pub fn new(record: MediaRecord, config: DeliveryConfig, on_download: DownloadHandler) -> Self {
        Self {
            record,
            config,
            state: PreviewState::new(),
            on_download,
        }
    }

    pub fn record(&self) -> &MediaRecord {
        &self.record
    }

    /// Pointer entered the card. Returns the new focus session token.
    pub fn focus_gained(&mut self) -> u64 {
        self.state.focus_gained()
    }

    /// Pointer left the card.
    pub fn focus_lost(&mut self) {
        self.state.focus_lost()
    }

    /// Preview resource for `session` began rendering.
    pub fn preview_loaded(&mut self, session: u64) -> bool {
        self.state.load_succeeded(session)
    }

    /// Preview resource for `session` failed to load or play.
    pub fn preview_failed(&mut self, session: u64) -> bool {
        self.state.load_failed(session)
    }

    /// Build the render description for the current state. All three
    /// representation URLs are resolved on every render; resolution is pure,
    /// so this stays deterministic. `now` anchors the relative upload time.
    pub fn render(&self, now: OffsetDateTime) -> Result<CardRender, AppError> {
        let percent = compression_percentage(
            self.record.original_size_bytes,
            self.record.compressed_size_bytes,
        );

        Ok(CardRender {
            visual: self.state.visual(),
            thumbnail_url: self.resolve(ProfileId::Thumbnail)?,
            preview_url: self.resolve(ProfileId::PreviewClip)?,
            duration_overlay: format_duration(self.record.duration_seconds),
            title: self.record.title.clone(),
            description: self.record.description.clone(),
            uploaded_relative: format_relative_time(self.record.created_at, now),
            original_size: format_byte_size(self.record.original_size_bytes),
            compressed_size: format_byte_size(self.record.compressed_size_bytes),
            compression_percent: percent,
            compression_display: percent
                .map(|p| format!("{}%", p))
                .unwrap_or_else(|| "—".to_string()),
            download_url: self.resolve(ProfileId::Full)?,
            session: self.state.session(),
        })
    }

    /// User triggered the download affordance: invoke the injected handler
    /// with the full-resolution URL and the record title, verbatim. Returns
    /// the pair for the caller's own bookkeeping.
    pub fn request_download(&self) -> Result<(String, String), AppError> {
        let url = self.resolve(ProfileId::Full)?;
        log::debug!(
            target: "video_card::card",
            "request_download: title={:?} url={}",
            self.record.title,
            url
        );
        (self.on_download)(&url, &self.record.title);
        Ok((url, self.record.title.clone()))
    }

    fn resolve(&self, profile: ProfileId) -> Result<String, AppError> {
        delivery_url(&self.config, &self.record.source_id, profile).map(Into::into)
    }
}
