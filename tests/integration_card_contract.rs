use std::sync::Arc;

use parking_lot::Mutex;
use serial_test::serial;
use time::macros::datetime;
use video_card_core::error::AppError;
use video_card_core::media::MediaRecord;
use video_card_core::preview::Visual;
use video_card_core::sidecar_api::{
    apply_preview_outcome, create_card, destroy_all_cards, destroy_card, download_card,
    render_card, set_focus, PreviewOutcome,
};
use video_card_core::transform::DeliveryConfig;

const NOW: time::OffsetDateTime = datetime!(2026-08-05 12:00:00 UTC);

fn record() -> MediaRecord {
    MediaRecord {
        source_id: "campaign/clip-01".to_string(),
        title: "Launch teaser".to_string(),
        description: "Cut for socials".to_string(),
        duration_seconds: 125.0,
        original_size_bytes: 1_000_000,
        compressed_size_bytes: 250_000,
        created_at: datetime!(2026-08-02 12:00:00 UTC),
    }
}

#[test]
#[serial]
fn hover_download_and_teardown_walkthrough() {
    destroy_all_cards();
    let downloads: Arc<Mutex<Vec<(String, String, String)>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&downloads);

    let (card_id, initial) = create_card(record(), None, NOW, |card_id| {
        let card_id = card_id.to_string();
        Arc::new(move |url, title| {
            sink.lock()
                .push((card_id.clone(), url.to_string(), title.to_string()));
        })
    })
    .expect("create card");

    // Idle card: thumbnail plus the fully derived metadata block.
    assert_eq!(initial.visual, Visual::Thumbnail);
    assert_eq!(initial.duration_overlay, "2:05");
    assert_eq!(initial.uploaded_relative, "3 days ago");
    assert_eq!(initial.original_size, "976.6 KB");
    assert_eq!(initial.compressed_size, "244.1 KB");
    assert_eq!(initial.compression_display, "75%");

    // Hover in: preview attempt starts immediately.
    let focused = set_focus(&card_id, true, NOW).expect("focus");
    assert_eq!(focused.visual, Visual::Preview);
    let session = focused.session;

    // Resource came up, then died mid-playback.
    let playing =
        apply_preview_outcome(&card_id, session, PreviewOutcome::Loaded, NOW).expect("loaded");
    assert_eq!(playing.visual, Visual::Preview);
    let broken =
        apply_preview_outcome(&card_id, session, PreviewOutcome::Failed, NOW).expect("failed");
    assert_eq!(broken.visual, Visual::Unavailable);
    assert_eq!(broken.duration_overlay, "2:05");

    // Hover out clears the failure; hover back in retries from scratch.
    let idle = set_focus(&card_id, false, NOW).expect("unfocus");
    assert_eq!(idle.visual, Visual::Thumbnail);
    let retried = set_focus(&card_id, true, NOW).expect("refocus");
    assert_eq!(retried.visual, Visual::Preview);
    assert!(retried.session > session, "refocus opens a new session");

    // Download forwards the full-resolution URL and title verbatim.
    let request = download_card(&card_id).expect("download");
    assert_eq!(request.title, "Launch teaser");
    assert!(request.url.contains("/video/upload/h_1080,w_1920/"));
    {
        let calls = downloads.lock();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, card_id);
        assert_eq!(calls[0].1, request.url);
        assert_eq!(calls[0].2, request.title);
    }

    destroy_card(&card_id).expect("destroy");
    assert!(matches!(
        render_card(&card_id, NOW),
        Err(AppError::UnknownCard(_))
    ));
    destroy_all_cards();
}

#[test]
#[serial]
fn stale_failure_cannot_mark_a_later_session() {
    destroy_all_cards();
    let (card_id, _) = create_card(record(), None, NOW, |_| Arc::new(|_, _| {})).expect("create");

    let first = set_focus(&card_id, true, NOW).expect("focus").session;
    set_focus(&card_id, false, NOW).expect("unfocus");
    let second = set_focus(&card_id, true, NOW).expect("refocus").session;
    assert!(second > first);

    // A failure notification from the abandoned session arrives late.
    let render =
        apply_preview_outcome(&card_id, first, PreviewOutcome::Failed, NOW).expect("stale");
    assert_eq!(render.visual, Visual::Preview, "current session is untouched");

    // The current session still resolves normally.
    let loaded =
        apply_preview_outcome(&card_id, second, PreviewOutcome::Loaded, NOW).expect("loaded");
    assert_eq!(loaded.visual, Visual::Preview);
    destroy_all_cards();
}

#[test]
#[serial]
fn cards_do_not_share_preview_state() {
    destroy_all_cards();
    let (first, _) = create_card(record(), None, NOW, |_| Arc::new(|_, _| {})).expect("create");
    let (second, _) = create_card(record(), None, NOW, |_| Arc::new(|_, _| {})).expect("create");
    assert_ne!(first, second);

    let focused = set_focus(&first, true, NOW).expect("focus first");
    apply_preview_outcome(&first, focused.session, PreviewOutcome::Failed, NOW).expect("fail");

    let untouched = render_card(&second, NOW).expect("render second");
    assert_eq!(untouched.visual, Visual::Thumbnail);
    let first_render = render_card(&first, NOW).expect("render first");
    assert_eq!(first_render.visual, Visual::Unavailable);
    destroy_all_cards();
}

#[test]
#[serial]
fn custom_delivery_config_flows_into_every_url() {
    destroy_all_cards();
    let config = DeliveryConfig {
        base_url: "https://media.example.com".to_string(),
        cloud_name: "acme".to_string(),
    };
    let (card_id, render) =
        create_card(record(), Some(config), NOW, |_| Arc::new(|_, _| {})).expect("create");

    assert!(render
        .thumbnail_url
        .starts_with("https://media.example.com/acme/"));
    assert!(render
        .preview_url
        .starts_with("https://media.example.com/acme/"));
    assert!(render
        .download_url
        .starts_with("https://media.example.com/acme/"));

    let request = download_card(&card_id).expect("download");
    assert!(request.url.starts_with("https://media.example.com/acme/"));
    destroy_all_cards();
}
