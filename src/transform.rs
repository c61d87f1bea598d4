//! Delivery profiles and URL resolution for derived media representations.
//!
//! Every card derives three representations from one source asset: a still
//! thumbnail, a short looping preview clip, and the full-resolution video.
//! Each representation is a fixed parameter bundle consumed by the delivery
//! service; resolution only builds the request URL and never checks that the
//! asset exists.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::AppError;

/// How the host should mount the resolved resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryKind {
    Image,
    Video,
}

/// Named representation of a source asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProfileId {
    Thumbnail,
    PreviewClip,
    Full,
}

/// Fixed parameter bundle for one representation. Rows live in
/// `PROFILE_TABLE`; they hold no state and are never mutated.
pub struct TransformationProfile {
    pub id: ProfileId,
    pub kind: DeliveryKind,
    pub width: u32,
    pub height: u32,
    /// Service directives applied ahead of the dimension tokens.
    pub directives: &'static [&'static str],
    /// Forced output format, appended as the file extension.
    pub format: Option<&'static str>,
}

macro_rules! profile_table {
    (
        $( [$id:expr, $kind:expr, $width:expr, $height:expr, $directives:expr, $format:expr] ),* $(,)?
    ) => {
        const PROFILE_TABLE: &[TransformationProfile] = &[
            $( TransformationProfile {
                id: $id,
                kind: $kind,
                width: $width,
                height: $height,
                directives: $directives,
                format: $format,
            } ),*
        ];

        /// Every representation the card derives, in table order.
        pub const PROFILE_IDS: &[ProfileId] = &[ $($id),* ];
    };
}

profile_table!(
    [ProfileId::Thumbnail, DeliveryKind::Image, 400, 225, &["c_fill", "g_auto", "q_auto"], Some("jpg")],
    [ProfileId::PreviewClip, DeliveryKind::Video, 400, 225, &["e_preview:duration_15:max_seg_9:min_seg_dur_1"], None],
    [ProfileId::Full, DeliveryKind::Video, 1920, 1080, &[], None],
);

/// Return the parameter bundle for a representation.
pub fn get_profile(id: ProfileId) -> &'static TransformationProfile {
    PROFILE_TABLE
        .iter()
        .find(|p| p.id == id)
        .unwrap_or_else(|| unreachable!("profile table covers every ProfileId"))
}

/// Directive string for the URL path: service directives first, then the
/// dimension tokens.
fn directive_string(profile: &TransformationProfile) -> String {
    let mut parts: Vec<String> = profile.directives.iter().map(|d| (*d).to_string()).collect();
    parts.push(format!("h_{}", profile.height));
    parts.push(format!("w_{}", profile.width));
    parts.join(",")
}

/// Delivery service endpoint a card resolves URLs against.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryConfig {
    pub base_url: String,
    pub cloud_name: String,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            base_url: "https://res.cloudinary.com".to_string(),
            cloud_name: "demo".to_string(),
        }
    }
}

/// Build the URL serving `source_id` under the given representation.
///
/// Pure and deterministic: identical inputs always produce an identical URL,
/// so results are freely cacheable. Unknown or malformed source ids still
/// yield a syntactically valid URL; a missing asset only surfaces later as a
/// load failure on the consuming side.
pub fn delivery_url(
    config: &DeliveryConfig,
    source_id: &str,
    id: ProfileId,
) -> Result<Url, AppError> {
    let profile = get_profile(id);
    let mut url = Url::parse(&config.base_url)
        .map_err(|e| AppError::InvalidRequest(format!("Invalid delivery base URL: {}", e)))?;

    let file_name = match profile.format {
        Some(ext) => format!("{}.{}", source_id, ext),
        None => source_id.to_string(),
    };

    url.path_segments_mut()
        .map_err(|_| AppError::InvalidRequest("Delivery base URL cannot be a base".to_string()))?
        .push(&config.cloud_name)
        // Thumbnails are stills extracted from the clip, so every
        // representation addresses the asset under the video namespace.
        .push("video")
        .push("upload")
        .push(&directive_string(profile))
        .push(&file_name);

    Ok(url)
}
