use serde::Deserialize;
use thiserror::Error;

use crate::audio_tracks::AudioTrackMode;

/// Processing status of an embed, as reported by the remote service.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum RemoteStatus {
    /// Nothing has been uploaded yet.
    #[default]
    Waiting,
    Uploading,
    Preparing,
    /// At least one rendition can be played, others may still be generated.
    Playable,
    Ready,
    Errored,
}

impl RemoteStatus {
    /// `true` for statuses after which the video is not expected to be processed anymore.
    ///
    /// Note that `Playable` is considered terminal here even though renditions may still
    /// be in preparation: whether the processing overlay is shown in that case still
    /// depends on a playable source being present.
    pub(crate) fn is_terminal(self) -> bool {
        matches!(self, RemoteStatus::Playable | RemoteStatus::Ready)
    }
}

/// Quality tiers a rendition can be encoded in, from the lowest to the highest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum QualityTier {
    Sd = 0,
    Hd = 1,
    Fhd = 2,
    Qhd = 3,
    Uhd = 4,
}

impl QualityTier {
    /// Rank used when no quality, or an unknown one, is configured.
    pub(crate) const DEFAULT_RANK: u32 = QualityTier::Fhd as u32;

    pub(crate) fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "sd" => Some(QualityTier::Sd),
            "hd" => Some(QualityTier::Hd),
            "fhd" => Some(QualityTier::Fhd),
            "qhd" => Some(QualityTier::Qhd),
            "uhd" => Some(QualityTier::Uhd),
            _ => None,
        }
    }

    #[inline(always)]
    pub(crate) fn rank(self) -> u32 {
        self as u32
    }
}

/// A progressive (e.g. MP4) transcoded variant of the video.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub(crate) struct Rendition {
    pub(crate) quality: QualityTier,
    pub(crate) url: String,
    #[serde(default)]
    pub(crate) mime_type: Option<String>,
}

/// Autoplay setting stored remotely with the embed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum RemoteAutoplay {
    #[default]
    Off,
    /// Play once the player becomes visible in the viewport.
    OnShow,
    Always,
}

/// When the end-of-playback overlay should be displayed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum EndscreenMode {
    #[default]
    None,
    Ended,
    NearEnd,
}

impl EndscreenMode {
    pub(crate) fn from_attribute(value: &str) -> Option<Self> {
        match value.trim() {
            "none" | "off" => Some(EndscreenMode::None),
            "ended" | "on" => Some(EndscreenMode::Ended),
            "near_end" | "near-end" => Some(EndscreenMode::NearEnd),
            _ => None,
        }
    }
}

/// Metadata describing an embed, as fetched from the remote service.
///
/// Only the fields read by the player are declared, the others being ignored.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub(crate) struct EmbedMetadata {
    pub(crate) id: String,
    #[serde(default)]
    pub(crate) status: RemoteStatus,
    /// Declared duration in seconds. Not set, or not positive, while the upstream
    /// pipeline has not analyzed the file yet.
    #[serde(default)]
    pub(crate) duration: Option<f64>,
    /// URL of the HLS multivariant playlist, if one was generated.
    #[serde(default)]
    pub(crate) hls_url: Option<String>,
    #[serde(default)]
    pub(crate) renditions: Vec<Rendition>,
    /// URL of the original uploaded file.
    #[serde(default)]
    pub(crate) original_url: Option<String>,
    #[serde(default)]
    pub(crate) poster_url: Option<String>,
    #[serde(default)]
    pub(crate) title: Option<String>,
    #[serde(default)]
    pub(crate) autoplay: RemoteAutoplay,
    #[serde(default)]
    pub(crate) endscreen: EndscreenMode,
    #[serde(default)]
    pub(crate) audio_track_mode: Option<AudioTrackMode>,
    #[serde(default)]
    pub(crate) theme: Option<String>,
}

impl EmbedMetadata {
    pub(crate) fn from_json(data: &str) -> Result<Self, MetadataError> {
        Ok(serde_json::from_str(data)?)
    }

    /// `true` if at least one adaptive or progressive rendition exists.
    pub(crate) fn has_playable_source(&self) -> bool {
        self.hls_url.is_some() || !self.renditions.is_empty()
    }

    /// `true` if the declared duration is a positive number.
    pub(crate) fn has_known_duration(&self) -> bool {
        matches!(self.duration, Some(d) if d.is_finite() && d > 0.)
    }
}

#[derive(Error, Debug)]
pub(crate) enum MetadataError {
    #[error("Invalid embed metadata: {0}")]
    Parsing(#[from] serde_json::Error),
    #[error("Embed metadata request failed: {0}")]
    Request(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_metadata() {
        let meta = EmbedMetadata::from_json(r#"{"id":"abc","status":"uploading"}"#).unwrap();
        assert_eq!(meta.id, "abc");
        assert_eq!(meta.status, RemoteStatus::Uploading);
        assert!(meta.renditions.is_empty());
        assert!(!meta.has_playable_source());
        assert!(!meta.has_known_duration());
        assert_eq!(meta.autoplay, RemoteAutoplay::Off);
        assert_eq!(meta.endscreen, EndscreenMode::None);
    }

    #[test]
    fn test_parse_complete_metadata() {
        let meta = EmbedMetadata::from_json(
            r#"{
                "id": "abc",
                "status": "ready",
                "duration": 12.5,
                "hls_url": "https://cdn.example.com/abc/master.m3u8",
                "renditions": [
                    { "quality": "hd", "url": "https://cdn.example.com/abc/hd.mp4" },
                    { "quality": "uhd", "url": "https://cdn.example.com/abc/uhd.mp4", "mime_type": "video/mp4" }
                ],
                "autoplay": "on_show",
                "endscreen": "near_end",
                "audio_track_mode": "on",
                "unknown_field": [1, 2, 3]
            }"#,
        )
        .unwrap();
        assert_eq!(meta.status, RemoteStatus::Ready);
        assert!(meta.has_playable_source());
        assert!(meta.has_known_duration());
        assert_eq!(meta.renditions[1].quality, QualityTier::Uhd);
        assert_eq!(meta.autoplay, RemoteAutoplay::OnShow);
        assert_eq!(meta.endscreen, EndscreenMode::NearEnd);
        assert_eq!(meta.audio_track_mode, Some(AudioTrackMode::On));
    }

    #[test]
    fn test_invalid_metadata() {
        assert!(EmbedMetadata::from_json("{").is_err());
        assert!(EmbedMetadata::from_json(r#"{"status":"ready"}"#).is_err());
        assert!(EmbedMetadata::from_json(r#"{"id":"a","status":"unknown"}"#).is_err());
    }

    #[test]
    fn test_quality_names() {
        assert_eq!(QualityTier::from_name("SD"), Some(QualityTier::Sd));
        assert_eq!(QualityTier::from_name(" qhd "), Some(QualityTier::Qhd));
        assert_eq!(QualityTier::from_name("8k"), None);
        assert_eq!(QualityTier::Uhd.rank(), 4);
        assert_eq!(QualityTier::DEFAULT_RANK, 2);
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(RemoteStatus::Ready.is_terminal());
        assert!(RemoteStatus::Playable.is_terminal());
        assert!(!RemoteStatus::Waiting.is_terminal());
        assert!(!RemoteStatus::Uploading.is_terminal());
        assert!(!RemoteStatus::Preparing.is_terminal());
        assert!(!RemoteStatus::Errored.is_terminal());
    }
}
