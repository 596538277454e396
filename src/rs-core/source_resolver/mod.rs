use crate::metadata::{EmbedMetadata, QualityTier};

/// Playback capabilities of the current environment, reported once by the
/// JavaScript-side when the `Player` is created.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct PlatformCapabilities {
    /// The adaptive streaming engine can run here (i.e. MediaSource is available).
    pub(crate) engine_supported: bool,

    /// The media element can play HLS playlists by itself.
    pub(crate) native_hls: bool,

    /// The platform's native HLS implementation must be preferred over the engine,
    /// even when the latter is supported.
    pub(crate) prefers_native_hls: bool,
}

/// How the current embed should be played.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum SourceDecision {
    /// Play the HLS playlist through the adaptive streaming engine.
    AdaptiveEngine { manifest_url: String, start_level: u32 },
    /// Give the HLS playlist directly to the media element.
    NativeAdaptive { manifest_url: String },
    /// Give a file URL directly to the media element.
    Direct { url: String },
    /// Nothing can be played for now.
    Unavailable,
}

impl SourceDecision {
    /// URL of the resource the media element or the engine will load, if one.
    pub(crate) fn url(&self) -> Option<&str> {
        match self {
            SourceDecision::AdaptiveEngine { manifest_url, .. }
            | SourceDecision::NativeAdaptive { manifest_url } => Some(manifest_url),
            SourceDecision::Direct { url } => Some(url),
            SourceDecision::Unavailable => None,
        }
    }

    pub(crate) fn is_available(&self) -> bool {
        !matches!(self, SourceDecision::Unavailable)
    }
}

/// Decide which source strategy should be used to play the embed described by
/// `metadata`.
///
/// This function has no side-effect and always returns the same decision for the same
/// inputs.
pub(crate) fn resolve(
    metadata: &EmbedMetadata,
    configured_quality: Option<&str>,
    capabilities: &PlatformCapabilities,
) -> SourceDecision {
    if let Some(manifest_url) = metadata.hls_url.as_ref() {
        if capabilities.engine_supported && !capabilities.prefers_native_hls {
            return SourceDecision::AdaptiveEngine {
                manifest_url: manifest_url.clone(),
                start_level: start_level(configured_quality),
            };
        }
        if capabilities.native_hls {
            return SourceDecision::NativeAdaptive {
                manifest_url: manifest_url.clone(),
            };
        }
    }

    // Renditions may be listed before the file has been fully analyzed, in which case
    // the original is the only thing we can trust.
    if !metadata.has_known_duration() {
        if let Some(original) = metadata.original_url.as_ref() {
            return SourceDecision::Direct {
                url: original.clone(),
            };
        }
    }

    let best_rendition = metadata.renditions.iter().max_by_key(|r| r.quality);
    match (best_rendition, metadata.original_url.as_ref()) {
        (Some(rendition), _) => SourceDecision::Direct {
            url: rendition.url.clone(),
        },
        (None, Some(original)) => SourceDecision::Direct {
            url: original.clone(),
        },
        (None, None) => SourceDecision::Unavailable,
    }
}

/// Map a quality name to the engine level it should start on.
pub(crate) fn start_level(configured_quality: Option<&str>) -> u32 {
    configured_quality
        .and_then(QualityTier::from_name)
        .map(QualityTier::rank)
        .unwrap_or(QualityTier::DEFAULT_RANK)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{Rendition, RemoteStatus};

    fn metadata() -> EmbedMetadata {
        EmbedMetadata::from_json(r#"{"id":"abc","status":"ready","duration":30}"#).unwrap()
    }

    fn rendition(quality: QualityTier, url: &str) -> Rendition {
        Rendition {
            quality,
            url: url.to_owned(),
            mime_type: None,
        }
    }

    const ENGINE: PlatformCapabilities = PlatformCapabilities {
        engine_supported: true,
        native_hls: false,
        prefers_native_hls: false,
    };

    const SAFARI: PlatformCapabilities = PlatformCapabilities {
        engine_supported: true,
        native_hls: true,
        prefers_native_hls: true,
    };

    const NOTHING: PlatformCapabilities = PlatformCapabilities {
        engine_supported: false,
        native_hls: false,
        prefers_native_hls: false,
    };

    #[test]
    fn test_adaptive_engine_with_quality() {
        let mut meta = metadata();
        meta.hls_url = Some("https://cdn/master.m3u8".to_owned());
        assert_eq!(
            resolve(&meta, Some("hd"), &ENGINE),
            SourceDecision::AdaptiveEngine {
                manifest_url: "https://cdn/master.m3u8".to_owned(),
                start_level: 1,
            }
        );
        assert_eq!(
            resolve(&meta, Some("whatever"), &ENGINE),
            SourceDecision::AdaptiveEngine {
                manifest_url: "https://cdn/master.m3u8".to_owned(),
                start_level: 2,
            }
        );
        assert_eq!(resolve(&meta, None, &ENGINE), resolve(&meta, None, &ENGINE));
    }

    #[test]
    fn test_native_adaptive() {
        let mut meta = metadata();
        meta.hls_url = Some("https://cdn/master.m3u8".to_owned());
        assert_eq!(
            resolve(&meta, Some("uhd"), &SAFARI),
            SourceDecision::NativeAdaptive {
                manifest_url: "https://cdn/master.m3u8".to_owned(),
            }
        );
    }

    #[test]
    fn test_direct_prefers_highest_rendition() {
        let mut meta = metadata();
        meta.hls_url = Some("https://cdn/master.m3u8".to_owned());
        meta.original_url = Some("https://cdn/original.mov".to_owned());
        meta.renditions = vec![
            rendition(QualityTier::Hd, "https://cdn/hd.mp4"),
            rendition(QualityTier::Qhd, "https://cdn/qhd.mp4"),
            rendition(QualityTier::Sd, "https://cdn/sd.mp4"),
        ];
        assert_eq!(
            resolve(&meta, None, &NOTHING),
            SourceDecision::Direct {
                url: "https://cdn/qhd.mp4".to_owned()
            }
        );
    }

    #[test]
    fn test_direct_prefers_original_without_duration() {
        let mut meta = metadata();
        meta.status = RemoteStatus::Playable;
        meta.duration = Some(0.);
        meta.original_url = Some("https://cdn/original.mov".to_owned());
        meta.renditions = vec![rendition(QualityTier::Hd, "https://cdn/hd.mp4")];
        assert_eq!(
            resolve(&meta, None, &ENGINE),
            SourceDecision::Direct {
                url: "https://cdn/original.mov".to_owned()
            }
        );
        meta.duration = None;
        meta.original_url = None;
        assert_eq!(
            resolve(&meta, None, &ENGINE),
            SourceDecision::Direct {
                url: "https://cdn/hd.mp4".to_owned()
            }
        );
    }

    #[test]
    fn test_unavailable() {
        let decision = resolve(&metadata(), Some("hd"), &ENGINE);
        assert_eq!(decision, SourceDecision::Unavailable);
        assert!(!decision.is_available());
        assert_eq!(decision.url(), None);
    }
}
