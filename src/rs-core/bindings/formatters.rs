use serde::Serialize;
use serde_json::json;

use crate::{audio_tracks::AudioTrackSet, host::PlayerEvent, session::RenderState, Logger};

fn to_json<T: Serialize>(value: &T, what: &str) -> Option<String> {
    match serde_json::to_string(value) {
        Ok(json) => Some(json),
        Err(err) => {
            Logger::error(&format!("Could not format {what} for JS: {err}"));
            None
        }
    }
}

pub(crate) fn format_render_state_for_js(state: &RenderState) -> Option<String> {
    to_json(state, "render state")
}

pub(crate) fn format_audio_tracks_for_js(tracks: &AudioTrackSet) -> Option<String> {
    to_json(tracks, "audio tracks")
}

/// Format the `detail` of the custom event dispatched for `event`.
pub(crate) fn format_event_detail_for_js(event: &PlayerEvent) -> String {
    match event {
        PlayerEvent::Ready | PlayerEvent::Playable => json!({}),
        PlayerEvent::Media { current_time, .. } => json!({ "currentTime": current_time }),
        PlayerEvent::Click {
            action,
            identifier,
            position,
        } => json!({
            "action": action,
            "identifier": identifier,
            "position": position,
        }),
    }
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{audio_tracks::EngineAudioTrack, session::ReadyView};

    #[test]
    fn test_render_state_format() {
        let json = format_render_state_for_js(&RenderState::Processing {
            message: "Processing video…".to_owned(),
            spinner: true,
        })
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["kind"], "processing");
        assert_eq!(value["spinner"], true);

        let json = format_render_state_for_js(&RenderState::Ready(ReadyView {
            poster: None,
            title: Some("Title".to_owned()),
            controls: "play".to_owned(),
            start_screen: true,
            endscreen: false,
            audio_menu: false,
            subtitles: "off".to_owned(),
        }))
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["kind"], "ready");
        assert_eq!(value["title"], "Title");
        assert!(value["poster"].is_null());
    }

    #[test]
    fn test_audio_tracks_format() {
        let tracks = AudioTrackSet::from_engine(
            &[EngineAudioTrack {
                native_id: 3,
                name: Some("English".to_owned()),
                language: Some("en".to_owned()),
                is_default: true,
            }],
            None,
        );
        let json = format_audio_tracks_for_js(&tracks).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["id"], "3");
        assert_eq!(value[0]["enabled"], true);
    }

    #[test]
    fn test_event_detail_format() {
        let detail = format_event_detail_for_js(&PlayerEvent::Click {
            action: "next".to_owned(),
            identifier: "b".to_owned(),
            position: 12.5,
        });
        let value: serde_json::Value = serde_json::from_str(&detail).unwrap();
        assert_eq!(value["action"], "next");
        assert_eq!(value["identifier"], "b");
        assert_eq!(value["position"], 12.5);
        assert_eq!(format_event_detail_for_js(&PlayerEvent::Ready), "{}");
    }
}
