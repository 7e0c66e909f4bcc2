use std::collections::HashSet;

use serde::Deserialize;

use crate::errors::{BotError, BotResult};

use super::base_command;

/// One entry of the `formats` array in `yt-dlp -J` output. Field names are
/// yt-dlp's informal contract; missing tracks show up as the literal "none".
#[derive(Debug, Deserialize)]
pub struct FormatDescriptor {
    pub format_id: String,
    pub ext: String,
    pub height: Option<u32>,
    pub vcodec: Option<String>,
    pub acodec: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    formats: Vec<FormatDescriptor>,
}

/// A selectable quality, rendered as one inline button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatOption {
    pub format_id: String,
    pub height: u32,
    pub ext: String,
}

impl FormatOption {
    pub fn button_label(&self) -> String {
        format!("🎬 {}p ({})", self.height, self.ext.to_uppercase())
    }

    /// Opaque payload round-tripped through the button press.
    pub fn callback_payload(&self, url: &str) -> String {
        format!("{}|{}", self.format_id, url)
    }
}

/// List the qualities available for a URL without downloading anything.
pub async fn probe_formats(url: &str) -> BotResult<Vec<FormatOption>> {
    let mut cmd = base_command();
    cmd.arg("-J").arg(url);

    let output = cmd
        .output()
        .await
        .map_err(|e| BotError::probe_failed(e.to_string()))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(BotError::probe_failed(stderr.trim()));
    }

    let info: ProbeOutput = serde_json::from_slice(&output.stdout)
        .map_err(|e| BotError::probe_failed(format!("failed to parse yt-dlp output: {}", e)))?;

    Ok(muxed_formats(info.formats))
}

/// Keep only pre-muxed formats (video and audio in one stream) with a known
/// vertical resolution, one per height. The first entry per height in
/// yt-dlp's returned order wins.
fn muxed_formats(formats: Vec<FormatDescriptor>) -> Vec<FormatOption> {
    let mut seen: HashSet<u32> = HashSet::new();
    let mut options = Vec::new();

    for format in formats {
        let Some(height) = format.height.filter(|h| *h > 0) else {
            continue;
        };
        if !has_codec(format.vcodec.as_deref()) || !has_codec(format.acodec.as_deref()) {
            continue;
        }
        if !seen.insert(height) {
            continue;
        }
        options.push(FormatOption {
            format_id: format.format_id,
            height,
            ext: format.ext,
        });
    }

    options
}

fn has_codec(codec: Option<&str>) -> bool {
    codec.is_some_and(|c| c != "none")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptors(json: &str) -> Vec<FormatDescriptor> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn keeps_first_muxed_format_per_height() {
        let formats = descriptors(
            r#"[
                {"format_id": "18", "ext": "mp4", "height": 360, "vcodec": "avc1.42001E", "acodec": "mp4a.40.2"},
                {"format_id": "22", "ext": "mp4", "height": 720, "vcodec": "avc1.64001F", "acodec": "mp4a.40.2"},
                {"format_id": "302", "ext": "webm", "height": 720, "vcodec": "vp9", "acodec": "opus"},
                {"format_id": "137", "ext": "mp4", "height": 1080, "vcodec": "avc1.640028", "acodec": "none"}
            ]"#,
        );

        let options = muxed_formats(formats);

        assert_eq!(
            options,
            vec![
                FormatOption {
                    format_id: "18".to_string(),
                    height: 360,
                    ext: "mp4".to_string(),
                },
                FormatOption {
                    format_id: "22".to_string(),
                    height: 720,
                    ext: "mp4".to_string(),
                },
            ]
        );
    }

    #[test]
    fn audio_only_and_storyboard_formats_are_excluded() {
        let formats = descriptors(
            r#"[
                {"format_id": "sb0", "ext": "mhtml", "height": 48, "vcodec": "none", "acodec": "none"},
                {"format_id": "140", "ext": "m4a", "vcodec": "none", "acodec": "mp4a.40.2"},
                {"format_id": "bare", "ext": "mp4", "height": 480}
            ]"#,
        );

        assert!(muxed_formats(formats).is_empty());
    }

    #[test]
    fn zero_height_is_excluded() {
        let formats = descriptors(
            r#"[{"format_id": "x", "ext": "mp4", "height": 0, "vcodec": "avc1", "acodec": "mp4a"}]"#,
        );

        assert!(muxed_formats(formats).is_empty());
    }

    #[test]
    fn button_label_and_payload() {
        let option = FormatOption {
            format_id: "22".to_string(),
            height: 720,
            ext: "mp4".to_string(),
        };

        assert_eq!(option.button_label(), "🎬 720p (MP4)");
        assert_eq!(
            option.callback_payload("https://example.com/v"),
            "22|https://example.com/v"
        );
    }

    #[test]
    fn output_without_formats_parses_as_empty() {
        // A playlist page has no top-level formats array.
        let info: ProbeOutput = serde_json::from_str(r#"{"title": "some playlist"}"#).unwrap();
        assert!(info.formats.is_empty());
    }
}
