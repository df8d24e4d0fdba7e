use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Request body for multimodal image chat
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageChatRequest {
    /// Image as a data URI (`data:image/...;base64,...`)
    pub image_base64: Option<String>,
    pub prompt: Option<String>,
}

/// One segment from an image segmentation model
#[derive(Debug, Deserialize)]
pub struct Segment {
    pub label: String,
    /// Base64-encoded mask image
    pub mask: String,
    pub score: f64,
}

/// Segmentation response re-projected into parallel columns
///
/// The browser client renders masks by index, so the per-segment rows are
/// split into three aligned arrays.
#[derive(Debug, Serialize)]
pub struct Segmentation {
    pub labels: Vec<String>,
    pub masks: Vec<String>,
    pub scores: Vec<f64>,
}

impl From<Vec<Segment>> for Segmentation {
    fn from(segments: Vec<Segment>) -> Self {
        let mut labels = Vec::with_capacity(segments.len());
        let mut masks = Vec::with_capacity(segments.len());
        let mut scores = Vec::with_capacity(segments.len());

        for segment in segments {
            labels.push(segment.label);
            masks.push(segment.mask);
            scores.push(segment.score);
        }

        Self { labels, masks, scores }
    }
}

/// Parse a raw segmentation response into columns
pub(crate) fn project_segments(value: Value) -> Result<Segmentation, serde_json::Error> {
    let segments: Vec<Segment> = serde_json::from_value(value)?;
    Ok(Segmentation::from(segments))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn segments_project_to_aligned_columns() {
        let raw = json!([
            {"label": "shirt", "mask": "bWFzazE=", "score": 0.98},
            {"label": "pants", "mask": "bWFzazI=", "score": 0.91},
        ]);

        let projected = project_segments(raw).unwrap();
        assert_eq!(projected.labels, ["shirt", "pants"]);
        assert_eq!(projected.masks, ["bWFzazE=", "bWFzazI="]);
        assert_eq!(projected.scores, [0.98, 0.91]);
    }

    #[test]
    fn empty_segment_list_projects_empty() {
        let projected = project_segments(json!([])).unwrap();
        assert!(projected.labels.is_empty());
        assert!(projected.masks.is_empty());
        assert!(projected.scores.is_empty());
    }

    #[test]
    fn malformed_segments_are_rejected() {
        assert!(project_segments(json!({"error": "nope"})).is_err());
    }
}
