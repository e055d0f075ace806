use serde::{Deserialize, Serialize, Serializer};

/// Largest integer a JavaScript number represents exactly (2^53).
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Click,
    #[serde(rename = "mousemove")]
    MouseMove,
    Scroll,
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventKind::Click => write!(f, "click"),
            EventKind::MouseMove => write!(f, "mousemove"),
            EventKind::Scroll => write!(f, "scroll"),
        }
    }
}

/// A normalized interaction record as sent to the collector.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InteractionEvent {
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub timestamp: u64,
    #[serde(serialize_with = "serialize_js_number")]
    pub x: Option<f64>,
    #[serde(serialize_with = "serialize_js_number")]
    pub y: Option<f64>,
    /// `Some(Value::Null)` for scroll records, omitted otherwise.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl InteractionEvent {
    pub fn pointer(kind: EventKind, timestamp: u64, x: Option<f64>, y: Option<f64>) -> Self {
        Self {
            kind,
            timestamp,
            x,
            y,
            data: None,
        }
    }

    pub fn scroll(timestamp: u64, x_percent: f64, y_percent: f64) -> Self {
        Self {
            kind: EventKind::Scroll,
            timestamp,
            x: Some(x_percent),
            y: Some(y_percent),
            data: Some(serde_json::Value::Null),
        }
    }
}

/// Payload of one flush: every buffered event plus the page it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventBatch {
    pub events: Vec<InteractionEvent>,
    pub url: String,
}

/// Pointer position carried by a click or mousemove from the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointerSample {
    #[serde(default)]
    pub client_x: Option<f64>,
    #[serde(default)]
    pub client_y: Option<f64>,
}

impl PointerSample {
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            client_x: Some(x),
            client_y: Some(y),
        }
    }
}

/// Snapshot of the document's scroll state at the time of a scroll event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollMetrics {
    pub scroll_x: f64,
    pub scroll_y: f64,
    pub scroll_width: f64,
    pub scroll_height: f64,
    pub inner_width: f64,
    pub inner_height: f64,
}

impl ScrollMetrics {
    /// Horizontal and vertical scroll position as percentages of the
    /// scrollable distance.
    pub fn percentages(&self) -> (f64, f64) {
        (
            scroll_percent(self.scroll_x, self.scroll_width - self.inner_width),
            scroll_percent(self.scroll_y, self.scroll_height - self.inner_height),
        )
    }
}

/// Percentage of `max_scroll` covered by `offset`, rounded to two decimals.
///
/// Returns 0 when the axis is not scrollable. The result is clamped to
/// [0, 100] so overscroll on elastic viewports cannot leak out of range.
pub fn scroll_percent(offset: f64, max_scroll: f64) -> f64 {
    if max_scroll.is_nan() || max_scroll <= 0.0 || !offset.is_finite() {
        return 0.0;
    }
    let percent = (offset / max_scroll * 100.0 * 100.0).round() / 100.0;
    percent.clamp(0.0, 100.0)
}

/// How missing pointer coordinates are detected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoordinatePolicy {
    /// Only an absent coordinate becomes `null`.
    #[default]
    Explicit,
    /// Truthiness fallback: `0` and NaN become `null` as well.
    Legacy,
}

impl CoordinatePolicy {
    pub fn apply(self, value: Option<f64>) -> Option<f64> {
        match self {
            CoordinatePolicy::Explicit => value,
            CoordinatePolicy::Legacy => value.filter(|v| *v != 0.0 && !v.is_nan()),
        }
    }
}

impl std::str::FromStr for CoordinatePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "explicit" => Ok(CoordinatePolicy::Explicit),
            "legacy" => Ok(CoordinatePolicy::Legacy),
            other => Err(format!("unknown coordinate policy '{}'", other)),
        }
    }
}

/// Writes a number the way `JSON.stringify` does: integral values without a
/// fractional part, non-finite values as `null`.
fn serialize_js_number<S: Serializer>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error> {
    match *value {
        Some(v) if v.is_finite() && v.fract() == 0.0 && v.abs() <= MAX_SAFE_INTEGER => {
            serializer.serialize_i64(v as i64)
        }
        Some(v) if v.is_finite() => serializer.serialize_f64(v),
        _ => serializer.serialize_none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_click_serializes_without_data_field() {
        let event = InteractionEvent::pointer(EventKind::Click, 1000, Some(10.0), Some(20.0));
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({"type": "click", "timestamp": 1000, "x": 10, "y": 20})
        );
    }

    #[test]
    fn test_scroll_serializes_null_data() {
        let event = InteractionEvent::scroll(5, 12.5, 0.0);
        assert_eq!(
            serde_json::to_string(&event).unwrap(),
            r#"{"type":"scroll","timestamp":5,"x":12.5,"y":0,"data":null}"#
        );
    }

    #[test]
    fn test_missing_and_non_finite_coordinates_are_null() {
        let event = InteractionEvent::pointer(EventKind::MouseMove, 1, None, Some(f64::NAN));
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({"type": "mousemove", "timestamp": 1, "x": null, "y": null})
        );
    }

    #[test]
    fn test_scroll_percent_basic() {
        let metrics = ScrollMetrics {
            scroll_x: 50.0,
            scroll_y: 0.0,
            scroll_width: 1224.0,
            scroll_height: 768.0,
            inner_width: 1024.0,
            inner_height: 768.0,
        };
        assert_eq!(metrics.percentages(), (25.0, 0.0));
    }

    #[test]
    fn test_scroll_percent_rounds_to_two_decimals() {
        assert_eq!(scroll_percent(1.0, 3.0), 33.33);
        assert_eq!(scroll_percent(2.0, 3.0), 66.67);
    }

    #[test]
    fn test_scroll_percent_not_scrollable() {
        assert_eq!(scroll_percent(100.0, 0.0), 0.0);
        assert_eq!(scroll_percent(100.0, -50.0), 0.0);
        assert_eq!(scroll_percent(f64::NAN, 10.0), 0.0);
    }

    #[test]
    fn test_scroll_percent_clamped() {
        assert_eq!(scroll_percent(-20.0, 200.0), 0.0);
        assert_eq!(scroll_percent(260.0, 200.0), 100.0);
    }

    #[test]
    fn test_coordinate_policies() {
        assert_eq!(CoordinatePolicy::Explicit.apply(Some(0.0)), Some(0.0));
        assert_eq!(CoordinatePolicy::Legacy.apply(Some(0.0)), None);
        assert_eq!(CoordinatePolicy::Legacy.apply(Some(f64::NAN)), None);
        assert_eq!(CoordinatePolicy::Legacy.apply(Some(3.0)), Some(3.0));
        assert_eq!(CoordinatePolicy::Explicit.apply(None), None);
    }

    #[test]
    fn test_pointer_sample_deserializes_partial() {
        let sample: PointerSample = serde_json::from_str(r#"{"clientX": 4}"#).unwrap();
        assert_eq!(sample.client_x, Some(4.0));
        assert_eq!(sample.client_y, None);
    }
}
