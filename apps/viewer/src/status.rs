use std::fmt;

use serde::Serialize;

/// What the viewer shows the user about its data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ViewerStatus {
    #[default]
    Loading,
    /// At least one source loaded. `failures` counts the sources that did not.
    Ready { feature_count: usize, failures: usize },
    /// Every source failed.
    Failed { message: String },
}

impl ViewerStatus {
    pub fn is_ready(&self) -> bool {
        matches!(self, ViewerStatus::Ready { .. })
    }
}

impl fmt::Display for ViewerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewerStatus::Loading => write!(f, "Loading..."),
            ViewerStatus::Ready {
                feature_count,
                failures: 0,
            } => write!(f, "{} features loaded", feature_count),
            ViewerStatus::Ready {
                feature_count,
                failures,
            } => write!(
                f,
                "{} features loaded, {} source{} failed",
                feature_count,
                failures,
                if *failures == 1 { "" } else { "s" }
            ),
            ViewerStatus::Failed { message } => write!(f, "Error: {}", message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(ViewerStatus::Loading.to_string(), "Loading...");
        assert_eq!(
            ViewerStatus::Ready { feature_count: 12, failures: 0 }.to_string(),
            "12 features loaded"
        );
        assert_eq!(
            ViewerStatus::Ready { feature_count: 3, failures: 1 }.to_string(),
            "3 features loaded, 1 source failed"
        );
        assert_eq!(
            ViewerStatus::Failed { message: "HTTP 500".into() }.to_string(),
            "Error: HTTP 500"
        );
    }

    #[test]
    fn test_serializes_tagged() {
        let json = serde_json::to_value(ViewerStatus::Ready { feature_count: 2, failures: 0 }).unwrap();
        assert_eq!(json["state"], "ready");
        assert_eq!(json["feature_count"], 2);
    }
}
