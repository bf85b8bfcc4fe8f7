//! Published JSON document
//!
//! ```json
//! {
//!   "schemaVersion": 1,
//!   "meta": {
//!     "generatedAt": "2026-10-19T08:00:00Z",
//!     "platform": "na1",
//!     "region": "americas",
//!     "queueFilter": [1100],
//!     "sampleMatchCount": 412,
//!     "patch": "14.24.1",
//!     "seedCount": 200,
//!     "identityCount": 197
//!   },
//!   "comps": [ ... ]
//! }
//! ```

use crate::aggregate::RankedComposition;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Bumped only on breaking format changes
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputDocument {
    pub schema_version: u32,
    pub meta: RunMeta,
    /// Best first
    pub comps: Vec<RankedComposition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunMeta {
    pub generated_at: DateTime<Utc>,
    pub platform: String,
    pub region: String,
    pub queue_filter: Vec<u32>,
    pub sample_match_count: usize,
    /// Content version tag, or the placeholder when the catalog was unavailable
    pub patch: String,
    #[serde(default)]
    pub seed_count: usize,
    #[serde(default)]
    pub identity_count: usize,
}

impl OutputDocument {
    pub fn new(meta: RunMeta, comps: Vec<RankedComposition>) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            meta,
            comps,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.comps.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta() -> RunMeta {
        RunMeta {
            generated_at: Utc::now(),
            platform: "na1".to_string(),
            region: "americas".to_string(),
            queue_filter: vec![1100],
            sample_match_count: 0,
            patch: "unknown".to_string(),
            seed_count: 0,
            identity_count: 0,
        }
    }

    #[test]
    fn test_top_level_field_names() {
        let json = serde_json::to_value(OutputDocument::new(meta(), Vec::new())).unwrap();

        assert_eq!(json["schemaVersion"], SCHEMA_VERSION);
        assert_eq!(json["meta"]["queueFilter"][0], 1100);
        assert_eq!(json["meta"]["sampleMatchCount"], 0);
        assert!(json["meta"]["generatedAt"].is_string());
        assert!(json["comps"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_older_meta_without_counts_still_parses() {
        let raw = r#"{
            "schemaVersion": 1,
            "meta": {
                "generatedAt": "2026-01-01T00:00:00Z",
                "platform": "euw1",
                "region": "europe",
                "queueFilter": [1100],
                "sampleMatchCount": 3,
                "patch": "14.1.1"
            },
            "comps": []
        }"#;

        let doc: OutputDocument = serde_json::from_str(raw).unwrap();
        assert_eq!(doc.meta.seed_count, 0);
        assert_eq!(doc.meta.region, "europe");
        assert!(doc.is_empty());
    }
}
