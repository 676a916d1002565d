//! Upload response payloads.
//!
//! Field names `k`, `e` and `c` are part of the public API and must not change.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::category::Device;

/// Key returned to the caller for one logical upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ResponseKey {
    /// Storage key without extension (and without device suffix in collapsed modes).
    pub k: String,
    /// Extension including the leading dot.
    pub e: String,
    /// Category the upload was processed under.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub c: Option<String>,
}

/// School-thumbnail response: entries grouped by device.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct GroupedResponse {
    pub mobile: Vec<ResponseKey>,
    pub tablet: Vec<ResponseKey>,
    pub desktop: Vec<ResponseKey>,
}

impl GroupedResponse {
    pub fn device_mut(&mut self, device: Device) -> &mut Vec<ResponseKey> {
        match device {
            Device::Mobile => &mut self.mobile,
            Device::Tablet => &mut self.tablet,
            Device::Desktop => &mut self.desktop,
        }
    }

    pub fn device(&self, device: Device) -> &[ResponseKey] {
        match device {
            Device::Mobile => &self.mobile,
            Device::Tablet => &self.tablet,
            Device::Desktop => &self.desktop,
        }
    }
}

/// Result of an upload: a flat list, or the grouped school-thumbnail shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum UploadResponse {
    Keys(Vec<ResponseKey>),
    Grouped(GroupedResponse),
}

impl UploadResponse {
    pub fn keys(&self) -> Option<&[ResponseKey]> {
        match self {
            UploadResponse::Keys(keys) => Some(keys),
            UploadResponse::Grouped(_) => None,
        }
    }

    pub fn grouped(&self) -> Option<&GroupedResponse> {
        match self {
            UploadResponse::Keys(_) => None,
            UploadResponse::Grouped(grouped) => Some(grouped),
        }
    }

    /// All entries as one list; grouped entries come in device order.
    pub fn into_flat(self) -> Vec<ResponseKey> {
        match self {
            UploadResponse::Keys(keys) => keys,
            UploadResponse::Grouped(grouped) => grouped
                .mobile
                .into_iter()
                .chain(grouped.tablet)
                .chain(grouped.desktop)
                .collect(),
        }
    }
}

/// A file stored verbatim through the raw file endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StoredFile {
    pub filename: String,
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_key_omits_missing_category() {
        let key = ResponseKey {
            k: "images/1700000000000-photo".to_string(),
            e: ".jpg".to_string(),
            c: None,
        };
        let json = serde_json::to_value(&key).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"k": "images/1700000000000-photo", "e": ".jpg"})
        );
    }

    #[test]
    fn test_grouped_serializes_as_object() {
        let mut grouped = GroupedResponse::default();
        grouped.device_mut(Device::Tablet).push(ResponseKey {
            k: "1-a".to_string(),
            e: ".png".to_string(),
            c: Some("school-thumbnail".to_string()),
        });
        let response = UploadResponse::Grouped(grouped);
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["mobile"], serde_json::json!([]));
        assert_eq!(json["tablet"][0]["c"], "school-thumbnail");
        assert_eq!(response.into_flat().len(), 1);
    }
}
