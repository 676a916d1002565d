//! Category table: which variants an upload category produces.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::Path;
use std::str::FromStr;

const BUILTIN_CATEGORIES: &str = include_str!("../../categories.json");

/// Target size of a derived image.
///
/// `Exact` is used for device thumbnails; `Bound` constrains a processed original.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SizeSpec {
    Exact { width: u32, height: u32 },
    Bound { max_width: u32, max_height: u32 },
}

impl SizeSpec {
    /// Width and height handed to the crop/resize step.
    ///
    /// A bound is treated as the target itself, so the output never exceeds it.
    pub fn target(&self) -> (u32, u32) {
        match *self {
            SizeSpec::Exact { width, height } => (width, height),
            SizeSpec::Bound {
                max_width,
                max_height,
            } => (max_width, max_height),
        }
    }

    fn validate(&self, context: &str) -> anyhow::Result<()> {
        let (width, height) = self.target();
        if width == 0 || height == 0 {
            return Err(anyhow::anyhow!(
                "{}: dimensions must be strictly positive, got {}x{}",
                context,
                width,
                height
            ));
        }
        Ok(())
    }
}

/// A device slot holds either one size or an ordered per-file list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SizeSlot {
    Single(SizeSpec),
    List(Vec<SizeSpec>),
}

impl SizeSlot {
    /// Size used when the slot applies to every file: the single spec or the
    /// first list element. An empty list yields nothing.
    pub fn primary(&self) -> Option<SizeSpec> {
        match self {
            SizeSlot::Single(spec) => Some(*spec),
            SizeSlot::List(specs) => specs.first().copied(),
        }
    }

    /// Per-file sizes, only for list slots.
    pub fn as_list(&self) -> Option<&[SizeSpec]> {
        match self {
            SizeSlot::Single(_) => None,
            SizeSlot::List(specs) => Some(specs),
        }
    }

    fn specs(&self) -> Vec<SizeSpec> {
        match self {
            SizeSlot::Single(spec) => vec![*spec],
            SizeSlot::List(specs) => specs.clone(),
        }
    }
}

/// Device breakpoints a thumbnail can be produced for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Device {
    Mobile,
    Tablet,
    Desktop,
}

impl Device {
    /// Processing order for device variants.
    pub const ALL: [Device; 3] = [Device::Mobile, Device::Tablet, Device::Desktop];

    /// Filename suffix appended to variants for this device.
    pub fn suffix(self) -> &'static str {
        match self {
            Device::Mobile => "xs",
            Device::Tablet => "md",
            Device::Desktop => "lg",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Device::Mobile => "mobile",
            Device::Tablet => "tablet",
            Device::Desktop => "desktop",
        }
    }
}

impl FromStr for Device {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mobile" => Ok(Device::Mobile),
            "tablet" => Ok(Device::Tablet),
            "desktop" => Ok(Device::Desktop),
            _ => Err(anyhow::anyhow!("Unknown device: {}", s)),
        }
    }
}

impl Display for Device {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThumbnailSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile: Option<SizeSlot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tablet: Option<SizeSlot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desktop: Option<SizeSlot>,
}

impl ThumbnailSet {
    pub fn slot(&self, device: Device) -> Option<&SizeSlot> {
        match device {
            Device::Mobile => self.mobile.as_ref(),
            Device::Tablet => self.tablet.as_ref(),
            Device::Desktop => self.desktop.as_ref(),
        }
    }

    /// Present slots in processing order.
    pub fn slots(&self) -> impl Iterator<Item = (Device, &SizeSlot)> + '_ {
        Device::ALL
            .into_iter()
            .filter_map(move |device| self.slot(device).map(|slot| (device, slot)))
    }
}

/// Processing rules for one category.
///
/// With neither `thumbnails` nor `original` the category is a passthrough.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnails: Option<ThumbnailSet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original: Option<SizeSpec>,
}

impl CategoryConfig {
    pub fn is_passthrough(&self) -> bool {
        self.thumbnails.is_none() && self.original.is_none()
    }
}

/// Immutable category lookup, loaded once at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryTable {
    categories: HashMap<String, CategoryConfig>,
}

impl CategoryTable {
    pub fn new(categories: HashMap<String, CategoryConfig>) -> anyhow::Result<Self> {
        let table = Self { categories };
        table.validate()?;
        Ok(table)
    }

    /// Categories shipped with the gateway.
    pub fn builtin() -> anyhow::Result<Self> {
        Self::from_json_str(BUILTIN_CATEGORIES).context("Built-in category table is invalid")
    }

    pub fn from_json_str(json: &str) -> anyhow::Result<Self> {
        let table: CategoryTable =
            serde_json::from_str(json).context("Failed to parse category table")?;
        table.validate()?;
        Ok(table)
    }

    pub fn from_path(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read category table {}", path.display()))?;
        Self::from_json_str(&json)
    }

    /// Exact-match lookup. Unknown or absent categories resolve to `None`.
    pub fn get(&self, category: Option<&str>) -> Option<&CategoryConfig> {
        category.and_then(|name| self.categories.get(name))
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    fn validate(&self) -> anyhow::Result<()> {
        for (name, config) in &self.categories {
            if let Some(original) = &config.original {
                original.validate(&format!("category '{}' original", name))?;
            }
            if let Some(thumbnails) = &config.thumbnails {
                for (device, slot) in thumbnails.slots() {
                    for spec in slot.specs() {
                        spec.validate(&format!("category '{}' {} thumbnail", name, device))?;
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_table_loads() {
        let table = CategoryTable::builtin().unwrap();
        let avatar = table.get(Some("avatar")).unwrap();
        let thumbs = avatar.thumbnails.as_ref().unwrap();
        assert_eq!(
            thumbs.mobile,
            Some(SizeSlot::Single(SizeSpec::Exact {
                width: 90,
                height: 90
            }))
        );
        assert!(table.get(Some("ads")).unwrap().is_passthrough());
    }

    #[test]
    fn test_size_spec_shapes() {
        let exact: SizeSpec = serde_json::from_str(r#"{"width": 90, "height": 60}"#).unwrap();
        assert_eq!(exact.target(), (90, 60));
        assert!(matches!(exact, SizeSpec::Exact { .. }));

        let bound: SizeSpec =
            serde_json::from_str(r#"{"max_width": 600, "max_height": 315}"#).unwrap();
        assert_eq!(bound.target(), (600, 315));
        assert!(matches!(bound, SizeSpec::Bound { .. }));
    }

    #[test]
    fn test_list_slot() {
        let table = CategoryTable::from_json_str(
            r#"{"school-thumbnail": {"thumbnails": {"tablet": [
                {"width": 10, "height": 10},
                {"width": 20, "height": 20}
            ], "mobile": []}}}"#,
        )
        .unwrap();
        let thumbs = table
            .get(Some("school-thumbnail"))
            .and_then(|c| c.thumbnails.as_ref())
            .unwrap();
        let tablet = thumbs.slot(Device::Tablet).unwrap();
        assert_eq!(tablet.as_list().map(|l| l.len()), Some(2));
        assert_eq!(
            tablet.primary(),
            Some(SizeSpec::Exact {
                width: 10,
                height: 10
            })
        );
        assert_eq!(thumbs.slot(Device::Mobile).unwrap().primary(), None);
        assert!(thumbs.slot(Device::Desktop).is_none());
    }

    #[test]
    fn test_zero_dimension_rejected() {
        let err = CategoryTable::from_json_str(
            r#"{"broken": {"thumbnails": {"mobile": {"width": 0, "height": 10}}}}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("strictly positive"));
    }

    #[test]
    fn test_negative_dimension_rejected() {
        assert!(CategoryTable::from_json_str(
            r#"{"broken": {"original": {"max_width": -5, "max_height": 10}}}"#,
        )
        .is_err());
    }

    #[test]
    fn test_unknown_and_absent_categories() {
        let table = CategoryTable::builtin().unwrap();
        assert!(table.get(Some("nope")).is_none());
        assert!(table.get(None).is_none());
    }

    #[test]
    fn test_device_suffixes() {
        assert_eq!(Device::Mobile.suffix(), "xs");
        assert_eq!(Device::Tablet.suffix(), "md");
        assert_eq!(Device::Desktop.suffix(), "lg");
        assert_eq!("tablet".parse::<Device>().unwrap(), Device::Tablet);
    }

    #[test]
    fn test_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("categories.json");
        std::fs::write(
            &path,
            r#"{"cover": {"original": {"max_width": 600, "max_height": 315}}}"#,
        )
        .unwrap();
        let table = CategoryTable::from_path(&path).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(
            table.get(Some("cover")).unwrap().original,
            Some(SizeSpec::Bound {
                max_width: 600,
                max_height: 315
            })
        );
    }
}
