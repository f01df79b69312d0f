// src/visual/settings.rs

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::VisualError;

fn default_true() -> bool {
    true
}

fn default_show_top_n() -> u32 {
    10
}

/// Configuration of the ranked-table data provider. Compared structurally
/// between cycles; a difference forces a model rebuild.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderSettings {
    #[serde(default)]
    pub single_selection: bool,
    #[serde(default = "default_true")]
    pub filter_globally: bool,
    #[serde(default = "default_show_top_n")]
    pub show_top_n: u32,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        ProviderSettings {
            single_selection: false,
            filter_globally: true,
            show_top_n: default_show_top_n(),
        }
    }
}

/// Configuration of the rendering view. Compared structurally between
/// cycles; a difference forces the view to be destroyed and rebuilt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewSettings {
    #[serde(default = "default_true")]
    pub animated: bool,
    #[serde(default = "default_true")]
    pub side_panel: bool,
    #[serde(default = "default_true")]
    pub summary_header: bool,
    #[serde(default)]
    pub overview_mode: bool,
}

impl Default for ViewSettings {
    fn default() -> Self {
        ViewSettings {
            animated: true,
            side_panel: true,
            summary_header: true,
            overview_mode: false,
        }
    }
}

/// The visual's full configuration as parsed from the host payload. Each
/// cycle produces a fresh immutable snapshot; the previous snapshot is kept
/// by value and never mutated in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VisualSettings {
    #[serde(default)]
    pub provider: ProviderSettings,
    #[serde(default)]
    pub view: ViewSettings,
}

/// One enumerable property group for the host's property pane.
#[derive(Debug, Clone, Serialize)]
pub struct PropertyGroup {
    pub object_name: &'static str,
    pub properties: Value,
}

impl VisualSettings {
    /// Parses the settings payload delivered with an update cycle. A missing
    /// payload yields defaults; a malformed one is an error the caller
    /// reports before falling back to defaults.
    pub fn from_payload(payload: Option<&Value>) -> Result<VisualSettings, VisualError> {
        match payload {
            None => Ok(VisualSettings::default()),
            Some(value) => serde_json::from_value(value.clone())
                .map_err(|e| VisualError::MalformedSettings(e.to_string())),
        }
    }

    /// Enumerates the currently active property groups in serializable form
    /// for the host's property pane.
    pub fn enumerate_objects(&self) -> Vec<PropertyGroup> {
        let mut groups = Vec::new();
        if let Ok(properties) = serde_json::to_value(&self.provider) {
            groups.push(PropertyGroup {
                object_name: "provider",
                properties,
            });
        }
        if let Ok(properties) = serde_json::to_value(&self.view) {
            groups.push(PropertyGroup {
                object_name: "view",
                properties,
            });
        }
        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_payload_yields_defaults() {
        let settings = VisualSettings::from_payload(None).expect("defaults");
        assert_eq!(settings, VisualSettings::default());
        assert!(settings.provider.filter_globally);
        assert!(settings.view.animated);
    }

    #[test]
    fn partial_payload_keeps_field_defaults() {
        let payload = json!({ "provider": { "single_selection": true } });
        let settings = VisualSettings::from_payload(Some(&payload)).expect("parses");
        assert!(settings.provider.single_selection);
        assert!(settings.provider.filter_globally);
        assert_eq!(settings.view, ViewSettings::default());
    }

    #[test]
    fn malformed_payload_is_an_error() {
        let payload = json!({ "provider": { "show_top_n": "lots" } });
        let err = VisualSettings::from_payload(Some(&payload)).unwrap_err();
        assert!(matches!(err, VisualError::MalformedSettings(_)));
    }

    #[test]
    fn structural_comparison_detects_changes() {
        let base = VisualSettings::default();
        let mut changed = base.clone();
        changed.view.side_panel = false;
        assert_eq!(base, base.clone());
        assert_ne!(base, changed);
        assert_eq!(base.provider, changed.provider);
    }

    #[test]
    fn enumerates_both_property_groups() {
        let groups = VisualSettings::default().enumerate_objects();
        let names: Vec<&str> = groups.iter().map(|g| g.object_name).collect();
        assert_eq!(names, vec!["provider", "view"]);
        assert_eq!(groups[0].properties["filter_globally"], json!(true));
    }
}
