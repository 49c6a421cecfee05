use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{GanttError, Result};
use crate::model::{Language, ViewScale};

pub const OPTIONS_FILE: &str = "options.json";

/// What opens the task popup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PopupTrigger {
    #[default]
    Click,
    #[serde(alias = "mouseOver", alias = "hover")]
    MouseOver,
}

/// Chart layout and behaviour options. Every field has a default, so a
/// partial options file only overrides what it names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GanttOptions {
    #[serde(alias = "headerHeight")]
    pub header_height: f64,
    #[serde(alias = "columnWidth")]
    pub column_width: f64,
    /// Hours per column.
    pub step: f64,
    #[serde(alias = "barHeight")]
    pub bar_height: f64,
    #[serde(alias = "barCornerRadius")]
    pub bar_corner_radius: f64,
    pub padding: f64,
    #[serde(alias = "viewMode")]
    pub view_mode: ViewScale,
    #[serde(alias = "dateFormat")]
    pub date_format: String,
    #[serde(alias = "popupTrigger")]
    pub popup_trigger: PopupTrigger,
    pub language: Language,
}

impl Default for GanttOptions {
    fn default() -> Self {
        Self {
            header_height: 50.0,
            column_width: 30.0,
            step: 24.0,
            bar_height: 20.0,
            bar_corner_radius: 3.0,
            padding: 18.0,
            view_mode: ViewScale::Day,
            date_format: "YYYY-MM-DD".to_string(),
            popup_trigger: PopupTrigger::Click,
            language: Language::En,
        }
    }
}

impl GanttOptions {
    /// Defaults with the column geometry of `scale` applied.
    pub fn for_scale(scale: ViewScale) -> Self {
        let mut options = Self::default();
        options.apply_scale(scale);
        options
    }

    /// Overwrite the view mode and its column width and step.
    pub fn apply_scale(&mut self, scale: ViewScale) {
        self.view_mode = scale;
        self.column_width = scale.column_width();
        self.step = scale.step();
    }

    pub fn validate(&self) -> Result<()> {
        let sizes: [(&'static str, f64); 5] = [
            ("header_height", self.header_height),
            ("column_width", self.column_width),
            ("step", self.step),
            ("bar_height", self.bar_height),
            ("padding", self.padding),
        ];
        for (field, value) in sizes {
            if !value.is_finite() {
                return Err(GanttError::InvalidOption {
                    field,
                    reason: format!("{value} is not a finite number"),
                });
            }
        }
        for (field, value) in [
            ("column_width", self.column_width),
            ("step", self.step),
            ("bar_height", self.bar_height),
        ] {
            if value <= 0.0 {
                return Err(GanttError::InvalidOption {
                    field,
                    reason: format!("must be positive, got {value}"),
                });
            }
        }
        for (field, value) in [
            ("header_height", self.header_height),
            ("padding", self.padding),
            ("bar_corner_radius", self.bar_corner_radius),
        ] {
            if value < 0.0 {
                return Err(GanttError::InvalidOption {
                    field,
                    reason: format!("must not be negative, got {value}"),
                });
            }
        }
        if self.date_format.trim().is_empty() {
            return Err(GanttError::InvalidOption {
                field: "date_format",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

/// `options.json` inside the per-user config directory.
pub fn default_options_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "RustGanttChart").map(|dirs| dirs.config_dir().join(OPTIONS_FILE))
}

pub fn load_options(path: &Path) -> Result<GanttOptions> {
    let contents = std::fs::read_to_string(path).map_err(|source| GanttError::IoPath {
        path: path.to_path_buf(),
        source,
    })?;
    let options: GanttOptions =
        serde_json::from_str(&contents).map_err(|source| GanttError::Json {
            path: path.to_path_buf(),
            source,
        })?;
    options.validate()?;
    debug!(path = %path.display(), "loaded chart options");
    Ok(options)
}

pub fn save_options(options: &GanttOptions, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| GanttError::IoPath {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let json = serde_json::to_string_pretty(options).map_err(|source| GanttError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    std::fs::write(path, json).map_err(|source| GanttError::IoPath {
        path: path.to_path_buf(),
        source,
    })
}

/// Options from the user config directory, or defaults when there is no
/// file or it cannot be used.
pub fn load_or_default() -> GanttOptions {
    let Some(path) = default_options_path() else {
        return GanttOptions::default();
    };
    if !path.exists() {
        return GanttOptions::default();
    }
    match load_options(&path) {
        Ok(options) => options,
        Err(err) => {
            warn!(error = %err, "ignoring chart options file");
            GanttOptions::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_documented_values() {
        let o = GanttOptions::default();
        assert_eq!(o.header_height, 50.0);
        assert_eq!(o.column_width, 30.0);
        assert_eq!(o.step, 24.0);
        assert_eq!(o.bar_height, 20.0);
        assert_eq!(o.bar_corner_radius, 3.0);
        assert_eq!(o.padding, 18.0);
        assert_eq!(o.view_mode, ViewScale::Day);
        assert_eq!(o.date_format, "YYYY-MM-DD");
        assert_eq!(o.popup_trigger, PopupTrigger::Click);
        assert_eq!(o.language, Language::En);
        assert!(o.validate().is_ok());
    }

    #[test]
    fn test_partial_json_overrides_only_named_fields() {
        let o: GanttOptions =
            serde_json::from_str(r#"{"barHeight": 24, "viewMode": "Week", "language": "fr"}"#)
                .unwrap();
        assert_eq!(o.bar_height, 24.0);
        assert_eq!(o.view_mode, ViewScale::Week);
        assert_eq!(o.language, Language::Fr);
        assert_eq!(o.padding, 18.0);
    }

    #[test]
    fn test_apply_scale_overwrites_column_geometry() {
        let o = GanttOptions::for_scale(ViewScale::Week);
        assert_eq!(o.column_width, 140.0);
        assert_eq!(o.step, 168.0);
        assert_eq!(o.view_mode, ViewScale::Week);
    }

    #[test]
    fn test_validate_rejects_bad_sizes() {
        let o = GanttOptions {
            column_width: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            o.validate(),
            Err(GanttError::InvalidOption { field: "column_width", .. })
        ));

        let o = GanttOptions {
            step: f64::NAN,
            ..Default::default()
        };
        assert!(o.validate().is_err());

        let o = GanttOptions {
            padding: -1.0,
            ..Default::default()
        };
        assert!(o.validate().is_err());
    }

    #[test]
    fn test_options_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(OPTIONS_FILE);
        let mut o = GanttOptions::for_scale(ViewScale::Month);
        o.popup_trigger = PopupTrigger::MouseOver;
        save_options(&o, &path).unwrap();
        assert_eq!(load_options(&path).unwrap(), o);
    }

    #[test]
    fn test_load_options_reports_bad_json_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(OPTIONS_FILE);
        std::fs::write(&path, "{ not json").unwrap();
        match load_options(&path) {
            Err(GanttError::Json { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected json error, got {other:?}"),
        }
    }
}
