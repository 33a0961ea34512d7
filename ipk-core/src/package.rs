use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

pub const DEFAULT_VERSION: &str = "0.0.1";
pub const DEFAULT_SHORTCUT_TARGET: &str = "org.webosbrew.hbchannel";

/// How the app shows it is starting.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LaunchIndicator {
    /// Stock splash screen.
    #[default]
    Default,
    /// No splash; spinner in a popup window.
    Spinner,
    /// No splash and no spinner. Unknown names map here.
    #[serde(other)]
    None,
}

impl std::str::FromStr for LaunchIndicator {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s {
            "default" => LaunchIndicator::Default,
            "spinner" => LaunchIndicator::Spinner,
            _ => LaunchIndicator::None,
        })
    }
}

/// What `run.sh` does.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Launch {
    /// Literal shell body.
    Script { script: String },
    /// Launch another app; `params` is JSON text, parsed at build time.
    Shortcut {
        target: String,
        #[serde(default = "default_params")]
        params: String,
    },
}

impl Default for Launch {
    fn default() -> Self {
        Launch::Shortcut { target: DEFAULT_SHORTCUT_TARGET.to_string(), params: default_params() }
    }
}

/// Declarative description of one stub app package. Built once, never mutated by
/// the build pipeline.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PackageSpec {
    pub app_id: String,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub launch: Launch,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_vendor")]
    pub vendor: String,
    #[serde(default = "default_icon")]
    pub icon: String,
    #[serde(default = "default_large_icon")]
    pub large_icon: String,
    #[serde(default = "default_icon_color")]
    pub icon_color: String,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default)]
    pub launch_indicator: LaunchIndicator,
    #[serde(default = "default_maintainer")]
    pub maintainer: String,
    #[serde(default = "default_packager_version")]
    pub packager_version: String,
    /// Timestamp stamped on every tar and ar member (seconds since epoch).
    #[serde(default)]
    pub mtime: u64,
}

impl PackageSpec {
    pub fn new(app_id: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            version: default_version(),
            launch: Launch::default(),
            title: default_title(),
            vendor: default_vendor(),
            icon: default_icon(),
            large_icon: default_large_icon(),
            icon_color: default_icon_color(),
            visible: true,
            launch_indicator: LaunchIndicator::Default,
            maintainer: default_maintainer(),
            packager_version: default_packager_version(),
            mtime: 0,
        }
    }

    pub fn with_script(mut self, script: impl Into<String>) -> Self {
        self.launch = Launch::Script { script: script.into() };
        self
    }

    pub fn with_shortcut(mut self, target: impl Into<String>, params: impl Into<String>) -> Self {
        self.launch = Launch::Shortcut { target: target.into(), params: params.into() };
        self
    }

    /// Load a spec from a camelCase JSON file; omitted fields take their defaults.
    pub fn from_json_path(path: &Path) -> Result<Self> {
        let f = File::open(path).with_context(|| format!("open {:?}", path))?;
        let spec = serde_json::from_reader(std::io::BufReader::new(f))
            .with_context(|| format!("parse package spec {:?}", path))?;
        Ok(spec)
    }
}

fn default_version() -> String {
    DEFAULT_VERSION.to_string()
}
fn default_params() -> String {
    "{}".to_string()
}
fn default_title() -> String {
    "Test app stub!".to_string()
}
fn default_vendor() -> String {
    "stubapp".to_string()
}
fn default_icon() -> String {
    "icon.png".to_string()
}
fn default_large_icon() -> String {
    "largeicon.png".to_string()
}
fn default_icon_color() -> String {
    "#00ff00".to_string()
}
fn default_true() -> bool {
    true
}
fn default_maintainer() -> String {
    "N/A <nobody@example.com>".to_string()
}
fn default_packager_version() -> String {
    "x.y.x".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_json_takes_defaults() {
        let spec: PackageSpec = serde_json::from_str(r#"{"appId":"org.example.app"}"#).unwrap();
        assert_eq!(spec, PackageSpec::new("org.example.app"));
    }

    #[test]
    fn unknown_indicator_maps_to_none() {
        let spec: PackageSpec =
            serde_json::from_str(r#"{"appId":"a","launchIndicator":"bouncing"}"#).unwrap();
        assert_eq!(spec.launch_indicator, LaunchIndicator::None);
        assert_eq!("bouncing".parse::<LaunchIndicator>().unwrap(), LaunchIndicator::None);
    }

    #[test]
    fn script_launch_from_json() {
        let spec: PackageSpec = serde_json::from_str(
            r#"{"appId":"a","launch":{"kind":"script","script":"echo hi"}}"#,
        )
        .unwrap();
        assert_eq!(spec.launch, Launch::Script { script: "echo hi".into() });
    }
}
