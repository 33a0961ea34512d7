//! Virtual files for the two inner tarballs of a webOS stub app.

use crate::error::{PackageError, Result};
use crate::package::{Launch, LaunchIndicator, PackageSpec};
use crate::validate::validate_spec;
use serde::Serialize;

const LAUNCH_COMMAND: &str =
    "luna-send-pub -f -n 1 luna://com.webos.service.applicationManager/launch";

/// A file that only exists inside a tar stream.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VirtualFile {
    pub path: String,
    pub content: Vec<u8>,
    pub mode: u32,
    pub mtime: u64,
}

impl VirtualFile {
    fn text(path: String, content: String, mode: u32, mtime: u64) -> Self {
        Self { path, content: content.into_bytes(), mode, mtime }
    }
}

/// Files for `data.tar.gz` and `control.tar.gz`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ManifestSet {
    pub data_files: Vec<VirtualFile>,
    pub control_files: Vec<VirtualFile>,
}

/// `appinfo.json`; field order is the serialized key order.
#[derive(Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AppInfo<'a> {
    pub id: &'a str,
    pub version: &'a str,
    #[serde(rename = "type")]
    pub app_type: &'a str,
    pub main: &'a str,
    pub title: &'a str,
    pub vendor: &'a str,
    pub icon: &'a str,
    pub large_icon: &'a str,
    pub icon_color: &'a str,
    pub visible: bool,
    pub no_splash_on_launch: bool,
    pub spinner_on_launch: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_window_type: Option<&'a str>,
}

impl<'a> AppInfo<'a> {
    pub fn from_spec(spec: &'a PackageSpec) -> Self {
        let indicator = spec.launch_indicator;
        let spinner = indicator == LaunchIndicator::Spinner;
        Self {
            id: &spec.app_id,
            version: &spec.version,
            app_type: "native",
            main: "run.sh",
            title: &spec.title,
            vendor: &spec.vendor,
            icon: &spec.icon,
            large_icon: &spec.large_icon,
            icon_color: &spec.icon_color,
            visible: spec.visible,
            no_splash_on_launch: indicator != LaunchIndicator::Default,
            spinner_on_launch: spinner,
            default_window_type: spinner.then_some("popup"),
        }
    }
}

/// `packageinfo.json`.
#[derive(Serialize, Clone, Debug)]
pub struct PackageInfo<'a> {
    pub id: &'a str,
    pub version: &'a str,
    pub app: &'a str,
}

/// Produce every virtual file of the package. Fails before producing anything if
/// the description is not packageable.
pub fn build(spec: &PackageSpec) -> Result<ManifestSet> {
    validate_spec(spec)?;
    let id = spec.app_id.as_str();
    let app_dir = format!("usr/palm/applications/{id}");

    let appinfo = serde_json::to_string(&AppInfo::from_spec(spec))?;
    let packageinfo =
        serde_json::to_string(&PackageInfo { id, version: &spec.version, app: id })?;
    let run_sh = format!("#!/usr/bin/env bash\n{}\n", launch_script(&spec.launch)?);

    let data_files = vec![
        VirtualFile::text(format!("{app_dir}/appinfo.json"), appinfo, 0o644, spec.mtime),
        VirtualFile::text(
            format!("usr/palm/packages/{id}/packageinfo.json"),
            packageinfo,
            0o644,
            spec.mtime,
        ),
        VirtualFile::text(format!("{app_dir}/run.sh"), run_sh, 0o755, spec.mtime),
    ];
    let control_files =
        vec![VirtualFile::text("control".to_string(), control_text(spec), 0o644, spec.mtime)];

    Ok(ManifestSet { data_files, control_files })
}

/// Body of `run.sh` after the shebang.
pub fn launch_script(launch: &Launch) -> Result<String> {
    match launch {
        Launch::Script { script } => Ok(script.clone()),
        Launch::Shortcut { target, params } => {
            let params: serde_json::Value = serde_json::from_str(params).map_err(|e| {
                PackageError::MalformedInput(format!("shortcut params are not valid JSON: {e}"))
            })?;
            let payload = serde_json::json!({ "id": target, "params": params });
            Ok(format!("{LAUNCH_COMMAND} {}", shell_quote(&payload.to_string())))
        }
    }
}

/// Single-quote `s` for bash; embedded quotes become `'\''`.
fn shell_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', r"'\''"))
}

/// The `control` file: one `Key: Value` per line.
pub fn control_text(spec: &PackageSpec) -> String {
    [
        ("Package", spec.app_id.as_str()),
        ("Version", spec.version.as_str()),
        ("Section", "misc"),
        ("Priority", "optional"),
        ("Architecture", "all"),
        ("Maintainer", spec.maintainer.as_str()),
        ("webOS-Package-Format-Version", "2"),
        ("webOS-Packager-Version", spec.packager_version.as_str()),
    ]
    .iter()
    .map(|(k, v)| format!("{k}: {v}"))
    .collect::<Vec<_>>()
    .join("\n")
}
