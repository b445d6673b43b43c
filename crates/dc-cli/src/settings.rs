//! Resolve filter tables and the suffix table from CLI options.

use std::fs;
use std::path::Path;

use clap::ValueEnum;
use dc_compiler::{CanonConfig, FilterConfig, Preset};
use dc_core::SuffixTable;

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum PresetArg {
    Plain,
    Ad,
    Proxy,
}

impl From<PresetArg> for Preset {
    fn from(arg: PresetArg) -> Self {
        match arg {
            PresetArg::Plain => Preset::Plain,
            PresetArg::Ad => Preset::Ad,
            PresetArg::Proxy => Preset::Proxy,
        }
    }
}

pub struct Settings {
    pub preset: Preset,
    pub filter: FilterConfig,
    pub suffixes: SuffixTable,
}

/// `--preset` overrides the config file's preset; an explicit `filter`
/// section in the file still takes precedence over any preset. `--suffixes`
/// overrides the file's suffix list.
pub fn load_settings(
    preset: Option<PresetArg>,
    config_path: Option<&Path>,
    suffixes_path: Option<&Path>,
) -> Result<Settings, String> {
    let mut config = match config_path {
        Some(path) => {
            let text = read_text(path)?;
            CanonConfig::from_json(&text)
                .map_err(|e| format!("Invalid config '{}': {}", path.display(), e))?
        }
        None => CanonConfig::default(),
    };
    if let Some(preset) = preset {
        config.preset = preset.into();
    }

    let suffixes = match suffixes_path {
        Some(path) => SuffixTable::parse(&read_text(path)?),
        None => config.suffix_table(),
    };
    log::debug!(
        "Using preset '{}', {} suffixes",
        config.preset,
        suffixes.len()
    );

    Ok(Settings {
        preset: config.preset,
        filter: config.filter_config(),
        suffixes,
    })
}

pub fn read_text(path: &Path) -> Result<String, String> {
    fs::read_to_string(path).map_err(|e| format!("Failed to read '{}': {}", path.display(), e))
}

pub fn write_text(path: &Path, text: &str) -> Result<(), String> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create '{}': {}", parent.display(), e))?;
    }
    fs::write(path, text).map_err(|e| format!("Failed to write '{}': {}", path.display(), e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_files() {
        let settings = load_settings(None, None, None).unwrap();
        assert_eq!(settings.preset, Preset::Plain);
        assert_eq!(settings.filter, Preset::Plain.filter_config());
        assert_eq!(settings.suffixes, SuffixTable::builtin());
    }

    #[test]
    fn test_cli_preset_overrides_file_preset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        write_text(&path, r#"{ "preset": "proxy" }"#).unwrap();
        let settings = load_settings(Some(PresetArg::Ad), Some(&path), None).unwrap();
        assert_eq!(settings.preset, Preset::Ad);
        assert_eq!(settings.filter, Preset::Ad.filter_config());
    }

    #[test]
    fn test_suffix_file_overrides_builtin() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("suffixes.dat");
        write_text(&path, "// test\ncom\nco.uk\n").unwrap();
        let settings = load_settings(None, None, Some(&path)).unwrap();
        assert_eq!(settings.suffixes.len(), 2);
    }

    #[test]
    fn test_missing_config_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");
        let err = load_settings(None, Some(&path), None).err().unwrap();
        assert!(err.contains("Failed to read"), "got: {}", err);
    }
}
