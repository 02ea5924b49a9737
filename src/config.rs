use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::roster::PickMode;

/// Config file looked for in the working directory when `--config` is not
/// given.
pub const CONFIG_FILE: &str = "glyphforge.json";

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Config {
    /// Icon font stylesheet mapping class names to code points.
    #[serde(default = "default_stylesheet")]
    pub stylesheet: PathBuf,
    /// Single-file TrueType font holding the glyphs.
    #[serde(default = "default_font")]
    pub font: PathBuf,
    /// Keep the common icon-name prefix instead of stripping it.
    #[serde(default)]
    pub keep_prefix: bool,
    #[serde(default = "default_available")]
    pub available_list: PathBuf,
    #[serde(default = "default_reserved")]
    pub reserved_list: PathBuf,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Output image size in pixels.
    #[serde(default = "default_size")]
    pub size: u32,
    /// Fill color, a name or hex value.
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default)]
    pub pick_mode: PickMode,
}

fn default_stylesheet() -> PathBuf {
    PathBuf::from("./fa/fontawesome.css")
}
fn default_font() -> PathBuf {
    PathBuf::from("./fa/fa-regular-400.ttf")
}
fn default_available() -> PathBuf {
    PathBuf::from("./icons/available.txt")
}
fn default_reserved() -> PathBuf {
    PathBuf::from("./icons/reserved.txt")
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("./output")
}
fn default_size() -> u32 {
    200
}
fn default_color() -> String {
    crate::color::DEFAULT_COLOR.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            stylesheet: default_stylesheet(),
            font: default_font(),
            keep_prefix: false,
            available_list: default_available(),
            reserved_list: default_reserved(),
            output_dir: default_output_dir(),
            size: default_size(),
            color: default_color(),
            pick_mode: PickMode::default(),
        }
    }
}

pub fn load_config(path: Option<&Path>) -> Config {
    let path = path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE));
    if path.exists() {
        let data = std::fs::read_to_string(&path).unwrap_or_default();
        match serde_json::from_str(&data) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Ignoring malformed config {}: {}", path.display(), e);
                Config::default()
            }
        }
    } else {
        Config::default()
    }
}

pub fn save_config(config: &Config, path: &Path) -> std::io::Result<()> {
    let data = serde_json::to_string_pretty(config)?;
    std::fs::write(path, data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.size, 200);
        assert_eq!(config.color, "#5DADE2");
        assert!(!config.keep_prefix);
        assert_eq!(config.pick_mode, PickMode::Legacy);
        assert_eq!(config.output_dir, PathBuf::from("./output"));
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: Config = serde_json::from_str(r#"{ "size": 64 }"#).unwrap();
        assert_eq!(config.size, 64);
        assert_eq!(config.color, "#5DADE2");
        assert_eq!(config.stylesheet, PathBuf::from("./fa/fontawesome.css"));
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("glyphforge.json");

        let mut config = Config::default();
        config.size = 96;
        config.pick_mode = PickMode::Uniform;
        save_config(&config, &path).unwrap();

        let loaded = load_config(Some(&path));
        assert_eq!(loaded.size, 96);
        assert_eq!(loaded.pick_mode, PickMode::Uniform);
    }

    #[test]
    fn test_save_to_unwritable_path_is_io_error() {
        let err = save_config(&Config::default(), Path::new("/nonexistent/dir/glyphforge.json"))
            .unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let loaded = load_config(Some(Path::new("/nonexistent/glyphforge.json")));
        assert_eq!(loaded.size, 200);
    }
}
