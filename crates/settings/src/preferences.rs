use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

const PREFERENCES_VERSION: u32 = 1;

const PAPER_NAMES: &[&str] = &["A3", "A4", "Letter", "Legal"];

#[derive(Debug, Error)]
pub enum PreferencesError {
    #[error("failed to read preferences {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse preferences {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to serialize preferences {path}: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to write preferences {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to prepare directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("unknown preference key '{0}'")]
    UnknownKey(String),
    #[error("invalid value '{value}' for '{key}'")]
    InvalidValue { key: String, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub layout: LayoutPreferences,
}

fn default_version() -> u32 {
    PREFERENCES_VERSION
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            version: PREFERENCES_VERSION,
            layout: LayoutPreferences::default(),
        }
    }
}

impl Preferences {
    pub fn sanitize(&mut self) {
        if self.version == 0 {
            self.version = PREFERENCES_VERSION;
        }
        self.layout.sanitize();
    }

    /// Every settable key with its current value, in a stable order.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        let layout = &self.layout;
        vec![
            ("layout.font_family", layout.font_family.clone()),
            ("layout.font_size_pt", layout.font_size_pt.to_string()),
            (
                "layout.line_spacing_percent",
                layout.line_spacing_percent.to_string(),
            ),
            ("layout.margin_top_pt", layout.margin_top_pt.to_string()),
            ("layout.margin_bottom_pt", layout.margin_bottom_pt.to_string()),
            ("layout.margin_left_pt", layout.margin_left_pt.to_string()),
            ("layout.margin_right_pt", layout.margin_right_pt.to_string()),
            ("layout.paper", layout.paper.clone()),
            ("layout.landscape", layout.landscape.to_string()),
            ("layout.dpi", layout.dpi.to_string()),
        ]
    }

    /// Sets one value by its dotted key. `layout.margin_pt` sets all four margins.
    /// Values are sanitized afterwards.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), PreferencesError> {
        let invalid = || PreferencesError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        };
        let number = || value.trim().parse::<u32>().map_err(|_| invalid());

        match key {
            "layout.font_family" => self.layout.font_family = value.to_string(),
            "layout.font_size_pt" => self.layout.font_size_pt = number()?,
            "layout.line_spacing_percent" => self.layout.line_spacing_percent = number()?,
            "layout.margin_pt" => {
                let margin = number()?;
                self.layout.margin_top_pt = margin;
                self.layout.margin_bottom_pt = margin;
                self.layout.margin_left_pt = margin;
                self.layout.margin_right_pt = margin;
            }
            "layout.margin_top_pt" => self.layout.margin_top_pt = number()?,
            "layout.margin_bottom_pt" => self.layout.margin_bottom_pt = number()?,
            "layout.margin_left_pt" => self.layout.margin_left_pt = number()?,
            "layout.margin_right_pt" => self.layout.margin_right_pt = number()?,
            "layout.paper" => {
                let paper = PAPER_NAMES
                    .iter()
                    .find(|name| name.eq_ignore_ascii_case(value.trim()))
                    .ok_or_else(invalid)?;
                self.layout.paper = paper.to_string();
            }
            "layout.landscape" => {
                self.layout.landscape = value.trim().parse().map_err(|_| invalid())?;
            }
            "layout.dpi" => self.layout.dpi = number()?,
            _ => return Err(PreferencesError::UnknownKey(key.to_string())),
        }
        self.sanitize();
        Ok(())
    }
}

/// Page layout for rich-text documents. Margins are whole points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutPreferences {
    #[serde(default = "default_font_family")]
    pub font_family: String,
    #[serde(default = "default_font_size")]
    pub font_size_pt: u32,
    #[serde(default = "default_line_spacing")]
    pub line_spacing_percent: u32,
    #[serde(default = "default_margin")]
    pub margin_top_pt: u32,
    #[serde(default = "default_margin")]
    pub margin_bottom_pt: u32,
    #[serde(default = "default_margin")]
    pub margin_left_pt: u32,
    #[serde(default = "default_margin")]
    pub margin_right_pt: u32,
    #[serde(default = "default_paper")]
    pub paper: String,
    #[serde(default)]
    pub landscape: bool,
    #[serde(default = "default_dpi")]
    pub dpi: u32,
}

fn default_font_family() -> String {
    "Courier New".to_string()
}

fn default_font_size() -> u32 {
    12
}

fn default_line_spacing() -> u32 {
    120
}

fn default_margin() -> u32 {
    36
}

fn default_paper() -> String {
    "A4".to_string()
}

fn default_dpi() -> u32 {
    300
}

impl Default for LayoutPreferences {
    fn default() -> Self {
        Self {
            font_family: default_font_family(),
            font_size_pt: default_font_size(),
            line_spacing_percent: default_line_spacing(),
            margin_top_pt: default_margin(),
            margin_bottom_pt: default_margin(),
            margin_left_pt: default_margin(),
            margin_right_pt: default_margin(),
            paper: default_paper(),
            landscape: false,
            dpi: default_dpi(),
        }
    }
}

impl LayoutPreferences {
    fn sanitize(&mut self) {
        if self.font_family.trim().is_empty() {
            self.font_family = default_font_family();
        }
        self.font_size_pt = self.font_size_pt.clamp(4, 144);
        self.line_spacing_percent = self.line_spacing_percent.clamp(100, 300);
        for margin in [
            &mut self.margin_top_pt,
            &mut self.margin_bottom_pt,
            &mut self.margin_left_pt,
            &mut self.margin_right_pt,
        ] {
            *margin = (*margin).min(288);
        }
        match PAPER_NAMES
            .iter()
            .find(|name| name.eq_ignore_ascii_case(self.paper.trim()))
        {
            Some(name) => self.paper = name.to_string(),
            None => self.paper = default_paper(),
        }
        self.dpi = self.dpi.clamp(72, 2400);
    }

    /// Line spacing as a multiplier of the font's pixel size.
    pub fn line_spacing(&self) -> f32 {
        self.line_spacing_percent as f32 / 100.0
    }
}

#[derive(Debug)]
pub struct PreferencesStore {
    path: PathBuf,
    data: Preferences,
}

impl PreferencesStore {
    pub fn new(path: impl Into<PathBuf>, preferences: Preferences) -> Self {
        Self {
            path: path.into(),
            data: preferences,
        }
    }

    /// Loads preferences from `path`; a missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PreferencesError> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            let mut data = Preferences::default();
            data.sanitize();
            return Ok(Self { path, data });
        }

        let data = read_preferences(&path)?;
        Ok(Self { path, data })
    }

    pub fn preferences(&self) -> &Preferences {
        &self.data
    }

    pub fn preferences_mut(&mut self) -> &mut Preferences {
        &mut self.data
    }

    pub fn update<F>(&mut self, mut op: F) -> Result<(), PreferencesError>
    where
        F: FnMut(&mut Preferences),
    {
        op(&mut self.data);
        self.data.sanitize();
        self.save()
    }

    pub fn overwrite(&mut self, preferences: Preferences) -> Result<(), PreferencesError> {
        self.data = preferences;
        self.data.sanitize();
        self.save()
    }

    /// Writes to a sibling `.tmp` file first and renames it over the target.
    pub fn save(&self) -> Result<(), PreferencesError> {
        ensure_parent(&self.path)?;
        let payload = to_json(&self.data, &self.path)?;

        let tmp_path = self.path.with_extension("tmp");
        fs::write(&tmp_path, payload.as_bytes()).map_err(|source| PreferencesError::Write {
            path: tmp_path.clone(),
            source,
        })?;
        fs::rename(&tmp_path, &self.path).map_err(|source| PreferencesError::Write {
            path: self.path.clone(),
            source,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn export_to(&self, path: impl AsRef<Path>) -> Result<(), PreferencesError> {
        let path = path.as_ref().to_path_buf();
        ensure_parent(&path)?;
        let payload = to_json(&self.data, &path)?;
        fs::write(&path, payload.as_bytes())
            .map_err(|source| PreferencesError::Write { path, source })
    }

    /// Replaces the current preferences with the file at `source`, keeping a `.bak`
    /// copy of the previous file.
    pub fn import_from(&mut self, source: impl AsRef<Path>) -> Result<(), PreferencesError> {
        let data = read_preferences(source.as_ref())?;
        self.backup_existing()?;
        self.data = data;
        self.save()
    }

    fn backup_existing(&self) -> Result<(), PreferencesError> {
        if self.path.exists() {
            let backup = self.path.with_extension("bak");
            fs::copy(&self.path, &backup).map_err(|source| PreferencesError::Write {
                path: backup,
                source,
            })?;
        }
        Ok(())
    }
}

fn read_preferences(path: &Path) -> Result<Preferences, PreferencesError> {
    let contents = fs::read_to_string(path).map_err(|source| PreferencesError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mut data: Preferences =
        serde_json::from_str(&contents).map_err(|source| PreferencesError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    data.sanitize();
    Ok(data)
}

fn to_json(data: &Preferences, path: &Path) -> Result<String, PreferencesError> {
    serde_json::to_string_pretty(data).map_err(|source| PreferencesError::Serialize {
        path: path.to_path_buf(),
        source,
    })
}

fn ensure_parent(path: &Path) -> Result<(), PreferencesError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(|source| PreferencesError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })
        }
        _ => Ok(()),
    }
}
