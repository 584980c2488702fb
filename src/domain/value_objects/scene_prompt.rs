//! Scene descriptions and their quick-fill presets

use serde::{Deserialize, Serialize};

/// Free-text setting for the illustration.
///
/// The raw text is kept as typed so the input field can echo it back;
/// [`ScenePrompt::is_blank`] decides whether it can drive a generation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScenePrompt(String);

impl ScenePrompt {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl std::fmt::Display for ScenePrompt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<ScenePreset> for ScenePrompt {
    fn from(preset: ScenePreset) -> Self {
        Self::new(preset.text())
    }
}

/// Fixed scene presets offered next to the scene field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScenePreset {
    Concert,
    Camping,
    Space,
    School,
    Beach,
}

impl ScenePreset {
    pub const ALL: [ScenePreset; 5] = [
        ScenePreset::Concert,
        ScenePreset::Camping,
        ScenePreset::Space,
        ScenePreset::School,
        ScenePreset::Beach,
    ];

    /// Scene text the preset fills in
    pub fn text(&self) -> &'static str {
        match self {
            ScenePreset::Concert => "演唱会",
            ScenePreset::Camping => "露营",
            ScenePreset::Space => "太空",
            ScenePreset::School => "学校",
            ScenePreset::Beach => "海滩",
        }
    }
}

impl std::fmt::Display for ScenePreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScenePreset::Concert => write!(f, "Concert"),
            ScenePreset::Camping => write!(f, "Camping"),
            ScenePreset::Space => write!(f, "Space"),
            ScenePreset::School => write!(f, "School"),
            ScenePreset::Beach => write!(f, "Beach"),
        }
    }
}

impl std::str::FromStr for ScenePreset {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ScenePreset::ALL
            .into_iter()
            .find(|preset| preset.to_string().eq_ignore_ascii_case(s))
            .ok_or_else(|| anyhow::anyhow!("Invalid scene preset: {}", s))
    }
}
