//! Character catalog - The fixed cast a card can be drawn with

use serde::{Deserialize, Serialize};

/// A selectable character.
///
/// The set is closed; each identity carries the description fragment the
/// image prompt is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CharacterIdentity {
    #[default]
    Chiikawa,
    Hachiware,
    Usagi,
    Tanjiro,
    Nezuko,
    Zenitsu,
    Inosuke,
}

impl CharacterIdentity {
    pub const ALL: [CharacterIdentity; 7] = [
        CharacterIdentity::Chiikawa,
        CharacterIdentity::Hachiware,
        CharacterIdentity::Usagi,
        CharacterIdentity::Tanjiro,
        CharacterIdentity::Nezuko,
        CharacterIdentity::Zenitsu,
        CharacterIdentity::Inosuke,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            CharacterIdentity::Chiikawa => "Chiikawa",
            CharacterIdentity::Hachiware => "Hachiware",
            CharacterIdentity::Usagi => "Usagi",
            CharacterIdentity::Tanjiro => "Tanjiro",
            CharacterIdentity::Nezuko => "Nezuko",
            CharacterIdentity::Zenitsu => "Zenitsu",
            CharacterIdentity::Inosuke => "Inosuke",
        }
    }

    pub fn group(&self) -> CharacterGroup {
        match self {
            CharacterIdentity::Chiikawa | CharacterIdentity::Hachiware | CharacterIdentity::Usagi => {
                CharacterGroup::Chiikawa
            }
            CharacterIdentity::Tanjiro
            | CharacterIdentity::Nezuko
            | CharacterIdentity::Zenitsu
            | CharacterIdentity::Inosuke => CharacterGroup::DemonSlayer,
        }
    }

    /// Visual description used when prompting the image model
    pub fn description(&self) -> &'static str {
        match self {
            CharacterIdentity::Chiikawa => {
                "Chiikawa (a small, white, round, cute creature with bear-like ears, blushing cheeks), kawaii vector art style"
            }
            CharacterIdentity::Hachiware => {
                "Hachiware (a small, white and blue cat-like creature with blue tips on ears), kawaii vector art style"
            }
            CharacterIdentity::Usagi => {
                "Usagi (a small, yellow rabbit-like creature with long ears, energetic expression), kawaii vector art style"
            }
            CharacterIdentity::Tanjiro => {
                "Tanjiro Kamado from Demon Slayer (super cute Q-version chibi style, big eyes, wearing green and black checkered haori, scar on forehead, kind smile)"
            }
            CharacterIdentity::Nezuko => {
                "Nezuko Kamado from Demon Slayer (super cute Q-version chibi style, big eyes, pink kimono, bamboo muzzle, long black hair with orange tips)"
            }
            CharacterIdentity::Zenitsu => {
                "Zenitsu Agatsuma from Demon Slayer (super cute Q-version chibi style, big eyes, yellow hair, yellow haori with white triangles, crying or sleeping cute face)"
            }
            CharacterIdentity::Inosuke => {
                "Inosuke Hashibira from Demon Slayer (super cute Q-version chibi style, big eyes, wearing a grey boar mask, shirtless, tiny muscular body but very kawaii)"
            }
        }
    }
}

impl std::fmt::Display for CharacterIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for CharacterIdentity {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CharacterIdentity::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| anyhow::anyhow!("Unknown character: {}", s))
    }
}

/// The two rows of the character picker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CharacterGroup {
    Chiikawa,
    DemonSlayer,
}

impl CharacterGroup {
    pub const ALL: [CharacterGroup; 2] = [CharacterGroup::Chiikawa, CharacterGroup::DemonSlayer];

    pub fn label(&self) -> &'static str {
        match self {
            CharacterGroup::Chiikawa => "吉伊卡哇",
            CharacterGroup::DemonSlayer => "鬼灭之刃(Q版)",
        }
    }

    /// Members in picker order
    pub fn members(&self) -> Vec<CharacterIdentity> {
        CharacterIdentity::ALL
            .into_iter()
            .filter(|c| c.group() == *self)
            .collect()
    }
}
