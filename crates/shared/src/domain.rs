use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

id_newtype!(BoardId);
id_newtype!(ViewToken);
id_newtype!(CommentId);

/// Short human-enterable code. Always stored upper-cased so lookups are
/// case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct JoinCode(String);

impl JoinCode {
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(raw.as_ref().trim().to_ascii_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for JoinCode {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<JoinCode> for String {
    fn from(value: JoinCode) -> Self {
        value.0
    }
}

impl fmt::Display for JoinCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommentColor(pub String);

impl CommentColor {
    pub const FALLBACK: &'static str = "#FFD700";

    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Colors are compared case-insensitively; `#00ff88` and `#00FF88` match.
    pub fn matches(&self, other: &CommentColor) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl Default for CommentColor {
    fn default() -> Self {
        Self(Self::FALLBACK.to_string())
    }
}

impl fmt::Display for CommentColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Aesthetic {
    #[default]
    Professional,
    DarkAcademia,
    CottageCore,
    TechNeon,
    Retro90s,
}

impl Aesthetic {
    pub const ALL: [Aesthetic; 5] = [
        Aesthetic::Professional,
        Aesthetic::DarkAcademia,
        Aesthetic::CottageCore,
        Aesthetic::TechNeon,
        Aesthetic::Retro90s,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Aesthetic::Professional => "professional",
            Aesthetic::DarkAcademia => "dark-academia",
            Aesthetic::CottageCore => "cottage-core",
            Aesthetic::TechNeon => "tech-neon",
            Aesthetic::Retro90s => "retro-90s",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Aesthetic::Professional => "Professional Minimalist",
            Aesthetic::DarkAcademia => "Dark Academia",
            Aesthetic::CottageCore => "Cottage Core",
            Aesthetic::TechNeon => "Tech Neon",
            Aesthetic::Retro90s => "90s Retro",
        }
    }

    pub fn tagline(self) -> &'static str {
        match self {
            Aesthetic::Professional => "Clean, crisp, corporate chic",
            Aesthetic::DarkAcademia => "Moody, scholarly vibes",
            Aesthetic::CottageCore => "Soft, dreamy, pastoral",
            Aesthetic::TechNeon => "Cyberpunk energy",
            Aesthetic::Retro90s => "Totally radical throwback",
        }
    }

    /// Lenient decoding for values coming back from the store: unknown keys
    /// fall back to [`Aesthetic::Professional`].
    pub fn from_key_lossy(key: &str) -> Self {
        key.parse().unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown aesthetic '{0}'")]
pub struct UnknownAesthetic(pub String);

impl FromStr for Aesthetic {
    type Err = UnknownAesthetic;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        Aesthetic::ALL
            .into_iter()
            .find(|aesthetic| aesthetic.key().eq_ignore_ascii_case(value))
            .ok_or_else(|| UnknownAesthetic(value.to_string()))
    }
}

impl From<String> for Aesthetic {
    fn from(value: String) -> Self {
        Aesthetic::from_key_lossy(&value)
    }
}

impl From<Aesthetic> for String {
    fn from(value: Aesthetic) -> Self {
        value.key().to_string()
    }
}

impl fmt::Display for Aesthetic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Creator,
    Contributor,
    Viewer,
}

impl Role {
    pub fn can_contribute(self) -> bool {
        matches!(self, Role::Creator | Role::Contributor)
    }
}
