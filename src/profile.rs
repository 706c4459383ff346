//! Attribute profiles
//!
//! A profile is the exact attribute schema a trimmed dataset must have.
//! Presets are selected by name (`heavy`) or, for compatibility with the old
//! numeric trim levels, by index (`1`).
//!
//! | index | name          | attributes                                               |
//! |-------|---------------|----------------------------------------------------------|
//! | 0     | `minimal`     | `abv`                                                    |
//! | 1     | `heavy`       | `abv`, `ibu`                                             |
//! | 2     | `descriptive` | `abv`, `ibu`, `isOrganic`, `available_name`, `glass_name`|
//! | 3     | `ingredients` | `abv`, `ibu`, `ingredients`                              |

use crate::record::INGREDIENTS_KEY;
use crate::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Named attribute profile presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Preset {
    /// Alcohol content only
    Minimal,
    /// Alcohol content and bitterness
    Heavy,
    /// Strength plus availability, glassware and organic flag
    Descriptive,
    /// Strength plus boolean flags for the most common ingredients
    Ingredients,
}

impl Preset {
    /// Every preset, in index order.
    pub const ALL: [Self; 4] = [
        Self::Minimal,
        Self::Heavy,
        Self::Descriptive,
        Self::Ingredients,
    ];

    /// Select a preset by its numeric trim level.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if `index` is out of range.
    pub fn from_index(index: usize) -> Result<Self> {
        Self::ALL.get(index).copied().ok_or_else(|| {
            Error::Configuration(format!(
                "Unknown profile index {index} (valid: 0..={})",
                Self::ALL.len() - 1
            ))
        })
    }

    /// Numeric trim level of the preset.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Profile name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Minimal => "minimal",
            Self::Heavy => "heavy",
            Self::Descriptive => "descriptive",
            Self::Ingredients => "ingredients",
        }
    }

    /// Attribute names required by the preset.
    #[must_use]
    pub const fn attributes(self) -> &'static [&'static str] {
        match self {
            Self::Minimal => &["abv"],
            Self::Heavy => &["abv", "ibu"],
            Self::Descriptive => &["abv", "ibu", "isOrganic", "available_name", "glass_name"],
            Self::Ingredients => &["abv", "ibu", INGREDIENTS_KEY],
        }
    }

    /// Materialize the preset as a profile value.
    #[must_use]
    pub fn profile(self) -> AttributeProfile {
        AttributeProfile {
            name: self.name().to_string(),
            attributes: self.attributes().iter().map(|s| (*s).to_string()).collect(),
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = Error;

    /// Accepts a preset name (case-insensitive) or its index.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Ok(index) = s.parse::<usize>() {
            return Self::from_index(index);
        }
        Self::ALL
            .into_iter()
            .find(|preset| preset.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                let names: Vec<_> = Self::ALL.iter().map(|p| p.name()).collect();
                Error::Configuration(format!(
                    "Unknown profile '{s}' (valid: {})",
                    names.join(", ")
                ))
            })
    }
}

/// A named, fixed list of attribute names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeProfile {
    name: String,
    attributes: Vec<String>,
}

impl AttributeProfile {
    /// Build a custom profile.
    ///
    /// Duplicate attribute names are collapsed, keeping the first occurrence.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if `attributes` is empty: a profile
    /// without attributes would keep every record and strip all features.
    pub fn new<S: Into<String>>(
        name: impl Into<String>,
        attributes: impl IntoIterator<Item = S>,
    ) -> Result<Self> {
        let name = name.into();
        let mut unique: Vec<String> = Vec::new();
        for attribute in attributes {
            let attribute = attribute.into();
            if !unique.contains(&attribute) {
                unique.push(attribute);
            }
        }
        if unique.is_empty() {
            return Err(Error::Configuration(format!(
                "Profile '{name}' has no attributes"
            )));
        }
        Ok(Self {
            name,
            attributes: unique,
        })
    }

    /// Profile name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Required attribute names, in declaration order.
    #[must_use]
    pub fn attributes(&self) -> &[String] {
        &self.attributes
    }

    /// Whether the profile asks for ingredient expansion.
    #[must_use]
    pub fn wants_ingredients(&self) -> bool {
        self.attributes.iter().any(|a| a == INGREDIENTS_KEY)
    }

    /// Scalar attributes, i.e. everything except the ingredients group.
    pub fn scalar_attributes(&self) -> impl Iterator<Item = &str> {
        self.attributes
            .iter()
            .map(String::as_str)
            .filter(|a| *a != INGREDIENTS_KEY)
    }
}

impl From<Preset> for AttributeProfile {
    fn from(preset: Preset) -> Self {
        preset.profile()
    }
}

impl FromStr for AttributeProfile {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        s.parse::<Preset>().map(Preset::profile)
    }
}

impl fmt::Display for AttributeProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.name, self.attributes.join(", "))
    }
}
