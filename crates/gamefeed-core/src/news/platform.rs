use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Platform presets for the title keyword filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformFilter {
    #[default]
    All,
    PlayStation,
    Xbox,
    Nintendo,
    Pc,
    Mobile,
}

impl PlatformFilter {
    pub const ALL: [PlatformFilter; 6] = [
        PlatformFilter::All,
        PlatformFilter::PlayStation,
        PlatformFilter::Xbox,
        PlatformFilter::Nintendo,
        PlatformFilter::Pc,
        PlatformFilter::Mobile,
    ];

    /// Lowercase title keywords; empty means no filtering
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            Self::All => &[],
            Self::PlayStation => &["ps5", "playstation"],
            Self::Xbox => &["xbox", "series x", "series s"],
            Self::Nintendo => &["switch", "nintendo"],
            Self::Pc => &["pc", "steam"],
            Self::Mobile => &["iphone", "android", "mobile"],
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::All => "All",
            Self::PlayStation => "PlayStation",
            Self::Xbox => "Xbox",
            Self::Nintendo => "Nintendo",
            Self::Pc => "PC",
            Self::Mobile => "Mobile",
        }
    }
}

impl fmt::Display for PlatformFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PlatformFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" | "" => Ok(Self::All),
            "playstation" | "ps" => Ok(Self::PlayStation),
            "xbox" => Ok(Self::Xbox),
            "nintendo" | "switch" => Ok(Self::Nintendo),
            "pc" => Ok(Self::Pc),
            "mobile" => Ok(Self::Mobile),
            other => Err(Error::Other(format!("Unknown platform filter: {}", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords() {
        assert!(PlatformFilter::All.keywords().is_empty());
        assert_eq!(PlatformFilter::Xbox.keywords(), &["xbox", "series x", "series s"]);
        assert_eq!(PlatformFilter::Pc.keywords(), &["pc", "steam"]);
    }

    #[test]
    fn test_parse() {
        assert_eq!("PlayStation".parse::<PlatformFilter>().unwrap(), PlatformFilter::PlayStation);
        assert_eq!(" PC ".parse::<PlatformFilter>().unwrap(), PlatformFilter::Pc);
        assert!("dreamcast".parse::<PlatformFilter>().is_err());
    }

    #[test]
    fn test_serde_names_round_trip() {
        for platform in PlatformFilter::ALL {
            let json = serde_json::to_string(&platform).unwrap();
            let back: PlatformFilter = serde_json::from_str(&json).unwrap();
            assert_eq!(back, platform);
        }
        assert_eq!(serde_json::to_string(&PlatformFilter::PlayStation).unwrap(), "\"playstation\"");
    }
}
