use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

use crate::{Error, Result};

/// Content category assigned to a news entry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NewsKind {
    Review,
    Guide,
    Opinion,
    Preview,
    Interview,
    Video,
    Deal,
    #[default]
    News,
    Feature,
    Other,
}

impl NewsKind {
    /// Kinds offered as filters, in menu order
    pub const FILTERABLE: [NewsKind; 9] = [
        NewsKind::Review,
        NewsKind::Preview,
        NewsKind::Guide,
        NewsKind::Opinion,
        NewsKind::Interview,
        NewsKind::Video,
        NewsKind::Deal,
        NewsKind::Feature,
        NewsKind::News,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Review => "review",
            Self::Guide => "guide",
            Self::Opinion => "opinion",
            Self::Preview => "preview",
            Self::Interview => "interview",
            Self::Video => "video",
            Self::Deal => "deal",
            Self::News => "news",
            Self::Feature => "feature",
            Self::Other => "other",
        }
    }

    /// Capitalized label for display
    pub fn label(&self) -> &'static str {
        match self {
            Self::Review => "Review",
            Self::Guide => "Guide",
            Self::Opinion => "Opinion",
            Self::Preview => "Preview",
            Self::Interview => "Interview",
            Self::Video => "Video",
            Self::Deal => "Deal",
            Self::News => "News",
            Self::Feature => "Feature",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for NewsKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NewsKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "review" => Ok(Self::Review),
            "guide" => Ok(Self::Guide),
            "opinion" => Ok(Self::Opinion),
            "preview" => Ok(Self::Preview),
            "interview" => Ok(Self::Interview),
            "video" => Ok(Self::Video),
            "deal" => Ok(Self::Deal),
            "news" => Ok(Self::News),
            "feature" => Ok(Self::Feature),
            "other" => Ok(Self::Other),
            other => Err(Error::Other(format!("Unknown news kind: {}", other))),
        }
    }
}

/// One normalized article from a feed's item/entry block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsEntry {
    /// Assigned on construction, never derived from content
    pub id: Uuid,
    pub title: String,
    pub source: String,
    pub link: Option<Url>,
    pub published: Option<DateTime<Utc>>,
    pub image: Option<Url>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub kind: NewsKind,
}

impl NewsEntry {
    pub fn new(title: impl Into<String>, source: impl Into<String>, kind: NewsKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            source: source.into(),
            link: None,
            published: None,
            image: None,
            tags: Vec::new(),
            kind,
        }
    }

    pub fn with_link(mut self, link: Option<Url>) -> Self {
        self.link = link;
        self
    }

    pub fn with_published(mut self, published: Option<DateTime<Utc>>) -> Self {
        self.published = published;
        self
    }

    pub fn with_image(mut self, image: Option<Url>) -> Self {
        self.image = image;
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    /// Whether the lowercased title contains any of the given lowercase keywords
    pub fn title_matches_any(&self, keywords: &[String]) -> bool {
        let title = self.title.to_lowercase();
        keywords.iter().any(|k| title.contains(k.as_str()))
    }
}
