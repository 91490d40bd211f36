use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

pub const TORRENT_MIMETYPE: &str = "application/x-bittorrent";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub href: String,
    /// MIME type, when the feed declares one
    pub mime_type: Option<String>,
}

impl Link {
    pub fn new(href: impl Into<String>, mime_type: Option<&str>) -> Self {
        Self {
            href: href.into(),
            mime_type: mime_type.map(str::to_string),
        }
    }

    pub fn is_torrent(&self) -> bool {
        self.mime_type.as_deref() == Some(TORRENT_MIMETYPE)
    }
}

/// One item of a fetched feed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub title: String,
    /// primary link of the entry
    pub link: Option<String>,
    pub links: Vec<Link>,
    pub magnet_uri: Option<String>,
    pub published: Option<DateTime<FixedOffset>>,
}

impl Entry {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// First link typed as a torrent, falling back to the primary link.
    pub fn torrent_url(&self) -> Option<&str> {
        self.links
            .iter()
            .find(|link| link.is_torrent())
            .map(|link| &*link.href)
            .or(self.link.as_deref())
    }
}
