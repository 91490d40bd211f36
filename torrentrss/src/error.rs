use std::{io, path::PathBuf};

use thiserror::Error;

/// Invalid configuration. Raised while loading, never during a check.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config {path:?}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("failed to write config {path:?}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("feed {feed:?} sub {subscription:?} pattern {pattern:?} is not a valid regex")]
    InvalidPattern {
        feed: String,
        subscription: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("feed {feed:?} sub {subscription:?} pattern {pattern:?} has no group for the episode number")]
    MissingEpisodeGroup {
        feed: String,
        subscription: String,
        pattern: String,
    },
    #[error("feed {feed:?} has magnet, torrent url and torrent file acquisition all disabled")]
    NoAcquisitionMode { feed: String },
    #[error("command has no arguments")]
    EmptyCommand,
    #[error("feed {feed:?}: failed to build http client")]
    HttpClient {
        feed: String,
        #[source]
        source: reqwest::Error,
    },
}

#[derive(Debug, Error)]
#[error("body is neither RSS ({rss}) nor Atom ({atom})")]
pub struct ParseError {
    pub rss: rss::Error,
    pub atom: atom_syndication::Error,
}

/// Failure while fetching a feed or acquiring one of its entries.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("feed {feed:?}: error sending request to {url:?}")]
    Request {
        feed: String,
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("feed {feed:?}: {url:?} returned {status}")]
    Status {
        feed: String,
        url: String,
        status: reqwest::StatusCode,
    },
    #[error("feed {feed:?}: error parsing url {url:?}")]
    Parse {
        feed: String,
        url: String,
        #[source]
        source: ParseError,
    },
    #[error("feed {feed:?}: entry {title:?} has no link")]
    MissingLink { feed: String, title: String },
    #[error("feed {feed:?}: no acquisition method available for entry {title:?}")]
    NoAcquisitionMethod { feed: String, title: String },
    #[error("feed {feed:?}: failed to write {url:?} to {path:?}")]
    Write {
        feed: String,
        url: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("failed to launch subprocess with arguments {arguments:?}")]
    Spawn {
        arguments: Vec<String>,
        #[source]
        source: io::Error,
    },
    #[error("failed to open {target:?} with the default application")]
    Open {
        target: String,
        #[source]
        source: io::Error,
    },
}

/// Kind reported for errors of no specific type, or a mix of types.
pub const GENERIC_ERROR_KIND: &str = "Error";

impl ConfigError {
    pub const KIND: &'static str = "ConfigError";
}

impl FeedError {
    pub const KIND: &'static str = "FeedError";
}

impl LaunchError {
    pub const KIND: &'static str = "LaunchError";
}

/// Short name of the error kind, for user-facing notifications.
pub fn error_kind(error: &anyhow::Error) -> &'static str {
    if error.is::<ConfigError>() {
        ConfigError::KIND
    } else if error.is::<FeedError>() {
        FeedError::KIND
    } else if error.is::<LaunchError>() {
        LaunchError::KIND
    } else {
        GENERIC_ERROR_KIND
    }
}
