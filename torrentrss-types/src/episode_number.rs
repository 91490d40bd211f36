use std::{fmt, num::ParseIntError};

use regex::Captures;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Name of the capture group every subscription pattern must contain.
pub const EPISODE_GROUP: &str = "episode";
/// Name of the optional capture group holding the series number.
pub const SERIES_GROUP: &str = "series";

#[derive(Debug, Error)]
pub enum PatternError {
    #[error("pattern did not capture an `episode` group")]
    MissingEpisode,
    #[error("captured `{group}` value {value:?} is not a number")]
    NotANumber {
        group: &'static str,
        value: String,
        #[source]
        source: ParseIntError,
    },
}

/// Progression marker for a subscription.
///
/// Not a total order: series numbers are only compared when both sides know
/// theirs, so the type exposes [`EpisodeNumber::newer_than`] instead of
/// `PartialOrd`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EpisodeNumber {
    #[serde(rename = "series_number", default, skip_serializing_if = "Option::is_none")]
    pub series: Option<u32>,
    #[serde(rename = "episode_number", default, skip_serializing_if = "Option::is_none")]
    pub episode: Option<u32>,
}

impl EpisodeNumber {
    pub const fn new(series: Option<u32>, episode: Option<u32>) -> Self {
        Self { series, episode }
    }

    pub fn from_captures(captures: &Captures<'_>) -> Result<Self, PatternError> {
        let episode = captures
            .name(EPISODE_GROUP)
            .ok_or(PatternError::MissingEpisode)?;
        let series = match captures.name(SERIES_GROUP) {
            Some(series) => Some(parse_group(SERIES_GROUP, series.as_str())?),
            None => None,
        };
        Ok(Self {
            series,
            episode: Some(parse_group(EPISODE_GROUP, episode.as_str())?),
        })
    }

    /// A number without an episode is never newer than anything, and any number
    /// with an episode is newer than one without.
    pub fn newer_than(&self, other: &EpisodeNumber) -> bool {
        let Some(episode) = self.episode else {
            return false;
        };
        let Some(other_episode) = other.episode else {
            return true;
        };
        match (self.series, other.series) {
            (Some(series), Some(other_series)) if series != other_series => series > other_series,
            _ => episode > other_episode,
        }
    }
}

fn parse_group(group: &'static str, value: &str) -> Result<u32, PatternError> {
    value
        .trim()
        .parse()
        .map_err(|source| PatternError::NotANumber {
            group,
            value: value.to_string(),
            source,
        })
}

impl fmt::Display for EpisodeNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.series, self.episode) {
            (Some(series), Some(episode)) => write!(f, "S{:02}E{:02}", series, episode),
            (None, Some(episode)) => write!(f, "E{:02}", episode),
            (Some(series), None) => write!(f, "S{:02}", series),
            (None, None) => write!(f, "none"),
        }
    }
}
