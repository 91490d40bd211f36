use std::path::{Path, PathBuf};

use regex::Regex;
use torrentrss_types::{EpisodeNumber, SubscriptionConfig, EPISODE_GROUP};

use crate::{command::Command, error::ConfigError};

#[derive(Debug)]
pub struct Subscription {
    name: String,
    regex: Regex,
    pub number: EpisodeNumber,
    directory: PathBuf,
    /// `None` means the default command
    command: Option<Command>,
    enabled: bool,
}

impl Subscription {
    /// `directory` is used when the subscription does not set its own.
    pub fn new(
        feed: &str,
        name: &str,
        config: &SubscriptionConfig,
        directory: &Path,
    ) -> Result<Self, ConfigError> {
        let regex = Regex::new(&config.pattern).map_err(|source| ConfigError::InvalidPattern {
            feed: feed.to_string(),
            subscription: name.to_string(),
            pattern: config.pattern.clone(),
            source,
        })?;
        if !regex.capture_names().flatten().any(|x| x == EPISODE_GROUP) {
            return Err(ConfigError::MissingEpisodeGroup {
                feed: feed.to_string(),
                subscription: name.to_string(),
                pattern: config.pattern.clone(),
            });
        }
        let command = config
            .command
            .as_ref()
            .map(|command| Command::new(command.arguments().to_vec(), command.shell()))
            .transpose()?;

        Ok(Self {
            name: name.to_string(),
            regex,
            number: EpisodeNumber::new(config.series_number, config.episode_number),
            directory: config
                .directory
                .clone()
                .unwrap_or_else(|| directory.to_owned()),
            command,
            enabled: config.enabled,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn command(&self) -> Option<&Command> {
        self.command.as_ref()
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }
}
