use std::path::{Path, PathBuf};

use serde_yaml::{Mapping, Value};
use torrentrss_types::{ConfigFile, EpisodeNumber};

use crate::error::ConfigError;

lazy_static::lazy_static! {
    pub static ref DEFAULT_CONFIG_PATH: PathBuf = {
        let path = std::env::var("TORRENTRSS_CONFIG").unwrap_or_default();
        if path.is_empty() {
            PathBuf::from("config.yml")
        } else {
            PathBuf::from(path)
        }
    };
}

pub const EXAMPLE_CONFIG: &str = r#"# where downloaded torrent files go, defaults to the system temp dir
default_directory: /tmp/torrentrss
# $PATH_OR_URL is replaced by the magnet uri, torrent url or file path.
# leave unset to open it with the default application
default_command: [transmission-remote, -a, $PATH_OR_URL]
# default_user_agent: torrentrss
timeout_secs: 30
feeds:
  nyaa:
    url: https://nyaa.si/?page=rss
    # try the magnet uri, then the torrent url, then download the file
    magnet_enabled: true
    torrent_url_enabled: false
    torrent_file_enabled: true
    # name downloaded files after their sha256 instead of the entry title
    hide_torrent_filename_enabled: true
    subscriptions:
      some show:
        # needs an `episode` group, `series` is optional
        pattern: '\[Group\] Some Show S(?P<series>\d+)E(?P<episode>\d+) \[1080p\]'
        # last seen number, updated after every run
        series_number: 1
        episode_number: 0
      another show:
        pattern: 'Another Show - (?P<episode>\d+)'
        directory: /tmp/torrentrss/another
        # in shell mode $PATH_OR_URL is passed to the shell already quoted
        command:
          arguments: [echo, $PATH_OR_URL, '>>', /tmp/torrentrss/log.txt]
          shell: true
"#;

/// Parsed config file. Keeps the raw document so that writing episode
/// numbers back leaves unknown keys alone.
#[derive(Debug)]
pub struct Config {
    path: PathBuf,
    raw: Value,
    pub file: ConfigFile,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;
        Self::parse(path, &raw)
    }

    pub fn parse(path: &Path, raw: &str) -> Result<Self, ConfigError> {
        let parse_error = |source: serde_yaml::Error| ConfigError::Parse {
            path: path.to_owned(),
            source,
        };
        let raw: Value = serde_yaml::from_str(raw).map_err(parse_error)?;
        let file: ConfigFile = serde_yaml::from_value(raw.clone()).map_err(parse_error)?;
        Ok(Self {
            path: path.to_owned(),
            raw,
            file,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sets `series_number`/`episode_number` of each (feed, subscription).
    /// Unknown numbers are left as they are in the file.
    pub fn update_episode_numbers<'a>(
        &mut self,
        numbers: impl IntoIterator<Item = (&'a str, &'a str, EpisodeNumber)>,
    ) {
        for (feed, subscription, number) in numbers {
            if let Some(config) = self
                .file
                .feeds
                .get_mut(feed)
                .and_then(|x| x.subscriptions.get_mut(subscription))
            {
                config.series_number = number.series.or(config.series_number);
                config.episode_number = number.episode.or(config.episode_number);
            }

            let Some(raw) = self
                .raw
                .get_mut("feeds")
                .and_then(|x| x.get_mut(feed))
                .and_then(|x| x.get_mut("subscriptions"))
                .and_then(|x| x.get_mut(subscription))
                .and_then(Value::as_mapping_mut)
            else {
                warn!(
                    "feed {:?} sub {:?} not found in config, not saving {}",
                    feed, subscription, number
                );
                continue;
            };
            set_number(raw, "series_number", number.series);
            set_number(raw, "episode_number", number.episode);
        }
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        let write_error = |source: std::io::Error| ConfigError::Write {
            path: self.path.clone(),
            source,
        };
        let raw = serde_yaml::to_string(&self.raw).map_err(|e| {
            write_error(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
        })?;
        std::fs::write(&self.path, raw).map_err(write_error)?;
        debug!("saved episode numbers to {}", self.path.display());
        Ok(())
    }
}

fn set_number(mapping: &mut Mapping, key: &str, number: Option<u32>) {
    if let Some(number) = number {
        mapping.insert(Value::from(key), Value::Number(number.into()));
    }
}
