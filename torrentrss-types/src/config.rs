use std::path::PathBuf;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    30
}

/// Top level of the config file.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    /// download directory for torrent files, defaults to the system temp dir
    pub default_directory: Option<PathBuf>,
    /// launcher used by subscriptions without their own `command`.
    /// if unset, files and urls are opened with the default application
    pub default_command: Option<CommandConfig>,
    /// user agent for feeds without their own `user_agent`
    pub default_user_agent: Option<String>,
    /// timeout for feed fetches and torrent downloads
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub feeds: IndexMap<String, FeedConfig>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FeedConfig {
    pub url: String,
    pub user_agent: Option<String>,
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// launch the entry's magnet uri if it has one
    #[serde(default = "default_true")]
    pub magnet_enabled: bool,
    /// launch the torrent url directly instead of downloading it
    #[serde(default = "default_true")]
    pub torrent_url_enabled: bool,
    /// download the torrent file and launch its path
    #[serde(default = "default_true")]
    pub torrent_file_enabled: bool,
    /// name downloaded files after the sha256 of their content instead of the entry title
    #[serde(default = "default_true")]
    pub hide_torrent_filename_enabled: bool,
    /// replace characters windows forbids in filenames even on other platforms
    #[serde(default)]
    pub sanitize_filenames: bool,
    /// overrides `ConfigFile::default_directory` for this feed's subscriptions
    pub directory: Option<PathBuf>,
    #[serde(default)]
    pub subscriptions: IndexMap<String, SubscriptionConfig>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SubscriptionConfig {
    /// must contain a `(?P<episode>...)` group, may contain `(?P<series>...)`
    pub pattern: String,
    pub series_number: Option<u32>,
    pub episode_number: Option<u32>,
    pub directory: Option<PathBuf>,
    pub command: Option<CommandConfig>,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

/// Either a bare argument list or arguments plus a shell flag.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CommandConfig {
    Arguments(Vec<String>),
    Detailed {
        arguments: Vec<String>,
        #[serde(default)]
        shell: bool,
    },
}

impl CommandConfig {
    pub fn arguments(&self) -> &[String] {
        match self {
            CommandConfig::Arguments(arguments) => arguments,
            CommandConfig::Detailed { arguments, .. } => arguments,
        }
    }

    pub fn shell(&self) -> bool {
        match self {
            CommandConfig::Arguments(_) => false,
            CommandConfig::Detailed { shell, .. } => *shell,
        }
    }
}
