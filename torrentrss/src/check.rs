use std::time::Duration;

use anyhow::Result;
use futures::future::join_all;
use indexmap::IndexMap;
use torrentrss_types::{ConfigFile, EpisodeNumber};

use crate::{
    command::{Command, Opener},
    error::{FeedError, LaunchError, GENERIC_ERROR_KIND},
    feed::{Feed, FeedDefaults},
};

/// Outcome of one pass over every feed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CheckSummary {
    pub matches: usize,
    pub failures: usize,
    /// error kind shared by every failure, `Error` when they differ
    pub failure_kind: Option<&'static str>,
}

impl CheckSummary {
    fn record_failure(&mut self, kind: &'static str) {
        self.failures += 1;
        self.failure_kind = Some(merge_kind(self.failure_kind, kind));
    }

    fn add(&mut self, other: CheckSummary) {
        self.matches += other.matches;
        self.failures += other.failures;
        if let Some(kind) = other.failure_kind {
            self.failure_kind = Some(merge_kind(self.failure_kind, kind));
        }
    }
}

fn merge_kind(current: Option<&'static str>, kind: &'static str) -> &'static str {
    match current {
        Some(current) if current != kind => GENERIC_ERROR_KIND,
        _ => kind,
    }
}

pub struct Checker {
    feeds: IndexMap<String, Feed>,
    default_command: Command,
    opener: Box<dyn Opener>,
}

impl Checker {
    pub fn new(config: &ConfigFile, opener: Box<dyn Opener>) -> Result<Self> {
        let directory = config
            .default_directory
            .clone()
            .unwrap_or_else(std::env::temp_dir);
        let defaults = FeedDefaults {
            directory: &directory,
            user_agent: config.default_user_agent.as_deref(),
            timeout: Duration::from_secs(config.timeout_secs),
        };
        let mut feeds = IndexMap::new();
        for (name, feed) in &config.feeds {
            feeds.insert(name.clone(), Feed::new(name, feed, defaults)?);
        }
        Ok(Self {
            feeds,
            default_command: Command::from_config(config.default_command.as_ref())?,
            opener,
        })
    }

    pub fn feeds(&self) -> &IndexMap<String, Feed> {
        &self.feeds
    }

    /// Checks every enabled feed concurrently. With `dry_run` matches are only
    /// logged, nothing is downloaded or launched.
    pub async fn check_feeds(&mut self, dry_run: bool) -> CheckSummary {
        let default_command = &self.default_command;
        let opener = &*self.opener;
        let checks = self
            .feeds
            .values_mut()
            .filter(|feed| {
                if !feed.enabled() {
                    debug!("feed {:?}: disabled, skipping", feed.name());
                }
                feed.enabled()
            })
            .map(|feed| check_feed(feed, default_command, opener, dry_run));

        let mut summary = CheckSummary::default();
        for feed_summary in join_all(checks).await {
            summary.add(feed_summary);
        }
        info!(
            "checked {} feeds: {} matches, {} failures",
            self.feeds.len(),
            summary.matches,
            summary.failures
        );
        summary
    }

    /// Current number of every subscription, as (feed, subscription, number).
    pub fn episode_numbers(&self) -> impl Iterator<Item = (&str, &str, EpisodeNumber)> + '_ {
        self.feeds.values().flat_map(|feed| {
            feed.subscriptions()
                .values()
                .map(move |sub| (feed.name(), sub.name(), sub.number))
        })
    }
}

async fn check_feed(
    feed: &mut Feed,
    default_command: &Command,
    opener: &dyn Opener,
    dry_run: bool,
) -> CheckSummary {
    let mut summary = CheckSummary::default();
    let progress = {
        let mut scan = match feed.matching_subs().await {
            Ok(x) => x,
            Err(e) => {
                error!("failed to check feed {:?}: {:?}", feed.name(), e);
                summary.record_failure(FeedError::KIND);
                return summary;
            }
        };
        for found in scan.by_ref() {
            summary.matches += 1;
            if dry_run {
                info!(
                    "dry run: not acquiring {:?} for sub {:?}",
                    found.entry.title,
                    found.subscription.name()
                );
                continue;
            }
            let directory = found.subscription.directory();
            let acquisition = match feed.resolve_acquisition(&found.entry, directory).await {
                Ok(x) => x,
                Err(e) => {
                    error!("failed to acquire {:?}: {:?}", found.entry.title, e);
                    summary.record_failure(FeedError::KIND);
                    continue;
                }
            };
            let command = found.subscription.command().unwrap_or(default_command);
            if let Err(e) = command.launch(opener, &acquisition.target()) {
                error!("failed to launch {:?}: {:?}", found.entry.title, e);
                summary.record_failure(LaunchError::KIND);
            }
        }
        scan.into_progress()
    };
    feed.apply_progress(progress);
    summary
}
