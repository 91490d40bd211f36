use indexmap::IndexMap;
use torrentrss_types::{Entry, EpisodeNumber};

use crate::subscription::Subscription;

/// Numbers that advanced during a scan, by subscription name.
pub type Progress = IndexMap<String, EpisodeNumber>;

#[derive(Debug)]
pub struct ScanMatch<'a> {
    pub subscription: &'a Subscription,
    pub entry: Entry,
    pub number: EpisodeNumber,
}

/// Matches every entry against every subscription, oldest entry first.
///
/// A match is yielded only when its number is newer than the best number seen
/// for that subscription so far in this scan (starting from the baseline), so
/// each subscription's yields are strictly ascending even when the feed lists
/// entries out of order. Subscriptions themselves are not touched; see
/// [`MatchScan::into_progress`].
pub struct MatchScan<'a> {
    feed: &'a str,
    subscriptions: Vec<&'a Subscription>,
    /// oldest first
    entries: Vec<Entry>,
    entry_index: usize,
    subscription_index: usize,
    baseline: IndexMap<&'a str, EpisodeNumber>,
    running: IndexMap<&'a str, EpisodeNumber>,
}

impl<'a> MatchScan<'a> {
    /// `entries` in feed order, newest first.
    pub(super) fn new(
        feed: &'a str,
        subscriptions: impl IntoIterator<Item = &'a Subscription>,
        mut entries: Vec<Entry>,
    ) -> Self {
        entries.reverse();
        let subscriptions: Vec<&'a Subscription> = subscriptions.into_iter().collect();
        let baseline: IndexMap<&'a str, EpisodeNumber> = subscriptions
            .iter()
            .map(|sub| (sub.name(), sub.number))
            .collect();
        Self {
            feed,
            subscriptions,
            entries,
            entry_index: 0,
            subscription_index: 0,
            running: baseline.clone(),
            baseline,
        }
    }

    pub fn baseline(&self, subscription: &str) -> Option<EpisodeNumber> {
        self.baseline.get(subscription).copied()
    }

    /// Best number seen so far for `subscription`, the baseline if nothing matched.
    pub fn running(&self, subscription: &str) -> Option<EpisodeNumber> {
        self.running.get(subscription).copied()
    }

    /// Consumes the scan, returning the numbers that moved past their baseline.
    /// Entries not yet visited are not scanned.
    pub fn into_progress(self) -> Progress {
        self.running
            .into_iter()
            .filter(|(name, number)| self.baseline.get(name) != Some(number))
            .map(|(name, number)| (name.to_string(), number))
            .collect()
    }
}

impl<'a> Iterator for MatchScan<'a> {
    type Item = ScanMatch<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.entry_index < self.entries.len() {
            let entry = &self.entries[self.entry_index];
            // position in the feed as published, newest first
            let index = self.entries.len() - self.entry_index - 1;

            while self.subscription_index < self.subscriptions.len() {
                let sub = self.subscriptions[self.subscription_index];
                self.subscription_index += 1;

                let Some(captures) = sub.regex().captures(&entry.title) else {
                    debug!(
                        "NO MATCH: entry {} {:?} against sub {:?}",
                        index,
                        entry.title,
                        sub.name()
                    );
                    continue;
                };
                let number = match EpisodeNumber::from_captures(&captures) {
                    Ok(x) => x,
                    Err(e) => {
                        warn!(
                            "feed {:?}: entry {} {:?} matches sub {:?} but has no usable number: {}",
                            self.feed,
                            index,
                            entry.title,
                            sub.name(),
                            e
                        );
                        continue;
                    }
                };
                let running = self.running[sub.name()];
                if !number.newer_than(&running) {
                    debug!(
                        "NO MATCH: entry {} {:?} matches but number less than or equal to sub {:?}: {} <= {}",
                        index,
                        entry.title,
                        sub.name(),
                        number,
                        running
                    );
                    continue;
                }
                info!(
                    "MATCH: entry {} {:?} has greater number than sub {:?}: {} > {} (was {} at start of scan)",
                    index,
                    entry.title,
                    sub.name(),
                    number,
                    running,
                    self.baseline[sub.name()]
                );
                self.running.insert(sub.name(), number);
                return Some(ScanMatch {
                    subscription: sub,
                    entry: entry.clone(),
                    number,
                });
            }

            self.subscription_index = 0;
            self.entry_index += 1;
        }
        None
    }
}
