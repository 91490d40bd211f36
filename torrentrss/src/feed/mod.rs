use std::{path::Path, time::Duration};

use indexmap::IndexMap;
use torrentrss_types::{Entry, FeedConfig};

use crate::{error::ConfigError, error::FeedError, subscription::Subscription};

mod acquire;
mod parse;
mod scan;

pub use acquire::Acquisition;
use parse::parse_entries;
pub use scan::{MatchScan, Progress, ScanMatch};

/// Which acquisition methods a feed may use, in priority order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AcquisitionModes {
    pub magnet: bool,
    pub torrent_url: bool,
    pub torrent_file: bool,
    pub hide_filename: bool,
    pub sanitize_filenames: bool,
}

/// Global values a feed falls back to.
#[derive(Clone, Copy, Debug)]
pub struct FeedDefaults<'a> {
    pub directory: &'a Path,
    pub user_agent: Option<&'a str>,
    pub timeout: Duration,
}

#[derive(Debug)]
pub struct Feed {
    name: String,
    url: String,
    user_agent: Option<String>,
    enabled: bool,
    acquisition: AcquisitionModes,
    subscriptions: IndexMap<String, Subscription>,
    client: reqwest::Client,
}

impl Feed {
    pub fn new(name: &str, config: &FeedConfig, defaults: FeedDefaults<'_>) -> Result<Self, ConfigError> {
        let acquisition = AcquisitionModes {
            magnet: config.magnet_enabled,
            torrent_url: config.torrent_url_enabled,
            torrent_file: config.torrent_file_enabled,
            hide_filename: config.hide_torrent_filename_enabled,
            sanitize_filenames: config.sanitize_filenames || cfg!(windows),
        };
        if !acquisition.magnet && !acquisition.torrent_url && !acquisition.torrent_file {
            return Err(ConfigError::NoAcquisitionMode {
                feed: name.to_string(),
            });
        }

        let directory = config.directory.as_deref().unwrap_or(defaults.directory);
        let mut subscriptions = IndexMap::new();
        for (sub_name, sub) in &config.subscriptions {
            subscriptions.insert(
                sub_name.clone(),
                Subscription::new(name, sub_name, sub, directory)?,
            );
        }

        let user_agent = config
            .user_agent
            .clone()
            .or_else(|| defaults.user_agent.map(str::to_string));
        let mut client = reqwest::Client::builder().timeout(defaults.timeout);
        if let Some(user_agent) = &user_agent {
            client = client.user_agent(user_agent);
        }
        let client = client.build().map_err(|source| ConfigError::HttpClient {
            feed: name.to_string(),
            source,
        })?;

        Ok(Self {
            name: name.to_string(),
            url: config.url.clone(),
            user_agent,
            enabled: config.enabled,
            acquisition,
            subscriptions,
            client,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn user_agent(&self) -> Option<&str> {
        self.user_agent.as_deref()
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn acquisition(&self) -> AcquisitionModes {
        self.acquisition
    }

    pub fn subscriptions(&self) -> &IndexMap<String, Subscription> {
        &self.subscriptions
    }

    /// Downloads and parses the feed. Entries are newest first.
    pub async fn fetch(&self) -> Result<Vec<Entry>, FeedError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|source| FeedError::Request {
                feed: self.name.clone(),
                url: self.url.clone(),
                source,
            })?;
        if !response.status().is_success() {
            return Err(FeedError::Status {
                feed: self.name.clone(),
                url: self.url.clone(),
                status: response.status(),
            });
        }
        let body = response.bytes().await.map_err(|source| FeedError::Request {
            feed: self.name.clone(),
            url: self.url.clone(),
            source,
        })?;
        let entries = parse_entries(&body).map_err(|source| FeedError::Parse {
            feed: self.name.clone(),
            url: self.url.clone(),
            source,
        })?;

        info!("feed {:?}: downloaded url {:?}", self.name, self.url);
        Ok(entries)
    }

    /// Fetches the feed and scans it. A feed without enabled subscriptions is
    /// not fetched at all.
    pub async fn matching_subs(&self) -> Result<MatchScan<'_>, FeedError> {
        if !self.subscriptions.values().any(Subscription::enabled) {
            debug!("feed {:?}: no enabled subscriptions", self.name);
            return Ok(self.scan(vec![]));
        }
        let entries = self.fetch().await?;
        Ok(self.scan(entries))
    }

    /// Scans already fetched `entries`, newest first, against the enabled
    /// subscriptions.
    pub fn scan(&self, entries: Vec<Entry>) -> MatchScan<'_> {
        MatchScan::new(
            &self.name,
            self.subscriptions.values().filter(|x| x.enabled()),
            entries,
        )
    }

    /// Stores the numbers a finished scan advanced to.
    pub fn apply_progress(&mut self, progress: Progress) {
        for (name, number) in progress {
            if let Some(sub) = self.subscriptions.get_mut(&name) {
                sub.number = number;
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::path::PathBuf;

    use indexmap::indexmap;
    use torrentrss_types::{EpisodeNumber, Link, SubscriptionConfig, TORRENT_MIMETYPE};
    use wiremock::{
        matchers::{header, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    use super::*;

    pub(crate) fn feed_config(url: &str) -> FeedConfig {
        FeedConfig {
            url: url.to_string(),
            user_agent: None,
            enabled: true,
            magnet_enabled: true,
            torrent_url_enabled: true,
            torrent_file_enabled: true,
            hide_torrent_filename_enabled: true,
            sanitize_filenames: false,
            directory: None,
            subscriptions: IndexMap::new(),
        }
    }

    pub(crate) fn sub_config(pattern: &str, series: Option<u32>, episode: Option<u32>) -> SubscriptionConfig {
        SubscriptionConfig {
            pattern: pattern.to_string(),
            series_number: series,
            episode_number: episode,
            directory: None,
            command: None,
            enabled: true,
        }
    }

    pub(crate) fn defaults(directory: &Path) -> FeedDefaults<'_> {
        FeedDefaults {
            directory,
            user_agent: None,
            timeout: Duration::from_secs(5),
        }
    }

    /// RSS body with one item per title, in the given (newest first) order.
    pub(crate) fn rss_body(titles: &[&str]) -> String {
        rss_body_at("https://test.rss", titles)
    }

    /// Like [`rss_body`], with item `i` linking to `{base}/{i}` and
    /// `{base}/{i}.torrent`.
    pub(crate) fn rss_body_at(base: &str, titles: &[&str]) -> String {
        let items: String = titles
            .iter()
            .enumerate()
            .map(|(i, title)| {
                format!(
                    "<item><title>{title}</title><link>{base}/{i}</link>\
                     <enclosure url=\"{base}/{i}.torrent\" length=\"1\" type=\"{TORRENT_MIMETYPE}\"/></item>"
                )
            })
            .collect();
        format!(
            "<?xml version=\"1.0\"?><rss version=\"2.0\"><channel><title>t</title>\
             <link>https://test.rss/</link><description>d</description>{items}</channel></rss>"
        )
    }

    fn entry(title: &str) -> Entry {
        Entry::new(title)
    }

    fn show_feed(baseline: EpisodeNumber) -> Feed {
        let mut config = feed_config("https://test.rss/feed");
        config.subscriptions = indexmap! {
            "S".to_string() => sub_config(
                r"Show S(?P<series>\d+)E(?P<episode>\d+)",
                baseline.series,
                baseline.episode,
            ),
        };
        Feed::new("F", &config, defaults(Path::new("/tmp"))).unwrap()
    }

    #[test]
    fn test_properties() {
        let mut config = feed_config("https://test.rss/テスト");
        config.subscriptions = indexmap! {
            "テスト sub 1".to_string() => sub_config(r"sub 1 ep (?P<episode>\d+)", None, None),
            "テスト sub 2".to_string() => sub_config(r"sub 2 ep (?P<episode>\d+)", None, Some(1)),
        };
        let feed = Feed::new("テスト feed", &config, defaults(Path::new("/tmp"))).unwrap();
        assert_eq!(feed.name(), "テスト feed");
        assert_eq!(feed.url(), "https://test.rss/テスト");
        assert!(feed.user_agent().is_none());
        assert!(feed.enabled());
        assert!(feed.acquisition().magnet);
        assert!(feed.acquisition().torrent_url);
        assert!(feed.acquisition().torrent_file);
        assert!(feed.acquisition().hide_filename);
        assert!(feed.subscriptions().contains_key("テスト sub 1"));
        assert_eq!(
            feed.subscriptions()["テスト sub 2"].number,
            EpisodeNumber::new(None, Some(1))
        );
        assert_eq!(
            feed.subscriptions()["テスト sub 1"].directory(),
            Path::new("/tmp")
        );
    }

    #[test]
    fn test_directory_and_user_agent_fallbacks() {
        let mut config = feed_config("https://test.rss/");
        config.directory = Some(PathBuf::from("/feed/dir"));
        config.subscriptions = indexmap! {
            "sub".to_string() => sub_config(r"(?P<episode>\d+)", None, None),
        };
        let feed = Feed::new(
            "feed",
            &config,
            FeedDefaults {
                user_agent: Some("default agent"),
                ..defaults(Path::new("/tmp"))
            },
        )
        .unwrap();
        assert_eq!(feed.user_agent(), Some("default agent"));
        assert_eq!(feed.subscriptions()["sub"].directory(), Path::new("/feed/dir"));

        config.user_agent = Some("feed agent".to_string());
        let feed = Feed::new("feed", &config, defaults(Path::new("/tmp"))).unwrap();
        assert_eq!(feed.user_agent(), Some("feed agent"));
    }

    #[test]
    fn test_no_acquisition_mode() {
        let mut config = feed_config("https://test.rss/");
        config.magnet_enabled = false;
        config.torrent_url_enabled = false;
        config.torrent_file_enabled = false;
        assert!(matches!(
            Feed::new("feed", &config, defaults(Path::new("/tmp"))),
            Err(ConfigError::NoAcquisitionMode { .. })
        ));
    }

    #[test]
    fn test_invalid_subscription_fails_feed() {
        let mut config = feed_config("https://test.rss/");
        config.subscriptions = indexmap! {
            "sub".to_string() => sub_config("no group", None, None),
        };
        assert!(matches!(
            Feed::new("feed", &config, defaults(Path::new("/tmp"))),
            Err(ConfigError::MissingEpisodeGroup { .. })
        ));
    }

    #[test]
    fn test_scan_ascending_order() {
        let mut feed = show_feed(EpisodeNumber::new(Some(1), Some(1)));
        let mut scan = feed.scan(vec![entry("Show S01E03"), entry("Show S01E02")]);
        let matches: Vec<_> = scan
            .by_ref()
            .map(|x| (x.subscription.name().to_string(), x.entry.title, x.number))
            .collect();
        assert_eq!(
            matches,
            [
                ("S".to_string(), "Show S01E02".to_string(), EpisodeNumber::new(Some(1), Some(2))),
                ("S".to_string(), "Show S01E03".to_string(), EpisodeNumber::new(Some(1), Some(3))),
            ]
        );
        assert_eq!(scan.baseline("S"), Some(EpisodeNumber::new(Some(1), Some(1))));
        assert_eq!(scan.running("S"), Some(EpisodeNumber::new(Some(1), Some(3))));

        let progress = scan.into_progress();
        feed.apply_progress(progress);
        assert_eq!(
            feed.subscriptions()["S"].number,
            EpisodeNumber::new(Some(1), Some(3))
        );
    }

    #[test]
    fn test_scan_out_of_order_entries() {
        let mut feed = show_feed(EpisodeNumber::new(Some(1), Some(1)));
        let titles = ["Show S01E02", "Show S01E04", "Show S01E03", "Show S01E01"];
        let mut scan = feed.scan(titles.iter().map(|x| entry(x)).collect());
        let numbers: Vec<_> = scan.by_ref().map(|x| x.number.episode).collect();
        assert_eq!(numbers, [Some(3), Some(4)]);

        let progress = scan.into_progress();
        assert_eq!(progress["S"], EpisodeNumber::new(Some(1), Some(4)));
        feed.apply_progress(progress);
        assert_eq!(
            feed.subscriptions()["S"].number,
            EpisodeNumber::new(Some(1), Some(4))
        );
    }

    #[test]
    fn test_scan_nothing_new() {
        let feed = show_feed(EpisodeNumber::new(Some(2), Some(1)));
        let mut scan = feed.scan(vec![entry("Show S01E09"), entry("Show S02E01"), entry("mismatch")]);
        assert!(scan.next().is_none());
        assert!(scan.into_progress().is_empty());
    }

    #[test]
    fn test_scan_new_series_outranks_episode() {
        let feed = show_feed(EpisodeNumber::new(Some(1), Some(12)));
        let numbers: Vec<_> = feed
            .scan(vec![entry("Show S02E01"), entry("Show S01E13")])
            .map(|x| x.number)
            .collect();
        assert_eq!(
            numbers,
            [EpisodeNumber::new(Some(1), Some(13)), EpisodeNumber::new(Some(2), Some(1))]
        );
    }

    #[test]
    fn test_scan_multiple_subscriptions() {
        let mut config = feed_config("https://test.rss/");
        config.subscriptions = indexmap! {
            "sub 1".to_string() => sub_config(r"sub 1 ep (?P<episode>\d+)", None, None),
            "disabled".to_string() => {
                let mut sub = sub_config(r"ep (?P<episode>\d+)", None, None);
                sub.enabled = false;
                sub
            },
            "sub 2".to_string() => sub_config(r"sub 2 ep (?P<episode>\d+)", None, Some(1)),
            "bad number".to_string() => sub_config(r"sub 2 ep (?P<episode>\w+)", None, None),
        };
        let mut feed = Feed::new("feed", &config, defaults(Path::new("/tmp"))).unwrap();
        let entries = vec![
            entry("mismatch filename"),
            entry("sub 1 ep 2"),
            entry("sub 2 ep x"),
            entry("sub 2 ep 2"),
            entry("sub 2 ep 1"),
            entry("sub 1 ep 3"),
            entry("sub 1 ep 1"),
        ];
        let mut scan = feed.scan(entries);
        let matches: Vec<_> = scan
            .by_ref()
            .map(|x| (x.subscription.name().to_string(), x.number.episode))
            .collect();
        let expected: Vec<(String, Option<u32>)> = vec![
            ("sub 1".to_string(), Some(1)),
            ("sub 1".to_string(), Some(3)),
            ("bad number".to_string(), Some(1)),
            ("sub 2".to_string(), Some(2)),
            ("bad number".to_string(), Some(2)),
        ];
        assert_eq!(matches, expected);

        feed.apply_progress(scan.into_progress());
        let subs = feed.subscriptions();
        assert_eq!(subs["sub 1"].number, EpisodeNumber::new(None, Some(3)));
        assert_eq!(subs["sub 2"].number, EpisodeNumber::new(None, Some(2)));
        assert_eq!(subs["disabled"].number, EpisodeNumber::new(None, None));
    }

    #[tokio::test]
    async fn test_matching_subs_fetches_and_scans() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rss"))
            .and(header("User-Agent", "test agent"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(rss_body(&["Show S01E03", "Show S01E02"])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let mut config = feed_config(&format!("{}/rss", server.uri()));
        config.user_agent = Some("test agent".to_string());
        config.subscriptions = indexmap! {
            "S".to_string() => sub_config(r"Show S(?P<series>\d+)E(?P<episode>\d+)", Some(1), Some(1)),
        };
        let feed = Feed::new("F", &config, defaults(Path::new("/tmp"))).unwrap();
        let titles: Vec<_> = feed
            .matching_subs()
            .await
            .unwrap()
            .map(|x| x.entry.title)
            .collect();
        assert_eq!(titles, ["Show S01E02", "Show S01E03"]);
    }

    #[tokio::test]
    async fn test_fetch_without_user_agent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(rss_body(&[])))
            .mount(&server)
            .await;

        let feed = Feed::new("F", &feed_config(&server.uri()), defaults(Path::new("/tmp"))).unwrap();
        assert!(feed.fetch().await.unwrap().is_empty());
        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].headers.get("user-agent").is_none());
    }

    #[tokio::test]
    async fn test_no_subscriptions_skips_fetch() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&server)
            .await;

        let feed = Feed::new("F", &feed_config(&server.uri()), defaults(Path::new("/tmp"))).unwrap();
        assert_eq!(feed.matching_subs().await.unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_fetch_errors() {
        let server = MockServer::start().await;
        Mock::given(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(path("/garbage"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>not a feed</html>"))
            .mount(&server)
            .await;

        let mut config = feed_config(&format!("{}/missing", server.uri()));
        config.subscriptions = indexmap! {
            "S".to_string() => sub_config(r"(?P<episode>\d+)", None, None),
        };
        let feed = Feed::new("F", &config, defaults(Path::new("/tmp"))).unwrap();
        match feed.matching_subs().await {
            Err(FeedError::Status { status, feed, .. }) => {
                assert_eq!(status.as_u16(), 404);
                assert_eq!(feed, "F");
            }
            other => panic!("expected status error, got {:?}", other.map(|x| x.count())),
        }

        config.url = format!("{}/garbage", server.uri());
        let feed = Feed::new("F", &config, defaults(Path::new("/tmp"))).unwrap();
        assert!(matches!(feed.fetch().await, Err(FeedError::Parse { .. })));
    }

    fn torrent_entry(magnet: bool) -> Entry {
        Entry {
            title: "Show S01E19".to_string(),
            link: Some("https://x/fallback".to_string()),
            links: vec![
                Link::new("https://x/page", Some("text/html")),
                Link::new("https://x/19.torrent", Some(TORRENT_MIMETYPE)),
            ],
            magnet_uri: magnet.then(|| "magnet:?xt=urn:btih:19".to_string()),
            published: None,
        }
    }

    fn feed_with_modes(url: &str, magnet: bool, torrent_url: bool, torrent_file: bool) -> Feed {
        let mut config = feed_config(url);
        config.magnet_enabled = magnet;
        config.torrent_url_enabled = torrent_url;
        config.torrent_file_enabled = torrent_file;
        Feed::new("F", &config, defaults(Path::new("/tmp"))).unwrap()
    }

    #[tokio::test]
    async fn test_magnet_needs_no_network() {
        // unroutable url: any request would fail
        let feed = feed_with_modes("http://127.0.0.1:9/", true, false, true);
        let acquisition = feed
            .resolve_acquisition(&torrent_entry(true), Path::new("/nonexistent"))
            .await
            .unwrap();
        assert_eq!(
            acquisition,
            Acquisition::Magnet("magnet:?xt=urn:btih:19".to_string())
        );
    }

    #[tokio::test]
    async fn test_torrent_link_preferred_over_primary_link() {
        let feed = feed_with_modes("http://127.0.0.1:9/", true, true, true);
        let acquisition = feed
            .resolve_acquisition(&torrent_entry(false), Path::new("/nonexistent"))
            .await
            .unwrap();
        assert_eq!(acquisition, Acquisition::Url("https://x/19.torrent".to_string()));

        let feed = feed_with_modes("http://127.0.0.1:9/", false, true, false);
        let acquisition = feed
            .resolve_acquisition(&torrent_entry(true), Path::new("/nonexistent"))
            .await
            .unwrap();
        assert_eq!(acquisition, Acquisition::Url("https://x/19.torrent".to_string()));
    }

    #[tokio::test]
    async fn test_magnet_only_without_magnet() {
        let feed = feed_with_modes("http://127.0.0.1:9/", true, false, false);
        assert!(matches!(
            feed.resolve_acquisition(&torrent_entry(false), Path::new("/nonexistent"))
                .await,
            Err(FeedError::NoAcquisitionMethod { .. })
        ));
    }

    #[tokio::test]
    async fn test_missing_link() {
        let feed = feed_with_modes("http://127.0.0.1:9/", true, true, true);
        assert!(matches!(
            feed.resolve_acquisition(&entry("no links"), Path::new("/nonexistent"))
                .await,
            Err(FeedError::MissingLink { .. })
        ));
    }

    #[tokio::test]
    async fn test_download_hidden_filename() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/19.torrent"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(Vec::<u8>::new()))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let directory = dir.path().join("nested").join("テスト");
        let feed = feed_with_modes(&server.uri(), false, false, true);
        let mut entry = torrent_entry(true);
        entry.links[1].href = format!("{}/19.torrent", server.uri());

        let acquisition = feed.resolve_acquisition(&entry, &directory).await.unwrap();
        let expected = directory
            .join("e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855.torrent");
        assert_eq!(acquisition, Acquisition::File(expected.clone()));
        assert_eq!(std::fs::read(expected).unwrap(), b"");
    }

    #[tokio::test]
    async fn test_download_titled_filename() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/fallback"))
            .and(header("User-Agent", "agent"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"d8:announce".to_vec()))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let mut config = feed_config(&server.uri());
        config.magnet_enabled = false;
        config.torrent_url_enabled = false;
        config.hide_torrent_filename_enabled = false;
        config.sanitize_filenames = true;
        config.user_agent = Some("agent".to_string());
        let feed = Feed::new("F", &config, defaults(dir.path())).unwrap();

        let mut entry = entry("Show: S01E20 <1080p>");
        entry.link = Some(format!("{}/fallback", server.uri()));
        let acquisition = feed.resolve_acquisition(&entry, dir.path()).await.unwrap();
        let expected = dir.path().join("Show_ S01E20 _1080p_.torrent");
        assert_eq!(acquisition, Acquisition::File(expected.clone()));
        assert_eq!(std::fs::read(expected).unwrap(), b"d8:announce");
    }

    #[tokio::test]
    async fn test_download_bad_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let feed = feed_with_modes(&server.uri(), false, false, true);
        let mut entry = entry("Show S01E21");
        entry.link = Some(format!("{}/21.torrent", server.uri()));
        match feed.resolve_acquisition(&entry, dir.path()).await {
            Err(FeedError::Status { url, status, .. }) => {
                assert_eq!(url, format!("{}/21.torrent", server.uri()));
                assert_eq!(status.as_u16(), 403);
            }
            other => panic!("expected status error, got {:?}", other),
        }
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_requests_time_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(rss_body(&[]))
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let mut config = feed_config(&format!("{}/rss", server.uri()));
        config.magnet_enabled = false;
        config.torrent_url_enabled = false;
        let feed = Feed::new(
            "F",
            &config,
            FeedDefaults {
                timeout: Duration::from_millis(200),
                ..defaults(dir.path())
            },
        )
        .unwrap();

        match feed.fetch().await {
            Err(FeedError::Request { url, source, .. }) => {
                assert_eq!(url, format!("{}/rss", server.uri()));
                assert!(source.is_timeout());
            }
            other => panic!("expected request error, got {:?}", other),
        }

        let mut entry = entry("Show S01E22");
        entry.link = Some(format!("{}/22.torrent", server.uri()));
        match feed.resolve_acquisition(&entry, dir.path()).await {
            Err(FeedError::Request { url, source, .. }) => {
                assert_eq!(url, format!("{}/22.torrent", server.uri()));
                assert!(source.is_timeout());
            }
            other => panic!("expected request error, got {:?}", other),
        }
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
