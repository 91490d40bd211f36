use chrono::DateTime;
use rss::Channel;
use torrentrss_types::{Entry, Link};

use crate::error::ParseError;

/// Extension prefix of `<torrent:magnetURI>` in ezRSS-style feeds.
const TORRENT_EXTENSION: &str = "torrent";
const MAGNET_URI_ELEMENT: &str = "magnetURI";

/// Parses an RSS 2.0 body, falling back to Atom. Entries stay in document
/// order, which for feeds is newest first.
pub fn parse_entries(body: &[u8]) -> Result<Vec<Entry>, ParseError> {
    let rss = match Channel::read_from(body) {
        Ok(channel) => {
            return Ok(channel.into_items().into_iter().map(rss_entry).collect());
        }
        Err(e) => e,
    };
    match atom_syndication::Feed::read_from(body) {
        Ok(feed) => {
            debug!("body is not RSS ({}), parsed as Atom", rss);
            Ok(feed.entries().iter().map(atom_entry).collect())
        }
        Err(atom) => Err(ParseError { rss, atom }),
    }
}

fn rss_entry(item: rss::Item) -> Entry {
    let mut links = vec![];
    if let Some(link) = item.link() {
        links.push(Link::new(link, Some("text/html")));
    }
    if let Some(enclosure) = item.enclosure() {
        let mime_type = Some(enclosure.mime_type()).filter(|x| !x.is_empty());
        links.push(Link::new(enclosure.url(), mime_type));
    }
    let magnet_uri = item
        .extensions()
        .get(TORRENT_EXTENSION)
        .and_then(|x| x.get(MAGNET_URI_ELEMENT))
        .and_then(|x| x.first())
        .and_then(|x| x.value())
        .map(|x| x.trim().to_string());

    Entry {
        title: item.title().unwrap_or_default().to_string(),
        link: item.link().map(str::to_string),
        links,
        magnet_uri,
        published: item
            .pub_date()
            .and_then(|x| DateTime::parse_from_rfc2822(x).ok()),
    }
}

fn atom_entry(entry: &atom_syndication::Entry) -> Entry {
    let link = entry
        .links()
        .iter()
        .find(|x| x.rel() == "alternate")
        .or_else(|| entry.links().first())
        .map(|x| x.href().to_string());
    let magnet_uri = entry
        .extensions()
        .get(TORRENT_EXTENSION)
        .and_then(|x| x.get(MAGNET_URI_ELEMENT))
        .and_then(|x| x.first())
        .and_then(|x| x.value())
        .map(|x| x.trim().to_string());

    Entry {
        title: entry.title().as_str().to_string(),
        link,
        links: entry
            .links()
            .iter()
            .map(|x| Link::new(x.href(), x.mime_type()))
            .collect(),
        magnet_uri,
        published: Some(*entry.published().unwrap_or_else(|| entry.updated())),
    }
}
