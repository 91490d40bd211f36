use std::{
    borrow::Cow,
    path::{Path, PathBuf},
};

use sha2::{Digest, Sha256};
use torrentrss_types::Entry;

use super::Feed;
use crate::error::FeedError;

/// Characters Windows does not allow in filenames.
const WINDOWS_FORBIDDEN_CHARACTERS: &[char] = &['\\', '/', ':', '*', '?', '"', '<', '>', '|'];
const PATH_SEPARATORS: &[char] = &['/', '\0'];

/// How a matched entry's torrent is handed to the launcher.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Acquisition {
    Magnet(String),
    Url(String),
    File(PathBuf),
}

impl Acquisition {
    pub fn target(&self) -> Cow<'_, str> {
        match self {
            Acquisition::Magnet(x) | Acquisition::Url(x) => Cow::Borrowed(x),
            Acquisition::File(path) => path.to_string_lossy(),
        }
    }
}

pub fn hashed_filename(body: &[u8]) -> String {
    hex::encode(Sha256::digest(body))
}

/// Entry title made safe to use as a filename. Path separators are always
/// replaced; with `windows_safe` every character Windows forbids is.
pub fn sanitized_filename(title: &str, windows_safe: bool) -> String {
    let title = title.replace(PATH_SEPARATORS, "_");
    if windows_safe {
        title.replace(WINDOWS_FORBIDDEN_CHARACTERS, "_")
    } else {
        title
    }
}

impl Feed {
    /// Picks the cheapest enabled way to get `entry`'s torrent: its magnet uri,
    /// its torrent url, or the torrent file downloaded into `directory`.
    pub async fn resolve_acquisition(
        &self,
        entry: &Entry,
        directory: &Path,
    ) -> Result<Acquisition, FeedError> {
        let modes = &self.acquisition;
        if modes.magnet {
            if let Some(magnet) = &entry.magnet_uri {
                debug!("entry {:?}: using magnet uri {:?}", entry.title, magnet);
                return Ok(Acquisition::Magnet(magnet.clone()));
            }
        }
        if !modes.torrent_url && !modes.torrent_file {
            return Err(FeedError::NoAcquisitionMethod {
                feed: self.name.clone(),
                title: entry.title.clone(),
            });
        }

        let url = entry.torrent_url().ok_or_else(|| FeedError::MissingLink {
            feed: self.name.clone(),
            title: entry.title.clone(),
        })?;
        if entry.links.iter().any(|x| x.is_torrent()) {
            debug!("entry {:?}: first torrent link is {:?}", entry.title, url);
        } else {
            info!(
                "entry {:?}: no torrent link, using primary link {:?}",
                entry.title, url
            );
        }
        if modes.torrent_url {
            return Ok(Acquisition::Url(url.to_string()));
        }

        let path = self.download_torrent_file(entry, url, directory).await?;
        Ok(Acquisition::File(path))
    }

    async fn download_torrent_file(
        &self,
        entry: &Entry,
        url: &str,
        directory: &Path,
    ) -> Result<PathBuf, FeedError> {
        let request_error = |source: reqwest::Error| FeedError::Request {
            feed: self.name.clone(),
            url: url.to_string(),
            source,
        };
        let response = self.client.get(url).send().await.map_err(request_error)?;
        if !response.status().is_success() {
            return Err(FeedError::Status {
                feed: self.name.clone(),
                url: url.to_string(),
                status: response.status(),
            });
        }
        let body = response.bytes().await.map_err(request_error)?;

        let filename = if self.acquisition.hide_filename || entry.title.trim().is_empty() {
            hashed_filename(&body)
        } else {
            sanitized_filename(&entry.title, self.acquisition.sanitize_filenames)
        };
        let path = directory.join(format!("{}.torrent", filename));
        let write_error = |source: std::io::Error| FeedError::Write {
            feed: self.name.clone(),
            url: url.to_string(),
            path: path.clone(),
            source,
        };
        tokio::fs::create_dir_all(directory)
            .await
            .map_err(write_error)?;
        tokio::fs::write(&path, &body).await.map_err(write_error)?;
        info!(
            "feed {:?}: downloaded {:?} to {}",
            self.name,
            url,
            path.display()
        );
        Ok(path)
    }
}
