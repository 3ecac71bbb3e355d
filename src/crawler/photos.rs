//! Photo downloads for newly discovered items

use crate::fetcher::Fetcher;
use crate::ClassifindError;
use std::path::Path;
use url::Url;

/// Fetches `url` and writes the body verbatim to `path`
///
/// The file is created or overwritten unconditionally; callers decide
/// whether a download is needed and make sure the directory exists.
pub fn download_photo<F: Fetcher + ?Sized>(
    fetcher: &F,
    url: &str,
    path: &Path,
) -> Result<(), ClassifindError> {
    let response = fetcher.get(url)?;

    if !response.is_success() {
        return Err(ClassifindError::PhotoStatus {
            url: url.to_string(),
            status: response.status,
        });
    }

    std::fs::write(path, &response.body)?;
    Ok(())
}

/// File name a photo is stored under: the last segment of its URL path
pub fn photo_file_name(url: &Url) -> Option<String> {
    url.path_segments()
        .and_then(|segments| segments.last())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}
