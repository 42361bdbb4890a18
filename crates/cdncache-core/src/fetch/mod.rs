//! HTTP GET of whole assets.
//!
//! Uses the curl crate (libcurl) with a bounded whole-request timeout and no
//! retry. Callers go through the [`Fetch`] trait so tests can substitute an
//! in-memory source.

mod parse;

use std::str;

use crate::config::FetchSettings;
use crate::error::{CacheError, Result};

/// Accept header sent with every request.
pub const ACCEPT: &str = "text/css, application/javascript, */*";

/// A fully downloaded response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedAsset {
    pub body: Vec<u8>,
    /// Raw Content-Type of the final response, if the server sent one.
    pub content_type: Option<String>,
}

/// Source of remote bytes.
pub trait Fetch {
    fn fetch(&self, url: &str) -> Result<FetchedAsset>;
}

impl<F: Fetch + ?Sized> Fetch for &F {
    fn fetch(&self, url: &str) -> Result<FetchedAsset> {
        (**self).fetch(url)
    }
}

/// Blocking libcurl fetcher. A fresh easy handle per request; runs in the
/// current thread.
#[derive(Debug, Clone)]
pub struct CurlFetcher {
    settings: FetchSettings,
}

impl CurlFetcher {
    pub fn new(settings: FetchSettings) -> Self {
        Self { settings }
    }
}

impl Fetch for CurlFetcher {
    fn fetch(&self, url: &str) -> Result<FetchedAsset> {
        let curl_err = |source: curl::Error| CacheError::Fetch {
            url: url.to_string(),
            source,
        };

        let mut headers: Vec<String> = Vec::new();
        let mut body: Vec<u8> = Vec::new();

        let mut easy = curl::easy::Easy::new();
        easy.url(url).map_err(curl_err)?;
        easy.follow_location(true).map_err(curl_err)?;
        easy.max_redirections(10).map_err(curl_err)?;
        easy.connect_timeout(std::time::Duration::from_secs(10))
            .map_err(curl_err)?;
        easy.timeout(self.settings.timeout()).map_err(curl_err)?;
        easy.useragent(&self.settings.user_agent).map_err(curl_err)?;
        // Let libcurl decode gzip/br if the CDN compresses anyway.
        easy.accept_encoding("").map_err(curl_err)?;

        let mut list = curl::easy::List::new();
        list.append(&format!("Accept: {ACCEPT}")).map_err(curl_err)?;
        easy.http_headers(list).map_err(curl_err)?;

        {
            let mut transfer = easy.transfer();
            transfer
                .header_function(|data| {
                    if let Ok(s) = str::from_utf8(data) {
                        headers.push(s.trim_end().to_string());
                    }
                    true
                })
                .map_err(curl_err)?;
            transfer
                .write_function(|data| {
                    body.extend_from_slice(data);
                    Ok(data.len())
                })
                .map_err(curl_err)?;
            transfer.perform().map_err(curl_err)?;
        }

        let status = easy.response_code().map_err(curl_err)?;
        if !(200..300).contains(&status) {
            return Err(CacheError::HttpStatus {
                url: url.to_string(),
                status,
            });
        }

        Ok(FetchedAsset {
            body,
            content_type: parse::content_type(&headers),
        })
    }
}
