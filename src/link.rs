use thiserror::Error;
use tracing::{debug, warn};
use url::{form_urlencoded, Url};

use crate::payload::{self, DecodeError, TimerConfig};

pub const DEFAULT_BASE_URL: &str = "https://tock.link/";

/// Where a decoded link carried its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkSource {
    Fragment,
    /// `?m=<message>&t=<seconds>`, read for links made by older versions
    LegacyQuery,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedLink {
    pub config: TimerConfig,
    pub source: LinkSource,
}

#[derive(Debug, Error)]
pub enum LinkError {
    #[error("link carries neither a share token nor m/t parameters")]
    NoPayload,
    #[error(transparent)]
    Token(#[from] DecodeError),
    #[error("link parameter t={0:?} is not a positive whole number of seconds")]
    LegacyDuration(String),
}

/// Reads a share link. Accepts a full URL, a bare `#token` or token, or a bare `?m=..&t=..` query.
///
/// The fragment token wins; the legacy query is only consulted when the
/// fragment is absent or does not decode.
pub fn parse_link(input: &str) -> Result<SharedLink, LinkError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(LinkError::NoPayload);
    }

    let (fragment, query) = match Url::parse(input) {
        Ok(url) => (
            url.fragment().map(str::to_owned),
            url.query().map(str::to_owned),
        ),
        Err(_) => split_bare(input),
    };

    let mut token_error = None;
    if let Some(fragment) = fragment.filter(|f| !f.is_empty()) {
        match payload::decode(&fragment) {
            Ok(config) => {
                return Ok(SharedLink {
                    config,
                    source: LinkSource::Fragment,
                })
            }
            Err(err) => {
                debug!("share token did not decode: {err}");
                token_error = Some(err);
            }
        }
    }

    match query.as_deref().map(parse_legacy_query).transpose()? {
        Some(Some(config)) => Ok(SharedLink {
            config,
            source: LinkSource::LegacyQuery,
        }),
        _ => Err(token_error.map_or(LinkError::NoPayload, LinkError::Token)),
    }
}

/// Splits input that is not an absolute URL: a bare token, `#token`, `?query`,
/// or a scheme-less link like `tock.link/#token`.
fn split_bare(input: &str) -> (Option<String>, Option<String>) {
    let (rest, fragment) = match input.rsplit_once('#') {
        Some((rest, fragment)) => (rest, Some(fragment.to_owned())),
        None => (input, None),
    };
    let query = rest.split_once('?').map(|(_, query)| query.to_owned());
    match (fragment, query) {
        (None, None) => (Some(input.to_owned()), None),
        parts => parts,
    }
}

/// `Ok(None)` when the query lacks either parameter
fn parse_legacy_query(query: &str) -> Result<Option<TimerConfig>, LinkError> {
    let mut message = None;
    let mut duration = None;
    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        match key.as_ref() {
            "m" if message.is_none() => message = Some(value.into_owned()),
            "t" if duration.is_none() => duration = Some(value.into_owned()),
            _ => {}
        }
    }

    match (message, duration) {
        (Some(message), Some(duration)) if !message.is_empty() && !duration.is_empty() => {
            let duration_secs =
                payload::parse_duration(&duration).ok_or(LinkError::LegacyDuration(duration))?;
            Ok(Some(TimerConfig::new(message, duration_secs)))
        }
        _ => Ok(None),
    }
}

/// Parses the configured base for share links, falling back to the default on error.
pub fn base_url(configured: &str) -> Url {
    match Url::parse(configured) {
        Ok(url) if !url.cannot_be_a_base() => url,
        _ => {
            warn!("invalid share base url {configured:?}, using {DEFAULT_BASE_URL}");
            default_base_url()
        }
    }
}

fn default_base_url() -> Url {
    Url::parse(DEFAULT_BASE_URL).unwrap_or_else(|_| unreachable!("default base url is valid"))
}

/// `<base>#<token>`; any query or fragment already on the base is dropped
pub fn share_url(base: &Url, config: &TimerConfig) -> String {
    let mut url = base.clone();
    url.set_query(None);
    url.set_fragment(Some(&payload::encode(config)));
    url.to_string()
}
