use std::time::Duration;

use reqwest::redirect::Policy;
use reqwest::Url;
use tracing::debug;

use crate::error::FetchError;

pub const ALLOWED_DOMAINS: &[&str] = &["www.otomoto.pl", "otomoto.pl", "www.olx.pl", "olx.pl"];

const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";
const TIMEOUT: Duration = Duration::from_secs(30);
const MAX_REDIRECTS: usize = 10;

pub fn client() -> Result<reqwest::Client, FetchError> {
    let redirects = Policy::custom(|attempt| {
        if attempt.previous().len() >= MAX_REDIRECTS {
            attempt.error("too many redirects")
        } else if attempt.url().host_str().is_some_and(is_allowed) {
            attempt.follow()
        } else {
            attempt.stop()
        }
    });
    Ok(reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(TIMEOUT)
        .redirect(redirects)
        .build()?)
}

pub fn is_allowed(host: &str) -> bool {
    ALLOWED_DOMAINS.contains(&host)
}

/// Validate the URL against the allow-list before any request goes out.
pub fn check_url(url: &str) -> Result<Url, FetchError> {
    let parsed = Url::parse(url).map_err(|_| FetchError::InvalidUrl {
        url: url.to_string(),
    })?;
    let host = parsed.host_str().ok_or_else(|| FetchError::InvalidUrl {
        url: url.to_string(),
    })?;
    if !is_allowed(host) {
        return Err(FetchError::DomainNotAllowed {
            host: host.to_string(),
        });
    }
    Ok(parsed)
}

/// GET a listing page and return its HTML. No retries.
pub async fn fetch_page(client: &reqwest::Client, url: &str) -> Result<String, FetchError> {
    let url = check_url(url)?;
    debug!("GET {}", url);
    let response = client.get(url.clone()).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            status,
            url: url.to_string(),
        });
    }
    Ok(response.text().await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allow_list() {
        assert!(check_url("https://www.otomoto.pl/osobowe/peugeot/rifter").is_ok());
        assert!(check_url("https://olx.pl/motoryzacja/").is_ok());
        assert!(matches!(
            check_url("https://www.allegro.pl/"),
            Err(FetchError::DomainNotAllowed { host }) if host == "www.allegro.pl"
        ));
        assert!(matches!(
            check_url("otomoto.pl/osobowe"),
            Err(FetchError::InvalidUrl { .. })
        ));
    }

    #[tokio::test]
    async fn disallowed_domain_fails_without_request() {
        let client = client().unwrap();
        let err = fetch_page(&client, "http://127.0.0.1:9/").await.unwrap_err();
        assert!(matches!(err, FetchError::DomainNotAllowed { .. }));
    }
}
