use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000/search";
pub const DEFAULT_OUT_DIR: &str = "out";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const ENDPOINT_ENV: &str = "PATENT_SEARCH_ENDPOINT";
pub const OUT_DIR_ENV: &str = "PATENT_LENS_OUT_DIR";

#[derive(Debug, Clone)]
pub struct Settings {
    pub endpoint: Url,
    pub output_dir: PathBuf,
    pub timeout: Duration,
}

impl Settings {
    /// CLI value > environment variable > built-in default, per setting.
    pub fn resolve(
        endpoint: Option<&str>,
        output_dir: Option<&str>,
        timeout_secs: Option<u64>,
    ) -> Result<Self> {
        let endpoint = match endpoint {
            Some(e) => e.to_string(),
            None => std::env::var(ENDPOINT_ENV).unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string()),
        };
        let output_dir = match output_dir {
            Some(d) => PathBuf::from(d),
            None => std::env::var(OUT_DIR_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_OUT_DIR)),
        };

        Ok(Self {
            endpoint: parse_endpoint(&endpoint)?,
            output_dir,
            timeout: Duration::from_secs(timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
        })
    }
}

pub fn parse_endpoint(raw: &str) -> Result<Url> {
    let url = Url::parse(raw).with_context(|| format!("invalid search endpoint {:?}", raw))?;
    if !matches!(url.scheme(), "http" | "https") {
        bail!("search endpoint must be http(s), got {:?}", url.scheme());
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_values_win() {
        let s = Settings::resolve(Some("https://search.example.org/q"), Some("/tmp/x"), Some(5)).unwrap();
        assert_eq!(s.endpoint.as_str(), "https://search.example.org/q");
        assert_eq!(s.output_dir, PathBuf::from("/tmp/x"));
        assert_eq!(s.timeout, Duration::from_secs(5));
    }

    #[test]
    fn rejects_non_http_endpoints() {
        assert!(parse_endpoint("ftp://example.org/search").is_err());
        assert!(parse_endpoint("not a url").is_err());
        assert!(parse_endpoint(DEFAULT_ENDPOINT).is_ok());
    }
}
