use anyhow::{anyhow, bail, Context, Result};
use reqwest::blocking::Client;
use reqwest::header::CONTENT_DISPOSITION;
use std::fs::File;
use std::io::{Read, Write};
use url::Url;

const USER_AGENT: &str = concat!("dotup/", env!("CARGO_PKG_VERSION"));

fn client() -> Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .context("Failed to build HTTP client")
}

/// Resolve the local file name for a download, preferring the server's
/// Content-Disposition header over the final URL path segment.
pub fn file_name_for(url: &str) -> Result<String> {
    let response = client()?
        .head(url)
        .send()
        .with_context(|| format!("Failed to query {url}"))?;

    let from_header = response
        .headers()
        .get(CONTENT_DISPOSITION)
        .and_then(|value| value.to_str().ok())
        .and_then(filename_from_disposition);

    match from_header {
        Some(name) => Ok(name),
        None => file_name_from_url(url),
    }
}

/// File name derived from the URL path alone, without touching the network.
pub fn file_name_from_url(url: &str) -> Result<String> {
    let parsed = Url::parse(url).with_context(|| format!("Invalid download URL '{url}'"))?;

    parsed
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|segment| !segment.is_empty())
        .map(String::from)
        .ok_or_else(|| anyhow!("Cannot derive a file name from URL '{url}'"))
}

fn filename_from_disposition(value: &str) -> Option<String> {
    value
        .split(';')
        .filter_map(|part| part.trim().strip_prefix("filename="))
        .map(|name| name.trim_matches('"').to_string())
        .find(|name| !name.is_empty())
}

/// Stream a URL to a file of the resolved name in the current directory.
/// Returns the file name.
pub fn download(url: &str) -> Result<String> {
    let name = file_name_for(url)?;

    let mut response = client()?
        .get(url)
        .send()
        .with_context(|| format!("Failed to download {url}"))?;

    if !response.status().is_success() {
        bail!("Download of {url} returned {}", response.status());
    }

    let mut file =
        File::create(&name).with_context(|| format!("Failed to create file '{name}'"))?;

    let mut buffer = [0u8; 8192];
    loop {
        let read = response
            .read(&mut buffer)
            .with_context(|| format!("Failed while reading from {url}"))?;
        if read == 0 {
            break;
        }
        file.write_all(&buffer[..read])
            .with_context(|| format!("Failed while writing '{name}'"))?;
    }

    file.flush().with_context(|| format!("Failed to flush '{name}'"))?;

    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_from_url_uses_last_segment() {
        assert_eq!(
            file_name_from_url("https://example.com/dir/tool.tar.gz").unwrap(),
            "tool.tar.gz"
        );
        assert_eq!(
            file_name_from_url("https://example.com/tool?tag=v1").unwrap(),
            "tool"
        );
    }

    #[test]
    fn file_name_from_url_rejects_bare_hosts() {
        assert!(file_name_from_url("https://example.com/").is_err());
        assert!(file_name_from_url("not a url").is_err());
    }

    #[test]
    fn disposition_filename_parsing() {
        assert_eq!(
            filename_from_disposition("attachment; filename=tool.zip"),
            Some("tool.zip".to_string())
        );
        assert_eq!(
            filename_from_disposition("attachment; filename=\"tool.zip\""),
            Some("tool.zip".to_string())
        );
        assert_eq!(filename_from_disposition("inline"), None);
        assert_eq!(filename_from_disposition("attachment; filename="), None);
    }
}
