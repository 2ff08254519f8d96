//! Minimal CalDAV client: enumerate, upload, and delete the event
//! resources of one calendar collection over HTTP basic auth.

use anyhow::{bail, Context, Result};
use reqwest::{Client, Method, StatusCode, Url};

const PROPFIND_BODY: &str = r#"<?xml version="1.0" encoding="utf-8"?><d:propfind xmlns:d="DAV:"><d:prop><d:resourcetype/></d:prop></d:propfind>"#;

pub struct CalDavClient {
    http: Client,
    base: Url,
    username: String,
    password: String,
}

impl CalDavClient {
    /// `verify_ssl: false` accepts self-signed certificates, for servers
    /// on private networks.
    pub fn new(calendar_url: &str, username: &str, password: &str, verify_ssl: bool) -> Result<Self> {
        let mut base = Url::parse(calendar_url).context("invalid CalDAV calendar URL")?;
        // Relative joins drop the last path segment without this.
        if !base.path().ends_with('/') {
            base.set_path(&format!("{}/", base.path()));
        }

        let http = Client::builder()
            .danger_accept_invalid_certs(!verify_ssl)
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            http,
            base,
            username: username.to_string(),
            password: password.to_string(),
        })
    }

    /// Hrefs of every event resource currently in the collection.
    pub async fn list_event_hrefs(&self) -> Result<Vec<String>> {
        let propfind = Method::from_bytes(b"PROPFIND").context("PROPFIND method")?;
        let response = self
            .http
            .request(propfind, self.base.clone())
            .basic_auth(&self.username, Some(&self.password))
            .header("Depth", "1")
            .header("Content-Type", "application/xml; charset=utf-8")
            .body(PROPFIND_BODY)
            .send()
            .await
            .context("PROPFIND request failed")?;

        let status = response.status();
        if !status.is_success() && status != StatusCode::MULTI_STATUS {
            bail!("PROPFIND returned {status}");
        }

        let body = response.text().await.context("PROPFIND body unreadable")?;
        parse_event_hrefs(&body)
    }

    /// Upload an event payload; the resource name is derived from the UID.
    pub async fn put_event(&self, uid: &str, ical_data: &str) -> Result<()> {
        let url = self
            .base
            .join(&format!("{uid}.ics"))
            .context("cannot build event URL")?;

        let response = self
            .http
            .put(url)
            .basic_auth(&self.username, Some(&self.password))
            .header("Content-Type", "text/calendar; charset=utf-8")
            .body(ical_data.to_string())
            .send()
            .await
            .context("PUT request failed")?;

        if !response.status().is_success() {
            bail!("PUT {uid} returned {}", response.status());
        }
        Ok(())
    }

    /// Delete an event by the href reported in the multistatus listing.
    /// An already-gone event counts as deleted.
    pub async fn delete_event(&self, href: &str) -> Result<()> {
        let url = self.base.join(href).context("invalid event href")?;
        let response = self
            .http
            .delete(url)
            .basic_auth(&self.username, Some(&self.password))
            .send()
            .await
            .context("DELETE request failed")?;

        let status = response.status();
        if !status.is_success() && status != StatusCode::NOT_FOUND {
            bail!("DELETE {href} returned {status}");
        }
        Ok(())
    }
}

/// Pull `.ics` resource hrefs out of a WebDAV multistatus document.
fn parse_event_hrefs(body: &str) -> Result<Vec<String>> {
    let doc = roxmltree::Document::parse(body).context("invalid multistatus XML")?;

    let mut hrefs = Vec::new();
    for node in doc
        .descendants()
        .filter(|n| n.has_tag_name(("DAV:", "href")))
    {
        if let Some(text) = node.text() {
            let href = text.trim();
            if href.ends_with(".ics") {
                hrefs.push(href.to_string());
            }
        }
    }
    Ok(hrefs)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MULTISTATUS: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<d:multistatus xmlns:d="DAV:">
  <d:response>
    <d:href>/calendars/work/</d:href>
    <d:propstat><d:prop><d:resourcetype/></d:prop></d:propstat>
  </d:response>
  <d:response>
    <d:href>/calendars/work/abc123.ics</d:href>
    <d:propstat><d:prop><d:resourcetype/></d:prop></d:propstat>
  </d:response>
  <d:response>
    <d:href>/calendars/work/def456.ics</d:href>
    <d:propstat><d:prop><d:resourcetype/></d:prop></d:propstat>
  </d:response>
</d:multistatus>"#;

    #[test]
    fn parses_event_hrefs_and_skips_the_collection() {
        let hrefs = parse_event_hrefs(MULTISTATUS).unwrap();
        assert_eq!(
            hrefs,
            vec![
                "/calendars/work/abc123.ics".to_string(),
                "/calendars/work/def456.ics".to_string(),
            ]
        );
    }

    #[test]
    fn garbage_xml_is_an_error() {
        assert!(parse_event_hrefs("not xml at all").is_err());
    }

    #[test]
    fn base_url_gets_a_trailing_slash() {
        let client = CalDavClient::new("http://cal.local/calendars/work", "u", "p", true).unwrap();
        assert_eq!(client.base.path(), "/calendars/work/");
    }
}
