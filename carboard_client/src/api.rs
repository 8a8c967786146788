use std::fmt;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use reqwest::{StatusCode, Url};
use serde::Serialize;

use carboard_core::error::RemoteError;
use carboard_core::models::{Comment, EditItemInput, Item, NewComment, NewItem};
use carboard_core::remote::RemoteStore;

/// `RemoteStore` over a REST remote. Reads map failures to
/// `RemoteError::Fetch`, writes to `RemoteError::Write`; a 404 on a get
/// is `Ok(None)`, matching the trait contract.
#[derive(Clone)]
pub struct HttpStore {
    base_url: String,
    client: Client,
}

#[derive(Serialize)]
struct VotePatch {
    vote_count: u32,
}

#[derive(Serialize)]
struct ContentPatch<'a> {
    content: &'a str,
}

impl HttpStore {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let base = sanitize_base_url(base_url.into())?;
        let client = Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            base_url: base,
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

fn fetch_err(err: impl fmt::Display) -> RemoteError {
    RemoteError::Fetch(err.to_string())
}

fn write_err(err: impl fmt::Display) -> RemoteError {
    RemoteError::Write(err.to_string())
}

impl RemoteStore for HttpStore {
    fn list_items(&self) -> Result<Vec<Item>, RemoteError> {
        let response = self
            .client
            .get(self.url("/items"))
            .send()
            .map_err(fetch_err)?
            .error_for_status()
            .map_err(fetch_err)?;
        response.json().map_err(fetch_err)
    }

    fn get_item(&self, id: &str) -> Result<Option<Item>, RemoteError> {
        let response = self
            .client
            .get(self.url(&format!("/items/{id}")))
            .send()
            .map_err(fetch_err)?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = response.error_for_status().map_err(fetch_err)?;
        Ok(Some(response.json().map_err(fetch_err)?))
    }

    fn insert_item(&self, input: &NewItem) -> Result<Item, RemoteError> {
        let response = self
            .client
            .post(self.url("/items"))
            .json(input)
            .send()
            .map_err(write_err)?
            .error_for_status()
            .map_err(write_err)?;
        response.json().map_err(write_err)
    }

    fn update_item(&self, id: &str, edit: &EditItemInput) -> Result<(), RemoteError> {
        self.client
            .patch(self.url(&format!("/items/{id}")))
            .json(edit)
            .send()
            .map_err(write_err)?
            .error_for_status()
            .map_err(write_err)?;
        Ok(())
    }

    fn update_vote_count(&self, id: &str, vote_count: u32) -> Result<(), RemoteError> {
        self.client
            .patch(self.url(&format!("/items/{id}")))
            .json(&VotePatch { vote_count })
            .send()
            .map_err(write_err)?
            .error_for_status()
            .map_err(write_err)?;
        Ok(())
    }

    fn delete_item(&self, id: &str) -> Result<(), RemoteError> {
        self.client
            .delete(self.url(&format!("/items/{id}")))
            .send()
            .map_err(write_err)?
            .error_for_status()
            .map_err(write_err)?;
        Ok(())
    }

    fn list_comments(&self, item_id: &str) -> Result<Vec<Comment>, RemoteError> {
        let response = self
            .client
            .get(self.url(&format!("/items/{item_id}/comments")))
            .send()
            .map_err(fetch_err)?
            .error_for_status()
            .map_err(fetch_err)?;
        response.json().map_err(fetch_err)
    }

    fn get_comment(&self, id: &str) -> Result<Option<Comment>, RemoteError> {
        let response = self
            .client
            .get(self.url(&format!("/comments/{id}")))
            .send()
            .map_err(fetch_err)?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = response.error_for_status().map_err(fetch_err)?;
        Ok(Some(response.json().map_err(fetch_err)?))
    }

    fn insert_comment(&self, input: &NewComment) -> Result<Comment, RemoteError> {
        let response = self
            .client
            .post(self.url("/comments"))
            .json(input)
            .send()
            .map_err(write_err)?
            .error_for_status()
            .map_err(write_err)?;
        response.json().map_err(write_err)
    }

    fn update_comment(&self, id: &str, content: &str) -> Result<(), RemoteError> {
        self.client
            .patch(self.url(&format!("/comments/{id}")))
            .json(&ContentPatch { content })
            .send()
            .map_err(write_err)?
            .error_for_status()
            .map_err(write_err)?;
        Ok(())
    }

    fn delete_comment(&self, id: &str) -> Result<(), RemoteError> {
        self.client
            .delete(self.url(&format!("/comments/{id}")))
            .send()
            .map_err(write_err)?
            .error_for_status()
            .map_err(write_err)?;
        Ok(())
    }
}

fn sanitize_base_url(mut base: String) -> Result<String> {
    if !base.starts_with("http://") && !base.starts_with("https://") {
        base = format!("http://{base}");
    }
    // Remove trailing slash for consistency
    while base.ends_with('/') {
        base.pop();
    }
    // Validate once
    let _ = Url::parse(&base).context("invalid base URL")?;
    Ok(base)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_urls_are_sanitized() {
        let store = HttpStore::new("127.0.0.1:8080/").expect("store");
        assert_eq!(store.base_url(), "http://127.0.0.1:8080");

        let store = HttpStore::new("https://board.example.com///").expect("store");
        assert_eq!(store.base_url(), "https://board.example.com");
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        assert!(HttpStore::new("http://").is_err());
    }
}
