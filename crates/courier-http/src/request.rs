//! Request description

use std::{collections::BTreeMap, fmt};

use serde::Serialize;

use crate::{
    error::{HttpError, Result},
    multipart::MultipartFile,
};

/// How a request goes over the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestMethod {
    Get,
    Post,
    Put,
    Delete,
    /// multipart/form-data, always sent as POST
    Multipart,
}

impl RequestMethod {
    /// The HTTP verb actually sent
    pub fn verb(self) -> &'static str {
        match self {
            RequestMethod::Get => "GET",
            RequestMethod::Post | RequestMethod::Multipart => "POST",
            RequestMethod::Put => "PUT",
            RequestMethod::Delete => "DELETE",
        }
    }

    /// Whether the configured timeout bounds this method
    pub fn is_timed(self) -> bool {
        !matches!(self, RequestMethod::Multipart)
    }
}

impl fmt::Display for RequestMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestMethod::Multipart => f.write_str("MULTIPART"),
            other => f.write_str(other.verb()),
        }
    }
}

/// One call site's request
///
/// Cheap to clone so retries can re-issue the identical request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    url: String,
    method: RequestMethod,
    body: Option<Vec<u8>>,
    fields: BTreeMap<String, String>,
    files: Vec<MultipartFile>,
    show_loader: bool,
}

impl Request {
    pub fn new(method: RequestMethod, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method,
            body: None,
            fields: BTreeMap::new(),
            files: Vec::new(),
            show_loader: true,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(RequestMethod::Get, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(RequestMethod::Post, url)
    }

    pub fn put(url: impl Into<String>) -> Self {
        Self::new(RequestMethod::Put, url)
    }

    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(RequestMethod::Delete, url)
    }

    pub fn multipart(
        url: impl Into<String>,
        fields: BTreeMap<String, String>,
        files: Vec<MultipartFile>,
    ) -> Self {
        Self {
            fields,
            files,
            ..Self::new(RequestMethod::Multipart, url)
        }
    }

    /// Attach an already-serialized body; only POST and PUT send it
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Serialize `value` as JSON and attach it as the body
    pub fn with_json<T: Serialize + ?Sized>(self, value: &T) -> Result<Self> {
        Ok(self.with_body(serde_json::to_vec(value)?))
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn with_file(mut self, file: MultipartFile) -> Self {
        self.files.push(file);
        self
    }

    pub fn with_show_loader(mut self, show_loader: bool) -> Self {
        self.show_loader = show_loader;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn method(&self) -> RequestMethod {
        self.method
    }

    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }

    pub fn files(&self) -> &[MultipartFile] {
        &self.files
    }

    pub fn show_loader(&self) -> bool {
        self.show_loader
    }

    /// Reject requests that cannot be issued
    pub fn validate(&self) -> Result<()> {
        if self.method == RequestMethod::Multipart && self.fields.is_empty() && self.files.is_empty()
        {
            return Err(HttpError::InvalidRequest(
                "multipart request needs at least one field or file".to_string(),
            ));
        }
        Ok(())
    }
}
