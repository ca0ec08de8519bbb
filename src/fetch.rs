//! HTTP request abstraction for the IndiQuant API
//!
//! Requests are described as owned data so the auth layer can rebuild and
//! resend the same request after a token refresh.

use crate::error::Error;
use reqwest::{
    header::{HeaderMap, HeaderValue},
    multipart, Client, Method, RequestBuilder,
};
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use url::Url;

/// A file attached to a multipart request
#[derive(Clone)]
struct FilePart {
    field: String,
    file_name: String,
    content_type: String,
    data: Vec<u8>,
}

/// Request body payload
#[derive(Clone, Default)]
enum Body {
    #[default]
    Empty,
    Json(Vec<u8>),
    Form(Vec<(String, String)>),
    Multipart {
        texts: Vec<(String, String)>,
        file: Option<FilePart>,
    },
}

/// Helper for building and executing HTTP requests
pub struct FetchBuilder<'a> {
    client: &'a Client,
    url: String,
    method: Method,
    headers: HeaderMap,
    query_params: Option<HashMap<String, String>>,
    body: Body,
}

impl<'a> FetchBuilder<'a> {
    /// Create a new FetchBuilder
    pub fn new(client: &'a Client, url: &str, method: Method) -> Self {
        Self {
            client,
            url: url.to_string(),
            method,
            headers: HeaderMap::new(),
            query_params: None,
            body: Body::Empty,
        }
    }

    /// Add a header to the request
    pub fn header(mut self, name: &'static str, value: &str) -> Self {
        if let Ok(value) = HeaderValue::from_str(value) {
            self.headers.insert(name, value);
        }
        self
    }

    /// Add query parameters to the request
    pub fn query(mut self, params: HashMap<String, String>) -> Self {
        self.query_params = Some(params);
        self
    }

    /// Add a JSON body to the request
    pub fn json<T: Serialize>(mut self, body: &T) -> Result<Self, Error> {
        let json = serde_json::to_vec(body)?;
        self.body = Body::Json(json);
        Ok(self)
    }

    /// Add a form-encoded body to the request
    pub fn form(mut self, fields: Vec<(String, String)>) -> Self {
        self.body = Body::Form(fields);
        self
    }

    /// Attach a file as a multipart body
    pub fn multipart_file(
        mut self,
        field: &str,
        file_name: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> Self {
        let texts = match self.body {
            Body::Multipart { texts, .. } => texts,
            _ => Vec::new(),
        };
        self.body = Body::Multipart {
            texts,
            file: Some(FilePart {
                field: field.to_string(),
                file_name: file_name.to_string(),
                content_type: content_type.to_string(),
                data,
            }),
        };
        self
    }

    /// Build the request
    fn build(&self) -> Result<RequestBuilder, Error> {
        let mut url = Url::parse(&self.url)?;

        // Add query parameters if present
        if let Some(params) = &self.query_params {
            let mut query_pairs = url.query_pairs_mut();
            for (key, value) in params {
                query_pairs.append_pair(key, value);
            }
        }

        let mut req = self.client.request(self.method.clone(), url.as_str());
        req = req.headers(self.headers.clone());

        match &self.body {
            Body::Empty => {}
            Body::Json(bytes) => {
                req = req
                    .header("Content-Type", "application/json")
                    .body(bytes.clone());
            }
            Body::Form(fields) => {
                req = req.form(fields);
            }
            Body::Multipart { texts, file } => {
                let mut form = multipart::Form::new();
                for (name, value) in texts {
                    form = form.text(name.clone(), value.clone());
                }
                if let Some(part) = file {
                    let file_part = multipart::Part::bytes(part.data.clone())
                        .file_name(part.file_name.clone())
                        .mime_str(&part.content_type)
                        .map_err(Error::Http)?;
                    form = form.part(part.field.clone(), file_part);
                }
                req = req.multipart(form);
            }
        }

        Ok(req)
    }

    /// Send the request, attaching a bearer token when one is given
    pub async fn send_bearer(&self, token: Option<&str>) -> Result<reqwest::Response, Error> {
        let mut req = self.build()?;
        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {}", token));
        }
        Ok(req.send().await?)
    }

    /// Execute the request and parse the response as JSON
    pub async fn execute<T: DeserializeOwned>(&self) -> Result<T, Error> {
        let req = self.build()?;
        let response = req.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await?;
            return Err(Error::general(format!(
                "Request failed with status {}: {}",
                status, text
            )));
        }

        let result = response.json::<T>().await?;
        Ok(result)
    }

    /// Execute the request and return the raw response
    pub async fn execute_raw(&self) -> Result<reqwest::Response, Error> {
        let req = self.build()?;
        let response = req.send().await?;
        Ok(response)
    }
}

/// Helper for creating HTTP requests
pub struct Fetch;

impl Fetch {
    /// Create a GET request
    pub fn get<'a>(client: &'a Client, url: &str) -> FetchBuilder<'a> {
        FetchBuilder::new(client, url, Method::GET)
    }

    /// Create a POST request
    pub fn post<'a>(client: &'a Client, url: &str) -> FetchBuilder<'a> {
        FetchBuilder::new(client, url, Method::POST)
    }

    /// Create a PUT request
    pub fn put<'a>(client: &'a Client, url: &str) -> FetchBuilder<'a> {
        FetchBuilder::new(client, url, Method::PUT)
    }

    /// Create a DELETE request
    pub fn delete<'a>(client: &'a Client, url: &str) -> FetchBuilder<'a> {
        FetchBuilder::new(client, url, Method::DELETE)
    }
}
