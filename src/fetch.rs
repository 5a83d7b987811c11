use std::{
    io::{BufRead, BufReader},
    time::Duration,
};

use log::debug;
use reqwest::blocking::Client;
use url::Url;

use crate::{
    config::{DEFAULT_CONNECT_TIMEOUT_MS, DEFAULT_READ_TIMEOUT_MS, ResolveConfig},
    error::FetchError,
};

/// A fetched resource: the URL the server finally answered from (after
/// redirects) and its body as a byte stream.
///
/// The stream is released when the resource is dropped.
pub struct FetchedResource {
    pub resolved_uri: String,
    pub reader: Box<dyn BufRead>,
}

/// Network seam of the resolver.
///
/// The resolver never touches the network itself; everything it fetches
/// goes through this trait, so embedders can substitute their own
/// transport (or an in-memory one, as the tests do).
pub trait Fetch {
    fn fetch(&self, uri: &str) -> Result<FetchedResource, FetchError>;
}

/// [`Fetch`] implementation over a blocking HTTP client.
///
/// Redirects are followed by the client; connect and read timeouts bound
/// each fetch (6 seconds each unless configured otherwise).
pub struct HttpFetcher {
    http_client: Client,
}

impl HttpFetcher {
    pub fn new(config: &ResolveConfig) -> Self {
        let mut builder = Client::builder()
            .connect_timeout(Duration::from_millis(
                config
                    .connect_timeout_ms
                    .unwrap_or(DEFAULT_CONNECT_TIMEOUT_MS),
            ))
            .timeout(Duration::from_millis(
                config.read_timeout_ms.unwrap_or(DEFAULT_READ_TIMEOUT_MS),
            ));

        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent);
        }

        Self {
            http_client: builder.build().unwrap(),
        }
    }
}

impl Fetch for HttpFetcher {
    fn fetch(&self, uri: &str) -> Result<FetchedResource, FetchError> {
        let url = Url::parse(uri)?;

        debug!("GET {}", url);
        let response = self.http_client.get(url).send()?;

        if !response.status().is_success() {
            return Err(FetchError::RequestNotSuccess(response.status().as_u16()));
        }

        let resolved_uri = response.url().to_string();

        Ok(FetchedResource {
            resolved_uri,
            reader: Box::new(BufReader::new(response)),
        })
    }
}
