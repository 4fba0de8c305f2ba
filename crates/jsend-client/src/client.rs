use crate::config::{ClientConfig, ConfigError};
use crate::transport::{HttpMethod, HttpRequest, ReqwestTransport, Transport, TransportError};
use jsend::{EnvelopeParser, JSendParser, JSendResult, ParseError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, instrument};

#[derive(Error, Debug)]
pub enum ClientError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("Failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Relative path {path} requires a base URL")]
    MissingBaseUrl { path: String },
}

/// Sends HTTP requests and parses every response as JSend.
///
/// Responses are parsed whatever their HTTP status, since fail and error
/// envelopes usually arrive with 4xx and 5xx codes.
pub struct JSendClient<P = EnvelopeParser, Tr = ReqwestTransport> {
    parser: P,
    transport: Tr,
    base_url: Option<String>,
}

impl JSendClient {
    pub fn from_config(config: ClientConfig) -> Result<Self, ClientError> {
        config.validate()?;
        let transport = ReqwestTransport::new(&config)?;

        Ok(Self {
            parser: EnvelopeParser::new(config.parse_policy),
            transport,
            base_url: config.base_url,
        })
    }

    pub fn from_env() -> Result<Self, ClientError> {
        Self::from_config(ClientConfig::from_env()?)
    }
}

impl<P: JSendParser, Tr: Transport> JSendClient<P, Tr> {
    pub fn new(parser: P, transport: Tr) -> Self {
        Self {
            parser,
            transport,
            base_url: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    #[instrument(skip(self))]
    pub fn get<T: DeserializeOwned>(&self, path: &str) -> Result<JSendResult<T>, ClientError> {
        self.send(HttpRequest::new(HttpMethod::Get, self.resolve(path)?))
    }

    #[instrument(skip(self, body))]
    pub fn post<T, B>(&self, path: &str, body: &B) -> Result<JSendResult<T>, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(self.json_request(HttpMethod::Post, path, body)?)
    }

    #[instrument(skip(self, body))]
    pub fn put<T, B>(&self, path: &str, body: &B) -> Result<JSendResult<T>, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(self.json_request(HttpMethod::Put, path, body)?)
    }

    #[instrument(skip(self))]
    pub fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<JSendResult<T>, ClientError> {
        self.send(HttpRequest::new(HttpMethod::Delete, self.resolve(path)?))
    }

    pub fn send<T: DeserializeOwned>(&self, request: HttpRequest) -> Result<JSendResult<T>, ClientError> {
        let response = self.transport.send(request)?;
        debug!(
            status = response.status,
            content_type = response.content_type.as_deref().unwrap_or("none"),
            no_content = response.is_no_content(),
            "Parsing JSend response"
        );
        if !response.is_json() {
            debug!("Response is not declared as JSON, parsing the body anyway");
        }
        Ok(self.parser.parse(response.body())?)
    }

    fn json_request<B: Serialize + ?Sized>(
        &self,
        method: HttpMethod,
        path: &str,
        body: &B,
    ) -> Result<HttpRequest, ClientError> {
        let encoded = serde_json::to_vec(body).map_err(ClientError::Encode)?;
        Ok(HttpRequest::new(method, self.resolve(path)?).with_json_body(encoded))
    }

    fn resolve(&self, path: &str) -> Result<String, ClientError> {
        if path.starts_with("http://") || path.starts_with("https://") {
            return Ok(path.to_string());
        }

        match &self.base_url {
            Some(base_url) => Ok(format!(
                "{}/{}",
                base_url.trim_end_matches('/'),
                path.trim_start_matches('/')
            )),
            None => Err(ClientError::MissingBaseUrl {
                path: path.to_string(),
            }),
        }
    }
}
