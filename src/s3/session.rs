use aws_config::meta::region::RegionProviderChain;
use aws_config::BehaviorVersion;
use aws_sdk_s3 as s3;
use aws_types::region::Region;

use super::endpoint::{EndpointResolver, SessionResolver};

const DEFAULT_REGION: &str = "us-east-1";

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("invalid endpoint url {url:?}: {source}")]
    InvalidEndpoint {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("endpoint url {0:?} is not an absolute url")]
    RelativeEndpoint(String),
}

/// SDK configuration and the S3 client built from it.
#[derive(Debug, Clone)]
pub struct Session {
    client: s3::Client,
}

impl Session {
    pub async fn new(resolver: EndpointResolver) -> Result<Self, SessionError> {
        if let Some(url) = resolver.override_url() {
            validate_endpoint(url)?;
            tracing::info!(endpoint = url, "endpoint override configured");
        }

        let region_provider = RegionProviderChain::default_provider()
            .or_else(Region::new(DEFAULT_REGION));
        let config = aws_config::defaults(BehaviorVersion::latest())
            .region(region_provider)
            .load()
            .await;
        tracing::debug!(region = ?config.region(), "loaded aws config");

        let s3_config = s3::config::Builder::from(&config)
            .endpoint_resolver(SessionResolver::new(resolver))
            .build();
        Ok(Self {
            client: s3::Client::from_conf(s3_config),
        })
    }

    pub fn into_client(self) -> s3::Client {
        self.client
    }
}

fn validate_endpoint(url: &str) -> Result<(), SessionError> {
    let parsed = url::Url::parse(url).map_err(|source| SessionError::InvalidEndpoint {
        url: url.to_owned(),
        source,
    })?;
    if parsed.cannot_be_a_base() {
        return Err(SessionError::RelativeEndpoint(url.to_owned()));
    }
    Ok(())
}
