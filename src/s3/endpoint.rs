use aws_sdk_s3::config::endpoint::{
    DefaultResolver, EndpointFuture, InvalidParams, Params, ResolveEndpoint,
};

pub const SERVICE: &str = "s3";

/// Picks the endpoint to contact: a fixed override when one is configured,
/// otherwise nothing, leaving resolution to the SDK defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EndpointResolver {
    override_url: Option<String>,
}

impl EndpointResolver {
    pub fn new(override_url: Option<String>) -> Self {
        Self {
            override_url: override_url.filter(|url| !url.is_empty()),
        }
    }

    pub fn override_url(&self) -> Option<&str> {
        self.override_url.as_deref()
    }

    /// The override applies to every service and region alike.
    pub fn endpoint_for(&self, _service: &str, _region: &str) -> Option<&str> {
        self.override_url()
    }
}

/// Adapts [`EndpointResolver`] to the S3 client's endpoint resolution.
#[derive(Debug)]
pub struct SessionResolver {
    resolver: EndpointResolver,
    default: DefaultResolver,
}

impl SessionResolver {
    pub fn new(resolver: EndpointResolver) -> Self {
        Self {
            resolver,
            default: DefaultResolver::new(),
        }
    }

    /// Same parameters, pointed at `base` with the bucket addressed path-style.
    fn with_override(params: &Params, base: &str) -> Result<Params, InvalidParams> {
        Params::builder()
            .set_bucket(params.bucket().map(str::to_owned))
            .set_region(params.region().map(str::to_owned))
            .set_use_fips(params.use_fips())
            .set_use_dual_stack(params.use_dual_stack())
            .endpoint(base)
            .force_path_style(true)
            .set_accelerate(params.accelerate())
            .set_use_global_endpoint(params.use_global_endpoint())
            .set_use_object_lambda_endpoint(params.use_object_lambda_endpoint())
            .set_key(params.key().map(str::to_owned))
            .set_prefix(params.prefix().map(str::to_owned))
            .set_copy_source(params.copy_source().map(str::to_owned))
            .set_disable_access_points(params.disable_access_points())
            .set_disable_multi_region_access_points(params.disable_multi_region_access_points())
            .set_use_arn_region(params.use_arn_region())
            .set_use_s3_express_control_endpoint(params.use_s3_express_control_endpoint())
            .set_disable_s3_express_session_auth(params.disable_s3_express_session_auth())
            .build()
    }
}

impl ResolveEndpoint for SessionResolver {
    fn resolve_endpoint<'a>(&'a self, params: &'a Params) -> EndpointFuture<'a> {
        let region = params.region().unwrap_or_default();
        let Some(base) = self.resolver.endpoint_for(SERVICE, region) else {
            return self.default.resolve_endpoint(params);
        };
        tracing::trace!(endpoint = base, region, "using endpoint override");
        match Self::with_override(params, base) {
            Ok(params) => {
                EndpointFuture::new(async move { self.default.resolve_endpoint(&params).await })
            }
            Err(err) => EndpointFuture::ready(Err(err.into())),
        }
    }
}
