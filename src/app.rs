use std::future::Future;
use std::io::Write;

use anyhow::Context as _;

use crate::cli::{Args, USAGE};
use crate::config::Environment;
use crate::s3::{self, EndpointResolver, ObjectStore, SessionError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Disabled,
    Usage,
    Uploaded,
    Failed,
}

/// Runs one invocation of the tool, writing its messages to `out`.
///
/// Flags are only parsed once the tool is known to be enabled, and the store
/// is only connected once a complete upload request exists. Only a failure to
/// connect is returned as an error.
pub async fn run<P, C, Fut, S, W>(
    env: Environment,
    parse: P,
    connect: C,
    out: &mut W,
) -> anyhow::Result<Outcome>
where
    P: FnOnce() -> Args,
    C: FnOnce(EndpointResolver) -> Fut,
    Fut: Future<Output = Result<S, SessionError>>,
    S: ObjectStore,
    W: Write,
{
    if env.disabled {
        writeln!(out, "AWS things are disabled. good bye!")?;
        return Ok(Outcome::Disabled);
    }
    let resolver = EndpointResolver::new(env.endpoint_url);

    let Some(request) = parse().into_request() else {
        writeln!(out, "{USAGE}")?;
        return Ok(Outcome::Usage);
    };
    tracing::debug!(?request, "parsed upload request");

    let store = connect(resolver)
        .await
        .context("failed to create AWS session")?;

    match s3::put_file(&store, &request).await {
        Ok(()) => Ok(Outcome::Uploaded),
        Err(err) => {
            writeln!(out, "Got error uploading file:")?;
            writeln!(out, "{err}")?;
            Ok(Outcome::Failed)
        }
    }
}
