use std::time::Duration;

use futures::StreamExt;
use url::Url;

use crate::chain::Chain;
use crate::error::Error;
use crate::query::{validate_grpc, validate_rpc};
use crate::Result;

const PROBE_TIMEOUT: Duration = Duration::from_secs(2);

fn normalized(endpoint: &str) -> Result<String> {
    let url: Url = endpoint.parse()?;
    Ok(url.to_string().trim_end_matches('/').to_owned())
}

/// Configured gRPC endpoints that answer a probe query, in order.
pub async fn live_grpc_endpoints(chain: &Chain) -> Vec<String> {
    futures::stream::iter(chain.grpc_endpoints.clone())
        .then(|endpoint| async move {
            let endpoint = normalized(&endpoint)?;
            tokio::time::timeout(PROBE_TIMEOUT, validate_grpc(&endpoint)).await??;
            Result::Ok(endpoint)
        })
        .filter_map(|x| async { x.ok() })
        .collect()
        .await
}

/// Configured tendermint RPC endpoints that report a status, in order.
pub async fn live_rpc_endpoints(chain: &Chain) -> Vec<String> {
    futures::stream::iter(chain.rpc_endpoints.clone())
        .then(|endpoint| async move {
            let endpoint = normalized(&endpoint)?;
            tokio::time::timeout(PROBE_TIMEOUT, validate_rpc(&endpoint)).await??;
            Result::Ok(endpoint)
        })
        .filter_map(|x| async { x.ok() })
        .collect()
        .await
}

pub async fn first_live_grpc(chain: &Chain, overriding: Option<&str>) -> Result<String> {
    if let Some(endpoint) = overriding {
        return normalized(endpoint);
    }
    live_grpc_endpoints(chain)
        .await
        .into_iter()
        .next()
        .ok_or_else(|| Error::NoLiveEndpoint(chain.chain_id.clone(), "grpc").into())
}
