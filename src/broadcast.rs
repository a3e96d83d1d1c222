use anyhow::Context;
use base64::prelude::{Engine as _, BASE64_STANDARD};
use cosmos_sdk_proto::cosmos::tx::v1beta1::{
    service_client::ServiceClient, BroadcastMode, BroadcastTxRequest, BroadcastTxResponse,
    SimulateRequest, Tx,
};
use prost::Message;
use tendermint_rpc::endpoint::broadcast::tx_sync::Response as TendermintResponse;
use tendermint_rpc::{Client, HttpClient};

use crate::Result;

pub fn create_broadcast_sync_payload(tx: &Tx) -> BroadcastTxRequest {
    BroadcastTxRequest {
        tx_bytes: tx.encode_to_vec(),
        mode: BroadcastMode::Sync.into(),
    }
}

pub async fn broadcast_via_grpc(endpoint: &str, signed_tx: &Tx) -> Result<BroadcastTxResponse> {
    let broadcast_req = create_broadcast_sync_payload(signed_tx);
    let mut service_client = ServiceClient::connect(endpoint.to_owned()).await?;
    Ok(service_client
        .broadcast_tx(broadcast_req)
        .await?
        .into_inner())
}

pub async fn broadcast_via_tendermint_rpc(
    endpoint: &str,
    signed_tx: &Tx,
) -> Result<TendermintResponse> {
    let rpc_client = HttpClient::new(endpoint)?;

    Ok(rpc_client
        .broadcast_tx_sync(signed_tx.encode_to_vec())
        .await?)
}

pub fn broadcast_via_rest(endpoint: &str, signed_tx: &Tx) -> Result<serde_json::Value> {
    let body = serde_json::json!({
        "tx_bytes": BASE64_STANDARD.encode(signed_tx.encode_to_vec()),
        "mode": "BROADCAST_MODE_SYNC",
    });
    let url = format!("{endpoint}/cosmos/tx/v1beta1/txs");
    Ok(ureq::post(&url).send_json(body)?.into_json()?)
}

/// Gas used by the signed transaction according to the node.
pub async fn simulate_via_grpc(endpoint: &str, tx: &Tx) -> Result<u64> {
    let sim_req = SimulateRequest {
        tx_bytes: tx.encode_to_vec(),
        ..Default::default()
    };
    let mut service_client = ServiceClient::connect(endpoint.to_owned()).await?;
    let resp = service_client.simulate(sim_req).await?.into_inner();
    Ok(resp
        .gas_info
        .context("simulate returned no gas info")?
        .gas_used)
}
