use std::collections::HashMap;

use base64::prelude::{Engine as _, BASE64_STANDARD};
use cosmos_sdk_proto::cosmos::auth::v1beta1::{
    query_client::QueryClient as QueryAccountClient, QueryAccountRequest, QueryAccountResponse,
};
use cosmos_sdk_proto::cosmos::bank::v1beta1::{
    query_client::QueryClient as QueryBankClient, QueryAllBalancesRequest, QueryTotalSupplyRequest,
};
use cosmos_sdk_proto::cosmwasm::wasm::v1::{
    query_client::QueryClient as WasmQueryClient, QuerySmartContractStateRequest,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tendermint_rpc::Client;
use tracing::{debug, info};

use crate::basket::{
    BalanceResponse, Basket, Cw20QueryMsg, QueryMsg, TokenInfoResponse,
};
use crate::Result;

pub async fn get_account_info(endpoint: &str, address: &str) -> Result<QueryAccountResponse> {
    let q = QueryAccountRequest {
        address: address.into(),
    };
    let mut client = QueryAccountClient::connect(endpoint.to_owned()).await?;
    Ok(client.account(q).await?.into_inner())
}

pub async fn validate_rpc(endpoint: &str) -> Result<()> {
    let rpc_client = tendermint_rpc::HttpClient::new(endpoint)?;
    let resp = rpc_client.status().await?;
    debug!("[RPC] {:?}", resp.node_info.network);
    Ok(())
}

pub async fn validate_grpc(endpoint: &str) -> Result<()> {
    let q = QueryTotalSupplyRequest::default();
    let mut client = QueryBankClient::connect(endpoint.to_owned()).await?;
    let resp = client.total_supply(q).await?.into_inner();
    debug!("[gRPC] {} denoms in total supply", resp.supply.len());
    Ok(())
}

pub fn validate_rest(endpoint: &str) -> Result<()> {
    let url = format!("{endpoint}/cosmos/base/tendermint/v1beta1/node_info");
    let resp: serde_json::Value = ureq::get(&url).call()?.into_json()?;
    debug!("[REST] {:?}", resp.pointer("/default_node_info/network"));
    Ok(())
}

pub async fn get_balance(address: &str, endpoint: &str) -> Result<Vec<(String, u128)>> {
    let q = QueryAllBalancesRequest {
        address: address.into(),
        ..Default::default()
    };

    let mut client = QueryBankClient::connect(endpoint.to_owned()).await?;
    let resp = client.all_balances(q).await?.into_inner();

    info!("[Balance] {:?}", resp);

    resp.balances
        .into_iter()
        .map(|c| Ok((c.denom, c.amount.parse()?)))
        .collect::<Result<Vec<_>>>()
}

pub async fn smart_query_grpc<Q, R>(endpoint: &str, contract: &str, query: &Q) -> Result<R>
where
    Q: Serialize,
    R: DeserializeOwned,
{
    let q = QuerySmartContractStateRequest {
        address: contract.into(),
        query_data: serde_json::to_vec(query)?,
    };
    let mut client = WasmQueryClient::connect(endpoint.to_owned()).await?;
    let resp = client.smart_contract_state(q).await?.into_inner();
    Ok(serde_json::from_slice(&resp.data)?)
}

#[derive(Deserialize)]
struct SmartQueryResponse<R> {
    data: R,
}

/// LCD flavour of the smart query, for nodes that only expose REST.
pub fn smart_query_rest<Q, R>(endpoint: &str, contract: &str, query: &Q) -> Result<R>
where
    Q: Serialize,
    R: DeserializeOwned,
{
    let query_b64 = BASE64_STANDARD.encode(serde_json::to_vec(query)?);
    let url = format!("{endpoint}/cosmwasm/wasm/v1/contract/{contract}/smart/{query_b64}");
    let resp: SmartQueryResponse<R> = ureq::get(&url).call()?.into_json()?;
    Ok(resp.data)
}

pub async fn get_basket(endpoint: &str, contract: &str) -> Result<Basket> {
    smart_query_grpc(endpoint, contract, &QueryMsg::Basket {}).await
}

pub async fn get_cw20_balance(
    endpoint: &str,
    token: &str,
    address: &str,
) -> Result<BalanceResponse> {
    smart_query_grpc(
        endpoint,
        token,
        &Cw20QueryMsg::Balance {
            address: address.into(),
        },
    )
    .await
}

pub async fn get_cw20_token_info(endpoint: &str, token: &str) -> Result<TokenInfoResponse> {
    smart_query_grpc(endpoint, token, &Cw20QueryMsg::TokenInfo {}).await
}

/// Gas prices by denom from an FCD-style endpoint, as decimal strings.
pub fn get_gas_prices(endpoint: &str) -> Result<HashMap<String, String>> {
    let url = format!("{endpoint}/v1/txs/gas_prices");
    Ok(ureq::get(&url).call()?.into_json()?)
}

#[cfg(test)]
mod tests {
    use httpmock::prelude::*;

    use super::*;
    use crate::basket::AssetInfo;

    #[test]
    fn rest_smart_query_decodes_data_envelope() {
        let server = MockServer::start();
        let query_b64 = BASE64_STANDARD.encode(serde_json::to_vec(&QueryMsg::Basket {}).unwrap());

        let mock = server.mock(|when, then| {
            when.method(GET)
                .path(format!("/cosmwasm/wasm/v1/contract/terra1basket/smart/{query_b64}"));
            then.status(200).json_body(serde_json::json!({
                "data": {
                    "name": "tilt basket",
                    "assets": [{
                        "info": {"native_token": {"denom": "uluna"}},
                        "token_weight": "100",
                        "available_reserves": "5000000",
                        "occupied_reserves": "0",
                    }],
                    "lp_token_address": "terra1lptoken",
                    "admin": "terra1admin",
                    "swap_fee_basis_points": "30",
                    "mint_burn_basis_points": "25",
                    "tax_basis_points": "8",
                }
            }));
        });

        let basket: Basket =
            smart_query_rest(&server.base_url(), "terra1basket", &QueryMsg::Basket {}).unwrap();

        mock.assert();
        assert_eq!(basket.name, "tilt basket");
        assert_eq!(basket.lp_token_address, "terra1lptoken");
        assert_eq!(basket.swap_fee_basis_points, 30);
        assert!(basket
            .asset(&AssetInfo::NativeToken {
                denom: "uluna".into()
            })
            .is_some());
        // untyped state fields survive
        assert_eq!(basket.extra["tax_basis_points"], "8");
    }

    #[test]
    fn gas_prices_parse_as_decimal_strings() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/v1/txs/gas_prices");
            then.status(200)
                .json_body(serde_json::json!({"uluna": "0.01133", "uusd": "0.15"}));
        });

        let prices = get_gas_prices(&server.base_url()).unwrap();
        assert_eq!(prices["uusd"], "0.15");
    }

    #[test]
    fn rest_validation_accepts_node_info() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/cosmos/base/tendermint/v1beta1/node_info");
            then.status(200)
                .json_body(serde_json::json!({"default_node_info": {"network": "columbus-5"}}));
        });

        validate_rest(&server.base_url()).unwrap();
    }
}
