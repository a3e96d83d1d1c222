//! Serde mirrors of the basket contract API and the CW20 messages the
//! CLI exchanges with it. Amounts travel as decimal strings on the wire,
//! matching the contract's JSON encoding.

use std::fmt;

use base64::prelude::{Engine as _, BASE64_STANDARD};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use serde_with::{serde_as, DisplayFromStr};

use crate::Result;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum ExecuteMsg {
    DepositLiquidity {
        assets: Vec<Asset>,
        slippage_tolerance: Option<String>,
        receiver: Option<String>,
    },
    Swap {
        sender: String,
        offer_asset: Asset,
        belief_price: Option<String>,
        max_spread: Option<String>,
        to: Option<String>,
        ask_asset: AssetInfo,
    },
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum QueryMsg {
    Basket {},
}

/// Hook messages carried inside a CW20 `Send` towards the basket.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Cw20HookMsg {
    Swap {
        belief_price: Option<String>,
        max_spread: Option<String>,
        to: Option<String>,
        ask_asset: AssetInfo,
    },
    WithdrawLiquidity { basket_asset: BasketAsset },
}

#[serde_as]
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Asset {
    pub info: AssetInfo,
    #[serde_as(as = "DisplayFromStr")]
    pub amount: u128,
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.info)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum AssetInfo {
    Token { contract_addr: String },
    NativeToken { denom: String },
}

impl AssetInfo {
    pub fn is_native_token(&self) -> bool {
        matches!(self, AssetInfo::NativeToken { .. })
    }
}

impl fmt::Display for AssetInfo {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AssetInfo::NativeToken { denom } => write!(f, "{denom}"),
            AssetInfo::Token { contract_addr } => write!(f, "{contract_addr}"),
        }
    }
}

/// Basket state as returned by `QueryMsg::Basket`. Fields the CLI does
/// not interpret are kept verbatim in `extra`.
#[serde_as]
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Basket {
    pub name: String,
    pub assets: Vec<BasketAsset>,
    pub lp_token_address: String,
    pub admin: String,
    #[serde_as(as = "DisplayFromStr")]
    pub swap_fee_basis_points: u128,
    #[serde_as(as = "DisplayFromStr")]
    pub mint_burn_basis_points: u128,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Basket {
    pub fn asset(&self, info: &AssetInfo) -> Option<&BasketAsset> {
        self.assets.iter().find(|asset| &asset.info == info)
    }
}

/// One whitelisted asset of the basket. The withdraw hook embeds this
/// struct back into the contract, so unknown fields must round-trip
/// through `extra` unchanged.
#[serde_as]
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct BasketAsset {
    pub info: AssetInfo,
    #[serde_as(as = "DisplayFromStr")]
    pub token_weight: u128,
    #[serde_as(as = "DisplayFromStr")]
    pub available_reserves: u128,
    #[serde_as(as = "DisplayFromStr")]
    pub occupied_reserves: u128,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[serde_as]
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Cw20ExecuteMsg {
    Send {
        contract: String,
        #[serde_as(as = "DisplayFromStr")]
        amount: u128,
        /// Base64 of the JSON hook message.
        msg: String,
    },
}

impl Cw20ExecuteMsg {
    pub fn send(contract: &str, amount: u128, hook: &Cw20HookMsg) -> Result<Self> {
        Ok(Self::Send {
            contract: contract.into(),
            amount,
            msg: BASE64_STANDARD.encode(serde_json::to_vec(hook)?),
        })
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Cw20QueryMsg {
    Balance { address: String },
    TokenInfo {},
}

#[serde_as]
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct BalanceResponse {
    #[serde_as(as = "DisplayFromStr")]
    pub balance: u128,
}

#[serde_as]
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TokenInfoResponse {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    #[serde_as(as = "DisplayFromStr")]
    pub total_supply: u128,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deposit_liquidity_wire_shape() {
        let msg = ExecuteMsg::DepositLiquidity {
            assets: vec![Asset {
                info: AssetInfo::NativeToken {
                    denom: "uluna".into(),
                },
                amount: 1_000_000,
            }],
            slippage_tolerance: Some("0.01".into()),
            receiver: None,
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "deposit_liquidity": {
                    "assets": [
                        {"info": {"native_token": {"denom": "uluna"}}, "amount": "1000000"}
                    ],
                    "slippage_tolerance": "0.01",
                    "receiver": null,
                }
            })
        );
    }

    #[test]
    fn query_msg_wire_shape() {
        let json = serde_json::to_value(QueryMsg::Basket {}).unwrap();
        assert_eq!(json, serde_json::json!({"basket": {}}));
    }

    #[test]
    fn basket_asset_round_trips_unknown_fields() {
        let raw = serde_json::json!({
            "info": {"token": {"contract_addr": "terra1token"}},
            "token_weight": "30",
            "available_reserves": "123456",
            "occupied_reserves": "0",
            "cumulative_funding_rate": "0",
            "ticker_data": {"testnet_price_feed": "deadbeef"},
            "stable_token": false,
        });
        let asset: BasketAsset = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(asset.token_weight, 30);
        assert_eq!(asset.available_reserves, 123_456);
        assert_eq!(serde_json::to_value(&asset).unwrap(), raw);
    }

    #[test]
    fn cw20_send_encodes_hook_as_base64() {
        let hook = Cw20HookMsg::Swap {
            belief_price: None,
            max_spread: None,
            to: None,
            ask_asset: AssetInfo::NativeToken {
                denom: "uusd".into(),
            },
        };
        let Cw20ExecuteMsg::Send { msg, amount, .. } =
            Cw20ExecuteMsg::send("terra1basket", 42, &hook).unwrap();
        assert_eq!(amount, 42);
        let decoded: Cw20HookMsg =
            serde_json::from_slice(&BASE64_STANDARD.decode(msg).unwrap()).unwrap();
        assert_eq!(decoded, hook);
    }

    #[test]
    fn cw20_balance_response_parses_string_amount() {
        let resp: BalanceResponse = serde_json::from_str(r#"{"balance":"98765"}"#).unwrap();
        assert_eq!(resp.balance, 98_765);
    }
}
