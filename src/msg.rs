use anyhow::ensure;
use cosmos_sdk_proto::cosmos::base::v1beta1::Coin;
use cosmos_sdk_proto::cosmwasm::wasm::v1::MsgExecuteContract;
use serde::Serialize;

use crate::basket::{Asset, AssetInfo, BasketAsset, Cw20ExecuteMsg, Cw20HookMsg, ExecuteMsg};
use crate::Result;

pub const MSG_EXECUTE_CONTRACT_TYPE_URL: &str = "/cosmwasm.wasm.v1.MsgExecuteContract";
pub const SECP256K1_PUBKEY_TYPE_URL: &str = "/cosmos.crypto.secp256k1.PubKey";

pub fn execute_contract<M>(
    sender: &str,
    contract: &str,
    msg: &M,
    funds: Vec<Coin>,
) -> Result<MsgExecuteContract>
where
    M: Serialize,
{
    Ok(MsgExecuteContract {
        sender: sender.into(),
        contract: contract.into(),
        msg: serde_json::to_vec(msg)?,
        funds,
    })
}

/// Coins for the native members of `assets`, sorted by denom as the
/// chain requires.
fn native_funds(assets: &[Asset]) -> Vec<Coin> {
    let mut funds: Vec<Coin> = assets
        .iter()
        .filter_map(|asset| match &asset.info {
            AssetInfo::NativeToken { denom } => Some(Coin {
                denom: denom.clone(),
                amount: asset.amount.to_string(),
            }),
            AssetInfo::Token { .. } => None,
        })
        .collect();
    funds.sort_by(|a, b| a.denom.cmp(&b.denom));
    funds
}

pub fn deposit_liquidity(
    sender: &str,
    basket_contract: &str,
    assets: &[Asset],
    slippage_tolerance: Option<String>,
    receiver: Option<String>,
) -> Result<MsgExecuteContract> {
    ensure!(!assets.is_empty(), "deposit needs at least one asset");

    let msg = ExecuteMsg::DepositLiquidity {
        assets: assets.to_vec(),
        slippage_tolerance,
        receiver,
    };

    execute_contract(sender, basket_contract, &msg, native_funds(assets))
}

/// Native offers call the basket directly with funds attached. CW20
/// offers go through the token contract as a `Send` with a swap hook.
#[allow(clippy::too_many_arguments)]
pub fn swap(
    sender: &str,
    basket_contract: &str,
    offer_asset: Asset,
    ask_asset: AssetInfo,
    belief_price: Option<String>,
    max_spread: Option<String>,
    to: Option<String>,
) -> Result<MsgExecuteContract> {
    match offer_asset.info.clone() {
        AssetInfo::NativeToken { denom } => {
            let funds = vec![Coin {
                denom,
                amount: offer_asset.amount.to_string(),
            }];
            let msg = ExecuteMsg::Swap {
                sender: sender.into(),
                offer_asset,
                belief_price,
                max_spread,
                to,
                ask_asset,
            };
            execute_contract(sender, basket_contract, &msg, funds)
        }
        AssetInfo::Token { contract_addr } => {
            let hook = Cw20HookMsg::Swap {
                belief_price,
                max_spread,
                to,
                ask_asset,
            };
            let send = Cw20ExecuteMsg::send(basket_contract, offer_asset.amount, &hook)?;
            execute_contract(sender, &contract_addr, &send, vec![])
        }
    }
}

/// Burns `amount` LP tokens against the basket. The contract expects the
/// target `BasketAsset` verbatim inside the hook.
pub fn withdraw_liquidity(
    sender: &str,
    lp_token: &str,
    basket_contract: &str,
    amount: u128,
    basket_asset: BasketAsset,
) -> Result<MsgExecuteContract> {
    let hook = Cw20HookMsg::WithdrawLiquidity { basket_asset };
    let send = Cw20ExecuteMsg::send(basket_contract, amount, &hook)?;
    execute_contract(sender, lp_token, &send, vec![])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn native(denom: &str, amount: u128) -> Asset {
        Asset {
            info: AssetInfo::NativeToken {
                denom: denom.into(),
            },
            amount,
        }
    }

    #[test]
    fn deposit_attaches_sorted_native_funds() {
        let msg = deposit_liquidity(
            "terra1sender",
            "terra1basket",
            &[native("uusd", 5), native("uluna", 7)],
            None,
            None,
        )
        .unwrap();

        assert_eq!(msg.contract, "terra1basket");
        let denoms: Vec<_> = msg.funds.iter().map(|c| c.denom.as_str()).collect();
        assert_eq!(denoms, ["uluna", "uusd"]);
        assert_eq!(msg.funds[0].amount, "7");
    }

    #[test]
    fn cw20_only_deposit_has_no_funds() {
        let cw20 = Asset {
            info: AssetInfo::Token {
                contract_addr: "terra1token".into(),
            },
            amount: 11,
        };
        let msg =
            deposit_liquidity("terra1sender", "terra1basket", &[cw20], None, None).unwrap();
        assert!(msg.funds.is_empty());
    }

    #[test]
    fn empty_deposit_is_rejected() {
        assert!(deposit_liquidity("terra1sender", "terra1basket", &[], None, None).is_err());
    }

    #[test]
    fn native_swap_targets_basket() {
        let msg = swap(
            "terra1sender",
            "terra1basket",
            native("uluna", 1_000_000),
            AssetInfo::NativeToken {
                denom: "uusd".into(),
            },
            None,
            Some("0.005".into()),
            None,
        )
        .unwrap();

        assert_eq!(msg.contract, "terra1basket");
        assert_eq!(msg.funds.len(), 1);
        assert_eq!(msg.funds[0].denom, "uluna");
        let json: serde_json::Value = serde_json::from_slice(&msg.msg).unwrap();
        assert_eq!(json["swap"]["max_spread"], "0.005");
    }

    #[test]
    fn cw20_swap_goes_through_token_contract() {
        let offer = Asset {
            info: AssetInfo::Token {
                contract_addr: "terra1token".into(),
            },
            amount: 123,
        };
        let msg = swap(
            "terra1sender",
            "terra1basket",
            offer,
            AssetInfo::NativeToken {
                denom: "uusd".into(),
            },
            None,
            None,
            None,
        )
        .unwrap();

        assert_eq!(msg.contract, "terra1token");
        assert!(msg.funds.is_empty());
        let json: serde_json::Value = serde_json::from_slice(&msg.msg).unwrap();
        assert_eq!(json["send"]["contract"], "terra1basket");
        assert_eq!(json["send"]["amount"], "123");
    }

    #[test]
    fn withdraw_sends_lp_tokens_with_hook() {
        let basket_asset: BasketAsset = serde_json::from_value(serde_json::json!({
            "info": {"native_token": {"denom": "uluna"}},
            "token_weight": "50",
            "available_reserves": "1000",
            "occupied_reserves": "0",
        }))
        .unwrap();

        let msg = withdraw_liquidity(
            "terra1sender",
            "terra1lptoken",
            "terra1basket",
            999,
            basket_asset,
        )
        .unwrap();

        assert_eq!(msg.contract, "terra1lptoken");
        let json: serde_json::Value = serde_json::from_slice(&msg.msg).unwrap();
        assert_eq!(json["send"]["contract"], "terra1basket");
        assert_eq!(json["send"]["amount"], "999");
    }
}
