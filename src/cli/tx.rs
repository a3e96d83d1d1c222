use anyhow::Context;
use clap::Subcommand;
use cosmos_sdk_proto::cosmos::base::v1beta1::Coin;
use cosmos_sdk_proto::cosmwasm::wasm::v1::MsgExecuteContract;
use futures::StreamExt;
use tracing::{debug, info};

use crate::basket::{Asset, AssetInfo};
use crate::endpoint::{first_live_grpc, live_rpc_endpoints};
use crate::error::Error;
use crate::msg::MSG_EXECUTE_CONTRACT_TYPE_URL;
use crate::utils::{mul_ceil_dec, pack_any};
use crate::Result;

use super::query::gas_price_for;
use super::utils::{custom_amount, custom_asset, custom_asset_info, custom_coin};
use super::{load_account, load_chain};

#[derive(Subcommand, Debug)]
pub enum Transaction {
    /// Deposit assets into the basket in exchange for LP tokens.
    Deposit {
        sender: String,
        /// Assets such as `1000000uluna` or `500terra1token...`.
        #[clap(required = true, value_parser(custom_asset))]
        assets: Vec<Asset>,
        #[clap(long)]
        slippage_tolerance: Option<String>,
        #[clap(long)]
        receiver: Option<String>,
    },
    /// Swap one basket asset for another.
    Swap {
        sender: String,
        #[clap(value_parser(custom_asset))]
        offer: Asset,
        #[clap(value_parser(custom_asset_info))]
        ask: AssetInfo,
        #[clap(long)]
        belief_price: Option<String>,
        #[clap(long)]
        max_spread: Option<String>,
        /// Receiver of the ask asset, defaults to the sender.
        #[clap(long)]
        to: Option<String>,
    },
    /// Burn LP tokens and withdraw one basket asset.
    Withdraw {
        sender: String,
        #[clap(value_parser(custom_amount))]
        amount: u128,
        #[clap(value_parser(custom_asset_info))]
        asset: AssetInfo,
    },
    /// Execute a raw JSON message on any contract.
    Execute {
        sender: String,
        contract: String,
        json: String,
        #[clap(long, value_parser(custom_coin))]
        funds: Vec<Coin>,
    },
}

impl Transaction {
    pub async fn run(
        &self,
        dry_run: bool,
        chain_id: &str,
        grpc: Option<&str>,
        rpc: Option<&str>,
        fee: Option<&Coin>,
    ) -> Result<()> {
        let chain = load_chain(chain_id)?;
        let hrp = chain.prefix.as_str();
        let fee_granter = "";

        let grpc_endpoint = first_live_grpc(&chain, grpc).await?;
        info!("using {grpc_endpoint}");

        let (owner, execute_msg) = match &self {
            Self::Deposit {
                sender,
                assets,
                slippage_tolerance,
                receiver,
            } => {
                let owner = load_account(sender)?;
                let msg = crate::msg::deposit_liquidity(
                    &owner.address(hrp)?,
                    chain.basket_contract()?,
                    assets,
                    slippage_tolerance.clone(),
                    receiver.clone(),
                )?;
                (owner, msg)
            }
            Self::Swap {
                sender,
                offer,
                ask,
                belief_price,
                max_spread,
                to,
            } => {
                let owner = load_account(sender)?;
                let msg = crate::msg::swap(
                    &owner.address(hrp)?,
                    chain.basket_contract()?,
                    offer.clone(),
                    ask.clone(),
                    belief_price.clone(),
                    max_spread.clone(),
                    to.clone(),
                )?;
                (owner, msg)
            }
            Self::Withdraw {
                sender,
                amount,
                asset,
            } => {
                let owner = load_account(sender)?;
                let basket_contract = chain.basket_contract()?;

                // the withdraw hook wants the matching basket asset verbatim
                let basket = crate::query::get_basket(&grpc_endpoint, basket_contract).await?;
                let basket_asset = basket
                    .asset(asset)
                    .ok_or_else(|| Error::AssetNotInBasket(asset.to_string()))?
                    .clone();

                let msg = crate::msg::withdraw_liquidity(
                    &owner.address(hrp)?,
                    &basket.lp_token_address,
                    basket_contract,
                    *amount,
                    basket_asset,
                )?;
                (owner, msg)
            }
            Self::Execute {
                sender,
                contract,
                json,
                funds,
            } => {
                let owner = load_account(sender)?;
                let value: serde_json::Value =
                    serde_json::from_str(json).context("message is not valid JSON")?;
                let msg = crate::msg::execute_contract(
                    &owner.address(hrp)?,
                    contract,
                    &value,
                    funds.clone(),
                )?;
                (owner, msg)
            }
        };

        let signed_tx = sign_with_simulated_gas(
            &owner,
            execute_msg,
            &chain,
            fee,
            fee_granter,
            &grpc_endpoint,
        )
        .await?;

        if dry_run {
            println!("{signed_tx:#?}");
            return Ok(());
        }

        broadcast_with_failover(&chain, rpc, &grpc_endpoint, &signed_tx).await
    }
}

/// Simulated gas plus a 25% safety margin.
fn gas_with_margin(needed_gas: u64) -> u64 {
    needed_gas + (needed_gas >> 2)
}

/// Fee precedence: explicit flag, then a non-zero flat per-chain fee,
/// then gas price times gas rounded up. The price lookup only runs in
/// the last case.
fn resolve_fee<F>(
    flag: Option<&Coin>,
    chain_fee: u128,
    denom: &str,
    gas: u64,
    gas_price: F,
) -> Result<(u128, String)>
where
    F: FnOnce() -> Result<String>,
{
    if let Some(Coin { denom, amount }) = flag {
        return Ok((amount.parse()?, denom.clone()));
    }
    if chain_fee > 0 {
        return Ok((chain_fee, denom.to_owned()));
    }
    Ok((mul_ceil_dec(gas as u128, &gas_price()?)?, denom.to_owned()))
}

/// Sign once for simulation, then re-sign with the simulated gas plus a
/// 25% margin and the resolved fee.
async fn sign_with_simulated_gas(
    owner: &crate::account::Account,
    execute_msg: MsgExecuteContract,
    chain: &crate::chain::Chain,
    fee: Option<&Coin>,
    fee_granter: &str,
    grpc_endpoint: &str,
) -> Result<cosmos_sdk_proto::cosmos::tx::v1beta1::Tx> {
    let address = owner.address(&chain.prefix)?;
    let any_msgs = vec![pack_any(MSG_EXECUTE_CONTRACT_TYPE_URL, &execute_msg)];

    let initial_fee = match fee {
        Some(coin) => (coin.amount.parse()?, coin.denom.clone()),
        None => (chain.fee, chain.denom.clone()),
    };

    let (account_number, unsigned_tx) = owner
        .generate_unsigned_transaction(
            &address,
            &any_msgs,
            (initial_fee.0, &initial_fee.1),
            fee_granter,
            grpc_endpoint,
        )
        .await?;

    let probe_tx = owner.sign_unsigned_transaction(&unsigned_tx, &chain.chain_id, account_number)?;
    let needed_gas = crate::broadcast::simulate_via_grpc(grpc_endpoint, &probe_tx).await?;
    let gas = gas_with_margin(needed_gas);

    let (fee_amount, fee_denom) = resolve_fee(fee, chain.fee, &chain.denom, gas, || {
        gas_price_for(chain, &chain.denom)
    })?;
    debug!("gas {gas}, fee {fee_amount}{fee_denom}");

    let unsigned_tx =
        crate::txs::update_tx_with_gas_and_fee(unsigned_tx, gas, fee_amount, &fee_denom)?;
    owner.sign_unsigned_transaction(&unsigned_tx, &chain.chain_id, account_number)
}

async fn broadcast_with_failover(
    chain: &crate::chain::Chain,
    rpc: Option<&str>,
    grpc_endpoint: &str,
    signed_tx: &cosmos_sdk_proto::cosmos::tx::v1beta1::Tx,
) -> Result<()> {
    let rpc_endpoints = match rpc {
        Some(endpoint) => vec![endpoint.to_owned()],
        None => live_rpc_endpoints(chain).await,
    };

    let rpc_result = futures::stream::iter(rpc_endpoints)
        .then(|rpc_endpoint| {
            let signed_tx = signed_tx.clone();
            async move {
                info!("broadcasting via {rpc_endpoint}");
                let resp = tokio::time::timeout(
                    std::time::Duration::from_secs(5),
                    crate::broadcast::broadcast_via_tendermint_rpc(&rpc_endpoint, &signed_tx),
                )
                .await??;

                anyhow::ensure!(resp.code.is_ok(), "broadcast rejected: {}", resp.log);
                Result::Ok(resp)
            }
        })
        .filter_map(|x| async { x.ok() })
        .boxed_local()
        .next()
        .await;

    if let Some(resp) = rpc_result {
        println!("{resp:?}");
        return Ok(());
    }

    if let Some(rest) = chain.rest_endpoints.first() {
        info!("falling back to REST broadcast via {rest}");
        let resp = crate::broadcast::broadcast_via_rest(rest, signed_tx)?;
        println!("{}", serde_json::to_string_pretty(&resp)?);
        return Ok(());
    }

    info!("no live RPC endpoint, broadcasting over gRPC");
    let resp = crate::broadcast::broadcast_via_grpc(grpc_endpoint, signed_tx).await?;
    println!("{resp:?}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gas_margin_adds_a_quarter() {
        assert_eq!(gas_with_margin(200_000), 250_000);
        assert_eq!(gas_with_margin(0), 0);
    }

    #[test]
    fn fee_flag_wins_over_chain_fee_and_gas_price() {
        let flag = Coin {
            denom: "uusd".into(),
            amount: "4500".into(),
        };
        let fee = resolve_fee(Some(&flag), 3000, "uluna", 250_000, || Ok("0.015".into())).unwrap();
        assert_eq!(fee, (4500, "uusd".into()));
    }

    #[test]
    fn flat_chain_fee_wins_over_gas_price() {
        let fee = resolve_fee(None, 3000, "uluna", 250_000, || {
            anyhow::bail!("price lookup must not run")
        })
        .unwrap();
        assert_eq!(fee, (3000, "uluna".into()));
    }

    #[test]
    fn zero_chain_fee_falls_back_to_gas_price() {
        let fee = resolve_fee(None, 0, "uluna", 250_000, || Ok("0.015".into())).unwrap();
        assert_eq!(fee, (3750, "uluna".into()));

        // rounded up, never truncated
        let fee = resolve_fee(None, 0, "uluna", 100, || Ok("0.015".into())).unwrap();
        assert_eq!(fee.0, 2);
    }
}
