use anyhow::Context;
use clap::Subcommand;

use crate::basket::QueryMsg;
use crate::endpoint::first_live_grpc;
use crate::error::Error;
use crate::query::{
    get_balance, get_basket, get_cw20_balance, get_cw20_token_info, get_gas_prices,
    smart_query_rest,
};
use crate::utils::format_units;
use crate::Result;

use super::{load_account, load_chain};

#[derive(Subcommand, Debug)]
pub enum Query {
    /// Print the basket state.
    Basket,
    /// LP token balance of a configured account.
    LpBalance { account: String },
    /// Bank balances of a configured account.
    Balances { account: String },
    /// Gas prices published by the chain's FCD endpoint.
    GasPrices,
}

impl Query {
    pub async fn run(&self, chain_id: &str, grpc: Option<&str>) -> Result<()> {
        let chain = load_chain(chain_id)?;

        match &self {
            Self::Basket => {
                let basket = match first_live_grpc(&chain, grpc).await {
                    Ok(endpoint) => get_basket(&endpoint, chain.basket_contract()?).await?,
                    // REST-only nodes still serve the smart query over LCD
                    Err(err) => {
                        let rest = chain.rest_endpoints.first().ok_or(err)?;
                        smart_query_rest(rest, chain.basket_contract()?, &QueryMsg::Basket {})?
                    }
                };
                println!("{}", serde_json::to_string_pretty(&basket)?);
                Ok(())
            }
            Self::LpBalance { account } => {
                let endpoint = first_live_grpc(&chain, grpc).await?;
                let address = load_account(account)?.address(&chain.prefix)?;

                let basket = get_basket(&endpoint, chain.basket_contract()?).await?;
                let lp_token = &basket.lp_token_address;

                let balance = get_cw20_balance(&endpoint, lp_token, &address).await?;
                let token_info = get_cw20_token_info(&endpoint, lp_token).await?;

                println!(
                    "{} : {} {}",
                    address,
                    format_units(balance.balance, token_info.decimals),
                    token_info.symbol,
                );
                Ok(())
            }
            Self::Balances { account } => {
                let endpoint = first_live_grpc(&chain, grpc).await?;
                let address = load_account(account)?.address(&chain.prefix)?;

                for (denom, amount) in get_balance(&address, &endpoint).await? {
                    println!("{amount} {denom}");
                }
                Ok(())
            }
            Self::GasPrices => {
                let endpoint = chain
                    .fcd_endpoints
                    .first()
                    .ok_or_else(|| Error::NoLiveEndpoint(chain.chain_id.clone(), "fcd"))?;
                let prices = get_gas_prices(endpoint)?;
                println!("{}", serde_json::to_string_pretty(&prices)?);
                Ok(())
            }
        }
    }
}

/// Gas price for `denom`, tried across the chain's FCD endpoints.
pub(crate) fn gas_price_for(chain: &crate::chain::Chain, denom: &str) -> Result<String> {
    let prices = chain
        .fcd_endpoints
        .iter()
        .find_map(|endpoint| get_gas_prices(endpoint).ok())
        .ok_or_else(|| Error::NoLiveEndpoint(chain.chain_id.clone(), "fcd"))?;
    prices
        .get(denom)
        .cloned()
        .with_context(|| Error::MissingGasPrice(denom.into()))
}
