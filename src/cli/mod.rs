use std::collections::HashMap;

use anyhow::Context;
use clap::Parser;
use cosmos_sdk_proto::cosmos::base::v1beta1::Coin;

use crate::account::{Account, KeyStoreBackend};
use crate::chain::Chain;
use crate::error::Error;
use crate::keys::save_key_to_os_from_mmseed;
use crate::utils::{data_local_file, read_data_from_yaml, write_data_as_yaml};
use crate::Result;

pub mod query;
pub mod tx;
pub mod utils;

use utils::{custom_coin, custom_keystorebackend};

#[derive(Parser, Debug)]
#[clap(version, about)]
pub enum Args {
    /// Query chain and basket state.
    Query {
        chain_id: String,
        /// Use this gRPC endpoint instead of the configured ones.
        #[clap(long, short)]
        grpc: Option<String>,
        #[clap(subcommand)]
        query: query::Query,
    },
    /// Sign and broadcast a basket transaction.
    Tx {
        chain_id: String,
        /// Use this RPC endpoint for broadcast.
        #[clap(long, short)]
        rpc: Option<String>,
        /// Use this gRPC endpoint for queries and simulation.
        #[clap(long, short)]
        grpc: Option<String>,
        /// Flat fee such as `3000uluna`, overriding the chain entry.
        #[clap(long, short, value_parser(custom_coin))]
        fee: Option<Coin>,
        /// Build and sign, but do not broadcast.
        #[clap(long)]
        dry_run: bool,
        #[clap(subcommand)]
        transaction: tx::Transaction,
    },
    /// Register a signing account backed by a stored key.
    AddAccount {
        /// `Os:<name>` or `Memory:<name>`.
        #[clap(value_parser(custom_keystorebackend))]
        keystore: KeyStoreBackend,
        key: String,
    },
    /// Prompt for a mnemonic and store the derived key in the OS keyring.
    AddKey {
        key: String,
        #[clap(default_value_t = crate::DEFAULT_COIN_TYPE)]
        coin_type: u64,
    },
    /// Register or update a chain entry.
    AddChain {
        chain_id: String,
        prefix: String,
        denom: String,
        #[clap(long, default_value_t = 0, value_parser(utils::custom_amount))]
        fee: u128,
        #[clap(long, default_value_t = crate::DEFAULT_COIN_TYPE)]
        coin_type: u64,
        /// Basket contract address.
        #[clap(long)]
        basket: Option<String>,
        #[clap(long)]
        rpc: Vec<String>,
        #[clap(long)]
        grpc: Vec<String>,
        #[clap(long)]
        rest: Vec<String>,
        /// FCD-style endpoint publishing gas prices.
        #[clap(long)]
        fcd: Vec<String>,
    },
    /// Point an existing chain entry at a basket contract.
    SetBasket { chain_id: String, address: String },
}

impl Args {
    pub async fn run(&self) -> Result<()> {
        match &self {
            Self::Query {
                chain_id,
                grpc,
                query,
            } => query.run(chain_id, grpc.as_deref()).await,
            Self::Tx {
                chain_id,
                rpc,
                grpc,
                fee,
                dry_run,
                transaction,
            } => {
                transaction
                    .run(
                        *dry_run,
                        chain_id,
                        grpc.as_deref(),
                        rpc.as_deref(),
                        fee.as_ref(),
                    )
                    .await
            }
            Self::AddAccount { keystore, key } => {
                let accounts_path = data_local_file("accounts.yaml")?;
                let mut accounts: HashMap<String, Account> =
                    read_data_from_yaml(&accounts_path).unwrap_or_default();
                let new_account = Account::new(keystore.clone())?;
                accounts.insert(key.into(), new_account);
                write_data_as_yaml(&accounts_path, accounts)?;
                println!("Added to {}", accounts_path);
                Ok(())
            }
            Self::AddKey { key, coin_type } => {
                let mmseed = rpassword::prompt_password("Mnemonic 🔑: ")?;
                save_key_to_os_from_mmseed(mmseed.trim(), key, *coin_type)?;
                Ok(())
            }
            Self::AddChain {
                chain_id,
                prefix,
                denom,
                fee,
                coin_type,
                basket,
                rpc,
                grpc,
                rest,
                fcd,
            } => {
                let chains_path = data_local_file("chains.yaml")?;
                let mut chains: HashMap<String, Chain> =
                    read_data_from_yaml(&chains_path).unwrap_or_default();

                chains.insert(
                    chain_id.into(),
                    Chain {
                        chain_id: chain_id.into(),
                        prefix: prefix.into(),
                        denom: denom.into(),
                        fee: *fee,
                        coin_type: *coin_type,
                        basket: basket.clone(),
                        rpc_endpoints: rpc.clone(),
                        grpc_endpoints: grpc.clone(),
                        rest_endpoints: rest.clone(),
                        fcd_endpoints: fcd.clone(),
                    },
                );
                write_data_as_yaml(&chains_path, chains)?;

                Ok(())
            }
            Self::SetBasket { chain_id, address } => {
                let chains_path = data_local_file("chains.yaml")?;
                let mut chains: HashMap<String, Chain> = read_data_from_yaml(&chains_path)?;
                let chain = chains
                    .get_mut(chain_id)
                    .ok_or_else(|| Error::UnknownChain(chain_id.into()))?;
                chain.basket = Some(address.into());
                write_data_as_yaml(&chains_path, chains)?;
                Ok(())
            }
        }
    }
}

pub(crate) fn load_chain(chain_id: &str) -> Result<Chain> {
    let chains_path = data_local_file("chains.yaml")?;
    let chains: HashMap<String, Chain> = read_data_from_yaml(&chains_path)
        .with_context(|| format!("no chain registry at {chains_path}"))?;
    chains
        .get(chain_id)
        .cloned()
        .ok_or_else(|| Error::UnknownChain(chain_id.into()).into())
}

pub(crate) fn load_accounts() -> Result<HashMap<String, Account>> {
    let accounts_path = data_local_file("accounts.yaml")?;
    read_data_from_yaml(&accounts_path)
        .with_context(|| format!("no account registry at {accounts_path}"))
}

pub(crate) fn load_account(key: &str) -> Result<Account> {
    load_accounts()?
        .get(key)
        .cloned()
        .ok_or_else(|| Error::UnknownAccount(key.into()).into())
}
