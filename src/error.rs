use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("chain {0} is not configured")]
    UnknownChain(String),
    #[error("account {0} is not configured")]
    UnknownAccount(String),
    #[error("chain {0} has no basket contract address")]
    MissingBasketContract(String),
    #[error("asset {0} is not part of the basket")]
    AssetNotInBasket(String),
    #[error("no live {1} endpoint for chain {0}")]
    NoLiveEndpoint(String, &'static str),
    #[error("no gas price published for {0}")]
    MissingGasPrice(String),
}
