use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chain {
    pub chain_id: String,
    pub prefix: String,
    pub denom: String,

    /// Flat fee amount in `denom`. Zero means derive the fee from gas prices.
    #[serde(default)]
    pub fee: u128,

    #[serde(default = "default_coin_type")]
    pub coin_type: u64,

    /// Basket contract address on this chain.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub basket: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rpc_endpoints: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub grpc_endpoints: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rest_endpoints: Vec<String>,
    /// FCD-style endpoints publishing gas prices.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fcd_endpoints: Vec<String>,
}

fn default_coin_type() -> u64 {
    crate::DEFAULT_COIN_TYPE
}

impl Chain {
    pub fn basket_contract(&self) -> crate::Result<&str> {
        self.basket
            .as_deref()
            .ok_or_else(|| crate::error::Error::MissingBasketContract(self.chain_id.clone()).into())
    }
}
