use bip32::secp256k1::ecdsa::{SigningKey, VerifyingKey};
use bip32::{PrivateKey, PublicKey};
use cosmos_sdk_proto::cosmos::crypto::secp256k1::PubKey;
use cosmos_sdk_proto::cosmos::tx::signing::v1beta1::SignMode;
use cosmos_sdk_proto::cosmos::tx::v1beta1::{Tx, TxBody};
use cosmos_sdk_proto::Any;
use serde::{Deserialize, Serialize};

use crate::keys::{from_pk_to_bech32_address, get_priv_key_from_memory, get_priv_key_from_os};
use crate::txs::{
    create_transaction, generate_auth_info, get_account_number_and_sequence, sign_transaction,
    DEFAULT_GAS_LIMIT,
};
use crate::Result;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub enum KeyStoreBackend {
    Os(String),
    Memory(String),
}

impl KeyStoreBackend {
    fn signing_key(&self) -> Result<SigningKey> {
        match self {
            Self::Os(key) => get_priv_key_from_os(key),
            Self::Memory(key) => get_priv_key_from_memory(key),
        }
    }

    pub fn public_key(&self) -> Result<VerifyingKey> {
        Ok(self.signing_key()?.public_key())
    }
}

/// A signing identity stored in `accounts.yaml`. The address is kept in
/// the `cosmos` prefix and re-encoded per chain.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Account {
    cosmos_address: String,
    private_key_backend: KeyStoreBackend,
}

impl Account {
    pub fn new(private_key_backend: KeyStoreBackend) -> Result<Self> {
        let address = from_pk_to_bech32_address(&private_key_backend.public_key()?, "cosmos")?;
        Ok(Self {
            cosmos_address: address,
            private_key_backend,
        })
    }

    pub fn address(&self, prefix: &str) -> Result<String> {
        crate::utils::bech32(&self.cosmos_address, prefix)
    }

    pub async fn generate_unsigned_transaction(
        &self,
        address: &str,
        any_msgs: &[Any],
        fee: (u128, &str),
        fee_granter: &str,
        grpc_endpoint: &str,
    ) -> Result<(u64, Tx)> {
        let (fee_amount, fee_denom) = fee;
        let tx_body = TxBody {
            messages: any_msgs.to_vec(),
            memo: "".into(),
            ..Default::default()
        };

        let (account_number, sequence, mut public_key_on_chain) =
            get_account_number_and_sequence(grpc_endpoint, address).await?;

        // accounts with no tx history have no pubkey on chain yet
        if public_key_on_chain.is_none() {
            public_key_on_chain = Some(PubKey {
                key: self.private_key_backend.public_key()?.to_bytes().to_vec(),
            });
        }

        let auth_info = generate_auth_info(
            public_key_on_chain.expect("set above"),
            sequence,
            DEFAULT_GAS_LIMIT,
            fee_amount,
            fee_denom,
            fee_granter,
            SignMode::Direct,
        );

        Ok((account_number, create_transaction(tx_body, auth_info)))
    }

    pub fn sign_unsigned_transaction(
        &self,
        unsigned_tx: &Tx,
        chain_id: &str,
        account_number: u64,
    ) -> Result<Tx> {
        let priv_key = self.private_key_backend.signing_key()?;
        sign_transaction(unsigned_tx, chain_id, account_number, &priv_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::save_key_to_memory_from_mmseed;

    const MMSEED: &str = "tip purse since square taste soccer future hat orbit blame anchor oppose onion garlic taxi daring aisle slide buzz theory bronze explain refuse surface";

    #[test]
    fn account_address_follows_chain_prefix() {
        save_key_to_memory_from_mmseed(MMSEED, "acct-test", 118).unwrap();
        let account = Account::new(KeyStoreBackend::Memory("acct-test".into())).unwrap();

        assert_eq!(
            account.address("cosmos").unwrap(),
            "cosmos10uuc6zj564lwhuvlutwsmsa2ruc8qmj6x8kp6x"
        );
        assert!(account.address("terra").unwrap().starts_with("terra1"));
    }
}
