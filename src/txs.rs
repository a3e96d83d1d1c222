use anyhow::Context;
use bip32::secp256k1::ecdsa::{signature::Signer, signature::Verifier, Signature};
use cosmos_sdk_proto::cosmos::auth::v1beta1::BaseAccount;
use cosmos_sdk_proto::cosmos::base::v1beta1::Coin;
use cosmos_sdk_proto::cosmos::crypto::secp256k1::PubKey;
use cosmos_sdk_proto::cosmos::tx::signing::v1beta1::SignMode;
use cosmos_sdk_proto::cosmos::tx::v1beta1::{
    mode_info::{Single, Sum},
    AuthInfo, Fee, ModeInfo, SignDoc, SignerInfo, Tx, TxBody,
};
use prost::Message;

use crate::msg::SECP256K1_PUBKEY_TYPE_URL;
use crate::utils::pack_any;
use crate::Result;

/// Placeholder gas limit used until simulation reports real usage.
pub const DEFAULT_GAS_LIMIT: u64 = 400_000;

pub fn generate_auth_info(
    public_key: PubKey,
    sequence: u64,
    gas: u64,
    fee_amount: u128,
    fee_denom: &str,
    fee_granter: &str,
    mode: SignMode,
) -> AuthInfo {
    let mode_info = ModeInfo {
        sum: Some(Sum::Single(Single { mode: mode.into() })),
    };

    let signer_info = SignerInfo {
        public_key: Some(pack_any(SECP256K1_PUBKEY_TYPE_URL, &public_key)),
        mode_info: Some(mode_info),
        sequence,
    };

    let fees = if fee_amount > 0 {
        vec![Coin {
            denom: fee_denom.into(),
            amount: fee_amount.to_string(),
        }]
    } else {
        vec![]
    };

    let fee = Fee {
        amount: fees,
        gas_limit: gas,
        payer: "".into(),
        granter: fee_granter.into(),
    };

    AuthInfo {
        signer_infos: vec![signer_info],
        fee: Some(fee),
        tip: None,
    }
}

pub fn create_transaction(body: TxBody, auth_info: AuthInfo) -> Tx {
    Tx {
        body: Some(body),
        auth_info: Some(auth_info),
        signatures: vec![],
    }
}

pub fn generate_sign_doc(tx: &Tx, chain_id: &str, account_number: u64) -> Result<SignDoc> {
    Ok(SignDoc {
        body_bytes: tx.body.as_ref().context("tx has no body")?.encode_to_vec(),
        auth_info_bytes: tx
            .auth_info
            .as_ref()
            .context("tx has no auth info")?
            .encode_to_vec(),
        chain_id: chain_id.into(),
        account_number,
    })
}

pub fn generate_signature_from_sign_doc<K>(sign_doc: SignDoc, priv_key: &K) -> Result<[u8; 64]>
where
    K: Signer<Signature>,
{
    let signature: Signature = priv_key.try_sign(&sign_doc.encode_to_vec())?;
    Ok(signature.to_vec().as_slice().try_into()?)
}

pub fn update_signature(mut tx: Tx, signature: &[u8; 64]) -> Tx {
    tx.signatures = vec![signature.to_vec()];
    tx
}

pub fn sign_transaction<K>(
    unsigned_tx: &Tx,
    chain_id: &str,
    account_number: u64,
    priv_key: &K,
) -> Result<Tx>
where
    K: Signer<Signature>,
{
    let sign_doc = generate_sign_doc(unsigned_tx, chain_id, account_number)?;
    let signature = generate_signature_from_sign_doc(sign_doc, priv_key)?;
    Ok(update_signature(unsigned_tx.clone(), &signature))
}

pub fn verify_transaction<K>(
    signed_tx: &Tx,
    chain_id: &str,
    account_number: u64,
    pub_key: &K,
) -> Result<()>
where
    K: Verifier<Signature>,
{
    let sign_doc = generate_sign_doc(signed_tx, chain_id, account_number)?;
    let signature = signed_tx.signatures.first().context("tx is unsigned")?;
    pub_key.verify(
        &sign_doc.encode_to_vec(),
        &Signature::from_slice(signature)?,
    )?;
    Ok(())
}

pub fn update_tx_with_gas_and_fee(mut tx: Tx, gas: u64, fee_amount: u128, fee_denom: &str) -> Result<Tx> {
    let auth_info = tx.auth_info.as_mut().context("tx has no auth info")?;
    let fee = auth_info.fee.as_mut().context("tx has no fee")?;
    fee.gas_limit = gas;
    fee.amount = vec![Coin {
        denom: fee_denom.into(),
        amount: fee_amount.to_string(),
    }];
    Ok(tx)
}

pub async fn get_account_number_and_sequence(
    grpc_endpoint: &str,
    address: &str,
) -> Result<(u64, u64, Option<PubKey>)> {
    let info = crate::query::get_account_info(grpc_endpoint, address).await?;

    let any = info.account.context("account not found on chain")?;
    let bacc = BaseAccount::decode(any.value.as_slice())?;

    Ok((
        bacc.account_number,
        bacc.sequence,
        bacc.pub_key
            .map(|x| PubKey::decode(x.value.as_slice()))
            .transpose()?,
    ))
}
