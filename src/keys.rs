use std::collections::HashMap;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use anyhow::Context;
use base64::prelude::{Engine as _, BASE64_STANDARD};
use bech32::{Bech32, Hrp};
use bip32::{
    secp256k1::ecdsa::SigningKey, DerivationPath, Language, Mnemonic, PrivateKey, PublicKey, XPrv,
};
use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

use crate::Result;

const KEYRING_SERVICE: &str = "bskt";

lazy_static::lazy_static! {
    static ref MEMORY_KEYRING: Arc<Mutex<HashMap<String, Vec<u8>>>> =
        Arc::new(Mutex::new(HashMap::new()));
}

pub fn key_from_mnemonic(mmseed: &str, coin: u64) -> Result<XPrv> {
    let mnemonic = Mnemonic::new(mmseed.trim(), Language::English)?;
    let drv_path = format!("m/44'/{coin}'/0'/0/0");
    tracing::debug!("deriving {drv_path}");
    let derivation_path = DerivationPath::from_str(&drv_path)?;
    let seed = mnemonic.to_seed("");

    Ok(XPrv::derive_from_path(seed.as_bytes(), &derivation_path)?)
}

pub fn from_pk_to_bech32_address<K>(pub_key: &K, prefix: &str) -> Result<String>
where
    K: PublicKey,
{
    let pk_hash = {
        let mut hasher = Sha256::new();
        hasher.update(pub_key.to_bytes());
        hasher.finalize()
    };

    let rip_result = {
        let mut rip_hasher = Ripemd160::new();
        rip_hasher.update(pk_hash);
        rip_hasher.finalize()
    };

    Ok(bech32::encode::<Bech32>(Hrp::parse(prefix)?, &rip_result)?)
}

pub fn save_key_to_os_from_mmseed(mmseed: &str, keyname: &str, coin: u64) -> Result<()> {
    let priv_key = key_from_mnemonic(mmseed, coin)?;
    save_key_to_os(&PrivateKey::to_bytes(priv_key.private_key()), keyname)?;
    tracing::info!(
        "stored key {keyname}, public key {}",
        BASE64_STANDARD.encode(priv_key.private_key().public_key().to_bytes())
    );
    Ok(())
}

pub fn save_key_to_os(bytes: &[u8], keyname: &str) -> Result<()> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, keyname)?;
    entry.set_password(&BASE64_STANDARD.encode(bytes))?;
    Ok(())
}

pub fn get_priv_key_from_os(key_name: &str) -> Result<SigningKey> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, key_name)?;
    let priv_bytes = BASE64_STANDARD.decode(entry.get_password()?)?;
    Ok(SigningKey::from_slice(&priv_bytes)?)
}

pub fn save_key_to_memory_from_mmseed(mmseed: &str, name: &str, coin: u64) -> Result<()> {
    let priv_key = key_from_mnemonic(mmseed, coin)?;
    save_key_to_memory(&PrivateKey::to_bytes(priv_key.private_key()), name)
}

pub fn save_key_to_memory(bytes: &[u8], name: &str) -> Result<()> {
    let mut keyring = MEMORY_KEYRING.lock().expect("poisoned keyring lock");
    keyring.insert(name.into(), bytes.to_vec());
    Ok(())
}

pub fn get_priv_key_from_memory(key_name: &str) -> Result<SigningKey> {
    let keyring = MEMORY_KEYRING.lock().expect("poisoned keyring lock");
    let priv_bytes = keyring
        .get(key_name)
        .context("key is not present in memory")?;
    Ok(SigningKey::from_slice(priv_bytes)?)
}
