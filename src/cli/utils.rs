use anyhow::Context;
use cosmos_sdk_proto::cosmos::base::v1beta1::Coin;

use crate::account::KeyStoreBackend;
use crate::basket::{Asset, AssetInfo};
use crate::Result;

pub fn custom_keystorebackend(backend_str: &str) -> Result<KeyStoreBackend> {
    backend_str
        .split_once(':')
        .and_then(|(t, k)| match t {
            "Os" => Some(KeyStoreBackend::Os(k.into())),
            "Memory" => Some(KeyStoreBackend::Memory(k.into())),
            _ => None,
        })
        .context("expected Os:<name> or Memory:<name>")
}

/// clap ships no `u128` parser, so raw token amounts go through this.
pub fn custom_amount(amount_str: &str) -> Result<u128> {
    Ok(amount_str.parse()?)
}

pub fn custom_coin(coin_str: &str) -> Result<Coin> {
    let amount = coin_str
        .chars()
        .take_while(|x| x.is_numeric())
        .collect::<String>();
    let denom = coin_str
        .chars()
        .skip_while(|x| x.is_numeric())
        .collect::<String>();
    Ok(Coin { denom, amount })
}

/// `1000000uluna` or `500terra1token...`; contract addresses are told
/// apart from denoms by being valid bech32.
pub fn custom_asset(asset_str: &str) -> Result<Asset> {
    let amount: u128 = asset_str
        .chars()
        .take_while(|x| x.is_numeric())
        .collect::<String>()
        .parse()
        .with_context(|| format!("no amount in {asset_str}"))?;
    let info = custom_asset_info(
        &asset_str
            .chars()
            .skip_while(|x| x.is_numeric())
            .collect::<String>(),
    )?;
    Ok(Asset { info, amount })
}

pub fn custom_asset_info(info_str: &str) -> Result<AssetInfo> {
    anyhow::ensure!(!info_str.is_empty(), "empty asset");
    Ok(if bech32::decode(info_str).is_ok() {
        AssetInfo::Token {
            contract_addr: info_str.into(),
        }
    } else {
        AssetInfo::NativeToken {
            denom: info_str.into(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coin_splits_amount_and_denom() {
        let coin = custom_coin("3000uluna").unwrap();
        assert_eq!(coin.amount, "3000");
        assert_eq!(coin.denom, "uluna");
    }

    #[test]
    fn native_asset_parses() {
        let asset = custom_asset("1000000uusd").unwrap();
        assert_eq!(asset.amount, 1_000_000);
        assert_eq!(
            asset.info,
            AssetInfo::NativeToken {
                denom: "uusd".into()
            }
        );
    }

    #[test]
    fn bech32_asset_is_a_token() {
        let addr = "cosmos10uuc6zj564lwhuvlutwsmsa2ruc8qmj6x8kp6x";
        let asset = custom_asset(&format!("42{addr}")).unwrap();
        assert_eq!(asset.amount, 42);
        assert_eq!(
            asset.info,
            AssetInfo::Token {
                contract_addr: addr.into()
            }
        );
    }

    #[test]
    fn missing_amount_is_rejected() {
        assert!(custom_asset("uusd").is_err());
    }

    #[test]
    fn keystore_backend_parses() {
        assert!(matches!(
            custom_keystorebackend("Os:wallet").unwrap(),
            KeyStoreBackend::Os(name) if name == "wallet"
        ));
        assert!(custom_keystorebackend("Ledger").is_err());
    }
}
