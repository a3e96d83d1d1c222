use anyhow::Context;
use bech32::{Bech32, Hrp};
use cosmos_sdk_proto::Any;
use prost::Message;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::PathBuf;

use crate::Result;

pub fn pack_any<M>(type_url: &str, msg: &M) -> Any
where
    M: Message,
{
    Any {
        type_url: type_url.into(),
        value: msg.encode_to_vec(),
    }
}

pub fn bech32(address: &str, prefix: &str) -> Result<String> {
    let (_, bytes) = bech32::decode(address)?;
    Ok(bech32::encode::<Bech32>(Hrp::parse(prefix)?, &bytes)?)
}

/// `amount * dec` where `dec` is a decimal string like "0.015", rounded up.
pub fn mul_ceil_dec(amount: u128, dec: &str) -> Result<u128> {
    let (int, frac) = dec.split_once('.').unwrap_or((dec, ""));
    let scale = 10u128
        .checked_pow(frac.len() as u32)
        .context("gas price has too many decimals")?;
    let numer: u128 = format!("{int}{frac}")
        .parse()
        .with_context(|| format!("bad decimal amount {dec}"))?;
    let total = amount
        .checked_mul(numer)
        .with_context(|| format!("fee overflows at gas price {dec}"))?;
    Ok(total.div_ceil(scale))
}

/// Renders a raw token amount with `decimals` fractional digits.
pub fn format_units(amount: u128, decimals: u8) -> String {
    let Some(scale) = 10u128.checked_pow(decimals as u32) else {
        // nonsense decimals from a remote token_info, print raw
        return amount.to_string();
    };
    let whole = amount / scale;
    let frac = amount % scale;
    if frac == 0 {
        format!("{whole}")
    } else {
        let frac = format!("{frac:0>width$}", width = decimals as usize);
        format!("{whole}.{}", frac.trim_end_matches('0'))
    }
}

pub fn data_local_file(file_name: &str) -> Result<String> {
    let project_dir =
        directories::ProjectDirs::from("io", "bskt", "bskt").context("project dir")?;
    let data_local_dir = project_dir.data_local_dir();
    std::fs::create_dir_all(data_local_dir)?;
    path_to_string(data_local_dir.join(file_name))
}

fn path_to_string(path: PathBuf) -> Result<String> {
    Ok(path.to_str().context("project path")?.to_owned())
}

pub fn read_data_from_yaml<T>(path: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    let file = std::fs::File::open(path)?;
    let reader = std::io::BufReader::new(file);
    Ok(serde_yaml::from_reader(reader)?)
}

pub fn write_data_as_yaml<T>(path: &str, value: T) -> Result<()>
where
    T: Serialize,
{
    let file = std::fs::File::create(path)?;
    let writer = std::io::BufWriter::new(file);
    Ok(serde_yaml::to_writer(writer, &value)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bech32_changes_prefix_only() {
        let cosmos = "cosmos10uuc6zj564lwhuvlutwsmsa2ruc8qmj6x8kp6x";
        let terra = bech32(cosmos, "terra").unwrap();
        assert!(terra.starts_with("terra1"));
        assert_eq!(bech32(&terra, "cosmos").unwrap(), cosmos);
    }

    #[test]
    fn mul_ceil_dec_rounds_up() {
        assert_eq!(mul_ceil_dec(200_000, "0.015").unwrap(), 3_000);
        assert_eq!(mul_ceil_dec(100, "0.015").unwrap(), 2);
        assert_eq!(mul_ceil_dec(100, "2").unwrap(), 200);
        assert_eq!(mul_ceil_dec(3, ".5").unwrap(), 2);
    }

    #[test]
    fn mul_ceil_dec_rejects_overflowing_price() {
        assert!(mul_ceil_dec(u128::MAX, "10").is_err());
        assert!(mul_ceil_dec(2, &format!("1{}", "0".repeat(40))).is_err());
    }

    #[test]
    fn format_units_trims_zeros() {
        assert_eq!(format_units(1_500_000, 6), "1.5");
        assert_eq!(format_units(42, 6), "0.000042");
        assert_eq!(format_units(7_000_000, 6), "7");
    }

    #[test]
    fn format_units_survives_absurd_decimals() {
        assert_eq!(format_units(42, 77), "42");
    }
}
