//! BCS encoding of pure call arguments
//!
//! Move entry functions receive primitive arguments as BCS bytes:
//! - `String`: ULEB128 length + UTF-8 bytes
//! - `address`: 32 raw bytes
//! - `Option<T>`: `0x00` for none, `0x01` + `T` for some
//! - `vector<T>`: ULEB128 element count + elements

use serde::Serialize;

use super::address::SuiAddress;
use crate::error::{Error, Result};

/// A Move type that can be written as a pure argument
pub trait PureValue {
    fn to_pure_bytes(&self) -> Result<Vec<u8>>;
}

fn to_bcs<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    bcs::to_bytes(value).map_err(|e| Error::Serialization(format!("BCS: {}", e)))
}

macro_rules! impl_pure_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl PureValue for $ty {
                fn to_pure_bytes(&self) -> Result<Vec<u8>> {
                    to_bcs(self)
                }
            }
        )*
    };
}

impl_pure_value!(
    str,
    String,
    bool,
    u8,
    u64,
    Option<String>,
    Option<u64>,
    [String],
    Vec<String>,
);

// Serialize on SuiAddress writes the hex string; Move wants the raw bytes
impl PureValue for SuiAddress {
    fn to_pure_bytes(&self) -> Result<Vec<u8>> {
        to_bcs(self.as_bytes())
    }
}

impl<T: PureValue + ?Sized> PureValue for &T {
    fn to_pure_bytes(&self) -> Result<Vec<u8>> {
        (**self).to_pure_bytes()
    }
}
