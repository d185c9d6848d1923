use std::fmt;
use std::str::FromStr;

use minicbor::decode::{Decoder, Error as DecodeError};
use minicbor::encode::{Encoder, Error as EncodeError, Write};
use minicbor::{Decode, Encode};
use serde::{Deserialize, Serialize};

/// 20 byte account identifier, written as a hex string in configs and logs.
#[derive(
    Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct AccountId(#[serde(with = "hex")] pub [u8; 20]);

impl AccountId {
    pub const fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl fmt::Debug for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountId({self})")
    }
}

impl FromStr for AccountId {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut bytes = [0u8; 20];
        hex::decode_to_slice(s.trim_start_matches("0x"), &mut bytes)?;
        Ok(Self(bytes))
    }
}

impl<C> Encode<C> for AccountId {
    fn encode<W: Write>(
        &self,
        e: &mut Encoder<W>,
        _ctx: &mut C,
    ) -> Result<(), EncodeError<W::Error>> {
        e.bytes(&self.0)?;
        Ok(())
    }
}

impl<'b, C> Decode<'b, C> for AccountId {
    fn decode(d: &mut Decoder<'b>, _ctx: &mut C) -> Result<Self, DecodeError> {
        let bytes = d.bytes()?;
        <[u8; 20]>::try_from(bytes)
            .map(Self)
            .map_err(|_| DecodeError::message("account id must be 20 bytes"))
    }
}

/// One side of the pair.
#[derive(Encode, Decode, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Token {
    #[n(0)]
    Token0,
    #[n(1)]
    Token1,
}

impl Token {
    pub fn index(self) -> usize {
        match self {
            Token::Token0 => 0,
            Token::Token1 => 1,
        }
    }

    /// Input token of a swap in the given direction.
    pub fn input(zero_for_one: bool) -> Token {
        if zero_for_one { Token::Token0 } else { Token::Token1 }
    }

    /// Output token of a swap in the given direction.
    pub fn output(zero_for_one: bool) -> Token {
        if zero_for_one { Token::Token1 } else { Token::Token0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_id_hex_round_trip() {
        let id = AccountId::new([0xab; 20]);
        let text = id.to_string();
        assert_eq!(text, "ab".repeat(20));
        assert_eq!(text.parse::<AccountId>(), Ok(id));
        assert_eq!(format!("0x{text}").parse::<AccountId>(), Ok(id));
        assert!("abcd".parse::<AccountId>().is_err());
    }

    #[test]
    fn account_id_serde_is_a_hex_string() {
        let id = AccountId::new([1; 20]);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", "01".repeat(20)));
        assert_eq!(serde_json::from_str::<AccountId>(&json).unwrap(), id);
    }

    #[test]
    fn account_id_cbor_is_a_byte_string() {
        let id = AccountId::new([7; 20]);
        let bytes = minicbor::to_vec(id).unwrap();
        assert_eq!(bytes[0], 0x54);
        assert_eq!(minicbor::decode::<AccountId>(&bytes).unwrap(), id);
    }
}
