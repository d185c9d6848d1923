//! `with` codecs for integers wider than CBOR's native 64 bits.
//!
//! Values are written as big-endian byte strings with leading zero bytes
//! stripped. Signed values are written in two's complement at full width.

use minicbor::decode::{Decoder, Error as DecodeError};
use minicbor::encode::{Encoder, Error as EncodeError, Write};

fn strip_leading_zeros(bytes: &[u8]) -> &[u8] {
    let first = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len());
    &bytes[first..]
}

/// Left pads `bytes` into a fixed width big-endian buffer.
fn pad<const N: usize>(bytes: &[u8]) -> Result<[u8; N], DecodeError> {
    if bytes.len() > N {
        return Err(DecodeError::message("integer does not fit the target width"));
    }
    let mut buf = [0u8; N];
    buf[N - bytes.len()..].copy_from_slice(bytes);
    Ok(buf)
}

pub mod u128 {
    use super::*;

    pub fn encode<Ctx, W: Write>(
        v: &u128,
        e: &mut Encoder<W>,
        _ctx: &mut Ctx,
    ) -> Result<(), EncodeError<W::Error>> {
        e.bytes(strip_leading_zeros(&v.to_be_bytes()))?;
        Ok(())
    }

    pub fn decode<'b, Ctx>(d: &mut Decoder<'b>, _ctx: &mut Ctx) -> Result<u128, DecodeError> {
        Ok(u128::from_be_bytes(pad::<16>(d.bytes()?)?))
    }
}

pub mod i128 {
    use super::*;

    pub fn encode<Ctx, W: Write>(
        v: &i128,
        e: &mut Encoder<W>,
        _ctx: &mut Ctx,
    ) -> Result<(), EncodeError<W::Error>> {
        e.bytes(&v.to_be_bytes())?;
        Ok(())
    }

    pub fn decode<'b, Ctx>(d: &mut Decoder<'b>, _ctx: &mut Ctx) -> Result<i128, DecodeError> {
        let bytes = d.bytes()?;
        if bytes.len() != 16 {
            return Err(DecodeError::message("expected 16 bytes for i128"));
        }
        Ok(i128::from_be_bytes(pad::<16>(bytes)?))
    }
}

pub mod u256 {
    use super::*;
    use ethnum::U256;

    pub fn encode<Ctx, W: Write>(
        v: &U256,
        e: &mut Encoder<W>,
        _ctx: &mut Ctx,
    ) -> Result<(), EncodeError<W::Error>> {
        e.bytes(strip_leading_zeros(&v.to_be_bytes()))?;
        Ok(())
    }

    pub fn decode<'b, Ctx>(d: &mut Decoder<'b>, _ctx: &mut Ctx) -> Result<U256, DecodeError> {
        Ok(U256::from_be_bytes(pad::<32>(d.bytes()?)?))
    }
}

pub mod i256 {
    use super::*;
    use ethnum::I256;

    pub fn encode<Ctx, W: Write>(
        v: &I256,
        e: &mut Encoder<W>,
        _ctx: &mut Ctx,
    ) -> Result<(), EncodeError<W::Error>> {
        e.bytes(&v.to_be_bytes())?;
        Ok(())
    }

    pub fn decode<'b, Ctx>(d: &mut Decoder<'b>, _ctx: &mut Ctx) -> Result<I256, DecodeError> {
        let bytes = d.bytes()?;
        if bytes.len() != 32 {
            return Err(DecodeError::message("expected 32 bytes for i256"));
        }
        Ok(I256::from_be_bytes(pad::<32>(bytes)?))
    }
}
