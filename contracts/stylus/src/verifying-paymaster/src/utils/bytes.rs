//! Minimal big-endian parsing helpers for the packed sponsor data.

use alloc::vec::Vec;

use stylus_sdk::alloy_primitives::{Address, U256};

pub fn read_vec(bytes: &[u8], i: &mut usize, len: usize) -> Result<Vec<u8>, ()> {
    if bytes.len() < *i + len {
        return Err(());
    }
    let out = bytes[*i..*i + len].to_vec();
    *i += len;
    Ok(out)
}

/// Reads a `uint48` into the low six bytes of a `u64`.
pub fn read_u48_be(bytes: &[u8], i: &mut usize) -> Result<u64, ()> {
    if bytes.len() < *i + 6 {
        return Err(());
    }
    let mut buf = [0u8; 8];
    buf[2..8].copy_from_slice(&bytes[*i..*i + 6]);
    *i += 6;
    Ok(u64::from_be_bytes(buf))
}

pub fn read_address(bytes: &[u8], i: &mut usize) -> Result<Address, ()> {
    if bytes.len() < *i + 20 {
        return Err(());
    }
    let addr = Address::from_slice(&bytes[*i..*i + 20]);
    *i += 20;
    Ok(addr)
}

pub fn read_u256_be(bytes: &[u8], i: &mut usize) -> Result<U256, ()> {
    if bytes.len() < *i + 32 {
        return Err(());
    }
    let out = U256::from_be_slice(&bytes[*i..*i + 32]);
    *i += 32;
    Ok(out)
}
