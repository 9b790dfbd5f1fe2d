use stylus_sdk::alloy_primitives::Address;

use crate::{
    errors::FormatError,
    types::{
        layout::{FIXED_FIELDS_LEN, PAYMASTER_ADDRESS_LEN, SIGNATURE_LEN},
        PaymasterData,
    },
    utils::bytes::{read_address, read_u256_be, read_u48_be, read_vec},
};

/// Split `paymasterAndData` into the routing address and the sponsor data behind it.
pub fn split_paymaster_and_data(bytes: &[u8]) -> Result<(Address, &[u8]), FormatError> {
    if bytes.len() < PAYMASTER_ADDRESS_LEN {
        return Err(FormatError::MissingSignature);
    }
    let paymaster = Address::from_slice(&bytes[..PAYMASTER_ADDRESS_LEN]);
    Ok((paymaster, &bytes[PAYMASTER_ADDRESS_LEN..]))
}

/// Decode the sponsor data (everything after the paymaster address).
///
/// Layout: `validUntil:6 | validAfter:6 | token:20 | exchangeRate:32 | signature:65`.
/// Length is checked up front so that no field is read from a malformed record.
pub fn decode_paymaster_data(data: &[u8]) -> Result<PaymasterData, FormatError> {
    if data.len() < FIXED_FIELDS_LEN {
        return Err(FormatError::MissingSignature);
    }
    let signature_len = data.len() - FIXED_FIELDS_LEN;
    if signature_len != SIGNATURE_LEN {
        return Err(FormatError::BadSignatureLength { len: signature_len });
    }

    let mut i = 0usize;
    let valid_until = read_u48_be(data, &mut i).map_err(|_| FormatError::MissingSignature)?;
    let valid_after = read_u48_be(data, &mut i).map_err(|_| FormatError::MissingSignature)?;
    let token = read_address(data, &mut i).map_err(|_| FormatError::MissingSignature)?;
    let exchange_rate = read_u256_be(data, &mut i).map_err(|_| FormatError::MissingSignature)?;
    let signature = read_vec(data, &mut i, SIGNATURE_LEN)
        .map_err(|_| FormatError::BadSignatureLength { len: signature_len })?;

    Ok(PaymasterData {
        valid_until,
        valid_after,
        token,
        exchange_rate,
        signature,
    })
}

/// Decode a full `paymasterAndData` field.
pub fn parse_paymaster_and_data(bytes: &[u8]) -> Result<(Address, PaymasterData), FormatError> {
    let (paymaster, data) = split_paymaster_and_data(bytes)?;
    Ok((paymaster, decode_paymaster_data(data)?))
}
