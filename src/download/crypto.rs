//! Page decryption. Each page blob is AES-128-CBC with a per-page key/IV
//! pair delivered as hex in the viewer response. The site applies no PKCS#7
//! padding step worth honoring on the client: decrypted bytes are written to
//! disk verbatim.

use aes::cipher::block_padding::NoPadding;
use aes::cipher::{BlockDecryptMut, KeyIvInit};
use thiserror::Error;

type Aes128CbcDec = cbc::Decryptor<aes::Aes128>;

const BLOCK: usize = 16;

#[derive(Debug, Error, PartialEq)]
pub enum CryptoError {
    #[error("key or IV is not valid hex: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("key and IV must be {BLOCK} bytes, got {0}")]
    BadKeyLength(usize),

    #[error("ciphertext length {0} is not a multiple of the AES block size")]
    BadCiphertextLength(usize),
}

/// Decrypt one fetched page in place.
pub fn decrypt_page(
    key_hex: &str,
    iv_hex: &str,
    mut data: Vec<u8>,
) -> Result<Vec<u8>, CryptoError> {
    let key = hex::decode(key_hex)?;
    let iv = hex::decode(iv_hex)?;
    if key.len() != BLOCK {
        return Err(CryptoError::BadKeyLength(key.len()));
    }
    if iv.len() != BLOCK {
        return Err(CryptoError::BadKeyLength(iv.len()));
    }
    let len = data.len();
    if len % BLOCK != 0 {
        return Err(CryptoError::BadCiphertextLength(len));
    }

    let decryptor = Aes128CbcDec::new_from_slices(&key, &iv)
        .map_err(|_| CryptoError::BadKeyLength(key.len()))?;
    decryptor
        .decrypt_padded_mut::<NoPadding>(&mut data)
        .map_err(|_| CryptoError::BadCiphertextLength(len))?;
    Ok(data)
}
