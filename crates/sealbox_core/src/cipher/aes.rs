//! Default cipher adapter: AES-128-CBC with PKCS#7 padding.

use crate::cipher::{CipherProvider, StreamTransform};
use crate::error::{CoreError, CoreResult};
use aes::Aes128;
use cbc::cipher::generic_array::GenericArray;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};

/// AES block size in bytes, which is also the IV length for CBC.
const BLOCK_LEN: usize = 16;
/// AES-128 key length in bytes.
const KEY_LEN: usize = 16;

/// The default cipher provider: AES-128-CBC with PKCS#7 padding.
///
/// Transforms stream block by block; the encryptor carries at most one
/// partial plaintext block between calls and the decryptor withholds the
/// trailing ciphertext block until [`StreamTransform::finish`] so the
/// padding can be validated and stripped. Decryption reproduces the exact
/// original byte length, including for empty payloads (which encrypt to a
/// single padding block).
///
/// This scheme is confidentiality-only; see the module docs.
#[derive(Debug, Default, Clone, Copy)]
pub struct AesCbcProvider;

impl AesCbcProvider {
    /// Creates the provider.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl CipherProvider for AesCbcProvider {
    fn iv_len(&self) -> usize {
        BLOCK_LEN
    }

    fn key_len(&self) -> usize {
        KEY_LEN
    }

    fn encryptor(&self, key: &[u8], iv: &[u8]) -> CoreResult<Box<dyn StreamTransform>> {
        let cipher = cbc::Encryptor::<Aes128>::new_from_slices(key, iv)
            .map_err(|_| CoreError::crypto("invalid key or IV length for AES-128-CBC"))?;
        Ok(Box::new(CbcEncryptStream {
            cipher,
            pending: Vec::with_capacity(BLOCK_LEN),
            finished: false,
        }))
    }

    fn decryptor(&self, key: &[u8], iv: &[u8]) -> CoreResult<Box<dyn StreamTransform>> {
        let cipher = cbc::Decryptor::<Aes128>::new_from_slices(key, iv)
            .map_err(|_| CoreError::crypto("invalid key or IV length for AES-128-CBC"))?;
        Ok(Box::new(CbcDecryptStream {
            cipher,
            pending: Vec::with_capacity(2 * BLOCK_LEN),
            finished: false,
        }))
    }
}

struct CbcEncryptStream {
    cipher: cbc::Encryptor<Aes128>,
    /// Plaintext tail shorter than one block, carried to the next call.
    pending: Vec<u8>,
    finished: bool,
}

impl StreamTransform for CbcEncryptStream {
    fn update(&mut self, input: &[u8]) -> CoreResult<Vec<u8>> {
        if self.finished {
            return Err(CoreError::crypto("transform already finished"));
        }

        self.pending.extend_from_slice(input);
        let full = self.pending.len() - self.pending.len() % BLOCK_LEN;
        let mut out: Vec<u8> = self.pending.drain(..full).collect();

        for block in out.chunks_exact_mut(BLOCK_LEN) {
            self.cipher
                .encrypt_block_mut(GenericArray::from_mut_slice(block));
        }

        Ok(out)
    }

    fn finish(&mut self) -> CoreResult<Vec<u8>> {
        if self.finished {
            return Err(CoreError::crypto("transform already finished"));
        }
        self.finished = true;

        // PKCS#7: always emit a final block, padded with 1..=16 bytes.
        let pad = BLOCK_LEN - self.pending.len();
        let mut block = std::mem::take(&mut self.pending);
        block.resize(BLOCK_LEN, pad as u8);

        self.cipher
            .encrypt_block_mut(GenericArray::from_mut_slice(&mut block));

        Ok(block)
    }
}

struct CbcDecryptStream {
    cipher: cbc::Decryptor<Aes128>,
    /// Undecrypted ciphertext tail; always retains at least one full
    /// block, which may turn out to be the padded final block.
    pending: Vec<u8>,
    finished: bool,
}

impl StreamTransform for CbcDecryptStream {
    fn update(&mut self, input: &[u8]) -> CoreResult<Vec<u8>> {
        if self.finished {
            return Err(CoreError::crypto("transform already finished"));
        }

        self.pending.extend_from_slice(input);

        let keep = match self.pending.len() % BLOCK_LEN {
            0 => BLOCK_LEN,
            rem => rem,
        };
        let full = self.pending.len().saturating_sub(keep);
        let mut out: Vec<u8> = self.pending.drain(..full).collect();

        for block in out.chunks_exact_mut(BLOCK_LEN) {
            self.cipher
                .decrypt_block_mut(GenericArray::from_mut_slice(block));
        }

        Ok(out)
    }

    fn finish(&mut self) -> CoreResult<Vec<u8>> {
        if self.finished {
            return Err(CoreError::crypto("transform already finished"));
        }
        self.finished = true;

        if self.pending.is_empty() {
            return Err(CoreError::crypto("ciphertext is empty or truncated"));
        }
        if self.pending.len() != BLOCK_LEN {
            return Err(CoreError::crypto(
                "ciphertext length is not a multiple of the cipher block size",
            ));
        }

        let mut block = std::mem::take(&mut self.pending);
        self.cipher
            .decrypt_block_mut(GenericArray::from_mut_slice(&mut block));

        let pad = block[BLOCK_LEN - 1] as usize;
        if pad == 0 || pad > BLOCK_LEN || block[BLOCK_LEN - pad..].iter().any(|&b| b as usize != pad)
        {
            return Err(CoreError::crypto("invalid padding in final block"));
        }

        block.truncate(BLOCK_LEN - pad);
        Ok(block)
    }
}
