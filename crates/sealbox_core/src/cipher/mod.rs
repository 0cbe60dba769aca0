//! Cipher provider seam and the default AES adapter.
//!
//! The engine depends on two small abstractions here: a [`CipherProvider`]
//! that states the required key/IV lengths and hands out transforms, and
//! the [`StreamTransform`] those transforms implement. Both process data a
//! chunk at a time so arbitrarily large payloads never need to be held in
//! memory whole.
//!
//! ## Security Model
//!
//! The default adapter, [`AesCbcProvider`], is AES-128-CBC with PKCS#7
//! padding: **confidentiality only**. There is no MAC or AEAD tag, so
//! tampered ciphertext decrypts to garbage or fails with a padding error
//! rather than being detected explicitly. Callers needing authenticity
//! must layer it on top or plug in a different provider.

mod aes;

pub use aes::AesCbcProvider;

use crate::error::CoreResult;

/// Produces streaming encrypt/decrypt transforms for a given key and IV.
///
/// Providers are pluggable; the engine only relies on this contract and
/// on the reported key/IV lengths.
pub trait CipherProvider: Send + Sync {
    /// Required initialization-vector length in bytes.
    fn iv_len(&self) -> usize;

    /// Required key length in bytes.
    fn key_len(&self) -> usize;

    /// Returns an encrypting transform for `key` and `iv`.
    ///
    /// # Errors
    ///
    /// Returns an error if `key` or `iv` have the wrong length for the
    /// underlying cipher.
    fn encryptor(&self, key: &[u8], iv: &[u8]) -> CoreResult<Box<dyn StreamTransform>>;

    /// Returns a decrypting transform for `key` and `iv`.
    ///
    /// # Errors
    ///
    /// Returns an error if `key` or `iv` have the wrong length for the
    /// underlying cipher.
    fn decryptor(&self, key: &[u8], iv: &[u8]) -> CoreResult<Box<dyn StreamTransform>>;
}

/// A stateful transform that processes a byte stream incrementally.
///
/// Feed input with [`update`](Self::update) as it arrives, then call
/// [`finish`](Self::finish) exactly once after the last chunk. Output
/// lengths need not match input lengths - block transforms buffer
/// partial blocks internally and padding is emitted or stripped at the
/// end.
pub trait StreamTransform: Send {
    /// Processes the next chunk of input, returning any output that is
    /// ready.
    ///
    /// # Errors
    ///
    /// Returns an error if the transform has already been finished or the
    /// cipher rejects the data.
    fn update(&mut self, input: &[u8]) -> CoreResult<Vec<u8>>;

    /// Completes the stream, returning the final output bytes.
    ///
    /// For encryption this emits the padded final block; for decryption
    /// it validates and strips the padding.
    ///
    /// # Errors
    ///
    /// Returns an error on truncated input, invalid padding, or a second
    /// call.
    fn finish(&mut self) -> CoreResult<Vec<u8>>;
}
