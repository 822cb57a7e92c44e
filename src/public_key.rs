use ed25519_dalek::{Signer, SigningKey, VerifyingKey};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

const PUBLIC_KEY_BYTE_COUNT: usize = 32;
const SIGNATURE_BYTE_COUNT: usize = 64;

/// An Ed25519 public key that identifies the owner of a transaction output.
/// The owner must sign the data that spends the output with the matching private key.
#[derive(Debug, Clone, Hash, Serialize, Deserialize, Eq, PartialEq)]
pub struct PublicKey([u8; PUBLIC_KEY_BYTE_COUNT]);

impl PublicKey {
    pub fn from_raw(raw_bytes: [u8; PUBLIC_KEY_BYTE_COUNT]) -> Self {
        Self(raw_bytes)
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0[..]
    }

    /// Returns whether the signature is a valid Ed25519 signature over the message,
    /// produced by the private key matching this public key.
    /// Bytes that do not decode into a valid public key fail verification.
    pub fn verify(&self, message: &[u8], signature: &Signature) -> bool {
        match VerifyingKey::from_bytes(&self.0) {
            Ok(verifying_key) => {
                let signature = ed25519_dalek::Signature::from_bytes(signature.raw());
                verifying_key.verify_strict(message, &signature).is_ok()
            }
            Err(_) => false,
        }
    }
}

impl Display for PublicKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", hex::encode(self.as_slice()))
    }
}

/// Raw Ed25519 signature bytes attached to a transaction input.
/// Signatures are excluded from all signable data, so they never feed back into a digest.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Signature([u8; SIGNATURE_BYTE_COUNT]);

impl Signature {
    pub fn from_raw(raw_bytes: [u8; SIGNATURE_BYTE_COUNT]) -> Self {
        Self(raw_bytes)
    }

    pub fn raw(&self) -> &[u8; SIGNATURE_BYTE_COUNT] {
        &self.0
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0[..]
    }
}

impl Display for Signature {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", hex::encode(self.as_slice()))
    }
}

/// An Ed25519 signing key together with its public half.
/// The validator never signs anything; key pairs exist so that callers can author
/// transactions, e.g. in tests, benchmarks and the demo command.
pub struct KeyPair(SigningKey);

impl KeyPair {
    /// Derives the key pair deterministically from the seed.
    pub fn from_seed(seed: [u8; PUBLIC_KEY_BYTE_COUNT]) -> Self {
        Self(SigningKey::from_bytes(&seed))
    }

    pub fn public_key(&self) -> PublicKey {
        PublicKey::from_raw(self.0.verifying_key().to_bytes())
    }

    pub fn sign(&self, message: &[u8]) -> Signature {
        Signature::from_raw(self.0.sign(message).to_bytes())
    }
}
