use alloy::network::EthereumWallet;
use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;
use std::fmt;

use crate::error::{StarportError, StarportResult};

/// The operator's signing identity. Key material never leaves this type except
/// as a signer handed to [`EthereumWallet`].
#[derive(Clone)]
pub struct SignedAccount {
    signer: PrivateKeySigner,
}

impl SignedAccount {
    pub fn from_private_key(private_key: &str) -> StarportResult<Self> {
        let signer: PrivateKeySigner = private_key.trim().parse().map_err(|_| {
            StarportError::Secret("private key is not a valid secp256k1 secret".to_string())
        })?;

        Ok(Self { signer })
    }

    pub fn address(&self) -> Address {
        self.signer.address()
    }

    pub fn wallet(&self) -> EthereumWallet {
        EthereumWallet::from(self.signer.clone())
    }
}

impl fmt::Debug for SignedAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignedAccount")
            .field("address", &self.address())
            .field("key", &"<redacted>")
            .finish()
    }
}
