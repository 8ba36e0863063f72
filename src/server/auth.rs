use sha2::{Digest, Sha256};

/// Shared-secret check for the `X-API-Key` header.
///
/// Only the SHA-256 digest of the secret is kept. Presented keys are hashed
/// and compared digest to digest without an early exit.
#[derive(Clone)]
pub struct ApiKeyGate {
    digest: [u8; 32],
}

impl std::fmt::Debug for ApiKeyGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeyGate").finish_non_exhaustive()
    }
}

fn digest(key: &str) -> [u8; 32] {
    let mut out = [0u8; 32];
    out.copy_from_slice(&Sha256::digest(key.as_bytes()));
    out
}

impl ApiKeyGate {
    pub fn new(secret: &str) -> Self {
        Self {
            digest: digest(secret),
        }
    }

    pub fn allows(&self, presented: Option<&str>) -> bool {
        let Some(key) = presented else {
            return false;
        };
        let candidate = digest(key);
        self.digest
            .iter()
            .zip(candidate.iter())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
    }
}
