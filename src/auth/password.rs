use tracing::error;

/// Work factor for every password hash in the system.
pub const HASH_COST: u32 = 12;

pub fn hash_secret(plain: &str, cost: u32) -> anyhow::Result<String> {
    if plain.is_empty() {
        anyhow::bail!("cannot hash an empty secret");
    }
    bcrypt::hash(plain, cost).map_err(|e| {
        error!(error = %e, "bcrypt hash error");
        anyhow::anyhow!(e.to_string())
    })
}

/// `Ok(false)` on mismatch; errors only on a malformed digest.
pub fn verify_secret(plain: &str, hashed: &str) -> anyhow::Result<bool> {
    bcrypt::verify(plain, hashed).map_err(|e| {
        error!(error = %e, "bcrypt verify error");
        anyhow::anyhow!(e.to_string())
    })
}
