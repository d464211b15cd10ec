use md5::{Digest, Md5};
use std::time::{SystemTime, UNIX_EPOCH};

/// Finalize a digest into lowercase hex, zero-padded to the full 128-bit
/// width.
pub(crate) fn hash_to_string(digest: Md5) -> String {
    let bytes: [u8; 16] = digest.finalize().into();
    format!("{:032x}", u128::from_be_bytes(bytes))
}

pub(crate) fn time_to_unix_nanos(time: SystemTime) -> u64 {
    time.duration_since(UNIX_EPOCH)
        .map(|since_epoch| since_epoch.as_nanos() as u64)
        .unwrap_or_default()
}
