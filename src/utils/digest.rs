use md5::{Digest, Md5};
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;
use tracing::{debug, error, instrument, warn};

/// Salt appended to every password before hashing.
///
/// Changing it invalidates every hash already stored in the data file.
pub const PASSWORD_SALT: &str = "a zhangdaweiok!!!";

/// Number of bytes read at each sample point of a file digest
const SAMPLE_LEN: u64 = 10;

/// Hash a password with the given salt
///
/// Computes MD5 over the UTF-8 bytes of `password + salt` and returns
/// the 32-character lowercase hex digest.
pub fn hash_password(password: &str, salt: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(password.as_bytes());
    hasher.update(salt.as_bytes());
    hex::encode(hasher.finalize())
}

/// Byte offsets sampled by [`sampled_file_digest`] for a file of `size` bytes
pub fn sample_offsets(size: u64) -> [u64; 4] {
    [0, size / 3, (size / 3) * 2, size.saturating_sub(SAMPLE_LEN)]
}

/// Coarse fingerprint of a file built from four 10-byte windows
///
/// Reads up to 10 bytes at the start, one third, two thirds and the tail
/// of the file and hashes them in order. Files that differ only outside
/// those windows produce the same digest.
///
/// Returns `None` if the file does not exist or cannot be read.
#[instrument(level = "debug", skip_all, fields(path = %path.display()))]
pub fn sampled_file_digest(path: &Path) -> Option<String> {
    if !path.exists() {
        warn!(path = %path.display(), "File does not exist, cannot compute digest");
        return None;
    }

    match read_samples(path) {
        Ok(digest) => {
            debug!(path = %path.display(), digest = %digest, "Sampled file digest computed");
            Some(digest)
        }
        Err(e) => {
            error!(path = %path.display(), error = %e, "Failed to compute sampled file digest");
            None
        }
    }
}

fn read_samples(path: &Path) -> std::io::Result<String> {
    let mut file = File::open(path)?;
    let size = file.metadata()?.len();

    let mut hasher = Md5::new();
    let mut chunk = Vec::with_capacity(SAMPLE_LEN as usize);

    for offset in sample_offsets(size) {
        let to_read = SAMPLE_LEN.min(size - offset);
        file.seek(SeekFrom::Start(offset))?;

        chunk.clear();
        (&mut file).take(to_read).read_to_end(&mut chunk)?;
        hasher.update(&chunk);
    }

    Ok(hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_hash_password_known_value() {
        let expected = {
            let mut h = Md5::new();
            h.update(b"secreta zhangdaweiok!!!");
            hex::encode(h.finalize())
        };
        assert_eq!(hash_password("secret", PASSWORD_SALT), expected);
    }

    #[test]
    fn test_hash_password_format() {
        let hash = hash_password("secret", PASSWORD_SALT);
        assert_eq!(hash.len(), 32);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_hash_password_deterministic() {
        assert_eq!(
            hash_password("hunter2", PASSWORD_SALT),
            hash_password("hunter2", PASSWORD_SALT)
        );
    }

    #[test]
    fn test_hash_password_distinct_inputs() {
        assert_ne!(
            hash_password("secret", PASSWORD_SALT),
            hash_password("Secret", PASSWORD_SALT)
        );
        assert_ne!(
            hash_password("secret", PASSWORD_SALT),
            hash_password("secret", "another salt")
        );
    }

    #[test]
    fn test_hash_password_empty_is_md5_of_salt() {
        let mut h = Md5::new();
        h.update(PASSWORD_SALT.as_bytes());
        assert_eq!(hash_password("", PASSWORD_SALT), hex::encode(h.finalize()));
    }

    #[test]
    fn test_hash_password_non_ascii() {
        let hash = hash_password("密码", PASSWORD_SALT);
        assert_eq!(hash.len(), 32);
        assert_ne!(hash, hash_password("mima", PASSWORD_SALT));
    }

    #[test]
    fn test_sample_offsets() {
        assert_eq!(sample_offsets(0), [0, 0, 0, 0]);
        assert_eq!(sample_offsets(5), [0, 1, 2, 0]);
        assert_eq!(sample_offsets(100), [0, 33, 66, 90]);
        // Third offset is (size / 3) * 2, not 2 * size / 3
        assert_eq!(sample_offsets(101), [0, 33, 66, 91]);
    }

    #[test]
    fn test_sampled_digest_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        assert!(sampled_file_digest(&temp_dir.path().join("missing.json")).is_none());
    }

    #[test]
    fn test_sampled_digest_empty_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("empty.json");
        fs::write(&path, b"").unwrap();

        let empty_md5 = hex::encode(Md5::new().finalize());
        assert_eq!(sampled_file_digest(&path).unwrap(), empty_md5);
    }

    #[test]
    fn test_sampled_digest_small_file_reads_overlapping_windows() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("small.json");
        fs::write(&path, b"abcde").unwrap();

        // offsets [0, 1, 2, 0] read "abcde", "bcde", "cde", "abcde"
        let mut h = Md5::new();
        h.update(b"abcdebcdecdeabcde");
        assert_eq!(sampled_file_digest(&path).unwrap(), hex::encode(h.finalize()));
    }

    #[test]
    fn test_sampled_digest_ignores_unsampled_bytes() {
        let temp_dir = TempDir::new().unwrap();
        let a = temp_dir.path().join("a.bin");
        let b = temp_dir.path().join("b.bin");

        let mut content = vec![b'x'; 300];
        fs::write(&a, &content).unwrap();
        // Byte 50 lies outside every window: [0,10) [100,110) [200,210) [290,300)
        content[50] = b'y';
        fs::write(&b, &content).unwrap();

        assert_eq!(sampled_file_digest(&a), sampled_file_digest(&b));
    }

    #[test]
    fn test_sampled_digest_detects_sampled_change() {
        let temp_dir = TempDir::new().unwrap();
        let a = temp_dir.path().join("a.bin");
        let b = temp_dir.path().join("b.bin");

        let mut content = vec![b'x'; 300];
        fs::write(&a, &content).unwrap();
        content[105] = b'y';
        fs::write(&b, &content).unwrap();

        assert_ne!(sampled_file_digest(&a), sampled_file_digest(&b));
    }
}
