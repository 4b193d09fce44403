//! The hash primitive shared by leaves and interior nodes.

use alloy_primitives::{B256, keccak256};

/// A fixed 256-bit hash function over byte strings.
///
/// Leaves and interior nodes are hashed with the same function. The only domain separation is
/// the `0x01` tag embedded in sequencer leaf preimages.
pub trait Hasher {
    /// Hashes `data`.
    fn hash(&self, data: &[u8]) -> B256;

    /// Hashes the raw concatenation `left ‖ right`.
    fn hash_pair(&self, left: &B256, right: &B256) -> B256 {
        let mut buf = [0u8; 64];
        buf[..32].copy_from_slice(left.as_slice());
        buf[32..].copy_from_slice(right.as_slice());
        self.hash(&buf)
    }

    /// The hash used for padding leaves: the digest of 32 zero bytes.
    fn zero_leaf(&self) -> B256 {
        self.hash(&[0u8; 32])
    }
}

/// Keccak-256, the hash used by the L1 verifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Keccak256Hasher;

impl Hasher for Keccak256Hasher {
    fn hash(&self, data: &[u8]) -> B256 {
        keccak256(data)
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::b256;

    use super::*;

    #[test]
    fn test_keccak_empty() {
        assert_eq!(
            Keccak256Hasher.hash(&[]),
            b256!("c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470")
        );
    }

    #[test]
    fn test_zero_leaf() {
        assert_eq!(
            Keccak256Hasher.zero_leaf(),
            b256!("290decd9548b62a8d60345a988386fc84ba6bc95484008f6362f93160ef3e563")
        );
    }

    #[test]
    fn test_hash_pair_is_raw_concatenation() {
        let left = B256::repeat_byte(0xaa);
        let right = B256::repeat_byte(0xbb);
        let mut concat = left.to_vec();
        concat.extend_from_slice(right.as_slice());

        assert_eq!(Keccak256Hasher.hash_pair(&left, &right), keccak256(&concat));
        assert_ne!(
            Keccak256Hasher.hash_pair(&left, &right),
            Keccak256Hasher.hash_pair(&right, &left)
        );
    }
}
