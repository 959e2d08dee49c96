//! Key encoding utilities.
//!
//! Index keys length-prefix the contract code so that the prefix for `TC1`
//! never matches entries of `TC10`.

use tindung_core::{ContractCode, HistoryId};

/// Create a contract key from its code.
#[must_use]
pub fn contract_key(code: &ContractCode) -> Vec<u8> {
    code.as_str().as_bytes().to_vec()
}

/// Create a history key from its id.
#[must_use]
pub fn history_key(id: HistoryId) -> Vec<u8> {
    id.to_bytes().to_vec()
}

/// Create a prefix for iterating all history of a contract.
///
/// Format: `len(code) (u32 BE) || code`
#[must_use]
pub fn contract_history_prefix(code: &ContractCode) -> Vec<u8> {
    let bytes = code.as_str().as_bytes();
    let len = u32::try_from(bytes.len()).unwrap_or(u32::MAX);
    let mut key = Vec::with_capacity(4 + bytes.len() + 8);
    key.extend_from_slice(&len.to_be_bytes());
    key.extend_from_slice(bytes);
    key
}

/// Create a contract-history index key.
///
/// Format: `len(code) (u32 BE) || code || id (8 bytes BE)`
///
/// Ids are big-endian so a contract's entries sort in insertion order.
#[must_use]
pub fn contract_history_key(code: &ContractCode, id: HistoryId) -> Vec<u8> {
    let mut key = contract_history_prefix(code);
    key.extend_from_slice(&id.to_bytes());
    key
}

/// Extract the history id from the last eight bytes of an index key.
#[must_use]
pub fn extract_history_id(key: &[u8]) -> Option<HistoryId> {
    let start = key.len().checked_sub(8)?;
    let bytes: [u8; 8] = key[start..].try_into().ok()?;
    Some(HistoryId::from_bytes(bytes))
}

/// Decode a sequence counter value.
#[must_use]
pub fn decode_sequence(value: &[u8]) -> Option<u64> {
    let bytes: [u8; 8] = value.try_into().ok()?;
    Some(u64::from_be_bytes(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(s: &str) -> ContractCode {
        s.parse().unwrap()
    }

    #[test]
    fn index_key_format() {
        let key = contract_history_key(&code("TC001"), HistoryId::new(7));

        assert_eq!(key.len(), 4 + 5 + 8);
        assert_eq!(&key[..4], &5u32.to_be_bytes());
        assert_eq!(&key[4..9], b"TC001");
        assert_eq!(extract_history_id(&key), Some(HistoryId::new(7)));
    }

    #[test]
    fn prefix_does_not_match_longer_code() {
        let prefix = contract_history_prefix(&code("TC1"));
        let other = contract_history_key(&code("TC10"), HistoryId::new(1));
        assert!(!other.starts_with(&prefix));

        let own = contract_history_key(&code("TC1"), HistoryId::new(1));
        assert!(own.starts_with(&prefix));
    }

    #[test]
    fn index_keys_sort_by_id() {
        let a = contract_history_key(&code("TG001"), HistoryId::new(2));
        let b = contract_history_key(&code("TG001"), HistoryId::new(256));
        assert!(a < b);
    }

    #[test]
    fn sequence_decoding() {
        assert_eq!(decode_sequence(&42u64.to_be_bytes()), Some(42));
        assert_eq!(decode_sequence(b"bad"), None);
    }
}
