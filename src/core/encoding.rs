//! Canonical wire encodings.
//!
//! The header layout and the transaction schema below are a cross-node
//! contract: field order and little-endian widths must be bit-exact for
//! hashes and signatures to interoperate. Nothing here is inferred at
//! runtime; the schema is fixed and versioned.

use crate::core::block::Header;
use crate::core::transaction::Transaction;
use crate::core::types::Hash;
use crate::error::{BlockchainError, Result};
use crate::wallet::{PublicKey, Signature, PUBLIC_KEY_LEN, SIGNATURE_LEN};
use std::io::{Read, Write};

/// Canonical header layout: version (4) + prev hash (32) + timestamp (8) +
/// height (4) + data hash (32), little-endian.
pub const HEADER_WIRE_LEN: usize = 80;

/// Leading byte of the binary transaction schema.
pub const TX_CODEC_VERSION: u8 = 1;

/// Serializes values of type `T` into a byte stream.
pub trait Encoder<T> {
    fn encode(&mut self, value: &T) -> Result<()>;
}

/// Deserializes values of type `T` from a byte stream.
pub trait Decoder<T> {
    fn decode(&mut self) -> Result<T>;
}

/// Encode a header into its canonical fixed-width bytes.
pub fn encode_header(header: &Header) -> [u8; HEADER_WIRE_LEN] {
    let mut buf = [0u8; HEADER_WIRE_LEN];
    buf[0..4].copy_from_slice(&header.version.to_le_bytes());
    buf[4..36].copy_from_slice(header.prev_hash.as_bytes());
    buf[36..44].copy_from_slice(&header.timestamp.to_le_bytes());
    buf[44..48].copy_from_slice(&header.height.to_le_bytes());
    buf[48..80].copy_from_slice(header.data_hash.as_bytes());
    buf
}

/// Decode canonical header bytes; the input must be exactly 80 bytes.
pub fn decode_header(bytes: &[u8]) -> Result<Header> {
    if bytes.len() != HEADER_WIRE_LEN {
        return Err(BlockchainError::InvalidLength {
            what: "header",
            expected: HEADER_WIRE_LEN,
            got: bytes.len(),
        });
    }

    let mut version = [0u8; 4];
    version.copy_from_slice(&bytes[0..4]);
    let mut timestamp = [0u8; 8];
    timestamp.copy_from_slice(&bytes[36..44]);
    let mut height = [0u8; 4];
    height.copy_from_slice(&bytes[44..48]);

    Ok(Header {
        version: u32::from_le_bytes(version),
        prev_hash: Hash::from_bytes(&bytes[4..36])?,
        timestamp: u64::from_le_bytes(timestamp),
        height: u32::from_le_bytes(height),
        data_hash: Hash::from_bytes(&bytes[48..80])?,
    })
}

/// Streaming encoder for the versioned binary transaction schema.
///
/// Layout: codec version (1) + payload length (4, LE) + payload +
/// sender flag (1) [+ 65-byte point] + signature flag (1) [+ 64-byte r||s].
/// Local metadata (cached hash, first-seen) never travels.
pub struct BinaryTxEncoder<W: Write> {
    writer: W,
}

impl<W: Write> BinaryTxEncoder<W> {
    pub fn new(writer: W) -> BinaryTxEncoder<W> {
        BinaryTxEncoder { writer }
    }
}

impl<W: Write> Encoder<Transaction> for BinaryTxEncoder<W> {
    fn encode(&mut self, tx: &Transaction) -> Result<()> {
        let w = &mut self.writer;
        w.write_all(&[TX_CODEC_VERSION])?;

        let data_len = u32::try_from(tx.data().len()).map_err(|_| {
            BlockchainError::Serialization("transaction payload exceeds u32 length".to_string())
        })?;
        w.write_all(&data_len.to_le_bytes())?;
        w.write_all(tx.data())?;

        match tx.from() {
            Some(from) => {
                w.write_all(&[1])?;
                w.write_all(from.as_bytes())?;
            }
            None => w.write_all(&[0])?,
        }

        match tx.signature() {
            Some(signature) => {
                w.write_all(&[1])?;
                w.write_all(&signature.to_fixed_bytes())?;
            }
            None => w.write_all(&[0])?,
        }

        Ok(())
    }
}

/// Streaming decoder for the versioned binary transaction schema.
pub struct BinaryTxDecoder<R: Read> {
    reader: R,
}

impl<R: Read> BinaryTxDecoder<R> {
    pub fn new(reader: R) -> BinaryTxDecoder<R> {
        BinaryTxDecoder { reader }
    }

    fn read_byte(&mut self) -> Result<u8> {
        let mut byte = [0u8; 1];
        self.reader.read_exact(&mut byte)?;
        Ok(byte[0])
    }
}

impl<R: Read> Decoder<Transaction> for BinaryTxDecoder<R> {
    fn decode(&mut self) -> Result<Transaction> {
        let version = self.read_byte()?;
        if version != TX_CODEC_VERSION {
            return Err(BlockchainError::Serialization(format!(
                "unsupported transaction codec version: {version}"
            )));
        }

        let mut len_bytes = [0u8; 4];
        self.reader.read_exact(&mut len_bytes)?;
        let data_len = u32::from_le_bytes(len_bytes) as usize;

        let mut data = vec![0u8; data_len];
        self.reader.read_exact(&mut data)?;

        let mut tx = Transaction::new(data);

        if self.read_byte()? == 1 {
            let mut point = [0u8; PUBLIC_KEY_LEN];
            self.reader.read_exact(&mut point)?;
            tx.set_from(PublicKey::from_bytes(&point)?);
        }

        if self.read_byte()? == 1 {
            let mut sig = [0u8; SIGNATURE_LEN];
            self.reader.read_exact(&mut sig)?;
            tx.set_signature(Signature::from_fixed_bytes(&sig)?);
        }

        Ok(tx)
    }
}

/// Encode one transaction to a standalone byte vector.
pub fn encode_transaction(tx: &Transaction) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    BinaryTxEncoder::new(&mut buf).encode(tx)?;
    Ok(buf)
}

/// Decode one transaction from a standalone byte vector.
pub fn decode_transaction(bytes: &[u8]) -> Result<Transaction> {
    BinaryTxDecoder::new(bytes).decode()
}

/// The content commitment: SHA-256 over the canonical encoding of every
/// transaction in batch order.
pub fn compute_data_hash(transactions: &[Transaction]) -> Result<Hash> {
    let mut buf = Vec::new();
    let mut encoder = BinaryTxEncoder::new(&mut buf);
    for tx in transactions {
        encoder.encode(tx)?;
    }
    Ok(Hash::digest(&buf))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wallet::PrivateKey;
    use rand::Rng;

    fn random_header() -> Header {
        let mut rng = rand::thread_rng();
        let mut prev = [0u8; 32];
        let mut data = [0u8; 32];
        rng.fill(&mut prev);
        rng.fill(&mut data);
        Header {
            version: rng.gen(),
            prev_hash: Hash::from_array(prev),
            timestamp: rng.gen(),
            height: rng.gen(),
            data_hash: Hash::from_array(data),
        }
    }

    #[test]
    fn test_header_round_trip() {
        for _ in 0..100 {
            let header = random_header();
            let encoded = encode_header(&header);
            let decoded = decode_header(&encoded).unwrap();
            assert_eq!(header, decoded);
        }
    }

    #[test]
    fn test_header_decode_rejects_wrong_length() {
        assert!(decode_header(&[0u8; 79]).is_err());
        assert!(decode_header(&[0u8; 81]).is_err());
    }

    #[test]
    fn test_transaction_round_trip_unsigned() {
        let tx = Transaction::new(b"opaque payload".to_vec());
        let bytes = encode_transaction(&tx).unwrap();
        let decoded = decode_transaction(&bytes).unwrap();

        assert_eq!(decoded.data(), tx.data());
        assert!(decoded.from().is_none());
        assert!(decoded.signature().is_none());
        assert_eq!(decoded.first_seen(), 0);
    }

    #[test]
    fn test_transaction_round_trip_signed() {
        let key = PrivateKey::generate().unwrap();
        let mut tx = Transaction::new(b"signed payload".to_vec());
        tx.sign(&key).unwrap();

        let bytes = encode_transaction(&tx).unwrap();
        let decoded = decode_transaction(&bytes).unwrap();

        assert_eq!(decoded.data(), tx.data());
        assert_eq!(decoded.from(), tx.from());
        assert_eq!(decoded.signature(), tx.signature());
        decoded.verify().unwrap();
    }

    #[test]
    fn test_transaction_decode_rejects_unknown_version() {
        let tx = Transaction::new(b"x".to_vec());
        let mut bytes = encode_transaction(&tx).unwrap();
        bytes[0] = 99;
        assert!(decode_transaction(&bytes).is_err());
    }

    #[test]
    fn test_transaction_decode_rejects_truncated_input() {
        let key = PrivateKey::generate().unwrap();
        let mut tx = Transaction::new(b"truncate me".to_vec());
        tx.sign(&key).unwrap();

        let bytes = encode_transaction(&tx).unwrap();
        assert!(decode_transaction(&bytes[..bytes.len() - 1]).is_err());
    }

    #[test]
    fn test_data_hash_depends_on_order() {
        let tx_a = Transaction::new(b"a".to_vec());
        let tx_b = Transaction::new(b"b".to_vec());

        let forward = compute_data_hash(&[tx_a.clone(), tx_b.clone()]).unwrap();
        let reversed = compute_data_hash(&[tx_b, tx_a]).unwrap();
        assert_ne!(forward, reversed);
    }

    #[test]
    fn test_data_hash_of_empty_batch_is_stable() {
        let a = compute_data_hash(&[]).unwrap();
        let b = compute_data_hash(&[]).unwrap();
        assert_eq!(a, b);
        assert!(!a.is_zero());
    }
}
