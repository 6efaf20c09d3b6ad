//! Raw face snapshot as written by the producer
//!
//! Snapshot is 316 bytes, little-endian, packed:
//! - Bytes 0-15: Left eye orientation (x, y, z, w as f32)
//! - Bytes 16-31: Right eye orientation (x, y, z, w as f32)
//! - Byte 32: Left eye valid
//! - Byte 33: Right eye valid
//! - Byte 34: Eye-following-blendshapes valid
//! - Byte 35: Face valid
//! - Bytes 36-315: 70 action weights (f32), in `RawExpression` order
//!
//! Flag bytes are true when non-zero. A region may be larger than the
//! snapshot; trailing bytes are ignored.

use bytes::{Buf, BufMut};
use facebridge_core::{
    FaceBridgeError, FaceBridgeResult, Quaternion, RawExpression, RawWeights,
    RAW_EXPRESSION_COUNT,
};

use crate::ValidityFlags;

/// Size of one packed orientation
pub const ORIENTATION_SIZE: usize = 16;

/// Offset of the left eye orientation
pub const LEFT_ORIENTATION_OFFSET: usize = 0;

/// Offset of the right eye orientation
pub const RIGHT_ORIENTATION_OFFSET: usize = LEFT_ORIENTATION_OFFSET + ORIENTATION_SIZE;

/// Offset of the first validity byte
pub const FLAGS_OFFSET: usize = RIGHT_ORIENTATION_OFFSET + ORIENTATION_SIZE;

/// Number of validity bytes
pub const FLAG_COUNT: usize = 4;

/// Offset of the action weight array
pub const WEIGHTS_OFFSET: usize = FLAGS_OFFSET + FLAG_COUNT;

/// Total snapshot size in bytes
pub const SNAPSHOT_SIZE: usize = WEIGHTS_OFFSET + RAW_EXPRESSION_COUNT * 4;

/// Flag bits in wire byte order
const FLAG_ORDER: [u8; FLAG_COUNT] = [
    ValidityFlags::LEFT_EYE,
    ValidityFlags::RIGHT_EYE,
    ValidityFlags::EYE_FOLLOWING_BLENDSHAPES,
    ValidityFlags::FACE,
];

/// Check that a region of `len` bytes can hold a snapshot
pub fn validate_region_len(len: usize) -> FaceBridgeResult<()> {
    if len < SNAPSHOT_SIZE {
        return Err(FaceBridgeError::BufferTooShort {
            expected: SNAPSHOT_SIZE,
            actual: len,
        });
    }
    Ok(())
}

/// Decoded snapshot, owned and detached from the shared region
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RawSnapshot {
    pub left_eye: Quaternion,
    pub right_eye: Quaternion,
    pub flags: ValidityFlags,
    pub weights: RawWeights,
}

impl RawSnapshot {
    /// Snapshot with identity eyes, no validity and zero weights
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn weight(&self, expression: RawExpression) -> f32 {
        self.weights.get(expression)
    }

    /// Parse a snapshot from the start of `buf`
    pub fn parse(buf: &[u8]) -> FaceBridgeResult<Self> {
        validate_region_len(buf.len())?;

        let mut cur = &buf[..SNAPSHOT_SIZE];

        let left_eye = get_quaternion(&mut cur);
        let right_eye = get_quaternion(&mut cur);

        let mut flags = ValidityFlags::NONE;
        for bit in FLAG_ORDER {
            flags.set(bit, cur.get_u8() != 0);
        }

        let mut weights = RawWeights::default();
        for slot in weights.0.iter_mut() {
            *slot = cur.get_f32_le();
        }

        debug_assert!(!cur.has_remaining());

        Ok(RawSnapshot {
            left_eye,
            right_eye,
            flags,
            weights,
        })
    }

    /// Serialize into the start of `buf`
    pub fn serialize(&self, buf: &mut [u8]) -> FaceBridgeResult<()> {
        validate_region_len(buf.len())?;

        let mut cur = &mut buf[..SNAPSHOT_SIZE];
        self.write_into(&mut cur);

        Ok(())
    }

    /// Serialize to a new Vec
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(SNAPSHOT_SIZE);
        self.write_into(&mut buf);
        buf
    }

    fn write_into<B: BufMut>(&self, buf: &mut B) {
        put_quaternion(buf, &self.left_eye);
        put_quaternion(buf, &self.right_eye);

        for bit in FLAG_ORDER {
            buf.put_u8(u8::from(self.flags.0 & bit != 0));
        }

        for weight in self.weights.0 {
            buf.put_f32_le(weight);
        }
    }
}

fn get_quaternion(cur: &mut &[u8]) -> Quaternion {
    let x = cur.get_f32_le();
    let y = cur.get_f32_le();
    let z = cur.get_f32_le();
    let w = cur.get_f32_le();
    Quaternion::new(x, y, z, w)
}

fn put_quaternion<B: BufMut>(buf: &mut B, q: &Quaternion) {
    buf.put_f32_le(q.x);
    buf.put_f32_le(q.y);
    buf.put_f32_le(q.z);
    buf.put_f32_le(q.w);
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample() -> RawSnapshot {
        let mut snapshot = RawSnapshot::new();
        snapshot.left_eye = Quaternion::new(0.1, 0.2, 0.3, 0.9);
        snapshot.right_eye = Quaternion::new(-0.1, 0.0, 0.05, 0.99);
        snapshot.flags = ValidityFlags::NONE
            .with(ValidityFlags::LEFT_EYE)
            .with(ValidityFlags::FACE);
        snapshot.weights.set(RawExpression::JawDrop, 0.75);
        snapshot.weights.set(RawExpression::TongueRetreat, 0.5);
        snapshot
    }

    #[test]
    fn test_snapshot_size() {
        assert_eq!(WEIGHTS_OFFSET, 36);
        assert_eq!(SNAPSHOT_SIZE, 316);
    }

    #[test]
    fn test_fixed_offsets() {
        let bytes = sample().to_bytes();
        assert_eq!(bytes.len(), SNAPSHOT_SIZE);

        // Left orientation w at bytes 12..16
        assert_eq!(f32::from_le_bytes(bytes[12..16].try_into().unwrap()), 0.9);
        // Right orientation x at bytes 16..20
        assert_eq!(f32::from_le_bytes(bytes[16..20].try_into().unwrap()), -0.1);
        // Flag bytes
        assert_eq!(&bytes[FLAGS_OFFSET..WEIGHTS_OFFSET], &[1, 0, 0, 1]);
        // JawDrop is weight 24
        let jaw = WEIGHTS_OFFSET + RawExpression::JawDrop.index() * 4;
        assert_eq!(f32::from_le_bytes(bytes[jaw..jaw + 4].try_into().unwrap()), 0.75);
    }

    #[test]
    fn test_parse_written_snapshot() {
        let snapshot = sample();
        let mut region = vec![0xAAu8; SNAPSHOT_SIZE + 64];
        snapshot.serialize(&mut region).unwrap();

        let parsed = RawSnapshot::parse(&region).unwrap();
        assert_eq!(parsed, snapshot);
        assert!(parsed.flags.left_eye());
        assert!(!parsed.flags.right_eye());
        assert_eq!(parsed.weight(RawExpression::TongueRetreat), 0.5);
    }

    #[test]
    fn test_nonzero_flag_byte_is_true() {
        let mut bytes = RawSnapshot::new().to_bytes();
        bytes[FLAGS_OFFSET + 2] = 0x7F;
        let parsed = RawSnapshot::parse(&bytes).unwrap();
        assert!(parsed.flags.eye_following_blendshapes());
        assert!(!parsed.flags.face());
    }

    #[test]
    fn test_parse_too_short() {
        let buf = [0u8; SNAPSHOT_SIZE - 1];
        let result = RawSnapshot::parse(&buf);
        assert!(matches!(
            result,
            Err(FaceBridgeError::BufferTooShort {
                expected: SNAPSHOT_SIZE,
                ..
            })
        ));
    }

    #[test]
    fn test_serialize_too_short() {
        let mut buf = [0u8; 8];
        assert!(sample().serialize(&mut buf).is_err());
    }

    proptest! {
        #[test]
        fn prop_parse_never_panics(buf in proptest::collection::vec(any::<u8>(), 0..400)) {
            let result = RawSnapshot::parse(&buf);
            prop_assert_eq!(result.is_ok(), buf.len() >= SNAPSHOT_SIZE);
        }
    }
}
