//! Validity flags carried by a raw snapshot

/// Snapshot validity flags
///
/// The wire stores each flag as its own byte; they are folded into one
/// bitset here. Any subset may be set independently.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ValidityFlags(pub u8);

impl ValidityFlags {
    pub const NONE: ValidityFlags = ValidityFlags(0);
    pub const ALL: ValidityFlags = ValidityFlags(
        Self::LEFT_EYE | Self::RIGHT_EYE | Self::EYE_FOLLOWING_BLENDSHAPES | Self::FACE,
    );

    // Flag bits
    pub const LEFT_EYE: u8 = 0b0000_0001;
    pub const RIGHT_EYE: u8 = 0b0000_0010;
    pub const EYE_FOLLOWING_BLENDSHAPES: u8 = 0b0000_0100;
    pub const FACE: u8 = 0b0000_1000;

    #[inline]
    pub fn new(bits: u8) -> Self {
        ValidityFlags(bits)
    }

    #[inline]
    pub fn left_eye(self) -> bool {
        self.0 & Self::LEFT_EYE != 0
    }

    #[inline]
    pub fn right_eye(self) -> bool {
        self.0 & Self::RIGHT_EYE != 0
    }

    #[inline]
    pub fn any_eye(self) -> bool {
        self.left_eye() || self.right_eye()
    }

    #[inline]
    pub fn eye_following_blendshapes(self) -> bool {
        self.0 & Self::EYE_FOLLOWING_BLENDSHAPES != 0
    }

    #[inline]
    pub fn face(self) -> bool {
        self.0 & Self::FACE != 0
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub fn set(&mut self, flag: u8, value: bool) {
        if value {
            self.0 |= flag;
        } else {
            self.0 &= !flag;
        }
    }

    pub fn with(mut self, flag: u8) -> Self {
        self.0 |= flag;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags() {
        let mut flags = ValidityFlags::NONE;
        assert!(flags.is_empty());
        assert!(!flags.any_eye());

        flags.set(ValidityFlags::RIGHT_EYE, true);
        assert!(flags.right_eye());
        assert!(flags.any_eye());
        assert!(!flags.left_eye());

        flags.set(ValidityFlags::FACE, true);
        assert!(flags.face());

        flags.set(ValidityFlags::RIGHT_EYE, false);
        assert!(!flags.any_eye());
        assert!(flags.face());
    }

    #[test]
    fn test_all_flags() {
        let flags = ValidityFlags::ALL;
        assert!(flags.left_eye());
        assert!(flags.right_eye());
        assert!(flags.eye_following_blendshapes());
        assert!(flags.face());
    }
}
