use crate::error::{MsdfError, MsdfResult};

use core::convert::TryFrom;
use core::ops::{BitAnd, BitOr, BitXor};

/// The set of distance field channels an edge contributes to.
///
/// Each of the red, green and blue bits selects a channel.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum EdgeColor {
    Black = 0,
    Red = 1,
    Green = 2,
    Yellow = 3,
    Blue = 4,
    Magenta = 5,
    Cyan = 6,
    White = 7,
}

impl EdgeColor {
    #[inline]
    pub fn bits(self) -> u8 {
        self as u8
    }

    /// Returns `InvalidArgument` for values above 7.
    pub fn from_bits(bits: u8) -> MsdfResult<Self> {
        if bits > 7 {
            return Err(MsdfError::InvalidArgument("edge color bits out of range"));
        }

        Ok(EdgeColor::from_bits_truncate(bits))
    }

    /// Builds a color from the three low bits, ignoring the others.
    pub fn from_bits_truncate(bits: u8) -> Self {
        match bits & 7 {
            0 => EdgeColor::Black,
            1 => EdgeColor::Red,
            2 => EdgeColor::Green,
            3 => EdgeColor::Yellow,
            4 => EdgeColor::Blue,
            5 => EdgeColor::Magenta,
            6 => EdgeColor::Cyan,
            _ => EdgeColor::White,
        }
    }

    #[inline]
    pub fn has_red(self) -> bool {
        self.bits() & 1 != 0
    }

    #[inline]
    pub fn has_green(self) -> bool {
        self.bits() & 2 != 0
    }

    #[inline]
    pub fn has_blue(self) -> bool {
        self.bits() & 4 != 0
    }

    /// Number of channels in the set.
    #[inline]
    pub fn channel_count(self) -> u32 {
        self.bits().count_ones()
    }

    /// Returns true if `self` and `other` share at least one channel.
    #[inline]
    pub fn intersects(self, other: EdgeColor) -> bool {
        self.bits() & other.bits() != 0
    }
}

impl Default for EdgeColor {
    fn default() -> Self {
        EdgeColor::White
    }
}

impl TryFrom<u8> for EdgeColor {
    type Error = MsdfError;
    fn try_from(bits: u8) -> MsdfResult<Self> {
        EdgeColor::from_bits(bits)
    }
}

impl BitAnd for EdgeColor {
    type Output = Self;
    #[inline]
    fn bitand(self, other: Self) -> Self {
        EdgeColor::from_bits_truncate(self.bits() & other.bits())
    }
}

impl BitOr for EdgeColor {
    type Output = Self;
    #[inline]
    fn bitor(self, other: Self) -> Self {
        EdgeColor::from_bits_truncate(self.bits() | other.bits())
    }
}

impl BitXor for EdgeColor {
    type Output = Self;
    #[inline]
    fn bitxor(self, other: Self) -> Self {
        EdgeColor::from_bits_truncate(self.bits() ^ other.bits())
    }
}

#[test]
fn color_channels() {
    assert!(EdgeColor::Yellow.has_red());
    assert!(EdgeColor::Yellow.has_green());
    assert!(!EdgeColor::Yellow.has_blue());
    assert_eq!(EdgeColor::Cyan.channel_count(), 2);
    assert_eq!(EdgeColor::White.channel_count(), 3);
    assert_eq!(EdgeColor::Black.channel_count(), 0);

    assert_eq!(EdgeColor::Cyan & EdgeColor::Magenta, EdgeColor::Blue);
    assert_eq!(EdgeColor::Red | EdgeColor::Green, EdgeColor::Yellow);
    assert_eq!(EdgeColor::Cyan ^ EdgeColor::White, EdgeColor::Red);
    assert!(EdgeColor::Cyan.intersects(EdgeColor::Yellow));
    assert!(!EdgeColor::Cyan.intersects(EdgeColor::Red));
}

#[test]
fn color_from_bits() {
    for bits in 0..8u8 {
        assert_eq!(EdgeColor::from_bits(bits).map(EdgeColor::bits), Ok(bits));
    }
    assert!(EdgeColor::from_bits(8).is_err());
    assert_eq!(EdgeColor::try_from(5), Ok(EdgeColor::Magenta));
    assert_eq!(EdgeColor::default(), EdgeColor::White);
}
