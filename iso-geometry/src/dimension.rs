use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Topological dimension of a point set.
///
/// Variants are ordered, so the dimension of a union of sets is the maximum of their dimensions.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub enum Dimension {
    /// Empty set.
    #[default]
    Empty,
    /// Finite set of points.
    Point,
    /// Curves.
    Curve,
    /// Surfaces.
    Surface,
}

impl Dimension {
    /// Numeric value as used in intersection matrices: `-1` for the empty set, otherwise `0..=2`.
    pub fn value(self) -> i8 {
        match self {
            Dimension::Empty => -1,
            Dimension::Point => 0,
            Dimension::Curve => 1,
            Dimension::Surface => 2,
        }
    }

    /// Returns true for [`Dimension::Empty`].
    pub fn is_empty(self) -> bool {
        self == Dimension::Empty
    }

    /// Symbol of the dimension in DE-9IM notation (`F`, `0`, `1` or `2`).
    pub fn symbol(self) -> char {
        match self {
            Dimension::Empty => 'F',
            Dimension::Point => '0',
            Dimension::Curve => '1',
            Dimension::Surface => '2',
        }
    }

    /// Parses a DE-9IM dimension symbol.
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            'F' | 'f' | '-' => Some(Dimension::Empty),
            '0' => Some(Dimension::Point),
            '1' => Some(Dimension::Curve),
            '2' => Some(Dimension::Surface),
            _ => None,
        }
    }
}

impl Display for Dimension {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering() {
        assert!(Dimension::Empty < Dimension::Point);
        assert_eq!(
            [Dimension::Curve, Dimension::Point].into_iter().max(),
            Some(Dimension::Curve)
        );
        assert_eq!(Dimension::Empty.value(), -1);
        assert_eq!(Dimension::from_symbol('2'), Some(Dimension::Surface));
        assert_eq!(Dimension::from_symbol('T'), None);
    }
}
