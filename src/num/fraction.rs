//! Rational numbers decoded from RATIONAL and SRATIONAL entries

use std::fmt;

/// A numerator/denominator pair
///
/// Values are kept exactly as stored in the file. Cameras write `0/0` for
/// unknown quantities, so a zero denominator is representable: `reduce`
/// leaves it untouched and `to_f64` yields NaN or an infinity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fraction {
    numerator: i64,
    denominator: i64,
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let r = a % b;
        a = b;
        b = r;
    }
    a
}

impl Fraction {
    /// Creates a fraction without reducing it
    pub fn new(numerator: i64, denominator: i64) -> Self {
        Fraction {
            numerator,
            denominator,
        }
    }

    pub fn numerator(&self) -> i64 {
        self.numerator
    }

    pub fn denominator(&self) -> i64 {
        self.denominator
    }

    /// Reduces to lowest terms with the sign on the numerator
    ///
    /// Zero becomes `0/1`.
    pub fn reduce(&self) -> Fraction {
        if self.denominator == 0 {
            return *self;
        }
        if self.numerator == 0 {
            return Fraction::new(0, 1);
        }

        let negative = (self.numerator < 0) != (self.denominator < 0);
        let numerator = self.numerator.unsigned_abs();
        let denominator = self.denominator.unsigned_abs();
        let divisor = gcd(numerator, denominator);
        let numerator = (numerator / divisor) as i64;

        Fraction::new(
            if negative { numerator.wrapping_neg() } else { numerator },
            (denominator / divisor) as i64,
        )
    }

    /// Swaps numerator and denominator
    pub fn reciprocal(&self) -> Fraction {
        Fraction::new(self.denominator, self.numerator)
    }

    /// Lossy conversion to a float
    pub fn to_f64(&self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }

    pub fn is_zero(&self) -> bool {
        self.numerator == 0 && self.denominator != 0
    }

    pub fn is_positive(&self) -> bool {
        (self.numerator > 0 && self.denominator > 0) || (self.numerator < 0 && self.denominator < 0)
    }

    pub fn is_negative(&self) -> bool {
        (self.numerator > 0 && self.denominator < 0) || (self.numerator < 0 && self.denominator > 0)
    }
}

impl From<(u32, u32)> for Fraction {
    fn from((numerator, denominator): (u32, u32)) -> Self {
        Fraction::new(numerator as i64, denominator as i64)
    }
}

impl From<(i32, i32)> for Fraction {
    fn from((numerator, denominator): (i32, i32)) -> Self {
        Fraction::new(numerator as i64, denominator as i64)
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.denominator == 0 {
            return write!(f, "{}/0", self.numerator);
        }
        let reduced = self.reduce();
        if reduced.numerator == 0 {
            write!(f, "0")
        } else if reduced.denominator == 1 {
            write!(f, "{}", reduced.numerator)
        } else {
            write!(f, "{}/{}", reduced.numerator, reduced.denominator)
        }
    }
}
