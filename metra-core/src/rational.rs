//! Arbitrary-precision rational numbers built on dashu-int
//!
//! A `Rational` is a pair of `IBig` integers kept in lowest terms, with the
//! sign carried by the numerator. A zero denominator is never constructible.
//! All operations return new values; fallible ones return Results and never
//! panic.

use dashu_int::ops::{Abs, BitTest, DivRem, Gcd};
use dashu_int::IBig;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error type for rational arithmetic
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArithmeticError {
    #[error("Division by zero")]
    DivisionByZero,

    #[error("Invalid number format: {0}")]
    InvalidNumber(String),

    #[error("Non-finite floating-point value")]
    NonFinite,

    #[error("Rounding necessary")]
    RoundingNecessary,
}

/// Rounding modes for [`Rational::round`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundingMode {
    /// Away from zero
    Up,
    /// Toward zero
    Down,
    /// Toward positive infinity
    Ceiling,
    /// Toward negative infinity
    Floor,
    /// Nearest neighbor, ties away from zero
    HalfUp,
    /// Nearest neighbor, ties toward zero
    HalfDown,
    /// Nearest neighbor, ties to the even neighbor
    HalfEven,
    /// Assert that no rounding is needed
    Unnecessary,
}

/// An exact fraction of two arbitrary-precision integers
///
/// Invariants: the denominator is strictly positive and gcd(num, den) == 1,
/// so zero is uniquely `0/1` and equality is structural.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Rational {
    num: IBig,
    den: IBig,
}

impl Rational {
    // ========== Construction ==========

    /// Create a fraction from a numerator and denominator, reducing to lowest
    /// terms and normalizing the sign onto the numerator
    pub fn new(num: impl Into<IBig>, den: impl Into<IBig>) -> Result<Self, ArithmeticError> {
        let num = num.into();
        let den = den.into();
        if den == IBig::ZERO {
            return Err(ArithmeticError::DivisionByZero);
        }
        Ok(Self::reduced(num, den))
    }

    /// Create a whole number
    pub fn from_integer(n: impl Into<IBig>) -> Self {
        Self {
            num: n.into(),
            den: IBig::ONE,
        }
    }

    /// The value 0/1
    pub fn zero() -> Self {
        Self::from_integer(0)
    }

    /// The value 1/1
    pub fn one() -> Self {
        Self::from_integer(1)
    }

    /// The value 10/1
    pub fn ten() -> Self {
        Self::from_integer(10)
    }

    /// A rational approximation of pi, correct to 29 digits after the point
    pub fn pi() -> Self {
        let num: IBig = "428224593349304".parse().expect("pi numerator");
        let den: IBig = "136308121570117".parse().expect("pi denominator");
        Self { num, den }
    }

    /// Parse a decimal string of the shape
    /// `[+-]?digits(.digits)?([eE][+-]?digits)?`
    pub fn from_decimal_str(s: &str) -> Result<Self, ArithmeticError> {
        let invalid = || ArithmeticError::InvalidNumber(s.to_string());
        let mut rest = s.trim();
        if rest.is_empty() {
            return Err(invalid());
        }

        let mut negative = false;
        if let Some(stripped) = rest.strip_prefix('-') {
            negative = true;
            rest = stripped;
        } else if let Some(stripped) = rest.strip_prefix('+') {
            rest = stripped;
        }

        let (mantissa_str, exp_str) = match rest.find(['e', 'E']) {
            Some(i) => (&rest[..i], Some(&rest[i + 1..])),
            None => (rest, None),
        };

        let (int_part, frac_part) = match mantissa_str.find('.') {
            Some(i) => (&mantissa_str[..i], &mantissa_str[i + 1..]),
            None => (mantissa_str, ""),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(invalid());
        }
        if !int_part.chars().all(|c| c.is_ascii_digit())
            || !frac_part.chars().all(|c| c.is_ascii_digit())
        {
            return Err(invalid());
        }

        let exponent: i64 = match exp_str {
            Some(e) if !e.is_empty() => e.parse().map_err(|_| invalid())?,
            Some(_) => return Err(invalid()),
            None => 0,
        };

        let digits = format!("{int_part}{frac_part}");
        let mut num: IBig = if digits.is_empty() {
            IBig::ZERO
        } else {
            digits.parse().map_err(|_| invalid())?
        };
        if negative {
            num = -num;
        }

        let scale = frac_part.len() as i64 - exponent;
        let ten = IBig::from(10);
        if scale > 0 {
            Ok(Self::reduced(num, ten.pow(scale as usize)))
        } else {
            Ok(Self::from_integer(num * ten.pow((-scale) as usize)))
        }
    }

    /// Decompose an IEEE-754 double into the exact dyadic rational it stores
    ///
    /// Note that `from_f64(1.1)` yields `2476979795053773/2251799813685248`,
    /// the exact binary value of the double, not `11/10`.
    pub fn from_f64(value: f64) -> Result<Self, ArithmeticError> {
        if !value.is_finite() {
            return Err(ArithmeticError::NonFinite);
        }
        if value == 0.0 {
            return Ok(Self::zero());
        }

        let bits = value.to_bits();
        let negative = bits >> 63 == 1;
        let biased = ((bits >> 52) & 0x7ff) as i64;
        let fraction = bits & ((1u64 << 52) - 1);

        let (mantissa, exp2) = if biased == 0 {
            (fraction, -1074i64)
        } else {
            (fraction | (1 << 52), biased - 1075)
        };

        let mut num = IBig::from(mantissa);
        if negative {
            num = -num;
        }
        if exp2 >= 0 {
            Ok(Self::from_integer(num << exp2 as usize))
        } else {
            Ok(Self::reduced(num, IBig::ONE << (-exp2) as usize))
        }
    }

    /// The numerator, carrying the sign
    pub fn numerator(&self) -> &IBig {
        &self.num
    }

    /// The denominator, always positive
    pub fn denominator(&self) -> &IBig {
        &self.den
    }

    // ========== Predicates ==========

    pub fn is_zero(&self) -> bool {
        self.num == IBig::ZERO
    }

    pub fn is_one(&self) -> bool {
        self.num == IBig::ONE && self.den == IBig::ONE
    }

    pub fn is_negative(&self) -> bool {
        self.num < IBig::ZERO
    }

    /// True when the denominator is 1
    pub fn is_integer(&self) -> bool {
        self.den == IBig::ONE
    }

    /// -1, 0 or 1 according to the sign of the value
    pub fn signum(&self) -> i32 {
        match self.num.cmp(&IBig::ZERO) {
            Ordering::Less => -1,
            Ordering::Equal => 0,
            Ordering::Greater => 1,
        }
    }

    // ========== Basic arithmetic ==========

    /// Addition
    pub fn add(&self, other: &Self) -> Self {
        Self::reduced(
            &self.num * &other.den + &self.den * &other.num,
            &self.den * &other.den,
        )
    }

    /// Subtraction
    pub fn sub(&self, other: &Self) -> Self {
        Self::reduced(
            &self.num * &other.den - &self.den * &other.num,
            &self.den * &other.den,
        )
    }

    /// Multiplication
    pub fn mul(&self, other: &Self) -> Self {
        Self::reduced(&self.num * &other.num, &self.den * &other.den)
    }

    /// Division; fails on a zero divisor
    pub fn div(&self, other: &Self) -> Result<Self, ArithmeticError> {
        if other.is_zero() {
            return Err(ArithmeticError::DivisionByZero);
        }
        Ok(Self::reduced(
            &self.num * &other.den,
            &self.den * &other.num,
        ))
    }

    /// Negation
    pub fn neg(&self) -> Self {
        Self {
            num: -&self.num,
            den: self.den.clone(),
        }
    }

    /// Absolute value
    pub fn abs(&self) -> Self {
        if self.is_negative() {
            self.neg()
        } else {
            self.clone()
        }
    }

    /// The multiplicative inverse; fails on zero
    pub fn reciprocal(&self) -> Result<Self, ArithmeticError> {
        if self.is_zero() {
            return Err(ArithmeticError::DivisionByZero);
        }
        Ok(Self::signed(self.den.clone(), self.num.clone()))
    }

    /// 1 - self
    pub fn complement(&self) -> Self {
        Self {
            num: &self.den - &self.num,
            den: self.den.clone(),
        }
    }

    /// Integer power; `0^0` is 1 and a negative exponent of zero fails
    pub fn pow(&self, exp: i32) -> Result<Self, ArithmeticError> {
        if exp < 0 && self.is_zero() {
            return Err(ArithmeticError::DivisionByZero);
        }
        match exp {
            0 => Ok(Self::one()),
            1 => Ok(self.clone()),
            e if e > 0 => Ok(Self {
                num: self.num.pow(e as usize),
                den: self.den.pow(e as usize),
            }),
            e => Ok(Self::signed(
                self.den.pow((-e) as usize),
                self.num.pow((-e) as usize),
            )),
        }
    }

    /// The smaller of self and other
    pub fn min(&self, other: &Self) -> Self {
        if self <= other {
            self.clone()
        } else {
            other.clone()
        }
    }

    /// The larger of self and other
    pub fn max(&self, other: &Self) -> Self {
        if self >= other {
            self.clone()
        } else {
            other.clone()
        }
    }

    // ========== Rounding ==========

    /// Round to a whole number using the given mode
    ///
    /// Every HALF_X mode reduces to Up or Down after inspecting the
    /// remainder, with a shortcut for denominator 2 where the remainder is
    /// exactly one half.
    pub fn round(&self, mode: RoundingMode) -> Result<IBig, ArithmeticError> {
        // In lowest terms the value is an integer iff the denominator is 1.
        if self.den == IBig::ONE {
            return Ok(self.num.clone());
        }
        if mode == RoundingMode::Unnecessary {
            return Err(ArithmeticError::RoundingNecessary);
        }

        let two = IBig::from(2);
        let (mut int_val, remainder) = (&self.num).div_rem(&self.den);

        let mut mode = mode;
        if matches!(
            mode,
            RoundingMode::HalfUp | RoundingMode::HalfDown | RoundingMode::HalfEven
        ) {
            // In lowest terms the remainder is exactly one half iff den == 2.
            if self.den == two {
                mode = if mode == RoundingMode::HalfUp
                    || (mode == RoundingMode::HalfEven && int_val.bit(0))
                {
                    RoundingMode::Up
                } else {
                    RoundingMode::Down
                };
            } else if (&remainder).abs() <= (&self.den >> 1usize).abs() {
                mode = RoundingMode::Down;
            } else {
                mode = RoundingMode::Up;
            }
        }

        if matches!(mode, RoundingMode::Ceiling | RoundingMode::Floor) {
            // Use the sign of the numerator, not of int_val, to get correct
            // answers for values between -1 and 0.
            mode = if self.num > IBig::ZERO {
                if mode == RoundingMode::Ceiling {
                    RoundingMode::Up
                } else {
                    RoundingMode::Down
                }
            } else if mode == RoundingMode::Ceiling {
                RoundingMode::Down
            } else {
                RoundingMode::Up
            };
        }

        if mode == RoundingMode::Up {
            if self.num > IBig::ZERO {
                int_val += IBig::ONE;
            } else {
                int_val -= IBig::ONE;
            }
        }

        Ok(int_val)
    }

    /// Truncate toward zero into an i64 when it fits
    pub fn to_i64(&self) -> Option<i64> {
        let truncated = &self.num / &self.den;
        i64::try_from(truncated).ok()
    }

    // ========== Decimal conversion ==========

    /// Render as `(unscaled, scale)` with `value ~= unscaled * 10^-scale`
    ///
    /// A fraction terminates in base 10 iff its denominator has the form
    /// `2^a * 5^b`; in that case the result is exact with scale `max(a, b)`.
    /// Otherwise the result is an approximation whose number of significant
    /// digits is derived from the bit lengths of numerator and denominator,
    /// floored up to at least 18.
    pub fn to_decimal(&self) -> (IBig, i64) {
        let twos = self.den.trailing_zeros().unwrap_or(0);
        let mut tmp = &self.den >> twos;
        let five = IBig::from(5);
        let mut fives = 0usize;
        loop {
            let (q, r) = (&tmp).div_rem(&five);
            if r == IBig::ZERO {
                tmp = q;
                fives += 1;
            } else {
                break;
            }
        }

        if tmp == IBig::ONE {
            let scale = twos.max(fives);
            let mut unscaled = self.num.clone();
            if twos < fives {
                unscaled <<= fives - twos;
            } else if fives < twos {
                unscaled *= five.pow(twos - fives);
            }
            return (unscaled, scale as i64);
        }

        // Repeats forever in base 10: pick a number of significant digits
        // that covers both numerator and denominator, bitLength / log2(10).
        const LOG2_10: f64 = 3.321928094887362;
        let bits = self.num.bit_len().max(self.den.bit_len());
        let precision = ((bits as f64 / LOG2_10).ceil() as usize).max(18);
        self.to_decimal_with_precision(precision)
    }

    /// Render as `(unscaled, scale)` with the given number of significant
    /// digits, rounding half to even
    pub fn to_decimal_with_precision(&self, precision: usize) -> (IBig, i64) {
        let n = (&self.num).abs();
        if n == IBig::ZERO {
            return (IBig::ZERO, 0);
        }
        let d = &self.den;
        let ten = IBig::from(10);

        let int_part = &n / d;
        let scale: i64 = if int_part != IBig::ZERO {
            precision as i64 - int_part.to_string().len() as i64
        } else {
            // Count leading fractional zeros to locate the first significant
            // digit below the decimal point.
            let mut shifted = n.clone();
            let mut zeros: i64 = -1;
            while shifted < *d {
                shifted *= IBig::from(10);
                zeros += 1;
            }
            precision as i64 + zeros
        };

        let unscaled_abs = if scale >= 0 {
            div_round_half_even(&(&n * ten.pow(scale as usize)), d)
        } else {
            div_round_half_even(&n, &(d * ten.pow((-scale) as usize)))
        };

        let unscaled = if self.is_negative() {
            -unscaled_abs
        } else {
            unscaled_abs
        };
        (unscaled, scale)
    }

    /// A plain decimal string, exact when the fraction terminates in base 10
    pub fn to_decimal_string(&self) -> String {
        let (unscaled, scale) = self.to_decimal();
        decimal_to_string(&unscaled, scale)
    }

    /// Render as a mixed fraction, e.g. `4/3` as `"1 1/3"`
    ///
    /// For negative values the sign is carried only by the whole part; whole
    /// numbers print without a fraction and proper fractions print as
    /// `num/den`.
    pub fn to_mixed_string(&self) -> String {
        if self.den == IBig::ONE {
            return self.num.to_string();
        }
        if (&self.num).abs() < (&self.den).abs() {
            return self.to_string();
        }
        let (whole, rem) = (&self.num).div_rem(&self.den);
        format!("{} {}/{}", whole, rem.abs(), self.den)
    }

    // ========== Internal helpers ==========

    /// Reduce to lowest terms and normalize the sign
    fn reduced(num: IBig, den: IBig) -> Self {
        debug_assert!(den != IBig::ZERO);
        let g = IBig::from((&num).gcd(&den));
        Self::signed(num / &g, den / g)
    }

    /// Normalize the sign onto the numerator; assumes lowest terms
    fn signed(num: IBig, den: IBig) -> Self {
        if den < IBig::ZERO {
            Self {
                num: -num,
                den: -den,
            }
        } else {
            Self { num, den }
        }
    }
}

/// Divide two positive integers rounding half to even
fn div_round_half_even(n: &IBig, d: &IBig) -> IBig {
    let (q, r) = n.div_rem(d);
    let doubled = r << 1usize;
    match doubled.cmp(d) {
        Ordering::Less => q,
        Ordering::Greater => q + IBig::ONE,
        Ordering::Equal => {
            if q.bit(0) {
                q + IBig::ONE
            } else {
                q
            }
        }
    }
}

/// Place the decimal point of `unscaled * 10^-scale` into a plain string
pub(crate) fn decimal_to_string(unscaled: &IBig, scale: i64) -> String {
    let negative = *unscaled < IBig::ZERO;
    let digits = (unscaled).abs().to_string();
    let body = if scale <= 0 {
        format!("{}{}", digits, "0".repeat((-scale) as usize))
    } else {
        let scale = scale as usize;
        if digits.len() > scale {
            let split = digits.len() - scale;
            format!("{}.{}", &digits[..split], &digits[split..])
        } else {
            format!("0.{}{}", "0".repeat(scale - digits.len()), digits)
        }
    };
    if negative && body.chars().any(|c| c.is_ascii_digit() && c != '0') {
        format!("-{body}")
    } else {
        body
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.num, self.den)
    }
}

impl FromStr for Rational {
    type Err = ArithmeticError;

    /// Parse `"numerator/denominator"` where the `/denominator` part is
    /// optional and both sides are decimal strings
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.find('/') {
            None => Self::from_decimal_str(s),
            Some(i) => {
                let num = Self::from_decimal_str(&s[..i])?;
                let den = Self::from_decimal_str(&s[i + 1..])?;
                num.div(&den)
            }
        }
    }
}

impl PartialOrd for Rational {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Rational {
    fn cmp(&self, other: &Self) -> Ordering {
        // Different signs decide immediately, equal denominators compare
        // numerators, and the general case cross-multiplies.
        let (s1, s2) = (self.signum(), other.signum());
        if s1 != s2 {
            return s1.cmp(&s2);
        }
        if self.den == other.den {
            return self.num.cmp(&other.num);
        }
        (&self.num * &other.den).cmp(&(&self.den * &other.num))
    }
}

impl Serialize for Rational {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Rational {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
