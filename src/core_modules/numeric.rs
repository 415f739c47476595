// THEORY:
// The `numeric` module is the correctness core of the crate. Every pixel operation
// that mixes a sample with a coefficient, or one sample representation with another,
// ends up here. It answers one question: "which intermediate type is wide enough to
// hold the exact result before we clamp back into the destination?"
//
// Key architectural principles:
// 1.  **One Table**: Each primitive type is described by a `NumericKind`
//     (byte size, signedness, float). The promotion rule is a pure function over
//     two kinds, so it is written once and shared by MAC, scalar multiply,
//     absolute difference and representation casts.
// 2.  **Exact, Then Clamp**: Integer intermediates are evaluated in `i128` and
//     saturated into the chosen intermediate range; float intermediates use `f64`.
//     Only then is the value clamped into `[T::MIN, T::MAX]` and truncated.
// 3.  **Closed Set**: `Sample` is sealed. A pixel of any representation outside
//     u8/i16/u16/i32/f32/f64 simply does not type-check.

use std::fmt::Debug;
use std::ops::{Add, Mul, Sub};

mod sealed {
    pub trait Sealed {}
}

/// Size and signedness of a primitive numeric type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NumericKind {
    /// Size in bytes.
    pub bytes: u8,
    /// Whether negative values are representable.
    pub signed: bool,
    /// Whether the type is floating point.
    pub float: bool,
}

impl NumericKind {
    /// Double precision float, the intermediate for anything involving floats.
    pub const F64: Self = Self::float(8);

    pub const fn int(bytes: u8, signed: bool) -> Self {
        Self {
            bytes,
            signed,
            float: false,
        }
    }

    pub const fn float(bytes: u8) -> Self {
        Self {
            bytes,
            signed: true,
            float: true,
        }
    }

    /// The next wider representation of the same signedness.
    ///
    /// 64-bit integers and all floats widen to `f64`.
    pub const fn wider(self) -> Self {
        if self.float {
            return Self::F64;
        }
        match self.bytes {
            1 => Self::int(2, self.signed),
            2 => Self::int(4, self.signed),
            4 => Self::int(8, self.signed),
            _ => Self::F64,
        }
    }

    /// Forces an integer kind signed; floats are returned unchanged.
    pub const fn to_signed(self) -> Self {
        if self.float {
            self
        } else {
            Self::int(self.bytes, true)
        }
    }

    /// Chooses the intermediate kind for an operation between `lhs` and `rhs`.
    ///
    /// 1. Any float operand: `f64`.
    /// 2. Different sizes with a signed operand: the larger side, forced signed, widened.
    /// 3. Otherwise the larger of the two widened kinds, signed if either operand is.
    pub const fn promote(lhs: Self, rhs: Self) -> Self {
        if lhs.float || rhs.float {
            return Self::F64;
        }
        let any_signed = lhs.signed || rhs.signed;
        if lhs.bytes > rhs.bytes && any_signed {
            return lhs.to_signed().wider();
        }
        if lhs.bytes < rhs.bytes && any_signed {
            return rhs.to_signed().wider();
        }
        let larger = if lhs.bytes > rhs.bytes { lhs } else { rhs };
        if any_signed {
            larger.to_signed().wider()
        } else {
            larger.wider()
        }
    }

    /// Smallest representable value of an integer kind.
    pub const fn min_i128(self) -> i128 {
        if !self.signed {
            return 0;
        }
        match self.bytes {
            1 => i8::MIN as i128,
            2 => i16::MIN as i128,
            4 => i32::MIN as i128,
            8 => i64::MIN as i128,
            _ => i128::MIN,
        }
    }

    /// Largest representable value of an integer kind.
    pub const fn max_i128(self) -> i128 {
        match (self.bytes, self.signed) {
            (1, true) => i8::MAX as i128,
            (1, false) => u8::MAX as i128,
            (2, true) => i16::MAX as i128,
            (2, false) => u16::MAX as i128,
            (4, true) => i32::MAX as i128,
            (4, false) => u32::MAX as i128,
            (8, true) => i64::MAX as i128,
            (8, false) => u64::MAX as i128,
            _ => i128::MAX,
        }
    }
}

/// A value held in an intermediate computation domain.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Wide {
    Int(i128),
    Float(f64),
}

impl Wide {
    #[inline]
    pub fn as_f64(self) -> f64 {
        match self {
            Wide::Int(v) => v as f64,
            Wide::Float(v) => v,
        }
    }

    #[inline]
    pub fn abs(self) -> Self {
        match self {
            Wide::Int(v) => Wide::Int(v.saturating_abs()),
            Wide::Float(v) => Wide::Float(v.abs()),
        }
    }

    /// Saturates the value into the range of `kind`.
    #[inline]
    pub fn saturate(self, kind: NumericKind) -> Self {
        match self {
            Wide::Int(v) if !kind.float => Wide::Int(v.clamp(kind.min_i128(), kind.max_i128())),
            Wide::Int(v) => Wide::Float(v as f64),
            Wide::Float(v) => Wide::Float(v),
        }
    }

    #[inline]
    fn combine(self, rhs: Self, int: fn(i128, i128) -> i128, float: fn(f64, f64) -> f64) -> Self {
        match (self, rhs) {
            (Wide::Int(a), Wide::Int(b)) => Wide::Int(int(a, b)),
            (a, b) => Wide::Float(float(a.as_f64(), b.as_f64())),
        }
    }
}

impl Add for Wide {
    type Output = Wide;

    fn add(self, rhs: Wide) -> Wide {
        self.combine(rhs, i128::saturating_add, |a, b| a + b)
    }
}

impl Sub for Wide {
    type Output = Wide;

    fn sub(self, rhs: Wide) -> Wide {
        self.combine(rhs, i128::saturating_sub, |a, b| a - b)
    }
}

impl Mul for Wide {
    type Output = Wide;

    fn mul(self, rhs: Wide) -> Wide {
        self.combine(rhs, i128::saturating_mul, |a, b| a * b)
    }
}

/// Any primitive number usable as a coefficient.
pub trait Arithmetic: Copy + Debug + sealed::Sealed + 'static {
    const KIND: NumericKind;

    /// Lifts the value into the integer or float domain.
    fn widen(self, domain: NumericKind) -> Wide;
}

/// A pixel sample representation.
pub trait Sample: Arithmetic + PartialEq + PartialOrd + Default + Send + Sync {
    const MIN: Self;
    const MAX: Self;
    const ZERO: Self;

    /// Clamps a widened value into `[MIN, MAX]` and truncates toward zero.
    fn from_wide(value: Wide) -> Self;

    /// Reduces a hue angle into `[0, 360)`.
    fn wrap_hue(self) -> Self;

    /// Truncating conversion used by the 64-bit distance metric.
    fn to_i64(self) -> i64;
}

macro_rules! impl_arithmetic_int {
    ($($t:ty => $bytes:expr, $signed:expr);+ $(;)?) => {
        $(
            impl sealed::Sealed for $t {}

            impl Arithmetic for $t {
                const KIND: NumericKind = NumericKind::int($bytes, $signed);

                #[inline]
                fn widen(self, domain: NumericKind) -> Wide {
                    if domain.float {
                        Wide::Float(self as f64)
                    } else {
                        Wide::Int(self as i128)
                    }
                }
            }
        )+
    };
}

macro_rules! impl_arithmetic_float {
    ($($t:ty => $bytes:expr);+ $(;)?) => {
        $(
            impl sealed::Sealed for $t {}

            impl Arithmetic for $t {
                const KIND: NumericKind = NumericKind::float($bytes);

                #[inline]
                fn widen(self, _domain: NumericKind) -> Wide {
                    Wide::Float(self as f64)
                }
            }
        )+
    };
}

impl_arithmetic_int! {
    u8 => 1, false;
    i8 => 1, true;
    u16 => 2, false;
    i16 => 2, true;
    u32 => 4, false;
    i32 => 4, true;
    u64 => 8, false;
    i64 => 8, true;
}

impl_arithmetic_float! {
    f32 => 4;
    f64 => 8;
}

macro_rules! impl_sample_int {
    ($($t:ty),+) => {
        $(
            impl Sample for $t {
                const MIN: Self = <$t>::MIN;
                const MAX: Self = <$t>::MAX;
                const ZERO: Self = 0;

                #[inline]
                fn from_wide(value: Wide) -> Self {
                    match value {
                        Wide::Int(v) => v.clamp(Self::MIN as i128, Self::MAX as i128) as Self,
                        // `as` saturates and maps NaN to zero.
                        Wide::Float(v) => v.clamp(Self::MIN as f64, Self::MAX as f64) as Self,
                    }
                }

                #[inline]
                fn wrap_hue(self) -> Self {
                    (self as i64).rem_euclid(360) as Self
                }

                #[inline]
                fn to_i64(self) -> i64 {
                    self as i64
                }
            }
        )+
    };
}

macro_rules! impl_sample_float {
    ($($t:ty),+) => {
        $(
            impl Sample for $t {
                const MIN: Self = <$t>::MIN;
                const MAX: Self = <$t>::MAX;
                const ZERO: Self = 0.0;

                #[inline]
                fn from_wide(value: Wide) -> Self {
                    value.as_f64().clamp(Self::MIN as f64, Self::MAX as f64) as Self
                }

                #[inline]
                fn wrap_hue(self) -> Self {
                    self.rem_euclid(360.0)
                }

                #[inline]
                fn to_i64(self) -> i64 {
                    self as i64
                }
            }
        )+
    };
}

impl_sample_int!(u8, i16, u16, i32);
impl_sample_float!(f32, f64);

/// Clamp-cast from an intermediate value computed in `domain`.
#[inline]
pub fn clamp_cast<T: Sample>(value: Wide, domain: NumericKind) -> T {
    T::from_wide(value.saturate(domain))
}

/// `acc + value * coeff`, computed in the promoted domain of `T` and `C`.
#[inline]
pub fn mul_add<T: Sample, C: Arithmetic>(acc: T, value: T, coeff: C) -> T {
    let domain = NumericKind::promote(T::KIND, C::KIND);
    clamp_cast(
        acc.widen(domain) + value.widen(domain) * coeff.widen(domain),
        domain,
    )
}

/// `value * coeff`, computed in the promoted domain of `T` and `C`.
#[inline]
pub fn scale<T: Sample, C: Arithmetic>(value: T, coeff: C) -> T {
    let domain = NumericKind::promote(T::KIND, C::KIND);
    clamp_cast(value.widen(domain) * coeff.widen(domain), domain)
}

/// `|a - b|`, computed in the signed next-wider domain of `T`.
#[inline]
pub fn abs_diff<T: Sample>(a: T, b: T) -> T {
    let domain = T::KIND.to_signed().wider();
    clamp_cast((a.widen(domain) - b.widen(domain)).abs(), domain)
}

/// Converts one sample representation into another, clamping into the target range.
#[inline]
pub fn cast<T: Sample, U: Sample>(value: T) -> U {
    let domain = NumericKind::promote(T::KIND, U::KIND);
    clamp_cast(value.widen(domain), domain)
}

/// `(a - b)^2` in the signed next-wider domain of `T`, returned unclamped.
#[inline]
pub fn squared_diff<T: Sample>(a: T, b: T) -> Wide {
    let domain = T::KIND.to_signed().wider();
    let diff = a.widen(domain) - b.widen(domain);
    diff * diff
}
