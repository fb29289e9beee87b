//! Immediate and simple numeric decoders: fixnum, flonum, boxed float, rational, complex.

use crate::{
    encoding::RawValue,
    render::VisitedSet,
    value::{ProxyValue, Session},
    Error, Result,
};

/// Flonum bit pattern that short-circuits to positive zero.
const FLONUM_ZERO: u64 = 0x8000000000000002;

/// Fixnum payload: drop the tag bit with an arithmetic shift, so negative values
/// keep their two's-complement meaning.
#[must_use]
pub(crate) fn fixnum(raw: RawValue) -> i64 {
    raw.signed() >> 1
}

/// Reconstruct the IEEE754 double packed into an immediate flonum.
///
/// Immediate floats store the double's bits rotated left by 3, with the low tag
/// bits replacing what was the sign/exponent top. Unboxing reverses it: from raw
/// `v`, take `b63 = v >> 63`, rebuild the dropped bit pair as `(2 - b63)`, merge
/// with `v & ~3`, rotate right by 3, and reinterpret as a double. One literal
/// pattern is special-cased to 0.0.
#[must_use]
pub(crate) fn flonum(raw: RawValue) -> f64 {
    if raw.0 == FLONUM_ZERO {
        return 0.0;
    }

    let v = raw.0;
    let b63 = v >> 63;
    let t = (2u64.wrapping_sub(b63)) | (v & !3);
    f64::from_bits(t.rotate_right(3))
}

/// Double read straight out of a heap-boxed float.
pub(crate) fn boxed_float(session: &Session<'_>, raw: RawValue) -> Result<f64> {
    let field = session.struct_field("struct RFloat", &["float_value"])?;
    let address = raw
        .address()
        .checked_add(field.offset)
        .ok_or(Error::OutOfBounds)?;
    session.mem().read_f64(address)
}

/// Exact-fraction payload: numerator and denominator, each recursively decoded.
pub(crate) fn rational(
    session: &Session<'_>,
    raw: RawValue,
    visited: &mut VisitedSet,
) -> Result<ProxyValue> {
    let num = RawValue(session.read_struct_field("struct RRational", raw.address(), &["num"])?);
    let den = RawValue(session.read_struct_field("struct RRational", raw.address(), &["den"])?);
    Ok(ProxyValue::Rational(
        Box::new(session.proxy_value(&session.decode(num), visited)),
        Box::new(session.proxy_value(&session.decode(den), visited)),
    ))
}

/// Complex payload: real and imaginary parts, each recursively decoded.
pub(crate) fn complex(
    session: &Session<'_>,
    raw: RawValue,
    visited: &mut VisitedSet,
) -> Result<ProxyValue> {
    let real = RawValue(session.read_struct_field("struct RComplex", raw.address(), &["real"])?);
    let imag = RawValue(session.read_struct_field("struct RComplex", raw.address(), &["imag"])?);
    Ok(ProxyValue::Complex(
        Box::new(session.proxy_value(&session.decode(real), visited)),
        Box::new(session.proxy_value(&session.decode(imag), visited)),
    ))
}

/// Encode a double as an immediate flonum word (test support; the exact inverse
/// of [`flonum`]).
#[cfg(test)]
pub(crate) fn encode_flonum(d: f64) -> RawValue {
    if d == 0.0 {
        return RawValue(FLONUM_ZERO);
    }
    let rotated = d.to_bits().rotate_left(3);
    RawValue((rotated & !3) | 2)
}
