//! Exact decimal text form
//!
//! Renders an exact rational as text and parses it back without ever
//! passing through a binary float. A terminating rational is written as
//! plain decimal digits ("1.5", "-0.25"); a non-terminating one falls back
//! to ratio form ("1/3"), which is the only exact text a value like 1/3 has.

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};

use crate::error::{Error, Result};

/// Render an exact rational as decimal text, or `numerator/denominator`
/// when no terminating decimal expansion exists.
pub fn decimal_to_text(value: &BigRational) -> String {
    if value.denom().is_one() {
        return value.numer().to_string();
    }

    // A reduced rational terminates exactly when the denominator is 2^a * 5^b.
    let two = BigInt::from(2);
    let five = BigInt::from(5);
    let mut rest = value.denom().clone();
    let mut twos = 0u32;
    let mut fives = 0u32;
    while (&rest % &two).is_zero() {
        rest /= &two;
        twos += 1;
    }
    while (&rest % &five).is_zero() {
        rest /= &five;
        fives += 1;
    }
    if !rest.is_one() {
        return format!("{}/{}", value.numer(), value.denom());
    }

    let scale = twos.max(fives);
    let scaled = value.numer() * BigInt::from(10u32).pow(scale) / value.denom();
    let mut digits = scaled.magnitude().to_string();
    if digits.len() <= scale as usize {
        digits = format!("{}{}", "0".repeat(scale as usize + 1 - digits.len()), digits);
    }
    digits.insert(digits.len() - scale as usize, '.');
    if scaled.is_negative() {
        format!("-{}", digits)
    } else {
        digits
    }
}

/// Parse exact decimal text produced by [`decimal_to_text`]: integer
/// digits, decimal digits, or ratio form.
pub fn decimal_from_text(text: &str) -> Result<BigRational> {
    let malformed = || Error::malformed(format!("invalid decimal text '{}'", text));

    if let Some((numer, denom)) = text.split_once('/') {
        let numer: BigInt = numer.parse().map_err(|_| malformed())?;
        let denom: BigInt = denom.parse().map_err(|_| malformed())?;
        if denom.is_zero() {
            return Err(malformed());
        }
        return Ok(BigRational::new(numer, denom));
    }

    let (negative, unsigned) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };

    let rational = if let Some((int_part, frac_part)) = unsigned.split_once('.') {
        let all_digits =
            |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());
        if !all_digits(frac_part) || !(int_part.is_empty() || all_digits(int_part)) {
            return Err(malformed());
        }
        let digits: BigInt = format!("{}{}", int_part, frac_part)
            .parse()
            .map_err(|_| malformed())?;
        BigRational::new(digits, BigInt::from(10u32).pow(frac_part.len() as u32))
    } else {
        if unsigned.is_empty() || !unsigned.chars().all(|c| c.is_ascii_digit()) {
            return Err(malformed());
        }
        let integer: BigInt = unsigned.parse().map_err(|_| malformed())?;
        BigRational::from_integer(integer)
    };

    Ok(if negative { -rational } else { rational })
}
