// SPDX-FileCopyrightText: Copyright (c) 2025-2026 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0

//! Resource quantities.
//!
//! A [`Quantity`] is the decimal-with-suffix encoding used for resource
//! amounts in Kubernetes (`"4"`, `"500m"`, `"8Gi"`, `"12e6"`). The numeric
//! value is held as an exact [`Decimal`], so comparisons and arithmetic never
//! go through floating point.
//!
//! Grammar:
//!
//! ```text
//! <quantity>        ::= <signedNumber><suffix>
//! <signedNumber>    ::= <number> | +<number> | -<number>
//! <number>          ::= <digits> | <digits>.<digits> | <digits>. | .<digits>
//! <suffix>          ::= <binarySI> | <decimalExponent> | <decimalSI>
//! <binarySI>        ::= Ki | Mi | Gi | Ti | Pi | Ei
//! <decimalSI>       ::= n | u | m | "" | k | M | G | T | P | E
//! <decimalExponent> ::= "e" <signedNumber> | "E" <signedNumber>
//! ```
//!
//! The string a quantity was parsed from is kept and emitted again on
//! serialization. Quantities produced by arithmetic are rendered in the
//! canonical form of their suffix family.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::QuantityError;

/// Suffix family of a quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// `e3`, `E-6`, ...
    DecimalExponent,
    /// `Ki`, `Mi`, `Gi`, ...
    BinarySI,
    /// `m`, `k`, `M`, ... or no suffix at all
    DecimalSI,
}

const BINARY_SUFFIXES: [(&str, u32); 6] = [
    ("Ki", 1),
    ("Mi", 2),
    ("Gi", 3),
    ("Ti", 4),
    ("Pi", 5),
    ("Ei", 6),
];

const DECIMAL_SUFFIXES: [(&str, i32); 9] = [
    ("n", -9),
    ("u", -6),
    ("m", -3),
    ("k", 3),
    ("M", 6),
    ("G", 9),
    ("T", 12),
    ("P", 15),
    ("E", 18),
];

/// Largest exponent magnitude representable by the backing decimal.
const MAX_EXPONENT: i32 = 28;

/// Most fractional digits the backing decimal can hold.
const MAX_SCALE: u32 = 28;

/// A resource amount such as `"4"`, `"250m"` or `"8Gi"`.
///
/// Equality, ordering and hashing are numeric: `"1Gi"` equals
/// `"1073741824"` and `"500m"` equals `"0.5"`.
#[derive(Clone)]
pub struct Quantity {
    value: Decimal,
    format: Format,
    repr: String,
}

impl Quantity {
    /// Parse a quantity string.
    pub fn parse(input: &str) -> Result<Self, QuantityError> {
        let (value, format) = parse_value(input)?;
        Ok(Self {
            value,
            format,
            repr: input.to_string(),
        })
    }

    /// Build a quantity from an exact value, rendered canonically in `format`.
    pub fn from_decimal(value: Decimal, format: Format) -> Self {
        Self {
            repr: render(value, format),
            value,
            format,
        }
    }

    /// A quantity with binary suffixes, e.g. `Quantity::binary(8 << 30)` is `8Gi`.
    pub fn binary(value: i64) -> Self {
        Self::from_decimal(Decimal::from(value), Format::BinarySI)
    }

    /// The exact numeric value.
    pub fn as_decimal(&self) -> Decimal {
        self.value
    }

    pub fn format(&self) -> Format {
        self.format
    }

    /// The textual form that is emitted on serialization.
    pub fn as_str(&self) -> &str {
        &self.repr
    }

    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.value.is_sign_negative() && !self.value.is_zero()
    }

    /// Value in thousandths, rounded up, if it fits an `i64`.
    pub fn milli_value(&self) -> Option<i64> {
        self.value
            .checked_mul(Decimal::ONE_THOUSAND)
            .and_then(|milli| milli.ceil().to_i64())
    }

    /// Value rounded up to a whole number, if it fits an `i64`.
    pub fn value(&self) -> Option<i64> {
        self.value.ceil().to_i64()
    }

    /// Sum of two quantities in the suffix family of `self`.
    pub fn checked_add(&self, other: &Quantity) -> Option<Quantity> {
        self.value
            .checked_add(other.value)
            .map(|value| Self::from_decimal(value, self.format))
    }

    /// Difference of two quantities in the suffix family of `self`.
    pub fn checked_sub(&self, other: &Quantity) -> Option<Quantity> {
        self.value
            .checked_sub(other.value)
            .map(|value| Self::from_decimal(value, self.format))
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self::from_decimal(Decimal::ZERO, Format::DecimalSI)
    }
}

impl From<i64> for Quantity {
    fn from(value: i64) -> Self {
        Self::from_decimal(Decimal::from(value), Format::DecimalSI)
    }
}

impl FromStr for Quantity {
    type Err = QuantityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for Quantity {
    type Error = QuantityError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Quantity {
    type Error = QuantityError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        let (value, format) = parse_value(&s)?;
        Ok(Self {
            value,
            format,
            repr: s,
        })
    }
}

impl TryFrom<&k8s_openapi::apimachinery::pkg::api::resource::Quantity> for Quantity {
    type Error = QuantityError;

    fn try_from(
        q: &k8s_openapi::apimachinery::pkg::api::resource::Quantity,
    ) -> Result<Self, Self::Error> {
        Self::parse(&q.0)
    }
}

impl From<Quantity> for k8s_openapi::apimachinery::pkg::api::resource::Quantity {
    fn from(q: Quantity) -> Self {
        k8s_openapi::apimachinery::pkg::api::resource::Quantity(q.repr)
    }
}

impl PartialEq for Quantity {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for Quantity {}

impl PartialOrd for Quantity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Quantity {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value)
    }
}

impl Hash for Quantity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.normalize().hash(state);
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.repr)
    }
}

impl fmt::Debug for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Quantity").field(&self.repr).finish()
    }
}

impl Serialize for Quantity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.repr)
    }
}

impl<'de> Deserialize<'de> for Quantity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(QuantityVisitor)
    }
}

struct QuantityVisitor;

impl Visitor<'_> for QuantityVisitor {
    type Value = Quantity;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a resource quantity string or number")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Quantity, E> {
        Quantity::parse(v).map_err(E::custom)
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Quantity, E> {
        Quantity::try_from(v).map_err(E::custom)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Quantity, E> {
        Ok(Quantity::from(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Quantity, E> {
        Ok(Quantity::from_decimal(Decimal::from(v), Format::DecimalSI))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Quantity, E> {
        Quantity::parse(&v.to_string()).map_err(E::custom)
    }
}

fn parse_value(input: &str) -> Result<(Decimal, Format), QuantityError> {
    if input.is_empty() {
        return Err(QuantityError::Empty);
    }

    let (negative, unsigned) = match input.as_bytes()[0] {
        b'-' => (true, &input[1..]),
        b'+' => (false, &input[1..]),
        _ => (false, input),
    };

    let number_len = unsigned
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(unsigned.len());
    let (number, suffix) = unsigned.split_at(number_len);

    if !number.bytes().any(|b| b.is_ascii_digit()) || number.matches('.').count() > 1 {
        return Err(QuantityError::InvalidNumber(input.to_string()));
    }

    let (whole, fraction) = number.split_once('.').unwrap_or((number, ""));
    let fraction = fraction.trim_end_matches('0');
    let (scaling, format) = suffix_scaling(input, suffix)?;

    // Work on an exact integer mantissa and a base-10 scale so that a value
    // the backing decimal cannot hold is rejected instead of rounded.
    let out_of_range = || QuantityError::OutOfRange(input.to_string());
    let mut mantissa = whole
        .bytes()
        .chain(fraction.bytes())
        .try_fold(0i128, |acc, digit| {
            acc.checked_mul(10)?.checked_add(i128::from(digit - b'0'))
        })
        .ok_or_else(out_of_range)?;
    let mut scale = fraction.len() as i64;

    match scaling {
        Scaling::Binary(power) => {
            mantissa = mantissa
                .checked_mul(1i128 << (10 * power))
                .ok_or_else(out_of_range)?;
        }
        Scaling::Decimal(exponent) => scale -= i64::from(exponent),
    }
    if scale < 0 {
        mantissa = 10i128
            .checked_pow(scale.unsigned_abs() as u32)
            .and_then(|factor| mantissa.checked_mul(factor))
            .ok_or_else(out_of_range)?;
        scale = 0;
    }
    while scale > i64::from(MAX_SCALE) && mantissa % 10 == 0 {
        mantissa /= 10;
        scale -= 1;
    }
    if negative {
        mantissa = -mantissa;
    }

    let value = u32::try_from(scale)
        .ok()
        .and_then(|scale| Decimal::try_from_i128_with_scale(mantissa, scale).ok())
        .ok_or_else(out_of_range)?;
    Ok((value, format))
}

enum Scaling {
    /// Multiply by `1024^n`.
    Binary(u32),
    /// Multiply by `10^n`.
    Decimal(i32),
}

fn suffix_scaling(input: &str, suffix: &str) -> Result<(Scaling, Format), QuantityError> {
    if suffix.is_empty() {
        return Ok((Scaling::Decimal(0), Format::DecimalSI));
    }

    if let Some((_, power)) = BINARY_SUFFIXES.iter().find(|(s, _)| *s == suffix) {
        return Ok((Scaling::Binary(*power), Format::BinarySI));
    }

    if let Some((_, exponent)) = DECIMAL_SUFFIXES.iter().find(|(s, _)| *s == suffix) {
        return Ok((Scaling::Decimal(*exponent), Format::DecimalSI));
    }

    if let Some(exponent) = suffix
        .strip_prefix(['e', 'E'])
        .filter(|rest| !rest.is_empty())
        .and_then(|rest| rest.parse::<i32>().ok())
    {
        if exponent.abs() > MAX_EXPONENT {
            return Err(QuantityError::OutOfRange(input.to_string()));
        }
        return Ok((Scaling::Decimal(exponent), Format::DecimalExponent));
    }

    Err(QuantityError::UnknownSuffix {
        input: input.to_string(),
        suffix: suffix.to_string(),
    })
}

fn render(value: Decimal, format: Format) -> String {
    let value = value.normalize();
    if value.is_zero() {
        return "0".to_string();
    }

    match format {
        Format::BinarySI if value.scale() == 0 => {
            let mantissa = value.mantissa();
            for (suffix, power) in BINARY_SUFFIXES.iter().rev() {
                let unit = 1i128 << (10 * power);
                if mantissa % unit == 0 {
                    return format!("{}{}", mantissa / unit, suffix);
                }
            }
            mantissa.to_string()
        }
        Format::BinarySI => render_decimal(value, Format::DecimalSI),
        _ => render_decimal(value, format),
    }
}

fn render_decimal(value: Decimal, format: Format) -> String {
    let scale = value.scale() as i32;
    if scale > 9 {
        return value.to_string();
    }

    let mut mantissa = value.mantissa();
    let mut exponent = -scale;
    while mantissa % 10 == 0 && (format == Format::DecimalExponent || exponent < 18) {
        mantissa /= 10;
        exponent += 1;
    }

    let aligned = exponent.div_euclid(3) * 3;
    mantissa *= 10i128.pow((exponent - aligned) as u32);

    match format {
        Format::DecimalExponent if aligned == 0 => mantissa.to_string(),
        Format::DecimalExponent => format!("{mantissa}e{aligned}"),
        _ => {
            let suffix = DECIMAL_SUFFIXES
                .iter()
                .find(|(_, e)| *e == aligned)
                .map(|(s, _)| *s)
                .unwrap_or("");
            format!("{mantissa}{suffix}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn q(s: &str) -> Quantity {
        Quantity::parse(s).unwrap()
    }

    #[test]
    fn test_parse_plain_and_decimal_si() {
        assert_eq!(q("4").as_decimal(), Decimal::from(4));
        assert_eq!(q("250m").as_decimal(), Decimal::new(25, 2));
        assert_eq!(q("2k").as_decimal(), Decimal::from(2000));
        assert_eq!(q("3M").as_decimal(), Decimal::from(3_000_000));
        assert_eq!(q("1E").as_decimal(), Decimal::from(1_000_000_000_000_000_000i64));
        assert_eq!(q("5n").as_decimal(), Decimal::new(5, 9));
        assert_eq!(q("4").format(), Format::DecimalSI);
    }

    #[test]
    fn test_parse_binary_si() {
        assert_eq!(q("1Ki").as_decimal(), Decimal::from(1024));
        assert_eq!(q("8Gi").as_decimal(), Decimal::from(8i64 << 30));
        assert_eq!(q("1.5Gi").as_decimal(), Decimal::from(3i64 << 29));
        assert_eq!(q("8Gi").format(), Format::BinarySI);
    }

    #[test]
    fn test_parse_exponent() {
        assert_eq!(q("12e6").as_decimal(), Decimal::from(12_000_000));
        assert_eq!(q("1E3").as_decimal(), Decimal::from(1000));
        assert_eq!(q("5e-3").as_decimal(), Decimal::new(5, 3));
        assert_eq!(q("12e6").format(), Format::DecimalExponent);
    }

    #[test]
    fn test_parse_number_forms() {
        assert_eq!(q(".5").as_decimal(), Decimal::new(5, 1));
        assert_eq!(q("5.").as_decimal(), Decimal::from(5));
        assert_eq!(q("+7").as_decimal(), Decimal::from(7));
        assert!(q("-1").is_negative());
        assert!(q("0").is_zero());
        assert!(!q("-0").is_negative());
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(Quantity::parse(""), Err(QuantityError::Empty));
        assert!(matches!(
            Quantity::parse("Gi"),
            Err(QuantityError::InvalidNumber(_))
        ));
        assert!(matches!(
            Quantity::parse("1.2.3"),
            Err(QuantityError::InvalidNumber(_))
        ));
        assert!(matches!(
            Quantity::parse("4Xi"),
            Err(QuantityError::UnknownSuffix { .. })
        ));
        assert!(matches!(
            Quantity::parse("4 Gi"),
            Err(QuantityError::UnknownSuffix { .. })
        ));
        assert!(matches!(
            Quantity::parse("1e40"),
            Err(QuantityError::OutOfRange(_))
        ));
    }

    #[test]
    fn test_unrepresentable_values_are_rejected() {
        for input in [
            "0.0000000000000000000000000001n",
            "1.23456789012345678901234567891",
            "1.0000000000000000000000000001Ki",
            "100000000000000000000000000000Ei",
        ] {
            assert!(
                matches!(Quantity::parse(input), Err(QuantityError::OutOfRange(_))),
                "{input}"
            );
        }

        // trailing zeros carry no precision
        assert_eq!(
            q("1.000000000000000000000000000000000000000000").as_decimal(),
            Decimal::ONE
        );
        assert_eq!(q("0.0000000000000000001n").as_decimal(), Decimal::new(1, 28));
        assert_eq!(q("-1.5Ki").as_decimal(), Decimal::from(-1536));
    }

    #[test]
    fn test_original_text_is_preserved() {
        assert_eq!(q("1024Mi").to_string(), "1024Mi");
        assert_eq!(q("0.5").as_str(), "0.5");
    }

    #[test]
    fn test_numeric_equality_and_hash() {
        assert_eq!(q("1Gi"), q("1073741824"));
        assert_eq!(q("500m"), q("0.5"));
        assert_eq!(q("1k"), q("1e3"));

        let set: HashSet<Quantity> = ["1Gi", "1024Mi", "1073741824"].iter().map(|s| q(s)).collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_ordering() {
        assert!(q("3Gi") < q("7Gi"));
        assert!(q("7Gi") < q("8Gi"));
        assert!(q("999m") < q("1"));
        assert!(q("-1") < q("0"));
    }

    #[test]
    fn test_canonical_rendering() {
        assert_eq!(Quantity::binary(8 << 30).as_str(), "8Gi");
        assert_eq!(Quantity::binary(1536 << 20).as_str(), "1536Mi");
        assert_eq!(Quantity::binary(1000).as_str(), "1000");
        assert_eq!(Quantity::from(2000).as_str(), "2k");
        assert_eq!(Quantity::from(1500).as_str(), "1500");
        assert_eq!(Quantity::from(0).as_str(), "0");
        assert_eq!(
            Quantity::from_decimal(Decimal::new(5, 1), Format::DecimalSI).as_str(),
            "500m"
        );
        assert_eq!(
            Quantity::from_decimal(Decimal::from(12_000_000), Format::DecimalExponent).as_str(),
            "12e6"
        );
    }

    #[test]
    fn test_arithmetic_is_exact() {
        let capacity = q("8Gi");
        let used = q("5Gi");
        let left = capacity.checked_sub(&used).unwrap();
        assert_eq!(left, q("3Gi"));
        assert_eq!(left.as_str(), "3Gi");

        let cpu = q("100m").checked_add(&q("200m")).unwrap();
        assert_eq!(cpu, q("300m"));
        assert_eq!(cpu.as_str(), "300m");
    }

    #[test]
    fn test_milli_value() {
        assert_eq!(q("1").milli_value(), Some(1000));
        assert_eq!(q("250m").milli_value(), Some(250));
        assert_eq!(q("1n").milli_value(), Some(1));
        assert_eq!(q("1.5").value(), Some(2));
    }

    #[test]
    fn test_serde_string_and_number() {
        let parsed: Quantity = serde_json::from_str("\"8Gi\"").unwrap();
        assert_eq!(parsed.as_str(), "8Gi");

        let parsed: Quantity = serde_json::from_str("4").unwrap();
        assert_eq!(parsed, q("4"));

        let parsed: Quantity = serde_json::from_str("0.5").unwrap();
        assert_eq!(parsed, q("500m"));

        assert_eq!(serde_json::to_string(&q("250m")).unwrap(), "\"250m\"");
        assert!(serde_json::from_str::<Quantity>("\"4Xi\"").is_err());
    }

    #[test]
    fn test_k8s_openapi_conversion() {
        let k8s = k8s_openapi::apimachinery::pkg::api::resource::Quantity("2Gi".to_string());
        let ours = Quantity::try_from(&k8s).unwrap();
        assert_eq!(ours, Quantity::binary(2 << 30));

        let back: k8s_openapi::apimachinery::pkg::api::resource::Quantity = ours.into();
        assert_eq!(back.0, "2Gi");
    }
}
