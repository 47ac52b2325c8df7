/// Size units and byte-count conversion.
///
/// All internal sizes are `u64` bytes. Floating point is only used at the
/// display boundary, after the unit has been chosen.
///
/// A unit request is resolved once into a [`UnitSelection`] when the scan is
/// configured; per-entry conversion is then a plain match on the enum.
use crate::error::{Result, ScanError};
use serde::Serialize;
use std::fmt;

/// Unit family: powers of 1000 or powers of 1024.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum UnitFamily {
    #[default]
    Decimal,
    Binary,
}

impl UnitFamily {
    /// Multiplier between adjacent tiers.
    pub fn base(self) -> u64 {
        match self {
            Self::Decimal => 1_000,
            Self::Binary => 1_024,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Decimal => "decimal",
            Self::Binary => "binary",
        }
    }

    /// Units of this family from smallest to largest.
    pub fn units(self) -> [SizeUnit; 5] {
        let scaled: fn(Tier) -> SizeUnit = match self {
            Self::Decimal => SizeUnit::Decimal,
            Self::Binary => SizeUnit::Binary,
        };
        [
            SizeUnit::Byte,
            scaled(Tier::Kilo),
            scaled(Tier::Mega),
            scaled(Tier::Giga),
            scaled(Tier::Tera),
        ]
    }
}

impl fmt::Display for UnitFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Scale tier above plain bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tier {
    Kilo,
    Mega,
    Giga,
    Tera,
}

impl Tier {
    /// Exponent applied to the family base.
    pub fn power(self) -> u32 {
        match self {
            Self::Kilo => 1,
            Self::Mega => 2,
            Self::Giga => 3,
            Self::Tera => 4,
        }
    }
}

/// A concrete display unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SizeUnit {
    Byte,
    Decimal(Tier),
    Binary(Tier),
}

impl SizeUnit {
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Byte => "B",
            Self::Decimal(Tier::Kilo) => "KB",
            Self::Decimal(Tier::Mega) => "MB",
            Self::Decimal(Tier::Giga) => "GB",
            Self::Decimal(Tier::Tera) => "TB",
            Self::Binary(Tier::Kilo) => "KiB",
            Self::Binary(Tier::Mega) => "MiB",
            Self::Binary(Tier::Giga) => "GiB",
            Self::Binary(Tier::Tera) => "TiB",
        }
    }

    /// Family this unit belongs to, or `None` for `B` which belongs to both.
    pub fn family(self) -> Option<UnitFamily> {
        match self {
            Self::Byte => None,
            Self::Decimal(_) => Some(UnitFamily::Decimal),
            Self::Binary(_) => Some(UnitFamily::Binary),
        }
    }

    /// Exponent applied to the family base (0 for bytes).
    pub fn power(self) -> u32 {
        match self {
            Self::Byte => 0,
            Self::Decimal(t) | Self::Binary(t) => t.power(),
        }
    }

    /// Number of bytes in one of this unit.
    pub fn factor(self) -> u64 {
        match self.family() {
            Some(family) => family.base().pow(self.power()),
            None => 1,
        }
    }

    /// Parse a unit symbol (`B`, `KB` .. `TB`, `KiB` .. `TiB`), ignoring ASCII case.
    pub fn parse(token: &str) -> Option<Self> {
        let token = token.trim();
        UnitFamily::Decimal
            .units()
            .into_iter()
            .chain(UnitFamily::Binary.units())
            .find(|u| u.symbol().eq_ignore_ascii_case(token))
    }
}

impl fmt::Display for SizeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl Serialize for SizeUnit {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.symbol())
    }
}

/// How the display unit is chosen for each entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitSelection {
    /// Largest convenient unit of the family, chosen per value.
    Auto(UnitFamily),
    /// Always this unit.
    Fixed(SizeUnit),
}

impl Default for UnitSelection {
    fn default() -> Self {
        Self::Fixed(SizeUnit::Decimal(Tier::Mega))
    }
}

impl UnitSelection {
    /// Resolve a unit token against an optional explicit family.
    ///
    /// Accepts every unit symbol plus `auto`, `auto-decimal` and
    /// `auto-binary`. Plain `auto` takes the explicit family, or decimal.
    /// A fixed unit from the other family than `family` is rejected.
    pub fn resolve(token: &str, family: Option<UnitFamily>) -> Result<Self> {
        let lowered = token.trim().to_ascii_lowercase();
        let selection = match lowered.as_str() {
            "auto" => return Ok(Self::Auto(family.unwrap_or_default())),
            "auto-decimal" => Self::Auto(UnitFamily::Decimal),
            "auto-binary" => Self::Auto(UnitFamily::Binary),
            _ => match SizeUnit::parse(token) {
                Some(unit) => Self::Fixed(unit),
                None => {
                    return Err(ScanError::InvalidUnit {
                        unit: token.to_string(),
                        family: family.unwrap_or_default().label(),
                    })
                }
            },
        };

        if let Some(requested) = family {
            if let Some(actual) = selection.family() {
                if actual != requested {
                    return Err(ScanError::InvalidUnit {
                        unit: token.to_string(),
                        family: requested.label(),
                    });
                }
            }
        }
        Ok(selection)
    }

    /// Family implied by the selection, `None` for a fixed `B`.
    pub fn family(self) -> Option<UnitFamily> {
        match self {
            Self::Auto(family) => Some(family),
            Self::Fixed(unit) => unit.family(),
        }
    }
}

/// A numeric display value: exact for bytes, rounded for scaled units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SizeValue {
    Exact(u64),
    Rounded(f64),
}

impl SizeValue {
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Exact(v) => v as f64,
            Self::Rounded(v) => v,
        }
    }
}

impl fmt::Display for SizeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(v) => write!(f, "{v}"),
            Self::Rounded(v) => write!(f, "{v}"),
        }
    }
}

/// Result of a conversion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConvertedSize {
    pub value: SizeValue,
    pub unit: SizeUnit,
}

/// Pick the largest unit of `family` that keeps the value at or above 1.
pub fn auto_unit(bytes: u64, family: UnitFamily) -> SizeUnit {
    let units = family.units();
    let base = u128::from(family.base());
    let bytes = u128::from(bytes);
    let mut index = 0;
    while index + 1 < units.len() && bytes >= base.pow(index as u32 + 1) {
        index += 1;
    }
    units[index]
}

/// Convert a byte count for display.
///
/// Bytes are reported exactly. Scaled units are rounded to two decimal
/// places, half away from zero (`f64::round`).
pub fn convert(bytes: u64, selection: UnitSelection) -> ConvertedSize {
    let unit = match selection {
        UnitSelection::Auto(family) => auto_unit(bytes, family),
        UnitSelection::Fixed(unit) => unit,
    };
    let value = match unit {
        SizeUnit::Byte => SizeValue::Exact(bytes),
        _ => {
            let scaled = bytes as f64 / unit.factor() as f64;
            SizeValue::Rounded((scaled * 100.0).round() / 100.0)
        }
    };
    ConvertedSize { value, unit }
}

/// Convert a signed byte count, rejecting negative values.
pub fn convert_signed(bytes: i64, selection: UnitSelection) -> Result<ConvertedSize> {
    let bytes = u64::try_from(bytes)
        .map_err(|_| ScanError::invalid_input(format!("byte count must not be negative: {bytes}")))?;
    Ok(convert(bytes, selection))
}

/// Group the digits of `count` in threes, e.g. `1,048,576`.
pub fn format_count(count: u64) -> String {
    let digits = count.to_string();
    let lead = digits.len() % 3;
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (i + 3 - lead) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    const MB: SizeUnit = SizeUnit::Decimal(Tier::Mega);
    const GIB: SizeUnit = SizeUnit::Binary(Tier::Giga);

    #[test]
    fn bytes_are_exact() {
        let c = convert(123_456_789_012, UnitSelection::Fixed(SizeUnit::Byte));
        assert_eq!(c.value, SizeValue::Exact(123_456_789_012));
        assert_eq!(c.unit.symbol(), "B");
    }

    #[test]
    fn fixed_units_round_to_two_places() {
        let c = convert(1_234_567, UnitSelection::Fixed(MB));
        assert_eq!(c.value, SizeValue::Rounded(1.23));

        let c = convert(1_125_000, UnitSelection::Fixed(MB));
        assert_eq!(c.value, SizeValue::Rounded(1.13), "half rounds away from zero");

        let c = convert(3 * 1024 * 1024 * 1024, UnitSelection::Fixed(GIB));
        assert_eq!(c.value, SizeValue::Rounded(3.0));
    }

    #[test]
    fn round_trip_within_rounding_tolerance() {
        let samples = [0_u64, 1, 999, 1_000, 1_536, 987_654_321, 5_000_000_000_000];
        for family in [UnitFamily::Decimal, UnitFamily::Binary] {
            for unit in family.units() {
                for &bytes in &samples {
                    let c = convert(bytes, UnitSelection::Fixed(unit));
                    let back = c.value.as_f64() * unit.factor() as f64;
                    let tolerance = 0.005 * unit.factor() as f64 + 1e-6;
                    assert!(
                        (back - bytes as f64).abs() <= tolerance,
                        "{bytes} in {unit}: got {back}"
                    );
                }
            }
        }
    }

    #[test]
    fn auto_picks_largest_convenient_unit() {
        let dec = UnitSelection::Auto(UnitFamily::Decimal);
        assert_eq!(convert(999, dec).unit.symbol(), "B");
        assert_eq!(convert(1_000, dec).unit.symbol(), "KB");
        assert_eq!(convert(600_000_000, dec).unit.symbol(), "MB");
        assert_eq!(convert(2_500_000_000_000, dec).unit.symbol(), "TB");
        // Capped at TB.
        assert_eq!(convert(u64::MAX, dec).unit.symbol(), "TB");

        let bin = UnitSelection::Auto(UnitFamily::Binary);
        assert_eq!(convert(1_023, bin).unit.symbol(), "B");
        assert_eq!(convert(1_024, bin).unit.symbol(), "KiB");
        assert_eq!(convert(1_000_000, bin).unit.symbol(), "KiB");
        assert_eq!(convert(1_048_576, bin).unit.symbol(), "MiB");
    }

    #[test]
    fn auto_unit_is_monotonic() {
        for family in [UnitFamily::Decimal, UnitFamily::Binary] {
            let mut last = 0;
            let mut bytes = 1_u64;
            while bytes < u64::MAX / 3 {
                let power = auto_unit(bytes, family).power();
                assert!(power >= last, "{bytes}: {power} < {last}");
                last = power;
                bytes = bytes * 3 + 1;
            }
        }
    }

    #[test]
    fn resolve_accepts_tokens_case_insensitively() {
        assert_eq!(UnitSelection::resolve("mb", None).unwrap(), UnitSelection::Fixed(MB));
        assert_eq!(UnitSelection::resolve("GiB", None).unwrap(), UnitSelection::Fixed(GIB));
        assert_eq!(
            UnitSelection::resolve("auto", Some(UnitFamily::Binary)).unwrap(),
            UnitSelection::Auto(UnitFamily::Binary)
        );
        assert_eq!(
            UnitSelection::resolve("Auto-Decimal", None).unwrap(),
            UnitSelection::Auto(UnitFamily::Decimal)
        );
    }

    #[test]
    fn resolve_rejects_unit_from_other_family() {
        let err = UnitSelection::resolve("KiB", Some(UnitFamily::Decimal)).unwrap_err();
        assert!(matches!(err, ScanError::InvalidUnit { family: "decimal", .. }));

        let err = UnitSelection::resolve("auto-binary", Some(UnitFamily::Decimal)).unwrap_err();
        assert!(matches!(err, ScanError::InvalidUnit { .. }));

        // Bytes fit either family.
        assert!(UnitSelection::resolve("B", Some(UnitFamily::Binary)).is_ok());
    }

    #[test]
    fn resolve_rejects_unknown_token() {
        assert!(matches!(
            UnitSelection::resolve("PB", None),
            Err(ScanError::InvalidUnit { .. })
        ));
    }

    #[test]
    fn negative_byte_count_is_invalid_input() {
        let err = convert_signed(-1, UnitSelection::default()).unwrap_err();
        assert!(matches!(err, ScanError::InvalidInput(_)));
        assert!(convert_signed(0, UnitSelection::default()).is_ok());
    }

    #[test]
    fn value_display_drops_trailing_zeros() {
        assert_eq!(SizeValue::Rounded(600.0).to_string(), "600");
        assert_eq!(SizeValue::Rounded(1.5).to_string(), "1.5");
        assert_eq!(SizeValue::Exact(42).to_string(), "42");
    }

    #[test]
    fn counts_are_grouped_in_threes() {
        let cases = [
            (7, "7"),
            (512, "512"),
            (4_096, "4,096"),
            (123_456, "123,456"),
            (1_048_576, "1,048,576"),
            (u64::MAX, "18,446,744,073,709,551,615"),
        ];
        for (count, expected) in cases {
            assert_eq!(format_count(count), expected);
        }
    }
}
