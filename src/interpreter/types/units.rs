use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// A physical category two units must share to be arithmetic-compatible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    /// Metres and friends.
    Length,
    /// Kilograms and friends.
    Mass,
    /// Seconds and friends. Amounts in these units evaluate to durations.
    Time,
    /// Litres and friends.
    Volume,
    /// Kelvin, Celsius, Fahrenheit.
    Temperature,
    /// Metres per second and friends.
    Speed,
    /// Joules and friends.
    Energy,
    /// Watts and friends.
    Power,
    /// Bytes, in both decimal and binary multiples.
    Data,
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Length => "length",
            Self::Mass => "mass",
            Self::Time => "time",
            Self::Volume => "volume",
            Self::Temperature => "temperature",
            Self::Speed => "speed",
            Self::Energy => "energy",
            Self::Power => "power",
            Self::Data => "data size",
        };
        write!(f, "{name}")
    }
}

/// Multiplier family of a data-size unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataBase {
    /// Powers of 1000 (`KB`, `MB`, ...).
    Decimal,
    /// Powers of 1024 (`KiB`, `MiB`, ...).
    Binary,
}

/// How an amount in a unit maps onto its dimension's base unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scale {
    /// `base = amount * factor`.
    Linear(Decimal),
    /// Degrees Celsius, base kelvin.
    Celsius,
    /// Degrees Fahrenheit, base kelvin.
    Fahrenheit,
}

/// One entry of the fixed unit table.
#[derive(Debug, PartialEq, Eq)]
pub struct UnitDef {
    /// Canonical short symbol.
    pub symbol:    &'static str,
    /// Long singular name, used when displaying an amount of exactly one.
    pub singular:  &'static str,
    /// Long plural name.
    pub plural:    &'static str,
    /// Extra spellings accepted in source.
    pub aliases:   &'static [&'static str],
    /// The unit's dimension.
    pub dimension: Dimension,
    /// Multiplier family for data sizes.
    pub data_base: Option<DataBase>,
    scale:         Scale,
}

macro_rules! unit {
    ($symbol:literal, $singular:literal, $plural:literal, [$($alias:literal),*], $dim:ident, $scale:expr) => {
        UnitDef { symbol:    $symbol,
                  singular:  $singular,
                  plural:    $plural,
                  aliases:   &[$($alias),*],
                  dimension: Dimension::$dim,
                  data_base: None,
                  scale:     $scale, }
    };
    ($symbol:literal, $singular:literal, $plural:literal, [$($alias:literal),*], Data($base:ident), $factor:expr) => {
        UnitDef { symbol:    $symbol,
                  singular:  $singular,
                  plural:    $plural,
                  aliases:   &[$($alias),*],
                  dimension: Dimension::Data,
                  data_base: Some(DataBase::$base),
                  scale:     Scale::Linear($factor), }
    };
}

static UNITS: &[UnitDef] = &[
    // Length, base metre.
    unit!("m", "meter", "meters", ["metre", "metres"], Length, Scale::Linear(dec!(1))),
    unit!("km", "kilometer", "kilometers", ["kilometre", "kilometres"], Length, Scale::Linear(dec!(1000))),
    unit!("cm", "centimeter", "centimeters", ["centimetre", "centimetres"], Length, Scale::Linear(dec!(0.01))),
    unit!("mm", "millimeter", "millimeters", ["millimetre", "millimetres"], Length, Scale::Linear(dec!(0.001))),
    unit!("mi", "mile", "miles", [], Length, Scale::Linear(dec!(1609.344))),
    unit!("ft", "foot", "feet", [], Length, Scale::Linear(dec!(0.3048))),
    unit!("inch", "inch", "inches", [], Length, Scale::Linear(dec!(0.0254))),
    unit!("yd", "yard", "yards", [], Length, Scale::Linear(dec!(0.9144))),
    // Mass, base kilogram.
    unit!("kg", "kilogram", "kilograms", [], Mass, Scale::Linear(dec!(1))),
    unit!("g", "gram", "grams", [], Mass, Scale::Linear(dec!(0.001))),
    unit!("mg", "milligram", "milligrams", [], Mass, Scale::Linear(dec!(0.000001))),
    unit!("lb", "pound", "pounds", ["lbs"], Mass, Scale::Linear(dec!(0.45359237))),
    unit!("oz", "ounce", "ounces", [], Mass, Scale::Linear(dec!(0.028349523125))),
    unit!("t", "tonne", "tonnes", [], Mass, Scale::Linear(dec!(1000))),
    // Time, base second.
    unit!("ms", "millisecond", "milliseconds", [], Time, Scale::Linear(dec!(0.001))),
    unit!("s", "second", "seconds", ["sec", "secs"], Time, Scale::Linear(dec!(1))),
    unit!("min", "minute", "minutes", ["mins"], Time, Scale::Linear(dec!(60))),
    unit!("h", "hour", "hours", ["hr", "hrs"], Time, Scale::Linear(dec!(3600))),
    unit!("day", "day", "days", [], Time, Scale::Linear(dec!(86400))),
    unit!("week", "week", "weeks", ["wk", "wks"], Time, Scale::Linear(dec!(604800))),
    unit!("month", "month", "months", ["mo"], Time, Scale::Linear(dec!(2592000))),
    unit!("year", "year", "years", ["yr", "yrs"], Time, Scale::Linear(dec!(31536000))),
    // Volume, base litre.
    unit!("L", "liter", "liters", ["l", "litre", "litres"], Volume, Scale::Linear(dec!(1))),
    unit!("mL", "milliliter", "milliliters", ["ml", "millilitre", "millilitres"], Volume, Scale::Linear(dec!(0.001))),
    unit!("gal", "gallon", "gallons", [], Volume, Scale::Linear(dec!(3.785411784))),
    unit!("cup", "cup", "cups", [], Volume, Scale::Linear(dec!(0.2365882365))),
    // Temperature, base kelvin.
    unit!("K", "kelvin", "kelvin", [], Temperature, Scale::Linear(dec!(1))),
    unit!("C", "celsius", "celsius", ["°C"], Temperature, Scale::Celsius),
    unit!("F", "fahrenheit", "fahrenheit", ["°F"], Temperature, Scale::Fahrenheit),
    // Speed, base metre per second.
    unit!("mps", "meter per second", "meters per second", [], Speed, Scale::Linear(dec!(1))),
    unit!("kph", "kph", "kph", ["kmh"], Speed, Scale::Linear(dec!(0.2777777777777777777777777778))),
    unit!("mph", "mph", "mph", [], Speed, Scale::Linear(dec!(0.44704))),
    unit!("kn", "knot", "knots", [], Speed, Scale::Linear(dec!(0.5144444444444444444444444444))),
    // Energy, base joule.
    unit!("J", "joule", "joules", [], Energy, Scale::Linear(dec!(1))),
    unit!("kJ", "kilojoule", "kilojoules", [], Energy, Scale::Linear(dec!(1000))),
    unit!("cal", "calorie", "calories", [], Energy, Scale::Linear(dec!(4.184))),
    unit!("kcal", "kilocalorie", "kilocalories", [], Energy, Scale::Linear(dec!(4184))),
    unit!("Wh", "watt-hour", "watt-hours", [], Energy, Scale::Linear(dec!(3600))),
    unit!("kWh", "kilowatt-hour", "kilowatt-hours", [], Energy, Scale::Linear(dec!(3600000))),
    // Power, base watt.
    unit!("W", "watt", "watts", [], Power, Scale::Linear(dec!(1))),
    unit!("kW", "kilowatt", "kilowatts", [], Power, Scale::Linear(dec!(1000))),
    unit!("MW", "megawatt", "megawatts", [], Power, Scale::Linear(dec!(1000000))),
    unit!("hp", "horsepower", "horsepower", [], Power, Scale::Linear(dec!(745.69987158227022))),
    // Data, base byte.
    unit!("B", "byte", "bytes", [], Data(Decimal), dec!(1)),
    unit!("KB", "KB", "KB", ["kB"], Data(Decimal), dec!(1000)),
    unit!("MB", "MB", "MB", [], Data(Decimal), dec!(1000000)),
    unit!("GB", "GB", "GB", [], Data(Decimal), dec!(1000000000)),
    unit!("TB", "TB", "TB", [], Data(Decimal), dec!(1000000000000)),
    unit!("PB", "PB", "PB", [], Data(Decimal), dec!(1000000000000000)),
    unit!("KiB", "KiB", "KiB", [], Data(Binary), dec!(1024)),
    unit!("MiB", "MiB", "MiB", [], Data(Binary), dec!(1048576)),
    unit!("GiB", "GiB", "GiB", [], Data(Binary), dec!(1073741824)),
    unit!("TiB", "TiB", "TiB", [], Data(Binary), dec!(1099511627776)),
];

const KELVIN_OFFSET: Decimal = dec!(273.15);

impl UnitDef {
    fn matches(&self, name: &str) -> bool {
        self.symbol == name
        || self.singular == name
        || self.plural == name
        || self.aliases.contains(&name)
    }

    fn matches_ignore_case(&self, name: &str) -> bool {
        self.symbol.eq_ignore_ascii_case(name)
        || self.singular.eq_ignore_ascii_case(name)
        || self.plural.eq_ignore_ascii_case(name)
        || self.aliases.iter().any(|a| a.eq_ignore_ascii_case(name))
    }

    /// Converts an amount in this unit to the dimension's base unit.
    fn to_base(&self, amount: Decimal) -> Option<Decimal> {
        match self.scale {
            Scale::Linear(factor) => amount.checked_mul(factor),
            Scale::Celsius => amount.checked_add(KELVIN_OFFSET),
            Scale::Fahrenheit => {
                let celsius = amount.checked_sub(dec!(32))?.checked_mul(dec!(5))? / dec!(9);
                celsius.checked_add(KELVIN_OFFSET)
            },
        }
    }

    /// Converts an amount in the dimension's base unit to this unit.
    fn from_base(&self, amount: Decimal) -> Option<Decimal> {
        match self.scale {
            Scale::Linear(factor) => amount.checked_div(factor),
            Scale::Celsius => amount.checked_sub(KELVIN_OFFSET),
            Scale::Fahrenheit => {
                let celsius = amount.checked_sub(KELVIN_OFFSET)?;
                celsius.checked_mul(dec!(9))?.checked_div(dec!(5))?.checked_add(dec!(32))
            },
        }
    }

    /// Seconds in one of this unit. Only meaningful for time units.
    #[must_use]
    pub fn seconds(&self) -> Option<Decimal> {
        match (self.dimension, self.scale) {
            (Dimension::Time, Scale::Linear(factor)) => Some(factor),
            _ => None,
        }
    }

    /// The long name matching `amount`'s grammatical number.
    #[must_use]
    pub fn name_for(&self, amount: Decimal) -> &'static str {
        if amount.abs() == Decimal::ONE {
            self.singular
        } else {
            self.plural
        }
    }

    /// Whether `written` is one of this unit's long names rather than a
    /// symbol. Long names are re-inflected on display.
    #[must_use]
    pub fn is_long_name(&self, written: &str) -> bool {
        (written == self.singular || written == self.plural) && self.singular != self.symbol
    }
}

/// Looks a unit up by symbol, long name or alias.
///
/// Exact matches win; otherwise the lookup falls back to an ASCII
/// case-insensitive match so `KG` and `Kg` still find `kg`.
///
/// # Example
/// ```
/// use calcmark::interpreter::types::units::{Dimension, lookup_unit};
///
/// assert_eq!(lookup_unit("lbs").map(|u| u.symbol), Some("lb"));
/// assert_eq!(lookup_unit("hours").map(|u| u.dimension), Some(Dimension::Time));
/// assert!(lookup_unit("apples").is_none());
/// ```
#[must_use]
pub fn lookup_unit(name: &str) -> Option<&'static UnitDef> {
    UNITS.iter()
         .find(|unit| unit.matches(name))
         .or_else(|| UNITS.iter().find(|unit| unit.matches_ignore_case(name)))
}

/// The dimension of a unit name, or `None` for units outside the table.
#[must_use]
pub fn dimension_of(name: &str) -> Option<Dimension> {
    lookup_unit(name).map(|unit| unit.dimension)
}

/// Returns the unit definition when `name` is a time unit.
#[must_use]
pub fn time_unit(name: &str) -> Option<&'static UnitDef> {
    lookup_unit(name).filter(|unit| unit.dimension == Dimension::Time)
}

/// Whether two unit names may be added or compared.
///
/// Units outside the table are compatible with anything.
#[must_use]
pub fn compatible(left: &str, right: &str) -> bool {
    match (dimension_of(left), dimension_of(right)) {
        (Some(a), Some(b)) => a == b,
        _ => true,
    }
}

/// Whether an operation mixes a binary-base data unit with a decimal-base
/// one (`1 GiB + 1 GB`).
#[must_use]
pub fn mixes_data_bases(left: &str, right: &str) -> bool {
    let base = |name: &str| lookup_unit(name).and_then(|unit| unit.data_base);
    matches!((base(left), base(right)),
             (Some(DataBase::Binary), Some(DataBase::Decimal))
             | (Some(DataBase::Decimal), Some(DataBase::Binary)))
}

/// Converts `amount` from one unit to another of the same dimension.
///
/// Returns `None` when either unit is unknown, the dimensions differ, or the
/// arithmetic overflows.
///
/// # Example
/// ```
/// use calcmark::interpreter::types::units::convert;
/// use rust_decimal::Decimal;
///
/// assert_eq!(convert(Decimal::from(2), "km", "m"), Some(Decimal::from(2000)));
/// assert_eq!(convert(Decimal::from(100), "C", "F"), Some(Decimal::from(212)));
/// assert_eq!(convert(Decimal::from(1), "kg", "m"), None);
/// ```
#[must_use]
pub fn convert(amount: Decimal, from: &str, to: &str) -> Option<Decimal> {
    let from = lookup_unit(from)?;
    let to = lookup_unit(to)?;
    if from.dimension != to.dimension {
        return None;
    }
    if from == to {
        return Some(amount);
    }
    to.from_base(from.to_base(amount)?)
      .map(|converted| converted.normalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pounds_to_kilograms() {
        let kg = convert(dec!(10), "lb", "kg").unwrap();
        assert_eq!(kg, dec!(4.5359237));
    }

    #[test]
    fn fahrenheit_round_trips_through_kelvin() {
        assert_eq!(convert(dec!(32), "F", "C"), Some(dec!(0)));
        assert_eq!(convert(dec!(0), "C", "K"), Some(dec!(273.15)));
    }

    #[test]
    fn unknown_units_are_lenient() {
        assert!(compatible("apples", "kg"));
        assert!(!compatible("kg", "m"));
    }

    #[test]
    fn data_base_mixing_is_detected() {
        assert!(mixes_data_bases("GiB", "GB"));
        assert!(!mixes_data_bases("GB", "MB"));
        assert!(!mixes_data_bases("B", "KiB"));
    }

    #[test]
    fn long_names_inflect() {
        let day = lookup_unit("days").unwrap();
        assert_eq!(day.name_for(dec!(1)), "day");
        assert_eq!(day.name_for(dec!(3)), "days");
        assert!(!lookup_unit("kg").unwrap().is_long_name("kg"));
    }
}
