//! Unit registry
//!
//! Maps lowercase unit spellings to a category and a conversion through the
//! category's base unit. Built once and never mutated; share it freely.
//!
//! Data sizes deliberately alias the decimal spellings (KB, MB, ...) to the
//! binary values, while bit-based network units (Kbit, Mbps, ...) are
//! 1000-based. The base unit is the bit so byte↔bit arithmetic is exact.

use crate::semantic::Quantity;
use crate::{TallyError, TallyResult};
use once_cell::sync::Lazy;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, trace};

/// Family of mutually convertible units sharing one base unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Length,
    Mass,
    Volume,
    Temperature,
    Speed,
    Energy,
    Power,
    Area,
    DataSize,
    /// Not in the registry: an arbitrary unit
    Unknown,
}

impl Category {
    pub fn base_unit(&self) -> Option<&'static str> {
        match self {
            Category::Length => Some("meter"),
            Category::Mass => Some("kilogram"),
            Category::Volume => Some("liter"),
            Category::Temperature => Some("celsius"),
            Category::Speed => Some("m/s"),
            Category::Energy => Some("joule"),
            Category::Power => Some("watt"),
            Category::Area => Some("m²"),
            Category::DataSize => Some("bit"),
            Category::Unknown => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Length => write!(f, "length"),
            Category::Mass => write!(f, "mass"),
            Category::Volume => write!(f, "volume"),
            Category::Temperature => write!(f, "temperature"),
            Category::Speed => write!(f, "speed"),
            Category::Energy => write!(f, "energy"),
            Category::Power => write!(f, "power"),
            Category::Area => write!(f, "area"),
            Category::DataSize => write!(f, "data size"),
            Category::Unknown => write!(f, "unknown"),
        }
    }
}

/// How a unit maps onto its category's base unit
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Conversion {
    /// `base = value × factor`
    Linear(f64),
    /// `base = value × scale + offset`; temperatures
    Affine { scale: f64, offset: f64 },
}

impl Conversion {
    pub fn to_base(&self, value: f64) -> f64 {
        match *self {
            Conversion::Linear(factor) => value * factor,
            Conversion::Affine { scale, offset } => value * scale + offset,
        }
    }

    pub fn from_base(&self, base: f64) -> f64 {
        match *self {
            Conversion::Linear(factor) => base / factor,
            Conversion::Affine { scale, offset } => (base - offset) / scale,
        }
    }
}

/// Registry entry shared by every spelling of one unit
#[derive(Debug, Clone, PartialEq)]
pub struct UnitInfo {
    /// First spelling in the table; two spellings are the same unit iff this matches
    pub canonical: &'static str,
    pub category: Category,
    pub conversion: Conversion,
}

impl UnitInfo {
    pub fn to_base(&self, value: f64) -> f64 {
        self.conversion.to_base(value)
    }

    pub fn from_base(&self, base: f64) -> f64 {
        self.conversion.from_base(base)
    }
}

const BYTE: f64 = 8.0;
const KIB: f64 = BYTE * 1024.0;
const MIB: f64 = KIB * 1024.0;
const GIB: f64 = MIB * 1024.0;
const TIB: f64 = GIB * 1024.0;
const PIB: f64 = TIB * 1024.0;

const FAHRENHEIT: Conversion = Conversion::Affine {
    scale: 5.0 / 9.0,
    offset: -32.0 * 5.0 / 9.0,
};
const KELVIN: Conversion = Conversion::Affine {
    scale: 1.0,
    offset: -273.15,
};

type UnitRow = (Category, Conversion, &'static [&'static str]);

#[rustfmt::skip]
const UNIT_TABLE: &[UnitRow] = &[
    // Length (meter)
    (Category::Length, Conversion::Linear(1.0), &["meter", "m", "meters", "metre", "metres"]),
    (Category::Length, Conversion::Linear(1_000.0), &["kilometer", "km", "kilometers", "kilometre", "kilometres"]),
    (Category::Length, Conversion::Linear(0.01), &["centimeter", "cm", "centimeters", "centimetre", "centimetres"]),
    (Category::Length, Conversion::Linear(0.001), &["millimeter", "mm", "millimeters", "millimetre", "millimetres"]),
    (Category::Length, Conversion::Linear(1e-6), &["micrometer", "um", "micrometers", "micrometre", "micrometres"]),
    (Category::Length, Conversion::Linear(1_609.344), &["mile", "mi", "miles"]),
    (Category::Length, Conversion::Linear(0.9144), &["yard", "yd", "yards"]),
    (Category::Length, Conversion::Linear(0.3048), &["foot", "ft", "feet"]),
    (Category::Length, Conversion::Linear(0.0254), &["inch", "inches"]),
    (Category::Length, Conversion::Linear(1_852.0), &["nautical_mile", "nmi", "nautical_miles"]),
    // Mass (kilogram)
    (Category::Mass, Conversion::Linear(1.0), &["kilogram", "kg", "kilograms"]),
    (Category::Mass, Conversion::Linear(0.001), &["gram", "g", "grams"]),
    (Category::Mass, Conversion::Linear(1e-6), &["milligram", "mg", "milligrams"]),
    (Category::Mass, Conversion::Linear(1_000.0), &["tonne", "t", "tonnes", "ton", "tons"]),
    (Category::Mass, Conversion::Linear(0.453_592_37), &["pound", "lb", "lbs", "pounds"]),
    (Category::Mass, Conversion::Linear(0.028_349_523_125), &["ounce", "oz", "ounces"]),
    (Category::Mass, Conversion::Linear(6.350_293_18), &["stone", "st"]),
    // Volume (liter)
    (Category::Volume, Conversion::Linear(1.0), &["liter", "l", "liters", "litre", "litres"]),
    (Category::Volume, Conversion::Linear(0.001), &["milliliter", "ml", "milliliters", "millilitre", "millilitres"]),
    (Category::Volume, Conversion::Linear(0.01), &["centiliter", "cl"]),
    (Category::Volume, Conversion::Linear(0.1), &["deciliter", "dl"]),
    (Category::Volume, Conversion::Linear(1_000.0), &["cubic_meter", "m3", "cubic_meters"]),
    (Category::Volume, Conversion::Linear(3.785_411_784), &["gallon", "gal", "gallons"]),
    (Category::Volume, Conversion::Linear(0.946_352_946), &["quart", "qt", "quarts"]),
    (Category::Volume, Conversion::Linear(0.473_176_473), &["pint", "pt", "pints"]),
    (Category::Volume, Conversion::Linear(0.236_588_236_5), &["cup", "cups"]),
    (Category::Volume, Conversion::Linear(0.029_573_529_562_5), &["fluid_ounce", "floz", "fluid_ounces"]),
    // Temperature (celsius)
    (Category::Temperature, Conversion::Affine { scale: 1.0, offset: 0.0 }, &["celsius", "c", "degc", "°c"]),
    (Category::Temperature, FAHRENHEIT, &["fahrenheit", "f", "degf", "°f"]),
    (Category::Temperature, KELVIN, &["kelvin", "k"]),
    // Speed (m/s)
    (Category::Speed, Conversion::Linear(1.0), &["m/s", "mps"]),
    (Category::Speed, Conversion::Linear(1.0 / 3.6), &["km/h", "kph", "kmh"]),
    (Category::Speed, Conversion::Linear(0.447_04), &["mph"]),
    (Category::Speed, Conversion::Linear(1_852.0 / 3_600.0), &["knot", "kn", "knots"]),
    (Category::Speed, Conversion::Linear(0.3048), &["ft/s", "fps"]),
    // Energy (joule)
    (Category::Energy, Conversion::Linear(1.0), &["joule", "j", "joules"]),
    (Category::Energy, Conversion::Linear(1e3), &["kilojoule", "kj", "kilojoules"]),
    (Category::Energy, Conversion::Linear(1e6), &["megajoule", "mj", "megajoules"]),
    (Category::Energy, Conversion::Linear(3_600.0), &["watthour", "wh", "watthours"]),
    (Category::Energy, Conversion::Linear(3.6e6), &["kilowatthour", "kwh", "kilowatthours"]),
    (Category::Energy, Conversion::Linear(3.6e9), &["megawatthour", "mwh"]),
    (Category::Energy, Conversion::Linear(4.184), &["calorie", "cal", "calories"]),
    (Category::Energy, Conversion::Linear(4_184.0), &["kilocalorie", "kcal", "kilocalories"]),
    (Category::Energy, Conversion::Linear(1_055.055_852_62), &["btu"]),
    // Power (watt)
    (Category::Power, Conversion::Linear(1.0), &["watt", "w", "watts"]),
    (Category::Power, Conversion::Linear(1e3), &["kilowatt", "kw", "kilowatts"]),
    (Category::Power, Conversion::Linear(1e6), &["megawatt", "mw", "megawatts"]),
    (Category::Power, Conversion::Linear(1e-3), &["milliwatt", "milliwatts"]),
    (Category::Power, Conversion::Linear(1e9), &["gigawatt", "gw", "gigawatts"]),
    (Category::Power, Conversion::Linear(745.699_872), &["horsepower", "hp"]),
    // Area (m²)
    (Category::Area, Conversion::Linear(1.0), &["m²", "m2", "sq_m", "square_meter", "square_meters"]),
    (Category::Area, Conversion::Linear(1e6), &["km2", "square_kilometer", "square_kilometers"]),
    (Category::Area, Conversion::Linear(1e-4), &["cm2"]),
    (Category::Area, Conversion::Linear(0.092_903_04), &["ft2", "sq_ft", "square_foot", "square_feet"]),
    (Category::Area, Conversion::Linear(4_046.856_422_4), &["acre", "acres"]),
    (Category::Area, Conversion::Linear(1e4), &["hectare", "ha", "hectares"]),
    // Data size (bit)
    (Category::DataSize, Conversion::Linear(1.0), &["bit", "bits", "bps"]),
    (Category::DataSize, Conversion::Linear(BYTE), &["byte", "b", "bytes"]),
    (Category::DataSize, Conversion::Linear(KIB), &["kib", "kibibyte", "kibibytes", "kb", "kilobyte", "kilobytes"]),
    (Category::DataSize, Conversion::Linear(MIB), &["mib", "mebibyte", "mebibytes", "mb", "megabyte", "megabytes"]),
    (Category::DataSize, Conversion::Linear(GIB), &["gib", "gibibyte", "gibibytes", "gb", "gigabyte", "gigabytes"]),
    (Category::DataSize, Conversion::Linear(TIB), &["tib", "tebibyte", "tebibytes", "tb", "terabyte", "terabytes"]),
    (Category::DataSize, Conversion::Linear(PIB), &["pib", "pebibyte", "pebibytes", "pb", "petabyte", "petabytes"]),
    (Category::DataSize, Conversion::Linear(1e3), &["kbit", "kbits", "kilobit", "kilobits", "kbps"]),
    (Category::DataSize, Conversion::Linear(1e6), &["mbit", "mbits", "megabit", "megabits", "mbps"]),
    (Category::DataSize, Conversion::Linear(1e9), &["gbit", "gbits", "gigabit", "gigabits", "gbps"]),
    (Category::DataSize, Conversion::Linear(1e12), &["tbit", "tbits", "terabit", "terabits", "tbps"]),
];

static REGISTRY: Lazy<UnitRegistry> = Lazy::new(|| {
    let registry = UnitRegistry::new();
    debug!(spellings = registry.len(), "unit registry built");
    registry
});

/// Read-only table of known units
#[derive(Debug, Clone)]
pub struct UnitRegistry {
    units: HashMap<String, UnitInfo>,
}

impl Default for UnitRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl UnitRegistry {
    /// Build a registry from the static unit table
    pub fn new() -> Self {
        let mut units = HashMap::new();
        for (category, conversion, spellings) in UNIT_TABLE {
            let info = UnitInfo {
                canonical: spellings[0],
                category: *category,
                conversion: *conversion,
            };
            for spelling in spellings.iter() {
                let previous = units.insert(spelling.to_string(), info.clone());
                debug_assert!(previous.is_none(), "duplicate unit spelling {}", spelling);
            }
        }
        Self { units }
    }

    /// The process-wide registry, built on first use
    pub fn global() -> &'static UnitRegistry {
        &REGISTRY
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn lookup(&self, name: &str) -> Option<&UnitInfo> {
        self.units.get(&name.trim().to_lowercase())
    }

    pub fn is_known(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    pub fn category(&self, name: &str) -> Category {
        self.lookup(name)
            .map_or(Category::Unknown, |info| info.category)
    }

    /// Data-size spellings that denote bits per second (`Mbps`, `Gbps`, ...)
    pub fn is_throughput_unit(&self, name: &str) -> bool {
        self.category(name) == Category::DataSize && name.trim().to_lowercase().ends_with("ps")
    }

    /// Value expressed in its category's base unit
    pub fn to_base(&self, value: Decimal, unit: &str) -> TallyResult<Decimal> {
        let info = self
            .lookup(unit)
            .ok_or_else(|| TallyError::incompatible_units(unit, "a known unit"))?;
        let operation = format!("conversion of {} to base unit", unit);
        f64_to_decimal(info.to_base(decimal_to_f64(value, &operation)?), &operation)
    }

    /// Convert a magnitude between two unit spellings.
    ///
    /// Identity when the spellings are textually equal or name the same unit.
    /// Arbitrary units and cross-category pairs are incompatible.
    pub fn convert_value(&self, value: Decimal, from: &str, to: &str) -> TallyResult<Decimal> {
        if from == to {
            return Ok(value);
        }
        let (source, target) = match (self.lookup(from), self.lookup(to)) {
            (Some(source), Some(target)) if source.category == target.category => {
                (source, target)
            }
            _ => return Err(TallyError::incompatible_units(from, to)),
        };
        if source.canonical == target.canonical {
            return Ok(value);
        }

        let operation = format!("conversion from {} to {}", from, to);
        let base = source.to_base(decimal_to_f64(value, &operation)?);
        let converted = f64_to_decimal(target.from_base(base), &operation)?;
        trace!(%value, from, to, %converted, "unit conversion");
        Ok(converted)
    }

    /// Convert a quantity, keeping the caller's target spelling
    pub fn convert(&self, quantity: &Quantity, target: &str) -> TallyResult<Quantity> {
        let value = self.convert_value(quantity.value, &quantity.unit, target)?;
        Ok(Quantity::new(value, target))
    }
}

pub(crate) fn decimal_to_f64(value: Decimal, operation: &str) -> TallyResult<f64> {
    value
        .to_f64()
        .ok_or_else(|| TallyError::overflow(operation.to_string()))
}

pub(crate) fn f64_to_decimal(value: f64, operation: &str) -> TallyResult<Decimal> {
    if !value.is_finite() {
        return Err(TallyError::overflow(operation.to_string()));
    }
    Decimal::from_f64(value).ok_or_else(|| TallyError::overflow(operation.to_string()))
}
