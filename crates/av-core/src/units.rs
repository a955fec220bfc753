// av-core/src/units.rs

use thiserror::Error;
use uom::si::f64::{Energy as UomEnergy, Length as UomLength, Mass as UomMass, Pressure as UomPressure};

// Canonical quantity types (SI storage, converted to CGS at the edges)
pub type Energy = UomEnergy;
pub type Length = UomLength;
pub type Mass = UomMass;
pub type Pressure = UomPressure;

#[inline]
pub fn grams(v: f64) -> Mass {
    use uom::si::mass::gram;
    Mass::new::<gram>(v)
}

pub mod constants {
    use super::*;

    pub const ATOMIC_MASS_UNIT_G: f64 = 1.660539e-24;
    pub const BOLTZMANN_J_PER_K: f64 = 1.380649e-23;
    pub const PARSEC_CM: f64 = 3.085_677_581_491_367e18;
    pub const AU_CM: f64 = 1.495_978_707e13;
    pub const LIGHT_YEAR_CM: f64 = 9.460_730_472_580_8e17;
    pub const SOLAR_MASS_G: f64 = 1.988_41e33;
    pub const YEAR_S: f64 = 3.155_76e7;
    pub const HYDROGEN_MASS_G: f64 = 1.673_735_223_81e-24;

    #[inline]
    pub fn atomic_mass_unit() -> Mass {
        grams(ATOMIC_MASS_UNIT_G)
    }

    /// Boltzmann constant in erg/K.
    #[inline]
    pub fn boltzmann_erg_per_k() -> f64 {
        use uom::si::energy::{erg, joule};
        Energy::new::<joule>(BOLTZMANN_J_PER_K).get::<erg>()
    }
}

/// Powers of the CGS base dimensions carried by a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Dimension {
    pub length: i32,
    pub mass: i32,
    pub time: i32,
    pub temperature: i32,
}

impl Dimension {
    pub const NONE: Self = Self::new(0, 0, 0, 0);
    pub const LENGTH: Self = Self::new(1, 0, 0, 0);
    pub const MASS: Self = Self::new(0, 1, 0, 0);
    pub const TIME: Self = Self::new(0, 0, 1, 0);
    pub const TEMPERATURE: Self = Self::new(0, 0, 0, 1);
    pub const ENERGY: Self = Self::new(2, 1, -2, 0);
    pub const FORCE: Self = Self::new(1, 1, -2, 0);
    pub const PRESSURE: Self = Self::new(-1, 1, -2, 0);
    pub const DENSITY: Self = Self::new(-3, 1, 0, 0);
    pub const VELOCITY: Self = Self::new(1, 0, -1, 0);

    pub const fn new(length: i32, mass: i32, time: i32, temperature: i32) -> Self {
        Self {
            length,
            mass,
            time,
            temperature,
        }
    }

    /// `None` when a power overflows.
    fn checked_scaled(self, power: i32) -> Option<Self> {
        Some(Self::new(
            self.length.checked_mul(power)?,
            self.mass.checked_mul(power)?,
            self.time.checked_mul(power)?,
            self.temperature.checked_mul(power)?,
        ))
    }

    fn checked_combined(self, other: Self) -> Option<Self> {
        Some(Self::new(
            self.length.checked_add(other.length)?,
            self.mass.checked_add(other.mass)?,
            self.time.checked_add(other.time)?,
            self.temperature.checked_add(other.temperature)?,
        ))
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum UnitError {
    #[error("Empty unit expression")]
    Empty,

    #[error("Unknown unit '{symbol}' in '{expr}'")]
    UnknownSymbol { symbol: String, expr: String },

    #[error("Invalid exponent in '{term}'")]
    BadExponent { term: String },

    #[error("Unit '{expr}' is out of range")]
    OutOfRange { expr: String },

    #[error("Unit '{unit}' is not a {expected}")]
    WrongDimension { unit: String, expected: &'static str },
}

/// Parsed unit expression such as `g/cm**3` or `km/s`.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitExpr {
    pub expr: String,
    /// Multiply a value in this unit by `cgs_factor` to get CGS.
    pub cgs_factor: f64,
    pub dimension: Dimension,
}

impl UnitExpr {
    pub fn is_length(&self) -> bool {
        self.dimension == Dimension::LENGTH
    }
}

fn symbol(name: &str) -> Option<(f64, Dimension)> {
    use uom::si::energy::{electronvolt, erg, joule, kiloelectronvolt, megaelectronvolt};
    use uom::si::length::{centimeter, kilometer, meter};
    use uom::si::mass::{gram, kilogram};
    use uom::si::pressure::{dyne_per_square_centimeter, pascal};

    let cm_per = |l: Length| l.get::<centimeter>();
    let erg_per = |e: Energy| e.get::<erg>();
    let entry = match name {
        "1" | "dimensionless" => (1.0, Dimension::NONE),
        "cm" | "code_length" => (1.0, Dimension::LENGTH),
        "m" => (cm_per(Length::new::<meter>(1.0)), Dimension::LENGTH),
        "km" => (cm_per(Length::new::<kilometer>(1.0)), Dimension::LENGTH),
        "AU" | "au" => (constants::AU_CM, Dimension::LENGTH),
        "ly" => (constants::LIGHT_YEAR_CM, Dimension::LENGTH),
        "pc" => (constants::PARSEC_CM, Dimension::LENGTH),
        "kpc" => (1e3 * constants::PARSEC_CM, Dimension::LENGTH),
        "Mpc" => (1e6 * constants::PARSEC_CM, Dimension::LENGTH),
        "g" | "code_mass" => (1.0, Dimension::MASS),
        "kg" => (Mass::new::<kilogram>(1.0).get::<gram>(), Dimension::MASS),
        "amu" => (constants::ATOMIC_MASS_UNIT_G, Dimension::MASS),
        "mh" => (constants::HYDROGEN_MASS_G, Dimension::MASS),
        "Msun" => (constants::SOLAR_MASS_G, Dimension::MASS),
        "s" | "code_time" => (1.0, Dimension::TIME),
        "yr" => (constants::YEAR_S, Dimension::TIME),
        "Myr" => (1e6 * constants::YEAR_S, Dimension::TIME),
        "Gyr" => (1e9 * constants::YEAR_S, Dimension::TIME),
        "K" => (1.0, Dimension::TEMPERATURE),
        "erg" | "code_energy" => (1.0, Dimension::ENERGY),
        "J" => (erg_per(Energy::new::<joule>(1.0)), Dimension::ENERGY),
        "eV" => (erg_per(Energy::new::<electronvolt>(1.0)), Dimension::ENERGY),
        "keV" => (erg_per(Energy::new::<kiloelectronvolt>(1.0)), Dimension::ENERGY),
        "MeV" => (erg_per(Energy::new::<megaelectronvolt>(1.0)), Dimension::ENERGY),
        "dyne" | "dyn" => (1.0, Dimension::FORCE),
        "Ba" | "barye" | "code_pressure" => (1.0, Dimension::PRESSURE),
        "Pa" => (
            Pressure::new::<pascal>(1.0).get::<dyne_per_square_centimeter>(),
            Dimension::PRESSURE,
        ),
        "code_density" => (1.0, Dimension::DENSITY),
        "code_velocity" => (1.0, Dimension::VELOCITY),
        _ => return None,
    };
    Some(entry)
}

fn parse_term(term: &str, expr: &str) -> Result<(f64, Dimension), UnitError> {
    let (base, power) = match term.split_once('^') {
        Some((base, exp)) => {
            let exp = exp.trim().trim_start_matches('(').trim_end_matches(')');
            let power = exp.parse::<i32>().map_err(|_| UnitError::BadExponent {
                term: term.to_string(),
            })?;
            (base.trim(), power)
        }
        None => (term.trim(), 1),
    };

    let (factor, dimension) = symbol(base).ok_or_else(|| UnitError::UnknownSymbol {
        symbol: base.to_string(),
        expr: expr.to_string(),
    })?;
    let dimension = dimension
        .checked_scaled(power)
        .ok_or_else(|| out_of_range(expr))?;
    Ok((factor.powi(power), dimension))
}

/// Parse a unit expression built from known symbols joined by `*` and `/`,
/// with optional integer powers written as `**n` or `^n`.
///
/// A `/` applies to the single term that follows it.
pub fn parse_unit(expr: &str) -> Result<UnitExpr, UnitError> {
    let trimmed = expr.trim();
    if trimmed.is_empty() {
        return Err(UnitError::Empty);
    }

    let normalized = trimmed.replace("**", "^");
    let mut cgs_factor = 1.0;
    let mut dimension = Dimension::NONE;
    let mut sign = 1;
    let mut rest = normalized.as_str();

    loop {
        let split = rest.find(|c: char| c == '*' || c == '/');
        let term = match split {
            Some(i) => &rest[..i],
            None => rest,
        };
        let (factor, dim) = parse_term(term, trimmed)?;
        cgs_factor *= factor.powi(sign);
        dimension = dim
            .checked_scaled(sign)
            .and_then(|d| dimension.checked_combined(d))
            .ok_or_else(|| out_of_range(trimmed))?;

        match split {
            Some(i) => {
                sign = if rest[i..].starts_with('/') { -1 } else { 1 };
                rest = &rest[i + 1..];
            }
            None => break,
        }
    }

    if !(cgs_factor.is_finite() && cgs_factor > 0.0) {
        return Err(out_of_range(trimmed));
    }
    Ok(UnitExpr {
        expr: trimmed.to_string(),
        cgs_factor,
        dimension,
    })
}

fn out_of_range(expr: &str) -> UnitError {
    UnitError::OutOfRange {
        expr: expr.to_string(),
    }
}

/// Convert a length in `unit` to dataset code length, where one code length
/// equals `length_unit_cm` centimetres.
pub fn to_code_length(value: f64, unit: &str, length_unit_cm: f64) -> Result<f64, UnitError> {
    let parsed = parse_unit(unit)?;
    if !parsed.is_length() {
        return Err(UnitError::WrongDimension {
            unit: unit.to_string(),
            expected: "length",
        });
    }
    if parsed.expr == "code_length" {
        return Ok(value);
    }
    Ok(value * parsed.cgs_factor / length_unit_cm)
}
