//! Field catalog and the derived thermodynamic fields.
//!
//! The catalog is built once when a dataset is opened: native fields first
//! (deduplicated, first occurrence wins), then any derived field whose
//! prerequisites are present. Fields that cannot be derived are left out;
//! this never fails the open.

use crate::error::{DatasetError, DatasetResult};
use av_core::FieldId;
use av_core::units::constants;
use tracing::debug;

/// Gas constants used by the derived fields.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThermoSettings {
    /// Adiabatic index.
    pub gamma: f64,
    /// Mean molecular weight in atomic mass units.
    pub mean_molecular_weight: f64,
}

impl Default for ThermoSettings {
    fn default() -> Self {
        Self {
            gamma: 5.0 / 3.0,
            mean_molecular_weight: 1.0,
        }
    }
}

impl ThermoSettings {
    /// Mean mass per gas particle in grams.
    pub fn particle_mass_g(&self) -> f64 {
        use uom::si::mass::gram;
        (constants::atomic_mass_unit() * self.mean_molecular_weight).get::<gram>()
    }

    fn is_physical(&self) -> bool {
        self.gamma.is_finite()
            && self.gamma > 1.0
            && self.mean_molecular_weight.is_finite()
            && self.mean_molecular_weight > 0.0
    }
}

/// Which energy field a temperature was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemperatureSource {
    /// Total energy density minus the kinetic part.
    TotalEnergy,
    /// Internal energy density as stored.
    InternalEnergy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DerivedField {
    NumberDensity,
    Temperature(TemperatureSource),
    VelocityMagnitude,
}

fn velocity_components() -> [FieldId; 3] {
    [
        FieldId::gas("velocity_x"),
        FieldId::gas("velocity_y"),
        FieldId::gas("velocity_z"),
    ]
}

impl DerivedField {
    pub fn id(&self) -> FieldId {
        match self {
            DerivedField::NumberDensity => FieldId::gas("number_density"),
            DerivedField::Temperature(_) => FieldId::gas("temperature"),
            DerivedField::VelocityMagnitude => FieldId::gas("velocity_magnitude"),
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            DerivedField::NumberDensity => "Number Density",
            DerivedField::Temperature(_) => "Temperature",
            DerivedField::VelocityMagnitude => "Velocity Magnitude",
        }
    }

    /// Fields read by [`DerivedField::evaluate`], in argument order.
    pub fn prerequisites(&self) -> Vec<FieldId> {
        let [vx, vy, vz] = velocity_components();
        match self {
            DerivedField::NumberDensity => vec![FieldId::gas("density")],
            DerivedField::Temperature(TemperatureSource::TotalEnergy) => vec![
                FieldId::gas("total_energy_density"),
                FieldId::gas("density"),
                vx,
                vy,
                vz,
            ],
            DerivedField::Temperature(TemperatureSource::InternalEnergy) => vec![
                FieldId::gas("internal_energy_density"),
                FieldId::gas("density"),
            ],
            DerivedField::VelocityMagnitude => vec![vx, vy, vz],
        }
    }

    /// Compute the field cell by cell from its prerequisites (CGS units).
    pub fn evaluate<F>(&self, settings: &ThermoSettings, mut fetch: F) -> DatasetResult<Vec<f64>>
    where
        F: FnMut(&FieldId) -> DatasetResult<Vec<f64>>,
    {
        let inputs = self
            .prerequisites()
            .iter()
            .map(&mut fetch)
            .collect::<DatasetResult<Vec<_>>>()?;

        let n = inputs.first().map_or(0, Vec::len);
        if inputs.iter().any(|v| v.len() != n) {
            return Err(DatasetError::Evaluation {
                field: self.id(),
                message: "prerequisite fields differ in length".to_string(),
            });
        }

        let m = settings.particle_mass_g();
        let kb = constants::boltzmann_erg_per_k();
        let g1 = settings.gamma - 1.0;
        let speed2 = |vx: f64, vy: f64, vz: f64| vx * vx + vy * vy + vz * vz;

        let out = match self {
            DerivedField::NumberDensity => inputs[0].iter().map(|rho| rho / m).collect(),
            DerivedField::VelocityMagnitude => (0..n)
                .map(|i| speed2(inputs[0][i], inputs[1][i], inputs[2][i]).sqrt())
                .collect(),
            DerivedField::Temperature(TemperatureSource::TotalEnergy) => (0..n)
                .map(|i| {
                    let (etot, rho) = (inputs[0][i], inputs[1][i]);
                    let kinetic = 0.5 * rho * speed2(inputs[2][i], inputs[3][i], inputs[4][i]);
                    (etot - kinetic) * g1 / (rho / m * kb)
                })
                .collect(),
            DerivedField::Temperature(TemperatureSource::InternalEnergy) => (0..n)
                .map(|i| {
                    let (eint, rho) = (inputs[0][i], inputs[1][i]);
                    eint * g1 / (rho / m * kb)
                })
                .collect(),
        };
        Ok(out)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldOrigin {
    Native,
    Derived(DerivedField),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub id: FieldId,
    pub origin: FieldOrigin,
}

/// Immutable, ordered list of the fields a dataset can serve.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldCatalog {
    entries: Vec<CatalogEntry>,
}

impl FieldCatalog {
    /// Catalog of native fields, keeping the first occurrence of duplicates.
    pub fn from_native(fields: impl IntoIterator<Item = FieldId>) -> Self {
        fields.into_iter().fold(Self::default(), |catalog, id| {
            catalog.with_entry(CatalogEntry {
                id,
                origin: FieldOrigin::Native,
            })
        })
    }

    fn with_entry(mut self, entry: CatalogEntry) -> Self {
        if !self.contains(&entry.id) {
            self.entries.push(entry);
        }
        self
    }

    pub fn contains(&self, id: &FieldId) -> bool {
        self.entries.iter().any(|e| &e.id == id)
    }

    pub fn get(&self, id: &FieldId) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| &e.id == id)
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn fields(&self) -> Vec<FieldId> {
        self.entries.iter().map(|e| e.id.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn has_all(&self, fields: &[FieldId]) -> bool {
        fields.iter().all(|f| self.contains(f))
    }
}

/// Adds the derived fields a catalog can support.
#[derive(Debug, Clone, Copy, Default)]
pub struct DerivedFieldProvider {
    settings: ThermoSettings,
}

impl DerivedFieldProvider {
    pub fn new(settings: ThermoSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &ThermoSettings {
        &self.settings
    }

    /// Return `catalog` extended with every derivable field it lacks.
    ///
    /// Applying the provider to its own output returns an equal catalog.
    pub fn apply(&self, catalog: &FieldCatalog) -> FieldCatalog {
        let mut out = catalog.clone();
        let physical = self.settings.is_physical();
        if !physical {
            debug!(
                gamma = self.settings.gamma,
                mu = self.settings.mean_molecular_weight,
                "non-physical gas constants, skipping thermodynamic fields"
            );
        }

        let mut candidates = Vec::with_capacity(3);
        if physical {
            candidates.push(Some(DerivedField::NumberDensity));
            candidates.push(
                Self::temperature_source(&out)
                    .map(DerivedField::Temperature)
                    .or_else(|| {
                        debug!("no usable energy density field, temperature unavailable");
                        None
                    }),
            );
        }
        candidates.push(Some(DerivedField::VelocityMagnitude));

        for derived in candidates.into_iter().flatten() {
            let id = derived.id();
            if out.contains(&id) {
                continue;
            }
            if !out.has_all(&derived.prerequisites()) {
                debug!(field = %id, "missing prerequisites, not registered");
                continue;
            }
            out = out.with_entry(CatalogEntry {
                id,
                origin: FieldOrigin::Derived(derived),
            });
        }
        out
    }

    fn temperature_source(catalog: &FieldCatalog) -> Option<TemperatureSource> {
        [
            TemperatureSource::TotalEnergy,
            TemperatureSource::InternalEnergy,
        ]
        .into_iter()
        .find(|source| catalog.has_all(&DerivedField::Temperature(*source).prerequisites()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use av_core::{Tolerances, nearly_equal};

    fn gas(names: &[&str]) -> FieldCatalog {
        FieldCatalog::from_native(names.iter().map(|n| FieldId::gas(*n)))
    }

    const HYDRO: [&str; 4] = ["density", "velocity_x", "velocity_y", "velocity_z"];

    #[test]
    fn native_fields_are_deduplicated_in_order() {
        let catalog = FieldCatalog::from_native([
            FieldId::gas("density"),
            FieldId::new("index", "cell_volume"),
            FieldId::gas("density"),
        ]);
        assert_eq!(
            catalog.fields(),
            vec![FieldId::gas("density"), FieldId::new("index", "cell_volume")]
        );
    }

    #[test]
    fn temperature_prefers_total_energy() {
        let mut names = HYDRO.to_vec();
        names.extend(["total_energy_density", "internal_energy_density"]);
        let catalog = DerivedFieldProvider::default().apply(&gas(&names));
        let entry = catalog.get(&FieldId::gas("temperature")).unwrap();
        assert_eq!(
            entry.origin,
            FieldOrigin::Derived(DerivedField::Temperature(TemperatureSource::TotalEnergy))
        );
    }

    #[test]
    fn temperature_falls_back_to_internal_energy() {
        let catalog = DerivedFieldProvider::default()
            .apply(&gas(&["density", "internal_energy_density"]));
        let entry = catalog.get(&FieldId::gas("temperature")).unwrap();
        assert_eq!(
            entry.origin,
            FieldOrigin::Derived(DerivedField::Temperature(
                TemperatureSource::InternalEnergy
            ))
        );
        // No velocities, so no magnitude either
        assert!(!catalog.contains(&FieldId::gas("velocity_magnitude")));
    }

    #[test]
    fn temperature_absent_without_energy_fields() {
        let catalog = DerivedFieldProvider::default().apply(&gas(&HYDRO));
        assert!(!catalog.contains(&FieldId::gas("temperature")));
        assert!(catalog.contains(&FieldId::gas("number_density")));
        assert!(catalog.contains(&FieldId::gas("velocity_magnitude")));
    }

    #[test]
    fn total_energy_without_velocities_uses_internal() {
        let catalog = DerivedFieldProvider::default().apply(&gas(&[
            "density",
            "total_energy_density",
            "internal_energy_density",
        ]));
        assert_eq!(
            catalog.get(&FieldId::gas("temperature")).unwrap().origin,
            FieldOrigin::Derived(DerivedField::Temperature(
                TemperatureSource::InternalEnergy
            ))
        );
    }

    #[test]
    fn existing_fields_are_not_overridden() {
        let mut names = HYDRO.to_vec();
        names.extend(["temperature", "internal_energy_density"]);
        let catalog = DerivedFieldProvider::default().apply(&gas(&names));
        assert_eq!(
            catalog.get(&FieldId::gas("temperature")).unwrap().origin,
            FieldOrigin::Native
        );
    }

    #[test]
    fn applying_twice_is_a_no_op() {
        let mut names = HYDRO.to_vec();
        names.push("total_energy_density");
        let provider = DerivedFieldProvider::default();
        let once = provider.apply(&gas(&names));
        let twice = provider.apply(&once);
        assert_eq!(once, twice);
        assert_eq!(once.len(), names.len() + 3);
    }

    #[test]
    fn non_physical_settings_keep_velocity_magnitude_only() {
        let provider = DerivedFieldProvider::new(ThermoSettings {
            gamma: 5.0 / 3.0,
            mean_molecular_weight: 0.0,
        });
        let mut names = HYDRO.to_vec();
        names.push("internal_energy_density");
        let catalog = provider.apply(&gas(&names));
        assert!(!catalog.contains(&FieldId::gas("number_density")));
        assert!(!catalog.contains(&FieldId::gas("temperature")));
        assert!(catalog.contains(&FieldId::gas("velocity_magnitude")));
    }

    #[test]
    fn evaluate_temperature_from_total_energy() {
        let settings = ThermoSettings::default();
        let m = settings.particle_mass_g();
        let kb = constants::boltzmann_erg_per_k();
        let rho = 2.0e-24;
        let v = 1.0e5;
        let eint = 3.0e-12;
        let etot = eint + 0.5 * rho * v * v;

        let t = DerivedField::Temperature(TemperatureSource::TotalEnergy)
            .evaluate(&settings, |f| {
                Ok(match f.name() {
                    "total_energy_density" => vec![etot],
                    "density" => vec![rho],
                    "velocity_x" => vec![v],
                    _ => vec![0.0],
                })
            })
            .unwrap();
        let expected = eint * (2.0 / 3.0) / (rho / m * kb);
        assert!(nearly_equal(t[0], expected, Tolerances { abs: 1e-9, rel: 1e-9 }));
    }

    #[test]
    fn evaluate_velocity_magnitude() {
        let out = DerivedField::VelocityMagnitude
            .evaluate(&ThermoSettings::default(), |f| {
                Ok(match f.name() {
                    "velocity_x" => vec![3.0, 0.0],
                    "velocity_y" => vec![4.0, 0.0],
                    _ => vec![0.0, 2.0],
                })
            })
            .unwrap();
        assert_eq!(out, vec![5.0, 2.0]);
    }

    #[test]
    fn evaluate_rejects_ragged_inputs() {
        let err = DerivedField::VelocityMagnitude
            .evaluate(&ThermoSettings::default(), |f| {
                Ok(if f.name() == "velocity_z" {
                    vec![1.0]
                } else {
                    vec![1.0, 2.0]
                })
            })
            .unwrap_err();
        assert!(matches!(err, DatasetError::Evaluation { .. }));
    }

    #[test]
    fn number_density_uses_mean_molecular_weight() {
        let settings = ThermoSettings {
            gamma: 1.4,
            mean_molecular_weight: 2.0,
        };
        let rho = 1.0e-23;
        let n = DerivedField::NumberDensity
            .evaluate(&settings, |_| Ok(vec![rho]))
            .unwrap();
        let expected = rho / (2.0 * constants::ATOMIC_MASS_UNIT_G);
        assert!(nearly_equal(n[0], expected, Tolerances::default()));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    const KNOWN: [&str; 8] = [
        "density",
        "velocity_x",
        "velocity_y",
        "velocity_z",
        "total_energy_density",
        "internal_energy_density",
        "temperature",
        "number_density",
    ];

    proptest! {
        #[test]
        fn provider_is_idempotent(mask in prop::collection::vec(any::<bool>(), KNOWN.len())) {
            let native = KNOWN
                .iter()
                .zip(&mask)
                .filter(|(_, keep)| **keep)
                .map(|(name, _)| FieldId::gas(*name));
            let provider = DerivedFieldProvider::default();
            let once = provider.apply(&FieldCatalog::from_native(native));
            let twice = provider.apply(&once);
            prop_assert_eq!(&once, &twice);

            let mut ids = once.fields();
            ids.sort();
            ids.dedup();
            prop_assert_eq!(ids.len(), once.len());
        }
    }
}
