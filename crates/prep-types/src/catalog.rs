// ─────────────────────────────────────────────────────────────────────
// SCPN Transport Prep — Catalog
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Fixed catalogs of input and output variables.
//!
//! A `VariableSet` is an explicit registry with a key set declared at
//! construction time; unknown names cannot be added. The input catalog
//! covers the independent coordinates, the quantities read from the
//! source file (each carrying its external tag and smoothing width),
//! and the derived quantities filled in by later calculation stages.
//! The output catalog covers the quantities read back from the
//! transport driver.

use crate::error::{PrepError, PrepResult};
use crate::variable::Variable;
use std::collections::BTreeMap;

/// Names of the independent coordinate variables in the input catalog.
pub const INDEPENDENT_NAMES: [&str; 3] = ["time", "x", "xb"];

/// Which catalog a set was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetKind {
    Input,
    Output,
}

/// A named collection of variables with a fixed, pre-declared key set.
///
/// Sets are plain values: cloning one gives a fully independent copy,
/// so a scan run can modify its copy without perturbing the baseline.
#[derive(Debug, Clone)]
pub struct VariableSet {
    kind: SetKind,
    vars: BTreeMap<&'static str, Variable>,
}

impl VariableSet {
    /// Catalog of all quantities known on the input side.
    pub fn input() -> Self {
        let mut vars = BTreeMap::new();
        let mut add = |key: &'static str, var: Variable| {
            vars.insert(key, var);
        };

        // Independent coordinates.
        add("time", Variable::new("Time").with_tag("TIME"));
        add("x", Variable::new("X").with_tag("X").with_label(r"$x$"));
        add(
            "xb",
            Variable::new("XB").with_tag("XB").with_label(r"$x_\mathrm{B}$"),
        );

        // Source-file quantities needed for calculations.
        add(
            "aimp",
            Variable::new("Mean Mass of Impurities")
                .with_tag("AIMP")
                .with_smoothing(1)
                .with_label(r"$\overline{M}_\mathrm{imp}$"),
        );
        add(
            "arat",
            Variable::new("Aspect Ratio").with_tag("ARAT").with_smoothing(1),
        );
        add("bz", Variable::new("BZ").with_tag("BZ").with_smoothing(1));
        add(
            "elong",
            Variable::new("Elongation")
                .with_tag("ELONG")
                .with_smoothing(1)
                .with_label(r"$\kappa$"),
        );
        add(
            "omega",
            Variable::new("Toroidal Angular Velocity")
                .with_tag("OMEGA")
                .with_smoothing(1),
        );
        add(
            "ne",
            Variable::new("Electron Density")
                .with_tag("NE")
                .with_smoothing(1)
                .with_label(r"$n_\mathrm{e}$"),
        );
        add(
            "nf",
            Variable::new("Fast Ion Density")
                .with_tag("BDENS")
                .with_smoothing(1)
                .with_label(r"$n_\mathrm{f}$"),
        );
        add(
            "nd",
            Variable::new("Deuterium Ion Density")
                .with_tag("ND")
                .with_smoothing(1)
                .with_label(r"$n_\mathrm{d}$"),
        );
        add(
            "ni",
            Variable::new("Thermal Ion Density")
                .with_tag("NI")
                .with_smoothing(1)
                .with_label(r"$n_\mathrm{i}$"),
        );
        add(
            "nz",
            Variable::new("Impurity Density")
                .with_tag("NIMP")
                .with_smoothing(1)
                .with_label(r"$n_z$"),
        );
        add(
            "nh",
            Variable::new("Hydrogenic Ion Density")
                .with_tag("NH")
                .with_smoothing(1)
                .with_label(r"$n_\mathrm{h}$"),
        );
        add(
            "q",
            Variable::new("Safety Factor")
                .with_tag("Q")
                .with_smoothing(2)
                .with_label(r"$q$"),
        );
        add(
            "rmaj",
            Variable::new("Major Radius").with_tag("RMJMP").with_label(r"$R$"),
        );
        add(
            "te",
            Variable::new("Electron Temperature")
                .with_tag("TE")
                .with_smoothing(1)
                .with_label(r"$T_\mathrm{e}$"),
        );
        add(
            "tepro",
            Variable::new("Electron Temperature")
                .with_tag("TEPRO")
                .with_smoothing(1)
                .with_label(r"$T_\mathrm{e}$"),
        );
        add(
            "ti",
            Variable::new("Thermal Ion Temperature")
                .with_tag("TI")
                .with_smoothing(1)
                .with_label(r"$T_\mathrm{i}$"),
        );
        add(
            "tipro",
            Variable::new("Thermal Ion Temperature")
                .with_tag("TIPRO")
                .with_smoothing(1)
                .with_label(r"$T_\mathrm{i}$"),
        );
        add(
            "vpold",
            Variable::new("Deuterium Poloidal Velocity")
                .with_tag("VPOLD_NC")
                .with_smoothing(1),
        );
        add(
            "vpolh",
            Variable::new("Hydrogen Poloidal Velocity")
                .with_tag("VPOLH_NC")
                .with_smoothing(1),
        );
        add(
            "wexbs",
            Variable::new("ExB Shear Rate")
                .with_tag("SREXBA")
                .with_smoothing(1)
                .with_label(r"$\omega_{E \times B}$"),
        );
        add(
            "zimp",
            Variable::new("Mean Charge of Impurities")
                .with_tag("XZIMP")
                .with_smoothing(1)
                .with_label(r"$\overline{Z}_\mathrm{imp}$"),
        );
        add(
            "betat",
            Variable::new("BETAT").with_tag("BETAT").with_smoothing(1),
        );

        // Derived quantities (some also present in the source file).
        add(
            "aimass",
            Variable::new("Thermal Ion Mean Atomic Mass").with_label(r"$\overline{M}_\mathrm{i}$"),
        );
        add(
            "ahyd",
            Variable::new("Hydrogenic Ion Mean Atomic Mass")
                .with_label(r"$\overline{M}_\mathrm{h}$"),
        );
        add(
            "alphamhd",
            Variable::new("Alpha MHD").with_label(r"$\alpha_\mathrm{MHD}$"),
        );
        add(
            "beta",
            Variable::new("Pressure Ratio").with_tag("BETAT").with_label(r"$\beta$"),
        );
        add(
            "betae",
            Variable::new("Electron Pressure Ratio")
                .with_tag("BETAE")
                .with_label(r"$\beta_\mathrm{\,e}$"),
        );
        add(
            "btor",
            Variable::new("Toroidal Magnetic Field").with_label(r"$B_\mathrm{T}$"),
        );
        add("eps", Variable::new("Inverse Aspect Ratio"));
        add(
            "etae",
            Variable::new("Electron Gradient Ratio")
                .with_tag("ETAE")
                .with_label(r"$\eta_\mathrm{\,e}$"),
        );
        add(
            "etai",
            Variable::new("Ion Gradient Ratio")
                .with_tag("ETAI")
                .with_label(r"$\eta_\mathrm{\,i}$"),
        );
        add(
            "etaih",
            Variable::new("Hydrogenic Gradient Ratio")
                .with_tag("ETAIH")
                .with_label(r"$\eta_\mathrm{\,ih}$"),
        );
        add(
            "etaie",
            Variable::new("ETAIE")
                .with_tag("ETAIE")
                .with_label(r"$\eta_\mathrm{\,ie}$"),
        );
        add("nuei", Variable::new("Collision Frequency"));
        add(
            "nuste",
            Variable::new("Electron Collisionality")
                .with_tag("NUSTE")
                .with_label(r"$\nu^{*}_\mathrm{e}$"),
        );
        add(
            "nusti",
            Variable::new("Ion Collisionality")
                .with_tag("NUSTI")
                .with_label(r"$\nu^{*}_\mathrm{i}$"),
        );
        add(
            "p",
            Variable::new("Plasma Pressure").with_tag("PPLAS").with_label(r"$p$"),
        );
        add("raxis", Variable::new("RAXIS"));
        add("rho", Variable::new("Radius").with_label(r"$\rho$"));
        add("rmin", Variable::new("Minor Radius").with_label(r"$r$"));
        add(
            "shat",
            Variable::new("Effective Magnetic Shear")
                .with_tag("SHAT")
                .with_label(r"$\hat{s}$"),
        );
        add("shear", Variable::new("Magnetic Shear").with_label(r"$s$"));
        add("vpar", Variable::new("Parallel Velocity"));
        add(
            "vpol",
            Variable::new("Poloidal Velocity").with_label(r"$v_\theta$"),
        );
        add(
            "vtor",
            Variable::new("Toroidal Velocity").with_label(r"$v_\phi$"),
        );
        add(
            "tau",
            Variable::new("Temperature Ratio").with_label(r"$\tau$"),
        );
        add(
            "zeff",
            Variable::new("Effective Charge")
                .with_tag("ZEFF")
                .with_label(r"$Z_\mathrm{eff}$"),
        );
        add(
            "zlog",
            Variable::new("Coulomb Logarithm")
                .with_tag("CLOGE")
                .with_label(r"$\ln\, \Lambda_\mathrm{e}$"),
        );
        add("zgyrfi", Variable::new("Ion Gyrofrequency"));
        add("zvthe", Variable::new("Electron Thermal Velocity"));
        add("zvthi", Variable::new("Ion Thermal Velocity"));

        // Derived gradients.
        add(
            "gne",
            Variable::new("Electron Density Gradient").with_label(r"$g_{n_\mathrm{e}}$"),
        );
        add(
            "gnh",
            Variable::new("Hydrogenic Ion Density Gradient").with_label(r"$g_{n_\mathrm{h}}$"),
        );
        add(
            "gni",
            Variable::new("Thermal Ion Density Gradient").with_label(r"$g_{n_\mathrm{i}}$"),
        );
        add(
            "gnz",
            Variable::new("Impurity Density Gradient").with_label(r"$g_{n_\mathrm{z}}$"),
        );
        add(
            "gnd",
            Variable::new("Deuterium Ion Density Gradient").with_label(r"$g_{n_\mathrm{d}}$"),
        );
        add(
            "gq",
            Variable::new("Safety Factor Gradient").with_label(r"$g_{q}$"),
        );
        add(
            "gte",
            Variable::new("Electron Temperature Gradient").with_label(r"$g_{T_\mathrm{e}}$"),
        );
        add(
            "gti",
            Variable::new("Thermal Ion Temperature Gradient").with_label(r"$g_{T_\mathrm{i}}$"),
        );
        add("gvpar", Variable::new("Parallel Velocity Gradient"));
        add(
            "gvpol",
            Variable::new("Poloidal Velocity Gradient").with_label(r"$g_{\nu_\theta}$"),
        );
        add(
            "gvtor",
            Variable::new("Toroidal Velocity Gradient").with_label(r"$g_{\nu_\phi}$"),
        );

        VariableSet {
            kind: SetKind::Input,
            vars,
        }
    }

    /// Catalog of the quantities produced by the transport driver.
    pub fn output() -> Self {
        let mut vars = BTreeMap::new();
        let mut add = |key: &'static str, var: Variable| {
            vars.insert(key, var);
        };

        add("rho", Variable::new("rho").with_label(r"$\rho$"));
        add("rmin", Variable::new("rmin").with_label(r"$r_\mathrm{min}$"));

        // Total diffusivities.
        for key in ["xti", "xdi", "xte", "xdz", "xvt", "xvp"] {
            add(key, Variable::new(key).with_label(key).with_units("M**2/SEC"));
        }

        // Per-component diffusivities.
        for key in [
            "xtiW20", "xdiW20", "xteW20", "xtiDBM", "xdiDBM", "xteDBM", "xteETG", "xteMTM",
            "xteETGM", "xdiETGM",
        ] {
            add(key, Variable::new(key).with_label(key));
        }

        // Growth rates and frequencies.
        for key in [
            "gmaW20ii", "omgW20ii", "gmaW20ie", "omgW20ie", "gmaW20ei", "omgW20ei", "gmaW20ee",
            "omgW20ee",
        ] {
            add(key, Variable::new(key).with_label(key).with_units("SEC**-1"));
        }
        for key in ["gmaDBM", "omgDBM", "gmaMTM", "omgMTM", "gmaETGM", "omgETGM"] {
            add(key, Variable::new(key).with_label(key));
        }

        add("dbsqprf", Variable::new("dbsqprf").with_label("dbsqprf"));

        VariableSet {
            kind: SetKind::Output,
            vars,
        }
    }

    pub fn kind(&self) -> SetKind {
        self.kind
    }

    pub fn get(&self, name: &str) -> PrepResult<&Variable> {
        self.vars
            .get(name)
            .ok_or_else(|| PrepError::UnknownVariable(name.to_string()))
    }

    pub fn get_mut(&mut self, name: &str) -> PrepResult<&mut Variable> {
        self.vars
            .get_mut(name)
            .ok_or_else(|| PrepError::UnknownVariable(name.to_string()))
    }

    /// Replace a variable wholesale. The name must already exist in
    /// the catalog; unknown names cannot be added.
    pub fn replace(&mut self, name: &str, var: Variable) -> PrepResult<()> {
        match self.vars.get_mut(name) {
            Some(slot) => {
                *slot = var;
                Ok(())
            }
            None => Err(PrepError::UnknownVariable(name.to_string())),
        }
    }

    /// All catalog names, in deterministic order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.vars.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Variable)> {
        self.vars.iter().map(|(k, v)| (*k, v))
    }

    /// Names of variables that currently hold values.
    pub fn populated(&self) -> Vec<&'static str> {
        self.vars
            .iter()
            .filter(|(_, v)| v.is_set())
            .map(|(k, _)| *k)
            .collect()
    }

    /// Names of variables carrying an external source tag.
    pub fn tagged(&self) -> Vec<&'static str> {
        self.vars
            .iter()
            .filter(|(_, v)| v.source_tag().is_some())
            .map(|(k, _)| *k)
            .collect()
    }

    /// Number of rows in the boundary grid, 0 when unset.
    pub fn n_boundaries(&self) -> usize {
        self.vars
            .get("xb")
            .and_then(|v| v.profile())
            .map_or(0, |p| p.nrows())
    }

    /// Number of time samples, 0 when unset.
    pub fn n_times(&self) -> usize {
        self.vars
            .get("x")
            .and_then(|v| v.profile())
            .map_or(0, |p| p.ncols())
    }

    /// One diagnostic line per populated variable.
    pub fn describe_populated(&self) -> Vec<String> {
        self.vars
            .iter()
            .filter(|(_, v)| v.is_set())
            .map(|(k, v)| {
                format!(
                    "{}, {}, {}, {:?}, [{}, {}]",
                    k,
                    v.name(),
                    v.units(),
                    v.values().map(|val| val.shape()).unwrap_or_default(),
                    v.dims()[0].as_str(),
                    v.dims()[1].as_str(),
                )
            })
            .collect()
    }

    /// Replace `te`/`ti` with the measured profile variants
    /// `tepro`/`tipro`. Fails if either profile variant is unset.
    pub fn use_temperature_profiles(&mut self) -> PrepResult<()> {
        for (target, profile) in [("te", "tepro"), ("ti", "tipro")] {
            let source = self.get(profile)?;
            if !source.is_set() {
                return Err(PrepError::MissingVariable(profile.to_string()));
            }
            let copy = source.clone();
            self.replace(target, copy)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PrepSettings;
    use crate::variable::{AxisLabel, Values};
    use ndarray::Array2;

    #[test]
    fn test_input_catalog_has_independents() {
        let set = VariableSet::input();
        assert_eq!(set.kind(), SetKind::Input);
        for name in INDEPENDENT_NAMES {
            assert!(set.get(name).is_ok(), "missing independent {name}");
        }
    }

    #[test]
    fn test_unknown_names_cannot_be_added() {
        let mut set = VariableSet::input();
        let err = set
            .replace("not_a_variable", Variable::new("Bogus"))
            .unwrap_err();
        assert!(matches!(err, PrepError::UnknownVariable(_)));
        assert!(set.get("not_a_variable").is_err());
    }

    #[test]
    fn test_populated_tracks_set_values() {
        let mut set = VariableSet::input();
        assert!(set.populated().is_empty());

        let settings = PrepSettings::default();
        set.get_mut("te")
            .unwrap()
            .set(
                Values::Profile(Array2::from_elem((3, 2), 1.0)),
                Some("EV"),
                Some([AxisLabel::Xb, AxisLabel::Time]),
                false,
                &settings,
            )
            .unwrap();
        assert_eq!(set.populated(), vec!["te"]);
    }

    #[test]
    fn test_tagged_excludes_derived() {
        let set = VariableSet::input();
        let tagged = set.tagged();
        assert!(tagged.contains(&"te"));
        assert!(tagged.contains(&"time"));
        assert!(!tagged.contains(&"gne"), "gradients carry no source tag");
        assert!(!tagged.contains(&"tau"));
    }

    #[test]
    fn test_gradient_ratio_variants_are_tagged() {
        let set = VariableSet::input();
        assert_eq!(set.get("etaih").unwrap().source_tag(), Some("ETAIH"));
        assert_eq!(set.get("etaie").unwrap().source_tag(), Some("ETAIE"));
        let tagged = set.tagged();
        assert!(tagged.contains(&"etaih"));
        assert!(tagged.contains(&"etaie"));
    }

    #[test]
    fn test_counts_when_unset() {
        let set = VariableSet::input();
        assert_eq!(set.n_boundaries(), 0);
        assert_eq!(set.n_times(), 0);
    }

    #[test]
    fn test_use_temperature_profiles() {
        let mut set = VariableSet::input();
        let settings = PrepSettings::default();

        // Fails while the profile variants are unset.
        assert!(set.use_temperature_profiles().is_err());

        for name in ["tepro", "tipro"] {
            set.get_mut(name)
                .unwrap()
                .set(
                    Values::Profile(Array2::from_elem((3, 2), 2.5)),
                    Some("EV"),
                    Some([AxisLabel::Xb, AxisLabel::Time]),
                    false,
                    &settings,
                )
                .unwrap();
        }
        set.use_temperature_profiles().unwrap();
        assert_eq!(set.get("te").unwrap().source_tag(), Some("TEPRO"));
        assert!(set.get("ti").unwrap().is_set());
    }

    #[test]
    fn test_clone_is_independent() {
        let mut baseline = VariableSet::input();
        let settings = PrepSettings::default();
        baseline
            .get_mut("te")
            .unwrap()
            .set(
                Values::Profile(Array2::from_elem((2, 2), 1.0)),
                None,
                None,
                false,
                &settings,
            )
            .unwrap();

        let mut scan = baseline.clone();
        scan.get_mut("te")
            .unwrap()
            .set(
                Values::Profile(Array2::from_elem((2, 2), 99.0)),
                None,
                None,
                false,
                &settings,
            )
            .unwrap();

        assert_eq!(baseline.get("te").unwrap().profile().unwrap()[[0, 0]], 1.0);
        assert_eq!(scan.get("te").unwrap().profile().unwrap()[[0, 0]], 99.0);
    }

    #[test]
    fn test_output_catalog() {
        let set = VariableSet::output();
        assert_eq!(set.kind(), SetKind::Output);
        assert!(set.get("xti").is_ok());
        assert_eq!(set.get("xte").unwrap().units(), "M**2/SEC");
        assert!(set.get("gmaW20ii").is_ok());
        assert!(set.get("te").is_err(), "input names absent from output");
    }
}
