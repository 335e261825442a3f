use crate::error::{Error, Result};
use crate::quantity::{normalize_to_group, Quantity};
use crate::unit::Unit;
use std::collections::HashMap;
use std::sync::Arc;

/// Name table and auto-conversion groups for all configured units.
///
/// Lookups are case-insensitive. The unitless and percent units are always
/// present; percent answers to `%` and `percent`.
#[derive(Clone, Debug)]
pub struct UnitRegistry {
    units: Vec<Arc<Unit>>,
    by_name: HashMap<String, Arc<Unit>>,
    groups: Vec<Vec<Arc<Unit>>>,
    unitless: Arc<Unit>,
    percent: Arc<Unit>,
}

impl Default for UnitRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl UnitRegistry {
    pub fn new() -> Self {
        let unitless = Arc::new(Unit::unitless());
        let percent = Arc::new(Unit::percent());
        let mut registry = Self {
            units: Vec::new(),
            by_name: HashMap::new(),
            groups: Vec::new(),
            unitless: Arc::clone(&unitless),
            percent: Arc::clone(&percent),
        };
        registry.units.push(unitless);
        registry.index(&percent);
        registry.units.push(percent);
        registry
    }

    pub fn unitless(&self) -> &Arc<Unit> {
        &self.unitless
    }

    pub fn percent(&self) -> &Arc<Unit> {
        &self.percent
    }

    /// Register a unit under all of its names.
    ///
    /// Fails when one of the names already belongs to a different unit.
    pub fn add(&mut self, unit: Unit) -> Result<Arc<Unit>> {
        for name in unit.names() {
            if let Some(existing) = self.by_name.get(&name.to_lowercase()) {
                if **existing != unit {
                    return Err(Error::DuplicateName(name.into()));
                }
            }
        }
        let unit = Arc::new(unit);
        self.index(&unit);
        self.units.push(Arc::clone(&unit));
        Ok(unit)
    }

    fn index(&mut self, unit: &Arc<Unit>) {
        for name in unit.names() {
            self.by_name.insert(name.to_lowercase(), Arc::clone(unit));
        }
    }

    pub fn lookup(&self, name: &str) -> Option<&Arc<Unit>> {
        self.by_name.get(&name.to_lowercase())
    }

    pub fn get(&self, name: &str) -> Result<&Arc<Unit>> {
        self.lookup(name)
            .ok_or_else(|| Error::UnknownUnit(name.into()))
    }

    /// All registered lookup names (lowercase).
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.by_name.keys().map(String::as_str)
    }

    pub fn units(&self) -> &[Arc<Unit>] {
        &self.units
    }

    /// Register an auto-conversion group. Units are sorted by ascending
    /// multiplier and must all belong to one family.
    pub fn add_group(&mut self, names: &[&str]) -> Result<()> {
        let mut group = names
            .iter()
            .map(|name| self.get(name).cloned())
            .collect::<Result<Vec<_>>>()?;

        let Some(first) = group.first() else {
            return Err(Error::EmptyGroup);
        };
        if let Some(stranger) = group.iter().find(|u| !u.is_convertible_to(first)) {
            return Err(Error::MixedGroup(
                first.family().into(),
                stranger.family().into(),
            ));
        }

        group.sort_by_key(|unit| unit.multiplier());
        group.dedup();
        self.groups.push(group);
        Ok(())
    }

    pub fn group_for(&self, unit: &Unit) -> Option<&[Arc<Unit>]> {
        self.groups
            .iter()
            .find(|group| group.iter().any(|member| **member == *unit))
            .map(Vec::as_slice)
    }

    /// Express `quantity` in the best unit of its auto-conversion group, or
    /// return it unchanged when its unit has no group.
    pub fn normalize(&self, quantity: &Quantity, precision: u32) -> Result<Quantity> {
        match self.group_for(&quantity.unit) {
            Some(group) => normalize_to_group(quantity, group, precision),
            None => Ok(quantity.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn registry() -> UnitRegistry {
        let mut registry = UnitRegistry::new();
        registry
            .add(Unit::new(
                "length",
                "mm",
                Decimal::ONE,
                vec!["mm".into()],
                vec![vec!["millimeter".into(), "millimeters".into()]],
            ))
            .unwrap();
        registry
            .add(Unit::new("length", "cm", Decimal::from(10), vec![], vec![]))
            .unwrap();
        registry
            .add(Unit::new("weight", "g", Decimal::ONE, vec![], vec![]))
            .unwrap();
        registry
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let registry = registry();
        assert_eq!(registry.lookup("MM").unwrap().name(), "mm");
        assert_eq!(registry.lookup("Millimeters").unwrap().name(), "mm");
        assert_eq!(registry.lookup("percent").unwrap().name(), "%");
        assert!(registry.lookup("furlong").is_none());
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut registry = registry();
        let err = registry
            .add(Unit::new("weight", "mm", Decimal::ONE, vec![], vec![]))
            .unwrap_err();
        assert_eq!(err, Error::DuplicateName("mm".into()));
    }

    #[test]
    fn groups_are_sorted_and_single_family() {
        let mut registry = registry();
        registry.add_group(&["cm", "mm"]).unwrap();
        let group = registry.group_for(registry.get("mm").unwrap()).unwrap();
        assert_eq!(group[0].name(), "mm");
        assert_eq!(group[1].name(), "cm");

        assert!(matches!(
            registry.add_group(&["cm", "g"]),
            Err(Error::MixedGroup(_, _))
        ));
        assert_eq!(registry.add_group(&[]), Err(Error::EmptyGroup));
    }

    #[test]
    fn normalize_without_group_is_identity() {
        let registry = registry();
        let g = registry.get("g").unwrap().clone();
        let q = Quantity::new(Decimal::from(1500), g);
        assert_eq!(registry.normalize(&q, 4).unwrap(), q);
    }
}
