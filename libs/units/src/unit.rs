use rust_decimal::Decimal;
use std::fmt;

/// Family of the distinguished "no unit" unit.
pub const UNITLESS_FAMILY: &str = "unitless";
/// Family of the percent unit. Percent takes part in the relative-percent
/// arithmetic rules instead of plain conversion.
pub const PERCENT_FAMILY: &str = "percent";

/// A unit of measure.
///
/// `multiplier` is the size of one unit expressed in the family's base unit,
/// e.g. `cm` has multiplier 10 in a length family whose base is `mm`.
#[derive(Clone, Debug)]
pub struct Unit {
    family: String,
    name: String,
    multiplier: Decimal,
    display_names: Vec<String>,
    synonyms: Vec<Vec<String>>,
}

impl Unit {
    /// Create a unit. `display_names` holds the singular form followed by an
    /// optional plural form; when empty the canonical name is used.
    pub fn new(
        family: impl Into<String>,
        name: impl Into<String>,
        multiplier: Decimal,
        display_names: Vec<String>,
        synonyms: Vec<Vec<String>>,
    ) -> Self {
        let name = name.into();
        let display_names = if display_names.is_empty() {
            vec![name.clone()]
        } else {
            display_names
        };
        Self {
            family: family.into(),
            name,
            multiplier,
            display_names,
            synonyms,
        }
    }

    pub fn unitless() -> Self {
        Self::new(
            UNITLESS_FAMILY,
            "",
            Decimal::ONE,
            vec![String::new()],
            vec![],
        )
    }

    pub fn percent() -> Self {
        Self::new(
            PERCENT_FAMILY,
            "%",
            Decimal::ONE,
            vec!["%".into()],
            vec![vec!["percent".into()]],
        )
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn multiplier(&self) -> Decimal {
        self.multiplier
    }

    pub fn display_names(&self) -> &[String] {
        &self.display_names
    }

    pub fn synonyms(&self) -> &[Vec<String>] {
        &self.synonyms
    }

    pub fn is_unitless(&self) -> bool {
        self.family == UNITLESS_FAMILY
    }

    pub fn is_percent(&self) -> bool {
        self.family == PERCENT_FAMILY
    }

    pub fn is_convertible_to(&self, other: &Unit) -> bool {
        self.family == other.family
    }

    /// Display form for a magnitude: singular for exactly one, plural otherwise.
    pub fn display_name(&self, magnitude: Decimal) -> &str {
        if magnitude == Decimal::ONE {
            &self.display_names[0]
        } else {
            self.display_names
                .get(1)
                .unwrap_or(&self.display_names[0])
        }
    }

    /// Every name this unit answers to: canonical, display forms and synonyms.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str())
            .chain(self.display_names.iter().map(String::as_str))
            .chain(self.synonyms.iter().flatten().map(String::as_str))
            .filter(|name| !name.is_empty())
    }
}

impl PartialEq for Unit {
    fn eq(&self, other: &Self) -> bool {
        self.family == other.family && self.name == other.name
    }
}

impl Eq for Unit {}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_names[0])
    }
}
