use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::domain::vehicle::{Vehicle, VehicleId};
use crate::locale::Locale;

pub const ALL: &str = "All";

/// A dropdown selection where `All` disables the predicate.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Selection<T> {
    #[default]
    All,
    Only(T),
}

impl<T: PartialEq> Selection<T> {
    pub fn matches(&self, value: &T) -> bool {
        match self {
            Self::All => true,
            Self::Only(expected) => expected == value,
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }
}

impl Selection<String> {
    /// `None`, blank and the `All` sentinel (any case) disable the filter.
    pub fn parse_text(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") => Self::All,
            Some(value) if value.eq_ignore_ascii_case(ALL) => Self::All,
            Some(value) => Self::Only(value.to_string()),
        }
    }
}

impl Selection<u16> {
    pub fn parse_year(raw: Option<&str>) -> Result<Self, String> {
        match Selection::<String>::parse_text(raw) {
            Selection::All => Ok(Self::All),
            Selection::Only(value) => value
                .parse::<u16>()
                .map(Self::Only)
                .map_err(|_| format!("invalid year filter `{value}`")),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogFilter {
    pub brand: Selection<String>,
    pub vehicle_type: Selection<String>,
    pub year: Selection<u16>,
    pub search: String,
}

impl CatalogFilter {
    /// Brand and type compare against the localized label for `locale`.
    pub fn matches(&self, vehicle: &Vehicle, locale: Locale) -> bool {
        let brand = vehicle.display_brand(locale);
        let name = vehicle.display_name(locale);

        let brand_ok = self.brand.matches(&brand.to_string());
        let type_ok = self.vehicle_type.matches(&vehicle.display_type(locale).to_string());
        let year_ok = self.year.matches(&vehicle.year);

        let needle = self.search.to_lowercase();
        let search_ok =
            name.to_lowercase().contains(&needle) || brand.to_lowercase().contains(&needle);

        brand_ok && type_ok && year_ok && search_ok
    }

    pub fn active_count(&self) -> usize {
        [!self.brand.is_all(), !self.vehicle_type.is_all(), !self.year.is_all(), !self.search.is_empty()]
            .into_iter()
            .filter(|active| *active)
            .count()
    }
}

/// Filters `vehicles` and moves recommended ones to the front. Order inside
/// the recommended and remaining groups follows the input. Unknown
/// recommended ids never match anything.
pub fn filter_and_sort<'a>(
    vehicles: &'a [Vehicle],
    filter: &CatalogFilter,
    recommended_ids: &[VehicleId],
    locale: Locale,
) -> Vec<&'a Vehicle> {
    let recommended: HashSet<&VehicleId> = recommended_ids.iter().collect();

    let mut matching: Vec<&Vehicle> =
        vehicles.iter().filter(|vehicle| filter.matches(vehicle, locale)).collect();
    // `sort_by_key` is stable, so each partition keeps its input order.
    matching.sort_by_key(|vehicle| !recommended.contains(&vehicle.id));
    matching
}
