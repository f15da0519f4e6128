use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::vehicle::Vehicle;
use crate::locale::Locale;

/// Distinct values offered by the catalog dropdowns.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogFacets {
    pub brands: Vec<String>,
    pub types: Vec<String>,
    pub years: Vec<u16>,
}

pub fn facets(vehicles: &[Vehicle], locale: Locale) -> CatalogFacets {
    let brands: BTreeSet<&str> =
        vehicles.iter().map(|vehicle| vehicle.display_brand(locale)).collect();
    let types: BTreeSet<&str> =
        vehicles.iter().map(|vehicle| vehicle.display_type(locale)).collect();
    let years: BTreeSet<u16> = vehicles.iter().map(|vehicle| vehicle.year).collect();

    CatalogFacets {
        brands: brands.into_iter().map(str::to_string).collect(),
        types: types.into_iter().map(str::to_string).collect(),
        years: years.into_iter().rev().collect(),
    }
}
