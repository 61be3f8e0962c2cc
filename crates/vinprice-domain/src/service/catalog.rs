//! Distinct attribute values offered for manual entry and rule conditions

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::model::VehicleRecord;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub years: Vec<i32>,
    pub makes: Vec<String>,
    pub models: Vec<String>,
    pub models_by_make: BTreeMap<String, Vec<String>>,
    pub run_conditions: Vec<String>,
    pub title_types: Vec<String>,
    pub damage_descriptions: Vec<String>,
    pub fuel_types: Vec<String>,
}

impl Catalog {
    /// Sorted distinct values of each attribute; blank values are left out
    pub fn from_records(records: &[VehicleRecord]) -> Self {
        let mut years = BTreeSet::new();
        let mut makes = BTreeSet::new();
        let mut models = BTreeSet::new();
        let mut models_by_make: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        let mut run_conditions = BTreeSet::new();
        let mut title_types = BTreeSet::new();
        let mut damage_descriptions = BTreeSet::new();
        let mut fuel_types = BTreeSet::new();

        for record in records {
            years.insert(record.year);
            insert_non_empty(&mut makes, &record.make);
            insert_non_empty(&mut models, &record.model);
            if !record.make.is_empty() && !record.model.is_empty() {
                models_by_make
                    .entry(record.make.clone())
                    .or_default()
                    .insert(record.model.clone());
            }
            insert_non_empty(&mut run_conditions, &record.run_condition);
            insert_non_empty(&mut title_types, &record.title_type);
            insert_non_empty(&mut damage_descriptions, &record.damage_description);
            insert_non_empty(&mut fuel_types, &record.fuel_type);
        }

        Self {
            years: years.into_iter().collect(),
            makes: makes.into_iter().collect(),
            models: models.into_iter().collect(),
            models_by_make: models_by_make
                .into_iter()
                .map(|(make, models)| (make, models.into_iter().collect()))
                .collect(),
            run_conditions: run_conditions.into_iter().collect(),
            title_types: title_types.into_iter().collect(),
            damage_descriptions: damage_descriptions.into_iter().collect(),
            fuel_types: fuel_types.into_iter().collect(),
        }
    }

    /// Models recorded for one make
    pub fn models_for(&self, make: &str) -> &[String] {
        self.models_by_make
            .get(make)
            .map(|models| models.as_slice())
            .unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.makes.is_empty() && self.years.is_empty()
    }
}

fn insert_non_empty(set: &mut BTreeSet<String>, value: &str) {
    if !value.is_empty() {
        set.insert(value.to_string());
    }
}
