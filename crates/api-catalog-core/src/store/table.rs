//! In-memory descriptor table shared by every [`DescriptorStore`](super::DescriptorStore) backend.
//!
//! Holds records keyed by id and implements the listing, creation, merge
//! and deletion rules. Backends wrap it with locking and, for durable
//! stores, persistence.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::models::{
    ApiDescriptor, ApiUpdate, ListFilter, ListOrder, NewApi, SortDirection, SortField,
};

#[derive(Debug, Clone, Default)]
pub struct DescriptorTable {
    records: BTreeMap<String, ApiDescriptor>,
}

impl DescriptorTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the on-disk JSON object (`{ "<id>": { ...record } }`).
    ///
    /// The map key is authoritative: a record whose inner `id` disagrees
    /// with its key is re-labelled with the key.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let mut records: BTreeMap<String, ApiDescriptor> = serde_json::from_str(json)?;
        for (key, record) in records.iter_mut() {
            if record.id != *key {
                record.id = key.clone();
            }
        }
        Ok(Self { records })
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.records)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&ApiDescriptor> {
        self.records.get(id)
    }

    pub fn list(&self, filter: &ListFilter, order: ListOrder) -> Vec<ApiDescriptor> {
        let needle = filter
            .name_contains
            .as_deref()
            .filter(|n| !n.is_empty())
            .map(str::to_lowercase);

        let mut apis: Vec<ApiDescriptor> = self
            .records
            .values()
            .filter(|api| match &needle {
                Some(n) => api.name.to_lowercase().contains(n.as_str()),
                None => true,
            })
            .cloned()
            .collect();

        apis.sort_by(|a, b| {
            let ord = match order.field {
                SortField::Name => locale_cmp(&a.name, &b.name),
                SortField::Team => locale_cmp(&a.team, &b.team),
            };
            match order.direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            }
        });

        apis
    }

    /// Insert a new record with a fresh UUID and `created_at == updated_at == now`.
    pub fn create(&mut self, data: NewApi, now: DateTime<Utc>) -> ApiDescriptor {
        let mut id = uuid::Uuid::new_v4().to_string();
        while self.records.contains_key(&id) {
            id = uuid::Uuid::new_v4().to_string();
        }

        let api = ApiDescriptor {
            id: id.clone(),
            name: data.name,
            team: data.team,
            spec_location: data.spec_location,
            description: data.description,
            created_at: Some(now),
            updated_at: Some(now),
            docs: data.docs,
        };
        self.records.insert(id, api.clone());
        api
    }

    /// Merge `update` into the record, leaving `id` and `created_at` alone.
    ///
    /// `updated_at` never moves backwards, even if the wall clock does.
    pub fn update(
        &mut self,
        id: &str,
        update: ApiUpdate,
        now: DateTime<Utc>,
    ) -> Option<ApiDescriptor> {
        let record = self.records.get_mut(id)?;
        update.apply_to(record);
        record.updated_at = Some(match record.updated_at {
            Some(prev) if prev > now => prev,
            _ => now,
        });
        Some(record.clone())
    }

    pub fn remove(&mut self, id: &str) -> bool {
        self.records.remove(id).is_some()
    }
}

/// Locale-style string comparison.
///
/// Case-insensitive at the primary level, lower case before upper case for
/// strings that differ only in case, then code-point order so the result is
/// total for distinct strings.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));

    folded
        .then_with(|| lower_case_first(a, b))
        .then_with(|| a.cmp(b))
}

fn lower_case_first(a: &str, b: &str) -> Ordering {
    for (x, y) in a.chars().zip(b.chars()) {
        if x != y {
            return y.is_lowercase().cmp(&x.is_lowercase());
        }
    }
    Ordering::Equal
}
