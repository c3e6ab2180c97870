//! Material registry.

use indexmap::{map::Entry, IndexMap};
use log::{debug, trace};

use crate::{
    data::MaterialRecord,
    host::{Color, Material},
};

/// Materials seen during one export, keyed by identity in first-seen order.
///
/// Records are created once and never replaced.
#[derive(Default, Debug, Clone)]
pub struct MaterialRegistry {
    /// Records by identity.
    records: IndexMap<String, MaterialRecord>,
}

impl MaterialRegistry {
    /// Creates a new empty `MaterialRegistry`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves an authored material, registering it on first sight.
    ///
    /// Returns the identity, which is the material's persistent unique id.
    pub fn resolve_authored(&mut self, material: &Material) -> &str {
        let entry = self.records.entry(material.unique_id.clone());
        let record = match entry {
            Entry::Occupied(entry) => {
                trace!("Material already registered: uuid={:?}", entry.key());
                entry.into_mut()
            }
            Entry::Vacant(entry) => {
                let transparency = material.transparency.min(100);
                let opacity = 0.01 * f64::from(100 - transparency);
                debug!(
                    "Registering authored material: uuid={:?}, name={:?}",
                    entry.key(),
                    material.name
                );
                let record = MaterialRecord::phong(
                    entry.key().clone(),
                    Some(material.name.clone()),
                    material.color.to_packed(),
                    opacity,
                    transparency > 0,
                    material.shininess,
                );
                entry.insert(record)
            }
        };
        &record.uuid
    }

    /// Resolves a material without persistent identity.
    ///
    /// Visually identical materials share one record: the identity is a
    /// fingerprint of the packed color and the transparency in whole percent.
    pub fn resolve_ad_hoc(&mut self, color: Color, transparency: f64, shininess: u32) -> &str {
        let uuid = ad_hoc_identity(color, transparency);
        let record = self.records.entry(uuid).or_insert_with_key(|uuid| {
            debug!("Registering ad hoc material: uuid={:?}", uuid);
            MaterialRecord::phong(
                uuid.clone(),
                None,
                color.to_packed(),
                1.0 - transparency,
                transparency > 0.0,
                shininess,
            )
        });
        &record.uuid
    }

    /// Returns the record with the given identity.
    pub fn get(&self, uuid: &str) -> Option<&MaterialRecord> {
        self.records.get(uuid)
    }

    /// Returns the number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the records in first-seen order.
    pub fn into_records(self) -> Vec<MaterialRecord> {
        self.records.into_values().collect()
    }
}

/// Returns the fingerprint identity of a material without persistent id.
pub fn ad_hoc_identity(color: Color, transparency: f64) -> String {
    format!(
        "MaterialNode_{}_{}",
        color.to_packed(),
        (transparency * 100.0).round() as i64
    )
}
