//! Item documents and identity metadata.
//!
//! Items form a hierarchy: each document carries its parent pointer, its
//! template, and the flat versioned/localized field-value collection. The
//! resolution rules that make that flat collection behave like a
//! versioned, multi-language field set live here, independent of storage.

use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use super::changes::{FieldChange, ItemChanges};
use super::field::{FieldEntry, FieldKey};

/// Identifier of the well-known repository root item.
pub const ROOT_ITEM_ID: Uuid = Uuid::from_u128(0x9b7c_1f2e_64d0_4b5a_8f3d_2a90_c84e_7d11);

/// Template of the bootstrap root item.
pub const ROOT_TEMPLATE_ID: Uuid = Uuid::from_u128(0xc7e0_1a9b_33f2_4fd1_b6e8_d54a_1c0f_9e22);

/// The "Template" template; items carrying it define schemas and are the
/// ones returned by the template scan.
pub const TEMPLATE_TEMPLATE_ID: Uuid = Uuid::from_u128(0x3fa8_e5d9_a0c8_4521_9e7b_b61f_40d2_c873);

/// Marker field written when a blank version is allocated, so the new
/// version is discoverable by version enumeration.
pub const CREATED_FIELD_ID: Uuid = Uuid::from_u128(0x8d21_aa04_f6be_4c30_a57e_9c3b_15e8_d4f6);

/// Display name of the bootstrap root document.
pub const ROOT_ITEM_NAME: &str = "root";

/// Lightweight identity and hierarchy metadata for one item.
///
/// This is the shape served by `get_item_definition` and held by the
/// prefetch cache. The parent identifier is already translated: a stored
/// top-level root reports the configured join parent, never the storage
/// sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemDefinition {
    pub id: Uuid,
    pub name: String,
    pub template_id: Uuid,
    pub branch_id: Option<Uuid>,
    pub parent_id: Uuid,
}

/// One `(language, version)` slot of an item.
///
/// Not persisted as its own entity; derived from the distinct fully
/// populated scopes among the item's field keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VersionDescriptor {
    pub language: String,
    pub version: u32,
}

/// The concrete language and version a caller requests.
///
/// In `add_version`, a zero version number requests blank-version
/// semantics instead of copying an existing version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionScope {
    pub language: String,
    pub version: u32,
}

impl VersionScope {
    pub fn new(language: impl Into<String>, version: u32) -> Self {
        Self {
            language: language.into(),
            version,
        }
    }
}

/// One item document: identity, hierarchy pointer, and the flat
/// versioned/localized field-value collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    /// Item identifier, immutable after creation.
    pub id: Uuid,
    /// Containing item, or `None` for a synthetic top-level root.
    pub parent_id: Option<Uuid>,
    pub name: String,
    pub template_id: Uuid,
    /// Branch template the item was created from, if any.
    pub branch_id: Option<Uuid>,
    /// Flat field-value collection; at most one entry per exact key.
    pub fields: Vec<FieldEntry>,
}

impl Item {
    /// A new item with no branch and no field values.
    pub fn new(
        id: Uuid,
        name: impl Into<String>,
        template_id: Uuid,
        parent_id: Option<Uuid>,
    ) -> Self {
        Self {
            id,
            parent_id,
            name: name.into(),
            template_id,
            branch_id: None,
            fields: Vec::new(),
        }
    }

    /// Identity metadata with the parent translated for callers.
    pub fn definition(&self, join_parent_id: Uuid) -> ItemDefinition {
        ItemDefinition {
            id: self.id,
            name: self.name.clone(),
            template_id: self.template_id,
            branch_id: self.branch_id,
            parent_id: self.parent_id.unwrap_or(join_parent_id),
        }
    }

    /// Distinct `(language, version)` pairs among fully scoped keys,
    /// sorted for deterministic output.
    pub fn versions(&self) -> Vec<VersionDescriptor> {
        let mut seen = HashSet::new();
        for entry in &self.fields {
            if let (Some(language), Some(version)) = (&entry.key.language, entry.key.version) {
                seen.insert(VersionDescriptor {
                    language: language.clone(),
                    version,
                });
            }
        }
        let mut versions: Vec<_> = seen.into_iter().collect();
        versions.sort();
        versions
    }

    /// Resolve every field visible under the given scope.
    ///
    /// When more than one stored entry matches the same field (a shared
    /// value alongside a scoped one), the more fully scoped key wins.
    pub fn resolve_fields(&self, scope: &VersionScope) -> HashMap<Uuid, String> {
        let mut best: HashMap<Uuid, (u8, &str)> = HashMap::new();
        for entry in &self.fields {
            if !entry.key.matches(&scope.language, scope.version) {
                continue;
            }
            let rank = entry.key.specificity();
            match best.get(&entry.key.field_id) {
                Some((current, _)) if *current >= rank => {}
                _ => {
                    best.insert(entry.key.field_id, (rank, entry.value.as_str()));
                }
            }
        }
        best.into_iter()
            .map(|(field_id, (_, value))| (field_id, value.to_string()))
            .collect()
    }

    /// Insert a field value, replacing any entry with the exact same key.
    pub fn set_field(&mut self, key: FieldKey, value: impl Into<String>) {
        let value = value.into();
        if let Some(existing) = self.fields.iter_mut().find(|e| e.key == key) {
            existing.value = value;
        } else {
            self.fields.push(FieldEntry { key, value });
        }
    }

    /// Allocate a new version and return its number.
    ///
    /// With a positive base version, every field value matching the base
    /// scope is copied into a new version numbered one greater than the
    /// highest version among the matched keys. With a zero base version, or
    /// when nothing matches, a blank version 1 is allocated instead,
    /// holding a single created-marker entry so [`Item::versions`] can
    /// discover it.
    pub fn add_version(&mut self, base: &VersionScope) -> u32 {
        if base.version > 0 {
            let matched: Vec<FieldEntry> = self
                .fields
                .iter()
                .filter(|e| e.key.matches(&base.language, base.version))
                .cloned()
                .collect();
            if !matched.is_empty() {
                let new_version = matched
                    .iter()
                    .filter_map(|e| e.key.version)
                    .max()
                    .unwrap_or(0)
                    + 1;
                for entry in matched {
                    self.set_field(
                        FieldKey::versioned(entry.key.field_id, base.language.clone(), new_version),
                        entry.value,
                    );
                }
                return new_version;
            }
        }
        self.set_field(
            FieldKey::versioned(CREATED_FIELD_ID, base.language.clone(), 1),
            "",
        );
        1
    }

    /// Apply a change set: property updates, then each field change in
    /// order.
    pub fn apply_changes(&mut self, changes: &ItemChanges) {
        if let Some(props) = &changes.properties {
            if let Some(name) = &props.name {
                self.name = name.clone();
            }
            self.template_id = props.template_id.unwrap_or_else(Uuid::nil);
            self.branch_id = props.branch_id;
        }
        for change in &changes.fields {
            self.apply_field_change(change);
        }
    }

    fn apply_field_change(&mut self, change: &FieldChange) {
        let scope = change.scope_key();
        let position = self.fields.iter().position(|e| e.key.overlaps(&scope));
        if change.remove {
            if let Some(index) = position {
                self.fields.remove(index);
            }
        } else if let Some(index) = position {
            self.fields[index].value = change.value.clone();
        } else {
            self.fields.push(FieldEntry::new(scope, change.value.clone()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::changes::PropertyChanges;

    fn uid(n: u128) -> Uuid {
        Uuid::from_u128(n)
    }

    fn item() -> Item {
        Item::new(uid(1), "home", uid(100), Some(uid(2)))
    }

    #[test]
    fn definition_reports_stored_parent_when_present() {
        let def = item().definition(uid(99));
        assert_eq!(def.parent_id, uid(2));
    }

    #[test]
    fn definition_substitutes_join_parent_for_top_level_roots() {
        let root = Item::new(uid(1), "home", uid(100), None);
        assert_eq!(root.definition(uid(99)).parent_id, uid(99));
    }

    #[test]
    fn versions_ignores_partially_scoped_keys() {
        let mut it = item();
        it.set_field(FieldKey::shared(uid(10)), "a");
        it.set_field(FieldKey::unversioned(uid(11), "en"), "b");
        it.set_field(FieldKey::versioned(uid(12), "en", 1), "c");
        it.set_field(FieldKey::versioned(uid(13), "en", 1), "d");
        it.set_field(FieldKey::versioned(uid(12), "de", 2), "e");

        let versions = it.versions();
        assert_eq!(
            versions,
            vec![
                VersionDescriptor { language: "de".into(), version: 2 },
                VersionDescriptor { language: "en".into(), version: 1 },
            ]
        );
    }

    #[test]
    fn resolve_fields_prefers_more_fully_scoped_entries() {
        let mut it = item();
        it.set_field(FieldKey::shared(uid(10)), "shared");
        it.set_field(FieldKey::versioned(uid(10), "en", 1), "exact");
        it.set_field(FieldKey::unversioned(uid(11), "en"), "unversioned");

        let fields = it.resolve_fields(&VersionScope::new("en", 1));
        assert_eq!(fields.get(&uid(10)).map(String::as_str), Some("exact"));
        assert_eq!(fields.get(&uid(11)).map(String::as_str), Some("unversioned"));

        // Under a different version the shared value is still visible.
        let fields = it.resolve_fields(&VersionScope::new("en", 2));
        assert_eq!(fields.get(&uid(10)).map(String::as_str), Some("shared"));
    }

    #[test]
    fn add_version_copies_matching_fields_into_next_number() {
        let mut it = item();
        it.set_field(FieldKey::versioned(uid(10), "en", 1), "title v1");
        it.set_field(FieldKey::shared(uid(11)), "shared");

        let new_version = it.add_version(&VersionScope::new("en", 1));
        assert_eq!(new_version, 2);

        let fields = it.resolve_fields(&VersionScope::new("en", 2));
        assert_eq!(fields.get(&uid(10)).map(String::as_str), Some("title v1"));
        // The shared value was copied into the new version too.
        assert_eq!(fields.get(&uid(11)).map(String::as_str), Some("shared"));
    }

    #[test]
    fn add_version_with_zero_base_allocates_blank_version_one() {
        let mut it = item();
        let new_version = it.add_version(&VersionScope::new("en", 0));
        assert_eq!(new_version, 1);
        assert_eq!(
            it.versions(),
            vec![VersionDescriptor { language: "en".into(), version: 1 }]
        );
    }

    #[test]
    fn add_version_falls_back_to_blank_when_base_has_no_fields() {
        let mut it = item();
        let new_version = it.add_version(&VersionScope::new("en", 7));
        assert_eq!(new_version, 1);
        assert!(it.fields.iter().any(|e| e.key.field_id == CREATED_FIELD_ID));
    }

    #[test]
    fn apply_changes_updates_properties_and_clears_null_identifiers() {
        let mut it = item();
        it.branch_id = Some(uid(50));
        it.apply_changes(&ItemChanges::default().with_properties(PropertyChanges {
            name: None,
            template_id: Some(uid(200)),
            branch_id: None,
        }));

        // Absent name falls back to the stored value.
        assert_eq!(it.name, "home");
        assert_eq!(it.template_id, uid(200));
        assert_eq!(it.branch_id, None);
    }

    #[test]
    fn field_change_overwrites_overlapping_shared_entry_in_place() {
        let mut it = item();
        it.set_field(FieldKey::shared(uid(10)), "old");

        it.apply_changes(
            &ItemChanges::default().with_field(FieldChange::set(uid(10), "en", 1, "new")),
        );

        // The shared entry was updated, not shadowed by a scoped duplicate.
        assert_eq!(it.fields.len(), 1);
        assert_eq!(it.fields[0].key, FieldKey::shared(uid(10)));
        assert_eq!(it.fields[0].value, "new");
    }

    #[test]
    fn removal_deletes_first_matching_key_and_is_noop_when_absent() {
        let mut it = item();
        it.set_field(FieldKey::versioned(uid(10), "en", 1), "x");

        it.apply_changes(
            &ItemChanges::default().with_field(FieldChange::removal(uid(10), "en", 1)),
        );
        assert!(it.fields.is_empty());

        // Removing again changes nothing.
        it.apply_changes(
            &ItemChanges::default().with_field(FieldChange::removal(uid(10), "en", 1)),
        );
        assert!(it.fields.is_empty());
    }
}
