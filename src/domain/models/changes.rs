//! Change sets describing item mutations applied by save-item.

use uuid::Uuid;

use super::field::FieldKey;

/// Property updates carried by a change set.
///
/// `name` falls back to the unchanged stored value when absent. The
/// identifier properties are taken wholesale: an explicit `None` is the
/// null identifier and clears the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyChanges {
    pub name: Option<String>,
    pub template_id: Option<Uuid>,
    pub branch_id: Option<Uuid>,
}

/// One field mutation within a change set.
///
/// Carries the concrete language and version the host was editing plus the
/// field definition's scoping flags; the flags decide how much of that
/// scope actually applies (see [`FieldChange::scope_key`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldChange {
    pub field_id: Uuid,
    pub language: String,
    pub version: u32,
    pub value: String,
    /// Remove the matching stored value instead of writing one.
    pub remove: bool,
    /// Field definition flag: the value is shared across all languages.
    pub shared: bool,
    /// Field definition flag: the value applies to every version.
    pub unversioned: bool,
}

impl FieldChange {
    /// A change writing `value` into the given concrete scope.
    pub fn set(
        field_id: Uuid,
        language: impl Into<String>,
        version: u32,
        value: impl Into<String>,
    ) -> Self {
        Self {
            field_id,
            language: language.into(),
            version,
            value: value.into(),
            remove: false,
            shared: false,
            unversioned: false,
        }
    }

    /// A change removing the value stored under the given scope.
    pub fn removal(field_id: Uuid, language: impl Into<String>, version: u32) -> Self {
        Self {
            field_id,
            language: language.into(),
            version,
            value: String::new(),
            remove: true,
            shared: false,
            unversioned: false,
        }
    }

    /// Mark the field definition as shared across languages.
    pub fn with_shared(mut self) -> Self {
        self.shared = true;
        self
    }

    /// Mark the field definition as unversioned.
    pub fn with_unversioned(mut self) -> Self {
        self.unversioned = true;
        self
    }

    /// The storage scope this change addresses.
    ///
    /// Shared fields ignore the language; shared and unversioned fields
    /// ignore the version number.
    pub fn scope_key(&self) -> FieldKey {
        FieldKey {
            field_id: self.field_id,
            language: if self.shared {
                None
            } else {
                Some(self.language.clone())
            },
            version: if self.shared || self.unversioned {
                None
            } else {
                Some(self.version)
            },
        }
    }
}

/// Property and field mutations applied to one item in a single write.
#[derive(Debug, Clone, Default)]
pub struct ItemChanges {
    pub properties: Option<PropertyChanges>,
    /// Field changes, applied in order.
    pub fields: Vec<FieldChange>,
}

impl ItemChanges {
    pub fn has_property_changes(&self) -> bool {
        self.properties.is_some()
    }

    pub fn has_field_changes(&self) -> bool {
        !self.fields.is_empty()
    }

    /// Attach property updates.
    pub fn with_properties(mut self, properties: PropertyChanges) -> Self {
        self.properties = Some(properties);
        self
    }

    /// Append a field change.
    pub fn with_field(mut self, change: FieldChange) -> Self {
        self.fields.push(change);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fid() -> Uuid {
        Uuid::parse_str("4d3c2b1a-5e6f-4a7b-9c8d-7e6f5a4b3c2d").expect("valid uuid")
    }

    #[test]
    fn scope_key_keeps_full_scope_for_ordinary_fields() {
        let change = FieldChange::set(fid(), "en", 3, "x");
        let key = change.scope_key();
        assert_eq!(key.language.as_deref(), Some("en"));
        assert_eq!(key.version, Some(3));
    }

    #[test]
    fn scope_key_drops_version_for_unversioned_fields() {
        let key = FieldChange::set(fid(), "en", 3, "x").with_unversioned().scope_key();
        assert_eq!(key.language.as_deref(), Some("en"));
        assert_eq!(key.version, None);
    }

    #[test]
    fn scope_key_drops_language_and_version_for_shared_fields() {
        let key = FieldChange::set(fid(), "en", 3, "x").with_shared().scope_key();
        assert_eq!(key.language, None);
        assert_eq!(key.version, None);
    }

    #[test]
    fn empty_change_set_reports_nothing_changed() {
        let changes = ItemChanges::default();
        assert!(!changes.has_property_changes());
        assert!(!changes.has_field_changes());
    }
}
