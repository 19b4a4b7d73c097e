pub mod changes;
pub mod config;
pub mod field;
pub mod item;

pub use changes::{FieldChange, ItemChanges, PropertyChanges};
pub use config::{CacheConfig, Config, DatabaseConfig, RepositoryConfig};
pub use field::{FieldEntry, FieldKey};
pub use item::{
    Item, ItemDefinition, VersionDescriptor, VersionScope, CREATED_FIELD_ID, ROOT_ITEM_ID,
    ROOT_ITEM_NAME, ROOT_TEMPLATE_ID, TEMPLATE_TEMPLATE_ID,
};
