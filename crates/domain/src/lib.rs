pub mod documents;
pub mod entities;
pub mod money;
pub mod repositories;
pub mod schema;
pub mod templates;
pub mod value_objects;
