pub mod catalog;
pub mod host;
pub mod sql;

pub use catalog::{ViewDef, ViewScope, view_defs};
pub use host::{HostError, HostIdentity};
pub use sql::{escape_string_literal, quote_literal};
