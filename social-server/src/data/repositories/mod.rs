pub(crate) mod filesystem;
pub(crate) mod memory;
pub(crate) mod sqlite;
