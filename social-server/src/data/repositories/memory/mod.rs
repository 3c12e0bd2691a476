pub(crate) mod session_store;
