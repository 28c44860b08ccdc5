// Style analysis pipeline and style profile CRUD.
// Analysis: corpus → LLM (low temperature) → JSON extraction → auto-save.

pub mod analyzer;
pub mod handlers;
pub mod store;
