// Saved-draft store: save, list (newest first), delete.

pub mod handlers;
