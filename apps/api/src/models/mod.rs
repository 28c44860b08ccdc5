pub mod draft;
pub mod style;
