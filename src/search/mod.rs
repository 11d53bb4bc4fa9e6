//! Search input plumbing

pub mod debounce;

pub use debounce::SearchDebouncer;
