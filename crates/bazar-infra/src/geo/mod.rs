//! Postal-code lookup - ViaCEP client plus a caching decorator.

mod viacep;

pub use viacep::{CachedPostalLookup, ViaCepClient};
