// trellis_core/src/estimation/filters/mod.rs

pub mod forward;

pub use forward::ForwardFilter;
