//! Foreign callables as native integrands

mod adapter;

pub use adapter::IntegrandAdapter;
