//! Core data types for the stride search system.

use pyo3::prelude::*;

// Note: We use std types at the PyO3 interface for compatibility;
// internal algorithm code uses rustc-hash maps.

/// A population of units (a node in the system graph).
///
/// `n` is the unit count; it is consumed by the external hint-derivation and
/// network-construction stages, not by the stride algorithm itself.
#[pyclass]
#[derive(Clone, Debug)]
pub struct Population {
    #[pyo3(get, set)]
    pub name: String,
    #[pyo3(get, set)]
    pub n: f64,
}

#[pymethods]
impl Population {
    #[new]
    fn new(name: String, n: f64) -> Self {
        Self { name, n }
    }

    fn __repr__(&self) -> String {
        format!("Population(name={:?}, n={})", self.name, self.n)
    }
}

/// A directed projection between two populations (an edge in the system
/// graph), identified by its endpoint names.
#[pyclass]
#[derive(Clone, Debug)]
pub struct Projection {
    #[pyo3(get, set)]
    pub origin: String,
    #[pyo3(get, set)]
    pub termination: String,
}

#[pymethods]
impl Projection {
    #[new]
    fn new(origin: String, termination: String) -> Self {
        Self {
            origin,
            termination,
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "Projection(origin={:?}, termination={:?})",
            self.origin, self.termination
        )
    }
}

/// The system architecture: populations, projections between them, and the
/// designated input population. Immutable for the duration of a search.
#[derive(Clone, Debug)]
pub struct System {
    pub populations: Vec<Population>,
    pub projections: Vec<Projection>,
    pub input_name: String,
}

impl System {
    pub fn new(
        populations: Vec<Population>,
        projections: Vec<Projection>,
        input_name: String,
    ) -> Self {
        Self {
            populations,
            projections,
            input_name,
        }
    }

    /// Index of the population with the given name, if any.
    pub fn find_population_index(&self, name: &str) -> Option<usize> {
        self.populations.iter().position(|p| p.name == name)
    }

    /// Index of the projection with the given endpoint names, if any.
    pub fn find_projection_index(&self, origin: &str, termination: &str) -> Option<usize> {
        self.projections
            .iter()
            .position(|p| p.origin == origin && p.termination == termination)
    }
}
