use indexmap::IndexSet;

use super::Tracked;

/// Registry of named parameters that tracked scalars differentiate against.
///
/// Names are assigned dense 0-based ids in order of first registration; the id
/// is the gradient slot in every [`Tracked`] value.
#[derive(Debug, Clone, Default)]
pub struct ParameterSet {
    names: IndexSet<String>,
}

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the id of `name`, registering it if it is new.
    pub fn register(&mut self, name: &str) -> usize {
        if let Some(id) = self.names.get_index_of(name) {
            return id;
        }
        self.names.insert_full(name.to_string()).0
    }

    /// Register `name` and return a tracked scalar seeded with respect to it.
    ///
    /// # Examples
    /// ```
    /// use cholad_core::scalar::{ParameterSet, Scalar};
    ///
    /// let mut params = ParameterSet::new();
    /// let x = params.variable("x", 9.0);
    /// let r = x.sqrt();
    /// assert_eq!(params.derivative(&r, "x"), Some(1.0 / 6.0));
    /// ```
    pub fn variable(&mut self, name: &str, value: f64) -> Tracked {
        let id = self.register(name);
        Tracked::variable(value, id)
    }

    pub fn id(&self, name: &str) -> Option<usize> {
        self.names.get_index_of(name)
    }

    pub fn name(&self, id: usize) -> Option<&str> {
        self.names.get_index(id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Derivative of `x` with respect to the parameter called `name`.
    pub fn derivative(&self, x: &Tracked, name: &str) -> Option<f64> {
        self.id(name).map(|id| x.derivative(id))
    }

    /// All partial derivatives of `x`, paired with parameter names.
    pub fn named_gradient<'a>(&'a self, x: &Tracked) -> Vec<(&'a str, f64)> {
        self.names
            .iter()
            .enumerate()
            .map(|(id, name)| (name.as_str(), x.derivative(id)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scalar::Scalar;

    #[test]
    fn test_register_is_idempotent() {
        let mut params = ParameterSet::new();
        assert_eq!(params.register("sigma"), 0);
        assert_eq!(params.register("rho"), 1);
        assert_eq!(params.register("sigma"), 0);
        assert_eq!(params.len(), 2);
        assert_eq!(params.name(1), Some("rho"));
        assert_eq!(params.id("missing"), None);
    }

    #[test]
    fn test_named_gradient() {
        let mut params = ParameterSet::new();
        let a = params.variable("a", 2.0);
        let b = params.variable("b", 3.0);
        let f = a.mul(&b).add(&a);
        let grad = params.named_gradient(&f);
        assert_eq!(grad, vec![("a", 4.0), ("b", 2.0)]);
    }
}
