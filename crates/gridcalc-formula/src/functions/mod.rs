//! Built-in functions
//!
//! Every function is an integer reduction over an ordered argument list.
//! Lookups are case-insensitive.

pub mod math;

use crate::error::{FormulaError, FormulaResult};
use std::collections::HashMap;
use std::fmt;

/// Function implementation signature
pub type FunctionImpl = Box<dyn Fn(&[i64]) -> FormulaResult<i64>>;

/// Function definition
pub struct FunctionDef {
    /// Function name (uppercase)
    pub name: String,
    /// Minimum arguments
    pub min_args: usize,
    /// Maximum arguments (None = unlimited)
    pub max_args: Option<usize>,
    /// Implementation
    pub implementation: FunctionImpl,
}

impl FunctionDef {
    /// Create a new function definition
    pub fn new<F>(name: &str, min_args: usize, max_args: Option<usize>, implementation: F) -> Self
    where
        F: Fn(&[i64]) -> FormulaResult<i64> + 'static,
    {
        Self {
            name: name.to_uppercase(),
            min_args,
            max_args,
            implementation: Box::new(implementation),
        }
    }

    /// Apply the function to already evaluated arguments
    pub fn call(&self, args: &[i64]) -> FormulaResult<i64> {
        if args.len() < self.min_args {
            return Err(FormulaError::ArgumentCount {
                function: self.name.clone(),
                expected: format!("at least {}", self.min_args),
                actual: args.len(),
            });
        }

        if let Some(max) = self.max_args {
            if args.len() > max {
                return Err(FormulaError::ArgumentCount {
                    function: self.name.clone(),
                    expected: format!("at most {}", max),
                    actual: args.len(),
                });
            }
        }

        (self.implementation)(args)
    }
}

impl fmt::Debug for FunctionDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionDef")
            .field("name", &self.name)
            .field("min_args", &self.min_args)
            .field("max_args", &self.max_args)
            .finish_non_exhaustive()
    }
}

/// Function registry
#[derive(Debug)]
pub struct FunctionRegistry {
    functions: HashMap<String, FunctionDef>,
}

impl FunctionRegistry {
    /// Create a new registry with all built-in functions
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register_math_functions();
        registry
    }

    /// Create a registry without any functions
    pub fn empty() -> Self {
        Self {
            functions: HashMap::new(),
        }
    }

    /// Look up a function by name
    pub fn get(&self, name: &str) -> Option<&FunctionDef> {
        self.functions.get(&name.to_uppercase())
    }

    /// Check whether a function is registered under this name
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Register a function, replacing any previous definition with the same name
    pub fn register(&mut self, def: FunctionDef) {
        self.functions.insert(def.name.clone(), def);
    }

    /// Names of all registered functions, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.functions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    fn register_math_functions(&mut self) {
        self.register(FunctionDef::new("MAX", 1, None, math::fn_max));
        self.register(FunctionDef::new("MIN", 1, None, math::fn_min));
        self.register(FunctionDef::new("SUM", 0, None, math::fn_sum));
        self.register(FunctionDef::new("ABS", 1, Some(1), math::fn_abs));
    }
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_lookup_is_case_insensitive() {
        let registry = FunctionRegistry::new();
        assert!(registry.contains("MAX"));
        assert!(registry.contains("max"));
        assert!(registry.contains("Sum"));
        assert!(!registry.contains("AVERAGE"));
        assert_eq!(registry.names(), vec!["ABS", "MAX", "MIN", "SUM"]);
    }

    #[test]
    fn test_argument_count_checked_on_call() {
        let registry = FunctionRegistry::new();
        let max = registry.get("max").unwrap();
        assert_eq!(max.call(&[3, 5]).unwrap(), 5);
        assert!(matches!(
            max.call(&[]),
            Err(FormulaError::ArgumentCount { actual: 0, .. })
        ));

        let abs = registry.get("ABS").unwrap();
        assert!(matches!(
            abs.call(&[1, 2]),
            Err(FormulaError::ArgumentCount { actual: 2, .. })
        ));
    }

    #[test]
    fn test_register_custom_function() {
        let mut registry = FunctionRegistry::empty();
        assert!(!registry.contains("twice"));

        registry.register(FunctionDef::new("twice", 1, Some(1), |args| {
            args[0].checked_mul(2).ok_or(FormulaError::Overflow)
        }));

        let twice = registry.get("TWICE").unwrap();
        assert_eq!(twice.name, "TWICE");
        assert_eq!(twice.call(&[21]).unwrap(), 42);
    }
}
