use std::collections::HashMap;

use funcloop_core::{ConversationError, FunctionSpec};

use crate::{clothing, weather};

/// The closed set of functions this crate can execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KnownFunction {
    CurrentWeather,
    ClothingRecommendations,
}

impl KnownFunction {
    pub const ALL: [KnownFunction; 2] = [
        KnownFunction::CurrentWeather,
        KnownFunction::ClothingRecommendations,
    ];

    pub fn name(self) -> &'static str {
        match self {
            KnownFunction::CurrentWeather => weather::NAME,
            KnownFunction::ClothingRecommendations => clothing::NAME,
        }
    }

    pub fn spec(self) -> FunctionSpec {
        match self {
            KnownFunction::CurrentWeather => weather::spec(),
            KnownFunction::ClothingRecommendations => clothing::spec(),
        }
    }

    /// Parse `raw_arguments` and run the function, returning its JSON-encoded output.
    pub fn invoke(self, raw_arguments: &str) -> Result<String, ConversationError> {
        match self {
            KnownFunction::CurrentWeather => weather::invoke(raw_arguments),
            KnownFunction::ClothingRecommendations => clothing::invoke(raw_arguments),
        }
    }
}

/// Read-only catalog of callable functions, fixed once built.
#[derive(Debug, Clone)]
pub struct FunctionRegistry {
    specs: Vec<FunctionSpec>,
    functions: HashMap<String, KnownFunction>,
}

impl FunctionRegistry {
    /// Registry holding every built-in function.
    pub fn builtin() -> Self {
        Self::with_functions(KnownFunction::ALL)
    }

    /// Registry restricted to the given functions, in catalog order. Duplicates are skipped.
    pub fn with_functions(functions: impl IntoIterator<Item = KnownFunction>) -> Self {
        let mut registry = Self {
            specs: Vec::new(),
            functions: HashMap::new(),
        };
        for function in functions {
            if registry.functions.contains_key(function.name()) {
                continue;
            }
            registry.specs.push(function.spec());
            registry.functions.insert(function.name().to_string(), function);
        }
        registry
    }

    pub fn lookup(&self, name: &str) -> Option<&FunctionSpec> {
        self.specs.iter().find(|spec| spec.name == name)
    }

    pub fn resolve(&self, name: &str) -> Option<KnownFunction> {
        self.functions.get(name).copied()
    }

    /// Every spec, in registration order; sent unchanged on each model call.
    pub fn catalog(&self) -> &[FunctionSpec] {
        &self.specs
    }

    pub fn list(&self) -> Vec<&str> {
        self.specs.iter().map(|spec| spec.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
