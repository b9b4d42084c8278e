//! Function registry: the set of functions of one binary and symbol lookup.

use super::function::BinaryFunction;
use crate::utils::config::UNKNOWN_FUNCTION_ID;
use crate::utils::error::ModelError;
use std::collections::{BTreeMap, HashMap};

/// Lookup and enumeration of the functions of a binary
pub trait FunctionRegistry {
    /// File name of the binary
    fn file_name(&self) -> &str;

    fn build_id(&self) -> Option<&str>;

    /// All functions, in a deterministic order
    fn functions(&self) -> impl Iterator<Item = &BinaryFunction>;

    /// Resolve a symbol to the function owning it and the entry
    /// discriminator of the entry point the symbol names
    fn function_for_symbol(&self, symbol: &str) -> Option<(&BinaryFunction, u32)>;
}

/// In-memory registry keyed by function address
#[derive(Debug, Clone, Default)]
pub struct BinaryContext {
    file_name: String,
    build_id: Option<String>,
    functions: BTreeMap<u64, BinaryFunction>,
    /// symbol -> (function address, entry discriminator)
    symbols: HashMap<String, (u64, u32)>,
    /// function id -> function address
    ids: HashMap<u32, u64>,
}

impl BinaryContext {
    /// Build a registry, validating every function.
    ///
    /// # Errors
    /// * `ModelError::Invalid` - a function fails validation, or two
    ///   functions share an address, an id or a symbol, or a function uses
    ///   the reserved id 0
    pub fn new(
        file_name: impl Into<String>,
        build_id: Option<String>,
        functions: impl IntoIterator<Item = BinaryFunction>,
    ) -> Result<Self, ModelError> {
        let mut context = Self {
            file_name: file_name.into(),
            build_id,
            ..Default::default()
        };

        for function in functions {
            context.add_function(function)?;
        }

        Ok(context)
    }

    fn add_function(&mut self, function: BinaryFunction) -> Result<(), ModelError> {
        function.validate()?;

        if function.id == UNKNOWN_FUNCTION_ID {
            return Err(ModelError::Invalid(format!(
                "{}: function id {} is reserved for unknown call targets",
                function.name, UNKNOWN_FUNCTION_ID
            )));
        }

        if self.functions.contains_key(&function.address) {
            return Err(ModelError::Invalid(format!(
                "{}: another function already starts at {:#x}",
                function.name, function.address
            )));
        }

        if let Some(other) = self.ids.get(&function.id).and_then(|a| self.functions.get(a)) {
            return Err(ModelError::Invalid(format!(
                "{}: function id {} is already used by {}",
                function.name, function.id, other.name
            )));
        }

        for (entry, symbol) in function.entry_symbols().into_iter().enumerate() {
            if self.symbols.contains_key(symbol) {
                return Err(ModelError::Invalid(format!(
                    "{}: symbol {} is defined twice",
                    function.name, symbol
                )));
            }
            let entry = u32::try_from(entry).map_err(|_| {
                ModelError::Invalid(format!("{}: too many entry points", function.name))
            })?;
            self.symbols
                .insert(symbol.to_string(), (function.address, entry));
        }

        self.ids.insert(function.id, function.address);
        self.functions.insert(function.address, function);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

impl FunctionRegistry for BinaryContext {
    fn file_name(&self) -> &str {
        &self.file_name
    }

    fn build_id(&self) -> Option<&str> {
        self.build_id.as_deref()
    }

    fn functions(&self) -> impl Iterator<Item = &BinaryFunction> {
        self.functions.values()
    }

    fn function_for_symbol(&self, symbol: &str) -> Option<(&BinaryFunction, u32)> {
        let (address, entry) = self.symbols.get(symbol)?;
        self.functions.get(address).map(|f| (f, *entry))
    }
}
