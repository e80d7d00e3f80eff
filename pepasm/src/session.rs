use ahash::AHashMap;
use string_interner::DefaultSymbol;

use crate::{Address, Interner};

/// Label name to value. Labels map to the location counter at their
/// definition, `.EQUATE` replaces that with a literal.
#[derive(Debug, Default, Clone)]
pub struct SymbolTable {
    values: AHashMap<DefaultSymbol, Address>,
}

impl SymbolTable {
    /// Returns the previous value when `name` was already defined.
    pub fn define(&mut self, name: DefaultSymbol, value: Address) -> Option<Address> {
        self.values.insert(name, value)
    }
    pub fn lookup(&self, name: DefaultSymbol) -> Option<Address> {
        self.values.get(&name).copied()
    }
    pub fn contains(&self, name: DefaultSymbol) -> bool {
        self.values.contains_key(&name)
    }
    pub fn len(&self) -> usize {
        self.values.len()
    }
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
    pub fn iter(&self) -> impl Iterator<Item = (DefaultSymbol, Address)> + '_ {
        self.values.iter().map(|(k, v)| (*k, *v))
    }
}

/// A symbol used as an operand, and the line that used it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reference {
    pub name: DefaultSymbol,
    pub line: u32,
}

/// What the last `.BURN` recorded.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Burn {
    pub count: u32,
    pub location: Address,
    pub argument: u16,
}

/// State shared by every line of one assembly run.
#[derive(Debug, Default)]
pub struct Session {
    pub si: Interner,
    pub symbols: SymbolTable,
    pub references: Vec<Reference>,
    pub location: Address,
    pub burn: Burn,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears all state left over from a previous run.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn intern(&mut self, name: &str) -> DefaultSymbol {
        self.si.get_or_intern(name)
    }
    pub fn resolve(&self, sym: DefaultSymbol) -> &str {
        self.si.resolve(sym).unwrap_or_default()
    }

    pub fn define(&mut self, name: &str, value: Address) -> Option<Address> {
        let sym = self.intern(name);
        self.symbols.define(sym, value)
    }
    pub fn lookup(&self, name: &str) -> Option<Address> {
        self.si.get(name).and_then(|sym| self.symbols.lookup(sym))
    }

    pub fn reference(&mut self, name: DefaultSymbol, line: u32) {
        tracing::debug!(name = self.resolve(name), line, "symbol referenced");
        self.references.push(Reference { name, line });
    }

    pub(crate) fn burn(&mut self, argument: u16) {
        self.burn = Burn {
            count: self.burn.count + 1,
            location: self.location,
            argument,
        };
        if self.burn.count > 1 {
            tracing::warn!(
                count = self.burn.count,
                "multiple .BURN directives, the last one wins"
            );
        }
    }

    /// Ledger entries whose symbol never made it into the symbol table.
    pub fn undefined_references(&self) -> impl Iterator<Item = &Reference> + '_ {
        self.references
            .iter()
            .filter(|r| !self.symbols.contains(r.name))
    }

    /// Symbol table entries sorted by name, for stable output.
    pub fn sorted_symbols(&self) -> Vec<(&str, Address)> {
        let mut symbols: Vec<_> = self
            .symbols
            .iter()
            .map(|(sym, value)| (self.resolve(sym), value))
            .collect();
        symbols.sort_unstable();
        symbols
    }
}
