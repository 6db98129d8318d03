//! Per-line variable interner
//!
//! Variable names are interned into small integer ids in first-seen order.
//! Ids are only meaningful for the line that produced them; the driver
//! builds a fresh interner for every input line.

use rustc_hash::FxHashMap;

/// Index into the current line's variable table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VarId(pub u32);

/// Maps names to ids and back, preserving insertion order for output.
#[derive(Debug, Default)]
pub struct Interner {
    ids: FxHashMap<String, VarId>,
    names: Vec<String>,
}

impl Interner {
    pub fn new() -> Self {
        Interner::default()
    }

    /// Intern `name`, assigning the next id on first sight.
    pub fn intern(&mut self, name: &str) -> VarId {
        if let Some(&id) = self.ids.get(name) {
            return id;
        }
        let id = VarId(self.names.len() as u32);
        self.ids.insert(name.to_owned(), id);
        self.names.push(name.to_owned());
        id
    }

    /// The name behind `id`.
    ///
    /// # Panics
    /// Panics if `id` was not produced by this interner.
    pub fn name(&self, id: VarId) -> &str {
        &self.names[id.0 as usize]
    }

    /// All variables in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (VarId, &str)> {
        self.names
            .iter()
            .enumerate()
            .map(|(i, n)| (VarId(i as u32), n.as_str()))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_seen_order() {
        let mut interner = Interner::new();
        let y = interner.intern("y");
        let x = interner.intern("x");
        let y2 = interner.intern("y");
        assert_eq!(y, VarId(0));
        assert_eq!(x, VarId(1));
        assert_eq!(y, y2);

        let order: Vec<&str> = interner.iter().map(|(_, n)| n).collect();
        assert_eq!(order, vec!["y", "x"]);
    }

    #[test]
    fn test_name_lookup() {
        let mut interner = Interner::new();
        let id = interner.intern("velocity");
        assert_eq!(interner.name(id), "velocity");
    }
}
