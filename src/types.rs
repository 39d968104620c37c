//! The closed table of type names the language recognizes. Everything else
//! refers to a type by its position in this table, so insertion order is
//! the id assignment.

use indexmap::IndexSet;

/// Position of a type name in its [TypeTable]
pub type TypeId = usize;

#[derive(Clone, Debug, Default)]
pub struct TypeTable {
    names: IndexSet<String>,
}

impl TypeTable {
    pub fn from_names(names: &[&str]) -> Self {
        TypeTable { names: names.iter().map(|name| name.to_string()).collect() }
    }
    /// Add a name, returning its id. Re-adding an existing name returns the
    /// id it already has.
    pub fn insert(&mut self, name: &str) -> TypeId {
        self.names.insert_full(name.to_string()).0
    }
    pub fn id_of(&self, name: &str) -> Option<TypeId> {
        self.names.get_index_of(name)
    }
    pub fn name_of(&self, id: TypeId) -> &str {
        self.names.get_index(id).expect("type id not in table (compiler bug)")
    }
    pub fn len(&self) -> usize {
        self.names.len()
    }
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
    /// The table the stock language ships with
    pub fn builtin() -> Self {
        TypeTable::from_names(&["int"])
    }
}

#[cfg(test)]
mod test {
    use super::TypeTable;
    #[test]
    fn position_is_id() {
        let types = TypeTable::from_names(&["int", "char"]);
        assert_eq!(types.id_of("int"), Some(0));
        assert_eq!(types.id_of("char"), Some(1));
        assert_eq!(types.id_of("float"), None);
        assert_eq!(types.name_of(1), "char");
    }
    #[test]
    fn insert_is_idempotent() {
        let mut types = TypeTable::builtin();
        let id = types.insert("word");
        assert_eq!(types.insert("word"), id);
        assert_eq!(types.len(), 2);
    }
}
