// Symbol table (C3)
//
// A closed-addressing hash table with chaining, grounded in the teacher's
// dictionary pattern (kernel.rs's `builtins: Vec<BuiltInFn>` plus
// add_builtin/get_builtin lookups), generalized to a name -> definition
// map with djb2 hashing over a fixed bucket count.
//
// The original C implementation this design traces back to nulls a
// whole bucket when a delete matches the head entry with no
// predecessor, losing any chained successors. Buckets here are plain
// Vec<Entry>, so removal is just Vec::retain / index removal - that bug
// class cannot reappear.

use crate::internals::builtin::BuiltinTag;

pub const BUCKET_COUNT: usize = 16384;

#[derive(Debug, Clone)]
pub enum Definition {
    Builtin(BuiltinTag),
    User(Vec<u8>),
}

#[derive(Debug, Clone)]
struct Entry {
    name: Vec<u8>,
    def: Definition,
}

pub struct SymbolTable {
    buckets: Vec<Vec<Entry>>,
}

fn djb2(name: &[u8]) -> usize {
    let mut h: u64 = 5381;
    for &c in name {
        h = h.wrapping_mul(33) ^ (c as u64);
    }
    (h as usize) % BUCKET_COUNT
}

impl SymbolTable {
    pub fn new() -> SymbolTable {
        SymbolTable {
            buckets: (0..BUCKET_COUNT).map(|_| Vec::new()).collect(),
        }
    }

    pub fn lookup(&self, name: &[u8]) -> Option<&Definition> {
        let bucket = &self.buckets[djb2(name)];
        bucket.iter().find(|e| e.name == name).map(|e| &e.def)
    }

    /// upsert inserts a new entry or replaces the body of an existing one.
    pub fn upsert(&mut self, name: &[u8], def: Definition) {
        let idx = djb2(name);
        let bucket = &mut self.buckets[idx];
        if let Some(entry) = bucket.iter_mut().find(|e| e.name == name) {
            entry.def = def;
        } else {
            bucket.push(Entry {
                name: name.to_vec(),
                def,
            });
        }
    }

    /// delete removes an entry by name; missing names are silently
    /// ignored, since undefining an absent name is benign, not an error.
    pub fn delete(&mut self, name: &[u8]) {
        let bucket = &mut self.buckets[djb2(name)];
        bucket.retain(|e| e.name != name);
    }

    /// histogram returns the length of each non-empty bucket, in bucket
    /// order - the per-bucket-length frequency distribution htdist
    /// reports to the diagnostic channel.
    pub fn histogram(&self) -> Vec<usize> {
        self.buckets.iter().map(|b| b.len()).collect()
    }

    /// entries iterates every (name, definition) pair, bucket order then
    /// insertion order within a bucket - used by dumpdef's no-argument
    /// form to report the whole table.
    pub fn entries(&self) -> impl Iterator<Item = (&[u8], &Definition)> {
        self.buckets
            .iter()
            .flat_map(|b| b.iter())
            .map(|e| (e.name.as_slice(), &e.def))
    }
}

impl Default for SymbolTable {
    fn default() -> SymbolTable {
        SymbolTable::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_miss_on_empty_table() {
        let st = SymbolTable::new();
        assert!(st.lookup(b"foo").is_none());
    }

    #[test]
    fn upsert_then_lookup_user_definition() {
        let mut st = SymbolTable::new();
        st.upsert(b"foo", Definition::User(b"bar".to_vec()));
        match st.lookup(b"foo") {
            Some(Definition::User(body)) => assert_eq!(body, b"bar"),
            _ => panic!("expected user definition"),
        }
    }

    #[test]
    fn upsert_replaces_existing_body() {
        let mut st = SymbolTable::new();
        st.upsert(b"foo", Definition::User(b"bar".to_vec()));
        st.upsert(b"foo", Definition::User(b"baz".to_vec()));
        match st.lookup(b"foo") {
            Some(Definition::User(body)) => assert_eq!(body, b"baz"),
            _ => panic!("expected updated definition"),
        }
    }

    #[test]
    fn delete_removes_entry() {
        let mut st = SymbolTable::new();
        st.upsert(b"foo", Definition::User(b"bar".to_vec()));
        st.delete(b"foo");
        assert!(st.lookup(b"foo").is_none());
    }

    #[test]
    fn delete_of_missing_name_is_silent() {
        let mut st = SymbolTable::new();
        st.delete(b"never-defined"); // must not panic
        assert!(st.lookup(b"never-defined").is_none());
    }

    #[test]
    fn chained_entries_survive_sibling_deletion() {
        // Force a collision by reusing the hash table directly isn't
        // possible from outside, but deleting one name must never affect
        // another name that happens to share a bucket.
        let mut st = SymbolTable::new();
        st.upsert(b"a", Definition::User(b"1".to_vec()));
        st.upsert(b"b", Definition::User(b"2".to_vec()));
        st.upsert(b"c", Definition::User(b"3".to_vec()));
        st.delete(b"b");
        assert!(st.lookup(b"b").is_none());
        match st.lookup(b"a") {
            Some(Definition::User(v)) => assert_eq!(v, b"1"),
            _ => panic!(),
        }
        match st.lookup(b"c") {
            Some(Definition::User(v)) => assert_eq!(v, b"3"),
            _ => panic!(),
        }
    }

    #[test]
    fn histogram_has_one_entry_per_bucket() {
        let st = SymbolTable::new();
        assert_eq!(st.histogram().len(), BUCKET_COUNT);
    }

    #[test]
    fn histogram_reflects_inserted_count() {
        let mut st = SymbolTable::new();
        st.upsert(b"x", Definition::User(b"1".to_vec()));
        let total: usize = st.histogram().iter().sum();
        assert_eq!(total, 1);
    }

    #[test]
    fn entries_visits_every_inserted_name() {
        let mut st = SymbolTable::new();
        st.upsert(b"a", Definition::User(b"1".to_vec()));
        st.upsert(b"b", Definition::User(b"2".to_vec()));
        let mut names: Vec<Vec<u8>> = st.entries().map(|(n, _)| n.to_vec()).collect();
        names.sort();
        assert_eq!(names, vec![b"a".to_vec(), b"b".to_vec()]);
    }
}
