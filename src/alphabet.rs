use ahash::AHashMap as HashMap;
use std::hash::Hash;

/// Bijection between raw tokens and the atom rows that represent them.
///
/// Row 0 is the ground sequence and never appears here.
#[derive(Debug, Clone)]
pub(crate) struct Alphabet<T> {
    token_to_id: HashMap<T, u32>,
    id_to_token: HashMap<u32, T>,
}

impl<T: Hash + Eq + Clone> Alphabet<T> {
    pub(crate) fn new() -> Self {
        Self {
            token_to_id: HashMap::default(),
            id_to_token: HashMap::default(),
        }
    }

    pub(crate) fn id(&self, token: &T) -> Option<u32> {
        self.token_to_id.get(token).copied()
    }

    pub(crate) fn token(&self, id: u32) -> Option<&T> {
        self.id_to_token.get(&id)
    }

    pub(crate) fn insert(&mut self, token: T, id: u32) {
        debug_assert!(id != 0, "row 0 has no token");
        self.id_to_token.insert(id, token.clone());
        self.token_to_id.insert(token, id);
    }

    pub(crate) fn len(&self) -> usize {
        self.token_to_id.len()
    }

    /// Re-keys every entry through `remap`, dropping tokens whose atom was
    /// evicted. `remap[old]` is `None` for dropped rows.
    pub(crate) fn remap(&mut self, remap: &[Option<u32>]) {
        let old = std::mem::take(&mut self.id_to_token);
        self.token_to_id.clear();

        for (id, token) in old {
            if let Some(new_id) = remap.get(id as usize).copied().flatten() {
                self.insert(token, new_id);
            }
        }
    }
}
