use crate::alphabet::Alphabet;
use crate::bulk;
use crate::error::{Result, SeqtError};
use ahash::AHashMap as HashMap;
use std::hash::Hash;

/// Row 0: the empty sequence every table starts with.
pub(crate) const GROUND: u32 = 0;

/// Composition of rows that have no children (atoms and row 0).
pub(crate) const LEAF: (u32, u32) = (0, 0);

/// Column store of every tracked sequence, indexed by a dense row id.
///
/// All per-row state lives in parallel `Vec`s of equal length. Rows are only
/// appended, except during [`compact`](Self::compact), which rewrites every
/// column into a smaller id space and invalidates all previously held ids.
#[derive(Debug, Clone)]
pub(crate) struct SequenceStore<T> {
    /// Number of atomic tokens each row spans
    pub(crate) lengths: Vec<u64>,
    /// `(left, right)` children; `LEAF` for atoms
    pub(crate) seqs: Vec<(u32, u32)>,
    /// Completed occurrences
    pub(crate) counts: Vec<u64>,
    /// Children's counts at the moment the row was created
    pub(crate) initial_counts: Vec<(u64, u64)>,
    /// Stream position at the moment the row was created
    pub(crate) initial_characters_read: Vec<u64>,
    /// 0 = an occurrence ends at the cursor, -k = last ending was k tokens ago
    pub(crate) recency: Vec<i64>,
    pub(crate) expected: Vec<f64>,
    pub(crate) stddev: Vec<f64>,
    pub(crate) significance: Vec<f64>,

    /// Maps a composition back to the row that holds it
    pub(crate) seq_index: HashMap<(u32, u32), u32>,

    pub(crate) alphabet: Alphabet<T>,

    /// Rendered token strings, keyed by row id
    pub(crate) rendered: HashMap<u32, Vec<T>>,

    /// Tokens ingested so far
    pub(crate) characters_read: u64,
}

impl<T: Hash + Eq + Clone> SequenceStore<T> {
    /// Creates a store holding only the ground row.
    pub(crate) fn new() -> Self {
        let mut store = Self {
            lengths: Vec::new(),
            seqs: Vec::new(),
            counts: Vec::new(),
            initial_counts: Vec::new(),
            initial_characters_read: Vec::new(),
            recency: Vec::new(),
            expected: Vec::new(),
            stddev: Vec::new(),
            significance: Vec::new(),
            seq_index: HashMap::default(),
            alphabet: Alphabet::new(),
            rendered: HashMap::default(),
            characters_read: 0,
        };

        let ground = store.push_row(0, LEAF, (0, 0), -1);
        debug_assert_eq!(ground, GROUND);
        store.rendered.insert(GROUND, Vec::new());
        store
    }

    /// Number of rows, including row 0.
    pub(crate) fn total(&self) -> usize {
        self.lengths.len()
    }

    /// Number of tracked sequences; row 0 is not one.
    pub(crate) fn tracked(&self) -> usize {
        self.total() - 1
    }

    pub(crate) fn is_atom(&self, id: u32) -> bool {
        id != GROUND && self.seqs[id as usize] == LEAF
    }

    pub(crate) fn atom_count(&self) -> usize {
        self.alphabet.len()
    }

    /// Grows every column by one row and returns its id.
    fn push_row(&mut self, length: u64, seq: (u32, u32), initial: (u64, u64), recency: i64) -> u32 {
        let id = self.total() as u32;
        self.lengths.push(length);
        self.seqs.push(seq);
        self.counts.push(0);
        self.initial_counts.push(initial);
        self.initial_characters_read.push(self.characters_read);
        self.recency.push(recency);
        self.expected.push(0.0);
        self.stddev.push(0.0);
        self.significance.push(0.0);
        id
    }

    /// Returns the atom row for `token`, appending one if the token is new.
    ///
    /// A fresh atom starts with count 0 and recency 0.
    pub(crate) fn intern_token_atom(&mut self, token: T) -> u32 {
        if let Some(id) = self.alphabet.id(&token) {
            return id;
        }

        let id = self.push_row(1, LEAF, (0, 0), 0);
        self.rendered.insert(id, vec![token.clone()]);
        self.alphabet.insert(token, id);
        id
    }

    /// Looks up each composition in the current table.
    pub(crate) fn exists(&self, pairs: &[(u32, u32)]) -> Vec<Option<u32>> {
        pairs
            .iter()
            .map(|pair| self.seq_index.get(pair).copied())
            .collect()
    }

    /// Appends one composite row per pair and returns the new ids in order.
    ///
    /// Baselines are taken from the children's counts as they stand now. An
    /// empty batch appends nothing.
    pub(crate) fn append(&mut self, pairs: &[(u32, u32)], initial_recency: i64) -> Result<Vec<u32>> {
        let total = self.total();
        for &(left, right) in pairs {
            for child in [left, right] {
                if child == GROUND || child as usize >= total {
                    return Err(SeqtError::UnknownSequence { id: child, total });
                }
            }
        }

        let mut ids = Vec::with_capacity(pairs.len());
        for &(left, right) in pairs {
            if let Some(&existing) = self.seq_index.get(&(left, right)) {
                return Err(SeqtError::DuplicateComposition {
                    left,
                    right,
                    existing,
                });
            }

            let length = self.lengths[left as usize] + self.lengths[right as usize];
            let initial = (self.counts[left as usize], self.counts[right as usize]);
            let id = self.push_row(length, (left, right), initial, initial_recency);
            self.seq_index.insert((left, right), id);
            ids.push(id);
        }

        Ok(ids)
    }

    /// Verifies that a composite's stored length matches its children.
    pub(crate) fn check_length(&self, id: u32) -> Result<()> {
        let (left, right) = self.seqs[id as usize];
        if (left, right) == LEAF {
            return Ok(());
        }
        let stored = self.lengths[id as usize];
        let expected = self.lengths[left as usize] + self.lengths[right as usize];
        if stored != expected {
            return Err(SeqtError::LengthMismatch {
                id,
                stored,
                expected,
            });
        }
        Ok(())
    }

    /// Rewrites every column to hold exactly the rows in `keep`, in order.
    ///
    /// `keep` must be ascending and start with row 0. Returns the old-to-new
    /// id map, with `None` for dropped rows.
    pub(crate) fn compact(&mut self, keep: &[u32]) -> Result<Vec<Option<u32>>> {
        let total = self.total();
        debug_assert!(keep.windows(2).all(|w| w[0] < w[1]), "keep list must be ascending");
        debug_assert_eq!(keep.first(), Some(&GROUND), "row 0 is never evicted");

        let mut remap = vec![None; total];
        for (new_id, &old_id) in keep.iter().enumerate() {
            if old_id as usize >= total {
                return Err(SeqtError::UnknownSequence { id: old_id, total });
            }
            remap[old_id as usize] = Some(new_id as u32);
        }

        let mut seqs = Vec::with_capacity(keep.len());
        for &old_id in keep {
            let (left, right) = self.seqs[old_id as usize];
            if (left, right) == LEAF {
                if old_id != GROUND && self.alphabet.token(old_id).is_none() {
                    return Err(SeqtError::AlphabetDesync(old_id));
                }
                seqs.push(LEAF);
                continue;
            }

            let lookup = |child: u32| {
                remap[child as usize].ok_or(SeqtError::DanglingReference { id: old_id, child })
            };
            seqs.push((lookup(left)?, lookup(right)?));
        }

        self.seqs = seqs;
        self.lengths = bulk::gather(keep, &self.lengths);
        self.counts = bulk::gather(keep, &self.counts);
        self.initial_counts = bulk::gather(keep, &self.initial_counts);
        self.initial_characters_read = bulk::gather(keep, &self.initial_characters_read);
        self.recency = bulk::gather(keep, &self.recency);
        self.expected = bulk::gather(keep, &self.expected);
        self.stddev = bulk::gather(keep, &self.stddev);
        self.significance = bulk::gather(keep, &self.significance);

        self.seq_index = self
            .seqs
            .iter()
            .enumerate()
            .filter(|&(_, &seq)| seq != LEAF)
            .map(|(id, &seq)| (seq, id as u32))
            .collect();

        self.alphabet.remap(&remap);

        let rendered = std::mem::take(&mut self.rendered);
        self.rendered = rendered
            .into_iter()
            .filter_map(|(id, text)| remap[id as usize].map(|new_id| (new_id, text)))
            .collect();

        Ok(remap)
    }
}
