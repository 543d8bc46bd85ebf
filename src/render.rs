use crate::error::{Result, SeqtError};
use crate::store::{SequenceStore, GROUND, LEAF};
use std::hash::Hash;

impl<T: Hash + Eq + Clone> SequenceStore<T> {
    /// Reconstructs the tokens a row spans.
    ///
    /// Walks the composition tree with an explicit stack, matching the
    /// left-to-right stream order and stopping early at any cached row.
    pub(crate) fn render(&self, id: u32) -> Result<Vec<T>> {
        let total = self.total();
        if id as usize >= total {
            return Err(SeqtError::UnknownSequence { id, total });
        }
        if let Some(cached) = self.rendered.get(&id) {
            return Ok(cached.clone());
        }

        let mut tokens = Vec::with_capacity(self.lengths[id as usize] as usize);
        let mut stack = vec![id];

        while let Some(current) = stack.pop() {
            if current == GROUND {
                continue;
            }
            if let Some(cached) = self.rendered.get(&current) {
                tokens.extend(cached.iter().cloned());
                continue;
            }

            let (left, right) = self.seqs[current as usize];
            if (left, right) == LEAF {
                let token = self
                    .alphabet
                    .token(current)
                    .ok_or(SeqtError::AlphabetDesync(current))?;
                tokens.push(token.clone());
            } else {
                // right first so left pops first
                stack.push(right);
                stack.push(left);
            }
        }

        Ok(tokens)
    }

    /// Renders and caches each of `ids`.
    ///
    /// Rows are rendered in the given order, so passing children before
    /// parents lets every parent reuse them.
    pub(crate) fn cache_renderings(&mut self, ids: &[u32]) -> Result<()> {
        for &id in ids {
            let tokens = self.render(id)?;
            self.rendered.insert(id, tokens);
        }
        Ok(())
    }
}
