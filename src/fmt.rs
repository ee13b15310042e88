//! Formatting implementation for the PrefixTrie

use std::fmt::{Debug, Formatter, Result};

use super::*;

impl<P: Debug> Debug for PrefixTrie<P> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
