//! Decodes a whole directory (IFD) into a [`Block`].
//!
//! A directory is a `u16` entry count, then that many 12-byte entries, then a
//! `u32` pointer to the next directory in the chain (or zero).

use rustc_hash::FxHashSet;

use crate::{
    entry::{ENTRY_LEN, decode_entry},
    error::TiffResult,
    reader::Reader,
};
use tiff_meta_types::{Block, TagKey};

/// Decides which tags make it into a decoded block.
///
/// A tag is kept if it's picked, or if it isn't skipped. Picking wins.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TagFilter {
    /// Tags that are always kept.
    pub pick: FxHashSet<u16>,

    /// Tags that are dropped, unless they're also picked.
    pub skip: FxHashSet<u16>,
}

impl TagFilter {
    pub fn keeps(&self, tag: u16) -> bool {
        self.pick.contains(&tag) || !self.skip.contains(&tag)
    }

    /// Returns a copy of this filter that also picks `tags`.
    pub fn also_picking(&self, tags: impl IntoIterator<Item = u16>) -> TagFilter {
        let mut filter = self.clone();
        filter.pick.extend(tags);
        filter
    }
}

/// Parses out every kept entry of the directory at `offset`.
pub fn decode_directory(reader: &Reader<'_>, offset: usize, filter: &TagFilter) -> TiffResult<Block> {
    let entry_count: u16 = reader.u16(offset).inspect_err(|e| {
        log::error!("Couldn't find count on directory at `{offset}`! err: {e}")
    })?;
    log::trace!("Parsing `{entry_count}` entries at offset `{offset}`...");

    let mut block = Block::default();
    for i in 0..usize::from(entry_count) {
        let entry_offset = offset + 2 + i * ENTRY_LEN;
        let tag: u16 = reader.u16(entry_offset)?;

        if !filter.keeps(tag) {
            log::trace!("Skipping tag `{tag:#06x}`.");
            continue;
        }

        let value = decode_entry(reader, tag, entry_offset)
            .inspect_err(|e| log::error!("Failed to decode entry #{i} (`{tag:#06x}`). err: {e}"))?;

        if block.insert(TagKey::Id(tag), value).is_some() {
            log::warn!("Directory at `{offset}` had tag `{tag:#06x}` twice. Keeping the last one.");
        }
    }

    log::trace!("Completed directory! kept `{}` entries.", block.len());
    Ok(block)
}

/// Finds where the directory at `offset` stores its "next directory" pointer.
pub fn next_pointer_offset(reader: &Reader<'_>, offset: usize) -> TiffResult<usize> {
    let entry_count: u16 = reader.u16(offset)?;
    Ok(offset + 2 + usize::from(entry_count) * ENTRY_LEN)
}
