//! Walks the graph of blocks in a TIFF structure.
//!
//! IFD 0 is the only block found from the header. From there, pointer tags
//! and the "next IFD" link lead to the rest:
//!
//! ```text
//! header ─► IFD 0 ──(0x8769)──► EXIF ──(0xA005)──► Interop
//!             │ └───(0x8825)──► GPS
//!             └─────(next)────► thumbnail (IFD 1)
//! ```
//!
//! Each block is decoded at most once per [`TiffParser`]. The per-block
//! methods can be called in any order, and as many times as you like.

use std::collections::BTreeMap;

use rustc_hash::FxHashSet;

use crate::{
    directory::{TagFilter, decode_directory, next_pointer_offset},
    error::TiffResult,
    header,
    options::Options,
    post_process::post_process,
    reader::Reader,
};
use tiff_meta_types::{
    Block, Endianness, IfdBlock, TagKey,
    tags::{
        EXIF_IFD_POINTER, GPS_IFD_POINTER, INTEROP_IFD_POINTER, THUMBNAIL_LENGTH,
        THUMBNAIL_OFFSET,
    },
};

/// Where a block is in its lifecycle.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum BlockState {
    /// Nobody has asked for this block yet.
    #[default]
    NotParsed,

    /// We looked, but the file doesn't have this block.
    Empty,

    /// The decoded block.
    Parsed(Block),
}

impl BlockState {
    /// The decoded block, if there is one.
    pub fn block(&self) -> Option<&Block> {
        match self {
            BlockState::Parsed(block) => Some(block),
            BlockState::NotParsed | BlockState::Empty => None,
        }
    }

    fn is_not_parsed(&self) -> bool {
        matches!(self, BlockState::NotParsed)
    }
}

/// What a full parse gives back, shaped by [`Options::merge_output`].
#[derive(Clone, Debug, PartialEq)]
pub enum Output {
    /// Every block's tags in one mapping. Later blocks win on collisions.
    Merged(Block),

    /// Each block's tags, kept apart.
    Grouped(BTreeMap<IfdBlock, Block>),
}

/// Offsets of linked blocks, captured from pointer tags.
#[derive(Clone, Copy, Debug, Default)]
struct Pointers {
    exif: Option<u32>,
    gps: Option<u32>,
    interop: Option<u32>,
}

/// One parse session over one TIFF buffer.
///
/// The buffer is only borrowed, so several sessions can share it.
#[derive(Clone, Debug)]
pub struct TiffParser<'b> {
    blob: &'b [u8],
    options: Options,

    /// Set once the header has been validated.
    reader: Option<Reader<'b>>,
    ifd0_offset: Option<u32>,
    pointers: Pointers,

    /// Directory offsets we've decoded, to catch pointer loops.
    visited: FxHashSet<u32>,

    ifd0: BlockState,
    exif: BlockState,
    gps: BlockState,
    interop: BlockState,
    thumbnail: BlockState,
}

impl<'b> TiffParser<'b> {
    /// Creates a session over the TIFF structure starting at `start` in
    /// `buffer`.
    ///
    /// Nothing is read until you ask for something. Every offset is checked
    /// against the end of `buffer`, so it should end where the TIFF data does.
    pub fn new(buffer: &'b [u8], start: usize, options: Options) -> Self {
        let blob: &'b [u8] = buffer.get(start..).unwrap_or_else(|| {
            log::warn!(
                "TIFF start `{start}` is past the end of the buffer (len `{}`).",
                buffer.len()
            );
            &[]
        });

        Self {
            blob,
            options,
            reader: None,
            ifd0_offset: None,
            pointers: Pointers::default(),
            visited: FxHashSet::default(),
            ifd0: BlockState::NotParsed,
            exif: BlockState::NotParsed,
            gps: BlockState::NotParsed,
            interop: BlockState::NotParsed,
            thumbnail: BlockState::NotParsed,
        }
    }

    /// The options this session was made with.
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Where `block` is in its lifecycle.
    pub fn state(&self, block: IfdBlock) -> &BlockState {
        match block {
            IfdBlock::Ifd0 => &self.ifd0,
            IfdBlock::Exif => &self.exif,
            IfdBlock::Gps => &self.gps,
            IfdBlock::Interop => &self.interop,
            IfdBlock::Thumbnail => &self.thumbnail,
        }
    }

    /// Shorthand for `self.state(block).block()`.
    pub fn block(&self, block: IfdBlock) -> Option<&Block> {
        self.state(block).block()
    }

    /// Validates the header, returning the buffer's byte order.
    pub fn read_header(&mut self) -> TiffResult<Endianness> {
        self.reader().map(|r| r.endianness())
    }

    fn reader(&mut self) -> TiffResult<Reader<'b>> {
        if let Some(reader) = self.reader {
            return Ok(reader);
        }

        let reader = header::read_header(self.blob)?;
        self.reader = Some(reader);
        Ok(reader)
    }

    /// Decodes IFD 0, capturing the pointers to other blocks.
    pub fn parse_ifd0_block(&mut self) -> TiffResult<()> {
        if !self.ifd0.is_not_parsed() {
            return Ok(());
        }

        let reader = self.reader()?;
        let offset: u32 = header::ifd0_offset(&reader)?;
        self.ifd0_offset = Some(offset);

        // pointers are plumbing. we need them whatever the filter says
        let filter = self.options.filter.also_picking([
            EXIF_IFD_POINTER,
            GPS_IFD_POINTER,
            INTEROP_IFD_POINTER,
        ]);
        let mut block = decode_directory(&reader, offset as usize, &filter)?;
        self.visited.insert(offset);

        // some writers emit an empty IFD 0. that's just a file without
        // metadata
        if block.is_empty() {
            log::trace!("IFD 0 is empty. There's nothing else to find.");
            self.ifd0 = BlockState::Empty;
            return Ok(());
        }

        self.pointers.exif = pointer(&block, EXIF_IFD_POINTER);
        self.pointers.gps = pointer(&block, GPS_IFD_POINTER);
        self.pointers.interop = pointer(&block, INTEROP_IFD_POINTER);
        log::trace!("Captured pointers from IFD 0: {:?}", self.pointers);

        if self.options.sanitize {
            for tag in [EXIF_IFD_POINTER, GPS_IFD_POINTER, INTEROP_IFD_POINTER] {
                block.remove(&TagKey::Id(tag));
            }
        }

        self.ifd0 = BlockState::Parsed(block);
        Ok(())
    }

    /// Decodes the EXIF block, if IFD 0 points at one.
    pub fn parse_exif_block(&mut self) -> TiffResult<()> {
        if !self.exif.is_not_parsed() {
            return Ok(());
        }
        self.parse_ifd0_block()?;

        let filter = self.options.filter.also_picking([INTEROP_IFD_POINTER]);
        self.exif = self.decode_linked(IfdBlock::Exif, self.pointers.exif, &filter)?;

        if let BlockState::Parsed(ref mut block) = self.exif {
            // IFD 0's interop pointer wins if it had one
            if self.pointers.interop.is_none() {
                self.pointers.interop = pointer(block, INTEROP_IFD_POINTER);
            }

            if self.options.sanitize {
                block.remove(&TagKey::Id(INTEROP_IFD_POINTER));
            }
        }

        Ok(())
    }

    /// Decodes the GPS block, if IFD 0 points at one.
    pub fn parse_gps_block(&mut self) -> TiffResult<()> {
        if !self.gps.is_not_parsed() {
            return Ok(());
        }
        self.parse_ifd0_block()?;

        let filter = self.options.filter.clone();
        self.gps = self.decode_linked(IfdBlock::Gps, self.pointers.gps, &filter)?;
        Ok(())
    }

    /// Decodes the Interop block, if IFD 0 or EXIF points at one.
    pub fn parse_interop_block(&mut self) -> TiffResult<()> {
        if !self.interop.is_not_parsed() {
            return Ok(());
        }
        self.parse_ifd0_block()?;

        // not in IFD 0? then it has to come from EXIF
        if self.pointers.interop.is_none() {
            self.parse_exif_block()?;
        }

        let filter = self.options.filter.clone();
        self.interop = self.decode_linked(IfdBlock::Interop, self.pointers.interop, &filter)?;
        Ok(())
    }

    /// Decodes the thumbnail block (IFD 1), found by following IFD 0's
    /// "next IFD" link.
    pub fn parse_thumbnail_block(&mut self) -> TiffResult<()> {
        if !self.thumbnail.is_not_parsed() {
            return Ok(());
        }
        self.parse_ifd0_block()?;

        let (BlockState::Parsed(_), Some(ifd0_offset)) = (&self.ifd0, self.ifd0_offset) else {
            self.thumbnail = BlockState::Empty;
            return Ok(());
        };

        let reader = self.reader()?;
        let link_offset = next_pointer_offset(&reader, ifd0_offset as usize)?;
        let ifd1_offset: u32 = reader.u32(link_offset).inspect_err(|e| {
            log::error!("IFD 0 didn't give a pointer to the next IFD! err: {e}")
        })?;

        // zero means the chain ends at IFD 0
        let ifd1_offset = (ifd1_offset != 0).then_some(ifd1_offset);

        // the extractor needs these two, whatever the filter says
        let filter = self
            .options
            .filter
            .also_picking([THUMBNAIL_OFFSET, THUMBNAIL_LENGTH]);
        self.thumbnail = self.decode_linked(IfdBlock::Thumbnail, ifd1_offset, &filter)?;
        Ok(())
    }

    /// Decodes the directory a pointer leads to.
    fn decode_linked(
        &mut self,
        block: IfdBlock,
        offset: Option<u32>,
        filter: &TagFilter,
    ) -> TiffResult<BlockState> {
        let Some(offset) = offset else {
            log::trace!("No pointer to the {block} block. Skipping it.");
            return Ok(BlockState::Empty);
        };

        if self.visited.contains(&offset) {
            log::warn!(
                "Pointer to the {block} block leads back to an already-decoded \
                directory at `{offset}`. Ignoring it."
            );
            return Ok(BlockState::Empty);
        }

        log::trace!("Decoding the {block} block at `{offset}`...");
        let reader = self.reader()?;
        let decoded = decode_directory(&reader, offset as usize, filter)
            .inspect_err(|e| log::error!("Failed to decode the {block} block! err: {e}"))?;

        // only a decoded directory counts. a failed one must fail again
        self.visited.insert(offset);
        Ok(BlockState::Parsed(decoded))
    }

    /// Decodes every block the options ask for, then shapes the output.
    pub fn parse(&mut self) -> TiffResult<Output> {
        self.parse_ifd0_block()?;

        if self.options.exif {
            self.parse_exif_block()?;
        }
        if self.options.gps {
            self.parse_gps_block()?;
        }
        if self.options.interop {
            self.parse_interop_block()?;
        }
        if self.options.wants_thumbnail() {
            self.parse_thumbnail_block()?;
        }

        let raw: BTreeMap<IfdBlock, Block> = self.requested_blocks();
        let blocks = if self.options.post_process {
            post_process(&raw, &self.options)
        } else {
            raw
        };

        if self.options.merge_output {
            Ok(Output::Merged(merge(blocks)))
        } else {
            Ok(Output::Grouped(blocks))
        }
    }

    /// Copies out the decoded blocks that the options asked for.
    ///
    /// EXIF can be decoded just to find the Interop pointer, so being decoded
    /// doesn't mean being wanted.
    fn requested_blocks(&self) -> BTreeMap<IfdBlock, Block> {
        IfdBlock::ALL
            .into_iter()
            .filter(|block| match block {
                IfdBlock::Ifd0 => true,
                IfdBlock::Exif => self.options.exif,
                IfdBlock::Gps => self.options.gps,
                IfdBlock::Interop => self.options.interop,
                IfdBlock::Thumbnail => self.options.wants_thumbnail(),
            })
            .filter_map(|block| self.block(block).map(|b| (block, b.clone())))
            .collect()
    }

    /// Grabs the raw bytes of the embedded thumbnail.
    ///
    /// Returns `Ok(None)` when there isn't one, which is common.
    pub fn extract_thumbnail(&mut self) -> TiffResult<Option<Vec<u8>>> {
        self.parse_thumbnail_block()?;

        let Some(block) = self.thumbnail.block() else {
            log::trace!("No thumbnail block, so no thumbnail.");
            return Ok(None);
        };

        let (Some(offset), Some(len)) = (
            pointer(block, THUMBNAIL_OFFSET),
            pointer(block, THUMBNAIL_LENGTH),
        ) else {
            log::warn!("Thumbnail block is missing its offset or length tag.");
            return Ok(None);
        };

        let reader = self.reader()?;
        let bytes = reader
            .bytes(offset as usize, len as usize)
            .inspect_err(|e| log::error!("Thumbnail runs outside the buffer! err: {e}"))?;

        log::trace!("Extracted `{len}`-byte thumbnail from offset `{offset}`.");
        Ok(Some(bytes.to_vec()))
    }
}

/// Reads a pointer-like tag from a decoded block.
fn pointer(block: &Block, tag: u16) -> Option<u32> {
    let value = block.get(&TagKey::Id(tag))?;
    let p = value.as_u32();
    if p.is_none() {
        log::warn!("Tag `{tag:#06x}` should hold an offset, but holds `{value:?}`.");
    }
    p
}

/// Flattens blocks into one, in block order.
pub fn merge(blocks: BTreeMap<IfdBlock, Block>) -> Block {
    let mut merged = Block::default();
    for (_, block) in blocks {
        merged.extend(block);
    }
    merged
}
