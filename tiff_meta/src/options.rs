//! Knobs for a parse session.

use crate::directory::TagFilter;

/// Which blocks to decode, which tags to keep, and what shape the output
/// takes.
///
/// The defaults decode IFD 0, EXIF and GPS into separate groups, strip the
/// pointer tags, and leave values raw.
///
/// ```
/// use tiff_meta::Options;
///
/// let options = Options::default()
///     .interop(true)
///     .merge_output(true)
///     .skip_tags([0x927C]); // maker notes are huge
/// assert!(options.interop);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Options {
    /// Tags to always keep, and tags to drop.
    pub filter: TagFilter,

    /// Decode the EXIF block.
    pub exif: bool,

    /// Decode the GPS block.
    pub gps: bool,

    /// Decode the Interop block.
    pub interop: bool,

    /// Decode the thumbnail block (IFD 1).
    ///
    /// `None` decodes it for grouped output and skips it for merged output,
    /// where its tags would clobber IFD 0's. `Some(_)` forces either way.
    pub thumbnail: Option<bool>,

    /// Flatten all blocks into one mapping instead of grouping them by block.
    pub merge_output: bool,

    /// Remove the pointer tags that link blocks together from the output.
    pub sanitize: bool,

    /// Run post-processing (GPS conversion, plus whatever below is enabled).
    pub post_process: bool,

    /// Rename numeric tag keys to their conventional names.
    pub translate_tags: bool,

    /// Turn raw values into friendlier ones, like dates and named constants.
    pub revive_values: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            filter: TagFilter::default(),
            exif: true,
            gps: true,
            interop: false,
            thumbnail: None,
            merge_output: false,
            sanitize: true,
            post_process: true,
            translate_tags: false,
            revive_values: false,
        }
    }
}

impl Options {
    /// Always keep these tags, even if they're skipped.
    pub fn pick_tags(mut self, tags: impl IntoIterator<Item = u16>) -> Self {
        self.filter.pick.extend(tags);
        self
    }

    /// Drop these tags unless they're picked.
    pub fn skip_tags(mut self, tags: impl IntoIterator<Item = u16>) -> Self {
        self.filter.skip.extend(tags);
        self
    }

    pub fn exif(mut self, enabled: bool) -> Self {
        self.exif = enabled;
        self
    }

    pub fn gps(mut self, enabled: bool) -> Self {
        self.gps = enabled;
        self
    }

    pub fn interop(mut self, enabled: bool) -> Self {
        self.interop = enabled;
        self
    }

    pub fn thumbnail(mut self, enabled: bool) -> Self {
        self.thumbnail = Some(enabled);
        self
    }

    pub fn merge_output(mut self, enabled: bool) -> Self {
        self.merge_output = enabled;
        self
    }

    pub fn sanitize(mut self, enabled: bool) -> Self {
        self.sanitize = enabled;
        self
    }

    pub fn post_process(mut self, enabled: bool) -> Self {
        self.post_process = enabled;
        self
    }

    pub fn translate_tags(mut self, enabled: bool) -> Self {
        self.translate_tags = enabled;
        self
    }

    pub fn revive_values(mut self, enabled: bool) -> Self {
        self.revive_values = enabled;
        self
    }

    /// Whether the thumbnail block should be decoded during a normal parse.
    pub fn wants_thumbnail(&self) -> bool {
        self.thumbnail.unwrap_or(!self.merge_output)
    }
}
