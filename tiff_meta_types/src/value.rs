//! Decoded tag values and the blocks that hold them.

use rustc_hash::FxHashMap;

/// A decoded directory: its tags mapped to their values.
pub type Block = FxHashMap<TagKey, TagValue>;

/// The key a value is stored under in a [`Block`].
///
/// Freshly decoded blocks only use numeric IDs. Names show up after tag
/// translation, or for values that post-processing computes itself (like
/// `latitude`).
#[derive(Clone, Copy, Debug, Hash, PartialEq, PartialOrd, Eq, Ord)]
pub enum TagKey {
    Id(u16),
    Name(&'static str),
}

impl From<u16> for TagKey {
    fn from(value: u16) -> Self {
        TagKey::Id(value)
    }
}

impl core::fmt::Display for TagKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            TagKey::Id(id) => write!(f, "{id:#06x}"),
            TagKey::Name(name) => f.write_str(name),
        }
    }
}

/// One number read out of a directory entry.
///
/// Rationals don't get their own variant. They're reduced to their ratio and
/// stored as a `Double`.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub enum Scalar {
    Byte(u8),
    SByte(i8),
    Short(u16),
    SShort(i16),
    Long(u32),
    SLong(i32),
    Float(f32),
    Double(f64),
}

impl Scalar {
    /// Widens the scalar to a float.
    pub fn as_f64(&self) -> f64 {
        match *self {
            Scalar::Byte(v) => v.into(),
            Scalar::SByte(v) => v.into(),
            Scalar::Short(v) => v.into(),
            Scalar::SShort(v) => v.into(),
            Scalar::Long(v) => v.into(),
            Scalar::SLong(v) => v.into(),
            Scalar::Float(v) => v.into(),
            Scalar::Double(v) => v,
        }
    }

    /// Grabs the scalar as an unsigned integer, if it is one (or is a
    /// non-negative signed one).
    ///
    /// ```
    /// use tiff_meta_types::value::Scalar;
    ///
    /// assert_eq!(Scalar::Short(640).as_u32(), Some(640));
    /// assert_eq!(Scalar::SLong(-1).as_u32(), None);
    /// assert_eq!(Scalar::Double(1.5).as_u32(), None);
    /// ```
    pub fn as_u32(&self) -> Option<u32> {
        match *self {
            Scalar::Byte(v) => Some(v.into()),
            Scalar::Short(v) => Some(v.into()),
            Scalar::Long(v) => Some(v),
            Scalar::SByte(v) => u32::try_from(v).ok(),
            Scalar::SShort(v) => u32::try_from(v).ok(),
            Scalar::SLong(v) => u32::try_from(v).ok(),
            Scalar::Float(_) | Scalar::Double(_) => None,
        }
    }
}

/// The value stored under one tag.
#[derive(Clone, Debug, PartialEq, PartialOrd)]
pub enum TagValue {
    /// An entry with a count of one.
    Scalar(Scalar),

    /// An entry with any other count, in storage order.
    List(Vec<Scalar>),

    /// Text, with its trailing NUL padding removed.
    Ascii(String),

    /// Opaque bytes, left exactly as stored.
    Undefined(Vec<u8>),

    /// An enumerated value, replaced by its name.
    Named(&'static str),

    /// A revived `YYYY:MM:DD HH:MM:SS` timestamp.
    DateTime(DateTime),

    /// A revived `YYYY:MM:DD` date.
    Date(Date),

    /// A value computed during post-processing, like decimal degrees.
    Decimal(f64),

    /// Bytes that were revived into text, like an Exif version.
    Text(String),
}

impl TagValue {
    /// Grabs the value as an unsigned integer.
    ///
    /// Works for single scalars and one-element lists, which is how pointer
    /// and offset tags usually look.
    pub fn as_u32(&self) -> Option<u32> {
        match self {
            TagValue::Scalar(s) => s.as_u32(),
            TagValue::List(list) if list.len() == 1 => list[0].as_u32(),
            _ => None,
        }
    }

    /// Grabs every number in the value as a float.
    pub fn as_f64_list(&self) -> Option<Vec<f64>> {
        match self {
            TagValue::Scalar(s) => Some(vec![s.as_f64()]),
            TagValue::List(list) => Some(list.iter().map(Scalar::as_f64).collect()),
            TagValue::Decimal(d) => Some(vec![*d]),
            _ => None,
        }
    }

    /// Grabs the value as text, if it's textual.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            TagValue::Ascii(s) | TagValue::Text(s) => Some(s.as_str()),
            TagValue::Named(s) => Some(s),
            _ => None,
        }
    }
}

/// A calendar date.
#[derive(Clone, Copy, Debug, Hash, PartialEq, PartialOrd, Eq, Ord)]
pub struct Date {
    pub year: u16,
    pub month: u8,
    pub day: u8,
}

/// A date with a time of day.
///
/// TIFF timestamps carry no zone, so neither does this.
#[derive(Clone, Copy, Debug, Hash, PartialEq, PartialOrd, Eq, Ord)]
pub struct DateTime {
    pub date: Date,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl core::fmt::Display for Date {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

impl core::fmt::Display for DateTime {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{}T{:02}:{:02}:{:02}",
            self.date, self.hour, self.minute, self.second
        )
    }
}
