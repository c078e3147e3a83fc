//! Wire-level vocabulary of the MAT-file level 5 container format.
//!
//! This module collects the numeric constants the encoder emits: the data type
//! codes that tag every element, the array class codes carried in the
//! array-flags sub-element, the packed flag bits, and the fixed sizes of the
//! file header and element framing.
//!
//! # Key Components
//!
//! - [`MatType`] - data type codes for element tags and sub-element headers
//! - [`MatClass`] - array class codes (cell, char, sparse, ...)
//! - [`ArrayFlags`] - flag bits packed into the high half of the flags word
//! - Layout constants: [`HEADER_LEN`], [`TEXT_LEN`], [`VERSION`],
//!   [`ENDIAN_MARKER`], [`ALIGNMENT`], [`TAG_LEN`], [`MAX_DIM_BITS`]
//!
//! # Reference
//! * [MAT-File Format, Level 5](https://www.mathworks.com/help/pdf_doc/matlab/matfile_format.pdf)

use bitflags::bitflags;
use strum::{Display, FromRepr};

/// Total size of the fixed file header, in bytes.
///
/// 124 bytes of descriptive text plus the 2-byte version marker and the 2-byte
/// endianness marker. The writer asserts this total immediately after emitting
/// the header.
pub const HEADER_LEN: usize = 128;

/// Size of the space-padded descriptive text region at the start of the header.
pub const TEXT_LEN: usize = 124;

/// Version marker written at header offset 124.
pub const VERSION: u16 = 0x0100;

/// Endianness marker written at header offset 126.
///
/// The characters `'M','I'` read back as this 16-bit value on a platform of the
/// producing byte order; conforming readers use it to detect the file's
/// endianness.
pub const ENDIAN_MARKER: u16 = 0x4D49;

/// Every element's data region must end on a multiple of this many bytes.
pub const ALIGNMENT: u64 = 8;

/// Size of a regular element tag: 4-byte type code plus 4-byte size field.
pub const TAG_LEN: u32 = 8;

/// Widest dimension-index space the format can address, in bits.
///
/// Sparse array dimensions are stored as signed 32-bit integers; an index space
/// wider than 31 bits would overflow the sign.
pub const MAX_DIM_BITS: u32 = 31;

/// Mask applied to every stored row index, keeping its low 31 bits.
///
/// An index at or above 2^31 aliases into the `[0, 2^31)` range instead of
/// erroring; this matches the behavior existing consumers of these files
/// depend on.
pub const DIM_INDEX_MASK: u32 = 0x7FFF_FFFF;

/// Data type codes used in element tags and sub-element headers.
///
/// Each variant's discriminant is the on-disk `mi`-prefixed type code from the
/// container format. Only a subset is emitted by this crate ([`MatType::Int8`]
/// for names, [`MatType::Uint16`] for label characters, [`MatType::Int32`] for
/// dimensions and sparse indices, [`MatType::Uint32`] for flag words,
/// [`MatType::Double`] for values, and [`MatType::Matrix`] for array elements),
/// but the full numeric range is defined so readers of the written bytes can
/// round-trip any code they encounter.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Display, FromRepr)]
#[repr(u32)]
pub enum MatType {
    /// 8-bit signed integer (`miINT8`); also tags array names.
    Int8 = 1,
    /// 8-bit unsigned integer (`miUINT8`).
    Uint8 = 2,
    /// 16-bit signed integer (`miINT16`).
    Int16 = 3,
    /// 16-bit unsigned integer (`miUINT16`); tags label character data.
    Uint16 = 4,
    /// 32-bit signed integer (`miINT32`); tags dimensions and sparse indices.
    Int32 = 5,
    /// 32-bit unsigned integer (`miUINT32`); tags the array-flags word.
    Uint32 = 6,
    /// 32-bit IEEE 754 float (`miSINGLE`).
    Single = 7,
    /// 64-bit IEEE 754 float (`miDOUBLE`); tags the sparse value data.
    Double = 9,
    /// A nested array element (`miMATRIX`); tags every array in the container.
    Matrix = 14,
}

impl MatType {
    /// The on-disk type code of this variant.
    #[must_use]
    pub fn code(self) -> u32 {
        self as u32
    }
}

/// Array class codes carried in the low half of the array-flags word.
///
/// Each variant's discriminant is the on-disk `mx`-prefixed class code. The
/// writer emits [`MatClass::Cell`] for the top-level container,
/// [`MatClass::Char`] for label elements, and [`MatClass::Sparse`] for vector
/// data elements.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Display, FromRepr)]
#[repr(u32)]
pub enum MatClass {
    /// Cell array (`mxCELL_CLASS`); the top-level 2 x n container.
    Cell = 1,
    /// Structure array (`mxSTRUCT_CLASS`).
    Struct = 2,
    /// Object array (`mxOBJECT_CLASS`).
    Object = 3,
    /// Character array (`mxCHAR_CLASS`); holds vector labels.
    Char = 4,
    /// Sparse array (`mxSPARSE_CLASS`); holds vector entries.
    Sparse = 5,
    /// Dense double array (`mxDOUBLE_CLASS`).
    Double = 6,
}

impl MatClass {
    /// The on-disk class code of this variant.
    #[must_use]
    pub fn code(self) -> u32 {
        self as u32
    }
}

bitflags! {
    /// Flag bits packed into the high half of the array-flags word.
    ///
    /// The writer currently emits no flags (every array is real, non-global,
    /// non-logical), but the bits are defined so the packing in
    /// the flags word is explicit rather than a bare zero.
    #[derive(Clone, Copy, PartialEq, Eq, Debug)]
    pub struct ArrayFlags: u8 {
        /// The array holds logical (boolean) data.
        const LOGICAL = 0x02;
        /// The array lives in the global workspace.
        const GLOBAL = 0x04;
        /// The array has an imaginary part.
        const COMPLEX = 0x08;
    }
}

impl ArrayFlags {
    /// Packs these flags with an array class into the 32-bit flags word.
    ///
    /// The flag bits occupy the high half of the word and the class code the
    /// low half, matching the layout conforming readers expect.
    #[must_use]
    pub fn pack(self, class: MatClass) -> u32 {
        u32::from(self.bits()) << 16 | class.code()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_codes_match_format() {
        assert_eq!(MatType::Int8.code(), 1);
        assert_eq!(MatType::Uint16.code(), 4);
        assert_eq!(MatType::Int32.code(), 5);
        assert_eq!(MatType::Uint32.code(), 6);
        assert_eq!(MatType::Double.code(), 9);
        assert_eq!(MatType::Matrix.code(), 14);
    }

    #[test]
    fn class_codes_match_format() {
        assert_eq!(MatClass::Cell.code(), 1);
        assert_eq!(MatClass::Char.code(), 4);
        assert_eq!(MatClass::Sparse.code(), 5);
    }

    #[test]
    fn codes_round_trip() {
        assert_eq!(MatType::from_repr(14), Some(MatType::Matrix));
        assert_eq!(MatType::from_repr(9), Some(MatType::Double));
        assert_eq!(MatType::from_repr(0), None);
        assert_eq!(MatClass::from_repr(5), Some(MatClass::Sparse));
        assert_eq!(MatClass::from_repr(99), None);
    }

    #[test]
    fn flags_pack_into_high_half() {
        assert_eq!(ArrayFlags::empty().pack(MatClass::Cell), 1);
        assert_eq!(ArrayFlags::empty().pack(MatClass::Sparse), 5);
        assert_eq!(
            ArrayFlags::COMPLEX.pack(MatClass::Double),
            0x08 << 16 | 6
        );
        assert_eq!(
            (ArrayFlags::GLOBAL | ArrayFlags::LOGICAL).pack(MatClass::Char),
            0x06 << 16 | 4
        );
    }

    #[test]
    fn display_names() {
        assert_eq!(MatType::Matrix.to_string(), "Matrix");
        assert_eq!(MatClass::Sparse.to_string(), "Sparse");
    }
}
