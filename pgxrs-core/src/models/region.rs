use std::fmt::{self, Display};

use crate::utils::normalize_chrom;

///
/// Region struct, one contiguous stretch of a chromosome.
///
/// Coordinates are stored 0-based and half-open like a BED record; catalogs and
/// VCF files speak 1-based inclusive coordinates, see [`Region::from_one_based`].
///
#[derive(Eq, PartialEq, Hash, Debug, Clone)]
pub struct Region {
    pub chr: String,
    pub start: u32,
    pub end: u32,
}

impl Region {
    ///
    /// Build a region from 1-based inclusive coordinates (`chr22:42126499-42130865`).
    /// Returns `None` when `start` is zero or the range is inverted.
    ///
    pub fn from_one_based(chr: &str, start: u32, end: u32) -> Option<Self> {
        if start == 0 || end < start {
            return None;
        }
        Some(Region {
            chr: chr.to_string(),
            start: start - 1,
            end,
        })
    }

    ///
    /// Get width of the region
    ///
    pub fn width(&self) -> u32 {
        self.end - self.start
    }

    ///
    /// Chromosome name without a `chr` prefix.
    ///
    pub fn chrom_key(&self) -> &str {
        normalize_chrom(&self.chr)
    }
}

impl Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}-{}", self.chr, self.start + 1, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    fn test_from_one_based_converts_to_half_open() {
        let region = Region::from_one_based("chr22", 100, 200).unwrap();
        assert_eq!(region.start, 99);
        assert_eq!(region.end, 200);
        assert_eq!(region.width(), 101);
        assert_eq!(region.to_string(), "chr22:100-200");
    }

    #[rstest]
    #[case(0, 10)]
    #[case(20, 10)]
    fn test_from_one_based_rejects_bad_ranges(#[case] start: u32, #[case] end: u32) {
        assert!(Region::from_one_based("chr1", start, end).is_none());
    }
}
