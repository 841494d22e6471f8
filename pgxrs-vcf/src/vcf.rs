//! VCF record parsing.
//!
//! Only the columns the extractor needs are interpreted: CHROM, POS, ID, REF,
//! ALT, QUAL, FILTER, INFO and, when present, FORMAT plus the first sample
//! column. Everything is borrowed from the line buffer; a record is only turned
//! into owned [`Variant`](pgxrs_core::models::Variant)s once it is known to hit
//! a panel gene.

use pgxrs_core::models::{FilterStatus, Zygosity};

use crate::error::MalformedRecord;

/// Fixed VCF columns, FORMAT and samples are optional.
pub const MIN_FIELDS: usize = 8;

/// Header line carrying the column names and sample ids.
pub const COLUMN_HEADER_PREFIX: &str = "#CHROM";

/// A borrowed view over one data line of a VCF file.
#[derive(Debug, Clone, PartialEq)]
pub struct VcfRecord<'a> {
    pub chrom: &'a str,
    /// 1-based
    pub pos: u32,
    pub id: Option<&'a str>,
    pub reference: &'a str,
    pub alternates: Vec<&'a str>,
    pub quality: Option<f64>,
    pub filter: FilterStatus,
    pub info: &'a str,
    pub format: Option<&'a str>,
    pub sample: Option<&'a str>,
}

impl<'a> VcfRecord<'a> {
    pub fn parse(line: &'a str) -> Result<Self, MalformedRecord> {
        let fields: Vec<&str> = line.splitn(11, '\t').collect();
        if fields.len() < MIN_FIELDS {
            return Err(MalformedRecord::FieldCount(fields.len()));
        }

        let chrom = fields[0].trim();
        if chrom.is_empty() {
            return Err(MalformedRecord::MissingChromosome);
        }

        let pos = match fields[1].trim().parse::<u32>() {
            Ok(pos) if pos > 0 => pos,
            _ => return Err(MalformedRecord::InvalidPosition(fields[1].to_string())),
        };

        let id = match fields[2].trim() {
            "." | "" => None,
            id => Some(id),
        };

        let reference = fields[3].trim();
        if !is_base_string(reference) {
            return Err(MalformedRecord::InvalidReference(reference.to_string()));
        }

        let alternates: Vec<&str> = fields[4].trim().split(',').collect();
        for alt in alternates.iter() {
            if !(is_base_string(alt) || is_non_variant_alt(alt)) {
                return Err(MalformedRecord::InvalidAlternate(alt.to_string()));
            }
        }

        let quality = match fields[5].trim() {
            "." => None,
            raw => match raw.parse::<f64>() {
                Ok(q) if q.is_finite() => Some(q),
                _ => return Err(MalformedRecord::InvalidQuality(raw.to_string())),
            },
        };

        let filter = FilterStatus::parse(fields[6]);
        let info = fields[7].trim();
        let format = fields.get(8).map(|f| f.trim()).filter(|f| !f.is_empty());
        // splitn(11) leaves any further samples in fields[10], we only read the first
        let sample = fields.get(9).map(|s| s.trim()).filter(|s| !s.is_empty());

        Ok(VcfRecord {
            chrom,
            pos,
            id,
            reference,
            alternates,
            quality,
            filter,
            info,
            format,
            sample,
        })
    }

    /// dbSNP id of the record: the ID column, else an `RS=` INFO entry.
    pub fn rs_id(&self) -> Option<String> {
        let from_id = self.id.and_then(|ids| {
            ids.split(';')
                .map(str::trim)
                .find(|id| has_rs_prefix(id))
        });
        let raw = from_id.or_else(|| info_value(self.info, "RS"))?;
        Some(normalize_rs_id(raw))
    }

    /// Copy number of ALT number `alt_index` (1-based, as in GT) in the first sample.
    ///
    /// `None` means the sample does not carry this ALT at all (hom-ref or no-call)
    /// and the record is not evidence for it.
    pub fn zygosity(&self, alt_index: usize) -> Option<Zygosity> {
        let Some(calls) = self.genotype() else {
            return Some(Zygosity::Unknown);
        };
        let copies = calls.iter().filter(|c| **c == Some(alt_index)).count();
        if copies == 0 {
            None
        } else if copies == calls.len() {
            Some(Zygosity::Homozygous)
        } else {
            Some(Zygosity::Heterozygous)
        }
    }

    /// Allele indices of the first sample's GT, `None` entries for `.` calls.
    /// Returns `None` when there is no usable GT.
    fn genotype(&self) -> Option<Vec<Option<usize>>> {
        let format = self.format?;
        let sample = self.sample?;
        let gt_index = format.split(':').position(|key| key == "GT")?;
        let gt = sample.split(':').nth(gt_index)?;
        let mut calls = Vec::with_capacity(2);
        for allele in gt.split(['/', '|']) {
            match allele {
                "." => calls.push(None),
                idx => calls.push(Some(idx.parse::<usize>().ok()?)),
            }
        }
        if calls.is_empty() { None } else { Some(calls) }
    }
}

/// `RS=...` style lookup in a `;` separated INFO column.
pub fn info_value<'a>(info: &'a str, key: &str) -> Option<&'a str> {
    info.split(';').find_map(|entry| {
        let (k, v) = entry.split_once('=')?;
        (k.trim() == key).then_some(v.trim()).filter(|v| !v.is_empty())
    })
}

/// `RS3892097`, `3892097` and `rs3892097` all become `rs3892097`.
pub fn normalize_rs_id(raw: &str) -> String {
    let raw = raw.trim();
    let digits = if has_rs_prefix(raw) {
        &raw[2..]
    } else {
        raw
    };
    format!("rs{}", digits.to_ascii_lowercase())
}

fn has_rs_prefix(id: &str) -> bool {
    id.len() > 2 && id.get(..2).is_some_and(|p| p.eq_ignore_ascii_case("rs"))
}

/// ALT values that are legal VCF but do not describe a sequence change we can match:
/// missing, spanning deletion, symbolic (`<DEL>`) and breakend (`G]17:198982]`, `.A`).
pub fn is_non_variant_alt(alt: &str) -> bool {
    if alt == "." || alt == "*" {
        return true;
    }
    if alt.starts_with('<') && alt.ends_with('>') && alt.len() > 2 {
        return true;
    }
    if alt.contains('[') || alt.contains(']') {
        return true;
    }
    // single breakend
    alt.len() > 1 && (alt.starts_with('.') || alt.ends_with('.'))
}

fn is_base_string(s: &str) -> bool {
    !s.is_empty()
        && s.bytes()
            .all(|b| matches!(b.to_ascii_uppercase(), b'A' | b'C' | b'G' | b'T' | b'N'))
}

/// Sample id from the `#CHROM` header line, if the file has any sample column.
pub fn sample_id_from_header(line: &str) -> Option<String> {
    line.split('\t')
        .nth(9)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
