//! Streaming variant extraction.
//!
//! Reads a VCF stream line by line, keeps the alternate alleles that fall
//! inside a panel gene and turns them into [`Variant`]s tagged with that gene.
//! Lines that cannot be parsed are logged, quarantined and skipped; only an
//! I/O failure of the underlying stream ends extraction early.

use std::io::BufRead;

use tracing::{debug, info, warn};

use pgxrs_core::models::Variant;
use pgxrs_overlaprs::GeneRegionIndex;

use crate::error::{ExtractError, MalformedRecord};
use crate::models::{
    Extraction, ExtractionConfig, ExtractionStats, ExtractionStatus, QuarantinedRecord,
};
use crate::vcf::{COLUMN_HEADER_PREFIX, VcfRecord, is_non_variant_alt, sample_id_from_header};

pub struct VariantExtractor<'a> {
    index: &'a GeneRegionIndex,
    config: ExtractionConfig,
}

impl<'a> VariantExtractor<'a> {
    pub fn new(index: &'a GeneRegionIndex, config: ExtractionConfig) -> Self {
        VariantExtractor { index, config }
    }

    pub fn extract<R: BufRead>(&self, mut reader: R) -> Result<Extraction, ExtractError> {
        let mut sample_id = None;
        let mut variants = Vec::new();
        let mut stats = ExtractionStats::default();
        let mut quarantine = Vec::new();
        let mut line_buf: Vec<u8> = Vec::new();
        let mut line_no = 0usize;

        loop {
            line_buf.clear();
            if reader.read_until(b'\n', &mut line_buf)? == 0 {
                break;
            }
            line_no += 1;

            let line = match std::str::from_utf8(&line_buf) {
                Ok(line) => line.trim_end_matches('\n').trim_end_matches('\r'),
                Err(_) => {
                    stats.records += 1;
                    self.quarantine(&mut stats, &mut quarantine, line_no, MalformedRecord::InvalidEncoding);
                    continue;
                }
            };

            if line.trim().is_empty() {
                continue;
            }
            if line.starts_with('#') {
                if line.starts_with(COLUMN_HEADER_PREFIX) {
                    sample_id = sample_id_from_header(line);
                }
                continue;
            }

            stats.records += 1;
            let record = match VcfRecord::parse(line) {
                Ok(record) => record,
                Err(reason) => {
                    self.quarantine(&mut stats, &mut quarantine, line_no, reason);
                    continue;
                }
            };

            if !self.index.is_targeted(record.chrom, record.pos) {
                stats.off_target += 1;
                continue;
            }

            if !self.passes_filters(&record) {
                stats.filtered += 1;
                continue;
            }

            let genes: Vec<_> = self.index.genes_at(record.chrom, record.pos).cloned().collect();
            let before = variants.len();
            let external_id = record.rs_id();
            for (i, alt) in record.alternates.iter().enumerate() {
                if is_non_variant_alt(alt) {
                    continue;
                }
                let Some(zygosity) = record.zygosity(i + 1) else {
                    continue;
                };
                for gene in genes.iter() {
                    variants.push(Variant {
                        chromosome: record.chrom.to_string(),
                        position: record.pos,
                        reference_allele: record.reference.to_ascii_uppercase(),
                        alternate_allele: alt.to_ascii_uppercase(),
                        gene: gene.clone(),
                        external_id: external_id.clone(),
                        quality: record.quality,
                        filter_status: record.filter.clone(),
                        zygosity,
                    });
                }
            }

            if variants.len() == before {
                stats.no_evidence += 1;
            } else {
                debug!(line = line_no, chrom = record.chrom, pos = record.pos, "retained on-target record");
            }
        }

        stats.retained = variants.len();
        let status = if variants.is_empty() {
            info!(records = stats.records, malformed = stats.malformed, "no target-gene variants in stream");
            ExtractionStatus::NoTargetVariants
        } else {
            ExtractionStatus::Matched
        };

        info!(
            records = stats.records,
            retained = stats.retained,
            malformed = stats.malformed,
            off_target = stats.off_target,
            filtered = stats.filtered,
            "variant extraction finished"
        );

        Ok(Extraction {
            sample_id,
            variants,
            status,
            stats,
            quarantine,
        })
    }

    fn passes_filters(&self, record: &VcfRecord<'_>) -> bool {
        if self.config.require_pass && !record.filter.is_pass() {
            return false;
        }
        match (self.config.min_quality, record.quality) {
            (Some(min), Some(q)) => q >= min,
            _ => true,
        }
    }

    fn quarantine(
        &self,
        stats: &mut ExtractionStats,
        quarantine: &mut Vec<QuarantinedRecord>,
        line: usize,
        reason: MalformedRecord,
    ) {
        warn!(line, reason = %reason, "skipping malformed variant record");
        stats.malformed += 1;
        if quarantine.len() < self.config.max_quarantined {
            quarantine.push(QuarantinedRecord { line, reason });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pgxrs_core::models::{GenePanel, GeneSpec, Zygosity};
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};
    use std::io::Cursor;

    const HEADER: &str = "##fileformat=VCFv4.2\n#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tPATIENT_7\n";

    #[fixture]
    fn index() -> GeneRegionIndex {
        let panel = GenePanel::new(vec![
            GeneSpec {
                symbol: "CYP2D6".to_string(),
                chromosome: "chr22".to_string(),
                start: 42126499,
                end: 42130865,
                reference_allele: "*1".to_string(),
            },
            GeneSpec {
                symbol: "TPMT".to_string(),
                chromosome: "chr6".to_string(),
                start: 18128311,
                end: 18155169,
                reference_allele: "*1".to_string(),
            },
        ])
        .unwrap();
        GeneRegionIndex::from_panel(&panel)
    }

    fn run(index: &GeneRegionIndex, body: &str, config: ExtractionConfig) -> Extraction {
        let input = format!("{HEADER}{body}");
        VariantExtractor::new(index, config)
            .extract(Cursor::new(input.into_bytes()))
            .unwrap()
    }

    #[rstest]
    fn test_keeps_only_on_target_records(index: GeneRegionIndex) {
        let body = "chr22\t42128945\trs3892097\tC\tT\t50\tPASS\t.\tGT\t0/1\n\
                    chr1\t1000\trs1\tA\tG\t50\tPASS\t.\tGT\t0/1\n\
                    6\t18130687\trs1142345\tT\tC\t50\tPASS\t.\tGT\t1/1\n";
        let extraction = run(&index, body, ExtractionConfig::default());

        assert_eq!(extraction.status, ExtractionStatus::Matched);
        assert_eq!(extraction.sample_id.as_deref(), Some("PATIENT_7"));
        let genes: Vec<&str> = extraction.variants.iter().map(|v| v.gene.symbol()).collect();
        assert_eq!(genes, vec!["CYP2D6", "TPMT"]);
        assert_eq!(extraction.variants[0].zygosity, Zygosity::Heterozygous);
        assert_eq!(extraction.variants[1].zygosity, Zygosity::Homozygous);
        assert_eq!(extraction.stats.off_target, 1);
        assert_eq!(extraction.stats.retained, 2);
    }

    #[rstest]
    fn test_empty_stream_reports_no_target_variants(index: GeneRegionIndex) {
        let extraction = run(&index, "", ExtractionConfig::default());
        assert_eq!(extraction.status, ExtractionStatus::NoTargetVariants);
        assert!(extraction.variants.is_empty());
        assert!(extraction.quarantine.is_empty());
    }

    #[rstest]
    fn test_malformed_record_among_valid_ones(index: GeneRegionIndex) {
        let mut body = String::new();
        for i in 0..50u32 {
            body.push_str(&format!("chr6\t{}\t.\tA\tG\t.\tPASS\t.\n", 18130000 + i));
            if i == 25 {
                body.push_str("chr6\tnot_a_position\t.\tA\tG\t.\tPASS\t.\n");
            }
        }
        let extraction = run(&index, &body, ExtractionConfig::default());

        assert_eq!(extraction.variants.len(), 50);
        assert_eq!(extraction.stats.malformed, 1);
        assert_eq!(extraction.stats.records, 51);
        assert_eq!(extraction.quarantine.len(), 1);
        assert_eq!(
            extraction.quarantine[0].reason,
            MalformedRecord::InvalidPosition("not_a_position".to_string())
        );
        // header lines count towards line numbers
        assert_eq!(extraction.quarantine[0].line, 2 + 27);
    }

    #[rstest]
    fn test_quarantine_is_bounded(index: GeneRegionIndex) {
        let body = "garbage\n".repeat(5);
        let config = ExtractionConfig {
            max_quarantined: 2,
            ..ExtractionConfig::default()
        };
        let extraction = run(&index, &body, config);
        assert_eq!(extraction.stats.malformed, 5);
        assert_eq!(extraction.quarantine.len(), 2);
        assert_eq!(extraction.status, ExtractionStatus::NoTargetVariants);
    }

    #[rstest]
    fn test_invalid_utf8_is_quarantined(index: GeneRegionIndex) {
        let mut input = HEADER.as_bytes().to_vec();
        input.extend_from_slice(b"chr6\t18130687\t.\tT\t\xff\t.\tPASS\t.\n");
        input.extend_from_slice(b"chr6\t18130687\t.\tT\tC\t.\tPASS\t.\n");
        let extraction = VariantExtractor::new(&index, ExtractionConfig::default())
            .extract(Cursor::new(input))
            .unwrap();
        assert_eq!(extraction.stats.malformed, 1);
        assert_eq!(extraction.quarantine[0].reason, MalformedRecord::InvalidEncoding);
        assert_eq!(extraction.variants.len(), 1);
    }

    #[rstest]
    fn test_hom_ref_and_symbolic_alleles_are_not_variants(index: GeneRegionIndex) {
        let body = "chr6\t18130687\trs1142345\tT\tC\t.\tPASS\t.\tGT\t0/0\n\
                    chr6\t18130690\t.\tT\t<DEL>\t.\tPASS\t.\tGT\t0/1\n\
                    chr6\t18130691\t.\tT\t.\t.\tPASS\t.\tGT\t0/0\n";
        let extraction = run(&index, body, ExtractionConfig::default());
        assert!(extraction.variants.is_empty());
        assert_eq!(extraction.stats.no_evidence, 3);
        assert_eq!(extraction.status, ExtractionStatus::NoTargetVariants);
    }

    #[rstest]
    fn test_breakend_records_are_skipped_not_quarantined(index: GeneRegionIndex) {
        let body = "chr6\t18130690\tbnd_1\tG\tG]17:198982]\t.\tPASS\tSVTYPE=BND\tGT\t0/1\n\
                    chr6\t18130692\tbnd_2\tT\t]13:123456]T\t.\tPASS\tSVTYPE=BND\tGT\t0/1\n\
                    chr6\t18130687\trs1142345\tT\tC\t.\tPASS\t.\tGT\t0/1\n";
        let extraction = run(&index, body, ExtractionConfig::default());
        assert_eq!(extraction.stats.malformed, 0);
        assert!(extraction.quarantine.is_empty());
        assert_eq!(extraction.stats.no_evidence, 2);
        assert_eq!(extraction.variants.len(), 1);
    }

    #[rstest]
    fn test_multi_allelic_records_yield_one_variant_per_carried_alt(index: GeneRegionIndex) {
        let body = "chr6\t18130687\t.\tT\tC,G\t.\tPASS\t.\tGT\t1/2\n";
        let extraction = run(&index, body, ExtractionConfig::default());
        let alts: Vec<&str> = extraction.variants.iter().map(|v| v.alternate_allele.as_str()).collect();
        assert_eq!(alts, vec!["C", "G"]);
    }

    #[rstest]
    fn test_filters(index: GeneRegionIndex) {
        let body = "chr6\t18130687\t.\tT\tC\t5\tLowQual\t.\n\
                    chr6\t18130688\t.\tT\tC\t50\tPASS\t.\n\
                    chr6\t18130689\t.\tT\tC\t.\tPASS\t.\n";
        let config = ExtractionConfig {
            require_pass: true,
            min_quality: Some(20.0),
            ..ExtractionConfig::default()
        };
        let extraction = run(&index, body, config);
        let positions: Vec<u32> = extraction.variants.iter().map(|v| v.position).collect();
        assert_eq!(positions, vec![18130688, 18130689]);
        assert_eq!(extraction.stats.filtered, 1);
    }
}
