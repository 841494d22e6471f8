//! Panel-wide index from chromosome coordinates to [`GeneTarget`]s.
//!
//! ```
//! use pgxrs_core::models::{GenePanel, GeneSpec};
//! use pgxrs_overlaprs::gene_index::GeneRegionIndex;
//!
//! let panel = GenePanel::new(vec![GeneSpec {
//!     symbol: "TPMT".to_string(),
//!     chromosome: "chr6".to_string(),
//!     start: 18128311,
//!     end: 18155169,
//!     reference_allele: "*1".to_string(),
//! }])
//! .unwrap();
//! let index = GeneRegionIndex::from_panel(&panel);
//!
//! let hits: Vec<&str> = index.genes_at("6", 18130687).map(|g| g.symbol()).collect();
//! assert_eq!(hits, vec!["TPMT"]);
//! ```

use std::collections::HashMap;

use pgxrs_core::models::{GenePanel, GeneTarget, Interval};
use pgxrs_core::utils::normalize_chrom;
use tracing::debug;

use crate::{Bits, Overlapper};

/// One [`Bits`] per chromosome, keyed by the chromosome name without `chr`.
pub struct GeneRegionIndex {
    index_maps: HashMap<String, Bits<u32, GeneTarget>>,
}

impl GeneRegionIndex {
    pub fn from_panel(panel: &GenePanel) -> Self {
        let mut intervals: HashMap<String, Vec<Interval<u32, GeneTarget>>> = HashMap::default();

        // STEP 1: organize gene regions into vectors, one for each chrom
        for definition in panel.definitions() {
            let interval = Interval {
                start: definition.region.start,
                end: definition.region.end,
                val: definition.target.clone(),
            };
            intervals
                .entry(definition.region.chrom_key().to_string())
                .or_default()
                .push(interval);
        }

        // STEP 2: build the overlapper for each chrom
        let index_maps: HashMap<String, Bits<u32, GeneTarget>> = intervals
            .into_iter()
            .map(|(chr, chr_intervals)| (chr, Bits::build(chr_intervals)))
            .collect();

        debug!(chromosomes = index_maps.len(), genes = panel.len(), "built gene region index");

        GeneRegionIndex { index_maps }
    }

    /// Genes whose region contains the 1-based position `pos` on `chrom`.
    ///
    /// Usually zero or one gene; overlapping gene regions yield every gene hit.
    pub fn genes_at<'a>(&'a self, chrom: &str, pos: u32) -> Box<dyn Iterator<Item = &'a GeneTarget> + 'a> {
        let Some(zero_based) = pos.checked_sub(1) else {
            return Box::new(std::iter::empty());
        };
        match self.index_maps.get(normalize_chrom(chrom)) {
            Some(lapper) => Box::new(
                lapper
                    .find_iter(zero_based, zero_based + 1)
                    .map(|iv| &iv.val),
            ),
            None => Box::new(std::iter::empty()),
        }
    }

    pub fn is_targeted(&self, chrom: &str, pos: u32) -> bool {
        self.genes_at(chrom, pos).next().is_some()
    }
}
