use std::fmt::{self, Display};
use std::sync::Arc;

use serde::{Serialize, Serializer};

use crate::errors::PanelError;
use crate::models::Region;

/// One gene of the analysed panel.
///
/// A `GeneTarget` can only be obtained from a [`GenePanel`], so every gene
/// flowing through the pipeline is known to be part of the panel.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GeneTarget(Arc<str>);

impl GeneTarget {
    pub fn symbol(&self) -> &str {
        &self.0
    }
}

impl Display for GeneTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for GeneTarget {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

#[cfg(feature = "schema")]
impl schemars::JsonSchema for GeneTarget {
    fn schema_name() -> String {
        "GeneTarget".to_string()
    }

    fn json_schema(generator: &mut schemars::r#gen::SchemaGenerator) -> schemars::schema::Schema {
        String::json_schema(generator)
    }
}

/// Panel entry: the gene, where it lives and the name of its reference allele.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneDefinition {
    pub target: GeneTarget,
    pub region: Region,
    pub reference_allele: String,
}

/// Raw panel row before validation, as read from a catalog.
#[derive(Clone, Debug)]
pub struct GeneSpec {
    pub symbol: String,
    pub chromosome: String,
    /// 1-based inclusive
    pub start: u32,
    /// 1-based inclusive
    pub end: u32,
    pub reference_allele: String,
}

///
/// The closed, ordered set of genes every downstream structure is keyed by.
///
/// Panel order is the order of the catalog and is the order genes appear in
/// every report.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenePanel {
    genes: Vec<GeneDefinition>,
}

impl GenePanel {
    pub fn new(specs: Vec<GeneSpec>) -> Result<Self, PanelError> {
        if specs.is_empty() {
            return Err(PanelError::EmptyPanel);
        }

        let mut genes: Vec<GeneDefinition> = Vec::with_capacity(specs.len());
        for spec in specs {
            let symbol = spec.symbol.trim().to_ascii_uppercase();
            if symbol.is_empty() {
                return Err(PanelError::InvalidRegion {
                    gene: spec.symbol,
                    reason: "empty gene symbol".to_string(),
                });
            }
            if genes.iter().any(|g| g.target.symbol() == symbol) {
                return Err(PanelError::DuplicateGene(symbol));
            }
            let region = Region::from_one_based(&spec.chromosome, spec.start, spec.end).ok_or_else(
                || PanelError::InvalidRegion {
                    gene: symbol.clone(),
                    reason: format!(
                        "{}:{}-{} is not a valid 1-based inclusive range",
                        spec.chromosome, spec.start, spec.end
                    ),
                },
            )?;

            genes.push(GeneDefinition {
                target: GeneTarget(Arc::from(symbol.as_str())),
                region,
                reference_allele: spec.reference_allele,
            });
        }

        Ok(GenePanel { genes })
    }

    /// Look a gene up by symbol, case-insensitively.
    pub fn get(&self, symbol: &str) -> Option<&GeneTarget> {
        self.definition(symbol).map(|d| &d.target)
    }

    pub fn definition(&self, symbol: &str) -> Option<&GeneDefinition> {
        let symbol = symbol.trim();
        self.genes
            .iter()
            .find(|d| d.target.symbol().eq_ignore_ascii_case(symbol))
    }

    pub fn reference_allele(&self, gene: &GeneTarget) -> Option<&str> {
        self.genes
            .iter()
            .find(|d| &d.target == gene)
            .map(|d| d.reference_allele.as_str())
    }

    pub fn targets(&self) -> impl Iterator<Item = &GeneTarget> {
        self.genes.iter().map(|d| &d.target)
    }

    pub fn definitions(&self) -> &[GeneDefinition] {
        &self.genes
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }
}
