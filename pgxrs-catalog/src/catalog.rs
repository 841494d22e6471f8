use std::path::Path;

use fxhash::{FxHashMap, FxHashSet};
use tracing::{info, warn};

use pgxrs_core::models::allele::split_diplotype;
use pgxrs_core::models::{
    EvidenceTier, GenePanel, GeneSpec, GeneTarget, PhenotypeLabel, RiskTier, Strength, Variant,
};

use crate::config::{CatalogConfig, SignatureElement};
use crate::error::{CatalogError, CatalogResult};

/// Words that make a recommendation an actionable directive.
pub const DIRECTIVE_KEYWORDS: &[&str] = &["avoid", "switch", "alternative", "contraindicated"];

/// Words that make a recommendation dosing guidance.
pub const DOSING_KEYWORDS: &[&str] = &["dose", "dosing", "dosage", "titrate"];

pub fn has_directive(text: &str) -> bool {
    contains_any(text, DIRECTIVE_KEYWORDS)
}

pub fn has_dosing_guidance(text: &str) -> bool {
    contains_any(text, DOSING_KEYWORDS)
}

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    let lowered = text.to_ascii_lowercase();
    keywords.iter().any(|k| lowered.contains(k))
}

impl SignatureElement {
    /// A variant satisfies the element by dbSNP id, or by position and alternate allele.
    pub fn matches(&self, variant: &Variant) -> bool {
        if let Some(rsid) = self.rsid.as_deref() {
            if variant.has_external_id(rsid) {
                return true;
            }
        }
        match (self.position, self.alt.as_deref()) {
            (Some(position), Some(alt)) => variant.is_at(position, alt),
            _ => false,
        }
    }
}

/// A named allele and the variants that define it.
#[derive(Debug, Clone, PartialEq)]
pub struct AlleleDefinition {
    pub name: String,
    pub function: Option<String>,
    pub signature: Vec<SignatureElement>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhenotypeRow {
    pub label: PhenotypeLabel,
    pub activity_score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Drug {
    pub name: String,
    /// Panel genes this drug is evaluated against, in catalog order
    pub genes: Vec<GeneTarget>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RiskRow {
    pub risk_tier: RiskTier,
    pub evidence_tier: EvidenceTier,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    pub text: String,
    pub strength: Strength,
    pub guideline_reference: String,
    pub alternatives: Vec<String>,
}

type PhenotypeKey = (GeneTarget, String, String);
type RiskKey = (String, GeneTarget, PhenotypeLabel);
type TemplateKey = (String, GeneTarget, RiskTier, Option<PhenotypeLabel>);

///
/// Versioned, read-only reference data for one analysis configuration.
///
/// A `Catalog` is only ever built through [`Catalog::from_config`], which
/// resolves every gene name against the panel and runs [`Catalog::validate`].
/// Lookups never fail loudly: a miss is `None` and callers apply their
/// documented default.
///
#[derive(Debug, Clone)]
pub struct Catalog {
    name: String,
    version: String,
    genome_build: Option<String>,
    panel: GenePanel,
    alleles: FxHashMap<GeneTarget, Vec<AlleleDefinition>>,
    phenotypes: FxHashMap<PhenotypeKey, PhenotypeRow>,
    drugs: Vec<Drug>,
    risks: FxHashMap<RiskKey, RiskRow>,
    templates: FxHashMap<TemplateKey, Template>,
}

/// Order-independent key of a diplotype.
fn unordered(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

fn parse_label(raw: &str, context: &str) -> CatalogResult<PhenotypeLabel> {
    raw.parse::<PhenotypeLabel>()
        .map_err(|e| CatalogError::Inconsistent(format!("{context}: {e}")))
}

impl Catalog {
    /// The catalog compiled into the binary: six-gene GRCh38 panel, CPIC-based tables.
    pub fn embedded() -> CatalogResult<Self> {
        let config = CatalogConfig::from_toml_str(crate::DEFAULT_CATALOG)?;
        Catalog::from_config(config)
    }

    pub fn from_path(path: &Path) -> CatalogResult<Self> {
        let config = CatalogConfig::try_from(path)?;
        Catalog::from_config(config)
    }

    pub fn from_config(config: CatalogConfig) -> CatalogResult<Self> {
        let specs: Vec<GeneSpec> = config.genes.into_iter().map(GeneSpec::from).collect();
        let panel = GenePanel::new(specs)?;

        let gene = |symbol: &str, context: &str| -> CatalogResult<GeneTarget> {
            panel.get(symbol).cloned().ok_or_else(|| {
                CatalogError::Inconsistent(format!("{context} names gene {symbol}, which is not in the panel"))
            })
        };

        // alleles
        let mut alleles: FxHashMap<GeneTarget, Vec<AlleleDefinition>> = FxHashMap::default();
        for entry in config.alleles {
            let context = format!("allele {} {}", entry.gene, entry.name);
            let target = gene(&entry.gene, &context)?;
            let name = entry.name.trim().to_string();
            if panel.reference_allele(&target) == Some(name.as_str()) {
                return Err(CatalogError::Inconsistent(format!(
                    "{context} redefines the reference allele"
                )));
            }
            for element in entry.signature.iter() {
                let by_locus = element.position.is_some() && element.alt.is_some();
                if element.rsid.is_none() && !by_locus {
                    return Err(CatalogError::Inconsistent(format!(
                        "{context} has a signature element with neither rsid nor position+alt"
                    )));
                }
            }
            let definitions = alleles.entry(target).or_default();
            if definitions.iter().any(|d| d.name == name) {
                return Err(CatalogError::Inconsistent(format!("{context} is defined twice")));
            }
            definitions.push(AlleleDefinition {
                name,
                function: entry.function,
                signature: entry.signature,
            });
        }

        // diplotype -> phenotype
        let mut phenotypes: FxHashMap<PhenotypeKey, PhenotypeRow> = FxHashMap::default();
        for entry in config.phenotypes {
            let context = format!("phenotype row {} {}", entry.gene, entry.diplotype);
            let target = gene(&entry.gene, &context)?;
            let (a, b) = split_diplotype(&entry.diplotype).ok_or_else(|| {
                CatalogError::Inconsistent(format!("{context}: diplotype must look like *1/*2"))
            })?;
            for allele in [a, b] {
                let known = panel.reference_allele(&target) == Some(allele)
                    || alleles
                        .get(&target)
                        .is_some_and(|defs| defs.iter().any(|d| d.name == allele));
                if !known {
                    return Err(CatalogError::Inconsistent(format!(
                        "{context} uses allele {allele}, which is not defined for {target}"
                    )));
                }
            }
            let label = parse_label(&entry.phenotype, &context)?;
            let (a, b) = unordered(a, b);
            let row = PhenotypeRow {
                label,
                activity_score: entry.activity_score,
            };
            if phenotypes.insert((target, a, b), row).is_some() {
                return Err(CatalogError::Inconsistent(format!("{context} is listed twice")));
            }
        }

        // drugs
        let mut drugs: Vec<Drug> = Vec::with_capacity(config.drugs.len());
        for entry in config.drugs {
            let name = entry.name.trim().to_ascii_uppercase();
            let context = format!("drug {name}");
            if drugs.iter().any(|d| d.name == name) {
                return Err(CatalogError::Inconsistent(format!("{context} is listed twice")));
            }
            let mut genes = Vec::with_capacity(entry.genes.len());
            for symbol in entry.genes.iter() {
                let target = gene(symbol, &context)?;
                if !genes.contains(&target) {
                    genes.push(target);
                }
            }
            if genes.is_empty() {
                return Err(CatalogError::Inconsistent(format!("{context} has no genes")));
            }
            drugs.push(Drug { name, genes });
        }

        let drug_gene = |drug: &str, symbol: &str, context: &str| -> CatalogResult<(String, GeneTarget)> {
            let drug_name = drug.trim().to_ascii_uppercase();
            let target = gene(symbol, context)?;
            let known = drugs
                .iter()
                .any(|d| d.name == drug_name && d.genes.contains(&target));
            if !known {
                return Err(CatalogError::Inconsistent(format!(
                    "{context}: {drug_name} is not associated with {target} in the drug table"
                )));
            }
            Ok((drug_name, target))
        };

        // risk matrix
        let mut risks: FxHashMap<RiskKey, RiskRow> = FxHashMap::default();
        for entry in config.risks {
            let context = format!("risk row {}/{}/{}", entry.drug, entry.gene, entry.phenotype);
            let (drug, target) = drug_gene(&entry.drug, &entry.gene, &context)?;
            let label = parse_label(&entry.phenotype, &context)?;
            let row = RiskRow {
                risk_tier: entry.risk,
                evidence_tier: entry.evidence,
            };
            if risks.insert((drug, target, label), row).is_some() {
                return Err(CatalogError::Inconsistent(format!("{context} is listed twice")));
            }
        }

        // recommendation templates
        let mut templates: FxHashMap<TemplateKey, Template> = FxHashMap::default();
        for entry in config.recommendations {
            let context = format!("recommendation {}/{}/{}", entry.drug, entry.gene, entry.risk);
            let (drug, target) = drug_gene(&entry.drug, &entry.gene, &context)?;
            let label = entry
                .phenotype
                .as_deref()
                .map(|p| parse_label(p, &context))
                .transpose()?;
            let template = Template {
                text: entry.text.trim().to_string(),
                strength: entry.strength,
                guideline_reference: entry.guideline,
                alternatives: entry.alternatives,
            };
            if templates.insert((drug, target, entry.risk, label), template).is_some() {
                return Err(CatalogError::Inconsistent(format!("{context} is listed twice")));
            }
        }

        let catalog = Catalog {
            name: config.name,
            version: config.version,
            genome_build: config.genome_build,
            panel,
            alleles,
            phenotypes,
            drugs,
            risks,
            templates,
        };
        catalog.validate()?;

        info!(
            name = catalog.name.as_str(),
            version = catalog.version.as_str(),
            genes = catalog.panel.len(),
            drugs = catalog.drugs.len(),
            "loaded catalog"
        );

        Ok(catalog)
    }

    ///
    /// Check the clinical-text policy of every template and report reachable
    /// (drug, gene, risk tier) combinations that have no template.
    ///
    /// High-risk templates must carry an actionable directive and a strong or
    /// moderate strength; moderate-risk templates must carry dosing guidance.
    /// Gaps are only logged, the recommendation builder covers them.
    ///
    pub fn validate(&self) -> CatalogResult<()> {
        for ((drug, gene, tier, _), template) in self.templates.iter() {
            let context = format!("recommendation {drug}/{gene}/{tier}");
            if template.text.is_empty() {
                return Err(CatalogError::Inconsistent(format!("{context} has empty text")));
            }
            match tier {
                RiskTier::High => {
                    if !has_directive(&template.text) {
                        return Err(CatalogError::Inconsistent(format!(
                            "{context} must contain an actionable directive (one of {DIRECTIVE_KEYWORDS:?})"
                        )));
                    }
                    if template.strength == Strength::Optional {
                        return Err(CatalogError::Inconsistent(format!(
                            "{context} must have strength Strong or Moderate"
                        )));
                    }
                }
                RiskTier::Moderate => {
                    if !has_dosing_guidance(&template.text) {
                        return Err(CatalogError::Inconsistent(format!(
                            "{context} must contain dosing guidance (one of {DOSING_KEYWORDS:?})"
                        )));
                    }
                }
                RiskTier::Low | RiskTier::None => {}
            }
        }

        for drug in self.drugs.iter() {
            for gene in drug.genes.iter() {
                // lookup misses always resolve to the `none` tier
                let mut reachable: FxHashSet<(RiskTier, Option<PhenotypeLabel>)> = FxHashSet::default();
                reachable.insert((RiskTier::None, None));
                for ((d, g, label), row) in self.risks.iter() {
                    if d == &drug.name && g == gene {
                        reachable.insert((row.risk_tier, Some(*label)));
                    }
                }
                for (tier, label) in reachable {
                    let label = label.unwrap_or(PhenotypeLabel::Unknown);
                    if self.template(&drug.name, gene, tier, label).is_none() {
                        warn!(
                            drug = drug.name.as_str(),
                            gene = gene.symbol(),
                            tier = tier.as_str(),
                            phenotype = label.as_str(),
                            "no recommendation template, a generic statement will be used"
                        );
                    }
                }
            }
        }

        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn genome_build(&self) -> Option<&str> {
        self.genome_build.as_deref()
    }

    pub fn panel(&self) -> &GenePanel {
        &self.panel
    }

    /// Named non-reference alleles of a gene, in catalog order.
    pub fn alleles(&self, gene: &GeneTarget) -> &[AlleleDefinition] {
        self.alleles.get(gene).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Position of an allele in catalog order, the reference allele first.
    /// Unknown names sort last.
    pub fn allele_rank(&self, gene: &GeneTarget, allele: &str) -> usize {
        if self.panel.reference_allele(gene) == Some(allele) {
            return 0;
        }
        self.alleles(gene)
            .iter()
            .position(|d| d.name == allele)
            .map_or(usize::MAX, |i| i + 1)
    }

    /// Phenotype row of a diplotype, regardless of allele order.
    pub fn phenotype(&self, gene: &GeneTarget, allele1: &str, allele2: &str) -> Option<&PhenotypeRow> {
        let (a, b) = unordered(allele1, allele2);
        self.phenotypes.get(&(gene.clone(), a, b))
    }

    pub fn drugs(&self) -> &[Drug] {
        &self.drugs
    }

    /// Look a drug up by name, case-insensitively.
    pub fn drug(&self, name: &str) -> Option<&Drug> {
        let name = name.trim();
        self.drugs.iter().find(|d| d.name.eq_ignore_ascii_case(name))
    }

    pub fn risk(&self, drug: &str, gene: &GeneTarget, label: PhenotypeLabel) -> Option<&RiskRow> {
        self.risks
            .get(&(drug.to_ascii_uppercase(), gene.clone(), label))
    }

    /// Template for (drug, gene, tier), preferring one specific to the phenotype.
    pub fn template(
        &self,
        drug: &str,
        gene: &GeneTarget,
        tier: RiskTier,
        label: PhenotypeLabel,
    ) -> Option<&Template> {
        let drug = drug.to_ascii_uppercase();
        self.templates
            .get(&(drug.clone(), gene.clone(), tier, Some(label)))
            .or_else(|| self.templates.get(&(drug, gene.clone(), tier, None)))
    }
}
