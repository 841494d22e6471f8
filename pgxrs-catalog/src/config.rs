use std::ffi::OsStr;
use std::fs::read_to_string;
use std::path::Path;

use serde::{Deserialize, Serialize};

use pgxrs_core::models::{EvidenceTier, GeneSpec, RiskTier, Strength};

use crate::error::{CatalogError, CatalogResult};

/// One panel gene. Coordinates are 1-based and inclusive.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct GeneEntry {
    pub symbol: String,
    pub chromosome: String,
    pub start: u32,
    pub end: u32,
    #[serde(default = "default_reference_allele")]
    pub reference_allele: String,
}

fn default_reference_allele() -> String {
    "*1".to_string()
}

impl From<GeneEntry> for GeneSpec {
    fn from(entry: GeneEntry) -> Self {
        GeneSpec {
            symbol: entry.symbol,
            chromosome: entry.chromosome,
            start: entry.start,
            end: entry.end,
            reference_allele: entry.reference_allele,
        }
    }
}

/// One required variant of an allele signature: a dbSNP id, a position plus
/// alternate base(s), or both. Either form satisfies the element.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct SignatureElement {
    #[serde(default)]
    pub rsid: Option<String>,
    #[serde(default)]
    pub position: Option<u32>,
    #[serde(default)]
    pub alt: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct AlleleEntry {
    pub gene: String,
    pub name: String,
    #[serde(default)]
    pub function: Option<String>,
    #[serde(default)]
    pub signature: Vec<SignatureElement>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct PhenotypeEntry {
    pub gene: String,
    pub diplotype: String,
    pub phenotype: String,
    #[serde(default)]
    pub activity_score: Option<f64>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct DrugEntry {
    pub name: String,
    pub genes: Vec<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct RiskEntry {
    pub drug: String,
    pub gene: String,
    pub phenotype: String,
    pub risk: RiskTier,
    pub evidence: EvidenceTier,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct TemplateEntry {
    pub drug: String,
    pub gene: String,
    pub risk: RiskTier,
    /// Only set for templates finer than (drug, gene, risk)
    #[serde(default)]
    pub phenotype: Option<String>,
    pub text: String,
    pub strength: Strength,
    pub guideline: String,
    #[serde(default)]
    pub alternatives: Vec<String>,
}

/// A catalog file as written on disk, before any consistency checks.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct CatalogConfig {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub genome_build: Option<String>,
    pub genes: Vec<GeneEntry>,
    #[serde(default)]
    pub alleles: Vec<AlleleEntry>,
    #[serde(default)]
    pub phenotypes: Vec<PhenotypeEntry>,
    pub drugs: Vec<DrugEntry>,
    #[serde(default)]
    pub risks: Vec<RiskEntry>,
    #[serde(default)]
    pub recommendations: Vec<TemplateEntry>,
}

#[derive(Debug, PartialEq)]
pub enum CatalogInputFileType {
    Toml,
    Yaml,
}

impl CatalogInputFileType {
    ///
    /// Determine the format of a catalog file based on its extension.
    /// # Arguments
    /// * `path` - path to the catalog file
    ///
    pub fn from_path(path: &Path) -> CatalogResult<Self> {
        match path.extension().and_then(OsStr::to_str) {
            Some("toml") => Ok(CatalogInputFileType::Toml),
            Some("yaml") | Some("yml") => Ok(CatalogInputFileType::Yaml),
            _ => Err(CatalogError::InvalidFileType),
        }
    }
}

impl CatalogConfig {
    pub fn from_toml_str(contents: &str) -> CatalogResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn from_yaml_str(contents: &str) -> CatalogResult<Self> {
        Ok(serde_yaml::from_str(contents)?)
    }
}

impl TryFrom<&Path> for CatalogConfig {
    type Error = CatalogError;

    fn try_from(path: &Path) -> Result<Self, Self::Error> {
        let file_type = CatalogInputFileType::from_path(path)?;
        let contents = read_to_string(path)?;
        match file_type {
            CatalogInputFileType::Toml => CatalogConfig::from_toml_str(&contents),
            CatalogInputFileType::Yaml => CatalogConfig::from_yaml_str(&contents),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::path::PathBuf;

    const MINIMAL_YAML: &str = r#"
name: minimal
version: "1"
genes:
  - { symbol: TPMT, chromosome: chr6, start: 18128311, end: 18155169 }
alleles:
  - gene: TPMT
    name: "*3C"
    signature:
      - { rsid: rs1142345, position: 18130687, alt: C }
drugs:
  - { name: AZATHIOPRINE, genes: [TPMT] }
risks:
  - { drug: AZATHIOPRINE, gene: TPMT, phenotype: Poor Metabolizer, risk: high, evidence: A }
"#;

    #[rstest]
    #[case("catalog.toml", Some(CatalogInputFileType::Toml))]
    #[case("catalog.yaml", Some(CatalogInputFileType::Yaml))]
    #[case("catalog.yml", Some(CatalogInputFileType::Yaml))]
    #[case("catalog.json", None)]
    #[case("catalog", None)]
    fn test_from_path(#[case] path: &str, #[case] expected: Option<CatalogInputFileType>) {
        let file_type = CatalogInputFileType::from_path(&PathBuf::from(path)).ok();
        assert_eq!(file_type, expected);
    }

    #[rstest]
    fn test_parse_yaml() {
        let config = CatalogConfig::from_yaml_str(MINIMAL_YAML).unwrap();
        assert_eq!(config.name, "minimal");
        assert_eq!(config.genes[0].reference_allele, "*1");
        assert_eq!(config.alleles[0].signature[0].rsid.as_deref(), Some("rs1142345"));
        assert_eq!(config.risks[0].risk, RiskTier::High);
        assert_eq!(config.risks[0].evidence, EvidenceTier::A);
        assert!(config.recommendations.is_empty());
    }

    #[rstest]
    fn test_try_from_path_reads_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("minimal.yml");
        std::fs::write(&path, MINIMAL_YAML).unwrap();

        let config = CatalogConfig::try_from(path.as_path()).unwrap();
        assert_eq!(config.drugs[0].genes, vec!["TPMT".to_string()]);
    }

    #[rstest]
    fn test_try_from_path_rejects_unknown_extension() {
        let result = CatalogConfig::try_from(PathBuf::from("catalog.csv").as_path());
        assert!(matches!(result, Err(CatalogError::InvalidFileType)));
    }
}
