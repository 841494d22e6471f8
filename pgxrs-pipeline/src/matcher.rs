//! Allele matching: from a gene's variants to a diplotype call.
//!
//! Every catalog allele whose signature is at least partly present becomes a
//! candidate. Candidates explained by a more complete allele are pruned, so
//! compound alleles (TPMT *3A = *3B + *3C) win over their parts. What is left
//! decides the call:
//!
//! * nothing: wild type, `*1/*1`
//! * one allele: paired with the reference when all its evidence is
//!   heterozygous, homozygous otherwise
//! * two or more: the two best supported, unless a third ties with the second

use std::collections::BTreeSet;

use fxhash::FxHashMap;
use tracing::debug;

use pgxrs_catalog::Catalog;
use pgxrs_core::models::{AlleleCall, Confidence, GeneTarget, Variant, Zygosity};

/// An allele with at least one satisfied signature element.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub name: String,
    /// Position in catalog order, reference allele is 0
    pub rank: usize,
    pub satisfied: usize,
    pub required: usize,
    /// Indices of the gene's variants that satisfied an element
    evidence: BTreeSet<usize>,
    all_heterozygous: bool,
}

impl Candidate {
    fn reference(name: &str) -> Self {
        Candidate {
            name: name.to_string(),
            rank: 0,
            satisfied: 0,
            required: 0,
            evidence: BTreeSet::new(),
            all_heterozygous: false,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.satisfied == self.required
    }

    /// `other` explains all of this candidate's evidence and is a better explanation.
    fn is_subsumed_by(&self, other: &Candidate) -> bool {
        other.is_complete()
            && self.evidence.is_subset(&other.evidence)
            && (other.required > self.required || !self.is_complete())
    }
}

/// Result of matching one gene.
#[derive(Debug, Clone, PartialEq)]
pub enum AlleleMatch {
    Wildtype,
    Homozygous(Candidate),
    /// Alleles in catalog order; the first may be the reference allele
    Heterozygous(Candidate, Candidate),
    /// More than two equally supported candidates, best first
    Ambiguous(Vec<Candidate>),
}

impl AlleleMatch {
    pub fn confidence(&self) -> Confidence {
        match self {
            AlleleMatch::Wildtype => Confidence::High,
            AlleleMatch::Homozygous(a) if a.is_complete() => Confidence::High,
            AlleleMatch::Heterozygous(a, b) if a.is_complete() && b.is_complete() => Confidence::High,
            AlleleMatch::Homozygous(_) | AlleleMatch::Heterozygous(_, _) => Confidence::Medium,
            AlleleMatch::Ambiguous(_) => Confidence::Low,
        }
    }

    pub fn into_call(self, gene: GeneTarget, reference_allele: &str) -> AlleleCall {
        let confidence = self.confidence();
        match self {
            AlleleMatch::Wildtype => AlleleCall::wild_type(gene, reference_allele),
            AlleleMatch::Homozygous(a) => AlleleCall::new(gene, &a.name, &a.name, confidence),
            AlleleMatch::Heterozygous(a, b) => AlleleCall::new(gene, &a.name, &b.name, confidence),
            AlleleMatch::Ambiguous(candidates) => {
                let mut best: Vec<&Candidate> = candidates.iter().take(2).collect();
                best.sort_by_key(|c| c.rank);
                match best.as_slice() {
                    [a, b] => AlleleCall::new(gene, &a.name, &b.name, confidence),
                    _ => AlleleCall::new(gene, reference_allele, reference_allele, Confidence::Low),
                }
            }
        }
    }
}

/// Match the variants of a single gene against its catalog alleles.
pub fn match_gene(catalog: &Catalog, gene: &GeneTarget, variants: &[&Variant]) -> AlleleMatch {
    let mut candidates: Vec<Candidate> = Vec::new();
    for allele in catalog.alleles(gene) {
        if allele.signature.is_empty() {
            continue;
        }
        let mut evidence = BTreeSet::new();
        let mut satisfied = 0;
        for element in allele.signature.iter() {
            let hits: Vec<usize> = variants
                .iter()
                .enumerate()
                .filter(|(_, v)| element.matches(v))
                .map(|(idx, _)| idx)
                .collect();
            if !hits.is_empty() {
                satisfied += 1;
                evidence.extend(hits);
            }
        }
        if satisfied == 0 {
            continue;
        }
        let all_heterozygous = evidence
            .iter()
            .all(|idx| variants[*idx].zygosity == Zygosity::Heterozygous);
        candidates.push(Candidate {
            name: allele.name.clone(),
            rank: catalog.allele_rank(gene, &allele.name),
            satisfied,
            required: allele.signature.len(),
            evidence,
            all_heterozygous,
        });
    }

    let survivors: Vec<Candidate> = candidates
        .iter()
        .filter(|c| !candidates.iter().any(|other| other != *c && c.is_subsumed_by(other)))
        .cloned()
        .collect();

    select(survivors, catalog.panel().reference_allele(gene).unwrap_or("*1"))
}

fn select(mut survivors: Vec<Candidate>, reference_allele: &str) -> AlleleMatch {
    // best supported first, catalog order among equals
    survivors.sort_by(|a, b| b.satisfied.cmp(&a.satisfied).then(a.rank.cmp(&b.rank)));

    match survivors.len() {
        0 => AlleleMatch::Wildtype,
        1 => {
            let only = survivors.remove(0);
            if only.all_heterozygous {
                AlleleMatch::Heterozygous(Candidate::reference(reference_allele), only)
            } else {
                AlleleMatch::Homozygous(only)
            }
        }
        n => {
            if n > 2 && survivors[2].satisfied == survivors[1].satisfied {
                return AlleleMatch::Ambiguous(survivors);
            }
            let mut best: Vec<Candidate> = survivors.into_iter().take(2).collect();
            best.sort_by_key(|c| c.rank);
            let second = best.remove(1);
            let first = best.remove(0);
            AlleleMatch::Heterozygous(first, second)
        }
    }
}

/// One call per panel gene, in panel order, whether or not the gene has variants.
pub fn call_alleles(catalog: &Catalog, variants: &[Variant]) -> Vec<AlleleCall> {
    let mut by_gene: FxHashMap<&GeneTarget, Vec<&Variant>> = FxHashMap::default();
    for variant in variants {
        by_gene.entry(&variant.gene).or_default().push(variant);
    }

    catalog
        .panel()
        .targets()
        .map(|gene| {
            let gene_variants = by_gene.get(gene).map(Vec::as_slice).unwrap_or(&[]);
            let reference = catalog.panel().reference_allele(gene).unwrap_or("*1");
            let matched = match_gene(catalog, gene, gene_variants);
            let call = matched.into_call(gene.clone(), reference);
            debug!(
                gene = gene.symbol(),
                variants = gene_variants.len(),
                diplotype = call.notation.as_str(),
                confidence = ?call.confidence,
                "called alleles"
            );
            call
        })
        .collect()
}
