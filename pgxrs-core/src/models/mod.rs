pub mod allele;
pub mod explanation;
pub mod gene;
pub mod interaction;
pub mod interval;
pub mod phenotype;
pub mod recommendation;
pub mod region;
pub mod report;
pub mod variant;

// re-export for cleaner imports
pub use self::allele::{AlleleCall, Confidence};
pub use self::explanation::{Explanation, ExplanationSource, NarrativeOutcome};
pub use self::gene::{GeneDefinition, GenePanel, GeneSpec, GeneTarget};
pub use self::interaction::{EvidenceTier, Interaction, RiskTier};
pub use self::interval::Interval;
pub use self::phenotype::{PhenotypeCall, PhenotypeLabel};
pub use self::recommendation::{Recommendation, Strength};
pub use self::region::Region;
pub use self::report::Report;
pub use self::variant::{FilterStatus, Variant, Zygosity};
