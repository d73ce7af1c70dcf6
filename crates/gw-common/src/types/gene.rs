//! Gene identifier systems

use super::{coded_enum, normalize_name};
use crate::GwError;

coded_enum! {
    /// A naming system for gene identifiers.
    ///
    /// `Homology` is not a naming system in its own right: it labels the
    /// homology-cluster rows used as the pivot when values are remapped
    /// across species.
    pub enum GeneIdentifier ("gene identifier type") {
        Entrez = 1 => "Entrez",
        EnsemblGene = 2 => "Ensembl Gene",
        EnsemblProtein = 3 => "Ensembl Protein",
        EnsemblTranscript = 4 => "Ensembl Transcript",
        Unigene = 5 => "Unigene",
        GeneSymbol = 6 => "Gene Symbol",
        Homology = 7 => "Homology",
        Mgi = 10 => "MGI",
        Hgnc = 11 => "HGNC",
        Rgd = 12 => "RGD",
        Zfin = 13 => "ZFIN",
        FlyBase = 14 => "FlyBase",
        WormBase = 15 => "Wormbase",
        Sgd = 16 => "SGD",
        MirBase = 17 => "miRBase",
        Cgnc = 20 => "CGNC",
    }
}

impl GeneIdentifier {
    /// Look up an identifier system by its display name, case-insensitively.
    ///
    /// The homology pseudo-type is internal and never matches a name.
    pub fn from_name(name: &str) -> Result<Self, GwError> {
        let wanted = normalize_name(name);
        let alias = match wanted.as_str() {
            "entrez gene" | "entrez gene id" | "ncbi gene" => Some(GeneIdentifier::Entrez),
            "ensembl" | "ensembl gene id" => Some(GeneIdentifier::EnsemblGene),
            "symbol" | "gene symbols" => Some(GeneIdentifier::GeneSymbol),
            _ => None,
        };

        alias
            .or_else(|| {
                Self::ALL
                    .iter()
                    .copied()
                    .filter(|id| *id != GeneIdentifier::Homology)
                    .find(|id| normalize_name(id.name()) == wanted)
            })
            .ok_or_else(|| GwError::unknown_name("gene identifier type", name.trim()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_round_trip_through_try_from() {
        for id in GeneIdentifier::ALL {
            assert_eq!(GeneIdentifier::try_from(id.code()).unwrap(), *id);
        }
        assert!(GeneIdentifier::try_from(8).is_err());
        assert!(GeneIdentifier::try_from(0).is_err());
    }

    #[test]
    fn test_from_name() {
        assert_eq!(
            GeneIdentifier::from_name("gene  symbol").unwrap(),
            GeneIdentifier::GeneSymbol
        );
        assert_eq!(GeneIdentifier::from_name("Entrez").unwrap(), GeneIdentifier::Entrez);
        assert_eq!(GeneIdentifier::from_name("mgi").unwrap(), GeneIdentifier::Mgi);
        assert!(GeneIdentifier::from_name("Homology").is_err());
        assert!(GeneIdentifier::from_name("Affymetrix").is_err());
    }

    #[test]
    fn test_serializes_as_integer_code() {
        let json = serde_json::to_string(&GeneIdentifier::EnsemblGene).unwrap();
        assert_eq!(json, "2");
        let parsed: GeneIdentifier = serde_json::from_str("11").unwrap();
        assert_eq!(parsed, GeneIdentifier::Hgnc);
        assert!(serde_json::from_str::<GeneIdentifier>("99").is_err());
    }
}
