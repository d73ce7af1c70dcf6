//! Species vocabulary

use super::{coded_enum, normalize_name};
use crate::GwError;

coded_enum! {
    /// Species known to GeneWeaver.
    ///
    /// Code 0 is reserved for "no species affinity" and is not a variant;
    /// see [`Species::from_affinity_code`].
    pub enum Species ("species") {
        MusMusculus = 1 => "Mus musculus",
        HomoSapiens = 2 => "Homo sapiens",
        RattusNorvegicus = 3 => "Rattus norvegicus",
        DanioRerio = 4 => "Danio rerio",
        DrosophilaMelanogaster = 5 => "Drosophila melanogaster",
        MacacaMulatta = 6 => "Macaca mulatta",
        CaenorhabditisElegans = 8 => "Caenorhabditis elegans",
        SaccharomycesCerevisiae = 9 => "Saccharomyces cerevisiae",
        GallusGallus = 10 => "Gallus gallus",
        CanisFamiliaris = 11 => "Canis familiaris",
    }
}

impl Species {
    /// Decode a species column where 0 means species-agnostic.
    pub fn from_affinity_code(code: i32) -> Result<Option<Self>, GwError> {
        match code {
            0 => Ok(None),
            other => Species::try_from(other).map(Some),
        }
    }

    pub fn common_name(self) -> &'static str {
        match self {
            Species::MusMusculus => "mouse",
            Species::HomoSapiens => "human",
            Species::RattusNorvegicus => "rat",
            Species::DanioRerio => "zebrafish",
            Species::DrosophilaMelanogaster => "fruit fly",
            Species::MacacaMulatta => "rhesus macaque",
            Species::CaenorhabditisElegans => "roundworm",
            Species::SaccharomycesCerevisiae => "baker's yeast",
            Species::GallusGallus => "chicken",
            Species::CanisFamiliaris => "dog",
        }
    }

    /// Look up a species by scientific or common name, case-insensitively.
    pub fn from_name(name: &str) -> Result<Self, GwError> {
        let wanted = normalize_name(name);
        Self::ALL
            .iter()
            .copied()
            .find(|sp| normalize_name(sp.name()) == wanted || sp.common_name() == wanted)
            .or(match wanted.as_str() {
                "fly" => Some(Species::DrosophilaMelanogaster),
                "worm" | "c. elegans" => Some(Species::CaenorhabditisElegans),
                "yeast" => Some(Species::SaccharomycesCerevisiae),
                "macaque" => Some(Species::MacacaMulatta),
                _ => None,
            })
            .ok_or_else(|| GwError::unknown_name("species", name.trim()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_affinity_code_zero_is_agnostic() {
        assert_eq!(Species::from_affinity_code(0).unwrap(), None);
        assert_eq!(
            Species::from_affinity_code(2).unwrap(),
            Some(Species::HomoSapiens)
        );
        assert!(Species::from_affinity_code(7).is_err());
    }

    #[test]
    fn test_from_name_accepts_scientific_and_common() {
        assert_eq!(Species::from_name("Mus musculus").unwrap(), Species::MusMusculus);
        assert_eq!(Species::from_name("  homo   SAPIENS ").unwrap(), Species::HomoSapiens);
        assert_eq!(Species::from_name("Rat").unwrap(), Species::RattusNorvegicus);
        assert_eq!(Species::from_name("yeast").unwrap(), Species::SaccharomycesCerevisiae);
        assert!(Species::from_name("Felis catus").is_err());
    }
}
