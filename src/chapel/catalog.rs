use once_cell::sync::Lazy;

/// One exhibit in the chapel: a claimed artifact, the claim made about it,
/// and whether that claim holds up for a 13th-14th century Western European
/// chapel.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct Relic {
    pub id: String,
    pub name: String,
    pub emoji: String,
    pub claim: String,
    pub plausible: bool,
    pub notes: Vec<String>,
}

impl Relic {
    fn new(id: &str, name: &str, emoji: &str, claim: &str, plausible: bool, notes: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            emoji: emoji.to_string(),
            claim: claim.to_string(),
            plausible,
            notes: notes.iter().map(|n| n.to_string()).collect(),
        }
    }
}

// Four genuine items and four anachronisms. The 5-of-8 win condition is
// tuned for this balance, so keep it if the content ever changes.
static RELICS: Lazy<Vec<Relic>> = Lazy::new(|| {
    vec![
        Relic::new(
            "thorn",
            "Thorn of the Crown",
            "🌿",
            "A thorn said to be from Christ's Crown, kept in a silver filigree reliquary.",
            true,
            &[
                "Thorns from the Crown were venerated in medieval Europe (e.g., Sainte-Chapelle, Paris).",
                "Reliquaries were often ornate silver/gold with rock crystal panels.",
            ],
        ),
        Relic::new(
            "saint-bone",
            "Phalanx of a Local Saint",
            "🦴",
            "A finger-bone of St. Aethelric, our diocese's martyr, paraded on feast days.",
            true,
            &[
                "Bone relics were common and used in processions.",
                "Local cults of saints drew pilgrims and donations.",
            ],
        ),
        Relic::new(
            "true-cross",
            "Splinter of the True Cross",
            "✝️",
            "A wooden splinter said to be from the True Cross, sealed in wax.",
            true,
            &[
                "Fragments of the True Cross circulated widely in medieval Christendom.",
                "Authenticity debated, but veneration is historically plausible.",
            ],
        ),
        Relic::new(
            "gospel-book",
            "Gospel Book with Jewelled Cover",
            "📖",
            "A Latin Gospel book with gilt bosses and glass cabochons kept on the altar.",
            true,
            &[
                "Jewelled/ornamented bindings are well-attested; glass often used to mimic gems.",
                "Liturgical books in Latin were central to worship.",
            ],
        ),
        Relic::new(
            "guadalupe",
            "Tilma of Guadalupe Fragment",
            "🧵",
            "A scrap from the tilma of Our Lady of Guadalupe, brought by traders.",
            false,
            &[
                "The Guadalupe apparition is dated 1531 in New Spain (post-medieval relative to 13th-14th c.).",
                "So a chapel in 1300s Europe could not hold such a relic.",
            ],
        ),
        Relic::new(
            "printed-indulgence",
            "Printed Indulgence Sheet",
            "📰",
            "A printed indulgence authorised by the bishop and sold to pilgrims.",
            false,
            &[
                "An indulgence was something the Church sold or gave that people thought would shorten the time their soul spent being punished after death.",
                "In 13th-14th c., indulgences were written, not printed sheets.",
            ],
        ),
        Relic::new(
            "perspective-panel",
            "Perspective Oil Painting of the Nativity",
            "🖼️",
            "A panel painting using linear perspective and oil glazes hung above the altar.",
            false,
            &[
                "Perspective means showing 3-D objects and spatial relationships on a two-dimensional surface. This is a 15th-century concept.",
                "13th-14th c. chapels used tempera on panel with medieval stylistic conventions.",
            ],
        ),
        Relic::new(
            "pocketwatch-reliquary",
            "Clockwork Pocketwatch Reliquary",
            "⌚",
            "A tiny clockwork device set into a reliquary pendant for timing the Offices.",
            false,
            &[
                "Portable spring-driven watches appear 16th century; earlier large clocks were weight-driven and public.",
                "A 1300s chapel would not contain a pocketwatch mechanism.",
            ],
        ),
    ]
});

/// The fixed exhibit list. Never mutated at runtime.
pub fn all() -> &'static [Relic] {
    &RELICS
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn eight_relics_with_unique_ids() {
        let ids: HashSet<&str> = all().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(all().len(), 8);
        assert_eq!(ids.len(), 8);
    }

    #[test]
    fn ground_truth_is_balanced() {
        let plausible = all().iter().filter(|r| r.plausible).count();
        assert_eq!(plausible, 4);
        assert_eq!(all().len() - plausible, 4);
    }

    #[test]
    fn every_relic_has_notes() {
        for relic in all() {
            assert!(!relic.notes.is_empty(), "relic {} has no notes", relic.id);
        }
    }
}
