//! Suboption code → classification label lookup.
//!
//! Pages with suboptions persist a human-readable classification on every
//! row. The table is keyed by entity then code; entities without suboptions
//! simply have no entry, and an unknown code yields no label rather than an
//! error, since not every page carries classification.

use crate::data::Entity;

/// (entity, suboption code, label) triples for the classified pages.
const SUBOPTION_LABELS: &[(Entity, &str, &str)] = &[
    (Entity::Processing, "subopt_01", "Viníferas"),
    (Entity::Processing, "subopt_02", "Americanas e híbridas"),
    (Entity::Processing, "subopt_03", "Uvas de mesa"),
    (Entity::Processing, "subopt_04", "Sem classificação"),
    (Entity::Import, "subopt_01", "Vinhos de mesa"),
    (Entity::Import, "subopt_02", "Espumantes"),
    (Entity::Import, "subopt_03", "Uvas frescas"),
    (Entity::Import, "subopt_04", "Uvas passas"),
    (Entity::Import, "subopt_05", "Suco de uva"),
    (Entity::Export, "subopt_01", "Vinhos de mesa"),
    (Entity::Export, "subopt_02", "Espumantes"),
    (Entity::Export, "subopt_03", "Uvas frescas"),
    (Entity::Export, "subopt_04", "Suco de uva"),
];

/// Resolve the classification label for `(entity, suboption)`.
///
/// Returns `None` when the entity has no suboption table or the code is
/// unrecognized.
pub fn classification_label(entity: Entity, suboption: &str) -> Option<&'static str> {
    SUBOPTION_LABELS
        .iter()
        .find(|(e, code, _)| *e == entity && *code == suboption)
        .map(|(_, _, label)| *label)
}
