use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use extract::{Entity, Relationship};

pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.8;

const HONORIFICS: [&str; 6] = ["dr", "mr", "mrs", "ms", "prof", "sir"];

/// A merged entity. The first surface form seen becomes the canonical name;
/// later variants are kept as aliases.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanonicalEntity {
    pub id: String,
    pub name: String,
    pub entity_type: Option<String>,
    pub aliases: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedGraph {
    pub entities: Vec<CanonicalEntity>,
    pub relationships: Vec<Relationship>,
}

/// Lowercase, drop a leading honorific (with or without a trailing dot),
/// collapse internal whitespace.
pub fn normalize_name(name: &str) -> String {
    let lowered = name.to_lowercase();
    let mut parts: Vec<&str> = lowered.split_whitespace().collect();

    if let Some(first) = parts.first() {
        if HONORIFICS.contains(&first.trim_end_matches('.')) {
            parts.remove(0);
        }
    }

    parts.join(" ")
}

/// Normalized Levenshtein similarity in `[0, 1]`.
pub fn name_similarity(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    1.0 - levenshtein(a, b) as f64 / max_len as f64
}

fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut cur = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        cur[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = if ca == cb { 0 } else { 1 };
            cur[j + 1] = (prev[j + 1] + 1).min(cur[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut cur);
    }

    prev[b.len()]
}

/// Fold entities into canonical ones. An entity joins a canonical when the
/// normalized names are equal, when it matches a recorded alias, or when
/// similarity reaches `threshold`. Returns the canonical entities and the
/// old-ID -> canonical-ID remap.
pub fn merge_entities(
    entities: &[Entity],
    threshold: f64,
) -> (Vec<CanonicalEntity>, HashMap<String, String>) {
    let mut canonical: Vec<CanonicalEntity> = Vec::new();
    let mut resolved_map: HashMap<String, String> = HashMap::new();

    for ent in entities {
        let norm = normalize_name(&ent.name);
        let mut matched: Option<(usize, f64)> = None;

        for (i, canon) in canonical.iter().enumerate() {
            let canon_norm = normalize_name(&canon.name);

            if norm == canon_norm || canon.aliases.iter().any(|a| normalize_name(a) == norm) {
                matched = Some((i, 1.0));
                break;
            }

            let sim = name_similarity(&norm, &canon_norm);
            if sim >= threshold {
                matched = Some((i, sim));
                break;
            }
        }

        match matched {
            Some((i, similarity)) => {
                let canon = &mut canonical[i];
                if ent.name != canon.name && !canon.aliases.contains(&ent.name) {
                    canon.aliases.push(ent.name.clone());
                }
                // A variant may carry the type the canonical form lacked.
                if canon.entity_type.is_none() && ent.entity_type.is_some() {
                    canon.entity_type = ent.entity_type.clone();
                }
                info!(
                    surface = %ent.name,
                    canonical = %canon.name,
                    similarity,
                    "merged entity"
                );
                resolved_map.insert(ent.id.clone(), canon.id.clone());
            }
            None => {
                resolved_map.insert(ent.id.clone(), ent.id.clone());
                canonical.push(CanonicalEntity {
                    id: ent.id.clone(),
                    name: ent.name.clone(),
                    entity_type: ent.entity_type.clone(),
                    aliases: Vec::new(),
                });
            }
        }
    }

    (canonical, resolved_map)
}

/// Rewrite relationship endpoints through the remap, dropping exact
/// duplicates and relationships with unknown endpoints. First occurrence
/// wins, so evidence from the earliest mention is kept.
pub fn remap_relationships(
    relationships: &[Relationship],
    resolved_map: &HashMap<String, String>,
) -> Vec<Relationship> {
    let mut seen: HashSet<(String, String, String)> = HashSet::new();
    let mut resolved: Vec<Relationship> = Vec::new();

    for rel in relationships {
        let (Some(source), Some(target)) =
            (resolved_map.get(&rel.source), resolved_map.get(&rel.target))
        else {
            debug!(
                source = %rel.source,
                target = %rel.target,
                "dropping relationship with unknown endpoint"
            );
            continue;
        };

        let key = (source.clone(), rel.relation.clone(), target.clone());
        if seen.insert(key) {
            resolved.push(Relationship {
                source: source.clone(),
                relation: rel.relation.clone(),
                target: target.clone(),
                evidence_span: rel.evidence_span.clone(),
            });
        } else {
            debug!(
                source = %source,
                relation = %rel.relation,
                target = %target,
                "duplicate relationship removed"
            );
        }
    }

    resolved
}

/// Merge entities and remap relationships in one step.
pub fn resolve(entities: &[Entity], relationships: &[Relationship], threshold: f64) -> ResolvedGraph {
    let (canonical, resolved_map) = merge_entities(entities, threshold);
    let relationships = remap_relationships(relationships, &resolved_map);

    ResolvedGraph {
        entities: canonical,
        relationships,
    }
}
