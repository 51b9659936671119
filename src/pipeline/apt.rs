use rand::seq::SliceRandom;
use rand::Rng;

use crate::core::types::{AptForecast, AptGroup};
use crate::sources::mitre::{AttackBundle, StixObject};

const MAX_GROUPS: usize = 10;
const DISPLAY_TECHNIQUES: usize = 8;
const MITRE_TECHNIQUES: usize = 5;

const DEFAULT_TARGETS: [&str; 4] = ["Government", "Financial", "Healthcare", "Technology"];
const DEFAULT_TOOLS: [&str; 3] = [
    "Custom Malware",
    "Living Off The Land Tools",
    "Remote Access Trojans",
];
const TIMEFRAMES: [&str; 3] = ["12-24 hours", "24-48 hours", "3-7 days"];

/// Build group profiles from the ATT&CK bundle: the first ten intrusion
/// sets in bundle order, with their `uses` edges resolved to technique and
/// tool names. A bundle without intrusion sets yields an empty vec.
pub fn extract_apt_groups(bundle: &AttackBundle, rng: &mut impl Rng) -> Vec<AptGroup> {
    bundle
        .objects
        .iter()
        .filter(|obj| obj.is_intrusion_set())
        .take(MAX_GROUPS)
        .map(|group| profile_group(bundle, group, rng))
        .collect()
}

fn profile_group(bundle: &AttackBundle, group: &StixObject, rng: &mut impl Rng) -> AptGroup {
    let technique_names = resolve_uses(bundle, &group.id, |_| true);
    let tool_names = resolve_uses(bundle, &group.id, |rel| rel.target_ref.starts_with("tool--"));

    let first_sector = group.sectors.first().cloned();
    let targets = if group.sectors.is_empty() {
        DEFAULT_TARGETS.iter().map(|s| s.to_string()).collect()
    } else {
        group.sectors.clone()
    };
    let tools = if tool_names.is_empty() {
        DEFAULT_TOOLS.iter().map(|s| s.to_string()).collect()
    } else {
        tool_names
    };

    let prediction = AptForecast {
        confidence: rng.gen_range(65..95),
        target_sector: first_sector
            .clone()
            .unwrap_or_else(|| "Government".to_string()),
        attack_vector: technique_names
            .first()
            .cloned()
            .unwrap_or_else(|| "Spear Phishing".to_string()),
        timeframe: TIMEFRAMES
            .choose(rng)
            .copied()
            .unwrap_or("24-48 hours")
            .to_string(),
    };

    AptGroup {
        id: short_id(&group.id),
        name: group.name.clone(),
        attribution: group
            .country
            .clone()
            .filter(|c| !c.is_empty())
            .or_else(|| group.aliases.first().cloned())
            .unwrap_or_else(|| "Unknown".to_string()),
        active_since: group
            .first_seen
            .clone()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "2010".to_string()),
        targets,
        techniques: technique_names
            .iter()
            .take(DISPLAY_TECHNIQUES)
            .cloned()
            .collect(),
        tools,
        recent_campaigns: vec![
            format!(
                "{} campaign targeting {} (2023)",
                group.name,
                first_sector.as_deref().unwrap_or("multiple sectors")
            ),
            format!("Supply chain compromise attributed to {} (2022)", group.name),
            format!("Zero-day exploitation by {} (2021)", group.name),
        ],
        prediction,
        mitre_techniques: technique_names
            .iter()
            .take(MITRE_TECHNIQUES)
            .cloned()
            .collect(),
    }
}

/// Names of every object this group `uses`, in bundle order. Edges whose
/// target is missing from the bundle are dropped.
fn resolve_uses(
    bundle: &AttackBundle,
    group_id: &str,
    keep: impl Fn(&StixObject) -> bool,
) -> Vec<String> {
    bundle
        .objects
        .iter()
        .filter(|rel| rel.is_uses_edge_from(group_id) && keep(rel))
        .filter_map(|rel| bundle.objects.iter().find(|obj| obj.id == rel.target_ref))
        .map(|obj| obj.name.clone())
        .filter(|name| !name.is_empty())
        .collect()
}

/// STIX ids are `<type>--<uuid>`; the dashboard uses the uuid half.
fn short_id(stix_id: &str) -> String {
    stix_id
        .split_once("--")
        .map(|(_, uuid)| uuid.to_string())
        .unwrap_or_else(|| stix_id.to_string())
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn node(object_type: &str, id: &str, name: &str) -> StixObject {
        StixObject {
            object_type: object_type.to_string(),
            id: id.to_string(),
            name: name.to_string(),
            ..StixObject::default()
        }
    }

    fn uses_edge(source: &str, target: &str) -> StixObject {
        StixObject {
            object_type: "relationship".to_string(),
            id: format!("relationship--{source}-{target}"),
            relationship_type: "uses".to_string(),
            source_ref: source.to_string(),
            target_ref: target.to_string(),
            ..StixObject::default()
        }
    }

    fn sample_bundle() -> AttackBundle {
        AttackBundle {
            objects: vec![
                node("intrusion-set", "intrusion-set--aaa", "Red Fox"),
                node("technique", "attack-pattern--t1", "Spearphishing Attachment"),
                node("technique", "attack-pattern--t2", "Credential Dumping"),
                node("tool", "tool--m1", "Mimikatz"),
                uses_edge("intrusion-set--aaa", "attack-pattern--t1"),
                uses_edge("intrusion-set--aaa", "attack-pattern--t2"),
                uses_edge("intrusion-set--aaa", "tool--m1"),
            ],
        }
    }

    #[test]
    fn empty_bundle_yields_no_groups() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(extract_apt_groups(&AttackBundle::default(), &mut rng).is_empty());
    }

    #[test]
    fn resolves_techniques_and_tools_from_uses_edges() {
        let mut rng = StdRng::seed_from_u64(2);
        let groups = extract_apt_groups(&sample_bundle(), &mut rng);
        assert_eq!(groups.len(), 1);
        let group = &groups[0];
        assert_eq!(group.id, "aaa");
        assert_eq!(group.name, "Red Fox");
        // The technique list includes every resolved `uses` target.
        assert_eq!(
            group.techniques,
            vec!["Spearphishing Attachment", "Credential Dumping", "Mimikatz"]
        );
        assert_eq!(group.tools, vec!["Mimikatz"]);
    }

    #[test]
    fn mitre_techniques_is_short_prefix_of_technique_list() {
        let mut bundle = sample_bundle();
        for i in 0..9 {
            let id = format!("attack-pattern--x{i}");
            bundle.objects.push(node("technique", &id, &format!("T{i}")));
            bundle.objects.push(uses_edge("intrusion-set--aaa", &id));
        }
        let mut rng = StdRng::seed_from_u64(3);
        let group = &extract_apt_groups(&bundle, &mut rng)[0];
        assert_eq!(group.techniques.len(), 8);
        assert_eq!(group.mitre_techniques.len(), 5);
        assert_eq!(group.mitre_techniques[..], group.techniques[..5]);
    }

    #[test]
    fn caps_at_ten_groups_in_bundle_order() {
        let objects = (0..14)
            .map(|i| {
                node(
                    "intrusion-set",
                    &format!("intrusion-set--g{i}"),
                    &format!("Group {i}"),
                )
            })
            .collect();
        let mut rng = StdRng::seed_from_u64(4);
        let groups = extract_apt_groups(&AttackBundle { objects }, &mut rng);
        assert_eq!(groups.len(), 10);
        assert_eq!(groups[0].name, "Group 0");
        assert_eq!(groups[9].name, "Group 9");
    }

    #[test]
    fn sparse_group_gets_generic_defaults() {
        let bundle = AttackBundle {
            objects: vec![node("intrusion-set", "intrusion-set--bare", "Bare")],
        };
        let mut rng = StdRng::seed_from_u64(5);
        let group = &extract_apt_groups(&bundle, &mut rng)[0];
        assert_eq!(group.attribution, "Unknown");
        assert_eq!(group.active_since, "2010");
        assert_eq!(group.targets, DEFAULT_TARGETS.to_vec());
        assert_eq!(group.tools, DEFAULT_TOOLS.to_vec());
        assert!(group.techniques.is_empty());
        assert_eq!(group.prediction.target_sector, "Government");
        assert_eq!(group.prediction.attack_vector, "Spear Phishing");
    }

    #[test]
    fn forecast_confidence_stays_in_band() {
        let bundle = sample_bundle();
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let group = &extract_apt_groups(&bundle, &mut rng)[0];
            assert!((65..95).contains(&group.prediction.confidence));
            assert!(TIMEFRAMES.contains(&group.prediction.timeframe.as_str()));
        }
    }
}
