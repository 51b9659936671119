use serde::Deserialize;

/// Raw shapes for the ATT&CK STIX bundle. Only the fields the extractor
/// reads are declared; everything else in the bundle is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AttackBundle {
    #[serde(default)]
    pub objects: Vec<StixObject>,
}

/// One typed object from the bundle. Nodes (`intrusion-set`, `technique`,
/// `tool`, `malware`) and `relationship` edges share this shape; absent
/// fields default to empty.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StixObject {
    #[serde(default, rename = "type")]
    pub object_type: String,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub sectors: Vec<String>,
    #[serde(default)]
    pub first_seen: Option<String>,
    #[serde(default)]
    pub source_ref: String,
    #[serde(default)]
    pub target_ref: String,
    #[serde(default)]
    pub relationship_type: String,
}

impl StixObject {
    pub fn is_intrusion_set(&self) -> bool {
        self.object_type == "intrusion-set"
    }

    pub fn is_uses_edge_from(&self, group_id: &str) -> bool {
        self.object_type == "relationship"
            && self.relationship_type == "uses"
            && self.source_ref == group_id
    }
}
