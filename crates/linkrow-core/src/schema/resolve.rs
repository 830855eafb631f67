use super::{Cascade, CascadeOp, Junction, RelationKind, UpdatePolicy};

/// A relation descriptor with its target resolved against the schema.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRelation {
    /// Name of the relation-valued field
    pub field: String,

    /// Model that declared the field (the owner or one of its ancestors)
    pub declared_on: String,

    pub kind: RelationKind,
    pub cascade: Cascade,
    pub on_update: UpdatePolicy,

    /// Related model name
    pub target: String,

    /// Related model's table name
    pub target_table: String,

    /// Where associations of this relation are stored
    pub junction: Junction,
}

impl ResolvedRelation {
    /// True if `op` is cascaded through this relation.
    pub fn cascades(&self, op: CascadeOp) -> bool {
        self.kind.is_cascading() && self.cascade.includes(op)
    }
}
