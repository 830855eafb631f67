use std::{fmt, ops};

/// How many instances of each side participate in an association.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationKind {
    OneToOne,
    OneToMany,
    ManyToOne,
    ManyToMany,
}

impl RelationKind {
    /// True if the owning side holds a collection of related entities.
    pub fn is_collection(self) -> bool {
        matches!(self, RelationKind::OneToMany | RelationKind::ManyToMany)
    }

    /// True if the engine may cascade through relations of this kind.
    ///
    /// `ManyToOne` is the inverse side; its owner is the other entity.
    pub fn is_cascading(self) -> bool {
        !matches!(self, RelationKind::ManyToOne)
    }
}

/// Operation that may be cascaded to related entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CascadeOp {
    Insert,
    Update,
    Delete,
}

/// Set of operations cascaded through a relation.
#[derive(Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Cascade {
    bits: u8,
}

impl Cascade {
    pub const NONE: Cascade = Cascade { bits: 0 };
    pub const INSERT: Cascade = Cascade { bits: 0b001 };
    pub const UPDATE: Cascade = Cascade { bits: 0b010 };
    pub const DELETE: Cascade = Cascade { bits: 0b100 };
    pub const ALL: Cascade = Cascade { bits: 0b111 };

    pub const fn contains(self, other: Cascade) -> bool {
        self.bits & other.bits == other.bits
    }

    pub const fn is_empty(self) -> bool {
        self.bits == 0
    }

    pub fn includes(self, op: CascadeOp) -> bool {
        self.contains(Cascade::from(op))
    }
}

impl From<CascadeOp> for Cascade {
    fn from(op: CascadeOp) -> Cascade {
        match op {
            CascadeOp::Insert => Cascade::INSERT,
            CascadeOp::Update => Cascade::UPDATE,
            CascadeOp::Delete => Cascade::DELETE,
        }
    }
}

impl ops::BitOr for Cascade {
    type Output = Cascade;

    fn bitor(self, rhs: Cascade) -> Cascade {
        Cascade {
            bits: self.bits | rhs.bits,
        }
    }
}

impl ops::BitOrAssign for Cascade {
    fn bitor_assign(&mut self, rhs: Cascade) {
        self.bits |= rhs.bits;
    }
}

impl fmt::Debug for Cascade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = [
            (Cascade::INSERT, "INSERT"),
            (Cascade::UPDATE, "UPDATE"),
            (Cascade::DELETE, "DELETE"),
        ];
        let mut set = f.debug_set();
        for (flag, name) in names {
            if self.contains(flag) {
                set.entry(&format_args!("{name}"));
            }
        }
        set.finish()
    }
}

/// What happens to the previous association when a cascaded update
/// rewrites a relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpdatePolicy {
    /// Remove only the junction rows; previously related rows are kept.
    #[default]
    UnlinkOnly,

    /// Delete the previously related rows (their junction rows go with them).
    DeleteRelated,
}

/// A relation declared on a model field.
#[derive(Debug, Clone, PartialEq)]
pub struct Relation {
    /// Name of the relation-valued field
    pub field: String,

    pub kind: RelationKind,

    pub cascade: Cascade,

    /// Name of the related model. For collection fields this is the element model.
    pub target: String,

    /// Transient fields are never persisted and are skipped by resolution.
    pub transient: bool,

    pub on_update: UpdatePolicy,
}

impl Relation {
    pub fn new(field: impl Into<String>, kind: RelationKind, target: impl Into<String>) -> Relation {
        Relation {
            field: field.into(),
            kind,
            cascade: Cascade::NONE,
            target: target.into(),
            transient: false,
            on_update: UpdatePolicy::default(),
        }
    }

    pub fn one_to_one(field: impl Into<String>, target: impl Into<String>) -> Relation {
        Relation::new(field, RelationKind::OneToOne, target)
    }

    pub fn one_to_many(field: impl Into<String>, target: impl Into<String>) -> Relation {
        Relation::new(field, RelationKind::OneToMany, target)
    }

    pub fn many_to_one(field: impl Into<String>, target: impl Into<String>) -> Relation {
        Relation::new(field, RelationKind::ManyToOne, target)
    }

    pub fn many_to_many(field: impl Into<String>, target: impl Into<String>) -> Relation {
        Relation::new(field, RelationKind::ManyToMany, target)
    }

    pub fn cascade(mut self, cascade: Cascade) -> Relation {
        self.cascade = cascade;
        self
    }

    pub fn on_update(mut self, policy: UpdatePolicy) -> Relation {
        self.on_update = policy;
        self
    }

    pub fn transient(mut self) -> Relation {
        self.transient = true;
        self
    }
}
