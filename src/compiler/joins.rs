//! Star-join planning
//!
//! Reference relations (clients, programs) hang off a single fact relation
//! (enrollments or opportunities). A query may read from at most one fact.

use crate::request::EntityType;
use crate::spec::{Join, Relation};
use super::error::CompileError;

/// Relations a compiled query needs, relative to its base
#[derive(Debug)]
pub(super) struct JoinPlan {
    entity_type: EntityType,
    base: Relation,
    fact: Option<Relation>,
    references: Vec<Relation>,
}

impl JoinPlan {
    pub fn new(entity_type: EntityType) -> Self {
        Self {
            entity_type,
            base: Relation::for_entity(entity_type),
            fact: None,
            references: Vec::new(),
        }
    }

    pub fn base(&self) -> Relation {
        self.base
    }

    /// Require `relation` on behalf of request field `field`
    pub fn require(&mut self, relation: Relation, field: &str, value: &str) -> Result<(), CompileError> {
        if relation == self.base {
            return Ok(());
        }

        if relation.is_fact() {
            let conflict = if self.base.is_fact() {
                Some(self.base)
            } else {
                self.fact.filter(|f| *f != relation)
            };
            if let Some(other) = conflict {
                return Err(CompileError::unsupported(
                    field,
                    value,
                    self.entity_type,
                    format!("needs {} which cannot be combined with {}", relation.table(), other.table()),
                ));
            }
            self.fact = Some(relation);
        } else if !self.references.contains(&relation) {
            self.references.push(relation);
        }
        Ok(())
    }

    /// Inner joins from the base, fact first
    pub fn into_joins(self) -> Vec<Join> {
        let mut joins = Vec::new();

        let hub = if self.base.is_fact() {
            self.base
        } else {
            let bridge = match self.fact {
                Some(fact) => fact,
                None if !self.references.is_empty() => Relation::Enrollments,
                None => return joins,
            };
            joins.push(Join {
                relation: bridge,
                left_key: bridge.column(self.base.key()),
                right_key: self.base.column(self.base.key()),
            });
            bridge
        };

        for relation in self.references {
            joins.push(Join {
                relation,
                left_key: relation.column(relation.key()),
                right_key: hub.column(relation.key()),
            });
        }
        joins
    }
}
