//! Lead storage.
//!
//! Kept behind a trait so a durable backing store can be substituted
//! without touching the flows above it. The in-memory implementation is
//! the whole persistence story in this scope; nothing survives a restart.

use anyhow::Result;
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::HashMap;
use uuid::Uuid;

use crate::domain::leads::{Lead, LeadAnnotation, NewLead};

pub trait LeadStore: Send + Sync {
    /// Assigns the identifier and creation timestamp.
    fn create(&self, new: NewLead) -> Result<Lead>;
    fn get(&self, id: Uuid) -> Result<Option<Lead>>;
    /// Newest first.
    fn list(&self) -> Result<Vec<Lead>>;
    fn annotate(&self, id: Uuid, annotation: LeadAnnotation) -> Result<Option<Lead>>;
}

#[derive(Default)]
pub struct MemStore {
    leads: RwLock<HashMap<Uuid, Lead>>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LeadStore for MemStore {
    fn create(&self, new: NewLead) -> Result<Lead> {
        let lead = Lead {
            id: Uuid::new_v4(),
            name: new.name,
            contact: new.contact,
            material: new.material,
            width: new.width,
            height: new.height,
            piece_count: new.piece_count,
            installation: new.installation,
            rush: new.rush,
            comments: new.comments,
            quote_total: new.quote_total,
            interest_level: new.interest_level,
            classification_reasoning: new.classification_reasoning,
            created_at: Utc::now(),
        };
        self.leads.write().insert(lead.id, lead.clone());
        Ok(lead)
    }

    fn get(&self, id: Uuid) -> Result<Option<Lead>> {
        Ok(self.leads.read().get(&id).cloned())
    }

    fn list(&self) -> Result<Vec<Lead>> {
        let mut leads: Vec<Lead> = self.leads.read().values().cloned().collect();
        leads.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(leads)
    }

    fn annotate(&self, id: Uuid, annotation: LeadAnnotation) -> Result<Option<Lead>> {
        let mut leads = self.leads.write();
        let Some(lead) = leads.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(level) = annotation.interest_level {
            lead.interest_level = level;
        }
        if let Some(reasoning) = annotation.classification_reasoning {
            lead.classification_reasoning = Some(reasoning);
        }
        Ok(Some(lead.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::leads::InterestLevel;

    fn new_lead(name: &str) -> NewLead {
        NewLead {
            name: name.to_string(),
            contact: "555-0100".to_string(),
            material: "lona".to_string(),
            width: 1.0,
            height: 1.0,
            piece_count: 1,
            installation: false,
            rush: false,
            comments: None,
            quote_total: 800.0,
            interest_level: InterestLevel::Medium,
            classification_reasoning: None,
        }
    }

    #[test]
    fn create_assigns_id_and_timestamp() {
        let store = MemStore::new();
        let lead = store.create(new_lead("Ana")).unwrap();

        let fetched = store.get(lead.id).unwrap().unwrap();
        assert_eq!(fetched.name, "Ana");
        assert_eq!(fetched.created_at, lead.created_at);
    }

    #[test]
    fn list_returns_newest_first() {
        let store = MemStore::new();
        let first = store.create(new_lead("first")).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(5));
        let second = store.create(new_lead("second")).unwrap();

        let leads = store.list().unwrap();
        assert_eq!(leads.len(), 2);
        assert_eq!(leads[0].id, second.id);
        assert_eq!(leads[1].id, first.id);
    }

    #[test]
    fn annotate_updates_classification_only() {
        let store = MemStore::new();
        let lead = store.create(new_lead("Ana")).unwrap();

        let updated = store
            .annotate(
                lead.id,
                LeadAnnotation {
                    interest_level: Some(InterestLevel::High),
                    classification_reasoning: Some("manual review".to_string()),
                },
            )
            .unwrap()
            .unwrap();

        assert_eq!(updated.interest_level, InterestLevel::High);
        assert_eq!(
            updated.classification_reasoning.as_deref(),
            Some("manual review")
        );
        assert_eq!(updated.name, "Ana");
    }

    #[test]
    fn annotate_missing_lead_is_none() {
        let store = MemStore::new();
        let result = store.annotate(Uuid::new_v4(), LeadAnnotation::default()).unwrap();
        assert!(result.is_none());
    }
}
