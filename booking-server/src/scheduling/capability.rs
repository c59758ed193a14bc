//! Service -> operator capability relation.

use std::collections::{HashMap, HashSet};

use shared::models::Service;

/// Which operators may perform which services.
///
/// An absent entry means nobody is capable; such a service can never be
/// assigned regardless of availability.
#[derive(Debug, Default)]
pub struct CapabilityMap {
    by_service: HashMap<i64, HashSet<i64>>,
}

impl CapabilityMap {
    pub fn from_services(services: &[Service]) -> Self {
        let by_service = services
            .iter()
            .map(|s| (s.id, s.operator_ids.iter().copied().collect()))
            .collect();
        Self { by_service }
    }

    pub fn can_perform(&self, service_id: i64, operator_id: i64) -> bool {
        self.by_service
            .get(&service_id)
            .is_some_and(|ops| ops.contains(&operator_id))
    }

    /// True when the operator is capable of every listed service.
    pub fn can_perform_all(&self, service_ids: &[i64], operator_id: i64) -> bool {
        service_ids.iter().all(|&s| self.can_perform(s, operator_id))
    }
}
