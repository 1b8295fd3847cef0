//! Diet plan read model.
//!
//! Generated charts are appended by the generation flow and read back as
//! latest-per-patient. Visibility is role dependent: dietitians review the
//! newest chart whether or not it is published, patients only ever see the
//! newest published one. Publishing is an explicit dietitian action.

use crate::context::AuthContext;
use crate::error::{CoordResult, CoordinationError};
use crate::store::PlanStore;
use aahara_types::Identity;
use chrono::Utc;
use records::{DietPlan, Role};
use std::sync::Arc;

/// Plan operations over the injected plan store.
pub struct PlanService {
    plans: Arc<dyn PlanStore + Send + Sync>,
}

impl PlanService {
    pub fn new(plans: Arc<dyn PlanStore + Send + Sync>) -> Self {
        Self { plans }
    }

    /// Stores a freshly generated chart, unpublished.
    pub fn store_generated(
        &self,
        patient_id: Identity,
        chart: serde_json::Value,
    ) -> CoordResult<DietPlan> {
        let plan = DietPlan::new(patient_id, chart, Utc::now());
        self.plans.append(&plan)?;
        Ok(plan)
    }

    /// The newest plan for `patient_id` visible to the caller.
    ///
    /// Dietitians and admins see unpublished plans; a patient sees only the
    /// newest published plan, and only their own.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinationError::RoleMismatch`] when a patient asks for
    /// another patient's plan.
    pub fn latest(&self, ctx: &AuthContext, patient_id: &Identity) -> CoordResult<Option<DietPlan>> {
        let include_unpublished = match ctx.role {
            Role::Dietitian | Role::Admin => true,
            Role::Patient => {
                if &ctx.user_id != patient_id {
                    return Err(CoordinationError::RoleMismatch {
                        expected: Role::Dietitian,
                        found: ctx.role,
                    });
                }
                false
            }
        };
        self.plans.latest_for_patient(patient_id, include_unpublished)
    }

    /// Publishes the newest plan for `patient_id`.
    ///
    /// Returns `false` when the patient has no plans yet.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinationError::RoleMismatch`] unless the caller is a
    /// dietitian.
    pub fn publish(&self, ctx: &AuthContext, patient_id: &Identity) -> CoordResult<bool> {
        ctx.require_role(Role::Dietitian)?;
        self.plans.publish_latest(patient_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CoreConfig;
    use crate::store::file::FileDocumentStore;
    use serde_json::json;
    use tempfile::TempDir;

    fn service(dir: &TempDir) -> PlanService {
        let cfg = CoreConfig::new(
            dir.path().to_path_buf(),
            "http://localhost:8001".to_string(),
        )
        .expect("valid config");
        PlanService::new(Arc::new(FileDocumentStore::new(&cfg)))
    }

    fn dietitian_ctx() -> AuthContext {
        AuthContext::new(Identity::parse("uid-d1").unwrap(), Role::Dietitian)
    }

    fn patient_ctx(id: &str) -> AuthContext {
        AuthContext::new(Identity::parse(id).unwrap(), Role::Patient)
    }

    #[test]
    fn stored_plans_start_unpublished() {
        let dir = TempDir::new().expect("tempdir");
        let service = service(&dir);
        let p1 = Identity::parse("uid-p1").unwrap();

        let plan = service
            .store_generated(p1.clone(), json!({"week": 1}))
            .expect("store plan");
        assert!(!plan.published);

        let dietitian_view = service
            .latest(&dietitian_ctx(), &p1)
            .expect("dietitian read");
        assert!(dietitian_view.is_some());

        let patient_view = service.latest(&patient_ctx("uid-p1"), &p1).expect("patient read");
        assert!(patient_view.is_none(), "unpublished plans are invisible to patients");
    }

    #[test]
    fn publish_makes_the_plan_patient_visible() {
        let dir = TempDir::new().expect("tempdir");
        let service = service(&dir);
        let p1 = Identity::parse("uid-p1").unwrap();

        service
            .store_generated(p1.clone(), json!({"week": 1}))
            .expect("store plan");
        assert!(service.publish(&dietitian_ctx(), &p1).expect("publish"));

        let patient_view = service
            .latest(&patient_ctx("uid-p1"), &p1)
            .expect("patient read")
            .expect("published plan is visible");
        assert_eq!(patient_view.chart, json!({"week": 1}));
    }

    #[test]
    fn publish_with_no_plans_reports_absence() {
        let dir = TempDir::new().expect("tempdir");
        let service = service(&dir);
        let p1 = Identity::parse("uid-p1").unwrap();

        assert!(!service.publish(&dietitian_ctx(), &p1).expect("publish"));
    }

    #[test]
    fn patients_cannot_publish_or_read_others_plans() {
        let dir = TempDir::new().expect("tempdir");
        let service = service(&dir);
        let p1 = Identity::parse("uid-p1").unwrap();

        let err = service
            .publish(&patient_ctx("uid-p1"), &p1)
            .expect_err("patients cannot publish");
        assert!(matches!(err, CoordinationError::RoleMismatch { .. }));

        let err = service
            .latest(&patient_ctx("uid-p2"), &p1)
            .expect_err("patients cannot read others' plans");
        assert!(matches!(err, CoordinationError::RoleMismatch { .. }));
    }
}
