//! Assignment and hour-allocation use cases.
//!
//! # Responsibility
//! - Assign teachers and assistants to establishments.
//! - Record bienniums.
//! - Summarize a teacher's hours per subsidy against their declared load.
//!
//! # Invariants
//! - Summaries only read; they never modify stored records.
//! - Hour sums saturate instead of overflowing.

use crate::model::assignment::{AssistantAssignment, Biennium, TeacherAssignment};
use crate::model::choices::SubsidyType;
use crate::model::establishment::Rbd;
use crate::model::person::PersonId;
use crate::model::staff::SubsidyHours;
use crate::repo::assignment_repo::AssignmentRepository;
use crate::repo::staff_repo::StaffRepository;
use crate::service::{error_code, ServiceError, ServiceResult};
use chrono::NaiveDate;
use log::{info, warn};
use serde::Serialize;

/// Request model for placing a teacher at an establishment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeacherAssignmentRequest {
    pub teacher_id: PersonId,
    pub rbd: Rbd,
    pub subsidy_hours: SubsidyHours,
    pub contract_hours: u32,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Hour allocation overview for one teacher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HourSummary {
    pub teacher_id: PersonId,
    /// Hours declared on the teacher record.
    pub declared: SubsidyHours,
    pub declared_contract_hours: u32,
    /// Sum over the counted assignments.
    pub assigned: SubsidyHours,
    pub assigned_contract_hours: u32,
    /// Number of assignments included in `assigned`.
    pub assignment_count: usize,
    /// Sum of accrued hours over every recorded biennium.
    pub accrued_biennium_hours: u32,
}

impl HourSummary {
    /// Subsidies whose assigned hours exceed the declared ones.
    pub fn over_allocated(&self) -> Vec<SubsidyType> {
        SubsidyType::all()
            .filter(|subsidy| self.assigned.get(*subsidy) > self.declared.get(*subsidy))
            .collect()
    }

    /// Declared minus assigned for one subsidy; negative when over-allocated.
    pub fn remaining(&self, subsidy: SubsidyType) -> i64 {
        i64::from(self.declared.get(subsidy)) - i64::from(self.assigned.get(subsidy))
    }
}

/// Facade over assignment and staff repositories.
pub struct AssignmentService<A: AssignmentRepository, S: StaffRepository> {
    assignments: A,
    staff: S,
}

impl<A: AssignmentRepository, S: StaffRepository> AssignmentService<A, S> {
    pub fn new(assignments: A, staff: S) -> Self {
        Self { assignments, staff }
    }

    pub fn assign_teacher(
        &self,
        request: &TeacherAssignmentRequest,
    ) -> ServiceResult<TeacherAssignment> {
        let mut assignment =
            TeacherAssignment::new(request.teacher_id, request.rbd, request.start, request.end);
        assignment.subsidy_hours = request.subsidy_hours;
        assignment.contract_hours = request.contract_hours;

        match self.assignments.create_teacher_assignment(&assignment) {
            Ok(_) => {
                info!(
                    "event=teacher_assign module=service status=ok person_id={} rbd={} assignment_id={}",
                    request.teacher_id, request.rbd, assignment.id
                );
                Ok(assignment)
            }
            Err(err) => {
                let err = ServiceError::from(err);
                warn!(
                    "event=teacher_assign module=service status=error person_id={} rbd={} error_code={}",
                    request.teacher_id,
                    request.rbd,
                    error_code(&err)
                );
                Err(err)
            }
        }
    }

    pub fn assign_assistant(
        &self,
        assistant_id: PersonId,
        rbd: Rbd,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ServiceResult<AssistantAssignment> {
        let assignment = AssistantAssignment::new(assistant_id, rbd, start, end);
        self.assignments.create_assistant_assignment(&assignment)?;
        info!(
            "event=assistant_assign module=service status=ok person_id={assistant_id} rbd={rbd} assignment_id={}",
            assignment.id
        );
        Ok(assignment)
    }

    pub fn record_biennium(
        &self,
        teacher_id: PersonId,
        start: NaiveDate,
        end: NaiveDate,
        accrued_hours: u32,
    ) -> ServiceResult<Biennium> {
        let biennium = Biennium::new(teacher_id, start, end, accrued_hours);
        self.assignments.create_biennium(&biennium)?;
        Ok(biennium)
    }

    pub fn teacher_assignments(&self, teacher_id: PersonId) -> ServiceResult<Vec<TeacherAssignment>> {
        Ok(self.assignments.list_teacher_assignments(teacher_id)?)
    }

    pub fn assistant_assignments(
        &self,
        assistant_id: PersonId,
    ) -> ServiceResult<Vec<AssistantAssignment>> {
        Ok(self.assignments.list_assistant_assignments(assistant_id)?)
    }

    pub fn bienniums(&self, teacher_id: PersonId) -> ServiceResult<Vec<Biennium>> {
        Ok(self.assignments.list_bienniums(teacher_id)?)
    }

    /// Summarizes a teacher's hours.
    ///
    /// With `on = Some(day)` only assignments covering `day` are counted;
    /// with `None` every assignment is. Bienniums are always fully counted.
    pub fn hour_summary(
        &self,
        teacher_id: PersonId,
        on: Option<NaiveDate>,
    ) -> ServiceResult<HourSummary> {
        let teacher = self
            .staff
            .get_teacher(teacher_id)?
            .ok_or_else(|| ServiceError::teacher_not_found(teacher_id))?;

        let counted: Vec<TeacherAssignment> = self
            .assignments
            .list_teacher_assignments(teacher_id)?
            .into_iter()
            .filter(|assignment| on.map_or(true, |day| assignment.is_active_on(day)))
            .collect();

        let assigned = counted
            .iter()
            .fold(SubsidyHours::default(), |sum, assignment| {
                sum.saturating_add(assignment.subsidy_hours)
            });
        let assigned_contract_hours = counted
            .iter()
            .fold(0u32, |sum, assignment| sum.saturating_add(assignment.contract_hours));
        let accrued_biennium_hours = self
            .assignments
            .list_bienniums(teacher_id)?
            .iter()
            .fold(0u32, |sum, biennium| sum.saturating_add(biennium.accrued_hours));

        Ok(HourSummary {
            teacher_id,
            declared: teacher.subsidy_hours,
            declared_contract_hours: teacher.contract_hours,
            assigned,
            assigned_contract_hours,
            assignment_count: counted.len(),
            accrued_biennium_hours,
        })
    }
}
