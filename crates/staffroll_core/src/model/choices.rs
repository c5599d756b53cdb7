//! Closed choice sets for staff records.
//!
//! Every enum round-trips through a stable lowercase storage code and has a
//! user-facing display label. Codes are the values persisted in SQLite and
//! used by serde.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Staff role within an establishment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "director")]
    Director,
    #[serde(rename = "docente_aula")]
    ClassroomTeacher,
    #[serde(rename = "profesor_encargado")]
    TeacherInCharge,
    #[serde(rename = "inspector_general")]
    GeneralInspector,
    #[serde(rename = "jefe_utp")]
    HeadOfCurriculum,
    #[serde(rename = "apoyo_utp")]
    CurriculumSupport,
    #[serde(rename = "fonoaudiologo")]
    SpeechTherapist,
    #[serde(rename = "psicologo")]
    Psychologist,
    #[serde(rename = "educadora_diferencial")]
    SpecialEducator,
    #[serde(rename = "trabajador_social")]
    SocialWorker,
    #[serde(rename = "facilitador_intercultural")]
    InterculturalFacilitator,
    #[serde(rename = "auxiliares_servicio_menor")]
    ServiceAuxiliary,
    #[serde(rename = "profesor_especialista")]
    SpecialistTeacher,
    #[serde(rename = "administrativo")]
    Administrative,
}

const ROLE_TABLE: &[(Role, &str, &str)] = &[
    (Role::Director, "director", "Director"),
    (Role::ClassroomTeacher, "docente_aula", "Docente de Aula"),
    (Role::TeacherInCharge, "profesor_encargado", "Profesor Encargado"),
    (Role::GeneralInspector, "inspector_general", "Inspector General"),
    (Role::HeadOfCurriculum, "jefe_utp", "Jefe UTP"),
    (Role::CurriculumSupport, "apoyo_utp", "Apoyo UTP"),
    (Role::SpeechTherapist, "fonoaudiologo", "Fonoaudiólogo"),
    (Role::Psychologist, "psicologo", "Psicólogo"),
    (Role::SpecialEducator, "educadora_diferencial", "Educadora Diferencial"),
    (Role::SocialWorker, "trabajador_social", "Trabajador Social"),
    (
        Role::InterculturalFacilitator,
        "facilitador_intercultural",
        "Facilitador Intercultural",
    ),
    (
        Role::ServiceAuxiliary,
        "auxiliares_servicio_menor",
        "Auxiliar de Servicio Menor",
    ),
    (
        Role::SpecialistTeacher,
        "profesor_especialista",
        "Profesor Especialista",
    ),
    (Role::Administrative, "administrativo", "Administrativo"),
];

/// Employment contract kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContractType {
    #[serde(rename = "titular")]
    Tenured,
    #[serde(rename = "contrata")]
    FixedTerm,
}

const CONTRACT_TYPE_TABLE: &[(ContractType, &str, &str)] = &[
    (ContractType::Tenured, "titular", "Titular"),
    (ContractType::FixedTerm, "contrata", "Contrata"),
];

/// Funding source that hour allocations are tracked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubsidyType {
    /// General subsidy.
    Normal,
    /// Preferential (targeted) subsidy.
    Sep,
    /// School integration program (special education).
    Pie,
}

const SUBSIDY_TYPE_TABLE: &[(SubsidyType, &str, &str)] = &[
    (SubsidyType::Normal, "normal", "Normal"),
    (SubsidyType::Sep, "sep", "SEP"),
    (SubsidyType::Pie, "pie", "PIE"),
];

/// Whether a required document has been delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentState {
    #[serde(rename = "si")]
    Yes,
    #[serde(rename = "no")]
    No,
    #[serde(rename = "na")]
    NotApplicable,
}

const DOCUMENT_STATE_TABLE: &[(DocumentState, &str, &str)] = &[
    (DocumentState::Yes, "si", "Sí"),
    (DocumentState::No, "no", "No"),
    (DocumentState::NotApplicable, "na", "No Aplica"),
];

macro_rules! choice_lookup {
    ($ty:ty, $table:ident) => {
        impl $ty {
            /// All variants in display order.
            pub fn all() -> impl Iterator<Item = $ty> {
                $table.iter().map(|(value, _, _)| *value)
            }

            /// Stable storage code.
            pub fn as_code(self) -> &'static str {
                $table
                    .iter()
                    .find(|(value, _, _)| *value == self)
                    .map_or("", |(_, code, _)| *code)
            }

            /// User-facing label.
            pub fn label(self) -> &'static str {
                $table
                    .iter()
                    .find(|(value, _, _)| *value == self)
                    .map_or("", |(_, _, label)| *label)
            }

            /// Parses a storage code. Matching is exact.
            pub fn from_code(code: &str) -> Option<Self> {
                $table
                    .iter()
                    .find(|(_, candidate, _)| *candidate == code)
                    .map(|(value, _, _)| *value)
            }
        }

        impl Display for $ty {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

choice_lookup!(Role, ROLE_TABLE);
choice_lookup!(ContractType, CONTRACT_TYPE_TABLE);
choice_lookup!(SubsidyType, SUBSIDY_TYPE_TABLE);
choice_lookup!(DocumentState, DOCUMENT_STATE_TABLE);
