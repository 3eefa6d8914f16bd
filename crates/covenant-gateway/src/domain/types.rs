//! Request DTOs.
//!
//! Input accepts both the current camelCase names and the legacy snake_case
//! forms; unknown fields are ignored. Responses reuse the core entities,
//! which emit camelCase only.

use covenant_core::service::auth::AuthFields;
use covenant_core::{ContractStep, StepInput};
use serde::Deserialize;
use serde_json::Value;

/// Body of `PUT /user/create`.
#[derive(Clone, Debug, Deserialize)]
pub struct CreateUserRequest {
    #[serde(deserialize_with = "covenant_core::domain::time::timestamp_compat::deserialize")]
    pub timestamp: String,
    #[serde(rename = "pubKey", alias = "pub_key")]
    pub pub_key: String,
    pub signature: String,
}

/// Query string of `GET /user/:uuid`.
#[derive(Clone, Debug, Deserialize)]
pub struct UserAuthQuery {
    pub timestamp: String,
    pub signature: String,
}

/// Body of `POST /contract`.
#[derive(Clone, Debug, Deserialize)]
pub struct CreateContractRequest {
    #[serde(flatten)]
    pub auth: AuthFields,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub participants: Vec<String>,
    pub steps: Vec<StepInput>,
    #[serde(default, rename = "productUuid", alias = "product_uuid")]
    pub product_uuid: Option<String>,
    #[serde(default, rename = "bdoLocation", alias = "bdo_location")]
    pub bdo_location: Option<String>,
}

/// Body of `PUT /contract/:uuid`. Fields beyond these four are ignored.
#[derive(Clone, Debug, Deserialize)]
pub struct UpdateContractRequest {
    #[serde(flatten)]
    pub auth: AuthFields,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub steps: Option<Vec<ContractStep>>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Body of `PUT /contract/:uuid/sign`.
#[derive(Clone, Debug, Deserialize)]
pub struct SignStepRequest {
    #[serde(flatten)]
    pub auth: AuthFields,
    #[serde(rename = "stepId", alias = "step_id")]
    pub step_id: String,
    #[serde(rename = "stepSignature", alias = "step_signature")]
    pub step_signature: String,
}

/// Body of `DELETE /contract/:uuid`.
#[derive(Clone, Debug, Deserialize)]
pub struct DeleteContractRequest {
    #[serde(flatten)]
    pub auth: AuthFields,
}

/// Query string of `GET /contracts`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ListContractsQuery {
    #[serde(default)]
    pub participant: Option<String>,
}

/// Query string of `GET /contract/:uuid/status`.
#[derive(Clone, Debug, Deserialize)]
pub struct SignatureStatusQuery {
    pub user: String,
}

/// A resolver-routed spell: the caster's signature was verified upstream.
#[derive(Clone, Debug, Deserialize)]
pub struct SpellPayload {
    /// Logical call arguments.
    #[serde(default)]
    pub components: Value,
    #[serde(deserialize_with = "covenant_core::domain::time::timestamp_compat::deserialize")]
    pub timestamp: String,
    #[serde(rename = "casterSignature", alias = "caster_signature")]
    pub caster_signature: String,
}

/// Components of the `userCreate` spell.
#[derive(Clone, Debug, Deserialize)]
pub struct UserCreateComponents {
    #[serde(rename = "pubKey", alias = "pub_key")]
    pub pub_key: String,
}

/// Components of the `contractCreate` spell.
#[derive(Clone, Debug, Deserialize)]
pub struct ContractCreateComponents {
    #[serde(rename = "userUUID", alias = "userUuid", alias = "user_uuid")]
    pub user_uuid: String,
    #[serde(rename = "pubKey", alias = "pub_key")]
    pub pub_key: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub participants: Vec<String>,
    pub steps: Vec<StepInput>,
    #[serde(default, rename = "productUuid", alias = "product_uuid")]
    pub product_uuid: Option<String>,
    #[serde(default, rename = "bdoLocation", alias = "bdo_location")]
    pub bdo_location: Option<String>,
}

/// Components of the `contractUpdate` spell.
#[derive(Clone, Debug, Deserialize)]
pub struct ContractUpdateComponents {
    #[serde(rename = "userUUID", alias = "userUuid", alias = "user_uuid")]
    pub user_uuid: String,
    #[serde(rename = "pubKey", alias = "pub_key")]
    pub pub_key: String,
    #[serde(rename = "contractUUID", alias = "contractUuid", alias = "contract_uuid")]
    pub contract_uuid: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub steps: Option<Vec<ContractStep>>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Components of the `contractSign` spell. Carries an additional pre-signed
/// step signature.
#[derive(Clone, Debug, Deserialize)]
pub struct ContractSignComponents {
    #[serde(rename = "userUUID", alias = "userUuid", alias = "user_uuid")]
    pub user_uuid: String,
    #[serde(rename = "pubKey", alias = "pub_key")]
    pub pub_key: String,
    #[serde(rename = "contractUUID", alias = "contractUuid", alias = "contract_uuid")]
    pub contract_uuid: String,
    #[serde(rename = "stepId", alias = "step_id")]
    pub step_id: String,
    #[serde(rename = "stepSignature", alias = "step_signature")]
    pub step_signature: String,
}

/// Components of the `contractDelete` spell.
#[derive(Clone, Debug, Deserialize)]
pub struct ContractDeleteComponents {
    #[serde(rename = "userUUID", alias = "userUuid", alias = "user_uuid")]
    pub user_uuid: String,
    #[serde(rename = "pubKey", alias = "pub_key")]
    pub pub_key: String,
    #[serde(rename = "contractUUID", alias = "contractUuid", alias = "contract_uuid")]
    pub contract_uuid: String,
}

/// Components of the `purchaseLesson` spell. The student is the caster.
#[derive(Clone, Debug, Deserialize)]
pub struct PurchaseLessonComponents {
    #[serde(rename = "userUUID", alias = "userUuid", alias = "user_uuid")]
    pub user_uuid: String,
    #[serde(rename = "teacherPubKey", alias = "teacher_pub_key")]
    pub teacher_pub_key: String,
    #[serde(rename = "studentPubKey", alias = "student_pub_key")]
    pub student_pub_key: String,
    #[serde(rename = "lessonTitle", alias = "lesson_title")]
    pub lesson_title: String,
    #[serde(default)]
    pub amount: Option<u64>,
}
