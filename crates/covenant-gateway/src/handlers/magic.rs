//! Effect-resolver entry path.
//!
//! Spells arrive with a `casterSignature` already verified by the resolver
//! upstream. The adapter translates components into the same core
//! operations the direct endpoints use; the auth gate still runs and
//! accepts the supplied signature on the caster's behalf. Spell failures
//! answer HTTP 200 with the resolver code 900 in the body.

use super::AppState;
use crate::domain::error::{spell_failure, success};
use crate::domain::types::{
    ContractCreateComponents, ContractDeleteComponents, ContractSignComponents,
    ContractUpdateComponents, PurchaseLessonComponents, SpellPayload, UserCreateComponents,
};
use axum::extract::{Path, State};
use axum::response::Response;
use axum::Json;
use covenant_core::service::auth::AuthFields;
use covenant_core::{
    CovenantError, CreateContractInput, SignStepInput, StepInput, UpdateContractInput,
};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::info;

/// `POST /magic/spell/:name` - dispatch one spell.
pub async fn cast_spell(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(spell): Json<SpellPayload>,
) -> Response {
    info!(spell = %name, "spell received");
    let result = dispatch(&state, &name, spell).await;
    match result {
        Ok(response) => response,
        Err(err) => spell_failure(err.to_string()),
    }
}

async fn dispatch(
    state: &AppState,
    name: &str,
    spell: SpellPayload,
) -> Result<Response, CovenantError> {
    match name {
        "userCreate" => {
            let c: UserCreateComponents = components(&spell)?;
            let user = state
                .service
                .create_user(&c.pub_key, &spell.timestamp, &spell.caster_signature)
                .await?;
            Ok(success(user))
        }
        "contractCreate" => {
            let c: ContractCreateComponents = components(&spell)?;
            let auth = caster_auth(&spell, c.user_uuid, c.pub_key);
            let input = CreateContractInput {
                title: c.title,
                description: c.description,
                participants: c.participants,
                steps: c.steps,
                product_uuid: c.product_uuid,
                bdo_location: c.bdo_location,
            };
            let contract = state.service.create_contract(&auth, input).await?;
            Ok(success(contract))
        }
        "contractUpdate" => {
            let c: ContractUpdateComponents = components(&spell)?;
            let auth = caster_auth(&spell, c.user_uuid, c.pub_key);
            let input = UpdateContractInput {
                title: c.title,
                description: c.description,
                steps: c.steps,
                status: c.status,
            };
            let contract = state
                .service
                .update_contract(&c.contract_uuid, &auth, input)
                .await?;
            Ok(success(contract))
        }
        "contractSign" => {
            let c: ContractSignComponents = components(&spell)?;
            let auth = caster_auth(&spell, c.user_uuid, c.pub_key);
            let input = SignStepInput {
                step_id: c.step_id,
                step_signature: c.step_signature,
            };
            let outcome = state
                .service
                .sign_step(&c.contract_uuid, &auth, input)
                .await?;
            Ok(success(outcome))
        }
        "contractDelete" => {
            let c: ContractDeleteComponents = components(&spell)?;
            let auth = caster_auth(&spell, c.user_uuid, c.pub_key);
            state
                .service
                .delete_contract(&c.contract_uuid, &auth)
                .await?;
            Ok(success(json!({ "uuid": c.contract_uuid, "deleted": true })))
        }
        "purchaseLesson" => {
            let c: PurchaseLessonComponents = components(&spell)?;
            let auth = caster_auth(&spell, c.user_uuid.clone(), c.student_pub_key.clone());
            let input = lesson_contract(c);
            let contract = state.service.create_contract(&auth, input).await?;
            Ok(success(contract))
        }
        other => Err(CovenantError::Validation(format!("unknown spell: {other}"))),
    }
}

/// Decode the component map into the spell's argument struct.
fn components<T: DeserializeOwned>(spell: &SpellPayload) -> Result<T, CovenantError> {
    serde_json::from_value(spell.components.clone())
        .map_err(|e| CovenantError::Validation(format!("malformed spell components: {e}")))
}

/// Auth fields as if the caster had called the endpoint directly.
fn caster_auth(spell: &SpellPayload, user_uuid: String, pub_key: String) -> AuthFields {
    AuthFields {
        signature: spell.caster_signature.clone(),
        timestamp: spell.timestamp.clone(),
        user_uuid,
        pub_key,
    }
}

/// The five-step lesson template. The payment step carries the effect
/// descriptor that settles on completion.
fn lesson_contract(c: PurchaseLessonComponents) -> CreateContractInput {
    let step = |description: &str, magic_spell: Option<serde_json::Value>| StepInput {
        id: None,
        description: description.to_string(),
        magic_spell,
    };
    CreateContractInput {
        title: format!("Lesson: {}", c.lesson_title),
        description: format!("Lesson agreement for {}", c.lesson_title),
        participants: vec![c.teacher_pub_key, c.student_pub_key],
        steps: vec![
            step("Lesson scheduled", None),
            step("Lesson attended", None),
            step("Materials delivered", None),
            step(
                "Payment settled",
                Some(json!({
                    "type": "payment",
                    "amount": c.amount.unwrap_or(0),
                })),
            ),
            step("Lesson reviewed", None),
        ],
        product_uuid: None,
        bdo_location: None,
    }
}
