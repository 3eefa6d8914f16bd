//! Service-level lifecycle scenarios.
//!
//! Each test drives the assembled service the way the HTTP surface would,
//! then checks the universal invariants: one signature slot per
//! participant, completion iff fully signed, completion monotone, key
//! stability, and the participant/step lower bounds.

use crate::harness::TestEnv;
use covenant_core::ports::outbound::StepEvent;
use covenant_core::{
    Contract, CovenantError, CreateContractInput, StepInput, UpdateContractInput,
};
use covenant_crypto::Keypair;

fn steps(descriptions: &[&str]) -> Vec<StepInput> {
    descriptions
        .iter()
        .map(|d| StepInput {
            id: None,
            description: d.to_string(),
            magic_spell: None,
        })
        .collect()
}

fn create_input(participants: &[&Keypair], steps: Vec<StepInput>) -> CreateContractInput {
    CreateContractInput {
        title: "Shipping agreement".to_string(),
        description: "Two parties, one obligation".to_string(),
        participants: participants.iter().map(|k| k.public_key_hex()).collect(),
        steps,
        product_uuid: None,
        bdo_location: None,
    }
}

/// Signature-map completeness and bounds, checked on every persisted form.
fn assert_invariants(contract: &Contract) {
    assert!(contract.participants.len() >= 2);
    assert!(!contract.steps.is_empty());
    for step in &contract.steps {
        let mut signers: Vec<_> = step.signatures.keys().cloned().collect();
        let mut participants = contract.participants.clone();
        signers.sort();
        participants.sort();
        assert_eq!(signers, participants);
        assert_eq!(
            step.completed,
            step.signatures.values().all(|s| s.is_some())
        );
    }
}

#[tokio::test]
async fn s1_two_party_single_step_happy_path() {
    let env = TestEnv::new();
    let alice = Keypair::generate();
    let bob = Keypair::generate();

    let auth = env.auth(&alice, "user-alice", None);
    let contract = env
        .service
        .create_contract(&auth, create_input(&[&alice, &bob], steps(&["Ship it"])))
        .await
        .unwrap();
    assert_invariants(&contract);
    let step_id = contract.steps[0].id.clone();

    let auth = env.auth(&alice, "user-alice", Some(&contract.uuid));
    let input = env.step_signature(&alice, &auth, &contract.uuid, &step_id);
    let outcome = env
        .service
        .sign_step(&contract.uuid, &auth, input)
        .await
        .unwrap();
    assert!(!outcome.step_completed);
    assert!(!outcome.magic_triggered);

    let auth = env.auth(&bob, "user-bob", Some(&contract.uuid));
    let input = env.step_signature(&bob, &auth, &contract.uuid, &step_id);
    let outcome = env
        .service
        .sign_step(&contract.uuid, &auth, input)
        .await
        .unwrap();
    assert!(outcome.step_completed);
    assert!(!outcome.magic_triggered);

    let read = env.service.get_contract(&contract.uuid).await.unwrap();
    assert_invariants(&read);
    let step = read.find_step(&step_id).unwrap();
    assert!(step.completed);
    assert!(step.completed_at.is_some());
}

#[tokio::test]
async fn s2_effect_descriptor_triggers_on_completion() {
    let env = TestEnv::new();
    let alice = Keypair::generate();
    let bob = Keypair::generate();
    let spell = serde_json::json!({"type": "payment", "amount": 100});

    let auth = env.auth(&alice, "user-alice", None);
    let mut input = create_input(&[&alice, &bob], steps(&["Pay up"]));
    input.steps[0].magic_spell = Some(spell.clone());
    let contract = env.service.create_contract(&auth, input).await.unwrap();
    let step_id = contract.steps[0].id.clone();

    let auth = env.auth(&alice, "user-alice", Some(&contract.uuid));
    let sig = env.step_signature(&alice, &auth, &contract.uuid, &step_id);
    let outcome = env
        .service
        .sign_step(&contract.uuid, &auth, sig)
        .await
        .unwrap();
    assert!(!outcome.magic_triggered);

    let auth = env.auth(&bob, "user-bob", Some(&contract.uuid));
    let sig = env.step_signature(&bob, &auth, &contract.uuid, &step_id);
    let outcome = env
        .service
        .sign_step(&contract.uuid, &auth, sig)
        .await
        .unwrap();
    assert!(outcome.step_completed);
    assert!(outcome.magic_triggered);

    let events = env.events.events();
    assert!(events.iter().any(|e| matches!(
        e,
        StepEvent::EffectTriggered { spell: s, .. } if s == &spell
    )));
}

#[tokio::test]
async fn s3_unauthorized_signer_leaves_contract_untouched() {
    let env = TestEnv::new();
    let alice = Keypair::generate();
    let bob = Keypair::generate();
    let carol = Keypair::generate();

    let auth = env.auth(&alice, "user-alice", None);
    let contract = env
        .service
        .create_contract(&auth, create_input(&[&alice, &bob], steps(&["Ship it"])))
        .await
        .unwrap();
    let step_id = contract.steps[0].id.clone();

    // Carol's endpoint and step signatures are both genuine, but she holds
    // no slot on this contract.
    let auth = env.auth(&carol, "user-carol", Some(&contract.uuid));
    let sig = env.step_signature(&carol, &auth, &contract.uuid, &step_id);
    let err = env
        .service
        .sign_step(&contract.uuid, &auth, sig)
        .await
        .unwrap_err();
    assert!(matches!(err, CovenantError::Forbidden(_)));

    let read = env.service.get_contract(&contract.uuid).await.unwrap();
    assert!(read.steps[0].signatures.values().all(|s| s.is_none()));
    assert_invariants(&read);
}

#[tokio::test]
async fn s4_forged_step_signature_rejected() {
    let env = TestEnv::new();
    let alice = Keypair::generate();
    let bob = Keypair::generate();

    let auth = env.auth(&alice, "user-alice", None);
    let contract = env
        .service
        .create_contract(&auth, create_input(&[&alice, &bob], steps(&["Ship it"])))
        .await
        .unwrap();
    let step_id = contract.steps[0].id.clone();

    // Alice passes the gate; the step signature is Bob's.
    let auth = env.auth(&alice, "user-alice", Some(&contract.uuid));
    let sig = env.step_signature(&bob, &auth, &contract.uuid, &step_id);
    let err = env
        .service
        .sign_step(&contract.uuid, &auth, sig)
        .await
        .unwrap_err();
    assert!(matches!(err, CovenantError::InvalidStepSignature));
}

#[tokio::test]
async fn s5_create_survives_remote_outage() {
    let env = TestEnv::new();
    let alice = Keypair::generate();
    let bob = Keypair::generate();
    env.remote.set_unavailable(true);

    let auth = env.auth(&alice, "user-alice", None);
    let contract = env
        .service
        .create_contract(&auth, create_input(&[&alice, &bob], steps(&["Ship it"])))
        .await
        .unwrap();

    assert!(contract.pub_key.is_some());
    assert!(contract.remote_id.is_none());

    // Read falls back to the local copy.
    let read = env.service.get_contract(&contract.uuid).await.unwrap();
    assert_eq!(read.uuid, contract.uuid);
    assert_invariants(&read);
}

#[tokio::test]
async fn s6_key_binding_survives_restart() {
    let mut env = TestEnv::new();
    let alice = Keypair::generate();
    let bob = Keypair::generate();

    let auth = env.auth(&alice, "user-alice", None);
    let contract = env
        .service
        .create_contract(&auth, create_input(&[&alice, &bob], steps(&["Ship it"])))
        .await
        .unwrap();
    let bound_key = contract.pub_key.clone().unwrap();

    // Cold caches: everything rebuilt from disk.
    env.reopen();

    let auth = env.auth(&alice, "user-alice", Some(&contract.uuid));
    let updated = env
        .service
        .update_contract(
            &contract.uuid,
            &auth,
            UpdateContractInput {
                title: Some("Renamed after restart".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.pub_key.as_deref(), Some(bound_key.as_str()));
    assert_eq!(
        env.service.store().keys().lookup(&contract.uuid).unwrap(),
        bound_key
    );
}

#[tokio::test]
async fn read_after_create_returns_equal_document() {
    let env = TestEnv::new();
    let alice = Keypair::generate();
    let bob = Keypair::generate();

    let auth = env.auth(&alice, "user-alice", None);
    let created = env
        .service
        .create_contract(&auth, create_input(&[&alice, &bob], steps(&["Ship it"])))
        .await
        .unwrap();

    let read = env.service.get_contract(&created.uuid).await.unwrap();
    assert_eq!(
        serde_json::to_value(&read).unwrap(),
        serde_json::to_value(&created).unwrap()
    );
}

#[tokio::test]
async fn delete_then_read_is_not_found() {
    let env = TestEnv::new();
    let alice = Keypair::generate();
    let bob = Keypair::generate();

    let auth = env.auth(&alice, "user-alice", None);
    let contract = env
        .service
        .create_contract(&auth, create_input(&[&alice, &bob], steps(&["Ship it"])))
        .await
        .unwrap();

    let auth = env.auth(&alice, "user-alice", Some(&contract.uuid));
    env.service
        .delete_contract(&contract.uuid, &auth)
        .await
        .unwrap();

    assert!(matches!(
        env.service.get_contract(&contract.uuid).await,
        Err(CovenantError::ContractNotFound { .. })
    ));
}

#[tokio::test]
async fn completion_is_monotone_across_updates() {
    let env = TestEnv::new();
    let alice = Keypair::generate();
    let bob = Keypair::generate();

    let auth = env.auth(&alice, "user-alice", None);
    let contract = env
        .service
        .create_contract(
            &auth,
            create_input(&[&alice, &bob], steps(&["First", "Second"])),
        )
        .await
        .unwrap();
    let first_step = contract.steps[0].id.clone();

    for (keypair, user) in [(&alice, "user-alice"), (&bob, "user-bob")] {
        let auth = env.auth(keypair, user, Some(&contract.uuid));
        let sig = env.step_signature(keypair, &auth, &contract.uuid, &first_step);
        env.service
            .sign_step(&contract.uuid, &auth, sig)
            .await
            .unwrap();
    }

    // An unrelated update must not regress the completed step.
    let auth = env.auth(&alice, "user-alice", Some(&contract.uuid));
    let updated = env
        .service
        .update_contract(
            &contract.uuid,
            &auth,
            UpdateContractInput {
                description: Some("amended".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(updated.steps[0].completed);
    assert_invariants(&updated);
}

#[tokio::test]
async fn multi_step_contract_progresses_step_by_step() {
    let env = TestEnv::new();
    let alice = Keypair::generate();
    let bob = Keypair::generate();

    let auth = env.auth(&alice, "user-alice", None);
    let contract = env
        .service
        .create_contract(
            &auth,
            create_input(&[&alice, &bob], steps(&["Draft", "Review", "Ship"])),
        )
        .await
        .unwrap();

    for (index, step) in contract.steps.iter().enumerate() {
        for (keypair, user) in [(&alice, "user-alice"), (&bob, "user-bob")] {
            let auth = env.auth(keypair, user, Some(&contract.uuid));
            let sig = env.step_signature(keypair, &auth, &contract.uuid, &step.id);
            env.service
                .sign_step(&contract.uuid, &auth, sig)
                .await
                .unwrap();
        }
        let progress = env.service.contract_progress(&contract.uuid).await.unwrap();
        assert_eq!(progress.completed_steps, index + 1);
    }

    let progress = env.service.contract_progress(&contract.uuid).await.unwrap();
    assert!(progress.is_complete);
}

#[tokio::test]
async fn signature_status_tracks_one_participant() {
    let env = TestEnv::new();
    let alice = Keypair::generate();
    let bob = Keypair::generate();

    let auth = env.auth(&alice, "user-alice", None);
    let contract = env
        .service
        .create_contract(
            &auth,
            create_input(&[&alice, &bob], steps(&["First", "Second"])),
        )
        .await
        .unwrap();
    let first_step = contract.steps[0].id.clone();

    let auth = env.auth(&alice, "user-alice", Some(&contract.uuid));
    let sig = env.step_signature(&alice, &auth, &contract.uuid, &first_step);
    env.service
        .sign_step(&contract.uuid, &auth, sig)
        .await
        .unwrap();

    let status = env
        .service
        .signature_status(&contract.uuid, &alice.public_key_hex())
        .await
        .unwrap();
    assert_eq!(status.len(), 2);
    assert!(status[0].has_signed);
    assert!(!status[0].is_completed);
    assert!(!status[1].has_signed);

    let status = env
        .service
        .signature_status(&contract.uuid, &bob.public_key_hex())
        .await
        .unwrap();
    assert!(!status[0].has_signed);
}

#[tokio::test]
async fn concurrent_signing_serializes_per_contract() {
    let env = TestEnv::new();
    let alice = Keypair::generate();
    let bob = Keypair::generate();

    let auth = env.auth(&alice, "user-alice", None);
    let contract = env
        .service
        .create_contract(&auth, create_input(&[&alice, &bob], steps(&["Ship it"])))
        .await
        .unwrap();
    let step_id = contract.steps[0].id.clone();

    let alice_auth = env.auth(&alice, "user-alice", Some(&contract.uuid));
    let alice_sig = env.step_signature(&alice, &alice_auth, &contract.uuid, &step_id);
    let bob_auth = env.auth(&bob, "user-bob", Some(&contract.uuid));
    let bob_sig = env.step_signature(&bob, &bob_auth, &contract.uuid, &step_id);

    let (first, second) = tokio::join!(
        env.service.sign_step(&contract.uuid, &alice_auth, alice_sig),
        env.service.sign_step(&contract.uuid, &bob_auth, bob_sig),
    );
    let outcomes = [first.unwrap(), second.unwrap()];

    // Exactly one of the two serialized writes observes completion.
    assert_eq!(
        outcomes.iter().filter(|o| o.step_completed).count(),
        1,
        "exactly one signer completes the step"
    );
    let read = env.service.get_contract(&contract.uuid).await.unwrap();
    assert!(read.steps[0].completed);
    assert_invariants(&read);
}
