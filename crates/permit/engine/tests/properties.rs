//! Property tests: approval history and terminal states under arbitrary decision sequences.

use permit_engine::*;
use permit_types::*;
use proptest::prelude::*;
use std::collections::HashMap;

// ---------------------------------------------------------------------------
// Helpers / Strategies
// ---------------------------------------------------------------------------

const CATALOG_IDS: [&str; 7] = [
    "User.Read",
    "User.ReadWrite",
    "Mail.Read",
    "Mail.Send",
    "Application.Read.All",
    "Directory.Read.All",
    "Group.Read.All",
];

fn arb_stage() -> impl Strategy<Value = ApprovalStage> {
    prop_oneof![
        Just(ApprovalStage::Business),
        Just(ApprovalStage::Technical),
        Just(ApprovalStage::AmTeam),
    ]
}

fn arb_decision() -> impl Strategy<Value = Decision> {
    prop_oneof![Just(Decision::Approved), Just(Decision::Denied)]
}

fn arb_ops() -> impl Strategy<Value = Vec<(Decision, ApprovalStage)>> {
    prop::collection::vec((arb_decision(), arb_stage()), 0..12)
}

fn arb_access_type() -> impl Strategy<Value = AccessType> {
    prop_oneof![
        Just(AccessType::Application),
        Just(AccessType::Delegated),
        Just(AccessType::Both),
        Just(AccessType::None),
    ]
}

/// A selection of catalog ids, each with an optional type and justification
fn arb_selection() -> impl Strategy<Value = Vec<(String, Option<AccessType>, Option<String>)>> {
    prop::sample::subsequence(CATALOG_IDS.to_vec(), 0..=CATALOG_IDS.len()).prop_flat_map(|ids| {
        let n = ids.len();
        (
            Just(ids),
            prop::collection::vec(prop::option::of(arb_access_type()), n),
            prop::collection::vec(prop::option::of("[ a-z]{0,8}"), n),
        )
            .prop_map(|(ids, types, texts)| {
                ids.into_iter()
                    .zip(types)
                    .zip(texts)
                    .map(|((id, t), j)| (id.to_string(), t, j))
                    .collect()
            })
    })
}

fn submitted() -> (PermitController, RequestId) {
    let mut c = PermitController::default().with_id_generator(SequentialIdGenerator::new());
    let selected = vec!["User.Read".to_string()];
    let types = HashMap::from([("User.Read".to_string(), AccessType::Delegated)]);
    let texts = HashMap::from([("User.Read".to_string(), "needed for login".to_string())]);
    let id = c.submit(&selected, &types, &texts).unwrap().id;
    (c, id)
}

// ---------------------------------------------------------------------------
// Property Tests
// ---------------------------------------------------------------------------

proptest! {
    /// History grows by exactly one per accepted decision and is never rewritten.
    #[test]
    fn history_is_append_only(ops in arb_ops()) {
        let (mut c, id) = submitted();

        for (decision, stage) in ops {
            let before = c.get(&id).unwrap().clone();
            match c.decide(&id, decision, stage, "note") {
                Ok(after) => {
                    prop_assert_eq!(
                        after.approval_history.len(),
                        before.approval_history.len() + 1
                    );
                    prop_assert_eq!(
                        &after.approval_history[..before.approval_history.len()],
                        &before.approval_history[..]
                    );
                    let entry = after.approval_history.last().unwrap();
                    prop_assert_eq!(entry.stage, before.current_stage());
                    prop_assert_eq!(entry.outcome, decision);
                }
                Err(err) => {
                    let is_illegal = matches!(err, PermitError::IllegalTransition { .. });
                    prop_assert!(is_illegal);
                    let after = c.get(&id).unwrap();
                    prop_assert_eq!(after.state, before.state);
                    prop_assert_eq!(after.approval_history.len(), before.approval_history.len());
                }
            }
        }
    }

    /// Stages only move forward one step at a time, and terminal states stick.
    #[test]
    fn stages_advance_monotonically(ops in arb_ops()) {
        let (mut c, id) = submitted();
        let mut terminal: Option<RequestState> = None;

        for (decision, stage) in ops {
            let before = c.get(&id).unwrap().state;
            let _ = c.decide(&id, decision, stage, "");
            let after = c.get(&id).unwrap().state;

            if let Some(frozen) = terminal {
                prop_assert_eq!(after, frozen);
                continue;
            }
            let step = after.current_stage().index() as i64 - before.current_stage().index() as i64;
            prop_assert!(step == 0 || step == 1);
            if after.is_terminal() {
                terminal = Some(after);
            }
        }
    }

    /// Submission succeeds exactly when validation passes.
    #[test]
    fn submit_agrees_with_validate(selection in arb_selection()) {
        let mut c = PermitController::default().with_id_generator(SequentialIdGenerator::new());
        let selected: Vec<String> = selection.iter().map(|(id, _, _)| id.clone()).collect();
        let types: HashMap<String, AccessType> = selection
            .iter()
            .filter_map(|(id, t, _)| t.map(|t| (id.clone(), t)))
            .collect();
        let texts: HashMap<String, String> = selection
            .iter()
            .filter_map(|(id, _, j)| j.clone().map(|j| (id.clone(), j)))
            .collect();

        let report = c.validate(&selected, &types, &texts);
        let result = c.submit(&selected, &types, &texts);

        prop_assert_eq!(report.is_valid(), result.is_ok());
        prop_assert_eq!(c.requests().len(), usize::from(report.is_valid()));
        if let Err(PermitError::Validation(rejected)) = result {
            prop_assert_eq!(rejected, report);
        }
    }
}
