use autofix_core::{update, Msg, OperatorState};

#[test]
fn update_is_noop() {
    let state = OperatorState::new();
    let (next, effects) = update(state.clone(), Msg::NoOp);

    assert_eq!(state, next);
    assert!(effects.is_empty());
}
