//! End-to-end ability resolution through the battle's input surface.

use tactics_core::ability::{Ability, AbilityKind, AbilityRejection, TargetMode};
use tactics_core::battle::{Battle, BattleEvent, Interaction, PawnSpec, ResolutionPhase};
use tactics_core::targeting::SelectionState;
use tactics_core::turn::{ActionCapabilities, ActionCost, Team};
use tactics_test_utils::fixtures::{at, battle_with, point, rules};

// =============================================================================
// Movement
// =============================================================================

#[test]
fn test_corner_detour_through_battle() {
    let (mut battle, ids) = battle_with(3, 3, &[(Team::Red, 0, 0), (Team::Blue, 1, 0)]);
    let mover = ids[0];

    battle.on_pawn_picked(mover);
    battle.select_ability(0);
    battle.hover_cell(Some(at(1, 1)));
    assert_eq!(battle.preview_path().cost(), 20);
    assert_eq!(battle.preview_path().steps(), &[at(0, 1), at(1, 1)]);

    let Interaction::Resolved(report) = battle.on_cell_picked(at(1, 1)) else {
        panic!("detour should be affordable");
    };
    assert_eq!(report.target_cell, Some(at(1, 1)));
    assert_eq!(battle.occupancy().position_of(mover), Some(at(1, 1)));
    assert_eq!(
        battle.turns().resources(mover).map(|r| r.remaining_movement()),
        Some(50)
    );
}

#[test]
fn test_diagonal_across_open_board() {
    let (mut battle, ids) = battle_with(5, 5, &[(Team::Red, 0, 0)]);
    let path = battle.path_between(at(0, 0), at(4, 4));
    assert_eq!(path.cost(), 56);
    assert_eq!(path.steps().len(), 4);

    battle.on_pawn_picked(ids[0]);
    battle.select_ability(0);
    assert!(matches!(
        battle.on_cell_picked(at(4, 4)),
        Interaction::Resolved(_)
    ));
    assert_eq!(
        battle.turns().resources(ids[0]).map(|r| r.remaining_movement()),
        Some(14)
    );
}

#[test]
fn test_pointer_driven_move() {
    let (mut battle, ids) = battle_with(6, 6, &[(Team::Red, 0, 0)]);
    battle.on_pawn_picked(ids[0]);
    battle.select_ability(0);

    let hovered = battle.hover_pointer(point(3.2, 0.9));
    assert_eq!(hovered, Some(at(3, 0)));
    assert_eq!(battle.hovered_cell(), Some(at(3, 0)));
    assert!(battle.preview_path().connects(at(0, 0), at(3, 0)));

    let cell = battle.resolve_pointer_to_cell(point(3.2, 0.9));
    assert_eq!(cell, Some(at(3, 0)));
    assert!(matches!(
        battle.on_cell_picked(at(3, 0)),
        Interaction::Resolved(_)
    ));
    assert_eq!(battle.hovered_cell(), None);
}

#[test]
fn test_move_onto_occupied_cell_is_rejected() {
    let (mut battle, ids) = battle_with(4, 4, &[(Team::Red, 0, 0), (Team::Red, 2, 2)]);
    battle.on_pawn_picked(ids[0]);
    battle.select_ability(0);
    let hash = battle.state_hash();

    assert_eq!(
        battle.on_cell_picked(at(2, 2)),
        Interaction::Rejected(AbilityRejection::NoPath(at(2, 2)))
    );
    assert_eq!(battle.state_hash(), hash);
    assert_eq!(battle.phase(), ResolutionPhase::AbilitySelected);

    // Still pending: a legal cell now resolves.
    assert!(matches!(
        battle.on_cell_picked(at(1, 2)),
        Interaction::Resolved(_)
    ));
}

#[test]
fn test_exhausted_budget_blocks_moves_until_next_turn() {
    let mut battle = Battle::new(rules(10, 1)).unwrap();
    let runner = battle
        .spawn_pawn(PawnSpec::new(Team::Red).with_movement(30), at(0, 0))
        .unwrap();

    battle.on_pawn_picked(runner);
    battle.select_ability(0);
    assert!(matches!(battle.on_cell_picked(at(3, 0)), Interaction::Resolved(_)));

    battle.select_ability(0);
    assert_eq!(
        battle.on_cell_picked(at(4, 0)),
        Interaction::Rejected(AbilityRejection::NoMovementLeft)
    );

    battle.cancel();
    battle.start_turn(runner).unwrap();
    battle.select_ability(0);
    assert!(matches!(battle.on_cell_picked(at(6, 0)), Interaction::Resolved(_)));
}

// =============================================================================
// Selection gating
// =============================================================================

#[test]
fn test_grid_state_blocks_pawn_picks_and_vice_versa() {
    let (mut battle, ids) = battle_with(6, 6, &[(Team::Red, 0, 0), (Team::Blue, 3, 3)]);

    assert_eq!(battle.selection_state(), SelectionState::AllPawns);
    assert_eq!(battle.on_cell_picked(at(1, 1)), Interaction::Ignored);

    battle.on_pawn_picked(ids[0]);
    battle.select_ability(0);
    assert_eq!(battle.selection_state(), SelectionState::Grid);
    assert_eq!(battle.on_pawn_picked(ids[1]), Interaction::Ignored);
    assert_eq!(battle.on_cell_picked(at(9, 9)), Interaction::Ignored);
}

#[test]
fn test_team_targeted_ability_filters_pawns() {
    let mut battle = Battle::new(rules(6, 6)).unwrap();
    let rally = Ability::new("Rally", AbilityKind::Inert, TargetMode::TeamPawn, ActionCost::BonusAction);
    let leader = battle
        .spawn_pawn(PawnSpec::new(Team::Red).with_ability(rally), at(0, 0))
        .unwrap();
    let ally = battle.spawn_pawn(PawnSpec::new(Team::Red), at(1, 0)).unwrap();
    let enemy = battle.spawn_pawn(PawnSpec::new(Team::Blue), at(2, 0)).unwrap();
    let bystander = battle.spawn_pawn(PawnSpec::new(Team::Neutral), at(3, 0)).unwrap();

    battle.on_pawn_picked(leader);
    battle.select_ability(1);
    assert_eq!(battle.selection_state(), SelectionState::TeamPawns);

    assert_eq!(battle.on_pawn_picked(enemy), Interaction::Ignored);
    assert_eq!(battle.on_pawn_picked(bystander), Interaction::Ignored);
    assert_eq!(
        battle.on_pawn_picked(ally),
        Interaction::Rejected(AbilityRejection::Inert)
    );
}

#[test]
fn test_self_only_ability_accepts_only_source() {
    let mut battle = Battle::new(rules(6, 6)).unwrap();
    let brace = Ability::new("Brace", AbilityKind::Inert, TargetMode::SelfOnly, ActionCost::Reaction);
    let guard = battle
        .spawn_pawn(PawnSpec::new(Team::Red).with_ability(brace), at(0, 0))
        .unwrap();
    let ally = battle.spawn_pawn(PawnSpec::new(Team::Red), at(1, 0)).unwrap();

    battle.on_pawn_picked(guard);
    battle.select_ability(1);
    assert_eq!(
        battle.on_pawn_picked(ally),
        Interaction::Rejected(AbilityRejection::TargetNotAllowed(ally))
    );
    assert_eq!(
        battle.on_pawn_picked(guard),
        Interaction::Rejected(AbilityRejection::Inert)
    );
}

#[test]
fn test_incapable_pawn_cannot_pay_for_actions() {
    let mut battle = Battle::new(rules(6, 6)).unwrap();
    let shove = Ability::new("Shove", AbilityKind::Move, TargetMode::GridCell, ActionCost::Action);
    let drone = battle
        .spawn_pawn(
            PawnSpec::new(Team::Red)
                .with_capabilities(ActionCapabilities::NONE)
                .with_ability(shove),
            at(0, 0),
        )
        .unwrap();

    battle.start_turn(drone).unwrap();
    battle.on_pawn_picked(drone);
    battle.select_ability(1);
    assert_eq!(
        battle.on_cell_picked(at(1, 0)),
        Interaction::Rejected(AbilityRejection::CostUnavailable(ActionCost::Action))
    );

    let snapshot = battle.pawn_snapshot(drone).unwrap();
    assert!(!snapshot.can_take_action);
    assert!(!snapshot.abilities[1].affordable);
    assert!(snapshot.abilities[0].affordable);
}

// =============================================================================
// Cancellation and turns
// =============================================================================

#[test]
fn test_cancel_then_reselect() {
    let (mut battle, ids) = battle_with(6, 6, &[(Team::Red, 0, 0)]);
    battle.on_pawn_picked(ids[0]);
    battle.select_ability(0);
    battle.hover_cell(Some(at(2, 2)));

    assert_eq!(battle.cancel(), Interaction::Cancelled);
    assert_eq!(battle.selection_state(), SelectionState::AllPawns);
    assert!(battle.targeting().ability().is_none());
    assert!(!battle.preview_path().is_valid());

    assert!(matches!(battle.select_ability(0), Interaction::AbilitySelected(_)));
    assert!(matches!(battle.on_cell_picked(at(2, 2)), Interaction::Resolved(_)));
}

#[test]
fn test_opponent_turn_locks_selection() {
    let (mut battle, ids) = battle_with(6, 6, &[(Team::Red, 0, 0), (Team::Blue, 5, 5)]);
    battle.on_pawn_picked(ids[0]);
    battle.select_ability(0);

    battle.suspend_selection();
    let started = battle.begin_team_turn(Team::Blue);
    assert_eq!(started, vec![ids[1]]);
    assert_eq!(battle.on_pawn_picked(ids[0]), Interaction::Ignored);
    assert_eq!(battle.on_cell_picked(at(1, 1)), Interaction::Ignored);

    battle.resume_selection();
    battle.begin_team_turn(Team::Red);
    assert_eq!(battle.on_pawn_picked(ids[0]), Interaction::Inspected(ids[0]));

    let events = battle.drain_events();
    assert!(events.contains(&BattleEvent::SelectionSuspended));
    assert!(events.contains(&BattleEvent::SelectionResumed));
    assert!(events.contains(&BattleEvent::TurnStarted(ids[1])));
    assert!(events.iter().any(|e| matches!(e, BattleEvent::ResolutionCancelled(_))));
}

#[test]
fn test_rejection_is_reported_as_event() {
    let (mut battle, ids) = battle_with(6, 6, &[(Team::Red, 0, 0), (Team::Red, 1, 1)]);
    battle.on_pawn_picked(ids[0]);
    battle.select_ability(0);
    battle.drain_events();

    battle.on_cell_picked(at(1, 1));
    let events = battle.drain_events();
    assert!(matches!(
        events.as_slice(),
        [BattleEvent::ResolutionRejected {
            reason: AbilityRejection::NoPath(_),
            ..
        }]
    ));

    // The pick itself is recorded; placements and budgets are not touched.
    assert_eq!(battle.selected_cell(), Some(at(1, 1)));
    assert!(!battle.preview_path().is_valid());
    assert_eq!(battle.phase(), ResolutionPhase::AbilitySelected);
    assert_eq!(battle.occupancy().position_of(ids[0]), Some(at(0, 0)));
    assert_eq!(battle.occupancy().position_of(ids[1]), Some(at(1, 1)));
    assert_eq!(
        battle.turns().resources(ids[0]).map(|r| r.remaining_movement()),
        Some(70)
    );
}
