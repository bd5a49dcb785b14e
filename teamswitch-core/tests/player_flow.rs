//! End-to-end event sequences against the mock world and UI
//!
//! These tests drive [`TeamSwitchHandler`] the way the game runtime does:
//! - Deploy, wait for ground contact, interact, and switch teams
//! - Movement and expiry thresholds on ticks
//! - Opt-out sticking for the rest of the session

use std::sync::Arc;
use std::time::Duration;

use teamswitch_core::{
    ButtonEvent, DialogAction, DialogButton, GameEvent, MessageKey, MockSoldier, MockUi,
    MockWorld, PlayerId, RemovalOutcome, RemovalReason, SkipReason, SpawnOutcome, TeamId,
    TeamSwitchConfig, TeamSwitchHandler, Vec3, WidgetId,
};

fn create_handler() -> (TeamSwitchHandler, Arc<MockWorld>, Arc<MockUi>) {
    let world = Arc::new(MockWorld::new());
    let ui = Arc::new(MockUi::new());
    let handler =
        TeamSwitchHandler::new(TeamSwitchConfig::default(), world.clone(), ui.clone()).unwrap();
    (handler, world, ui)
}

async fn join_and_spawn(handler: &TeamSwitchHandler, world: &MockWorld, player: PlayerId) -> u32 {
    world.add_player(player, MockSoldier::on_team(TeamId::TEAM_1));
    handler.on_player_joined(player).await.unwrap();
    match handler.on_player_deployed(player).await.unwrap().unwrap() {
        SpawnOutcome::Spawned { point, .. } => point.object_id,
        other => panic!("expected spawn, got {other:?}"),
    }
}

fn button(handler: &TeamSwitchHandler, player: PlayerId, button: DialogButton) -> WidgetId {
    handler
        .dialogs()
        .widgets(player)
        .unwrap()
        .get(button)
        .unwrap()
        .button
}

#[tokio::test(start_paused = true)]
async fn airborne_deploy_spawns_after_landing_in_front_of_player() {
    let (handler, world, _) = create_handler();
    world.add_player(
        1,
        MockSoldier {
            position: Vec3::new(10.0, 0.0, 5.0),
            facing: Vec3::new(1.0, 0.0, 0.0),
            grounded: false,
            ..MockSoldier::default()
        },
    );
    handler.on_player_joined(1).await.unwrap();

    let task = handler.on_player_deployed(1);
    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(world.object_count(), 0);
    assert!(handler.lifecycle().has_pending_spawn(1));

    world.set_grounded(1, true);
    let outcome = task.await.unwrap().unwrap();

    let SpawnOutcome::Spawned { point, position } = outcome else {
        panic!("expected spawn, got {outcome:?}");
    };
    assert_eq!(position, Vec3::new(11.0, 1.5, 5.0));
    let object = world.object(point.object_id).unwrap();
    assert_eq!(object.rotation, Vec3::ZERO);
    assert!(object.interactive);
    assert!(!handler.lifecycle().has_pending_spawn(1));
}

#[tokio::test(start_paused = true)]
async fn redeploy_replaces_pending_spawn() {
    let (handler, world, _) = create_handler();
    world.add_player(1, MockSoldier::default());
    world.set_grounded(1, false);
    handler.on_player_joined(1).await.unwrap();

    let first = handler.on_player_deployed(1);
    tokio::time::sleep(Duration::from_millis(300)).await;
    let second = handler.on_player_deployed(1);
    world.set_grounded(1, true);

    assert_eq!(first.await.unwrap().unwrap(), SpawnOutcome::Cancelled);
    assert!(matches!(
        second.await.unwrap().unwrap(),
        SpawnOutcome::Spawned { .. }
    ));
    assert_eq!(world.object_count(), 1);
}

#[tokio::test]
async fn full_team_switch_flow() {
    let (handler, world, ui) = create_handler();
    let object = join_and_spawn(&handler, &world, 7).await;

    let opened = handler
        .dispatch(GameEvent::PlayerInteracted {
            player: 7,
            interact_point: object,
        })
        .await
        .unwrap();
    assert!(matches!(opened, teamswitch_core::EventOutcome::Interacted(true)));
    assert_eq!(ui.button_enabled(button(&handler, 7, DialogButton::Team1)), Some(false));

    let action = handler
        .on_ui_button(7, button(&handler, 7, DialogButton::Team2), ButtonEvent::ButtonUp)
        .await
        .unwrap();

    assert_eq!(action, DialogAction::SwitchedTeam { team: TeamId::TEAM_2 });
    assert!(!world.is_deployed(7));
    assert_eq!(world.notifications(7), vec![MessageKey::TeamSwitched]);
    assert_eq!(ui.widget_count(), 0);
    assert_eq!(ui.input_mode(7), Some(false));

    // The switch undeploys the soldier; the runtime reports it
    let removal = handler.on_player_undeployed(7).await.unwrap();
    assert_eq!(removal, RemovalOutcome::Released);
}

#[tokio::test]
async fn velocity_threshold_is_strict() {
    let (handler, world, _) = create_handler();
    join_and_spawn(&handler, &world, 1).await;

    world.set_velocity(1, Vec3::new(1.0, -1.0, 1.0));
    assert_eq!(handler.on_player_tick(1).await.unwrap(), None);

    world.set_velocity(1, Vec3::new(1.5, -1.0, 1.0));
    assert_eq!(
        handler.on_player_tick(1).await.unwrap(),
        Some(RemovalReason::Moving { speed: 3.5 })
    );
    assert_eq!(world.object_count(), 0);
}

#[tokio::test]
async fn interact_point_expires_after_max_lifetime() {
    let (handler, world, _) = create_handler();
    world.set_time(10.0);
    join_and_spawn(&handler, &world, 1).await;

    world.set_time(12.9);
    assert_eq!(handler.on_player_tick(1).await.unwrap(), None);

    world.set_time(13.1);
    let reason = handler.on_player_tick(1).await.unwrap();
    assert!(matches!(reason, Some(RemovalReason::Expired { .. })));
    assert!(!handler.sessions().get(1).await.unwrap().has_interact_point());
}

#[tokio::test]
async fn dead_player_keeps_point_on_tick() {
    let (handler, world, _) = create_handler();
    join_and_spawn(&handler, &world, 1).await;
    world.set_alive(1, false);
    world.set_velocity(1, Vec3::new(10.0, 0.0, 0.0));

    assert_eq!(handler.on_player_tick(1).await.unwrap(), None);
    assert_eq!(world.object_count(), 1);
}

#[tokio::test]
async fn opted_out_player_never_gets_another_point() {
    let (handler, world, _) = create_handler();
    let object = join_and_spawn(&handler, &world, 1).await;
    handler.on_player_interact(1, object).await.unwrap();
    handler
        .on_ui_button(1, button(&handler, 1, DialogButton::OptOut), ButtonEvent::ButtonUp)
        .await
        .unwrap();

    for _ in 0..3 {
        handler.on_player_undeployed(1).await.unwrap();
        let outcome = handler.on_player_deployed(1).await.unwrap().unwrap();
        assert_eq!(
            outcome,
            SpawnOutcome::Skipped {
                reason: SkipReason::OptedOut
            }
        );
    }
    assert_eq!(world.object_count(), 0);
}

#[tokio::test]
async fn double_removal_is_a_noop() {
    let (handler, world, _) = create_handler();
    join_and_spawn(&handler, &world, 1).await;

    assert_eq!(
        handler.on_player_undeployed(1).await.unwrap(),
        RemovalOutcome::Released
    );
    assert_eq!(
        handler.on_player_undeployed(1).await.unwrap(),
        RemovalOutcome::NothingToRemove
    );
}

#[tokio::test]
async fn externally_despawned_point_is_cleared() {
    let (handler, world, _) = create_handler();
    let object = join_and_spawn(&handler, &world, 1).await;
    assert!(world.despawn_externally(object));

    let removal = handler.on_player_left(1).await.unwrap();

    assert_eq!(removal, RemovalOutcome::AlreadyGone);
}

#[tokio::test]
async fn players_are_isolated() {
    let (handler, world, ui) = create_handler();
    let first = join_and_spawn(&handler, &world, 1).await;
    join_and_spawn(&handler, &world, 2).await;
    handler.on_player_interact(1, first).await.unwrap();

    world.set_velocity(2, Vec3::new(5.0, 0.0, 0.0));
    handler.on_player_tick(2).await.unwrap();
    handler.on_player_tick(1).await.unwrap();

    assert!(handler.sessions().get(1).await.unwrap().has_interact_point());
    assert!(!handler.sessions().get(2).await.unwrap().has_interact_point());
    assert!(handler.dialogs().is_open(1));
    assert!(!handler.dialogs().is_open(2));
    assert_eq!(ui.widget_count(), 11);
}

#[tokio::test]
async fn many_players_deploy_concurrently() {
    let (handler, world, _) = create_handler();
    let handler = Arc::new(handler);
    for player in 1..=20 {
        world.add_player(player, MockSoldier::default());
        handler.on_player_joined(player).await.unwrap();
    }

    let tasks: Vec<_> = (1..=20)
        .map(|player| handler.on_player_deployed(player))
        .collect();
    for task in tasks {
        assert!(matches!(
            task.await.unwrap().unwrap(),
            SpawnOutcome::Spawned { .. }
        ));
    }

    assert_eq!(world.object_count(), 20);
    assert_eq!(handler.sessions().live_interact_points().await, 20);
}
