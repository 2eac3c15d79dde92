//! Behavioural tests for favourite-instructor synchronisation.
//!
//! These scenarios validate the optimistic toggle contract: immediate
//! local effect, rollback on refusal, and convergence on the last
//! server-confirmed state after rapid toggling.

use std::sync::Arc;

use client::domain::ports::ApiError;
use client::domain::sync::{FavoriteEntry, FavoritesSync, SyncedCollection};
use client::test_support::gateway::ScriptedGateway;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use serde_json::json;
use tokio::runtime::{Builder, Runtime};

const SCHOOL: &str = "ECL-001";
const INSTRUCTOR: &str = "I1";

struct FavoritesWorld {
    runtime: Runtime,
    gateway: Arc<ScriptedGateway>,
    favorites: FavoritesSync,
    outcome: Option<Result<bool, ApiError>>,
    listing: Option<SyncedCollection<FavoriteEntry>>,
}

impl FavoritesWorld {
    fn toggle_once(&mut self) {
        let outcome = self
            .runtime
            .block_on(self.favorites.toggle(SCHOOL, INSTRUCTOR));
        self.outcome = Some(outcome);
    }

    fn contains_instructor(&self) -> bool {
        self.runtime.block_on(self.favorites.is_favorite(INSTRUCTOR))
    }
}

#[fixture]
fn world() -> FavoritesWorld {
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("build runtime");
    let gateway = Arc::new(ScriptedGateway::default());
    let favorites = FavoritesSync::new(gateway.clone());
    FavoritesWorld {
        runtime,
        gateway,
        favorites,
        outcome: None,
        listing: None,
    }
}

#[given("a school with no favourites")]
fn a_school_with_no_favourites(world: &mut FavoritesWorld) {
    assert!(!world.contains_instructor());
}

#[given("the server will confirm the next favourites change")]
fn the_server_will_confirm_the_next_favourites_change(world: &mut FavoritesWorld) {
    world.gateway.push_ok(json!({ "success": true }));
}

#[given("the server will confirm the next {count} favourites changes")]
fn the_server_will_confirm_the_next_favourites_changes(world: &mut FavoritesWorld, count: usize) {
    for _ in 0..count {
        world.gateway.push_ok(json!({ "success": true }));
    }
}

#[given("the server will refuse the change with message \"Intervenant inconnu\"")]
fn the_server_will_refuse_the_change(world: &mut FavoritesWorld) {
    world
        .gateway
        .push_ok(json!({ "success": false, "message": "Intervenant inconnu" }));
}

#[given("the server will refuse the listing with message \"École inconnue\"")]
fn the_server_will_refuse_the_listing(world: &mut FavoritesWorld) {
    world
        .gateway
        .push_ok(json!({ "success": false, "message": "École inconnue" }));
}

#[when("the school toggles instructor I1")]
fn the_school_toggles_instructor(world: &mut FavoritesWorld) {
    world.toggle_once();
}

#[when("the school toggles instructor I1 {count} times")]
fn the_school_toggles_instructor_repeatedly(world: &mut FavoritesWorld, count: usize) {
    for _ in 0..count {
        world.toggle_once();
    }
}

#[when("the school reloads its favourites")]
fn the_school_reloads_its_favourites(world: &mut FavoritesWorld) {
    let listing = world
        .runtime
        .block_on(world.favorites.load(SCHOOL))
        .expect("a refused listing is not a transport error");
    world.listing = Some(listing);
}

#[then("the favourites include instructor I1")]
fn the_favourites_include_instructor(world: &mut FavoritesWorld) {
    assert!(world.contains_instructor());
}

#[then("the favourites do not include instructor I1")]
fn the_favourites_do_not_include_instructor(world: &mut FavoritesWorld) {
    assert!(!world.contains_instructor());
}

#[then("the add request carries the school and instructor pair")]
fn the_add_request_carries_the_pair(world: &mut FavoritesWorld) {
    let calls = world.gateway.calls();
    let call = calls.last().expect("a request should have been dispatched");
    assert_eq!(call.method, "POST");
    assert_eq!(call.path, "/api/intervenants/favoris/add");
    assert_eq!(
        call.body,
        Some(json!({ "ecole_id": SCHOOL, "intervenant_id": INSTRUCTOR }))
    );
}

#[then("the toggle fails with message \"Intervenant inconnu\"")]
fn the_toggle_fails_with_the_message(world: &mut FavoritesWorld) {
    let outcome = world.outcome.take().expect("a toggle should have run");
    assert_eq!(
        outcome.expect_err("refusal should propagate"),
        ApiError::rejected("Intervenant inconnu")
    );
}

#[then("the server saw an add, a remove, and another add")]
fn the_server_saw_add_remove_add(world: &mut FavoritesWorld) {
    let methods_and_paths: Vec<(&'static str, String)> = world
        .gateway
        .calls()
        .into_iter()
        .map(|call| (call.method, call.path))
        .collect();
    assert_eq!(
        methods_and_paths,
        vec![
            ("POST", "/api/intervenants/favoris/add".to_owned()),
            ("DELETE", "/api/intervenants/favoris/remove".to_owned()),
            ("POST", "/api/intervenants/favoris/add".to_owned()),
        ]
    );
}

#[then("the favourites listing is empty")]
fn the_favourites_listing_is_empty(world: &mut FavoritesWorld) {
    let listing = world.listing.as_ref().expect("a listing should be loaded");
    assert!(listing.is_empty());
}

#[then("the listing carries the refusal message")]
fn the_listing_carries_the_refusal_message(world: &mut FavoritesWorld) {
    let listing = world.listing.as_ref().expect("a listing should be loaded");
    assert_eq!(listing.load_error.as_deref(), Some("École inconnue"));
}

#[scenario(
    path = "tests/features/favorites_sync.feature",
    name = "Favouriting an instructor is confirmed by the server"
)]
fn favouriting_is_confirmed_by_the_server(world: FavoritesWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/favorites_sync.feature",
    name = "A refused toggle rolls back"
)]
fn a_refused_toggle_rolls_back(world: FavoritesWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/favorites_sync.feature",
    name = "Rapid toggles settle on the last confirmation"
)]
fn rapid_toggles_settle_on_the_last_confirmation(world: FavoritesWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/favorites_sync.feature",
    name = "A refused listing resolves empty with the server message"
)]
fn a_refused_listing_resolves_empty(world: FavoritesWorld) {
    drop(world);
}
