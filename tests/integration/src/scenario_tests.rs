//! Scenario tests for the mirror as a whole
//!
//! Each test drives a `SyncEngine` against a `FakeRemote` over one or more
//! runs and checks the mirror root afterwards, the way a scheduled job
//! would observe it.

use mirror_core::{Error, MirrorConfig, SkipReason, SyncAction, SyncEngine, SyncReport};
use mirror_test_utils::{DATA_ZONE_ROOT, FakeRemote, FakeResource, TestMirror, USER_ZONE_ROOT};
use pretty_assertions::assert_eq;
use rstest::rstest;

// =============================================================================
// Test Infrastructure
// =============================================================================

struct Harness {
    remote: FakeRemote,
    mirror: TestMirror,
}

impl Harness {
    fn new() -> Self {
        Self {
            remote: FakeRemote::hydroshare(),
            mirror: TestMirror::new(),
        }
    }

    fn config(&self) -> MirrorConfig {
        MirrorConfig {
            mirror_root: self.mirror.root().to_path_buf(),
            data_zone_root: DATA_ZONE_ROOT.to_string(),
            user_zone_root: USER_ZONE_ROOT.to_string(),
            home_root: None,
        }
    }

    fn engine(&self) -> SyncEngine<&FakeRemote> {
        SyncEngine::new(&self.remote, self.config()).unwrap()
    }

    fn sweep(&self) -> SyncReport {
        self.engine().sync_all().unwrap()
    }

    fn sync_one(&self, id: &str) -> mirror_core::Result<SyncReport> {
        self.engine().sync_one(id)
    }
}

fn contents(id: &str) -> String {
    format!("{}/data/contents", id)
}

fn public_netcdf(id: &str, timestamp: &str) -> FakeResource {
    FakeResource::netcdf(id).public().with_file("foo.nc", timestamp)
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn scenario_first_copy_writes_sidecar() {
    let h = Harness::new();
    h.remote.add_resource(DATA_ZONE_ROOT, public_netcdf("r1", "T1"));

    let report = h.sweep();

    assert_eq!(h.remote.fetches_of("r1"), 1);
    assert_eq!(report.fetch_count(), 1);
    h.mirror.assert_sidecar(&contents("r1"), "foo.nc", "T1");
}

#[test]
fn scenario_stale_entry_is_refreshed_once() {
    let h = Harness::new();
    h.remote.add_resource(DATA_ZONE_ROOT, public_netcdf("r2", "T1"));
    h.sweep();
    h.remote.clear_calls();

    h.remote.update("r2", |r| r.files[0].timestamp = "T2".to_string());
    let report = h.sweep();

    assert_eq!(h.remote.fetches_of("r2"), 1);
    assert_eq!(
        report.outcome("r2").unwrap().action,
        SyncAction::Refreshed {
            previous: Some("T1".to_string()),
            timestamp: "T2".to_string(),
        }
    );
    h.mirror.assert_sidecar(&contents("r2"), "foo.nc", "T2");
}

#[test]
fn scenario_resource_made_private_is_removed() {
    let h = Harness::new();
    h.remote.add_resource(DATA_ZONE_ROOT, public_netcdf("r3", "T1"));
    h.sweep();
    h.mirror.assert_entry_exists("r3");
    h.remote.clear_calls();

    h.remote.update("r3", |r| r.public = false);
    h.sweep();

    h.mirror.assert_entry_absent("r3");
    assert_eq!(h.remote.fetch_count(), 0);
}

#[rstest]
#[case::raster("RasterResource")]
#[case::generic("GenericResource")]
#[case::untyped("")]
fn scenario_ineligible_type_is_never_fetched(#[case] resource_type: &str) {
    let h = Harness::new();
    h.remote.add_resource(
        DATA_ZONE_ROOT,
        FakeResource::new("r4")
            .with_type(resource_type)
            .public()
            .with_file("foo.nc", "T1"),
    );

    let report = h.sweep();

    assert_eq!(h.remote.fetch_count(), 0);
    assert!(matches!(
        report.outcome("r4").unwrap().action,
        SyncAction::Skipped {
            reason: SkipReason::IneligibleType { .. }
        }
    ));
    h.mirror.assert_entry_absent("r4");
}

#[test]
fn scenario_ineligible_type_with_stale_entry_is_evicted() {
    let h = Harness::new();
    h.remote.add_resource(
        DATA_ZONE_ROOT,
        FakeResource::new("r4").with_type("ModelProgramResource").public(),
    );
    h.mirror.seed_entry("r4", &contents("r4"), "foo.nc", "T1");

    h.sweep();

    h.mirror.assert_entry_absent("r4");
    assert_eq!(h.remote.fetch_count(), 0);
}

#[test]
fn scenario_unknown_explicit_resource_fails() {
    let h = Harness::new();
    h.remote.add_resource(DATA_ZONE_ROOT, public_netcdf("r1", "T1"));

    let err = h.sync_one("r5").unwrap_err();

    assert!(matches!(err, Error::UnresolvedSource { .. }), "got: {err:?}");
    assert_eq!(h.remote.fetch_count(), 0);
    assert!(h.mirror.entries().is_empty());
}

#[test]
fn scenario_public_resource_without_payload_is_not_mirrored() {
    let h = Harness::new();
    h.remote.add_resource(
        DATA_ZONE_ROOT,
        FakeResource::composite("r6")
            .public()
            .with_file("readme.md", "T1")
            .with_file_in("scripts", "run.py", "T1"),
    );

    let report = h.sweep();

    assert_eq!(
        report.outcome("r6").unwrap().action,
        SyncAction::Skipped {
            reason: SkipReason::NoPayload
        }
    );
    h.mirror.assert_entry_absent("r6");
}

// =============================================================================
// Properties
// =============================================================================

#[test]
fn property_unchanged_remote_needs_no_fetches() {
    let h = Harness::new();
    h.remote.add_resource(DATA_ZONE_ROOT, public_netcdf("alpha1", "T1"));
    h.remote.add_resource(USER_ZONE_ROOT, public_netcdf("beta2", "T1"));
    h.remote.add_resource(
        USER_ZONE_ROOT,
        FakeResource::composite("gamma3").public().with_file_in("x", "y.nc", "T7"),
    );
    h.sweep();
    h.remote.clear_calls();

    let report = h.sweep();

    assert_eq!(h.remote.fetch_count(), 0);
    assert_eq!(report.count("up-to-date"), 3);
}

#[test]
fn property_mirror_holds_exactly_the_qualifying_resources() {
    let h = Harness::new();
    h.remote.add_resource(DATA_ZONE_ROOT, public_netcdf("keep1", "T1"));
    h.remote.add_resource(
        DATA_ZONE_ROOT,
        FakeResource::netcdf("private1").with_file("foo.nc", "T1"),
    );
    h.remote.add_resource(
        USER_ZONE_ROOT,
        FakeResource::new("raster1")
            .with_type("RasterResource")
            .public()
            .with_file("foo.nc", "T1"),
    );
    h.remote.add_resource(USER_ZONE_ROOT, FakeResource::netcdf("empty1").public());
    h.remote.add_resource(
        USER_ZONE_ROOT,
        FakeResource::composite("keep2").public().with_file("bar.nc", "T3"),
    );
    h.mirror.seed_entry("private1", &contents("private1"), "foo.nc", "T0");
    h.mirror.seed_entry("raster1", &contents("raster1"), "foo.nc", "T0");

    let report = h.sweep();

    assert!(report.success());
    assert_eq!(h.mirror.entries(), vec!["keep1".to_string(), "keep2".to_string()]);
    h.mirror.assert_sidecar(&contents("keep2"), "bar.nc", "T3");
}

#[test]
fn property_single_resource_matches_full_walk() {
    let cases = [
        public_netcdf("same", "T1"),
        FakeResource::netcdf("same").with_file("foo.nc", "T1"),
        FakeResource::netcdf("same").public(),
        FakeResource::new("same").with_type("RasterResource").public(),
    ];

    for resource in cases {
        for seeded in [false, true] {
            let walked = Harness::new();
            let single = Harness::new();
            for h in [&walked, &single] {
                h.remote.add_resource(USER_ZONE_ROOT, resource.clone());
                if seeded {
                    h.mirror.seed_entry("same", &contents("same"), "foo.nc", "T0");
                }
            }

            let by_walk = walked.sweep().outcome("same").unwrap().action.clone();
            let by_id = single.sync_one("same").unwrap().outcome("same").unwrap().action.clone();

            assert_eq!(by_walk, by_id, "resource {:?}, seeded {}", resource, seeded);
            assert_eq!(walked.mirror.entries(), single.mirror.entries());
        }
    }
}

#[test]
fn property_lifecycle_over_several_runs() {
    let h = Harness::new();
    h.remote.add_resource(DATA_ZONE_ROOT, public_netcdf("life", "T1"));

    let labels: Vec<&str> = vec![
        {
            let r = h.sweep();
            r.outcome("life").unwrap().action.label()
        },
        {
            let r = h.sweep();
            r.outcome("life").unwrap().action.label()
        },
        {
            h.remote.update("life", |r| r.public = false);
            let r = h.sweep();
            r.outcome("life").unwrap().action.label()
        },
        {
            h.remote.update("life", |r| r.public = true);
            let r = h.sweep();
            r.outcome("life").unwrap().action.label()
        },
    ];

    assert_eq!(labels, vec!["copied", "up-to-date", "evicted", "copied"]);
    assert_eq!(h.remote.fetches_of("life"), 2);
}

#[test]
fn property_report_serializes_actions() {
    let h = Harness::new();
    h.remote.add_resource(DATA_ZONE_ROOT, public_netcdf("json1", "T1"));

    let report = h.sweep();
    let value = serde_json::to_value(&report).unwrap();

    assert_eq!(value["outcomes"][0]["resource_id"], "json1");
    assert_eq!(value["outcomes"][0]["action"]["action"], "copied");
    assert_eq!(value["outcomes"][0]["action"]["timestamp"], "T1");
    assert_eq!(value["failures"], serde_json::json!([]));
}
