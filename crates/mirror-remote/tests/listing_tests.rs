//! Parser invariants for iCommands listing and metadata output

use mirror_remote::listing::{ChildEntry, parse_children, parse_long_listing};
use mirror_remote::metadata::{Avu, parse_avus};
use pretty_assertions::assert_eq;
use rstest::rstest;

#[test]
fn test_parse_children_collections_and_objects() {
    let lines = [
        "/zone/home/proxy:",
        "  readme.txt",
        "  C- /zone/home/proxy/0a1b2c",
        "  C- /zone/home/proxy/bags",
        "",
    ];

    let children = parse_children(&lines);
    assert_eq!(
        children,
        vec![
            ChildEntry::DataObject {
                name: "readme.txt".into()
            },
            ChildEntry::Collection {
                path: "/zone/home/proxy/0a1b2c".into()
            },
            ChildEntry::Collection {
                path: "/zone/home/proxy/bags".into()
            },
        ]
    );
    assert_eq!(children[1].name(), "0a1b2c");
    assert!(!children[0].is_collection());
}

#[test]
fn test_parse_long_listing_tracks_directory_headers() {
    let lines = [
        "/zone/home/proxy/abc/data/contents:",
        "  proxy             0 hsResc        10240 2017-03-01.10:00 & foo.nc",
        "  proxy             1 hsRescRepl    10240 2017-03-01.10:05 & foo.nc",
        "  C- /zone/home/proxy/abc/data/contents/sub",
        "/zone/home/proxy/abc/data/contents/sub:",
        "  proxy             0 hsResc          512 2018-06-12.08:30 & bar.nc",
    ];

    let entries = parse_long_listing(&lines);
    assert_eq!(entries.len(), 3);

    assert_eq!(entries[0].directory, "/zone/home/proxy/abc/data/contents");
    assert_eq!(entries[0].name, "foo.nc");
    assert_eq!(entries[0].mod_time, "2017-03-01.10:00");
    assert_eq!(entries[0].size, Some(10240));
    assert!(entries[0].is_primary_replica());

    assert_eq!(entries[1].replica_index, 1);
    assert!(!entries[1].is_primary_replica());

    assert_eq!(entries[2].directory, "/zone/home/proxy/abc/data/contents/sub");
    assert_eq!(entries[2].name, "bar.nc");
}

#[rstest]
#[case::six_fields("  proxy 0 hsResc 10240 2017-03-01.10:00 foo.nc")]
#[case::eight_fields("  proxy 0 hsResc 10240 2017-03-01.10:00 & my file.nc")]
#[case::non_numeric_replica("  proxy x hsResc 10240 2017-03-01.10:00 & foo.nc")]
#[case::subcollection("  C- /zone/home/proxy/abc/data/contents/sub")]
fn test_parse_long_listing_ignores_non_records(#[case] line: &str) {
    let lines = ["/zone/home/proxy/abc/data/contents:", line];
    assert!(parse_long_listing(&lines).is_empty());
}

#[test]
fn test_non_numeric_size_keeps_record() {
    let lines = [
        "/zone/home/proxy/abc/data/contents:",
        "  proxy 0 hsResc big 2017-03-01.10:00 & foo.nc",
    ];

    let entries = parse_long_listing(&lines);

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].name, "foo.nc");
    assert_eq!(entries[0].size, None);
    assert!(entries[0].is_primary_replica());
}

#[test]
fn test_records_before_any_header_have_empty_directory() {
    let lines = ["  proxy 0 hsResc 1 2017-03-01.10:00 & foo.nc"];
    let entries = parse_long_listing(&lines);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].directory, "");
}

#[test]
fn test_parse_avus_pairs_attributes_with_values() {
    let lines = [
        "AVUs defined for collection /zone/home/proxy/abc:",
        "attribute: isPublic",
        "value: true",
        "units:",
        "----",
        "attribute: resourceType",
        "value: NetcdfResource",
        "units:",
    ];

    assert_eq!(
        parse_avus(&lines),
        vec![
            Avu {
                attribute: "isPublic".into(),
                value: "true".into()
            },
            Avu {
                attribute: "resourceType".into(),
                value: "NetcdfResource".into()
            },
        ]
    );
}

#[rstest]
#[case::value_without_attribute(&["value: true"], 0)]
#[case::attribute_without_value(&["attribute: isPublic", "units:"], 0)]
#[case::uppercase_labels(&["Attribute: isPublic", "VALUE: true"], 1)]
fn test_parse_avus_pairing_rules(#[case] lines: &[&str], #[case] expected: usize) {
    assert_eq!(parse_avus(lines).len(), expected);
}

#[test]
fn test_parse_avus_keeps_colons_in_values() {
    let lines = ["attribute: bag_modified", "value: 2017-03-01T10:00:00"];
    let avus = parse_avus(&lines);
    assert_eq!(avus[0].value, "2017-03-01T10:00:00");
}
