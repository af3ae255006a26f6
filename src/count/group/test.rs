use super::PerfGroup;
use crate::config::Grouping;
use crate::count::mock::{catalog, Call, MockBackend};
use crate::count::{Control, Scope, UNAVAILABLE};
use crate::error::Error;

#[test]
fn test_read_covers_whole_catalog() {
    let backend = MockBackend::failing_open(&["b", "d"]);
    let events = catalog(&["a", "b", "c", "d"]);
    let group = PerfGroup::create(backend, &events, Grouping::Leader).unwrap();

    let results = group.read();
    let names: Vec<_> = results.iter().map(|it| it.name()).collect();
    assert_eq!(names, ["a", "b", "c", "d"]);

    let ok: Vec<_> = results.iter().map(|it| it.is_ok()).collect();
    assert_eq!(ok, [true, false, true, false]);
    assert_eq!(results[1].value(), UNAVAILABLE);
    assert_eq!(results[3].value(), UNAVAILABLE);
    assert_eq!(results[0].value(), 100);
}

#[test]
fn test_invalid_handle_is_never_touched() {
    for grouping in [Grouping::Leader, Grouping::Independent] {
        let backend = MockBackend::failing_open(&["b"]);
        let events = catalog(&["a", "b", "c"]);
        let mut group = PerfGroup::create(backend.clone(), &events, grouping).unwrap();

        assert!(!group.handles()[1].is_valid());
        group.reset().unwrap();
        group.enable().unwrap();
        group.disable().unwrap();
        group.read();
        group.close();

        assert!(backend.touching("b").is_empty(), "{:?}", grouping);
    }
}

#[test]
fn test_no_counter_available() {
    let backend = MockBackend::failing_open(&["a", "b"]);
    let events = catalog(&["a", "b"]);

    let err = PerfGroup::create(backend.clone(), &events, Grouping::Leader).unwrap_err();
    assert!(matches!(err, Error::NoCountersAvailable));
    assert_eq!(backend.calls().len(), 2);
    assert!(backend.closes().is_empty());
}

#[test]
fn test_first_opened_counter_leads() {
    let backend = MockBackend::failing_open(&["a"]);
    let events = catalog(&["a", "b", "c"]);
    let group = PerfGroup::create(backend.clone(), &events, Grouping::Leader).unwrap();

    assert_eq!(group.leader(), 1);
    let opens: Vec<_> = backend
        .calls()
        .into_iter()
        .filter(|it| matches!(it, Call::Open { .. }))
        .collect();
    assert_eq!(
        opens,
        [
            Call::Open {
                name: "a".into(),
                leader: None
            },
            Call::Open {
                name: "b".into(),
                leader: None
            },
            Call::Open {
                name: "c".into(),
                leader: Some("b".into())
            },
        ]
    );
}

#[test]
fn test_grouped_control_goes_through_leader() {
    for len in [1, 3] {
        let backend = MockBackend::default();
        let events = catalog(&["a", "b", "c"][..len]);
        let group = PerfGroup::create(backend.clone(), &events, Grouping::Leader).unwrap();

        group.reset().unwrap();
        group.enable().unwrap();
        group.disable().unwrap();

        for op in [Control::Reset, Control::Enable, Control::Disable] {
            assert_eq!(backend.controls(op), [(Scope::Group, "a".to_string())]);
        }
    }
}

#[test]
fn test_independent_control_touches_each_counter() {
    let backend = MockBackend::default();
    let events = catalog(&["a", "b", "c"]);
    let group = PerfGroup::create(backend.clone(), &events, Grouping::Independent).unwrap();

    group.reset().unwrap();
    group.enable().unwrap();
    group.disable().unwrap();

    for op in [Control::Reset, Control::Enable, Control::Disable] {
        let controls = backend.controls(op);
        assert_eq!(controls.len(), 3);
        assert!(controls.iter().all(|(scope, _)| *scope == Scope::Single));
    }
    assert!(backend
        .calls()
        .iter()
        .all(|it| !matches!(it, Call::Open { leader: Some(_), .. })));
}

#[test]
fn test_falls_back_without_grouping_support() {
    let backend = MockBackend {
        no_grouping: true,
        ..Default::default()
    };
    let events = catalog(&["a", "b"]);
    let group = PerfGroup::create(backend.clone(), &events, Grouping::Leader).unwrap();

    assert_eq!(group.grouping(), Grouping::Independent);
    group.enable().unwrap();
    assert_eq!(backend.controls(Control::Enable).len(), 2);
}

#[test]
fn test_read_failure_is_unavailable() {
    let mut backend = MockBackend::default();
    backend.fail_read.insert("b".into());
    backend.counts.insert("a".into(), 7);
    backend.counts.insert("c".into(), u64::MAX);
    let events = catalog(&["a", "b", "c"]);
    let group = PerfGroup::create(backend, &events, Grouping::Leader).unwrap();

    let results = group.read();
    assert_eq!(results[0].value(), 7);
    assert!(!results[1].is_ok());
    assert_eq!(results[1].value(), UNAVAILABLE);
    // Does not fit in the signed report value.
    assert!(!results[2].is_ok());
    assert_eq!(results[2].value(), UNAVAILABLE);
}

#[test]
fn test_close_is_idempotent() {
    let backend = MockBackend::failing_open(&["b"]);
    let events = catalog(&["a", "b", "c", "d"]);
    let mut group = PerfGroup::create(backend.clone(), &events, Grouping::Leader).unwrap();

    group.close();
    assert!(group.is_closed());
    assert_eq!(backend.closes(), ["d", "c", "a"]);

    group.close();
    group.enable().unwrap();
    drop(group);
    assert_eq!(backend.closes(), ["d", "c", "a"]);
    assert!(backend.controls(Control::Enable).is_empty());
}

#[test]
fn test_drop_closes() {
    let backend = MockBackend::default();
    let events = catalog(&["a", "b"]);
    let group = PerfGroup::create(backend.clone(), &events, Grouping::Independent).unwrap();

    drop(group);
    assert_eq!(backend.closes(), ["b", "a"]);
}
