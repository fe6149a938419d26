//! Integration tests for `varmap` traversal: shape preservation, key context
//! and shared or cyclic values.

use std::cell::Cell;

use eventscrub::{
    Event, Map, Processor, SanitizePasswordsProcessor, SharedValue, Value, Visiting, varmap,
    varmap_with,
};

fn map<const N: usize>(pairs: [(&str, Value); N]) -> Value {
    Value::Map(pairs.into_iter().map(|(k, v)| (k.to_owned(), v)).collect())
}

mod shape {
    use super::*;

    #[test]
    fn mapping_keeps_its_keys() {
        let input = map([
            ("a", Value::from(1_i64)),
            ("password", Value::from("p")),
            ("nested", map([("secret", Value::Null)])),
        ]);
        let sanitizer = SanitizePasswordsProcessor::new();

        let out = varmap(&sanitizer, input.clone());

        let keys = |v: &Value| v.as_map().unwrap().keys().cloned().collect::<Vec<_>>();
        assert_eq!(keys(&out), keys(&input));
        assert_eq!(out.as_map().unwrap()["password"], Value::from("********"));
    }

    #[test]
    fn sequence_keeps_its_length() {
        let input = Value::Seq(vec![
            Value::from("password"),
            map([("password", Value::from("p"))]),
            Value::Seq(vec![Value::Null, Value::Bool(false)]),
        ]);
        let out = varmap(&SanitizePasswordsProcessor::new(), input);

        let items = out.as_seq().unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0], Value::from("password"));
        assert_eq!(items[1], map([("password", Value::from("********"))]));
        assert_eq!(items[2].as_seq().unwrap().len(), 2);
    }

    #[test]
    fn closure_visitor_sees_every_leaf() {
        let count = Cell::new(0);
        let visitor = |_: Option<&str>, value: Value| {
            count.set(count.get() + 1);
            value
        };
        let input = map([
            ("a", Value::Seq(vec![1_i64.into(), 2_i64.into()])),
            ("b", map([("c", Value::from(1.5)), ("d", Value::from("x"))])),
            ("e", Value::Seq(Vec::new())),
        ]);

        varmap(&visitor, input);

        assert_eq!(count.get(), 4);
    }
}

mod shared_values {
    use super::*;

    fn cyclic() -> SharedValue {
        let cell = SharedValue::new(Map::new());
        let back = cell.clone();
        if let Some(fields) = cell.write().as_map_mut() {
            fields.insert("secret".into(), "s".into());
            fields.insert("parent".into(), Value::Shared(back));
        }
        cell
    }

    fn break_cycle(cell: &SharedValue) {
        cell.replace(Value::Null);
    }

    #[test]
    fn cyclic_mapping_terminates() {
        let cell = cyclic();
        let visits = Cell::new(0);
        let visitor = |_: Option<&str>, value: Value| {
            visits.set(visits.get() + 1);
            value
        };

        let out = varmap(&visitor, Value::Shared(cell.clone()));

        assert_eq!(visits.get(), 1);
        assert!(matches!(out, Value::Shared(_)));
        break_cycle(&cell);
    }

    #[test]
    fn same_cell_reached_twice_without_cycle_is_visited_twice() {
        let cell = SharedValue::new(map([("password", Value::from("p"))]));
        let input = Value::Seq(vec![Value::Shared(cell.clone()), Value::Shared(cell.clone())]);

        let out = varmap(&SanitizePasswordsProcessor::new(), input);

        for item in out.as_seq().unwrap() {
            let Value::Shared(rebuilt) = item else {
                panic!("expected a shared cell");
            };
            assert_eq!(*rebuilt.read(), map([("password", Value::from("********"))]));
        }
        assert_eq!(*cell.read(), map([("password", Value::from("p"))]));
    }

    #[test]
    fn frame_locals_with_cycle_are_sanitized() {
        let cell = cyclic();
        let mut frame = Map::new();
        frame.insert("vars".into(), Value::Shared(cell.clone()));
        let mut stacktrace = Map::new();
        stacktrace.insert("frames".into(), Value::Seq(vec![Value::Map(frame)]));
        let mut event = Event::new();
        event.insert("stacktrace", stacktrace);

        let out = SanitizePasswordsProcessor::new().process(event);

        let frames = out.get("stacktrace").unwrap().as_map().unwrap()["frames"]
            .as_seq()
            .unwrap();
        let Value::Shared(vars) = &frames[0].as_map().unwrap()["vars"] else {
            panic!("expected shared vars");
        };
        let vars = vars.read();
        let fields = vars.as_map().unwrap();
        assert_eq!(fields["secret"], Value::from("********"));
        assert_eq!(fields["parent"], Value::Shared(cell.clone()));
        drop(vars);
        break_cycle(&cell);
    }

    #[test]
    fn visiting_can_be_reused_between_calls() {
        let mut visiting = Visiting::new();
        let identity = |_: Option<&str>, v: Value| v;
        let cell = cyclic();

        varmap_with(&identity, Value::Shared(cell.clone()), &mut visiting);
        varmap_with(&identity, Value::Shared(cell.clone()), &mut visiting);

        assert!(visiting.is_empty());
        break_cycle(&cell);
    }
}
