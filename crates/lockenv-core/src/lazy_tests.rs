use super::*;
use crate::error::EnvError;
use std::sync::atomic::AtomicUsize;

fn counting_value(calls: &Arc<AtomicUsize>, value: i64) -> LazyValue {
    let calls = Arc::clone(calls);
    LazyValue::new(TargetType::Int, move || {
        calls.fetch_add(1, Ordering::SeqCst);
        Value::Int(value)
    })
}

fn counting_iter(steps: &Arc<AtomicUsize>, items: Vec<i64>) -> LazyIter {
    let steps = Arc::clone(steps);
    LazyIter::new(TargetType::Int, move || {
        let steps = Arc::clone(&steps);
        items.clone().into_iter().map(move |i| {
            steps.fetch_add(1, Ordering::SeqCst);
            Value::Int(i)
        })
    })
}

#[test]
fn test_lazy_value_invokes_producer_once() {
    let calls = Arc::new(AtomicUsize::new(0));
    let lazy = counting_value(&calls, 1);
    assert!(!lazy.is_settled());
    for _ in 0..3 {
        assert_eq!(lazy.resolve().unwrap(), Value::Int(1));
    }
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(lazy.is_settled());
}

#[test]
fn test_lazy_value_set_value_overrides() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut lazy = counting_value(&calls, 1);
    assert_eq!(lazy.resolve().unwrap(), Value::Int(1));
    lazy.set_value(Value::Int(2)).unwrap();
    assert_eq!(lazy.resolve().unwrap(), Value::Int(2));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_lazy_value_initial_skips_producer() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut lazy = counting_value(&calls, 1).with_initial(3i64).unwrap();
    assert_eq!(lazy.resolve().unwrap(), Value::Int(3));
    lazy.set_value(Value::Int(4)).unwrap();
    assert_eq!(lazy.resolve().unwrap(), Value::Int(4));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_lazy_value_coerces_producer_result() {
    let lazy = LazyValue::new(TargetType::Bool, || Value::from("off"));
    assert_eq!(lazy.resolve().unwrap(), Value::Bool(false));
}

#[test]
fn test_lazy_value_coercion_failure_is_reported_and_not_cached() {
    let lazy = LazyValue::new(TargetType::Int, || Value::from("not a port"));
    let err = lazy.resolve().unwrap_err();
    assert!(matches!(
        err,
        EnvError::TypeCoercion {
            expected: TargetType::Int,
            ..
        }
    ));
    assert!(!lazy.is_settled());
}

#[test]
fn test_lazy_value_rejects_bad_initial_and_override() {
    let lazy = LazyValue::new(TargetType::Bool, || Value::Bool(true));
    assert!(lazy.with_initial("sometimes").is_err());

    let mut lazy = LazyValue::new(TargetType::Bool, || Value::Bool(true));
    assert!(lazy.set_value(Value::Int(7)).is_err());
    assert!(!lazy.is_settled());
    assert_eq!(lazy.resolve().unwrap(), Value::Bool(true));
}

#[test]
fn test_lazy_value_fixed_resolves_to_coerced_value() {
    let mut lazy = LazyValue::fixed(TargetType::Int, "636").unwrap();
    assert!(!lazy.is_settled());
    assert_eq!(lazy.resolve().unwrap(), Value::Int(636));
    assert!(lazy.is_settled());
    lazy.set_value(Value::from("389")).unwrap();
    assert_eq!(lazy.resolve().unwrap(), Value::Int(389));

    let err = LazyValue::fixed(TargetType::Bool, "sometimes").unwrap_err();
    assert_eq!(err.to_string(), "cannot coerce \"sometimes\" to bool");
}

#[test]
fn test_lazy_iter_advances_on_demand() {
    let steps = Arc::new(AtomicUsize::new(0));
    let lazy = counting_iter(&steps, vec![3, 4, 5]);
    let mut seq = lazy.resolve();
    assert_eq!(steps.load(Ordering::SeqCst), 0);

    for (expected_steps, expected) in [(1, 3), (2, 4), (3, 5)] {
        assert_eq!(seq.next().unwrap().unwrap(), Value::Int(expected));
        assert_eq!(steps.load(Ordering::SeqCst), expected_steps);
    }
    assert!(seq.next().is_none());
    assert!(seq.next().is_none());
    assert_eq!(steps.load(Ordering::SeqCst), 3);
}

#[test]
fn test_lazy_iter_initial_value_comes_first() {
    let lazy = LazyIter::new(TargetType::Int, || vec![Value::Int(1), Value::Int(2)])
        .with_initial(0i64)
        .unwrap();
    let values: Vec<Value> = lazy.resolve().map(|v| v.unwrap()).collect();
    assert_eq!(values, vec![Value::Int(0), Value::Int(1), Value::Int(2)]);
}

#[test]
fn test_lazy_iter_each_resolve_is_fresh() {
    let steps = Arc::new(AtomicUsize::new(0));
    let lazy = counting_iter(&steps, vec![1, 2]);
    let mut first = lazy.resolve();
    assert_eq!(first.next().unwrap().unwrap(), Value::Int(1));
    drop(first);

    let second: Vec<Value> = lazy.resolve().map(|v| v.unwrap()).collect();
    assert_eq!(second, vec![Value::Int(1), Value::Int(2)]);
    assert_eq!(steps.load(Ordering::SeqCst), 3);
}

#[test]
fn test_lazy_iter_bad_element_surfaces_as_error() {
    let lazy = LazyIter::new(TargetType::Int, || vec![Value::Int(1), Value::from("two")]);
    let mut seq = lazy.resolve();
    assert!(seq.next().unwrap().is_ok());
    assert!(matches!(
        seq.next().unwrap(),
        Err(EnvError::TypeCoercion { .. })
    ));
    assert!(seq.next().is_none());
}

#[test]
fn test_lazy_iter_set_value_replaces_sequence() {
    let steps = Arc::new(AtomicUsize::new(0));
    let mut lazy = counting_iter(&steps, vec![1, 2]);
    assert!(!lazy.is_settled());
    lazy.set_value(Value::from(vec!["8", "9"])).unwrap();
    assert!(lazy.is_settled());
    let values: Vec<Value> = lazy.resolve().map(|v| v.unwrap()).collect();
    assert_eq!(values, vec![Value::Int(8), Value::Int(9)]);
    assert_eq!(steps.load(Ordering::SeqCst), 0);

    lazy.set_value(Value::Int(5)).unwrap();
    let values: Vec<Value> = lazy.resolve().map(|v| v.unwrap()).collect();
    assert_eq!(values, vec![Value::Int(5)]);
}

#[test]
fn test_lazy_iter_resolve_settles() {
    let lazy = LazyIter::new(TargetType::Str, Vec::new);
    assert!(!lazy.is_settled());
    let _ = lazy.resolve();
    assert!(lazy.is_settled());
}

#[test]
fn test_deferred_value_dispatch() {
    let single = DeferredValue::from(LazyValue::new(TargetType::Str, || Value::from("x")));
    assert_eq!(
        single.resolve().unwrap().into_value().unwrap(),
        Value::from("x")
    );
    assert_eq!(single.to_string(), "<deferred str>");

    let iter = DeferredValue::from(LazyIter::new(TargetType::Str, || {
        vec![Value::from("a"), Value::from("b")]
    }));
    assert_eq!(iter.to_string(), "<deferred iter str>");
    let resolved = iter.resolve().unwrap();
    assert_eq!(
        resolved.into_value().unwrap(),
        Value::from(vec!["a", "b"])
    );
}

#[test]
fn test_deferred_values_are_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<DeferredValue>();
}
