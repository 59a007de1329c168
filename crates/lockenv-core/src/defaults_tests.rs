use super::*;

fn populated() -> Env {
    let mut env = Env::new();
    populate_defaults(&mut env).unwrap();
    env
}

#[test]
fn test_catalog_names_match_bindings() {
    let env = populated();
    assert_eq!(env.names().collect::<Vec<_>>(), DEFAULT_NAMES);
    assert_eq!(env.field_names().count(), DEFAULT_NAMES.len());
}

#[test]
fn test_default_values() {
    let env = populated();
    assert_eq!(env.value("domain").unwrap(), Value::from("example.com"));
    assert_eq!(env.value("realm").unwrap(), Value::from("EXAMPLE.COM"));
    assert_eq!(env.value("basedn").unwrap(), Value::from("dc=example,dc=com"));
    assert_eq!(env.value("query_dns").unwrap(), Value::Bool(true));
    assert_eq!(env.value("server_context").unwrap(), Value::Bool(true));
    assert_eq!(env.value("verbose").unwrap(), Value::Bool(false));
    assert_eq!(env.value("ldap_port").unwrap(), Value::Int(DEFAULT_LDAP_PORT));
    assert_eq!(
        env.value("server").unwrap(),
        Value::from(vec!["first", "second"])
    );
}

#[test]
fn test_every_default_is_deferred() {
    let env = populated();
    for (name, entry) in env.iter() {
        assert!(
            matches!(entry, Entry::Deferred(_)),
            "{name} should be a deferred default"
        );
    }
}

#[test]
fn test_sources_override_defaults() {
    let mut env = populated();
    env.bulk_update(
        [
            ("query_dns", Value::Bool(false)),
            ("server", Value::from(vec!["first", "second"])),
            ("realm", Value::from("myrealm")),
            ("server_context", Value::from("off")),
        ],
        false,
    )
    .unwrap();

    assert_eq!(env.value("server_context").unwrap(), Value::Bool(false));
    assert_eq!(env.value("query_dns").unwrap(), Value::Bool(false));
    assert_eq!(env.value("realm").unwrap(), Value::from("myrealm"));

    let mut servers = env.get("server").unwrap().into_seq().unwrap();
    assert_eq!(servers.next().unwrap().unwrap(), Value::from("first"));
    assert_eq!(servers.next().unwrap().unwrap(), Value::from("second"));
    assert!(servers.next().is_none());
}

#[test]
fn test_overriding_server_list_keeps_it_lazy() {
    let mut env = populated();
    env.bulk_update(
        [
            ("query_dns", Value::Bool(false)),
            ("server", Value::from(vec!["x", "y"])),
        ],
        false,
    )
    .unwrap();
    assert_eq!(env.value("query_dns").unwrap(), Value::Bool(false));
    let servers: Vec<Value> = env
        .get("server")
        .unwrap()
        .into_seq()
        .unwrap()
        .map(|v| v.unwrap())
        .collect();
    assert_eq!(servers, vec![Value::from("x"), Value::from("y")]);
}

#[test]
fn test_populating_twice_fails_without_changes() {
    let mut env = populated();
    let err = populate_defaults(&mut env).unwrap_err();
    assert!(err.is_already_bound());
    assert_eq!(env.len(), DEFAULT_NAMES.len());
}

#[test]
fn test_preexisting_name_fails_before_binding() {
    let mut env = Env::new();
    env.bind("verbose", true).unwrap();
    let err = populate_defaults(&mut env).unwrap_err();
    assert!(err.is_already_bound());
    assert_eq!(err.to_string(), "cannot overwrite Env.verbose with <deferred bool>");
    assert_eq!(env.len(), 1);
}

#[test]
fn test_locked_env_cannot_be_populated() {
    let mut env = Env::new();
    env.lock().unwrap();
    assert!(populate_defaults(&mut env).unwrap_err().is_already_locked());
}

#[test]
fn test_bad_override_is_a_type_error() {
    let mut env = populated();
    let err = env.bind("ldap_port", "ldaps").unwrap_err();
    assert_eq!(err.to_string(), "cannot coerce \"ldaps\" to int");
    assert_eq!(env.value("ldap_port").unwrap(), Value::Int(389));
}

#[test]
fn test_basedn_for_splits_labels() {
    assert_eq!(basedn_for("corp.example.org"), "dc=corp,dc=example,dc=org");
}

#[test]
fn test_domain_override_does_not_rederive_realm_or_basedn() {
    let mut env = populated();
    env.bind("domain", "corp.test").unwrap();
    assert_eq!(env.value("domain").unwrap(), Value::from("corp.test"));
    assert_eq!(env.value("realm").unwrap(), Value::from("EXAMPLE.COM"));
    assert_eq!(env.value("basedn").unwrap(), Value::from("dc=example,dc=com"));
}
