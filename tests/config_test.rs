use stenciler::config::{merge, param_values, Manifest, ParamSpec, TemplateSpec};
use stenciler::error::Error;

const SAMPLE: &str = r#"
templates:
  - directory: firefly
    params:
      - name: ship
        prompt: "Name of the ship"
        default: Serenity
        validation-hook: hooks/validate-ship.sh
      - name: captain
        value: Reynolds
    raw-copy:
      - "**/*.png"
    init-only:
      - "README.md"
    pre-init-hooks:
      - hooks/pre-init.sh
    post-update-hooks:
      - hooks/post-update.sh
"#;

#[test]
fn test_parse_manifest() {
    let manifest = Manifest::parse(SAMPLE).unwrap();
    assert_eq!(manifest.templates.len(), 1);

    let spec = &manifest.templates[0];
    assert_eq!(spec.directory, "firefly");
    assert!(spec.repository.is_none());
    assert_eq!(spec.raw_copy, vec!["**/*.png"]);
    assert_eq!(spec.init_only, vec!["README.md"]);
    assert_eq!(spec.pre_init_hooks, vec!["hooks/pre-init.sh"]);
    assert!(spec.pre_update_hooks.is_empty());
    assert_eq!(spec.post_update_hooks, vec!["hooks/post-update.sh"]);

    let ship = &spec.params[0];
    assert_eq!(ship.name, "ship");
    assert_eq!(ship.prompt.as_deref(), Some("Name of the ship"));
    assert_eq!(ship.default.as_deref(), Some("Serenity"));
    assert_eq!(ship.validation_hook.as_deref(), Some("hooks/validate-ship.sh"));
    assert!(ship.value.is_none());

    let captain = &spec.params[1];
    assert_eq!(captain.value.as_deref(), Some("Reynolds"));
    assert!(captain.prompt.is_none());
}

#[test]
fn test_duplicate_param_names_rejected() {
    let content = r#"
templates:
  - directory: firefly
    params:
      - name: ship
        value: Serenity
      - name: ship
        value: Rogue
"#;
    match Manifest::parse(content) {
        Err(Error::ConfigError(msg)) => assert!(msg.contains("duplicate parameter 'ship'")),
        other => panic!("expected ConfigError, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_missing_directory_rejected() {
    let content = "templates:\n  - params: []\n";
    assert!(Manifest::parse(content).is_err());
}

#[test]
fn test_round_trip_preserves_values() {
    let manifest = Manifest::parse(SAMPLE).unwrap();
    let yaml = manifest.to_yaml().unwrap();
    let reparsed = Manifest::parse(&yaml).unwrap();
    assert_eq!(manifest.templates, reparsed.templates);
}

#[test]
fn test_find_directory() {
    let manifest = Manifest::parse(SAMPLE).unwrap();
    assert!(manifest.find_directory("firefly").is_some());
    assert!(manifest.find_directory("alliance").is_none());
}

fn prompted_param(name: &str, value: Option<&str>) -> ParamSpec {
    ParamSpec {
        name: name.to_string(),
        value: value.map(str::to_string),
        prompt: Some(format!("Value for {}", name)),
        ..ParamSpec::default()
    }
}

#[test]
fn test_merge_keeps_prior_prompted_values() {
    let refreshed = TemplateSpec {
        directory: "firefly".to_string(),
        params: vec![
            prompted_param("ship", None),
            prompted_param("callsign", None),
            ParamSpec {
                name: "captain".to_string(),
                value: Some("Reynolds".to_string()),
                ..ParamSpec::default()
            },
        ],
        raw_copy: vec!["**/*.png".to_string()],
        pre_update_hooks: vec!["hooks/new-pre-update.sh".to_string()],
        ..TemplateSpec::default()
    };
    let prior = TemplateSpec {
        repository: Some("https://example.com/tpl.git".to_string()),
        directory: "firefly".to_string(),
        params: vec![
            prompted_param("ship", Some("Serenity")),
            // fixed value in the prior entry must not override the template
            ParamSpec {
                name: "captain".to_string(),
                value: Some("Mal".to_string()),
                ..ParamSpec::default()
            },
        ],
        raw_copy: vec!["old-glob".to_string()],
        pre_update_hooks: vec!["hooks/old-pre-update.sh".to_string()],
        ..TemplateSpec::default()
    };

    let merged = merge(&refreshed, &prior);

    assert_eq!(merged.repository.as_deref(), Some("https://example.com/tpl.git"));
    // prompted value carried forward
    assert_eq!(merged.params[0].value.as_deref(), Some("Serenity"));
    // newly introduced param still unresolved
    assert!(merged.params[1].value.is_none());
    // fixed value follows the refreshed template, not the prior entry
    assert_eq!(merged.params[2].value.as_deref(), Some("Reynolds"));
    // structure comes from the refreshed spec
    assert_eq!(merged.raw_copy, vec!["**/*.png"]);
    assert_eq!(merged.pre_update_hooks, vec!["hooks/new-pre-update.sh"]);
}

#[test]
fn test_param_values_order() {
    let params = vec![
        ParamSpec {
            name: "ship".to_string(),
            value: Some("Serenity".to_string()),
            ..ParamSpec::default()
        },
        ParamSpec {
            name: "captain".to_string(),
            value: Some("Reynolds".to_string()),
            ..ParamSpec::default()
        },
    ];
    let values = param_values(&params);
    let keys: Vec<&String> = values.keys().collect();
    assert_eq!(keys, ["ship", "captain"]);
    assert_eq!(values["ship"], "Serenity");
}
