use dropwatch_npcs::{DropRule, NpcRegistry};

#[test]
fn builtin_profiles_parse() {
    let reg = NpcRegistry::builtin().expect("builtin profiles");
    assert!(!reg.is_empty());
    // Every variant id of a family resolves to the same profile.
    let a = reg.profile(4201).expect("tide_wraith");
    let b = reg.profile(4203).expect("tide_wraith variant");
    assert_eq!(a.name, b.name);
    assert_eq!(a.drop_rule, DropRule::ObserverTile);
}

#[test]
fn unknown_composition_falls_through_to_defaults() {
    let reg = NpcRegistry::builtin().expect("builtin profiles");
    assert!(reg.profile(999_999).is_none());
    assert_eq!(reg.drop_rule(999_999), DropRule::Default);
    assert_eq!(reg.death_health_percent(999_999), 0.0);
    assert_eq!(reg.death_animation(999_999), None);
}

#[test]
fn custom_toml_with_tagged_rules() {
    let reg = NpcRegistry::from_toml_str(
        r#"
        [[npcs]]
        name = "pit_fiend"
        ids = [100, 101]
        death_animation = 77
        drop = { rule = "fixed_offset", dx = -2, dy = 1 }

        [[npcs]]
        name = "mire_leech"
        ids = [200]
        death_health_percent = 0.12
    "#,
    )
    .expect("parse");

    assert_eq!(reg.len(), 2);
    assert_eq!(reg.death_animation(101), Some(77));
    assert_eq!(reg.drop_rule(100), DropRule::FixedOffset { dx: -2, dy: 1 });
    // Missing drop table defaults to the death tile.
    assert_eq!(reg.drop_rule(200), DropRule::Default);
    assert!((reg.death_health_percent(200) - 0.12).abs() < f32::EPSILON);
}

#[test]
fn marker_and_nudge_rules_deserialize() {
    let reg = NpcRegistry::from_toml_str(
        r#"
        [[npcs]]
        name = "scaled_one"
        ids = [1]
        drop = { rule = "marker_item", item_id = 42 }

        [[npcs]]
        name = "nudged_one"
        ids = [2]
        drop = { rule = "toward_observer", dx = 3, dy = 3, nudge = 4 }
    "#,
    )
    .expect("parse");

    assert_eq!(reg.drop_rule(1), DropRule::MarkerItem { item_id: 42 });
    assert_eq!(
        reg.drop_rule(2),
        DropRule::TowardObserver { dx: 3, dy: 3, nudge: 4 }
    );
}
