use board::error::{CatalogError, ErrorKind};
use catalog_lib::{
    Catalog, Form, MovementPattern, Offset, TargetMode, Targeting, UnitDefinitionGetter,
};

#[test]
fn load_minimal_catalog() {
    let catalog = Catalog::from_toml_str(include_str!("fixtures/minimal.toml")).unwrap();
    assert_eq!(catalog.len(), 1);

    let pike = catalog.get("PIKE").unwrap();
    assert_eq!(
        pike.movement,
        MovementPattern::TeleportFixed {
            offsets: vec![Offset::new(0, -2)]
        }
    );
    let ranged = pike.ranged.unwrap();
    assert_eq!(ranged.range, 2);
    assert!(!ranged.line_of_sight_blocked_by_units);

    let skill = pike.skill("pike_thrust").unwrap();
    assert_eq!(skill.requires_form, Some(Form::Evolved));
    assert!(!skill.once_per_match);
    assert_eq!(skill.targeting.mode(), TargetMode::ChooseLineDirection);
    assert_eq!(
        skill.targeting,
        Targeting::ChooseLineDirection {
            range: 2,
            damage: 1,
            knockback: 0
        }
    );
}

#[test]
fn duplicate_skill_rejects_catalog() {
    let err = Catalog::from_toml_str(include_str!("fixtures/duplicate_skill.toml")).unwrap_err();
    assert!(matches!(
        err.kind(),
        ErrorKind::Catalog(CatalogError::DuplicateSkill { skill_id }) if skill_id == "slash"
    ));
}

#[test]
fn duplicate_unit_rejects_catalog() {
    let src = include_str!("fixtures/minimal.toml").replace("pike_thrust", "pike_thrust_2");
    let doubled = format!("{}\n{}", include_str!("fixtures/minimal.toml"), src);
    let err = Catalog::from_toml_str(&doubled).unwrap_err();
    assert!(matches!(
        err.kind(),
        ErrorKind::Catalog(CatalogError::DuplicateUnit { unit_id }) if unit_id == "PIKE"
    ));
}

#[test]
fn malformed_toml_is_load_error() {
    let err = Catalog::from_toml_str("[[units]]\nid = ").unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::Load(_)));
}

#[test]
fn base_form_requirement_is_invalid() {
    let src = include_str!("fixtures/minimal.toml").replace("\"evolved\"", "\"base\"");
    let err = Catalog::from_toml_str(&src).unwrap_err();
    assert!(matches!(
        err.kind(),
        ErrorKind::Catalog(CatalogError::InvalidSkill { .. })
    ));
}
