use pretty_assertions::assert_eq;

use super::*;
use kb_ir::Name;

#[test]
fn display_forms() {
    assert_eq!(Value::None.to_string(), "none");
    assert_eq!(Value::Empty.to_string(), "empty");
    assert_eq!(Value::Double(2.5).to_string(), "2.5");
    assert_eq!(
        Value::array(Type::INT, vec![Value::Int(1), Value::Int(2)]).to_string(),
        "[1, 2]"
    );
    let entry = EnumEntry::new(Name::new("Color"), Name::new("Red"), 0, Value::Int(0));
    assert_eq!(Value::Enum(entry).to_string(), "Red");
}

#[test]
fn is_empty_predicate() {
    assert!(Value::Int(0).is_empty());
    assert!(Value::string("  ").is_empty());
    assert!(Value::Char('\0').is_empty());
    assert!(Value::array(Type::INT, vec![]).is_empty());
    assert!(!Value::Bool(true).is_empty());
    assert!(!Value::Double(0.5).is_empty());
}

#[test]
fn equality_is_structural_and_tag_exact() {
    let a = Value::array(Type::INT, vec![Value::Int(1)]);
    let b = Value::array(Type::INT, vec![Value::Int(1)]);
    assert_eq!(a, b);
    assert_ne!(Value::Int(1), Value::Long(1));
}

#[test]
fn arrays_share_storage() {
    let Value::Array(a) = Value::array(Type::INT, vec![Value::Int(1), Value::Int(2)]) else {
        unreachable!()
    };
    let alias = a.clone();
    assert!(alias.set(1, Value::Int(9)));
    assert_eq!(a.get(1), Some(Value::Int(9)));
    assert!(!alias.set(5, Value::Int(0)));
}

#[test]
fn inferred_types() {
    assert_eq!(Value::Int(1).infer_type(), Some(Type::INT));
    assert_eq!(Value::Empty.infer_type(), None);
    assert_eq!(
        Value::array(Type::CHAR, vec![]).infer_type(),
        Some(Type::array(Type::CHAR, None))
    );
    assert_eq!(Value::Empty.type_name(), "empty");
}

#[test]
fn enum_entries_compare_by_enum_and_ordinal() {
    let a = EnumEntry::new(Name::new("Color"), Name::new("Red"), 0, Value::Int(0));
    let b = EnumEntry::new(Name::new("Color"), Name::new("Red"), 0, Value::Int(0));
    let c = EnumEntry::new(Name::new("Color"), Name::new("Green"), 1, Value::Int(1));
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn numeric_conversion() {
    assert_eq!(numeric::widen(&Value::Byte(3), NumericKind::Long), Some(Value::Long(3)));
    assert_eq!(numeric::widen(&Value::Long(3), NumericKind::Int), None);
    assert_eq!(numeric::convert(&Value::Double(-1.9), NumericKind::Int), Some(Value::Int(-1)));
    assert_eq!(numeric::from_i64(256, NumericKind::Byte), Value::Byte(0));
}
