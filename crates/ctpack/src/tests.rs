use crate::*;

type R<T> = std::result::Result<T, SchemaError>;

const POINT_SCHEMA: &str = "
    struct Point { int32 x; int32 y; }
    fn sum -> int32 { Point p; }
";

fn syntax_error(text: &str) -> (usize, usize, String) {
    match parse_schema(text) {
        Err(SchemaError::Syntax { line, column, message }) => (line, column, message),
        other => panic!("Expected syntax error, got {:?}", other),
    }
}

// ============================================================================
//  PARSING (Happy Path)
// ============================================================================

#[test]
fn test_parse_point_schema() -> R<()> {
    let schema = parse_schema(POINT_SCHEMA)?;

    let point = schema.find_struct("Point").expect("Point declared");
    assert_eq!(
        point.fields,
        vec![
            Field::new("x", Builtin::Int32),
            Field::new("y", Builtin::Int32),
        ]
    );

    let sum = schema.find_function("sum").expect("sum declared");
    assert_eq!(sum.return_type, Type::Builtin(Builtin::Int32));
    assert_eq!(sum.args, vec![Field::new("p", Type::user("Point"))]);
    Ok(())
}

#[test]
fn test_parse_all_builtins() -> R<()> {
    let schema = parse_schema(
        "fn f -> string { int32 a; int64 b; uint32 c; uint64 d; string e; }",
    )?;
    let f = schema.find_function("f").unwrap();
    let tys: Vec<_> = f.args.iter().map(|a| a.ty.to_string()).collect();
    assert_eq!(tys, ["int32", "int64", "uint32", "uint64", "string"]);
    Ok(())
}

#[test]
fn test_declaration_order_is_preserved() -> R<()> {
    let schema = parse_schema("struct S { string z; int32 a; uint64 m; }")?;
    let names: Vec<_> = schema
        .find_struct("S")
        .unwrap()
        .fields
        .iter()
        .map(|f| f.name.as_str())
        .collect();
    assert_eq!(names, ["z", "a", "m"]);
    Ok(())
}

#[test]
fn test_forward_references() -> R<()> {
    let schema = parse_schema(
        "fn get -> Outer { Inner i; }
         struct Outer { Inner inner; string tag; }
         struct Inner { uint32 v; }",
    )?;
    assert!(schema.find_struct("Inner").is_some());
    assert_eq!(schema.find_function("get").unwrap().return_type, Type::user("Outer"));
    Ok(())
}

#[test]
fn test_empty_bodies_and_whitespace() -> R<()> {
    let schema = parse_schema("\n\tstruct Empty{}fn ping->string{}\n")?;
    assert!(schema.find_struct("Empty").unwrap().fields.is_empty());
    assert!(schema.find_function("ping").unwrap().args.is_empty());
    Ok(())
}

#[test]
fn test_empty_document() -> R<()> {
    let schema = parse_schema("   ")?;
    assert_eq!(schema.structs().count(), 0);
    assert_eq!(schema.functions().count(), 0);
    Ok(())
}

#[test]
fn test_longer_cycles_are_accepted() -> R<()> {
    // Only direct self-reference is rejected.
    let schema = parse_schema("struct A { B b; } struct B { A a; }")?;
    assert_eq!(schema.structs().count(), 2);
    Ok(())
}

// ============================================================================
//  VALIDATION ERRORS
// ============================================================================

#[test]
fn test_direct_self_reference() {
    assert_eq!(
        parse_schema("struct S { S x; }"),
        Err(SchemaError::SelfReference {
            name: "S".into(),
            field: "x".into()
        })
    );
}

#[test]
fn test_unknown_type_in_field() {
    let err = parse_schema("struct S { Missing m; }").unwrap_err();
    assert_eq!(
        err,
        SchemaError::UnknownType {
            name: "Missing".into(),
            context: "struct 'S'".into()
        }
    );
}

#[test]
fn test_unknown_return_type() {
    let err = parse_schema("fn f -> Nope {}").unwrap_err();
    assert!(matches!(err, SchemaError::UnknownType { ref name, .. } if name == "Nope"));
}

#[test]
fn test_unknown_arg_type() {
    let err = parse_schema("fn f -> int32 { Ghost g; }").unwrap_err();
    assert_eq!(err.to_string(), "unknown type 'Ghost' in function arg 'f.g'");
}

#[test]
fn test_duplicate_struct() {
    assert_eq!(
        parse_schema("struct A {} struct A {}"),
        Err(SchemaError::DuplicateStruct("A".into()))
    );
}

#[test]
fn test_duplicate_function() {
    assert_eq!(
        parse_schema("fn f -> int32 {} fn f -> string {}"),
        Err(SchemaError::DuplicateFunction("f".into()))
    );
}

#[test]
fn test_duplicate_field() {
    assert_eq!(
        parse_schema("struct A { int32 x; string x; }"),
        Err(SchemaError::DuplicateField {
            owner: "A".into(),
            field: "x".into()
        })
    );
}

#[test]
fn test_duplicate_argument() {
    assert_eq!(
        parse_schema("fn f -> int32 { int32 a; int32 a; }"),
        Err(SchemaError::DuplicateArgument {
            owner: "f".into(),
            arg: "a".into()
        })
    );
}

#[test]
fn test_struct_and_function_may_share_a_name() -> R<()> {
    let schema = parse_schema("struct echo { string s; } fn echo -> echo { echo e; }")?;
    assert!(schema.find_struct("echo").is_some());
    assert!(schema.find_function("echo").is_some());
    Ok(())
}

// ============================================================================
//  SYNTAX ERRORS
// ============================================================================

#[test]
fn test_missing_semicolon() {
    let (line, column, message) = syntax_error("struct A {\n  int32 x\n}");
    assert_eq!((line, column), (3, 1));
    assert_eq!(message, "expected ';'");
}

#[test]
fn test_missing_arrow() {
    let (_, _, message) = syntax_error("fn f int32 {}");
    assert_eq!(message, "expected '->'");
}

#[test]
fn test_unknown_item_keyword() {
    let (line, column, message) = syntax_error("  enum E {}");
    assert_eq!((line, column), (1, 3));
    assert_eq!(message, "expected 'struct' or 'fn'");
}

#[test]
fn test_keyword_as_name() {
    let (_, _, message) = syntax_error("struct int32 {}");
    assert!(message.contains("keyword 'int32'"));

    let (_, _, message) = syntax_error("struct A { string string; }");
    assert!(message.contains("keyword 'string'"));
}

#[test]
fn test_keyword_as_type() {
    let (_, _, message) = syntax_error("struct A { fn x; }");
    assert_eq!(message, "keyword 'fn' is not a type");
}

#[test]
fn test_unclosed_body() {
    let (_, _, message) = syntax_error("struct A { int32 x;");
    assert_eq!(message, "expected '}'");
}

#[test]
fn test_identifier_cannot_start_with_digit() {
    let (_, _, message) = syntax_error("struct 9A {}");
    assert_eq!(message, "expected struct name");
}

// ============================================================================
//  PROGRAMMATIC CONSTRUCTION
// ============================================================================

#[test]
fn test_schema_new_validates_like_the_parser() {
    let err = Schema::new(
        vec![Struct::new("Node", vec![Field::new("next", Type::user("Node"))])],
        vec![],
    )
    .unwrap_err();
    assert!(matches!(err, SchemaError::SelfReference { .. }));

    let err = Schema::new(
        vec![],
        vec![Function::new("f", Type::user("Missing"), vec![])],
    )
    .unwrap_err();
    assert!(matches!(err, SchemaError::UnknownType { .. }));
}

#[test]
fn test_builtin_keywords() {
    for b in Builtin::ALL {
        assert_eq!(Builtin::from_keyword(b.keyword()), Some(b));
    }
    assert_eq!(Builtin::from_keyword("int"), None);
    assert!(!Builtin::String.is_integer());
    assert!(Builtin::Uint64.is_integer());
}
