use super::*;

fn placeholders(sql: &str) -> usize {
    sql.matches('?').count()
}

#[test]
fn and_of_raw_fragments_has_no_value() {
    let and = crate::and!["1 = 1", "2 <> 3"];
    assert!(!and.has_bound_value());
    assert!(and.value().is_none());
    assert_eq!(and.render(), "(1 = 1 AND 2 <> 3)");
}

#[test]
fn nested_groups_render_in_item_order() {
    let and = crate::and!["1 = 1", crate::and!["2 <> 3", "3 < 4"]];
    assert_eq!(and.render(), "(1 = 1 AND (2 <> 3 AND 3 < 4))");

    let or = crate::or!["1 = 1", crate::or!["2 <> 3", "3 < 4"]];
    assert_eq!(or.render(), "(1 = 1 OR (2 <> 3 OR 3 < 4))");
}

#[test]
fn and_collects_operator_values() {
    let and = crate::and![eq("a", 1), neq("b", 2)];
    assert!(and.has_bound_value());
    assert_eq!(and.kind(), OperatorKind::And);
    assert_eq!(and.render(), "(a = ? AND b != ?)");

    let bag = and.value().unwrap();
    assert!(bag.as_bag().is_some());
    assert_eq!(bag.flatten(), vec![Value::Int(1), Value::Int(2)]);
}

#[test]
fn or_collects_operator_values() {
    let or = crate::or![eq("a", 1), neq("b", 2)];
    assert!(or.has_bound_value());
    assert_eq!(or.render(), "(a = ? OR b != ?)");
    assert_eq!(or.values(), vec![Value::Int(1), Value::Int(2)]);
}

#[test]
fn value_order_follows_placeholders_across_raw_and_null_items() {
    let and = crate::and![
        "x.active",
        eq("a", "v1"),
        eq("deleted_at", None::<i32>),
        "y > 0",
        between("b", 5, 9),
        crate::or!["z IS NULL", eq("c", "v2")],
    ];

    assert_eq!(
        and.render(),
        "(x.active AND a = ? AND deleted_at IS NULL AND y > 0 AND b BETWEEN ? AND ? AND (z IS NULL OR c = ?))"
    );
    assert_eq!(
        and.values(),
        vec![
            Value::from("v1"),
            Value::Int(5),
            Value::Int(9),
            Value::from("v2"),
        ]
    );
    assert_eq!(placeholders(&and.render()), and.values().len());

    // Nested groups stay nested until flattened.
    let bag = and.value().unwrap();
    let raw = bag.as_bag().unwrap().raw();
    assert_eq!(raw.len(), 3);
    assert!(raw[1].as_bag().is_some());
    assert!(raw[2].as_bag().is_some());
}

#[test]
fn empty_groups_render_identity() {
    let and = crate::and![];
    let or = crate::or![];
    assert_eq!(and.render(), "(1=1)");
    assert_eq!(or.render(), "(1=0)");
    assert!(!and.has_bound_value());
    assert!(!or.has_bound_value());
}

#[test]
fn between_binds_ordered_pair() {
    let between = between("year", 2001, 2009);
    assert_eq!(between.render(), "year BETWEEN ? AND ?");
    assert!(between.has_bound_value());

    let bag = between.value().unwrap();
    assert_eq!(bag.as_bag().unwrap().len(), 2);
    assert_eq!(bag.flatten(), vec![Value::Int(2001), Value::Int(2009)]);
}

#[test]
fn not_between_binds_ordered_pair() {
    let op = not_between("year", 2005, 2007);
    assert_eq!(op.render(), "year NOT BETWEEN ? AND ?");
    assert_eq!(op.kind(), OperatorKind::NotBetween);
    assert_eq!(op.values(), vec![Value::Int(2005), Value::Int(2007)]);
}

#[test]
fn eq_renders_null_check_without_value() {
    let eq1 = eq("name", "John");
    assert_eq!(eq1.render(), "name = ?");
    assert!(eq1.has_bound_value());
    assert_eq!(eq1.value(), Some(BoundValue::single("John")));

    let eq2 = eq("ranking", None::<i64>);
    assert_eq!(eq2.render(), "ranking IS NULL");
    assert!(!eq2.has_bound_value());
    assert!(eq2.values().is_empty());
}

#[test]
fn neq_renders_not_null_check_without_value() {
    let neq1 = neq("name", "John");
    assert_eq!(neq1.render(), "name != ?");
    assert!(neq1.has_bound_value());

    let neq2 = neq("ranking", Value::Null);
    assert_eq!(neq2.render(), "ranking IS NOT NULL");
    assert!(!neq2.has_bound_value());
}

#[test]
fn find_in_set_keeps_expression_verbatim() {
    let op = find_in_set("ids", 42);
    assert_eq!(op.render(), "FIND_IN_SET(?, ids)");
    assert!(op.has_bound_value());
    assert_eq!(op.value(), Some(BoundValue::single(42)));

    let op = not_find_in_set("CONCAT(a, ',', b)", 42);
    assert_eq!(op.render(), "NOT FIND_IN_SET(?, CONCAT(a, ',', b))");
    assert_eq!(op.kind(), OperatorKind::FindInSet);
}

#[test]
fn ordering_comparisons_render() {
    let cases = [
        (gt("id", 33).unwrap(), "id > ?", OperatorKind::Gt),
        (gte("id", 33).unwrap(), "id >= ?", OperatorKind::Gte),
        (lt("age", 18).unwrap(), "age < ?", OperatorKind::Lt),
        (lte("age", 36).unwrap(), "age <= ?", OperatorKind::Lte),
    ];
    for (op, sql, kind) in cases {
        assert_eq!(op.render(), sql);
        assert_eq!(op.kind(), kind);
        assert!(op.has_bound_value());
        assert_eq!(op.values().len(), 1);
    }
    assert_eq!(gte("id", 33).unwrap().values(), lt("x", 33).unwrap().values());
}

#[test]
fn ordering_comparisons_reject_null() {
    for (result, name) in [
        (gt("age", None::<i32>), "Gt"),
        (gte("age", None::<i32>), "Gte"),
        (lt("age", Value::Null), "Lt"),
        (lte("age", Value::Null), "Lte"),
    ] {
        let err = result.unwrap_err();
        assert!(err.is_invalid_argument());
        assert!(err.to_string().contains(name), "{err}");
    }
}

#[test]
fn in_binds_whole_list_to_one_placeholder() {
    let op = in_list("id", [1, 2, 3]).unwrap();
    assert_eq!(op.render(), "id IN(?)");
    assert!(op.has_bound_value());
    assert_eq!(op.values(), vec![Value::from(vec![1, 2, 3])]);
    assert_eq!(placeholders(&op.render()), 1);

    let op = not_in("id", [7, 8, 8]).unwrap();
    assert_eq!(op.render(), "id NOT IN(?)");
    assert_eq!(op.values(), vec![Value::from(vec![7, 8, 8])]);
}

#[test]
fn in_rejects_empty_list() {
    let err = in_list("age", Vec::<i32>::new()).unwrap_err();
    assert!(err.is_invalid_argument());
    assert!(err.to_string().contains("`In`"));

    let err = not_in("age", Vec::<i32>::new()).unwrap_err();
    assert!(err.to_string().contains("`NotIn`"));
}

#[test]
fn like_wraps_pattern_unless_raw() {
    let op = like("description", "lorem ipsum");
    assert_eq!(op.render(), "description LIKE ?");
    assert!(op.has_bound_value());
    assert_eq!(op.values(), vec![Value::from("%lorem ipsum%")]);

    let op = like_raw("full_name", "J_hn D_e");
    assert_eq!(op.values(), vec![Value::from("J_hn D_e")]);
}

#[test]
fn not_like_wraps_pattern_unless_raw() {
    let op = not_like("description", "lorem ipsum");
    assert_eq!(op.render(), "description NOT LIKE ?");
    assert_eq!(op.values(), vec![Value::from("%lorem ipsum%")]);
    assert_eq!(not_like_raw("d", "a%").values(), vec![Value::from("a%")]);
}

#[test]
fn placeholder_count_matches_flattened_values() {
    let ops = vec![
        eq("a", 1),
        neq("a", 1),
        gt("a", 1).unwrap(),
        gte("a", 1).unwrap(),
        lt("a", 1).unwrap(),
        lte("a", 1).unwrap(),
        between("a", 1, 2),
        not_between("a", 1, 2),
        like("a", "x"),
        not_like("a", "x"),
        find_in_set("a", 1),
        crate::and![eq("a", 1), between("b", 1, 2), "c"],
        crate::or![crate::and![eq("a", 1)], like("b", "x")],
    ];
    for op in ops {
        assert_eq!(placeholders(&op.render()), op.values().len(), "{op}");
    }
}

#[test]
fn display_matches_render() {
    let op = crate::and!["t4.id = t2.id", eq("t4.group", "x")];
    assert_eq!(op.to_string(), op.render());
    assert_eq!(Condition::raw("a = b").to_string(), "a = b");
    assert_eq!(Condition::from(op.clone()).to_string(), op.render());
}

#[test]
fn condition_exposes_operator() {
    let cond = Condition::from(eq("a", 1));
    assert_eq!(cond.as_operator().map(Operator::kind), Some(OperatorKind::Eq));
    assert!(Condition::from("a = 1").as_operator().is_none());
    assert!(Condition::from("a = 1").bound_value().is_none());
}
