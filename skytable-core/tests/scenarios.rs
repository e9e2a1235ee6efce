use skytable_core::{
    CastTarget, ColumnType, ElementType, Number, NumericType, Operator, SortCriteria, Table,
};
use rand::{rngs::StdRng, Rng, SeedableRng};
use test_log::test;

fn int_table(name: &str, values: &[Option<i32>]) -> Table {
    let mut table = Table::new(values.len());
    table.new_column(name, ColumnType::Scalar(NumericType::Int)).unwrap();
    for (row, value) in values.iter().enumerate() {
        if let Some(value) = value {
            table.set(name, row, *value).unwrap();
        }
    }
    table
}

fn values(table: &Table, name: &str) -> Vec<Option<i32>> {
    (0..table.row_count())
        .map(|row| table.get::<i32>(name, row).unwrap())
        .collect()
}

#[test]
fn fresh_objects() {
    let mut table = Table::new(4);
    assert_eq!(table.count_selected(), 4);

    table.new_column("X", ColumnType::Scalar(NumericType::Double)).unwrap();
    table.new_column_array("Y", ElementType::Text, 3).unwrap();
    for column in table.columns() {
        assert_eq!(column.count_invalid(), column.len());
        assert_eq!(column.len(), table.row_count());
    }
}

#[test]
fn select_all_is_idempotent() {
    let mut empty = Table::new(3);
    empty.select_all();
    empty.select_all();
    assert_eq!(empty.count_selected(), 3);

    let mut table = int_table("n", &[Some(1), None]);
    table.unselect_row(0).unwrap();
    table.select_all();
    let first = table.selected_rows();
    table.select_all();
    assert_eq!(table.selected_rows(), first);
    assert_eq!(table.count_selected(), 2);
}

#[test]
fn wrap_then_unwrap_returns_same_buffer() {
    let mut table = Table::new(5);
    let buffer = vec![1.0_f64, 2.0, 3.0, 4.0, 5.0];
    let pointer = buffer.as_ptr();

    table.wrap("flux", buffer).unwrap();
    let buffer = table.unwrap::<f64>("flux").unwrap();

    assert_eq!(buffer.as_ptr(), pointer);
    assert_eq!(buffer, vec![1.0, 2.0, 3.0, 4.0, 5.0]);
    assert!(!table.has_column("flux"));
}

#[test]
fn sort_with_invalid_and_ties() {
    let mut table = int_table("x", &[Some(5), Some(3), Some(3), Some(1), None]);
    table.new_column("row", ColumnType::Scalar(NumericType::Int)).unwrap();
    for row in 0..5 {
        table.set("row", row, row as i32).unwrap();
    }

    table.sort(&SortCriteria::new().ascending("x")).unwrap();

    assert_eq!(
        values(&table, "row"),
        vec![Some(4), Some(3), Some(1), Some(2), Some(0)]
    );
    assert_eq!(
        values(&table, "x"),
        vec![None, Some(1), Some(3), Some(3), Some(5)]
    );
}

#[test]
fn multi_key_sort_is_stable() {
    let c1 = [Some(4), Some(2), None, Some(2), Some(9), Some(1), Some(4)];
    let c2 = [Some(1), Some(0), Some(1), None, Some(0), Some(1), Some(0)];

    let mut table = int_table("c1", &c1);
    table.new_column("c2", ColumnType::Scalar(NumericType::Int)).unwrap();
    table.new_column("row", ColumnType::Scalar(NumericType::Int)).unwrap();
    for row in 0..c1.len() {
        if let Some(value) = c2[row] {
            table.set("c2", row, value).unwrap();
        }
        table.set("row", row, row as i32).unwrap();
    }

    let mut by_c1 = table.clone();
    by_c1.sort(&SortCriteria::new().ascending("c1")).unwrap();
    let c1_order = values(&by_c1, "row");

    by_c1.sort(&SortCriteria::new().descending("c2").ascending("c1")).unwrap();
    table.sort(&SortCriteria::new().descending("c2").ascending("c1")).unwrap();
    assert_eq!(values(&by_c1, "row"), values(&table, "row"));

    // Invalid c2 first, then c2 descending, each group in c1 order.
    let c2_sorted = values(&table, "c2");
    assert_eq!(
        c2_sorted,
        vec![None, Some(1), Some(1), Some(1), Some(0), Some(0), Some(0)]
    );

    let rows = values(&table, "row");
    for group in [None, Some(1), Some(0)] {
        let in_group: Vec<_> = rows
            .iter()
            .zip(&c2_sorted)
            .filter(|(_, c2)| **c2 == group)
            .map(|(row, _)| *row)
            .collect();
        let expected: Vec<_> = c1_order
            .iter()
            .filter(|row| c2[row.unwrap() as usize] == group)
            .copied()
            .collect();
        assert_eq!(in_group, expected);
    }
}

#[test]
fn nulls_precede_valid_rows_in_both_directions() {
    for descending in [false, true] {
        let mut table = int_table("x", &[Some(2), None, Some(8), None, Some(5)]);
        let mut criteria = SortCriteria::new();
        criteria.push("x", descending);
        table.sort(&criteria).unwrap();

        let sorted = values(&table, "x");
        assert_eq!(&sorted[..2], &[None, None]);
        let expected = if descending {
            vec![Some(8), Some(5), Some(2)]
        } else {
            vec![Some(2), Some(5), Some(8)]
        };
        assert_eq!(&sorted[2..], &expected[..]);
    }
}

#[test]
fn selection_scenario() {
    let mut table = int_table("n", &[Some(1), Some(2), Some(3), Some(4), Some(5)]);

    assert_eq!(table.and_selected("n", Operator::Greater, Number::Integer(3)), Ok(2));
    assert_eq!(table.selected_rows(), vec![3, 4]);

    assert_eq!(
        table.or_selected("n", Operator::NotGreater, Number::Integer(3)),
        Ok(5)
    );
}

#[test]
fn invalid_elements_break_complementarity() {
    let operators = [
        Operator::Equal,
        Operator::NotEqual,
        Operator::Greater,
        Operator::NotGreater,
        Operator::Less,
        Operator::NotLess,
    ];

    for operator in operators {
        let mut complete = int_table("n", &[Some(1), Some(2), Some(3), Some(4)]);
        complete.and_selected("n", operator, Number::Integer(2)).unwrap();
        let count = complete
            .or_selected("n", operator.inverse(), Number::Integer(2))
            .unwrap();
        assert_eq!(count, 4);

        let mut partial = int_table("n", &[Some(1), None, Some(3), None]);
        partial.and_selected("n", operator, Number::Integer(2)).unwrap();
        let count = partial
            .or_selected("n", operator.inverse(), Number::Integer(2))
            .unwrap();
        assert_eq!(count, 2);
        assert!(!partial.is_selected(1).unwrap());
        assert!(!partial.is_selected(3).unwrap());
    }
}

#[test]
fn erasing_the_last_column_resets_selection() {
    let mut table = int_table("n", &[Some(1), Some(2), Some(3)]);
    table.unselect_row(1).unwrap();
    assert_eq!(table.count_selected(), 2);

    table.erase_column("n").unwrap();
    assert_eq!(table.count_selected(), 3);
    assert_eq!(table.column_count(), 0);
}

#[test]
fn cast_scalar_to_array() {
    let mut table = int_table("n", &[Some(7), None, Some(-2)]);
    table.cast_column("n", None, CastTarget::array(NumericType::Double)).unwrap();

    let column = table.find("n").unwrap();
    assert_eq!(column.depth(), 1);
    assert_eq!(column.len(), 3);
    assert_eq!(
        column.column_type(),
        ColumnType::Array(ElementType::Numeric(NumericType::Double), 1)
    );

    let first = column.get_array(0).unwrap().unwrap();
    assert_eq!(first.len(), 1);
    assert_eq!(first.get::<f64>(0), Ok(Some(7.0)));
    assert!(!column.is_valid(1).unwrap());
    assert_eq!(column.get_array(2).unwrap().unwrap().get_double(0), Ok(Some(-2.0)));
}

#[test]
fn compare_structure_is_reflexive() {
    let mut table = int_table("n", &[Some(1)]);
    table.new_column("s", ColumnType::Text).unwrap();
    table.new_column_array("a", ElementType::Numeric(NumericType::Float), 4).unwrap();
    table.set_unit("n", Some("adu")).unwrap();

    assert!(table.compare_structure(&table));
    assert!(Table::new(0).compare_structure(&Table::new(7)));
}

#[test]
fn row_count_invariant_holds() {
    let mut table = int_table("n", &[Some(1), Some(2), Some(3)]);
    table.new_column("s", ColumnType::Text).unwrap();

    table.insert_window(1, 4);
    table.erase_window(0, 2).unwrap();
    table.set_size(9);
    let copy = table.extract(2, 3).unwrap();
    table.insert(0, &copy).unwrap();

    for column in table.columns() {
        assert_eq!(column.len(), table.row_count());
    }
    assert_eq!(table.row_count(), 12);
}

#[test]
fn random_two_key_sort_matches_reference() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let rows = 200;

    let mut table = Table::new(rows);
    table.new_column("band", ColumnType::Text).unwrap();
    table.new_column("mag", ColumnType::Scalar(NumericType::Float)).unwrap();
    table.new_column("row", ColumnType::Scalar(NumericType::Int)).unwrap();

    let mut reference = Vec::with_capacity(rows);
    for row in 0..rows {
        let band = (!rng.gen_bool(0.1)).then(|| ["B", "R", "V"][rng.gen_range(0..3)].to_string());
        let mag = (!rng.gen_bool(0.1)).then(|| f32::from(rng.gen_range(0_u8..20)) / 2.0);

        if let Some(band) = &band {
            table.set_string("band", row, band).unwrap();
        }
        if let Some(mag) = mag {
            table.set("mag", row, mag).unwrap();
        }
        table.set("row", row, row as i32).unwrap();
        reference.push((band, mag, row as i32));
    }

    table
        .sort(&SortCriteria::new().ascending("band").descending("mag"))
        .unwrap();

    // Invalid entries first, then band ascending, then mag descending, ties by row.
    reference.sort_by(|left, right| {
        left.0.cmp(&right.0).then_with(|| match (left.1, right.1) {
            (None, None) => std::cmp::Ordering::Equal,
            (None, Some(_)) => std::cmp::Ordering::Less,
            (Some(_), None) => std::cmp::Ordering::Greater,
            (Some(first), Some(second)) => second.total_cmp(&first),
        })
    });

    let expected: Vec<_> = reference.into_iter().map(|(_, _, row)| Some(row)).collect();
    assert_eq!(values(&table, "row"), expected);
}
