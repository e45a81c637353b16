use proptest::prelude::*;
use signal_realign::processors::alignment::{
    argmax, find_middle, realign_data, reference_column, shift_column, AlignMode,
};
use signal_realign::Table;

/// Positive series of varying length, zero-padded into one table.
fn positive_table() -> impl Strategy<Value = Table> {
    prop::collection::vec(prop::collection::vec(0.1f64..100.0, 1..24), 1..6)
        .prop_map(|series| Table::from_unlabelled_series(series).unwrap())
}

/// Tent-shaped series of length >= 2 peaking strictly at `ceil(len / 2)`.
fn tent(len: usize) -> Vec<f64> {
    let peak = (len + 1) / 2;
    (0..len)
        .map(|i| 1.0 + len as f64 - (i as f64 - peak as f64).abs())
        .collect()
}

proptest! {
    #[test]
    fn find_middle_is_ceil_half(len in 0usize..2000) {
        let indices: Vec<usize> = (0..len).collect();
        let expected = (len as f64 / 2.0).ceil() as usize;
        prop_assert_eq!(find_middle(&indices), expected);
    }

    #[test]
    fn shift_preserves_length(values in prop::collection::vec(-50.0f64..50.0, 0..40), shift in -60isize..60) {
        let shifted = shift_column(&values, shift);
        prop_assert_eq!(shifted.len(), values.len());

        for (row, &v) in shifted.iter().enumerate() {
            let source = row as isize - shift;
            if source >= 0 && (source as usize) < values.len() {
                prop_assert_eq!(v, values[source as usize]);
            } else {
                prop_assert_eq!(v, 0.0);
            }
        }
    }

    #[test]
    fn max_mode_aligns_peaks(table in positive_table()) {
        let result = realign_data(&table, AlignMode::Max).unwrap();
        let reference = reference_column(&table).unwrap();

        prop_assert_eq!(result.reference_column, reference);
        prop_assert_eq!(result.shifts[reference], 0);
        prop_assert_eq!(result.table.n_rows(), table.n_rows());
        prop_assert_eq!(result.table.n_cols(), table.n_cols());

        for column in result.table.columns() {
            prop_assert_eq!(argmax(column), Some(result.reference_feature));
        }
    }

    #[test]
    fn max_mode_is_idempotent(table in positive_table()) {
        let (aligned, _) = realign_data(&table, AlignMode::Max).unwrap().into_parts();
        let again = realign_data(&aligned, AlignMode::Max).unwrap();

        prop_assert!(again.shifts.iter().all(|&s| s == 0));
        prop_assert_eq!(again.table, aligned);
    }

    #[test]
    fn center_mode_shifts_by_support_midpoint(lengths in prop::collection::vec(2usize..24, 1..6)) {
        let series: Vec<Vec<f64>> = lengths.iter().map(|&len| tent(len)).collect();
        let table = Table::from_unlabelled_series(series).unwrap();

        let result = realign_data(&table, AlignMode::Center).unwrap();
        let reference = reference_column(&table).unwrap();
        let reference_middle = (lengths[reference] + 1) / 2;

        prop_assert_eq!(result.reference_feature, reference_middle);
        for (column, &len) in lengths.iter().enumerate() {
            let middle = (len + 1) / 2;
            prop_assert_eq!(result.shifts[column], reference_middle as isize - middle as isize);
            prop_assert_eq!(argmax(result.table.column(column).unwrap()), Some(reference_middle));
        }
    }

    #[test]
    fn input_is_left_untouched(table in positive_table()) {
        let before = table.clone();
        let _ = realign_data(&table, AlignMode::Max);
        let _ = realign_data(&table, AlignMode::Center);
        prop_assert_eq!(table, before);
    }
}
