//! Shared fixtures for unit tests.

use crate::panel::{Panel, PanelRow};

/// Assert two floats agree to 1e-6
#[track_caller]
pub fn assert_close(actual: f64, expected: f64) {
    assert_within(actual, expected, 1e-6);
}

/// Assert two floats agree to `tolerance`
#[track_caller]
pub fn assert_within(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {} ± {}, got {}",
        expected,
        tolerance,
        actual
    );
}

const YEARS: [i32; 7] = [1986, 1991, 1996, 2001, 2006, 2011, 2016];

fn series(
    rows: &mut Vec<PanelRow>,
    suburb: &str,
    lga: &str,
    years: &[i32],
    ieo: &[f64],
    ier: &[f64],
) {
    for (i, &year) in years.iter().enumerate() {
        rows.push(
            PanelRow::new(suburb, lga, year)
                .with_score("ieo_score", ieo[i])
                .with_score("ier_score", ier[i]),
        );
    }
}

/// Small panel shaped like the harmonized Victorian export.
///
/// ASCOT exists under Ballarat (first in file order, 1996 onwards) and under
/// Greater Bendigo (all seven vintages).
pub fn fixture_panel() -> Panel {
    let mut rows = Vec::new();
    series(
        &mut rows,
        "ASCOT",
        "Ballarat City",
        &YEARS[2..],
        &[1001.5, 1003.0, 1004.5, 1006.0, 1007.5],
        &[990.0, 991.0, 992.0, 993.0, 994.0],
    );
    series(
        &mut rows,
        "ABBOTSFORD",
        "Yarra City",
        &YEARS,
        &[990.0, 1016.160743, 1020.0, 1030.0, 1040.0, 1050.0, 1060.0],
        &[
            943.031533,
            1005.398285,
            1040.0,
            1059.098494,
            1062.5,
            1070.2,
            1081.7,
        ],
    );
    series(
        &mut rows,
        "Kew",
        "Boroondara City",
        &YEARS,
        &[
            1179.648871,
            1181.346958,
            1183.0,
            1185.0,
            1187.0,
            1189.0,
            1190.0,
        ],
        &[1100.0, 1101.0, 1102.0, 1103.0, 1104.0, 1105.0, 1106.0],
    );
    series(
        &mut rows,
        "ASCOT",
        "Greater Bendigo (C)",
        &YEARS,
        &[950.0, 955.0, 970.0, 989.194173, 995.0, 1000.0, 1002.0],
        &[940.0, 945.0, 950.0, 955.0, 960.0, 965.0, 970.0],
    );
    Panel::new(rows)
}
