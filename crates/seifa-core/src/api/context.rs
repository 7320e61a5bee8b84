//! Immutable panel snapshot plus derived indices, and the vectorized query
//! entry point over it.

use std::collections::BTreeSet;
use std::sync::Arc;

use super::args::{broadcast_len, Arg, Interpolated};
use crate::config::QuerySettings;
use crate::error::SeifaError;
use crate::names::{NameIndex, Resolution};
use crate::panel::Panel;
use crate::temporal::{self, DateInput, FillValue};

/// Everything a query needs: the panel and the tables derived from it.
///
/// Never mutated after construction, so one context can serve any number of
/// concurrent queries. A panel rebuild produces a new context.
#[derive(Debug, Clone)]
pub struct DataContext {
    panel: Arc<Panel>,
    names: NameIndex,
    settings: QuerySettings,
}

impl DataContext {
    pub fn new(panel: Arc<Panel>, settings: QuerySettings) -> Self {
        let names = NameIndex::build(&panel);
        tracing::debug!(
            "Built data context: {} suburbs, {} repeated-name labels",
            names.suburbs().len(),
            names.repeated_names().len()
        );
        Self {
            panel,
            names,
            settings,
        }
    }

    pub fn panel(&self) -> &Panel {
        &self.panel
    }

    pub fn settings(&self) -> &QuerySettings {
        &self.settings
    }

    /// Qualified labels ("ASCOT - BALLARAT") of suburbs under several LGAs
    pub fn get_repeated_names(&self) -> &BTreeSet<String> {
        self.names.repeated_names()
    }

    /// Canonical suburb names in panel order
    pub fn suburbs(&self) -> &[String] {
        self.names.suburbs()
    }

    /// Canonical LGAs of a suburb in panel order
    pub fn lgas_for(&self, suburb: &str) -> Vec<String> {
        self.names.lgas_for(suburb)
    }

    /// Resolve a suburb (and optional LGA) to the rows of one series
    pub fn resolve(&self, suburb: &str, lga: Option<&str>) -> Result<Resolution<'_>, SeifaError> {
        self.names.resolve(&self.panel, suburb, lga, &self.settings)
    }

    /// Interpolate a single (date, suburb, LGA) tuple.
    pub fn interpolate_one(
        &self,
        date: &DateInput,
        suburb: &str,
        index_column: &str,
        fill_value: FillValue,
        lga: Option<&str>,
    ) -> Result<f64, SeifaError> {
        self.check_index(index_column)?;
        self.interpolate_checked(date, suburb, index_column, fill_value, lga)
    }

    /// Interpolate `index_column` for every aligned (date, suburb, LGA).
    ///
    /// Scalars broadcast against sequences. The result is a scalar only when
    /// every input is. The first failing position aborts the whole call and
    /// no partial results are returned.
    pub fn interpolate(
        &self,
        dates: impl Into<Arg<DateInput>>,
        suburbs: impl Into<Arg<String>>,
        index_column: &str,
        fill_value: FillValue,
        lga: Option<Arg<String>>,
    ) -> Result<Interpolated, SeifaError> {
        let dates = dates.into();
        let suburbs = suburbs.into();

        let len = broadcast_len(&[
            ("dates", dates.len()),
            ("suburb_names", suburbs.len()),
            ("lga", lga.as_ref().and_then(Arg::len)),
        ])?;
        self.check_index(index_column)?;

        let lga_at = |i: usize| lga.as_ref().map(|l| l.at(i).as_str());

        match len {
            None => self
                .interpolate_checked(dates.at(0), suburbs.at(0), index_column, fill_value, lga_at(0))
                .map(Interpolated::Scalar),
            Some(n) => (0..n)
                .map(|i| {
                    self.interpolate_checked(
                        dates.at(i),
                        suburbs.at(i),
                        index_column,
                        fill_value,
                        lga_at(i),
                    )
                })
                .collect::<Result<Vec<f64>, SeifaError>>()
                .map(Interpolated::Series),
        }
    }

    fn check_index(&self, index_column: &str) -> Result<(), SeifaError> {
        if self.panel.has_index(index_column) {
            Ok(())
        } else {
            Err(SeifaError::UnknownIndex {
                column: index_column.to_string(),
            })
        }
    }

    fn interpolate_checked(
        &self,
        date: &DateInput,
        suburb: &str,
        index_column: &str,
        fill_value: FillValue,
        lga: Option<&str>,
    ) -> Result<f64, SeifaError> {
        let resolution = self.resolve(suburb, lga)?;
        let target = temporal::normalize(date)?;
        temporal::interpolate_series(&resolution.rows, index_column, target, fill_value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panel::PanelRow;
    use crate::testutil::{assert_within, fixture_panel};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    const TOL: f64 = 1e-3;

    fn context() -> DataContext {
        DataContext::new(Arc::new(fixture_panel()), QuerySettings::default())
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_interpolation_null() {
        let ctx = context();
        let value = ctx
            .interpolate(vec![1980, 1987], "ABBOTSFORD", "ier_score", FillValue::Nan, None)
            .unwrap();
        assert!(value[0].is_nan());
        assert_within(value[1], 955.5048835511469, TOL);
    }

    #[test]
    fn test_interpolation_extrapolate() {
        let ctx = context();
        let value = ctx
            .interpolate(
                vec![1980, 2000],
                "ABBOTSFORD",
                "ier_score",
                FillValue::Extrapolate,
                None,
            )
            .unwrap();
        assert_within(value[0], 868.1914314671592, TOL);
        assert_within(value[1], 1055.278795, TOL);
    }

    #[test]
    fn test_extrapolate_matches_explicit_slope() {
        let ctx = context();
        let rows = ctx.resolve("ABBOTSFORD", None).unwrap().rows;
        let score = |year: i32| {
            rows.iter()
                .find(|r| r.year == year)
                .and_then(|r| r.score("ier_score"))
                .unwrap()
        };
        let slope = (score(2016) - score(2011)) / 5.0;
        let value = ctx
            .interpolate(2020, "ABBOTSFORD", "ier_score", FillValue::Extrapolate, None)
            .unwrap();
        assert_within(value[0], score(2016) + 4.0 * slope, 1e-9);
    }

    #[test]
    fn test_interpolate_boundary_value() {
        let ctx = context();
        let value = ctx
            .interpolate(
                [1980, 1986],
                "ABBOTSFORD",
                "ieo_score",
                FillValue::BoundaryValue,
                None,
            )
            .unwrap();
        assert_within(value[0], value[1], TOL);
    }

    #[test]
    fn test_sample_years_round_trip_exactly() {
        let ctx = context();
        for row in ctx.panel().rows() {
            let lga = row.lga.clone();
            let value = ctx
                .interpolate(row.year, row.suburb.as_str(), "ieo_score", FillValue::Nan, Some(lga.into()))
                .unwrap();
            assert_eq!(value.as_scalar(), row.score("ieo_score"));
        }
    }

    #[test]
    fn test_interpolate_multiple_suburbs() {
        let ctx = context();
        let value = ctx
            .interpolate(
                vec!["1-7-1980", "31-10-1986"],
                vec!["kew", "ABBOTSFORD"],
                "ieo_score",
                FillValue::BoundaryValue,
                None,
            )
            .unwrap();
        assert_eq!(value.len(), 2);
        assert_within(value[0], 1179.648871, TOL);
        assert_within(value[1], 994.3434, TOL);
    }

    #[test]
    fn test_interpolate_datetimes() {
        let ctx = context();
        let dates = vec![
            date(1980, 7, 1).and_hms_opt(0, 0, 0).unwrap(),
            date(1986, 10, 31).and_hms_opt(0, 0, 0).unwrap(),
        ];
        let suburbs = ["kew".to_string(), "ABBOTSFORD".to_string()];
        let value = ctx
            .interpolate(
                dates.as_slice(),
                &suburbs[..],
                "ieo_score",
                FillValue::BoundaryValue,
                None,
            )
            .unwrap();
        assert_within(value[0], 1179.648871, TOL);
        assert_within(value[1], 994.3434, TOL);
    }

    #[test]
    fn test_interpolate_single_datetime_is_scalar() {
        let ctx = context();
        let value = ctx
            .interpolate(
                date(1986, 10, 31).and_hms_opt(0, 0, 0).unwrap(),
                "kew",
                "ieo_score",
                FillValue::BoundaryValue,
                None,
            )
            .unwrap();
        let value = value.as_scalar().expect("scalar inputs give a scalar");
        assert_within(value, 1179.9308, TOL);
    }

    #[test]
    fn test_interpolate_lga() {
        let ctx = context();
        let value = ctx
            .interpolate(
                date(1996, 10, 31),
                "ASCOT",
                "ieo_score",
                FillValue::Nan,
                Some("Greater Bendigo".into()),
            )
            .unwrap();
        assert_within(value.as_scalar().unwrap(), 973.18854015, TOL);
    }

    #[test]
    fn test_interpolate_lga_list() {
        let ctx = context();
        let value = ctx
            .interpolate(
                vec![date(1996, 10, 31), date(1986, 10, 31)],
                vec!["ASCOT", "kew"],
                "ieo_score",
                FillValue::Nan,
                Some(vec!["Greater Bendigo", "Boroondara"].into()),
            )
            .unwrap();
        assert_within(value[0], 973.18854015, TOL);
        assert_within(value[1], 1179.9308, TOL);
    }

    #[test]
    fn test_repeated_name_without_lga_uses_default() {
        let ctx = context();
        let bare = ctx
            .interpolate(2001, "ASCOT", "ieo_score", FillValue::Nan, None)
            .unwrap();
        let ballarat = ctx
            .interpolate(2001, "ASCOT - BALLARAT", "ieo_score", FillValue::Nan, None)
            .unwrap();
        assert_eq!(bare, Interpolated::Scalar(1003.0));
        assert_eq!(bare, ballarat);
    }

    #[test]
    fn test_strict_context_rejects_repeated_name() {
        let settings = QuerySettings {
            strict: true,
            ..QuerySettings::default()
        };
        let ctx = DataContext::new(Arc::new(fixture_panel()), settings);
        let err = ctx
            .interpolate(2001, "ASCOT", "ieo_score", FillValue::Nan, None)
            .unwrap_err();
        assert!(matches!(err, SeifaError::AmbiguousName { .. }));
    }

    #[test]
    fn test_prequalified_suburb_column() {
        let panel = Panel::new(vec![
            PanelRow::new("ASCOT - GREATER BENDIGO", "Greater Bendigo", 1991)
                .with_score("ieo_score", 955.0),
            PanelRow::new("ASCOT - GREATER BENDIGO", "Greater Bendigo", 1996)
                .with_score("ieo_score", 970.0),
            PanelRow::new("ASCOT - GREATER BENDIGO", "Greater Bendigo", 2001)
                .with_score("ieo_score", 989.194173),
            PanelRow::new("ASCOT - BALLARAT", "Ballarat", 1996).with_score("ieo_score", 1001.5),
            PanelRow::new("ASCOT - BALLARAT", "Ballarat", 2001).with_score("ieo_score", 1003.0),
        ]);
        let ctx = DataContext::new(Arc::new(panel), QuerySettings::default());

        let names: Vec<&str> = ctx.get_repeated_names().iter().map(String::as_str).collect();
        assert_eq!(names, vec!["ASCOT - BALLARAT", "ASCOT - GREATER BENDIGO"]);

        let value = ctx
            .interpolate(
                date(1996, 10, 31),
                "ASCOT",
                "ieo_score",
                FillValue::Nan,
                Some("Greater Bendigo".into()),
            )
            .unwrap();
        assert_within(value.as_scalar().unwrap(), 973.18854015, TOL);
    }

    #[test]
    fn test_get_repeated_names() {
        let ctx = context();
        let names = ctx.get_repeated_names();
        assert!(names.contains("ASCOT - BALLARAT"));
        assert!(!names.contains("ASCOT - BALLARAT CITY"));
    }

    #[test]
    fn test_broadcast_one_suburb_many_dates() {
        let ctx = context();
        let dates: Vec<i32> = (1986..=2016).collect();
        let value = ctx
            .interpolate(dates.clone(), "kew", "ier_score", FillValue::Nan, None)
            .unwrap();
        assert_eq!(value.len(), dates.len());
        assert!(value.values().iter().all(|v| !v.is_nan()));
    }

    #[test]
    fn test_broadcast_aligns_positionally() {
        let ctx = context();
        let batch = ctx
            .interpolate(
                vec![1991, 2001, 1996],
                vec!["KEW", "ABBOTSFORD", "KEW"],
                "ier_score",
                FillValue::Nan,
                None,
            )
            .unwrap();
        let singles: Vec<f64> = [(1991, "KEW"), (2001, "ABBOTSFORD"), (1996, "KEW")]
            .into_iter()
            .map(|(y, s)| {
                ctx.interpolate(y, s, "ier_score", FillValue::Nan, None)
                    .unwrap()[0]
            })
            .collect();
        assert_eq!(batch, Interpolated::Series(singles));
    }

    #[test]
    fn test_single_element_sequence_is_not_scalar() {
        let ctx = context();
        let value = ctx
            .interpolate(vec![1991], "KEW", "ier_score", FillValue::Nan, None)
            .unwrap();
        assert_eq!(value, Interpolated::Series(vec![1101.0]));
    }

    #[test]
    fn test_empty_sequence_gives_empty_series() {
        let ctx = context();
        let value = ctx
            .interpolate(Vec::<i32>::new(), "KEW", "ier_score", FillValue::Nan, None)
            .unwrap();
        assert!(value.is_empty());
    }

    #[test]
    fn test_shape_mismatch() {
        let ctx = context();
        let err = ctx
            .interpolate(
                vec![1991, 1996],
                vec!["KEW", "ABBOTSFORD", "KEW"],
                "ier_score",
                FillValue::Nan,
                None,
            )
            .unwrap_err();
        assert_eq!(
            err,
            SeifaError::Shape {
                argument: "suburb_names",
                expected: 2,
                found: 3,
            }
        );

        let err = ctx
            .interpolate(
                vec![1991, 1996],
                "KEW",
                "ier_score",
                FillValue::Nan,
                Some(vec!["Boroondara"].into()),
            )
            .unwrap_err();
        assert!(matches!(err, SeifaError::Shape { argument: "lga", .. }));
    }

    #[test]
    fn test_batch_fails_fast_without_partial_results() {
        let ctx = context();
        let err = ctx
            .interpolate(
                1991,
                vec!["KEW", "ATLANTIS", "ABBOTSFORD"],
                "ier_score",
                FillValue::Nan,
                None,
            )
            .unwrap_err();
        assert_eq!(
            err,
            SeifaError::NotFound {
                suburb: "ATLANTIS".to_string(),
                lga: None,
            }
        );

        let err = ctx
            .interpolate(
                vec!["1991", "31-02-1991"],
                "KEW",
                "ier_score",
                FillValue::Nan,
                None,
            )
            .unwrap_err();
        assert!(matches!(err, SeifaError::DateParse { .. }));
    }

    #[test]
    fn test_unknown_index() {
        let ctx = context();
        let err = ctx
            .interpolate(1991, "KEW", "irsd_score", FillValue::Nan, None)
            .unwrap_err();
        assert_eq!(
            err,
            SeifaError::UnknownIndex {
                column: "irsd_score".to_string()
            }
        );
    }

    #[test]
    fn test_duplicate_year_surfaces_as_invariant_violation() {
        let panel = Panel::new(vec![
            PanelRow::new("KEW", "Boroondara", 1986).with_score("ieo_score", 1.0),
            PanelRow::new("KEW", "Boroondara City", 1986).with_score("ieo_score", 2.0),
            PanelRow::new("KEW", "Boroondara", 1991).with_score("ieo_score", 3.0),
        ]);
        let ctx = DataContext::new(Arc::new(panel), QuerySettings::default());
        let err = ctx
            .interpolate_one(&DateInput::Year(1988), "KEW", "ieo_score", FillValue::Nan, None)
            .unwrap_err();
        assert!(matches!(err, SeifaError::InvariantViolation { year: 1986, .. }));
    }

    #[test]
    fn test_context_is_shareable_across_threads() {
        let ctx = Arc::new(context());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let ctx = Arc::clone(&ctx);
                std::thread::spawn(move || {
                    ctx.interpolate(1991 + i, "KEW", "ier_score", FillValue::Nan, None)
                        .unwrap()[0]
                })
            })
            .collect();
        for handle in handles {
            assert!(!handle.join().unwrap().is_nan());
        }
    }
}
