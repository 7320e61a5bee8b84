//! Suburb → series resolution for names shared by several LGAs.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

use super::{
    canonical_suburb, normalize_lga, normalize_suburb, qualified_label, split_qualified,
};
use crate::config::QuerySettings;
use crate::error::SeifaError;
use crate::panel::{Panel, PanelRow};

/// How to pick an LGA for a repeated suburb queried without one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefaultLgaPolicy {
    /// First LGA encountered in panel order
    #[default]
    FirstInPanel,
    /// LGA with the most rows; ties go to the first in panel order
    MostFrequent,
}

/// Rows of one canonical LGA under a suburb
#[derive(Debug, Clone)]
struct LgaGroup {
    lga: String,
    rows: Vec<usize>,
}

/// Suburb/LGA lookup tables derived from a panel.
///
/// Built once per panel snapshot; never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct NameIndex {
    /// Canonical suburb → LGA groups in panel order
    suburbs: HashMap<String, Vec<LgaGroup>>,
    /// Canonical suburb names in panel order
    order: Vec<String>,
    /// Qualified labels of every suburb under more than one LGA
    repeated: BTreeSet<String>,
}

/// A resolved series: one canonical (suburb, LGA) and its rows
#[derive(Debug, Clone)]
pub struct Resolution<'a> {
    pub suburb: String,
    pub lga: String,
    pub rows: Vec<&'a PanelRow>,
    /// True when the LGA was picked by the default policy or an override
    pub defaulted: bool,
}

impl NameIndex {
    pub fn build(panel: &Panel) -> Self {
        let mut suburbs: HashMap<String, Vec<LgaGroup>> = HashMap::new();
        let mut order = Vec::new();

        for (i, row) in panel.rows().iter().enumerate() {
            let suburb = canonical_suburb(&row.suburb, &row.lga);
            let lga = normalize_lga(&row.lga);
            let groups = suburbs.entry(suburb.clone()).or_insert_with(|| {
                order.push(suburb.clone());
                Vec::new()
            });
            match groups.iter_mut().find(|g| g.lga == lga) {
                Some(group) => group.rows.push(i),
                None => groups.push(LgaGroup { lga, rows: vec![i] }),
            }
        }

        let repeated = suburbs
            .iter()
            .filter(|(_, groups)| groups.len() > 1)
            .flat_map(|(suburb, groups)| groups.iter().map(move |g| qualified_label(suburb, &g.lga)))
            .collect();

        Self {
            suburbs,
            order,
            repeated,
        }
    }

    /// Qualified labels ("ASCOT - BALLARAT") of every repeated suburb
    pub fn repeated_names(&self) -> &BTreeSet<String> {
        &self.repeated
    }

    /// Whether a suburb name exists under more than one LGA
    pub fn is_repeated(&self, suburb: &str) -> bool {
        self.suburbs
            .get(&normalize_suburb(suburb))
            .is_some_and(|groups| groups.len() > 1)
    }

    /// Canonical suburb names in panel order
    pub fn suburbs(&self) -> &[String] {
        &self.order
    }

    /// Canonical LGAs of a suburb in panel order (empty if unknown)
    pub fn lgas_for(&self, suburb: &str) -> Vec<String> {
        self.suburbs
            .get(&normalize_suburb(suburb))
            .map(|groups| groups.iter().map(|g| g.lga.clone()).collect())
            .unwrap_or_default()
    }

    /// Resolve a suburb name, optionally narrowed by an LGA, to one series.
    ///
    /// A blank `lga` counts as no LGA.
    pub fn resolve<'a>(
        &self,
        panel: &'a Panel,
        suburb: &str,
        lga: Option<&str>,
        settings: &QuerySettings,
    ) -> Result<Resolution<'a>, SeifaError> {
        let suburb = normalize_suburb(suburb);
        let lga = lga.map(normalize_lga).filter(|l| !l.is_empty());

        let (suburb, lga) = if self.suburbs.contains_key(&suburb) {
            (suburb, lga)
        } else {
            self.unqualify(&suburb, lga)?
        };

        let not_found = || SeifaError::NotFound {
            suburb: suburb.clone(),
            lga: lga.clone(),
        };
        let groups = self.suburbs.get(&suburb).ok_or_else(not_found)?;

        let (group, defaulted) = match &lga {
            Some(wanted) => {
                let group = groups
                    .iter()
                    .find(|g| &g.lga == wanted)
                    .ok_or_else(not_found)?;
                (group, false)
            }
            None if groups.len() == 1 => (&groups[0], false),
            None => {
                let candidates: Vec<String> = groups.iter().map(|g| g.lga.clone()).collect();
                if settings.strict {
                    return Err(SeifaError::AmbiguousName {
                        suburb,
                        lgas: candidates,
                    });
                }
                let group = default_group(&suburb, groups, settings);
                tracing::warn!(
                    "{} exists in several LGAs ({}); using {}. Pass an LGA to choose another.",
                    suburb,
                    candidates.join(", "),
                    group.lga
                );
                (group, true)
            }
        };

        tracing::debug!(
            "Resolved {} to LGA {} ({} rows)",
            suburb,
            group.lga,
            group.rows.len()
        );

        Ok(Resolution {
            lga: group.lga.clone(),
            rows: group.rows.iter().map(|&i| &panel.rows()[i]).collect(),
            suburb,
            defaulted,
        })
    }

    /// Interpret "SUBURB - LGA" as (SUBURB, LGA) when the suffix is one of
    /// the suburb's LGAs and agrees with any explicit LGA.
    fn unqualify(
        &self,
        label: &str,
        lga: Option<String>,
    ) -> Result<(String, Option<String>), SeifaError> {
        let not_found = || SeifaError::NotFound {
            suburb: label.to_string(),
            lga: lga.clone(),
        };
        let (base, qualifier) = split_qualified(label).ok_or_else(not_found)?;
        let qualifier = normalize_lga(qualifier);
        let groups = self.suburbs.get(base).ok_or_else(not_found)?;
        if !groups.iter().any(|g| g.lga == qualifier) {
            return Err(not_found());
        }
        match &lga {
            Some(explicit) if explicit != &qualifier => Err(not_found()),
            _ => Ok((base.to_string(), Some(qualifier))),
        }
    }
}

fn default_group<'g>(
    suburb: &str,
    groups: &'g [LgaGroup],
    settings: &QuerySettings,
) -> &'g LgaGroup {
    let override_lga = settings
        .lga_overrides
        .iter()
        .find(|(name, _)| normalize_suburb(name) == suburb)
        .map(|(_, lga)| normalize_lga(lga));

    if let Some(wanted) = override_lga {
        match groups.iter().find(|g| g.lga == wanted) {
            Some(group) => return group,
            None => tracing::warn!(
                "LGA override {} for {} matches no panel rows; falling back to {:?}",
                wanted,
                suburb,
                settings.default_lga
            ),
        }
    }

    match settings.default_lga {
        DefaultLgaPolicy::FirstInPanel => &groups[0],
        // max_by_key keeps the last maximum, so compare in reverse to keep the first
        DefaultLgaPolicy::MostFrequent => groups
            .iter()
            .rev()
            .max_by_key(|g| g.rows.len())
            .unwrap_or(&groups[0]),
    }
}
